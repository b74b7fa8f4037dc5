//! elem-xml: the markup-element backend for elem-tree documents.
//!
//! [`MarkupSerializer`] converts a document subtree into a native `xot`
//! element tree: node values become text content, attributes carry their
//! resolved namespaces, and every list member becomes its own sibling
//! element of the same tag. The result is returned serialized
//! ([`MarkupSerializer::to_string`]) or as the element tree itself
//! ([`MarkupSerializer::to_tree`]) for further manipulation.
//!
//! # Quick Start
//!
//! ```rust
//! use elem_tree::Document;
//! use elem_xml::MarkupSerializer;
//!
//! let mut doc = Document::xml();
//! doc.root().child("root").set("aaa", "111");
//!
//! let out = MarkupSerializer::new(&doc).to_string(doc.root_id())?;
//! assert_eq!(out, "<root><aaa>111</aaa></root>");
//! # Ok::<(), elem_tree::Error>(())
//! ```

use std::collections::HashSet;

use serde_json::Value;
use xot::Xot;

use elem_tree::{Document, Error, NodeId, Result};

/// Options for the markup output
#[derive(Debug, Clone)]
pub struct MarkupOptions {
    /// Strip namespace declarations the serialized subtree never uses;
    /// the start node's namespace map is the authoritative declaration set
    pub cleanup_ns: bool,
    /// Indented output, forwarded to the xot serializer
    pub pretty: bool,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        MarkupOptions {
            cleanup_ns: true,
            pretty: false,
        }
    }
}

/// Serializes a document subtree to a markup element tree
pub struct MarkupSerializer<'a> {
    doc: &'a Document,
    opts: MarkupOptions,
}

impl<'a> MarkupSerializer<'a> {
    /// Serializer with default options
    pub fn new(doc: &'a Document) -> Self {
        Self::with_options(doc, MarkupOptions::default())
    }

    /// Serializer with explicit options
    pub fn with_options(doc: &'a Document, opts: MarkupOptions) -> Self {
        MarkupSerializer { doc, opts }
    }

    /// Serialize the subtree under `node` to a markup string.
    ///
    /// Serializing from the synthetic top-level node requires exactly one
    /// materialized child: zero is [`Error::NoRoot`], more than one is
    /// [`Error::MultipleRoots`]. Any other node serializes as the document
    /// root without that check.
    pub fn to_string(&self, node: NodeId) -> Result<String> {
        let (xot, root_el) = self.to_tree(node)?;
        if self.opts.pretty {
            let parameters = xot::output::xml::Parameters {
                indentation: Some(Default::default()),
                ..Default::default()
            };
            xot.serialize_xml_string(parameters, root_el)
                .map_err(xml_err)
        } else {
            xot.to_string(root_el).map_err(xml_err)
        }
    }

    /// Serialize the subtree under `node` to a native element tree,
    /// returning the arena it lives in together with the root element
    pub fn to_tree(&self, node: NodeId) -> Result<(Xot, xot::Node)> {
        let root = self.select_root(node)?;
        let mut xot = Xot::new();
        let root_el = self.build(&mut xot, root, None)?;
        self.declare_prefixes(&mut xot, root_el, root)?;
        Ok((xot, root_el))
    }

    /// Root selection: the synthetic top-level node must hold exactly one
    /// child, anything else serializes as-is
    fn select_root(&self, node: NodeId) -> Result<NodeId> {
        if !self.doc.is_top_level(node) {
            return Ok(node);
        }
        let children = self.doc.children_of(node);
        match children.len() {
            0 => Err(Error::NoRoot),
            1 => Ok(children[0]),
            _ => Err(Error::MultipleRoots(
                children.iter().map(|&c| self.doc.debug_node(c)).collect(),
            )),
        }
    }

    /// Recursively build the element for `node` and its subtree.
    /// `inherited_default` is the default namespace URI in scope at the
    /// parent element, used to avoid re-declaring an unchanged default.
    fn build(
        &self,
        xot: &mut Xot,
        node: NodeId,
        inherited_default: Option<&str>,
    ) -> Result<xot::Node> {
        let local = self.doc.local_name(node).to_string();
        let ns_info = self.doc.ns_of(node);
        let uri = ns_info.uri.as_deref().filter(|u| !u.is_empty());

        let name_id = match uri {
            Some(uri) => {
                let ns = xot.add_namespace(uri);
                xot.add_name_ns(&local, ns)
            }
            None => xot.add_name(&local),
        };
        let el = xot.new_element(name_id);

        // Default namespaces declare where they are set; descendants that
        // inherited the same URI stay covered by the scope.
        let own_default = if ns_info.is_default {
            ns_info.uri.as_deref()
        } else {
            None
        };
        let next_default = match own_default {
            Some(uri) => {
                if inherited_default != Some(uri) {
                    let prefix = xot.add_prefix("");
                    let ns = xot.add_namespace(uri);
                    xot.namespaces_mut(el).insert(prefix, ns);
                }
                Some(uri)
            }
            None => inherited_default,
        };

        if let Some(text) = value_text(self.doc.value_of(node)) {
            let text_node = xot.new_text(&text);
            xot.append(el, text_node).map_err(xml_err)?;
        }

        for attr in self.doc.attrs_of(node) {
            let name_id = match attr.ns.as_deref().filter(|u| !u.is_empty()) {
                Some(uri) => {
                    let ns = xot.add_namespace(uri);
                    xot.add_name_ns(&attr.local_name, ns)
                }
                None => xot.add_name(&attr.local_name),
            };
            let text = attr
                .value
                .as_ref()
                .map(scalar_text)
                .unwrap_or_default();
            xot.attributes_mut(el).insert(name_id, text);
        }

        // All children, list members included: each list element is its
        // own sibling of the same tag.
        for &child in self.doc.children_of(node) {
            let child_el = self.build(xot, child, next_default)?;
            xot.append(el, child_el).map_err(xml_err)?;
        }

        Ok(el)
    }

    /// Declare the start node's prefix map on the output root; with
    /// `cleanup_ns` only prefixes whose URI the subtree actually uses are
    /// kept. URIs with no declared prefix get synthesized declarations.
    fn declare_prefixes(&self, xot: &mut Xot, root_el: xot::Node, root: NodeId) -> Result<()> {
        let used = self.opts.cleanup_ns.then(|| self.used_uris(root));

        for (prefix, uri) in self.doc.ns_map_of(root).iter() {
            if uri.is_empty() {
                continue;
            }
            if let Some(used) = &used {
                if !used.contains(uri) {
                    continue;
                }
            }
            let prefix_id = xot.add_prefix(prefix);
            let ns = xot.add_namespace(uri);
            xot.namespaces_mut(root_el).insert(prefix_id, ns);
        }

        xot.create_missing_prefixes(root_el).map_err(xml_err)?;
        Ok(())
    }

    /// Every namespace URI some element or attribute of the subtree
    /// resolves to
    fn used_uris(&self, node: NodeId) -> HashSet<String> {
        let mut used = HashSet::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(uri) = self.doc.ns_of(id).uri.as_deref() {
                if !uri.is_empty() {
                    used.insert(uri.to_string());
                }
            }
            for attr in self.doc.attrs_of(id) {
                if let Some(uri) = attr.ns.as_deref() {
                    if !uri.is_empty() {
                        used.insert(uri.to_string());
                    }
                }
            }
            stack.extend(self.doc.children_of(id).iter().copied());
        }
        used
    }
}

fn xml_err(e: xot::Error) -> Error {
    Error::xml(e.to_string())
}

/// Text content for a node value: the sentinel and JSON null mean no text
/// at all, strings pass through verbatim, other scalars render in their
/// JSON form
fn value_text(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(value) => Some(scalar_text(value)),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
