//! elem-json: the nested-mapping backend for elem-tree documents.
//!
//! [`MappingSerializer`] implements the core traversal protocol and
//! accumulates a `serde_json` mapping: leaf nodes collapse to their bare
//! value, nodes with attributes or children become objects with the node's
//! own value stored under a configurable text key, and list groupings
//! become arrays with their append order re-validated against the
//! in-progress output.
//!
//! # Quick Start
//!
//! ```rust
//! use elem_tree::Document;
//! use elem_json::MappingSerializer;
//!
//! let mut doc = Document::new();
//! doc.root().set("a", 1).set("b", 2);
//!
//! let out = MappingSerializer::new(&doc).serialize(doc.root_id())?;
//! assert_eq!(out, serde_json::json!({"a": {"text": 1, "b": 2}}));
//! # Ok::<(), elem_tree::Error>(())
//! ```

use serde_json::{Map, Value};

use elem_tree::{walk_tree, Attr, Document, Error, NodeId, Result, TreeVisitor};

/// Options for the mapping output
#[derive(Debug, Clone)]
pub struct MappingOptions {
    /// Key used for a node's own value when the node also has attributes
    /// or children
    pub text_key: String,
    /// Prefix prepended to attribute keys; may be empty or multi-character
    pub attr_prefix: String,
    /// Whether keys retain their namespace-prefix qualification
    pub include_ns: bool,
}

impl Default for MappingOptions {
    fn default() -> Self {
        MappingOptions {
            text_key: "text".to_string(),
            attr_prefix: "#".to_string(),
            include_ns: false,
        }
    }
}

/// Serializes a document subtree to a nested mapping
pub struct MappingSerializer<'a> {
    doc: &'a Document,
    opts: MappingOptions,
}

impl<'a> MappingSerializer<'a> {
    /// Serializer with default options
    pub fn new(doc: &'a Document) -> Self {
        Self::with_options(doc, MappingOptions::default())
    }

    /// Serializer with explicit options
    pub fn with_options(doc: &'a Document, opts: MappingOptions) -> Self {
        MappingSerializer { doc, opts }
    }

    /// Serialize the subtree under `node` to a nested mapping. Any node in
    /// the tree can serve as the serialization root, the synthetic
    /// top-level node included.
    pub fn serialize(&self, node: NodeId) -> Result<Value> {
        let mut visitor = MapVisitor { opts: &self.opts };
        let acc = walk_tree(
            self.doc,
            node,
            &mut visitor,
            self.opts.include_ns,
            MapAcc::default(),
        )?;
        Ok(Value::Object(finalize(acc)))
    }

    /// Serialize the subtree under `node` to a JSON string
    pub fn to_json(&self, node: NodeId) -> Result<String> {
        let value = self.serialize(node)?;
        serde_json::to_string(&value).map_err(|e| Error::Json(e.to_string()))
    }
}

/// Accumulator for one walk: the map being filled plus, for non-leaf
/// serialization roots, the key the filled map is wrapped under once the
/// walk finishes.
#[derive(Default)]
struct MapAcc {
    out: Map<String, Value>,
    wrap: Option<String>,
}

fn finalize(acc: MapAcc) -> Map<String, Value> {
    match acc.wrap {
        Some(name) => {
            let mut wrapped = Map::new();
            wrapped.insert(name, Value::Object(acc.out));
            wrapped
        }
        None => acc.out,
    }
}

fn snapshot(out: &Map<String, Value>) -> String {
    Value::Object(out.clone()).to_string()
}

struct MapVisitor<'a> {
    opts: &'a MappingOptions,
}

impl MapVisitor<'_> {
    fn node_key(&self, doc: &Document, node: NodeId) -> String {
        if self.opts.include_ns {
            doc.name(node).to_string()
        } else {
            doc.local_name(node).to_string()
        }
    }
}

impl TreeVisitor for MapVisitor<'_> {
    type Acc = MapAcc;

    fn on_value(&mut self, doc: &Document, node: NodeId, mut acc: MapAcc) -> Result<MapAcc> {
        let name = self.node_key(doc, node);
        let value = doc.value_of(node);

        if !doc.has_children(node) && !doc.has_attrs(node) {
            acc.out.insert(name, value.cloned().unwrap_or(Value::Null));
        } else {
            // Attributes and children accumulate into the nested map; the
            // wrap key re-attaches it under the node's name afterwards.
            acc.wrap = Some(name);
            if let Some(value) = value {
                acc.out.insert(self.opts.text_key.clone(), value.clone());
            } else if doc.options().incl_empty_text {
                acc.out.insert(self.opts.text_key.clone(), Value::Null);
            }
        }
        Ok(acc)
    }

    fn on_attr(
        &mut self,
        _doc: &Document,
        name: &str,
        attr: &Attr,
        _node: NodeId,
        mut acc: MapAcc,
    ) -> Result<MapAcc> {
        acc.out.insert(
            format!("{}{}", self.opts.attr_prefix, name),
            attr.value.clone().unwrap_or(Value::Null),
        );
        Ok(acc)
    }

    fn on_scalar_child(
        &mut self,
        doc: &Document,
        _name: &str,
        child: NodeId,
        mut acc: MapAcc,
    ) -> Result<MapAcc> {
        let walked = walk_tree(doc, child, self, self.opts.include_ns, MapAcc::default())?;
        for (key, value) in finalize(walked) {
            acc.out.insert(key, value);
        }
        Ok(acc)
    }

    fn on_list_child(
        &mut self,
        doc: &Document,
        idx: usize,
        name: &str,
        child: NodeId,
        mut acc: MapAcc,
    ) -> Result<MapAcc> {
        let walked = walk_tree(doc, child, self, self.opts.include_ns, MapAcc::default())?;
        let mut child_map = finalize(walked);
        let value = child_map.remove(name).unwrap_or(Value::Null);

        if !acc.out.contains_key(name) {
            // A new output list starts at index zero by construction.
            if idx != 0 {
                return Err(Error::UnexpectedFirst {
                    idx,
                    name: name.to_string(),
                    elem: doc.debug_node(child),
                    out: snapshot(&acc.out),
                });
            }
            acc.out.insert(name.to_string(), Value::Array(vec![value]));
            return Ok(acc);
        }

        let appendable = matches!(acc.out.get(name), Some(Value::Array(a)) if a.len() == idx);
        if !appendable {
            return Err(Error::UnexpectedAppend {
                idx,
                name: name.to_string(),
                elem: doc.debug_node(child),
                out: snapshot(&acc.out),
            });
        }
        if let Some(Value::Array(existing)) = acc.out.get_mut(name) {
            existing.push(value);
        }
        Ok(acc)
    }
}
