//! Arena-backed document tree and the builder cursor.
//!
//! A [`Document`] owns every node of one tree; [`NodeId`] handles index
//! into the arena and stay valid for the document's lifetime. Construction
//! goes through the [`NodeMut`] cursor, which implements the get-or-create
//! navigation contract: touching a child name materializes the child.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::node::{Attr, NodeData, NodeId};
use crate::ns::{self, NsInfo, NsMap};

/// How node paths render: separator between segments and the leading
/// prefix, e.g. `a.b.c` for mapping-style documents and `/a/b/c` for
/// markup-style ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathStyle {
    /// `a.b.c`
    #[default]
    Dotted,
    /// `/a/b/c`
    Slashed,
}

impl PathStyle {
    fn prefix(self) -> &'static str {
        match self {
            PathStyle::Dotted => "",
            PathStyle::Slashed => "/",
        }
    }

    fn separator(self) -> &'static str {
        match self {
            PathStyle::Dotted => ".",
            PathStyle::Slashed => "/",
        }
    }
}

/// Document-wide construction options, fixed at root creation
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Accepted for compatibility with ordered-attribute call sites;
    /// attribute storage is insertion-ordered either way
    pub attrs_ordered: bool,
    /// Emit the text key for value-less nodes in mapping output
    pub incl_empty_text: bool,
    /// Path rendering style
    pub path_style: PathStyle,
}

/// An arena-backed tree of named nodes with values, attributes and
/// namespaces.
///
/// The synthetic top-level node exists from creation and represents "no
/// element yet"; it never appears in paths or serialized output.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    ns_counter: u64,
    options: Options,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with dotted (mapping-style) paths
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Create an empty document with slashed (markup-style) paths
    pub fn xml() -> Self {
        Self::with_options(Options {
            path_style: PathStyle::Slashed,
            ..Options::default()
        })
    }

    /// Create an empty document with explicit options
    pub fn with_options(options: Options) -> Self {
        Document {
            nodes: vec![NodeData::new("", None, None)],
            ns_counter: 0,
            options,
        }
    }

    /// Handle of the synthetic top-level node
    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    /// Builder cursor positioned at the synthetic top-level node
    pub fn root(&mut self) -> NodeMut<'_> {
        NodeMut {
            id: NodeId(0),
            doc: self,
        }
    }

    /// Builder cursor positioned at an existing node
    pub fn node_mut(&mut self, id: NodeId) -> NodeMut<'_> {
        NodeMut { id, doc: self }
    }

    /// Whether the handle names the synthetic top-level node
    pub fn is_top_level(&self, id: NodeId) -> bool {
        id.0 == 0
    }

    /// Number of nodes in the arena, the synthetic root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the synthetic root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Document-wide options
    pub fn options(&self) -> &Options {
        &self.options
    }

    // ==================== Node accessors ====================

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    /// Raw name of a node, namespace token included
    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    /// Name with any declared namespace prefix stripped
    pub fn local_name(&self, id: NodeId) -> &str {
        let node = self.node(id);
        ns::local_name(&node.name, &node.ns_map)
    }

    /// Display name in `prefix:local` form when a declared prefix is
    /// embedded
    pub fn qualified_name(&self, id: NodeId) -> String {
        let node = self.node(id);
        ns::qualified_name(&node.name, &node.ns_map)
    }

    /// Qualified name suffixed with `[idx]` when the node is a list member
    pub fn full_name(&self, id: NodeId) -> String {
        let mut name = self.qualified_name(id);
        if let Some(idx) = self.list_index_of(id) {
            name.push_str(&format!("[{}]", idx));
        }
        name
    }

    /// Node value; `None` is the "no value" sentinel
    pub fn value_of(&self, id: NodeId) -> Option<&Value> {
        self.node(id).value.as_ref()
    }

    /// Parent handle; `None` for the synthetic root
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Children in materialization order, list members included
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Whether the node has any children
    pub fn has_children(&self, id: NodeId) -> bool {
        !self.node(id).children.is_empty()
    }

    /// Attributes in insertion order
    pub fn attrs_of(&self, id: NodeId) -> impl Iterator<Item = &Attr> {
        self.node(id).attrs.iter().map(|(_, attr)| attr)
    }

    /// Whether the node has any attributes
    pub fn has_attrs(&self, id: NodeId) -> bool {
        !self.node(id).attrs.is_empty()
    }

    /// Attribute by raw name
    pub fn attr_of(&self, id: NodeId, name: &str) -> Option<&Attr> {
        self.node(id).attr(name)
    }

    /// List groupings in order of first indexed access
    pub fn lists_of(&self, id: NodeId) -> impl Iterator<Item = (&str, &[NodeId])> {
        self.node(id)
            .lists
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    /// Whether the child belongs to one of its parent's list groupings
    pub fn is_list_member(&self, id: NodeId) -> bool {
        match self.node(id).parent {
            Some(parent) => self.node(parent).is_list_member(id),
            None => false,
        }
    }

    /// Position of the node within its list grouping, if it is a member
    pub fn list_index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.node(id).parent?;
        self.node(parent).list_index_of(id)
    }

    /// Namespace state of the node
    pub fn ns_of(&self, id: NodeId) -> &NsInfo {
        &self.node(id).ns
    }

    /// Prefix declarations the node sees
    pub fn ns_map_of(&self, id: NodeId) -> &NsMap {
        &self.node(id).ns_map
    }

    /// Containment test: whether a child with the given raw name was
    /// materialized directly under the node, list or scalar
    pub fn contains(&self, id: NodeId, name: &str) -> bool {
        self.node(id).child_names.contains(name)
    }

    /// Root-to-node path of qualified names with list indexes, rendered
    /// per the document's path style. The synthetic root contributes
    /// nothing.
    pub fn path(&self, id: NodeId) -> String {
        let style = self.options.path_style;
        let mut parts = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            if self.is_top_level(n) {
                break;
            }
            parts.push(self.full_name(n));
            cur = self.node(n).parent;
        }
        parts.reverse();
        format!("{}{}", style.prefix(), parts.join(style.separator()))
    }

    /// One-line debug rendering of a node: its path plus the value, if any
    pub fn debug_node(&self, id: NodeId) -> String {
        match self.node(id).value.as_ref() {
            Some(value) => format!("<Elem {} `{}`>", self.path(id), value_text(value)),
            None => format!("<Elem {}>", self.path(id)),
        }
    }

    // ==================== Construction internals ====================

    /// First existing child with the given raw name, list members included
    pub fn get_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).name == name)
    }

    fn new_child(&mut self, parent: NodeId, name: &str, value: Option<Value>) -> NodeId {
        let ns_map = self.node(parent).ns_map.clone();
        let ns = self.resolve_elem_ns(name, &ns_map, parent);

        let id = NodeId(self.nodes.len());
        let mut data = NodeData::new(name, value, Some(parent));
        data.ns_map = ns_map;
        data.ns = ns;
        self.nodes.push(data);

        let pdata = self.node_data_mut(parent);
        pdata.children.push(id);
        pdata.child_names.insert(name.to_string());
        id
    }

    fn get_or_create_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        match self.get_child(parent, name) {
            Some(id) => id,
            None => self.new_child(parent, name, None),
        }
    }

    /// Namespace resolution for a new element: an embedded declared prefix
    /// wins; otherwise the nearest default namespace is inherited. The
    /// direct parent is consulted even when it is the synthetic root, the
    /// rest of the ancestor walk excludes it.
    fn resolve_elem_ns(&self, name: &str, ns_map: &NsMap, parent: NodeId) -> NsInfo {
        if let Some((prefix, _)) = ns::split_prefix(name, ns_map) {
            return NsInfo {
                uri: ns_map.get(prefix).map(str::to_string),
                prefix: Some(prefix.to_string()),
                is_default: false,
            };
        }

        let pnode = self.node(parent);
        if pnode.ns.is_default && pnode.ns.is_set() {
            return NsInfo {
                uri: pnode.ns.uri.clone(),
                prefix: pnode.ns.prefix.clone(),
                is_default: true,
            };
        }

        let mut cur = pnode.parent;
        while let Some(id) = cur {
            if self.is_top_level(id) {
                break;
            }
            let node = self.node(id);
            if node.ns.is_default && node.ns.is_set() {
                return NsInfo {
                    uri: node.ns.uri.clone(),
                    prefix: node.ns.prefix.clone(),
                    is_default: true,
                };
            }
            cur = node.parent;
        }

        NsInfo::default()
    }

    fn next_synthetic_prefix(&mut self) -> String {
        let prefix = format!("_ns{}", self.ns_counter);
        self.ns_counter += 1;
        prefix
    }

    /// Attach a namespace to a node explicitly. Always marks it as the
    /// default namespace for unprefixed descendants; an already-declared
    /// URI binds to its existing prefix instead of synthesizing a new one.
    fn assign_ns(&mut self, id: NodeId, uri: &str) {
        let prefix = if uri.is_empty() {
            None
        } else {
            match self.node(id).ns_map.prefix_for(uri) {
                Some(prefix) => Some(prefix.to_string()),
                None => Some(self.next_synthetic_prefix()),
            }
        };
        let data = self.node_data_mut(id);
        data.ns = NsInfo {
            uri: Some(uri.to_string()),
            prefix,
            is_default: true,
        };
    }

    // ==================== List-child protocol ====================

    /// Path of the list the node belongs to: the node's own path with its
    /// trailing index stripped
    fn list_path(&self, id: NodeId) -> String {
        let path = self.path(id);
        match (self.list_index_of(id), path.rfind('[')) {
            (Some(_), Some(pos)) => path[..pos].to_string(),
            _ => path,
        }
    }

    /// Indexed access for the list grouping of `id`'s name under its
    /// parent. `idx == len` appends (reusing the plain-access node when the
    /// list starts), `idx < len` returns the existing member, anything
    /// past the next appendable slot is an index-gap error.
    fn item_at(&mut self, id: NodeId, idx: usize) -> Result<NodeId> {
        let Some(parent) = self.node(id).parent else {
            // Indexed access on the synthetic root: nothing can ever be
            // appended here.
            return Err(Error::index_gap(idx, self.path(id), 0, idx));
        };
        let name = self.node(id).name.clone();
        let len = self.node(parent).list(&name).map_or(0, <[_]>::len);

        if idx > len {
            return Err(Error::index_gap(idx, self.list_path(id), len, idx - 1));
        }

        if idx < len {
            let members = self.node(parent).list(&name);
            // idx < len, so the grouping exists and holds the member.
            if let Some(member) = members.and_then(|m| m.get(idx)) {
                return Ok(*member);
            }
        }

        // idx == len: materialize the next member.
        let member = if idx == 0 {
            // Promotion: the plain-access node becomes element 0 and keeps
            // its value, attributes, children and namespace state.
            match self.get_child(parent, &name) {
                Some(existing) if !self.node(parent).is_list_member(existing) => existing,
                _ => self.new_child(parent, &name, None),
            }
        } else {
            self.new_child(parent, &name, None)
        };
        self.node_data_mut(parent).list_mut(&name).push(member);
        Ok(member)
    }

    fn push_list_item(&mut self, id: NodeId) -> NodeId {
        let len = match self.node(id).parent {
            Some(parent) => {
                let name = &self.node(id).name;
                self.node(parent).list(name).map_or(0, <[_]>::len)
            }
            None => 0,
        };
        // idx == len never gaps.
        match self.item_at(id, len) {
            Ok(member) => member,
            Err(_) => id,
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builder cursor: a mutable document position supporting get-or-create
/// navigation. Methods consume the cursor and return the next position so
/// construction chains naturally.
pub struct NodeMut<'a> {
    doc: &'a mut Document,
    id: NodeId,
}

impl std::fmt::Debug for NodeMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeMut({})", self.doc.debug_node(self.id))
    }
}

impl<'a> NodeMut<'a> {
    /// Handle of the cursor position
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Navigate to a child by name, creating it on first touch
    pub fn child(self, name: &str) -> NodeMut<'a> {
        let id = self.doc.get_or_create_child(self.id, name);
        NodeMut { doc: self.doc, id }
    }

    /// Set a child's value, creating the child on first touch; returns the
    /// child cursor
    pub fn set(self, name: &str, value: impl Into<Value>) -> NodeMut<'a> {
        let id = self.doc.get_or_create_child(self.id, name);
        self.doc.node_data_mut(id).value = Some(value.into());
        NodeMut { doc: self.doc, id }
    }

    /// Set this node's own value in place
    pub fn value(self, value: impl Into<Value>) -> NodeMut<'a> {
        self.doc.node_data_mut(self.id).value = Some(value.into());
        self
    }

    /// Create or update an attribute with a value
    pub fn attr(self, name: &str, value: impl Into<Value>) -> NodeMut<'a> {
        let value = value.into();
        let data = self.doc.node_data_mut(self.id);
        if let Some(idx) = data.attrs.iter().position(|(n, _)| n == name) {
            data.attrs[idx].1.value = Some(value);
        } else {
            let attr = Attr::new(name, Some(value), &data.ns_map);
            data.attrs.push((name.to_string(), attr));
        }
        self
    }

    /// Materialize an attribute without giving it a value
    pub fn touch_attr(self, name: &str) -> NodeMut<'a> {
        let data = self.doc.node_data_mut(self.id);
        if data.attr(name).is_none() {
            let attr = Attr::new(name, None, &data.ns_map);
            data.attrs.push((name.to_string(), attr));
        }
        self
    }

    /// Indexed list access for this node's name under its parent.
    ///
    /// Index 0 promotes the name to list status, reusing this node as the
    /// first member; `len` appends a fresh member; `idx > len` fails with
    /// an index-gap error naming the missing positions.
    pub fn at(self, idx: usize) -> Result<NodeMut<'a>> {
        let id = self.doc.item_at(self.id, idx)?;
        Ok(NodeMut { doc: self.doc, id })
    }

    /// Append a new list member with the given value
    pub fn append(self, value: impl Into<Value>) -> NodeMut<'a> {
        let id = self.doc.push_list_item(self.id);
        self.doc.node_data_mut(id).value = Some(value.into());
        NodeMut { doc: self.doc, id }
    }

    /// Set this node's namespace; always acts as the default namespace for
    /// unprefixed descendants created afterwards
    pub fn ns(self, uri: &str) -> NodeMut<'a> {
        self.doc.assign_ns(self.id, uri);
        self
    }

    /// Merge prefix/URI declarations into this node's namespace map
    pub fn merge_ns<K, V, I>(self, pairs: I) -> NodeMut<'a>
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.doc.node_data_mut(self.id).ns_map.merge(pairs);
        self
    }

    /// Path of the cursor position
    pub fn path(&self) -> String {
        self.doc.path(self.id)
    }
}
