//! Node and attribute storage.
//!
//! Nodes live in the [`Document`](crate::Document) arena and are addressed
//! by [`NodeId`] handles; the data here is the per-node record the arena
//! owns.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde_json::Value;

use crate::ns::{NsInfo, NsMap};

/// Lightweight handle to a node in a document arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A markup attribute with its own namespace resolution.
///
/// Attributes never inherit a default namespace from ancestor elements;
/// their namespace is resolved from an embedded declared prefix only.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    /// Raw name as given, possibly carrying a `prefix_` token
    pub name: String,
    /// Local name with any declared prefix stripped
    pub local_name: String,
    /// Attribute value; `None` means structurally present but unset
    pub value: Option<Value>,
    /// Resolved namespace URI, if the name carried a declared prefix
    pub ns: Option<String>,
    /// Prefix the namespace was resolved through
    pub ns_prefix: Option<String>,
}

impl Attr {
    pub(crate) fn new(name: &str, value: Option<Value>, ns_map: &NsMap) -> Self {
        let (ns_prefix, local, ns) = match crate::ns::split_prefix(name, ns_map) {
            Some((prefix, local)) => (
                Some(prefix.to_string()),
                local.to_string(),
                ns_map.get(prefix).map(str::to_string),
            ),
            None => (None, name.to_string(), None),
        };
        Attr {
            name: name.to_string(),
            local_name: local,
            value,
            ns,
            ns_prefix,
        }
    }
}

impl Eq for Attr {}

// Attributes order lexicographically by (namespace URI, name); the name is
// the tie-break.
impl Ord for Attr {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = (self.ns.as_deref().unwrap_or(""), self.name.as_str());
        let rhs = (other.ns.as_deref().unwrap_or(""), other.name.as_str());
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Attr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-node record owned by the document arena
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    /// Raw name, possibly carrying a `prefix_` namespace token
    pub name: String,
    /// Node value; `None` is the "no value" sentinel, distinct from
    /// `Value::Null`
    pub value: Option<Value>,
    /// Parent handle; `None` only for the synthetic root
    pub parent: Option<NodeId>,
    /// Children in materialization order, list members included
    pub children: Vec<NodeId>,
    /// Distinct raw child names, for containment checks
    pub child_names: HashSet<String>,
    /// List groupings in order of first indexed access
    pub lists: Vec<(String, Vec<NodeId>)>,
    /// Namespace state resolved at creation time
    pub ns: NsInfo,
    /// Prefix declarations this node sees
    pub ns_map: NsMap,
    /// Attributes in insertion order
    pub attrs: Vec<(String, Attr)>,
}

impl NodeData {
    pub(crate) fn new(name: &str, value: Option<Value>, parent: Option<NodeId>) -> Self {
        NodeData {
            name: name.to_string(),
            value,
            parent,
            children: Vec::new(),
            child_names: HashSet::new(),
            lists: Vec::new(),
            ns: NsInfo::default(),
            ns_map: NsMap::new(),
            attrs: Vec::new(),
        }
    }

    /// Members of the list grouping for `name`, if one was started
    pub(crate) fn list(&self, name: &str) -> Option<&[NodeId]> {
        self.lists
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, members)| members.as_slice())
    }

    pub(crate) fn list_mut(&mut self, name: &str) -> &mut Vec<NodeId> {
        if let Some(idx) = self.lists.iter().position(|(n, _)| n == name) {
            return &mut self.lists[idx].1;
        }
        let idx = self.lists.len();
        self.lists.push((name.to_string(), Vec::new()));
        &mut self.lists[idx].1
    }

    /// Whether the child id belongs to any list grouping
    pub(crate) fn is_list_member(&self, child: NodeId) -> bool {
        self.lists
            .iter()
            .any(|(_, members)| members.contains(&child))
    }

    /// Position of the child within its list grouping, if it is a member
    pub(crate) fn list_index_of(&self, child: NodeId) -> Option<usize> {
        self.lists
            .iter()
            .find_map(|(_, members)| members.iter().position(|&m| m == child))
    }

    pub(crate) fn attr(&self, name: &str) -> Option<&Attr> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, attr)| attr)
    }
}
