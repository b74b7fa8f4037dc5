//! The generic traversal protocol both serialization backends are built
//! on: one walk, four callbacks, an opaque accumulator threaded through.

use crate::document::Document;
use crate::error::Result;
use crate::node::{Attr, NodeId};

/// Visitor contract for [`walk_tree`].
///
/// Every callback takes the accumulator by value and returns it (possibly
/// replaced), so visitors can re-anchor the accumulation target as they
/// descend. Child callbacks are free to drive nested walks with fresh
/// accumulators of their own.
pub trait TreeVisitor {
    /// Opaque accumulator threaded through the walk
    type Acc;

    /// The node's own value. Not invoked for the synthetic top-level node.
    fn on_value(&mut self, doc: &Document, node: NodeId, acc: Self::Acc) -> Result<Self::Acc>;

    /// One attribute of the node. `name` is namespace-qualified or local
    /// depending on the walk's `include_ns` flag.
    fn on_attr(
        &mut self,
        doc: &Document,
        name: &str,
        attr: &Attr,
        node: NodeId,
        acc: Self::Acc,
    ) -> Result<Self::Acc>;

    /// A direct child that is not part of any list grouping
    fn on_scalar_child(
        &mut self,
        doc: &Document,
        name: &str,
        child: NodeId,
        acc: Self::Acc,
    ) -> Result<Self::Acc>;

    /// A member of a list grouping, with its position
    fn on_list_child(
        &mut self,
        doc: &Document,
        idx: usize,
        name: &str,
        child: NodeId,
        acc: Self::Acc,
    ) -> Result<Self::Acc>;
}

/// Drive a visitor over one node: its value (synthetic root excluded),
/// each attribute, each non-list child, then each list grouping in order
/// of first indexed access.
pub fn walk_tree<V: TreeVisitor>(
    doc: &Document,
    node: NodeId,
    visitor: &mut V,
    include_ns: bool,
    mut acc: V::Acc,
) -> Result<V::Acc> {
    if !doc.is_top_level(node) {
        acc = visitor.on_value(doc, node, acc)?;
    }

    for attr in doc.attrs_of(node) {
        let name = if include_ns {
            attr.name.as_str()
        } else {
            attr.local_name.as_str()
        };
        acc = visitor.on_attr(doc, name, attr, node, acc)?;
    }

    for &child in doc.children_of(node) {
        if doc.is_list_member(child) {
            continue;
        }
        let name = child_name(doc, child, include_ns);
        acc = visitor.on_scalar_child(doc, &name, child, acc)?;
    }

    for (_, members) in doc.lists_of(node) {
        for (idx, &child) in members.iter().enumerate() {
            let name = child_name(doc, child, include_ns);
            acc = visitor.on_list_child(doc, idx, &name, child, acc)?;
        }
    }

    Ok(acc)
}

fn child_name(doc: &Document, child: NodeId, include_ns: bool) -> String {
    if include_ns {
        doc.name(child).to_string()
    } else {
        doc.local_name(child).to_string()
    }
}
