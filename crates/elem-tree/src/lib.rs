//! elem-tree: incremental document trees with a generic traversal contract.
//!
//! This crate is the core of the elem workspace: an arena-backed tree of
//! named nodes with optional values, attributes and namespaces, built
//! through get-or-create path navigation, plus the four-callback traversal
//! protocol that the mapping and markup serializer crates implement.
//!
//! # Quick Start
//!
//! ```rust
//! use elem_tree::Document;
//!
//! let mut doc = Document::new();
//! doc.root().set("a", 1);
//! doc.root().child("a").set("b", 2).attr("id", "x1");
//!
//! let b = doc.root().child("a").child("b").id();
//! assert_eq!(doc.path(b), "a.b");
//! ```

pub mod document;
pub mod error;
pub mod node;
pub mod ns;
pub mod pretty;
pub mod walk;

// Re-export core types
pub use document::{Document, NodeMut, Options, PathStyle};
pub use error::{Error, Result};
pub use node::{Attr, NodeId};
pub use ns::{well_known, NsInfo, NsMap};
pub use pretty::PrettyOptions;
pub use walk::{walk_tree, TreeVisitor};
