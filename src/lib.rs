//! Parsetree: constituency parse trees for role-annotated treebanks
//!
//! Reads bracketed trees such as `S(agent:NP(Head:Nhaa:我)|Head:VC31:吃)`
//! into an arena tree, writes them back as text or nested dicts, and extracts
//! heads, head-dependent relations and subjects.
//! Core implementation in Rust with Python bindings.

// Core modules
pub mod dict; // Nested dict / JSON codec
pub mod error;
pub mod format; // Flat-list format contract
pub mod heads; // Head selection
pub mod node; // Node payload and node records
pub mod relation; // Head-dependent relations
pub mod subjects; // Subject detection
pub mod text; // Bracketed text codec
pub mod tree; // Arena tree
pub mod treebank; // One-tree-per-line readers

// Python bindings
#[cfg(feature = "pyo3")]
pub mod python;

// Re-exports for convenience
pub use dict::TreeDict;
pub use error::TreeError;
pub use format::ListFormat;
pub use heads::Heads;
pub use node::{Node, NodeData, NodeDict, NodeId};
pub use relation::{Relation, RelationDict};
pub use subjects::SubjectRoles;
pub use text::{TextOptions, normalize_text};
pub use tree::Tree;
pub use treebank::{TreeReader, Treebank};

/// Parse one bracketed tree, normalizing it first
pub fn parse_tree(text: &str) -> Result<Tree, TreeError> {
    Tree::from_text(text)
}
