//! Error types for tree construction and serialization

use crate::node::NodeId;
use thiserror::Error;

/// Error raised while building, reading or serializing a parsed tree
#[derive(Debug, Error)]
pub enum TreeError {
    /// Node text with more `:`-delimited fields than role, pos and word
    #[error("malformed node text {text:?}: expected at most 3 fields, found {fields}")]
    MalformedField { text: String, fields: usize },

    /// Unbalanced brackets or text outside the tree
    #[error("structural error at offset {offset}: {message}")]
    Structural { offset: usize, message: String },

    /// A node id was inserted twice
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    /// A node was attached to a parent the tree does not contain
    #[error("node {id} refers to unknown parent {parent}")]
    UnknownParent { id: NodeId, parent: NodeId },

    /// A second parentless node was inserted
    #[error("node {id} would be a second root (root is {root})")]
    MultipleRoots { id: NodeId, root: NodeId },

    /// Lookup of a node id the tree does not contain
    #[error("no node with id {0}")]
    MissingNode(NodeId),

    #[error("tree is empty")]
    EmptyTree,

    /// Operation the entity does not implement (flat-list format and friends)
    #[error("{entity}::{operation} is not supported")]
    NotSupported {
        entity: &'static str,
        operation: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any of the above, raised while reading one line of a treebank
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<TreeError>,
    },
}

impl TreeError {
    pub(crate) fn structural(offset: usize, message: impl Into<String>) -> Self {
        Self::Structural {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn not_supported(entity: &'static str, operation: &'static str) -> Self {
        Self::NotSupported { entity, operation }
    }

    pub(crate) fn at_line(line: usize, source: TreeError) -> Self {
        Self::AtLine {
            line,
            source: Box::new(source),
        }
    }
}
