//! Node payloads and tree vertices
//!
//! `NodeData` is the (role, pos, word) triple carried by every vertex and
//! knows the `role:pos:word` text shorthand. `Node` is the vertex itself.

use crate::error::TreeError;
use crate::format::ListFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node within one tree
pub type NodeId = usize;

/// Field separator of the node text shorthand
pub const FIELD_SEPARATOR: char = ':';

/// The (role, POS-tag, word) payload of a node
///
/// Immutable: the `with_*` methods return a new instance. Unset fields are
/// `None`, never an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "NodeDataFields")]
pub struct NodeData {
    role: Option<String>,
    pos: Option<String>,
    word: Option<String>,
}

// Deserialization goes through here so empty strings become unset fields
#[derive(Deserialize)]
struct NodeDataFields {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    pos: Option<String>,
    #[serde(default)]
    word: Option<String>,
}

impl From<NodeDataFields> for NodeData {
    fn from(fields: NodeDataFields) -> Self {
        NodeData::new(fields.role, fields.pos, fields.word)
    }
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

impl NodeData {
    pub fn new(role: Option<String>, pos: Option<String>, word: Option<String>) -> Self {
        Self {
            role: present(role),
            pos: present(pos),
            word: present(word),
        }
    }

    /// Parse the text shorthand
    ///
    /// - `Head:Na:中文字` -> role `Head`, pos `Na`, word `中文字`
    /// - `Head:Na` -> role `Head`, pos `Na`
    /// - `Na` -> pos `Na`
    pub fn from_text(text: &str) -> Result<Self, TreeError> {
        if !text.contains(FIELD_SEPARATOR) {
            return Ok(Self::new(None, Some(text.to_string()), None));
        }

        let fields: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
        match fields.as_slice() {
            [role, pos] => Ok(Self::new(
                Some(role.to_string()),
                Some(pos.to_string()),
                None,
            )),
            [role, pos, word] => Ok(Self::new(
                Some(role.to_string()),
                Some(pos.to_string()),
                Some(word.to_string()),
            )),
            _ => Err(TreeError::MalformedField {
                text: text.to_string(),
                fields: fields.len(),
            }),
        }
    }

    /// Join the set fields with `:`, leaving unset ones out
    pub fn to_text(&self) -> String {
        [&self.role, &self.pos, &self.word]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(":")
    }

    pub fn from_dict(value: &serde_json::Value) -> Result<Self, TreeError> {
        Ok(Self::deserialize(value)?)
    }

    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "role": self.role,
            "pos": self.pos,
            "word": self.word,
        })
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn pos(&self) -> Option<&str> {
        self.pos.as_deref()
    }

    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    pub fn with_role(&self, role: Option<String>) -> Self {
        Self::new(role, self.pos.clone(), self.word.clone())
    }

    pub fn with_pos(&self, pos: Option<String>) -> Self {
        Self::new(self.role.clone(), pos, self.word.clone())
    }

    pub fn with_word(&self, word: Option<String>) -> Self {
        Self::new(self.role.clone(), self.pos.clone(), word)
    }

    /// True if the role is set and equal to `role`
    pub fn has_role(&self, role: &str) -> bool {
        self.role() == Some(role)
    }

    /// True if the POS-tag is set and starts with `prefix`
    pub fn pos_starts_with(&self, prefix: &str) -> bool {
        self.pos().is_some_and(|pos| pos.starts_with(prefix))
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl ListFormat for NodeData {
    const ENTITY: &'static str = "NodeData";
}

/// Dict form of a single node (no children)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDict {
    pub id: NodeId,
    pub data: NodeData,
}

/// A vertex of a parsed tree
///
/// The hierarchy links are maintained by the owning [`Tree`](crate::tree::Tree).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Display label, the text the node was read from
    pub tag: String,
    pub data: NodeData,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    /// Create a detached node
    pub fn new(id: NodeId, tag: impl Into<String>, data: NodeData) -> Self {
        Self {
            id,
            tag: tag.into(),
            data,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ids of the children, in sibling order
    pub fn children_ids(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn to_dict(&self) -> NodeDict {
        NodeDict {
            id: self.id,
            data: self.data.clone(),
        }
    }

    /// Nodes are only built by a tree; there is no standalone dict form to read
    pub fn from_dict(_dict: &NodeDict) -> Result<Self, TreeError> {
        Err(TreeError::not_supported(Self::ENTITY, "from_dict"))
    }

    pub fn from_text(_text: &str) -> Result<Self, TreeError> {
        Err(TreeError::not_supported(Self::ENTITY, "from_text"))
    }

    pub fn to_text(&self) -> Result<String, TreeError> {
        Err(TreeError::not_supported(Self::ENTITY, "to_text"))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node(tag={}, id={})", self.tag, self.id)
    }
}

impl ListFormat for Node {
    const ENTITY: &'static str = "Node";
}
