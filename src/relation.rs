//! Head-dependent relations
//!
//! At every constituent, each (deep) head is paired with each sibling that is
//! neither a shallow head nor marked `Head`. A non-leaf dependent contributes
//! its own heads as tails, while the dependent constituent itself stays the
//! relation node: its role names the relation.

use crate::error::TreeError;
use crate::format::ListFormat;
use crate::heads::SYNTACTIC_HEAD_ROLE;
use crate::node::{Node, NodeDict, NodeId};
use crate::tree::Tree;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One head-dependent link found in a tree
///
/// The parent of `relation` is the common ancestor of `head` and `tail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation<'a> {
    pub head: &'a Node,
    pub tail: &'a Node,
    /// The dependent constituent; its role is the relation label
    pub relation: &'a Node,
}

/// Dict form of a relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDict {
    pub head: NodeDict,
    pub tail: NodeDict,
    pub relation: Option<String>,
}

impl<'a> Relation<'a> {
    pub fn new(head: &'a Node, tail: &'a Node, relation: &'a Node) -> Self {
        Self {
            head,
            tail,
            relation,
        }
    }

    /// True if the head comes before the tail in reading order
    pub fn head_first(&self) -> bool {
        self.head.id <= self.tail.id
    }

    /// The relation label, i.e. the role of the relation node
    pub fn label(&self) -> Option<&'a str> {
        self.relation.data.role()
    }

    pub fn to_dict(&self) -> RelationDict {
        RelationDict {
            head: self.head.to_dict(),
            tail: self.tail.to_dict(),
            relation: self.label().map(str::to_string),
        }
    }

    pub fn from_dict(_dict: &RelationDict) -> Result<Self, TreeError> {
        Err(TreeError::not_supported(Self::ENTITY, "from_dict"))
    }

    pub fn from_text(_text: &str) -> Result<Self, TreeError> {
        Err(TreeError::not_supported(Self::ENTITY, "from_text"))
    }

    pub fn to_text(&self) -> Result<String, TreeError> {
        Err(TreeError::not_supported(Self::ENTITY, "to_text"))
    }
}

impl fmt::Display for Relation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = format!("head=({}, {})", self.head.tag, self.head.id);
        let tail = format!("tail=({}, {})", self.tail.tag, self.tail.id);
        let (first, second) = if self.head_first() {
            (head, tail)
        } else {
            (tail, head)
        };
        write!(
            f,
            "Relation({}, {}, relation=({}, {}))",
            first,
            second,
            self.label().unwrap_or_default(),
            self.relation.id
        )
    }
}

impl ListFormat for Relation<'_> {
    const ENTITY: &'static str = "Relation";
}

impl Tree {
    /// All relations in the subtree under `root_id` (the tree root when `None`)
    ///
    /// Constituents are visited depth-first, left to right; within one
    /// constituent relations come heads-major, dependents in sibling order.
    pub fn get_relations(
        &self,
        root_id: Option<NodeId>,
        semantic: bool,
    ) -> impl Iterator<Item = Relation<'_>> + '_ {
        self.resolve_root(root_id)
            .into_iter()
            .flat_map(move |root| self.preorder(root))
            .flat_map(move |node| self.level_relations(node.id, semantic))
    }

    /// Relations whose relation node is a child of `id`
    fn level_relations(&self, id: NodeId, semantic: bool) -> Vec<Relation<'_>> {
        let shallow: Vec<NodeId> = self
            .get_heads(Some(id), semantic, false)
            .map(|node| node.id)
            .collect();
        let tails: Vec<&Node> = self
            .children(id)
            .filter(|child| !child.data.has_role(SYNTACTIC_HEAD_ROLE))
            .filter(|child| !shallow.contains(&child.id))
            .collect();

        let mut relations = Vec::new();
        if tails.is_empty() {
            return relations;
        }

        for head in self.get_heads(Some(id), semantic, true) {
            for &tail in &tails {
                if tail.is_leaf() {
                    relations.push(Relation::new(head, tail, tail));
                } else {
                    for node in self.get_heads(Some(tail.id), semantic, true) {
                        relations.push(Relation::new(head, node, tail));
                    }
                }
            }
        }
        relations
    }
}
