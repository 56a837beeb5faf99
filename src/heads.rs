//! Head word selection
//!
//! The head of a constituent is picked among its immediate children by role,
//! first match wins:
//!
//! 1. a node without children is its own head
//! 2. semantic mode: children with role `DUMMY`, `DUMMY1` or `DUMMY2`
//! 3. semantic mode: children with role `head`
//! 4. children with the syntactic role `Head`
//! 5. otherwise the last child
//!
//! Deep search replaces every non-leaf head by the heads of its own subtree.

use crate::node::{Node, NodeData, NodeId};
use crate::tree::Tree;

/// Roles marking the heads of coordinations in semantic mode
pub const DUMMY_ROLES: [&str; 3] = ["DUMMY", "DUMMY1", "DUMMY2"];

/// Semantic head role
pub const SEMANTIC_HEAD_ROLE: &str = "head";

/// Syntactic head role
pub const SYNTACTIC_HEAD_ROLE: &str = "Head";

fn matching<'a>(children: &[&'a Node], pred: impl Fn(&NodeData) -> bool) -> Vec<&'a Node> {
    children
        .iter()
        .copied()
        .filter(|child| pred(&child.data))
        .collect()
}

impl Tree {
    /// Immediate children of `node_id` with the given role, in sibling order
    ///
    /// `None` selects the children whose role is unset.
    pub fn get_children<'a>(
        &'a self,
        node_id: NodeId,
        role: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.children(node_id)
            .filter(move |child| child.data.role() == role)
    }

    /// One level of head selection under `id`
    ///
    /// Returns the node itself for leaves; never empty for a known id.
    pub(crate) fn select_heads(&self, id: NodeId, semantic: bool) -> Vec<&Node> {
        let children: Vec<&Node> = self.children(id).collect();
        let Some(&last) = children.last() else {
            return self.get(id).into_iter().collect();
        };

        if semantic {
            let heads = matching(&children, |data| {
                data.role().is_some_and(|role| DUMMY_ROLES.contains(&role))
            });
            if !heads.is_empty() {
                return heads;
            }

            let heads = matching(&children, |data| data.has_role(SEMANTIC_HEAD_ROLE));
            if !heads.is_empty() {
                return heads;
            }
        }

        let heads = matching(&children, |data| data.has_role(SYNTACTIC_HEAD_ROLE));
        if !heads.is_empty() {
            return heads;
        }

        // No head marked, fall back on the last child
        vec![last]
    }

    /// Head nodes of the subtree under `root_id` (the tree root when `None`)
    ///
    /// `semantic` prefers `DUMMY*` and `head` over `Head`; `deep` follows
    /// each head down to a leaf. Heads come depth-first, left to right.
    pub fn get_heads(&self, root_id: Option<NodeId>, semantic: bool, deep: bool) -> Heads<'_> {
        let stack = match self.resolve_root(root_id) {
            Some(id) => {
                let mut heads = self.select_heads(id, semantic);
                heads.reverse();
                heads
            }
            None => Vec::new(),
        };

        Heads {
            tree: self,
            stack,
            semantic,
            deep,
        }
    }
}

/// Lazy iterator over head nodes, see [`Tree::get_heads`]
#[derive(Debug, Clone)]
pub struct Heads<'a> {
    tree: &'a Tree,
    /// Pending candidates, next on top
    stack: Vec<&'a Node>,
    semantic: bool,
    deep: bool,
}

impl<'a> Iterator for Heads<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if self.deep && !node.is_leaf() {
                let heads = self.tree.select_heads(node.id, self.semantic);
                self.stack.extend(heads.into_iter().rev());
            } else {
                return Some(node);
            }
        }
        None
    }
}
