//! Parsed tree container
//!
//! Nodes live in an arena in insertion order and are looked up by id through
//! an index, so ids are caller-assigned and need not be contiguous. Each node
//! keeps its parent id and its children ids in sibling order.

use crate::error::TreeError;
use crate::format::ListFormat;
use crate::node::{Node, NodeData, NodeId};
use rustc_hash::FxHashMap;
use std::fmt;
use std::ops::Index;

/// A single-rooted, ordered constituency tree
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    index: FxHashMap<NodeId, usize>,
    root_id: Option<NodeId>,
}

impl Tree {
    /// An empty tree; add nodes with [`Tree::create_node`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under `parent`, or as the root when `parent` is `None`
    ///
    /// Children keep the order in which they were created.
    pub fn create_node(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
        tag: impl Into<String>,
        data: NodeData,
    ) -> Result<&Node, TreeError> {
        if self.index.contains_key(&id) {
            return Err(TreeError::DuplicateNode(id));
        }

        match parent {
            None => {
                if let Some(root) = self.root_id {
                    return Err(TreeError::MultipleRoots { id, root });
                }
                self.root_id = Some(id);
            }
            Some(parent_id) => {
                let Some(&slot) = self.index.get(&parent_id) else {
                    return Err(TreeError::UnknownParent {
                        id,
                        parent: parent_id,
                    });
                };
                self.nodes[slot].children.push(id);
            }
        }

        let mut node = Node::new(id, tag, data);
        node.parent = parent;

        let slot = self.nodes.len();
        self.nodes.push(node);
        self.index.insert(id, slot);
        Ok(&self.nodes[slot])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    pub fn root(&self) -> Option<&Node> {
        self.root_id.and_then(|id| self.get(id))
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Children of a node in sibling order; empty for unknown ids
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |&child| self.get(child))
    }

    /// Parent of a node; `None` for the root and unknown ids
    pub fn parent(&self, id: NodeId) -> Option<&Node> {
        self.get(id)
            .and_then(|node| node.parent)
            .and_then(|parent_id| self.get(parent_id))
    }

    /// Ancestors of a node, nearest first, ending with the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        std::iter::successors(self.parent(id), move |node| self.parent(node.id))
    }

    /// True for leaves; unknown ids count as leaves
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.get(id).is_none_or(Node::is_leaf)
    }

    /// Depth-first, left-to-right walk of the subtree under `id`
    pub fn preorder(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        let mut stack: Vec<NodeId> = vec![id];
        std::iter::from_fn(move || {
            loop {
                let next = stack.pop()?;
                if let Some(node) = self.get(next) {
                    stack.extend(node.children.iter().rev());
                    return Some(node);
                }
            }
        })
    }

    /// Resolve an optional subtree root to an id, defaulting to the tree root
    pub(crate) fn resolve_root(&self, root_id: Option<NodeId>) -> Option<NodeId> {
        root_id.or(self.root_id)
    }

    /// Render the tree with box-drawing characters
    ///
    /// Siblings are ordered by id. With `idhidden` false each line reads
    /// `tag[id]`.
    pub fn show(&self, idhidden: bool) -> String {
        let mut out = String::new();
        let Some(root) = self.root() else {
            return out;
        };

        // (node, prefix of its line, whether it is the last sibling)
        let mut stack: Vec<(&Node, String, Option<bool>)> = vec![(root, String::new(), None)];
        while let Some((node, prefix, last)) = stack.pop() {
            out.push_str(&prefix);
            let child_prefix = match last {
                None => prefix,
                Some(true) => {
                    out.push_str("└── ");
                    prefix + "    "
                }
                Some(false) => {
                    out.push_str("├── ");
                    prefix + "│   "
                }
            };

            out.push_str(&node.tag);
            if !idhidden {
                out.push_str(&format!("[{}]", node.id));
            }
            out.push('\n');

            let mut children: Vec<&Node> = self.children(node.id).collect();
            children.sort_by_key(|child| child.id);
            let count = children.len();
            for (i, child) in children.into_iter().enumerate().rev() {
                stack.push((child, child_prefix.clone(), Some(i + 1 == count)));
            }
        }
        out
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    /// Panics if the tree has no node with this id
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[self.index[&id]]
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl ListFormat for Tree {
    const ENTITY: &'static str = "Tree";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(text: &str) -> NodeData {
        NodeData::from_text(text).unwrap()
    }

    /// 0: S
    ///   ├─ 1: theme:NP
    ///   │    └─ 3: Head:Na:x
    ///   └─ 2: Head:VC:y
    fn create_test_tree() -> Tree {
        let mut tree = Tree::new();
        tree.create_node(0, None, "S", data("S")).unwrap();
        tree.create_node(1, Some(0), "theme:NP", data("theme:NP")).unwrap();
        tree.create_node(2, Some(0), "Head:VC:y", data("Head:VC:y")).unwrap();
        tree.create_node(3, Some(1), "Head:Na:x", data("Head:Na:x")).unwrap();
        tree
    }

    #[test]
    fn test_tree_creation() {
        let tree = create_test_tree();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root_id(), Some(0));
        assert_eq!(tree.parent(3).unwrap().id, 1);
        assert!(tree.parent(0).is_none());
        assert_eq!(tree.children(0).map(|n| n.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(tree[2].tag, "Head:VC:y");
        assert!(tree.is_leaf(2));
        assert!(!tree.is_leaf(1));
    }

    #[test]
    fn test_sparse_ids() {
        let mut tree = Tree::new();
        tree.create_node(10, None, "S", data("S")).unwrap();
        tree.create_node(42, Some(10), "Na", data("Na")).unwrap();
        tree.create_node(7, Some(10), "VC", data("VC")).unwrap();

        assert_eq!(tree.children(10).map(|n| n.id).collect::<Vec<_>>(), vec![42, 7]);
        assert!(tree.contains(7));
        assert!(!tree.contains(0));
    }

    #[test]
    fn test_create_node_errors() {
        let mut tree = create_test_tree();

        assert!(matches!(
            tree.create_node(2, Some(0), "x", data("x")),
            Err(TreeError::DuplicateNode(2))
        ));
        assert!(matches!(
            tree.create_node(9, Some(8), "x", data("x")),
            Err(TreeError::UnknownParent { id: 9, parent: 8 })
        ));
        assert!(matches!(
            tree.create_node(9, None, "x", data("x")),
            Err(TreeError::MultipleRoots { id: 9, root: 0 })
        ));
    }

    #[test]
    fn test_ancestors() {
        let tree = create_test_tree();
        let ids: Vec<_> = tree.ancestors(3).map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 0]);
        assert_eq!(tree.ancestors(0).count(), 0);
    }

    #[test]
    fn test_preorder() {
        let tree = create_test_tree();
        let ids: Vec<_> = tree.preorder(0).map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 1, 3, 2]);
        assert_eq!(tree.preorder(99).count(), 0);
    }

    #[test]
    fn test_unknown_ids() {
        let tree = create_test_tree();
        assert!(tree.get(99).is_none());
        assert_eq!(tree.children(99).count(), 0);
        assert!(tree.is_leaf(99));
    }

    #[test]
    fn test_show() {
        let tree = create_test_tree();
        assert_eq!(
            tree.show(true),
            "S\n├── theme:NP\n│   └── Head:Na:x\n└── Head:VC:y\n"
        );
        assert_eq!(
            tree.show(false),
            "S[0]\n├── theme:NP[1]\n│   └── Head:Na:x[3]\n└── Head:VC:y[2]\n"
        );
        assert_eq!(Tree::new().show(true), "");
    }

    #[test]
    fn test_show_deep_tree() {
        let depth = 3_000;
        let text = format!("{}Head:Na:x{}", "NP(".repeat(depth), ")".repeat(depth));
        let tree = Tree::from_text(&text).unwrap();

        let shown = tree.show(true);
        let lines: Vec<&str> = shown.lines().collect();
        assert_eq!(lines.len(), depth + 1);
        assert_eq!(lines[0], "NP");
        assert_eq!(lines[1], "└── NP");
        assert_eq!(lines[2], "    └── NP");
        assert!(lines[depth].ends_with("└── Head:Na:x"));
    }
}
