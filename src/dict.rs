//! Nested dict format
//!
//! Shape: `{id, data: {role, pos, word}, children: [...]}`, recursively. The
//! loader inserts nodes breadth-first, so ids in the dict are authoritative,
//! not insertion order. The writer mirrors the structure depth-first.
//!
//! Nesting depth is unbounded: the JSON helpers lift `serde_json`'s recursion
//! limit and run through `serde_stacker`, and building or dropping a
//! [`TreeDict`] never recurses.

use crate::error::TreeError;
use crate::node::{NodeData, NodeId};
use crate::tree::Tree;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Dict form of a tree or subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDict {
    pub id: NodeId,
    pub data: NodeData,
    #[serde(default)]
    pub children: Vec<TreeDict>,
}

// Flatten before dropping so deep dicts do not exhaust the stack
impl Drop for TreeDict {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut dict) = pending.pop() {
            pending.append(&mut dict.children);
        }
    }
}

impl Tree {
    /// Build a tree from its dict form
    ///
    /// Node tags are the text form of each node's data.
    pub fn from_dict(dict: &TreeDict) -> Result<Self, TreeError> {
        let mut tree = Tree::new();
        let mut queue: VecDeque<(&TreeDict, Option<NodeId>)> = VecDeque::new();
        queue.push_back((dict, None));

        while let Some((node_dict, parent)) = queue.pop_front() {
            let tag = node_dict.data.to_text();
            tracing::trace!(id = node_dict.id, ?parent, %tag, "create node");
            tree.create_node(node_dict.id, parent, tag, node_dict.data.clone())?;

            for child in &node_dict.children {
                queue.push_back((child, Some(node_dict.id)));
            }
        }

        tracing::debug!(nodes = tree.len(), "loaded tree dict");
        Ok(tree)
    }

    /// Dict form of the whole tree
    pub fn to_dict(&self) -> Result<TreeDict, TreeError> {
        let root = self.root_id().ok_or(TreeError::EmptyTree)?;
        self.to_dict_at(root)
    }

    /// Dict form of the subtree under `id`
    ///
    /// Built bottom-up: nodes are visited in reverse pre-order, so every child
    /// dict is finished before its parent collects it.
    pub fn to_dict_at(&self, id: NodeId) -> Result<TreeDict, TreeError> {
        if !self.contains(id) {
            return Err(TreeError::MissingNode(id));
        }

        let order: Vec<_> = self.preorder(id).collect();
        let mut built: FxHashMap<NodeId, TreeDict> = FxHashMap::default();
        for node in order.into_iter().rev() {
            let children = node
                .children_ids()
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(
                node.id,
                TreeDict {
                    id: node.id,
                    data: node.data.clone(),
                    children,
                },
            );
        }

        built.remove(&id).ok_or(TreeError::MissingNode(id))
    }

    /// Build a tree from any JSON-equivalent value of the dict shape
    pub fn from_value(value: serde_json::Value) -> Result<Self, TreeError> {
        let dict = TreeDict::deserialize(serde_stacker::Deserializer::new(value))?;
        Self::from_dict(&dict)
    }

    pub fn to_value(&self) -> Result<serde_json::Value, TreeError> {
        let dict = self.to_dict()?;
        Ok(dict.serialize(serde_stacker::Serializer::new(serde_json::value::Serializer))?)
    }

    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let dict = TreeDict::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Self::from_dict(&dict)
    }

    pub fn to_json(&self) -> Result<String, TreeError> {
        write_json(&self.to_dict()?, false)
    }

    /// JSON of the subtree under `id`
    pub fn to_json_at(&self, id: NodeId) -> Result<String, TreeError> {
        write_json(&self.to_dict_at(id)?, false)
    }

    pub fn to_json_pretty(&self) -> Result<String, TreeError> {
        write_json(&self.to_dict()?, true)
    }
}

fn write_json(dict: &TreeDict, pretty: bool) -> Result<String, TreeError> {
    let mut out = Vec::new();
    if pretty {
        let mut ser = serde_json::Serializer::pretty(&mut out);
        dict.serialize(serde_stacker::Serializer::new(&mut ser))?;
    } else {
        let mut ser = serde_json::Serializer::new(&mut out);
        dict.serialize(serde_stacker::Serializer::new(&mut ser))?;
    }
    json_string(out)
}

fn json_string(bytes: Vec<u8>) -> Result<String, TreeError> {
    String::from_utf8(bytes)
        .map_err(|e| TreeError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn simple_dict() -> serde_json::Value {
        json!({
            "id": 0,
            "data": {"role": null, "pos": "S", "word": null},
            "children": [
                {
                    "id": 1,
                    "data": {"role": "Head", "pos": "Nab", "word": "中文字"},
                    "children": [],
                },
                {
                    "id": 2,
                    "data": {"role": "particle", "pos": "Td", "word": "耶"},
                    "children": [],
                },
            ],
        })
    }

    #[test]
    fn test_to_dict_from_text() {
        let tree = Tree::from_text("S(Head:Nab:中文字|particle:Td:耶)").unwrap();
        assert_eq!(tree.to_value().unwrap(), simple_dict());
    }

    #[test]
    fn test_dict_round_trip() {
        let tree = Tree::from_value(simple_dict()).unwrap();
        assert_eq!(tree.to_value().unwrap(), simple_dict());
        assert_eq!(tree.to_text(), "S(Head:Nab:中文字|particle:Td:耶)");
    }

    #[test]
    fn test_breadth_first_insertion_keeps_ids() {
        // Depth-first ids; the loader inserts 0, 1, 3, 2
        let value = json!({
            "id": 0,
            "data": {"role": null, "pos": "S", "word": null},
            "children": [
                {
                    "id": 1,
                    "data": {"role": "agent", "pos": "NP", "word": null},
                    "children": [
                        {"id": 2, "data": {"role": "Head", "pos": "Nhaa", "word": "我"}, "children": []},
                    ],
                },
                {"id": 3, "data": {"role": "Head", "pos": "VH11", "word": "好"}, "children": []},
            ],
        });

        let from_dict = Tree::from_value(value.clone()).unwrap();
        let order: Vec<_> = from_dict.nodes().map(|n| n.id).collect();
        assert_eq!(order, vec![0, 1, 3, 2]);

        let from_text = Tree::from_text("S(agent:NP(Head:Nhaa:我)|Head:VH11:好)").unwrap();
        let order: Vec<_> = from_text.nodes().map(|n| n.id).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);

        // Same externally visible tree either way
        assert_eq!(from_dict.to_value().unwrap(), value);
        assert_eq!(from_text.to_value().unwrap(), value);
        assert_eq!(from_dict.to_text(), from_text.to_text());
        for id in 0..4 {
            assert_eq!(from_dict[id].tag, from_text[id].tag);
        }
    }

    #[test]
    fn test_sparse_ids_preserved() {
        let value = json!({
            "id": 10,
            "data": {"role": null, "pos": "NP", "word": null},
            "children": [
                {"id": 30, "data": {"role": "Head", "pos": "Na", "word": "x"}, "children": []},
                {"id": 20, "data": {"role": "DUMMY", "pos": "Na", "word": "y"}, "children": []},
            ],
        });
        let tree = Tree::from_value(value.clone()).unwrap();
        assert_eq!(tree.root_id(), Some(10));
        assert_eq!(tree[20].tag, "DUMMY:Na:y");
        assert_eq!(tree.to_value().unwrap(), value);
    }

    #[test]
    fn test_json_helpers() {
        let json = serde_json::to_string(&simple_dict()).unwrap();
        let tree = Tree::from_json(&json).unwrap();
        let back: serde_json::Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();
        assert_eq!(back, simple_dict());
        assert!(tree.to_json_pretty().unwrap().contains('\n'));
    }

    #[test]
    fn test_missing_children_key() {
        let tree = Tree::from_value(json!({"id": 0, "data": {"pos": "Na"}})).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(
            tree.to_value().unwrap(),
            json!({"id": 0, "data": {"role": null, "pos": "Na", "word": null}, "children": []})
        );
    }

    #[test]
    fn test_duplicate_ids() {
        let value = json!({
            "id": 0,
            "data": {"pos": "S"},
            "children": [
                {"id": 1, "data": {"pos": "Na"}},
                {"id": 1, "data": {"pos": "Nb"}},
            ],
        });
        assert!(matches!(
            Tree::from_value(value),
            Err(TreeError::DuplicateNode(1))
        ));
    }

    #[test]
    fn test_bad_shape() {
        assert!(matches!(
            Tree::from_value(json!({"data": {"pos": "S"}})),
            Err(TreeError::Json(_))
        ));
        assert!(matches!(Tree::from_json("not json"), Err(TreeError::Json(_))));

        let trailing = format!("{} x", serde_json::to_string(&simple_dict()).unwrap());
        assert!(matches!(Tree::from_json(&trailing), Err(TreeError::Json(_))));
    }

    fn nested(depth: usize) -> String {
        format!("{}Head:Na:x{}", "NP(".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn test_deep_json_round_trip() {
        let text = nested(300);
        let tree = Tree::from_text(&text).unwrap();

        let back = Tree::from_json(&tree.to_json().unwrap()).unwrap();
        assert_eq!(back.len(), 301);
        assert_eq!(back.to_text(), text);

        let back = Tree::from_value(tree.to_value().unwrap()).unwrap();
        assert_eq!(back.to_text(), text);

        let back = Tree::from_json(&tree.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back.len(), 301);
    }

    #[test]
    fn test_deep_dict_round_trip() {
        let text = nested(20_000);
        let tree = Tree::from_text(&text).unwrap();

        let dict = tree.to_dict().unwrap();
        assert_eq!(dict.id, 0);
        assert_eq!(dict.children.len(), 1);

        let back = Tree::from_dict(&dict).unwrap();
        assert_eq!(back.len(), 20_001);
        assert_eq!(back.to_text(), text);
    }

    #[test]
    fn test_subtree_json() {
        let tree = Tree::from_text("S(agent:NP(Head:Nhaa:我)|Head:VH11:好)").unwrap();
        let value: serde_json::Value = serde_json::from_str(&tree.to_json_at(1).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "data": {"role": "agent", "pos": "NP", "word": null},
                "children": [
                    {"id": 2, "data": {"role": "Head", "pos": "Nhaa", "word": "我"}, "children": []},
                ],
            })
        );
        assert!(matches!(tree.to_json_at(9), Err(TreeError::MissingNode(9))));
    }

    #[test]
    fn test_empty_tree() {
        let tree = Tree::new();
        assert!(matches!(tree.to_dict(), Err(TreeError::EmptyTree)));
        assert!(matches!(tree.to_dict_at(3), Err(TreeError::MissingNode(3))));
    }
}
