//! Grammatical subject detection
//!
//! A node is a subject if it is:
//!
//! 1. a head of an `NP`
//! 2. a head of an `N*` child of an `S` whose role is a subject role
//! 3. a head of an `N*` child of an `S` whose role is a neutral role and which
//!    comes before the verbal (`V*`) syntactic head of that `S`
//!
//! Only the given root is examined; callers walk the tree themselves when they
//! want subjects of embedded clauses.

use crate::node::{Node, NodeId};
use crate::tree::Tree;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Role sets consulted by subject detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectRoles {
    /// Roles that make an `N*` constituent a subject wherever it stands
    pub subject: FxHashSet<String>,
    /// Roles that make an `N*` constituent a subject only before the verb
    pub neutral: FxHashSet<String>,
}

impl SubjectRoles {
    pub fn new<S: Into<String>>(
        subject: impl IntoIterator<Item = S>,
        neutral: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            subject: subject.into_iter().map(Into::into).collect(),
            neutral: neutral.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether an `N*` child with `role` at `id` qualifies, given the verb head id
    fn admits(&self, role: Option<&str>, id: NodeId, verb_id: NodeId) -> bool {
        let Some(role) = role else {
            return false;
        };
        self.subject.contains(role) || (self.neutral.contains(role) && id < verb_id)
    }
}

impl Default for SubjectRoles {
    fn default() -> Self {
        Self::new(["agent", "causer", "experiencer"], ["theme", "goal"])
    }
}

impl Tree {
    /// Subjects of the constituent at `root_id` with the default role sets
    pub fn get_subjects(
        &self,
        root_id: Option<NodeId>,
        semantic: bool,
        deep: bool,
    ) -> Box<dyn Iterator<Item = &Node> + '_> {
        self.get_subjects_with(root_id, semantic, deep, &SubjectRoles::default())
    }

    /// Subjects of the constituent at `root_id` (the tree root when `None`)
    ///
    /// `semantic` and `deep` apply to the head search inside each subject
    /// constituent. The verb of an `S` is always found syntactically and
    /// shallowly.
    pub fn get_subjects_with(
        &self,
        root_id: Option<NodeId>,
        semantic: bool,
        deep: bool,
        roles: &SubjectRoles,
    ) -> Box<dyn Iterator<Item = &Node> + '_> {
        let Some(root) = self.resolve_root(root_id).and_then(|id| self.get(id)) else {
            return Box::new(std::iter::empty());
        };

        match root.data.pos() {
            Some("NP") => Box::new(self.get_heads(Some(root.id), semantic, deep)),
            Some("S") => {
                let subroots: Vec<NodeId> = self
                    .get_heads(Some(root.id), false, false)
                    .filter(|head| head.data.pos_starts_with("V"))
                    .flat_map(|verb| {
                        self.children(root.id)
                            .filter(move |subroot| {
                                subroot.data.pos_starts_with("N")
                                    && roles.admits(subroot.data.role(), subroot.id, verb.id)
                            })
                            .map(|subroot| subroot.id)
                    })
                    .collect();

                Box::new(
                    subroots
                        .into_iter()
                        .flat_map(move |id| self.get_heads(Some(id), semantic, deep)),
                )
            }
            _ => Box::new(std::iter::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeData;

    fn ids<'a>(nodes: impl Iterator<Item = &'a Node>) -> Vec<NodeId> {
        nodes.map(|node| node.id).collect()
    }

    #[test]
    fn test_np_subject_is_its_head() {
        // 0 NP, 1 property:Nba:蔡英文, 2 Head:Na:總統
        let tree = Tree::from_text("NP(property:Nba:蔡英文|Head:Na:總統)").unwrap();
        assert_eq!(ids(tree.get_subjects(None, true, true)), vec![2]);
    }

    #[test]
    fn test_subject_role() {
        // 0 S, 1 agent:NP, 2 Head:Nhaa:我, 3 Head:VC31:吃, 4 goal:Na:飯
        let tree = Tree::from_text("S(agent:NP(Head:Nhaa:我)|Head:VC31:吃|goal:Na:飯)").unwrap();

        // agent qualifies, goal comes after the verb
        assert_eq!(ids(tree.get_subjects(None, true, true)), vec![2]);
        assert_eq!(ids(tree.get_subjects(None, true, false)), vec![2]);
    }

    #[test]
    fn test_subject_role_after_verb() {
        // 0 S, 1 Head:VH11:好, 2 experiencer:Nhaa:你
        let tree = Tree::from_text("S(Head:VH11:好|experiencer:Nhaa:你)").unwrap();
        assert_eq!(ids(tree.get_subjects(None, true, true)), vec![2]);
    }

    #[test]
    fn test_neutral_role_before_verb() {
        // 0 S, 1 theme:NP, 2 Head:Na:書, 3 Head:VJ3:有, 4 theme:Na:錢
        let tree = Tree::from_text("S(theme:NP(Head:Na:書)|Head:VJ3:有|theme:Na:錢)").unwrap();
        assert_eq!(ids(tree.get_subjects(None, true, true)), vec![2]);
    }

    #[test]
    fn test_neutral_role_ordering_by_id() {
        let build = |subroot: NodeId| {
            let data = |text: &str| NodeData::from_text(text).unwrap();
            let mut tree = Tree::new();
            tree.create_node(0, None, "S", data("S")).unwrap();
            tree.create_node(5, Some(0), "Head:VH11:好", data("Head:VH11:好")).unwrap();
            tree.create_node(subroot, Some(0), "theme:Na:x", data("theme:Na:x")).unwrap();
            tree
        };

        let tree = build(2);
        assert_eq!(ids(tree.get_subjects(None, true, true)), vec![2]);

        let tree = build(7);
        assert!(ids(tree.get_subjects(None, true, true)).is_empty());
    }

    #[test]
    fn test_requires_verbal_head() {
        // Head is not a verb
        let tree = Tree::from_text("S(agent:NP(Head:Nhaa:我)|Head:Na:學生)").unwrap();
        assert_eq!(tree.get_subjects(None, true, true).count(), 0);
    }

    #[test]
    fn test_requires_nominal_subroot() {
        // 0 S, 1 agent:VP, 2 Head:VA11:跑, 3 Head:VH11:好
        let tree = Tree::from_text("S(agent:VP(Head:VA11:跑)|Head:VH11:好)").unwrap();
        assert_eq!(tree.get_subjects(None, true, true).count(), 0);
    }

    #[test]
    fn test_other_pos_yields_nothing() {
        let tree = Tree::from_text("VP(agent:Na:我|Head:VC31:吃)").unwrap();
        assert_eq!(tree.get_subjects(None, true, true).count(), 0);
        assert_eq!(Tree::new().get_subjects(None, true, true).count(), 0);
    }

    #[test]
    fn test_no_recursion_into_embedded_clause() {
        // 0 S, 1 agent:NP, 2 Head:Nhaa:我, 3 Head:VE2:覺得, 4 goal:S, 5 theme:NP,
        // 6 property:Nba:蔡英文, 7 Head:Na:總統, 8 Head:VH11:好
        let tree = Tree::from_text(
            "S(agent:NP(Head:Nhaa:我)|Head:VE2:覺得|goal:S(theme:NP(property:Nba:蔡英文|Head:Na:總統)|Head:VH11:好))",
        )
        .unwrap();

        assert_eq!(ids(tree.get_subjects(None, true, true)), vec![2]);
        assert_eq!(ids(tree.get_subjects(Some(4), true, true)), vec![7]);
        assert_eq!(ids(tree.get_subjects(Some(4), true, false)), vec![7]);
    }

    #[test]
    fn test_semantic_heads_of_subject() {
        // 0 S, 1 agent:NP, 2 DUMMY1:Nb:張三, 3 Head:Caa:和, 4 DUMMY2:Nb:李四, 5 Head:VA11:跑
        let tree = Tree::from_text("S(agent:NP(DUMMY1:Nb:張三|Head:Caa:和|DUMMY2:Nb:李四)|Head:VA11:跑)").unwrap();
        assert_eq!(ids(tree.get_subjects(None, true, true)), vec![2, 4]);
        assert_eq!(ids(tree.get_subjects(None, false, true)), vec![3]);
    }

    #[test]
    fn test_custom_roles() {
        let tree = Tree::from_text("S(topic:Na:這|Head:VH11:好)").unwrap();
        assert_eq!(tree.get_subjects(None, true, true).count(), 0);

        let roles = SubjectRoles::new(Vec::<String>::new(), vec!["topic".to_string()]);
        assert_eq!(ids(tree.get_subjects_with(None, true, true, &roles)), vec![1]);
    }

    #[test]
    fn test_roles_from_json() {
        let roles: SubjectRoles = serde_json::from_str(r#"{"subject": ["agent"]}"#).unwrap();
        assert!(roles.subject.contains("agent"));
        assert!(roles.neutral.contains("theme"));
    }
}
