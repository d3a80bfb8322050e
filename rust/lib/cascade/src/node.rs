//! Hierarchy input shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::NodeId;

/// One selectable entity at one tier (a city, a property, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default, alias = "name")]
    pub label: String,
    /// `None` only at the root tier.
    #[serde(default, alias = "parentId", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            parent_id: None,
        }
    }
}

/// Nested tree as served to the drawers.
///
/// Children may arrive under `children` or under the tier-specific keys
/// the list endpoints use (`properties`, `units`, `tenants`, `vendors`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    #[serde(default, alias = "name")]
    pub label: String,
    #[serde(
        default,
        alias = "properties",
        alias = "units",
        alias = "tenants",
        alias = "vendors",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a leaf node (no children).
    pub fn leaf(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: vec![],
        }
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }
}

/// Parallel per-parent maps: the roots, then one `parent id → children`
/// map per tier boundary. `children[0]` maps root ids to tier-1 nodes,
/// `children[1]` maps tier-1 ids to tier-2 nodes, and so on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParentMaps {
    pub roots: Vec<Node>,
    #[serde(default)]
    pub children: Vec<BTreeMap<NodeId, Vec<Node>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_accepts_tier_keys() {
        let json = r#"[{"id": 1, "name": "Austin", "properties": [
            {"id": 10, "name": "Elm Court", "units": [
                {"id": 100, "name": "1A", "tenants": [{"id": 1000, "name": "Alice"}]}
            ]}
        ]}]"#;
        let roots: Vec<TreeNode> = serde_json::from_str(json).unwrap();
        assert_eq!(roots[0].label, "Austin");
        let tenant = &roots[0].children[0].children[0].children[0];
        assert_eq!(tenant.id, NodeId::Num(1000));
        assert_eq!(tenant.label, "Alice");
    }

    #[test]
    fn node_accepts_camel_parent() {
        let n: Node = serde_json::from_str(r#"{"id": "10", "label": "Elm", "parentId": 1}"#).unwrap();
        assert_eq!(n.id, NodeId::Num(10));
        assert_eq!(n.parent_id, Some(NodeId::Num(1)));
    }
}
