//! Read-only hierarchy lookup.
//!
//! Built once when a drawer opens. Every lookup that misses returns an
//! empty result instead of an error, so a missing or malformed tree
//! renders as empty dropdowns rather than a broken drawer.

use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::id::NodeId;
use crate::level::Level;
use crate::node::{Node, ParentMaps, TreeNode};

/// Root-to-node ids keyed by tier. Iterates in tier order.
pub type Chain<L> = BTreeMap<L, NodeId>;

#[derive(Debug, Default)]
struct TierTable {
    /// Nodes at this tier, in input order.
    nodes: Vec<Node>,
    /// Position of the first node with a given id.
    by_id: HashMap<NodeId, usize>,
    /// Children (one tier deeper) of each node at this tier.
    children: HashMap<NodeId, Vec<Node>>,
}

impl TierTable {
    fn insert(&mut self, node: Node) {
        let pos = self.nodes.len();
        self.by_id.entry(node.id.clone()).or_insert(pos);
        self.nodes.push(node);
    }
}

/// Lookup structure over a `L`-tiered hierarchy.
#[derive(Debug)]
pub struct HierarchyIndex<L: Level> {
    tiers: Vec<TierTable>,
    _tier: PhantomData<L>,
}

impl<L: Level> Default for HierarchyIndex<L> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<L: Level> HierarchyIndex<L> {
    /// An index with no nodes.
    pub fn empty() -> Self {
        Self {
            tiers: L::ALL.iter().map(|_| TierTable::default()).collect(),
            _tier: PhantomData,
        }
    }

    /// Build from a nested tree. Nesting deeper than the last tier is ignored.
    pub fn from_tree(roots: &[TreeNode]) -> Self {
        let mut index = Self::empty();
        let mut dropped = 0usize;
        for root in roots {
            index.insert_subtree(0, None, root, &mut dropped);
        }
        if dropped > 0 {
            debug!(dropped, "hierarchy: ignored nodes below the last tier");
        }
        index
    }

    fn insert_subtree(
        &mut self,
        depth: usize,
        parent: Option<&NodeId>,
        tree: &TreeNode,
        dropped: &mut usize,
    ) {
        if depth >= self.tiers.len() {
            *dropped += 1;
            return;
        }
        let node = Node {
            id: tree.id.clone(),
            label: tree.label.clone(),
            parent_id: parent.cloned(),
        };
        if let Some(parent_id) = parent {
            self.tiers[depth - 1]
                .children
                .entry(parent_id.clone())
                .or_default()
                .push(node.clone());
        }
        self.tiers[depth].insert(node);
        for child in &tree.children {
            self.insert_subtree(depth + 1, Some(&tree.id), child, dropped);
        }
    }

    /// Build from per-parent maps. Children whose parent does not exist
    /// in the previous tier are dropped as orphans.
    pub fn from_maps(maps: &ParentMaps) -> Self {
        let mut index = Self::empty();
        for root in &maps.roots {
            let mut root = root.clone();
            root.parent_id = None;
            index.tiers[0].insert(root);
        }
        for (boundary, map) in maps.children.iter().enumerate() {
            let depth = boundary + 1;
            if depth >= index.tiers.len() {
                debug!(depth, "hierarchy: ignored per-parent map below the last tier");
                break;
            }
            for (parent_id, kids) in map {
                if !index.tiers[depth - 1].by_id.contains_key(parent_id) {
                    warn!(
                        tier = L::from_index(depth).map(|l| l.key()).unwrap_or("?"),
                        parent = %parent_id,
                        count = kids.len(),
                        "hierarchy: dropping orphaned nodes"
                    );
                    continue;
                }
                for kid in kids {
                    let mut node = kid.clone();
                    node.parent_id = Some(parent_id.clone());
                    index.tiers[depth - 1]
                        .children
                        .entry(parent_id.clone())
                        .or_default()
                        .push(node.clone());
                    index.tiers[depth].insert(node);
                }
            }
        }
        index
    }

    /// Build from a JSON body holding either a nested tree (array) or
    /// per-parent maps (object with `roots`). Anything else yields an
    /// empty index.
    pub fn from_json(body: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                warn!(error = %e, "hierarchy: unreadable hierarchy payload, using empty index");
                Self::empty()
            }
        }
    }

    /// [`from_json`](Self::from_json) for an already parsed body.
    pub fn from_value(value: serde_json::Value) -> Self {
        let parsed = if value.is_array() {
            serde_json::from_value::<Vec<TreeNode>>(value).map(|roots| Self::from_tree(&roots))
        } else {
            serde_json::from_value::<ParentMaps>(value).map(|maps| Self::from_maps(&maps))
        };
        parsed.unwrap_or_else(|e| {
            warn!(error = %e, "hierarchy: unexpected hierarchy shape, using empty index");
            Self::empty()
        })
    }

    /// Nodes at the root tier.
    pub fn roots(&self) -> &[Node] {
        &self.tiers[0].nodes
    }

    /// All nodes at a tier.
    pub fn nodes(&self, level: L) -> &[Node] {
        &self.tiers[level.index()].nodes
    }

    /// Look up a node by tier and id.
    pub fn node(&self, level: L, id: &NodeId) -> Option<&Node> {
        let table = &self.tiers[level.index()];
        table.by_id.get(id).map(|&pos| &table.nodes[pos])
    }

    /// Children of `parent_id`, where `level` is the parent's tier.
    ///
    /// Unknown parents and parents at the last tier yield an empty slice.
    pub fn children_of(&self, level: L, parent_id: &NodeId) -> &[Node] {
        self.tiers[level.index()]
            .children
            .get(parent_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of nodes across all tiers.
    pub fn len(&self) -> usize {
        self.tiers.iter().map(|t| t.nodes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Root-to-node chain for the tier-`level` node with id `leaf_id`.
    ///
    /// Depth-first from every root in tree order; the first match wins.
    /// A miss yields an empty chain.
    pub fn find_ancestor_chain(&self, level: L, leaf_id: &NodeId) -> Chain<L> {
        self.find_chain(level, |n| &n.id == leaf_id)
    }

    /// Like [`find_ancestor_chain`](Self::find_ancestor_chain), matching on
    /// the node label (trimmed, case-insensitive). Edit payloads that only
    /// carry a tenant or vendor name resolve through this.
    pub fn find_ancestor_chain_by_label(&self, level: L, label: &str) -> Chain<L> {
        let wanted = label.trim();
        if wanted.is_empty() {
            return Chain::new();
        }
        self.find_chain(level, |n| n.label.trim().eq_ignore_ascii_case(wanted))
    }

    fn find_chain(&self, level: L, is_target: impl Fn(&Node) -> bool) -> Chain<L> {
        let target_depth = level.index();
        let mut path = Vec::with_capacity(target_depth + 1);
        for root in self.roots() {
            if self.dfs(0, root, target_depth, &is_target, &mut path) {
                return path
                    .into_iter()
                    .enumerate()
                    .filter_map(|(depth, id)| L::from_index(depth).map(|l| (l, id)))
                    .collect();
            }
        }
        Chain::new()
    }

    fn dfs(
        &self,
        depth: usize,
        node: &Node,
        target_depth: usize,
        is_target: &impl Fn(&Node) -> bool,
        path: &mut Vec<NodeId>,
    ) -> bool {
        path.push(node.id.clone());
        if depth == target_depth {
            if is_target(node) {
                return true;
            }
        } else if let Some(level) = L::from_index(depth) {
            for child in self.children_of(level, &node.id) {
                if self.dfs(depth + 1, child, target_depth, is_target, path) {
                    return true;
                }
            }
        }
        path.pop();
        false
    }
}
