//! Tree Update
//!
//! The unit of change applied to a tree by `Tree::unserialize`.

use crate::node_data::NodeData;
use crate::tree_data::TreeData;
use crate::AxNodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A batch of node snapshots applied atomically
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeUpdate {
    /// Whether `tree_data` replaces the tree's metadata
    pub has_tree_data: bool,
    pub tree_data: TreeData,
    /// Node whose descendants are discarded before the nodes are applied
    pub node_id_to_clear: Option<AxNodeId>,
    /// New or current root; `None` keeps the current root
    pub root_id: Option<AxNodeId>,
    /// Snapshots in application order
    pub nodes: Vec<NodeData>,
}

impl TreeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update that installs `nodes` under `root_id`
    pub fn with_root(root_id: AxNodeId, nodes: Vec<NodeData>) -> Self {
        Self {
            root_id: Some(root_id),
            nodes,
            ..Self::default()
        }
    }

    /// An update that cannot change anything
    pub fn is_empty(&self) -> bool {
        !self.has_tree_data
            && self.node_id_to_clear.is_none()
            && self.root_id.is_none()
            && self.nodes.is_empty()
    }

    /// Nothing but a root id: no nodes, no clear and no tree data
    pub fn is_empty_besides_root(&self) -> bool {
        !self.has_tree_data && self.node_id_to_clear.is_none() && self.nodes.is_empty()
    }
}

/// Nodes are indented two spaces for every earlier node in the same update
/// that lists them as a child.
impl fmt::Display for TreeUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_tree_data {
            writeln!(f, "AXTreeUpdate tree data:{}", self.tree_data)?;
        }
        if let Some(clear) = self.node_id_to_clear {
            writeln!(f, "AXTreeUpdate: clear node {clear}")?;
        }
        if let Some(root) = self.root_id {
            writeln!(f, "AXTreeUpdate: root id {root}")?;
        }

        let mut depth: HashMap<AxNodeId, usize> = HashMap::new();
        for node in &self.nodes {
            let indent = depth.get(&node.id).copied().unwrap_or(0);
            writeln!(f, "{:width$}{node}", "", width = indent * 2)?;
            for child in &node.child_ids {
                depth.insert(*child, indent + 1);
            }
        }
        Ok(())
    }
}
