//! Tree Serializer
//!
//! Produces updates that rebuild an existing tree, either whole or one
//! subtree at a time.

use crate::node::NodeRef;
use crate::tree::Tree;
use crate::update::TreeUpdate;
use crate::AxNodeId;

/// Builds [`TreeUpdate`]s from a live tree
pub struct TreeSerializer;

impl TreeSerializer {
    /// Tree data, root id and every node in pre-order. Applying the result
    /// to an empty tree reproduces `tree`.
    pub fn serialize_full(tree: &Tree) -> TreeUpdate {
        let mut update = TreeUpdate {
            has_tree_data: true,
            tree_data: tree.data().clone(),
            root_id: tree.root_id(),
            ..TreeUpdate::default()
        };
        if let Some(root) = tree.root() {
            Self::push_subtree(root, &mut update);
        }
        update
    }

    /// Update that clears `id` and re-sends it with all of its descendants
    pub fn serialize_subtree(tree: &Tree, id: AxNodeId) -> Option<TreeUpdate> {
        let node = tree.get(id)?;
        let mut update = TreeUpdate {
            node_id_to_clear: Some(id),
            ..TreeUpdate::default()
        };
        Self::push_subtree(node, &mut update);
        Some(update)
    }

    fn push_subtree(node: NodeRef<'_>, update: &mut TreeUpdate) {
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            update.nodes.push(node.data().clone());
            stack.extend(node.children().collect::<Vec<_>>().into_iter().rev());
        }
    }
}
