//! fOS AXTree - Accessibility Tree Engine
//!
//! Maintains an accessibility tree from incremental updates, notifies
//! observers about every change, and answers derived queries: reverse
//! relations, list positions, tree-space bounds and table structure.

mod attributes;
mod bounds;
mod generation;
mod geometry;
mod node;
mod node_data;
mod observer;
mod ordered_set;
mod relations;
mod role;
mod serializer;
mod table;
mod transform;
mod tree;
mod tree_data;
mod unserialize;
mod update;

pub use attributes::{
    BoolAttribute, CheckedState, FloatAttribute, IntAttribute, IntListAttribute, SortDirection,
    State, StringAttribute, TextDirection,
};
pub use bounds::TreeBounds;
pub use generation::{Cached, Generation};
pub use geometry::{Rect, RectF};
pub use node::{Node, NodeRef};
pub use node_data::{NodeData, RelativeBounds};
pub use observer::{
    attribute_changes, AttributeChange, ChangeType, TreeChange, TreeChangeRecorder, TreeEvent,
    TreeObserver,
};
pub use relations::ReverseRelationMap;
pub use role::{Role, SetItemClass, UnknownRole};
pub use serializer::TreeSerializer;
pub use table::{TableCell, TableInfo};
pub use transform::Transform;
pub use tree::Tree;
pub use tree_data::TreeData;
pub use update::TreeUpdate;

/// Node identifier, unique within one tree
pub type AxNodeId = i32;

/// Id meaning "no node"
pub const INVALID_NODE_ID: AxNodeId = -1;

/// Reasons an update is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("Nodes left pending by the update: {}", node_data::join_ids_spaced(.0))]
    PendingNodes(Vec<AxNodeId>),

    #[error("Node {parent} has duplicate child id {child}")]
    DuplicateChildId { parent: AxNodeId, child: AxNodeId },

    #[error("Node {node} reparented from {old_parent} to {new_parent}")]
    InvalidReparenting {
        node: AxNodeId,
        old_parent: AxNodeId,
        new_parent: AxNodeId,
    },

    #[error("{id} will not be in the tree and is not the new root")]
    NotInTree { id: AxNodeId },
}
