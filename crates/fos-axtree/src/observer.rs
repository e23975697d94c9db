//! Tree Observers
//!
//! Observers receive one tagged [`TreeEvent`] per notification while an
//! update is applied. Fine-grained attribute changes are carried as
//! [`AttributeChange`] records, and the update closes with the ordered list
//! of per-node [`TreeChange`] records.

use crate::attributes::{
    BoolAttribute, FloatAttribute, IntAttribute, IntListAttribute, State, StringAttribute,
};
use crate::node_data::{join_ids, NodeData};
use crate::role::Role;
use crate::tree::Tree;
use crate::tree_data::TreeData;
use crate::AxNodeId;
use std::fmt;

/// One change to a node's attribute payload
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeChange {
    Role { old: Role, new: Role },
    State { state: State, new_value: bool },
    String { attr: StringAttribute, old: String, new: String },
    Bool { attr: BoolAttribute, new_value: bool },
    Float { attr: FloatAttribute, old: f32, new: f32 },
    Int { attr: IntAttribute, old: i32, new: i32 },
    IntList { attr: IntListAttribute, old: Vec<i32>, new: Vec<i32> },
}

impl fmt::Display for AttributeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Role { old, new } => write!(f, "Role changed from {old} to {new}"),
            Self::State { state, new_value } => write!(f, "{state} changed to {new_value}"),
            Self::String { attr, old, new } => write!(f, "{attr} changed from {old} to {new}"),
            Self::Bool { attr, new_value } => write!(f, "{attr} changed to {new_value}"),
            Self::Float { attr, old, new } => write!(f, "{attr} changed from {old} to {new}"),
            Self::Int { attr, old, new } => write!(f, "{attr} changed from {old} to {new}"),
            Self::IntList { attr, old, new } => write!(
                f,
                "{attr} changed from {} to {}",
                join_ids(old),
                join_ids(new)
            ),
        }
    }
}

/// Calls `emit(key, old, new)` for every attribute of one kind whose value
/// differs between `old` and `new`: first the removed ones in old order,
/// then added or modified ones in new order. Absent values read as
/// `default`.
fn diff_kind<K, V>(old: &[(K, V)], new: &[(K, V)], default: &V, mut emit: impl FnMut(K, V, V))
where
    K: Copy + PartialEq,
    V: Clone + PartialEq,
{
    for (key, old_value) in old {
        if !new.iter().any(|(k, _)| k == key) && old_value != default {
            emit(*key, old_value.clone(), default.clone());
        }
    }
    for (key, new_value) in new {
        let old_value = old
            .iter()
            .find(|(k, _)| k == key)
            .map_or(default, |(_, v)| v);
        if old_value != new_value {
            emit(*key, old_value.clone(), new_value.clone());
        }
    }
}

/// Attribute changes between two snapshots of the same node.
///
/// Order: role, states, then string, bool, float, int and int list
/// attributes.
pub fn attribute_changes(old: &NodeData, new: &NodeData) -> Vec<AttributeChange> {
    let mut changes = Vec::new();

    if old.role != new.role {
        changes.push(AttributeChange::Role {
            old: old.role,
            new: new.role,
        });
    }
    for state in State::ALL {
        let new_value = new.has_state(*state);
        if old.has_state(*state) != new_value {
            changes.push(AttributeChange::State {
                state: *state,
                new_value,
            });
        }
    }

    diff_kind(&old.string_attributes, &new.string_attributes, &String::new(), |attr, old, new| {
        changes.push(AttributeChange::String { attr, old, new })
    });
    diff_kind(&old.bool_attributes, &new.bool_attributes, &false, |attr, _, new_value| {
        changes.push(AttributeChange::Bool { attr, new_value })
    });
    diff_kind(&old.float_attributes, &new.float_attributes, &0.0, |attr, old, new| {
        changes.push(AttributeChange::Float { attr, old, new })
    });
    diff_kind(&old.int_attributes, &new.int_attributes, &0, |attr, old, new| {
        changes.push(AttributeChange::Int { attr, old, new })
    });
    diff_kind(&old.intlist_attributes, &new.intlist_attributes, &Vec::new(), |attr, old, new| {
        changes.push(AttributeChange::IntList { attr, old, new })
    });

    changes
}

/// Classification of a node touched by an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    NodeCreated,
    SubtreeCreated,
    NodeChanged,
    NodeReparented,
    SubtreeReparented,
}

/// Per-node record delivered with [`TreeEvent::AtomicUpdateFinished`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeChange {
    pub node_id: AxNodeId,
    pub kind: ChangeType,
}

/// Notification delivered to observers during `Tree::unserialize`
#[derive(Debug)]
pub enum TreeEvent<'a> {
    /// Fired before a surviving node's data is replaced
    NodeDataWillChange { old: &'a NodeData, new: &'a NodeData },
    /// One changed attribute of a surviving node
    AttributeChanged { node_id: AxNodeId, change: &'a AttributeChange },
    SubtreeWillBeDeleted(AxNodeId),
    NodeWillBeDeleted(AxNodeId),
    SubtreeWillBeReparented(AxNodeId),
    NodeWillBeReparented(AxNodeId),
    NodeCreated(AxNodeId),
    NodeReparented(AxNodeId),
    NodeChanged(AxNodeId),
    AtomicUpdateFinished { root_changed: bool, changes: &'a [TreeChange] },
    TreeDataChanged { old: &'a TreeData, new: &'a TreeData },
}

/// Receiver of tree notifications
///
/// Observers see the tree read-only; the tree reports an update in
/// progress until `AtomicUpdateFinished`.
pub trait TreeObserver {
    fn on_tree_event(&mut self, tree: &Tree, event: &TreeEvent<'_>);
}

/// Observer that records every notification by category
#[derive(Debug, Default)]
pub struct TreeChangeRecorder {
    pub tree_data_changed: bool,
    pub root_changed: bool,
    pub attribute_change_log: Vec<String>,
    pub node_data_will_change: Vec<AxNodeId>,
    pub node_will_be_deleted: Vec<AxNodeId>,
    pub subtree_will_be_deleted: Vec<AxNodeId>,
    pub node_will_be_reparented: Vec<AxNodeId>,
    pub subtree_will_be_reparented: Vec<AxNodeId>,
    pub node_created: Vec<AxNodeId>,
    pub node_reparented: Vec<AxNodeId>,
    pub node_changed: Vec<AxNodeId>,
    pub node_creation_finished: Vec<AxNodeId>,
    pub subtree_creation_finished: Vec<AxNodeId>,
    pub node_reparented_finished: Vec<AxNodeId>,
    pub subtree_reparented_finished: Vec<AxNodeId>,
    pub change_finished: Vec<AxNodeId>,
    pub atomic_updates: usize,
}

impl TreeChangeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of notifications seen
    pub fn event_count(&self) -> usize {
        self.attribute_change_log.len()
            + self.node_data_will_change.len()
            + self.node_will_be_deleted.len()
            + self.subtree_will_be_deleted.len()
            + self.node_will_be_reparented.len()
            + self.subtree_will_be_reparented.len()
            + self.node_created.len()
            + self.node_reparented.len()
            + self.node_changed.len()
            + self.atomic_updates
            + usize::from(self.tree_data_changed)
    }

    pub fn take_attribute_change_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.attribute_change_log)
    }
}

impl TreeObserver for TreeChangeRecorder {
    fn on_tree_event(&mut self, _tree: &Tree, event: &TreeEvent<'_>) {
        match event {
            TreeEvent::NodeDataWillChange { old, .. } => self.node_data_will_change.push(old.id),
            TreeEvent::AttributeChanged { change, .. } => {
                self.attribute_change_log.push(change.to_string())
            }
            TreeEvent::SubtreeWillBeDeleted(id) => self.subtree_will_be_deleted.push(*id),
            TreeEvent::NodeWillBeDeleted(id) => self.node_will_be_deleted.push(*id),
            TreeEvent::SubtreeWillBeReparented(id) => self.subtree_will_be_reparented.push(*id),
            TreeEvent::NodeWillBeReparented(id) => self.node_will_be_reparented.push(*id),
            TreeEvent::NodeCreated(id) => self.node_created.push(*id),
            TreeEvent::NodeReparented(id) => self.node_reparented.push(*id),
            TreeEvent::NodeChanged(id) => self.node_changed.push(*id),
            TreeEvent::AtomicUpdateFinished {
                root_changed,
                changes,
            } => {
                self.atomic_updates += 1;
                self.root_changed = *root_changed;
                for change in changes.iter() {
                    let list = match change.kind {
                        ChangeType::NodeCreated => &mut self.node_creation_finished,
                        ChangeType::SubtreeCreated => &mut self.subtree_creation_finished,
                        ChangeType::NodeReparented => &mut self.node_reparented_finished,
                        ChangeType::SubtreeReparented => &mut self.subtree_reparented_finished,
                        ChangeType::NodeChanged => &mut self.change_finished,
                    };
                    list.push(change.node_id);
                }
            }
            TreeEvent::TreeDataChanged { .. } => self.tree_data_changed = true,
        }
    }
}
