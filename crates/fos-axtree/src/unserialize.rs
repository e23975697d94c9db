//! Unserialize
//!
//! Applies a [`TreeUpdate`] to a [`Tree`] in two passes. The planning pass
//! simulates the update over an overlay of the current structure and
//! rejects it without touching the tree. The apply pass then notifies
//! observers, mutates the tree and records the per-node change list.

use crate::node::Node;
use crate::node_data::NodeData;
use crate::observer::{attribute_changes, ChangeType, TreeChange, TreeEvent};
use crate::tree::Tree;
use crate::update::TreeUpdate;
use crate::{AxNodeId, TreeError, INVALID_NODE_ID};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Subtree removed while planning, listed in pre-order. Only nodes that
/// existed before the update appear, each at most once.
#[derive(Debug)]
struct DetachedSubtree {
    root: AxNodeId,
    nodes: Vec<AxNodeId>,
}

/// Result of a successful planning pass
#[derive(Debug)]
struct UpdatePlan<'u> {
    new_root: Option<AxNodeId>,
    root_changed: bool,
    detached: Vec<DetachedSubtree>,
    deleted: HashSet<AxNodeId>,
    reparented: HashSet<AxNodeId>,
    created: HashSet<AxNodeId>,
    /// Final snapshot of every surviving node carried by the update
    snapshots: HashMap<AxNodeId, &'u NodeData>,
    /// Surviving nodes in the order the update first mentions them
    order: Vec<AxNodeId>,
    changes: Vec<TreeChange>,
}

/// Overlay of the tree's structure used while simulating an update
struct Planner<'t, 'u> {
    tree: &'t Tree,
    /// Nodes of the current tree that are detached in the simulation
    detached: HashSet<AxNodeId>,
    ever_detached: HashSet<AxNodeId>,
    /// Nodes attached by the simulation: new ids or re-attached old ones
    attached: HashSet<AxNodeId>,
    pending: BTreeSet<AxNodeId>,
    children: HashMap<AxNodeId, Vec<AxNodeId>>,
    parents: HashMap<AxNodeId, Option<AxNodeId>>,
    subtrees: Vec<DetachedSubtree>,
    listed: HashSet<AxNodeId>,
    snapshots: HashMap<AxNodeId, &'u NodeData>,
    order: Vec<AxNodeId>,
}

impl<'t, 'u> Planner<'t, 'u> {
    fn new(tree: &'t Tree) -> Self {
        Self {
            tree,
            detached: HashSet::new(),
            ever_detached: HashSet::new(),
            attached: HashSet::new(),
            pending: BTreeSet::new(),
            children: HashMap::new(),
            parents: HashMap::new(),
            subtrees: Vec::new(),
            listed: HashSet::new(),
            snapshots: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn existed(&self, id: AxNodeId) -> bool {
        self.tree.nodes.contains_key(&id)
    }

    fn is_live(&self, id: AxNodeId) -> bool {
        self.attached.contains(&id) || (self.existed(id) && !self.detached.contains(&id))
    }

    fn children_of(&self, id: AxNodeId) -> Vec<AxNodeId> {
        match self.children.get(&id) {
            Some(children) => children.clone(),
            None => self
                .tree
                .nodes
                .get(&id)
                .map(|node| node.data.child_ids.clone())
                .unwrap_or_default(),
        }
    }

    fn parent_of(&self, id: AxNodeId) -> Option<AxNodeId> {
        match self.parents.get(&id) {
            Some(parent) => *parent,
            None => self.tree.nodes.get(&id).and_then(|node| node.parent),
        }
    }

    /// Remove a live node and all of its live descendants
    fn detach_subtree(&mut self, root: AxNodeId) {
        let mut stack = vec![root];
        let mut visited = Vec::new();
        while let Some(id) = stack.pop() {
            visited.push(id);
            for child in self.children_of(id).into_iter().rev() {
                stack.push(child);
            }
        }

        let first_listing = !self.listed.contains(&root);
        let mut nodes = Vec::new();
        for id in visited {
            self.pending.remove(&id);
            self.attached.remove(&id);
            self.children.remove(&id);
            if self.existed(id) {
                self.detached.insert(id);
                self.ever_detached.insert(id);
                if self.listed.insert(id) {
                    nodes.push(id);
                }
            }
        }
        if first_listing && self.existed(root) {
            self.subtrees.push(DetachedSubtree { root, nodes });
        }
    }

    /// Attach `id` as an empty placeholder that the update must define
    fn attach_placeholder(&mut self, id: AxNodeId, parent: Option<AxNodeId>) {
        self.detached.remove(&id);
        self.attached.insert(id);
        self.pending.insert(id);
        self.children.insert(id, Vec::new());
        self.parents.insert(id, parent);
    }

    fn plan(mut self, update: &'u TreeUpdate) -> Result<UpdatePlan<'u>, TreeError> {
        let old_root = self.tree.root;
        let new_root = update.root_id.or(old_root);

        if update.root_id.is_some() && update.root_id != old_root {
            if let Some(root) = old_root {
                self.detach_subtree(root);
            }
            if let Some(root) = new_root {
                self.attach_placeholder(root, None);
            }
        }

        if let Some(clear) = update.node_id_to_clear {
            if self.is_live(clear) {
                for child in self.children_of(clear) {
                    self.detach_subtree(child);
                }
                self.children.insert(clear, Vec::new());
                self.pending.insert(clear);
            }
        }

        for data in &update.nodes {
            self.apply_snapshot(data)?;
        }

        if !self.pending.is_empty() {
            return Err(TreeError::PendingNodes(self.pending.into_iter().collect()));
        }

        Ok(self.finish(old_root, new_root))
    }

    fn apply_snapshot(&mut self, data: &'u NodeData) -> Result<(), TreeError> {
        let id = data.id;
        if !self.is_live(id) {
            return Err(TreeError::NotInTree { id });
        }
        self.pending.remove(&id);

        let mut new_children = HashSet::with_capacity(data.child_ids.len());
        for child in &data.child_ids {
            if !new_children.insert(*child) {
                return Err(TreeError::DuplicateChildId {
                    parent: id,
                    child: *child,
                });
            }
        }

        for child in self.children_of(id) {
            if !new_children.contains(&child) {
                self.detach_subtree(child);
            }
        }

        for child in &data.child_ids {
            if self.is_live(*child) {
                let old_parent = self.parent_of(*child);
                if old_parent != Some(id) {
                    return Err(TreeError::InvalidReparenting {
                        node: *child,
                        old_parent: old_parent.unwrap_or(INVALID_NODE_ID),
                        new_parent: id,
                    });
                }
            } else {
                self.attach_placeholder(*child, Some(id));
            }
        }

        self.children.insert(id, data.child_ids.clone());
        if self.snapshots.insert(id, data).is_none() {
            self.order.push(id);
        }
        Ok(())
    }

    fn finish(self, old_root: Option<AxNodeId>, new_root: Option<AxNodeId>) -> UpdatePlan<'u> {
        let deleted = self.detached.clone();
        let reparented: HashSet<AxNodeId> = self
            .ever_detached
            .iter()
            .copied()
            .filter(|id| self.attached.contains(id))
            .collect();
        let created: HashSet<AxNodeId> = self
            .attached
            .iter()
            .copied()
            .filter(|id| !self.existed(*id))
            .collect();

        let order: Vec<AxNodeId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.is_live(*id))
            .collect();
        let mut snapshots = self.snapshots;
        snapshots.retain(|id, _| order.contains(id));

        let mut final_parent: HashMap<AxNodeId, AxNodeId> = HashMap::new();
        for id in &order {
            for child in &snapshots[id].child_ids {
                final_parent.insert(*child, *id);
            }
        }

        let is_new = |id: AxNodeId| created.contains(&id) || reparented.contains(&id);
        let mut changes = Vec::new();
        for id in &order {
            let parent = final_parent.get(id).copied();
            let kind = if created.contains(id) {
                match parent {
                    Some(parent) if created.contains(&parent) => ChangeType::NodeCreated,
                    _ => ChangeType::SubtreeCreated,
                }
            } else if reparented.contains(id) {
                let unchanged = self
                    .tree
                    .nodes
                    .get(id)
                    .is_some_and(|node| node.data.same_attributes_as(snapshots[id]));
                if unchanged && parent.is_none_or(|parent| !is_new(parent)) {
                    ChangeType::SubtreeReparented
                } else {
                    ChangeType::NodeReparented
                }
            } else if self
                .tree
                .nodes
                .get(id)
                .is_some_and(|node| node.data != *snapshots[id])
            {
                ChangeType::NodeChanged
            } else {
                continue;
            };
            tracing::trace!("Node {} classified as {:?}", id, kind);
            changes.push(TreeChange { node_id: *id, kind });
        }

        let root_changed =
            new_root != old_root || old_root.is_some_and(|root| reparented.contains(&root));

        UpdatePlan {
            new_root,
            root_changed,
            detached: self.subtrees,
            deleted,
            reparented,
            created,
            snapshots,
            order,
            changes,
        }
    }
}

impl Tree {
    /// Apply `update` atomically.
    ///
    /// On failure the tree is left exactly as it was and [`Tree::error`]
    /// reports the reason.
    pub fn unserialize(&mut self, update: &TreeUpdate) -> Result<(), TreeError> {
        let same_root = update.root_id.is_some() && update.root_id == self.root;
        if update.is_empty() || (same_root && update.is_empty_besides_root()) {
            return Ok(());
        }

        let plan = match Planner::new(self).plan(update) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!("Rejected tree update: {}", err);
                self.error = err.to_string();
                return Err(err);
            }
        };

        tracing::debug!(
            "Applying tree update: {} nodes, {} created, {} deleted, {} reparented",
            update.nodes.len(),
            plan.created.len(),
            plan.deleted.len(),
            plan.reparented.len()
        );
        self.error.clear();
        self.apply(update, plan);
        Ok(())
    }

    fn apply(&mut self, update: &TreeUpdate, plan: UpdatePlan<'_>) {
        self.update_in_progress = true;

        for subtree in &plan.detached {
            if plan.reparented.contains(&subtree.root) {
                self.notify(&TreeEvent::SubtreeWillBeReparented(subtree.root));
            } else {
                self.notify(&TreeEvent::SubtreeWillBeDeleted(subtree.root));
            }
            for id in &subtree.nodes {
                if plan.reparented.contains(id) {
                    self.notify(&TreeEvent::NodeWillBeReparented(*id));
                } else {
                    self.notify(&TreeEvent::NodeWillBeDeleted(*id));
                }
            }
        }

        for id in &plan.order {
            let new = plan.snapshots[id];
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if node.data == *new {
                continue;
            }
            self.notify(&TreeEvent::NodeDataWillChange {
                old: &node.data,
                new,
            });
            for change in attribute_changes(&node.data, new) {
                self.notify(&TreeEvent::AttributeChanged {
                    node_id: *id,
                    change: &change,
                });
            }
        }

        for id in &plan.deleted {
            if let Some(node) = self.nodes.remove(id) {
                self.relations.remove(&node.data);
            }
        }
        for id in &plan.order {
            let data = plan.snapshots[id].clone();
            match self.nodes.get_mut(id) {
                Some(node) => {
                    let old = std::mem::replace(&mut node.data, data);
                    self.relations.remove(&old);
                    self.relations.add(&node.data);
                }
                None => {
                    self.relations.add(&data);
                    self.nodes.insert(*id, Node::new(data));
                }
            }
        }
        for id in &plan.order {
            for (index, child) in plan.snapshots[id].child_ids.iter().enumerate() {
                if let Some(node) = self.nodes.get_mut(child) {
                    node.parent = Some(*id);
                    node.index_in_parent = index;
                }
            }
        }
        self.root = plan.new_root;
        if let Some(root) = plan.new_root.and_then(|id| self.nodes.get_mut(&id)) {
            root.parent = None;
            root.index_in_parent = 0;
        }
        let old_tree_data = if update.has_tree_data && update.tree_data != self.data {
            Some(std::mem::replace(&mut self.data, update.tree_data.clone()))
        } else {
            None
        };
        self.generation = self.generation.next();

        for id in &plan.order {
            if plan.created.contains(id) {
                self.notify(&TreeEvent::NodeCreated(*id));
            } else if plan.reparented.contains(id) {
                self.notify(&TreeEvent::NodeReparented(*id));
            }
        }
        for change in &plan.changes {
            self.notify(&TreeEvent::NodeChanged(change.node_id));
        }

        self.update_in_progress = false;
        self.notify(&TreeEvent::AtomicUpdateFinished {
            root_changed: plan.root_changed,
            changes: &plan.changes,
        });
        if let Some(old) = old_tree_data {
            self.notify(&TreeEvent::TreeDataChanged {
                old: &old,
                new: &self.data,
            });
        }
    }
}
