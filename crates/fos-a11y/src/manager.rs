//! Accessibility Manager
//!
//! Owns one accessibility tree together with the geometry of the view that
//! hosts it, and hands out [`AccessibleNode`] wrappers for platform queries.

use std::cell::RefCell;
use std::rc::Rc;

use fos_axtree::{AxNodeId, Rect, Tree, TreeObserver, TreeUpdate};

use crate::config::ManagerConfig;
use crate::node::AccessibleNode;
use crate::A11yError;

/// Accessibility manager for one document
#[derive(Debug, Default)]
pub struct AccessibilityManager {
    tree: Tree,
    config: ManagerConfig,
}

impl AccessibilityManager {
    pub fn new(config: ManagerConfig) -> Self {
        Self {
            tree: Tree::new(),
            config,
        }
    }

    /// Create a manager whose tree is built from `update`
    pub fn from_update(update: &TreeUpdate, config: ManagerConfig) -> Result<Self, A11yError> {
        let mut manager = Self::new(config);
        manager.unserialize(update)?;
        Ok(manager)
    }

    /// Apply an incremental update to the tree
    pub fn unserialize(&mut self, update: &TreeUpdate) -> Result<(), A11yError> {
        self.tree.unserialize(update)?;
        tracing::debug!(
            nodes = update.nodes.len(),
            size = self.tree.size(),
            "accessibility tree updated"
        );
        Ok(())
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Move or resize the hosting view
    pub fn set_view_bounds(&mut self, view_bounds: Rect) {
        self.config.view_bounds = view_bounds;
    }

    pub fn add_observer(&mut self, observer: Rc<RefCell<dyn TreeObserver>>) {
        self.tree.add_observer(observer);
    }

    pub fn remove_observer<T: TreeObserver + ?Sized>(&mut self, observer: &Rc<RefCell<T>>) {
        self.tree.remove_observer(observer);
    }

    pub fn get(&self, id: AxNodeId) -> Option<AccessibleNode<'_>> {
        self.tree.get(id).map(|node| AccessibleNode::new(self, node))
    }

    pub fn root(&self) -> Option<AccessibleNode<'_>> {
        self.tree.root().map(|node| AccessibleNode::new(self, node))
    }

    /// Deepest node under a screen point, starting from the root
    pub fn hit_test(&self, x: i32, y: i32) -> Result<AccessibleNode<'_>, A11yError> {
        let root = self.root().ok_or(A11yError::NoRoot)?;
        Ok(root.approximate_hit_test(x, y))
    }
}
