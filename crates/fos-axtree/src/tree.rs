//! Accessibility Tree
//!
//! Owns the nodes of one rooted tree, its metadata, the reverse relation
//! index and the observers notified while updates are applied.

use crate::attributes::{IntAttribute, IntListAttribute};
use crate::generation::{Cached, Generation};
use crate::node::{Node, NodeRef};
use crate::node_data::NodeData;
use crate::observer::{TreeEvent, TreeObserver};
use crate::ordered_set::SetInfo;
use crate::relations::{RelationIndex, ReverseRelationMap};
use crate::table::TableInfo;
use crate::tree_data::TreeData;
use crate::update::TreeUpdate;
use crate::{AxNodeId, TreeError};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

static EMPTY_NODE_DATA: NodeData = NodeData::EMPTY;

/// Accessibility tree
pub struct Tree {
    pub(crate) root: Option<AxNodeId>,
    pub(crate) nodes: HashMap<AxNodeId, Node>,
    pub(crate) data: TreeData,
    pub(crate) relations: RelationIndex,
    pub(crate) observers: Vec<Rc<RefCell<dyn TreeObserver>>>,
    pub(crate) generation: Generation,
    pub(crate) update_in_progress: bool,
    pub(crate) error: String,
    pub(crate) set_cache: RefCell<Cached<HashMap<AxNodeId, SetInfo>>>,
    pub(crate) table_cache: RefCell<Cached<HashMap<AxNodeId, Rc<TableInfo>>>>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create an empty tree with no root
    pub fn new() -> Self {
        Self {
            root: None,
            nodes: HashMap::new(),
            data: TreeData::default(),
            relations: RelationIndex::default(),
            observers: Vec::new(),
            generation: Generation::INITIAL,
            update_in_progress: false,
            error: String::new(),
            set_cache: RefCell::new(Cached::default()),
            table_cache: RefCell::new(Cached::default()),
        }
    }

    /// Build a tree from a single initial update
    pub fn from_update(update: &TreeUpdate) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        tree.unserialize(update)?;
        Ok(tree)
    }

    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.and_then(|id| self.get(id))
    }

    pub fn root_id(&self) -> Option<AxNodeId> {
        self.root
    }

    /// Look up a node by id
    pub fn get(&self, id: AxNodeId) -> Option<NodeRef<'_>> {
        self.nodes.get(&id).map(|node| NodeRef::new(self, node))
    }

    pub fn contains(&self, id: AxNodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Data of a node, or a zeroed record for unknown ids
    pub fn node_data(&self, id: AxNodeId) -> &NodeData {
        self.nodes
            .get(&id)
            .map_or(&EMPTY_NODE_DATA, |node| &node.data)
    }

    /// Number of nodes
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = AxNodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Tree-scoped metadata
    pub fn data(&self) -> &TreeData {
        &self.data
    }

    /// Reason the last update was rejected; empty after a success
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Advances once per applied update
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// True while observers are being notified about an update
    pub fn is_update_in_progress(&self) -> bool {
        self.update_in_progress
    }

    // Observers

    pub fn add_observer(&mut self, observer: Rc<RefCell<dyn TreeObserver>>) {
        self.observers.push(observer);
    }

    pub fn remove_observer<T: TreeObserver + ?Sized>(&mut self, observer: &Rc<RefCell<T>>) {
        let target = Rc::as_ptr(observer) as *const ();
        self.observers
            .retain(|registered| Rc::as_ptr(registered) as *const () != target);
    }

    pub fn has_observer<T: TreeObserver + ?Sized>(&self, observer: &Rc<RefCell<T>>) -> bool {
        let target = Rc::as_ptr(observer) as *const ();
        self.observers
            .iter()
            .any(|registered| Rc::as_ptr(registered) as *const () == target)
    }

    pub(crate) fn notify(&self, event: &TreeEvent<'_>) {
        for observer in &self.observers {
            match observer.try_borrow_mut() {
                Ok(mut observer) => observer.on_tree_event(self, event),
                Err(_) => tracing::warn!("Skipping observer already borrowed during {:?}", event),
            }
        }
    }

    // Reverse relations

    /// Nodes whose int attribute `attr` points at `target`
    pub fn reverse_int_relations(&self, attr: IntAttribute, target: AxNodeId) -> HashSet<AxNodeId> {
        self.relations.int_sources(attr, target)
    }

    /// Nodes whose int list attribute `attr` contains `target`
    pub fn reverse_intlist_relations(
        &self,
        attr: IntListAttribute,
        target: AxNodeId,
    ) -> HashSet<AxNodeId> {
        self.relations.intlist_sources(attr, target)
    }

    /// Nodes hosting the child tree `tree_id`
    pub fn node_ids_for_child_tree_id(&self, tree_id: &str) -> HashSet<AxNodeId> {
        self.relations.child_tree_hosts(tree_id)
    }

    pub fn int_reverse_relations(&self) -> &ReverseRelationMap<IntAttribute> {
        &self.relations.int
    }

    pub fn intlist_reverse_relations(&self) -> &ReverseRelationMap<IntListAttribute> {
        &self.relations.intlist
    }

    fn write_subtree(&self, f: &mut fmt::Formatter<'_>, node: NodeRef<'_>, indent: usize) -> fmt::Result {
        writeln!(f, "{:width$}{}", "", node.data(), width = indent * 2)?;
        for child in node.children() {
            self.write_subtree(f, child, indent + 1)?;
        }
        Ok(())
    }
}

/// `AXTree` with the tree data, then one line per node in pre-order,
/// indented two spaces per level.
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AXTree{}", self.data)?;
        match self.root() {
            Some(root) => self.write_subtree(f, root, 0),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("size", &self.nodes.len())
            .field("generation", &self.generation)
            .field("observers", &self.observers.len())
            .finish()
    }
}
