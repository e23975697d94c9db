//! Accessible Node
//!
//! Platform-facing view of one tree node. Leaf rules hide the internal
//! children of text fields, text runs and widgets with presentational
//! children, so assistive technology sees those as single objects.

use std::fmt;

use fos_axtree::{
    AxNodeId, BoolAttribute, IntAttribute, IntListAttribute, NodeData, NodeRef, Role, State,
    StringAttribute, Tree,
};

use crate::manager::AccessibilityManager;

/// A tree node seen through its [`AccessibilityManager`]
#[derive(Clone, Copy)]
pub struct AccessibleNode<'a> {
    manager: &'a AccessibilityManager,
    node: NodeRef<'a>,
}

impl<'a> AccessibleNode<'a> {
    pub(crate) fn new(manager: &'a AccessibilityManager, node: NodeRef<'a>) -> Self {
        Self { manager, node }
    }

    fn wrap(&self, node: NodeRef<'a>) -> Self {
        Self::new(self.manager, node)
    }

    fn lookup(&self, id: AxNodeId) -> Option<Self> {
        self.manager.get(id)
    }

    pub fn manager(&self) -> &'a AccessibilityManager {
        self.manager
    }

    pub fn tree(&self) -> &'a Tree {
        self.manager.tree()
    }

    /// The underlying tree node
    pub fn node(&self) -> NodeRef<'a> {
        self.node
    }

    pub fn id(&self) -> AxNodeId {
        self.node.id()
    }

    pub fn data(&self) -> &'a NodeData {
        self.node.data()
    }

    pub fn role(&self) -> Role {
        self.node.role()
    }

    pub fn has_state(&self, state: State) -> bool {
        self.node.has_state(state)
    }

    pub fn name(&self) -> &'a str {
        self.node.name()
    }

    pub fn string_attribute(&self, attr: StringAttribute) -> &'a str {
        self.data().get_string_attribute(attr)
    }

    pub fn int_attribute(&self, attr: IntAttribute) -> Option<i32> {
        self.data().int_attribute(attr)
    }

    pub fn index_in_parent(&self) -> usize {
        self.node.index_in_parent()
    }

    // ------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------

    /// Static text, inline text boxes and line breaks
    pub fn is_text_only_object(&self) -> bool {
        self.node.is_text()
    }

    /// Editable text control without rich content
    pub fn is_plain_text_field(&self) -> bool {
        !self.has_state(State::RichlyEditable)
            && (self.role().is_text_field()
                || self.data().get_bool_attribute(BoolAttribute::EditableRoot))
    }

    /// Root of a richly editable region
    pub fn is_rich_text_field(&self) -> bool {
        self.data().get_bool_attribute(BoolAttribute::EditableRoot)
            && self.has_state(State::RichlyEditable)
    }

    pub fn is_document(&self) -> bool {
        self.role().is_document()
    }

    // ------------------------------------------------------------------
    // Platform and internal children
    // ------------------------------------------------------------------

    /// Whether platform APIs see this node without children
    pub fn platform_is_leaf(&self) -> bool {
        if self.internal_child_count() == 0 {
            return true;
        }
        self.is_plain_text_field()
            || self.is_text_only_object()
            || self.role().has_presentational_children()
    }

    /// Whether some ancestor is a platform leaf, hiding this node
    pub fn platform_is_child_of_leaf(&self) -> bool {
        self.node
            .ancestors()
            .any(|ancestor| self.wrap(ancestor).platform_is_leaf())
    }

    /// The nearest node, self included, that platform APIs expose
    pub fn closest_platform_object(&self) -> Self {
        let mut current = *self;
        while current.platform_is_child_of_leaf() {
            match current.platform_parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    pub fn platform_child_count(&self) -> usize {
        if self.platform_is_leaf() {
            0
        } else {
            self.internal_child_count()
        }
    }

    pub fn platform_child_at(&self, index: usize) -> Option<Self> {
        if index >= self.platform_child_count() {
            return None;
        }
        self.internal_child_at(index)
    }

    pub fn platform_children(&self) -> impl Iterator<Item = AccessibleNode<'a>> + use<'a> {
        let this = *self;
        (0..self.platform_child_count()).filter_map(move |i| this.internal_child_at(i))
    }

    pub fn platform_parent(&self) -> Option<Self> {
        self.node.parent().map(|parent| self.wrap(parent))
    }

    pub fn internal_child_count(&self) -> usize {
        self.node.child_count()
    }

    pub fn internal_child_at(&self, index: usize) -> Option<Self> {
        self.node.child_at(index).map(|child| self.wrap(child))
    }

    pub fn internal_children(&self) -> impl Iterator<Item = AccessibleNode<'a>> + use<'a> {
        let this = *self;
        self.node.children().map(move |child| this.wrap(child))
    }

    pub fn previous_sibling(&self) -> Option<Self> {
        self.node.previous_sibling().map(|node| self.wrap(node))
    }

    pub fn next_sibling(&self) -> Option<Self> {
        self.node.next_sibling().map(|node| self.wrap(node))
    }

    pub fn platform_deepest_first_child(&self) -> Option<Self> {
        let mut deepest = self.platform_child_at(0)?;
        while let Some(child) = deepest.platform_child_at(0) {
            deepest = child;
        }
        Some(deepest)
    }

    pub fn platform_deepest_last_child(&self) -> Option<Self> {
        let mut deepest = self.platform_child_at(self.platform_child_count().checked_sub(1)?)?;
        while let Some(last) = deepest.platform_child_count().checked_sub(1) {
            match deepest.platform_child_at(last) {
                Some(child) => deepest = child,
                None => break,
            }
        }
        Some(deepest)
    }

    pub fn internal_deepest_first_child(&self) -> Option<Self> {
        let mut deepest = self.internal_child_at(0)?;
        while let Some(child) = deepest.internal_child_at(0) {
            deepest = child;
        }
        Some(deepest)
    }

    pub fn internal_deepest_last_child(&self) -> Option<Self> {
        let mut deepest = self.internal_child_at(self.internal_child_count().checked_sub(1)?)?;
        while let Some(last) = deepest.internal_child_count().checked_sub(1) {
            match deepest.internal_child_at(last) {
                Some(child) => deepest = child,
                None => break,
            }
        }
        Some(deepest)
    }

    /// True when `ancestor` is this node or one of its ancestors
    pub fn is_descendant_of(&self, ancestor: &AccessibleNode<'_>) -> bool {
        self.node.is_descendant_of(&ancestor.node)
    }

    /// Whether the previous sibling continues the same visual line.
    ///
    /// Line links are only reliable on leaves, so the deepest first child
    /// is consulted and its previous-on-line target may sit anywhere inside
    /// the sibling.
    pub fn is_previous_sibling_on_same_line(&self) -> bool {
        let Some(sibling) = self.previous_sibling() else {
            return false;
        };
        let leaf = self.platform_deepest_first_child().unwrap_or(*self);
        leaf.int_attribute(IntAttribute::PreviousOnLineId)
            .and_then(|id| self.lookup(id))
            .is_some_and(|target| target.is_descendant_of(&sibling))
    }

    pub fn is_next_sibling_on_same_line(&self) -> bool {
        let Some(sibling) = self.next_sibling() else {
            return false;
        };
        let leaf = self.platform_deepest_last_child().unwrap_or(*self);
        leaf.int_attribute(IntAttribute::NextOnLineId)
            .and_then(|id| self.lookup(id))
            .is_some_and(|target| target.is_descendant_of(&sibling))
    }

    /// Closest ancestor, self included, whose children can be selected
    pub fn selection_container(&self) -> Option<Self> {
        std::iter::successors(Some(*self), |node| node.platform_parent())
            .find(|node| node.role().is_container_with_selectable_children())
    }

    // ------------------------------------------------------------------
    // Relations
    // ------------------------------------------------------------------

    /// Live nodes whose `attr` points at this node, ordered by id
    pub fn reverse_int_relations(&self, attr: IntAttribute) -> Vec<Self> {
        let ids = self.tree().reverse_int_relations(attr, self.id());
        self.resolve(ids)
    }

    /// Live nodes whose id list `attr` contains this node, ordered by id
    pub fn reverse_intlist_relations(&self, attr: IntListAttribute) -> Vec<Self> {
        let ids = self.tree().reverse_intlist_relations(attr, self.id());
        self.resolve(ids)
    }

    /// Targets of this node's own id list `attr` that exist in the tree
    pub fn intlist_relations(&self, attr: IntListAttribute) -> Vec<Self> {
        self.data()
            .get_intlist_attribute(attr)
            .iter()
            .filter_map(|id| self.lookup(*id))
            .collect()
    }

    fn resolve(&self, ids: impl IntoIterator<Item = AxNodeId>) -> Vec<Self> {
        let mut ids: Vec<_> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.into_iter().filter_map(|id| self.lookup(id)).collect()
    }

    // ------------------------------------------------------------------
    // Sets and tables
    // ------------------------------------------------------------------

    pub fn pos_in_set(&self) -> i32 {
        self.node.pos_in_set()
    }

    pub fn set_size(&self) -> i32 {
        self.node.set_size()
    }

    pub fn is_table(&self) -> bool {
        self.node.is_table()
    }

    pub fn table_row_count(&self) -> Option<usize> {
        self.node.table_row_count()
    }

    pub fn table_col_count(&self) -> Option<usize> {
        self.node.table_col_count()
    }

    pub fn table_cell_from_coords(&self, row: usize, col: usize) -> Option<Self> {
        self.node
            .table_cell_from_coords(row, col)
            .map(|cell| self.wrap(cell))
    }

    pub fn table_cell_from_index(&self, index: usize) -> Option<Self> {
        self.node
            .table_cell_from_index(index)
            .map(|cell| self.wrap(cell))
    }

    pub fn table_caption(&self) -> Option<Self> {
        self.node.table_caption().map(|caption| self.wrap(caption))
    }

    pub fn table_row_index(&self) -> Option<usize> {
        self.node.table_row_index()
    }

    pub fn table_cell_row_index(&self) -> Option<usize> {
        self.node.table_cell_row_index()
    }

    pub fn table_cell_col_index(&self) -> Option<usize> {
        self.node.table_cell_col_index()
    }

    pub fn table_cell_row_span(&self) -> Option<usize> {
        self.node.table_cell_row_span()
    }

    pub fn table_cell_col_span(&self) -> Option<usize> {
        self.node.table_cell_col_span()
    }

    /// Column headers covering this cell
    pub fn table_cell_col_headers(&self) -> Vec<Self> {
        let ids = self.node.table_cell_col_header_node_ids();
        ids.into_iter().filter_map(|id| self.lookup(id)).collect()
    }

    /// Row headers covering this cell
    pub fn table_cell_row_headers(&self) -> Vec<Self> {
        let ids = self.node.table_cell_row_header_node_ids();
        ids.into_iter().filter_map(|id| self.lookup(id)).collect()
    }
}

impl PartialEq for AccessibleNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.manager, other.manager) && self.id() == other.id()
    }
}

impl fmt::Debug for AccessibleNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessibleNode")
            .field("id", &self.id())
            .field("role", &self.role())
            .finish()
    }
}
