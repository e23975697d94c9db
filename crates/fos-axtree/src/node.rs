//! Nodes
//!
//! Live nodes owned by a [`Tree`] and the borrowed [`NodeRef`] handle used
//! to navigate them.

use crate::attributes::{IntAttribute, IntListAttribute, State, StringAttribute};
use crate::node_data::NodeData;
use crate::role::Role;
use crate::tree::Tree;
use crate::AxNodeId;
use std::fmt;

/// A node stored in a tree: its data plus parent linkage
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<AxNodeId>,
    pub(crate) index_in_parent: usize,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            index_in_parent: 0,
        }
    }

    pub fn id(&self) -> AxNodeId {
        self.data.id
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn parent_id(&self) -> Option<AxNodeId> {
        self.parent
    }

    pub fn index_in_parent(&self) -> usize {
        self.index_in_parent
    }
}

/// Borrowed handle to a node together with its tree
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a Tree, node: &'a Node) -> Self {
        Self { tree, node }
    }

    pub fn tree(&self) -> &'a Tree {
        self.tree
    }

    pub fn id(&self) -> AxNodeId {
        self.node.data.id
    }

    pub fn data(&self) -> &'a NodeData {
        &self.node.data
    }

    pub fn role(&self) -> Role {
        self.node.data.role
    }

    pub fn has_state(&self, state: State) -> bool {
        self.node.data.has_state(state)
    }

    /// Ignored by state or by role
    pub fn is_ignored(&self) -> bool {
        self.node.data.is_ignored()
    }

    pub fn is_text(&self) -> bool {
        self.role().is_text()
    }

    pub fn is_line_break(&self) -> bool {
        self.role() == Role::LineBreak
    }

    pub fn name(&self) -> &'a str {
        self.node.data.get_string_attribute(StringAttribute::Name)
    }

    pub fn value(&self) -> &'a str {
        self.node.data.get_string_attribute(StringAttribute::Value)
    }

    pub fn hierarchical_level(&self) -> i32 {
        self.node.data.get_int_attribute(IntAttribute::HierarchicalLevel)
    }

    // Structure

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent.and_then(|id| self.tree.get(id))
    }

    pub fn index_in_parent(&self) -> usize {
        self.node.index_in_parent
    }

    pub fn child_ids(&self) -> &'a [AxNodeId] {
        &self.node.data.child_ids
    }

    pub fn child_count(&self) -> usize {
        self.node.data.child_ids.len()
    }

    pub fn child_at(&self, index: usize) -> Option<NodeRef<'a>> {
        self.node
            .data
            .child_ids
            .get(index)
            .and_then(|id| self.tree.get(*id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + use<'a> {
        let tree = self.tree;
        self.node
            .data
            .child_ids
            .iter()
            .filter_map(move |id| tree.get(*id))
    }

    pub fn previous_sibling(&self) -> Option<NodeRef<'a>> {
        let index = self.index_in_parent().checked_sub(1)?;
        self.parent()?.child_at(index)
    }

    pub fn next_sibling(&self) -> Option<NodeRef<'a>> {
        self.parent()?.child_at(self.index_in_parent() + 1)
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> + use<'a> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// Number of ancestors
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// True when `ancestor` is this node or one of its ancestors
    pub fn is_descendant_of(&self, ancestor: &NodeRef<'_>) -> bool {
        self.id() == ancestor.id() || self.ancestors().any(|node| node.id() == ancestor.id())
    }

    /// String attribute of the nearest node (self first) that has it
    pub fn inherited_string_attribute(&self, attr: StringAttribute) -> Option<&'a str> {
        std::iter::once(*self)
            .chain(self.ancestors())
            .find_map(|node| node.data().string_attribute(attr))
    }

    pub fn language(&self) -> &'a str {
        self.inherited_string_attribute(StringAttribute::Language)
            .unwrap_or("")
    }

    /// Offsets where each line after the first starts, counted in
    /// characters over the leaves below this node
    pub fn line_start_offsets(&self) -> Vec<i32> {
        let cached = self
            .node
            .data
            .get_intlist_attribute(IntListAttribute::CachedLineStarts);
        if !cached.is_empty() {
            return cached.to_vec();
        }
        let mut offset = 0;
        let mut starts = Vec::new();
        self.collect_line_starts(&mut offset, &mut starts);
        starts
    }

    fn collect_line_starts(&self, offset: &mut i32, starts: &mut Vec<i32>) {
        for child in self.children() {
            if child.child_count() > 0 {
                child.collect_line_starts(offset, starts);
                continue;
            }
            let continues_line = child
                .data()
                .has_int_attribute(IntAttribute::PreviousOnLineId);
            if *offset > 0 && !continues_line && starts.last() != Some(&*offset) {
                starts.push(*offset);
            }
            *offset += child.name().chars().count() as i32;
        }
    }

    // Unignored traversal

    /// Children with ignored children replaced by their own unignored
    /// children, recursively
    pub fn unignored_child_count(&self) -> usize {
        self.children()
            .map(|child| {
                if child.is_ignored() {
                    child.unignored_child_count()
                } else {
                    1
                }
            })
            .sum()
    }

    pub fn unignored_child_at(&self, index: usize) -> Option<NodeRef<'a>> {
        let mut count = 0;
        for child in self.children() {
            if child.is_ignored() {
                let child_count = child.unignored_child_count();
                if index < count + child_count {
                    return child.unignored_child_at(index - count);
                }
                count += child_count;
            } else {
                if count == index {
                    return Some(child);
                }
                count += 1;
            }
        }
        None
    }

    pub fn unignored_children(&self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        self.collect_unignored_children(&mut out);
        out
    }

    fn collect_unignored_children(&self, out: &mut Vec<NodeRef<'a>>) {
        for child in self.children() {
            if child.is_ignored() {
                child.collect_unignored_children(out);
            } else {
                out.push(child);
            }
        }
    }

    /// Nearest ancestor that is not ignored
    pub fn unignored_parent(&self) -> Option<NodeRef<'a>> {
        self.ancestors().find(|node| !node.is_ignored())
    }

    /// Position among the unignored children of the unignored parent
    pub fn unignored_index_in_parent(&self) -> usize {
        self.unignored_parent()
            .and_then(|parent| {
                parent
                    .unignored_children()
                    .iter()
                    .position(|node| node.id() == self.id())
            })
            .unwrap_or(0)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id() == other.id()
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id())
            .field("role", &self.role())
            .finish()
    }
}
