//! Ordered Sets
//!
//! Position-in-set and set-size inference for list-like containers and
//! their items, with results cached per tree generation.

use crate::attributes::IntAttribute;
use crate::node::NodeRef;
use crate::role::Role;
use crate::AxNodeId;

/// Position and size reported for one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SetInfo {
    pub(crate) pos_in_set: i32,
    pub(crate) set_size: i32,
}

impl SetInfo {
    const NONE: Self = Self {
        pos_in_set: 0,
        set_size: 0,
    };
}

/// Collect the set's items in order, walking through ignored nodes and
/// generic containers
fn collect_candidates<'a>(node: NodeRef<'a>, set_role: Role, radio: bool, out: &mut Vec<NodeRef<'a>>) {
    for child in node.children() {
        if child.is_ignored() || child.role().is_generic_container() {
            collect_candidates(child, set_role, radio, out);
            continue;
        }
        let counts = if radio {
            child.role() == Role::RadioButton
        } else {
            set_role.ordered_set_accepts(child.role())
        };
        if counts {
            out.push(child);
        }
    }
}

impl<'a> NodeRef<'a> {
    /// List-like container whose items get positions
    pub fn is_ordered_set(&self) -> bool {
        self.role().is_ordered_set()
    }

    pub fn is_ordered_set_item(&self) -> bool {
        self.role().set_item_class().is_some()
    }

    /// Nearest ancestor that is neither ignored nor a generic container
    pub fn ordered_set(&self) -> Option<NodeRef<'a>> {
        self.ancestors()
            .find(|node| !node.is_ignored() && !node.role().is_generic_container())
    }

    /// 1-based position among the items of the ordered set, 0 when not
    /// applicable
    pub fn pos_in_set(&self) -> i32 {
        self.set_info().pos_in_set
    }

    /// Number of items in the ordered set this node belongs to or is
    pub fn set_size(&self) -> i32 {
        self.set_info().set_size
    }

    fn set_info(&self) -> SetInfo {
        let tree = self.tree();
        if tree.is_update_in_progress() {
            return SetInfo::NONE;
        }
        let generation = tree.generation();
        if let Some(info) = tree
            .set_cache
            .borrow_mut()
            .refresh(generation)
            .get(&self.id())
            .copied()
        {
            return info;
        }

        let (info, computed) = self.compute_set_info();
        let mut cache = tree.set_cache.borrow_mut();
        let cache = cache.refresh(generation);
        cache.extend(computed);
        cache.insert(self.id(), info);
        info
    }

    /// Info for this node plus the sibling items that share its set
    fn compute_set_info(&self) -> (SetInfo, Vec<(AxNodeId, SetInfo)>) {
        if self.is_ignored() {
            return (SetInfo::NONE, Vec::new());
        }

        let (container, item) = if self.is_ordered_set() {
            (*self, None)
        } else if self.is_ordered_set_item() {
            let Some(container) = self.ordered_set() else {
                return (SetInfo::NONE, Vec::new());
            };
            if self.role() != Role::RadioButton && !container.role().ordered_set_accepts(self.role())
            {
                return (SetInfo::NONE, Vec::new());
            }
            (container, Some(*self))
        } else {
            return (SetInfo::NONE, Vec::new());
        };

        let radio = item.is_some_and(|item| item.role() == Role::RadioButton);
        let mut candidates = Vec::new();
        collect_candidates(container, container.role(), radio, &mut candidates);

        let items = match item {
            Some(item) => filter_around_item(&candidates, item),
            None => {
                let level = candidates.first().map_or(0, |node| node.hierarchical_level());
                candidates
                    .into_iter()
                    .filter(|node| node.hierarchical_level() == level)
                    .collect()
            }
        };

        let mut positions = Vec::with_capacity(items.len());
        let mut previous = 0;
        let mut largest_item_size = 0;
        for node in &items {
            let data = node.data();
            let pos = (previous + 1).max(data.get_int_attribute(IntAttribute::PosInSet));
            largest_item_size = largest_item_size.max(data.get_int_attribute(IntAttribute::SetSize));
            positions.push((node.id(), pos));
            previous = pos;
        }
        let set_size = (items.len() as i32)
            .max(previous)
            .max(largest_item_size)
            .max(container.data().get_int_attribute(IntAttribute::SetSize));

        let Some(item) = item else {
            // Item positions depend on each item's own level segment
            let container_info = SetInfo {
                pos_in_set: 0,
                set_size,
            };
            return (container_info, Vec::new());
        };
        let computed: Vec<(AxNodeId, SetInfo)> = positions
            .into_iter()
            .map(|(id, pos_in_set)| (id, SetInfo { pos_in_set, set_size }))
            .collect();
        let info = computed
            .iter()
            .find(|(id, _)| *id == item.id())
            .map_or(SetInfo::NONE, |(_, info)| *info);
        (info, computed)
    }
}

/// Items sharing the queried item's level. A shallower leveled item before
/// the query restarts the set; one after it ends the set.
fn filter_around_item<'a>(candidates: &[NodeRef<'a>], item: NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let level = item.hierarchical_level();
    let mut items = Vec::new();
    let mut passed = false;
    for candidate in candidates {
        let candidate_level = candidate.hierarchical_level();
        if level > 0 && candidate_level > 0 && candidate_level < level {
            if passed {
                break;
            }
            items.clear();
            continue;
        }
        if candidate_level == level {
            items.push(*candidate);
        }
        if candidate.id() == item.id() {
            passed = true;
        }
    }
    items
}
