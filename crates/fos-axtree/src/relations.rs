//! Reverse Relations
//!
//! For every node-id-valued attribute, maps a target node to the set of
//! nodes pointing at it. Also maps child tree ids to the nodes hosting them.
//! Entries are pruned as soon as they become empty so the index never
//! outgrows the live attribute set.

use crate::attributes::{IntAttribute, IntListAttribute, StringAttribute};
use crate::node_data::NodeData;
use crate::AxNodeId;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// attribute -> target -> sources
pub type ReverseRelationMap<A> = HashMap<A, HashMap<AxNodeId, HashSet<AxNodeId>>>;

#[derive(Debug, Default)]
pub(crate) struct RelationIndex {
    pub(crate) int: ReverseRelationMap<IntAttribute>,
    pub(crate) intlist: ReverseRelationMap<IntListAttribute>,
    pub(crate) child_trees: HashMap<String, HashSet<AxNodeId>>,
}

fn insert<A: Eq + Hash>(map: &mut ReverseRelationMap<A>, attr: A, target: AxNodeId, source: AxNodeId) {
    map.entry(attr)
        .or_default()
        .entry(target)
        .or_default()
        .insert(source);
}

fn erase<A: Eq + Hash>(map: &mut ReverseRelationMap<A>, attr: A, target: AxNodeId, source: AxNodeId) {
    let Some(targets) = map.get_mut(&attr) else {
        return;
    };
    if let Some(sources) = targets.get_mut(&target) {
        sources.remove(&source);
        if sources.is_empty() {
            targets.remove(&target);
        }
    }
    if targets.is_empty() {
        map.remove(&attr);
    }
}

impl RelationIndex {
    /// Index every relation `data` declares
    pub(crate) fn add(&mut self, data: &NodeData) {
        for (attr, target) in &data.int_attributes {
            if attr.is_node_id_attribute() {
                insert(&mut self.int, *attr, *target, data.id);
            }
        }
        for (attr, targets) in &data.intlist_attributes {
            if attr.is_node_id_attribute() {
                for target in targets {
                    insert(&mut self.intlist, *attr, *target, data.id);
                }
            }
        }
        if let Some(tree_id) = data.string_attribute(StringAttribute::ChildTreeId) {
            self.child_trees
                .entry(tree_id.to_string())
                .or_default()
                .insert(data.id);
        }
    }

    /// Drop every relation `data` declared
    pub(crate) fn remove(&mut self, data: &NodeData) {
        for (attr, target) in &data.int_attributes {
            if attr.is_node_id_attribute() {
                erase(&mut self.int, *attr, *target, data.id);
            }
        }
        for (attr, targets) in &data.intlist_attributes {
            if attr.is_node_id_attribute() {
                for target in targets {
                    erase(&mut self.intlist, *attr, *target, data.id);
                }
            }
        }
        if let Some(tree_id) = data.string_attribute(StringAttribute::ChildTreeId) {
            if let Some(hosts) = self.child_trees.get_mut(tree_id) {
                hosts.remove(&data.id);
                if hosts.is_empty() {
                    self.child_trees.remove(tree_id);
                }
            }
        }
    }

    pub(crate) fn int_sources(&self, attr: IntAttribute, target: AxNodeId) -> HashSet<AxNodeId> {
        self.int
            .get(&attr)
            .and_then(|targets| targets.get(&target))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn intlist_sources(
        &self,
        attr: IntListAttribute,
        target: AxNodeId,
    ) -> HashSet<AxNodeId> {
        self.intlist
            .get(&attr)
            .and_then(|targets| targets.get(&target))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn child_tree_hosts(&self, tree_id: &str) -> HashSet<AxNodeId> {
        self.child_trees.get(tree_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn test_add_then_remove_prunes_everything() {
        let mut data = NodeData::new(1, Role::TextField);
        data.add_int_attribute(IntAttribute::ActivedescendantId, 5);
        data.add_int_attribute(IntAttribute::ScrollX, 10);
        data.add_intlist_attribute(IntListAttribute::LabelledbyIds, vec![6, 7]);
        data.add_string_attribute(StringAttribute::ChildTreeId, "frame");

        let mut index = RelationIndex::default();
        index.add(&data);
        assert_eq!(index.int_sources(IntAttribute::ActivedescendantId, 5), HashSet::from([1]));
        assert!(index.int.get(&IntAttribute::ScrollX).is_none());
        assert_eq!(index.intlist_sources(IntListAttribute::LabelledbyIds, 7), HashSet::from([1]));
        assert_eq!(index.child_tree_hosts("frame"), HashSet::from([1]));

        index.remove(&data);
        assert!(index.int.is_empty());
        assert!(index.intlist.is_empty());
        assert!(index.child_trees.is_empty());
    }
}
