//! Edge case tests for fos-axtree
//!
//! Malformed updates, degenerate trees and randomized invariants.

use fos_axtree::{
    IntAttribute, IntListAttribute, NodeData, RectF, Role, Tree, TreeChangeRecorder, TreeError,
    TreeSerializer, TreeUpdate, INVALID_NODE_ID,
};
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

fn node(id: i32, children: &[i32]) -> NodeData {
    let mut data = NodeData::new(id, Role::GenericContainer);
    data.child_ids = children.to_vec();
    data
}

fn nodes_only(nodes: Vec<NodeData>) -> TreeUpdate {
    TreeUpdate {
        nodes,
        ..TreeUpdate::default()
    }
}

/// Update building a tree where node `i + 1` hangs below node
/// `parents[i] + 1`
fn shaped_update(parents: &[usize]) -> TreeUpdate {
    let mut nodes: Vec<NodeData> = (0..parents.len())
        .map(|i| NodeData::new(i as i32 + 1, Role::GenericContainer))
        .collect();
    for (i, parent) in parents.iter().enumerate().skip(1) {
        nodes[*parent].child_ids.push(i as i32 + 1);
    }
    TreeUpdate::with_root(1, nodes)
}

fn tree_shape() -> impl Strategy<Value = Vec<usize>> {
    (1usize..24).prop_flat_map(|n| (0..n).map(|i| 0..i.max(1)).collect::<Vec<_>>())
}

// ============================================================================
// Malformed input
// ============================================================================

#[test]
fn test_self_child_is_rejected() {
    let mut tree = Tree::new();
    let err = tree
        .unserialize(&TreeUpdate::with_root(1, vec![node(1, &[1])]))
        .unwrap_err();
    assert_eq!(
        err,
        TreeError::InvalidReparenting {
            node: 1,
            old_parent: INVALID_NODE_ID,
            new_parent: 1,
        }
    );
    assert_eq!(tree.error(), "Node 1 reparented from -1 to 1");
    assert_eq!(tree.size(), 0);
}

#[test]
fn test_cycle_through_existing_node_is_rejected() {
    let mut tree = Tree::from_update(&TreeUpdate::with_root(1, vec![node(1, &[2]), node(2, &[])]))
        .unwrap();
    let err = tree.unserialize(&nodes_only(vec![node(2, &[1])])).unwrap_err();
    assert_eq!(err.to_string(), "Node 1 reparented from -1 to 2");
    assert_eq!(tree.get(2).unwrap().child_count(), 0);
}

#[test]
fn test_node_mentioned_twice_uses_last_snapshot() {
    let mut first = node(2, &[]);
    first.set_name("first");
    let mut second = node(2, &[]);
    second.set_name("second");
    let tree = Tree::from_update(&TreeUpdate::with_root(1, vec![node(1, &[2]), first, second]))
        .unwrap();

    assert_eq!(tree.get(2).unwrap().name(), "second");
}

#[test]
fn test_clearing_unknown_node_is_harmless() {
    let mut tree = Tree::from_update(&TreeUpdate::with_root(1, vec![node(1, &[])])).unwrap();
    let mut update = TreeUpdate::new();
    update.node_id_to_clear = Some(42);
    tree.unserialize(&update).unwrap();
    assert_eq!(tree.size(), 1);
}

#[test]
fn test_clear_without_resending_is_pending() {
    let mut tree = Tree::from_update(&TreeUpdate::with_root(1, vec![node(1, &[2]), node(2, &[])]))
        .unwrap();
    let mut update = TreeUpdate::new();
    update.node_id_to_clear = Some(1);

    let err = tree.unserialize(&update).unwrap_err();
    assert_eq!(err, TreeError::PendingNodes(vec![1]));
    assert!(tree.contains(2));
}

#[test]
fn test_bogus_updates_never_panic() {
    let bogus = [
        TreeUpdate::with_root(-5, vec![node(-5, &[-5, 3])]),
        TreeUpdate::with_root(1, vec![node(1, &[2]), node(2, &[1])]),
        TreeUpdate::with_root(1, vec![node(2, &[]), node(1, &[2])]),
        nodes_only(vec![node(7, &[8]), node(8, &[7])]),
        TreeUpdate::with_root(3, vec![]),
    ];
    for update in &bogus {
        let mut tree =
            Tree::from_update(&TreeUpdate::with_root(1, vec![node(1, &[2]), node(2, &[])]))
                .unwrap();
        let before = tree.to_string();
        if tree.unserialize(update).is_err() {
            assert_eq!(tree.to_string(), before);
        }
    }
}

// ============================================================================
// Degenerate geometry and queries
// ============================================================================

#[test]
fn test_queries_on_removed_nodes() {
    let mut tree = Tree::from_update(&TreeUpdate::with_root(1, vec![node(1, &[2]), node(2, &[])]))
        .unwrap();
    tree.unserialize(&nodes_only(vec![node(1, &[])])).unwrap();

    assert!(tree.get(2).is_none());
    assert!(tree.tree_bounds(2, true).is_none());
    assert_eq!(tree.node_data(2).role, Role::Unknown);
}

#[test]
fn test_bounds_with_missing_offset_container_use_root() {
    let mut root = node(1, &[2]);
    root.set_bounds(RectF::from_xywh(10.0, 10.0, 100.0, 100.0));
    let mut child = node(2, &[]);
    child.set_bounds(RectF::from_xywh(5.0, 5.0, 10.0, 10.0));
    child.relative_bounds.offset_container_id = 99;
    let tree = Tree::from_update(&TreeUpdate::with_root(1, vec![root, child])).unwrap();

    assert_eq!(
        tree.tree_bounds(2, true).unwrap().rect,
        RectF::from_xywh(15.0, 15.0, 10.0, 10.0)
    );
}

#[test]
fn test_set_queries_during_update_are_zero() {
    struct SetSizeWatcher {
        seen: Vec<(i32, i32)>,
    }
    impl fos_axtree::TreeObserver for SetSizeWatcher {
        fn on_tree_event(&mut self, tree: &Tree, event: &fos_axtree::TreeEvent<'_>) {
            if let fos_axtree::TreeEvent::NodeCreated(id) = event {
                if let Some(node) = tree.get(*id) {
                    self.seen.push((node.pos_in_set(), node.set_size()));
                }
            }
        }
    }

    let mut tree = Tree::new();
    let watcher = Rc::new(RefCell::new(SetSizeWatcher { seen: Vec::new() }));
    tree.add_observer(watcher.clone());
    let mut list = NodeData::new(1, Role::List);
    list.child_ids = vec![2];
    tree.unserialize(&TreeUpdate::with_root(1, vec![list, NodeData::new(2, Role::ListItem)]))
        .unwrap();

    assert_eq!(watcher.borrow().seen, vec![(0, 0), (0, 0)]);
    assert_eq!(tree.get(2).unwrap().pos_in_set(), 1);
}

#[test]
fn test_item_without_container() {
    let tree = Tree::from_update(&TreeUpdate::with_root(
        1,
        vec![NodeData::new(1, Role::ListItem)],
    ))
    .unwrap();
    let root = tree.root().unwrap();
    assert_eq!((root.pos_in_set(), root.set_size()), (0, 0));
}

#[test]
fn test_recorder_counts_nothing_for_empty_update() {
    let mut tree = Tree::from_update(&TreeUpdate::with_root(1, vec![node(1, &[])])).unwrap();
    let recorder = Rc::new(RefCell::new(TreeChangeRecorder::new()));
    tree.add_observer(recorder.clone());
    let generation = tree.generation();

    tree.unserialize(&TreeUpdate::new()).unwrap();

    assert_eq!(recorder.borrow().event_count(), 0);
    assert_eq!(tree.generation(), generation);
}

/// Shaped tree where node `i + 1` points at `targets[i]` through both a
/// single and a list relation
fn related_update(parents: &[usize], targets: &[i32]) -> TreeUpdate {
    let mut update = shaped_update(parents);
    for (data, target) in update.nodes.iter_mut().zip(targets) {
        data.add_intlist_attribute(IntListAttribute::LabelledbyIds, vec![*target]);
        data.add_int_attribute(IntAttribute::MemberOfId, *target);
    }
    update
}

fn check_relations(tree: &Tree, count: usize, targets: &[i32]) -> Result<(), TestCaseError> {
    let mut total = 0;
    for target in 1..24 {
        let expected: HashSet<i32> = targets
            .iter()
            .take(count)
            .enumerate()
            .filter(|(_, t)| **t == target)
            .map(|(i, _)| i as i32 + 1)
            .collect();
        total += expected.len();
        prop_assert_eq!(
            tree.reverse_intlist_relations(IntListAttribute::LabelledbyIds, target),
            expected.clone()
        );
        prop_assert_eq!(tree.reverse_int_relations(IntAttribute::MemberOfId, target), expected);
    }
    let stored: usize = tree
        .int_reverse_relations()
        .values()
        .flat_map(|targets| targets.values())
        .map(|sources| sources.len())
        .sum();
    prop_assert_eq!(stored, total);
    Ok(())
}

// ============================================================================
// Randomized invariants
// ============================================================================

proptest! {
    #[test]
    fn prop_shaped_trees_link_correctly(parents in tree_shape()) {
        let tree = Tree::from_update(&shaped_update(&parents)).unwrap();
        prop_assert_eq!(tree.size(), parents.len());

        for i in 1..parents.len() {
            let node = tree.get(i as i32 + 1).unwrap();
            let parent = node.parent().unwrap();
            prop_assert_eq!(parent.id(), parents[i] as i32 + 1);
            prop_assert_eq!(parent.child_ids()[node.index_in_parent()], node.id());
        }
    }

    #[test]
    fn prop_full_serialization_round_trips(parents in tree_shape()) {
        let tree = Tree::from_update(&shaped_update(&parents)).unwrap();
        let copy = Tree::from_update(&TreeSerializer::serialize_full(&tree)).unwrap();
        prop_assert_eq!(copy.to_string(), tree.to_string());
    }

    #[test]
    fn prop_rejected_update_changes_nothing(parents in tree_shape(), extra in 100i32..200) {
        let mut tree = Tree::from_update(&shaped_update(&parents)).unwrap();
        let before = tree.to_string();
        let generation = tree.generation();

        let mut root = tree.root().unwrap().data().clone();
        root.child_ids.push(extra);
        prop_assert!(tree.unserialize(&nodes_only(vec![root])).is_err());

        prop_assert_eq!(tree.to_string(), before);
        prop_assert_eq!(tree.generation(), generation);
    }

    #[test]
    fn prop_reverse_relations_are_exact(
        parents in tree_shape(),
        targets in proptest::collection::vec(1i32..24, 0..24),
    ) {
        let tree = Tree::from_update(&related_update(&parents, &targets)).unwrap();
        check_relations(&tree, parents.len(), &targets)?;
    }

    #[test]
    fn prop_reverse_relations_exact_after_update(
        parents in tree_shape(),
        first in proptest::collection::vec(1i32..24, 0..24),
        second in proptest::collection::vec(1i32..24, 0..24),
    ) {
        let mut tree = Tree::from_update(&related_update(&parents, &first)).unwrap();
        let mut update = related_update(&parents, &second);
        update.root_id = None;
        tree.unserialize(&update).unwrap();
        check_relations(&tree, parents.len(), &second)?;
    }

    #[test]
    fn prop_ids_stay_unique_across_updates(first in tree_shape(), second in tree_shape()) {
        let mut tree = Tree::from_update(&shaped_update(&first)).unwrap();
        let mut update = shaped_update(&second);
        update.node_id_to_clear = Some(1);
        tree.unserialize(&update).unwrap();

        let ids: HashSet<i32> = tree.node_ids().collect();
        prop_assert_eq!(ids.len(), tree.size());
        prop_assert_eq!(tree.size(), second.len());
    }
}
