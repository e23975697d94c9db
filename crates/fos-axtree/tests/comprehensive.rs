//! Comprehensive tests for fos-axtree
//!
//! Update diffing, observer notifications, reverse relations, bounds and
//! list/table projections on realistic trees.

use fos_axtree::{
    BoolAttribute, IntAttribute, IntListAttribute, NodeData, RectF, ReverseRelationMap, Role,
    State, StringAttribute, Tree, TreeChangeRecorder, TreeError, TreeSerializer, TreeUpdate,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn node(id: i32, children: &[i32]) -> NodeData {
    let mut data = NodeData::new(id, Role::GenericContainer);
    data.child_ids = children.to_vec();
    data
}

fn boxed(id: i32, rect: RectF, children: &[i32]) -> NodeData {
    let mut data = node(id, children);
    data.set_bounds(rect);
    data
}

fn nodes_only(nodes: Vec<NodeData>) -> TreeUpdate {
    TreeUpdate {
        nodes,
        ..TreeUpdate::default()
    }
}

fn observe(tree: &mut Tree) -> Rc<RefCell<TreeChangeRecorder>> {
    let recorder = Rc::new(RefCell::new(TreeChangeRecorder::new()));
    tree.add_observer(recorder.clone());
    recorder
}

// ============================================================================
// Update diffing
// ============================================================================

#[test]
fn test_observer_sees_replaced_root() {
    init_tracing();
    let mut tree = Tree::from_update(&TreeUpdate::with_root(1, vec![node(1, &[2]), node(2, &[])]))
        .unwrap();
    let recorder = observe(&mut tree);

    let mut update = TreeUpdate::with_root(3, vec![node(3, &[4]), node(4, &[])]);
    update.node_id_to_clear = Some(1);
    tree.unserialize(&update).unwrap();

    let recorder = recorder.borrow();
    assert_eq!(recorder.node_will_be_deleted, vec![1, 2]);
    assert_eq!(recorder.subtree_will_be_deleted, vec![1]);
    assert_eq!(recorder.node_created, vec![3, 4]);
    assert_eq!(recorder.subtree_creation_finished, vec![3]);
    assert_eq!(recorder.node_creation_finished, vec![4]);
    assert!(recorder.node_reparented.is_empty());
    assert!(recorder.root_changed);
    assert!(tree.get(1).is_none());
    assert_eq!(tree.root_id(), Some(3));
}

#[test]
fn test_old_root_reparented_under_new_root() {
    let mut tree = Tree::from_update(&TreeUpdate::with_root(
        1,
        vec![node(1, &[2, 3]), node(2, &[]), node(3, &[])],
    ))
    .unwrap();
    let recorder = observe(&mut tree);

    let mut update = TreeUpdate::with_root(
        4,
        vec![node(4, &[1]), node(1, &[2, 3]), node(2, &[]), node(3, &[])],
    );
    update.node_id_to_clear = Some(1);
    tree.unserialize(&update).unwrap();

    let recorder = recorder.borrow();
    assert!(recorder.node_will_be_deleted.is_empty());
    assert!(recorder.subtree_will_be_deleted.is_empty());
    assert_eq!(recorder.subtree_will_be_reparented, vec![1]);
    assert_eq!(recorder.node_will_be_reparented, vec![1, 2, 3]);
    assert_eq!(recorder.node_created, vec![4]);
    assert_eq!(recorder.subtree_creation_finished, vec![4]);
    assert_eq!(recorder.node_reparented_finished, vec![1, 2, 3]);
    assert!(recorder.subtree_reparented_finished.is_empty());
    assert!(recorder.root_changed);

    assert_eq!(tree.root_id(), Some(4));
    assert_eq!(tree.get(1).unwrap().parent().map(|n| n.id()), Some(4));
    assert_eq!(tree.size(), 4);
}

#[test]
fn test_subtree_reparent_without_root_change() {
    let mut tree = Tree::from_update(&TreeUpdate::with_root(
        1,
        vec![node(1, &[2]), node(2, &[3]), node(3, &[])],
    ))
    .unwrap();
    let recorder = observe(&mut tree);

    let mut update = TreeUpdate::with_root(1, vec![node(1, &[2, 3]), node(2, &[]), node(3, &[])]);
    update.node_id_to_clear = Some(1);
    tree.unserialize(&update).unwrap();

    let recorder = recorder.borrow();
    assert!(recorder.node_will_be_deleted.is_empty());
    assert!(recorder.node_created.is_empty());
    assert_eq!(recorder.subtree_reparented_finished, vec![2, 3]);
    assert!(recorder.node_reparented_finished.is_empty());
    assert_eq!(recorder.change_finished, vec![1]);
    assert!(!recorder.root_changed);

    let three = tree.get(3).unwrap();
    assert_eq!(three.parent().map(|n| n.id()), Some(1));
    assert_eq!(three.index_in_parent(), 1);
}

#[test]
fn test_move_between_parents_is_not_a_creation() {
    let mut tree = Tree::from_update(&TreeUpdate::with_root(
        1,
        vec![node(1, &[2, 3]), node(2, &[4]), node(3, &[]), node(4, &[])],
    ))
    .unwrap();
    let recorder = observe(&mut tree);

    tree.unserialize(&nodes_only(vec![node(2, &[]), node(3, &[4]), node(4, &[])]))
        .unwrap();

    let recorder = recorder.borrow();
    assert!(recorder.node_created.is_empty());
    assert!(recorder.node_will_be_deleted.is_empty());
    assert_eq!(recorder.node_will_be_reparented, vec![4]);
    assert_eq!(recorder.node_reparented, vec![4]);
    assert_eq!(recorder.subtree_reparented_finished, vec![4]);
    assert_eq!(recorder.change_finished, vec![2, 3]);
    assert_eq!(tree.get(4).unwrap().parent().map(|n| n.id()), Some(3));
}

#[test]
fn test_resending_a_cleared_subtree_only_reparents() {
    let mut tree = Tree::from_update(&TreeUpdate::with_root(1, vec![node(1, &[2]), node(2, &[])]))
        .unwrap();
    let recorder = observe(&mut tree);

    let mut update = nodes_only(vec![node(1, &[2]), node(2, &[])]);
    update.node_id_to_clear = Some(1);
    tree.unserialize(&update).unwrap();

    let recorder = recorder.borrow();
    assert!(recorder.node_will_be_deleted.is_empty());
    assert!(recorder.subtree_will_be_deleted.is_empty());
    assert!(recorder.node_created.is_empty());
    assert_eq!(recorder.subtree_reparented_finished, vec![2]);
    assert!(recorder.change_finished.is_empty());
}

#[test]
fn test_removed_and_changed_without_readding() {
    let mut tree = Tree::from_update(&TreeUpdate::with_root(
        1,
        vec![node(1, &[2, 3]), node(2, &[4]), node(3, &[]), node(4, &[])],
    ))
    .unwrap();
    let recorder = observe(&mut tree);

    let mut renamed = node(3, &[]);
    renamed.set_name("renamed");
    tree.unserialize(&nodes_only(vec![node(2, &[]), renamed])).unwrap();

    let recorder = recorder.borrow();
    assert_eq!(recorder.node_will_be_deleted, vec![4]);
    assert_eq!(recorder.subtree_will_be_deleted, vec![4]);
    assert!(recorder.node_will_be_reparented.is_empty());
    assert!(recorder.node_reparented_finished.is_empty());
    assert!(recorder.subtree_reparented_finished.is_empty());
    assert_eq!(recorder.change_finished, vec![2, 3]);
    assert_eq!(recorder.attribute_change_log, vec!["name changed from  to renamed"]);
    assert!(tree.get(4).is_none());
}

#[test]
fn test_attribute_change_log() {
    let mut button = NodeData::new(1, Role::Button);
    button.set_name("N1");
    button.add_string_attribute(StringAttribute::Description, "D1");
    button.add_bool_attribute(BoolAttribute::LiveAtomic, true);
    let mut tree = Tree::from_update(&TreeUpdate::with_root(1, vec![button])).unwrap();
    let recorder = observe(&mut tree);

    let mut check = NodeData::new(1, Role::CheckBox);
    check.set_name("N2");
    check.add_state(State::Visited);
    check.add_int_attribute(IntAttribute::ScrollX, 5);
    tree.unserialize(&nodes_only(vec![check])).unwrap();

    assert_eq!(
        recorder.borrow_mut().take_attribute_change_log(),
        vec![
            "Role changed from button to checkBox",
            "visited changed to true",
            "description changed from D1 to ",
            "name changed from N1 to N2",
            "liveAtomic changed to false",
            "scrollX changed from 0 to 5",
        ]
    );
    assert_eq!(recorder.borrow().node_data_will_change, vec![1]);
}

#[test]
fn test_tree_data_change_notified_after_update() {
    let mut tree = Tree::from_update(&TreeUpdate::with_root(1, vec![node(1, &[])])).unwrap();
    let recorder = observe(&mut tree);

    let mut update = TreeUpdate::new();
    update.has_tree_data = true;
    update.tree_data.title = "New title".into();
    tree.unserialize(&update).unwrap();

    assert!(recorder.borrow().tree_data_changed);
    assert_eq!(tree.data().title, "New title");

    let recorder_again = observe(&mut tree);
    tree.unserialize(&update).unwrap();
    assert!(!recorder_again.borrow().tree_data_changed);
}

// ============================================================================
// Rejected updates
// ============================================================================

#[test]
fn test_rejection_reasons() {
    let mut tree = Tree::from_update(&TreeUpdate::with_root(
        1,
        vec![node(1, &[2, 3]), node(2, &[4]), node(3, &[]), node(4, &[])],
    ))
    .unwrap();
    let before = tree.to_string();

    let cases = [
        (
            nodes_only(vec![node(1, &[2, 3, 5, 6]), node(5, &[])]),
            "Nodes left pending by the update: 6",
        ),
        (
            nodes_only(vec![node(1, &[2, 3, 7, 8])]),
            "Nodes left pending by the update: 7, 8",
        ),
        (
            nodes_only(vec![node(1, &[2, 2, 3])]),
            "Node 1 has duplicate child id 2",
        ),
        (
            nodes_only(vec![node(3, &[4])]),
            "Node 4 reparented from 2 to 3",
        ),
        (
            nodes_only(vec![node(9, &[])]),
            "9 will not be in the tree and is not the new root",
        ),
    ];

    for (update, reason) in cases {
        let err = tree.unserialize(&update).unwrap_err();
        assert_eq!(err.to_string(), reason);
        assert_eq!(tree.error(), reason);
        assert_eq!(tree.to_string(), before, "tree changed by rejected update");
    }
}

#[test]
fn test_first_update_needs_a_root() {
    let mut tree = Tree::new();
    let err = tree.unserialize(&nodes_only(vec![node(1, &[])])).unwrap_err();
    assert_eq!(err, TreeError::NotInTree { id: 1 });
    assert!(tree.root().is_none());
}

// ============================================================================
// Reverse relations
// ============================================================================

#[test]
fn test_reverse_relations_follow_updates() {
    let mut field = NodeData::new(2, Role::TextField);
    field.add_intlist_attribute(IntListAttribute::LabelledbyIds, vec![3]);
    field.add_int_attribute(IntAttribute::ActivedescendantId, 4);
    let mut tree = Tree::from_update(&TreeUpdate::with_root(
        1,
        vec![node(1, &[2, 3, 4]), field, node(3, &[]), node(4, &[])],
    ))
    .unwrap();

    assert_eq!(
        tree.reverse_intlist_relations(IntListAttribute::LabelledbyIds, 3),
        HashSet::from([2])
    );
    assert_eq!(
        tree.reverse_int_relations(IntAttribute::ActivedescendantId, 4),
        HashSet::from([2])
    );

    tree.unserialize(&nodes_only(vec![NodeData::new(2, Role::TextField)]))
        .unwrap();
    assert!(tree.reverse_intlist_relations(IntListAttribute::LabelledbyIds, 3).is_empty());
    assert!(tree.int_reverse_relations().is_empty());
    assert!(tree.intlist_reverse_relations().is_empty());
}

/// Number of (target keys, source entries) held by a reverse relation map
fn relation_totals<A>(map: &ReverseRelationMap<A>) -> (usize, usize) {
    let targets = map.values().map(|targets| targets.len()).sum();
    let sources = map
        .values()
        .flat_map(|targets| targets.values())
        .map(|sources| sources.len())
        .sum();
    (targets, sources)
}

#[test]
fn test_reverse_relations_stay_bounded() {
    let mut tree = Tree::from_update(&TreeUpdate::with_root(
        1,
        vec![node(1, &[2, 10]), node(2, &[]), node(10, &[])],
    ))
    .unwrap();

    // Each cycle replaces the last child with a fresh id, deleting the old one
    for extra in 11..1011 {
        let mut root = node(1, &[2, extra]);
        root.add_intlist_attribute(IntListAttribute::ControlsIds, vec![2, extra]);
        root.add_int_attribute(IntAttribute::ActivedescendantId, extra);
        let mut child = node(extra, &[]);
        child.add_int_attribute(IntAttribute::MemberOfId, 1);
        child.add_intlist_attribute(IntListAttribute::DescribedbyIds, vec![2]);
        tree.unserialize(&nodes_only(vec![root, child])).unwrap();
        assert!(tree.get(extra - 1).is_none());
    }

    assert_eq!(relation_totals(tree.int_reverse_relations()), (2, 2));
    assert_eq!(relation_totals(tree.intlist_reverse_relations()), (3, 3));
    assert_eq!(
        tree.reverse_int_relations(IntAttribute::MemberOfId, 1),
        HashSet::from([1010])
    );
    assert_eq!(
        tree.reverse_intlist_relations(IntListAttribute::DescribedbyIds, 2),
        HashSet::from([1010])
    );

    tree.unserialize(&nodes_only(vec![node(1, &[2])])).unwrap();
    assert_eq!(relation_totals(tree.int_reverse_relations()), (0, 0));
    assert_eq!(relation_totals(tree.intlist_reverse_relations()), (0, 0));
}

#[test]
fn test_child_tree_hosts() {
    let mut host = node(2, &[]);
    host.add_string_attribute(StringAttribute::ChildTreeId, "frame-a");
    let mut tree =
        Tree::from_update(&TreeUpdate::with_root(1, vec![node(1, &[2]), host])).unwrap();
    assert_eq!(tree.node_ids_for_child_tree_id("frame-a"), HashSet::from([2]));

    let mut moved = node(2, &[]);
    moved.add_string_attribute(StringAttribute::ChildTreeId, "frame-b");
    tree.unserialize(&nodes_only(vec![moved])).unwrap();

    assert!(tree.node_ids_for_child_tree_id("frame-a").is_empty());
    assert_eq!(tree.node_ids_for_child_tree_id("frame-b"), HashSet::from([2]));
}

// ============================================================================
// Bounds
// ============================================================================

#[test]
fn test_offset_container_and_scroll() {
    let root = boxed(1, RectF::from_xywh(0.0, 0.0, 800.0, 600.0), &[2]);
    let container = boxed(2, RectF::from_xywh(100.0, 50.0, 600.0, 500.0), &[3]);
    let mut inner = boxed(3, RectF::from_xywh(20.0, 30.0, 50.0, 25.0), &[]);
    inner.relative_bounds.offset_container_id = 2;
    let mut tree =
        Tree::from_update(&TreeUpdate::with_root(1, vec![root, container, inner])).unwrap();

    assert_eq!(
        tree.tree_bounds(3, true).unwrap().rect,
        RectF::from_xywh(120.0, 80.0, 50.0, 25.0)
    );

    let mut scrolled = boxed(2, RectF::from_xywh(100.0, 50.0, 600.0, 500.0), &[3]);
    scrolled.add_int_attribute(IntAttribute::ScrollX, 5);
    scrolled.add_int_attribute(IntAttribute::ScrollY, 10);
    tree.unserialize(&nodes_only(vec![scrolled])).unwrap();
    assert_eq!(
        tree.tree_bounds(3, true).unwrap().rect,
        RectF::from_xywh(115.0, 70.0, 50.0, 25.0)
    );
}

#[test]
fn test_scroll_needs_both_axes() {
    let root = boxed(1, RectF::from_xywh(0.0, 0.0, 800.0, 600.0), &[2]);
    let mut container = boxed(2, RectF::from_xywh(100.0, 50.0, 600.0, 500.0), &[3]);
    container.add_int_attribute(IntAttribute::ScrollX, 5);
    let mut inner = boxed(3, RectF::from_xywh(20.0, 30.0, 50.0, 25.0), &[]);
    inner.relative_bounds.offset_container_id = 2;
    let tree = Tree::from_update(&TreeUpdate::with_root(1, vec![root, container, inner])).unwrap();

    assert_eq!(
        tree.tree_bounds(3, true).unwrap().rect,
        RectF::from_xywh(120.0, 80.0, 50.0, 25.0)
    );
}

#[test]
fn test_clipping_to_root() {
    let mut root = boxed(1, RectF::from_xywh(0.0, 0.0, 800.0, 600.0), &[2, 3, 4]);
    root.add_bool_attribute(BoolAttribute::ClipsChildren, true);
    let tree = Tree::from_update(&TreeUpdate::with_root(
        1,
        vec![
            root,
            boxed(2, RectF::from_xywh(700.0, 500.0, 150.0, 150.0), &[]),
            boxed(3, RectF::from_xywh(50.0, -200.0, 150.0, 150.0), &[]),
            boxed(4, RectF::from_xywh(50.0, 700.0, 150.0, 150.0), &[]),
        ],
    ))
    .unwrap();

    let clipped = tree.tree_bounds(2, true).unwrap();
    assert_eq!(clipped.rect, RectF::from_xywh(700.0, 500.0, 100.0, 100.0));
    assert!(!clipped.offscreen);
    let unclipped = tree.tree_bounds(2, false).unwrap();
    assert_eq!(unclipped.rect, RectF::from_xywh(700.0, 500.0, 150.0, 150.0));

    let above = tree.tree_bounds(3, true).unwrap();
    assert_eq!(above.rect, RectF::from_xywh(50.0, 0.0, 150.0, 1.0));
    assert!(above.offscreen);
    let above_unclipped = tree.tree_bounds(3, false).unwrap();
    assert_eq!(above_unclipped.rect, RectF::from_xywh(50.0, -200.0, 150.0, 150.0));
    assert!(above_unclipped.offscreen);

    let below = tree.tree_bounds(4, true).unwrap();
    assert_eq!(below.rect, RectF::from_xywh(50.0, 599.0, 150.0, 1.0));
    assert!(tree.is_offscreen(4));
    assert!(!tree.is_offscreen(2));
}

#[test]
fn test_empty_node_uses_union_of_children() {
    let tree = Tree::from_update(&TreeUpdate::with_root(
        1,
        vec![
            boxed(1, RectF::from_xywh(0.0, 0.0, 800.0, 600.0), &[2]),
            boxed(2, RectF::ZERO, &[3, 4]),
            boxed(3, RectF::from_xywh(100.0, 10.0, 150.0, 30.0), &[]),
            boxed(4, RectF::from_xywh(300.0, 30.0, 300.0, 20.0), &[]),
        ],
    ))
    .unwrap();

    let bounds = tree.tree_bounds(2, true).unwrap();
    assert_eq!(bounds.rect, RectF::from_xywh(100.0, 10.0, 500.0, 40.0));
    assert!(!bounds.offscreen);
}

#[test]
fn test_empty_leaf_inherits_ancestor_bounds() {
    let tree = Tree::from_update(&TreeUpdate::with_root(
        1,
        vec![
            boxed(1, RectF::from_xywh(0.0, 0.0, 800.0, 600.0), &[2, 3]),
            boxed(2, RectF::ZERO, &[]),
            boxed(3, RectF::from_xywh(100.0, 50.0, 0.0, 0.0), &[]),
        ],
    ))
    .unwrap();

    let whole = tree.tree_bounds(2, true).unwrap();
    assert_eq!(whole.rect, RectF::from_xywh(0.0, 0.0, 800.0, 600.0));
    assert!(!whole.offscreen);

    let extended = tree.tree_bounds(3, true).unwrap();
    assert_eq!(extended.rect, RectF::from_xywh(100.0, 50.0, 700.0, 550.0));
    assert!(!extended.offscreen);
}

// ============================================================================
// Traversal and projections
// ============================================================================

#[test]
fn test_unignored_children_through_nested_ignored_nodes() {
    let mut outer = node(2, &[6]);
    outer.add_state(State::Ignored);
    let mut inner = node(6, &[4, 5]);
    inner.role = Role::Ignored;
    let tree = Tree::from_update(&TreeUpdate::with_root(
        1,
        vec![node(1, &[2, 3]), outer, node(3, &[]), inner, node(4, &[]), node(5, &[])],
    ))
    .unwrap();

    let ids: Vec<_> = tree
        .root()
        .unwrap()
        .unignored_children()
        .iter()
        .map(|n| n.id())
        .collect();
    assert_eq!(ids, vec![4, 5, 3]);
    assert_eq!(tree.get(4).unwrap().unignored_parent().map(|n| n.id()), Some(1));
    assert_eq!(tree.get(3).unwrap().unignored_index_in_parent(), 2);
}

#[test]
fn test_list_positions_after_insert() {
    let item = |id: i32| NodeData::new(id, Role::ListItem);
    let mut list = NodeData::new(1, Role::List);
    list.child_ids = vec![2, 3];
    let mut tree = Tree::from_update(&TreeUpdate::with_root(1, vec![list, item(2), item(3)]))
        .unwrap();
    assert_eq!(tree.get(3).unwrap().pos_in_set(), 2);

    let mut list = NodeData::new(1, Role::List);
    list.child_ids = vec![4, 2, 3];
    tree.unserialize(&nodes_only(vec![list, item(4)])).unwrap();

    assert_eq!(tree.get(4).unwrap().pos_in_set(), 1);
    assert_eq!(tree.get(3).unwrap().pos_in_set(), 3);
    assert_eq!(tree.get(3).unwrap().set_size(), 3);
}

#[test]
fn test_table_projection_rebuilt_after_update() {
    let row = |id: i32, cells: &[i32]| {
        let mut data = NodeData::new(id, Role::Row);
        data.child_ids = cells.to_vec();
        data
    };
    let cell = |id: i32| NodeData::new(id, Role::Cell);
    let mut table = NodeData::new(1, Role::Table);
    table.child_ids = vec![2];
    let mut tree = Tree::from_update(&TreeUpdate::with_root(
        1,
        vec![table.clone(), row(2, &[3, 4]), cell(3), cell(4)],
    ))
    .unwrap();
    assert_eq!(tree.get(1).unwrap().table_row_count(), Some(1));

    table.child_ids = vec![2, 5];
    tree.unserialize(&nodes_only(vec![table, row(5, &[6]), cell(6)]))
        .unwrap();

    let table = tree.get(1).unwrap();
    assert_eq!(table.table_row_count(), Some(2));
    assert_eq!(table.table_col_count(), Some(2));
    assert_eq!(table.table_cell_from_coords(1, 0).map(|n| n.id()), Some(6));
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_serializer_round_trip() {
    let mut root = boxed(1, RectF::from_xywh(0.0, 0.0, 800.0, 600.0), &[2, 3]);
    root.role = Role::RootWebArea;
    let mut button = NodeData::new(2, Role::Button);
    button.set_name("OK");
    button.add_state(State::Focusable);
    let mut update = TreeUpdate::with_root(1, vec![root, button, node(3, &[])]);
    update.has_tree_data = true;
    update.tree_data.title = "Page".into();
    let tree = Tree::from_update(&update).unwrap();

    let copy = Tree::from_update(&TreeSerializer::serialize_full(&tree)).unwrap();
    assert_eq!(copy.to_string(), tree.to_string());
}

#[test]
fn test_update_json_round_trip() {
    let mut button = NodeData::new(2, Role::Button);
    button.set_name("OK");
    button.add_intlist_attribute(IntListAttribute::ControlsIds, vec![3]);
    let update = TreeUpdate::with_root(1, vec![node(1, &[2]), button]);

    let json = serde_json::to_string(&update).unwrap();
    let decoded: TreeUpdate = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded, update);
    let tree = Tree::from_update(&decoded).unwrap();
    assert_eq!(tree.get(2).unwrap().name(), "OK");
}
