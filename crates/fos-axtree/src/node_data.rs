//! Node Data
//!
//! The snapshot of a single accessible element as carried by a tree update.
//! A node's payload is replaced wholesale whenever an update mentions it.

use crate::attributes::{
    BoolAttribute, CheckedState, FloatAttribute, IntAttribute, IntListAttribute, State,
    StringAttribute, TextDirection,
};
use crate::geometry::RectF;
use crate::role::Role;
use crate::transform::Transform;
use crate::{AxNodeId, INVALID_NODE_ID};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bounds relative to an offset container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeBounds {
    /// Node the bounds are relative to; the root when unset
    pub offset_container_id: AxNodeId,
    pub bounds: RectF,
    pub transform: Option<Transform>,
}

impl RelativeBounds {
    pub const EMPTY: Self = Self {
        offset_container_id: INVALID_NODE_ID,
        bounds: RectF::ZERO,
        transform: None,
    };
}

impl Default for RelativeBounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Snapshot of one accessible node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: AxNodeId,
    pub role: Role,
    /// Bit set of [`State`] masks
    pub state: u32,
    pub string_attributes: Vec<(StringAttribute, String)>,
    pub int_attributes: Vec<(IntAttribute, i32)>,
    pub float_attributes: Vec<(FloatAttribute, f32)>,
    pub bool_attributes: Vec<(BoolAttribute, bool)>,
    pub intlist_attributes: Vec<(IntListAttribute, Vec<i32>)>,
    /// Children in document order
    pub child_ids: Vec<AxNodeId>,
    pub relative_bounds: RelativeBounds,
}

fn find<K: Copy + PartialEq, V>(list: &[(K, V)], key: K) -> Option<&V> {
    list.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
}

fn upsert<K: Copy + PartialEq, V>(list: &mut Vec<(K, V)>, key: K, value: V) {
    match list.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => list.push((key, value)),
    }
}

fn remove<K: Copy + PartialEq, V>(list: &mut Vec<(K, V)>, key: K) {
    list.retain(|(k, _)| *k != key);
}

impl NodeData {
    /// Zeroed node, returned for lookups of unknown ids
    pub const EMPTY: Self = Self {
        id: INVALID_NODE_ID,
        role: Role::Unknown,
        state: 0,
        string_attributes: Vec::new(),
        int_attributes: Vec::new(),
        float_attributes: Vec::new(),
        bool_attributes: Vec::new(),
        intlist_attributes: Vec::new(),
        child_ids: Vec::new(),
        relative_bounds: RelativeBounds::EMPTY,
    };

    pub fn new(id: AxNodeId, role: Role) -> Self {
        Self {
            id,
            role,
            ..Self::EMPTY
        }
    }

    // States

    pub fn has_state(&self, state: State) -> bool {
        self.state & state.mask() != 0
    }

    pub fn add_state(&mut self, state: State) {
        self.state |= state.mask();
    }

    pub fn remove_state(&mut self, state: State) {
        self.state &= !state.mask();
    }

    /// Ignored by state or by role
    pub fn is_ignored(&self) -> bool {
        self.has_state(State::Ignored) || self.role == Role::Ignored
    }

    // String attributes

    pub fn has_string_attribute(&self, attr: StringAttribute) -> bool {
        find(&self.string_attributes, attr).is_some()
    }

    pub fn string_attribute(&self, attr: StringAttribute) -> Option<&str> {
        find(&self.string_attributes, attr).map(String::as_str)
    }

    /// Value, or the empty string when absent
    pub fn get_string_attribute(&self, attr: StringAttribute) -> &str {
        self.string_attribute(attr).unwrap_or("")
    }

    pub fn add_string_attribute(&mut self, attr: StringAttribute, value: impl Into<String>) {
        upsert(&mut self.string_attributes, attr, value.into());
    }

    pub fn remove_string_attribute(&mut self, attr: StringAttribute) {
        remove(&mut self.string_attributes, attr);
    }

    // Int attributes

    pub fn has_int_attribute(&self, attr: IntAttribute) -> bool {
        find(&self.int_attributes, attr).is_some()
    }

    pub fn int_attribute(&self, attr: IntAttribute) -> Option<i32> {
        find(&self.int_attributes, attr).copied()
    }

    /// Value, or 0 when absent
    pub fn get_int_attribute(&self, attr: IntAttribute) -> i32 {
        self.int_attribute(attr).unwrap_or(0)
    }

    pub fn add_int_attribute(&mut self, attr: IntAttribute, value: i32) {
        upsert(&mut self.int_attributes, attr, value);
    }

    pub fn remove_int_attribute(&mut self, attr: IntAttribute) {
        remove(&mut self.int_attributes, attr);
    }

    // Float attributes

    pub fn has_float_attribute(&self, attr: FloatAttribute) -> bool {
        find(&self.float_attributes, attr).is_some()
    }

    pub fn float_attribute(&self, attr: FloatAttribute) -> Option<f32> {
        find(&self.float_attributes, attr).copied()
    }

    pub fn get_float_attribute(&self, attr: FloatAttribute) -> f32 {
        self.float_attribute(attr).unwrap_or(0.0)
    }

    pub fn add_float_attribute(&mut self, attr: FloatAttribute, value: f32) {
        upsert(&mut self.float_attributes, attr, value);
    }

    pub fn remove_float_attribute(&mut self, attr: FloatAttribute) {
        remove(&mut self.float_attributes, attr);
    }

    // Bool attributes

    pub fn has_bool_attribute(&self, attr: BoolAttribute) -> bool {
        find(&self.bool_attributes, attr).is_some()
    }

    /// Value, or false when absent
    pub fn get_bool_attribute(&self, attr: BoolAttribute) -> bool {
        find(&self.bool_attributes, attr).copied().unwrap_or(false)
    }

    pub fn add_bool_attribute(&mut self, attr: BoolAttribute, value: bool) {
        upsert(&mut self.bool_attributes, attr, value);
    }

    pub fn remove_bool_attribute(&mut self, attr: BoolAttribute) {
        remove(&mut self.bool_attributes, attr);
    }

    // Int list attributes

    pub fn has_intlist_attribute(&self, attr: IntListAttribute) -> bool {
        find(&self.intlist_attributes, attr).is_some()
    }

    /// Values, or an empty slice when absent
    pub fn get_intlist_attribute(&self, attr: IntListAttribute) -> &[i32] {
        find(&self.intlist_attributes, attr).map_or(&[], Vec::as_slice)
    }

    pub fn add_intlist_attribute(&mut self, attr: IntListAttribute, values: Vec<i32>) {
        upsert(&mut self.intlist_attributes, attr, values);
    }

    pub fn remove_intlist_attribute(&mut self, attr: IntListAttribute) {
        remove(&mut self.intlist_attributes, attr);
    }

    // Convenience

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.add_string_attribute(StringAttribute::Name, name);
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.add_string_attribute(StringAttribute::Value, value);
    }

    pub fn checked_state(&self) -> CheckedState {
        CheckedState::from_i32(self.get_int_attribute(IntAttribute::CheckedState))
    }

    pub fn set_checked_state(&mut self, state: CheckedState) {
        if state == CheckedState::None {
            self.remove_int_attribute(IntAttribute::CheckedState);
        } else {
            self.add_int_attribute(IntAttribute::CheckedState, state as i32);
        }
    }

    pub fn text_direction(&self) -> TextDirection {
        TextDirection::from_i32(self.get_int_attribute(IntAttribute::TextDirection))
    }

    pub fn set_bounds(&mut self, bounds: RectF) {
        self.relative_bounds.bounds = bounds;
    }

    /// Compares everything except the id, child list and geometry
    pub fn same_attributes_as(&self, other: &NodeData) -> bool {
        self.role == other.role
            && self.state == other.state
            && self.string_attributes == other.string_attributes
            && self.int_attributes == other.int_attributes
            && self.float_attributes == other.float_attributes
            && self.bool_attributes == other.bool_attributes
            && self.intlist_attributes == other.intlist_attributes
    }
}

impl Default for NodeData {
    fn default() -> Self {
        Self::EMPTY
    }
}

pub(crate) fn join_ids(ids: &[i32]) -> String {
    ids.iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn join_ids_spaced(ids: &[i32]) -> String {
    ids.iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id={} {}", self.id, self.role)?;
        for state in State::ALL.iter().filter(|s| self.has_state(**s)) {
            write!(f, " {}", state.as_str().to_ascii_uppercase())?;
        }
        write!(f, " {}", self.relative_bounds.bounds)?;
        if self.relative_bounds.offset_container_id != INVALID_NODE_ID {
            write!(
                f,
                " offset_container_id={}",
                self.relative_bounds.offset_container_id
            )?;
        }
        if let Some(transform) = &self.relative_bounds.transform {
            write!(f, " transform={transform}")?;
        }
        for (attr, value) in &self.string_attributes {
            write!(f, " {attr}={value}")?;
        }
        for (attr, value) in &self.int_attributes {
            write!(f, " {attr}={value}")?;
        }
        for (attr, value) in &self.float_attributes {
            write!(f, " {attr}={value}")?;
        }
        for (attr, value) in &self.bool_attributes {
            write!(f, " {attr}={value}")?;
        }
        for (attr, values) in &self.intlist_attributes {
            write!(f, " {attr}={}", join_ids(values))?;
        }
        if !self.child_ids.is_empty() {
            write!(f, " child_ids={}", join_ids(&self.child_ids))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_defaults() {
        let data = NodeData::new(1, Role::Button);

        assert_eq!(data.get_string_attribute(StringAttribute::Name), "");
        assert_eq!(data.get_int_attribute(IntAttribute::ScrollX), 0);
        assert!(!data.get_bool_attribute(BoolAttribute::Busy));
        assert!(data.get_intlist_attribute(IntListAttribute::ControlsIds).is_empty());
        assert_eq!(data.int_attribute(IntAttribute::ScrollX), None);
    }

    #[test]
    fn test_add_replaces_existing() {
        let mut data = NodeData::new(1, Role::Button);
        data.set_name("first");
        data.set_name("second");

        assert_eq!(data.string_attributes.len(), 1);
        assert_eq!(data.get_string_attribute(StringAttribute::Name), "second");

        data.remove_string_attribute(StringAttribute::Name);
        assert!(!data.has_string_attribute(StringAttribute::Name));
    }

    #[test]
    fn test_states() {
        let mut data = NodeData::new(1, Role::Button);
        data.add_state(State::Focusable);
        data.add_state(State::Visited);

        assert!(data.has_state(State::Focusable));
        data.remove_state(State::Focusable);
        assert!(!data.has_state(State::Focusable));
        assert!(data.has_state(State::Visited));
    }

    #[test]
    fn test_checked_state_round_trip() {
        let mut data = NodeData::new(1, Role::CheckBox);
        data.set_checked_state(CheckedState::Mixed);
        assert_eq!(data.checked_state(), CheckedState::Mixed);

        data.set_checked_state(CheckedState::None);
        assert!(!data.has_int_attribute(IntAttribute::CheckedState));
    }

    #[test]
    fn test_display() {
        let mut data = NodeData::new(1, Role::Dialog);
        data.add_state(State::Focusable);
        data.set_bounds(RectF::from_xywh(0.0, 0.0, 800.0, 600.0));
        data.child_ids = vec![2, 3];

        assert_eq!(
            data.to_string(),
            "id=1 dialog FOCUSABLE (0, 0)-(800, 600) child_ids=2,3"
        );

        let mut named = NodeData::new(4, Role::CheckBox);
        named.set_name("Agree");
        named.add_intlist_attribute(IntListAttribute::ControlsIds, vec![5, 6]);
        assert_eq!(
            named.to_string(),
            "id=4 checkBox (0, 0)-(0, 0) name=Agree controlsIds=5,6"
        );
    }

    #[test]
    fn test_same_attributes_ignores_children_and_bounds() {
        let mut a = NodeData::new(1, Role::List);
        let mut b = a.clone();
        b.child_ids = vec![2];
        b.set_bounds(RectF::from_xywh(1.0, 1.0, 1.0, 1.0));
        assert!(a.same_attributes_as(&b));

        a.set_name("x");
        assert!(!a.same_attributes_as(&b));
    }
}
