//! Tree Data
//!
//! Tree-scoped metadata: identity, document info, focus and selection.

use crate::{AxNodeId, INVALID_NODE_ID};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata that belongs to the tree rather than to a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeData {
    pub tree_id: String,
    pub parent_tree_id: String,
    pub focused_tree_id: String,
    pub title: String,
    pub url: String,
    pub doctype: String,
    pub mimetype: String,
    pub loaded: bool,
    pub loading_progress: f32,
    pub focus_id: AxNodeId,
    pub sel_anchor_object_id: AxNodeId,
    pub sel_anchor_offset: i32,
    pub sel_focus_object_id: AxNodeId,
    pub sel_focus_offset: i32,
}

impl Default for TreeData {
    fn default() -> Self {
        Self {
            tree_id: String::new(),
            parent_tree_id: String::new(),
            focused_tree_id: String::new(),
            title: String::new(),
            url: String::new(),
            doctype: String::new(),
            mimetype: String::new(),
            loaded: false,
            loading_progress: 0.0,
            focus_id: INVALID_NODE_ID,
            sel_anchor_object_id: INVALID_NODE_ID,
            sel_anchor_offset: -1,
            sel_focus_object_id: INVALID_NODE_ID,
            sel_focus_offset: -1,
        }
    }
}

impl TreeData {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// True when a selection anchor and focus are both set
    pub fn has_selection(&self) -> bool {
        self.sel_anchor_object_id != INVALID_NODE_ID && self.sel_focus_object_id != INVALID_NODE_ID
    }
}

/// Only fields that differ from their defaults are written, each with a
/// leading space.
impl fmt::Display for TreeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strings = [
            ("tree_id", &self.tree_id),
            ("parent_tree_id", &self.parent_tree_id),
            ("focused_tree_id", &self.focused_tree_id),
            ("title", &self.title),
            ("url", &self.url),
            ("doctype", &self.doctype),
            ("mimetype", &self.mimetype),
        ];
        for (key, value) in strings {
            if !value.is_empty() {
                write!(f, " {key}={value}")?;
            }
        }
        if self.loaded {
            write!(f, " loaded=true")?;
        }
        if self.loading_progress != 0.0 {
            write!(f, " loading_progress={}", self.loading_progress)?;
        }
        if self.focus_id != INVALID_NODE_ID {
            write!(f, " focus_id={}", self.focus_id)?;
        }
        if self.has_selection() {
            write!(
                f,
                " sel_anchor_object_id={} sel_anchor_offset={} sel_focus_object_id={} sel_focus_offset={}",
                self.sel_anchor_object_id,
                self.sel_anchor_offset,
                self.sel_focus_object_id,
                self.sel_focus_offset
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_skips_defaults() {
        assert_eq!(TreeData::default().to_string(), "");
        assert_eq!(TreeData::with_title("Title").to_string(), " title=Title");

        let mut data = TreeData::with_title("Doc");
        data.focus_id = 4;
        data.loaded = true;
        assert_eq!(data.to_string(), " title=Doc loaded=true focus_id=4");
    }
}
