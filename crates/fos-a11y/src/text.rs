//! Text Content
//!
//! Inner text, hypertext and the derived strings platform APIs expose.
//! Offsets into these strings count characters.

use fos_axtree::{Role, State, StringAttribute};

use crate::node::AccessibleNode;

/// Character standing in for an embedded non-text child in hypertext
pub const EMBEDDED_OBJECT_CHARACTER: char = '\u{FFFC}';

impl AccessibleNode<'_> {
    /// Value, or the name of a text run, or the children's inner text
    pub fn inner_text(&self) -> String {
        let value = self.node().value();
        if !value.is_empty() {
            return value.to_string();
        }
        if self.is_text_only_object() {
            return self.name().to_string();
        }
        self.internal_children()
            .map(|child| child.inner_text())
            .collect()
    }

    /// Length of [`inner_text`](Self::inner_text) in characters
    pub fn inner_text_length(&self) -> i32 {
        self.inner_text().chars().count() as i32
    }

    /// Text of this object with every non-text platform child replaced by
    /// [`EMBEDDED_OBJECT_CHARACTER`]
    pub fn hypertext(&self) -> String {
        if self.platform_is_leaf() {
            return self.inner_text();
        }
        let mut text = String::new();
        for child in self.platform_children() {
            if child.is_text_only_object() {
                text.push_str(&child.hypertext());
            } else {
                text.push(EMBEDDED_OBJECT_CHARACTER);
            }
        }
        text
    }

    pub fn hypertext_length(&self) -> i32 {
        self.hypertext().chars().count() as i32
    }

    /// Value attribute; rich text fields without one report their inner text
    pub fn value(&self) -> String {
        let value = self.node().value();
        if value.is_empty() && self.is_rich_text_field() {
            return self.inner_text();
        }
        value.to_string()
    }

    /// Names of the descendants joined by spaces. Children without a name
    /// contribute their own descendants unless they are focusable.
    pub fn accessible_name_from_descendants(&self) -> String {
        let mut parts = Vec::new();
        for child in self.internal_children() {
            if let Some(name) = child.data().string_attribute(StringAttribute::Name) {
                parts.push(name.to_string());
            } else if !child.has_state(State::Focusable) {
                let name = child.accessible_name_from_descendants();
                if !name.is_empty() {
                    parts.push(name);
                }
            }
        }
        parts.join(" ")
    }

    /// Text announced when this node changes inside a live region
    pub fn live_region_text(&self) -> String {
        if self.role() == Role::Ignored {
            return String::new();
        }
        let name = self.name();
        if !name.is_empty() {
            return name.to_string();
        }
        self.internal_children()
            .map(|child| child.live_region_text())
            .collect()
    }

    /// Offsets at which visual lines start within this node's text
    pub fn line_start_offsets(&self) -> Vec<i32> {
        self.node().line_start_offsets()
    }
}
