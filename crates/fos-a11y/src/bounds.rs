//! Platform Bounds
//!
//! Node and text-range bounds in frame, root-frame and screen coordinates,
//! caret rects past the end of text, and approximate hit testing.

use fos_axtree::{IntAttribute, IntListAttribute, Rect, RectF, Role, TextDirection};

use crate::node::AccessibleNode;

/// Coordinate space of a platform rect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSystem {
    /// Relative to the frame that contains the node
    Frame,
    /// Relative to the top-level frame
    RootFrame,
    /// Relative to the screen
    Screen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClippingBehavior {
    Clipped,
    Unclipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OffscreenResult {
    #[default]
    Onscreen,
    Offscreen,
}

impl OffscreenResult {
    fn from_flag(offscreen: bool) -> Self {
        if offscreen {
            Self::Offscreen
        } else {
            Self::Onscreen
        }
    }
}

/// Integer rect reported to platform APIs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformBounds {
    pub rect: Rect,
    pub offscreen: OffscreenResult,
}

const CARET_THICKNESS: i32 = 1;

impl<'a> AccessibleNode<'a> {
    /// Bounds of the whole node
    pub fn bounds_rect(
        &self,
        system: CoordinateSystem,
        clipping: ClippingBehavior,
    ) -> PlatformBounds {
        self.relative_to_absolute_bounds(RectF::ZERO, system, clipping)
    }

    pub fn clipped_screen_bounds(&self) -> Rect {
        self.bounds_rect(CoordinateSystem::Screen, ClippingBehavior::Clipped)
            .rect
    }

    pub fn clipped_root_frame_bounds(&self) -> Rect {
        self.bounds_rect(CoordinateSystem::RootFrame, ClippingBehavior::Clipped)
            .rect
    }

    /// Map `bounds`, relative to this node, into `system`. A zero-sized
    /// rect stands for the node's own bounds.
    pub fn relative_to_absolute_bounds(
        &self,
        bounds: RectF,
        system: CoordinateSystem,
        clipping: ClippingBehavior,
    ) -> PlatformBounds {
        let tree = self.tree();
        let Some(tree_bounds) = tree.relative_to_tree_bounds(
            self.id(),
            bounds,
            clipping == ClippingBehavior::Clipped,
        ) else {
            return PlatformBounds::default();
        };

        let config = self.manager().config();
        let mut rect = tree_bounds.rect;
        if !config.use_root_scroll_offsets {
            if let Some(root) = tree.root() {
                let data = root.data();
                if let (Some(scroll_x), Some(scroll_y)) = (
                    data.int_attribute(IntAttribute::ScrollX),
                    data.int_attribute(IntAttribute::ScrollY),
                ) {
                    rect.offset(scroll_x as f32, scroll_y as f32);
                }
            }
        }
        if system == CoordinateSystem::Screen {
            rect.offset(config.view_bounds.x as f32, config.view_bounds.y as f32);
        }

        PlatformBounds {
            rect: rect.to_enclosing_rect(),
            offscreen: OffscreenResult::from_flag(tree_bounds.offscreen),
        }
    }

    /// Whether a clipping container hides this node completely
    pub fn is_offscreen(&self) -> bool {
        self.bounds_rect(CoordinateSystem::RootFrame, ClippingBehavior::Clipped)
            .offscreen
            == OffscreenResult::Offscreen
    }

    // ------------------------------------------------------------------
    // Text ranges
    // ------------------------------------------------------------------

    /// Bounds of the hypertext range `start..end`. Reversed offsets are
    /// swapped; empty or out-of-range requests give an empty rect.
    pub fn hypertext_range_bounds(
        &self,
        start: i32,
        end: i32,
        system: CoordinateSystem,
        clipping: ClippingBehavior,
    ) -> PlatformBounds {
        if start == end {
            return PlatformBounds::default();
        }
        let (start, end) = if start > end { (end, start) } else { (start, end) };

        let length = self.hypertext_length();
        if start < 0 || start >= length || end < 0 || end > length {
            return PlatformBounds::default();
        }

        let mut offscreen = OffscreenResult::Onscreen;
        let rect = match system {
            CoordinateSystem::Frame => {
                tracing::warn!(
                    id = self.id(),
                    "hypertext range bounds are not available in frame coordinates"
                );
                return PlatformBounds::default();
            }
            CoordinateSystem::RootFrame => {
                self.root_frame_hypertext_range_bounds(start, end - start, clipping, &mut offscreen)
            }
            CoordinateSystem::Screen => {
                let mut rect = self.root_frame_hypertext_range_bounds(
                    start,
                    end - start,
                    clipping,
                    &mut offscreen,
                );
                let view = self.manager().config().view_bounds;
                rect.offset(view.x, view.y);
                rect
            }
        };
        PlatformBounds { rect, offscreen }
    }

    fn root_frame_hypertext_range_bounds(
        &self,
        start: i32,
        len: i32,
        clipping: ClippingBehavior,
        offscreen: &mut OffscreenResult,
    ) -> Rect {
        // Text fields keep their text in a single inner container
        if self.is_plain_text_field() && self.internal_child_count() == 1 {
            if let Some(inner) = self.internal_child_at(0) {
                return inner.root_frame_hypertext_range_bounds(start, len, clipping, offscreen);
            }
        }

        if self.role() != Role::StaticText {
            let mut start = start;
            let mut len = len;
            let mut bounds = Rect::default();
            for child in self.internal_children() {
                if len <= 0 {
                    break;
                }
                let is_text = child.is_text_only_object();
                let child_length = if is_text { child.hypertext_length() } else { 1 };
                if start < child_length {
                    let child_rect = if is_text {
                        child.root_frame_hypertext_range_bounds(start, len, clipping, offscreen)
                    } else {
                        child.root_frame_hypertext_range_bounds(
                            0,
                            child.hypertext_length(),
                            clipping,
                            offscreen,
                        )
                    };
                    bounds = bounds.union(&child_rect);
                    len -= child_length - start;
                }
                start = if start > child_length { start - child_length } else { 0 };
            }
            return if bounds.is_empty() {
                self.past_end_of_text_bounds(clipping, offscreen)
            } else {
                bounds
            };
        }

        let end = start + len;
        let mut child_end = 0;
        let mut bounds = Rect::default();
        for child in self.internal_children() {
            if child_end >= end {
                break;
            }
            if child.role() != Role::InlineTextBox {
                tracing::debug!(
                    id = child.id(),
                    "static text child is not an inline text box"
                );
                continue;
            }

            let child_length = child.hypertext_length();
            let child_start = child_end;
            child_end += child_length;
            if child_end < start {
                continue;
            }

            let local_start = start.max(child_start) - child_start;
            let local_end = end.min(child_end) - child_start;
            let child_bounds = child.relative_to_absolute_bounds(
                child.inline_text_rect(local_start, local_end, child_length),
                CoordinateSystem::RootFrame,
                clipping,
            );
            *offscreen = child_bounds.offscreen;
            bounds = if bounds.width == 0 && bounds.height == 0 {
                child_bounds.rect
            } else {
                bounds.union(&child_bounds.rect)
            };
        }
        bounds
    }

    /// Caret rect just past the end of this node's text
    fn past_end_of_text_bounds(
        &self,
        clipping: ClippingBehavior,
        offscreen: &mut OffscreenResult,
    ) -> Rect {
        let last_child_end = self.internal_children().last().map(|child| {
            let length = child.hypertext_length();
            child.root_frame_hypertext_range_bounds(length, length, clipping, offscreen)
        });
        let mut bounds = match last_child_end {
            // No inline text boxes yet
            Some(rect) if rect.width == 0 && rect.height == 0 => return rect,
            Some(rect) => rect,
            None => {
                let whole = self.bounds_rect(CoordinateSystem::RootFrame, clipping);
                *offscreen = whole.offscreen;
                whole.rect
            }
        };

        match self.data().text_direction() {
            TextDirection::None | TextDirection::Ltr => {
                bounds.width = CARET_THICKNESS;
            }
            TextDirection::Rtl => {
                bounds.x = bounds.right() - CARET_THICKNESS;
                bounds.width = CARET_THICKNESS;
            }
            TextDirection::Ttb => {
                bounds.height = CARET_THICKNESS;
            }
            TextDirection::Btt => {
                bounds.y = bounds.bottom() - CARET_THICKNESS;
                bounds.height = CARET_THICKNESS;
            }
        }
        bounds
    }

    /// Bounds of the inner-text range `start..end`
    pub fn inner_text_range_bounds(
        &self,
        start: i32,
        end: i32,
        system: CoordinateSystem,
        clipping: ClippingBehavior,
    ) -> PlatformBounds {
        if start < 0 || end > self.inner_text_length() || start > end {
            return PlatformBounds::default();
        }
        let mut offscreen = OffscreenResult::Onscreen;
        let rect = self.inner_text_range_bounds_in_subtree(start, end, system, clipping, &mut offscreen);
        PlatformBounds { rect, offscreen }
    }

    fn inner_text_range_bounds_in_subtree(
        &self,
        start: i32,
        end: i32,
        system: CoordinateSystem,
        clipping: ClippingBehavior,
        offscreen: &mut OffscreenResult,
    ) -> Rect {
        if self.role() == Role::InlineTextBox {
            let slice = self.inline_text_rect(start, end, self.inner_text_length());
            let bounds = self.relative_to_absolute_bounds(slice, system, clipping);
            *offscreen = bounds.offscreen;
            return bounds.rect;
        }

        if self.is_plain_text_field() && self.internal_child_count() == 1 {
            if let Some(inner) = self.internal_child_at(0) {
                let slice = self.inline_text_rect(start, end, self.inner_text_length());
                let bounds = inner.relative_to_absolute_bounds(slice, system, clipping);
                *offscreen = bounds.offscreen;
                return bounds.rect;
            }
        }

        let mut bounds = Rect::default();
        let mut child_offset = 0;
        for child in self.internal_children() {
            let child_length = child.inner_text_length();

            let child_start = (start - child_offset).max(0);
            if child_start > child_length {
                child_offset += child_length;
                continue;
            }
            let child_end = (end - child_offset).min(child_length);
            if child_end < 0 {
                return bounds;
            }

            let child_rect = child.inner_text_range_bounds_in_subtree(
                child_start,
                child_end,
                system,
                clipping,
                offscreen,
            );
            bounds = if bounds.is_empty() {
                child_rect
            } else {
                bounds.union(&child_rect)
            };
            child_offset += child_length;
        }
        bounds
    }

    /// Slice of this node's location covering characters `start..end`,
    /// relative to the node. Offsets beyond the available character pixel
    /// offsets are clamped.
    pub fn inline_text_rect(&self, start: i32, end: i32, max_length: i32) -> RectF {
        let offsets = self
            .data()
            .get_intlist_attribute(IntListAttribute::CharacterOffsets);
        let available = offsets.len() as i32;
        let mut start = start.max(0);
        let mut end = end.max(start);
        if available < max_length {
            start = start.min(available);
            end = end.min(available);
        }

        let max_pixel = offsets.last().copied().unwrap_or(0);
        let pixel = |offset: i32| -> i32 {
            if offset > 0 {
                offsets
                    .get(offset as usize - 1)
                    .copied()
                    .unwrap_or(max_pixel)
            } else {
                0
            }
        };
        let start_pixel = pixel(start);
        let end_pixel = pixel(end);

        let location = self.data().relative_bounds.bounds;
        let width = location.width.trunc();
        let height = location.height.trunc();

        match self.data().text_direction() {
            TextDirection::None | TextDirection::Ltr => RectF::from_xywh(
                start_pixel as f32,
                0.0,
                (end_pixel - start_pixel) as f32,
                height,
            ),
            TextDirection::Rtl => {
                let left = max_pixel - end_pixel;
                let right = max_pixel - start_pixel;
                RectF::from_xywh(left as f32, 0.0, (right - left) as f32, height)
            }
            TextDirection::Ttb => RectF::from_xywh(
                0.0,
                start_pixel as f32,
                width,
                (end_pixel - start_pixel) as f32,
            ),
            TextDirection::Btt => {
                let top = max_pixel - end_pixel;
                let bottom = max_pixel - start_pixel;
                RectF::from_xywh(0.0, top as f32, width, (bottom - top) as f32)
            }
        }
    }

    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    /// Deepest platform object under a screen point.
    ///
    /// Later children win over earlier ones, and a hit on a grandchild is
    /// preferred over a child hit only by its own bounds. Table columns
    /// never take hits since cells live in rows.
    pub fn approximate_hit_test(&self, x: i32, y: i32) -> AccessibleNode<'a> {
        let mut child_result = None;
        let mut descendant_result = None;

        for index in (0..self.platform_child_count()).rev() {
            let Some(child) = self.platform_child_at(index) else {
                continue;
            };
            if child.role() == Role::Column {
                continue;
            }
            if child.clipped_screen_bounds().contains_point(x, y) {
                let result = child.approximate_hit_test(x, y);
                if result == child {
                    child_result.get_or_insert(result);
                } else {
                    descendant_result.get_or_insert(result);
                }
            }
            if child_result.is_some() && descendant_result.is_some() {
                break;
            }
        }

        descendant_result.or(child_result).unwrap_or(*self)
    }
}
