//! Tree Bounds
//!
//! Resolves container-relative node bounds into the coordinate space of the
//! tree's root, applying transforms, scroll offsets and clipping on the way
//! up the offset-container chain.

use crate::attributes::{BoolAttribute, IntAttribute};
use crate::geometry::RectF;
use crate::node::NodeRef;
use crate::tree::Tree;
use crate::AxNodeId;

/// Bounds of a node in root coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TreeBounds {
    pub rect: RectF,
    /// Clipped away entirely by some clipping container
    pub offscreen: bool,
}

/// Snap a rect lying wholly outside `clip` onto the nearest edge as a
/// one pixel sliver
fn snap_to_edge(mut rect: RectF, clip: &RectF) -> RectF {
    if rect.x >= clip.right() {
        rect.x = clip.right() - 1.0;
        rect.width = 1.0;
    } else if rect.right() <= clip.x {
        rect.x = clip.x;
        rect.width = 1.0;
    }
    if rect.y >= clip.bottom() {
        rect.y = clip.bottom() - 1.0;
        rect.height = 1.0;
    } else if rect.bottom() <= clip.y {
        rect.y = clip.y;
        rect.height = 1.0;
    }
    rect
}

impl Tree {
    /// Bounds of a node in root coordinates
    pub fn tree_bounds(&self, id: AxNodeId, clip: bool) -> Option<TreeBounds> {
        self.relative_to_tree_bounds(id, RectF::ZERO, clip)
    }

    /// Map `rect`, relative to the node's own bounds, into root coordinates.
    ///
    /// A zero-sized `rect` stands for the node's whole bounds.
    pub fn relative_to_tree_bounds(
        &self,
        id: AxNodeId,
        rect: RectF,
        clip: bool,
    ) -> Option<TreeBounds> {
        let node = self.get(id)?;
        Some(self.resolve_bounds(node, rect, clip, true))
    }

    /// Whether the node is clipped away by a container
    pub fn is_offscreen(&self, id: AxNodeId) -> bool {
        self.tree_bounds(id, true)
            .is_some_and(|bounds| bounds.offscreen)
    }

    fn resolve_bounds(
        &self,
        node: NodeRef<'_>,
        input: RectF,
        clip: bool,
        allow_recursion: bool,
    ) -> TreeBounds {
        let own = node.data().relative_bounds.bounds;
        let mut rect = input;
        let mut offscreen = false;

        if rect.is_zero_sized() {
            rect = own;
            if rect.is_empty() && allow_recursion && !self.update_in_progress {
                let union = node.children().fold(RectF::ZERO, |acc, child| {
                    acc.union(&self.resolve_bounds(child, RectF::ZERO, clip, false).rect)
                });
                if !union.is_empty() {
                    return TreeBounds {
                        rect: union,
                        offscreen: false,
                    };
                }
            }
        } else {
            rect.offset(own.x, own.y);
        }

        let mut current = node;
        for _ in 0..=self.nodes.len() {
            if let Some(transform) = &current.data().relative_bounds.transform {
                rect = transform.map_rect(&rect);
            }

            let container = if rect.is_zero_sized() {
                current.parent()
            } else {
                self.get(current.data().relative_bounds.offset_container_id)
                    .or_else(|| self.root())
            };
            let Some(container) = container else {
                break;
            };
            if container.id() == current.id() {
                break;
            }

            let data = container.data();
            let container_bounds = data.relative_bounds.bounds;
            rect.offset(container_bounds.x, container_bounds.y);
            if let (Some(scroll_x), Some(scroll_y)) = (
                data.int_attribute(IntAttribute::ScrollX),
                data.int_attribute(IntAttribute::ScrollY),
            ) {
                rect.offset(-scroll_x as f32, -scroll_y as f32);
            }

            if data.get_bool_attribute(BoolAttribute::ClipsChildren) {
                let intersection = rect.intersect(&container_bounds);
                let clipped = if !intersection.is_empty() {
                    intersection
                } else if !rect.is_empty() {
                    offscreen = true;
                    snap_to_edge(rect, &container_bounds)
                } else {
                    rect
                };
                if clip {
                    rect = clipped;
                }
            }

            current = container;
        }

        if rect.is_zero_sized() && allow_recursion {
            let ancestor = node
                .ancestors()
                .map(|ancestor| self.resolve_bounds(ancestor, RectF::ZERO, clip, false))
                .find(|bounds| !bounds.rect.is_zero_sized());
            if let Some(ancestor) = ancestor {
                if own.x == 0.0 && own.y == 0.0 {
                    rect = ancestor.rect;
                } else {
                    rect.width = (ancestor.rect.right() - rect.x).max(0.0);
                    rect.height = (ancestor.rect.bottom() - rect.y).max(0.0);
                }
                offscreen = ancestor.offscreen;
            }
        }

        TreeBounds { rect, offscreen }
    }
}
