//! fOS Accessibility
//!
//! Platform-facing accessibility queries over an [`fos_axtree`] tree.
//!
//! Features:
//! - Accessibility manager owning one tree and its view geometry
//! - Platform leaf and child rules
//! - Bounds in frame, root-frame and screen coordinates
//! - Hypertext and inner-text range bounds
//! - Approximate hit testing

mod bounds;
mod config;
mod manager;
mod node;
mod text;

pub use bounds::{ClippingBehavior, CoordinateSystem, OffscreenResult, PlatformBounds};
pub use config::ManagerConfig;
pub use manager::AccessibilityManager;
pub use node::AccessibleNode;
pub use text::EMBEDDED_OBJECT_CHARACTER;

pub use fos_axtree;

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("Tree update rejected: {0}")]
    Update(#[from] fos_axtree::TreeError),

    #[error("Accessibility tree has no root")]
    NoRoot,
}
