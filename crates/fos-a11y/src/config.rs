//! Manager Configuration

use fos_axtree::Rect;
use serde::{Deserialize, Serialize};

/// Configuration for an [`AccessibilityManager`](crate::AccessibilityManager)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Keep the root's scroll offsets applied in root-frame coordinates.
    /// When false, bounds are reported as if the root were not scrolled.
    pub use_root_scroll_offsets: bool,
    /// Bounds of the hosting view, in screen coordinates
    pub view_bounds: Rect,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            use_root_scroll_offsets: true,
            view_bounds: Rect::default(),
        }
    }
}

impl ManagerConfig {
    pub fn with_view_bounds(mut self, view_bounds: Rect) -> Self {
        self.view_bounds = view_bounds;
        self
    }

    pub fn with_root_scroll_offsets(mut self, enabled: bool) -> Self {
        self.use_root_scroll_offsets = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ManagerConfig::default();
        assert!(config.use_root_scroll_offsets);
        assert_eq!(config.view_bounds, Rect::default());
    }

    #[test]
    fn test_builders() {
        let config = ManagerConfig::default()
            .with_view_bounds(Rect::from_xywh(10, 20, 300, 200))
            .with_root_scroll_offsets(false);
        assert!(!config.use_root_scroll_offsets);
        assert_eq!(config.view_bounds.x, 10);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ManagerConfig =
            serde_json::from_str(r#"{"use_root_scroll_offsets": false}"#).unwrap();
        assert!(!config.use_root_scroll_offsets);
        assert_eq!(config.view_bounds, Rect::default());
    }
}
