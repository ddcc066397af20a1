//! Settings the core engine reads.

use crate::model::LayoutMode;
use crate::pool::DEFAULT_POOL_CAPACITY;

/// Default minimum height of a scroll item before its content loads.
pub const DEFAULT_PAGE_MIN_HEIGHT: f32 = 256.0;

/// Default side of the loading indicator.
pub const DEFAULT_PROGRESS_SIZE: f32 = 48.0;

/// Default upper zoom bound.
pub const DEFAULT_MAX_SCALE: f32 = 4.0;

/// Engine configuration, fixed for the lifetime of a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Mode applied when the surface first attaches.
    pub layout_mode: LayoutMode,
    /// Content views kept for reuse.
    pub pool_capacity: usize,
    /// Height floor of a scroll item whose content is not ready.
    pub page_min_height: f32,
    /// Side of the loading indicator.
    pub progress_size: f32,
    /// Upper zoom bound for both strategies.
    pub max_scale: f32,
    /// Whether the continuous strategy accepts pinch and double-tap zoom.
    pub scroll_zoom: bool,
    /// Shown when the provider has no items.
    pub empty_message: String,
    /// Shown when the provider reports an empty error string.
    pub default_error_message: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            layout_mode: LayoutMode::default(),
            pool_capacity: DEFAULT_POOL_CAPACITY,
            page_min_height: DEFAULT_PAGE_MIN_HEIGHT,
            progress_size: DEFAULT_PROGRESS_SIZE,
            max_scale: DEFAULT_MAX_SCALE,
            scroll_zoom: false,
            empty_message: "No pages".to_string(),
            default_error_message: "Unknown error".to_string(),
        }
    }
}
