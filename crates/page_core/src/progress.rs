//! Orientation-aware progress mapping shared by the page scroll bar and the
//! timeline indicator. Everything here is pure and recomputed on demand.

use serde::Serialize;
use shared::domain::Orientation;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressValue {
    /// Always within `0.0..=100.0`.
    pub percent: f64,
    pub orientation: Orientation,
}

/// Inline size styles for a progress element. The axis not carrying the
/// percentage is pinned to the bar thickness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressStyles {
    pub width: String,
    pub height: String,
}

impl ProgressValue {
    pub fn styles(&self, thickness_px: f64) -> ProgressStyles {
        let fill = format!("{}%", self.percent);
        let pinned = format!("{thickness_px}px");
        match self.orientation {
            Orientation::Horizontal => ProgressStyles {
                width: fill,
                height: pinned,
            },
            Orientation::Vertical => ProgressStyles {
                width: pinned,
                height: fill,
            },
        }
    }
}

pub fn map_progress(position: f64, extent: f64, orientation: Orientation) -> ProgressValue {
    let percent = if extent > 0.0 && !position.is_nan() {
        (position / extent).clamp(0.0, 1.0) * 100.0
    } else {
        0.0
    };
    ProgressValue {
        percent,
        orientation,
    }
}

/// Top-of-page bar; always fills left to right.
pub fn page_scroll_progress(scroll_y: f64, scroll_height: f64, client_height: f64) -> ProgressValue {
    let extent = (scroll_height - client_height).max(1.0);
    map_progress(scroll_y, extent, Orientation::Horizontal)
}

/// Position of `index` within `count` steps. A single step maps to 0%.
pub fn step_progress(index: usize, count: usize, orientation: Orientation) -> ProgressValue {
    map_progress(
        index as f64,
        count.saturating_sub(1) as f64,
        orientation,
    )
}

#[cfg(test)]
#[path = "tests/progress_tests.rs"]
mod tests;
