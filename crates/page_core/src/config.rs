use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::domain::{ControlId, Orientation, SectionId};

/// Tunables for the page core. Every field has a default matching the shipped page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub sections: Vec<SectionId>,
    pub tracker_thresholds: Vec<f64>,
    /// Percent of viewport height cut off the bottom of the tracker root.
    pub tracker_bottom_margin_pct: f64,
    /// Added to the topbar height to form the tracker's top margin.
    pub header_gap_px: f64,
    pub reveal_threshold: f64,
    pub reveal_bottom_margin_pct: f64,
    pub overlay_hide_delay_ms: u64,
    /// Viewports at or below this width lay the timeline out vertically.
    pub vertical_breakpoint_px: f64,
    pub progress_thickness_px: f64,
    pub scrolled_threshold_px: f64,
    pub parallax_factor: f64,
    pub parallax_cap_px: f64,
    pub close_control: ControlId,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            sections: ["#about", "#services", "#process", "#portfolio", "#contact"]
                .into_iter()
                .map(SectionId::from)
                .collect(),
            tracker_thresholds: vec![0.2, 0.35, 0.5],
            tracker_bottom_margin_pct: 55.0,
            header_gap_px: 10.0,
            reveal_threshold: 0.12,
            reveal_bottom_margin_pct: 10.0,
            overlay_hide_delay_ms: 220,
            vertical_breakpoint_px: 900.0,
            progress_thickness_px: 2.0,
            scrolled_threshold_px: 6.0,
            parallax_factor: 0.08,
            parallax_cap_px: 160.0,
            close_control: ControlId::from("tClose"),
        }
    }
}

impl PageConfig {
    pub fn overlay_hide_delay(&self) -> Duration {
        Duration::from_millis(self.overlay_hide_delay_ms)
    }

    pub fn orientation_for(&self, viewport_width: f64) -> Orientation {
        if viewport_width <= self.vertical_breakpoint_px {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_is_inclusive() {
        let config = PageConfig::default();
        assert_eq!(config.orientation_for(900.0), Orientation::Vertical);
        assert_eq!(config.orientation_for(901.0), Orientation::Horizontal);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: PageConfig =
            serde_json::from_str(r#"{"overlay_hide_delay_ms": 300}"#).expect("decode");
        assert_eq!(config.overlay_hide_delay(), Duration::from_millis(300));
        assert_eq!(config.tracker_thresholds, vec![0.2, 0.35, 0.5]);
        assert_eq!(config.sections.len(), 5);
    }
}
