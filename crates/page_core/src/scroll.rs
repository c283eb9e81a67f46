//! Frame-throttled scroll effects: topbar state, page progress bar, parallax.

use serde::Serialize;
use tracing::trace;

use crate::{
    config::PageConfig,
    progress::{page_scroll_progress, ProgressValue},
    surface::{skip_missing, PageSurface},
};

/// Coalesces scroll events so at most one effects pass runs per frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameThrottle {
    pending: bool,
}

impl FrameThrottle {
    /// Returns `true` when the caller should schedule a frame callback;
    /// `false` means one is already pending and this event is dropped.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Called from the frame callback. Returns whether a pass is owed.
    pub fn begin_frame(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollFrame {
    pub scrolled: bool,
    pub progress: ProgressValue,
    /// Set only when the parallax offset was re-applied this pass.
    pub parallax_offset: Option<f64>,
}

#[derive(Debug)]
pub struct ScrollEffects {
    parallax_enabled: bool,
    last_parallax_y: f64,
}

impl ScrollEffects {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            parallax_enabled: !reduced_motion,
            last_parallax_y: 0.0,
        }
    }

    pub fn apply(
        &mut self,
        scroll_y: f64,
        scroll_height: f64,
        client_height: f64,
        config: &PageConfig,
        surface: &mut dyn PageSurface,
    ) -> ScrollFrame {
        let y = scroll_y.max(0.0);
        let scrolled = y > config.scrolled_threshold_px;
        skip_missing(surface.set_topbar_scrolled(scrolled), "topbar scrolled");

        let progress = page_scroll_progress(y, scroll_height, client_height);
        skip_missing(
            surface.set_scroll_progress(&progress.styles(config.progress_thickness_px)),
            "scroll progress",
        );

        let mut parallax_offset = None;
        if self.parallax_enabled && (y - self.last_parallax_y).abs() > 1.0 {
            let offset = y.min(config.parallax_cap_px) * config.parallax_factor;
            skip_missing(surface.set_parallax_offset(offset), "parallax");
            self.last_parallax_y = y;
            parallax_offset = Some(offset);
        }

        trace!(y, percent = progress.percent, "scroll effects pass");
        ScrollFrame {
            scrolled,
            progress,
            parallax_offset,
        }
    }
}
