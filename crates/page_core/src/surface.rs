//! Render targets the page core writes presentational state to.
//!
//! The core never creates these; it only toggles state on them. Every write
//! can report a missing target, which callers log and skip.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use shared::{
    domain::{BlockId, ControlId, SectionId, Step},
    error::Collaborator,
};
use thiserror::Error;
use tracing::debug;

use crate::progress::ProgressStyles;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("render target missing: {0:?}")]
    Missing(Collaborator),
    #[error("control {0} cannot receive focus")]
    NotFocusable(ControlId),
}

pub trait PageSurface {
    fn has(&self, collaborator: Collaborator) -> bool;

    fn set_nav_current(&mut self, section: &SectionId, current: bool) -> Result<(), SurfaceError>;

    fn reveal_block(&mut self, block: &BlockId, animate: bool) -> Result<(), SurfaceError>;

    fn set_topbar_scrolled(&mut self, scrolled: bool) -> Result<(), SurfaceError>;
    fn set_scroll_progress(&mut self, styles: &ProgressStyles) -> Result<(), SurfaceError>;
    fn set_parallax_offset(&mut self, offset_px: f64) -> Result<(), SurfaceError>;

    fn set_timeline_dimmed(&mut self, dimmed: bool) -> Result<(), SurfaceError>;
    /// Selection class plus `aria-expanded` on the trigger for `index`.
    fn set_trigger_selected(&mut self, index: usize, selected: bool) -> Result<(), SurfaceError>;
    fn set_step_progress(&mut self, styles: &ProgressStyles) -> Result<(), SurfaceError>;
    fn render_step(&mut self, step: &Step) -> Result<(), SurfaceError>;
    /// Drives the open/closing transition class.
    fn set_overlay_open(&mut self, open: bool) -> Result<(), SurfaceError>;
    /// Removes the overlay from layout and the accessibility tree when `false`.
    fn set_overlay_visible(&mut self, visible: bool) -> Result<(), SurfaceError>;
    fn announce(&mut self, message: &str) -> Result<(), SurfaceError>;

    fn focused_control(&self) -> Option<ControlId>;
    fn focus(&mut self, control: &ControlId) -> Result<(), SurfaceError>;
}

/// Logs and drops a failed surface write.
pub(crate) fn skip_missing(result: Result<(), SurfaceError>, what: &'static str) {
    if let Err(err) = result {
        debug!(what, error = %err, "skipping render step");
    }
}

/// In-memory surface that records the state it was driven into.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    missing: HashSet<Collaborator>,
    unfocusable: HashSet<ControlId>,
    pub nav_current: BTreeSet<SectionId>,
    pub revealed: Vec<(BlockId, bool)>,
    pub topbar_scrolled: bool,
    pub scroll_progress: Option<ProgressStyles>,
    pub parallax_offsets: Vec<f64>,
    pub timeline_dimmed: bool,
    pub triggers: BTreeMap<usize, bool>,
    pub step_progress: Option<ProgressStyles>,
    pub rendered_step: Option<Step>,
    pub overlay_open: bool,
    pub overlay_visible: bool,
    pub announcements: Vec<String>,
    pub focused: Option<ControlId>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without(mut self, collaborator: Collaborator) -> Self {
        self.missing.insert(collaborator);
        self
    }

    pub fn with_focus(mut self, control: impl Into<ControlId>) -> Self {
        self.focused = Some(control.into());
        self
    }

    /// Simulates a control being removed or disabled after it had focus.
    pub fn make_unfocusable(&mut self, control: &ControlId) {
        self.unfocusable.insert(control.clone());
    }

    pub fn selected_triggers(&self) -> Vec<usize> {
        self.triggers
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(index, _)| *index)
            .collect()
    }

    pub fn last_announcement(&self) -> Option<&str> {
        self.announcements.last().map(String::as_str)
    }

    fn require(&self, collaborator: Collaborator) -> Result<(), SurfaceError> {
        if self.missing.contains(&collaborator) {
            Err(SurfaceError::Missing(collaborator))
        } else {
            Ok(())
        }
    }
}

impl PageSurface for RecordingSurface {
    fn has(&self, collaborator: Collaborator) -> bool {
        !self.missing.contains(&collaborator)
    }

    fn set_nav_current(&mut self, section: &SectionId, current: bool) -> Result<(), SurfaceError> {
        self.require(Collaborator::NavigationLinks)?;
        if current {
            self.nav_current.insert(section.clone());
        } else {
            self.nav_current.remove(section);
        }
        Ok(())
    }

    fn reveal_block(&mut self, block: &BlockId, animate: bool) -> Result<(), SurfaceError> {
        self.require(Collaborator::RevealBlock)?;
        self.revealed.push((block.clone(), animate));
        Ok(())
    }

    fn set_topbar_scrolled(&mut self, scrolled: bool) -> Result<(), SurfaceError> {
        self.require(Collaborator::Topbar)?;
        self.topbar_scrolled = scrolled;
        Ok(())
    }

    fn set_scroll_progress(&mut self, styles: &ProgressStyles) -> Result<(), SurfaceError> {
        self.require(Collaborator::ScrollProgress)?;
        self.scroll_progress = Some(styles.clone());
        Ok(())
    }

    fn set_parallax_offset(&mut self, offset_px: f64) -> Result<(), SurfaceError> {
        self.require(Collaborator::ParallaxScene)?;
        self.parallax_offsets.push(offset_px);
        Ok(())
    }

    fn set_timeline_dimmed(&mut self, dimmed: bool) -> Result<(), SurfaceError> {
        self.require(Collaborator::Timeline)?;
        self.timeline_dimmed = dimmed;
        Ok(())
    }

    fn set_trigger_selected(&mut self, index: usize, selected: bool) -> Result<(), SurfaceError> {
        self.require(Collaborator::StepTrigger)?;
        self.triggers.insert(index, selected);
        Ok(())
    }

    fn set_step_progress(&mut self, styles: &ProgressStyles) -> Result<(), SurfaceError> {
        self.require(Collaborator::StepProgress)?;
        self.step_progress = Some(styles.clone());
        Ok(())
    }

    fn render_step(&mut self, step: &Step) -> Result<(), SurfaceError> {
        self.require(Collaborator::OverlayContent)?;
        self.rendered_step = Some(step.clone());
        Ok(())
    }

    fn set_overlay_open(&mut self, open: bool) -> Result<(), SurfaceError> {
        self.require(Collaborator::Overlay)?;
        self.overlay_open = open;
        Ok(())
    }

    fn set_overlay_visible(&mut self, visible: bool) -> Result<(), SurfaceError> {
        self.require(Collaborator::Overlay)?;
        self.overlay_visible = visible;
        Ok(())
    }

    fn announce(&mut self, message: &str) -> Result<(), SurfaceError> {
        self.require(Collaborator::LiveRegion)?;
        self.announcements.push(message.to_string());
        Ok(())
    }

    fn focused_control(&self) -> Option<ControlId> {
        self.focused.clone()
    }

    fn focus(&mut self, control: &ControlId) -> Result<(), SurfaceError> {
        self.require(Collaborator::Focus)?;
        if self.unfocusable.contains(control) {
            return Err(SurfaceError::NotFocusable(control.clone()));
        }
        self.focused = Some(control.clone());
        Ok(())
    }
}
