//! Process timeline disclosure: a modal-like overlay showing one step at a
//! time, with focus return, live-region narration and a progress indicator.
//!
//! State changes go through [`DisclosureState`], which is pure; the
//! [`StepDisclosure`] controller commits a new state and then renders it.

use std::time::Duration;

use serde::Serialize;
use shared::{
    domain::{ControlId, Orientation, StepCatalog},
    error::{Collaborator, PageError},
    protocol::{ControlTarget, Key},
};
use tracing::{debug, warn};

use crate::{
    config::PageConfig,
    deferred::{DeferredQueue, TaskToken},
    progress::step_progress,
    surface::{skip_missing, PageSurface},
};

pub const CLOSED_ANNOUNCEMENT: &str = "Timeline details closed.";

pub fn opened_announcement(title: &str) -> String {
    format!("{title} opened. Press Escape to close.")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisclosureState {
    active_index: Option<usize>,
    /// Control focused before the overlay opened. Only ever focused again.
    focus_return: Option<ControlId>,
    /// Hide scheduled by the last close, still waiting to run.
    pending_hide: Option<TaskToken>,
}

impl DisclosureState {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn is_open(&self) -> bool {
        self.active_index.is_some()
    }

    pub fn focus_return(&self) -> Option<&ControlId> {
        self.focus_return.as_ref()
    }

    pub fn pending_hide(&self) -> Option<TaskToken> {
        self.pending_hide
    }

    /// Open step `index`. The focus-return target is only captured when
    /// coming from the closed state; switching steps keeps the original.
    pub fn open(
        &self,
        index: usize,
        step_count: usize,
        focused: Option<ControlId>,
    ) -> Result<Self, PageError> {
        if index >= step_count {
            return Err(PageError::InvalidIndex {
                index,
                count: step_count,
            });
        }
        let focus_return = if self.is_open() {
            self.focus_return.clone()
        } else {
            focused
        };
        Ok(Self {
            active_index: Some(index),
            focus_return,
            pending_hide: None,
        })
    }

    /// `None` when already closed.
    pub fn close(&self, hide: TaskToken) -> Option<Self> {
        self.active_index?;
        Some(Self {
            active_index: None,
            focus_return: None,
            pending_hide: Some(hide),
        })
    }

    /// A deferred hide only applies if nothing reopened the overlay since.
    pub fn hide_due(&self, token: TaskToken) -> bool {
        !self.is_open() && self.pending_hide == Some(token)
    }

    pub fn hidden(&self) -> Self {
        Self {
            pending_hide: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisclosureTask {
    HideOverlay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum Transition {
    Opened {
        index: usize,
        previous: Option<usize>,
    },
    Closed {
        index: usize,
    },
    Ignored,
}

/// Whether a key press was consumed (its default action suppressed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    NotHandled,
}

#[derive(Debug)]
pub struct StepDisclosure {
    catalog: StepCatalog,
    state: DisclosureState,
    tasks: DeferredQueue<DisclosureTask>,
    orientation: Orientation,
    close_control: ControlId,
    hide_delay: Duration,
    thickness_px: f64,
}

impl StepDisclosure {
    pub fn new(catalog: StepCatalog, config: &PageConfig, orientation: Orientation) -> Self {
        Self {
            catalog,
            state: DisclosureState::closed(),
            tasks: DeferredQueue::new(),
            orientation,
            close_control: config.close_control.clone(),
            hide_delay: config.overlay_hide_delay(),
            thickness_px: config.progress_thickness_px,
        }
    }

    pub fn state(&self) -> &DisclosureState {
        &self.state
    }

    pub fn catalog(&self) -> &StepCatalog {
        &self.catalog
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn now(&self) -> Duration {
        self.tasks.now()
    }

    /// Startup render: the indicator sits at the first step.
    pub fn init(&self, surface: &mut dyn PageSurface) {
        if !surface.has(Collaborator::Timeline) {
            return;
        }
        self.render_progress(0, surface);
    }

    pub fn open(&mut self, index: usize, surface: &mut dyn PageSurface) -> Transition {
        for collaborator in [Collaborator::Timeline, Collaborator::Overlay] {
            if !surface.has(collaborator) {
                debug!(?collaborator, index, "cannot open step");
                return Transition::Ignored;
            }
        }

        let previous = self.state.active_index();
        let opened = self.catalog.checked(index).and_then(|step| {
            let next = self
                .state
                .open(index, self.catalog.len(), surface.focused_control())?;
            Ok((step.clone(), next))
        });
        let (step, next) = match opened {
            Ok(opened) => opened,
            Err(err) => {
                warn!(error = %err, "ignoring open request");
                return Transition::Ignored;
            }
        };
        if let Some(token) = self.state.pending_hide() {
            self.tasks.cancel(token);
        }
        self.state = next;
        debug!(index, ?previous, "step opened");

        skip_missing(surface.set_timeline_dimmed(true), "dim timeline");
        self.select_trigger(Some(index), surface);
        self.render_progress(index, surface);
        skip_missing(surface.render_step(&step), "overlay content");
        skip_missing(surface.set_overlay_visible(true), "show overlay");
        skip_missing(surface.set_overlay_open(true), "open overlay");
        skip_missing(
            surface.announce(&opened_announcement(&step.title)),
            "live region",
        );
        skip_missing(surface.focus(&self.close_control), "focus close control");

        Transition::Opened { index, previous }
    }

    pub fn close(&mut self, surface: &mut dyn PageSurface) -> Transition {
        let Some(index) = self.state.active_index() else {
            return Transition::Ignored;
        };
        let focus_return = self.state.focus_return().cloned();
        let token = self.tasks.schedule(self.hide_delay, DisclosureTask::HideOverlay);
        let Some(next) = self.state.close(token) else {
            self.tasks.cancel(token);
            return Transition::Ignored;
        };
        self.state = next;
        debug!(index, "step closed");

        skip_missing(surface.set_overlay_open(false), "close overlay");
        skip_missing(surface.set_timeline_dimmed(false), "undim timeline");
        self.select_trigger(None, surface);
        skip_missing(surface.announce(CLOSED_ANNOUNCEMENT), "live region");

        if let Some(control) = focus_return {
            skip_missing(surface.focus(&control), "restore focus");
        }
        Transition::Closed { index }
    }

    /// Re-renders the indicator for the open step when the layout axis may
    /// have changed. Never opens, closes or announces.
    pub fn set_orientation(&mut self, orientation: Orientation, surface: &mut dyn PageSurface) {
        self.orientation = orientation;
        if let Some(index) = self.state.active_index() {
            self.render_progress(index, surface);
        }
    }

    /// Moves the clock forward and runs deferred hides that are still valid.
    pub fn advance(&mut self, elapsed: Duration, surface: &mut dyn PageSurface) {
        for (token, task) in self.tasks.advance(elapsed) {
            match task {
                DisclosureTask::HideOverlay if self.state.hide_due(token) => {
                    skip_missing(surface.set_overlay_visible(false), "hide overlay");
                    self.state = self.state.hidden();
                }
                DisclosureTask::HideOverlay => {
                    debug!(?token, "dropping stale overlay hide");
                }
            }
        }
    }

    pub fn handle_click(&mut self, target: &ControlTarget, surface: &mut dyn PageSurface) -> Transition {
        match target {
            ControlTarget::StepTrigger { index } => self.open(*index, surface),
            ControlTarget::CloseButton | ControlTarget::CloseRegion => self.close(surface),
            ControlTarget::Other { .. } => Transition::Ignored,
        }
    }

    /// Escape closes from anywhere; Enter and Space activate a focused trigger.
    pub fn handle_key(
        &mut self,
        key: &Key,
        target: Option<&ControlTarget>,
        surface: &mut dyn PageSurface,
    ) -> (KeyOutcome, Transition) {
        match (key, target) {
            (Key::Escape, _) => (KeyOutcome::NotHandled, self.close(surface)),
            (key, Some(ControlTarget::StepTrigger { index })) if key.activates() => {
                (KeyOutcome::Handled, self.open(*index, surface))
            }
            _ => (KeyOutcome::NotHandled, Transition::Ignored),
        }
    }

    fn select_trigger(&self, selected: Option<usize>, surface: &mut dyn PageSurface) {
        for step in self.catalog.iter() {
            skip_missing(
                surface.set_trigger_selected(step.index, selected == Some(step.index)),
                "step trigger",
            );
        }
    }

    fn render_progress(&self, index: usize, surface: &mut dyn PageSurface) {
        if self.catalog.is_empty() {
            return;
        }
        let progress = step_progress(index, self.catalog.len(), self.orientation);
        skip_missing(
            surface.set_step_progress(&progress.styles(self.thickness_px)),
            "step progress",
        );
    }
}

#[cfg(test)]
#[path = "tests/disclosure_tests.rs"]
mod tests;
