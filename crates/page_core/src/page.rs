//! Page-level event loop: routes viewport batches and user input to the
//! tracker, reveal scheduler, scroll effects and timeline disclosure.

use std::time::Duration;

use serde::Serialize;
use shared::{
    domain::{BlockId, SectionId, StepCatalog},
    protocol::PageEvent,
};
use tracing::{debug, info};

use crate::{
    config::PageConfig,
    disclosure::{KeyOutcome, StepDisclosure, Transition},
    observe::{IntersectionSource, ViewportMetrics},
    progress::{page_scroll_progress, step_progress, ProgressValue},
    reveal::RevealScheduler,
    scroll::{FrameThrottle, ScrollEffects, ScrollFrame},
    surface::{skip_missing, PageSurface},
    tracker::VisibilityTracker,
};

/// Signals read from the hosting environment at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub reduced_motion: bool,
    pub viewport: ViewportMetrics,
    pub document_height: f64,
    pub header_height: f64,
}

/// Elements present in the markup that the page core manages.
#[derive(Debug, Clone, Default)]
pub struct PageTargets {
    pub sections: Vec<SectionId>,
    pub reveal_blocks: Vec<BlockId>,
    pub steps: StepCatalog,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub active_section: Option<SectionId>,
    pub revealed: Vec<BlockId>,
    pub active_step: Option<usize>,
    pub overlay_hide_pending: bool,
    pub scroll: ProgressValue,
    pub step: Option<ProgressValue>,
    pub clock_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EventOutcome {
    None,
    FrameRequested,
    Frame(ScrollFrame),
    Disclosure(Transition),
    Key {
        prevent_default: bool,
        transition: Transition,
    },
}

pub struct PageController<S, R>
where
    S: IntersectionSource,
    R: PageSurface,
{
    config: PageConfig,
    env: Environment,
    source: S,
    surface: R,
    tracker: VisibilityTracker,
    reveal: RevealScheduler,
    effects: ScrollEffects,
    throttle: FrameThrottle,
    disclosure: StepDisclosure,
}

impl<S, R> PageController<S, R>
where
    S: IntersectionSource,
    R: PageSurface,
{
    pub fn start(
        config: PageConfig,
        env: Environment,
        targets: PageTargets,
        mut source: S,
        mut surface: R,
    ) -> Self {
        let tracker = VisibilityTracker::start(
            targets.sections,
            VisibilityTracker::observe_options(&config, env.header_height),
            &mut source,
        );
        let reveal = RevealScheduler::start(
            targets.reveal_blocks,
            RevealScheduler::observe_options(&config),
            env.reduced_motion,
            &mut source,
            &mut surface,
        );
        let disclosure = StepDisclosure::new(
            targets.steps,
            &config,
            config.orientation_for(env.viewport.width),
        );
        disclosure.init(&mut surface);

        let mut page = Self {
            effects: ScrollEffects::new(env.reduced_motion),
            throttle: FrameThrottle::default(),
            config,
            env,
            source,
            surface,
            tracker,
            reveal,
            disclosure,
        };
        page.run_scroll_effects();
        page.pump();
        info!(
            steps = page.disclosure.catalog().len(),
            reduced_motion = page.env.reduced_motion,
            "page controller started"
        );
        page
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn tracker(&self) -> &VisibilityTracker {
        &self.tracker
    }

    pub fn reveal(&self) -> &RevealScheduler {
        &self.reveal
    }

    pub fn disclosure(&self) -> &StepDisclosure {
        &self.disclosure
    }

    pub fn handle(&mut self, event: PageEvent) -> EventOutcome {
        let outcome = match event {
            PageEvent::Scroll { y } => self.on_scroll(y),
            PageEvent::AnimationFrame => self.on_animation_frame(),
            PageEvent::Resize { width, height } => {
                self.on_resize(width, height);
                EventOutcome::None
            }
            PageEvent::Click { target } => {
                EventOutcome::Disclosure(self.disclosure.handle_click(&target, &mut self.surface))
            }
            PageEvent::KeyDown { key, target } => {
                let (outcome, transition) =
                    self.disclosure
                        .handle_key(&key, target.as_ref(), &mut self.surface);
                EventOutcome::Key {
                    prevent_default: outcome == KeyOutcome::Handled,
                    transition,
                }
            }
            PageEvent::Focus { control } => {
                skip_missing(self.surface.focus(&control), "user focus");
                EventOutcome::None
            }
            PageEvent::Advance { ms } => {
                self.disclosure
                    .advance(Duration::from_millis(ms), &mut self.surface);
                EventOutcome::None
            }
        };
        self.pump();
        outcome
    }

    /// Scroll events only mark a frame as owed; the effects run on the frame.
    pub fn on_scroll(&mut self, y: f64) -> EventOutcome {
        self.env.viewport.scroll_y = y.max(0.0);
        self.source.viewport_changed(self.env.viewport);
        if self.throttle.request() {
            EventOutcome::FrameRequested
        } else {
            EventOutcome::None
        }
    }

    pub fn on_animation_frame(&mut self) -> EventOutcome {
        if !self.throttle.begin_frame() {
            return EventOutcome::None;
        }
        EventOutcome::Frame(self.run_scroll_effects())
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.env.viewport.width = width;
        self.env.viewport.height = height;
        self.source.viewport_changed(self.env.viewport);
        let orientation = self.config.orientation_for(width);
        if orientation != self.disclosure.orientation() {
            debug!(?orientation, width, "timeline orientation changed");
        }
        self.disclosure.set_orientation(orientation, &mut self.surface);
    }

    /// Routes every queued intersection batch to its subscriber.
    pub fn pump(&mut self) {
        for delivery in self.source.take_deliveries() {
            if Some(delivery.subscription) == self.tracker.subscription() {
                self.tracker.handle_batch(&delivery.entries, &mut self.surface);
            } else if Some(delivery.subscription) == self.reveal.subscription() {
                self.reveal
                    .handle_batch(&delivery.entries, &mut self.source, &mut self.surface);
            } else {
                debug!(subscription = delivery.subscription.0, "batch for unknown subscription");
            }
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        let state = self.disclosure.state();
        let steps = self.disclosure.catalog().len();
        PageSnapshot {
            active_section: self.tracker.active().cloned(),
            revealed: self.reveal.revealed().cloned().collect(),
            active_step: state.active_index(),
            overlay_hide_pending: state.pending_hide().is_some(),
            scroll: page_scroll_progress(
                self.env.viewport.scroll_y,
                self.env.document_height,
                self.env.viewport.height,
            ),
            step: state
                .active_index()
                .map(|index| step_progress(index, steps, self.disclosure.orientation())),
            clock_ms: u64::try_from(self.disclosure.now().as_millis()).unwrap_or(u64::MAX),
        }
    }

    fn run_scroll_effects(&mut self) -> ScrollFrame {
        self.effects.apply(
            self.env.viewport.scroll_y,
            self.env.document_height,
            self.env.viewport.height,
            &self.config,
            &mut self.surface,
        )
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
