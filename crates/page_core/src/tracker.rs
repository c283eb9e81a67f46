//! Active-section tracking for navigation highlighting.

use shared::{
    domain::{SectionId, TargetId},
    protocol::IntersectionEntry,
};
use tracing::debug;

use crate::{
    config::PageConfig,
    observe::{IntersectionSource, MarginLength, ObserveOptions, RootMargin, SubscriptionId},
    surface::{skip_missing, PageSurface},
};

#[derive(Debug)]
pub struct VisibilityTracker {
    sections: Vec<SectionId>,
    subscription: Option<SubscriptionId>,
    active: Option<SectionId>,
}

impl VisibilityTracker {
    /// Sections count as active once they dominate the upper part of the
    /// viewport below the fixed header.
    pub fn observe_options(config: &PageConfig, header_height: f64) -> ObserveOptions {
        ObserveOptions::new(
            config.tracker_thresholds.clone(),
            RootMargin {
                top: MarginLength::Px(-(header_height + config.header_gap_px)),
                bottom: MarginLength::Percent(-config.tracker_bottom_margin_pct),
            },
        )
    }

    pub fn start(
        sections: Vec<SectionId>,
        options: ObserveOptions,
        source: &mut dyn IntersectionSource,
    ) -> Self {
        let subscription = if sections.is_empty() {
            None
        } else {
            let targets: Vec<_> = sections.iter().cloned().map(TargetId::Section).collect();
            match source.subscribe(&targets, options) {
                Ok(id) => Some(id),
                Err(err) => {
                    debug!(error = %err, "active-section tracking disabled");
                    None
                }
            }
        };

        Self {
            sections,
            subscription,
            active: None,
        }
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    pub fn active(&self) -> Option<&SectionId> {
        self.active.as_ref()
    }

    /// Intersecting section with the greatest ratio. On equal ratios the entry
    /// earliest in the batch wins.
    pub fn select<'a>(
        sections: &[SectionId],
        entries: &'a [IntersectionEntry],
    ) -> Option<&'a SectionId> {
        let mut best: Option<(&SectionId, f64)> = None;
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            let TargetId::Section(section) = &entry.target else {
                continue;
            };
            if !sections.contains(section) {
                continue;
            }
            let ratio = if entry.ratio.is_nan() { 0.0 } else { entry.ratio };
            if best.is_none_or(|(_, best_ratio)| ratio > best_ratio) {
                best = Some((section, ratio));
            }
        }
        best.map(|(section, _)| section)
    }

    /// Applies one batch. Returns the newly active section when it changed;
    /// a batch with nothing intersecting keeps the previous one.
    pub fn handle_batch(
        &mut self,
        entries: &[IntersectionEntry],
        surface: &mut dyn PageSurface,
    ) -> Option<SectionId> {
        let next = Self::select(&self.sections, entries)?.clone();
        if self.active.as_ref() == Some(&next) {
            return None;
        }

        debug!(
            from = self.active.as_ref().map(SectionId::as_str),
            to = next.as_str(),
            "active section changed"
        );
        for section in &self.sections {
            skip_missing(
                surface.set_nav_current(section, *section == next),
                "nav current marker",
            );
        }
        self.active = Some(next.clone());
        Some(next)
    }
}

#[cfg(test)]
#[path = "tests/tracker_tests.rs"]
mod tests;
