//! One-shot reveal of content blocks as they scroll into view.

use std::collections::BTreeSet;

use shared::{
    domain::{BlockId, TargetId},
    protocol::IntersectionEntry,
};
use tracing::debug;

use crate::{
    config::PageConfig,
    observe::{IntersectionSource, MarginLength, ObserveOptions, RootMargin, SubscriptionId},
    surface::{skip_missing, PageSurface},
};

#[derive(Debug)]
pub struct RevealScheduler {
    subscription: Option<SubscriptionId>,
    waiting: BTreeSet<BlockId>,
    revealed: BTreeSet<BlockId>,
}

impl RevealScheduler {
    pub fn observe_options(config: &PageConfig) -> ObserveOptions {
        ObserveOptions::new(
            vec![config.reveal_threshold],
            RootMargin {
                top: MarginLength::Px(0.0),
                bottom: MarginLength::Percent(-config.reveal_bottom_margin_pct),
            },
        )
    }

    /// Registers `blocks`. Under reduced motion, or when observation is not
    /// available, every block is shown immediately without a transition.
    pub fn start(
        blocks: Vec<BlockId>,
        options: ObserveOptions,
        reduced_motion: bool,
        source: &mut dyn IntersectionSource,
        surface: &mut dyn PageSurface,
    ) -> Self {
        let mut scheduler = Self {
            subscription: None,
            waiting: BTreeSet::new(),
            revealed: BTreeSet::new(),
        };
        if blocks.is_empty() {
            return scheduler;
        }

        if !reduced_motion {
            let targets: Vec<_> = blocks.iter().cloned().map(TargetId::Block).collect();
            match source.subscribe(&targets, options) {
                Ok(id) => {
                    scheduler.subscription = Some(id);
                    scheduler.waiting = blocks.into_iter().collect();
                    return scheduler;
                }
                Err(err) => debug!(error = %err, "revealing all blocks immediately"),
            }
        }

        for block in blocks {
            scheduler.show(&block, false, surface);
        }
        scheduler
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    pub fn is_revealed(&self, block: &BlockId) -> bool {
        self.revealed.contains(block)
    }

    pub fn revealed(&self) -> impl Iterator<Item = &BlockId> {
        self.revealed.iter()
    }

    pub fn waiting(&self) -> usize {
        self.waiting.len()
    }

    /// Reveals every waiting block that now intersects and withdraws its
    /// observation. Returns the blocks revealed by this batch.
    pub fn handle_batch(
        &mut self,
        entries: &[IntersectionEntry],
        source: &mut dyn IntersectionSource,
        surface: &mut dyn PageSurface,
    ) -> Vec<BlockId> {
        let mut shown = Vec::new();
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            let TargetId::Block(block) = &entry.target else {
                continue;
            };
            if !self.waiting.remove(block) {
                continue;
            }
            if let Some(subscription) = self.subscription {
                source.unobserve(subscription, &entry.target);
            }
            self.show(block, true, surface);
            shown.push(block.clone());
        }
        shown
    }

    fn show(&mut self, block: &BlockId, animate: bool, surface: &mut dyn PageSurface) {
        if !self.revealed.insert(block.clone()) {
            return;
        }
        debug!(block = block.as_str(), animate, "revealing block");
        skip_missing(surface.reveal_block(block, animate), "reveal block");
    }
}

#[cfg(test)]
#[path = "tests/reveal_tests.rs"]
mod tests;
