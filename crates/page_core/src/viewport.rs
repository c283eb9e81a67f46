//! Geometric intersection source over a static, vertically stacked layout.

use std::collections::BTreeMap;

use shared::{domain::TargetId, error::PageError, protocol::IntersectionEntry};
use tracing::debug;

use crate::observe::{
    Delivery, IntersectionSource, ObserveOptions, SubscriptionId, ViewportMetrics,
};

/// Vertical extent of an element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Last reported state: intersecting flag and how many thresholds the ratio met.
type Reported = (bool, usize);

#[derive(Debug)]
struct ObservedTarget {
    target: TargetId,
    last: Option<Reported>,
}

#[derive(Debug)]
struct ViewportSubscription {
    options: ObserveOptions,
    observed: Vec<ObservedTarget>,
}

#[derive(Debug)]
pub struct ViewportModel {
    layout: BTreeMap<TargetId, Rect>,
    metrics: ViewportMetrics,
    next_id: u64,
    subscriptions: BTreeMap<SubscriptionId, ViewportSubscription>,
    queued: Vec<Delivery>,
}

impl ViewportModel {
    pub fn new(layout: impl IntoIterator<Item = (TargetId, Rect)>, metrics: ViewportMetrics) -> Self {
        Self {
            layout: layout.into_iter().collect(),
            metrics,
            next_id: 0,
            subscriptions: BTreeMap::new(),
            queued: Vec::new(),
        }
    }

    pub fn metrics(&self) -> ViewportMetrics {
        self.metrics
    }

    /// Height of the laid-out document, never shorter than the viewport.
    pub fn document_height(&self) -> f64 {
        self.layout
            .values()
            .map(Rect::bottom)
            .fold(self.metrics.height, f64::max)
    }

    pub fn rect(&self, target: &TargetId) -> Option<Rect> {
        self.layout.get(target).copied()
    }

    /// Intersection of `target` with the margin-adjusted root, as
    /// `(is_intersecting, ratio)`. Targets missing from the layout never intersect.
    pub fn measure(&self, target: &TargetId, options: &ObserveOptions) -> (bool, f64) {
        let Some(rect) = self.layout.get(target) else {
            return (false, 0.0);
        };
        let margin = options.root_margin;
        let root_top = self.metrics.scroll_y - margin.top.resolve(self.metrics.height);
        let root_bottom =
            self.metrics.scroll_y + self.metrics.height + margin.bottom.resolve(self.metrics.height);
        if root_bottom <= root_top {
            return (false, 0.0);
        }

        let overlap = rect.bottom().min(root_bottom) - rect.top.max(root_top);
        if rect.height == 0.0 {
            let inside = rect.top >= root_top && rect.top <= root_bottom;
            return (inside, if inside { 1.0 } else { 0.0 });
        }
        if overlap <= 0.0 {
            return (false, 0.0);
        }
        (true, (overlap / rect.height).clamp(0.0, 1.0))
    }

    fn bucket(thresholds: &[f64], is_intersecting: bool, ratio: f64) -> usize {
        if !is_intersecting {
            return 0;
        }
        thresholds.iter().filter(|t| ratio >= **t).count()
    }

    /// Re-measures every observed target and queues entries for those whose
    /// intersecting flag or threshold bucket changed.
    fn recompute(&mut self) {
        let mut deliveries = Vec::new();
        for (id, subscription) in &self.subscriptions {
            let mut entries = Vec::new();
            for observed in &subscription.observed {
                let (is_intersecting, ratio) = self.measure(&observed.target, &subscription.options);
                let reported = (
                    is_intersecting,
                    Self::bucket(&subscription.options.thresholds, is_intersecting, ratio),
                );
                if observed.last != Some(reported) {
                    entries.push(IntersectionEntry::new(
                        observed.target.clone(),
                        is_intersecting,
                        ratio,
                    ));
                }
            }
            if !entries.is_empty() {
                deliveries.push(Delivery {
                    subscription: *id,
                    entries,
                });
            }
        }

        for delivery in &deliveries {
            let Some(subscription) = self.subscriptions.get_mut(&delivery.subscription) else {
                continue;
            };
            for entry in &delivery.entries {
                if let Some(observed) = subscription
                    .observed
                    .iter_mut()
                    .find(|o| o.target == entry.target)
                {
                    observed.last = Some((
                        entry.is_intersecting,
                        Self::bucket(
                            &subscription.options.thresholds,
                            entry.is_intersecting,
                            entry.ratio,
                        ),
                    ));
                }
            }
        }
        self.queued.extend(deliveries);
    }
}

impl IntersectionSource for ViewportModel {
    fn subscribe(
        &mut self,
        targets: &[TargetId],
        options: ObserveOptions,
    ) -> Result<SubscriptionId, PageError> {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        for target in targets.iter().filter(|t| !self.layout.contains_key(*t)) {
            debug!(
                element = target.as_str(),
                "observed target has no layout; it will never intersect"
            );
        }
        self.subscriptions.insert(
            id,
            ViewportSubscription {
                options,
                observed: targets
                    .iter()
                    .map(|target| ObservedTarget {
                        target: target.clone(),
                        last: None,
                    })
                    .collect(),
            },
        );
        // Observers always report the initial state of new targets.
        self.recompute();
        Ok(id)
    }

    fn unobserve(&mut self, subscription: SubscriptionId, target: &TargetId) {
        if let Some(sub) = self.subscriptions.get_mut(&subscription) {
            sub.observed.retain(|o| &o.target != target);
        }
        for delivery in self
            .queued
            .iter_mut()
            .filter(|d| d.subscription == subscription)
        {
            delivery.entries.retain(|entry| &entry.target != target);
        }
        self.queued.retain(|d| !d.entries.is_empty());
    }

    fn is_observing(&self, subscription: SubscriptionId, target: &TargetId) -> bool {
        self.subscriptions
            .get(&subscription)
            .is_some_and(|s| s.observed.iter().any(|o| &o.target == target))
    }

    fn take_deliveries(&mut self) -> Vec<Delivery> {
        std::mem::take(&mut self.queued)
    }

    fn viewport_changed(&mut self, metrics: ViewportMetrics) {
        if metrics == self.metrics {
            return;
        }
        self.metrics = metrics;
        self.recompute();
    }
}

#[cfg(test)]
#[path = "tests/viewport_tests.rs"]
mod tests;
