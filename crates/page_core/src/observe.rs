//! Subscription interface between viewport intersection signals and the
//! components reacting to them.
//!
//! Sources queue batches of entries per subscription; the page pumps them
//! with [`IntersectionSource::take_deliveries`] after every input so a batch
//! is always handled on the same turn that produced it.

use std::collections::BTreeMap;

use shared::{
    domain::TargetId,
    error::{Collaborator, PageError},
    protocol::IntersectionEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// A root margin edge. Positive values grow the observation root, negative
/// values shrink it, as with CSS `rootMargin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginLength {
    Px(f64),
    /// Percent of the viewport height.
    Percent(f64),
}

impl Default for MarginLength {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

impl MarginLength {
    pub fn resolve(&self, viewport_height: f64) -> f64 {
        match *self {
            Self::Px(px) => px,
            Self::Percent(pct) => viewport_height * pct / 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RootMargin {
    pub top: MarginLength,
    pub bottom: MarginLength,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObserveOptions {
    /// Ascending ratios at which a change is reported.
    pub thresholds: Vec<f64>,
    pub root_margin: RootMargin,
}

impl ObserveOptions {
    pub fn new(mut thresholds: Vec<f64>, root_margin: RootMargin) -> Self {
        thresholds.retain(|t| t.is_finite());
        thresholds.iter_mut().for_each(|t| *t = t.clamp(0.0, 1.0));
        thresholds.sort_by(f64::total_cmp);
        thresholds.dedup();
        if thresholds.is_empty() {
            thresholds.push(0.0);
        }
        Self {
            thresholds,
            root_margin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub subscription: SubscriptionId,
    pub entries: Vec<IntersectionEntry>,
}

pub trait IntersectionSource {
    /// Starts observing `targets`. An `Err` means the capability is absent.
    fn subscribe(
        &mut self,
        targets: &[TargetId],
        options: ObserveOptions,
    ) -> Result<SubscriptionId, PageError>;

    /// Stops reporting `target` for `subscription`. Entries already queued
    /// for it are dropped too.
    fn unobserve(&mut self, subscription: SubscriptionId, target: &TargetId);

    fn is_observing(&self, subscription: SubscriptionId, target: &TargetId) -> bool;

    /// Batches produced since the last call, oldest first.
    fn take_deliveries(&mut self) -> Vec<Delivery>;

    fn viewport_changed(&mut self, _metrics: ViewportMetrics) {}
}

/// Environment without intersection observation.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unavailable;

impl IntersectionSource for Unavailable {
    fn subscribe(
        &mut self,
        _targets: &[TargetId],
        _options: ObserveOptions,
    ) -> Result<SubscriptionId, PageError> {
        Err(PageError::missing(Collaborator::IntersectionObserver))
    }

    fn unobserve(&mut self, _subscription: SubscriptionId, _target: &TargetId) {}

    fn is_observing(&self, _subscription: SubscriptionId, _target: &TargetId) -> bool {
        false
    }

    fn take_deliveries(&mut self) -> Vec<Delivery> {
        Vec::new()
    }
}

#[derive(Debug)]
struct ScriptedSubscription {
    options: ObserveOptions,
    targets: Vec<TargetId>,
}

/// Source fed by hand with synthetic batches.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    next_id: u64,
    subscriptions: BTreeMap<SubscriptionId, ScriptedSubscription>,
    queued: Vec<Delivery>,
    unobserved: Vec<(SubscriptionId, TargetId)>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a batch. Entries for targets the subscription no longer observes
    /// are discarded, as a real observer would never report them.
    pub fn push(&mut self, subscription: SubscriptionId, entries: Vec<IntersectionEntry>) {
        let entries: Vec<_> = entries
            .into_iter()
            .filter(|entry| self.is_observing(subscription, &entry.target))
            .collect();
        if !entries.is_empty() {
            self.queued.push(Delivery {
                subscription,
                entries,
            });
        }
    }

    pub fn options(&self, subscription: SubscriptionId) -> Option<&ObserveOptions> {
        self.subscriptions.get(&subscription).map(|s| &s.options)
    }

    pub fn observed(&self, subscription: SubscriptionId) -> &[TargetId] {
        self.subscriptions
            .get(&subscription)
            .map(|s| s.targets.as_slice())
            .unwrap_or_default()
    }

    pub fn unobserve_log(&self) -> &[(SubscriptionId, TargetId)] {
        &self.unobserved
    }
}

impl IntersectionSource for ScriptedSource {
    fn subscribe(
        &mut self,
        targets: &[TargetId],
        options: ObserveOptions,
    ) -> Result<SubscriptionId, PageError> {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscriptions.insert(
            id,
            ScriptedSubscription {
                options,
                targets: targets.to_vec(),
            },
        );
        Ok(id)
    }

    fn unobserve(&mut self, subscription: SubscriptionId, target: &TargetId) {
        if let Some(sub) = self.subscriptions.get_mut(&subscription) {
            sub.targets.retain(|t| t != target);
        }
        for delivery in self
            .queued
            .iter_mut()
            .filter(|d| d.subscription == subscription)
        {
            delivery.entries.retain(|entry| &entry.target != target);
        }
        self.queued.retain(|d| !d.entries.is_empty());
        self.unobserved.push((subscription, target.clone()));
    }

    fn is_observing(&self, subscription: SubscriptionId, target: &TargetId) -> bool {
        self.subscriptions
            .get(&subscription)
            .is_some_and(|s| s.targets.contains(target))
    }

    fn take_deliveries(&mut self) -> Vec<Delivery> {
        std::mem::take(&mut self.queued)
    }
}
