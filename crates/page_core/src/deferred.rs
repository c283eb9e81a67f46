//! Cancellable deferred work on a virtual clock.
//!
//! The page runs on a single UI thread, so instead of real timers the owner
//! advances the clock explicitly and runs whatever fell due.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskToken(u64);

#[derive(Debug)]
struct Scheduled<T> {
    token: TaskToken,
    due: Duration,
    task: T,
}

#[derive(Debug)]
pub struct DeferredQueue<T> {
    now: Duration,
    next_token: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_token: 1,
            pending: Vec::new(),
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskToken {
        let token = TaskToken(self.next_token);
        self.next_token += 1;
        self.pending.push(Scheduled {
            token,
            due: self.now.saturating_add(delay),
            task,
        });
        token
    }

    /// Returns `false` when the token already ran or was cancelled.
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|scheduled| scheduled.token != token);
        self.pending.len() != before
    }

    pub fn is_pending(&self, token: TaskToken) -> bool {
        self.pending.iter().any(|scheduled| scheduled.token == token)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|scheduled| scheduled.due).min()
    }

    /// Moves the clock forward and hands back every task that fell due, in
    /// due order (ties in scheduling order).
    pub fn advance(&mut self, elapsed: Duration) -> Vec<(TaskToken, T)> {
        self.now = self.now.saturating_add(elapsed);
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|scheduled| scheduled.due <= now);
        self.pending = waiting;

        due.sort_by_key(|scheduled| (scheduled.due, scheduled.token));
        due.into_iter()
            .map(|scheduled| (scheduled.token, scheduled.task))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_tasks_once_their_delay_elapses() {
        let mut queue = DeferredQueue::new();
        let hide = queue.schedule(Duration::from_millis(220), "hide");

        assert!(queue.advance(Duration::from_millis(219)).is_empty());
        assert!(queue.is_pending(hide));

        let fired = queue.advance(Duration::from_millis(1));
        assert_eq!(fired, vec![(hide, "hide")]);
        assert!(queue.is_empty());
        assert!(queue.advance(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn huge_advances_saturate_the_clock() {
        let mut queue = DeferredQueue::new();
        queue.advance(Duration::MAX);
        let late = queue.schedule(Duration::from_millis(220), "hide");
        assert_eq!(queue.now(), Duration::MAX);
        assert_eq!(queue.next_due(), Some(Duration::MAX));

        assert_eq!(queue.advance(Duration::from_millis(1)), vec![(late, "hide")]);
        assert_eq!(queue.now(), Duration::MAX);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut queue = DeferredQueue::new();
        let first = queue.schedule(Duration::from_millis(100), 1);
        let second = queue.schedule(Duration::from_millis(50), 2);

        assert!(queue.cancel(first));
        assert!(!queue.cancel(first));
        assert_eq!(queue.next_due(), Some(Duration::from_millis(50)));
        assert_eq!(queue.advance(Duration::from_millis(500)), vec![(second, 2)]);
    }

    #[test]
    fn due_tasks_come_back_in_due_order() {
        let mut queue = DeferredQueue::new();
        let late = queue.schedule(Duration::from_millis(30), "late");
        let early = queue.schedule(Duration::from_millis(10), "early");
        let tie = queue.schedule(Duration::from_millis(30), "tie");

        let fired = queue.advance(Duration::from_millis(30));
        assert_eq!(fired, vec![(early, "early"), (late, "late"), (tie, "tie")]);
        assert_eq!(queue.now(), Duration::from_millis(30));
    }
}
