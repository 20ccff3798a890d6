//! Viewport scroll publisher.
//!
//! `sample` is wired to the host's scroll event. Recomputation is throttled to
//! one per `throttle_ms` window: the first sample in a window is applied
//! immediately, later ones are coalesced into a single trailing update that
//! fires from `poll` once the window closes. `poll` also drives the quiet
//! timer that flips `is_active` off after scrolling stops.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::ids::{IdAllocator, SubscriptionId};
use crate::timer::{TimerId, TimerQueue};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    #[default]
    Down,
    Up,
}

/// Snapshot published to subscribers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    /// Pixels from the top of the document.
    pub offset: f32,
    pub direction: ScrollDirection,
    /// Absolute offset change since the previous recomputation.
    pub velocity: f32,
    /// True while samples keep arriving; false after the quiet interval.
    pub is_active: bool,
    /// Offset as a fraction of the scrollable range, 0 when not scrollable.
    pub progress: f32,
}

impl ScrollState {
    /// Resting state used when the host cannot scroll at all.
    pub const STATIC: ScrollState = ScrollState {
        offset: 0.0,
        direction: ScrollDirection::Down,
        velocity: 0.0,
        is_active: false,
        progress: 0.0,
    };
}

/// Raw geometry reported by the host for one scroll event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub offset: f32,
    #[serde(default)]
    pub viewport_height: f32,
    #[serde(default)]
    pub content_height: f32,
}

impl ScrollMetrics {
    pub fn at(offset: f32) -> Self {
        Self {
            offset,
            viewport_height: 0.0,
            content_height: 0.0,
        }
    }

    pub fn progress(&self) -> f32 {
        let range = self.content_height - self.viewport_height;
        if range > 0.0 && self.offset.is_finite() {
            (self.offset / range).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Host capability for reading scroll geometry. `None` means the host has
/// no scrollable viewport (e.g. a non-interactive render).
pub trait ScrollSource {
    fn metrics(&self) -> Option<ScrollMetrics>;
}

impl ScrollSource for ScrollMetrics {
    fn metrics(&self) -> Option<ScrollMetrics> {
        Some(*self)
    }
}

/// Source for hosts without a scrollable viewport.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoScroll;

impl ScrollSource for NoScroll {
    fn metrics(&self) -> Option<ScrollMetrics> {
        None
    }
}

impl<F> ScrollSource for F
where
    F: Fn() -> Option<ScrollMetrics>,
{
    fn metrics(&self) -> Option<ScrollMetrics> {
        self()
    }
}

pub type ScrollSubscriber = Box<dyn FnMut(&ScrollState)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScrollTimer {
    Trailing,
    Quiet,
}

pub struct ScrollPublisher {
    throttle_ms: f64,
    quiet_ms: f64,
    state: ScrollState,
    last_compute_at: Option<f64>,
    last_sample_at: Option<f64>,
    pending: Option<ScrollMetrics>,
    trailing: Option<TimerId>,
    quiet: Option<TimerId>,
    timers: TimerQueue<ScrollTimer>,
    ids: IdAllocator,
    subscribers: Vec<(SubscriptionId, ScrollSubscriber)>,
    recomputations: u64,
}

impl std::fmt::Debug for ScrollPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollPublisher")
            .field("state", &self.state)
            .field("throttle_ms", &self.throttle_ms)
            .field("quiet_ms", &self.quiet_ms)
            .field("subscribers", &self.subscribers.len())
            .field("recomputations", &self.recomputations)
            .finish()
    }
}

impl ScrollPublisher {
    pub fn new(cfg: &Config) -> Self {
        Self::with_intervals(cfg.throttle_ms, cfg.quiet_ms)
    }

    pub fn with_intervals(throttle_ms: f64, quiet_ms: f64) -> Self {
        Self {
            throttle_ms,
            quiet_ms,
            state: ScrollState::STATIC,
            last_compute_at: None,
            last_sample_at: None,
            pending: None,
            trailing: None,
            quiet: None,
            timers: TimerQueue::new(),
            ids: IdAllocator::new(),
            subscribers: Vec::new(),
            recomputations: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Number of state recomputations since creation.
    #[inline]
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn subscribe(&mut self, subscriber: ScrollSubscriber) -> SubscriptionId {
        let id = self.ids.alloc_subscription();
        self.subscribers.push((id, subscriber));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    /// Handle one raw scroll event. Returns true if state was recomputed now.
    pub fn sample(&mut self, now: f64, source: &dyn ScrollSource) -> bool {
        let Some(metrics) = source.metrics() else {
            log::trace!("scroll sample ignored: host has no scroll capability");
            return false;
        };

        // Quiet period counts from the last raw event, throttled or not.
        self.last_sample_at = Some(now);
        if let Some(id) = self.quiet.take() {
            self.timers.cancel(id);
        }
        self.quiet = Some(self.timers.schedule(now + self.quiet_ms, ScrollTimer::Quiet));

        if let Some(last) = self.last_compute_at {
            let window_end = last + self.throttle_ms;
            if now < window_end {
                self.pending = Some(metrics);
                if self.trailing.is_none() {
                    self.trailing = Some(self.timers.schedule(window_end, ScrollTimer::Trailing));
                }
                log::trace!("scroll sample coalesced until {window_end}");
                return false;
            }
        }

        self.recompute(now, metrics);
        true
    }

    /// Fire due timers. Returns every state emitted during this call.
    pub fn poll(&mut self, now: f64) -> Vec<ScrollState> {
        let mut emitted = Vec::new();
        for (id, timer) in self.timers.drain_due(now) {
            match timer {
                ScrollTimer::Trailing => {
                    if self.trailing == Some(id) {
                        self.trailing = None;
                    }
                    if let Some(metrics) = self.pending.take() {
                        self.recompute(now, metrics);
                        emitted.push(self.state);
                    }
                }
                ScrollTimer::Quiet => {
                    if self.quiet == Some(id) {
                        self.quiet = None;
                    }
                    if self.pending.is_some() {
                        // Trailing update still owed; it re-arms the quiet timer.
                        log::trace!("scroll idle deferred until trailing update");
                        continue;
                    }
                    if self.state.is_active {
                        self.state.is_active = false;
                        self.state.velocity = 0.0;
                        log::debug!("scroll idle at offset {}", self.state.offset);
                        self.notify();
                        emitted.push(self.state);
                    }
                }
            }
        }
        emitted
    }

    /// Earliest time `poll` has work to do.
    pub fn next_deadline(&mut self) -> Option<f64> {
        self.timers.next_deadline()
    }

    /// Cancel outstanding timers and drop subscribers.
    pub fn shutdown(&mut self) {
        self.timers.clear();
        self.trailing = None;
        self.quiet = None;
        self.pending = None;
        self.last_sample_at = None;
        self.subscribers.clear();
    }

    fn recompute(&mut self, now: f64, metrics: ScrollMetrics) {
        let offset = if metrics.offset.is_finite() {
            metrics.offset
        } else {
            self.state.offset
        };
        let delta = offset - self.state.offset;
        let direction = if delta > 0.0 {
            ScrollDirection::Down
        } else if delta < 0.0 {
            ScrollDirection::Up
        } else {
            self.state.direction
        };
        self.state = ScrollState {
            offset,
            direction,
            velocity: delta.abs(),
            is_active: true,
            progress: metrics.progress(),
        };
        self.last_compute_at = Some(now);
        self.pending = None;
        if let Some(id) = self.trailing.take() {
            self.timers.cancel(id);
        }
        if self.quiet.is_none() {
            let at = self.last_sample_at.map_or(now, |s| s + self.quiet_ms).max(now);
            self.quiet = Some(self.timers.schedule(at, ScrollTimer::Quiet));
        }
        self.recomputations += 1;
        self.notify();
    }

    fn notify(&mut self) {
        let snapshot = self.state;
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn no_capability_keeps_static_state() {
        let mut publisher = ScrollPublisher::with_intervals(16.0, 150.0);
        assert!(!publisher.sample(0.0, &NoScroll));
        assert_eq!(publisher.state(), ScrollState::STATIC);
        assert!(publisher.poll(1000.0).is_empty());
    }

    #[test]
    fn direction_and_velocity() {
        let mut publisher = ScrollPublisher::with_intervals(16.0, 150.0);
        publisher.sample(0.0, &ScrollMetrics::at(100.0));
        assert_eq!(publisher.state().direction, ScrollDirection::Down);
        assert_eq!(publisher.state().velocity, 100.0);
        publisher.sample(20.0, &ScrollMetrics::at(70.0));
        assert_eq!(publisher.state().direction, ScrollDirection::Up);
        assert_eq!(publisher.state().velocity, 30.0);
        publisher.sample(40.0, &ScrollMetrics::at(70.0));
        assert_eq!(publisher.state().direction, ScrollDirection::Up);
        assert_eq!(publisher.state().velocity, 0.0);
    }

    #[test]
    fn subscribers_see_every_recomputation() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut publisher = ScrollPublisher::with_intervals(16.0, 150.0);
        let sub = publisher.subscribe(Box::new(move |s| sink.borrow_mut().push(s.offset)));
        publisher.sample(0.0, &ScrollMetrics::at(10.0));
        publisher.sample(16.0, &ScrollMetrics::at(20.0));
        assert!(publisher.unsubscribe(sub));
        publisher.sample(32.0, &ScrollMetrics::at(30.0));
        assert_eq!(*seen.borrow(), vec![10.0, 20.0]);
    }

    #[test]
    fn idles_after_trailing_update_when_throttle_exceeds_quiet() {
        let mut publisher = ScrollPublisher::with_intervals(500.0, 150.0);
        publisher.sample(0.0, &ScrollMetrics::at(0.0));
        publisher.sample(100.0, &ScrollMetrics::at(50.0));

        // Quiet deadline passes while the trailing update is still owed.
        assert!(publisher.poll(260.0).is_empty());
        assert!(publisher.state().is_active);

        let emitted = publisher.poll(500.0);
        assert_eq!(emitted.len(), 1);
        assert!(emitted[0].is_active);
        assert_eq!(emitted[0].offset, 50.0);

        let emitted = publisher.poll(516.0);
        assert_eq!(emitted.len(), 1);
        assert!(!emitted[0].is_active);
        assert_eq!(emitted[0].velocity, 0.0);
        assert_eq!(publisher.next_deadline(), None);
    }

    #[test]
    fn progress_uses_scrollable_range() {
        let m = ScrollMetrics {
            offset: 250.0,
            viewport_height: 500.0,
            content_height: 1500.0,
        };
        assert!((m.progress() - 0.25).abs() < 1e-6);
        assert_eq!(ScrollMetrics::at(250.0).progress(), 0.0);
    }
}
