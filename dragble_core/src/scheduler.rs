// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-rate limiting for position commits.
//!
//! Pointer events arrive much faster than the display refreshes. The
//! [`RenderScheduler`] holds at most one pending commit payload: scheduling
//! while a payload is pending replaces it (last write wins), and each
//! [`FrameTick`] hands out at most one payload. Intermediate values between
//! ticks are dropped, the final value never is.
//!
//! Hosts without a display-refresh primitive drive the scheduler from a
//! [`FallbackClock`], which paces ticks at
//! [`SchedulerConfig::fallback_rate_hz`].
//!
//! # Usage
//!
//! ```rust,ignore
//! if scheduler.schedule(commit) == Schedule::Requested {
//!     host.request_frame();
//! }
//!
//! // Later, from the frame callback:
//! if let Some(commit) = scheduler.on_tick(&tick) {
//!     apply(commit);
//! }
//! ```

use crate::time::{Duration, HostTime};
use crate::timing::{FrameTick, TickSource};

/// Configuration for the [`RenderScheduler`] and [`FallbackClock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Evaluations per second of the fallback timer used when the host has
    /// no display-refresh primitive.
    pub fallback_rate_hz: u32,
}

impl SchedulerConfig {
    /// The conventional fallback rate of 60 evaluations per second.
    pub const DEFAULT_FALLBACK_RATE_HZ: u32 = 60;

    /// Default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fallback_rate_hz: Self::DEFAULT_FALLBACK_RATE_HZ,
        }
    }

    /// Configuration with a custom fallback timer rate.
    #[must_use]
    pub const fn with_fallback_rate(fallback_rate_hz: u32) -> Self {
        Self { fallback_rate_hz }
    }

    /// Interval between fallback ticks, or `None` when the rate is zero.
    #[must_use]
    pub const fn fallback_interval(&self) -> Option<Duration> {
        Duration::from_hz(self.fallback_rate_hz)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of [`RenderScheduler::schedule`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Schedule {
    /// Nothing was pending; the host must request a frame.
    Requested,
    /// A pending payload was replaced; a frame is already requested.
    Coalesced,
}

/// Holds at most one pending commit and releases it on the next tick.
#[derive(Debug)]
pub struct RenderScheduler<T> {
    config: SchedulerConfig,
    pending: Option<T>,
    last_tick: Option<u64>,
    commits: u64,
    coalesced: u64,
}

impl<T> RenderScheduler<T> {
    /// Creates an idle scheduler.
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            pending: None,
            last_tick: None,
            commits: 0,
            coalesced: 0,
        }
    }

    /// Queues `payload` for the next tick, replacing any pending payload.
    pub fn schedule(&mut self, payload: T) -> Schedule {
        match self.pending.replace(payload) {
            Some(_) => {
                self.coalesced += 1;
                Schedule::Coalesced
            }
            None => Schedule::Requested,
        }
    }

    /// Releases the pending payload for this tick.
    ///
    /// A second call for the same `frame_index` returns `None` even if a new
    /// payload was scheduled in between; that payload waits for the next
    /// tick.
    pub fn on_tick(&mut self, tick: &FrameTick) -> Option<T> {
        if self.last_tick == Some(tick.frame_index) {
            return None;
        }
        let payload = self.pending.take()?;
        self.last_tick = Some(tick.frame_index);
        self.commits += 1;
        Some(payload)
    }

    /// Takes the pending payload outside of a tick.
    pub fn flush(&mut self) -> Option<T> {
        let payload = self.pending.take()?;
        self.commits += 1;
        Some(payload)
    }

    /// Discards the pending payload without delivering it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Whether a payload is waiting for a tick.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the pending payload, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Number of payloads delivered so far.
    #[must_use]
    pub fn commit_count(&self) -> u64 {
        self.commits
    }

    /// Number of payloads replaced before they were delivered.
    #[must_use]
    pub fn coalesced_count(&self) -> u64 {
        self.coalesced
    }

    /// Returns the scheduler configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

/// Fixed-rate tick source for hosts without a refresh primitive.
///
/// [`poll`](Self::poll) yields at most one [`FrameTick`] per interval. Ticks
/// that were missed while the host was busy are not replayed; the next due
/// time is realigned to the current time.
#[derive(Clone, Copy, Debug)]
pub struct FallbackClock {
    interval: Duration,
    next_due: Option<HostTime>,
    frame_counter: u64,
}

impl FallbackClock {
    /// Creates a clock from a [`SchedulerConfig`].
    ///
    /// Returns `None` if the configured rate is zero.
    #[must_use]
    pub const fn new(config: &SchedulerConfig) -> Option<Self> {
        match config.fallback_interval() {
            Some(interval) => Some(Self::with_interval(interval)),
            None => None,
        }
    }

    /// Creates a clock with an explicit interval.
    #[must_use]
    pub const fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            frame_counter: 0,
        }
    }

    /// The interval between ticks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next tick becomes due, or `None` before the first poll.
    #[must_use]
    pub const fn next_due(&self) -> Option<HostTime> {
        self.next_due
    }

    /// Produces a tick if one is due at `now`.
    ///
    /// The first poll always produces a tick.
    pub fn poll(&mut self, now: HostTime) -> Option<FrameTick> {
        if let Some(due) = self.next_due
            && now < due
        {
            return None;
        }
        self.next_due = Some(now + self.interval);
        let frame_index = self.frame_counter;
        self.frame_counter += 1;
        Some(FrameTick {
            now,
            frame_index,
            source: TickSource::Timer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(frame_index: u64) -> FrameTick {
        FrameTick::refresh(HostTime(frame_index * 16_666_667), frame_index)
    }

    #[test]
    fn five_moves_in_one_interval_commit_once() {
        let mut s = RenderScheduler::new(SchedulerConfig::default());
        assert_eq!(s.schedule(1), Schedule::Requested);
        for v in 2..=5 {
            assert_eq!(s.schedule(v), Schedule::Coalesced);
        }
        assert_eq!(s.on_tick(&tick(0)), Some(5));
        assert_eq!(s.on_tick(&tick(0)), None);
        assert_eq!(s.commit_count(), 1);
        assert_eq!(s.coalesced_count(), 4);
    }

    #[test]
    fn payload_scheduled_during_tick_waits_for_next() {
        let mut s = RenderScheduler::new(SchedulerConfig::default());
        s.schedule("a");
        assert_eq!(s.on_tick(&tick(3)), Some("a"));
        assert_eq!(s.schedule("b"), Schedule::Requested);
        assert_eq!(s.on_tick(&tick(3)), None);
        assert!(s.is_pending());
        assert_eq!(s.on_tick(&tick(4)), Some("b"));
    }

    #[test]
    fn empty_tick_yields_nothing() {
        let mut s: RenderScheduler<u8> = RenderScheduler::new(SchedulerConfig::default());
        assert_eq!(s.on_tick(&tick(0)), None);
        assert_eq!(s.commit_count(), 0);
    }

    #[test]
    fn cancel_discards_pending() {
        let mut s = RenderScheduler::new(SchedulerConfig::default());
        s.schedule(7);
        assert_eq!(s.cancel(), Some(7));
        assert_eq!(s.on_tick(&tick(1)), None);
        assert_eq!(s.commit_count(), 0);
    }

    #[test]
    fn flush_counts_as_commit() {
        let mut s = RenderScheduler::new(SchedulerConfig::default());
        s.schedule(9);
        assert_eq!(s.flush(), Some(9));
        assert_eq!(s.flush(), None);
        assert_eq!(s.commit_count(), 1);
    }

    #[test]
    fn fallback_clock_paces_at_configured_rate() {
        let mut clock = FallbackClock::new(&SchedulerConfig::default()).unwrap();
        assert_eq!(clock.interval(), Duration(16_666_666));

        let first = clock.poll(HostTime(0)).unwrap();
        assert_eq!(first.frame_index, 0);
        assert_eq!(first.source, TickSource::Timer);

        assert!(clock.poll(HostTime(10_000_000)).is_none());
        let second = clock.poll(HostTime(16_666_666)).unwrap();
        assert_eq!(second.frame_index, 1);
    }

    #[test]
    fn fallback_clock_does_not_replay_missed_ticks() {
        let mut clock = FallbackClock::with_interval(Duration::from_millis(10));
        clock.poll(HostTime(0));
        // A long stall yields one tick, not five.
        assert!(clock.poll(HostTime(50_000_000)).is_some());
        assert!(clock.poll(HostTime(55_000_000)).is_none());
        assert_eq!(clock.next_due(), Some(HostTime(60_000_000)));
    }

    #[test]
    fn zero_rate_has_no_clock() {
        assert!(FallbackClock::new(&SchedulerConfig::with_fallback_rate(0)).is_none());
    }
}
