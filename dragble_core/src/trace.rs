// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for gestures.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! controller calls at each step of a gesture. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! A sink shared as `Rc<RefCell<S>>` is itself a [`TraceSink`], so a host can
//! hand one clone to a controller and keep another to inspect what was
//! recorded.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`ClampEvent`] and the
//!   corresponding `TraceSink` method.

use alloc::rc::Rc;
use core::cell::RefCell;

use kurbo::{Point, Vec2};

use crate::config::Axis;
#[cfg(feature = "trace-rich")]
use crate::limits::Clamp;
use crate::scheduler::Schedule;
use crate::time::HostTime;
use crate::timing::{FrameTick, TickSource};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// A controller lifecycle transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Gesture initiation was enabled.
    Enabled,
    /// Gesture initiation was disabled.
    Disabled,
    /// The controller was destroyed.
    Destroyed,
    /// Limits were recomputed from a container.
    ContainmentApplied,
    /// Limits were replaced explicitly.
    LimitsReplaced,
    /// The position was reset to the origin.
    PositionReset,
}

/// How a gesture ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// The pointer was released.
    Release,
    /// The host cancelled the pointer.
    Cancel,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a pointer-down starts a gesture session.
#[derive(Clone, Copy, Debug)]
pub struct GestureBeginEvent {
    /// Host time of the pointer-down.
    pub time: HostTime,
    /// Pointer position in page coordinates.
    pub pointer: Point,
    /// Translation read from the surface at gesture start.
    pub baseline: Vec2,
}

/// Emitted when a pending gesture commits to a direction and becomes active.
#[derive(Clone, Copy, Debug)]
pub struct DirectionCommitEvent {
    /// Host time of the move that committed.
    pub time: HostTime,
    /// Pointer travel since gesture start.
    pub moved: Vec2,
    /// The strictly dominant axis, or `None` on a tie.
    pub dominant: Option<Axis>,
}

/// Emitted when a gesture is aborted because it moved along a locked axis.
#[derive(Clone, Copy, Debug)]
pub struct GestureAbortEvent {
    /// Host time of the move that aborted.
    pub time: HostTime,
    /// Pointer travel since gesture start.
    pub moved: Vec2,
    /// The forbidden dominant axis.
    pub axis: Axis,
}

/// Emitted when a move's candidate position had to be pinned to a bound.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct ClampEvent {
    /// Host time of the move.
    pub time: HostTime,
    /// The clamped axis.
    pub axis: Axis,
    /// The unclamped candidate.
    pub candidate: f64,
    /// The clamp outcome.
    pub clamp: Clamp,
}

/// Emitted when a position is queued for the next tick.
#[derive(Clone, Copy, Debug)]
pub struct CommitScheduledEvent {
    /// Host time of the event that produced the position.
    pub time: HostTime,
    /// Queued translation.
    pub translation: Vec2,
    /// Whether a frame must be requested or an earlier payload was replaced.
    pub schedule: Schedule,
}

/// Emitted when a queued position is applied to the surface.
#[derive(Clone, Copy, Debug)]
pub struct CommitEvent {
    /// Frame counter of the tick, or `None` for a flush outside a tick.
    pub frame_index: Option<u64>,
    /// Host time of the tick or flush.
    pub now: HostTime,
    /// Tick source, or `None` for a flush.
    pub source: Option<TickSource>,
    /// Applied translation.
    pub translation: Vec2,
    /// Delta since gesture start.
    pub delta: Vec2,
}

impl CommitEvent {
    /// Creates a commit event for a tick.
    #[must_use]
    pub fn at_tick(tick: &FrameTick, translation: Vec2, delta: Vec2) -> Self {
        Self {
            frame_index: Some(tick.frame_index),
            now: tick.now,
            source: Some(tick.source),
            translation,
            delta,
        }
    }
}

/// Emitted when a gesture session is destroyed by pointer-up or cancel.
#[derive(Clone, Copy, Debug)]
pub struct GestureEndEvent {
    /// Host time of the pointer-up or cancel.
    pub time: HostTime,
    /// How the gesture ended.
    pub reason: EndReason,
    /// Whether the gesture ever became active.
    pub was_active: bool,
    /// Final delta since gesture start.
    pub delta: Vec2,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from a controller.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a gesture session starts.
    fn on_gesture_begin(&mut self, e: &GestureBeginEvent) {
        _ = e;
    }

    /// Called when a gesture commits to a direction.
    fn on_direction_commit(&mut self, e: &DirectionCommitEvent) {
        _ = e;
    }

    /// Called when a gesture is aborted by the axis lock.
    fn on_gesture_abort(&mut self, e: &GestureAbortEvent) {
        _ = e;
    }

    /// Called when a candidate position is clamped (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_clamp(&mut self, e: &ClampEvent) {
        _ = e;
    }

    /// Called when a position is queued.
    fn on_commit_scheduled(&mut self, e: &CommitScheduledEvent) {
        _ = e;
    }

    /// Called when a queued position is applied.
    fn on_commit(&mut self, e: &CommitEvent) {
        _ = e;
    }

    /// Called when a gesture session ends.
    fn on_gesture_end(&mut self, e: &GestureEndEvent) {
        _ = e;
    }

    /// Called on controller lifecycle transitions.
    fn on_lifecycle(&mut self, change: Lifecycle) {
        _ = change;
    }
}

impl<S: TraceSink + ?Sized> TraceSink for Rc<RefCell<S>> {
    fn on_gesture_begin(&mut self, e: &GestureBeginEvent) {
        self.borrow_mut().on_gesture_begin(e);
    }

    fn on_direction_commit(&mut self, e: &DirectionCommitEvent) {
        self.borrow_mut().on_direction_commit(e);
    }

    fn on_gesture_abort(&mut self, e: &GestureAbortEvent) {
        self.borrow_mut().on_gesture_abort(e);
    }

    #[cfg(feature = "trace-rich")]
    fn on_clamp(&mut self, e: &ClampEvent) {
        self.borrow_mut().on_clamp(e);
    }

    fn on_commit_scheduled(&mut self, e: &CommitScheduledEvent) {
        self.borrow_mut().on_commit_scheduled(e);
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        self.borrow_mut().on_commit(e);
    }

    fn on_gesture_end(&mut self, e: &GestureEndEvent) {
        self.borrow_mut().on_gesture_end(e);
    }

    fn on_lifecycle(&mut self, change: Lifecycle) {
        self.borrow_mut().on_lifecycle(change);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        Self::from_option(Some(sink))
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::from_option(None)
    }

    /// Creates a tracer from an optional sink.
    #[inline]
    #[must_use]
    pub fn from_option(sink: Option<&'a mut dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`GestureBeginEvent`].
    #[inline]
    pub fn gesture_begin(&mut self, e: &GestureBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_gesture_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DirectionCommitEvent`].
    #[inline]
    pub fn direction_commit(&mut self, e: &DirectionCommitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_direction_commit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`GestureAbortEvent`].
    #[inline]
    pub fn gesture_abort(&mut self, e: &GestureAbortEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_gesture_abort(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ClampEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn clamp(&mut self, e: &ClampEvent) {
        if let Some(s) = &mut self.sink {
            s.on_clamp(e);
        }
    }

    /// Emits a [`CommitScheduledEvent`].
    #[inline]
    pub fn commit_scheduled(&mut self, e: &CommitScheduledEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_commit_scheduled(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CommitEvent`].
    #[inline]
    pub fn commit(&mut self, e: &CommitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_commit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`GestureEndEvent`].
    #[inline]
    pub fn gesture_end(&mut self, e: &GestureEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_gesture_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`Lifecycle`] transition.
    #[inline]
    pub fn lifecycle(&mut self, change: Lifecycle) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_lifecycle(change);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = change;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> GestureBeginEvent {
        GestureBeginEvent {
            time: HostTime(1_000),
            pointer: Point::new(4.0, 5.0),
            baseline: Vec2::new(10.0, 0.0),
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_gesture_begin(&sample_begin());
        sink.on_lifecycle(Lifecycle::Destroyed);
        sink.on_gesture_end(&GestureEndEvent {
            time: HostTime(0),
            reason: EndReason::Release,
            was_active: false,
            delta: Vec2::ZERO,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.gesture_begin(&sample_begin());
        tracer.lifecycle(Lifecycle::Enabled);
    }

    #[test]
    fn commit_event_from_tick() {
        let tick = FrameTick::refresh(HostTime(500), 9);
        let e = CommitEvent::at_tick(&tick, Vec2::new(1.0, 2.0), Vec2::new(0.5, 0.0));
        assert_eq!(e.frame_index, Some(9));
        assert_eq!(e.now, HostTime(500));
        assert_eq!(e.source, Some(TickSource::DisplayRefresh));
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            changes: Vec<Lifecycle>,
        }
        impl TraceSink for RecordingSink {
            fn on_lifecycle(&mut self, change: Lifecycle) {
                self.changes.push(change);
            }
        }

        let mut sink = RecordingSink {
            changes: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.lifecycle(Lifecycle::Disabled);
        tracer.lifecycle(Lifecycle::Enabled);
        drop(tracer);
        assert_eq!(sink.changes, &[Lifecycle::Disabled, Lifecycle::Enabled]);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn shared_sink_is_a_sink() {
        use alloc::vec::Vec;

        #[derive(Default)]
        struct Count {
            begins: Vec<HostTime>,
        }
        impl TraceSink for Count {
            fn on_gesture_begin(&mut self, e: &GestureBeginEvent) {
                self.begins.push(e.time);
            }
        }

        let shared = Rc::new(RefCell::new(Count::default()));
        let mut handle = Rc::clone(&shared);
        let mut tracer = Tracer::new(&mut handle);
        tracer.gesture_begin(&sample_begin());
        drop(tracer);
        assert_eq!(shared.borrow().begins, &[HostTime(1_000)]);
    }
}
