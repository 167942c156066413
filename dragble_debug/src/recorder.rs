// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use dragble_core::config::Axis;
use dragble_core::limits::Clamp;
use dragble_core::scheduler::Schedule;
use dragble_core::time::HostTime;
use dragble_core::timing::TickSource;
use dragble_core::trace::{
    ClampEvent, CommitEvent, CommitScheduledEvent, DirectionCommitEvent, EndReason,
    GestureAbortEvent, GestureBeginEvent, GestureEndEvent, Lifecycle, TraceSink,
};
use kurbo::Vec2;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_GESTURE_BEGIN: u8 = 1;
const TAG_DIRECTION_COMMIT: u8 = 2;
const TAG_GESTURE_ABORT: u8 = 3;
const TAG_CLAMP: u8 = 4;
const TAG_COMMIT_SCHEDULED: u8 = 5;
const TAG_COMMIT: u8 = 6;
const TAG_GESTURE_END: u8 = 7;
const TAG_LIFECYCLE: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Decodes everything recorded so far.
    pub fn events(&self) -> DecodeIter<'_> {
        decode(&self.buf)
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_vec2(&mut self, v: Vec2) {
        self.write_f64(v.x);
        self.write_f64(v.y);
    }

    fn write_time(&mut self, t: HostTime) {
        self.write_u64(t.nanos());
    }

    fn write_option_u64(&mut self, v: Option<u64>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_u64(val);
            }
            None => {
                self.write_u8(0);
                self.write_u64(0);
            }
        }
    }

    fn write_axis(&mut self, axis: Option<Axis>) {
        self.write_u8(match axis {
            None => 0,
            Some(Axis::X) => 1,
            Some(Axis::Y) => 2,
        });
    }

    fn write_clamp(&mut self, c: Clamp) {
        let (kind, value) = match c {
            Clamp::Within(v) => (0, v),
            Clamp::Below(v) => (1, v),
            Clamp::Above(v) => (2, v),
        };
        self.write_u8(kind);
        self.write_f64(value);
    }

    fn write_source(&mut self, s: Option<TickSource>) {
        self.write_u8(match s {
            None => 0,
            Some(TickSource::DisplayRefresh) => 1,
            Some(TickSource::Timer) => 2,
        });
    }

    fn write_lifecycle(&mut self, l: Lifecycle) {
        self.write_u8(match l {
            Lifecycle::Enabled => 0,
            Lifecycle::Disabled => 1,
            Lifecycle::Destroyed => 2,
            Lifecycle::ContainmentApplied => 3,
            Lifecycle::LimitsReplaced => 4,
            Lifecycle::PositionReset => 5,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_gesture_begin(&mut self, e: &GestureBeginEvent) {
        self.write_u8(TAG_GESTURE_BEGIN);
        self.write_time(e.time);
        self.write_vec2(e.pointer.to_vec2());
        self.write_vec2(e.baseline);
    }

    fn on_direction_commit(&mut self, e: &DirectionCommitEvent) {
        self.write_u8(TAG_DIRECTION_COMMIT);
        self.write_time(e.time);
        self.write_vec2(e.moved);
        self.write_axis(e.dominant);
    }

    fn on_gesture_abort(&mut self, e: &GestureAbortEvent) {
        self.write_u8(TAG_GESTURE_ABORT);
        self.write_time(e.time);
        self.write_vec2(e.moved);
        self.write_axis(Some(e.axis));
    }

    fn on_clamp(&mut self, e: &ClampEvent) {
        self.write_u8(TAG_CLAMP);
        self.write_time(e.time);
        self.write_axis(Some(e.axis));
        self.write_f64(e.candidate);
        self.write_clamp(e.clamp);
    }

    fn on_commit_scheduled(&mut self, e: &CommitScheduledEvent) {
        self.write_u8(TAG_COMMIT_SCHEDULED);
        self.write_time(e.time);
        self.write_vec2(e.translation);
        self.write_u8(match e.schedule {
            Schedule::Requested => 0,
            Schedule::Coalesced => 1,
        });
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        self.write_u8(TAG_COMMIT);
        self.write_option_u64(e.frame_index);
        self.write_time(e.now);
        self.write_source(e.source);
        self.write_vec2(e.translation);
        self.write_vec2(e.delta);
    }

    fn on_gesture_end(&mut self, e: &GestureEndEvent) {
        self.write_u8(TAG_GESTURE_END);
        self.write_time(e.time);
        self.write_u8(match e.reason {
            EndReason::Release => 0,
            EndReason::Cancel => 1,
        });
        self.write_u8(u8::from(e.was_active));
        self.write_vec2(e.delta);
    }

    fn on_lifecycle(&mut self, change: Lifecycle) {
        self.write_u8(TAG_LIFECYCLE);
        self.write_lifecycle(change);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`GestureBeginEvent`].
    GestureBegin(GestureBeginEvent),
    /// A [`DirectionCommitEvent`].
    DirectionCommit(DirectionCommitEvent),
    /// A [`GestureAbortEvent`].
    GestureAbort(GestureAbortEvent),
    /// A [`ClampEvent`].
    Clamp(ClampEvent),
    /// A [`CommitScheduledEvent`].
    CommitScheduled(CommitScheduledEvent),
    /// A [`CommitEvent`].
    Commit(CommitEvent),
    /// A [`GestureEndEvent`].
    GestureEnd(GestureEndEvent),
    /// A [`Lifecycle`] transition.
    Lifecycle(Lifecycle),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_vec2(&mut self) -> Option<Vec2> {
        Some(Vec2::new(self.read_f64()?, self.read_f64()?))
    }

    fn read_time(&mut self) -> Option<HostTime> {
        self.read_u64().map(HostTime)
    }

    fn read_option_u64(&mut self) -> Option<Option<u64>> {
        let present = self.read_u8()?;
        let val = self.read_u64()?;
        Some(if present != 0 { Some(val) } else { None })
    }

    fn read_axis(&mut self) -> Option<Option<Axis>> {
        Some(match self.read_u8()? {
            0 => None,
            1 => Some(Axis::X),
            _ => Some(Axis::Y),
        })
    }

    fn read_some_axis(&mut self) -> Option<Axis> {
        self.read_axis()?
    }

    fn read_clamp(&mut self) -> Option<Clamp> {
        let kind = self.read_u8()?;
        let value = self.read_f64()?;
        Some(match kind {
            0 => Clamp::Within(value),
            1 => Clamp::Below(value),
            _ => Clamp::Above(value),
        })
    }

    fn read_source(&mut self) -> Option<Option<TickSource>> {
        Some(match self.read_u8()? {
            0 => None,
            1 => Some(TickSource::DisplayRefresh),
            _ => Some(TickSource::Timer),
        })
    }

    fn read_lifecycle(&mut self) -> Option<Lifecycle> {
        Some(match self.read_u8()? {
            0 => Lifecycle::Enabled,
            1 => Lifecycle::Disabled,
            2 => Lifecycle::Destroyed,
            3 => Lifecycle::ContainmentApplied,
            4 => Lifecycle::LimitsReplaced,
            _ => Lifecycle::PositionReset,
        })
    }

    fn decode_gesture_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::GestureBegin(GestureBeginEvent {
            time: self.read_time()?,
            pointer: self.read_vec2()?.to_point(),
            baseline: self.read_vec2()?,
        }))
    }

    fn decode_direction_commit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::DirectionCommit(DirectionCommitEvent {
            time: self.read_time()?,
            moved: self.read_vec2()?,
            dominant: self.read_axis()?,
        }))
    }

    fn decode_gesture_abort(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::GestureAbort(GestureAbortEvent {
            time: self.read_time()?,
            moved: self.read_vec2()?,
            axis: self.read_some_axis()?,
        }))
    }

    fn decode_clamp(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Clamp(ClampEvent {
            time: self.read_time()?,
            axis: self.read_some_axis()?,
            candidate: self.read_f64()?,
            clamp: self.read_clamp()?,
        }))
    }

    fn decode_commit_scheduled(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::CommitScheduled(CommitScheduledEvent {
            time: self.read_time()?,
            translation: self.read_vec2()?,
            schedule: match self.read_u8()? {
                0 => Schedule::Requested,
                _ => Schedule::Coalesced,
            },
        }))
    }

    fn decode_commit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Commit(CommitEvent {
            frame_index: self.read_option_u64()?,
            now: self.read_time()?,
            source: self.read_source()?,
            translation: self.read_vec2()?,
            delta: self.read_vec2()?,
        }))
    }

    fn decode_gesture_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::GestureEnd(GestureEndEvent {
            time: self.read_time()?,
            reason: match self.read_u8()? {
                0 => EndReason::Release,
                _ => EndReason::Cancel,
            },
            was_active: self.read_u8()? != 0,
            delta: self.read_vec2()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_GESTURE_BEGIN => self.decode_gesture_begin(),
            TAG_DIRECTION_COMMIT => self.decode_direction_commit(),
            TAG_GESTURE_ABORT => self.decode_gesture_abort(),
            TAG_CLAMP => self.decode_clamp(),
            TAG_COMMIT_SCHEDULED => self.decode_commit_scheduled(),
            TAG_COMMIT => self.decode_commit(),
            TAG_GESTURE_END => self.decode_gesture_end(),
            TAG_LIFECYCLE => self.read_lifecycle().map(RecordedEvent::Lifecycle),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use dragble_core::config::{DragOptions, Target};
    use dragble_core::controller::{Callbacks, Dragble};
    use dragble_core::event::PointerEvent;
    use dragble_core::limits::LimitsConfig;
    use dragble_core::surface::SurfaceStore;
    use dragble_core::timing::FrameTick;
    use kurbo::{Point, Size};

    use super::*;

    #[test]
    fn clamp_event_keeps_its_side() {
        let mut rec = RecorderSink::new();
        rec.on_clamp(&ClampEvent {
            time: HostTime(9),
            axis: Axis::Y,
            candidate: -4.5,
            clamp: Clamp::Below(0.0),
        });

        let events: Vec<_> = rec.events().collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::Clamp(e) => {
                assert_eq!(e.time, HostTime(9));
                assert_eq!(e.axis, Axis::Y);
                assert_eq!(e.candidate, -4.5);
                assert_eq!(e.clamp, Clamp::Below(0.0));
            }
            other => panic!("expected Clamp, got {other:?}"),
        }
    }

    #[test]
    fn flush_commit_has_no_frame() {
        let mut rec = RecorderSink::new();
        rec.on_commit(&CommitEvent {
            frame_index: None,
            now: HostTime(3),
            source: None,
            translation: Vec2::new(1.0, 1.0),
            delta: Vec2::ZERO,
        });
        match rec.events().next() {
            Some(RecordedEvent::Commit(e)) => {
                assert_eq!(e.frame_index, None);
                assert_eq!(e.source, None);
                assert_eq!(e.translation, Vec2::new(1.0, 1.0));
            }
            other => panic!("expected Commit, got {other:?}"),
        }
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_lifecycle(Lifecycle::Enabled);
        rec.on_gesture_begin(&GestureBeginEvent {
            time: HostTime(1),
            pointer: Point::new(1.0, 2.0),
            baseline: Vec2::ZERO,
        });
        let bytes = rec.into_bytes();
        let events: Vec<_> = decode(&bytes[..bytes.len() - 3]).collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], RecordedEvent::Lifecycle(Lifecycle::Enabled)));
    }

    #[test]
    fn records_a_clamped_gesture_from_a_controller() {
        let mut store = SurfaceStore::new();
        let root = store.create_surface(Vec2::ZERO, Size::new(500.0, 500.0));
        let knob = store.create_surface(Vec2::ZERO, Size::new(10.0, 10.0));
        store.append_child(root, knob);

        let options = DragOptions {
            limits: Some(LimitsConfig {
                x: Some([0.0, 100.0]),
                y: None,
            }),
            ..DragOptions::default()
        };
        let mut drag =
            Dragble::new(&store, Target::Surface(knob), options, Callbacks::new()).unwrap();
        let recorder = Rc::new(RefCell::new(RecorderSink::new()));
        drag.set_trace_sink(Box::new(Rc::clone(&recorder)));

        let at = |x: f64| PointerEvent::new(knob, Point::new(x, 0.0), HostTime(0));
        drag.pointer_down(&mut store, &mut at(0.0));
        drag.pointer_move(&mut store, &mut at(150.0));
        drag.on_frame(&mut store, &FrameTick::refresh(HostTime(16), 0));
        drag.pointer_up(&mut store, &at(150.0));

        let events: Vec<_> = recorder.borrow().events().collect();
        let kinds: Vec<&str> = events
            .iter()
            .map(|e| match e {
                RecordedEvent::GestureBegin(_) => "begin",
                RecordedEvent::DirectionCommit(_) => "direction",
                RecordedEvent::GestureAbort(_) => "abort",
                RecordedEvent::Clamp(_) => "clamp",
                RecordedEvent::CommitScheduled(_) => "queue",
                RecordedEvent::Commit(_) => "commit",
                RecordedEvent::GestureEnd(_) => "end",
                RecordedEvent::Lifecycle(_) => "lifecycle",
            })
            .collect();
        assert_eq!(
            kinds,
            ["begin", "direction", "clamp", "queue", "commit", "end"]
        );
        match &events[4] {
            RecordedEvent::Commit(e) => {
                assert_eq!(e.frame_index, Some(0));
                assert_eq!(e.translation, Vec2::new(100.0, 0.0));
            }
            other => panic!("expected Commit, got {other:?}"),
        }
    }
}
