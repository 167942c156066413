// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Host times
//! are printed in milliseconds.

use std::io::Write;

use dragble_core::config::Axis;
use dragble_core::limits::Clamp;
use dragble_core::time::HostTime;
use dragble_core::trace::{
    ClampEvent, CommitEvent, CommitScheduledEvent, DirectionCommitEvent, EndReason,
    GestureAbortEvent, GestureBeginEvent, GestureEndEvent, Lifecycle, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(t: HostTime) -> f64 {
    t.nanos() as f64 / 1_000_000.0
}

fn axis_name(axis: Axis) -> &'static str {
    match axis {
        Axis::X => "x",
        Axis::Y => "y",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_gesture_begin(&mut self, e: &GestureBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[begin] at {:.3}ms pointer=({:.1}, {:.1}) baseline=({:.1}, {:.1})",
            ms(e.time),
            e.pointer.x,
            e.pointer.y,
            e.baseline.x,
            e.baseline.y,
        );
    }

    fn on_direction_commit(&mut self, e: &DirectionCommitEvent) {
        let dominant = e.dominant.map_or("tie", axis_name);
        let _ = writeln!(
            self.writer,
            "[direction] at {:.3}ms moved=({:.1}, {:.1}) dominant={dominant}",
            ms(e.time),
            e.moved.x,
            e.moved.y,
        );
    }

    fn on_gesture_abort(&mut self, e: &GestureAbortEvent) {
        let _ = writeln!(
            self.writer,
            "[abort] at {:.3}ms moved=({:.1}, {:.1}) locked={}",
            ms(e.time),
            e.moved.x,
            e.moved.y,
            axis_name(e.axis),
        );
    }

    fn on_clamp(&mut self, e: &ClampEvent) {
        let side = match e.clamp {
            Clamp::Within(_) => "within",
            Clamp::Below(_) => "min",
            Clamp::Above(_) => "max",
        };
        let _ = writeln!(
            self.writer,
            "[clamp] {} {:.1} -> {:.1} ({side})",
            axis_name(e.axis),
            e.candidate,
            e.clamp.value(),
        );
    }

    fn on_commit_scheduled(&mut self, e: &CommitScheduledEvent) {
        let _ = writeln!(
            self.writer,
            "[queue] at {:.3}ms translation=({:.1}, {:.1}) {:?}",
            ms(e.time),
            e.translation.x,
            e.translation.y,
            e.schedule,
        );
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        let frame = e
            .frame_index
            .map_or_else(|| String::from("flush"), |i| format!("frame={i}"));
        let _ = writeln!(
            self.writer,
            "[commit] {frame} at {:.3}ms translation=({:.1}, {:.1}) delta=({:.1}, {:.1})",
            ms(e.now),
            e.translation.x,
            e.translation.y,
            e.delta.x,
            e.delta.y,
        );
    }

    fn on_gesture_end(&mut self, e: &GestureEndEvent) {
        let reason = match e.reason {
            EndReason::Release => "release",
            EndReason::Cancel => "cancel",
        };
        let _ = writeln!(
            self.writer,
            "[end] at {:.3}ms {reason} active={} delta=({:.1}, {:.1})",
            ms(e.time),
            e.was_active,
            e.delta.x,
            e.delta.y,
        );
    }

    fn on_lifecycle(&mut self, change: Lifecycle) {
        let _ = writeln!(self.writer, "[lifecycle] {change:?}");
    }
}
