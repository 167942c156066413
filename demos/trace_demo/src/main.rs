// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted slider gestures that exercise the tracing and diagnostics
//! pipeline.
//!
//! Builds a horizontal slider in a [`SurfaceStore`], plays two gestures
//! through a [`Harness`] (one that overshoots the track end, one that starts
//! vertically and is suppressed by the axis lock), prints every trace event
//! with a [`PrettyPrintSink`] and writes a Chrome trace JSON file.

use std::cell::RefCell;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use dragble_core::config::{AxisConstraint, DragOptions, Target};
use dragble_core::surface::SurfaceStore;
use dragble_core::time::Duration;
use dragble_core::trace::{
    ClampEvent, CommitEvent, CommitScheduledEvent, DirectionCommitEvent, GestureAbortEvent,
    GestureBeginEvent, GestureEndEvent, Lifecycle, TraceSink,
};
use dragble_debug::pretty::PrettyPrintSink;
use dragble_debug::recorder::RecorderSink;
use dragble_harness::{CssPresenter, GestureScript, Harness, Presented};
use kurbo::{Size, Vec2};

/// Forwards every event to a pretty printer and a shared recorder.
struct Tee {
    pretty: PrettyPrintSink,
    recorder: Rc<RefCell<RecorderSink>>,
}

impl TraceSink for Tee {
    fn on_gesture_begin(&mut self, e: &GestureBeginEvent) {
        self.pretty.on_gesture_begin(e);
        self.recorder.on_gesture_begin(e);
    }

    fn on_direction_commit(&mut self, e: &DirectionCommitEvent) {
        self.pretty.on_direction_commit(e);
        self.recorder.on_direction_commit(e);
    }

    fn on_gesture_abort(&mut self, e: &GestureAbortEvent) {
        self.pretty.on_gesture_abort(e);
        self.recorder.on_gesture_abort(e);
    }

    fn on_clamp(&mut self, e: &ClampEvent) {
        self.pretty.on_clamp(e);
        self.recorder.on_clamp(e);
    }

    fn on_commit_scheduled(&mut self, e: &CommitScheduledEvent) {
        self.pretty.on_commit_scheduled(e);
        self.recorder.on_commit_scheduled(e);
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        self.pretty.on_commit(e);
        self.recorder.on_commit(e);
    }

    fn on_gesture_end(&mut self, e: &GestureEndEvent) {
        self.pretty.on_gesture_end(e);
        self.recorder.on_gesture_end(e);
    }

    fn on_lifecycle(&mut self, change: Lifecycle) {
        self.pretty.on_lifecycle(change);
        self.recorder.on_lifecycle(change);
    }
}

fn main() {
    // -- page --------------------------------------------------------------
    let mut store = SurfaceStore::new();
    let page = store.create_surface(Vec2::ZERO, Size::new(800.0, 600.0));
    let track = store.create_surface(Vec2::new(40.0, 40.0), Size::new(300.0, 40.0));
    let knob = store.create_surface(Vec2::new(0.0, 10.0), Size::new(20.0, 20.0));
    store.append_child(page, track);
    store.append_child(track, knob);
    store.set_key(track, "#track");
    store.set_key(knob, "#knob");

    let options = DragOptions {
        axis: AxisConstraint::LockedToX,
        containment: Some(Target::Key("#track")),
        ..DragOptions::default()
    };
    let mut harness = Harness::new(store, Target::Key("#knob"), options, CssPresenter::new())
        .expect("slider configuration is valid");

    // -- sinks -------------------------------------------------------------
    let recorder = Rc::new(RefCell::new(RecorderSink::new()));
    harness.drag_mut().set_trace_sink(Box::new(Tee {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: Rc::clone(&recorder),
    }));

    // -- gestures ----------------------------------------------------------
    let frame = Duration::from_millis(16);
    let script = GestureScript::new()
        // Drag right past the end of the track.
        .down(50.0, 60.0)
        .glide(200.0, 62.0, 6)
        .advance(frame)
        .glide(500.0, 60.0, 6)
        .frame()
        // Come back a little; the knob stays pinned until the pointer
        // re-enters the track.
        .glide(420.0, 60.0, 4)
        .frame()
        .up(420.0, 60.0)
        .advance(Duration::from_millis(250))
        // Mostly vertical start: suppressed by the x-only lock.
        .down(300.0, 60.0)
        .move_to(302.0, 90.0)
        .move_to(330.0, 95.0)
        .frame()
        .up(330.0, 95.0);
    harness.run(&script);

    // -- present -----------------------------------------------------------
    for write in harness.presenter().writes() {
        match write {
            Presented::Transform { slot, css } => println!("present #{slot}: transform = {css}"),
            Presented::Dragging { slot, on } => println!("present #{slot}: isDragging = {on}"),
        }
    }

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    dragble_debug::chrome::export(recorder.borrow().as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!(
        "Wrote {path} ({} ticks, {} commits, final translation {:?})",
        harness.ticks(),
        harness.drag().commit_count(),
        harness.drag().position(),
    );
}
