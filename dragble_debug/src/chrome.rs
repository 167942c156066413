// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use dragble_core::config::Axis;
use dragble_core::time::HostTime;
use dragble_core::trace::Lifecycle;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// A gesture becomes a `B`/`E` duration pair named `Gesture`; everything
/// else is an instant event. A gesture closed by an abort or by destroying
/// the controller ends its span there, so spans always balance. Lifecycle
/// records carry no time of their own and are stamped with the most recent
/// timestamp seen.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut last = HostTime(0);
    let mut open = false;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::GestureBegin(e) => {
                last = e.time;
                if open {
                    events.push(span_end(e.time, json!({ "reason": "Superseded" })));
                }
                open = true;
                events.push(json!({
                    "ph": "B",
                    "name": "Gesture",
                    "cat": "Gesture",
                    "ts": to_us(e.time),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "pointer": [e.pointer.x, e.pointer.y],
                        "baseline": [e.baseline.x, e.baseline.y],
                    }
                }));
            }
            RecordedEvent::DirectionCommit(e) => {
                last = e.time;
                events.push(json!({
                    "ph": "i",
                    "name": "DirectionCommit",
                    "cat": "Gesture",
                    "ts": to_us(e.time),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "moved": [e.moved.x, e.moved.y],
                        "dominant": e.dominant.map(axis_name),
                    }
                }));
            }
            RecordedEvent::GestureAbort(e) => {
                last = e.time;
                events.push(json!({
                    "ph": "i",
                    "name": "GestureAbort",
                    "cat": "Gesture",
                    "ts": to_us(e.time),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "moved": [e.moved.x, e.moved.y],
                        "locked": axis_name(e.axis),
                    }
                }));
                if open {
                    open = false;
                    events.push(span_end(e.time, json!({ "reason": "Abort" })));
                }
            }
            RecordedEvent::Clamp(e) => {
                last = e.time;
                events.push(json!({
                    "ph": "i",
                    "name": "Clamp",
                    "cat": "Rich",
                    "ts": to_us(e.time),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "axis": axis_name(e.axis),
                        "candidate": e.candidate,
                        "value": e.clamp.value(),
                    }
                }));
            }
            RecordedEvent::CommitScheduled(e) => {
                last = e.time;
                events.push(json!({
                    "ph": "i",
                    "name": "CommitScheduled",
                    "cat": "Scheduler",
                    "ts": to_us(e.time),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "translation": [e.translation.x, e.translation.y],
                        "schedule": format!("{:?}", e.schedule),
                    }
                }));
            }
            RecordedEvent::Commit(e) => {
                last = e.now;
                events.push(json!({
                    "ph": "i",
                    "name": "Commit",
                    "cat": "Scheduler",
                    "ts": to_us(e.now),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                        "source": e.source.map(|s| format!("{s:?}")),
                        "translation": [e.translation.x, e.translation.y],
                        "delta": [e.delta.x, e.delta.y],
                    }
                }));
            }
            RecordedEvent::GestureEnd(e) => {
                last = e.time;
                let args = json!({
                    "reason": format!("{:?}", e.reason),
                    "was_active": e.was_active,
                    "delta": [e.delta.x, e.delta.y],
                });
                if open {
                    open = false;
                    events.push(span_end(e.time, args));
                } else {
                    events.push(json!({
                        "ph": "i",
                        "name": "GestureEnd",
                        "cat": "Gesture",
                        "ts": to_us(e.time),
                        "pid": 0,
                        "tid": 0,
                        "s": "t",
                        "args": args,
                    }));
                }
            }
            RecordedEvent::Lifecycle(change) => {
                if open && change == Lifecycle::Destroyed {
                    open = false;
                    events.push(span_end(last, json!({ "reason": "Destroyed" })));
                }
                events.push(json!({
                    "ph": "i",
                    "name": format!("{change:?}"),
                    "cat": "Lifecycle",
                    "ts": to_us(last),
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn span_end(time: HostTime, args: Value) -> Value {
    json!({
        "ph": "E",
        "name": "Gesture",
        "cat": "Gesture",
        "ts": to_us(time),
        "pid": 0,
        "tid": 0,
        "args": args,
    })
}

fn to_us(t: HostTime) -> f64 {
    t.nanos() as f64 / 1000.0
}

fn axis_name(axis: Axis) -> &'static str {
    match axis {
        Axis::X => "x",
        Axis::Y => "y",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use dragble_core::trace::{
        EndReason, GestureAbortEvent, GestureBeginEvent, GestureEndEvent, TraceSink,
    };
    use kurbo::{Point, Vec2};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_gesture_begin(&GestureBeginEvent {
            time: HostTime(1_000_000),
            pointer: Point::new(5.0, 5.0),
            baseline: Vec2::ZERO,
        });
        rec.on_gesture_end(&GestureEndEvent {
            time: HostTime(3_000_000),
            reason: EndReason::Release,
            was_active: false,
            delta: Vec2::ZERO,
        });
        rec.on_lifecycle(Lifecycle::Disabled);

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "Gesture");
        assert_eq!(parsed[0]["ts"], 1000.0);

        assert_eq!(parsed[1]["ph"], "E");
        assert_eq!(parsed[1]["args"]["reason"], "Release");

        // Lifecycle inherits the previous timestamp.
        assert_eq!(parsed[2]["name"], "Disabled");
        assert_eq!(parsed[2]["ts"], 3000.0);
    }

    #[test]
    fn abort_names_the_locked_axis() {
        let mut rec = RecorderSink::new();
        rec.on_gesture_abort(&GestureAbortEvent {
            time: HostTime(0),
            moved: Vec2::new(2.0, 10.0),
            axis: Axis::Y,
        });
        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["name"], "GestureAbort");
        assert_eq!(parsed[0]["args"]["locked"], "y");
    }

    fn phases(bytes: &[u8]) -> Vec<String> {
        let mut out = Vec::new();
        export(bytes, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        parsed
            .iter()
            .filter(|e| e["name"] == "Gesture")
            .map(|e| e["ph"].as_str().unwrap().to_string())
            .collect()
    }

    fn begin(rec: &mut RecorderSink, ms: u64) {
        rec.on_gesture_begin(&GestureBeginEvent {
            time: HostTime(ms * 1_000_000),
            pointer: Point::ZERO,
            baseline: Vec2::ZERO,
        });
    }

    #[test]
    fn aborted_gesture_closes_its_span() {
        let mut rec = RecorderSink::new();
        begin(&mut rec, 1);
        rec.on_gesture_abort(&GestureAbortEvent {
            time: HostTime(2_000_000),
            moved: Vec2::new(0.0, 9.0),
            axis: Axis::Y,
        });
        begin(&mut rec, 3);
        rec.on_gesture_end(&GestureEndEvent {
            time: HostTime(4_000_000),
            reason: EndReason::Release,
            was_active: true,
            delta: Vec2::new(20.0, 0.0),
        });
        assert_eq!(phases(rec.as_bytes()), ["B", "E", "B", "E"]);
    }

    #[test]
    fn destroy_closes_an_open_span() {
        let mut rec = RecorderSink::new();
        begin(&mut rec, 1);
        rec.on_lifecycle(Lifecycle::Destroyed);
        assert_eq!(phases(rec.as_bytes()), ["B", "E"]);

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[1]["args"]["reason"], "Destroyed");
        assert_eq!(parsed[2]["name"], "Destroyed");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
