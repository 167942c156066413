// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for dragble
//! diagnostics.
//!
//! This crate provides [`TraceSink`](dragble_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//!
//! Sinks are handed to a controller with
//! [`Dragble::set_trace_sink`](dragble_core::controller::Dragble::set_trace_sink).
//! Wrap one in `Rc<RefCell<_>>` to keep reading it while the controller
//! holds a clone.

pub mod chrome;
pub mod pretty;
pub mod recorder;
