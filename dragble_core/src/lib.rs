// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-gesture state machine with render-rate-limited commits.
//!
//! `dragble_core` turns a stream of pointer positions into a constrained 2D
//! translation of a surface. It is `no_std` compatible (with `alloc`) and
//! knows nothing about any particular platform: hosts describe their surfaces
//! through the [`SurfaceTree`](backend::SurfaceTree) trait and forward pointer
//! events and frame ticks to a [`Dragble`](controller::Dragble) controller.
//!
//! # Architecture
//!
//! ```text
//!   Host pointer events
//!       │
//!       ▼
//!   Dragble::pointer_down/move/up ──► GestureMachine::update() ──► Limits::clamp
//!       │
//!       ▼
//!   RenderScheduler::schedule(Commit)
//!       │
//!   FrameTick (display refresh or FallbackClock)
//!       │
//!       ▼
//!   Dragble::on_frame() ──► SurfaceTree::set_translation ──► on_drag_move
//!       │
//!       ▼ (retained hosts only)
//!   SurfaceStore::evaluate() ──► SurfaceChanges ──► Presenter::apply()
//! ```
//!
//! **[`controller`]**: The [`Dragble`](controller::Dragble) facade: lifecycle,
//! pointer input, frame ticks and host callbacks.
//!
//! **[`gesture`]**: Per-gesture state machine with direction commitment, axis
//! lock and overshoot-preserving clamping.
//!
//! **[`limits`]**: Per-axis movement ranges, explicit or derived from a
//! container surface.
//!
//! **[`scheduler`]**: At most one commit per tick, plus a fixed-rate fallback
//! clock for hosts without a refresh primitive.
//!
//! **[`config`]** and **[`error`]**: Host options, their validated form and
//! construction errors.
//!
//! **[`backend`]**: The [`SurfaceTree`](backend::SurfaceTree) host contract and
//! the [`Presenter`](backend::Presenter) trait.
//!
//! **[`surface`]**: In-memory struct-of-arrays surface tree with generational
//! handles and dirty tracking via `understory_dirty` (see [`dirty`]).
//!
//! **[`geometry`]** and **[`transform`]**: Cumulative offsets, transform
//! strings and their parsing.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! gesture instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-axis clamp
//!   events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod config;
pub mod controller;
pub mod dirty;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod limits;
pub mod scheduler;
pub mod surface;
pub mod time;
pub mod timing;
pub mod trace;
pub mod transform;
