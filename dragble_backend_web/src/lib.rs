// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM binding for dragble.
//!
//! This crate connects a [`Dragble`](dragble_core::controller::Dragble)
//! controller to browser APIs:
//!
//! - [`DomTree`]: [`SurfaceTree`](dragble_core::backend::SurfaceTree) over
//!   live elements (`offsetParent` geometry, computed `transform`, the
//!   `isDragging` class)
//! - [`FrameRequester`]: one-shot `requestAnimationFrame` ticks with a
//!   `setTimeout` fallback
//! - [`WebDragble`]: start, move and release listeners wired to the
//!   controller
//!
//! ```rust,ignore
//! let tree = DomTree::from_global()?;
//! let knob = tree.register(&knob_el);
//! let track = tree.register(&track_el);
//! let drag = WebDragble::new(
//!     tree,
//!     Target::Surface(knob),
//!     DragOptions {
//!         axis: AxisConstraint::LockedToX,
//!         containment: Some(Target::Surface(track)),
//!         ..DragOptions::default()
//!     },
//!     Callbacks::new().on_end(|_, delta| log(delta)),
//! )?;
//! ```

#![no_std]

extern crate alloc;

mod drag;
mod frame;
mod input;
mod tree;

pub use drag::{AttachError, WebDragble};
pub use frame::FrameRequester;
pub use input::InputScheme;
pub use tree::{DRAGGING_CLASS, DomTree, ElementId};

use dragble_core::time::HostTime;

/// Returns the current host time from `performance.now()`.
#[must_use]
pub fn now() -> HostTime {
    HostTime::from_millis_f64(frame::performance_now())
}
