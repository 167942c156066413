// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted gesture driver for dragble controllers.
//!
//! A [`Harness`] stands in for a platform host: it owns an in-memory
//! [`SurfaceStore`](dragble_core::surface::SurfaceStore), one
//! [`Dragble`](dragble_core::controller::Dragble) controller and a
//! [`FallbackClock`](dragble_core::scheduler::FallbackClock), and plays a
//! [`GestureScript`] of pointer and timing steps against them. After every
//! delivered tick the store's changes are handed to a
//! [`Presenter`](dragble_core::backend::Presenter); [`CssPresenter`] records
//! the writes a DOM host would make.
//!
//! ```
//! use dragble_core::config::{DragOptions, Target};
//! use dragble_core::surface::SurfaceStore;
//! use dragble_harness::{CssPresenter, GestureScript, Harness, Reported};
//! use kurbo::{Size, Vec2};
//!
//! let mut store = SurfaceStore::new();
//! let knob = store.create_surface(Vec2::ZERO, Size::new(20.0, 20.0));
//!
//! let mut harness = Harness::new(
//!     store,
//!     Target::Surface(knob),
//!     DragOptions::default(),
//!     CssPresenter::new(),
//! )
//! .unwrap();
//! harness.run(&GestureScript::new().down(0.0, 0.0).move_to(15.0, 5.0).frame().up(15.0, 5.0));
//!
//! assert_eq!(
//!     harness.presenter().last_transform(knob.index()),
//!     Some("translate(15px, 5px)"),
//! );
//! assert!(matches!(harness.reported().last(), Some(Reported::End(_))));
//! ```

#![no_std]

extern crate alloc;

mod harness;
mod presenter;
mod script;

pub use harness::{Harness, Reported};
pub use presenter::{CssPresenter, Presented};
pub use script::{GestureScript, Step};
