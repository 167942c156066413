// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory retained surface tree.
//!
//! [`SurfaceStore`] implements [`SurfaceTree`](crate::backend::SurfaceTree)
//! without any platform behind it. It serves hosts that keep their own
//! retained model between the controller and a native tree, and it is the
//! host double used throughout the tests.
//!
//! Each surface has:
//!
//! - An identity ([`SurfaceId`]): a generational handle that becomes stale
//!   when the surface is destroyed.
//! - Topology: a structural parent (for handle hit-testing) and an offset
//!   parent (for layout offsets), usually the same surface.
//! - **Layout** set by the host: offset and size.
//! - **Visual state** set by controllers: transform and dragging flag. These
//!   mutations are dirty-tracked (see [`dirty`](crate::dirty)) and surface as
//!   [`SurfaceChanges`] from [`SurfaceStore::evaluate`].

mod evaluate;
mod id;
mod store;

pub use evaluate::SurfaceChanges;
pub use id::{INVALID, SurfaceId};
pub use store::SurfaceStore;
