// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! [`SurfaceStore`](crate::surface::SurfaceStore) records visible mutations
//! with [`understory_dirty`] so presenters can apply only what changed since
//! the last [`evaluate`](crate::surface::SurfaceStore::evaluate). Both
//! channels are local-only: a surface's translation and dragging state do not
//! affect its descendants' stored values.

use understory_dirty::Channel;

/// Translation changed.
pub const TRANSFORM: Channel = Channel::new(0);

/// The "is dragging" state changed.
pub const STATE: Channel = Channel::new(1);
