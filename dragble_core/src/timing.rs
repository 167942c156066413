// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame opportunities delivered by the host.
//!
//! A [`FrameTick`] is produced each time the host can make a position commit
//! observable: either from a display-refresh callback (e.g.
//! `requestAnimationFrame`) or, when no such primitive exists, from the
//! fixed-rate [`FallbackClock`](crate::scheduler::FallbackClock).

use crate::time::HostTime;

/// Where a [`FrameTick`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TickSource {
    /// Synchronized with the display refresh (e.g. `requestAnimationFrame`).
    DisplayRefresh,
    /// Fixed-rate timer used when no refresh primitive is available.
    Timer,
}

/// A single frame opportunity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTick {
    /// Host time when the tick was generated.
    pub now: HostTime,
    /// Monotonically increasing frame counter.
    pub frame_index: u64,
    /// What produced this tick.
    pub source: TickSource,
}

impl FrameTick {
    /// Creates a display-refresh tick.
    #[must_use]
    pub const fn refresh(now: HostTime, frame_index: u64) -> Self {
        Self {
            now,
            frame_index,
            source: TickSource::DisplayRefresh,
        }
    }
}
