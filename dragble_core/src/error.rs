// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction errors.
//!
//! Dragble has no fallible I/O. The only errors are configuration mistakes,
//! reported once when a [`Dragble`](crate::controller::Dragble) is built.
//! Everything after construction is infallible: malformed transforms read as
//! zero, degenerate containment collapses, and lifecycle calls on a destroyed
//! controller are no-ops.

use core::fmt;

use crate::config::Axis;

/// A configuration problem detected while building a controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The target surface does not exist or its lookup key matched nothing.
    MissingTarget,
    /// The handle surface does not exist or its lookup key matched nothing.
    MissingHandle,
    /// The containment surface does not exist or its lookup key matched
    /// nothing.
    MissingContainer,
    /// An explicit range has `min > max`.
    InvertedLimits {
        /// The offending axis.
        axis: Axis,
    },
    /// An explicit range has a NaN bound.
    NonFiniteLimit {
        /// The offending axis.
        axis: Axis,
    },
    /// Limits were given both through `limits` and the legacy per-axis
    /// fields.
    ConflictingLimits,
    /// The fallback timer rate is zero.
    InvalidFallbackRate,
    /// The direction threshold is negative or not finite.
    InvalidThreshold,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTarget => write!(f, "target surface not found"),
            Self::MissingHandle => write!(f, "handle surface not found"),
            Self::MissingContainer => write!(f, "containment surface not found"),
            Self::InvertedLimits { axis } => {
                write!(f, "{axis:?} limits are inverted (min > max)")
            }
            Self::NonFiniteLimit { axis } => write!(f, "{axis:?} limits contain NaN"),
            Self::ConflictingLimits => {
                write!(f, "limits given both as `limits` and as legacy per-axis fields")
            }
            Self::InvalidFallbackRate => write!(f, "fallback timer rate must be non-zero"),
            Self::InvalidThreshold => {
                write!(f, "direction threshold must be finite and non-negative")
            }
        }
    }
}

impl core::error::Error for ConfigError {}
