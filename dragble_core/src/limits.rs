// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Movement limits and the containment resolver.
//!
//! [`Limits`] holds one closed [`AxisLimits`] range per axis. Ranges are
//! either supplied explicitly (see [`LimitsConfig`]) or derived from a
//! container surface with [`Limits::from_containment`].
//!
//! # Containment
//!
//! Both surfaces are measured at their *current* untransformed positions,
//! which act as the zero reference for the draggable's translation. Per
//! unlocked axis:
//!
//! ```text
//! limit1 = container_offset − draggable_offset
//! limit2 = (container_size − draggable_size) − |limit1|
//! ```
//!
//! A draggable larger than its container would produce `limit2 < limit1`;
//! the range then collapses onto `limit1` so that `min ≤ max` always holds.
//! Locked axes resolve to `[0, 0]`.

use crate::backend::SurfaceTree;
use crate::config::{Axis, AxisLock};
use crate::error::ConfigError;
use crate::geometry::cumulative_offset;

/// Outcome of clamping a candidate value against an [`AxisLimits`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Clamp {
    /// The candidate lies within the range and is used as-is.
    Within(f64),
    /// The candidate was below the range and was pinned to `min`.
    Below(f64),
    /// The candidate was above the range and was pinned to `max`.
    Above(f64),
}

impl Clamp {
    /// The resulting value.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Within(v) | Self::Below(v) | Self::Above(v) => v,
        }
    }

    /// Whether the candidate had to be pinned.
    #[must_use]
    pub const fn is_pinned(self) -> bool {
        !matches!(self, Self::Within(_))
    }
}

/// A closed range `[min, max]` with `min ≤ max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisLimits {
    min: f64,
    max: f64,
}

impl AxisLimits {
    /// The unbounded range `(−∞, +∞)`.
    pub const UNBOUNDED: Self = Self {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    /// The degenerate range `[0, 0]` used for locked axes.
    pub const ZERO: Self = Self { min: 0.0, max: 0.0 };

    /// Creates a range, or `None` if either bound is NaN or `min > max`.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    /// Creates a range from two bounds, collapsing onto `min` when the bounds
    /// are inverted.
    ///
    /// NaN bounds collapse to `[0, 0]`.
    #[must_use]
    pub fn collapsing(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else if min.is_nan() {
            Self::ZERO
        } else {
            Self { min, max: min }
        }
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Whether `value` lies within the range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Whether the range admits only one value.
    #[must_use]
    pub fn is_point(&self) -> bool {
        self.min == self.max
    }

    /// Clamps `candidate` into the range.
    ///
    /// A NaN candidate is treated as below the range.
    #[must_use]
    pub fn clamp(&self, candidate: f64) -> Clamp {
        if self.contains(candidate) {
            Clamp::Within(candidate)
        } else if candidate > self.max {
            Clamp::Above(self.max)
        } else {
            Clamp::Below(self.min)
        }
    }
}

impl Default for AxisLimits {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// Explicit per-axis ranges as supplied by the host.
///
/// An axis left as `None` is unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LimitsConfig {
    /// `[min, max]` for the x axis.
    pub x: Option<[f64; 2]>,
    /// `[min, max]` for the y axis.
    pub y: Option<[f64; 2]>,
}

/// Movement limits for both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Limits {
    /// Range for the x axis.
    pub x: AxisLimits,
    /// Range for the y axis.
    pub y: AxisLimits,
}

impl Limits {
    /// Unbounded on both axes.
    pub const UNBOUNDED: Self = Self {
        x: AxisLimits::UNBOUNDED,
        y: AxisLimits::UNBOUNDED,
    };

    /// Creates limits from two axis ranges.
    #[must_use]
    pub const fn new(x: AxisLimits, y: AxisLimits) -> Self {
        Self { x, y }
    }

    /// Returns the range for `axis`.
    #[must_use]
    pub const fn axis(&self, axis: Axis) -> AxisLimits {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Uses explicit ranges verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFiniteLimit`] for a NaN bound and
    /// [`ConfigError::InvertedLimits`] when `min > max`. Infinite bounds are
    /// accepted.
    pub fn from_config(config: &LimitsConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            x: axis_from_config(Axis::X, config.x)?,
            y: axis_from_config(Axis::Y, config.y)?,
        })
    }

    /// Derives limits that keep `draggable` inside `container`.
    ///
    /// Axes forbidden by `lock` resolve to `[0, 0]`.
    #[must_use]
    pub fn from_containment<T: SurfaceTree + ?Sized>(
        tree: &T,
        draggable: T::Id,
        container: T::Id,
        lock: AxisLock,
    ) -> Self {
        let drag_pos = cumulative_offset(tree, draggable);
        let cont_pos = cumulative_offset(tree, container);
        let drag_size = tree.size(draggable);
        let cont_size = tree.size(container);

        let x = if lock.x {
            AxisLimits::ZERO
        } else {
            contain_axis(cont_pos.x - drag_pos.x, cont_size.width - drag_size.width)
        };
        let y = if lock.y {
            AxisLimits::ZERO
        } else {
            contain_axis(cont_pos.y - drag_pos.y, cont_size.height - drag_size.height)
        };
        Self { x, y }
    }
}

fn axis_from_config(axis: Axis, range: Option<[f64; 2]>) -> Result<AxisLimits, ConfigError> {
    let Some([min, max]) = range else {
        return Ok(AxisLimits::UNBOUNDED);
    };
    if min.is_nan() || max.is_nan() {
        return Err(ConfigError::NonFiniteLimit { axis });
    }
    AxisLimits::new(min, max).ok_or(ConfigError::InvertedLimits { axis })
}

fn contain_axis(limit1: f64, slack: f64) -> AxisLimits {
    let limit2 = slack - limit1.abs();
    AxisLimits::collapsing(limit1, limit2)
}
