// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller configuration.
//!
//! Hosts describe a controller with [`DragOptions`], a plain struct with a
//! [`Default`] impl so only the interesting fields need spelling out:
//!
//! ```rust,ignore
//! let options = DragOptions {
//!     axis: AxisConstraint::LockedToX,
//!     containment: Some(Target::Key("#track")),
//!     ..DragOptions::default()
//! };
//! ```
//!
//! [`DragConfig::from_options`] validates the options and normalizes the
//! legacy per-axis limit fields into the single `limits` schema. The
//! resulting [`DragConfig`] is owned by the controller and never attached to
//! a surface.

use crate::backend::SurfaceTree;
use crate::error::ConfigError;
use crate::limits::{Limits, LimitsConfig};
use crate::scheduler::SchedulerConfig;
use crate::transform::RenderMode;

/// One of the two movement axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

/// Which axes are forbidden for the lifetime of a controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AxisLock {
    /// Movement along x is forbidden.
    pub x: bool,
    /// Movement along y is forbidden.
    pub y: bool,
}

impl AxisLock {
    /// Both axes free.
    pub const NONE: Self = Self { x: false, y: false };

    /// Whether movement along `axis` is forbidden.
    #[must_use]
    pub const fn forbids(self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// The host-facing axis option.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisConstraint {
    /// Free movement on both axes.
    #[default]
    None,
    /// Gestures are locked to the x axis; y movement is forbidden.
    LockedToX,
    /// Gestures are locked to the y axis; x movement is forbidden.
    LockedToY,
}

impl AxisConstraint {
    /// The persistent [`AxisLock`] this constraint implies.
    #[must_use]
    pub const fn lock(self) -> AxisLock {
        match self {
            Self::None => AxisLock::NONE,
            Self::LockedToX => AxisLock { x: false, y: true },
            Self::LockedToY => AxisLock { x: true, y: false },
        }
    }
}

/// A surface given either directly or by lookup key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target<'a, Id> {
    /// A surface handle.
    Surface(Id),
    /// A key resolved through [`SurfaceTree::lookup`].
    Key(&'a str),
}

impl<Id: Copy> Target<'_, Id> {
    /// Resolves the target against `tree`.
    ///
    /// Returns `None` when the handle is stale or the key matches nothing.
    #[must_use]
    pub fn resolve<T>(&self, tree: &T) -> Option<Id>
    where
        T: SurfaceTree<Id = Id> + ?Sized,
    {
        match *self {
            Self::Surface(id) => tree.is_alive(id).then_some(id),
            Self::Key(key) => tree.lookup(key),
        }
    }
}

/// Everything a host can configure on a controller.
#[derive(Clone, Copy, Debug)]
pub struct DragOptions<'a, Id> {
    /// Persistent axis restriction.
    pub axis: AxisConstraint,
    /// Explicit bounds in pixels. Wins over `containment` at construction.
    pub limits: Option<LimitsConfig>,
    /// Legacy spelling of `limits.x`. Normalized at construction.
    pub limits_x: Option<[f64; 2]>,
    /// Legacy spelling of `limits.y`. Normalized at construction.
    pub limits_y: Option<[f64; 2]>,
    /// Surface whose bounds the draggable must stay within.
    pub containment: Option<Target<'a, Id>>,
    /// Sub-surface that is the only region allowed to start a gesture.
    pub handle: Option<Target<'a, Id>>,
    /// How commits are expressed on the surface.
    pub render_mode: RenderMode,
    /// Stop the pointer-down from reaching outer draggables.
    pub stop_propagation: bool,
    /// Pointer travel (px) that must be exceeded before a gesture commits to
    /// a direction.
    pub direction_threshold: f64,
    /// Render scheduler settings.
    pub scheduler: SchedulerConfig,
}

impl<Id> Default for DragOptions<'_, Id> {
    fn default() -> Self {
        Self {
            axis: AxisConstraint::None,
            limits: None,
            limits_x: None,
            limits_y: None,
            containment: None,
            handle: None,
            render_mode: RenderMode::TwoD,
            stop_propagation: true,
            direction_threshold: 0.0,
            scheduler: SchedulerConfig::new(),
        }
    }
}

/// Validated, normalized controller configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragConfig {
    /// The host-facing axis option.
    pub axis: AxisConstraint,
    /// Axes forbidden for the controller's lifetime.
    pub lock: AxisLock,
    /// Explicit limits, if any were configured.
    pub explicit_limits: Option<Limits>,
    /// How commits are expressed on the surface.
    pub render_mode: RenderMode,
    /// Stop the pointer-down from reaching outer draggables.
    pub stop_propagation: bool,
    /// Travel that must be exceeded before direction commitment.
    pub direction_threshold: f64,
    /// Render scheduler settings.
    pub scheduler: SchedulerConfig,
}

impl DragConfig {
    /// Validates `options` and folds legacy fields into the current schema.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ConflictingLimits`] if `limits` and a legacy
    ///   `limits_x`/`limits_y` field are both set.
    /// - [`ConfigError::InvertedLimits`] / [`ConfigError::NonFiniteLimit`]
    ///   for malformed explicit ranges.
    /// - [`ConfigError::InvalidFallbackRate`] for a zero fallback rate.
    /// - [`ConfigError::InvalidThreshold`] for a negative or non-finite
    ///   direction threshold.
    pub fn from_options<Id>(options: &DragOptions<'_, Id>) -> Result<Self, ConfigError> {
        let legacy = options.limits_x.is_some() || options.limits_y.is_some();
        let limits_config = match (options.limits, legacy) {
            (Some(_), true) => return Err(ConfigError::ConflictingLimits),
            (Some(limits), false) => Some(limits),
            (None, true) => Some(LimitsConfig {
                x: options.limits_x,
                y: options.limits_y,
            }),
            (None, false) => None,
        };
        let explicit_limits = limits_config
            .as_ref()
            .map(Limits::from_config)
            .transpose()?;

        if options.scheduler.fallback_rate_hz == 0 {
            return Err(ConfigError::InvalidFallbackRate);
        }
        let threshold = options.direction_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold);
        }

        Ok(Self {
            axis: options.axis,
            lock: options.axis.lock(),
            explicit_limits,
            render_mode: options.render_mode,
            stop_propagation: options.stop_propagation,
            direction_threshold: threshold,
            scheduler: options.scheduler,
        })
    }
}
