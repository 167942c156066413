// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-gesture state machine.
//!
//! ```text
//!            begin            travel > threshold            end / abandon
//!   Idle ───────────► Pending ─────────────────► Active ───────────────► Idle
//!                        │
//!                        └── dominant axis locked ──► Idle (aborted)
//! ```
//!
//! A [`GestureMachine`] owns at most one [`GestureSession`]. The session is
//! created on pointer-down and destroyed when the gesture ends, aborts or is
//! abandoned; nothing about it outlives the gesture.
//!
//! # Clamping
//!
//! While active, each unlocked axis is updated independently:
//!
//! ```text
//! candidate = relative + (pointer − last_pointer)
//! ```
//!
//! A candidate inside the axis limits is accepted and the axis's pointer
//! reference advances to the current pointer. A candidate outside is pinned to
//! the nearest bound and the reference stays put, so the overshoot must be
//! retraced before the surface moves again. The position never jumps when the
//! pointer comes back into range.
//!
//! The machine knows nothing about surfaces or scheduling; the
//! [`controller`](crate::controller) feeds it pointer positions and turns its
//! outcomes into commits.

use kurbo::{Point, Vec2};

use crate::config::{Axis, AxisLock};
use crate::limits::{Clamp, Limits};

/// Where a gesture is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// No gesture.
    #[default]
    Idle,
    /// Pointer is down but has not yet committed to a direction.
    Pending,
    /// The gesture is moving the surface.
    Active,
}

/// State of one gesture, from pointer-down to pointer-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSession {
    start: Point,
    last: Point,
    baseline: Vec2,
    relative: Vec2,
    active: bool,
}

impl GestureSession {
    /// Starts a session at `pointer` with the surface currently translated by
    /// `baseline`.
    #[must_use]
    pub const fn new(pointer: Point, baseline: Vec2) -> Self {
        Self {
            start: pointer,
            last: pointer,
            baseline,
            relative: baseline,
            active: false,
        }
    }

    /// Pointer position at gesture start.
    #[must_use]
    pub const fn start(&self) -> Point {
        self.start
    }

    /// Translation at gesture start.
    #[must_use]
    pub const fn baseline(&self) -> Vec2 {
        self.baseline
    }

    /// Current translation.
    #[must_use]
    pub const fn translation(&self) -> Vec2 {
        self.relative
    }

    /// Translation change since gesture start.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.relative - self.baseline
    }

    /// Whether the session has committed to a direction.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Session phase.
    #[must_use]
    pub const fn phase(&self) -> GesturePhase {
        if self.active {
            GesturePhase::Active
        } else {
            GesturePhase::Pending
        }
    }

    fn step(&mut self, axis: Axis, pointer: f64, limits: &Limits) -> Clamp {
        let (relative, last) = match axis {
            Axis::X => (&mut self.relative.x, &mut self.last.x),
            Axis::Y => (&mut self.relative.y, &mut self.last.y),
        };
        let candidate = *relative + (pointer - *last);
        let clamp = limits.axis(axis).clamp(candidate);
        if let Clamp::Within(_) = clamp {
            *last = pointer;
        }
        *relative = clamp.value();
        clamp
    }
}

/// One axis of an accepted move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisStep {
    /// The unclamped candidate.
    pub candidate: f64,
    /// How the candidate was resolved.
    pub clamp: Clamp,
}

/// A move processed while active.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Movement {
    /// New translation.
    pub translation: Vec2,
    /// Translation change since gesture start.
    pub delta: Vec2,
    /// This move committed the gesture to a direction.
    pub entered_active: bool,
    /// Pointer travel since gesture start.
    pub moved: Vec2,
    /// Resolution of the x axis, `None` when x is locked.
    pub x: Option<AxisStep>,
    /// Resolution of the y axis, `None` when y is locked.
    pub y: Option<AxisStep>,
}

/// Result of [`GestureMachine::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveOutcome {
    /// There is no session.
    Idle,
    /// The pointer has not travelled past the direction threshold.
    Pending,
    /// The dominant direction is locked; the session was discarded.
    Aborted {
        /// The forbidden axis.
        axis: Axis,
        /// Pointer travel since gesture start.
        moved: Vec2,
    },
    /// The surface moved (possibly clamped to where it already was).
    Moved(Movement),
}

/// Summary of a finished session, returned by [`GestureMachine::end`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureEnd {
    /// Whether the session ever became active.
    pub was_active: bool,
    /// Final translation.
    pub translation: Vec2,
    /// Final delta since gesture start.
    pub delta: Vec2,
}

/// Drives at most one [`GestureSession`] under a fixed axis lock.
#[derive(Clone, Copy, Debug)]
pub struct GestureMachine {
    lock: AxisLock,
    threshold: f64,
    session: Option<GestureSession>,
}

impl GestureMachine {
    /// Creates an idle machine.
    ///
    /// `threshold` is the pointer travel (px, per axis) that must be exceeded
    /// before a gesture commits to a direction.
    #[must_use]
    pub const fn new(lock: AxisLock, threshold: f64) -> Self {
        Self {
            lock,
            threshold,
            session: None,
        }
    }

    /// The axis lock.
    #[must_use]
    pub const fn lock(&self) -> AxisLock {
        self.lock
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> GesturePhase {
        match &self.session {
            Some(s) => s.phase(),
            None => GesturePhase::Idle,
        }
    }

    /// The live session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Starts a session. Returns `false`, leaving the current session alone,
    /// if one is already in progress.
    pub fn begin(&mut self, pointer: Point, baseline: Vec2) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(GestureSession::new(pointer, baseline));
        true
    }

    /// Feeds a pointer position to the session.
    pub fn update(&mut self, pointer: Point, limits: &Limits) -> MoveOutcome {
        let Some(session) = &mut self.session else {
            return MoveOutcome::Idle;
        };
        let moved = pointer - session.start;
        let mut entered_active = false;

        if !session.active {
            let (ax, ay) = (moved.x.abs(), moved.y.abs());
            if ax.max(ay) <= self.threshold {
                return MoveOutcome::Pending;
            }
            let dominant = dominant_axis(moved);
            if let Some(axis) = dominant
                && self.lock.forbids(axis)
            {
                self.session = None;
                return MoveOutcome::Aborted { axis, moved };
            }
            session.active = true;
            entered_active = true;
        }

        // A locked axis never follows the pointer, but its inherited
        // translation is still held inside the limits.
        let mut x = None;
        let mut y = None;
        if self.lock.x {
            session.relative.x = limits.x.clamp(session.relative.x).value();
        } else {
            let candidate = session.relative.x + (pointer.x - session.last.x);
            let clamp = session.step(Axis::X, pointer.x, limits);
            x = Some(AxisStep { candidate, clamp });
        }
        if self.lock.y {
            session.relative.y = limits.y.clamp(session.relative.y).value();
        } else {
            let candidate = session.relative.y + (pointer.y - session.last.y);
            let clamp = session.step(Axis::Y, pointer.y, limits);
            y = Some(AxisStep { candidate, clamp });
        }

        MoveOutcome::Moved(Movement {
            translation: session.relative,
            delta: session.delta(),
            entered_active,
            moved,
            x,
            y,
        })
    }

    /// Replaces the session's translation without moving the pointer
    /// references. No-op when idle.
    pub fn rebase(&mut self, translation: Vec2) {
        if let Some(session) = &mut self.session {
            session.relative = translation;
        }
    }

    /// Ends the session, returning its summary.
    pub fn end(&mut self) -> Option<GestureEnd> {
        let session = self.session.take()?;
        Some(GestureEnd {
            was_active: session.active,
            translation: session.relative,
            delta: session.delta(),
        })
    }

    /// Drops the session without a summary.
    pub fn abandon(&mut self) {
        self.session = None;
    }
}

/// The axis with the strictly larger travel, or `None` on a tie.
#[must_use]
pub fn dominant_axis(moved: Vec2) -> Option<Axis> {
    let (ax, ay) = (moved.x.abs(), moved.y.abs());
    if ax > ay {
        Some(Axis::X)
    } else if ay > ax {
        Some(Axis::Y)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::AxisLimits;

    fn x_limited(min: f64, max: f64) -> Limits {
        Limits::new(AxisLimits::new(min, max).unwrap(), AxisLimits::UNBOUNDED)
    }

    fn moved_to(machine: &mut GestureMachine, x: f64, y: f64, limits: &Limits) -> Movement {
        match machine.update(Point::new(x, y), limits) {
            MoveOutcome::Moved(m) => m,
            other => panic!("expected movement, got {other:?}"),
        }
    }

    #[test]
    fn overshoot_resumes_without_jumping() {
        let limits = x_limited(0.0, 100.0);
        let mut machine = GestureMachine::new(AxisLock::NONE, 0.0);
        assert!(machine.begin(Point::ZERO, Vec2::ZERO));

        // +50, +80 (clamped), -30
        let a = moved_to(&mut machine, 50.0, 0.0, &limits);
        let b = moved_to(&mut machine, 130.0, 0.0, &limits);
        let c = moved_to(&mut machine, 100.0, 0.0, &limits);
        assert_eq!(a.translation.x, 50.0);
        assert_eq!(b.translation.x, 100.0);
        assert_eq!(c.translation.x, 100.0);
        assert!(a.entered_active);
        assert!(!b.entered_active);
        assert_eq!(b.x.unwrap().clamp, Clamp::Above(100.0));
        assert_eq!(b.x.unwrap().candidate, 130.0);

        // Retracing the overshoot brings the surface back smoothly.
        let d = moved_to(&mut machine, 40.0, 0.0, &limits);
        assert_eq!(d.translation.x, 90.0);
    }

    #[test]
    fn locked_dominant_axis_aborts() {
        // Locked to x: y is forbidden.
        let lock = AxisLock { x: false, y: true };
        let mut machine = GestureMachine::new(lock, 0.0);
        machine.begin(Point::new(100.0, 100.0), Vec2::ZERO);
        let outcome = machine.update(Point::new(102.0, 110.0), &Limits::UNBOUNDED);
        assert_eq!(
            outcome,
            MoveOutcome::Aborted {
                axis: Axis::Y,
                moved: Vec2::new(2.0, 10.0),
            }
        );
        assert_eq!(machine.phase(), GesturePhase::Idle);
        assert_eq!(machine.end(), None);
    }

    #[test]
    fn locked_axis_does_not_move() {
        let lock = AxisLock { x: false, y: true };
        let mut machine = GestureMachine::new(lock, 0.0);
        machine.begin(Point::ZERO, Vec2::new(0.0, 7.0));
        let m = moved_to(&mut machine, 10.0, 3.0, &Limits::UNBOUNDED);
        assert_eq!(m.translation, Vec2::new(10.0, 7.0));
        assert!(m.y.is_none());
    }

    #[test]
    fn locked_axis_baseline_is_held_inside_limits() {
        let lock = AxisLock { x: false, y: true };
        let limits = Limits::new(
            AxisLimits::new(-10.0, 70.0).unwrap(),
            AxisLimits::new(0.0, 0.0).unwrap(),
        );
        let mut machine = GestureMachine::new(lock, 0.0);
        machine.begin(Point::ZERO, Vec2::new(0.0, 7.0));
        let m = moved_to(&mut machine, 10.0, 3.0, &limits);
        assert_eq!(m.translation, Vec2::new(10.0, 0.0));
        assert!(m.y.is_none());
    }

    #[test]
    fn dominance_ignores_direction_sign() {
        assert_eq!(dominant_axis(Vec2::new(-12.0, 4.0)), Some(Axis::X));
        assert_eq!(dominant_axis(Vec2::new(3.0, -9.0)), Some(Axis::Y));
        assert_eq!(dominant_axis(Vec2::new(-5.0, 5.0)), None);
    }

    #[test]
    fn ties_proceed_even_with_a_lock() {
        let lock = AxisLock { x: true, y: false };
        let mut machine = GestureMachine::new(lock, 0.0);
        machine.begin(Point::ZERO, Vec2::ZERO);
        let m = moved_to(&mut machine, 5.0, -5.0, &Limits::UNBOUNDED);
        assert_eq!(m.translation, Vec2::new(0.0, -5.0));
    }

    #[test]
    fn threshold_keeps_session_pending() {
        let mut machine = GestureMachine::new(AxisLock::NONE, 3.0);
        machine.begin(Point::ZERO, Vec2::ZERO);
        assert_eq!(
            machine.update(Point::new(3.0, -2.0), &Limits::UNBOUNDED),
            MoveOutcome::Pending
        );
        assert_eq!(machine.phase(), GesturePhase::Pending);

        let m = moved_to(&mut machine, 4.0, 0.0, &Limits::UNBOUNDED);
        assert!(m.entered_active);
        // Travel below the threshold is not lost once the gesture commits.
        assert_eq!(m.translation, Vec2::new(4.0, 0.0));
        assert_eq!(machine.phase(), GesturePhase::Active);
    }

    #[test]
    fn end_reports_delta_from_baseline() {
        let mut machine = GestureMachine::new(AxisLock::NONE, 0.0);
        machine.begin(Point::new(10.0, 10.0), Vec2::new(20.0, 5.0));
        moved_to(&mut machine, 15.0, 12.0, &Limits::UNBOUNDED);
        let end = machine.end().unwrap();
        assert!(end.was_active);
        assert_eq!(end.translation, Vec2::new(25.0, 7.0));
        assert_eq!(end.delta, Vec2::new(5.0, 2.0));
    }

    #[test]
    fn pending_session_ends_inactive() {
        let mut machine = GestureMachine::new(AxisLock::NONE, 0.0);
        machine.begin(Point::ZERO, Vec2::ZERO);
        let end = machine.end().unwrap();
        assert!(!end.was_active);
        assert_eq!(end.delta, Vec2::ZERO);
    }

    #[test]
    fn second_begin_is_ignored() {
        let mut machine = GestureMachine::new(AxisLock::NONE, 0.0);
        assert!(machine.begin(Point::ZERO, Vec2::ZERO));
        assert!(!machine.begin(Point::new(5.0, 5.0), Vec2::new(1.0, 1.0)));
        assert_eq!(machine.session().unwrap().start(), Point::ZERO);
    }

    #[test]
    fn clamped_position_stays_within_limits() {
        let limits = Limits::new(
            AxisLimits::new(-10.0, 70.0).unwrap(),
            AxisLimits::new(-10.0, 70.0).unwrap(),
        );
        let mut machine = GestureMachine::new(AxisLock::NONE, 0.0);
        machine.begin(Point::ZERO, Vec2::ZERO);
        let path = [
            (30.0, -40.0),
            (200.0, 5.0),
            (-90.0, 300.0),
            (0.0, 0.0),
            (65.0, 69.0),
            (-500.0, -500.0),
        ];
        for (px, py) in path {
            let m = moved_to(&mut machine, px, py, &limits);
            assert!(limits.x.contains(m.translation.x), "{m:?}");
            assert!(limits.y.contains(m.translation.y), "{m:?}");
            if let Some(step) = m.x
                && step.candidate > limits.x.max()
            {
                assert_eq!(m.translation.x, limits.x.max());
            }
            if let Some(step) = m.y
                && step.candidate < limits.y.min()
            {
                assert_eq!(m.translation.y, limits.y.min());
            }
        }
    }
}
