// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative pointer scripts.

use alloc::vec::Vec;

use dragble_core::time::Duration;
use kurbo::Point;

/// One scripted host event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// Pointer pressed at a page position.
    Down(Point),
    /// Pointer moved to a page position.
    Move(Point),
    /// Pointer released at a page position.
    Up(Point),
    /// Pointer cancelled at a page position.
    Cancel(Point),
    /// Host time passes; every fallback tick due in the span is delivered.
    Advance(Duration),
    /// Host time jumps to the next due tick, which is delivered.
    Frame,
}

/// An ordered list of [`Step`]s built with chained calls.
///
/// ```
/// use dragble_harness::GestureScript;
///
/// let script = GestureScript::new()
///     .down(10.0, 10.0)
///     .glide(110.0, 10.0, 4)
///     .frame()
///     .up(110.0, 10.0);
/// assert_eq!(script.steps().len(), 7);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureScript {
    steps: Vec<Step>,
    cursor: Point,
}

impl GestureScript {
    /// An empty script with the pointer at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Presses at `(x, y)`.
    #[must_use]
    pub fn down(self, x: f64, y: f64) -> Self {
        self.pointer(Step::Down(Point::new(x, y)))
    }

    /// Moves to `(x, y)` in one event.
    #[must_use]
    pub fn move_to(self, x: f64, y: f64) -> Self {
        self.pointer(Step::Move(Point::new(x, y)))
    }

    /// Moves to `(x, y)` in `count` evenly spaced events.
    #[must_use]
    pub fn glide(mut self, x: f64, y: f64, count: u32) -> Self {
        let from = self.cursor;
        let to = Point::new(x, y);
        for i in 1..=count {
            let t = f64::from(i) / f64::from(count);
            self = self.pointer(Step::Move(from.lerp(to, t)));
        }
        self
    }

    /// Releases at `(x, y)`.
    #[must_use]
    pub fn up(self, x: f64, y: f64) -> Self {
        self.pointer(Step::Up(Point::new(x, y)))
    }

    /// Cancels at `(x, y)`.
    #[must_use]
    pub fn cancel(self, x: f64, y: f64) -> Self {
        self.pointer(Step::Cancel(Point::new(x, y)))
    }

    /// Lets `duration` of host time pass.
    #[must_use]
    pub fn advance(mut self, duration: Duration) -> Self {
        self.steps.push(Step::Advance(duration));
        self
    }

    /// Delivers the next tick.
    #[must_use]
    pub fn frame(mut self) -> Self {
        self.steps.push(Step::Frame);
        self
    }

    /// The steps in order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn pointer(mut self, step: Step) -> Self {
        if let Step::Down(p) | Step::Move(p) | Step::Up(p) | Step::Cancel(p) = step {
            self.cursor = p;
        }
        self.steps.push(step);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glide_interpolates_from_last_position() {
        let script = GestureScript::new().down(0.0, 0.0).glide(100.0, 50.0, 4);
        assert_eq!(
            &script.steps()[1..],
            &[
                Step::Move(Point::new(25.0, 12.5)),
                Step::Move(Point::new(50.0, 25.0)),
                Step::Move(Point::new(75.0, 37.5)),
                Step::Move(Point::new(100.0, 50.0)),
            ]
        );
    }

    #[test]
    fn timing_steps_do_not_move_the_cursor() {
        let script = GestureScript::new()
            .down(5.0, 5.0)
            .frame()
            .advance(Duration::from_millis(10))
            .glide(5.0, 15.0, 1);
        assert_eq!(script.steps()[3], Step::Move(Point::new(5.0, 15.0)));
    }
}
