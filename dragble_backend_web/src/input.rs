// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM event names and pointer extraction.

use kurbo::Point;
use wasm_bindgen::JsCast as _;
use web_sys::{Event, MouseEvent, TouchEvent, Window};

use dragble_core::event::PointerKind;

/// Which family of DOM events drives gestures.
///
/// Mouse events report `clientX`/`clientY`; touch events report the first
/// touch point's `pageX`/`pageY`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputScheme {
    /// `mousedown` / `mousemove` / `mouseup`.
    #[default]
    Mouse,
    /// `touchstart` / `touchmove` / `touchend` (+ `touchcancel`).
    Touch,
}

impl InputScheme {
    /// Touch when the device reports touch points, mouse otherwise.
    #[must_use]
    pub fn detect(window: &Window) -> Self {
        if window.navigator().max_touch_points() > 0 {
            Self::Touch
        } else {
            Self::Mouse
        }
    }

    /// Event that starts a gesture on the handle.
    #[must_use]
    pub const fn start(self) -> &'static str {
        match self {
            Self::Mouse => "mousedown",
            Self::Touch => "touchstart",
        }
    }

    /// Document-level move event.
    #[must_use]
    pub const fn moved(self) -> &'static str {
        match self {
            Self::Mouse => "mousemove",
            Self::Touch => "touchmove",
        }
    }

    /// Document-level release events.
    #[must_use]
    pub const fn ends(self) -> &'static [&'static str] {
        match self {
            Self::Mouse => &["mouseup"],
            Self::Touch => &["touchend", "touchcancel"],
        }
    }

    /// Whether `event_type` is a cancellation rather than a release.
    #[must_use]
    pub fn is_cancel(self, event_type: &str) -> bool {
        matches!(self, Self::Touch) && event_type == "touchcancel"
    }

    /// The pointer kind reported to the controller.
    #[must_use]
    pub const fn kind(self) -> PointerKind {
        match self {
            Self::Mouse => PointerKind::Mouse,
            Self::Touch => PointerKind::Touch,
        }
    }

    /// Extracts the pointer position from a DOM event of this scheme.
    ///
    /// Touch releases carry no active touches, so the first changed touch is
    /// used instead.
    #[must_use]
    pub fn position(self, event: &Event) -> Option<Point> {
        match self {
            Self::Mouse => {
                let e = event.dyn_ref::<MouseEvent>()?;
                Some(Point::new(f64::from(e.client_x()), f64::from(e.client_y())))
            }
            Self::Touch => {
                let e = event.dyn_ref::<TouchEvent>()?;
                let touch = e.touches().get(0).or_else(|| e.changed_touches().get(0))?;
                Some(Point::new(f64::from(touch.page_x()), f64::from(touch.page_y())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_scheme_cancels_only_on_touchcancel() {
        assert!(InputScheme::Touch.is_cancel("touchcancel"));
        assert!(!InputScheme::Touch.is_cancel("touchend"));
        assert!(!InputScheme::Mouse.is_cancel("touchcancel"));
    }

    #[test]
    fn every_scheme_has_a_release() {
        for scheme in [InputScheme::Mouse, InputScheme::Touch] {
            assert!(!scheme.ends().is_empty());
            assert_ne!(scheme.start(), scheme.moved());
        }
        assert_eq!(InputScheme::Touch.kind(), PointerKind::Touch);
    }
}
