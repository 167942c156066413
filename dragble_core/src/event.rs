// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host pointer events.

use kurbo::Point;

use crate::time::HostTime;

/// The input device that produced a [`PointerEvent`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// A mouse or trackpad.
    #[default]
    Mouse,
    /// A touch contact. Only the first contact is tracked.
    Touch,
    /// A stylus.
    Pen,
}

/// One pointer event as delivered by the host.
///
/// The two flags mirror the DOM's `stopPropagation()` and
/// `preventDefault()`: controllers set them, and hosts read them back after
/// dispatch to decide whether to forward the event to outer listeners or to
/// suppress native behaviour such as scrolling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent<Id> {
    /// The surface the pointer hit.
    pub target: Id,
    /// Pointer position in page coordinates.
    pub position: Point,
    /// Device kind.
    pub kind: PointerKind,
    /// Host time of the event.
    pub time: HostTime,
    /// Set once a listener has consumed the event.
    pub propagation_stopped: bool,
    /// Set once a listener has claimed the event's default action.
    pub default_prevented: bool,
}

impl<Id> PointerEvent<Id> {
    /// Creates a mouse event at `position` with both flags clear.
    #[must_use]
    pub const fn new(target: Id, position: Point, time: HostTime) -> Self {
        Self {
            target,
            position,
            kind: PointerKind::Mouse,
            time,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// Returns the event with a different device kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: PointerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Stops the event from reaching outer listeners.
    pub const fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Claims the event's default action.
    pub const fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}
