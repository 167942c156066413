// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives a controller over an in-memory surface tree.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use dragble_core::backend::Presenter;
use dragble_core::config::{DragOptions, Target};
use dragble_core::controller::{Callbacks, Dragble};
use dragble_core::error::ConfigError;
use dragble_core::event::PointerEvent;
use dragble_core::gesture::MoveOutcome;
use dragble_core::scheduler::FallbackClock;
use dragble_core::surface::{SurfaceId, SurfaceStore};
use dragble_core::time::{Duration, HostTime};
use kurbo::{Point, Vec2};

use crate::presenter::CssPresenter;
use crate::script::{GestureScript, Step};

/// A callback the controller fired, in firing order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reported {
    /// `on_drag_start` with the pointer position.
    Start(Point),
    /// `on_drag_move` with the committed delta.
    Move(Vec2),
    /// `on_drag_end` with the final delta.
    End(Vec2),
}

/// Owns a [`SurfaceStore`], one [`Dragble`] and a [`FallbackClock`], and
/// plays [`GestureScript`]s against them.
///
/// Pointer-downs are aimed at the controller's handle unless redirected with
/// [`aim`](Self::aim). Moves and releases are only forwarded while the
/// controller is listening, the way a host attaches document listeners only
/// during a gesture. Every delivered tick is followed by
/// [`SurfaceStore::evaluate`] and a [`Presenter::apply`].
pub struct Harness<P: Presenter = CssPresenter> {
    store: SurfaceStore,
    drag: Dragble<SurfaceId>,
    clock: FallbackClock,
    presenter: P,
    now: HostTime,
    aim: SurfaceId,
    ticks: u64,
    reported: Rc<RefCell<Vec<Reported>>>,
    outcomes: Vec<MoveOutcome>,
}

impl<P: Presenter> core::fmt::Debug for Harness<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Harness")
            .field("drag", &self.drag)
            .field("now", &self.now)
            .field("aim", &self.aim)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl<P: Presenter> Harness<P> {
    /// Builds a controller for `target` inside `store`.
    ///
    /// # Errors
    ///
    /// Whatever [`Dragble::new`] reports.
    pub fn new(
        store: SurfaceStore,
        target: Target<'_, SurfaceId>,
        options: DragOptions<'_, SurfaceId>,
        presenter: P,
    ) -> Result<Self, ConfigError> {
        let reported = Rc::new(RefCell::new(Vec::new()));
        let callbacks = {
            let start = Rc::clone(&reported);
            let moved = Rc::clone(&reported);
            let end = Rc::clone(&reported);
            Callbacks::new()
                .on_start(move |e: &PointerEvent<SurfaceId>| {
                    start.borrow_mut().push(Reported::Start(e.position));
                })
                .on_move(move |_: &PointerEvent<SurfaceId>, d| {
                    moved.borrow_mut().push(Reported::Move(d));
                })
                .on_end(move |_: &PointerEvent<SurfaceId>, d| {
                    end.borrow_mut().push(Reported::End(d));
                })
        };
        let drag = Dragble::new(&store, target, options, callbacks)?;
        let clock = FallbackClock::new(&drag.config().scheduler)
            .ok_or(ConfigError::InvalidFallbackRate)?;
        let aim = drag.handle().ok_or(ConfigError::MissingTarget)?;

        let mut harness = Self {
            store,
            drag,
            clock,
            presenter,
            now: HostTime(0),
            aim,
            ticks: 0,
            reported,
            outcomes: Vec::new(),
        };
        harness.present();
        Ok(harness)
    }

    /// Plays every step of `script` in order.
    pub fn run(&mut self, script: &GestureScript) {
        for step in script.steps() {
            self.play(*step);
        }
    }

    /// Plays a single step.
    pub fn play(&mut self, step: Step) {
        match step {
            Step::Down(p) => {
                let mut event = PointerEvent::new(self.aim, p, self.now);
                if self.drag.is_enabled() {
                    self.drag.pointer_down(&mut self.store, &mut event);
                }
            }
            Step::Move(p) => {
                let mut event = PointerEvent::new(self.aim, p, self.now);
                if self.drag.is_listening() {
                    let outcome = self.drag.pointer_move(&mut self.store, &mut event);
                    self.outcomes.push(outcome);
                }
            }
            Step::Up(p) => {
                let event = PointerEvent::new(self.aim, p, self.now);
                if self.drag.is_listening() {
                    self.drag.pointer_up(&mut self.store, &event);
                }
            }
            Step::Cancel(p) => {
                let event = PointerEvent::new(self.aim, p, self.now);
                if self.drag.is_listening() {
                    self.drag.pointer_cancel(&mut self.store, &event);
                }
            }
            Step::Advance(by) => self.advance(by),
            Step::Frame => {
                if let Some(due) = self.clock.next_due()
                    && due > self.now
                {
                    self.now = due;
                }
                self.pump();
            }
        }
    }

    /// Destroys the controller and presents whatever that changed.
    pub fn destroy(&mut self) {
        self.drag.destroy(&mut self.store);
        self.present();
    }

    /// Redirects pointer-downs to `id`.
    pub fn aim(&mut self, id: SurfaceId) {
        self.aim = id;
    }

    fn advance(&mut self, by: Duration) {
        let end = self.now + by;
        loop {
            self.pump();
            match self.clock.next_due() {
                Some(due) if due <= end => self.now = due,
                _ => break,
            }
        }
        self.now = end;
    }

    fn pump(&mut self) {
        if let Some(tick) = self.clock.poll(self.now) {
            self.ticks += 1;
            self.drag.on_frame(&mut self.store, &tick);
            self.present();
        }
    }

    fn present(&mut self) {
        let changes = self.store.evaluate();
        if !changes.is_empty() {
            self.presenter.apply(&self.store, &changes);
        }
    }

    // -- Inspection --

    /// The callbacks fired so far.
    #[must_use]
    pub fn reported(&self) -> Vec<Reported> {
        self.reported.borrow().clone()
    }

    /// Outcomes of every forwarded move.
    #[must_use]
    pub fn outcomes(&self) -> &[MoveOutcome] {
        &self.outcomes
    }

    /// Ticks delivered so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Current host time.
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.now
    }

    /// The surface store.
    #[must_use]
    pub fn store(&self) -> &SurfaceStore {
        &self.store
    }

    /// The controller.
    #[must_use]
    pub fn drag(&self) -> &Dragble<SurfaceId> {
        &self.drag
    }

    /// The controller, for lifecycle calls between scripts.
    pub fn drag_mut(&mut self) -> &mut Dragble<SurfaceId> {
        &mut self.drag
    }

    /// The presenter.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }
}
