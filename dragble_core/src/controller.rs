// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag controller.
//!
//! A [`Dragble`] makes one surface draggable. It owns the configuration, the
//! movement limits, the [`GestureMachine`] and a [`RenderScheduler`] of
//! [`Commit`]s. The host forwards pointer events and frame ticks; the
//! controller writes translations and the dragging state back through the
//! host's [`SurfaceTree`] and reports progress through [`Callbacks`].
//!
//! ```text
//!  pointer_down ─► hit-test handle ─► read baseline ─► on_drag_start
//!  pointer_move ─► GestureMachine::update ─► RenderScheduler::schedule
//!  on_frame     ─► RenderScheduler::on_tick ─► set_translation + on_drag_move
//!  pointer_up   ─► clear dragging ─► on_drag_end
//! ```
//!
//! # Listening
//!
//! [`is_enabled`](Dragble::is_enabled) says whether pointer-downs on the
//! handle are accepted; a host maps it onto its pointer-down listener.
//! [`is_listening`](Dragble::is_listening) says whether the controller needs
//! document-wide move and up events; it turns on at gesture start and off when
//! the session ends or aborts. [`needs_frame`](Dragble::needs_frame) says
//! whether a commit is waiting for a tick.
//!
//! # Teardown
//!
//! [`destroy`](Dragble::destroy) abandons any session without an end
//! callback, discards a queued commit and releases the surface handles and
//! callbacks. Every later call is a no-op.

use alloc::boxed::Box;
use core::fmt;

use kurbo::Vec2;

use crate::backend::SurfaceTree;
use crate::config::{AxisConstraint, AxisLock, DragConfig, DragOptions, Target};
use crate::error::ConfigError;
use crate::event::PointerEvent;
use crate::geometry::current_translation;
use crate::gesture::{GestureMachine, GesturePhase, MoveOutcome, dominant_axis};
use crate::limits::Limits;
use crate::scheduler::RenderScheduler;
use crate::time::HostTime;
use crate::timing::FrameTick;
use crate::trace::{
    CommitEvent, CommitScheduledEvent, DirectionCommitEvent, EndReason, GestureAbortEvent,
    GestureBeginEvent, GestureEndEvent, Lifecycle, TraceSink, Tracer,
};

/// Callback fired when a gesture starts.
pub type StartCallback<Id> = Box<dyn FnMut(&PointerEvent<Id>)>;
/// Callback fired with the event and the delta since gesture start.
pub type DeltaCallback<Id> = Box<dyn FnMut(&PointerEvent<Id>, Vec2)>;

/// Host callbacks.
///
/// `on_drag_move` fires when a commit becomes observable, not when the move
/// event arrives.
pub struct Callbacks<Id> {
    /// A gesture session started on the handle.
    pub on_drag_start: Option<StartCallback<Id>>,
    /// A queued position was applied to the surface.
    pub on_drag_move: Option<DeltaCallback<Id>>,
    /// An active gesture ended.
    pub on_drag_end: Option<DeltaCallback<Id>>,
}

impl<Id> Callbacks<Id> {
    /// No callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            on_drag_start: None,
            on_drag_move: None,
            on_drag_end: None,
        }
    }

    /// Sets the start callback.
    #[must_use]
    pub fn on_start(mut self, f: impl FnMut(&PointerEvent<Id>) + 'static) -> Self {
        self.on_drag_start = Some(Box::new(f));
        self
    }

    /// Sets the move callback.
    #[must_use]
    pub fn on_move(mut self, f: impl FnMut(&PointerEvent<Id>, Vec2) + 'static) -> Self {
        self.on_drag_move = Some(Box::new(f));
        self
    }

    /// Sets the end callback.
    #[must_use]
    pub fn on_end(mut self, f: impl FnMut(&PointerEvent<Id>, Vec2) + 'static) -> Self {
        self.on_drag_end = Some(Box::new(f));
        self
    }
}

impl<Id> Default for Callbacks<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id> fmt::Debug for Callbacks<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_drag_start", &self.on_drag_start.is_some())
            .field("on_drag_move", &self.on_drag_move.is_some())
            .field("on_drag_end", &self.on_drag_end.is_some())
            .finish()
    }
}

/// A position waiting for the next tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Commit<Id> {
    /// Translation to apply.
    pub translation: Vec2,
    /// Delta since gesture start.
    pub delta: Vec2,
    /// The move that produced the position, `None` for a reset.
    pub event: Option<PointerEvent<Id>>,
}

/// Makes one surface draggable.
pub struct Dragble<Id> {
    config: DragConfig,
    target: Option<Id>,
    handle: Option<Id>,
    limits: Limits,
    gesture: GestureMachine,
    scheduler: RenderScheduler<Commit<Id>>,
    callbacks: Callbacks<Id>,
    position: Vec2,
    enabled: bool,
    listening: bool,
    destroyed: bool,
    trace: Option<Box<dyn TraceSink>>,
}

impl<Id: fmt::Debug> fmt::Debug for Dragble<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dragble")
            .field("config", &self.config)
            .field("target", &self.target)
            .field("handle", &self.handle)
            .field("limits", &self.limits)
            .field("gesture", &self.gesture)
            .field("scheduler", &self.scheduler)
            .field("callbacks", &self.callbacks)
            .field("position", &self.position)
            .field("enabled", &self.enabled)
            .field("listening", &self.listening)
            .field("destroyed", &self.destroyed)
            .field("trace", &self.trace.is_some())
            .finish()
    }
}

impl<Id: Copy + Eq + fmt::Debug> Dragble<Id> {
    /// Creates an enabled controller for `target`.
    ///
    /// Explicit limits win over `containment`; with neither, movement is
    /// unbounded. The initial position is the translation the surface
    /// currently carries.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from [`DragConfig::from_options`], or
    /// [`ConfigError::MissingTarget`], [`ConfigError::MissingHandle`] and
    /// [`ConfigError::MissingContainer`] for references that do not resolve.
    pub fn new<T>(
        tree: &T,
        target: Target<'_, Id>,
        options: DragOptions<'_, Id>,
        callbacks: Callbacks<Id>,
    ) -> Result<Self, ConfigError>
    where
        T: SurfaceTree<Id = Id> + ?Sized,
    {
        let config = DragConfig::from_options(&options)?;
        let target = target.resolve(tree).ok_or(ConfigError::MissingTarget)?;
        let handle = options
            .handle
            .map(|h| h.resolve(tree).ok_or(ConfigError::MissingHandle))
            .transpose()?;
        let container = options
            .containment
            .map(|c| c.resolve(tree).ok_or(ConfigError::MissingContainer))
            .transpose()?;

        let limits = match (config.explicit_limits, container) {
            (Some(explicit), _) => explicit,
            (None, Some(container)) => {
                Limits::from_containment(tree, target, container, config.lock)
            }
            (None, None) => Limits::UNBOUNDED,
        };

        Ok(Self {
            gesture: GestureMachine::new(config.lock, config.direction_threshold),
            scheduler: RenderScheduler::new(config.scheduler),
            config,
            target: Some(target),
            handle,
            limits,
            callbacks,
            position: current_translation(tree, target),
            enabled: true,
            listening: false,
            destroyed: false,
            trace: None,
        })
    }

    // -- Lifecycle --

    /// Accepts pointer-downs on the handle again.
    pub fn enable(&mut self) {
        if self.destroyed || self.enabled {
            return;
        }
        self.enabled = true;
        self.tracer().lifecycle(Lifecycle::Enabled);
    }

    /// Stops accepting pointer-downs. A gesture in progress continues.
    pub fn disable(&mut self) {
        if self.destroyed || !self.enabled {
            return;
        }
        self.enabled = false;
        self.tracer().lifecycle(Lifecycle::Disabled);
    }

    /// Tears the controller down. Idempotent.
    ///
    /// A gesture past direction commitment is abandoned and its surface
    /// leaves the dragging state.
    pub fn destroy<T>(&mut self, tree: &mut T)
    where
        T: SurfaceTree<Id = Id> + ?Sized,
    {
        if self.destroyed {
            return;
        }
        if let (true, Some(target)) = (self.is_dragging(), self.target) {
            tree.set_dragging(target, false);
        }
        self.disable();
        self.gesture.abandon();
        self.scheduler.cancel();
        self.listening = false;
        self.target = None;
        self.handle = None;
        self.callbacks = Callbacks::new();
        self.tracer().lifecycle(Lifecycle::Destroyed);
        self.destroyed = true;
        self.trace = None;
    }

    /// Recomputes the limits so the surface stays inside `container`.
    ///
    /// Overwrites explicit limits. A container that does not resolve leaves
    /// the limits unchanged.
    pub fn apply_containment<T>(&mut self, tree: &T, container: Target<'_, Id>)
    where
        T: SurfaceTree<Id = Id> + ?Sized,
    {
        let Some(target) = self.target else {
            return;
        };
        let Some(container) = container.resolve(tree) else {
            return;
        };
        self.limits = Limits::from_containment(tree, target, container, self.config.lock);
        self.tracer().lifecycle(Lifecycle::ContainmentApplied);
    }

    /// Replaces the limits.
    pub fn set_limits(&mut self, limits: Limits) {
        if self.destroyed {
            return;
        }
        self.limits = limits;
        self.tracer().lifecycle(Lifecycle::LimitsReplaced);
    }

    /// Moves the surface back to its untransformed origin at the next tick.
    ///
    /// A gesture in progress continues from the origin.
    pub fn reset_position(&mut self) {
        if self.destroyed {
            return;
        }
        self.position = Vec2::ZERO;
        self.gesture.rebase(Vec2::ZERO);
        let delta = self
            .gesture
            .session()
            .map_or(Vec2::ZERO, |s| s.delta());
        self.scheduler.schedule(Commit {
            translation: Vec2::ZERO,
            delta,
            event: None,
        });
        self.tracer().lifecycle(Lifecycle::PositionReset);
    }

    /// Installs a trace sink. Events are only emitted with the `trace`
    /// feature.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        if !self.destroyed {
            self.trace = Some(sink);
        }
    }

    /// Removes and returns the trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.trace.take()
    }

    // -- Input --

    /// Handles a pointer-down. Returns whether a gesture session started.
    ///
    /// The event is ignored if the controller is disabled, a session is
    /// already running, an inner controller already stopped its propagation,
    /// or it did not hit the handle.
    pub fn pointer_down<T>(&mut self, tree: &mut T, event: &mut PointerEvent<Id>) -> bool
    where
        T: SurfaceTree<Id = Id> + ?Sized,
    {
        let Some(target) = self.target else {
            return false;
        };
        if !self.enabled || event.propagation_stopped || self.gesture.phase() != GesturePhase::Idle
        {
            return false;
        }
        let handle = self.handle.unwrap_or(target);
        if !tree.contains(handle, event.target) {
            return false;
        }

        // A commit left over from the previous gesture must land before the
        // baseline is read.
        if let Some(commit) = self.scheduler.flush() {
            self.apply(tree, target, commit, None, event.time);
        }

        if self.config.stop_propagation {
            event.stop_propagation();
        }
        let baseline = current_translation(tree, target);
        self.gesture.begin(event.position, baseline);
        self.position = baseline;
        self.listening = true;
        self.tracer().gesture_begin(&GestureBeginEvent {
            time: event.time,
            pointer: event.position,
            baseline,
        });
        if let Some(cb) = &mut self.callbacks.on_drag_start {
            cb(&*event);
        }
        true
    }

    /// Handles a document-level pointer-move.
    pub fn pointer_move<T>(&mut self, tree: &mut T, event: &mut PointerEvent<Id>) -> MoveOutcome
    where
        T: SurfaceTree<Id = Id> + ?Sized,
    {
        let Some(target) = self.target else {
            return MoveOutcome::Idle;
        };
        if !self.listening {
            return MoveOutcome::Idle;
        }
        let outcome = self.gesture.update(event.position, &self.limits);
        match outcome {
            MoveOutcome::Idle | MoveOutcome::Pending => {}
            MoveOutcome::Aborted { axis, moved } => {
                self.listening = false;
                self.tracer().gesture_abort(&GestureAbortEvent {
                    time: event.time,
                    moved,
                    axis,
                });
            }
            MoveOutcome::Moved(movement) => {
                if movement.entered_active {
                    tree.set_dragging(target, true);
                    self.tracer().direction_commit(&DirectionCommitEvent {
                        time: event.time,
                        moved: movement.moved,
                        dominant: dominant_axis(movement.moved),
                    });
                }
                #[cfg(feature = "trace-rich")]
                self.trace_clamps(&movement, event.time);

                event.prevent_default();
                self.position = movement.translation;
                let schedule = self.scheduler.schedule(Commit {
                    translation: movement.translation,
                    delta: movement.delta,
                    event: Some(*event),
                });
                self.tracer().commit_scheduled(&CommitScheduledEvent {
                    time: event.time,
                    translation: movement.translation,
                    schedule,
                });
            }
        }
        outcome
    }

    /// Handles a document-level pointer-up.
    pub fn pointer_up<T>(&mut self, tree: &mut T, event: &PointerEvent<Id>)
    where
        T: SurfaceTree<Id = Id> + ?Sized,
    {
        self.finish(tree, event, EndReason::Release);
    }

    /// Handles a pointer-cancel. Behaves like a pointer-up.
    pub fn pointer_cancel<T>(&mut self, tree: &mut T, event: &PointerEvent<Id>)
    where
        T: SurfaceTree<Id = Id> + ?Sized,
    {
        self.finish(tree, event, EndReason::Cancel);
    }

    /// Applies the queued commit, if any, for this tick.
    pub fn on_frame<T>(&mut self, tree: &mut T, tick: &FrameTick)
    where
        T: SurfaceTree<Id = Id> + ?Sized,
    {
        let Some(target) = self.target else {
            return;
        };
        if let Some(commit) = self.scheduler.on_tick(tick) {
            self.apply(tree, target, commit, Some(tick), tick.now);
        }
    }

    // -- Queries --

    /// Current gesture phase.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.gesture.phase()
    }

    /// Whether a gesture is active (past direction commitment).
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.gesture.phase() == GesturePhase::Active
    }

    /// Whether pointer-downs on the handle are accepted.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether document-level move and up events are needed.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Whether [`destroy`](Self::destroy) has been called.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Latest computed translation, which may not be committed yet.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current limits.
    #[must_use]
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// The configured axis constraint.
    #[must_use]
    pub fn axis(&self) -> AxisConstraint {
        self.config.axis
    }

    /// The persistent axis lock.
    #[must_use]
    pub fn axis_lock(&self) -> AxisLock {
        self.config.lock
    }

    /// Whether a commit is waiting for a tick.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// The draggable surface, `None` once destroyed.
    #[must_use]
    pub fn target(&self) -> Option<Id> {
        self.target
    }

    /// The surface that starts gestures: the handle if one is configured,
    /// otherwise the target. `None` once destroyed.
    #[must_use]
    pub fn handle(&self) -> Option<Id> {
        self.handle.or(self.target)
    }

    /// The validated configuration.
    #[must_use]
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Commits delivered so far.
    #[must_use]
    pub fn commit_count(&self) -> u64 {
        self.scheduler.commit_count()
    }

    // -- Internals --

    fn tracer(&mut self) -> Tracer<'_> {
        match &mut self.trace {
            Some(sink) => Tracer::new(&mut **sink),
            None => Tracer::none(),
        }
    }

    fn finish<T>(&mut self, tree: &mut T, event: &PointerEvent<Id>, reason: EndReason)
    where
        T: SurfaceTree<Id = Id> + ?Sized,
    {
        let Some(target) = self.target else {
            return;
        };
        let Some(end) = self.gesture.end() else {
            return;
        };
        self.listening = false;
        if end.was_active {
            tree.set_dragging(target, false);
            if let Some(cb) = &mut self.callbacks.on_drag_end {
                cb(event, end.delta);
            }
        }
        self.tracer().gesture_end(&GestureEndEvent {
            time: event.time,
            reason,
            was_active: end.was_active,
            delta: end.delta,
        });
    }

    fn apply<T>(
        &mut self,
        tree: &mut T,
        target: Id,
        commit: Commit<Id>,
        tick: Option<&FrameTick>,
        now: HostTime,
    ) where
        T: SurfaceTree<Id = Id> + ?Sized,
    {
        tree.set_translation(target, commit.translation, self.config.render_mode);
        let event = match tick {
            Some(tick) => CommitEvent::at_tick(tick, commit.translation, commit.delta),
            None => CommitEvent {
                frame_index: None,
                now,
                source: None,
                translation: commit.translation,
                delta: commit.delta,
            },
        };
        self.tracer().commit(&event);
        if let (Some(e), Some(cb)) = (&commit.event, &mut self.callbacks.on_drag_move) {
            cb(e, commit.delta);
        }
    }

    #[cfg(feature = "trace-rich")]
    fn trace_clamps(&mut self, movement: &crate::gesture::Movement, time: HostTime) {
        use crate::config::Axis;
        use crate::trace::ClampEvent;

        for (axis, step) in [(Axis::X, movement.x), (Axis::Y, movement.y)] {
            if let Some(step) = step
                && step.clamp.is_pinned()
            {
                self.tracer().clamp(&ClampEvent {
                    time,
                    axis,
                    candidate: step.candidate,
                    clamp: step.clamp,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::{Point, Size};

    use super::*;
    use crate::limits::{AxisLimits, LimitsConfig};
    use crate::surface::{SurfaceId, SurfaceStore};
    use crate::transform::Transform3d;

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        Start,
        Move(Vec2),
        End(Vec2),
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    fn logging_callbacks(log: &Log) -> Callbacks<SurfaceId> {
        let (a, b, c) = (log.clone(), log.clone(), log.clone());
        Callbacks::new()
            .on_start(move |_| a.borrow_mut().push(Call::Start))
            .on_move(move |_, d| b.borrow_mut().push(Call::Move(d)))
            .on_end(move |_, d| c.borrow_mut().push(Call::End(d)))
    }

    struct Page {
        store: SurfaceStore,
        root: SurfaceId,
        knob: SurfaceId,
    }

    fn page() -> Page {
        let mut store = SurfaceStore::new();
        let root = store.create_surface(Vec2::ZERO, Size::new(1000.0, 1000.0));
        let knob = store.create_surface(Vec2::new(10.0, 10.0), Size::new(20.0, 20.0));
        store.append_child(root, knob);
        store.set_key(knob, "#knob");
        Page { store, root, knob }
    }

    fn ev(target: SurfaceId, x: f64, y: f64) -> PointerEvent<SurfaceId> {
        PointerEvent::new(target, Point::new(x, y), HostTime(0))
    }

    fn tick(i: u64) -> FrameTick {
        FrameTick::refresh(HostTime(i * 16_666_667), i)
    }

    fn build(
        p: &Page,
        options: DragOptions<'_, SurfaceId>,
        log: &Log,
    ) -> Dragble<SurfaceId> {
        Dragble::new(&p.store, Target::Surface(p.knob), options, logging_callbacks(log)).unwrap()
    }

    #[test]
    fn full_gesture_commits_on_ticks() {
        let mut p = page();
        let log = Log::default();
        let mut d = build(&p, DragOptions::default(), &log);

        assert!(d.pointer_down(&mut p.store, &mut ev(p.knob, 100.0, 100.0)));
        assert!(d.is_listening());
        let mut m = ev(p.knob, 110.0, 105.0);
        d.pointer_move(&mut p.store, &mut m);
        assert!(m.default_prevented);
        assert!(p.store.is_dragging(p.knob));
        // Not observable before the tick.
        assert_eq!(p.store.translation(p.knob), Vec2::ZERO);
        assert!(d.needs_frame());

        d.on_frame(&mut p.store, &tick(0));
        assert_eq!(p.store.translation(p.knob), Vec2::new(10.0, 5.0));

        d.pointer_up(&mut p.store, &ev(p.knob, 110.0, 105.0));
        assert!(!p.store.is_dragging(p.knob));
        assert!(!d.is_listening());
        assert_eq!(
            *log.borrow(),
            [
                Call::Start,
                Call::Move(Vec2::new(10.0, 5.0)),
                Call::End(Vec2::new(10.0, 5.0)),
            ]
        );
    }

    #[test]
    fn five_moves_in_one_interval_commit_once() {
        let mut p = page();
        let log = Log::default();
        let options = DragOptions {
            limits: Some(LimitsConfig {
                x: Some([0.0, 30.0]),
                y: None,
            }),
            ..DragOptions::default()
        };
        let mut d = build(&p, options, &log);

        d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0));
        for x in [5.0, 10.0, 15.0, 20.0, 50.0] {
            d.pointer_move(&mut p.store, &mut ev(p.knob, x, 0.0));
        }
        d.on_frame(&mut p.store, &tick(0));
        d.on_frame(&mut p.store, &tick(0));
        d.on_frame(&mut p.store, &tick(1));

        assert_eq!(d.commit_count(), 1);
        assert_eq!(p.store.translation(p.knob), Vec2::new(30.0, 0.0));
        assert_eq!(*log.borrow(), [Call::Start, Call::Move(Vec2::new(30.0, 0.0))]);
    }

    #[test]
    fn overshoot_commits_fifty_then_pinned_hundred() {
        let mut p = page();
        let log = Log::default();
        let options = DragOptions {
            limits: Some(LimitsConfig {
                x: Some([0.0, 100.0]),
                y: None,
            }),
            ..DragOptions::default()
        };
        let mut d = build(&p, options, &log);
        d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0));

        let mut committed = Vec::new();
        for (i, x) in (0_u64..).zip([50.0, 130.0, 100.0]) {
            d.pointer_move(&mut p.store, &mut ev(p.knob, x, 0.0));
            d.on_frame(&mut p.store, &tick(i));
            committed.push(p.store.translation(p.knob).x);
        }
        assert_eq!(committed, [50.0, 100.0, 100.0]);
    }

    #[test]
    fn locked_axis_suppresses_gesture() {
        let mut p = page();
        let log = Log::default();
        let options = DragOptions {
            axis: AxisConstraint::LockedToX,
            ..DragOptions::default()
        };
        let mut d = build(&p, options, &log);

        d.pointer_down(&mut p.store, &mut ev(p.knob, 50.0, 50.0));
        let outcome = d.pointer_move(&mut p.store, &mut ev(p.knob, 52.0, 60.0));
        assert!(matches!(outcome, MoveOutcome::Aborted { .. }));
        assert!(!d.is_listening());
        d.pointer_move(&mut p.store, &mut ev(p.knob, 80.0, 60.0));
        d.on_frame(&mut p.store, &tick(0));
        d.pointer_up(&mut p.store, &ev(p.knob, 80.0, 60.0));

        assert_eq!(d.phase(), GesturePhase::Idle);
        assert!(!p.store.is_dragging(p.knob));
        assert_eq!(p.store.translation(p.knob), Vec2::ZERO);
        assert_eq!(*log.borrow(), [Call::Start]);
    }

    #[test]
    fn click_without_movement_is_a_no_op() {
        let mut p = page();
        let log = Log::default();
        let mut d = build(&p, DragOptions::default(), &log);
        d.pointer_down(&mut p.store, &mut ev(p.knob, 5.0, 5.0));
        d.pointer_move(&mut p.store, &mut ev(p.knob, 5.0, 5.0));
        d.pointer_up(&mut p.store, &ev(p.knob, 5.0, 5.0));
        assert!(!d.needs_frame());
        assert_eq!(*log.borrow(), [Call::Start]);
    }

    #[test]
    fn destroy_is_idempotent_and_drops_pending_commit() {
        let mut p = page();
        let log = Log::default();
        let mut d = build(&p, DragOptions::default(), &log);
        d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0));
        d.pointer_move(&mut p.store, &mut ev(p.knob, 40.0, 0.0));

        assert!(p.store.is_dragging(p.knob));

        d.destroy(&mut p.store);
        d.destroy(&mut p.store);
        assert!(d.is_destroyed());
        assert!(!p.store.is_dragging(p.knob));
        assert!(!d.needs_frame());
        assert_eq!(d.target(), None);

        d.on_frame(&mut p.store, &tick(0));
        d.pointer_up(&mut p.store, &ev(p.knob, 40.0, 0.0));
        d.enable();
        assert!(!d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0)));

        assert_eq!(p.store.translation(p.knob), Vec2::ZERO);
        assert_eq!(*log.borrow(), [Call::Start]);
    }

    #[test]
    fn destroy_before_direction_commit_leaves_dragging_state_alone() {
        let mut p = page();
        let log = Log::default();
        let options = DragOptions {
            direction_threshold: 10.0,
            ..DragOptions::default()
        };
        let mut d = build(&p, options, &log);
        d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0));
        d.pointer_move(&mut p.store, &mut ev(p.knob, 4.0, 0.0));
        assert!(!d.is_dragging());

        d.destroy(&mut p.store);
        assert!(!p.store.is_dragging(p.knob));
        assert_eq!(d.phase(), GesturePhase::Idle);
    }

    #[test]
    fn nested_draggable_does_not_leak_to_outer() {
        let mut p = page();
        let panel = p
            .store
            .create_surface(Vec2::new(100.0, 100.0), Size::new(300.0, 300.0));
        p.store.append_child(p.root, panel);
        let inner_knob = p.store.create_surface(Vec2::ZERO, Size::new(10.0, 10.0));
        p.store.append_child(panel, inner_knob);

        let outer_log = Log::default();
        let inner_log = Log::default();
        let mut outer = Dragble::new(
            &p.store,
            Target::Surface(panel),
            DragOptions::default(),
            logging_callbacks(&outer_log),
        )
        .unwrap();
        let mut inner = Dragble::new(
            &p.store,
            Target::Surface(inner_knob),
            DragOptions::default(),
            logging_callbacks(&inner_log),
        )
        .unwrap();

        // Bubble order: innermost listener first.
        let mut down = ev(inner_knob, 105.0, 105.0);
        assert!(inner.pointer_down(&mut p.store, &mut down));
        assert!(down.propagation_stopped);
        assert!(!outer.pointer_down(&mut p.store, &mut down));
        assert_eq!(outer.phase(), GesturePhase::Idle);
        assert!(outer_log.borrow().is_empty());
        assert_eq!(*inner_log.borrow(), [Call::Start]);
    }

    #[test]
    fn propagation_policy_can_be_disabled() {
        let mut p = page();
        let log = Log::default();
        let options = DragOptions {
            stop_propagation: false,
            ..DragOptions::default()
        };
        let mut d = build(&p, options, &log);
        let mut down = ev(p.knob, 0.0, 0.0);
        assert!(d.pointer_down(&mut p.store, &mut down));
        assert!(!down.propagation_stopped);
    }

    #[test]
    fn handle_restricts_initiation() {
        let mut p = page();
        let grip = p.store.create_surface(Vec2::ZERO, Size::new(5.0, 5.0));
        p.store.append_child(p.knob, grip);
        let grip_dot = p.store.create_surface(Vec2::ZERO, Size::new(1.0, 1.0));
        p.store.append_child(grip, grip_dot);
        let log = Log::default();
        let options = DragOptions {
            handle: Some(Target::Surface(grip)),
            ..DragOptions::default()
        };
        let mut d = build(&p, options, &log);
        assert_eq!(d.handle(), Some(grip));

        assert!(!d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0)));
        assert!(d.pointer_down(&mut p.store, &mut ev(grip_dot, 0.0, 0.0)));
    }

    #[test]
    fn disabled_controller_ignores_down_but_finishes_gesture() {
        let mut p = page();
        let log = Log::default();
        let mut d = build(&p, DragOptions::default(), &log);
        d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0));
        d.disable();
        d.pointer_move(&mut p.store, &mut ev(p.knob, 3.0, 0.0));
        d.pointer_up(&mut p.store, &ev(p.knob, 3.0, 0.0));
        // The last position is still delivered after release.
        d.on_frame(&mut p.store, &tick(0));
        assert!(!d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0)));
        d.enable();
        assert!(d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0)));
        assert_eq!(
            *log.borrow(),
            [
                Call::Start,
                Call::End(Vec2::new(3.0, 0.0)),
                Call::Move(Vec2::new(3.0, 0.0)),
                Call::Start,
            ]
        );
    }

    #[test]
    fn containment_before_first_gesture() {
        let mut p = page();
        let track = p.store.create_surface(Vec2::ZERO, Size::new(100.0, 100.0));
        p.store.append_child(p.root, track);
        p.store.set_key(track, "#track");
        let log = Log::default();
        let mut d = build(&p, DragOptions::default(), &log);
        assert_eq!(d.limits(), Limits::UNBOUNDED);

        d.apply_containment(&p.store, Target::Key("#track"));
        assert_eq!(d.limits().x, AxisLimits::new(-10.0, 70.0).unwrap());

        d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0));
        d.pointer_move(&mut p.store, &mut ev(p.knob, 500.0, -500.0));
        d.on_frame(&mut p.store, &tick(0));
        assert_eq!(p.store.translation(p.knob), Vec2::new(70.0, -10.0));
    }

    #[test]
    fn explicit_limits_win_over_containment_at_construction() {
        let mut p = page();
        let track = p.store.create_surface(Vec2::ZERO, Size::new(100.0, 100.0));
        p.store.append_child(p.root, track);
        let log = Log::default();
        let options = DragOptions {
            limits: Some(LimitsConfig {
                x: Some([-1.0, 1.0]),
                y: None,
            }),
            containment: Some(Target::Surface(track)),
            ..DragOptions::default()
        };
        let mut d = build(&p, options, &log);
        assert_eq!(d.limits().x, AxisLimits::new(-1.0, 1.0).unwrap());
        assert_eq!(d.limits().y, AxisLimits::UNBOUNDED);

        d.apply_containment(&p.store, Target::Surface(track));
        assert_eq!(d.limits().y, AxisLimits::new(-10.0, 70.0).unwrap());
    }

    #[test]
    fn missing_references_are_reported() {
        let p = page();
        let err = Dragble::new(
            &p.store,
            Target::Key("#nope"),
            DragOptions::default(),
            Callbacks::new(),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingTarget);

        let err = Dragble::new(
            &p.store,
            Target::Surface(p.knob),
            DragOptions {
                handle: Some(Target::Key("#grip")),
                ..DragOptions::default()
            },
            Callbacks::new(),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingHandle);

        let err = Dragble::new(
            &p.store,
            Target::Surface(p.knob),
            DragOptions {
                containment: Some(Target::Key("#track")),
                ..DragOptions::default()
            },
            Callbacks::new(),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingContainer);
    }

    #[test]
    fn gesture_resumes_from_existing_transform() {
        let mut p = page();
        p.store
            .set_transform(p.knob, Transform3d::from_translation(25.0, 5.0, 0.0));
        let log = Log::default();
        let mut d = build(&p, DragOptions::default(), &log);
        assert_eq!(d.position(), Vec2::new(25.0, 5.0));

        d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0));
        d.pointer_move(&mut p.store, &mut ev(p.knob, 5.0, 0.0));
        d.on_frame(&mut p.store, &tick(0));
        assert_eq!(p.store.translation(p.knob), Vec2::new(30.0, 5.0));
        assert_eq!(*log.borrow().last().unwrap(), Call::Move(Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn commit_queued_at_release_lands_before_next_baseline() {
        let mut p = page();
        let log = Log::default();
        let mut d = build(&p, DragOptions::default(), &log);

        d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0));
        d.pointer_move(&mut p.store, &mut ev(p.knob, 20.0, 0.0));
        d.pointer_up(&mut p.store, &ev(p.knob, 20.0, 0.0));
        assert!(d.needs_frame());

        // No tick in between: the next gesture flushes the queued commit.
        d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0));
        assert!(!d.needs_frame());
        assert_eq!(p.store.translation(p.knob), Vec2::new(20.0, 0.0));
        d.pointer_move(&mut p.store, &mut ev(p.knob, 1.0, 0.0));
        assert_eq!(d.position(), Vec2::new(21.0, 0.0));
    }

    #[test]
    fn reset_position_is_committed_on_next_tick() {
        let mut p = page();
        p.store
            .set_transform(p.knob, Transform3d::from_translation(40.0, 40.0, 0.0));
        let log = Log::default();
        let mut d = build(&p, DragOptions::default(), &log);
        d.reset_position();
        assert_eq!(p.store.translation(p.knob), Vec2::new(40.0, 40.0));
        d.on_frame(&mut p.store, &tick(0));
        assert_eq!(p.store.translation(p.knob), Vec2::ZERO);
        // Resets are not reported as moves.
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn cancel_behaves_like_release() {
        let mut p = page();
        let log = Log::default();
        let mut d = build(&p, DragOptions::default(), &log);
        d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0));
        d.pointer_move(&mut p.store, &mut ev(p.knob, 0.0, 8.0));
        d.pointer_cancel(&mut p.store, &ev(p.knob, 0.0, 8.0));
        assert!(!p.store.is_dragging(p.knob));
        assert_eq!(*log.borrow().last().unwrap(), Call::End(Vec2::new(0.0, 8.0)));
    }

    #[test]
    fn three_d_mode_is_recorded_on_the_surface() {
        let mut p = page();
        let log = Log::default();
        let options = DragOptions {
            render_mode: crate::transform::RenderMode::ThreeD,
            ..DragOptions::default()
        };
        let mut d = build(&p, options, &log);
        d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0));
        d.pointer_move(&mut p.store, &mut ev(p.knob, 1.0, 1.0));
        d.on_frame(&mut p.store, &tick(0));
        assert_eq!(
            p.store.render_mode_at(p.knob.index()),
            crate::transform::RenderMode::ThreeD
        );
    }

    #[cfg(feature = "trace")]
    #[test]
    fn trace_sink_sees_gesture() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Names(Vec<&'static str>);
        impl TraceSink for Names {
            fn on_gesture_begin(&mut self, _: &GestureBeginEvent) {
                self.0.push("begin");
            }
            fn on_direction_commit(&mut self, _: &DirectionCommitEvent) {
                self.0.push("direction");
            }
            fn on_commit_scheduled(&mut self, _: &CommitScheduledEvent) {
                self.0.push("scheduled");
            }
            fn on_commit(&mut self, _: &CommitEvent) {
                self.0.push("commit");
            }
            fn on_gesture_end(&mut self, _: &GestureEndEvent) {
                self.0.push("end");
            }
        }

        let mut p = page();
        let log = Log::default();
        let mut d = build(&p, DragOptions::default(), &log);
        let names = Rc::new(RefCell::new(Names::default()));
        d.set_trace_sink(Box::new(names.clone()));

        d.pointer_down(&mut p.store, &mut ev(p.knob, 0.0, 0.0));
        d.pointer_move(&mut p.store, &mut ev(p.knob, 1.0, 0.0));
        d.on_frame(&mut p.store, &tick(0));
        d.pointer_up(&mut p.store, &ev(p.knob, 1.0, 0.0));

        assert_eq!(
            names.borrow().0,
            ["begin", "direction", "scheduled", "commit", "end"]
        );
    }
}
