// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM listener wiring for a [`Dragble`] controller.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::{Point, Vec2};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{AddEventListenerOptions, Document, Element, Event};

use dragble_core::config::{DragOptions, Target};
use dragble_core::controller::{Callbacks, Dragble};
use dragble_core::error::ConfigError;
use dragble_core::event::PointerEvent;
use dragble_core::limits::Limits;
use dragble_core::timing::FrameTick;
use dragble_core::trace::TraceSink;

use crate::frame::FrameRequester;
use crate::input::InputScheme;
use crate::now;
use crate::tree::{DomTree, ElementId};

/// Failure to attach a [`WebDragble`].
#[derive(Debug)]
pub enum AttachError {
    /// The options or references were rejected.
    Config(ConfigError),
    /// A DOM call failed during setup.
    Dom(JsValue),
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Dom(v) => write!(f, "DOM setup failed: {v:?}"),
        }
    }
}

impl core::error::Error for AttachError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Dom(_) => None,
        }
    }
}

impl From<ConfigError> for AttachError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<JsValue> for AttachError {
    fn from(v: JsValue) -> Self {
        Self::Dom(v)
    }
}

type EventClosure = Closure<dyn FnMut(Event)>;

struct Session {
    tree: DomTree,
    drag: Dragble<ElementId>,
}

struct Listeners {
    down: EventClosure,
    moved: EventClosure,
    end: EventClosure,
}

struct Shared {
    session: RefCell<Session>,
    frames: FrameRequester,
    scheme: InputScheme,
    handle: Element,
    document: Document,
    listeners: RefCell<Option<Listeners>>,
    down_attached: Cell<bool>,
    document_attached: Cell<bool>,
}

/// A [`Dragble`] bound to live DOM elements.
///
/// The start listener sits on the handle element; move and release listeners
/// are attached to the document for the duration of each gesture. Commits are
/// applied on `requestAnimationFrame` (or a timer where that is missing).
///
/// Host callbacks run while the controller is borrowed, so they must not call
/// back into the same `WebDragble`. Dropping a `WebDragble` destroys it.
pub struct WebDragble {
    shared: Rc<Shared>,
}

impl fmt::Debug for WebDragble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDragble")
            .field("scheme", &self.shared.scheme)
            .field("down_attached", &self.shared.down_attached.get())
            .field("document_attached", &self.shared.document_attached.get())
            .field("frames", &self.shared.frames)
            .finish_non_exhaustive()
    }
}

impl WebDragble {
    /// Makes `target` draggable, picking mouse or touch events for the
    /// current device.
    ///
    /// # Errors
    ///
    /// [`AttachError::Config`] for anything [`Dragble::new`] rejects, and
    /// [`AttachError::Dom`] if the start listener cannot be attached.
    pub fn new(
        tree: DomTree,
        target: Target<'_, ElementId>,
        options: DragOptions<'_, ElementId>,
        callbacks: Callbacks<ElementId>,
    ) -> Result<Self, AttachError> {
        let scheme = InputScheme::detect(tree.window());
        Self::with_scheme(tree, target, options, callbacks, scheme)
    }

    /// Like [`new`](Self::new) with an explicit [`InputScheme`].
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn with_scheme(
        tree: DomTree,
        target: Target<'_, ElementId>,
        options: DragOptions<'_, ElementId>,
        callbacks: Callbacks<ElementId>,
        scheme: InputScheme,
    ) -> Result<Self, AttachError> {
        let drag = Dragble::new(&tree, target, options, callbacks)?;
        let handle = drag
            .handle()
            .and_then(|id| tree.element(id))
            .ok_or(ConfigError::MissingHandle)?;
        let document = tree.document().clone();
        let scheduler = drag.config().scheduler;

        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
            let weak = weak.clone();
            let frames = FrameRequester::new(
                move |tick| {
                    if let Some(shared) = weak.upgrade() {
                        shared.on_frame(&tick);
                    }
                },
                &scheduler,
            );
            Shared {
                session: RefCell::new(Session { tree, drag }),
                frames,
                scheme,
                handle,
                document,
                listeners: RefCell::new(None),
                down_attached: Cell::new(false),
                document_attached: Cell::new(false),
            }
        });

        *shared.listeners.borrow_mut() = Some(Listeners {
            down: listener(&shared, Shared::on_down),
            moved: listener(&shared, Shared::on_move),
            end: listener(&shared, Shared::on_end),
        });
        shared.attach_down()?;
        Ok(Self { shared })
    }

    /// Registers `el` with the underlying tree, e.g. to pass it to
    /// [`apply_containment`](Self::apply_containment).
    pub fn register(&self, el: &Element) -> ElementId {
        self.shared.session.borrow().tree.register(el)
    }

    /// Accepts gestures again.
    ///
    /// # Errors
    ///
    /// Fails if the start listener cannot be attached. The controller is left
    /// disabled in that case.
    pub fn enable(&self) -> Result<(), JsValue> {
        let mut session = self.shared.session.borrow_mut();
        enable_with(&mut session.drag, || self.shared.attach_down())
    }

    /// Stops accepting new gestures. A gesture in progress continues.
    pub fn disable(&self) {
        self.shared.session.borrow_mut().drag.disable();
        self.shared.detach_down();
    }

    /// Removes every listener, cancels the pending frame and releases the
    /// elements. Idempotent.
    pub fn destroy(&self) {
        {
            let mut session = self.shared.session.borrow_mut();
            let Session { tree, drag } = &mut *session;
            if drag.is_destroyed() {
                return;
            }
            drag.destroy(tree);
            tree.prune();
        }
        self.shared.detach_down();
        self.shared.detach_document();
        self.shared.frames.cancel();
        self.shared.listeners.borrow_mut().take();
    }

    /// Recomputes the limits from `container`'s current geometry.
    pub fn apply_containment(&self, container: Target<'_, ElementId>) {
        let mut session = self.shared.session.borrow_mut();
        let Session { tree, drag } = &mut *session;
        drag.apply_containment(&*tree, container);
    }

    /// Replaces the limits.
    pub fn set_limits(&self, limits: Limits) {
        self.shared.session.borrow_mut().drag.set_limits(limits);
    }

    /// Moves the element back to its origin on the next frame.
    pub fn reset_position(&self) {
        let needs_frame = {
            let mut session = self.shared.session.borrow_mut();
            session.drag.reset_position();
            session.drag.needs_frame()
        };
        if needs_frame {
            self.shared.frames.request();
        }
    }

    /// Installs a trace sink on the controller.
    pub fn set_trace_sink(&self, sink: Box<dyn TraceSink>) {
        self.shared.session.borrow_mut().drag.set_trace_sink(sink);
    }

    /// Runs `f` with the controller, for queries not mirrored here.
    pub fn with_controller<R>(&self, f: impl FnOnce(&Dragble<ElementId>) -> R) -> R {
        f(&self.shared.session.borrow().drag)
    }

    /// Whether a gesture has committed to a direction.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.with_controller(Dragble::is_dragging)
    }

    /// The most recently computed translation.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.with_controller(Dragble::position)
    }
}

impl Drop for WebDragble {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn listener(shared: &Rc<Shared>, handler: fn(&Shared, &Event)) -> EventClosure {
    let weak = Rc::downgrade(shared);
    Closure::wrap(Box::new(move |event: Event| {
        if let Some(shared) = weak.upgrade() {
            handler(&shared, &event);
        }
    }) as Box<dyn FnMut(Event)>)
}

/// Enables `drag` and runs `attach`, rolling the enable back if it fails.
fn enable_with<Id, E>(
    drag: &mut Dragble<Id>,
    attach: impl FnOnce() -> Result<(), E>,
) -> Result<(), E>
where
    Id: Copy + Eq + fmt::Debug,
{
    drag.enable();
    if !drag.is_enabled() {
        return Ok(());
    }
    attach().inspect_err(|_| drag.disable())
}

fn event_target(tree: &DomTree, event: &Event) -> Option<ElementId> {
    let el = event.target()?.dyn_into::<Element>().ok()?;
    Some(tree.register(&el))
}

/// Copies the controller's decisions back onto the DOM event.
fn mirror(pointer: &PointerEvent<ElementId>, event: &Event) {
    if pointer.propagation_stopped {
        event.stop_propagation();
    }
    if pointer.default_prevented {
        event.prevent_default();
    }
}

impl Shared {
    fn on_down(&self, event: &Event) {
        let Some(position) = self.scheme.position(event) else {
            return;
        };
        let (listening, needs_frame) = {
            let mut session = self.session.borrow_mut();
            let Session { tree, drag } = &mut *session;
            let Some(target) = event_target(tree, event) else {
                return;
            };
            let mut pointer =
                PointerEvent::new(target, position, now()).with_kind(self.scheme.kind());
            drag.pointer_down(tree, &mut pointer);
            mirror(&pointer, event);
            (drag.is_listening(), drag.needs_frame())
        };
        if listening {
            self.attach_document();
        }
        if needs_frame {
            self.frames.request();
        }
    }

    fn on_move(&self, event: &Event) {
        let Some(position) = self.scheme.position(event) else {
            return;
        };
        let (listening, needs_frame) = {
            let mut session = self.session.borrow_mut();
            let Session { tree, drag } = &mut *session;
            let Some(target) = drag.target() else {
                return;
            };
            let mut pointer =
                PointerEvent::new(target, position, now()).with_kind(self.scheme.kind());
            drag.pointer_move(tree, &mut pointer);
            mirror(&pointer, event);
            (drag.is_listening(), drag.needs_frame())
        };
        if !listening {
            self.detach_document();
        }
        if needs_frame {
            self.frames.request();
        }
    }

    fn on_end(&self, event: &Event) {
        let position = self.scheme.position(event).unwrap_or(Point::ZERO);
        let cancel = self.scheme.is_cancel(&event.type_());
        let needs_frame = {
            let mut session = self.session.borrow_mut();
            let Session { tree, drag } = &mut *session;
            match drag.target() {
                Some(target) => {
                    let pointer =
                        PointerEvent::new(target, position, now()).with_kind(self.scheme.kind());
                    if cancel {
                        drag.pointer_cancel(tree, &pointer);
                    } else {
                        drag.pointer_up(tree, &pointer);
                    }
                    drag.needs_frame()
                }
                None => false,
            }
        };
        self.session.borrow().tree.prune();
        self.detach_document();
        if needs_frame {
            self.frames.request();
        }
    }

    fn on_frame(&self, tick: &FrameTick) {
        let Ok(mut session) = self.session.try_borrow_mut() else {
            // Reentrant tick; try again next frame.
            self.frames.request();
            return;
        };
        let Session { tree, drag } = &mut *session;
        drag.on_frame(tree, tick);
    }

    fn attach_down(&self) -> Result<(), JsValue> {
        if self.down_attached.get() {
            return Ok(());
        }
        let listeners = self.listeners.borrow();
        let Some(l) = listeners.as_ref() else {
            return Ok(());
        };
        self.handle.add_event_listener_with_callback(
            self.scheme.start(),
            l.down.as_ref().unchecked_ref(),
        )?;
        self.down_attached.set(true);
        Ok(())
    }

    fn detach_down(&self) {
        if !self.down_attached.replace(false) {
            return;
        }
        if let Some(l) = self.listeners.borrow().as_ref() {
            let _ = self.handle.remove_event_listener_with_callback(
                self.scheme.start(),
                l.down.as_ref().unchecked_ref(),
            );
        }
    }

    fn attach_document(&self) {
        if self.document_attached.get() {
            return;
        }
        let listeners = self.listeners.borrow();
        let Some(l) = listeners.as_ref() else {
            return;
        };
        // Touch moves must be cancelable to suppress scrolling.
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        let _ = self
            .document
            .add_event_listener_with_callback_and_add_event_listener_options(
                self.scheme.moved(),
                l.moved.as_ref().unchecked_ref(),
                &options,
            );
        for name in self.scheme.ends() {
            let _ = self
                .document
                .add_event_listener_with_callback(name, l.end.as_ref().unchecked_ref());
        }
        self.document_attached.set(true);
    }

    fn detach_document(&self) {
        if !self.document_attached.replace(false) {
            return;
        }
        if let Some(l) = self.listeners.borrow().as_ref() {
            let _ = self.document.remove_event_listener_with_callback(
                self.scheme.moved(),
                l.moved.as_ref().unchecked_ref(),
            );
            for name in self.scheme.ends() {
                let _ = self
                    .document
                    .remove_event_listener_with_callback(name, l.end.as_ref().unchecked_ref());
            }
        }
    }
}
