// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! On-demand frame source.
//!
//! [`FrameRequester`] asks the browser for a single frame with
//! `requestAnimationFrame` whenever the controller has a commit waiting. Each
//! callback receives a [`DOMHighResTimeStamp`][mdn] in milliseconds, which is
//! converted to a nanosecond [`HostTime`].
//!
//! When `requestAnimationFrame` is unavailable the request is made with
//! `setTimeout` at the configured fallback rate instead, and the tick is
//! reported as [`TickSource::Timer`].
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use dragble_core::scheduler::SchedulerConfig;
use dragble_core::time::HostTime;
use dragble_core::timing::{FrameTick, TickSource};

// Direct global bindings instead of `web_sys::Window` methods, so a missing
// `requestAnimationFrame` surfaces as a caught exception.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(catch, js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> Result<i32, JsValue>;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);

    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(callback: &JsValue, ms: f64) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout(id: i32);
}

/// Interval used when the configured fallback rate is zero.
const DEFAULT_FALLBACK_MS: f64 = 1000.0 / 60.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Refresh(i32),
    Timer(i32),
}

type FrameClosure = Closure<dyn FnMut(f64)>;

struct FrameInner {
    /// Shared by both request paths; created on the first request.
    closure: RefCell<Option<FrameClosure>>,
    callback: RefCell<Box<dyn FnMut(FrameTick)>>,
    frame_counter: Cell<u64>,
    pending: Cell<Option<Pending>>,
    /// Set once `requestAnimationFrame` has thrown.
    timer_only: Cell<bool>,
    fallback_ms: f64,
}

/// Requests single frames from the browser and turns them into
/// [`FrameTick`]s.
///
/// At most one request is outstanding at a time; [`request`](Self::request)
/// while one is pending is a no-op. Dropping the requester cancels the
/// outstanding request.
pub struct FrameRequester {
    inner: Rc<FrameInner>,
}

impl FrameRequester {
    /// Creates a requester that delivers ticks to `callback`.
    ///
    /// The timer fallback runs at `config.fallback_rate_hz`.
    pub fn new(callback: impl FnMut(FrameTick) + 'static, config: &SchedulerConfig) -> Self {
        Self {
            inner: Rc::new(FrameInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                frame_counter: Cell::new(0),
                pending: Cell::new(None),
                timer_only: Cell::new(false),
                fallback_ms: config
                    .fallback_interval()
                    .map_or(DEFAULT_FALLBACK_MS, |d| d.as_millis_f64()),
            }),
        }
    }

    /// Asks for one frame.
    pub fn request(&self) {
        if self.inner.pending.get().is_some() {
            return;
        }
        self.ensure_closure();
        let closure = self.inner.closure.borrow();
        let Some(closure) = closure.as_ref() else {
            return;
        };
        let js = closure.as_ref().unchecked_ref();

        if !self.inner.timer_only.get() {
            match request_animation_frame(js) {
                Ok(id) => {
                    self.inner.pending.set(Some(Pending::Refresh(id)));
                    return;
                }
                Err(_) => self.inner.timer_only.set(true),
            }
        }
        let id = set_timeout(js, self.inner.fallback_ms);
        self.inner.pending.set(Some(Pending::Timer(id)));
    }

    /// Cancels the outstanding request, if any.
    pub fn cancel(&self) {
        match self.inner.pending.take() {
            Some(Pending::Refresh(id)) => cancel_animation_frame(id),
            Some(Pending::Timer(id)) => clear_timeout(id),
            None => {}
        }
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.pending.get().is_some()
    }

    fn ensure_closure(&self) {
        if self.inner.closure.borrow().is_some() {
            return;
        }
        let inner = Rc::clone(&self.inner);
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            let Some(pending) = inner.pending.take() else {
                return;
            };
            let (source, ms) = match pending {
                Pending::Refresh(_) => (TickSource::DisplayRefresh, timestamp_ms),
                // setTimeout passes no timestamp.
                Pending::Timer(_) => (TickSource::Timer, performance_now()),
            };
            let frame_index = inner.frame_counter.get();
            inner.frame_counter.set(frame_index + 1);

            let tick = FrameTick {
                now: HostTime::from_millis_f64(ms),
                frame_index,
                source,
            };
            inner.callback.borrow_mut()(tick);
        }) as Box<dyn FnMut(f64)>);
        *self.inner.closure.borrow_mut() = Some(closure);
    }
}

impl Drop for FrameRequester {
    fn drop(&mut self) {
        self.cancel();
        // Drop the JS closure so it doesn't leak.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for FrameRequester {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameRequester")
            .field("pending", &self.inner.pending.get())
            .field("timer_only", &self.inner.timer_only.get())
            .field("frame_counter", &self.inner.frame_counter.get())
            .field("fallback_ms", &self.inner.fallback_ms)
            .finish_non_exhaustive()
    }
}
