// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`SurfaceTree`] over live DOM elements.

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::{Size, Vec2};
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

use dragble_core::backend::SurfaceTree;
use dragble_core::transform::RenderMode;

/// Class toggled on the draggable element while a gesture is active.
pub const DRAGGING_CLASS: &str = "isDragging";

/// Handle to an element registered with a [`DomTree`].
///
/// Handles are only meaningful for the tree that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(u32);

impl ElementId {
    /// Registry slot of this element.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Maps DOM elements to [`ElementId`]s and answers geometry queries with
/// `offsetParent` / `offsetLeft` / `offsetTop` and the computed `transform`.
///
/// Elements are registered on first sight. A detached element reports
/// [`is_alive`](SurfaceTree::is_alive) as `false` until [`prune`](Self::prune)
/// releases it.
pub struct DomTree {
    window: Window,
    document: Document,
    elements: RefCell<Registry<Element>>,
}

impl core::fmt::Debug for DomTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomTree")
            .field("registered", &self.elements.borrow().live())
            .finish_non_exhaustive()
    }
}

impl DomTree {
    /// Creates a tree for `window`'s document.
    ///
    /// # Errors
    ///
    /// Fails if the window has no document.
    pub fn new(window: Window) -> Result<Self, JsValue> {
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        Ok(Self {
            window,
            document,
            elements: RefCell::new(Registry::default()),
        })
    }

    /// Creates a tree for the global window.
    ///
    /// # Errors
    ///
    /// Fails outside a browser main thread or without a document.
    pub fn from_global() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        Self::new(window)
    }

    /// The document this tree reads from.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The window this tree reads computed styles from.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Returns the handle for `el`, registering it if needed.
    pub fn register(&self, el: &Element) -> ElementId {
        slot_id(self.elements.borrow_mut().register(el))
    }

    /// The element behind `id`, unless it was pruned.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.elements.borrow().get(id.0 as usize).cloned()
    }

    /// Releases every registered element that is no longer in the document.
    ///
    /// Handles to released elements stay invalid; their slots are not reused.
    pub fn prune(&self) {
        self.elements.borrow_mut().retain(|el| el.is_connected());
    }

    fn html(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "a page does not register more than u32::MAX elements"
)]
fn slot_id(i: usize) -> ElementId {
    ElementId(i as u32)
}

/// Append-only slots with tombstones, so pruning never renumbers handles.
#[derive(Debug)]
struct Registry<E> {
    slots: Vec<Option<E>>,
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<E: PartialEq + Clone> Registry<E> {
    fn register(&mut self, item: &E) -> usize {
        if let Some(i) = self.slots.iter().position(|s| s.as_ref() == Some(item)) {
            return i;
        }
        self.slots.push(Some(item.clone()));
        self.slots.len() - 1
    }

    fn get(&self, slot: usize) -> Option<&E> {
        self.slots.get(slot)?.as_ref()
    }

    fn retain(&mut self, keep: impl Fn(&E) -> bool) {
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(|e| !keep(e)) {
                *slot = None;
            }
        }
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
    }

    fn live(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

impl SurfaceTree for DomTree {
    type Id = ElementId;

    fn lookup(&self, key: &str) -> Option<ElementId> {
        let el = self.document.query_selector(key).ok().flatten()?;
        Some(self.register(&el))
    }

    fn is_alive(&self, id: ElementId) -> bool {
        self.element(id).is_some_and(|el| el.is_connected())
    }

    fn parent(&self, id: ElementId) -> Option<ElementId> {
        let parent = self.element(id)?.parent_element()?;
        Some(self.register(&parent))
    }

    fn offset_parent(&self, id: ElementId) -> Option<ElementId> {
        let parent = self.html(id)?.offset_parent()?;
        Some(self.register(&parent))
    }

    fn offset(&self, id: ElementId) -> Vec2 {
        self.html(id).map_or(Vec2::ZERO, |el| {
            Vec2::new(f64::from(el.offset_left()), f64::from(el.offset_top()))
        })
    }

    fn size(&self, id: ElementId) -> Size {
        self.html(id).map_or(Size::ZERO, |el| {
            Size::new(f64::from(el.offset_width()), f64::from(el.offset_height()))
        })
    }

    fn resolved_transform(&self, id: ElementId) -> String {
        let Some(el) = self.element(id) else {
            return String::from("none");
        };
        match self.window.get_computed_style(&el) {
            Ok(Some(style)) => style
                .get_property_value("transform")
                .unwrap_or_else(|_| String::from("none")),
            _ => String::from("none"),
        }
    }

    fn set_translation(&mut self, id: ElementId, translation: Vec2, mode: RenderMode) {
        if let Some(el) = self.html(id) {
            let _ = el.style().set_property("transform", &mode.css(translation));
        }
    }

    fn set_dragging(&mut self, id: ElementId, dragging: bool) {
        if let Some(el) = self.element(id) {
            let classes = el.class_list();
            let _ = if dragging {
                classes.add_1(DRAGGING_CLASS)
            } else {
                classes.remove_1(DRAGGING_CLASS)
            };
        }
    }

    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        match (self.element(ancestor), self.element(node)) {
            (Some(a), Some(n)) => a.contains(Some(n.as_ref())),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Registry;

    #[test]
    fn registry_reuses_existing_slots() {
        let mut r = Registry::default();
        assert_eq!(r.register(&"knob"), 0);
        assert_eq!(r.register(&"track"), 1);
        assert_eq!(r.register(&"knob"), 0);
        assert_eq!(r.live(), 2);
    }

    #[test]
    fn pruning_releases_without_renumbering() {
        let mut r = Registry::default();
        for name in ["knob", "hovered-a", "track", "hovered-b"] {
            r.register(&name);
        }
        r.retain(|name| !name.starts_with("hovered"));

        assert_eq!(r.live(), 2);
        assert_eq!(r.get(0), Some(&"knob"));
        assert_eq!(r.get(1), None);
        assert_eq!(r.get(2), Some(&"track"));
        // The trailing tombstone is dropped, so the next element lands at 3.
        assert_eq!(r.register(&"handle"), 3);
        assert_eq!(r.register(&"track"), 2);
    }
}
