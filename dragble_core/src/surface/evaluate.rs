// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change collection for presenters.
//!
//! [`SurfaceStore::evaluate`] drains every dirty channel and reports the raw
//! slot indices that changed, so a [`Presenter`](crate::backend::Presenter)
//! can touch only those native nodes.

use alloc::vec::Vec;

use super::store::SurfaceStore;
use crate::dirty;

/// The set of changes produced by a single [`SurfaceStore::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct SurfaceChanges {
    /// Surfaces whose translation changed.
    pub transforms: Vec<u32>,
    /// Surfaces whose dragging state changed.
    pub states: Vec<u32>,
    /// Surfaces created since the last evaluate.
    pub added: Vec<u32>,
    /// Surfaces destroyed since the last evaluate.
    pub removed: Vec<u32>,
}

impl SurfaceChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.transforms.clear();
        self.states.clear();
        self.added.clear();
        self.removed.clear();
    }

    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
            && self.states.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
    }
}

impl SurfaceStore {
    /// Drains dirty state and returns what changed since the last call.
    pub fn evaluate(&mut self) -> SurfaceChanges {
        let mut changes = SurfaceChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer.
    pub fn evaluate_into(&mut self, changes: &mut SurfaceChanges) {
        changes.clear();

        changes.transforms = self
            .dirty
            .drain(dirty::TRANSFORM)
            .deterministic()
            .run()
            .filter(|&idx| !self.free_list.contains(&idx))
            .collect();

        changes.states = self
            .dirty
            .drain(dirty::STATE)
            .deterministic()
            .run()
            .filter(|&idx| !self.free_list.contains(&idx))
            .collect();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Size, Vec2};

    use crate::backend::SurfaceTree;
    use crate::transform::RenderMode;

    use super::*;

    #[test]
    fn evaluate_reports_each_change_once() {
        let mut store = SurfaceStore::new();
        let s = store.create_surface(Vec2::ZERO, Size::new(10.0, 10.0));

        let first = store.evaluate();
        assert_eq!(first.added, &[s.index()]);
        assert!(first.transforms.is_empty());

        store.set_translation(s, Vec2::new(1.0, 0.0), RenderMode::TwoD);
        store.set_translation(s, Vec2::new(2.0, 0.0), RenderMode::TwoD);
        store.set_dragging(s, true);

        let second = store.evaluate();
        assert_eq!(second.transforms, &[s.index()]);
        assert_eq!(second.states, &[s.index()]);
        assert!(second.added.is_empty());

        assert!(store.evaluate().is_empty());
    }

    #[test]
    fn unchanged_dragging_state_is_not_reported() {
        let mut store = SurfaceStore::new();
        let s = store.create_surface(Vec2::ZERO, Size::new(10.0, 10.0));
        store.evaluate();
        store.set_dragging(s, false);
        assert!(store.evaluate().states.is_empty());
    }

    #[test]
    fn reparenting_alone_presents_nothing() {
        let mut store = SurfaceStore::new();
        let track = store.create_surface(Vec2::ZERO, Size::new(100.0, 10.0));
        let knob = store.create_surface(Vec2::ZERO, Size::new(10.0, 10.0));
        store.evaluate();

        store.append_child(track, knob);
        assert!(store.evaluate().is_empty());
        assert_eq!(store.parent(knob), Some(track));
    }

    #[test]
    fn removed_surfaces_are_reported() {
        let mut store = SurfaceStore::new();
        let s = store.create_surface(Vec2::ZERO, Size::new(10.0, 10.0));
        store.set_translation(s, Vec2::new(1.0, 1.0), RenderMode::TwoD);
        store.destroy_surface(s);
        let changes = store.evaluate();
        assert_eq!(changes.removed, &[s.index()]);
        assert!(changes.transforms.is_empty());
    }
}
