// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for platform integrations.
//!
//! Dragble never owns a layout or rendering engine. Everything it needs to
//! know about surfaces, and every visible side effect it produces, goes
//! through two traits:
//!
//! - [`SurfaceTree`]: read access to surface geometry and the resolved
//!   transform, plus the two writes a drag performs (translation and the
//!   "is dragging" state). Hosts implement it over their native tree (e.g.
//!   DOM elements); [`SurfaceStore`](crate::surface::SurfaceStore) is the
//!   in-memory implementation.
//!
//! - [`Presenter`]: applies the incremental changes recorded by a
//!   [`SurfaceStore`](crate::surface::SurfaceStore) to a native tree, for
//!   hosts that keep a retained store between the controller and the
//!   platform.
//!
//! Listener attachment and frame requests are not abstracted by a trait
//! because their setup and lifecycle differ fundamentally across platforms.
//! The controller reports what the host should be listening for through
//! [`Dragble::is_enabled`](crate::controller::Dragble::is_enabled),
//! [`Dragble::is_listening`](crate::controller::Dragble::is_listening) and
//! [`Dragble::needs_frame`](crate::controller::Dragble::needs_frame).

use core::fmt;

use alloc::string::String;
use kurbo::{Size, Vec2};

use crate::surface::{SurfaceChanges, SurfaceStore};
use crate::transform::RenderMode;

/// Host-side view of the surfaces a controller works with.
///
/// Offsets follow the usual layout model: each surface has an optional
/// *offset parent* (its positioned containing surface) and an offset
/// relative to it, ignoring any transform.
pub trait SurfaceTree {
    /// Opaque, cheap handle to a surface.
    type Id: Copy + Eq + fmt::Debug;

    /// Resolves a lookup key (e.g. a selector) to a surface.
    fn lookup(&self, key: &str) -> Option<Self::Id> {
        _ = key;
        None
    }

    /// Whether `id` refers to a live surface.
    fn is_alive(&self, id: Self::Id) -> bool;

    /// The structural parent of `id`, used for handle hit-testing.
    fn parent(&self, id: Self::Id) -> Option<Self::Id>;

    /// The positioned ancestor that `offset` is measured against.
    fn offset_parent(&self, id: Self::Id) -> Option<Self::Id>;

    /// Offset of `id` within its offset parent, untransformed.
    fn offset(&self, id: Self::Id) -> Vec2;

    /// Layout size of `id`.
    fn size(&self, id: Self::Id) -> Size;

    /// The resolved transform, as a computed style would report it
    /// (`none`, `matrix(…)`, or `matrix3d(…)`).
    fn resolved_transform(&self, id: Self::Id) -> String;

    /// Applies a translation to the surface's visual transform.
    fn set_translation(&mut self, id: Self::Id, translation: Vec2, mode: RenderMode);

    /// Sets or clears the cosmetic "is dragging" state.
    fn set_dragging(&mut self, id: Self::Id, dragging: bool);

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: Self::Id, node: Self::Id) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}

/// Applies changes recorded by a [`SurfaceStore`] to a native tree.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(tick: FrameTick) {
///     // Commit the latest queued drag position into the store.
///     dragble.on_frame(&mut store, &tick);
///
///     // Present: apply incremental changes to the native tree.
///     let changes = store.evaluate();
///     presenter.apply(&store, &changes);
/// }
/// ```
pub trait Presenter {
    /// Applies the given [`SurfaceChanges`], reading current property values
    /// from `store` as needed.
    fn apply(&mut self, store: &SurfaceStore, changes: &SurfaceChanges);
}
