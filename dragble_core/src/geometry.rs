// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position queries against a [`SurfaceTree`].
//!
//! Nothing here is cached: layout may change between gestures, so every call
//! reads the tree afresh.

use kurbo::Vec2;

use crate::backend::SurfaceTree;
use crate::transform::parse_translation;

/// Sums the offsets of `id` and each of its offset ancestors.
///
/// A surface without an offset parent (a layout root, or a detached surface)
/// has a cumulative offset of zero. Transforms are ignored, so the result is
/// the untransformed origin of the surface in root coordinates.
#[must_use]
pub fn cumulative_offset<T: SurfaceTree + ?Sized>(tree: &T, id: T::Id) -> Vec2 {
    if tree.offset_parent(id).is_none() {
        return Vec2::ZERO;
    }
    let mut total = Vec2::ZERO;
    let mut current = Some(id);
    while let Some(surface) = current {
        total += tree.offset(surface);
        current = tree.offset_parent(surface);
    }
    total
}

/// Reads the translation currently applied to `id`.
///
/// Returns zero when the surface has no transform or its resolved transform
/// cannot be parsed.
#[must_use]
pub fn current_translation<T: SurfaceTree + ?Sized>(tree: &T, id: T::Id) -> Vec2 {
    parse_translation(&tree.resolved_transform(id))
}
