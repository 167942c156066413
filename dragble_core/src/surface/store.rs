// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays surface storage with allocation, topology, and property
//! management.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Size, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker};

use super::id::{INVALID, SurfaceId};
use crate::backend::SurfaceTree;
use crate::dirty;
use crate::transform::{RenderMode, Transform3d};

/// Struct-of-arrays storage for surfaces.
///
/// Surfaces are addressed by [`SurfaceId`] handles. Destroyed surfaces are
/// recycled via a free list, and generation counters make stale handles
/// inert: reads through a stale handle return defaults and writes are
/// ignored.
#[derive(Debug)]
pub struct SurfaceStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) offset_parent: Vec<u32>,

    // -- Layout (set by the host) --
    pub(crate) offset: Vec<Vec2>,
    pub(crate) size: Vec<Size>,
    pub(crate) key: Vec<Option<String>>,

    // -- Visual state (set by controllers) --
    pub(crate) transform: Vec<Transform3d>,
    pub(crate) render_mode: Vec<RenderMode>,
    pub(crate) dragging: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for SurfaceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            offset_parent: Vec::new(),
            offset: Vec::new(),
            size: Vec::new(),
            key: Vec::new(),
            transform: Vec::new(),
            render_mode: Vec::new(),
            dragging: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    /// Creates a detached surface at `offset` with the given layout size.
    pub fn create_surface(&mut self, offset: Vec2, size: Size) -> SurfaceId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.offset_parent[i] = INVALID;
            self.offset[i] = offset;
            self.size[i] = size;
            self.key[i] = None;
            self.transform[i] = Transform3d::IDENTITY;
            self.render_mode[i] = RenderMode::default();
            self.dragging[i] = false;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.offset_parent.push(INVALID);
            self.offset.push(offset);
            self.size.push(size);
            self.key.push(None);
            self.transform.push(Transform3d::IDENTITY);
            self.render_mode.push(RenderMode::default());
            self.dragging.push(false);
            self.generation.push(0);
            idx
        };

        self.pending_added.push(idx);

        SurfaceId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a surface, detaching its children and freeing its slot.
    ///
    /// Destroying a stale handle is a no-op.
    pub fn destroy_surface(&mut self, id: SurfaceId) {
        if !self.is_live(id) {
            return;
        }
        let idx = id.idx;
        for i in 0..self.len as usize {
            if self.parent[i] == idx {
                self.parent[i] = INVALID;
            }
            if self.offset_parent[i] == idx {
                self.offset_parent[i] = INVALID;
            }
        }
        self.dirty.remove_key(idx);
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
        self.pending_removed.push(idx);
    }

    /// Whether `id` refers to a live surface.
    #[must_use]
    pub fn is_live(&self, id: SurfaceId) -> bool {
        id.idx < self.len
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Topology API --

    /// Makes `child` a child of `parent`.
    ///
    /// The parent also becomes the child's offset parent; use
    /// [`set_offset_parent`](Self::set_offset_parent) when the positioned
    /// ancestor differs from the structural one.
    pub fn append_child(&mut self, parent: SurfaceId, child: SurfaceId) {
        if !self.is_live(parent) || !self.is_live(child) || parent == child {
            return;
        }
        self.parent[child.idx as usize] = parent.idx;
        self.offset_parent[child.idx as usize] = parent.idx;
    }

    /// Overrides the offset parent of `id`. `None` makes it a layout root.
    pub fn set_offset_parent(&mut self, id: SurfaceId, offset_parent: Option<SurfaceId>) {
        if !self.is_live(id) {
            return;
        }
        self.offset_parent[id.idx as usize] = match offset_parent {
            Some(p) if self.is_live(p) => p.idx,
            _ => INVALID,
        };
    }

    // -- Layout API --

    /// Sets the untransformed offset of `id` within its offset parent.
    pub fn set_offset(&mut self, id: SurfaceId, offset: Vec2) {
        if self.is_live(id) {
            self.offset[id.idx as usize] = offset;
        }
    }

    /// Sets the layout size of `id`.
    pub fn set_size(&mut self, id: SurfaceId, size: Size) {
        if self.is_live(id) {
            self.size[id.idx as usize] = size;
        }
    }

    /// Registers a lookup key (e.g. `"#panel"`) for `id`.
    pub fn set_key(&mut self, id: SurfaceId, key: &str) {
        if self.is_live(id) {
            self.key[id.idx as usize] = Some(String::from(key));
        }
    }

    // -- Visual state API --

    /// Replaces the transform of `id`.
    pub fn set_transform(&mut self, id: SurfaceId, transform: Transform3d) {
        if self.is_live(id) {
            self.transform[id.idx as usize] = transform;
            self.dirty.mark(id.idx, dirty::TRANSFORM);
        }
    }

    /// Returns the transform of `id`.
    #[must_use]
    pub fn transform(&self, id: SurfaceId) -> Transform3d {
        if self.is_live(id) {
            self.transform[id.idx as usize]
        } else {
            Transform3d::IDENTITY
        }
    }

    /// Returns the x/y translation of `id`.
    #[must_use]
    pub fn translation(&self, id: SurfaceId) -> Vec2 {
        self.transform(id).translation_2d()
    }

    /// Returns whether `id` is in the dragging state.
    #[must_use]
    pub fn is_dragging(&self, id: SurfaceId) -> bool {
        self.is_live(id) && self.dragging[id.idx as usize]
    }

    // -- Raw index accessors for presenters --
    //
    // These skip generation validation. Only use with indices taken from a
    // `SurfaceChanges` produced by this store.

    /// Returns the transform at raw slot `idx`.
    #[must_use]
    pub fn transform_at(&self, idx: u32) -> Transform3d {
        self.transform[idx as usize]
    }

    /// Returns the render mode last used for slot `idx`.
    #[must_use]
    pub fn render_mode_at(&self, idx: u32) -> RenderMode {
        self.render_mode[idx as usize]
    }

    /// Returns the dragging state at raw slot `idx`.
    #[must_use]
    pub fn dragging_at(&self, idx: u32) -> bool {
        self.dragging[idx as usize]
    }

    /// Returns the lookup key at raw slot `idx`.
    #[must_use]
    pub fn key_at(&self, idx: u32) -> Option<&str> {
        self.key[idx as usize].as_deref()
    }

    fn parent_of(&self, links: &[u32], id: SurfaceId) -> Option<SurfaceId> {
        if !self.is_live(id) {
            return None;
        }
        let p = links[id.idx as usize];
        (p != INVALID).then(|| SurfaceId {
            idx: p,
            generation: self.generation[p as usize],
        })
    }
}

impl SurfaceTree for SurfaceStore {
    type Id = SurfaceId;

    fn lookup(&self, key: &str) -> Option<SurfaceId> {
        (0..self.len)
            .filter(|&idx| !self.free_list.contains(&idx))
            .find(|&idx| self.key[idx as usize].as_deref() == Some(key))
            .map(|idx| SurfaceId {
                idx,
                generation: self.generation[idx as usize],
            })
    }

    fn is_alive(&self, id: SurfaceId) -> bool {
        self.is_live(id)
    }

    fn parent(&self, id: SurfaceId) -> Option<SurfaceId> {
        self.parent_of(&self.parent, id)
    }

    fn offset_parent(&self, id: SurfaceId) -> Option<SurfaceId> {
        self.parent_of(&self.offset_parent, id)
    }

    fn offset(&self, id: SurfaceId) -> Vec2 {
        if self.is_live(id) {
            self.offset[id.idx as usize]
        } else {
            Vec2::ZERO
        }
    }

    fn size(&self, id: SurfaceId) -> Size {
        if self.is_live(id) {
            self.size[id.idx as usize]
        } else {
            Size::ZERO
        }
    }

    fn resolved_transform(&self, id: SurfaceId) -> String {
        self.transform(id).to_css()
    }

    fn set_translation(&mut self, id: SurfaceId, translation: Vec2, mode: RenderMode) {
        if !self.is_live(id) {
            return;
        }
        let i = id.idx as usize;
        let z = self.transform[i].cols[3][2];
        self.transform[i] = Transform3d::from_translation(translation.x, translation.y, z);
        self.render_mode[i] = mode;
        self.dirty.mark(id.idx, dirty::TRANSFORM);
    }

    fn set_dragging(&mut self, id: SurfaceId, dragging: bool) {
        if !self.is_live(id) {
            return;
        }
        let i = id.idx as usize;
        if self.dragging[i] != dragging {
            self.dragging[i] = dragging;
            self.dirty.mark(id.idx, dirty::STATE);
        }
    }
}
