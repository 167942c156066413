// Copyright 2026 the Dragble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A presenter that records what a DOM host would write.

use alloc::string::String;
use alloc::vec::Vec;

use dragble_core::backend::Presenter;
use dragble_core::surface::{SurfaceChanges, SurfaceStore};

/// One write a host would perform on its native tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Presented {
    /// `style.transform` of the surface in `slot` was set to `css`.
    Transform {
        /// Raw store slot.
        slot: u32,
        /// The transform value in the surface's render mode.
        css: String,
    },
    /// The dragging class of the surface in `slot` was toggled.
    Dragging {
        /// Raw store slot.
        slot: u32,
        /// Whether the class is now present.
        on: bool,
    },
}

/// Records every transform and dragging-state write in apply order.
#[derive(Clone, Debug, Default)]
pub struct CssPresenter {
    writes: Vec<Presented>,
    applies: u64,
}

impl CssPresenter {
    /// An empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All writes so far.
    #[must_use]
    pub fn writes(&self) -> &[Presented] {
        &self.writes
    }

    /// How many times [`Presenter::apply`] ran.
    #[must_use]
    pub fn applies(&self) -> u64 {
        self.applies
    }

    /// The most recent transform written to `slot`.
    #[must_use]
    pub fn last_transform(&self, slot: u32) -> Option<&str> {
        self.writes.iter().rev().find_map(|w| match w {
            Presented::Transform { slot: s, css } if *s == slot => Some(css.as_str()),
            _ => None,
        })
    }

    /// Number of transform writes across all slots.
    #[must_use]
    pub fn transform_writes(&self) -> usize {
        self.writes
            .iter()
            .filter(|w| matches!(w, Presented::Transform { .. }))
            .count()
    }
}

impl Presenter for CssPresenter {
    fn apply(&mut self, store: &SurfaceStore, changes: &SurfaceChanges) {
        self.applies += 1;
        for &slot in &changes.transforms {
            let translation = store.transform_at(slot).translation_2d();
            let css = store.render_mode_at(slot).css(translation);
            self.writes.push(Presented::Transform { slot, css });
        }
        for &slot in &changes.states {
            self.writes.push(Presented::Dragging {
                slot,
                on: store.dragging_at(slot),
            });
        }
    }
}
