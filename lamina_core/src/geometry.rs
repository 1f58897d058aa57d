// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental local-to-absolute rect mapping for tree walks.

use alloc::vec::Vec;

use kurbo::{Rect, Vec2};

/// An offset accumulator for depth-first tree walks.
///
/// The requirements pass descends the layer tree pushing each layer's offset
/// on entry and popping it on exit, so mapping a rect from the current
/// layer's coordinate space to absolute coordinates is a single translation
/// rather than an ancestor-chain walk.
#[derive(Clone, Debug, Default)]
pub struct GeometryMap {
    stack: Vec<Vec2>,
    accumulated: Vec2,
}

impl GeometryMap {
    /// Creates an empty map at the absolute origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a child coordinate space offset by `offset` from the current
    /// one.
    pub fn push(&mut self, offset: Vec2) {
        self.stack.push(offset);
        self.accumulated += offset;
    }

    /// Leaves the current coordinate space.
    ///
    /// # Panics
    ///
    /// Panics if there is no matching [`push`](Self::push).
    pub fn pop(&mut self) {
        let offset = self.stack.pop().expect("geometry map pop without push");
        self.accumulated -= offset;
    }

    /// Current depth of the mapping stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Maps a rect in the current coordinate space to absolute coordinates.
    #[must_use]
    pub fn map_to_absolute(&self, rect: Rect) -> Rect {
        rect + self.accumulated
    }

    /// The accumulated offset of the current coordinate space from the
    /// absolute origin.
    #[must_use]
    pub fn absolute_offset(&self) -> Vec2 {
        self.accumulated
    }
}
