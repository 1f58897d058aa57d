// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlap bookkeeping for compositing promotion.
//!
//! While the requirements pass walks the tree in paint order, it records the
//! absolute bounds of every layer that will composite. A later layer whose
//! bounds intersect the recorded set cannot be painted in software behind an
//! already-composited surface, so it is promoted with an overlap reason.
//!
//! The map is a stack of *testing contexts*. Each composited container opens
//! a context for its descendants; bounds added inside it land one level
//! below the top, so a container's own contents never overlap-test against
//! themselves, while siblings painted later still see them once the context
//! is merged back down.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::geometry::GeometryMap;

/// Tracks absolute bounds of layers that will composite, in paint order.
#[derive(Debug)]
pub struct OverlapMap {
    stack: Vec<Vec<Rect>>,
    members: BTreeSet<u32>,
    geometry: GeometryMap,
}

impl Default for OverlapMap {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlapMap {
    /// Creates an empty map with one open testing context.
    #[must_use]
    pub fn new() -> Self {
        let mut map = Self {
            stack: Vec::new(),
            members: BTreeSet::new(),
            geometry: GeometryMap::new(),
        };
        // Begin by assuming the root layer will be composited so that there
        // is always a context below the top for add() to write into.
        map.begin_context();
        map
    }

    /// Records `bounds` for the layer at slot `idx`.
    ///
    /// The rect lands in the context *below* the current top: the current
    /// top belongs to the layer's own descendants.
    ///
    /// Degenerate rects are widened to 1×1 so that zero-area layers still
    /// occlude the point they occupy.
    ///
    /// # Panics
    ///
    /// Panics unless at least one context has been opened on top of the
    /// root context.
    pub fn add(&mut self, idx: u32, bounds: Rect) {
        assert!(
            self.stack.len() >= 2,
            "overlap add before any container context"
        );
        let depth = self.stack.len();
        self.stack[depth - 2].push(normalize(bounds));
        self.members.insert(idx);
    }

    /// Whether the layer at slot `idx` has been added.
    #[must_use]
    pub fn contains(&self, idx: u32) -> bool {
        self.members.contains(&idx)
    }

    /// Whether `bounds` intersects any rect in the current testing context.
    #[must_use]
    pub fn overlaps(&self, bounds: Rect) -> bool {
        let bounds = normalize(bounds);
        self.stack
            .last()
            .is_some_and(|rects| rects.iter().any(|r| intersects(*r, bounds)))
    }

    /// Whether no layer has been added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Opens a fresh testing context for a composited container's
    /// descendants.
    pub fn begin_context(&mut self) {
        self.stack.push(Vec::new());
    }

    /// Closes the current testing context, merging its rects into the new
    /// top so that later siblings of the container still test against them.
    ///
    /// # Panics
    ///
    /// Panics if this would close the root context.
    pub fn finish_context(&mut self) {
        assert!(self.stack.len() >= 2, "cannot finish the root context");
        let finished = self.stack.pop().unwrap_or_default();
        if let Some(top) = self.stack.last_mut() {
            top.extend(finished);
        }
    }

    /// The geometry map used to produce absolute bounds during the walk.
    pub fn geometry_mut(&mut self) -> &mut GeometryMap {
        &mut self.geometry
    }

    /// Read-only access to the geometry map.
    #[must_use]
    pub fn geometry(&self) -> &GeometryMap {
        &self.geometry
    }
}

/// Widens degenerate rects to at least 1×1.
fn normalize(r: Rect) -> Rect {
    Rect::new(
        r.x0,
        r.y0,
        if r.x1 > r.x0 { r.x1 } else { r.x0 + 1.0 },
        if r.y1 > r.y0 { r.y1 } else { r.y0 + 1.0 },
    )
}

fn intersects(a: Rect, b: Rect) -> bool {
    let i = a.intersect(b);
    i.width() > 0.0 && i.height() > 0.0
}
