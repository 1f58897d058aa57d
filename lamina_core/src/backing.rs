// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-layer surface bundles for composited layers.
//!
//! A composited layer owns a [`Backing`]: its primary surface plus the
//! optional sub-surfaces some configurations need. The bundle nests as
//!
//! ```text
//! primary ── clipping? ── scrolling? ── (descendant surfaces, foreground?)
//! ```
//!
//! where `clipping` exists when the layer clips composited descendants and
//! `scrolling` when the layer scrolls its overflow on the compositor. The
//! foreground surface, when present, is *not* wired here: the rebuild pass
//! splices it into the sublayer list after the negative z-order children so
//! the layer's own foreground paints above them.

use kurbo::{Point, Rect, Size};

use crate::host::SurfaceHost;
use crate::layer::SurfaceId;

/// The surfaces backing one composited layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Backing {
    primary: SurfaceId,
    foreground: Option<SurfaceId>,
    clipping: Option<SurfaceId>,
    scrolling: Option<SurfaceId>,
    /// The reflection layer's primary surface, mirrored by the host.
    replica: Option<SurfaceId>,
    /// Bounds of everything this surface paints, in the layer's own
    /// coordinate space.
    composited_bounds: Rect,
}

impl Backing {
    /// Creates backing with just a primary surface.
    pub(crate) fn new(host: &mut dyn SurfaceHost) -> Self {
        Self {
            primary: host.create_surface(),
            foreground: None,
            clipping: None,
            scrolling: None,
            replica: None,
            composited_bounds: Rect::ZERO,
        }
    }

    /// Destroys every surface in the bundle.
    pub(crate) fn destroy(self, host: &mut dyn SurfaceHost) {
        if let Some(fg) = self.foreground {
            host.destroy_surface(fg);
        }
        if let Some(sc) = self.scrolling {
            host.destroy_surface(sc);
        }
        if let Some(cl) = self.clipping {
            host.destroy_surface(cl);
        }
        host.remove_from_parent(self.primary);
        host.destroy_surface(self.primary);
    }

    /// The primary surface; paints the layer's background and borders.
    #[must_use]
    pub fn primary(&self) -> SurfaceId {
        self.primary
    }

    /// The foreground surface, if the layer's own content must paint above
    /// composited negative z-order children.
    #[must_use]
    pub fn foreground(&self) -> Option<SurfaceId> {
        self.foreground
    }

    /// The clipping surface, if the layer clips composited descendants.
    #[must_use]
    pub fn clipping(&self) -> Option<SurfaceId> {
        self.clipping
    }

    /// The scrolling surface, if the layer scrolls on the compositor.
    #[must_use]
    pub fn scrolling(&self) -> Option<SurfaceId> {
        self.scrolling
    }

    /// The replica surface currently mirroring this backing, if any.
    #[must_use]
    pub fn replica(&self) -> Option<SurfaceId> {
        self.replica
    }

    /// Bounds of everything this backing paints, in layer coordinates.
    #[must_use]
    pub fn composited_bounds(&self) -> Rect {
        self.composited_bounds
    }

    pub(crate) fn set_composited_bounds(&mut self, bounds: Rect) {
        self.composited_bounds = bounds;
    }

    /// The surface that descendant layers' surfaces attach under.
    #[must_use]
    pub fn parent_for_sublayers(&self) -> SurfaceId {
        self.scrolling.or(self.clipping).unwrap_or(self.primary)
    }

    /// The surface that attaches into the ancestor's sublayer list.
    #[must_use]
    pub fn child_for_superlayers(&self) -> SurfaceId {
        self.primary
    }

    /// Creates or destroys the foreground surface. Returns whether the
    /// configuration changed.
    pub(crate) fn ensure_foreground(&mut self, host: &mut dyn SurfaceHost, needed: bool) -> bool {
        match (self.foreground, needed) {
            (None, true) => {
                self.foreground = Some(host.create_surface());
                true
            }
            (Some(fg), false) => {
                host.destroy_surface(fg);
                self.foreground = None;
                true
            }
            _ => false,
        }
    }

    /// Creates or destroys the clipping surface. Returns whether the
    /// configuration changed.
    pub(crate) fn ensure_clipping(&mut self, host: &mut dyn SurfaceHost, needed: bool) -> bool {
        match (self.clipping, needed) {
            (None, true) => {
                let cl = host.create_surface();
                host.set_masks_to_bounds(cl, true);
                self.clipping = Some(cl);
                true
            }
            (Some(cl), false) => {
                host.destroy_surface(cl);
                self.clipping = None;
                true
            }
            _ => false,
        }
    }

    /// Creates or destroys the scrolling surface. Returns whether the
    /// configuration changed.
    pub(crate) fn ensure_scrolling(&mut self, host: &mut dyn SurfaceHost, needed: bool) -> bool {
        match (self.scrolling, needed) {
            (None, true) => {
                self.scrolling = Some(host.create_surface());
                true
            }
            (Some(sc), false) => {
                host.destroy_surface(sc);
                self.scrolling = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_replica(&mut self, replica: Option<SurfaceId>) {
        self.replica = replica;
    }

    /// Re-wires the internal surface nesting after a configuration change.
    ///
    /// Descendant surfaces are attached separately by the rebuild pass under
    /// [`parent_for_sublayers`](Self::parent_for_sublayers).
    pub(crate) fn wire_internal(&self, host: &mut dyn SurfaceHost) {
        if let Some(cl) = self.clipping {
            host.add_child(self.primary, cl);
            if let Some(sc) = self.scrolling {
                host.add_child(cl, sc);
            }
        } else if let Some(sc) = self.scrolling {
            host.add_child(self.primary, sc);
        }
    }

    /// Pushes position and size to the host for the whole bundle.
    ///
    /// `position` is the primary surface's position within its parent
    /// surface; sub-surfaces fill the primary.
    pub(crate) fn apply_geometry(
        &self,
        host: &mut dyn SurfaceHost,
        position: Point,
        size: Size,
    ) {
        host.set_position(self.primary, position);
        host.set_size(self.primary, size);
        for inner in [self.clipping, self.scrolling, self.foreground]
            .into_iter()
            .flatten()
        {
            host.set_position(inner, Point::ZERO);
            host.set_size(inner, size);
        }
    }

    /// Applies diagnostic overlays per configuration.
    pub(crate) fn apply_debug_indicators(
        &self,
        host: &mut dyn SurfaceHost,
        borders: bool,
        repaint_counter: bool,
    ) {
        for surface in [
            Some(self.primary),
            self.foreground,
            self.clipping,
            self.scrolling,
        ]
        .into_iter()
        .flatten()
        {
            host.set_debug_indicators(surface, borders, repaint_counter);
        }
    }
}
