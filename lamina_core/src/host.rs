// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator contracts for platform integrations.
//!
//! Lamina decides *which* layers get their own surfaces and *how* those
//! surfaces nest; it never allocates or presents surfaces itself. Platform
//! crates provide that by implementing the traits in this module:
//!
//! - **[`SurfaceHost`]** — owns the real surface objects (e.g. `CALayer`,
//!   a GPU layer tree). The compositor drives it with create/destroy,
//!   property, child-list, and invalidation calls, and hands it the root
//!   surface to install when root attachment goes through the platform.
//!
//! - **[`ScrollCoordinator`]** — an optional off-main-thread scrolling
//!   component. The compositor keeps it informed of the structural facts it
//!   needs (root surface, scroll surface, the set of viewport-constrained
//!   layers). All methods default to no-ops so embedders without one pass a
//!   unit-like struct.
//!
//! - **[`OverflowControlPainter`]** — paints native scrollbars and the
//!   scroll corner when the host asks a frame-level overflow-control surface
//!   to display.
//!
//! # Crate boundaries
//!
//! `lamina_core` owns the layer model and the compositing policy. Platform
//! crates depend on `lamina_core` and provide the host implementation.
//! Application code wires the two together and calls
//! [`Compositor::update`](crate::compositor::Compositor::update) once per
//! frame at most.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use crate::layer::SurfaceId;

/// The platform's surface tree, driven by the compositor.
///
/// Handles minted by [`create_surface`](Self::create_surface) stay valid
/// until the matching [`destroy_surface`](Self::destroy_surface). The
/// compositor never retains a handle past the destroy call.
///
/// Child lists are ordered; order is paint order, back to front.
pub trait SurfaceHost {
    /// Allocates a new empty surface.
    fn create_surface(&mut self) -> SurfaceId;

    /// Destroys a surface. The host detaches it from any parent first.
    fn destroy_surface(&mut self, surface: SurfaceId);

    /// Sets the surface's position within its parent.
    fn set_position(&mut self, surface: SurfaceId, position: Point);

    /// Sets the surface's size.
    fn set_size(&mut self, surface: SurfaceId, size: Size);

    /// Sets whether the surface clips its children to its bounds.
    fn set_masks_to_bounds(&mut self, surface: SurfaceId, masks: bool);

    /// Toggles the diagnostic border and repaint counter overlay.
    fn set_debug_indicators(&mut self, surface: SurfaceId, borders: bool, repaint_counter: bool);

    /// Replaces the surface's ordered child list.
    fn set_children(&mut self, surface: SurfaceId, children: &[SurfaceId]);

    /// Appends `child` to `parent`'s child list, detaching it from any
    /// previous parent.
    fn add_child(&mut self, parent: SurfaceId, child: SurfaceId);

    /// Detaches a surface from its parent, if any.
    fn remove_from_parent(&mut self, surface: SurfaceId);

    /// The surface's current ordered child list.
    fn children(&self, surface: SurfaceId) -> Vec<SurfaceId>;

    /// Marks the whole surface as needing repaint.
    fn set_needs_display(&mut self, surface: SurfaceId);

    /// Marks a rect of the surface, in surface-local coordinates, as needing
    /// repaint.
    fn set_needs_display_in_rect(&mut self, surface: SurfaceId, rect: Rect);

    /// Installs (or, with `None`, removes) the compositor's root surface as
    /// the platform's displayed tree.
    ///
    /// Only used when root attachment goes through the platform host; a
    /// compositor attached via an enclosing frame is spliced into the outer
    /// tree instead and never calls this.
    fn attach_root(&mut self, root: Option<SurfaceId>);

    /// Asks the embedder that owns this frame to re-examine the frame
    /// element's style.
    ///
    /// Called when a compositor attaching via its enclosing frame gains or
    /// loses a root surface, so the outer document re-runs the splice.
    fn schedule_owner_update(&mut self);
}

/// Off-main-thread scrolling component, kept informed of structure changes.
///
/// All methods are optional; the defaults do nothing and
/// [`coordinates_scrolling`](Self::coordinates_scrolling) reports `false`.
pub trait ScrollCoordinator {
    /// Whether the coordinator owns scroll-position updates for this frame.
    /// When it does, the compositor must not move the scroll surface itself
    /// on scroll notifications.
    fn coordinates_scrolling(&self) -> bool {
        false
    }

    /// The frame's root scaffold changed (built, torn down, or re-rooted).
    fn frame_root_changed(&mut self, _root: Option<SurfaceId>) {}

    /// The surface that moves on scroll changed.
    fn scroll_surface_changed(&mut self, _scroll: Option<SurfaceId>) {}

    /// A frame-level scrollbar or scroll-corner surface was created or
    /// destroyed.
    fn scrollbar_surface_changed(&mut self, _surface: Option<SurfaceId>) {}

    /// The surface that viewport-constrained layers position against changed
    /// (built or torn down with the root scaffold).
    fn fixed_container_changed(&mut self, _container: Option<SurfaceId>) {}

    /// The set of composited viewport-constrained (fixed or sticky) layers
    /// changed.
    fn viewport_constrained_set_changed(&mut self) {}
}

/// A [`ScrollCoordinator`] for embedders without one.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoScrollCoordinator;

impl ScrollCoordinator for NoScrollCoordinator {}

/// Paints native overflow controls into frame-level surfaces.
///
/// The embedder's paint callback for the scaffold's scrollbar and corner
/// surfaces delegates here.
pub trait OverflowControlPainter {
    /// Paints the horizontal scrollbar into its surface.
    fn paint_horizontal_scrollbar(&mut self, surface: SurfaceId, clip: Rect);

    /// Paints the vertical scrollbar into its surface.
    fn paint_vertical_scrollbar(&mut self, surface: SurfaceId, clip: Rect);

    /// Paints the scroll corner into its surface.
    fn paint_scroll_corner(&mut self, surface: SurfaceId, clip: Rect);
}
