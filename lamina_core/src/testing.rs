// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles for the collaborator traits.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use crate::host::{OverflowControlPainter, ScrollCoordinator, SurfaceHost};
use crate::layer::SurfaceId;

/// A record of one surface in the [`MockHost`] arena.
#[derive(Clone, Debug)]
struct MockSurface {
    alive: bool,
    parent: Option<u32>,
    children: Vec<u32>,
    position: Point,
    size: Size,
    masks_to_bounds: bool,
}

impl Default for MockSurface {
    fn default() -> Self {
        Self {
            alive: true,
            parent: None,
            children: Vec::new(),
            position: Point::ZERO,
            size: Size::ZERO,
            masks_to_bounds: false,
        }
    }
}

/// An in-memory [`SurfaceHost`] that records every structural fact, so tests
/// can assert on the surface tree the compositor built.
#[derive(Debug, Default)]
pub(crate) struct MockHost {
    surfaces: Vec<MockSurface>,
    /// Surfaces invalidated via `set_needs_display`, whole-surface first.
    pub invalidations: Vec<(SurfaceId, Option<Rect>)>,
    /// The most recent `attach_root` argument, if any call was made.
    pub attached_root: Option<Option<SurfaceId>>,
    /// Number of `schedule_owner_update` calls.
    pub owner_updates: usize,
}

impl MockHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn live_surfaces(&self) -> usize {
        self.surfaces.iter().filter(|s| s.alive).count()
    }

    pub(crate) fn is_alive(&self, surface: SurfaceId) -> bool {
        self.surfaces
            .get(surface.0 as usize)
            .is_some_and(|s| s.alive)
    }

    pub(crate) fn parent(&self, surface: SurfaceId) -> Option<SurfaceId> {
        self.surfaces[surface.0 as usize].parent.map(SurfaceId)
    }

    pub(crate) fn position(&self, surface: SurfaceId) -> Point {
        self.surfaces[surface.0 as usize].position
    }

    pub(crate) fn size(&self, surface: SurfaceId) -> Size {
        self.surfaces[surface.0 as usize].size
    }

    pub(crate) fn masks_to_bounds(&self, surface: SurfaceId) -> bool {
        self.surfaces[surface.0 as usize].masks_to_bounds
    }

    fn check(&self, surface: SurfaceId) {
        assert!(
            self.is_alive(surface),
            "mock host: dead surface {surface:?}"
        );
    }

    fn detach(&mut self, idx: u32) {
        if let Some(p) = self.surfaces[idx as usize].parent.take() {
            self.surfaces[p as usize].children.retain(|&c| c != idx);
        }
    }
}

impl SurfaceHost for MockHost {
    fn create_surface(&mut self) -> SurfaceId {
        let id = self.surfaces.len() as u32;
        self.surfaces.push(MockSurface::default());
        SurfaceId(id)
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        self.check(surface);
        self.detach(surface.0);
        // Orphan any children rather than cascading.
        let children = core::mem::take(&mut self.surfaces[surface.0 as usize].children);
        for c in children {
            self.surfaces[c as usize].parent = None;
        }
        self.surfaces[surface.0 as usize].alive = false;
    }

    fn set_position(&mut self, surface: SurfaceId, position: Point) {
        self.check(surface);
        self.surfaces[surface.0 as usize].position = position;
    }

    fn set_size(&mut self, surface: SurfaceId, size: Size) {
        self.check(surface);
        self.surfaces[surface.0 as usize].size = size;
    }

    fn set_masks_to_bounds(&mut self, surface: SurfaceId, masks: bool) {
        self.check(surface);
        self.surfaces[surface.0 as usize].masks_to_bounds = masks;
    }

    fn set_debug_indicators(&mut self, surface: SurfaceId, _borders: bool, _counter: bool) {
        self.check(surface);
    }

    fn set_children(&mut self, surface: SurfaceId, children: &[SurfaceId]) {
        self.check(surface);
        let old = core::mem::take(&mut self.surfaces[surface.0 as usize].children);
        for c in old {
            self.surfaces[c as usize].parent = None;
        }
        for &c in children {
            self.check(c);
            self.detach(c.0);
            self.surfaces[c.0 as usize].parent = Some(surface.0);
            self.surfaces[surface.0 as usize].children.push(c.0);
        }
    }

    fn add_child(&mut self, parent: SurfaceId, child: SurfaceId) {
        self.check(parent);
        self.check(child);
        self.detach(child.0);
        self.surfaces[child.0 as usize].parent = Some(parent.0);
        self.surfaces[parent.0 as usize].children.push(child.0);
    }

    fn remove_from_parent(&mut self, surface: SurfaceId) {
        self.check(surface);
        self.detach(surface.0);
    }

    fn children(&self, surface: SurfaceId) -> Vec<SurfaceId> {
        self.check(surface);
        self.surfaces[surface.0 as usize]
            .children
            .iter()
            .map(|&c| SurfaceId(c))
            .collect()
    }

    fn set_needs_display(&mut self, surface: SurfaceId) {
        self.check(surface);
        self.invalidations.push((surface, None));
    }

    fn set_needs_display_in_rect(&mut self, surface: SurfaceId, rect: Rect) {
        self.check(surface);
        self.invalidations.push((surface, Some(rect)));
    }

    fn attach_root(&mut self, root: Option<SurfaceId>) {
        self.attached_root = Some(root);
    }

    fn schedule_owner_update(&mut self) {
        self.owner_updates += 1;
    }
}

/// A [`ScrollCoordinator`] that records every notification.
#[derive(Debug, Default)]
pub(crate) struct RecordingScroll {
    pub coordinates: bool,
    pub root_changes: Vec<Option<SurfaceId>>,
    pub scroll_surface_changes: Vec<Option<SurfaceId>>,
    pub scrollbar_surface_changes: Vec<Option<SurfaceId>>,
    pub fixed_container_changes: Vec<Option<SurfaceId>>,
    pub constrained_set_changes: usize,
}

impl ScrollCoordinator for RecordingScroll {
    fn coordinates_scrolling(&self) -> bool {
        self.coordinates
    }

    fn frame_root_changed(&mut self, root: Option<SurfaceId>) {
        self.root_changes.push(root);
    }

    fn scroll_surface_changed(&mut self, scroll: Option<SurfaceId>) {
        self.scroll_surface_changes.push(scroll);
    }

    fn scrollbar_surface_changed(&mut self, surface: Option<SurfaceId>) {
        self.scrollbar_surface_changes.push(surface);
    }

    fn fixed_container_changed(&mut self, container: Option<SurfaceId>) {
        self.fixed_container_changes.push(container);
    }

    fn viewport_constrained_set_changed(&mut self) {
        self.constrained_set_changes += 1;
    }
}

/// An [`OverflowControlPainter`] that counts paint requests.
#[derive(Debug, Default)]
pub(crate) struct RecordingControls {
    pub horizontal: usize,
    pub vertical: usize,
    pub corner: usize,
}

impl OverflowControlPainter for RecordingControls {
    fn paint_horizontal_scrollbar(&mut self, _surface: SurfaceId, _clip: Rect) {
        self.horizontal += 1;
    }

    fn paint_vertical_scrollbar(&mut self, _surface: SurfaceId, _clip: Rect) {
        self.vertical += 1;
    }

    fn paint_scroll_corner(&mut self, _surface: SurfaceId, _clip: Rect) {
        self.corner += 1;
    }
}
