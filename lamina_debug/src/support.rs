// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test-only helpers for driving real compositing updates.

use std::collections::HashMap;

use lamina_core::compositor::{Compositor, FrameRole, UpdateEnv, UpdateKind};
use lamina_core::config::{CompositingConfig, Viewport};
use lamina_core::host::{NoScrollCoordinator, SurfaceHost};
use lamina_core::layer::{LayerId, LayerStore, SurfaceId};
use lamina_core::trace::Tracer;

/// A minimal in-memory surface host, just enough for updates to run.
#[derive(Debug, Default)]
pub(crate) struct TestHost {
    next: u32,
    children: HashMap<SurfaceId, Vec<SurfaceId>>,
}

impl SurfaceHost for TestHost {
    fn create_surface(&mut self) -> SurfaceId {
        let id = SurfaceId(self.next);
        self.next += 1;
        id
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        self.children.remove(&surface);
    }

    fn set_position(&mut self, _surface: SurfaceId, _position: kurbo::Point) {}

    fn set_size(&mut self, _surface: SurfaceId, _size: kurbo::Size) {}

    fn set_masks_to_bounds(&mut self, _surface: SurfaceId, _masks: bool) {}

    fn set_debug_indicators(&mut self, _surface: SurfaceId, _borders: bool, _counter: bool) {}

    fn set_children(&mut self, surface: SurfaceId, children: &[SurfaceId]) {
        self.children.insert(surface, children.to_vec());
    }

    fn add_child(&mut self, parent: SurfaceId, child: SurfaceId) {
        self.children.entry(parent).or_default().push(child);
    }

    fn remove_from_parent(&mut self, _surface: SurfaceId) {}

    fn children(&self, surface: SurfaceId) -> Vec<SurfaceId> {
        self.children.get(&surface).cloned().unwrap_or_default()
    }

    fn set_needs_display(&mut self, _surface: SurfaceId) {}

    fn set_needs_display_in_rect(&mut self, _surface: SurfaceId, _rect: kurbo::Rect) {}

    fn attach_root(&mut self, _root: Option<SurfaceId>) {}

    fn schedule_owner_update(&mut self) {}
}

/// Runs one post-layout update over `store` so compositing decisions are
/// populated.
pub(crate) fn run_update(store: &mut LayerStore, root: LayerId) {
    let config = CompositingConfig::default();
    let viewport = Viewport {
        size: kurbo::Size::new(800.0, 600.0),
        contents_size: kurbo::Size::new(800.0, 600.0),
        visible_rect: kurbo::Rect::new(0.0, 0.0, 800.0, 600.0),
        ..Viewport::default()
    };
    let mut host = TestHost::default();
    let mut scroll = NoScrollCoordinator;
    let mut compositor = Compositor::new(FrameRole::Main);
    let mut env = UpdateEnv {
        config: &config,
        viewport: &viewport,
        host: &mut host,
        scroll: &mut scroll,
        tracer: Tracer::none(),
    };
    compositor.update(store, root, UpdateKind::AfterLayout, &mut env);
}
