// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame's root surface scaffold and its platform attachment.
//!
//! When a frame enters compositing mode it gets a small fixed surface
//! structure above the layer tree's own surfaces. A main frame scrolls on
//! the compositor, so it carries the full arrangement
//!
//! ```text
//! controls host ── clip (masks) ── scroll ── content ── (layer surfaces)
//!      └─ scrollbars, scroll corner
//! ```
//!
//! while a nested frame is spliced into its parent document's tree and only
//! needs the content surface. The scaffold is built the first time the frame
//! enters compositing mode and torn down when it leaves.

use kurbo::{Point, Rect};

use crate::config::Viewport;
use crate::host::OverflowControlPainter;
use crate::layer::SurfaceId;

use super::{Compositor, UpdateEnv};

/// Where a frame's compositor sits in the frame tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameRole {
    /// The top-level frame. Attaches its root surface directly to the
    /// platform and owns frame scrolling and overflow controls.
    Main,
    /// An embedded frame. Its root surface is spliced into the enclosing
    /// document's surface tree by the outer compositor.
    Nested,
}

/// How (whether) the root surface is currently attached for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RootAttachment {
    /// No root surface, or not currently attached.
    Unattached,
    /// Attached by handing the root surface to the platform host.
    ViaPlatformHost,
    /// Attached by the enclosing frame splicing the root surface into its
    /// own tree.
    ViaEnclosingFrame,
}

/// The fixed surfaces above the layer tree.
#[derive(Clone, Debug)]
pub(crate) struct Scaffold {
    /// Hosts the layer tree's surfaces; sized to the document contents.
    pub(crate) content: SurfaceId,
    /// Clips the scrolled contents to the viewport. `None` for nested
    /// frames.
    pub(crate) clip: Option<SurfaceId>,
    /// Moves opposite the scroll position. `None` for nested frames.
    pub(crate) scroll: Option<SurfaceId>,
    /// Topmost surface of a main frame, holding the clip stack and the
    /// overflow controls so scrollbars never scroll away.
    pub(crate) controls_host: Option<SurfaceId>,
    pub(crate) horizontal_scrollbar: Option<SurfaceId>,
    pub(crate) vertical_scrollbar: Option<SurfaceId>,
    pub(crate) scroll_corner: Option<SurfaceId>,
}

impl Scaffold {
    /// The surface that attaches to the platform or the enclosing frame.
    pub(crate) fn root_surface(&self) -> SurfaceId {
        self.controls_host.unwrap_or(self.content)
    }
}

impl Compositor {
    /// The frame's current root surface, if a scaffold exists.
    #[must_use]
    pub fn root_surface(&self) -> Option<SurfaceId> {
        self.scaffold.as_ref().map(Scaffold::root_surface)
    }

    /// Builds the scaffold if the frame doesn't have one yet, wires the
    /// scroll coordinator, and attaches the root when the frame is visible.
    pub(crate) fn ensure_scaffold(&mut self, env: &mut UpdateEnv<'_>) {
        if self.scaffold.is_some() {
            return;
        }
        let content = env.host.create_surface();
        let mut scaffold = Scaffold {
            content,
            clip: None,
            scroll: None,
            controls_host: None,
            horizontal_scrollbar: None,
            vertical_scrollbar: None,
            scroll_corner: None,
        };
        match self.role {
            FrameRole::Main => {
                let controls_host = env.host.create_surface();
                let clip = env.host.create_surface();
                env.host.set_masks_to_bounds(clip, true);
                let scroll = env.host.create_surface();
                env.host.add_child(controls_host, clip);
                env.host.add_child(clip, scroll);
                env.host.add_child(scroll, content);
                scaffold.controls_host = Some(controls_host);
                scaffold.clip = Some(clip);
                scaffold.scroll = Some(scroll);
                env.scroll.scroll_surface_changed(Some(scroll));
                env.scroll.fixed_container_changed(Some(clip));
            }
            FrameRole::Nested => {
                // The enclosing frame clips nothing for us.
                env.host.set_masks_to_bounds(content, true);
            }
        }
        self.scaffold = Some(scaffold);
        self.update_root_position(env);
        self.update_overflow_controls(env);
        self.did_scroll(env);
        env.scroll.frame_root_changed(self.root_surface());
        if self.is_in_window {
            self.attach_root(env);
        }
    }

    /// Tears down the scaffold and tells the scroll coordinator every
    /// structural surface is gone.
    pub(crate) fn destroy_scaffold(&mut self, env: &mut UpdateEnv<'_>) {
        if self.scaffold.is_none() {
            return;
        }
        self.detach_root(env);
        let Some(s) = self.scaffold.take() else {
            return;
        };
        if let Some(sf) = s.horizontal_scrollbar {
            env.host.destroy_surface(sf);
            env.scroll.scrollbar_surface_changed(None);
        }
        if let Some(sf) = s.vertical_scrollbar {
            env.host.destroy_surface(sf);
            env.scroll.scrollbar_surface_changed(None);
        }
        if let Some(sf) = s.scroll_corner {
            env.host.destroy_surface(sf);
        }
        if let Some(sf) = s.scroll {
            env.host.destroy_surface(sf);
        }
        if let Some(sf) = s.clip {
            env.host.destroy_surface(sf);
        }
        env.host.destroy_surface(s.content);
        if let Some(sf) = s.controls_host {
            env.host.destroy_surface(sf);
        }
        if s.scroll.is_some() {
            env.scroll.scroll_surface_changed(None);
        }
        if s.clip.is_some() {
            env.scroll.fixed_container_changed(None);
        }
        env.scroll.frame_root_changed(None);
    }

    /// Attaches the root surface for display, by whichever path the frame's
    /// role uses. No-op when already attached or there is nothing to attach.
    pub(crate) fn attach_root(&mut self, env: &mut UpdateEnv<'_>) {
        if self.attachment != RootAttachment::Unattached {
            return;
        }
        let Some(root) = self.root_surface() else {
            return;
        };
        match self.role {
            FrameRole::Main => {
                env.host.attach_root(Some(root));
                self.attachment = RootAttachment::ViaPlatformHost;
            }
            FrameRole::Nested => {
                // The outer document re-runs its splice on its next update.
                env.host.schedule_owner_update();
                self.attachment = RootAttachment::ViaEnclosingFrame;
            }
        }
    }

    /// Detaches the root surface from wherever it is displayed.
    pub(crate) fn detach_root(&mut self, env: &mut UpdateEnv<'_>) {
        match self.attachment {
            RootAttachment::Unattached => return,
            RootAttachment::ViaPlatformHost => env.host.attach_root(None),
            RootAttachment::ViaEnclosingFrame => {
                if let Some(root) = self.root_surface() {
                    env.host.remove_from_parent(root);
                }
                env.host.schedule_owner_update();
            }
        }
        self.attachment = RootAttachment::Unattached;
    }

    /// Resizes the scaffold surfaces to the current viewport and contents.
    pub(crate) fn update_root_position(&mut self, env: &mut UpdateEnv<'_>) {
        let Some(s) = &self.scaffold else {
            return;
        };
        env.host.set_position(s.content, Point::ZERO);
        env.host.set_size(s.content, env.viewport.contents_size);
        if let Some(sf) = s.controls_host {
            env.host.set_position(sf, Point::ZERO);
            env.host.set_size(sf, env.viewport.size);
        }
        if let Some(sf) = s.clip {
            env.host.set_position(sf, Point::ZERO);
            env.host.set_size(sf, env.viewport.size);
        }
        if let Some(sf) = s.scroll {
            env.host.set_size(sf, env.viewport.contents_size);
        }
    }

    /// Creates, repositions, or destroys the frame's scrollbar and corner
    /// surfaces to match the viewport's current controls.
    pub(crate) fn update_overflow_controls(&mut self, env: &mut UpdateEnv<'_>) {
        let Some(s) = self.scaffold.as_mut() else {
            return;
        };
        let Some(controls_host) = s.controls_host else {
            return;
        };
        let rect = env.viewport.horizontal_scrollbar;
        if sync_control_surface(env, controls_host, rect, &mut s.horizontal_scrollbar) {
            env.scroll.scrollbar_surface_changed(s.horizontal_scrollbar);
        }
        let rect = env.viewport.vertical_scrollbar;
        if sync_control_surface(env, controls_host, rect, &mut s.vertical_scrollbar) {
            env.scroll.scrollbar_surface_changed(s.vertical_scrollbar);
        }
        let rect = env.viewport.scroll_corner;
        sync_control_surface(env, controls_host, rect, &mut s.scroll_corner);
    }

    /// Repositions the scroll surface after a frame scroll.
    ///
    /// When a scroll coordinator owns scrolling the surface already moved
    /// off the main thread and this does nothing.
    pub fn did_scroll(&mut self, env: &mut UpdateEnv<'_>) {
        let Some(s) = &self.scaffold else {
            return;
        };
        let Some(scroll) = s.scroll else {
            return;
        };
        if env.scroll.coordinates_scrolling() {
            return;
        }
        let p = env.viewport.scroll_position;
        env.host.set_position(scroll, Point::new(-p.x, -p.y));
    }

    /// Resizes the scaffold after a viewport or contents size change.
    pub fn frame_size_changed(&mut self, env: &mut UpdateEnv<'_>) {
        self.update_root_position(env);
        self.update_overflow_controls(env);
    }

    /// Tracks whether the frame is in a visible window. Leaving the window
    /// detaches a platform-attached root; an enclosing-frame attachment
    /// stays, since the outer document decides its visibility.
    pub fn set_is_in_window(&mut self, in_window: bool, env: &mut UpdateEnv<'_>) {
        if self.is_in_window == in_window {
            return;
        }
        self.is_in_window = in_window;
        if in_window {
            if self.scaffold.is_some() && self.attachment == RootAttachment::Unattached {
                self.attach_root(env);
            }
        } else if self.attachment == RootAttachment::ViaPlatformHost {
            self.detach_root(env);
        }
    }

    /// Paints the frame's overflow controls through the embedder's painter.
    /// Clip rects are surface-local.
    pub fn paint_overflow_controls(
        &self,
        viewport: &Viewport,
        painter: &mut dyn OverflowControlPainter,
    ) {
        let Some(s) = &self.scaffold else {
            return;
        };
        if let (Some(sf), Some(r)) = (s.horizontal_scrollbar, viewport.horizontal_scrollbar) {
            painter.paint_horizontal_scrollbar(sf, Rect::from_origin_size(Point::ZERO, r.size()));
        }
        if let (Some(sf), Some(r)) = (s.vertical_scrollbar, viewport.vertical_scrollbar) {
            painter.paint_vertical_scrollbar(sf, Rect::from_origin_size(Point::ZERO, r.size()));
        }
        if let (Some(sf), Some(r)) = (s.scroll_corner, viewport.scroll_corner) {
            painter.paint_scroll_corner(sf, Rect::from_origin_size(Point::ZERO, r.size()));
        }
    }
}

/// Keeps one overflow-control surface in sync with its viewport rect.
/// Returns whether the surface was created or destroyed.
fn sync_control_surface(
    env: &mut UpdateEnv<'_>,
    controls_host: SurfaceId,
    rect: Option<Rect>,
    slot: &mut Option<SurfaceId>,
) -> bool {
    match (rect, *slot) {
        (Some(r), existing) => {
            let surface = existing.unwrap_or_else(|| {
                let sf = env.host.create_surface();
                env.host.add_child(controls_host, sf);
                *slot = Some(sf);
                sf
            });
            env.host.set_position(surface, r.origin());
            env.host.set_size(surface, r.size());
            env.host.set_needs_display(surface);
            existing.is_none()
        }
        (None, Some(sf)) => {
            env.host.destroy_surface(sf);
            *slot = None;
            true
        }
        (None, None) => false,
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::*;
    use crate::config::CompositingConfig;
    use crate::host::SurfaceHost;
    use crate::testing::{MockHost, RecordingControls, RecordingScroll};
    use crate::trace::Tracer;

    fn viewport() -> Viewport {
        Viewport {
            size: Size::new(800.0, 600.0),
            contents_size: Size::new(800.0, 2000.0),
            visible_rect: Rect::new(0.0, 0.0, 800.0, 600.0),
            ..Viewport::default()
        }
    }

    #[test]
    fn main_frame_scaffold_nests_controls_clip_scroll_content() {
        let config = CompositingConfig::default();
        let viewport = viewport();
        let mut host = MockHost::new();
        let mut scroll = RecordingScroll::default();
        let mut compositor = Compositor::new(FrameRole::Main);
        let mut env = UpdateEnv {
            config: &config,
            viewport: &viewport,
            host: &mut host,
            scroll: &mut scroll,
            tracer: Tracer::none(),
        };

        compositor.ensure_scaffold(&mut env);

        let s = compositor.scaffold.as_ref().unwrap();
        let (ch, clip, sc) = (
            s.controls_host.unwrap(),
            s.clip.unwrap(),
            s.scroll.unwrap(),
        );
        assert_eq!(host.children(ch), [clip], "clip nests under controls host");
        assert_eq!(host.children(clip), [sc], "scroll nests under clip");
        assert_eq!(host.children(sc), [s.content], "content nests under scroll");
        assert!(host.masks_to_bounds(clip), "clip surface masks");
        assert_eq!(host.size(s.content), viewport.contents_size);
        assert_eq!(host.size(clip), viewport.size);
        assert_eq!(
            host.attached_root,
            Some(Some(ch)),
            "main frame attaches via the platform host"
        );
        assert_eq!(scroll.scroll_surface_changes, [Some(sc)]);
        assert_eq!(scroll.fixed_container_changes, [Some(clip)]);
        assert_eq!(scroll.root_changes, [Some(ch)]);
    }

    #[test]
    fn nested_frame_scaffold_is_one_clipping_surface() {
        let config = CompositingConfig::default();
        let viewport = viewport();
        let mut host = MockHost::new();
        let mut scroll = RecordingScroll::default();
        let mut compositor = Compositor::new(FrameRole::Nested);
        let mut env = UpdateEnv {
            config: &config,
            viewport: &viewport,
            host: &mut host,
            scroll: &mut scroll,
            tracer: Tracer::none(),
        };

        compositor.ensure_scaffold(&mut env);

        let s = compositor.scaffold.as_ref().unwrap();
        assert!(s.controls_host.is_none() && s.clip.is_none() && s.scroll.is_none());
        assert!(host.masks_to_bounds(s.content));
        assert_eq!(host.live_surfaces(), 1);
        assert_eq!(
            host.attached_root, None,
            "nested frames never attach through the platform"
        );
        assert_eq!(host.owner_updates, 1, "the outer document is asked to splice");
        assert_eq!(compositor.attachment, RootAttachment::ViaEnclosingFrame);
    }

    #[test]
    fn overflow_controls_track_the_viewport() {
        let config = CompositingConfig::default();
        let mut viewport = viewport();
        viewport.vertical_scrollbar = Some(Rect::new(785.0, 0.0, 800.0, 585.0));
        let mut host = MockHost::new();
        let mut scroll = RecordingScroll::default();
        let mut compositor = Compositor::new(FrameRole::Main);
        let mut env = UpdateEnv {
            config: &config,
            viewport: &viewport,
            host: &mut host,
            scroll: &mut scroll,
            tracer: Tracer::none(),
        };
        compositor.ensure_scaffold(&mut env);

        let s = compositor.scaffold.as_ref().unwrap();
        let bar = s.vertical_scrollbar.expect("scrollbar surface created");
        assert_eq!(host.position(bar), Point::new(785.0, 0.0));
        assert_eq!(host.size(bar), Size::new(15.0, 585.0));
        assert_eq!(host.parent(bar), Some(s.controls_host.unwrap()));
        assert_eq!(scroll.scrollbar_surface_changes, [Some(bar)]);

        let mut controls = RecordingControls::default();
        compositor.paint_overflow_controls(&viewport, &mut controls);
        assert_eq!(controls.vertical, 1);
        assert_eq!(controls.horizontal, 0);

        // Scrollbar disappears: surface destroyed, coordinator told.
        let viewport2 = Viewport {
            vertical_scrollbar: None,
            ..viewport
        };
        let mut env = UpdateEnv {
            config: &config,
            viewport: &viewport2,
            host: &mut host,
            scroll: &mut scroll,
            tracer: Tracer::none(),
        };
        compositor.update_overflow_controls(&mut env);
        assert!(!host.is_alive(bar));
        assert_eq!(scroll.scrollbar_surface_changes, [Some(bar), None]);
    }

    #[test]
    fn did_scroll_moves_the_scroll_surface_unless_coordinated() {
        let config = CompositingConfig::default();
        let mut viewport = viewport();
        viewport.scroll_position = Point::new(0.0, 250.0);
        let mut host = MockHost::new();
        let mut scroll = RecordingScroll::default();
        let mut compositor = Compositor::new(FrameRole::Main);
        let mut env = UpdateEnv {
            config: &config,
            viewport: &viewport,
            host: &mut host,
            scroll: &mut scroll,
            tracer: Tracer::none(),
        };
        compositor.ensure_scaffold(&mut env);
        let sc = compositor.scaffold.as_ref().unwrap().scroll.unwrap();
        assert_eq!(host.position(sc), Point::new(0.0, -250.0));

        scroll.coordinates = true;
        let viewport2 = Viewport {
            scroll_position: Point::new(0.0, 400.0),
            ..viewport
        };
        let mut env = UpdateEnv {
            config: &config,
            viewport: &viewport2,
            host: &mut host,
            scroll: &mut scroll,
            tracer: Tracer::none(),
        };
        compositor.did_scroll(&mut env);
        assert_eq!(
            host.position(sc),
            Point::new(0.0, -250.0),
            "coordinator-owned scrolling leaves the surface alone"
        );
    }

    #[test]
    fn destroy_scaffold_detaches_and_releases_everything() {
        let config = CompositingConfig::default();
        let viewport = viewport();
        let mut host = MockHost::new();
        let mut scroll = RecordingScroll::default();
        let mut compositor = Compositor::new(FrameRole::Main);
        let mut env = UpdateEnv {
            config: &config,
            viewport: &viewport,
            host: &mut host,
            scroll: &mut scroll,
            tracer: Tracer::none(),
        };
        compositor.ensure_scaffold(&mut env);
        compositor.destroy_scaffold(&mut env);

        assert_eq!(host.live_surfaces(), 0);
        assert_eq!(host.attached_root, Some(None), "root detached last");
        assert_eq!(compositor.attachment, RootAttachment::Unattached);
        assert!(compositor.root_surface().is_none());
        assert_eq!(scroll.root_changes.last(), Some(&None));
        assert_eq!(scroll.scroll_surface_changes.last(), Some(&None));
        assert_eq!(scroll.fixed_container_changes.last(), Some(&None));
    }
}
