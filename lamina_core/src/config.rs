// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Update configuration and per-frame viewport state.
//!
//! Every compositing update receives an explicit [`CompositingConfig`] and
//! [`Viewport`] instead of reading ambient settings, so two updates with the
//! same tree and the same inputs make the same decisions.

use kurbo::{Point, Rect, Size};

/// Which content categories are allowed to trigger compositing.
///
/// A disabled trigger turns its direct-reason check into a constant `false`;
/// indirect reasons (overlap, clipping, grouping) are never gated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CompositingTriggers {
    /// 3D transforms.
    pub transform: bool,
    /// Accelerated video.
    pub video: bool,
    /// Accelerated canvases.
    pub canvas: bool,
    /// Accelerated plugins.
    pub plugin: bool,
    /// Frames whose embedded document composites.
    pub frame: bool,
    /// Accelerated animations.
    pub animation: bool,
    /// Filters.
    pub filter: bool,
    /// Blend modes.
    pub blending: bool,
    /// Viewport-constrained (fixed/sticky) positioning.
    pub fixed_position: bool,
    /// Compositor-driven overflow scrolling.
    pub overflow_scrolling: bool,
    /// Treat a scrollable inner frame as requiring compositing.
    pub scrollable_inner_frames: bool,
}

impl CompositingTriggers {
    /// Every trigger enabled.
    pub const ALL: Self = Self {
        transform: true,
        video: true,
        canvas: true,
        plugin: true,
        frame: true,
        animation: true,
        filter: true,
        blending: true,
        fixed_position: true,
        overflow_scrolling: true,
        scrollable_inner_frames: false,
    };

    /// Every trigger disabled.
    pub const NONE: Self = Self {
        transform: false,
        video: false,
        canvas: false,
        plugin: false,
        frame: false,
        animation: false,
        filter: false,
        blending: false,
        fixed_position: false,
        overflow_scrolling: false,
        scrollable_inner_frames: false,
    };
}

impl Default for CompositingTriggers {
    fn default() -> Self {
        Self::ALL
    }
}

/// Settings for a compositing update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositingConfig {
    /// Whether hardware acceleration is available at all. When `false` the
    /// update demotes everything and exits compositing mode.
    pub acceleration_available: bool,
    /// Keep the frame in compositing mode even when no layer needs it
    /// (so the root surface always exists).
    pub force_compositing_mode: bool,
    /// Enabled compositing triggers.
    pub triggers: CompositingTriggers,
    /// Draw diagnostic borders on composited surfaces.
    pub show_debug_borders: bool,
    /// Draw repaint counters on composited surfaces.
    pub show_repaint_counter: bool,
    /// Minimum area, in square units, for an accelerated 2D canvas to
    /// composite. Small canvases repaint cheaply in software and are not
    /// worth a surface.
    pub canvas_area_threshold: f64,
    /// Composite accelerated 2D canvases below the area threshold anyway.
    pub composite_small_canvases: bool,
}

impl Default for CompositingConfig {
    fn default() -> Self {
        Self {
            acceleration_available: true,
            force_compositing_mode: false,
            triggers: CompositingTriggers::default(),
            show_debug_borders: false,
            show_repaint_counter: false,
            canvas_area_threshold: 50.0 * 100.0,
            composite_small_canvases: false,
        }
    }
}

/// Per-frame viewport facts supplied by the embedder.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Size of the frame's viewport.
    pub size: Size,
    /// Size of the frame's whole document contents.
    pub contents_size: Size,
    /// Current scroll position.
    pub scroll_position: Point,
    /// The rect, in absolute document coordinates, inside which a
    /// viewport-constrained layer counts as visible. Fixed layers entirely
    /// outside it are not composited. Embedders inflate it to taste.
    pub visible_rect: Rect,
    /// Frame of the horizontal scrollbar, if the frame shows one.
    pub horizontal_scrollbar: Option<Rect>,
    /// Frame of the vertical scrollbar, if the frame shows one.
    pub vertical_scrollbar: Option<Rect>,
    /// Frame of the scroll corner, if the frame shows one.
    pub scroll_corner: Option<Rect>,
    /// Layout is pending; compositing updates bail out until it runs.
    pub layout_pending: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_enables_acceleration() {
        let config = CompositingConfig::default();
        assert!(config.acceleration_available);
        assert!(!config.force_compositing_mode);
        assert!(config.triggers.transform);
        assert!(!config.triggers.scrollable_inner_frames);
    }

    #[test]
    fn canvas_threshold_default_matches_50_by_100() {
        let config = CompositingConfig::default();
        assert_eq!(config.canvas_area_threshold, 5000.0);
    }
}
