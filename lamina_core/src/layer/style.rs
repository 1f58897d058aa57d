// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-layer style inputs consumed by the compositing policy.
//!
//! These are plain-data snapshots of the style and content facts the layout
//! collaborator owns. The compositor never derives them; it only reads them
//! during a pass. Setting any of them through
//! [`LayerStore::set_style`](super::LayerStore::set_style) or
//! [`LayerStore::set_content`](super::LayerStore::set_content) marks the STYLE
//! dirty channel, which forces the next update to re-check the compositing
//! hierarchy.

use kurbo::{Rect, Size};

use super::id::SurfaceId;

/// CSS positioning scheme of a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Position {
    /// Normal flow.
    #[default]
    Static,
    /// Offset from normal flow position.
    Relative,
    /// Out of flow, positioned against a containing block.
    Absolute,
    /// Viewport-constrained: pinned to the viewport while scrolling.
    Fixed,
    /// Viewport-constrained: in flow until a scroll threshold, then pinned.
    Sticky,
}

impl Position {
    /// Whether this position scheme is pinned relative to the viewport.
    #[must_use]
    pub const fn is_viewport_constrained(self) -> bool {
        matches!(self, Self::Fixed | Self::Sticky)
    }
}

/// Whether a layer flattens its children into its own plane or preserves
/// their 3D positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransformStyle {
    /// Children are flattened into the layer's plane.
    #[default]
    Flat,
    /// Children keep their 3D positions; intersection must be computed in a
    /// shared coordinate space.
    Preserve3d,
}

/// Which accelerated animations are currently running on a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ActiveAnimations {
    /// A hardware-accelerated opacity animation is running.
    pub opacity: bool,
    /// A hardware-accelerated transform animation is running.
    pub transform: bool,
    /// A hardware-accelerated filter animation is running.
    pub filter: bool,
}

impl ActiveAnimations {
    /// Whether any accelerated animation is running.
    #[must_use]
    pub const fn any(self) -> bool {
        self.opacity || self.transform || self.filter
    }
}

/// Rendering context backing a canvas element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CanvasContext {
    /// Software-rendered canvas; never a compositing trigger.
    #[default]
    Software,
    /// GPU-accelerated 2D context.
    Accelerated2d,
    /// GPU-accelerated 3D (WebGL-style) context.
    Accelerated3d,
}

/// Special content hosted by a layer, with the facts the promotion rules need.
///
/// Content boxes are `None` while layout for the element is still pending; the
/// size gates in the direct-reason checks then preserve the layer's current
/// composited status and request a re-evaluation after layout instead of
/// guessing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ContentKind {
    /// Ordinary painted content.
    #[default]
    Painted,
    /// A video element.
    Video {
        /// The decoder can hand frames to the compositor directly.
        supports_accelerated_rendering: bool,
        /// The element is actually displaying video content.
        should_display: bool,
    },
    /// A canvas element.
    Canvas {
        /// Backing rendering context.
        context: CanvasContext,
        /// Canvas pixel size.
        size: Size,
    },
    /// An embedded plugin.
    Plugin {
        /// The plugin advertises accelerated-rendering support.
        allows_accelerated_compositing: bool,
        /// Content box, or `None` while layout is pending.
        content_box: Option<Rect>,
    },
    /// A nested frame (iframe) boundary.
    Frame {
        /// The embedded document itself requires accelerated compositing.
        requires_accelerated_compositing: bool,
        /// Content box, or `None` while layout is pending.
        content_box: Option<Rect>,
        /// Root surface of the embedded document's own compositor, once it is
        /// attached via this enclosing frame.
        inner_root_surface: Option<SurfaceId>,
    },
}

/// Paint-order class of a layer within its stacking context.
///
/// Sibling order within each class is insertion order and is significant; the
/// compositor never reorders it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PaintClass {
    /// Negative z-index child: paints behind the parent's own content.
    NegativeZ,
    /// Normal-flow content.
    #[default]
    NormalFlow,
    /// Positive z-index child: paints above normal-flow content.
    PositiveZ,
}

/// Style facts for one layer, as booleans and small enums.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerStyle {
    /// Positioning scheme.
    pub position: Position,
    /// The layer has any transform (2D or 3D).
    pub has_transform: bool,
    /// The transform contains a genuine 3D operation (not merely 2D
    /// operations expressed through a 3D-capable representation).
    pub has_3d_transform: bool,
    /// Flattening behavior for child layers.
    pub transform_style: TransformStyle,
    /// The layer establishes a perspective context for its children.
    pub has_perspective: bool,
    /// `backface-visibility: hidden`.
    pub backface_hidden: bool,
    /// Layer opacity; values below 1.0 create a transparency group.
    pub opacity: f32,
    /// The layer has a mask.
    pub has_mask: bool,
    /// The layer has a CSS filter.
    pub has_filter: bool,
    /// The layer uses a non-default blend mode.
    pub has_blend_mode: bool,
    /// The layer clips its overflowing content.
    pub clips_overflow: bool,
    /// The layer paints itself (rather than being a purely structural layer
    /// whose content is painted by an ancestor).
    pub is_self_painting: bool,
    /// The layer establishes a stacking context, giving it its own negative
    /// and positive z-order child lists.
    pub establishes_stacking_context: bool,
    /// The layer or a visible descendant paints something.
    pub paints_visible_content: bool,
    /// For fixed-position layers: the containing block is the page viewport.
    /// A "fixed" layer inside a transformed ancestor is fixed relative to
    /// that ancestor instead and must not take the viewport fast path.
    pub fixed_to_viewport: bool,
    /// The layer's overflow region scrolls on the compositor, independent of
    /// main-thread painting.
    pub needs_composited_scrolling: bool,
    /// Running accelerated animations.
    pub animations: ActiveAnimations,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            position: Position::Static,
            has_transform: false,
            has_3d_transform: false,
            transform_style: TransformStyle::Flat,
            has_perspective: false,
            backface_hidden: false,
            opacity: 1.0,
            has_mask: false,
            has_filter: false,
            has_blend_mode: false,
            clips_overflow: false,
            is_self_painting: true,
            establishes_stacking_context: false,
            paints_visible_content: true,
            fixed_to_viewport: true,
            needs_composited_scrolling: false,
            animations: ActiveAnimations::default(),
        }
    }
}

impl LayerStyle {
    /// Whether the layer paints with less than full opacity.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }

    /// Whether the layer's style forces its content and descendants to be
    /// rendered as a single group (transparency, mask, filter, blending).
    ///
    /// A group cannot be applied per-descendant, so a layer that creates a
    /// group and has composited descendants must itself composite.
    #[must_use]
    pub fn creates_group(&self) -> bool {
        self.is_transparent() || self.has_mask || self.has_filter || self.has_blend_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_is_plain() {
        let style = LayerStyle::default();
        assert!(!style.is_transparent());
        assert!(!style.creates_group());
        assert_eq!(style.position, Position::Static);
    }

    #[test]
    fn transparency_creates_group() {
        let style = LayerStyle {
            opacity: 0.5,
            ..LayerStyle::default()
        };
        assert!(style.is_transparent());
        assert!(style.creates_group());
    }

    #[test]
    fn mask_and_filter_create_group() {
        let masked = LayerStyle {
            has_mask: true,
            ..LayerStyle::default()
        };
        let filtered = LayerStyle {
            has_filter: true,
            ..LayerStyle::default()
        };
        assert!(masked.creates_group());
        assert!(filtered.creates_group());
    }

    #[test]
    fn viewport_constrained_positions() {
        assert!(Position::Fixed.is_viewport_constrained());
        assert!(Position::Sticky.is_viewport_constrained());
        assert!(!Position::Absolute.is_viewport_constrained());
        assert!(!Position::Static.is_viewport_constrained());
    }
}
