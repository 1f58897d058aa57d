// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Promotion rules: which layers demand their own surface.
//!
//! Direct reasons come from a layer's own style and content and are each
//! gated by a [`CompositingTriggers`](crate::config::CompositingTriggers)
//! bit. Indirect reasons depend on descendant state and are resolved late in
//! the requirements pass. Both kinds degrade to software painting when they
//! do not hold; nothing here can fail.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::config::{CompositingConfig, Viewport};
use crate::layer::{
    CanvasContext, ContentKind, INVALID, IndirectReason, LayerId, LayerStore,
    NotCompositedReason, Position, TransformStyle,
};

/// Per-update facts the direct-reason checks read alongside the config.
pub(crate) struct ReasonInputs<'a> {
    pub config: &'a CompositingConfig,
    pub viewport: &'a Viewport,
    /// Whether the frame is currently in compositing mode.
    pub in_compositing_mode: bool,
    /// Whether layout has run since the facts being examined were set. When
    /// it has not, size-dependent checks preserve the layer's current status
    /// and ask for a re-evaluation after the next layout instead.
    pub in_post_layout_update: bool,
}

/// Outcome of the direct-reason checks for one layer.
pub(crate) struct DirectReasons {
    /// The layer's own content or style demands compositing.
    pub composited: bool,
    /// A size-dependent check could not decide yet; re-run the hierarchy
    /// pass after the next layout.
    pub reevaluate_after_layout: bool,
    /// Why a viewport-constrained layer was turned down, if it was.
    pub not_composited_reason: NotCompositedReason,
}

/// Whether a layer is allowed to have backing at all.
pub(crate) fn can_be_composited(config: &CompositingConfig, store: &LayerStore, idx: u32) -> bool {
    config.acceleration_available && store.style[idx as usize].is_self_painting
}

/// Runs every direct-reason check for the layer at slot `idx`.
///
/// `abs_bounds` is the layer's painted bounds in absolute document
/// coordinates, used for fixed-position culling.
pub(crate) fn direct_reasons(
    store: &LayerStore,
    idx: u32,
    abs_bounds: Rect,
    inputs: &ReasonInputs<'_>,
) -> DirectReasons {
    let mut out = DirectReasons {
        composited: false,
        reevaluate_after_layout: false,
        not_composited_reason: NotCompositedReason::None,
    };
    out.composited = requires_direct(store, idx, abs_bounds, inputs, &mut out);
    out
}

fn requires_direct(
    store: &LayerStore,
    idx: u32,
    abs_bounds: Rect,
    inputs: &ReasonInputs<'_>,
    out: &mut DirectReasons,
) -> bool {
    let i = idx as usize;
    let style = &store.style[i];
    let triggers = &inputs.config.triggers;
    let currently_composited = store.backing[i].is_some();

    if triggers.transform && style.has_transform && style.has_3d_transform {
        return true;
    }

    match store.content[i] {
        ContentKind::Painted => {}
        ContentKind::Video {
            supports_accelerated_rendering,
            should_display,
        } => {
            if triggers.video && supports_accelerated_rendering && should_display {
                return true;
            }
        }
        ContentKind::Canvas { context, size } => {
            if triggers.canvas {
                match context {
                    CanvasContext::Software => {}
                    CanvasContext::Accelerated3d => return true,
                    CanvasContext::Accelerated2d => {
                        // Small canvases repaint cheaply in software.
                        if size.area() >= inputs.config.canvas_area_threshold
                            || inputs.config.composite_small_canvases
                        {
                            return true;
                        }
                    }
                }
            }
        }
        ContentKind::Plugin {
            allows_accelerated_compositing,
            content_box,
        } => {
            if triggers.plugin && allows_accelerated_compositing {
                out.reevaluate_after_layout = true;
                match content_box {
                    // Not laid out yet: keep whatever status the layer has.
                    None => {
                        if currently_composited {
                            return true;
                        }
                    }
                    // 1x1 and smaller plugins are snapshot placeholders.
                    Some(b) => {
                        if b.area() > 1.0 {
                            return true;
                        }
                    }
                }
            }
        }
        ContentKind::Frame {
            requires_accelerated_compositing,
            content_box,
            ..
        } => {
            if triggers.frame && requires_accelerated_compositing {
                out.reevaluate_after_layout = true;
                match content_box {
                    None => {
                        if currently_composited {
                            return true;
                        }
                    }
                    Some(b) => {
                        if b.area() > 0.0 {
                            return true;
                        }
                    }
                }
            }
        }
    }

    // Hidden-backface culling only means anything with a real 3D backend.
    if triggers.transform && style.backface_hidden {
        return true;
    }

    if triggers.animation {
        let a = style.animations;
        // Opacity animations only matter once something composites; the
        // others force the issue themselves.
        if (a.opacity && inputs.in_compositing_mode) || a.transform || a.filter {
            return true;
        }
    }

    if triggers.filter && style.has_filter {
        return true;
    }

    if triggers.blending && style.has_blend_mode {
        return true;
    }

    if requires_for_position(store, idx, abs_bounds, inputs, currently_composited, out) {
        return true;
    }

    if triggers.overflow_scrolling && style.needs_composited_scrolling {
        return true;
    }

    false
}

/// The fixed/sticky promotion rule.
fn requires_for_position(
    store: &LayerStore,
    idx: u32,
    abs_bounds: Rect,
    inputs: &ReasonInputs<'_>,
    currently_composited: bool,
    out: &mut DirectReasons,
) -> bool {
    if !inputs.config.triggers.fixed_position {
        return false;
    }
    let style = &store.style[idx as usize];
    match style.position {
        Position::Sticky => true,
        Position::Fixed => {
            // Only fixed layers that establish a stacking context can be
            // pinned independently of their siblings.
            if !style.establishes_stacking_context {
                return false;
            }
            if !style.fixed_to_viewport {
                out.not_composited_reason = NotCompositedReason::NonViewportContainer;
                return false;
            }
            // The remaining tests read layout results. Before layout has
            // run, keep the current status and re-check afterwards.
            if !inputs.in_post_layout_update {
                out.reevaluate_after_layout = true;
                return currently_composited;
            }
            if !style.paints_visible_content {
                out.not_composited_reason = NotCompositedReason::NoVisibleContent;
                return false;
            }
            let visible = inputs.viewport.visible_rect.intersect(abs_bounds);
            if visible.width() <= 0.0 || visible.height() <= 0.0 {
                out.not_composited_reason = NotCompositedReason::BoundsOutOfView;
                return false;
            }
            true
        }
        _ => false,
    }
}

/// The descendant-dependent promotion rule, resolved after a layer's
/// children have been walked.
pub(crate) fn indirect_reason(
    store: &LayerStore,
    idx: u32,
    has_composited_descendants: bool,
    has_3d_descendants: bool,
) -> IndirectReason {
    let i = idx as usize;
    let style = &store.style[i];

    // Effects that apply to the whole subtree as a group cannot be applied
    // per-descendant once a descendant composites.
    if has_composited_descendants
        && (style.has_transform || style.creates_group() || store.reflection[i] != INVALID)
    {
        return IndirectReason::GraphicalEffect;
    }

    if style.transform_style == TransformStyle::Preserve3d && has_3d_descendants {
        return IndirectReason::Preserve3d;
    }

    if style.has_perspective && has_3d_descendants {
        return IndirectReason::Perspective;
    }

    IndirectReason::None
}

/// Human-readable reasons why a layer is composited, for diagnostics.
///
/// Returns an empty list for uncomposited layers. The strings are stable
/// enough for log output but are not a compatibility contract.
#[must_use]
pub fn reasons_for_compositing(store: &LayerStore, id: LayerId) -> Vec<&'static str> {
    let mut reasons = Vec::new();
    if !store.is_composited(id) {
        return reasons;
    }
    let style = store.style(id);

    if style.has_transform && style.has_3d_transform {
        reasons.push("3D transform");
    }
    match store.content(id) {
        ContentKind::Painted => {}
        ContentKind::Video { .. } => reasons.push("video"),
        ContentKind::Canvas { context, .. } => {
            if context != CanvasContext::Software {
                reasons.push("canvas");
            }
        }
        ContentKind::Plugin { .. } => reasons.push("plugin"),
        ContentKind::Frame { .. } => reasons.push("iframe"),
    }
    if style.backface_hidden {
        reasons.push("backface-visibility: hidden");
    }
    if style.clips_overflow && store.has_compositing_descendant(id) {
        reasons.push("clips compositing descendants");
    }
    if style.animations.any() {
        reasons.push("animation");
    }
    if style.has_filter {
        reasons.push("filters");
    }
    match style.position {
        Position::Fixed => reasons.push("position: fixed"),
        Position::Sticky => reasons.push("position: sticky"),
        _ => {}
    }
    match store.indirect_reason(id) {
        IndirectReason::None => {}
        IndirectReason::Overlap => reasons.push("overlap"),
        IndirectReason::Stacking => reasons.push("stacking"),
        IndirectReason::BackgroundLayer => reasons.push("negative z-index children"),
        IndirectReason::GraphicalEffect => {
            if style.has_transform {
                reasons.push("transform with composited descendants");
            }
            if style.is_transparent() {
                reasons.push("opacity with composited descendants");
            }
            if style.has_mask {
                reasons.push("mask with composited descendants");
            }
            if style.has_filter {
                reasons.push("filter with composited descendants");
            }
            if style.has_blend_mode {
                reasons.push("blending with composited descendants");
            }
            if store.reflection(id).is_some() || store.reflection_source(id).is_some() {
                reasons.push("reflection with composited descendants");
            }
        }
        IndirectReason::Perspective => reasons.push("perspective"),
        IndirectReason::Preserve3d => reasons.push("preserve-3d"),
    }
    if store.parent(id).is_none() {
        reasons.push("root");
    }
    reasons
}
