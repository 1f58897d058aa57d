// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indented text dumps of a layer tree with compositing annotations.
//!
//! The output is meant for eyeballs and test baselines, not parsing; use
//! [`json`](crate::json) for tooling.

use std::fmt::Write as _;

use lamina_core::compositor::reasons_for_compositing;
use lamina_core::layer::{LayerId, LayerStore, NotCompositedReason, PaintClass};

/// Renders the subtree at `root` as indented text, one line per layer, in
/// paint order.
///
/// Composited layers are annotated with their promotion reasons; layers
/// turned down by a deferred check are annotated with why.
#[must_use]
pub fn layer_tree_as_text(store: &LayerStore, root: LayerId) -> String {
    let mut out = String::new();
    write_layer(store, root, 0, &mut out);
    out
}

fn write_layer(store: &LayerStore, id: LayerId, depth: usize, out: &mut String) {
    let bounds = store.local_bounds(id);
    let offset = store.offset(id);
    let _ = write!(
        out,
        "{:indent$}layer {} pos=({}, {}) size={}x{}",
        "",
        id.index(),
        bounds.x0 + offset.x,
        bounds.y0 + offset.y,
        bounds.width(),
        bounds.height(),
        indent = depth * 2,
    );
    if store.is_composited(id) {
        let reasons = reasons_for_compositing(store, id);
        let _ = write!(out, " [composited: {}]", reasons.join(", "));
    } else if let Some(reason) = deferred_reason(store.not_composited_reason(id)) {
        let _ = write!(out, " [not composited: {reason}]");
    }
    out.push('\n');
    for child in children_in_paint_order(store, id) {
        write_layer(store, child, depth + 1, out);
    }
}

fn deferred_reason(reason: NotCompositedReason) -> Option<&'static str> {
    match reason {
        NotCompositedReason::None => None,
        NotCompositedReason::NonViewportContainer => Some("non-viewport container"),
        NotCompositedReason::NoVisibleContent => Some("no visible content"),
        NotCompositedReason::BoundsOutOfView => Some("bounds out of view"),
    }
}

/// Children of `id` in paint order, honoring the stacking-context rule the
/// compositor traverses with.
fn children_in_paint_order(store: &LayerStore, id: LayerId) -> Vec<LayerId> {
    let stacking = store.style(id).establishes_stacking_context;
    let mut negative = Vec::new();
    let mut normal = Vec::new();
    let mut positive = Vec::new();
    for child in store.children(id) {
        if stacking {
            match store.paint_class(child) {
                PaintClass::NegativeZ => negative.push(child),
                PaintClass::NormalFlow => normal.push(child),
                PaintClass::PositiveZ => positive.push(child),
            }
        } else {
            normal.push(child);
        }
    }
    negative.extend(normal);
    negative.extend(positive);
    negative
}
