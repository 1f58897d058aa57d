// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured JSON export of a layer tree with compositing annotations.

use lamina_core::compositor::reasons_for_compositing;
use lamina_core::layer::{LayerId, LayerStore};
use serde_json::{Value, json};

/// Renders the subtree at `root` as a JSON tree.
///
/// Each layer carries its index, offset, bounds, composited status, the
/// promotion reasons, the optional surface configuration, and its children
/// in sibling order.
#[must_use]
pub fn layer_tree_as_json(store: &LayerStore, root: LayerId) -> Value {
    let bounds = store.local_bounds(root);
    let offset = store.offset(root);
    let surfaces = store.backing(root).map(|b| {
        json!({
            "foreground": b.foreground().is_some(),
            "clipping": b.clipping().is_some(),
            "scrolling": b.scrolling().is_some(),
            "replica": b.replica().is_some(),
        })
    });
    let children: Vec<Value> = store
        .children(root)
        .map(|child| layer_tree_as_json(store, child))
        .collect();
    json!({
        "index": root.index(),
        "offset": [offset.x, offset.y],
        "bounds": [bounds.x0, bounds.y0, bounds.width(), bounds.height()],
        "composited": store.is_composited(root),
        "reasons": reasons_for_compositing(store, root),
        "surfaces": surfaces,
        "children": children,
    })
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;
    use lamina_core::layer::{LayerStore, LayerStyle};

    use super::*;
    use crate::support::run_update;

    #[test]
    fn json_tree_carries_decisions() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        store.set_style(
            root,
            LayerStyle {
                establishes_stacking_context: true,
                ..LayerStyle::default()
            },
        );
        store.set_local_bounds(root, Rect::new(0.0, 0.0, 800.0, 600.0));
        let child = store.create_layer();
        store.set_style(
            child,
            LayerStyle {
                has_transform: true,
                has_3d_transform: true,
                ..LayerStyle::default()
            },
        );
        store.set_local_bounds(child, Rect::new(0.0, 0.0, 100.0, 100.0));
        store.add_child(root, child);
        run_update(&mut store, root);

        let tree = layer_tree_as_json(&store, root);
        assert_eq!(tree["composited"], json!(true));
        assert_eq!(tree["children"][0]["reasons"], json!(["3D transform"]));
        assert_eq!(
            tree["children"][0]["surfaces"]["clipping"],
            json!(false),
            "plain promoted layer has no clip surface"
        );
    }

    #[test]
    fn uncomposited_layer_has_null_surfaces() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let tree = layer_tree_as_json(&store, root);
        assert_eq!(tree["surfaces"], Value::Null);
        assert_eq!(tree["reasons"], json!([]));
    }
}
