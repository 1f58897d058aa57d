// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rebuild pass: turning compositing decisions into a surface tree.
//!
//! Runs after the requirements pass with all statuses final. Backed layers
//! refresh their composited bounds, sub-surface configuration, and geometry,
//! then collect their descendants' surfaces; uncomposited layers pass the
//! collection through to the nearest backed ancestor. A geometry-only
//! variant walks the same order but never edits child lists, for updates
//! where nothing changed status.

use alloc::vec::Vec;

use kurbo::{Rect, Vec2};

use crate::layer::{ContentKind, INVALID, LayerStore, SurfaceId};

use super::{Compositor, UpdateEnv};

impl Compositor {
    /// Rebuilds the surface tree for the subtree at `idx`.
    ///
    /// `parent_offset` maps this layer's coordinate space into the enclosing
    /// backed surface's space. Surfaces of backed descendants are appended
    /// to `enclosing` in paint order.
    pub(crate) fn rebuild_tree(
        &mut self,
        store: &mut LayerStore,
        idx: u32,
        parent_offset: Vec2,
        enclosing: &mut Vec<SurfaceId>,
        env: &mut UpdateEnv<'_>,
    ) {
        let i = idx as usize;
        let backed = store.backing[i].is_some();
        let mut child_offset = parent_offset + store.offset[i];

        if backed {
            // Descendant statuses are final, so the bounds this surface
            // paints can be cached now.
            let bounds = composited_bounds(store, idx);

            // A composited reflection renders through the source's replica
            // pointer; keep its bounds current too.
            let reflection = store.reflection[i];
            let mut replica = None;
            if reflection != INVALID {
                let mirror_bounds = composited_bounds(store, reflection);
                if let Some(b) = store.backing[reflection as usize].as_mut() {
                    b.set_composited_bounds(mirror_bounds);
                    replica = Some(b.primary());
                }
            }

            self.update_configuration(store, idx, replica, env);

            if let Some(b) = store.backing[i].as_mut() {
                b.set_composited_bounds(bounds);
            }
            if let Some(b) = store.backing[i].as_ref() {
                let position = bounds.origin() + parent_offset + store.offset[i];
                b.apply_geometry(env.host, position, bounds.size());
            }
            if store.parent[i] == INVALID {
                self.update_root_position(env);
            }
            // Children position against this surface's origin.
            child_offset = -bounds.origin().to_vec2();
        }

        let lists = store.paint_lists_at(idx);
        let mut own: Vec<SurfaceId> = Vec::new();
        {
            let list: &mut Vec<SurfaceId> = if backed { &mut own } else { &mut *enclosing };

            for &child in &lists.negative_z {
                self.rebuild_tree(store, child, child_offset, list, env);
            }
            // With composited negative z-order children, the layer's own
            // content paints above them from the foreground surface.
            if backed {
                if let Some(fg) = store.backing[i].as_ref().and_then(|b| b.foreground()) {
                    list.push(fg);
                }
            }
            for &child in &lists.normal_flow {
                self.rebuild_tree(store, child, child_offset, list, env);
            }
            for &child in &lists.positive_z {
                self.rebuild_tree(store, child, child_offset, list, env);
            }
        }

        if backed {
            let Some(backing) = store.backing[i].as_ref() else {
                return;
            };
            let hosting = backing.parent_for_sublayers();
            let mut parented = false;
            if let ContentKind::Frame {
                inner_root_surface: Some(inner),
                ..
            } = store.content[i]
            {
                // The embedded document's surface tree is spliced in whole;
                // leave it alone when it is already the sole child.
                if env.host.children(hosting) != [inner] {
                    env.host.set_children(hosting, &[inner]);
                }
                parented = true;
            }
            if !parented {
                env.host.set_children(hosting, &own);
            }
            enclosing.push(backing.child_for_superlayers());
        }
    }

    /// Refreshes surface geometry and composited bounds without touching
    /// the hierarchy. Safe only when no layer changed composited status.
    pub(crate) fn update_tree_geometry(
        &mut self,
        store: &mut LayerStore,
        idx: u32,
        parent_offset: Vec2,
        env: &mut UpdateEnv<'_>,
    ) {
        let i = idx as usize;
        let mut child_offset = parent_offset + store.offset[i];

        if store.backing[i].is_some() {
            let bounds = composited_bounds(store, idx);
            if let Some(b) = store.backing[i].as_mut() {
                b.set_composited_bounds(bounds);
            }
            if let Some(b) = store.backing[i].as_ref() {
                let position = bounds.origin() + parent_offset + store.offset[i];
                b.apply_geometry(env.host, position, bounds.size());
            }
            if store.parent[i] == INVALID {
                self.update_root_position(env);
            }
            child_offset = -bounds.origin().to_vec2();
        }

        let lists = store.paint_lists_at(idx);
        for child in lists.in_paint_order() {
            self.update_tree_geometry(store, child, child_offset, env);
        }
    }

    /// Creates or destroys the optional sub-surfaces of a backed layer to
    /// match its current role, and keeps the replica pointer current.
    fn update_configuration(
        &mut self,
        store: &mut LayerStore,
        idx: u32,
        replica: Option<SurfaceId>,
        env: &mut UpdateEnv<'_>,
    ) {
        let i = idx as usize;
        let lists = store.paint_lists_at(idx);
        let needs_foreground = lists
            .negative_z
            .iter()
            .any(|&c| store.backing[c as usize].is_some() || store.has_compositing_descendant[c as usize]);
        let needs_clipping = store.style[i].clips_overflow && store.has_compositing_descendant[i];
        let needs_scrolling = store.style[i].needs_composited_scrolling;

        let Some(backing) = store.backing[i].as_mut() else {
            return;
        };
        let mut changed = false;
        changed |= backing.ensure_foreground(env.host, needs_foreground);
        changed |= backing.ensure_clipping(env.host, needs_clipping);
        changed |= backing.ensure_scrolling(env.host, needs_scrolling);
        if changed {
            backing.wire_internal(env.host);
            backing.apply_debug_indicators(
                env.host,
                env.config.show_debug_borders,
                env.config.show_repaint_counter,
            );
        }
        backing.set_replica(replica);
    }
}

/// Bounds of everything a backed layer paints: its own content plus every
/// visible, self-painting uncomposited descendant subtree, in the layer's
/// coordinate space.
pub(crate) fn composited_bounds(store: &LayerStore, idx: u32) -> Rect {
    let i = idx as usize;
    let own = store.local_bounds[i];
    // Overflow clipping confines the subtree to the layer's own box, so
    // nothing a descendant does can grow the surface.
    if store.style[i].clips_overflow {
        return own;
    }
    let mut bounds = own;
    let mut child = store.first_child[i];
    while child != INVALID {
        let c = child as usize;
        let style = &store.style[c];
        // Composited children paint into their own surface; hidden and
        // non-self-painting subtrees contribute no pixels here.
        if store.backing[c].is_none() && style.is_self_painting && style.paints_visible_content {
            bounds = bounds.union(composited_bounds(store, child) + store.offset[c]);
        }
        child = store.next_sibling[c];
    }
    bounds
}

#[cfg(test)]
mod tests {
    use kurbo::Vec2 as V;

    use super::*;
    use crate::backing::Backing;
    use crate::layer::LayerStyle;
    use crate::testing::MockHost;

    #[test]
    fn composited_bounds_absorb_uncomposited_children_only() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let soft = store.create_layer();
        let hard = store.create_layer();
        store.add_child(parent, soft);
        store.add_child(parent, hard);

        store.set_local_bounds(parent, Rect::new(0.0, 0.0, 100.0, 100.0));
        store.set_local_bounds(soft, Rect::new(0.0, 0.0, 50.0, 50.0));
        store.set_offset(soft, V::new(80.0, 80.0));
        store.set_local_bounds(hard, Rect::new(0.0, 0.0, 500.0, 500.0));

        let mut host = MockHost::new();
        store.backing[hard.index() as usize] = Some(Backing::new(&mut host));

        let bounds = composited_bounds(&store, parent.index());
        assert_eq!(
            bounds,
            Rect::new(0.0, 0.0, 130.0, 130.0),
            "soft child extends the bounds, hard child paints itself"
        );
    }

    #[test]
    fn composited_bounds_recurse_through_soft_subtrees() {
        let mut store = LayerStore::new();
        let top = store.create_layer();
        let mid = store.create_layer();
        let leaf = store.create_layer();
        store.add_child(top, mid);
        store.add_child(mid, leaf);

        store.set_local_bounds(top, Rect::new(0.0, 0.0, 10.0, 10.0));
        store.set_offset(mid, V::new(10.0, 0.0));
        store.set_local_bounds(mid, Rect::new(0.0, 0.0, 10.0, 10.0));
        store.set_offset(leaf, V::new(10.0, 0.0));
        store.set_local_bounds(leaf, Rect::new(0.0, 0.0, 10.0, 10.0));

        let bounds = composited_bounds(&store, top.index());
        assert_eq!(bounds, Rect::new(0.0, 0.0, 30.0, 10.0), "offsets accumulate");
    }

    #[test]
    fn clipping_layer_bounds_stop_at_its_own_box() {
        let mut store = LayerStore::new();
        let clipper = store.create_layer();
        let inner = store.create_layer();
        store.add_child(clipper, inner);
        store.set_style(
            clipper,
            LayerStyle {
                clips_overflow: true,
                ..LayerStyle::default()
            },
        );
        store.set_local_bounds(clipper, Rect::new(0.0, 0.0, 100.0, 100.0));
        store.set_local_bounds(inner, Rect::new(0.0, 0.0, 500.0, 500.0));

        assert_eq!(
            composited_bounds(&store, clipper.index()),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            "clipped overflow never grows the surface"
        );
    }

    #[test]
    fn hidden_descendants_do_not_inflate_bounds() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let hidden = store.create_layer();
        store.add_child(parent, hidden);
        store.set_style(
            hidden,
            LayerStyle {
                paints_visible_content: false,
                ..LayerStyle::default()
            },
        );
        store.set_local_bounds(parent, Rect::new(0.0, 0.0, 100.0, 100.0));
        store.set_local_bounds(hidden, Rect::new(0.0, 0.0, 900.0, 900.0));

        assert_eq!(
            composited_bounds(&store, parent.index()),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            "invisible content paints nothing into the surface"
        );
    }
}
