// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The requirements pass: a single paint-order walk that decides which
//! layers get backing.
//!
//! The walk carries a value-copied [`CompositingState`] down the tree and
//! feeds the [`OverlapMap`] as it goes. Promotion decisions are made in
//! three waves per layer: direct reasons on entry, the deferred negative
//! z-order promotion between child recursions, and the descendant-dependent
//! indirect reasons on exit. Backing is created and destroyed inline so the
//! rebuild pass that follows can rely on final statuses.

use crate::backing::Backing;
use crate::layer::{ContentKind, INVALID, IndirectReason, LayerStore, Position};
use crate::overlap::OverlapMap;
use crate::trace::{DemotionEvent, PromotionEvent};

use super::reasons::{ReasonInputs, can_be_composited, direct_reasons, indirect_reason};
use super::{Compositor, FrameRole, UpdateEnv};

/// Traversal state threaded through the requirements pass.
///
/// Copied by value for each child so that a subtree's decisions flow back to
/// the parent only through the explicit merge points.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CompositingState {
    /// Slot of the nearest composited ancestor on the current path, or
    /// [`INVALID`] when content paints into the root scaffold.
    ancestor: u32,
    /// A layer painted earlier in this subtree composited.
    subtree_is_compositing: bool,
    /// Overlap testing is still reliable on this path. Cleared when an
    /// unclipped subtree stops testing or runs a transform animation.
    testing_overlap: bool,
}

impl CompositingState {
    pub(crate) fn root() -> Self {
        Self {
            ancestor: INVALID,
            subtree_is_compositing: false,
            testing_overlap: true,
        }
    }
}

impl Compositor {
    /// Walks the subtree at `idx` in paint order, deciding compositing for
    /// every layer and synchronizing backing with the decisions.
    pub(crate) fn compute_requirements(
        &mut self,
        store: &mut LayerStore,
        idx: u32,
        root_idx: u32,
        overlap: &mut OverlapMap,
        state: &mut CompositingState,
        layers_changed: &mut bool,
        descendant_has_3d: &mut bool,
        env: &mut UpdateEnv<'_>,
    ) {
        let i = idx as usize;
        let is_root = idx == root_idx;

        overlap.geometry_mut().push(store.offset[i]);
        store.has_compositing_descendant[i] = false;

        let abs_bounds = overlap.geometry().map_to_absolute(store.local_bounds[i]);

        let inputs = ReasonInputs {
            config: env.config,
            viewport: env.viewport,
            in_compositing_mode: self.compositing,
            in_post_layout_update: self.in_post_layout_update,
        };
        let direct = direct_reasons(store, idx, abs_bounds, &inputs);
        if direct.reevaluate_after_layout {
            self.reevaluate_after_layout = true;
        }
        store.not_composited_reason[i] = direct.not_composited_reason;

        // Guess: layers painted after a composited sibling composite too.
        // While overlap testing is reliable, the actual test replaces the
        // guess in both directions.
        let mut indirect = if state.subtree_is_compositing {
            IndirectReason::Stacking
        } else {
            IndirectReason::None
        };
        if !overlap.is_empty() && state.testing_overlap {
            indirect = if overlap.overlaps(abs_bounds) {
                IndirectReason::Overlap
            } else {
                IndirectReason::None
            };
        }
        // A composited video's surface must stay directly behind whatever
        // paints over it (its controls); nothing below a video may stay in
        // software regardless of geometry.
        if state.ancestor != INVALID
            && matches!(
                store.content[state.ancestor as usize],
                ContentKind::Video { .. }
            )
        {
            indirect = IndirectReason::Overlap;
        }
        store.indirect_reason[i] = indirect;

        let mut child_state = *state;
        child_state.subtree_is_compositing = false;

        let can = can_be_composited(env.config, store, idx);
        let mut will_be_composited = can
            && (direct.composited
                || indirect != IndirectReason::None
                || (self.compositing && is_root));
        if will_be_composited {
            state.subtree_is_compositing = true;
            child_state.ancestor = idx;
            // Descendants test against each other in a fresh context, never
            // against this layer's own bounds.
            overlap.begin_context();
            child_state.testing_overlap = true;
        }

        let lists = store.paint_lists_at(idx);
        let mut any_child_3d = false;

        for &child in &lists.negative_z {
            self.compute_requirements(
                store,
                child,
                root_idx,
                overlap,
                &mut child_state,
                layers_changed,
                &mut any_child_3d,
                env,
            );
            // A composited negative z-order child needs this layer's
            // background behind it, which takes a surface of its own.
            if !will_be_composited && child_state.subtree_is_compositing {
                store.indirect_reason[i] = IndirectReason::BackgroundLayer;
                child_state.ancestor = idx;
                overlap.begin_context();
                child_state.testing_overlap = true;
                will_be_composited = true;
            }
        }
        for &child in &lists.normal_flow {
            self.compute_requirements(
                store,
                child,
                root_idx,
                overlap,
                &mut child_state,
                layers_changed,
                &mut any_child_3d,
                env,
            );
        }
        for &child in &lists.positive_z {
            self.compute_requirements(
                store,
                child,
                root_idx,
                overlap,
                &mut child_state,
                layers_changed,
                &mut any_child_3d,
                env,
            );
        }

        // Every layer's bounds matter for overlap, composited or not,
        // except those painting into the root scaffold: later content there
        // keeps paint order by the painter's algorithm alone.
        if child_state.ancestor != INVALID && child_state.ancestor != root_idx && !is_root {
            overlap.add(idx, abs_bounds);
        }

        // Descendant-dependent reasons resolve now that the subtree is done.
        if !will_be_composited && can {
            let late = indirect_reason(store, idx, child_state.subtree_is_compositing, any_child_3d);
            if late != IndirectReason::None {
                store.indirect_reason[i] = late;
                child_state.ancestor = idx;
                overlap.begin_context();
                add_subtree_to_overlap(store, overlap, idx, root_idx);
                will_be_composited = true;
            }
        }

        // A reflection's status is coupled to its source's, never decided
        // on its own.
        if store.reflection[i] != INVALID {
            let r = store.reflection[i] as usize;
            store.indirect_reason[r] = if will_be_composited {
                IndirectReason::Stacking
            } else {
                IndirectReason::None
            };
        }

        if child_state.subtree_is_compositing {
            state.subtree_is_compositing = true;
        }
        store.has_compositing_descendant[i] = child_state.subtree_is_compositing;

        let is_clipping_layer =
            can && child_state.subtree_is_compositing && store.style[i].clips_overflow;

        // A clipped subtree keeps its animations inside bounds already in
        // the map, so only unclipped uncertainty poisons later testing.
        if (!child_state.testing_overlap && !is_clipping_layer)
            || store.style[i].animations.transform
        {
            state.testing_overlap = false;
        }

        if is_clipping_layer && !will_be_composited {
            child_state.ancestor = idx;
            overlap.begin_context();
            add_subtree_to_overlap(store, overlap, idx, root_idx);
            will_be_composited = true;
        }

        if child_state.ancestor == idx && !is_root {
            overlap.finish_context();
        }

        if is_root {
            // A scrollable embedded frame can promote its whole document so
            // the outer compositor scrolls it without repainting.
            let scrollable_frame = self.role == FrameRole::Nested
                && env.config.triggers.scrollable_inner_frames
                && (env.viewport.contents_size.width > env.viewport.size.width
                    || env.viewport.contents_size.height > env.viewport.size.height);
            if can
                && (child_state.subtree_is_compositing
                    || direct.composited
                    || scrollable_frame
                    || env.config.force_compositing_mode)
            {
                will_be_composited = true;
            } else {
                // Nothing needs compositing; leave the mode unless layers
                // outside this tree still hold backing.
                if !self.has_any_additional_composited_layers(store, idx) {
                    self.enable_compositing_mode(false, env);
                }
                will_be_composited = self.compositing && can;
            }
        }

        if self.update_backing(store, idx, will_be_composited, direct.composited, env) {
            *layers_changed = true;
        }

        if store.reflection[i] != INVALID {
            let r = store.reflection[i];
            let r_should = can_be_composited(env.config, store, r)
                && store.indirect_reason[r as usize] != IndirectReason::None;
            if self.update_backing(store, r, r_should, false, env) {
                *layers_changed = true;
            }
        }

        *descendant_has_3d |= any_child_3d || store.style[i].has_3d_transform;

        overlap.geometry_mut().pop();
    }

    /// Synchronizes a layer's backing with the decision for it.
    ///
    /// Returns whether the composited status flipped. Flips recompute the
    /// subtree's repaint containers and invalidate the layer's old and new
    /// painting location so no pixels are left stale.
    pub(crate) fn update_backing(
        &mut self,
        store: &mut LayerStore,
        idx: u32,
        should_composite: bool,
        direct: bool,
        env: &mut UpdateEnv<'_>,
    ) -> bool {
        let i = idx as usize;
        let mut changed = false;

        if should_composite {
            self.enable_compositing_mode(true, env);
            if store.backing[i].is_none() {
                // The old location painted into an ancestor surface;
                // invalidate it there before the switch.
                self.repaint_in_ancestor(store, idx, env);
                store.backing[i] = Some(Backing::new(env.host));
                self.composited_count += 1;
                changed = true;
                env.tracer.promotion(&PromotionEvent {
                    layer_index: idx,
                    direct,
                    indirect_reason: store.indirect_reason[i],
                });
            }
        } else if let Some(backing) = store.backing[i].take() {
            // A demoted reflection drops the source backing's replica
            // pointer first, so the host never mirrors a dead surface.
            let src = store.reflection_source[i];
            if src != INVALID {
                if let Some(source_backing) = store.backing[src as usize].as_mut() {
                    source_backing.set_replica(None);
                }
            }
            backing.destroy(env.host);
            self.composited_count -= 1;
            changed = true;
            env.tracer.demotion(&DemotionEvent { layer_index: idx });
        }

        if changed {
            let p = store.parent[i];
            let inherited = if p == INVALID {
                INVALID
            } else {
                store.repaint_container[p as usize]
            };
            assign_repaint_containers(store, idx, inherited);
            if !should_composite {
                // The new location paints into the surviving ancestor.
                self.repaint_in_ancestor(store, idx, env);
            }
        }

        let constrained = should_composite
            && store.style[i].position.is_viewport_constrained()
            && is_rootmost_fixed_or_sticky(store, idx);
        let was_constrained = self.viewport_constrained.contains(&idx);
        if constrained != was_constrained {
            if constrained {
                self.viewport_constrained.insert(idx);
            } else {
                self.viewport_constrained.remove(&idx);
            }
            env.scroll.viewport_constrained_set_changed();
        }

        if let Some(backing) = store.backing[i].as_ref() {
            backing.apply_debug_indicators(
                env.host,
                env.config.show_debug_borders,
                env.config.show_repaint_counter,
            );
        }

        changed
    }

    /// Invalidates the layer's painted bounds in the composited ancestor it
    /// paints into, if there is one.
    pub(crate) fn repaint_in_ancestor(
        &self,
        store: &LayerStore,
        idx: u32,
        env: &mut UpdateEnv<'_>,
    ) {
        let p = store.parent[idx as usize];
        let container = if p == INVALID {
            INVALID
        } else {
            store.repaint_container[p as usize]
        };
        if container == INVALID {
            return;
        }
        let Some(backing) = store.backing[container as usize].as_ref() else {
            return;
        };
        // Accumulate the offset from the container down to this layer.
        let mut offset = store.offset[idx as usize];
        let mut ancestor = store.parent[idx as usize];
        while ancestor != INVALID && ancestor != container {
            offset += store.offset[ancestor as usize];
            ancestor = store.parent[ancestor as usize];
        }
        if ancestor != container {
            return;
        }
        let rect = (store.local_bounds[idx as usize] + offset)
            - backing.composited_bounds().origin().to_vec2();
        env.host.set_needs_display_in_rect(backing.primary(), rect);
    }
}

/// Rewrites the repaint containers for the subtree at `idx`.
pub(crate) fn assign_repaint_containers(store: &mut LayerStore, idx: u32, inherited: u32) {
    let container = if store.backing[idx as usize].is_some() {
        idx
    } else {
        inherited
    };
    store.repaint_container[idx as usize] = container;
    let mut child = store.first_child[idx as usize];
    while child != INVALID {
        assign_repaint_containers(store, child, container);
        child = store.next_sibling[child as usize];
    }
}

/// Whether a fixed or sticky layer is the outermost one on its ancestor
/// chain. Fixed layers nested inside a composited fixed ancestor move with
/// that ancestor and stay out of the viewport-constrained registry.
pub(crate) fn is_rootmost_fixed_or_sticky(store: &LayerStore, idx: u32) -> bool {
    match store.style[idx as usize].position {
        Position::Sticky => true,
        Position::Fixed => {
            let mut ancestor = store.parent[idx as usize];
            while ancestor != INVALID {
                if store.backing[ancestor as usize].is_some()
                    && store.style[ancestor as usize].position == Position::Fixed
                {
                    return false;
                }
                ancestor = store.parent[ancestor as usize];
            }
            true
        }
        _ => false,
    }
}

/// Adds the bounds of `idx` and its whole subtree to the overlap map, used
/// when a layer is promoted after its children were already walked.
///
/// The geometry map must currently be in `idx`'s coordinate space.
fn add_subtree_to_overlap(store: &LayerStore, overlap: &mut OverlapMap, idx: u32, root_idx: u32) {
    // A layer recorded during the main walk already sits in the map at its
    // final position; recording it again here would double-count it.
    if overlap.contains(idx) {
        return;
    }
    if idx != root_idx {
        let abs = overlap.geometry().map_to_absolute(store.local_bounds[idx as usize]);
        overlap.add(idx, abs);
    }
    let mut child = store.first_child[idx as usize];
    while child != INVALID {
        overlap.geometry_mut().push(store.offset[child as usize]);
        add_subtree_to_overlap(store, overlap, child, root_idx);
        overlap.geometry_mut().pop();
        child = store.next_sibling[child as usize];
    }
}
