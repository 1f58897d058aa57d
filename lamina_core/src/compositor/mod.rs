// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The compositor: decides which layers get surfaces and keeps the host's
//! surface tree in sync with those decisions.
//!
//! [`Compositor::update`] is the only entry point and runs at most two
//! passes over the layer tree:
//!
//! 1. **Requirements** ([`requirements`]): a paint-order walk that applies
//!    the direct and indirect promotion rules ([`reasons`]), feeds the
//!    [`OverlapMap`], and creates or destroys backing inline.
//! 2. **Rebuild** ([`rebuild`]): a second walk that configures each backed
//!    layer's surfaces, pushes geometry, and rewrites child lists so surface
//!    order matches paint order. Skipped in favor of a geometry-only refresh
//!    when no decisions could have changed.
//!
//! The frame-level scaffold above both passes (root surface, frame
//! scrolling, overflow controls, platform attachment) lives in [`root`].
//!
//! Updates are driven by the embedder: after style changes, after layout,
//! and on scrolls. Between updates the compositor holds no borrows of the
//! store or the host.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use kurbo::Vec2;

use crate::config::{CompositingConfig, Viewport};
use crate::host::{ScrollCoordinator, SurfaceHost};
use crate::layer::{INVALID, LayerId, LayerStore, TransformStyle};
use crate::overlap::OverlapMap;
use crate::trace::{ModeChangeEvent, Tracer, UpdateBeginEvent, UpdateSummary};

mod reasons;
mod rebuild;
mod requirements;
mod root;

pub use reasons::reasons_for_compositing;
pub use root::{FrameRole, RootAttachment};

use requirements::CompositingState;
use root::Scaffold;

/// What kind of change triggered a compositing update.
///
/// The kind decides how much of the update runs: style and layout changes
/// re-decide the hierarchy, a frame scroll re-checks viewport-constrained
/// promotion, and a compositor-driven scroll only refreshes geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    /// Styles changed; layout has not run yet. Size-dependent checks
    /// preserve current statuses and request a post-layout re-check.
    AfterStyleChange,
    /// Layout ran; every fact in the store is current.
    AfterLayout,
    /// The frame scrolled on the main thread.
    OnScroll,
    /// The frame scrolled on the compositor; nothing about the layers
    /// themselves changed.
    OnCompositedScroll,
}

/// Everything one update borrows from the embedder.
pub struct UpdateEnv<'a> {
    /// Update settings.
    pub config: &'a CompositingConfig,
    /// Current viewport facts.
    pub viewport: &'a Viewport,
    /// The platform's surface tree.
    pub host: &'a mut dyn SurfaceHost,
    /// The scrolling component, if the embedder has one.
    pub scroll: &'a mut dyn ScrollCoordinator,
    /// Trace sink for this update.
    pub tracer: Tracer<'a>,
}

/// Per-frame compositing state, persistent across updates.
///
/// One `Compositor` serves one frame's [`LayerStore`]. It owns the
/// compositing decisions, the root scaffold, and the registry of
/// viewport-constrained composited layers; the store owns the layers and
/// their backing.
#[derive(Debug)]
pub struct Compositor {
    role: FrameRole,
    /// Whether any layer (or the forced mode) currently composites.
    compositing: bool,
    /// The next update must re-decide the hierarchy even if the store
    /// reports no changes.
    needs_rebuild: bool,
    /// A size-dependent check punted; re-run the hierarchy pass after the
    /// next layout.
    reevaluate_after_layout: bool,
    /// Layout results are current for the update in progress.
    in_post_layout_update: bool,
    /// Layers with live backing.
    composited_count: u32,
    attachment: RootAttachment,
    scaffold: Option<Scaffold>,
    /// Slots of composited rootmost fixed/sticky layers.
    viewport_constrained: BTreeSet<u32>,
    update_index: u64,
    is_in_window: bool,
}

impl Compositor {
    /// Creates a compositor for a frame with the given role. Starts outside
    /// compositing mode with no scaffold.
    #[must_use]
    pub fn new(role: FrameRole) -> Self {
        Self {
            role,
            compositing: false,
            needs_rebuild: false,
            reevaluate_after_layout: false,
            in_post_layout_update: false,
            composited_count: 0,
            attachment: RootAttachment::Unattached,
            scaffold: None,
            viewport_constrained: BTreeSet::new(),
            update_index: 0,
            is_in_window: true,
        }
    }

    /// Whether any layer currently composites (or the mode is forced).
    #[must_use]
    pub fn is_in_compositing_mode(&self) -> bool {
        self.compositing
    }

    /// Number of layers with live backing.
    #[must_use]
    pub fn composited_layer_count(&self) -> u32 {
        self.composited_count
    }

    /// How the root surface is currently attached.
    #[must_use]
    pub fn attachment(&self) -> RootAttachment {
        self.attachment
    }

    /// The composited rootmost fixed and sticky layers, for the scroll
    /// coordinator to pin.
    #[must_use]
    pub fn viewport_constrained_layers(&self, store: &LayerStore) -> Vec<LayerId> {
        self.viewport_constrained
            .iter()
            .map(|&idx| store.id_at(idx))
            .collect()
    }

    /// Runs a compositing update over the tree rooted at `root`.
    ///
    /// Bails out without touching anything while layout is pending; the
    /// post-layout update will see the same dirty facts.
    ///
    /// # Panics
    ///
    /// Panics if `root` is stale or is not a root layer.
    pub fn update(
        &mut self,
        store: &mut LayerStore,
        root: LayerId,
        kind: UpdateKind,
        env: &mut UpdateEnv<'_>,
    ) {
        store.validate(root);
        assert!(
            store.parent[root.idx as usize] == INVALID,
            "update must start at a root layer"
        );
        if env.viewport.layout_pending {
            return;
        }
        self.update_index += 1;

        if env.config.force_compositing_mode {
            self.enable_compositing_mode(true, env);
        }

        // Everything except a pre-layout style update runs with layout
        // results current.
        self.in_post_layout_update = !matches!(kind, UpdateKind::AfterStyleChange);

        // A compositor-driven scroll moved surfaces, not layers. Refresh
        // geometry and leave the store's dirty facts for the next real
        // update.
        if matches!(kind, UpdateKind::OnCompositedScroll) {
            env.tracer.update_begin(&UpdateBeginEvent {
                update_index: self.update_index,
                kind,
                hierarchy_update: false,
            });
            self.update_tree_geometry(store, root.idx, Vec2::ZERO, env);
            self.finish_update(store, kind, false, env);
            return;
        }

        let changes = store.take_changes();
        let mut need_hierarchy =
            core::mem::take(&mut self.needs_rebuild) || changes.needs_hierarchy_update();
        let run_requirements = match kind {
            UpdateKind::AfterStyleChange | UpdateKind::AfterLayout => {
                need_hierarchy || self.reevaluate_after_layout || !changes.is_empty()
            }
            // Scrolling moves the visible rect, which the store never sees;
            // viewport-constrained decisions must be re-checked every time.
            UpdateKind::OnScroll => true,
            UpdateKind::OnCompositedScroll => unreachable!(),
        };
        if matches!(kind, UpdateKind::AfterLayout) {
            self.reevaluate_after_layout = false;
        }

        env.tracer.update_begin(&UpdateBeginEvent {
            update_index: self.update_index,
            kind,
            hierarchy_update: run_requirements,
        });

        if run_requirements {
            let mut overlap = OverlapMap::new();
            let mut state = CompositingState::root();
            let mut layers_changed = false;
            let mut has_3d = false;
            self.compute_requirements(
                store,
                root.idx,
                root.idx,
                &mut overlap,
                &mut state,
                &mut layers_changed,
                &mut has_3d,
                env,
            );
            need_hierarchy |= layers_changed;
        }

        if need_hierarchy {
            let mut child_list = Vec::new();
            self.rebuild_tree(store, root.idx, Vec2::ZERO, &mut child_list, env);
            if child_list.is_empty() && !self.has_any_additional_composited_layers(store, root.idx)
            {
                self.destroy_scaffold(env);
            } else {
                self.ensure_scaffold(env);
                if let Some(s) = &self.scaffold {
                    env.host.set_children(s.content, &child_list);
                }
            }
        } else if matches!(kind, UpdateKind::OnScroll) || !changes.geometry.is_empty() {
            self.update_tree_geometry(store, root.idx, Vec2::ZERO, env);
        }

        if !env.config.acceleration_available {
            self.enable_compositing_mode(false, env);
        }

        self.finish_update(store, kind, need_hierarchy, env);
    }

    fn finish_update(
        &mut self,
        store: &LayerStore,
        kind: UpdateKind,
        hierarchy_updated: bool,
        env: &mut UpdateEnv<'_>,
    ) {
        self.in_post_layout_update = false;
        env.tracer.update_summary(&UpdateSummary {
            update_index: self.update_index,
            kind,
            total_layers: store.live_len(),
            composited_layers: self.composited_count,
            hierarchy_updated,
        });
    }

    /// Clears a layer's compositing state before the embedder destroys it.
    ///
    /// Must be called while the layer is still alive; destroying a layer
    /// with live backing panics in the store. The next update re-decides
    /// the hierarchy.
    pub fn layer_will_be_removed(
        &mut self,
        store: &mut LayerStore,
        id: LayerId,
        env: &mut UpdateEnv<'_>,
    ) {
        store.validate(id);
        let idx = id.idx;
        if store.backing[idx as usize].is_some() {
            self.update_backing(store, idx, false, false, env);
        } else {
            // It painted into an ancestor surface; those pixels go stale.
            self.repaint_in_ancestor(store, idx, env);
            if self.viewport_constrained.remove(&idx) {
                env.scroll.viewport_constrained_set_changed();
            }
        }
        self.needs_rebuild = true;
    }

    /// Demotes every layer in the store, e.g. when the frame's renderer is
    /// being torn down or acceleration is revoked outside an update.
    pub fn clear_all_backing(&mut self, store: &mut LayerStore, env: &mut UpdateEnv<'_>) {
        for idx in 0..store.len {
            if store.backing[idx as usize].is_some() {
                self.update_backing(store, idx, false, false, env);
            }
        }
        self.needs_rebuild = true;
    }

    /// Flips compositing mode, building or tearing down the root scaffold
    /// to match.
    pub(crate) fn enable_compositing_mode(&mut self, enable: bool, env: &mut UpdateEnv<'_>) {
        if self.compositing == enable {
            return;
        }
        self.compositing = enable;
        env.tracer.mode_change(&ModeChangeEvent {
            compositing: enable,
        });
        if enable {
            self.ensure_scaffold(env);
        } else {
            self.destroy_scaffold(env);
        }
    }

    /// Whether layers other than the given root hold backing. Keeps the
    /// frame in compositing mode when the root tree alone stops needing it.
    pub(crate) fn has_any_additional_composited_layers(
        &self,
        store: &LayerStore,
        root_idx: u32,
    ) -> bool {
        let root_backed = u32::from(store.backing[root_idx as usize].is_some());
        self.composited_count > root_backed
    }
}

/// Whether the subtree at `root` contains any 3D content: a 3D transform, a
/// perspective context, or a `preserve-3d` scope.
///
/// Embedders use this to decide whether a nested frame's document requires
/// accelerated compositing of the enclosing frame.
#[must_use]
pub fn has_3d_content(store: &LayerStore, root: LayerId) -> bool {
    store.validate(root);
    subtree_has_3d(store, root.idx)
}

fn subtree_has_3d(store: &LayerStore, idx: u32) -> bool {
    let style = &store.style[idx as usize];
    if style.has_3d_transform
        || style.has_perspective
        || style.transform_style == TransformStyle::Preserve3d
    {
        return true;
    }
    store
        .paint_lists_at(idx)
        .in_paint_order()
        .any(|child| subtree_has_3d(store, child))
}
