// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays layer storage with allocation, topology, and property management.

use alloc::vec::Vec;

use kurbo::{Rect, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker};

use super::id::{INVALID, LayerId};
use super::style::{ContentKind, LayerStyle, PaintClass};
use super::traverse::Children;
use crate::backing::Backing;
use crate::dirty;

/// Why a layer is composited despite having no direct reason of its own.
///
/// Written by the requirements pass; callers only read it for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IndirectReason {
    /// Not composited indirectly.
    #[default]
    None,
    /// The layer's painted content would overlap an earlier composited layer.
    Overlap,
    /// The layer paints into a stacking context that must flatten onto a
    /// composited sibling boundary.
    Stacking,
    /// The layer hosts the background of a stacking context whose negative
    /// z-order children composited.
    BackgroundLayer,
    /// The layer creates a transparency/mask/filter/blend group over
    /// composited descendants, or is a reflection coupled to a composited
    /// source.
    GraphicalEffect,
    /// The layer applies perspective to composited 3D children.
    Perspective,
    /// The layer preserves 3D for composited children.
    Preserve3d,
}

/// Why a viewport-constrained (fixed or sticky) layer was left uncomposited.
///
/// Diagnostic companion to the position promotion rule; `None` also covers
/// layers the rule never examined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NotCompositedReason {
    /// No reason recorded.
    #[default]
    None,
    /// The layer's containing block is not the viewport, so compositor-side
    /// pinning would produce the wrong motion.
    NonViewportContainer,
    /// The layer paints no visible content.
    NoVisibleContent,
    /// The layer's absolute bounds are entirely outside the culling rect.
    BoundsOutOfView,
}

/// Struct-of-arrays storage for all layers.
///
/// Layers are addressed by [`LayerId`] handles. Internally, each layer occupies
/// a slot in parallel arrays. Destroyed layers are recycled via a free list,
/// and generation counters prevent stale handle access.
#[derive(Debug)]
pub struct LayerStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local properties (set by callers) --
    pub(crate) style: Vec<LayerStyle>,
    pub(crate) content: Vec<ContentKind>,
    pub(crate) paint_class: Vec<PaintClass>,
    pub(crate) offset: Vec<Vec2>,
    pub(crate) local_bounds: Vec<Rect>,
    pub(crate) reflection: Vec<u32>,
    pub(crate) reflection_source: Vec<u32>,

    // -- Computed properties (written by compositing updates) --
    pub(crate) indirect_reason: Vec<IndirectReason>,
    pub(crate) has_compositing_descendant: Vec<bool>,
    pub(crate) not_composited_reason: Vec<NotCompositedReason>,
    pub(crate) repaint_container: Vec<u32>,
    pub(crate) backing: Vec<Option<Backing>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_removed: Vec<u32>,
}

/// The set of changes drained by a single
/// [`LayerStore::take_changes`] call.
///
/// Raw slot indices rather than [`LayerId`] handles, so the compositor can
/// index directly into the store's arrays.
#[derive(Clone, Debug, Default)]
pub struct TreeChanges {
    /// Layers whose style or content facts changed.
    pub styles: Vec<u32>,
    /// Layers whose offset or bounds changed.
    pub geometry: Vec<u32>,
    /// Whether the tree topology changed.
    pub topology_changed: bool,
    /// Layers destroyed since the last drain.
    pub removed: Vec<u32>,
}

impl TreeChanges {
    /// Whether the changes require re-deciding which layers composite, as
    /// opposed to only refreshing surface geometry.
    #[must_use]
    pub fn needs_hierarchy_update(&self) -> bool {
        self.topology_changed || !self.styles.is_empty() || !self.removed.is_empty()
    }

    /// Whether anything changed at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
            && self.geometry.is_empty()
            && !self.topology_changed
            && self.removed.is_empty()
    }
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStore {
    /// Creates an empty layer store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            style: Vec::new(),
            content: Vec::new(),
            paint_class: Vec::new(),
            offset: Vec::new(),
            local_bounds: Vec::new(),
            reflection: Vec::new(),
            reflection_source: Vec::new(),
            indirect_reason: Vec::new(),
            has_compositing_descendant: Vec::new(),
            not_composited_reason: Vec::new(),
            repaint_container: Vec::new(),
            backing: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a new layer and returns its handle.
    ///
    /// The layer starts with default style, painted content, normal-flow
    /// paint class, zero offset and bounds, no reflection, and no parent.
    pub fn create_layer(&mut self) -> LayerId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.style[idx as usize] = LayerStyle::default();
            self.content[idx as usize] = ContentKind::default();
            self.paint_class[idx as usize] = PaintClass::default();
            self.offset[idx as usize] = Vec2::ZERO;
            self.local_bounds[idx as usize] = Rect::ZERO;
            self.reflection[idx as usize] = INVALID;
            self.reflection_source[idx as usize] = INVALID;
            self.indirect_reason[idx as usize] = IndirectReason::None;
            self.has_compositing_descendant[idx as usize] = false;
            self.not_composited_reason[idx as usize] = NotCompositedReason::None;
            self.repaint_container[idx as usize] = INVALID;
            self.backing[idx as usize] = None;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.style.push(LayerStyle::default());
            self.content.push(ContentKind::default());
            self.paint_class.push(PaintClass::default());
            self.offset.push(Vec2::ZERO);
            self.local_bounds.push(Rect::ZERO);
            self.reflection.push(INVALID);
            self.reflection_source.push(INVALID);
            self.indirect_reason.push(IndirectReason::None);
            self.has_compositing_descendant.push(false);
            self.not_composited_reason.push(NotCompositedReason::None);
            self.repaint_container.push(INVALID);
            self.backing.push(None);
            self.generation.push(0);
            idx
        };

        self.dirty.mark(idx, dirty::TOPOLOGY);

        LayerId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a layer, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the layer has children (remove them first), still holds
    /// backing (clear it through the compositor first), is still linked as a
    /// reflection, or if the handle is stale.
    pub fn destroy_layer(&mut self, id: LayerId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy layer with children"
        );
        assert!(
            self.backing[idx as usize].is_none(),
            "cannot destroy layer with live backing"
        );
        assert!(
            self.reflection[idx as usize] == INVALID
                && self.reflection_source[idx as usize] == INVALID,
            "cannot destroy layer with a reflection link"
        );

        // Remove from parent's child list if attached.
        if self.parent[idx as usize] != INVALID {
            self.unlink_from_parent(idx);
        }

        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Returns whether the given handle refers to a live layer.
    #[must_use]
    pub fn is_alive(&self, id: LayerId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Number of live layers.
    #[must_use]
    pub fn live_len(&self) -> u32 {
        self.len - self.free_list.len() as u32
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn add_child(&mut self, parent: LayerId, child: LayerId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Removes `child` from its current parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the layer has no parent.
    pub fn remove_from_parent(&mut self, child: LayerId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "layer has no parent");

        let p = self.parent[c as usize];
        self.unlink_from_parent(c);
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Inserts `child` before `sibling` in the sibling list.
    ///
    /// `child` must not already have a parent. `sibling` must have a parent.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, or `sibling`
    /// has no parent.
    pub fn insert_before(&mut self, child: LayerId, sibling: LayerId) {
        self.validate(child);
        self.validate(sibling);
        let c = child.idx;
        let s = sibling.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            // `sibling` was the first child.
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Returns the parent of a layer, if any.
    #[must_use]
    pub fn parent(&self, id: LayerId) -> Option<LayerId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID { None } else { Some(self.id_at(p)) }
    }

    /// Returns an iterator over the direct children of a layer.
    #[must_use]
    pub fn children(&self, id: LayerId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the root layers (those with no parent).
    #[must_use]
    pub fn roots(&self) -> Vec<LayerId> {
        let mut roots = Vec::new();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                roots.push(self.id_at(idx));
            }
        }
        roots
    }

    // -- Property getters (read-only, no dirty marking) --

    /// Returns the style of a layer.
    #[must_use]
    pub fn style(&self, id: LayerId) -> LayerStyle {
        self.validate(id);
        self.style[id.idx as usize]
    }

    /// Returns the content kind of a layer.
    #[must_use]
    pub fn content(&self, id: LayerId) -> ContentKind {
        self.validate(id);
        self.content[id.idx as usize]
    }

    /// Returns the paint-order class of a layer.
    #[must_use]
    pub fn paint_class(&self, id: LayerId) -> PaintClass {
        self.validate(id);
        self.paint_class[id.idx as usize]
    }

    /// Returns the layer's origin offset within its parent.
    #[must_use]
    pub fn offset(&self, id: LayerId) -> Vec2 {
        self.validate(id);
        self.offset[id.idx as usize]
    }

    /// Returns the layer's painted bounds in its own coordinate space.
    #[must_use]
    pub fn local_bounds(&self, id: LayerId) -> Rect {
        self.validate(id);
        self.local_bounds[id.idx as usize]
    }

    /// Returns the layer's reflection layer, if it has one.
    #[must_use]
    pub fn reflection(&self, id: LayerId) -> Option<LayerId> {
        self.validate(id);
        let r = self.reflection[id.idx as usize];
        if r == INVALID { None } else { Some(self.id_at(r)) }
    }

    /// If this layer is a reflection, returns the layer it reflects.
    #[must_use]
    pub fn reflection_source(&self, id: LayerId) -> Option<LayerId> {
        self.validate(id);
        let s = self.reflection_source[id.idx as usize];
        if s == INVALID { None } else { Some(self.id_at(s)) }
    }

    /// Whether the layer currently holds backing (paints into its own
    /// surface).
    ///
    /// Only meaningful after a compositing update.
    #[must_use]
    pub fn is_composited(&self, id: LayerId) -> bool {
        self.validate(id);
        self.backing[id.idx as usize].is_some()
    }

    /// Returns the layer's backing, if composited.
    #[must_use]
    pub fn backing(&self, id: LayerId) -> Option<&Backing> {
        self.validate(id);
        self.backing[id.idx as usize].as_ref()
    }

    /// The indirect compositing reason recorded by the last update.
    #[must_use]
    pub fn indirect_reason(&self, id: LayerId) -> IndirectReason {
        self.validate(id);
        self.indirect_reason[id.idx as usize]
    }

    /// Whether the last update found a composited layer in this layer's
    /// subtree (excluding the layer itself).
    #[must_use]
    pub fn has_compositing_descendant(&self, id: LayerId) -> bool {
        self.validate(id);
        self.has_compositing_descendant[id.idx as usize]
    }

    /// Why a viewport-constrained layer was left uncomposited, if the last
    /// update recorded a reason.
    #[must_use]
    pub fn not_composited_reason(&self, id: LayerId) -> NotCompositedReason {
        self.validate(id);
        self.not_composited_reason[id.idx as usize]
    }

    /// The layer's repaint container: the nearest composited self-or-ancestor,
    /// if any. Invalidations of this layer's content are issued into that
    /// container's surface.
    #[must_use]
    pub fn repaint_container(&self, id: LayerId) -> Option<LayerId> {
        self.validate(id);
        let r = self.repaint_container[id.idx as usize];
        if r == INVALID { None } else { Some(self.id_at(r)) }
    }

    // -- Mutation API (auto-marks dirty) --

    /// Sets the style of a layer.
    ///
    /// Marks the STYLE channel dirty; the next update re-decides the
    /// compositing hierarchy.
    pub fn set_style(&mut self, id: LayerId, style: LayerStyle) {
        self.validate(id);
        self.style[id.idx as usize] = style;
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Sets the content kind of a layer.
    pub fn set_content(&mut self, id: LayerId, content: ContentKind) {
        self.validate(id);
        self.content[id.idx as usize] = content;
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Sets the paint-order class of a layer.
    ///
    /// The class only takes effect when the parent establishes a stacking
    /// context; see [`LayerStore::paint_order_children`].
    pub fn set_paint_class(&mut self, id: LayerId, class: PaintClass) {
        self.validate(id);
        self.paint_class[id.idx as usize] = class;
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Sets the layer's origin offset within its parent.
    ///
    /// Marks only the GEOMETRY channel; a pure move never changes which
    /// layers composite unless overlap is being tested, which the next
    /// hierarchy update handles.
    pub fn set_offset(&mut self, id: LayerId, offset: Vec2) {
        self.validate(id);
        self.offset[id.idx as usize] = offset;
        self.dirty.mark(id.idx, dirty::GEOMETRY);
    }

    /// Sets the layer's painted bounds in its own coordinate space.
    pub fn set_local_bounds(&mut self, id: LayerId, bounds: Rect) {
        self.validate(id);
        self.local_bounds[id.idx as usize] = bounds;
        self.dirty.mark(id.idx, dirty::GEOMETRY);
    }

    /// Links or unlinks a reflection layer for `source`.
    ///
    /// The reflection layer's composited status is kept coupled to the
    /// source's by every compositing update.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, if `source` already has a different
    /// reflection, or if the reflection layer already reflects another layer.
    pub fn set_reflection(&mut self, source: LayerId, reflection: Option<LayerId>) {
        self.validate(source);
        match reflection {
            Some(r) => {
                self.validate(r);
                assert!(
                    self.reflection[source.idx as usize] == INVALID
                        || self.reflection[source.idx as usize] == r.idx,
                    "layer already has a reflection"
                );
                assert!(
                    self.reflection_source[r.idx as usize] == INVALID
                        || self.reflection_source[r.idx as usize] == source.idx,
                    "layer already reflects another layer"
                );
                self.reflection[source.idx as usize] = r.idx;
                self.reflection_source[r.idx as usize] = source.idx;
            }
            None => {
                let r = self.reflection[source.idx as usize];
                if r != INVALID {
                    self.reflection_source[r as usize] = INVALID;
                }
                self.reflection[source.idx as usize] = INVALID;
            }
        }
        self.dirty.mark(source.idx, dirty::STYLE);
    }

    // -- Change draining --

    /// Drains all dirty channels and the removal list, returning what changed
    /// since the last drain.
    ///
    /// The compositor calls this once per update to decide between a full
    /// hierarchy pass and a geometry-only refresh.
    pub fn take_changes(&mut self) -> TreeChanges {
        let mut changes = TreeChanges {
            styles: self
                .dirty
                .drain(dirty::STYLE)
                .deterministic()
                .run()
                .collect(),
            geometry: self
                .dirty
                .drain(dirty::GEOMETRY)
                .deterministic()
                .run()
                .collect(),
            topology_changed: false,
            removed: Vec::new(),
        };
        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.topology_changed = !topology.is_empty();
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
        changes
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: LayerId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale LayerId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Builds a live handle for slot `idx`.
    pub(crate) fn id_at(&self, idx: u32) -> LayerId {
        LayerId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn create_and_destroy() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        assert!(store.is_alive(id));
        store.destroy_layer(id);
        assert!(!store.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = LayerStore::new();
        let id1 = store.create_layer();
        store.destroy_layer(id1);
        let id2 = store.create_layer();
        // id2 reuses the same slot but has a different generation.
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
    }

    #[test]
    fn add_child_and_query() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let child1 = store.create_layer();
        let child2 = store.create_layer();

        store.add_child(parent, child1);
        store.add_child(parent, child2);

        assert_eq!(store.parent(child1), Some(parent));
        assert_eq!(store.parent(child2), Some(parent));

        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, vec![child1, child2]);
    }

    #[test]
    fn insert_before_works() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let a = store.create_layer();
        let b = store.create_layer();
        let c = store.create_layer();

        store.add_child(parent, a);
        store.add_child(parent, c);
        store.insert_before(b, c);

        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, vec![a, b, c]);
    }

    #[test]
    fn remove_from_parent_works() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let child = store.create_layer();

        store.add_child(parent, child);
        store.remove_from_parent(child);
        assert_eq!(store.parent(child), None);
        assert!(store.children(parent).next().is_none());
    }

    #[test]
    fn reflection_links_are_symmetric() {
        let mut store = LayerStore::new();
        let source = store.create_layer();
        let mirror = store.create_layer();

        store.set_reflection(source, Some(mirror));
        assert_eq!(store.reflection(source), Some(mirror));
        assert_eq!(store.reflection_source(mirror), Some(source));

        store.set_reflection(source, None);
        assert_eq!(store.reflection(source), None);
        assert_eq!(store.reflection_source(mirror), None);
    }

    #[test]
    fn style_change_requires_hierarchy_update() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        let _ = store.take_changes();

        store.set_style(
            id,
            LayerStyle {
                has_3d_transform: true,
                has_transform: true,
                ..LayerStyle::default()
            },
        );
        let changes = store.take_changes();
        assert!(changes.styles.contains(&id.idx));
        assert!(changes.needs_hierarchy_update());
    }

    #[test]
    fn geometry_change_alone_skips_hierarchy_update() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        let _ = store.take_changes();

        store.set_offset(id, Vec2::new(10.0, 0.0));
        let changes = store.take_changes();
        assert!(changes.geometry.contains(&id.idx));
        assert!(!changes.needs_hierarchy_update());
    }

    #[test]
    fn destroy_reports_removed() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        let _ = store.take_changes();

        store.destroy_layer(id);
        let changes = store.take_changes();
        assert!(changes.removed.contains(&id.idx));
        assert!(changes.needs_hierarchy_update());
    }

    #[test]
    #[should_panic(expected = "cannot destroy layer with children")]
    fn destroy_with_children_panics() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let child = store.create_layer();
        store.add_child(parent, child);
        store.destroy_layer(parent);
    }

    #[test]
    #[should_panic(expected = "cannot destroy layer with a reflection link")]
    fn destroy_with_reflection_panics() {
        let mut store = LayerStore::new();
        let source = store.create_layer();
        let mirror = store.create_layer();
        store.set_reflection(source, Some(mirror));
        store.destroy_layer(mirror);
    }

    #[test]
    #[should_panic(expected = "stale LayerId")]
    fn destroyed_handle_panics_on_get_style() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        store.destroy_layer(id);
        let _ = store.style(id);
    }

    #[test]
    #[should_panic(expected = "stale LayerId")]
    fn destroyed_handle_panics_on_add_child() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let id = store.create_layer();
        store.destroy_layer(id);
        store.add_child(root, id);
    }
}
