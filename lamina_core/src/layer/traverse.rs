// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec::Vec;

use super::id::{INVALID, LayerId};
use super::store::LayerStore;
use super::style::PaintClass;

/// An iterator over the direct children of a layer.
///
/// Created by [`LayerStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a LayerStore,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a LayerStore, first: u32) -> Self {
        Self {
            store,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = LayerId;

    fn next(&mut self) -> Option<LayerId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.next_sibling[idx as usize];
        Some(self.store.id_at(idx))
    }
}

/// A layer's children partitioned into paint order: negative z-order first,
/// then normal flow, then positive z-order.
///
/// Sibling order within each list is insertion order. Paint-order classes are
/// honored only when the layer establishes a stacking context; otherwise all
/// children are normal flow, matching how z-index is resolved against the
/// nearest stacking context rather than the immediate parent.
#[derive(Clone, Debug, Default)]
pub struct PaintOrderChildren {
    /// Children painting behind the layer's own content.
    pub negative_z: Vec<u32>,
    /// Normal-flow children.
    pub normal_flow: Vec<u32>,
    /// Children painting above normal-flow content.
    pub positive_z: Vec<u32>,
}

impl PaintOrderChildren {
    /// Iterates all children in paint order.
    pub fn in_paint_order(&self) -> impl Iterator<Item = u32> + '_ {
        self.negative_z
            .iter()
            .chain(self.normal_flow.iter())
            .chain(self.positive_z.iter())
            .copied()
    }
}

impl LayerStore {
    /// Partitions the direct children of `id` into paint-order lists.
    #[must_use]
    pub fn paint_order_children(&self, id: LayerId) -> PaintOrderChildren {
        self.validate(id);
        self.paint_lists_at(id.idx)
    }

    pub(crate) fn paint_lists_at(&self, idx: u32) -> PaintOrderChildren {
        let mut lists = PaintOrderChildren::default();
        let is_stacking_context = self.style[idx as usize].establishes_stacking_context;
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            if is_stacking_context {
                match self.paint_class[child as usize] {
                    PaintClass::NegativeZ => lists.negative_z.push(child),
                    PaintClass::NormalFlow => lists.normal_flow.push(child),
                    PaintClass::PositiveZ => lists.positive_z.push(child),
                }
            } else {
                lists.normal_flow.push(child);
            }
            child = self.next_sibling[child as usize];
        }
        lists
    }
}
