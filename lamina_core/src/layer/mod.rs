// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree data model.
//!
//! A *layer* is a node in the paint-order tree the compositing policy runs
//! over. Each layer has:
//!
//! - An identity ([`LayerId`]) — a generational handle that becomes stale when
//!   the layer is destroyed, preventing use-after-free bugs at the API level.
//! - Topology — parent, first-child, and sibling links forming an ordered
//!   tree, plus a [`PaintClass`] placing each child in its stacking context's
//!   paint order.
//! - **Local properties** set by the caller: [`style`](LayerStore::set_style),
//!   [`content`](LayerStore::set_content), [`offset`](LayerStore::set_offset),
//!   [`local_bounds`](LayerStore::set_local_bounds), and
//!   [`reflection`](LayerStore::set_reflection) links.
//! - **Computed properties** produced by compositing updates: the optional
//!   [`Backing`](crate::backing::Backing), the
//!   [`IndirectReason`], descendant flags, and the repaint container.
//!
//! Layers are stored in struct-of-arrays layout with index-based handles
//! for cache-friendly traversal.
//!
//! # Dirty tracking
//!
//! Property mutations automatically mark the corresponding dirty channel
//! (see [`dirty`](crate::dirty)):
//!
//! - **STYLE** — style, content, paint class, or reflection changed; the
//!   next update must re-decide which layers composite.
//! - **GEOMETRY** — offset or bounds changed; a geometry-only refresh
//!   suffices unless something else is also dirty.
//! - **TOPOLOGY** — structural changes (add/remove child, create/destroy
//!   layer).

mod id;
mod store;
mod style;
mod traverse;

pub use id::{INVALID, LayerId, SurfaceId};
pub use store::{IndirectReason, LayerStore, NotCompositedReason, TreeChanges};
pub use style::{
    ActiveAnimations, CanvasContext, ContentKind, LayerStyle, PaintClass, Position,
    TransformStyle,
};
pub use traverse::{Children, PaintOrderChildren};
