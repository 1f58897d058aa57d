// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree and compositing policy for hardware-composited rendering.
//!
//! `lamina_core` decides which layers of a paint-order tree get their own
//! platform surfaces, and keeps the platform's surface tree synchronized
//! with those decisions. It is `no_std` compatible (with `alloc`) and uses
//! array-based struct-of-arrays storage with index handles for
//! cache-friendly traversal.
//!
//! # Architecture
//!
//! The crate is organized around an embedder-driven update loop:
//!
//! ```text
//!   Embedder (style / layout / scroll)
//!       │  set_style, set_offset, …
//!       ▼
//!   LayerStore ──► Compositor::update(kind)
//!                        │
//!            ┌───────────┴───────────┐
//!            ▼                       ▼
//!   requirements pass          rebuild pass
//!   (overlap map, promote/     (surface config, geometry,
//!    demote backing)            child lists in paint order)
//!            │                       │
//!            └───────────┬───────────┘
//!                        ▼
//!            SurfaceHost / ScrollCoordinator
//! ```
//!
//! **[`layer`]** — Struct-of-arrays layer tree with generational handles.
//! Style, content, and geometry facts are set by the caller; composited
//! status, promotion reasons, and repaint containers are computed by
//! updates.
//!
//! **[`compositor`]** — The update driver: direct and indirect promotion
//! rules, the two-pass requirements/rebuild algorithm, the root scaffold,
//! and frame-level scrolling and overflow controls.
//!
//! **[`backing`]** — The surface bundle a composited layer owns: primary
//! surface plus optional foreground, clipping, and scrolling surfaces.
//!
//! **[`overlap`]** — The overlap map the requirements pass queries to keep
//! paint order correct once anything composites.
//!
//! **[`geometry`]** — Offset accumulation into absolute document
//! coordinates during tree walks.
//!
//! **[`host`]** — The [`SurfaceHost`](host::SurfaceHost) and
//! [`ScrollCoordinator`](host::ScrollCoordinator) traits platform crates
//! implement.
//!
//! **[`config`]** — Compositing triggers and per-update viewport facts.
//!
//! **[`dirty`]** — Multi-channel dirty tracking via `understory_dirty`.
//! Property mutations automatically mark the appropriate channel; updates
//! drain it to choose between a full hierarchy pass and a geometry-only
//! refresh.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types
//! for update instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backing;
pub mod compositor;
pub mod config;
pub mod dirty;
pub mod geometry;
pub mod host;
pub mod layer;
pub mod overlap;
pub mod trace;

#[cfg(test)]
mod testing;
