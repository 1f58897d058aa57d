// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Lamina uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! decide how much work a compositing update has to do. Each channel
//! represents an independent category of change:
//!
//! - **[`STYLE`]** — style flags, content kind, paint class, or reflection
//!   links changed. Any dirt here (or in [`TOPOLOGY`]) forces the full
//!   two-pass hierarchy update: promotion decisions may flip, so the
//!   requirements pass and the tree rebuild both run.
//!
//! - **[`GEOMETRY`]** — offsets or bounds changed. When only this channel is
//!   dirty, the update takes the cheap path: surface geometry is refreshed
//!   in place without re-deciding which layers composite. (An overlap-driven
//!   promotion that a move would cause is picked up by the next hierarchy
//!   update; callers that need it immediately request one explicitly.)
//!
//! - **[`TOPOLOGY`]** — add/remove child, create/destroy layer. Treated like
//!   [`STYLE`]: the hierarchy must be re-decided.
//!
//! All channels are drained together by
//! [`LayerStore::take_changes`](crate::layer::LayerStore::take_changes),
//! which the [`Compositor`](crate::compositor::Compositor) calls at the start
//! of every update.

use understory_dirty::Channel;

/// Style, content, paint class, or reflection changed — the compositing
/// hierarchy must be re-decided.
pub const STYLE: Channel = Channel::new(0);

/// Offset or bounds changed — surface geometry needs refreshing.
pub const GEOMETRY: Channel = Channel::new(1);

/// Tree topology changed — the compositing hierarchy must be re-decided.
pub const TOPOLOGY: Channel = Channel::new(2);
