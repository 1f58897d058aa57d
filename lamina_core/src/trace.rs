// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for compositing updates.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! compositor calls as an update progresses. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.

use crate::compositor::UpdateKind;
use crate::layer::IndirectReason;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted at the start of a compositing update that was not skipped.
#[derive(Clone, Copy, Debug)]
pub struct UpdateBeginEvent {
    /// Monotonic update counter.
    pub update_index: u64,
    /// What kind of change triggered the update.
    pub kind: UpdateKind,
    /// Whether this update will re-decide the compositing hierarchy, as
    /// opposed to refreshing geometry only.
    pub hierarchy_update: bool,
}

/// Emitted when a layer gains backing.
#[derive(Clone, Copy, Debug)]
pub struct PromotionEvent {
    /// Slot index of the promoted layer.
    pub layer_index: u32,
    /// Whether the layer's own content demanded compositing.
    pub direct: bool,
    /// The indirect reason, when not direct.
    pub indirect_reason: IndirectReason,
}

/// Emitted when a layer loses backing.
#[derive(Clone, Copy, Debug)]
pub struct DemotionEvent {
    /// Slot index of the demoted layer.
    pub layer_index: u32,
}

/// Emitted when the frame enters or leaves compositing mode.
#[derive(Clone, Copy, Debug)]
pub struct ModeChangeEvent {
    /// Whether compositing mode is now active.
    pub compositing: bool,
}

/// Per-update totals, emitted once at the end of an update.
#[derive(Clone, Copy, Debug)]
pub struct UpdateSummary {
    /// Monotonic update counter.
    pub update_index: u64,
    /// What kind of change triggered the update.
    pub kind: UpdateKind,
    /// Live layers in the store.
    pub total_layers: u32,
    /// Layers with backing after the update.
    pub composited_layers: u32,
    /// Whether the hierarchy was re-decided.
    pub hierarchy_updated: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from compositing updates.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the start of an update.
    fn on_update_begin(&mut self, e: &UpdateBeginEvent) {
        _ = e;
    }

    /// Called when a layer gains backing.
    fn on_promotion(&mut self, e: &PromotionEvent) {
        _ = e;
    }

    /// Called when a layer loses backing.
    fn on_demotion(&mut self, e: &DemotionEvent) {
        _ = e;
    }

    /// Called when compositing mode flips.
    fn on_mode_change(&mut self, e: &ModeChangeEvent) {
        _ = e;
    }

    /// Called with per-update totals.
    fn on_update_summary(&mut self, s: &UpdateSummary) {
        _ = s;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits an [`UpdateBeginEvent`].
    #[inline]
    pub fn update_begin(&mut self, e: &UpdateBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_update_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PromotionEvent`].
    #[inline]
    pub fn promotion(&mut self, e: &PromotionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_promotion(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DemotionEvent`].
    #[inline]
    pub fn demotion(&mut self, e: &DemotionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_demotion(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ModeChangeEvent`].
    #[inline]
    pub fn mode_change(&mut self, e: &ModeChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_mode_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`UpdateSummary`].
    #[inline]
    pub fn update_summary(&mut self, s: &UpdateSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_update_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}
