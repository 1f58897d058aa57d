// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per
//! event to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use lamina_core::compositor::UpdateKind;
use lamina_core::layer::IndirectReason;
use lamina_core::trace::{
    DemotionEvent, ModeChangeEvent, PromotionEvent, TraceSink, UpdateBeginEvent, UpdateSummary,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

fn kind_name(kind: UpdateKind) -> &'static str {
    match kind {
        UpdateKind::AfterStyleChange => "style",
        UpdateKind::AfterLayout => "layout",
        UpdateKind::OnScroll => "scroll",
        UpdateKind::OnCompositedScroll => "composited-scroll",
    }
}

fn indirect_name(reason: IndirectReason) -> &'static str {
    match reason {
        IndirectReason::None => "none",
        IndirectReason::Overlap => "overlap",
        IndirectReason::Stacking => "stacking",
        IndirectReason::BackgroundLayer => "background-layer",
        IndirectReason::GraphicalEffect => "graphical-effect",
        IndirectReason::Perspective => "perspective",
        IndirectReason::Preserve3d => "preserve-3d",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_update_begin(&mut self, e: &UpdateBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[update] index={} kind={} hierarchy={}",
            e.update_index,
            kind_name(e.kind),
            e.hierarchy_update,
        );
    }

    fn on_promotion(&mut self, e: &PromotionEvent) {
        let _ = writeln!(
            self.writer,
            "[promote] layer={} direct={} indirect={}",
            e.layer_index,
            e.direct,
            indirect_name(e.indirect_reason),
        );
    }

    fn on_demotion(&mut self, e: &DemotionEvent) {
        let _ = writeln!(self.writer, "[demote] layer={}", e.layer_index);
    }

    fn on_mode_change(&mut self, e: &ModeChangeEvent) {
        let _ = writeln!(self.writer, "[mode] compositing={}", e.compositing);
    }

    fn on_update_summary(&mut self, s: &UpdateSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] index={} kind={} layers={} composited={} hierarchy={}",
            s.update_index,
            kind_name(s.kind),
            s.total_layers,
            s.composited_layers,
            s.hierarchy_updated,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_print_promotion() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_promotion(&PromotionEvent {
            layer_index: 4,
            direct: false,
            indirect_reason: IndirectReason::Overlap,
        });
        let output = String::from_utf8(sink.writer).unwrap();
        assert!(output.contains("[promote]"), "got: {output}");
        assert!(output.contains("layer=4"), "got: {output}");
        assert!(output.contains("indirect=overlap"), "got: {output}");
    }

    #[test]
    fn pretty_print_summary() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_update_summary(&UpdateSummary {
            update_index: 2,
            kind: UpdateKind::AfterLayout,
            total_layers: 10,
            composited_layers: 3,
            hierarchy_updated: true,
        });
        let output = String::from_utf8(sink.writer).unwrap();
        assert!(output.contains("kind=layout"), "got: {output}");
        assert!(output.contains("composited=3"), "got: {output}");
    }
}
