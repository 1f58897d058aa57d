// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and layer-tree dumps for lamina diagnostics.
//!
//! This crate provides development-time views of a compositing frame:
//!
//! - [`pretty::PrettyPrintSink`] — a
//!   [`TraceSink`](lamina_core::trace::TraceSink) with human-readable
//!   one-line-per-event output.
//! - [`tree::layer_tree_as_text`] — an indented text dump of a layer tree
//!   annotated with compositing decisions.
//! - [`json::layer_tree_as_json`] — the same tree as structured JSON for
//!   tooling.

pub mod json;
pub mod pretty;
pub mod tree;

#[cfg(test)]
mod support;
