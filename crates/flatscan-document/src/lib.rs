// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// flatscan-document — Document detection and rectification for Flatscan.
//
// Provides corner geometry, contour detection and validation, the perspective
// warp engine, the scan orchestrator, first-page PDF rendering, and the
// imaging backend handle that scopes every transient buffer.

pub mod backend;
pub mod geometry;
pub mod image;
pub mod pdf;
pub mod scan;

// Re-export the primary structs so callers can use `flatscan_document::DocumentScanner` etc.
pub use backend::{BackendState, ImagingBackend, Scoped};
pub use pdf::render::{PageRasterizer, PdfPageRasterizer};
pub use scan::pipeline::DocumentScanner;
