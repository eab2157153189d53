// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — render a single page of a paginated document to a raster.

pub mod render;

pub use render::{PageRasterizer, PdfPageRasterizer};
