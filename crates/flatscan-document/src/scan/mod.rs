// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — edge/contour detection, candidate validation, perspective
// rectification, and readability enhancement.

pub mod contour;
pub mod detect;
pub mod enhance;
pub mod pipeline;
pub mod warp;

pub use contour::{Contour, ContourValidator, is_valid_document};
pub use detect::detect_candidate_contours;
pub use pipeline::DocumentScanner;
pub use warp::{apply_perspective_warp, document_projection};
