// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Flatscan.

use thiserror::Error;

/// Top-level error type for all Flatscan operations.
///
/// A scan that finds no document is not an error: it produces a successful
/// result with `did_detect == false`. Only the variants below cross the
/// pipeline boundary.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Pipeline failures --
    #[error("failed to decode input image: {0}")]
    InputDecode(String),

    #[error("page render failed: {0}")]
    PageRender(String),

    #[error("imaging backend unavailable: {0}")]
    BackendUnavailable(String),

    // -- Input validation --
    #[error("unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("invalid scan configuration: {0}")]
    InvalidConfig(String),

    // -- Output --
    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("scan worker failed: {0}")]
    Worker(String),

    // -- Collaborators --
    #[error("blob upload failed: {0}")]
    Upload(String),

    #[error("metadata store error: {0}")]
    Metadata(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScanError {
    /// Whether this is one of the hard failures the pipeline itself can raise
    /// (undecodable input, unrenderable page, backend not ready).
    pub fn is_fatal_pipeline_error(&self) -> bool {
        matches!(
            self,
            Self::InputDecode(_) | Self::PageRender(_) | Self::BackendUnavailable(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;
