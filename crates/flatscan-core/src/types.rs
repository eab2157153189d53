// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Flatscan document scanner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point in image pixel space (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel size of a rectified page. Both sides are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDimensions {
    pub width: u32,
    pub height: u32,
}

/// Supported input media types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Png,
    Jpeg,
    /// Paginated document; only page 1 is ever scanned.
    Pdf,
}

impl MediaType {
    /// Canonical MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Pdf => "application/pdf",
        }
    }

    /// Parse a MIME type as sent by a browser or file picker.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "application/pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Infer media type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Whether the input is a paginated document that needs rendering first.
    pub fn is_paginated(&self) -> bool {
        matches!(self, Self::Pdf)
    }
}

/// Compressed encoding of a pipeline output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageEncoding {
    /// Detected, rectified, enhanced page.
    Jpeg,
    /// Fallback output (the original raster, lossless).
    Png,
}

impl ImageEncoding {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// An encoded image blob together with its pixel size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub encoding: ImageEncoding,
    pub width: u32,
    pub height: u32,
}

/// Why the pipeline returned the original image instead of a rectified page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackReason {
    /// No candidate contour passed validation.
    NoValidCandidate,
    /// The winning candidate did not exceed the minimum area ratio.
    BelowMinimumArea,
    /// The perspective solve was singular or the warp could not be applied.
    WarpUnavailable,
}

/// The single artifact produced per pipeline invocation.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub image: EncodedImage,
    pub did_detect: bool,
    /// Set exactly when `did_detect` is false.
    pub fallback: Option<FallbackReason>,
}

impl PipelineResult {
    pub fn detected(image: EncodedImage) -> Self {
        Self {
            image,
            did_detect: true,
            fallback: None,
        }
    }

    pub fn fallback(image: EncodedImage, reason: FallbackReason) -> Self {
        Self {
            image,
            did_detect: false,
            fallback: Some(reason),
        }
    }
}

/// Unique identifier for a stored scan record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gallery status of a stored scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    /// A document was detected and the rectified page was stored.
    Processed,
    /// Detection failed; the original image was stored as the result.
    Original,
}

impl ScanStatus {
    pub fn from_detection(did_detect: bool) -> Self {
        if did_detect {
            Self::Processed
        } else {
            Self::Original
        }
    }
}

/// Which records a gallery listing includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryFilter {
    #[default]
    All,
    /// Only scans where a document was detected.
    Processed,
    /// Only scans stored as the original image.
    Original,
}

impl GalleryFilter {
    pub fn matches(&self, record: &ScanRecord) -> bool {
        match self {
            Self::All => true,
            Self::Processed => record.did_detect,
            Self::Original => !record.did_detect,
        }
    }
}

/// Metadata kept for every submitted scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: RecordId,
    /// Opaque identifier of the submitting user.
    pub owner_id: String,
    pub filename: String,
    pub original_url: String,
    pub processed_url: String,
    pub status: ScanStatus,
    pub did_detect: bool,
    /// SHA-256 hex digest of the original upload.
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
}
