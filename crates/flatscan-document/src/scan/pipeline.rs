// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document scanner — decodes or renders the input, finds the page
// quadrilateral, rectifies and enhances it, or falls back to the original.
//
// ## Stages
//
//   START -> PREPROCESSED -> CANDIDATES_FOUND -> BEST_SELECTED -> WARPED
//         -> ENHANCED -> DONE
//
// with FALLBACK_DONE reachable from CANDIDATES_FOUND (nothing usable) and
// from WARPED (perspective solve failed). Falling back is a successful run.

use std::sync::Arc;

use flatscan_core::ScanConfig;
use flatscan_core::error::Result;
use flatscan_core::types::{FallbackReason, MediaType, PipelineResult};
use image::DynamicImage;
use tracing::{debug, info, instrument, warn};

use crate::backend::ImagingBackend;
use crate::geometry::{CornerSet, compute_output_size, sort_corners};
use crate::image::{decode_image, encode_jpeg, encode_png};
use crate::pdf::render::{PageRasterizer, PdfPageRasterizer};
use crate::scan::contour::{Contour, ContourValidator};
use crate::scan::detect::detect_candidate_contours;
use crate::scan::enhance::enhance_for_readability;
use crate::scan::warp::apply_perspective_warp;

/// Turns a photographed or scanned page into a flat, readable image.
///
/// Holds no per-scan state: a single scanner may be cloned and shared
/// across threads, and every call is independent.
#[derive(Clone)]
pub struct DocumentScanner {
    backend: Arc<ImagingBackend>,
    config: ScanConfig,
    rasterizer: Arc<dyn PageRasterizer>,
}

impl DocumentScanner {
    // -- Construction ---------------------------------------------------------

    /// Create a scanner with the default configuration and the built-in
    /// PDF page renderer.
    pub fn new(backend: Arc<ImagingBackend>) -> Self {
        Self {
            backend,
            config: ScanConfig::default(),
            rasterizer: Arc::new(PdfPageRasterizer::default()),
        }
    }

    /// Replace the configuration after validating it.
    pub fn with_config(mut self, config: ScanConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Replace the page renderer used for paginated input.
    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn PageRasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    // -- Accessors ------------------------------------------------------------

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn backend(&self) -> &Arc<ImagingBackend> {
        &self.backend
    }

    // -- Entry points ---------------------------------------------------------

    /// Scan an encoded input of the given media type.
    ///
    /// Images are decoded directly; paginated documents have their configured
    /// page rendered first. Only decode, render, and backend failures are
    /// errors. Not finding a document is reported through
    /// [`PipelineResult::did_detect`].
    #[instrument(skip(self, data), fields(data_len = data.len(), ?media))]
    pub fn scan(&self, data: &[u8], media: MediaType) -> Result<PipelineResult> {
        self.backend.ensure_ready()?;

        let source = if media.is_paginated() {
            self.rasterizer.render_page(
                data,
                self.config.page_number,
                self.config.page_render_scale,
            )?
        } else {
            decode_image(data)?
        };
        let source = self.backend.scoped(source);

        self.scan_raster(&source)
    }

    /// Scan PNG or JPEG bytes.
    pub fn scan_image_bytes(&self, data: &[u8]) -> Result<PipelineResult> {
        self.backend.ensure_ready()?;
        let source = self.backend.scoped(decode_image(data)?);
        self.scan_raster(&source)
    }

    /// Render the configured page of a PDF and scan it.
    pub fn scan_pdf(&self, data: &[u8]) -> Result<PipelineResult> {
        self.scan(data, MediaType::Pdf)
    }

    /// Run detection and rectification on an already decoded raster.
    #[instrument(skip_all, fields(width = source.width(), height = source.height()))]
    pub fn scan_raster(&self, source: &DynamicImage) -> Result<PipelineResult> {
        self.backend.ensure_ready()?;

        let image_area = f64::from(source.width()) * f64::from(source.height());
        debug!(stage = "PREPROCESSED", image_area, "Input ready");

        let candidates = self.backend.scoped(detect_candidate_contours(
            &self.backend,
            source,
            &self.config,
        ));
        debug!(
            stage = "CANDIDATES_FOUND",
            count = candidates.len(),
            "Candidate contours extracted"
        );

        let corners = match self.select_document_quad(&candidates, image_area) {
            Ok(corners) => corners,
            Err(reason) => return self.fallback(source, reason),
        };
        drop(candidates);

        self.rectify(source, &corners)
    }

    // -- Stages ---------------------------------------------------------------

    /// Pick the largest validated candidate and extract its four corners.
    ///
    /// Ties keep the first candidate in detector order.
    fn select_document_quad(
        &self,
        candidates: &[Contour],
        image_area: f64,
    ) -> std::result::Result<CornerSet, FallbackReason> {
        let validator = ContourValidator::from_config(&self.config);

        let mut best: Option<&Contour> = None;
        for candidate in candidates {
            if validator.is_valid_document(candidate, image_area)
                && best.is_none_or(|current| candidate.area() > current.area())
            {
                best = Some(candidate);
            }
        }

        let Some(best) = best else {
            return Err(FallbackReason::NoValidCandidate);
        };
        if best.area() <= self.config.min_area_ratio * image_area {
            return Err(FallbackReason::BelowMinimumArea);
        }

        // Simplified again here, separately from validation.
        best.quad_corners(self.config.approx_epsilon_ratio)
            .ok_or(FallbackReason::NoValidCandidate)
    }

    /// Warp the quadrilateral to a rectangle, enhance it, and encode as JPEG.
    pub(crate) fn rectify(
        &self,
        source: &DynamicImage,
        corners: &CornerSet,
    ) -> Result<PipelineResult> {
        let sorted = sort_corners(corners);
        let size = compute_output_size(&sorted);
        debug!(
            stage = "BEST_SELECTED",
            corners = ?sorted,
            width = size.width,
            height = size.height,
            "Document quadrilateral selected"
        );

        let rgba = self.backend.scoped(source.to_rgba8());
        let Some(warped) = apply_perspective_warp(&rgba, &sorted, size.width, size.height) else {
            return self.fallback(source, FallbackReason::WarpUnavailable);
        };
        let warped = self.backend.scoped(warped);
        drop(rgba);
        debug!(stage = "WARPED", "Perspective corrected");

        let enhanced = self.backend.scoped(DynamicImage::ImageRgb8(enhance_for_readability(
            &warped,
            self.config.threshold_block_size,
            self.config.threshold_offset,
        )));
        debug!(stage = "ENHANCED", "Readability enhancement applied");

        let encoded = encode_jpeg(&enhanced, self.config.jpeg_quality)?;
        info!(
            stage = "DONE",
            width = encoded.width,
            height = encoded.height,
            bytes = encoded.bytes.len(),
            "Document detected and rectified"
        );
        Ok(PipelineResult::detected(encoded))
    }

    /// Return the untouched source, losslessly encoded.
    fn fallback(&self, source: &DynamicImage, reason: FallbackReason) -> Result<PipelineResult> {
        warn!(stage = "FALLBACK_DONE", ?reason, "No document rectified; using original image");
        let encoded = encode_png(source)?;
        Ok(PipelineResult::fallback(encoded, reason))
    }
}

// -- Tests --------------------------------------------------------------------
