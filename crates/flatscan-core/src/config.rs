// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner configuration.

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Tunables for document detection, rectification, and output encoding.
///
/// The defaults are the values the detector was calibrated with; most
/// callers should never change them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Side of the square Gaussian kernel applied before edge work (odd).
    pub blur_kernel_size: u32,
    /// Neighbourhood side for adaptive thresholding (odd, >= 3).
    pub threshold_block_size: u32,
    /// Constant subtracted from the local weighted mean.
    pub threshold_offset: f32,
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Radius of the square closing element (1 = 3x3).
    pub closing_radius: u8,
    /// Accepted contour area as a fraction of the image area.
    pub min_area_ratio: f64,
    pub max_area_ratio: f64,
    /// Douglas-Peucker tolerance as a fraction of the contour perimeter.
    pub approx_epsilon_ratio: f64,
    /// JPEG quality (1-100) for rectified pages.
    pub jpeg_quality: u8,
    /// Render scale for paginated input.
    pub page_render_scale: f32,
    /// 1-based page rendered from paginated input.
    pub page_number: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            threshold_block_size: 11,
            threshold_offset: 2.0,
            canny_low: 50.0,
            canny_high: 150.0,
            closing_radius: 1,
            min_area_ratio: 0.10,
            max_area_ratio: 0.95,
            approx_epsilon_ratio: 0.02,
            jpeg_quality: 95,
            page_render_scale: 2.0,
            page_number: 1,
        }
    }
}

impl ScanConfig {
    /// Check the configuration for values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ScanError> {
        let reals = [
            ("threshold offset", f64::from(self.threshold_offset)),
            ("canny low threshold", f64::from(self.canny_low)),
            ("canny high threshold", f64::from(self.canny_high)),
            ("minimum area ratio", self.min_area_ratio),
            ("maximum area ratio", self.max_area_ratio),
            ("approximation tolerance", self.approx_epsilon_ratio),
            ("page render scale", f64::from(self.page_render_scale)),
        ];
        if let Some((name, value)) = reals.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ScanError::InvalidConfig(format!(
                "{name} must be finite, got {value}"
            )));
        }
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(ScanError::InvalidConfig(format!(
                "blur kernel size must be odd, got {}",
                self.blur_kernel_size
            )));
        }
        if self.threshold_block_size < 3 || self.threshold_block_size % 2 == 0 {
            return Err(ScanError::InvalidConfig(format!(
                "threshold block size must be odd and >= 3, got {}",
                self.threshold_block_size
            )));
        }
        if self.canny_low <= 0.0 {
            return Err(ScanError::InvalidConfig(format!(
                "canny low threshold must be positive, got {}",
                self.canny_low
            )));
        }
        if self.canny_low > self.canny_high {
            return Err(ScanError::InvalidConfig(format!(
                "canny low threshold {} exceeds high threshold {}",
                self.canny_low, self.canny_high
            )));
        }
        if !(0.0..=1.0).contains(&self.min_area_ratio)
            || !(0.0..=1.0).contains(&self.max_area_ratio)
            || self.min_area_ratio >= self.max_area_ratio
        {
            return Err(ScanError::InvalidConfig(format!(
                "area ratio bounds [{}, {}] are not a valid range",
                self.min_area_ratio, self.max_area_ratio
            )));
        }
        if self.approx_epsilon_ratio <= 0.0 {
            return Err(ScanError::InvalidConfig(
                "approximation tolerance must be positive".to_string(),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ScanError::InvalidConfig(format!(
                "jpeg quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }
        if self.page_render_scale <= 0.0 || self.page_number == 0 {
            return Err(ScanError::InvalidConfig(
                "page render scale must be positive and page numbers start at 1".to_string(),
            ));
        }
        Ok(())
    }
}
