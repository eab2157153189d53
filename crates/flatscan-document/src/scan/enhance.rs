// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan filters — Gaussian smoothing, Gaussian-weighted adaptive thresholding,
// and the readability enhancement applied to rectified pages.

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use imageproc::filter::separable_filter_equal;
use tracing::{debug, instrument};

/// Which side of the local threshold becomes foreground (255).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Pixels brighter than `local mean - offset` become white. Text on a
    /// page ends up black on white.
    Binary,
    /// Pixels at or below `local mean - offset` become white, so local
    /// contrast features are the foreground of the mask.
    Inverted,
}

/// Build a normalised 1-D Gaussian kernel of odd length `size`.
///
/// A non-positive `sigma` is derived from the size as
/// `0.3 * ((size - 1) / 2 - 1) + 0.8`, the usual convention for "default
/// sigma" (1.1 for a 5-tap kernel, 2.0 for an 11-tap kernel).
pub fn gaussian_kernel(size: u32, sigma: f64) -> Vec<f32> {
    let size = size.max(1) | 1;
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((f64::from(size) - 1.0) * 0.5 - 1.0) + 0.8
    };
    let radius = i64::from(size / 2);
    let weights: Vec<f64> = (-radius..=radius)
        .map(|i| {
            let d = i as f64;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| (w / sum) as f32).collect()
}

/// Gaussian smoothing with a square `kernel_size` kernel and default sigma.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn gaussian_blur(gray: &GrayImage, kernel_size: u32) -> GrayImage {
    if gray.width() == 0 || gray.height() == 0 {
        return gray.clone();
    }
    separable_filter_equal(gray, &gaussian_kernel(kernel_size, 0.0))
}

/// Gaussian-weighted adaptive thresholding.
///
/// For each pixel the threshold is the Gaussian-weighted mean of its
/// `block_size x block_size` neighbourhood minus `offset`; edges replicate
/// the border pixels.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn adaptive_threshold(
    gray: &GrayImage,
    block_size: u32,
    offset: f32,
    polarity: Polarity,
) -> GrayImage {
    if gray.width() == 0 || gray.height() == 0 {
        return gray.clone();
    }
    let means = separable_filter_equal(gray, &gaussian_kernel(block_size, 0.0));

    let raw = gray
        .as_raw()
        .iter()
        .zip(means.as_raw())
        .map(|(&value, &mean)| {
            let brighter = f32::from(value) > f32::from(mean) - offset;
            match (polarity, brighter) {
                (Polarity::Binary, true) | (Polarity::Inverted, false) => 255u8,
                _ => 0u8,
            }
        })
        .collect();

    debug!(block_size, offset, ?polarity, "Adaptive threshold complete");
    GrayImage::from_raw(gray.width(), gray.height(), raw).unwrap_or_else(|| gray.clone())
}

/// Readability pass for a rectified page: grayscale, adaptive threshold
/// (text black on white), back to a display colour space.
#[instrument(skip(warped), fields(width = warped.width(), height = warped.height()))]
pub fn enhance_for_readability(warped: &RgbaImage, block_size: u32, offset: f32) -> RgbImage {
    let gray = image::imageops::grayscale(warped);
    let binary = adaptive_threshold(&gray, block_size, offset, Polarity::Binary);
    DynamicImage::ImageLuma8(binary).to_rgb8()
}

// -- Tests --------------------------------------------------------------------
