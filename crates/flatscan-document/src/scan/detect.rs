// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge/contour detector — turns a raster into a closed outline mask, fills
// the regions the outline encloses, and traces the borders of those regions.
//
// ## Pipeline
//
// 1. Convert to grayscale
// 2. Gaussian blur (5x5, default sigma)
// 3. Adaptive threshold (Gaussian-weighted, block 11, offset 2), inverted so
//    that local contrast is foreground
// 4. Canny edge detection (hysteresis 50 / 150)
// 5. OR the two masks together
// 6. Morphological closing with a 3x3 square
// 7. Keep the background regions of the closed mask that do not reach the
//    frame, grown by one pixel back over edge pixels the contrast mask
//    leaves as background
// 8. Trace contours, keep outer borders with no parent
//
// The contrast band of a bright page lies on the darker side of its border,
// so the enclosed regions end on the page's own boundary pixels.

use flatscan_core::ScanConfig;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::morphology::{close, dilate};
use imageproc::region_labelling::{Connectivity, connected_components};
use tracing::{debug, instrument};

use crate::backend::{ImagingBackend, Scoped};
use crate::scan::contour::Contour;
use crate::scan::enhance::{Polarity, adaptive_threshold, gaussian_blur};

/// The two binary masks edge detection produces.
#[derive(Debug)]
pub struct EdgeMasks {
    /// Inverted adaptive threshold: local contrast is foreground.
    pub contrast: Scoped<GrayImage>,
    /// Contrast OR Canny edges, morphologically closed.
    pub outline: Scoped<GrayImage>,
}

/// Build the contrast and closed outline masks for `source`.
///
/// Every intermediate raster is scoped to the backend ledger and released
/// before this returns; only the two masks escape, also scoped.
pub fn edge_mask(
    backend: &ImagingBackend,
    source: &DynamicImage,
    config: &ScanConfig,
) -> EdgeMasks {
    let gray = backend.scoped(source.to_luma8());
    let blurred = backend.scoped(gaussian_blur(&gray, config.blur_kernel_size));
    debug!(kernel = config.blur_kernel_size, "Applied Gaussian blur");

    let contrast = backend.scoped(adaptive_threshold(
        &blurred,
        config.threshold_block_size,
        config.threshold_offset,
        Polarity::Inverted,
    ));
    let mut combined = backend.scoped((*contrast).clone());
    let edges = backend.scoped(canny(&blurred, config.canny_low, config.canny_high));
    debug!(
        low = config.canny_low,
        high = config.canny_high,
        "Canny edge detection complete"
    );

    for (mask, edge) in combined.pixels_mut().zip(edges.pixels()) {
        mask.0[0] |= edge.0[0];
    }

    let outline = backend.scoped(close(&combined, Norm::LInf, config.closing_radius));
    EdgeMasks { contrast, outline }
}

/// Fill the background regions of the outline mask that do not touch the
/// image frame, then grow them one pixel over outline pixels that are not
/// part of the contrast band.
pub fn enclosed_regions(backend: &ImagingBackend, masks: &EdgeMasks) -> Scoped<GrayImage> {
    let (width, height) = masks.outline.dimensions();
    let open = backend.scoped(GrayImage::from_fn(width, height, |x, y| {
        Luma([if masks.outline.get_pixel(x, y).0[0] == 0 { 255 } else { 0 }])
    }));
    let labels = backend.scoped(connected_components(&*open, Connectivity::Four, Luma([0u8])));

    let max_label = labels.pixels().map(|p| p.0[0]).max().unwrap_or(0);
    let mut reaches_frame = vec![false; max_label as usize + 1];
    for (x, y, label) in labels.enumerate_pixels() {
        if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
            reaches_frame[label.0[0] as usize] = true;
        }
    }

    let enclosed = backend.scoped(GrayImage::from_fn(width, height, |x, y| {
        let label = labels.get_pixel(x, y).0[0];
        Luma([if label != 0 && !reaches_frame[label as usize] { 255 } else { 0 }])
    }));

    let mut grown = dilate(&enclosed, Norm::LInf, 1);
    for (pixel, contrast) in grown.pixels_mut().zip(masks.contrast.pixels()) {
        if contrast.0[0] != 0 {
            pixel.0[0] = 0;
        }
    }
    debug!(components = max_label, "Enclosed regions filled");
    backend.scoped(grown)
}

/// Extract the outer borders of the regions the edge mask encloses.
///
/// An empty list means no closed outline was found; that is not an error.
#[instrument(skip_all, fields(width = source.width(), height = source.height()))]
pub fn detect_candidate_contours(
    backend: &ImagingBackend,
    source: &DynamicImage,
    config: &ScanConfig,
) -> Vec<Contour> {
    let masks = edge_mask(backend, source, config);
    let regions = enclosed_regions(backend, &masks);
    drop(masks);

    let traced = backend.scoped(find_contours::<i32>(&regions));
    let candidates: Vec<Contour> = traced
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| Contour::new(c.points.clone()))
        .collect();

    debug!(
        traced = traced.len(),
        external = candidates.len(),
        "Contours extracted"
    );
    candidates
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba, RgbaImage};

    fn white_rect_on_dark(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |x, y| {
            if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
                Rgba([240, 240, 240, 255])
            } else {
                Rgba([30, 30, 30, 255])
            }
        }))
    }

    #[test]
    fn uniform_image_has_no_contours() {
        let backend = ImagingBackend::ready();
        let flat = DynamicImage::ImageLuma8(GrayImage::from_pixel(80, 60, Luma([0u8])));
        let contours = detect_candidate_contours(&backend, &flat, &ScanConfig::default());
        assert!(contours.is_empty());
        assert_eq!(backend.live_buffers(), 0);
    }

    fn largest(contours: &[Contour]) -> &Contour {
        contours
            .iter()
            .max_by(|a, b| a.area().total_cmp(&b.area()))
            .expect("at least one contour")
    }

    #[test]
    fn bright_rectangle_contour_lies_on_its_border() {
        let backend = ImagingBackend::ready();
        let img = white_rect_on_dark(200, 150, 40, 30, 160, 120);
        let contours = detect_candidate_contours(&backend, &img, &ScanConfig::default());
        let page = largest(&contours);

        // Pixels 40..160 x 30..120: boundary pixel centres span 119 x 89.
        let traced = 119.0 * 89.0;
        assert!((page.area() - traced).abs() <= traced * 0.03, "area {}", page.area());

        let corners = page.quad_corners(0.02).expect("quadrilateral");
        for (x, y) in [(40.0, 30.0), (159.0, 30.0), (159.0, 119.0), (40.0, 119.0)] {
            assert!(
                corners.iter().any(|c| (c.x - x).abs() <= 1.0 && (c.y - y).abs() <= 1.0),
                "no corner near ({x}, {y}) in {corners:?}"
            );
        }
        assert_eq!(backend.live_buffers(), 0);
    }

    #[test]
    fn dark_frame_encloses_nothing() {
        let backend = ImagingBackend::ready();
        let img = white_rect_on_dark(64, 48, 0, 0, 0, 0);
        let masks = edge_mask(&backend, &img, &ScanConfig::default());
        let regions = enclosed_regions(&backend, &masks);
        assert!(regions.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn masks_are_binary() {
        let backend = ImagingBackend::ready();
        let img = white_rect_on_dark(64, 48, 10, 10, 50, 40);
        let masks = edge_mask(&backend, &img, &ScanConfig::default());
        assert!(masks.outline.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert!(masks.contrast.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert_eq!(backend.live_buffers(), 2);

        let regions = enclosed_regions(&backend, &masks);
        assert_eq!(regions.get_pixel(30, 25).0[0], 255);
        assert_eq!(regions.get_pixel(2, 2).0[0], 0);
        drop(regions);
        drop(masks);
        assert_eq!(backend.live_buffers(), 0);
    }
}
