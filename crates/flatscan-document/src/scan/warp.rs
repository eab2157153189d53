// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective warp engine — fit the 4-point projection and resample the
// source quadrilateral onto an axis-aligned rectangle.

use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, instrument, warn};

use crate::geometry::{CornerSet, has_collinear_triple};

/// Fill colour for output pixels that map outside the source.
const OUTSIDE_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// The projection taking the cyclically ordered corners onto
/// `(0,0) (W,0) (W,H) (0,H)`.
///
/// Returns `None` when three corners are collinear or the control points
/// admit no invertible transform.
pub fn document_projection(sorted: &CornerSet, width: u32, height: u32) -> Option<Projection> {
    if has_collinear_triple(sorted) {
        return None;
    }
    let (w, h) = (width as f32, height as f32);
    let from = sorted.map(|c| (c.x as f32, c.y as f32));
    let to = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];
    Projection::from_control_points(from, to)
}

/// Resample the quadrilateral `sorted` of `source` into a
/// `width x height` rectangle with bilinear interpolation.
///
/// Corners map, in their cyclic order, to `(0,0) (W,0) (W,H) (0,H)`.
/// Pixels that fall outside the source are white. Returns `None` on any
/// numerical failure so the caller can fall back.
#[instrument(skip(source, sorted))]
pub fn apply_perspective_warp(
    source: &RgbaImage,
    sorted: &CornerSet,
    width: u32,
    height: u32,
) -> Option<RgbaImage> {
    if width == 0 || height == 0 || source.width() == 0 || source.height() == 0 {
        warn!("Empty warp request");
        return None;
    }

    let Some(projection) = document_projection(sorted, width, height) else {
        warn!(corners = ?sorted, "Perspective solve is singular");
        return None;
    };

    let mut output = RgbaImage::new(width, height);
    warp_into(
        source,
        &projection,
        Interpolation::Bilinear,
        OUTSIDE_FILL,
        &mut output,
    );

    debug!(width, height, "Perspective warp applied");
    Some(output)
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use flatscan_core::types::Point2D;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn projection_maps_corners_onto_rectangle() {
        let src = [p(12.0, 8.0), p(180.0, 20.0), p(170.0, 140.0), p(5.0, 120.0)];
        let projection = document_projection(&src, 160, 120).expect("solvable");
        let targets = [(0.0, 0.0), (160.0, 0.0), (160.0, 120.0), (0.0, 120.0)];
        for (s, (tx, ty)) in src.iter().zip(targets) {
            let (x, y) = projection * (s.x as f32, s.y as f32);
            assert!((x - tx).abs() < 1e-2, "({x}, {y}) vs ({tx}, {ty})");
            assert!((y - ty).abs() < 1e-2, "({x}, {y}) vs ({tx}, {ty})");
        }
    }

    #[test]
    fn collinear_corners_have_no_projection() {
        let line = [p(0.0, 0.0), p(10.0, 10.0), p(20.0, 20.0), p(30.0, 30.0)];
        assert!(document_projection(&line, 20, 20).is_none());
    }

    #[test]
    fn collinear_corners_yield_no_warp() {
        let source = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 255]));
        let line = [p(0.0, 0.0), p(10.0, 10.0), p(20.0, 20.0), p(30.0, 30.0)];
        assert!(apply_perspective_warp(&source, &line, 20, 20).is_none());
    }

    #[test]
    fn coincident_corners_yield_no_warp() {
        let source = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 255]));
        let point = [p(7.0, 7.0); 4];
        assert!(apply_perspective_warp(&source, &point, 1, 1).is_none());
    }

    #[test]
    fn axis_aligned_crop_copies_interior() {
        let source = RgbaImage::from_fn(40, 30, |x, y| Rgba([(x * 5) as u8, (y * 7) as u8, 0, 255]));
        let corners = [p(10.0, 5.0), p(30.0, 5.0), p(30.0, 25.0), p(10.0, 25.0)];
        let out = apply_perspective_warp(&source, &corners, 20, 20).expect("warp");
        assert_eq!(out.dimensions(), (20, 20));
        for (x, y) in [(0, 0), (5, 9), (12, 3), (18, 18)] {
            assert_eq!(out.get_pixel(x, y), source.get_pixel(x + 10, y + 5));
        }
    }

    #[test]
    fn outside_source_is_white() {
        let source = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let corners = [p(-10.0, -10.0), p(20.0, -10.0), p(20.0, 20.0), p(-10.0, 20.0)];
        let out = apply_perspective_warp(&source, &corners, 30, 30).expect("warp");
        assert_eq!(*out.get_pixel(0, 0), OUTSIDE_FILL);
        assert_eq!(*out.get_pixel(29, 2), OUTSIDE_FILL);
        assert_eq!(*out.get_pixel(15, 15), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn zero_sized_output_rejected() {
        let source = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let corners = [p(0.0, 0.0), p(9.0, 0.0), p(9.0, 9.0), p(0.0, 9.0)];
        assert!(apply_perspective_warp(&source, &corners, 0, 5).is_none());
    }
}
