// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner geometry — ordering, distances, output sizing, and the degeneracy
// check used before solving a perspective transform.

use flatscan_core::types::{OutputDimensions, Point2D};

/// Four corners of a candidate page, in cyclic order once sorted.
pub type CornerSet = [Point2D; 4];

/// Order four corners by their angle around the centroid, ascending.
///
/// In image space (y down) this is a clockwise walk. The starting corner is
/// whichever has the smallest `atan2` angle, so the walk is cyclic but not
/// anchored to the physical top-left corner. Equal angles keep input order.
pub fn sort_corners(points: &CornerSet) -> CornerSet {
    let cx = points.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / 4.0;

    let mut sorted = *points;
    sorted.sort_by(|a, b| {
        let angle_a = (a.y - cy).atan2(a.x - cx);
        let angle_b = (b.y - cy).atan2(b.x - cx);
        angle_a.total_cmp(&angle_b)
    });
    sorted
}

/// Standard L2 distance.
pub fn euclidean_distance(p1: Point2D, p2: Point2D) -> f64 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

/// Output size from sorted corners: the longer of each pair of opposite
/// edges, rounded, never below 1.
pub fn compute_output_size(sorted: &CornerSet) -> OutputDimensions {
    let top = euclidean_distance(sorted[0], sorted[1]);
    let bottom = euclidean_distance(sorted[2], sorted[3]);
    let left = euclidean_distance(sorted[0], sorted[3]);
    let right = euclidean_distance(sorted[1], sorted[2]);

    OutputDimensions {
        width: round_side(top.max(bottom)),
        height: round_side(left.max(right)),
    }
}

fn round_side(length: f64) -> u32 {
    let rounded = length.round();
    if rounded.is_finite() && rounded >= 1.0 {
        rounded.min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}

/// Whether any three of the four corners are (nearly) collinear.
///
/// Such a corner set cannot define a projective transform.
pub fn has_collinear_triple(corners: &CornerSet) -> bool {
    let span = corners
        .iter()
        .flat_map(|a| corners.iter().map(move |b| euclidean_distance(*a, *b)))
        .fold(0.0_f64, f64::max);
    if span == 0.0 {
        return true;
    }
    // Twice the triangle area, relative to the squared span of the set.
    let tolerance = 1e-6 * span * span;

    const TRIPLES: [(usize, usize, usize); 4] = [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)];
    TRIPLES.iter().any(|&(i, j, k)| {
        let (a, b, c) = (corners[i], corners[j], corners[k]);
        let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
        cross.abs() <= tolerance
    })
}

// -- Tests --------------------------------------------------------------------
