// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Candidate contours and the document-likeness check.

use flatscan_core::ScanConfig;
use flatscan_core::types::Point2D;
use imageproc::geometry::{approximate_polygon_dp, arc_length, contour_area};
use imageproc::point::Point;

use crate::geometry::CornerSet;

/// A closed pixel outline traced from a detection mask, with its area and
/// perimeter.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point<i32>>,
    area: f64,
    perimeter: f64,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        let area = if points.len() < 3 {
            0.0
        } else {
            contour_area(&points).abs()
        };
        let perimeter = arc_length(&points, true);
        Self {
            points,
            area,
            perimeter,
        }
    }

    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    /// Absolute enclosed area in square pixels.
    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// Douglas-Peucker simplification with tolerance `epsilon_ratio * perimeter`.
    ///
    /// Outlines too short to simplify come back unchanged.
    pub fn approximate(&self, epsilon_ratio: f64) -> Vec<Point<i32>> {
        let epsilon = epsilon_ratio * self.perimeter;
        if self.points.len() < 3 || !(epsilon > 0.0) {
            return self.points.clone();
        }
        approximate_polygon_dp(&self.points, epsilon, true)
    }

    /// The four approximated corners, if the simplification is a quadrilateral.
    pub fn quad_corners(&self, epsilon_ratio: f64) -> Option<CornerSet> {
        match self.approximate(epsilon_ratio).as_slice() {
            [a, b, c, d] => Some([a, b, c, d].map(|p| Point2D::new(f64::from(p.x), f64::from(p.y)))),
            _ => None,
        }
    }
}

/// Decides whether a contour looks like a photographed page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourValidator {
    pub min_area_ratio: f64,
    pub max_area_ratio: f64,
    pub epsilon_ratio: f64,
}

impl ContourValidator {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            min_area_ratio: config.min_area_ratio,
            max_area_ratio: config.max_area_ratio,
            epsilon_ratio: config.approx_epsilon_ratio,
        }
    }

    /// Accept contours covering 10-95% of the frame whose simplification
    /// has exactly four vertices.
    pub fn is_valid_document(&self, contour: &Contour, image_area: f64) -> bool {
        if image_area <= 0.0 {
            return false;
        }
        let area_ratio = contour.area() / image_area;
        if area_ratio < self.min_area_ratio || area_ratio > self.max_area_ratio {
            return false;
        }
        contour.approximate(self.epsilon_ratio).len() == 4
    }
}

impl Default for ContourValidator {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

/// [`ContourValidator::is_valid_document`] with the default bounds.
pub fn is_valid_document(contour: &Contour, image_area: f64) -> bool {
    ContourValidator::default().is_valid_document(contour, image_area)
}

/// Trace the closed outline through `vertices` one pixel at a time, the
/// way the contour tracer reports a filled polygon's border.
#[cfg(test)]
pub(crate) fn traced_outline(vertices: &[(i32, i32)]) -> Contour {
    let mut points: Vec<Point<i32>> = Vec::new();
    for (i, &(x0, y0)) in vertices.iter().enumerate() {
        let (x1, y1) = vertices[(i + 1) % vertices.len()];
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
        for s in 0..steps {
            let t = f64::from(s) / f64::from(steps);
            let point = Point::new(
                (f64::from(x0) + t * f64::from(x1 - x0)).round() as i32,
                (f64::from(y0) + t * f64::from(y1 - y0)).round() as i32,
            );
            if points.last() != Some(&point) {
                points.push(point);
            }
        }
    }
    Contour::new(points)
}

// -- Tests --------------------------------------------------------------------
