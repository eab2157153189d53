// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the flatscan-document crate: the full scan
// pipeline on a synthetic photographed page, and the detection stage alone.

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use flatscan_core::ScanConfig;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use flatscan_document::scan::detect_candidate_contours;
use flatscan_document::{DocumentScanner, ImagingBackend};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 640x480 dark desk with a skewed bright page covering about half of it.
fn synthetic_page() -> DynamicImage {
    let mut img = RgbaImage::from_pixel(640, 480, Rgba([35, 30, 28, 255]));
    let page = [
        Point::new(110, 70),
        Point::new(530, 95),
        Point::new(560, 420),
        Point::new(85, 395),
    ];
    draw_polygon_mut(&mut img, &page, Rgba([235, 232, 225, 255]));
    DynamicImage::ImageRgba8(img)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Detection, warp, enhancement, and JPEG encoding end to end.
fn bench_scan_raster(c: &mut Criterion) {
    let scanner = DocumentScanner::new(Arc::new(ImagingBackend::ready()));
    let page = synthetic_page();

    c.bench_function("scan_raster (640x480)", |b| {
        b.iter(|| {
            let result = scanner.scan_raster(black_box(&page));
            black_box(result.map(|r| r.did_detect).unwrap_or(false));
        });
    });
}

/// Edge masks, enclosed-region fill, and contour tracing only.
fn bench_detect_candidates(c: &mut Criterion) {
    let backend = ImagingBackend::ready();
    let config = ScanConfig::default();
    let page = synthetic_page();

    c.bench_function("detect_candidate_contours (640x480)", |b| {
        b.iter(|| {
            let contours = detect_candidate_contours(&backend, black_box(&page), &config);
            black_box(contours.len());
        });
    });
}

criterion_group!(benches, bench_scan_raster, bench_detect_candidates);
criterion_main!(benches);
