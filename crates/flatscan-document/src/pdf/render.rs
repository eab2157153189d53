// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-to-raster adapter — renders one PDF page onto a white canvas using the
// `lopdf` crate.
//
// Scanned and photographed pages are a page-sized image XObject placed by the
// content stream, so the renderer tracks the graphics state stack (`q`, `Q`,
// `cm`) and paints every image invoked with `Do` through the current
// transformation matrix. Vector text and paths are not drawn.

use flatscan_core::error::{Result, ScanError};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, instrument, warn};

/// Renders a single page of a paginated document.
pub trait PageRasterizer: Send + Sync {
    /// Render 1-based `page_number` at `scale` device pixels per point.
    ///
    /// Every failure is reported as [`ScanError::PageRender`].
    fn render_page(&self, data: &[u8], page_number: u32, scale: f32) -> Result<DynamicImage>;
}

/// Page tree nesting deeper than this is treated as a cycle.
const MAX_TREE_DEPTH: usize = 64;

const PAPER_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Window fill for pixels an image does not cover.
const UNPAINTED: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Pure-Rust PDF page renderer.
#[derive(Debug, Clone, Copy)]
pub struct PdfPageRasterizer {
    /// Largest accepted canvas or embedded image side, in pixels.
    pub max_dimension: u32,
}

impl Default for PdfPageRasterizer {
    fn default() -> Self {
        Self {
            max_dimension: 16_384,
        }
    }
}

impl PageRasterizer for PdfPageRasterizer {
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    fn render_page(&self, data: &[u8], page_number: u32, scale: f32) -> Result<DynamicImage> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(render_err(format!("invalid render scale {scale}")));
        }

        let document = Document::load_mem(data)
            .map_err(|err| render_err(format!("failed to load PDF from memory: {err}")))?;

        let pages = document.get_pages();
        let page_id = *pages.get(&page_number).ok_or_else(|| {
            render_err(format!(
                "page {page_number} out of range (document has {} pages)",
                pages.len()
            ))
        })?;

        let page = PageContext::load(&document, page_id)?;
        let canvas = self.render(&document, page_id, &page, f64::from(scale))?;

        debug!(
            width = canvas.width(),
            height = canvas.height(),
            "Page rendered"
        );
        Ok(DynamicImage::ImageRgba8(canvas))
    }
}

impl PdfPageRasterizer {
    fn render<'a>(
        &self,
        document: &'a Document,
        page_id: ObjectId,
        page: &PageContext<'a>,
        scale: f64,
    ) -> Result<RgbaImage> {
        let [x0, y0, x1, y1] = page.media_box;
        let width = ((x1 - x0) * scale).round();
        let height = ((y1 - y0) * scale).round();
        let limit = f64::from(self.max_dimension);
        if !(width >= 1.0 && height >= 1.0 && width <= limit && height <= limit) {
            return Err(render_err(format!(
                "page canvas {width}x{height} outside 1..={}",
                self.max_dimension
            )));
        }
        let mut canvas = RgbaImage::from_pixel(width as u32, height as u32, PAPER_WHITE);

        // User space (origin bottom-left) to canvas pixels (origin top-left).
        let device = Affine([scale, 0.0, 0.0, -scale, -x0 * scale, y1 * scale]);

        let raw = document
            .get_page_content(page_id)
            .map_err(|err| render_err(format!("failed to read page content: {err}")))?;
        let content = Content::decode(&raw)
            .map_err(|err| render_err(format!("failed to parse page content: {err}")))?;

        let mut ctm = Affine::IDENTITY;
        let mut saved: Vec<Affine> = Vec::new();
        let mut painted = 0usize;

        for operation in &content.operations {
            match operation.operator.as_str() {
                "q" => saved.push(ctm),
                "Q" => {
                    if let Some(previous) = saved.pop() {
                        ctm = previous;
                    }
                }
                "cm" => match Affine::from_operands(&operation.operands) {
                    Some(m) => ctm = m.then(&ctm),
                    None => warn!(operands = ?operation.operands, "Ignoring malformed cm"),
                },
                "Do" => {
                    let Some(name) = operation.operands.first().and_then(|o| o.as_name().ok())
                    else {
                        continue;
                    };
                    let Some(stream) = page.xobject(document, name) else {
                        warn!(name = %String::from_utf8_lossy(name), "XObject not found");
                        continue;
                    };
                    let subtype = stream.dict.get(b"Subtype").and_then(Object::as_name).ok();
                    if !matches!(subtype, Some(b"Image")) {
                        debug!(name = %String::from_utf8_lossy(name), "Skipping non-image XObject");
                        continue;
                    }
                    if let Some(image) = self.decode_image_xobject(document, stream)? {
                        paint_image(&mut canvas, &image, &ctm.then(&device));
                        painted += 1;
                    }
                }
                _ => {}
            }
        }

        debug!(painted, "Content stream walked");
        Ok(canvas)
    }

    /// Decode an image XObject to RGBA. `Ok(None)` means the encoding is not
    /// supported and the image is skipped.
    fn decode_image_xobject(
        &self,
        document: &Document,
        stream: &Stream,
    ) -> Result<Option<RgbaImage>> {
        let dict = &stream.dict;
        let width = dict_integer(document, dict, b"Width").unwrap_or(0);
        let height = dict_integer(document, dict, b"Height").unwrap_or(0);
        let limit = i64::from(self.max_dimension);
        if width <= 0 || height <= 0 || width > limit || height > limit {
            return Err(render_err(format!("image XObject has bad size {width}x{height}")));
        }
        let (width, height) = (width as u32, height as u32);

        let filters = filter_names(document, dict);
        let samples = match filters.as_slice() {
            [only] if only.as_slice() == b"DCTDecode" => {
                let decoded = image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg)
                    .map_err(|err| render_err(format!("embedded JPEG is corrupt: {err}")))?;
                return Ok(Some(decoded.to_rgba8()));
            }
            [] => stream.content.clone(),
            [only] if only.as_slice() == b"FlateDecode" => stream
                .decompressed_content()
                .map_err(|err| render_err(format!("image decompression failed: {err}")))?,
            _ => {
                warn!(filters = filters.len(), "Unsupported image filter");
                return Ok(None);
            }
        };

        if dict_integer(document, dict, b"BitsPerComponent") != Some(8) {
            warn!("Only 8-bit image samples are supported");
            return Ok(None);
        }
        let Some(components) = color_components(document, dict) else {
            warn!("Unsupported image colour space");
            return Ok(None);
        };
        samples_to_rgba(&samples, width, height, components).map(Some)
    }
}

// -- Page resources -----------------------------------------------------------

/// Attributes of the page being rendered, resolved through the page tree.
struct PageContext<'a> {
    media_box: [f64; 4],
    resources: Option<&'a Dictionary>,
}

impl<'a> PageContext<'a> {
    fn load(document: &'a Document, page_id: ObjectId) -> Result<Self> {
        let media_box = inherited(document, page_id, b"MediaBox")?
            .ok_or_else(|| render_err("page has no /MediaBox".to_string()))?;
        let media_box = parse_rect(document, media_box)?;

        let resources = inherited(document, page_id, b"Resources")?.and_then(|o| o.as_dict().ok());

        Ok(Self {
            media_box,
            resources,
        })
    }

    fn xobject(&self, document: &'a Document, name: &[u8]) -> Option<&'a Stream> {
        let xobjects = self.resources?.get(b"XObject").ok()?;
        let xobjects = resolve(document, xobjects).as_dict().ok()?;
        resolve(document, xobjects.get(name).ok()?).as_stream().ok()
    }
}

/// Look up `key` on the page, then up the `/Parent` chain.
fn inherited<'a>(
    document: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut current = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let dict = document
            .get_dictionary(current)
            .map_err(|err| render_err(format!("failed to get page dictionary: {err}")))?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(resolve(document, value)));
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => current = parent,
            Err(_) => return Ok(None),
        }
    }
    Err(render_err("page tree is too deep or cyclic".to_string()))
}

fn resolve<'a>(document: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => document.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

fn number(document: &Document, object: &Object) -> Option<f64> {
    match resolve(document, object) {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

fn dict_integer(document: &Document, dict: &Dictionary, key: &[u8]) -> Option<i64> {
    resolve(document, dict.get(key).ok()?).as_i64().ok()
}

/// Normalised `[x0, y0, x1, y1]` with `x0 < x1` and `y0 < y1`.
fn parse_rect(document: &Document, object: &Object) -> Result<[f64; 4]> {
    let values: Vec<f64> = object
        .as_array()
        .map_err(|err| render_err(format!("MediaBox is not an array: {err}")))?
        .iter()
        .filter_map(|v| number(document, v))
        .collect();
    let [a, b, c, d] = values.as_slice() else {
        return Err(render_err(format!(
            "MediaBox needs 4 numbers, got {}",
            values.len()
        )));
    };
    Ok([a.min(*c), b.min(*d), a.max(*c), b.max(*d)])
}

fn filter_names(document: &Document, dict: &Dictionary) -> Vec<Vec<u8>> {
    match dict.get(b"Filter").map(|f| resolve(document, f)) {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_name().ok().map(<[u8]>::to_vec))
            .collect(),
        _ => Vec::new(),
    }
}

/// Samples per pixel for the colour spaces painted directly.
fn color_components(document: &Document, dict: &Dictionary) -> Option<usize> {
    match resolve(document, dict.get(b"ColorSpace").ok()?) {
        Object::Name(name) => match name.as_slice() {
            b"DeviceGray" | b"CalGray" => Some(1),
            b"DeviceRGB" | b"CalRGB" => Some(3),
            b"DeviceCMYK" => Some(4),
            _ => None,
        },
        Object::Array(items) => match items.first()?.as_name().ok()? {
            b"ICCBased" => {
                let profile = resolve(document, items.get(1)?).as_stream().ok()?;
                match dict_integer(document, &profile.dict, b"N")? {
                    n @ (1 | 3 | 4) => Some(n as usize),
                    _ => None,
                }
            }
            b"CalGray" => Some(1),
            b"CalRGB" => Some(3),
            _ => None,
        },
        _ => None,
    }
}

fn samples_to_rgba(samples: &[u8], width: u32, height: u32, components: usize) -> Result<RgbaImage> {
    let expected = width as usize * height as usize * components;
    if samples.len() < expected {
        return Err(render_err(format!(
            "image data truncated: {} of {expected} bytes",
            samples.len()
        )));
    }

    Ok(RgbaImage::from_fn(width, height, |x, y| {
        let i = (y as usize * width as usize + x as usize) * components;
        let s = &samples[i..i + components];
        match s {
            [g] => Rgba([*g, *g, *g, 255]),
            [c, m, ye, k] => {
                let ink = |v: u8| ((255 - u16::from(v)) * (255 - u16::from(*k)) / 255) as u8;
                Rgba([ink(*c), ink(*m), ink(*ye), 255])
            }
            _ => Rgba([s[0], s[1], s[2], 255]),
        }
    }))
}

// -- Painting -----------------------------------------------------------------

/// Row-vector affine transform `[a b c d e f]`:
/// `x' = a x + c y + e`, `y' = b x + d y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine([f64; 6]);

impl Affine {
    const IDENTITY: Self = Self([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn from_operands(operands: &[Object]) -> Option<Self> {
        let mut m = [0.0; 6];
        if operands.len() != 6 {
            return None;
        }
        for (slot, operand) in m.iter_mut().zip(operands) {
            *slot = match operand {
                Object::Integer(i) => *i as f64,
                Object::Real(f) => f64::from(*f),
                _ => return None,
            };
        }
        Some(Self(m))
    }

    /// `self` followed by `next`.
    fn then(&self, next: &Self) -> Self {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = next.0;
        Self([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }

    fn is_degenerate(&self) -> bool {
        let [a, b, c, d, _, _] = self.0;
        let det = a * d - b * c;
        det.abs() < 1e-12 || !det.is_finite()
    }
}

/// Paint `image`, which occupies the unit square of its own space (row 0 at
/// v = 1), through `to_canvas` with nearest-neighbour sampling.
///
/// The image is warped into a window covering its canvas footprint and only
/// the pixels it actually reaches are copied onto the canvas.
fn paint_image(canvas: &mut RgbaImage, image: &RgbaImage, to_canvas: &Affine) {
    if image.width() == 0 || image.height() == 0 {
        return;
    }
    if to_canvas.is_degenerate() {
        warn!("Image transform is degenerate; skipping");
        return;
    }
    let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)].map(|(u, v)| to_canvas.apply(u, v));
    let (cw, ch) = (f64::from(canvas.width()), f64::from(canvas.height()));
    let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min).floor().clamp(0.0, cw);
    let max_x = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max).ceil().clamp(0.0, cw);
    let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min).floor().clamp(0.0, ch);
    let max_y = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max).ceil().clamp(0.0, ch);
    if max_x <= min_x || max_y <= min_y {
        return;
    }

    // Pixel indices address pixel centres on both sides of the warp.
    let (iw, ih) = (f64::from(image.width()), f64::from(image.height()));
    let from_pixels = Affine([1.0 / iw, 0.0, 0.0, -1.0 / ih, 0.5 / iw, 1.0 - 0.5 / ih]);
    let to_window = Affine([1.0, 0.0, 0.0, 1.0, -min_x - 0.5, -min_y - 0.5]);
    let [a, b, c, d, e, f] = from_pixels.then(to_canvas).then(&to_window).0.map(|v| v as f32);
    let Some(projection) = Projection::from_matrix([a, c, e, b, d, f, 0.0, 0.0, 1.0]) else {
        warn!("Image transform is not invertible in single precision; skipping");
        return;
    };

    let mut window = RgbaImage::new((max_x - min_x) as u32, (max_y - min_y) as u32);
    warp_into(image, &projection, Interpolation::Nearest, UNPAINTED, &mut window);

    let (x0, y0) = (min_x as u32, min_y as u32);
    for (x, y, pixel) in window.enumerate_pixels() {
        if pixel.0[3] > 0 {
            canvas.put_pixel(x0 + x, y0 + y, *pixel);
        }
    }
}

fn render_err(message: String) -> ScanError {
    ScanError::PageRender(message)
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;
    use lopdf::dictionary;

    /// Build a one-page PDF whose content places image `Im0` with `cm`.
    fn single_image_pdf(media: [i64; 4], image: Stream, cm: [i64; 6]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let image_id = doc.add_object(image);
        let resources_id = doc.add_object(dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        });

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new("cm", cm.iter().map(|v| Object::Integer(*v)).collect()),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        // MediaBox and Resources live on the Pages node and are inherited.
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => media.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>(),
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("failed to save test PDF");
        buf
    }

    fn raw_image(width: i64, height: i64, color_space: &str, samples: Vec<u8>) -> Stream {
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => color_space,
                "BitsPerComponent" => 8,
            },
            samples,
        )
    }

    fn render(pdf: &[u8], page: u32, scale: f32) -> Result<RgbaImage> {
        PdfPageRasterizer::default()
            .render_page(pdf, page, scale)
            .map(|img| img.to_rgba8())
    }

    #[test]
    fn full_page_image_fills_scaled_canvas() {
        let red = raw_image(4, 2, "DeviceRGB", [200u8, 20, 20].repeat(8));
        let pdf = single_image_pdf([0, 0, 100, 50], red, [100, 0, 0, 50, 0, 0]);

        let page = render(&pdf, 1, 2.0).expect("render");
        assert_eq!(page.dimensions(), (200, 100));
        assert!(page.pixels().all(|p| *p == Rgba([200, 20, 20, 255])));
    }

    #[test]
    fn image_rows_run_top_down() {
        // Row 0 black, row 1 white.
        let bands = raw_image(1, 2, "DeviceGray", vec![0, 255]);
        let pdf = single_image_pdf([0, 0, 40, 40], bands, [40, 0, 0, 40, 0, 0]);

        let page = render(&pdf, 1, 1.0).expect("render");
        assert_eq!(*page.get_pixel(20, 5), Rgba([0, 0, 0, 255]));
        assert_eq!(*page.get_pixel(20, 35), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn partial_placement_leaves_paper_white() {
        let black = raw_image(2, 2, "DeviceGray", vec![0; 4]);
        // Bottom-left quarter of the page in user space.
        let pdf = single_image_pdf([0, 0, 100, 100], black, [50, 0, 0, 50, 0, 0]);

        let page = render(&pdf, 1, 1.0).expect("render");
        assert_eq!(*page.get_pixel(25, 75), Rgba([0, 0, 0, 255]));
        assert_eq!(*page.get_pixel(75, 25), PAPER_WHITE);
        assert_eq!(*page.get_pixel(75, 75), PAPER_WHITE);
        assert_eq!(*page.get_pixel(25, 25), PAPER_WHITE);
    }

    #[test]
    fn jpeg_image_is_decoded() {
        let photo = RgbaImage::from_pixel(16, 16, Rgba([40, 160, 90, 255]));
        let mut jpeg = Vec::new();
        DynamicImage::ImageRgba8(photo)
            .to_rgb8()
            .write_to(&mut std::io::Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .expect("encode jpeg");
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 16,
                "Height" => 16,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        );
        let pdf = single_image_pdf([0, 0, 32, 32], stream, [32, 0, 0, 32, 0, 0]);

        let page = render(&pdf, 1, 1.0).expect("render");
        let px = page.get_pixel(16, 16);
        for (got, want) in px.0.iter().zip([40u8, 160, 90]) {
            assert!(got.abs_diff(want) <= 6, "pixel {px:?}");
        }
    }

    #[test]
    fn flate_compressed_samples_are_decoded() {
        let mut stream = raw_image(100, 50, "DeviceRGB", [10u8, 200, 30].repeat(5000));
        stream.compress().expect("compress");
        let pdf = single_image_pdf([0, 0, 100, 50], stream, [100, 0, 0, 50, 0, 0]);

        let page = render(&pdf, 1, 1.0).expect("render");
        assert_eq!(*page.get_pixel(50, 25), Rgba([10, 200, 30, 255]));
    }

    #[test]
    fn page_without_images_is_blank_paper() {
        let unused = raw_image(1, 1, "DeviceGray", vec![0]);
        let mut doc = Document::load_mem(&single_image_pdf([0, 0, 10, 20], unused, [1, 0, 0, 1, 0, 0]))
            .expect("load");
        // Point the content at an image that does not exist.
        let page_id = *doc.get_pages().get(&1).expect("page");
        let empty = doc.add_object(Stream::new(dictionary! {}, b"q 10 0 0 20 0 0 cm /Nope Do Q".to_vec()));
        doc.get_dictionary_mut(page_id)
            .expect("page dict")
            .set("Contents", empty);
        let mut pdf = Vec::new();
        doc.save_to(&mut pdf).expect("save");

        let page = render(&pdf, 1, 2.0).expect("render");
        assert_eq!(page.dimensions(), (20, 40));
        assert!(page.pixels().all(|p| *p == PAPER_WHITE));
    }

    #[test]
    fn malformed_bytes_are_render_errors() {
        let err = render(b"%PDF-1.7 this is not a document", 1, 2.0).unwrap_err();
        assert!(matches!(err, ScanError::PageRender(_)));
    }

    #[test]
    fn page_out_of_range_is_render_error() {
        let pdf = single_image_pdf(
            [0, 0, 10, 10],
            raw_image(1, 1, "DeviceGray", vec![0]),
            [10, 0, 0, 10, 0, 0],
        );
        assert!(matches!(render(&pdf, 2, 1.0), Err(ScanError::PageRender(_))));
        assert!(matches!(render(&pdf, 0, 1.0), Err(ScanError::PageRender(_))));
    }

    #[test]
    fn oversized_canvas_is_rejected() {
        let pdf = single_image_pdf(
            [0, 0, 10_000, 10_000],
            raw_image(1, 1, "DeviceGray", vec![0]),
            [1, 0, 0, 1, 0, 0],
        );
        assert!(matches!(render(&pdf, 1, 2.0), Err(ScanError::PageRender(_))));
    }

    #[test]
    fn affine_composition_and_inverse() {
        let scale = Affine([2.0, 0.0, 0.0, 3.0, 0.0, 0.0]);
        let shift = Affine([1.0, 0.0, 0.0, 1.0, 5.0, -1.0]);
        let both = scale.then(&shift);
        assert_eq!(both.apply(1.0, 1.0), (7.0, 2.0));

        assert_eq!(shift.then(&scale).apply(1.0, 1.0), (12.0, 0.0));
        assert!(Affine([1.0, 2.0, 2.0, 4.0, 0.0, 0.0]).is_degenerate());
        assert!(!both.is_degenerate());
    }

    #[test]
    fn rotated_placement_is_resampled() {
        // Column 0 black, column 1 red; rotated a quarter turn onto the page.
        let halves = raw_image(2, 1, "DeviceRGB", vec![0, 0, 0, 200, 20, 20]);
        let pdf = single_image_pdf([0, 0, 40, 40], halves, [0, 40, -40, 0, 40, 0]);

        let page = render(&pdf, 1, 1.0).expect("render");
        assert_eq!(*page.get_pixel(20, 30), Rgba([0, 0, 0, 255]));
        assert_eq!(*page.get_pixel(20, 10), Rgba([200, 20, 20, 255]));
    }

    #[test]
    fn degenerate_placement_paints_nothing() {
        let black = raw_image(2, 2, "DeviceGray", vec![0; 4]);
        let pdf = single_image_pdf([0, 0, 40, 40], black, [10, 20, 20, 40, 0, 0]);

        let page = render(&pdf, 1, 1.0).expect("render");
        assert!(page.pixels().all(|p| *p == PAPER_WHITE));
    }

    #[test]
    fn cmyk_samples_convert_to_rgb() {
        let rgba = samples_to_rgba(&[0, 0, 0, 0, 255, 0, 0, 0], 2, 1, 4).expect("convert");
        assert_eq!(*rgba.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*rgba.get_pixel(1, 0), Rgba([0, 255, 255, 255]));
    }
}
