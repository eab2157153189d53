// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image codec helpers — decode camera/scanner input, encode pipeline output.
// Operates on in-memory images using the `image` crate.

use flatscan_core::error::{Result, ScanError};
use flatscan_core::types::{EncodedImage, ImageEncoding};
use image::{DynamicImage, ImageFormat};
use tracing::{debug, instrument};

/// Decode PNG or JPEG bytes into a raster.
///
/// The format is sniffed from the content rather than trusted from the
/// caller. Anything else, and any truncated or corrupt payload, is an
/// `InputDecode` error.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    let format = image::guess_format(data).map_err(|err| {
        ScanError::InputDecode(format!("unrecognised image data: {err}"))
    })?;

    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(ScanError::InputDecode(format!(
            "unsupported image format {format:?}; expected PNG or JPEG"
        )));
    }

    let image = image::load_from_memory_with_format(data, format).map_err(|err| {
        ScanError::InputDecode(format!("failed to decode {format:?} image: {err}"))
    })?;

    if image.width() == 0 || image.height() == 0 {
        return Err(ScanError::InputDecode("image has zero area".to_string()));
    }

    debug!(
        width = image.width(),
        height = image.height(),
        ?format,
        "Image decoded from bytes"
    );
    Ok(image)
}

/// Encode as PNG (lossless; alpha preserved).
pub fn encode_png(image: &DynamicImage) -> Result<EncodedImage> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| ScanError::Encode(format!("PNG encoding failed: {err}")))?;

    Ok(EncodedImage {
        bytes: buffer,
        encoding: ImageEncoding::Png,
        width: image.width(),
        height: image.height(),
    })
}

/// Encode as JPEG with the given quality (1-100). Alpha is dropped.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<EncodedImage> {
    let mut buffer = Vec::new();
    let rgb = image.to_rgb8();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|err| ScanError::Encode(format!("JPEG encoding failed: {err}")))?;

    Ok(EncodedImage {
        bytes: buffer,
        encoding: ImageEncoding::Jpeg,
        width: image.width(),
        height: image.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn sample() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(12, 8, |x, y| {
            Rgba([(x * 20) as u8, (y * 30) as u8, 90, 255])
        }))
    }

    #[test]
    fn png_output_decodes_to_same_pixels() {
        let original = sample();
        let encoded = encode_png(&original).expect("encode");
        assert_eq!(encoded.encoding, ImageEncoding::Png);
        let decoded = decode_image(&encoded.bytes).expect("decode");
        assert_eq!(decoded.to_rgba8(), original.to_rgba8());
    }

    #[test]
    fn jpeg_output_keeps_dimensions() {
        let encoded = encode_jpeg(&sample(), 95).expect("encode");
        assert_eq!((encoded.width, encoded.height), (12, 8));
        let decoded = decode_image(&encoded.bytes).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (12, 8));
    }

    #[test]
    fn truncated_png_is_decode_error() {
        let encoded = encode_png(&sample()).expect("encode");
        let truncated = &encoded.bytes[..encoded.bytes.len() / 2];
        assert!(matches!(decode_image(truncated), Err(ScanError::InputDecode(_))));
    }

    #[test]
    fn garbage_is_decode_error() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(ScanError::InputDecode(_))
        ));
        assert!(matches!(decode_image(&[]), Err(ScanError::InputDecode(_))));
    }

    #[test]
    fn non_png_jpeg_format_rejected() {
        let mut bmp = Vec::new();
        sample()
            .write_to(&mut std::io::Cursor::new(&mut bmp), ImageFormat::Bmp)
            .expect("encode bmp");
        assert!(matches!(decode_image(&bmp), Err(ScanError::InputDecode(_))));
    }
}
