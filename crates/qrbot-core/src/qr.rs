//! QR encode/decode wrappers.
//!
//! Encoding is fixed-capacity: the configured symbol version and LOW error
//! correction bound the payload, and oversized payloads fail instead of
//! silently upgrading the version.

use std::path::Path;

use image::{DynamicImage, GrayImage, Luma};
use qrcode::{types::QrError, EcLevel, QrCode, Version};

use crate::{errors::Error, Result};

/// QR encoding parameters: symbol version (1..=40) and pixels per module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QrParams {
    pub version: u8,
    pub module_px: u32,
}

impl Default for QrParams {
    fn default() -> Self {
        Self {
            version: 1,
            module_px: 10,
        }
    }
}

/// Render `text` as a QR raster: black modules on white, `module_px` pixels
/// per module, 4-module quiet zone.
///
/// Deterministic: equal input and params produce identical pixels.
pub fn render(text: &str, params: &QrParams) -> Result<GrayImage> {
    if text.is_empty() {
        return Err(Error::Validation("cannot encode an empty payload".to_string()));
    }

    let code = QrCode::with_version(
        text.as_bytes(),
        Version::Normal(i16::from(params.version)),
        EcLevel::L,
    )
    .map_err(|e| match e {
        QrError::DataTooLong => Error::PayloadTooLarge {
            version: params.version,
            len: text.len(),
        },
        other => Error::Encode(other.to_string()),
    })?;

    Ok(code
        .render::<Luma<u8>>()
        .module_dimensions(params.module_px, params.module_px)
        .quiet_zone(true)
        .build())
}

/// Encode the raster as a grayscale JPEG, in memory.
pub fn to_jpeg_bytes(img: &GrayImage) -> Result<Vec<u8>> {
    let mut jpeg_bytes: Vec<u8> = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_bytes, 90);
    image::ImageEncoder::write_image(
        encoder,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ExtendedColorType::L8,
    )?;
    Ok(jpeg_bytes)
}

/// Decode the first QR symbol found in the image, if any.
///
/// Every detection or decode failure collapses to `None`; callers cannot
/// distinguish "no symbol" from "unreadable symbol".
pub fn decode_first(img: &DynamicImage) -> Option<String> {
    let gray = img.to_luma8();
    let (w, h) = gray.dimensions();
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(w as usize, h as usize, |x, y| {
            gray.get_pixel(x as u32, y as u32).0[0]
        });
    let grids = prepared.detect_grids();
    let grid = grids.first()?;
    match grid.decode() {
        Ok((_meta, content)) => Some(content),
        Err(e) => {
            tracing::debug!(error = %e, "qr decode failed");
            None
        }
    }
}

/// Load an image file and decode the first QR symbol in it.
pub fn decode_file(path: &Path) -> Option<String> {
    let img = match image::open(path) {
        Ok(img) => img,
        Err(e) => {
            tracing::debug!(error = %e, path = %path.display(), "unreadable image");
            return None;
        }
    };
    decode_first(&img)
}
