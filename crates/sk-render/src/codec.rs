//! Portable byte encoding of raster content.
//!
//! Snapshots and exports go through the `RasterCodec` trait so the image
//! format backend stays swappable (and failures injectable in tests).

use crate::RenderError;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use sk_core::config::ImageFormat;

/// Encoding parameters for a single export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    pub format: ImageFormat,
    /// `0.0..=1.0`; ignored by lossless formats.
    pub quality: f64,
}

impl ExportOptions {
    /// Lossless snapshot encoding used by the undo history.
    pub const SNAPSHOT: ExportOptions = ExportOptions {
        format: ImageFormat::Png,
        quality: 1.0,
    };

    /// JPEG quality in the encoder's `1..=100` scale.
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8
    }
}

pub trait RasterCodec {
    fn encode(&self, pixels: &RgbaImage, options: ExportOptions) -> Result<Vec<u8>, RenderError>;
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, RenderError>;
}

/// Default codec backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl RasterCodec for ImageCodec {
    fn encode(&self, pixels: &RgbaImage, options: ExportOptions) -> Result<Vec<u8>, RenderError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(RenderError::EmptySurface { width, height });
        }
        let mut out = Vec::new();
        match options.format {
            ImageFormat::Png => PngEncoder::new(&mut out)
                .write_image(pixels.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| RenderError::Encode(e.to_string()))?,
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgba8(pixels.clone()).to_rgb8();
                JpegEncoder::new_with_quality(&mut out, options.jpeg_quality())
                    .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                    .map_err(|e| RenderError::Encode(e.to_string()))?
            }
        }
        log::trace!(
            "ENCODE {:?} {}x{} -> {} bytes",
            options.format,
            width,
            height,
            out.len()
        );
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, RenderError> {
        image::load_from_memory(bytes)
            .map(|img| img.to_rgba8())
            .map_err(|e| RenderError::Decode(e.to_string()))
    }
}
