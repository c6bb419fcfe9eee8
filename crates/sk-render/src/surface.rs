//! The raster surface: a device-pixel RGBA buffer plus its logical (CSS)
//! size and device pixel ratio.
//!
//! Invariant: `device = round(css * dpr)` on both axes. Resizing rescales
//! existing content into the new size; it never crops.

use crate::RenderError;
use crate::codec::{ExportOptions, RasterCodec};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use kurbo::Point;
use sk_core::Color;

/// On-screen box of the displayed canvas element, in client (CSS) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Result of a resize request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeOutcome {
    /// Device dimensions did not change; nothing was touched.
    Unchanged,
    /// Prior content was rescaled by `(sx, sy)` into the new buffer.
    Rescaled { sx: f64, sy: f64 },
    /// The buffer was reallocated and filled with the background colour.
    Blank,
}

/// Raw copy of the pixel buffer for transient overlay previews.
#[derive(Clone)]
pub struct RegionSnapshot {
    pixels: RgbaImage,
}

pub struct Surface {
    pixels: RgbaImage,
    dpr: f64,
    css_width: f64,
    css_height: f64,
}

impl Surface {
    pub const MIN_CSS_WIDTH: f64 = 200.0;
    pub const MIN_CSS_HEIGHT: f64 = 100.0;
    /// Height / width ratio used when sizing from the container.
    pub const ASPECT: f64 = 0.66;

    pub fn new(css_width: f64, css_height: f64, dpr: f64, background: Color) -> Self {
        let (w, h) = Self::device_size(css_width, css_height, dpr);
        Self {
            pixels: RgbaImage::from_pixel(w, h, Rgba(background.to_rgba())),
            dpr,
            css_width,
            css_height,
        }
    }

    /// Device dimensions for a logical size at the given pixel ratio.
    pub fn device_size(css_width: f64, css_height: f64, dpr: f64) -> (u32, u32) {
        let w = (css_width * dpr).round().max(1.0) as u32;
        let h = (css_height * dpr).round().max(1.0) as u32;
        (w, h)
    }

    /// Logical size derived from a container width: fixed aspect, with floors.
    pub fn container_css_size(container_width: f64) -> (f64, f64) {
        let width = container_width.floor().max(Self::MIN_CSS_WIDTH);
        let height = (width * Self::ASPECT).round().max(Self::MIN_CSS_HEIGHT);
        (width, height)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    pub fn css_size(&self) -> (f64, f64) {
        (self.css_width, self.css_height)
    }

    /// Logical → device scale of the drawing transform.
    pub fn scale(&self) -> f64 {
        self.dpr
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    /// Size the surface from its container's width (auto-sizing path).
    pub fn fit_container(&mut self, container_width: f64, background: Color) -> ResizeOutcome {
        let (w, h) = Self::container_css_size(container_width);
        self.resize(w, h, true, background)
    }

    /// Change the device pixel ratio, keeping the logical size.
    pub fn set_device_pixel_ratio(&mut self, dpr: f64, background: Color) -> ResizeOutcome {
        self.dpr = dpr;
        self.resize(self.css_width, self.css_height, true, background)
    }

    /// Resize to a new logical size. No-op when the device dimensions are
    /// unchanged. Content is rescaled when `preserve_content` is set and it
    /// can be captured; otherwise the surface is filled with `background`.
    pub fn resize(
        &mut self,
        css_width: f64,
        css_height: f64,
        preserve_content: bool,
        background: Color,
    ) -> ResizeOutcome {
        let (w, h) = Self::device_size(css_width, css_height, self.dpr);
        if (w, h) == self.pixels.dimensions() {
            return ResizeOutcome::Unchanged;
        }
        self.css_width = css_width;
        self.css_height = css_height;

        let captured = if preserve_content {
            match self.capture() {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    log::warn!("resize: {e}; filling background");
                    None
                }
            }
        } else {
            None
        };

        match captured {
            Some(old) => {
                let (ow, oh) = old.dimensions();
                // Intermediate buffer → scaled draw into the new logical size
                self.pixels = imageops::resize(&old, w, h, FilterType::Triangle);
                log::debug!("resize {ow}x{oh} -> {w}x{h} (rescaled)");
                ResizeOutcome::Rescaled {
                    sx: f64::from(w) / f64::from(ow),
                    sy: f64::from(h) / f64::from(oh),
                }
            }
            None => {
                self.pixels = RgbaImage::from_pixel(w, h, Rgba(background.to_rgba()));
                log::debug!("resize -> {w}x{h} (blank)");
                ResizeOutcome::Blank
            }
        }
    }

    fn capture(&self) -> Result<RgbaImage, RenderError> {
        let (width, height) = self.pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(RenderError::EmptySurface { width, height });
        }
        Ok(self.pixels.clone())
    }

    /// Paint every device pixel, ignoring the logical transform.
    pub fn fill(&mut self, color: Color) {
        let px = Rgba(color.to_rgba());
        for p in self.pixels.pixels_mut() {
            *p = px;
        }
    }

    pub fn to_portable_bytes(
        &self,
        codec: &dyn RasterCodec,
        options: ExportOptions,
    ) -> Result<Vec<u8>, RenderError> {
        codec.encode(&self.pixels, options)
    }

    /// Replace the content with decoded bytes. Images of a different size
    /// are scaled to fill the current surface. On error the surface is
    /// left untouched so the caller can choose its fallback.
    pub fn load_portable_bytes(
        &mut self,
        codec: &dyn RasterCodec,
        bytes: &[u8],
    ) -> Result<(), RenderError> {
        let decoded = codec.decode(bytes)?;
        if decoded.dimensions() == self.pixels.dimensions() {
            self.pixels = decoded;
        } else {
            self.pixels = imageops::resize(&decoded, self.width(), self.height(), FilterType::Triangle);
        }
        Ok(())
    }

    /// Cheap in-memory copy of the pixels (not re-encoded).
    pub fn snapshot_region(&self) -> RegionSnapshot {
        RegionSnapshot {
            pixels: self.pixels.clone(),
        }
    }

    pub fn restore_region(&mut self, snapshot: &RegionSnapshot) -> Result<(), RenderError> {
        if snapshot.pixels.dimensions() != self.pixels.dimensions() {
            return Err(RenderError::SizeMismatch {
                expected: self.pixels.dimensions(),
                found: snapshot.pixels.dimensions(),
            });
        }
        self.pixels.copy_from_slice(snapshot.pixels.as_raw());
        Ok(())
    }

    /// Make this surface an exact copy of `other`.
    pub fn copy_from(&mut self, other: &Surface) {
        if self.pixels.dimensions() == other.pixels.dimensions() {
            self.pixels.copy_from_slice(other.pixels.as_raw());
        } else {
            self.pixels = other.pixels.clone();
        }
        self.dpr = other.dpr;
        self.css_width = other.css_width;
        self.css_height = other.css_height;
    }

    /// Map a client (CSS) position to raster coordinates using the ratio of
    /// device pixels to the displayed size. Handles both DPI scaling and a
    /// canvas stretched by CSS.
    pub fn client_to_raster(&self, client: Point, rect: &ClientRect) -> Point {
        let (sx, sy) = self.display_ratio(rect);
        Point::new((client.x - rect.left) * sx, (client.y - rect.top) * sy)
    }

    /// Inverse of [`Surface::client_to_raster`].
    pub fn raster_to_client(&self, raster: Point, rect: &ClientRect) -> Point {
        let (sx, sy) = self.display_ratio(rect);
        Point::new(raster.x / sx + rect.left, raster.y / sy + rect.top)
    }

    fn display_ratio(&self, rect: &ClientRect) -> (f64, f64) {
        let sx = if rect.width > 0.0 {
            f64::from(self.width()) / rect.width
        } else {
            self.dpr
        };
        let sy = if rect.height > 0.0 {
            f64::from(self.height()) / rect.height
        } else {
            self.dpr
        };
        (sx, sy)
    }
}
