pub mod codec;
pub mod glyphs;
pub mod hit;
pub mod paint;
pub mod raster;
pub mod surface;

pub use codec::{ExportOptions, ImageCodec, RasterCodec};
pub use surface::{ClientRect, RegionSnapshot, ResizeOutcome, Surface};

/// Failures of the raster layer. None of them is fatal: callers fall back
/// to a blank background or the last good raster.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to encode raster: {0}")]
    Encode(String),
    #[error("failed to decode raster: {0}")]
    Decode(String),
    #[error("cannot capture pixels of an empty {width}x{height} surface")]
    EmptySurface { width: u32, height: u32 },
    #[error("snapshot is {found:?} but the surface is {expected:?}")]
    SizeMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },
}
