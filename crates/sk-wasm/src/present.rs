//! Copy a raster surface onto a Canvas2D context.

use sk_render::Surface;
use wasm_bindgen::{Clamped, JsValue};
use web_sys::{CanvasRenderingContext2d, ImageData};

/// Put the surface's device pixels at the canvas origin. The canvas
/// element must already be sized to the surface's device dimensions.
pub fn blit(ctx: &CanvasRenderingContext2d, surface: &Surface) -> Result<(), JsValue> {
    let pixels = surface.pixels();
    let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels.as_raw().as_slice()), surface.width(), surface.height())?;
    ctx.put_image_data(&image, 0.0, 0.0)
}
