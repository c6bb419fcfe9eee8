//! Saving the sketch into the host record.
//!
//! The flattened image is encoded in the configured format, base64
//! encoded (no data-URL prefix) and written into the record field.

use crate::EditorError;
use crate::host::{Host, Notice};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sk_render::{ExportOptions, RasterCodec, Surface};

pub const SAVED_MESSAGE: &str = "Sketch saved successfully!";
pub const FAILED_MESSAGE: &str = "Failed to save sketch";

/// Encode the surface as a base64 string.
pub fn encode_for_record(
    surface: &Surface,
    codec: &dyn RasterCodec,
    options: ExportOptions,
) -> Result<String, EditorError> {
    let bytes = surface.to_portable_bytes(codec, options)?;
    Ok(STANDARD.encode(bytes))
}

/// Write the surface into `field` and tell the user how it went.
pub fn save(
    host: &mut dyn Host,
    field: &str,
    surface: &Surface,
    codec: &dyn RasterCodec,
    options: ExportOptions,
) -> Result<(), EditorError> {
    let result = encode_for_record(surface, codec, options)
        .and_then(|value| host.update_record(field, &value).map_err(EditorError::Persist));
    match &result {
        Ok(()) => {
            log::debug!("saved sketch into {field}");
            host.notify(Notice::success(SAVED_MESSAGE));
        }
        Err(e) => {
            log::error!("save failed: {e}");
            host.notify(Notice::danger(FAILED_MESSAGE));
        }
    }
    result
}
