use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{ForgeError, ForgeResult};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Natural aspect ratio (`width / height`).
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> ForgeResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| ForgeError::decode(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Resolve an image source string to decoded pixels.
///
/// Accepts `data:` URIs with a base64 payload (the editor's upload format)
/// and plain filesystem paths.
pub fn decode_image_source(src: &str) -> ForgeResult<PreparedImage> {
    if let Some(rest) = src.strip_prefix("data:") {
        let payload = rest
            .split_once(";base64,")
            .map(|(_, payload)| payload)
            .ok_or_else(|| ForgeError::decode("data URI is not base64-encoded"))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| ForgeError::decode(format!("invalid base64 image payload: {e}")))?;
        return decode_image(&bytes);
    }

    let bytes = std::fs::read(src)
        .map_err(|e| ForgeError::decode(format!("failed to read image '{src}': {e}")))?;
    decode_image(&bytes)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
