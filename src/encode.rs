//! Export functions: drive the orchestrator to produce a single PNG, or
//! iterate a screenshot list into a ZIP archive of PNGs.

use std::io::{Cursor, Write as _};

use crate::{
    foundation::core::FrameRgba,
    foundation::error::{ForgeError, ForgeResult},
    model::catalog::device_size_by_id,
    model::config::Screenshot,
    render::pipeline::{RenderSurface, Renderer},
};

/// Re-render `screenshot` onto `surface` and serialize the result as a
/// lossless PNG.
pub fn export_image(
    renderer: &mut Renderer,
    surface: &mut RenderSurface,
    screenshot: &Screenshot,
    device_id: &str,
) -> ForgeResult<Vec<u8>> {
    renderer.render_to_canvas(surface, Some(screenshot), device_id)?;
    let png = encode_png(&surface.to_frame())?;
    if png.is_empty() {
        return Err(ForgeError::export("PNG serialization produced no data"));
    }
    Ok(png)
}

/// Render every screenshot and pack the PNGs into a ZIP archive with entries
/// named `screenshot-<1-based-index>.png`.
///
/// Export is sequential, reusing one offscreen surface, so peak memory stays
/// at a single in-flight raster. A failing entry aborts the whole batch.
pub fn export_all_as_zip(
    renderer: &mut Renderer,
    screenshots: &[Screenshot],
    device_id: &str,
) -> ForgeResult<Vec<u8>> {
    let device = device_size_by_id(device_id);
    let mut surface = RenderSurface::new(device.width, device.height)?;

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for (i, screenshot) in screenshots.iter().enumerate() {
        let png = export_image(renderer, &mut surface, screenshot, device_id)?;
        zip.start_file(format!("screenshot-{}.png", i + 1), options)
            .map_err(|e| ForgeError::export(format!("start archive entry: {e}")))?;
        zip.write_all(&png)
            .map_err(|e| ForgeError::export(format!("write archive entry: {e}")))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| ForgeError::export(format!("finalize archive: {e}")))?;
    let bytes = cursor.into_inner();
    if bytes.is_empty() {
        return Err(ForgeError::export("ZIP serialization produced no data"));
    }
    Ok(bytes)
}

fn encode_png(frame: &FrameRgba) -> ForgeResult<Vec<u8>> {
    let mut straight = frame.data.clone();
    unpremultiply_rgba8_in_place(&mut straight);

    let img = image::RgbaImage::from_raw(frame.width, frame.height, straight)
        .ok_or_else(|| ForgeError::export("frame buffer does not match its dimensions"))?;
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| ForgeError::export(format!("encode png: {e}")))?;
    Ok(out.into_inner())
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/encode.rs"]
mod tests;
