//! Canvas background: solid fills, angled linear gradients, procedural
//! grain, and the neutral placeholder grid.

use kurbo::{Affine, BezPath, Vec2};

use crate::{
    foundation::core::Rgba8,
    foundation::error::ForgeResult,
    foundation::math::{hash_u32, mul_div255_u8},
    model::config::{BackgroundConfig, BackgroundKind},
    render::geometry::clamp,
    render::painter::Painter,
};

const PLACEHOLDER_FILL: Rgba8 = Rgba8::new(0xf1, 0xf3, 0xf5, 255);
const PLACEHOLDER_GRID: Rgba8 = Rgba8::new(0xe2, 0xe5, 0xe9, 255);
const PLACEHOLDER_GRID_STEP: f64 = 60.0;

const NOISE_TILE: u32 = 150;

/// Fill the canvas from the background configuration.
///
/// `type: image` exists in the schema but is not implemented; it falls back
/// to the solid fill, as does any unknown malformed color.
pub(crate) fn draw_background(painter: &mut Painter, bg: &BackgroundConfig) -> ForgeResult<()> {
    match bg.kind {
        BackgroundKind::Gradient => draw_gradient(painter, bg),
        BackgroundKind::Solid | BackgroundKind::Image => {
            let color = Rgba8::parse_hex_or(&bg.solid, Rgba8::BLACK);
            fill_canvas(painter, color);
            Ok(())
        }
    }
}

fn fill_canvas(painter: &mut Painter, color: Rgba8) {
    let src = color.to_premul();
    for px in painter.data_mut().chunks_exact_mut(4) {
        blend_premul(px, src);
    }
}

/// Endpoints of the gradient line for `angle` degrees on a `width`×`height`
/// canvas: a segment through the center, long enough to span the diagonal in
/// both directions so rotated gradients cover every corner.
pub(crate) fn gradient_segment(angle: f64, width: f64, height: f64) -> (Vec2, Vec2) {
    let rad = (angle - 90.0).to_radians();
    let diag = (width * width + height * height).sqrt();
    let dir = Vec2::new(rad.cos(), rad.sin());
    let center = Vec2::new(width / 2.0, height / 2.0);
    (center - dir * (diag / 2.0), center + dir * (diag / 2.0))
}

fn draw_gradient(painter: &mut Painter, bg: &BackgroundConfig) -> ForgeResult<()> {
    // Stops interpolate in straight alpha (canvas gradient semantics) and
    // are premultiplied per pixel at the end.
    let mut stops: Vec<(f64, [f64; 4])> = bg
        .gradient
        .stops
        .iter()
        .map(|stop| {
            let c = Rgba8::parse_hex_or(&stop.color, Rgba8::BLACK);
            (
                clamp(stop.position / 100.0, 0.0, 1.0),
                [
                    f64::from(c.r),
                    f64::from(c.g),
                    f64::from(c.b),
                    f64::from(c.a),
                ],
            )
        })
        .collect();
    if stops.is_empty() {
        return Ok(());
    }
    stops.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let width = painter.width();
    let height = painter.height();
    let (p1, _) = gradient_segment(bg.gradient.angle, f64::from(width), f64::from(height));
    let rad = (bg.gradient.angle - 90.0).to_radians();
    let dir = Vec2::new(rad.cos(), rad.sin());
    let diag = (f64::from(width).powi(2) + f64::from(height).powi(2)).sqrt();

    let data = painter.data_mut();
    for y in 0..height {
        for x in 0..width {
            let p = Vec2::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let t = clamp((p - p1).dot(dir) / diag, 0.0, 1.0);
            let rgba = sample_stops(&stops, t);
            let a = rgba[3].round().clamp(0.0, 255.0) as u8;
            let premul = |c: f64| -> u8 {
                mul_div255_u8((c.round().clamp(0.0, 255.0) as u16).min(255), u16::from(a))
            };
            let src = [premul(rgba[0]), premul(rgba[1]), premul(rgba[2]), a];
            let idx = ((y * width + x) as usize) * 4;
            blend_premul(&mut data[idx..idx + 4], src);
        }
    }
    Ok(())
}

fn sample_stops(stops: &[(f64, [f64; 4])], t: f64) -> [f64; 4] {
    let first = stops[0];
    let last = stops[stops.len() - 1];
    if t <= first.0 {
        return first.1;
    }
    if t >= last.0 {
        return last.1;
    }
    for pair in stops.windows(2) {
        let (p0, c0) = pair[0];
        let (p1, c1) = pair[1];
        if t <= p1 {
            if p1 <= p0 {
                return c1;
            }
            let u = (t - p0) / (p1 - p0);
            return [
                c0[0] + (c1[0] - c0[0]) * u,
                c0[1] + (c1[1] - c0[1]) * u,
                c0[2] + (c1[2] - c0[2]) * u,
                c0[3] + (c1[3] - c0[3]) * u,
            ];
        }
    }
    last.1
}

/// Single-entry cache for the generated grain tile, keyed by intensity.
#[derive(Default)]
pub(crate) struct NoiseCache {
    entry: Option<(u32, Vec<u8>)>,
}

impl NoiseCache {
    fn tile(&mut self, intensity: u32) -> &[u8] {
        let stale = !matches!(&self.entry, Some((cached, _)) if *cached == intensity);
        if stale {
            self.entry = Some((intensity, generate_noise_tile(intensity)));
        }
        &self.entry.as_ref().expect("noise tile present").1
    }
}

fn generate_noise_tile(intensity: u32) -> Vec<u8> {
    // Constant alpha across the tile; only luminance varies per pixel.
    let alpha = ((f64::from(intensity) * 2.5).round().min(255.0)).max(0.0) as u8;
    let mut tile = vec![0u8; (NOISE_TILE * NOISE_TILE * 4) as usize];
    for y in 0..NOISE_TILE {
        for x in 0..NOISE_TILE {
            let v = (hash_u32(u64::from(intensity), x, y) & 0xff) as u8;
            let p = mul_div255_u8(u16::from(v), u16::from(alpha));
            let idx = ((y * NOISE_TILE + x) * 4) as usize;
            tile[idx] = p;
            tile[idx + 1] = p;
            tile[idx + 2] = p;
            tile[idx + 3] = alpha;
        }
    }
    tile
}

/// Tile the cached grain pattern across the canvas with source-over.
pub(crate) fn draw_noise(
    painter: &mut Painter,
    cache: &mut NoiseCache,
    intensity: u32,
) -> ForgeResult<()> {
    let width = painter.width();
    let height = painter.height();
    let tile = cache.tile(intensity).to_vec();

    let data = painter.data_mut();
    for y in 0..height {
        let ty = y % NOISE_TILE;
        for x in 0..width {
            let tx = x % NOISE_TILE;
            let sidx = ((ty * NOISE_TILE + tx) * 4) as usize;
            let src = [tile[sidx], tile[sidx + 1], tile[sidx + 2], tile[sidx + 3]];
            let didx = ((y * width + x) as usize) * 4;
            blend_premul(&mut data[didx..didx + 4], src);
        }
    }
    Ok(())
}

/// Neutral "empty canvas" indicator: light-gray fill with a 60px grid of 1px
/// lines. Never part of exported output.
pub(crate) fn draw_placeholder(painter: &mut Painter) -> ForgeResult<()> {
    fill_canvas(painter, PLACEHOLDER_FILL);

    let width = f64::from(painter.width());
    let height = f64::from(painter.height());
    painter.scene(|s| {
        let mut grid = BezPath::new();
        let mut x = 0.0;
        while x < width {
            grid.move_to((x, 0.0));
            grid.line_to((x, height));
            x += PLACEHOLDER_GRID_STEP;
        }
        let mut y = 0.0;
        while y < height {
            grid.move_to((0.0, y));
            grid.line_to((width, y));
            y += PLACEHOLDER_GRID_STEP;
        }
        s.stroke_path(&grid, Affine::IDENTITY, PLACEHOLDER_GRID, 1.0);
        Ok(())
    })
}

fn blend_premul(dst: &mut [u8], src: [u8; 4]) {
    let sa = src[3];
    if sa == 0 {
        return;
    }
    if sa == 255 {
        dst.copy_from_slice(&src);
        return;
    }
    let inv = 255u16 - u16::from(sa);
    for c in 0..4 {
        dst[c] = src[c].saturating_add(mul_div255_u8(u16::from(dst[c]), inv));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
