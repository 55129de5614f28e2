//! CPU raster surface.
//!
//! A [`Painter`] owns a premultiplied-RGBA8 pixmap plus a reused
//! `vello_cpu::RenderContext`. Vector content (fills, strokes, clips, glyph
//! runs, image paints) is rasterized in *scene passes*: `vello_cpu` renders
//! into a fresh scratch buffer, which is then composited source-over onto
//! the surface. Behaviors the scene graph has no primitive for are done at
//! the pixel level: source-over with a global alpha, destination-in alpha
//! masking, and the blurred-silhouette pass that stands in for the 2D canvas
//! shadow primitive.

use std::sync::Arc;

use kurbo::{Affine, BezPath, Rect};

use crate::{
    assets::decode::PreparedImage,
    foundation::core::{FrameRgba, Rgba8},
    foundation::error::{ForgeError, ForgeResult},
    foundation::math::mul_div255_u8,
};

/// An image prepared for use as a fill paint.
#[derive(Clone)]
pub(crate) struct ImagePaint {
    pub(crate) paint: vello_cpu::Image,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl ImagePaint {
    pub(crate) fn from_prepared(img: &PreparedImage) -> ForgeResult<Self> {
        let paint = rgba_premul_to_image(&img.rgba8_premul, img.width, img.height)?;
        Ok(Self {
            paint,
            width: img.width,
            height: img.height,
        })
    }
}

pub(crate) struct Painter {
    width: u32,
    height: u32,
    pixmap: vello_cpu::Pixmap,
    ctx: Option<vello_cpu::RenderContext>,
    scratch: Option<vello_cpu::Pixmap>,
    blur_a: Vec<u8>,
    blur_b: Vec<u8>,
}

impl Painter {
    pub(crate) fn new(width: u32, height: u32) -> ForgeResult<Self> {
        let (w16, h16) = checked_dims(width, height)?;
        Ok(Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(w16, h16),
            ctx: None,
            scratch: None,
            blur_a: Vec::new(),
            blur_b: Vec::new(),
        })
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    /// Reallocate the surface at a new size, clearing it to transparent.
    pub(crate) fn resize(&mut self, width: u32, height: u32) -> ForgeResult<()> {
        let (w16, h16) = checked_dims(width, height)?;
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixmap = vello_cpu::Pixmap::new(w16, h16);
            self.ctx = None;
            self.scratch = None;
        } else {
            self.clear_transparent();
        }
        Ok(())
    }

    pub(crate) fn clear_transparent(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    pub(crate) fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    pub(crate) fn to_frame(&self) -> FrameRgba {
        FrameRgba {
            width: self.width,
            height: self.height,
            data: self.data().to_vec(),
        }
    }

    /// Run a scene pass: rasterize `f`'s drawing into a scratch buffer and
    /// composite it source-over onto the surface.
    pub(crate) fn scene<F>(&mut self, f: F) -> ForgeResult<()>
    where
        F: FnOnce(&mut Scene<'_>) -> ForgeResult<()>,
    {
        let (w16, h16) = checked_dims(self.width, self.height)?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w16 && ctx.height() == h16 => ctx,
            _ => vello_cpu::RenderContext::new(w16, h16),
        };
        ctx.reset();

        {
            let mut scene = Scene { ctx: &mut ctx };
            f(&mut scene)?;
        }
        ctx.flush();

        let mut tmp = self.take_scratch(w16, h16);
        ctx.render_to_pixmap(&mut tmp);
        premul_over_in_place(self.pixmap.data_as_u8_slice_mut(), tmp.data_as_u8_slice())?;
        self.scratch = Some(tmp);
        self.ctx = Some(ctx);
        Ok(())
    }

    /// Composite a blurred, tinted silhouette of `path` (under `transform`,
    /// shifted by the device-space `offset`) onto the surface.
    ///
    /// This realizes the canvas drop-shadow/glow contract in one pass: the
    /// shadow lands beneath whatever is drawn next, and strokes drawn in
    /// later passes stay crisp and shadow-free.
    pub(crate) fn shadow_pass(
        &mut self,
        path: &BezPath,
        transform: Affine,
        color: Rgba8,
        blur: f64,
        offset: (f64, f64),
    ) -> ForgeResult<()> {
        if color.a == 0 || path.elements().is_empty() {
            return Ok(());
        }

        let (w16, h16) = checked_dims(self.width, self.height)?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w16 && ctx.height() == h16 => ctx,
            _ => vello_cpu::RenderContext::new(w16, h16),
        };
        ctx.reset();
        ctx.set_transform(affine_to_cpu(Affine::translate(offset) * transform));
        ctx.set_paint(color_to_cpu(color));
        ctx.fill_path(&bezpath_to_cpu(path));
        ctx.flush();

        let mut tmp = self.take_scratch(w16, h16);
        ctx.render_to_pixmap(&mut tmp);
        self.ctx = Some(ctx);

        let radius = blur.max(0.0).ceil() as u32;
        if radius == 0 {
            premul_over_in_place(self.pixmap.data_as_u8_slice_mut(), tmp.data_as_u8_slice())?;
        } else {
            let sigma = (blur * 0.5).max(0.1) as f32;
            let kernel = gaussian_kernel_q16(radius, sigma)?;
            let n = tmp.data_as_u8_slice().len();
            self.blur_a.resize(n, 0);
            self.blur_b.resize(n, 0);
            horizontal_blur_q16(
                tmp.data_as_u8_slice(),
                &mut self.blur_a,
                self.width,
                self.height,
                &kernel,
            );
            vertical_blur_q16(
                &self.blur_a,
                &mut self.blur_b,
                self.width,
                self.height,
                &kernel,
            );
            premul_over_in_place(self.pixmap.data_as_u8_slice_mut(), &self.blur_b)?;
        }

        self.scratch = Some(tmp);
        Ok(())
    }

    /// Composite another surface over this one at a global alpha
    /// (`globalAlpha` + `drawImage` of an offscreen canvas).
    pub(crate) fn overlay_from(&mut self, src: &Painter, opacity: f32) -> ForgeResult<()> {
        if src.width != self.width || src.height != self.height {
            return Err(ForgeError::validation(
                "overlay source surface size mismatch",
            ));
        }
        premul_over_in_place_opacity(self.pixmap.data_as_u8_slice_mut(), src.data(), opacity)
    }

    /// Multiply every pixel by a per-position alpha weight
    /// (`destination-in` against a procedural mask).
    pub(crate) fn retain_alpha(&mut self, weight: impl Fn(u32, u32) -> u8) {
        let w = self.width;
        if w == 0 {
            return;
        }
        for (i, px) in self
            .pixmap
            .data_as_u8_slice_mut()
            .chunks_exact_mut(4)
            .enumerate()
        {
            let x = (i as u32) % w;
            let y = (i as u32) / w;
            let wgt = u16::from(weight(x, y));
            if wgt == 255 {
                continue;
            }
            px[0] = mul_div255_u8(u16::from(px[0]), wgt);
            px[1] = mul_div255_u8(u16::from(px[1]), wgt);
            px[2] = mul_div255_u8(u16::from(px[2]), wgt);
            px[3] = mul_div255_u8(u16::from(px[3]), wgt);
        }
    }

    fn take_scratch(&mut self, w16: u16, h16: u16) -> vello_cpu::Pixmap {
        let mut tmp = match self.scratch.take() {
            Some(pm) if pm.width() == w16 && pm.height() == h16 => pm,
            _ => vello_cpu::Pixmap::new(w16, h16),
        };
        tmp.data_as_u8_slice_mut().fill(0);
        tmp
    }
}

/// Vector drawing handle for one scene pass.
pub(crate) struct Scene<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
}

impl Scene<'_> {
    /// Direct access for glyph-run rendering.
    pub(crate) fn ctx(&mut self) -> &mut vello_cpu::RenderContext {
        self.ctx
    }

    pub(crate) fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Rgba8) {
        if path.elements().is_empty() {
            return;
        }
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    pub(crate) fn fill_rect(&mut self, rect: Rect, transform: Affine, color: Rgba8) {
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0, rect.y0, rect.x1, rect.y1,
        ));
    }

    pub(crate) fn stroke_path(
        &mut self,
        path: &BezPath,
        transform: Affine,
        color: Rgba8,
        width: f64,
    ) {
        if path.elements().is_empty() || width <= 0.0 {
            return;
        }
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx
            .set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }

    /// Draw `img` scaled into `dest` under `transform` (canvas
    /// `drawImage(img, x, y, w, h)`).
    pub(crate) fn draw_image(&mut self, img: &ImagePaint, transform: Affine, dest: Rect) {
        if img.width == 0 || img.height == 0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        let to_dest = Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(
                dest.width() / f64::from(img.width),
                dest.height() / f64::from(img.height),
            );
        self.ctx.set_transform(affine_to_cpu(transform * to_dest));
        self.ctx.set_paint(img.paint.clone());
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(img.width),
            f64::from(img.height),
        ));
    }

    /// Fill `path` with an image paint, `image_to_user` mapping image pixel
    /// space into the path's user space. Used for gradient strips.
    pub(crate) fn fill_path_with_image(
        &mut self,
        path: &BezPath,
        transform: Affine,
        img: &vello_cpu::Image,
        image_to_user: Affine,
    ) -> ForgeResult<()> {
        if path.elements().is_empty() {
            return Ok(());
        }
        let det = image_to_user.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(ForgeError::validation(
                "image paint mapping is not invertible",
            ));
        }
        let mut local = path.clone();
        local.apply_affine(image_to_user.inverse());
        self.ctx
            .set_transform(affine_to_cpu(transform * image_to_user));
        self.ctx.set_paint(img.clone());
        self.ctx.fill_path(&bezpath_to_cpu(&local));
        Ok(())
    }

    pub(crate) fn push_clip(&mut self, path: &BezPath, transform: Affine) {
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.push_clip_layer(&bezpath_to_cpu(path));
    }

    pub(crate) fn push_opacity(&mut self, alpha: f32) {
        self.ctx.push_opacity_layer(alpha);
    }

    pub(crate) fn pop_layer(&mut self) {
        self.ctx.pop_layer();
    }
}

fn checked_dims(width: u32, height: u32) -> ForgeResult<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(ForgeError::validation("surface dimensions must be > 0"));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| ForgeError::validation("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ForgeError::validation("surface height exceeds u16"))?;
    Ok((w, h))
}

pub(crate) fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ForgeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ForgeError::validation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ForgeError::validation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ForgeError::validation("pixmap byte length mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> ForgeResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> ForgeResult<()> {
    premul_over_in_place_opacity(dst, src, 1.0)
}

pub(crate) fn premul_over_in_place_opacity(
    dst: &mut [u8],
    src: &[u8],
    opacity: f32,
) -> ForgeResult<()> {
    if dst.len() != src.len() || dst.len() % 4 != 0 {
        return Err(ForgeError::validation(
            "source-over expects equal-length rgba8 buffers",
        ));
    }
    let op = ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16;
    if op == 0 {
        return Ok(());
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = mul_div255_u8(u16::from(s[3]), op);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - u16::from(sa);

        d[3] = add_sat_u8(sa, mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let sc = mul_div255_u8(u16::from(s[c]), op);
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = add_sat_u8(sc, dc);
        }
    }
    Ok(())
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ForgeResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ForgeError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(ForgeError::validation("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Re-normalize so the kernel sums to exactly 1.0 in q16.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let mid_val = i64::from(weights[mid]);
        weights[mid] = (mid_val + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dx = ki as i32 - radius;
                let sx = (x + dx).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dy = ki as i32 - radius;
                let sy = (y + dy).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/painter.rs"]
mod tests;
