//! Device layer renderer: the subject screenshot, optionally inside a
//! simulated phone chrome under an isometric projection, with shadow, glow,
//! border, and a synthesized fading reflection.

use kurbo::{Affine, BezPath, Circle, Rect, Shape};

use crate::{
    assets::decode::PreparedImage,
    assets::store::ImageCache,
    foundation::core::Rgba8,
    foundation::error::ForgeResult,
    model::catalog::{DeviceSize, EdgeDirection, IsometricPreset, isometric_preset_by_id},
    model::config::{EffectsConfig, Screenshot, ScreenshotConfig},
    render::geometry::{adjust_color, clamp, color_with_alpha, rounded_rect_path},
    render::painter::{ImagePaint, Painter, rgba_premul_to_image},
};

// Phone chrome proportions, all relative to phone width. Keeping every part
// proportional keeps the chrome consistent across arbitrary scale values.
const PHONE_ASPECT: f64 = 2.17; // height / width
const PHONE_BODY_RADIUS: f64 = 0.115;
const PHONE_BEZEL: f64 = 0.032;
const PHONE_SCREEN_RADIUS: f64 = 0.098;
const ISLAND_WIDTH: f64 = 0.29;
const ISLAND_HEIGHT: f64 = 0.043;
const ISLAND_TOP: f64 = 0.02;
const ISLAND_RADIUS: f64 = 0.0215;
const LENS_RADIUS: f64 = 0.012;
const HOME_WIDTH: f64 = 0.34;
const HOME_HEIGHT: f64 = 0.012;
const HOME_BOTTOM: f64 = 0.018;

const BODY_HIGHLIGHT: Rgba8 = Rgba8::new(255, 255, 255, 31); // 12% white
const SCREEN_EDGE: Rgba8 = Rgba8::new(255, 255, 255, 13); // 5% white
const HOME_INDICATOR: Rgba8 = Rgba8::new(255, 255, 255, 64); // 25% white
const LENS_OUTER: Rgba8 = Rgba8::new(0x11, 0x18, 0x27, 255);
const LENS_INNER: Rgba8 = Rgba8::new(0x1e, 0x29, 0x3b, 255);
const EDGE_SHEEN: Rgba8 = Rgba8::new(255, 255, 255, 15); // 6% white
const EDGE_SHADE: Rgba8 = Rgba8::new(0, 0, 0, 38); // 15% black
const DEFAULT_FRAME_COLOR: Rgba8 = Rgba8::new(0x1a, 0x1a, 0x1a, 255);

const GLOW_MIN_BLUR: f64 = 12.0;
const REFLECTION_FADE_FLOOR_SIMPLE: f64 = 48.0;
const REFLECTION_FADE_FLOOR_FRAMED: f64 = 60.0;

/// Which decorations a subject draw includes. The reflection pass reuses the
/// exact subject routine with all of these suppressed, so the mirrored copy
/// shares every framing/rotation/perspective transform with the primary.
#[derive(Clone, Copy)]
struct SubjectPasses {
    shadow: bool,
    border: bool,
    glow: bool,
}

const PRIMARY: SubjectPasses = SubjectPasses {
    shadow: true,
    border: true,
    glow: true,
};
const REFLECTION: SubjectPasses = SubjectPasses {
    shadow: false,
    border: false,
    glow: false,
};

struct SimpleMetrics {
    center_x: f64,
    center_y: f64,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    radius: f64,
}

struct FramedMetrics {
    center_x: f64,
    center_y: f64,
    x: f64,
    y: f64,
    phone_width: f64,
    phone_height: f64,
    body_radius: f64,
}

fn simple_metrics(
    config: &ScreenshotConfig,
    device: &DeviceSize,
    img: &PreparedImage,
) -> SimpleMetrics {
    let scale = config.scale / 100.0;
    let center_x = (config.x / 100.0) * f64::from(device.width);
    let center_y = (config.y / 100.0) * f64::from(device.height);
    let width = f64::from(img.width) * scale;
    let height = f64::from(img.height) * scale;
    SimpleMetrics {
        center_x,
        center_y,
        x: center_x - width / 2.0,
        y: center_y - height / 2.0,
        width,
        height,
        radius: config.corner_radius,
    }
}

fn framed_metrics(config: &ScreenshotConfig, device: &DeviceSize) -> FramedMetrics {
    let scale = config.scale / 100.0;
    let phone_width = f64::from(device.width) * 0.72 * scale;
    let phone_height = phone_width * PHONE_ASPECT;
    let center_x = (config.x / 100.0) * f64::from(device.width);
    let center_y = (config.y / 100.0) * f64::from(device.height);
    FramedMetrics {
        center_x,
        center_y,
        x: center_x - phone_width / 2.0,
        y: center_y - phone_height / 2.0,
        phone_width,
        phone_height,
        body_radius: phone_width * PHONE_BODY_RADIUS,
    }
}

fn perspective_scale(effects: &EffectsConfig) -> Option<(f64, f64)> {
    let rx = effects.perspective.rotate_x;
    let ry = effects.perspective.rotate_y;
    if rx == 0.0 && ry == 0.0 {
        return None;
    }
    // cos() approximates the foreshortening; the clamp avoids degenerate
    // inversion at extreme angles.
    let sx = clamp(ry.to_radians().cos(), 0.65, 1.25);
    let sy = clamp(rx.to_radians().cos(), 0.65, 1.25);
    Some((sx, sy))
}

/// Subject transform about its center. The composition order
/// translate → rotate → perspective-scale → isometric → translate-back is
/// part of the visual contract; reordering changes output.
fn subject_transform(
    center_x: f64,
    center_y: f64,
    config: &ScreenshotConfig,
    effects: &EffectsConfig,
    preset: Option<&IsometricPreset>,
) -> Affine {
    let mut t = Affine::translate((center_x, center_y));
    t = t * Affine::rotate(config.rotation.to_radians());
    if let Some((sx, sy)) = perspective_scale(effects) {
        t = t * Affine::scale_non_uniform(sx, sy);
    }
    if let Some(p) = preset {
        t = t * Affine::new([
            p.transform.a,
            p.transform.b,
            p.transform.c,
            p.transform.d,
            0.0,
            0.0,
        ]);
    }
    t * Affine::translate((-center_x, -center_y))
}

fn effect_color(hex: &str, opacity_percent: f64) -> Rgba8 {
    Rgba8::parse_hex_or(&color_with_alpha(hex, opacity_percent), Rgba8::TRANSPARENT)
}

fn draw_simple_subject(
    painter: &mut Painter,
    img: &ImagePaint,
    config: &ScreenshotConfig,
    effects: &EffectsConfig,
    m: &SimpleMetrics,
    base: Affine,
    passes: SubjectPasses,
) -> ForgeResult<()> {
    let t = base * subject_transform(m.center_x, m.center_y, config, effects, None);
    let path = rounded_rect_path(m.x, m.y, m.width, m.height, m.radius);

    if passes.glow && effects.glow.enabled {
        let color = effect_color(&effects.glow.color, clamp(effects.glow.intensity, 0.0, 100.0));
        let blur = (effects.glow.spread * 2.0).max(GLOW_MIN_BLUR);
        painter.shadow_pass(&path, t, color, blur, (0.0, 0.0))?;
    }

    if passes.shadow && config.shadow.enabled {
        let color = effect_color(&config.shadow.color, clamp(config.shadow.opacity, 0.0, 100.0));
        painter.shadow_pass(
            &path,
            t,
            color,
            config.shadow.blur,
            (config.shadow.x, config.shadow.y),
        )?;
    }

    painter.scene(|s| {
        s.push_clip(&path, t);
        // The shadow caster is an opaque black fill that stays beneath the
        // image as a backing, visible wherever the stretch-fit image is
        // transparent.
        if passes.shadow && config.shadow.enabled {
            s.fill_path(&path, t, Rgba8::BLACK);
        }
        s.draw_image(img, t, Rect::new(m.x, m.y, m.x + m.width, m.y + m.height));
        s.pop_layer();
        Ok(())
    })?;

    // Border is stroked in its own pass so it stays crisp and shadow-free.
    if passes.border && config.border.enabled && config.border.width > 0.0 {
        let color = effect_color(&config.border.color, clamp(config.border.opacity, 0.0, 100.0));
        painter.scene(|s| {
            s.stroke_path(&path, t, color, config.border.width);
            Ok(())
        })?;
    }

    Ok(())
}

fn draw_simple_reflection(
    painter: &mut Painter,
    img: &ImagePaint,
    config: &ScreenshotConfig,
    effects: &EffectsConfig,
    m: &SimpleMetrics,
) -> ForgeResult<()> {
    if !effects.reflection.enabled {
        return Ok(());
    }

    let mut mirror = Painter::new(painter.width(), painter.height())?;
    let top = m.y + m.height + effects.reflection.offset;
    let flip = Affine::translate((0.0, top * 2.0)) * Affine::scale_non_uniform(1.0, -1.0);
    draw_simple_subject(&mut mirror, img, config, effects, m, flip, REFLECTION)?;

    let fade_height = (m.height * clamp(effects.reflection.fade, 10.0, 100.0) * 0.01)
        .max(REFLECTION_FADE_FLOOR_SIMPLE);
    apply_reflection_fade(&mut mirror, m.x - m.width * 0.2, m.width * 1.4, top, fade_height);

    let opacity = (clamp(effects.reflection.opacity, 0.0, 100.0) / 100.0) as f32;
    painter.overlay_from(&mirror, opacity)
}

/// Destination-in against the vertical fade gradient rect: opaque (0.9) at
/// the flip line, transparent `fade_height` below, zero outside the rect.
fn apply_reflection_fade(mirror: &mut Painter, rect_x: f64, rect_w: f64, top: f64, fade_height: f64) {
    mirror.retain_alpha(|x, y| {
        let px = f64::from(x) + 0.5;
        let py = f64::from(y) + 0.5;
        if px < rect_x || px >= rect_x + rect_w || py < top || py >= top + fade_height {
            return 0;
        }
        let fade = 0.9 * (1.0 - (py - top) / fade_height);
        (fade * 255.0).round().clamp(0.0, 255.0) as u8
    });
}

#[allow(clippy::too_many_arguments)]
fn draw_phone_core(
    painter: &mut Painter,
    img: &ImagePaint,
    m: &FramedMetrics,
    config: &ScreenshotConfig,
    effects: &EffectsConfig,
    preset: &IsometricPreset,
    frame_color: &str,
    t: Affine,
    passes: SubjectPasses,
) -> ForgeResult<()> {
    let FramedMetrics {
        center_x,
        x,
        y,
        phone_width: pw,
        phone_height: ph,
        body_radius: body_r,
        ..
    } = *m;
    let body = rounded_rect_path(x, y, pw, ph, body_r);
    let frame_rgba = Rgba8::parse_hex_or(frame_color, DEFAULT_FRAME_COLOR);

    if passes.glow && effects.glow.enabled {
        let color = effect_color(&effects.glow.color, clamp(effects.glow.intensity, 0.0, 100.0));
        let blur = (effects.glow.spread * 2.4).max(GLOW_MIN_BLUR);
        painter.shadow_pass(&body, t, color, blur, (0.0, 0.0))?;
    }

    // Depth edge: a darkened duplicate of the body offset sideways, with a
    // subtle bevel gradient over it.
    if preset.edge_thickness > 0.0 && preset.edge_direction != EdgeDirection::None {
        let edge_w = pw * preset.edge_thickness;
        let to_right = preset.edge_direction == EdgeDirection::Right;
        let dx = if to_right { edge_w } else { -edge_w };
        let edge_path = rounded_rect_path(x + dx, y + edge_w * 0.35, pw, ph, body_r);
        let edge_color =
            Rgba8::parse_hex_or(&adjust_color(frame_color, -40), DEFAULT_FRAME_COLOR);
        let (gx0, gx1) = if to_right {
            (x + pw, x + pw + edge_w)
        } else {
            (x - edge_w, x)
        };

        let strip = bevel_strip()?;
        painter.scene(|s| {
            s.fill_path(&edge_path, t, edge_color);
            let image_to_user = Affine::translate((gx0, 0.0))
                * Affine::scale_non_uniform((gx1 - gx0).max(1e-6) / f64::from(BEVEL_STRIP_LEN), 1.0);
            s.fill_path_with_image(&edge_path, t, &strip, image_to_user)
        })?;
    }

    if passes.shadow && config.shadow.enabled {
        let color = effect_color(&config.shadow.color, clamp(config.shadow.opacity, 0.0, 100.0));
        painter.shadow_pass(
            &body,
            t,
            color,
            config.shadow.blur,
            (config.shadow.x, config.shadow.y),
        )?;
    }

    let bezel = pw * PHONE_BEZEL;
    let screen_x = x + bezel;
    let screen_y = y + bezel;
    let screen_w = pw - bezel * 2.0;
    let screen_h = ph - bezel * 2.0;
    let screen_r = pw * PHONE_SCREEN_RADIUS;
    let screen = rounded_rect_path(screen_x, screen_y, screen_w, screen_h, screen_r);

    painter.scene(|s| {
        // Body and inset bezel highlight.
        s.fill_path(&body, t, frame_rgba);
        let highlight = rounded_rect_path(x + 1.0, y + 1.0, pw - 2.0, ph - 2.0, body_r - 1.0);
        s.stroke_path(&highlight, t, BODY_HIGHLIGHT, 2.0);

        // Screen: black backing (visible where the image does not cover),
        // then the screenshot cover-fitted and clipped to the screen shape.
        s.fill_path(&screen, t, Rgba8::BLACK);
        s.push_clip(&screen, t);
        let img_aspect = f64::from(img.width) / f64::from(img.height.max(1));
        let screen_aspect = screen_w / screen_h;
        let (dw, dh, dx, dy) = if img_aspect > screen_aspect {
            let dh = screen_h;
            let dw = dh * img_aspect;
            (dw, dh, screen_x + (screen_w - dw) / 2.0, screen_y)
        } else {
            let dw = screen_w;
            let dh = dw / img_aspect;
            (dw, dh, screen_x, screen_y + (screen_h - dh) / 2.0)
        };
        s.draw_image(img, t, Rect::new(dx, dy, dx + dw, dy + dh));
        s.pop_layer();

        // Dynamic island with camera lens dots.
        let di_w = pw * ISLAND_WIDTH;
        let di_h = pw * ISLAND_HEIGHT;
        let di_x = center_x - di_w / 2.0;
        let di_y = screen_y + pw * ISLAND_TOP;
        let island = rounded_rect_path(di_x, di_y, di_w, di_h, pw * ISLAND_RADIUS);
        s.fill_path(&island, t, Rgba8::BLACK);

        let lens_r = pw * LENS_RADIUS;
        let lens_center = (di_x + di_w * 0.72, di_y + di_h / 2.0);
        s.fill_path(&Circle::new(lens_center, lens_r).to_path(0.1), t, LENS_OUTER);
        s.fill_path(
            &Circle::new(lens_center, lens_r * 0.5).to_path(0.1),
            t,
            LENS_INNER,
        );

        // Home indicator.
        let hi_w = pw * HOME_WIDTH;
        let hi_h = pw * HOME_HEIGHT;
        let hi_x = center_x - hi_w / 2.0;
        let hi_y = screen_y + screen_h - pw * HOME_BOTTOM - hi_h;
        let indicator = rounded_rect_path(hi_x, hi_y, hi_w, hi_h, hi_h / 2.0);
        s.fill_path(&indicator, t, HOME_INDICATOR);

        // Finishing touch: a subtle screen-edge stroke.
        s.stroke_path(&screen, t, SCREEN_EDGE, 1.0);
        Ok(())
    })
}

const BEVEL_STRIP_LEN: u32 = 256;

fn bevel_strip() -> ForgeResult<vello_cpu::Image> {
    let mut bytes = Vec::with_capacity((BEVEL_STRIP_LEN * 4) as usize);
    for i in 0..BEVEL_STRIP_LEN {
        let u = f64::from(i) / f64::from(BEVEL_STRIP_LEN - 1);
        let lerp = |a: u8, b: u8| -> f64 { f64::from(a) + (f64::from(b) - f64::from(a)) * u };
        let a = lerp(EDGE_SHEEN.a, EDGE_SHADE.a);
        let premul = |c: f64| ((c * a / 255.0).round().clamp(0.0, 255.0)) as u8;
        bytes.push(premul(lerp(EDGE_SHEEN.r, EDGE_SHADE.r)));
        bytes.push(premul(lerp(EDGE_SHEEN.g, EDGE_SHADE.g)));
        bytes.push(premul(lerp(EDGE_SHEEN.b, EDGE_SHADE.b)));
        bytes.push(a.round().clamp(0.0, 255.0) as u8);
    }
    rgba_premul_to_image(&bytes, BEVEL_STRIP_LEN, 1)
}

#[allow(clippy::too_many_arguments)]
fn draw_framed_subject(
    painter: &mut Painter,
    img: &ImagePaint,
    config: &ScreenshotConfig,
    effects: &EffectsConfig,
    m: &FramedMetrics,
    preset: &IsometricPreset,
    frame_color: &str,
    base: Affine,
    passes: SubjectPasses,
) -> ForgeResult<()> {
    let t = base * subject_transform(m.center_x, m.center_y, config, effects, Some(preset));
    draw_phone_core(painter, img, m, config, effects, preset, frame_color, t, passes)
}

#[allow(clippy::too_many_arguments)]
fn draw_framed_reflection(
    painter: &mut Painter,
    img: &ImagePaint,
    config: &ScreenshotConfig,
    effects: &EffectsConfig,
    m: &FramedMetrics,
    preset: &IsometricPreset,
    frame_color: &str,
) -> ForgeResult<()> {
    if !effects.reflection.enabled {
        return Ok(());
    }

    let mut mirror = Painter::new(painter.width(), painter.height())?;
    let top = m.y + m.phone_height + effects.reflection.offset;
    let flip = Affine::translate((0.0, top * 2.0)) * Affine::scale_non_uniform(1.0, -1.0);
    draw_framed_subject(
        &mut mirror,
        img,
        config,
        effects,
        m,
        preset,
        frame_color,
        flip,
        REFLECTION,
    )?;

    let fade_height = (m.phone_height * clamp(effects.reflection.fade, 10.0, 100.0) * 0.01)
        .max(REFLECTION_FADE_FLOOR_FRAMED);
    apply_reflection_fade(
        &mut mirror,
        m.x - m.phone_width * 0.25,
        m.phone_width * 1.5,
        top,
        fade_height,
    );

    let opacity = (clamp(effects.reflection.opacity, 0.0, 100.0) / 100.0) as f32;
    painter.overlay_from(&mirror, opacity)
}

/// Composite the subject layer for `screenshot` onto `painter`.
///
/// A missing image payload or a failed decode skips the layer silently:
/// background and text still render. `should_abort` is polled after the
/// decode suspension point so a superseded render stops before drawing.
pub(crate) fn draw_device_layer(
    painter: &mut Painter,
    images: &ImageCache,
    screenshot: &Screenshot,
    device: &DeviceSize,
    should_abort: &dyn Fn() -> bool,
) -> ForgeResult<()> {
    let Some(src) = screenshot.image_data.as_deref() else {
        return Ok(());
    };

    let prepared = match images.load(src) {
        Ok(img) => img,
        Err(err) => {
            tracing::debug!(error = %err, "skipping device layer: image decode failed");
            return Ok(());
        }
    };

    if should_abort() {
        return Ok(());
    }

    let img = ImagePaint::from_prepared(&prepared)?;
    let config = &screenshot.screenshot;
    let effects = &config.effects;
    let frame = &config.device_frame;

    if frame.enabled {
        let m = framed_metrics(config, device);
        if m.phone_width <= 0.0 || m.phone_height <= 0.0 {
            return Ok(());
        }
        let preset = isometric_preset_by_id(&frame.preset_id);
        draw_framed_reflection(
            painter,
            &img,
            config,
            effects,
            &m,
            preset,
            &frame.frame_color,
        )?;
        return draw_framed_subject(
            painter,
            &img,
            config,
            effects,
            &m,
            preset,
            &frame.frame_color,
            Affine::IDENTITY,
            PRIMARY,
        );
    }

    let m = simple_metrics(config, device, &prepared);
    if m.width <= 0.0 || m.height <= 0.0 {
        return Ok(());
    }
    draw_simple_reflection(painter, &img, config, effects, &m)?;
    draw_simple_subject(painter, &img, config, effects, &m, Affine::IDENTITY, PRIMARY)
}

#[cfg(test)]
#[path = "../../tests/unit/render/device.rs"]
mod tests;
