//! Headline/subheadline rendering: font resolution against the system
//! collection, measured greedy word wrap, and glyph-run rasterization.

use std::collections::HashMap;

use kurbo::Affine;

use crate::{
    foundation::core::Rgba8,
    foundation::error::ForgeResult,
    model::catalog::DeviceSize,
    model::config::{TextConfig, TextPosition},
    render::painter::{Painter, Scene, affine_to_cpu},
};

/// Fraction of the canvas width the wrapped headline may occupy.
const WRAP_WIDTH_FRACTION: f64 = 0.85;

/// Families the editor bundles; anything else is quoted verbatim into the
/// stack and resolved (or fallback-substituted) by the font collection.
const BUILTIN_FONTS: &[&str] = &["Inter", "DM Sans", "Space Grotesk"];

/// RGBA8 brush carried through parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrush {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl From<Rgba8> for TextBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Resolve a configured family name to a CSS-style font stack.
///
/// Resolution against the system collection is synchronous and completes
/// before any measurement, so wrap metrics can never be computed against a
/// not-yet-loaded font.
pub(crate) fn resolve_font_stack(font: &str) -> String {
    if font == "system" {
        return "system-ui, sans-serif".to_string();
    }
    if BUILTIN_FONTS.contains(&font) {
        return format!("{font}, sans-serif");
    }
    format!("\"{font}\", sans-serif")
}

/// Greedy word wrap: accumulate words while the measured line fits
/// `max_width`, then commit and start a new line with the overflowing word.
///
/// Single pass; no backtracking, hyphenation, or bidi. A single word wider
/// than `max_width` is emitted as its own over-long line — words are never
/// split.
pub(crate) fn wrap_words(
    text: &str,
    max_width: f64,
    mut measure: impl FnMut(&str) -> f64,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let test = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure(&test) > max_width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = test;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub(crate) struct TextRenderer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    font_cache: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl TextRenderer {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            font_cache: HashMap::new(),
        }
    }

    fn layout_line(
        &mut self,
        text: &str,
        stack: &str,
        size_px: f32,
        weight: f32,
        brush: TextBrush,
    ) -> parley::Layout<TextBrush> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(stack.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(weight),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        layout
    }

    fn measure(&mut self, text: &str, stack: &str, size_px: f32, weight: f32) -> f64 {
        f64::from(
            self.layout_line(text, stack, size_px, weight, TextBrush::default())
                .width(),
        )
    }

    /// Draw the word-wrapped headline and offset subheadline.
    ///
    /// Skipped entirely (subheadline included) when the headline is disabled
    /// or empty. The subheadline stacks below the wrapped headline block
    /// regardless of the headline anchor; it has no independent anchor.
    pub(crate) fn draw(
        &mut self,
        painter: &mut Painter,
        text: &TextConfig,
        device: &DeviceSize,
    ) -> ForgeResult<()> {
        if !text.headline_enabled || text.headline.is_empty() {
            return Ok(());
        }
        let size = text.headline_size as f32;
        if !size.is_finite() || size <= 0.0 {
            return Ok(());
        }

        let stack = resolve_font_stack(&text.headline_font);
        let weight = parse_weight(&text.headline_weight);
        let brush = TextBrush::from(Rgba8::parse_hex_or(&text.headline_color, Rgba8::WHITE));

        let canvas_w = f64::from(device.width);
        let canvas_h = f64::from(device.height);
        let max_width = canvas_w * WRAP_WIDTH_FRACTION;
        let lines = {
            let (stack, weight) = (stack.as_str(), weight);
            let mut measure = |s: &str| self.measure(s, stack, size, weight);
            wrap_words(&text.headline, max_width, &mut measure)
        };

        // Anchor: top → first line's top at the offset; bottom → first
        // line's *bottom* at the offset, later lines still stacking
        // downward. The bottom+multiline behavior is reproduced literally.
        let y_anchor = match text.headline_position {
            TextPosition::Top => (text.headline_offset_y / 100.0) * canvas_h,
            TextPosition::Bottom => canvas_h - (text.headline_offset_y / 100.0) * canvas_h,
        };
        let line_spacing = text.headline_size * (text.line_height / 100.0);

        let line_layouts: Vec<parley::Layout<TextBrush>> = lines
            .iter()
            .map(|line| self.layout_line(line, &stack, size, weight, brush))
            .collect();

        let sub = if text.subheadline_enabled
            && !text.subheadline.is_empty()
            && text.subheadline_size > 0.0
        {
            let sub_stack = resolve_font_stack(&text.subheadline_font);
            let sub_brush =
                TextBrush::from(Rgba8::parse_hex_or(&text.subheadline_color, Rgba8::WHITE));
            let layout = self.layout_line(
                &text.subheadline,
                &sub_stack,
                text.subheadline_size as f32,
                parse_weight(&text.subheadline_weight),
                sub_brush,
            );
            let sub_y = y_anchor
                + lines.len() as f64 * line_spacing
                + text.headline_size * 0.5
                + text.subheadline_offset_y;
            let alpha = ((text.subheadline_opacity / 100.0).clamp(0.0, 1.0)) as f32;
            Some((layout, sub_y, alpha))
        } else {
            None
        };

        let font_cache = &mut self.font_cache;
        let position = text.headline_position;
        painter.scene(|s| {
            for (i, layout) in line_layouts.iter().enumerate() {
                let line_x = canvas_w / 2.0 - f64::from(layout.width()) / 2.0;
                let line_y = match position {
                    TextPosition::Top => y_anchor + i as f64 * line_spacing,
                    TextPosition::Bottom => {
                        y_anchor + i as f64 * line_spacing - f64::from(layout.height())
                    }
                };
                draw_layout(s, font_cache, layout, line_x, line_y);
            }

            // Opacity applies to the subheadline draw only; the headline is
            // always fully opaque.
            if let Some((layout, sub_y, alpha)) = &sub {
                let line_x = canvas_w / 2.0 - f64::from(layout.width()) / 2.0;
                s.push_opacity(*alpha);
                draw_layout(s, font_cache, layout, line_x, *sub_y);
                s.pop_layer();
            }
            Ok(())
        })
    }
}

fn parse_weight(weight: &str) -> f32 {
    weight.trim().parse::<f32>().unwrap_or(400.0)
}

fn draw_layout(
    scene: &mut Scene<'_>,
    font_cache: &mut HashMap<(u64, u32), vello_cpu::peniko::FontData>,
    layout: &parley::Layout<TextBrush>,
    x: f64,
    y: f64,
) {
    let ctx = scene.ctx();
    ctx.set_transform(affine_to_cpu(Affine::translate((x, y))));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let font = run.run().font();
            let key = (font.data.id(), font.index);
            let cpu_font = font_cache
                .entry(key)
                .or_insert_with(|| {
                    vello_cpu::peniko::FontData::new(
                        vello_cpu::peniko::Blob::from(font.data.as_ref().to_vec()),
                        font.index,
                    )
                })
                .clone();

            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&cpu_font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
