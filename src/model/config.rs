//! Declarative per-screenshot configuration.
//!
//! These are pure, serializable value structs owned by an external state
//! store and consumed read-only by the renderer. Field names stay camelCase
//! on the wire so persisted editor projects load unchanged. Every field
//! carries a default, which makes deserialization the
//! single resolve-with-defaults boundary: the renderer never branches on a
//! missing sub-config.

/// How a background image would be fitted. Present in the schema for
/// compatibility; the background renderer treats `type: image` as a solid
/// fallback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    /// Preserve aspect ratio, crop overflow.
    #[default]
    Cover,
    /// Preserve aspect ratio, letterbox.
    Contain,
    /// Distort to fill exactly.
    Stretch,
}

/// Background fill kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    /// Flat fill with [`BackgroundConfig::solid`].
    Solid,
    /// Linear gradient from [`BackgroundConfig::gradient`].
    #[default]
    Gradient,
    /// Unimplemented by the renderer; falls back to solid.
    Image,
}

/// A single gradient color stop.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GradientStop {
    /// Stop color as a hex string.
    pub color: String,
    /// Stop position in percent; clamped to `[0, 100]` when applied.
    pub position: f64,
}

impl Default for GradientStop {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_string(),
            position: 0.0,
        }
    }
}

/// Linear gradient configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GradientConfig {
    /// Clockwise angle in degrees from vertical (CSS bearing convention).
    pub angle: f64,
    /// Ordered color stops.
    pub stops: Vec<GradientStop>,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            angle: 135.0,
            stops: vec![
                GradientStop {
                    color: "#667eea".to_string(),
                    position: 0.0,
                },
                GradientStop {
                    color: "#764ba2".to_string(),
                    position: 100.0,
                },
            ],
        }
    }
}

/// Canvas background configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundConfig {
    /// Which fill to use.
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    /// Solid fill color; also the fallback for `type: image`.
    pub solid: String,
    /// Gradient parameters.
    pub gradient: GradientConfig,
    /// Unused image source (schema compatibility).
    pub image: Option<String>,
    /// Unused image fit (schema compatibility).
    pub image_fit: ImageFit,
    /// Unused image blur (schema compatibility).
    pub image_blur: f64,
    /// Unused overlay color (schema compatibility).
    pub overlay_color: String,
    /// Unused overlay opacity (schema compatibility).
    pub overlay_opacity: f64,
    /// Whether to overlay the procedural grain pattern.
    pub noise: bool,
    /// Grain strength, nominally `[1, 40]`.
    pub noise_intensity: u32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            kind: BackgroundKind::Gradient,
            solid: "#ffffff".to_string(),
            gradient: GradientConfig::default(),
            image: None,
            image_fit: ImageFit::Cover,
            image_blur: 0.0,
            overlay_color: "#000000".to_string(),
            overlay_opacity: 0.0,
            noise: false,
            noise_intensity: 15,
        }
    }
}

/// Drop shadow under the subject.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShadowConfig {
    /// Whether the shadow is drawn.
    pub enabled: bool,
    /// Shadow color as a hex string.
    pub color: String,
    /// Blur extent in pixels.
    pub blur: f64,
    /// Opacity in percent.
    pub opacity: f64,
    /// Horizontal offset in pixels.
    pub x: f64,
    /// Vertical offset in pixels.
    pub y: f64,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: "#000000".to_string(),
            blur: 60.0,
            opacity: 25.0,
            x: 0.0,
            y: 30.0,
        }
    }
}

/// Stroked border around the frameless subject.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BorderConfig {
    /// Whether the border is drawn.
    pub enabled: bool,
    /// Border color as a hex string.
    pub color: String,
    /// Stroke width in pixels.
    pub width: f64,
    /// Opacity in percent.
    pub opacity: f64,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            color: "#e2e5e9".to_string(),
            width: 4.0,
            opacity: 100.0,
        }
    }
}

/// Soft outer glow around the subject.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlowConfig {
    /// Whether the glow is drawn.
    pub enabled: bool,
    /// Glow color as a hex string.
    pub color: String,
    /// Intensity in percent; becomes the glow alpha.
    pub intensity: f64,
    /// Spread in pixels; scales the blur extent.
    pub spread: f64,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            color: "#3b82f6".to_string(),
            intensity: 50.0,
            spread: 20.0,
        }
    }
}

/// Fading mirror reflection beneath the subject.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReflectionConfig {
    /// Whether the reflection is drawn.
    pub enabled: bool,
    /// Overall reflection opacity in percent.
    pub opacity: f64,
    /// Gap in pixels between the subject bottom and the flip line.
    pub offset: f64,
    /// Fade extent as a percent of subject height; clamped to `[10, 100]`.
    pub fade: f64,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            opacity: 30.0,
            offset: 20.0,
            fade: 50.0,
        }
    }
}

/// Perspective approximation angles in degrees, each nominally `[-30, 30]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PerspectiveConfig {
    /// Rotation about the horizontal axis; squashes vertically.
    pub rotate_x: f64,
    /// Rotation about the vertical axis; squashes horizontally.
    pub rotate_y: f64,
}

/// Independent, additive visual modifiers applied regardless of frame mode.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectsConfig {
    /// Outer glow.
    pub glow: GlowConfig,
    /// Mirror reflection.
    pub reflection: ReflectionConfig,
    /// Perspective squash.
    pub perspective: PerspectiveConfig,
}

/// Simulated phone chrome around the subject.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceFrameConfig {
    /// Whether the chrome is drawn (frameless rendering otherwise).
    pub enabled: bool,
    /// Isometric preset id; unknown ids fall back to the first preset.
    pub preset_id: String,
    /// Phone body color as a hex string.
    pub frame_color: String,
}

impl Default for DeviceFrameConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            preset_id: "front".to_string(),
            frame_color: "#1a1a1a".to_string(),
        }
    }
}

/// Placement and framing of the screenshot subject.
///
/// When [`DeviceFrameConfig::enabled`] is true, `corner_radius` and `border`
/// are not rendered; the phone chrome replaces them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScreenshotConfig {
    /// Subject scale in percent of canvas width (framed) or natural size
    /// (frameless).
    pub scale: f64,
    /// Horizontal center position in percent of canvas width.
    pub x: f64,
    /// Vertical center position in percent of canvas height.
    pub y: f64,
    /// Corner radius in pixels (frameless only).
    pub corner_radius: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Drop shadow.
    pub shadow: ShadowConfig,
    /// Border stroke (frameless only).
    pub border: BorderConfig,
    /// Glow / reflection / perspective modifiers.
    pub effects: EffectsConfig,
    /// Phone chrome settings.
    pub device_frame: DeviceFrameConfig,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            scale: 82.0,
            x: 50.0,
            y: 55.0,
            corner_radius: 24.0,
            rotation: 0.0,
            shadow: ShadowConfig::default(),
            border: BorderConfig::default(),
            effects: EffectsConfig::default(),
            device_frame: DeviceFrameConfig::default(),
        }
    }
}

/// Headline vertical anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    /// Anchor the headline block to the top of the canvas.
    #[default]
    Top,
    /// Anchor to the bottom of the canvas.
    Bottom,
}

/// Headline and subheadline configuration.
///
/// The subheadline is positioned relative to the end of the wrapped headline
/// block, not independently.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextConfig {
    /// Whether the headline (and therefore the whole text layer) is drawn.
    pub headline_enabled: bool,
    /// Headline text; word-wrapped to 85% of the canvas width.
    pub headline: String,
    /// Headline font family name.
    pub headline_font: String,
    /// Headline size in pixels.
    pub headline_size: f64,
    /// Headline weight as a CSS-style numeric string (e.g. `"700"`).
    pub headline_weight: String,
    /// Headline color as a hex string.
    pub headline_color: String,
    /// Vertical anchor.
    pub headline_position: TextPosition,
    /// Anchor offset in percent of canvas height.
    pub headline_offset_y: f64,
    /// Line height in percent of the headline size.
    pub line_height: f64,

    /// Whether the subheadline is drawn.
    pub subheadline_enabled: bool,
    /// Subheadline text (single line).
    pub subheadline: String,
    /// Subheadline font family name.
    pub subheadline_font: String,
    /// Subheadline size in pixels.
    pub subheadline_size: f64,
    /// Subheadline weight as a CSS-style numeric string.
    pub subheadline_weight: String,
    /// Subheadline color as a hex string.
    pub subheadline_color: String,
    /// Subheadline opacity in percent; the headline is always opaque.
    pub subheadline_opacity: f64,
    /// Additional offset in pixels below the headline block.
    pub subheadline_offset_y: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            headline_enabled: true,
            headline: "Your Amazing App".to_string(),
            headline_font: "Inter".to_string(),
            headline_size: 80.0,
            headline_weight: "700".to_string(),
            headline_color: "#ffffff".to_string(),
            headline_position: TextPosition::Top,
            headline_offset_y: 8.0,
            line_height: 120.0,

            subheadline_enabled: true,
            subheadline: "Describe your app in one line".to_string(),
            subheadline_font: "Inter".to_string(),
            subheadline_size: 40.0,
            subheadline_weight: "400".to_string(),
            subheadline_color: "#ffffff".to_string(),
            subheadline_opacity: 70.0,
            subheadline_offset_y: 0.0,
        }
    }
}

/// Aggregate root: one styled screenshot.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Screenshot {
    /// Stable identifier.
    pub id: String,
    /// Key into the external blob store holding the raw image bytes.
    pub image_id: String,
    /// In-memory image payload: a `data:` URI or an image file path.
    ///
    /// Never serialized (persistence strips the raw payload); may be absent
    /// at any time, in which case the device layer is skipped.
    #[serde(skip_serializing)]
    pub image_data: Option<String>,
    /// Background styling.
    pub background: BackgroundConfig,
    /// Subject placement and framing.
    pub screenshot: ScreenshotConfig,
    /// Text overlay.
    pub text: TextConfig,
}

/// Named styling bundle applied to a screenshot in one action.
///
/// A data transfer object, not independently persisted.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Template {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Gallery category.
    pub category: String,
    /// Search tags.
    pub tags: Vec<String>,
    /// Background styling to apply.
    pub background: BackgroundConfig,
    /// Subject styling to apply.
    pub screenshot: ScreenshotConfig,
    /// Text styling to apply.
    pub text: TextConfig,
}

impl Template {
    /// Bulk-overwrite `target`'s styling with this template's, leaving the
    /// identity and image payload untouched.
    pub fn apply_to(&self, target: &mut Screenshot) {
        target.background = self.background.clone();
        target.screenshot = self.screenshot.clone();
        target.text = self.text.clone();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/config.rs"]
mod tests;
