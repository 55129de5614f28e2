//! Screenforge styles mobile app screenshots into App-Store-ready marketing
//! images: a background, an optionally device-framed screenshot (isometric
//! tilt, shadow, glow, reflection, border), and headline text, composited
//! onto a fixed-size canvas and exported as PNGs or a ZIP archive.
//!
//! # Pipeline overview
//!
//! 1. **Configure**: a [`Screenshot`] bundles background, subject placement,
//!    and text styling as pure, serializable values.
//! 2. **Render**: [`Renderer::render_to_canvas`] composites background →
//!    noise → device layer → text onto a [`RenderSurface`] sized to the
//!    selected [`DeviceSize`].
//! 3. **Export**: [`export_image`] / [`export_all_as_zip`] re-run the
//!    pipeline against a fresh surface and serialize the result.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: a given configuration renders the same
//!   pixels every time, procedural noise included.
//! - **Premultiplied RGBA8** end-to-end: the surface holds premultiplied
//!   pixels; straight alpha exists only at the decode and PNG boundaries.
//! - **Recoverable subjects**: a missing or undecodable screenshot image
//!   skips the device layer; background and text still render.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod encode;
mod foundation;
mod model;
mod render;

pub use assets::decode::{PreparedImage, decode_image, decode_image_source};
pub use assets::store::ImageCache;
pub use encode::{export_all_as_zip, export_image};
pub use foundation::core::{Affine, BezPath, FrameRgba, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{ForgeError, ForgeResult};
pub use model::catalog::{
    DEVICE_SIZES, DeviceSize, EdgeDirection, FrameTransform, ISOMETRIC_PRESETS, IsometricPreset,
    device_size_by_id, isometric_preset_by_id,
};
pub use model::config::{
    BackgroundConfig, BackgroundKind, BorderConfig, DeviceFrameConfig, EffectsConfig, GlowConfig,
    GradientConfig, GradientStop, ImageFit, PerspectiveConfig, ReflectionConfig, Screenshot,
    ScreenshotConfig, ShadowConfig, Template, TextConfig, TextPosition,
};
pub use render::geometry::{adjust_color, clamp, color_with_alpha, rounded_rect_path};
pub use render::pipeline::{RenderSequencer, RenderSurface, RenderTicket, Renderer};
