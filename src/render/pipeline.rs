//! Render orchestrator: background → noise → device layer → text onto a
//! surface sized to the selected output device, with the render-sequence
//! discard protocol for superseded renders.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    assets::store::ImageCache,
    foundation::core::FrameRgba,
    foundation::error::ForgeResult,
    model::catalog::device_size_by_id,
    model::config::Screenshot,
    render::background::{NoiseCache, draw_background, draw_noise, draw_placeholder},
    render::device::draw_device_layer,
    render::painter::Painter,
    render::text::TextRenderer,
};

/// Claim held by one in-flight render. A ticket is stale once a newer render
/// has claimed the same sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderTicket(u64);

/// Monotonic render-generation counter.
///
/// Starting a render claims the next number; after each suspension point the
/// in-flight render checks whether its claim is still current and abandons
/// further drawing otherwise. Only the most recent claim's output is ever
/// finalized. There is no cancellation of in-flight decode work, only
/// post-hoc discard of its result.
#[derive(Debug, Default)]
pub struct RenderSequencer {
    current: AtomicU64,
}

impl RenderSequencer {
    /// Claim the next render generation.
    pub fn begin(&self) -> RenderTicket {
        RenderTicket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the newest claim.
    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.0
    }
}

/// A render target: a raster surface plus its render sequencer.
///
/// The surface is resized to the selected device's dimensions as a side
/// effect of every render call.
pub struct RenderSurface {
    painter: Painter,
    sequencer: RenderSequencer,
}

impl RenderSurface {
    /// Allocate a transparent surface. Dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> ForgeResult<Self> {
        Ok(Self {
            painter: Painter::new(width, height)?,
            sequencer: RenderSequencer::default(),
        })
    }

    /// Current width in pixels.
    pub fn width(&self) -> u32 {
        self.painter.width()
    }

    /// Current height in pixels.
    pub fn height(&self) -> u32 {
        self.painter.height()
    }

    /// This surface's render sequencer. A host queueing a newer render may
    /// claim a ticket here to supersede the in-flight one.
    pub fn sequencer(&self) -> &RenderSequencer {
        &self.sequencer
    }

    /// Snapshot the surface as a premultiplied RGBA8 frame.
    pub fn to_frame(&self) -> FrameRgba {
        self.painter.to_frame()
    }
}

/// The compositing engine: caches plus the text subsystem, reused across
/// renders. Configs are consumed read-only; the renderer never mutates them.
pub struct Renderer {
    images: ImageCache,
    noise: NoiseCache,
    text: TextRenderer,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Construct a renderer with empty caches.
    pub fn new() -> Self {
        Self {
            images: ImageCache::new(),
            noise: NoiseCache::default(),
            text: TextRenderer::new(),
        }
    }

    /// The image decode cache (hosts may pre-warm or clear it).
    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Render one screenshot configuration onto `surface`.
    ///
    /// Resizes the surface to the named device's pixel dimensions as a side
    /// effect; unknown device ids fall back to the first catalog entry.
    /// `None` draws the neutral placeholder grid. A render superseded at a
    /// suspension point returns `Ok` without drawing further, leaving the
    /// surface for the newer render to finish.
    #[tracing::instrument(skip(self, surface, screenshot))]
    pub fn render_to_canvas(
        &mut self,
        surface: &mut RenderSurface,
        screenshot: Option<&Screenshot>,
        device_id: &str,
    ) -> ForgeResult<()> {
        let ticket = surface.sequencer.begin();
        let device = device_size_by_id(device_id);
        surface.painter.resize(device.width, device.height)?;

        let Some(shot) = screenshot else {
            return draw_placeholder(&mut surface.painter);
        };

        draw_background(&mut surface.painter, &shot.background)?;
        if shot.background.noise {
            draw_noise(
                &mut surface.painter,
                &mut self.noise,
                shot.background.noise_intensity,
            )?;
        }

        let RenderSurface { painter, sequencer } = surface;
        let should_abort = || !sequencer.is_current(ticket);
        draw_device_layer(painter, &self.images, shot, device, &should_abort)?;

        if !sequencer.is_current(ticket) {
            tracing::debug!("render superseded; skipping text pass");
            return Ok(());
        }
        self.text.draw(painter, &shot.text, device)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
