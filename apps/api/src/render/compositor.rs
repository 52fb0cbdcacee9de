//! Image Compositor — bakes card text onto a generated background.
//!
//! Draw order is fixed: background (cover fit) → gradient overlays → detail
//! panel → text in role order (title, badge, body, date, brand). Every line is
//! centred on the canvas axis; shaping handles right-to-left runs.
//!
//! Compositing is best effort: decode, surface or encode failures return the
//! input image unchanged and log a warning.

use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use tracing::{info, warn};

use crate::layout::wrap::{wrap_truncated, FontMeasure};
use crate::models::image::ImageData;
use crate::render::glyphs::GlyphRasterizer;
use crate::render::plan::{CanvasSize, FramePlan, PlacedLine};
use crate::render::raster;
use crate::render::{RenderError, DEFAULT_CARD_FONT};

#[derive(Clone)]
pub struct Compositor {
    canvas: CanvasSize,
    font_bytes: Arc<Vec<u8>>,
}

impl Compositor {
    /// Compositor using the built-in card font.
    pub fn new(canvas: CanvasSize) -> Self {
        Self::with_font(canvas, DEFAULT_CARD_FONT.to_vec())
    }

    pub fn with_font(canvas: CanvasSize, font_bytes: Vec<u8>) -> Self {
        Self {
            canvas,
            font_bytes: Arc::new(font_bytes),
        }
    }

    /// Loads the card font from `path`, falling back to the built-in face
    /// when unset or unreadable.
    pub fn from_font_path(canvas: CanvasSize, path: Option<&Path>) -> Self {
        let Some(p) = path else {
            info!("Using built-in card font");
            return Self::new(canvas);
        };
        match std::fs::read(p) {
            Ok(bytes) => {
                info!("Card font loaded from {} ({} bytes)", p.display(), bytes.len());
                Self::with_font(canvas, bytes)
            }
            Err(e) => {
                warn!("Card font {} unreadable, using built-in font: {e}", p.display());
                Self::new(canvas)
            }
        }
    }

    /// Composes one frame. Never fails: on any error the background is returned as-is.
    pub fn compose(&self, background: &ImageData, plan: &FramePlan) -> ImageData {
        match self.try_compose(&background.bytes, plan) {
            Ok(png) => ImageData::png(png),
            Err(e) => {
                warn!("Compositing degraded, returning unmodified background: {e}");
                background.clone()
            }
        }
    }

    /// Composes every frame of a layout against the same background.
    pub fn compose_frames(&self, background: &ImageData, plans: &[FramePlan]) -> Vec<ImageData> {
        plans
            .iter()
            .map(|plan| self.compose(background, plan))
            .collect()
    }

    fn try_compose(&self, background: &[u8], plan: &FramePlan) -> Result<Vec<u8>, RenderError> {
        let mut surface = raster::decode_cover(background, self.canvas)?;

        for overlay in &plan.overlays {
            raster::apply_gradient(&mut surface, overlay);
        }
        if let Some(panel) = &plan.panel {
            raster::draw_panel(&mut surface, panel);
        }

        // A rejected font still yields the background layers.
        match GlyphRasterizer::new(&self.font_bytes) {
            Ok(glyphs) => {
                let lines = plan_lines(plan, self.canvas, &glyphs);
                draw_text_layer(&mut surface, &glyphs, &lines)?;
            }
            Err(e) => warn!("Card font rejected, skipping text layers: {e}"),
        }

        Ok(raster::encode_png(&surface)?)
    }
}

/// Wraps every text block and assigns each line its centre and baseline.
///
/// Lines are returned in draw order. Body truncation happens here.
pub fn plan_lines(
    plan: &FramePlan,
    canvas: CanvasSize,
    measure: &dyn FontMeasure,
) -> Vec<PlacedLine> {
    let center_x = canvas.center_x();
    let mut placed = Vec::new();

    for block in plan.texts_in_draw_order() {
        let size = block.size_px;
        let sized = |s: &str| measure.width_at(s, size);
        let lines = wrap_truncated(&block.text, block.max_width, block.max_lines, &sized);

        for (i, text) in lines.into_iter().enumerate() {
            placed.push(PlacedLine {
                role: block.role,
                text,
                size_px: size,
                color: block.color,
                center_x,
                baseline_y: block.baseline_y + i as f32 * block.line_height,
            });
        }
    }
    placed
}

fn draw_text_layer(
    surface: &mut RgbaImage,
    glyphs: &GlyphRasterizer,
    lines: &[PlacedLine],
) -> Result<(), RenderError> {
    let width: u16 = surface
        .width()
        .try_into()
        .map_err(|_| RenderError::Surface("canvas width exceeds u16".to_string()))?;
    let height: u16 = surface
        .height()
        .try_into()
        .map_err(|_| RenderError::Surface("canvas height exceeds u16".to_string()))?;

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    for line in lines {
        glyphs.draw_line(&mut ctx, line);
    }
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);

    if !raster::over_premul(surface, pixmap.data_as_u8_slice()) {
        return Err(RenderError::Surface(
            "text layer size does not match canvas".to_string(),
        ));
    }
    Ok(())
}
