// Card rendering: frame plans, pixel drawing, glyph shaping, and the compositor.
// CPU-bound; callers run `Compositor::compose*` inside tokio::task::spawn_blocking.

use thiserror::Error;

pub mod compositor;
pub mod glyphs;
pub mod plan;
pub mod raster;

pub use compositor::Compositor;

/// Card face built into the binary (DejaVu Sans Bold, Arabic + Latin).
/// `FONT_PATH` overrides it.
pub const DEFAULT_CARD_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Internal compositing failures. Never escapes `Compositor::compose`.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("font error: {0}")]
    Font(String),

    #[error("surface error: {0}")]
    Surface(String),
}
