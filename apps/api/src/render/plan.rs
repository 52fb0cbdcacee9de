//! Frame plan — the compositor's input contract.
//!
//! A layout strategy fills a `FramePlan`; the compositor draws it. All
//! coordinates are canvas pixels on the fixed portrait canvas.

use serde::{Deserialize, Serialize};

/// Output canvas dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

/// 9:16 story canvas.
pub const STORY_CANVAS: CanvasSize = CanvasSize {
    width: 1080,
    height: 1920,
};

impl CanvasSize {
    pub fn center_x(&self) -> f32 {
        self.width as f32 / 2.0
    }
}

/// Straight (non-premultiplied) RGBA8 colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Colour with a CSS-style 0.0–1.0 alpha.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    pub fn alpha_f32(&self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

pub const SNAP_YELLOW: Rgba8 = Rgba8::rgb(0xFF, 0xFC, 0x00);
pub const WHITE: Rgba8 = Rgba8::rgb(255, 255, 255);
pub const BLACK: Rgba8 = Rgba8::rgb(0, 0, 0);

/// Vertical linear gradient between `y_start` and `y_end`, full canvas width.
///
/// Alpha is interpolated from `alpha_start` at `y_start` to `alpha_end` at `y_end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientOverlay {
    pub y_start: f32,
    pub y_end: f32,
    pub color: Rgba8,
    pub alpha_start: f32,
    pub alpha_end: f32,
}

/// Rounded panel grouping secondary text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailPanel {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub fill: Rgba8,
    pub border: Rgba8,
    pub border_width: f32,
    pub shadow: Rgba8,
    pub shadow_blur: f32,
}

/// Role of a text block. Declaration order is the draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRole {
    Title,
    Badge,
    Body,
    Date,
    Brand,
}

/// One block of centred, right-to-left text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub role: TextRole,
    pub text: String,
    pub size_px: f32,
    pub color: Rgba8,
    /// Baseline of the first line.
    pub baseline_y: f32,
    pub line_height: f32,
    pub max_width: f32,
    /// Lines past this count are dropped silently.
    pub max_lines: Option<usize>,
}

/// Everything the compositor needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramePlan {
    pub overlays: Vec<GradientOverlay>,
    pub panel: Option<DetailPanel>,
    pub texts: Vec<TextBlock>,
}

impl FramePlan {
    /// Text blocks in draw order, independent of insertion order.
    pub fn texts_in_draw_order(&self) -> Vec<&TextBlock> {
        let mut texts: Vec<&TextBlock> = self.texts.iter().collect();
        texts.sort_by_key(|t| t.role);
        texts
    }
}

/// A wrapped line with its final placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub role: TextRole,
    pub text: String,
    pub size_px: f32,
    pub color: Rgba8,
    pub center_x: f32,
    pub baseline_y: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(role: TextRole) -> TextBlock {
        TextBlock {
            role,
            text: format!("{role:?}"),
            size_px: 40.0,
            color: WHITE,
            baseline_y: 0.0,
            line_height: 50.0,
            max_width: 900.0,
            max_lines: None,
        }
    }

    #[test]
    fn test_draw_order_follows_role_not_insertion() {
        let plan = FramePlan {
            overlays: vec![],
            panel: None,
            texts: vec![
                block(TextRole::Brand),
                block(TextRole::Body),
                block(TextRole::Title),
                block(TextRole::Date),
                block(TextRole::Badge),
            ],
        };
        let roles: Vec<TextRole> = plan.texts_in_draw_order().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                TextRole::Title,
                TextRole::Badge,
                TextRole::Body,
                TextRole::Date,
                TextRole::Brand
            ]
        );
    }

    #[test]
    fn test_with_alpha_rounds_to_u8() {
        assert_eq!(BLACK.with_alpha(0.75).a, 191);
        assert_eq!(WHITE.with_alpha(2.0).a, 255);
        assert_eq!(WHITE.with_alpha(-1.0).a, 0);
    }
}
