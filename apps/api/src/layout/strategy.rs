//! Layout strategies — turn article text into frame plans for the compositor.
//!
//! `SingleFrame` bakes everything onto one card. `TwoFrame` splits the story
//! into a hook card (title only) and a details card (panel with body, date).
//! Both feed the same compositor; only the block lists differ.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::render::plan::{
    CanvasSize, DetailPanel, FramePlan, GradientOverlay, TextBlock, TextRole, BLACK,
    SNAP_YELLOW, STORY_CANVAS, WHITE,
};

/// Text content shared by every strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameContent {
    pub title: String,
    pub category_label: String,
    pub description: String,
    pub date_label: String,
    pub brand_mark: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategy {
    #[default]
    SingleFrame,
    TwoFrame,
}

impl FromStr for LayoutStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "single_frame" => Ok(LayoutStrategy::SingleFrame),
            "two_frame" | "two-frame" | "hook_details" => Ok(LayoutStrategy::TwoFrame),
            other => Err(format!("unknown layout strategy '{other}'")),
        }
    }
}

impl LayoutStrategy {
    /// Canvas every strategy targets.
    pub fn canvas(&self) -> CanvasSize {
        STORY_CANVAS
    }

    /// Builds the frame plans for `content`, in publish order.
    pub fn frames(&self, content: &FrameContent) -> Vec<FramePlan> {
        match self {
            LayoutStrategy::SingleFrame => vec![single_frame(content)],
            LayoutStrategy::TwoFrame => vec![hook_frame(content), details_frame(content)],
        }
    }
}

pub fn badge_text(label: &str) -> String {
    format!("⚡ {label} ⚡")
}

// ────────────────────────────────────────────────────────────────────────────
// Single card
// ────────────────────────────────────────────────────────────────────────────

const PANEL_X: f32 = 50.0;
const PANEL_Y: f32 = 1280.0;
const PANEL_W: f32 = 980.0;
const PANEL_H: f32 = 500.0;
const PANEL_RADIUS: f32 = 60.0;

const TITLE_SIZE: f32 = 95.0;
const TITLE_TOP: f32 = 280.0;
const TITLE_LINE_HEIGHT: f32 = 115.0;
const TITLE_WIDTH: f32 = 920.0;

const BODY_SIZE: f32 = 52.0;
const BODY_LINE_HEIGHT: f32 = 88.0;
const BODY_WIDTH: f32 = 880.0;
const BODY_MAX_LINES: usize = 3;

const BRAND_BASELINE: f32 = 1860.0;

fn glass_panel(y: f32, height: f32) -> DetailPanel {
    DetailPanel {
        x: PANEL_X,
        y,
        width: PANEL_W,
        height,
        radius: PANEL_RADIUS,
        fill: BLACK.with_alpha(0.75),
        border: WHITE.with_alpha(0.2),
        border_width: 4.0,
        shadow: BLACK.with_alpha(0.6),
        shadow_blur: 50.0,
    }
}

fn brand_block(brand: &str) -> TextBlock {
    TextBlock {
        role: TextRole::Brand,
        text: brand.to_string(),
        size_px: 55.0,
        color: SNAP_YELLOW,
        baseline_y: BRAND_BASELINE,
        line_height: 55.0,
        max_width: TITLE_WIDTH,
        max_lines: Some(1),
    }
}

fn badge_block(label: &str, baseline_y: f32) -> TextBlock {
    TextBlock {
        role: TextRole::Badge,
        text: badge_text(label),
        size_px: 38.0,
        color: SNAP_YELLOW,
        baseline_y,
        line_height: 38.0,
        max_width: BODY_WIDTH,
        max_lines: Some(1),
    }
}

fn date_block(date: &str, baseline_y: f32) -> TextBlock {
    TextBlock {
        role: TextRole::Date,
        text: date.to_string(),
        size_px: 34.0,
        color: WHITE.with_alpha(0.4),
        baseline_y,
        line_height: 34.0,
        max_width: BODY_WIDTH,
        max_lines: Some(1),
    }
}

fn single_frame(content: &FrameContent) -> FramePlan {
    FramePlan {
        overlays: vec![GradientOverlay {
            y_start: 0.0,
            y_end: 650.0,
            color: BLACK,
            alpha_start: 0.95,
            alpha_end: 0.0,
        }],
        panel: Some(glass_panel(PANEL_Y, PANEL_H)),
        texts: vec![
            TextBlock {
                role: TextRole::Title,
                text: content.title.clone(),
                size_px: TITLE_SIZE,
                color: SNAP_YELLOW,
                baseline_y: TITLE_TOP,
                line_height: TITLE_LINE_HEIGHT,
                max_width: TITLE_WIDTH,
                max_lines: None,
            },
            badge_block(&content.category_label, PANEL_Y + 80.0),
            TextBlock {
                role: TextRole::Body,
                text: content.description.clone(),
                size_px: BODY_SIZE,
                color: WHITE,
                baseline_y: PANEL_Y + 180.0,
                line_height: BODY_LINE_HEIGHT,
                max_width: BODY_WIDTH,
                max_lines: Some(BODY_MAX_LINES),
            },
            date_block(&content.date_label, PANEL_Y + 440.0),
            brand_block(&content.brand_mark),
        ],
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Hook + details cards
// ────────────────────────────────────────────────────────────────────────────

const DETAILS_PANEL_Y: f32 = 560.0;
const DETAILS_PANEL_H: f32 = 820.0;

fn hook_frame(content: &FrameContent) -> FramePlan {
    FramePlan {
        overlays: vec![
            GradientOverlay {
                y_start: 0.0,
                y_end: 900.0,
                color: BLACK,
                alpha_start: 0.9,
                alpha_end: 0.0,
            },
            GradientOverlay {
                y_start: 1400.0,
                y_end: 1920.0,
                color: BLACK,
                alpha_start: 0.0,
                alpha_end: 0.85,
            },
        ],
        panel: None,
        texts: vec![
            TextBlock {
                role: TextRole::Title,
                text: content.title.clone(),
                size_px: 110.0,
                color: SNAP_YELLOW,
                baseline_y: 420.0,
                line_height: 132.0,
                max_width: TITLE_WIDTH,
                max_lines: Some(4),
            },
            badge_block(&content.category_label, 300.0),
            brand_block(&content.brand_mark),
        ],
    }
}

fn details_frame(content: &FrameContent) -> FramePlan {
    FramePlan {
        overlays: vec![GradientOverlay {
            y_start: 0.0,
            y_end: 1920.0,
            color: BLACK,
            alpha_start: 0.35,
            alpha_end: 0.7,
        }],
        panel: Some(glass_panel(DETAILS_PANEL_Y, DETAILS_PANEL_H)),
        texts: vec![
            badge_block(&content.category_label, DETAILS_PANEL_Y + 90.0),
            TextBlock {
                role: TextRole::Body,
                text: content.description.clone(),
                size_px: 56.0,
                color: WHITE,
                baseline_y: DETAILS_PANEL_Y + 210.0,
                line_height: 92.0,
                max_width: BODY_WIDTH,
                max_lines: Some(6),
            },
            date_block(&content.date_label, DETAILS_PANEL_Y + DETAILS_PANEL_H - 60.0),
            brand_block(&content.brand_mark),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> FrameContent {
        FrameContent {
            title: "روبوت يطلب إجازة مرضية".to_string(),
            category_label: "الذكاء الاصطناعي".to_string(),
            description: "أعلنت شركة ناشئة عن نموذج لغوي جديد".to_string(),
            date_label: "2026-10-18".to_string(),
            brand_mark: "👻 K3333BI".to_string(),
        }
    }

    #[test]
    fn test_single_frame_has_one_plan_with_panel() {
        let frames = LayoutStrategy::SingleFrame.frames(&content());
        assert_eq!(frames.len(), 1);
        let panel = frames[0].panel.as_ref().expect("panel");
        assert_eq!((panel.x, panel.y, panel.width, panel.height), (50.0, 1280.0, 980.0, 500.0));
    }

    #[test]
    fn test_single_frame_carries_every_role() {
        let frames = LayoutStrategy::SingleFrame.frames(&content());
        let roles: Vec<TextRole> = frames[0].texts_in_draw_order().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![TextRole::Title, TextRole::Badge, TextRole::Body, TextRole::Date, TextRole::Brand]
        );
    }

    #[test]
    fn test_single_frame_body_limited_to_three_lines() {
        let frames = LayoutStrategy::SingleFrame.frames(&content());
        let body = frames[0].texts.iter().find(|t| t.role == TextRole::Body).unwrap();
        assert_eq!(body.max_lines, Some(3));
    }

    #[test]
    fn test_two_frame_hook_then_details() {
        let frames = LayoutStrategy::TwoFrame.frames(&content());
        assert_eq!(frames.len(), 2);
        assert!(frames[0].texts.iter().any(|t| t.role == TextRole::Title));
        assert!(frames[0].panel.is_none());
        assert!(frames[1].texts.iter().all(|t| t.role != TextRole::Title));
        assert!(frames[1].panel.is_some());
    }

    #[test]
    fn test_badge_wraps_label() {
        assert_eq!(badge_text("سياحة"), "⚡ سياحة ⚡");
    }

    #[test]
    fn test_parse_strategy_names() {
        assert_eq!("single".parse::<LayoutStrategy>().unwrap(), LayoutStrategy::SingleFrame);
        assert_eq!("two_frame".parse::<LayoutStrategy>().unwrap(), LayoutStrategy::TwoFrame);
        assert!("carousel".parse::<LayoutStrategy>().is_err());
    }
}
