use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::category::Category;
use crate::models::image::ImageData;

/// A web citation attached by search grounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    pub uri: String,
    pub title: String,
}

/// One generated story, held in the session list for the life of the process.
#[derive(Debug, Clone)]
pub struct Article {
    pub id: Uuid,
    pub category: Category,
    pub title: String,
    pub description: String,
    /// Attribution for wisdom-tone articles.
    pub author: Option<String>,
    pub date_label: String,
    pub sources: Vec<SourceLink>,
    pub created_at: DateTime<Utc>,
    /// Background as returned by the image generator (or the placeholder).
    pub raw_image: ImageData,
    /// Compositor output in publish order. Empty until compositing finishes.
    pub composed_frames: Vec<ImageData>,
}

impl Article {
    /// First composed frame, if compositing has run.
    pub fn composed_image(&self) -> Option<&ImageData> {
        self.composed_frames.first()
    }

    /// Image to hand to transports: the composed frame, else the raw background.
    pub fn publishable_image(&self) -> &ImageData {
        self.composed_image().unwrap_or(&self.raw_image)
    }

    pub fn summary(&self) -> ArticleSummary {
        ArticleSummary {
            id: self.id,
            category: self.category,
            title: self.title.clone(),
            description: self.description.clone(),
            author: self.author.clone(),
            date_label: self.date_label.clone(),
            sources: self.sources.clone(),
            created_at: self.created_at,
            frame_count: self.composed_frames.len(),
        }
    }
}

/// JSON view of an article. Image bytes are served separately.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleSummary {
    pub id: Uuid,
    pub category: Category,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub date_label: String,
    pub sources: Vec<SourceLink>,
    pub created_at: DateTime<Utc>,
    pub frame_count: usize,
}
