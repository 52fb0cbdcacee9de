//! Article Assembler — drives one article from category to composed frames.
//!
//! Flow: draft (Content Generator) → background (Image Generator, placeholder
//! on failure) → Article → layout strategy → compositor on a blocking thread.
//!
//! Text failures abort; image failures degrade.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::generation::generator::{ContentGenerator, EditRequest, GenerationError};
use crate::generation::imagery::{placeholder_background, ImageGenerator, STORY_ASPECT_RATIO};
use crate::generation::prompts::build_image_prompt;
use crate::layout::strategy::{FrameContent, LayoutStrategy};
use crate::models::article::Article;
use crate::models::category::Category;
use crate::models::image::ImageData;
use crate::render::Compositor;

pub struct ArticleAssembler {
    content: Arc<dyn ContentGenerator>,
    images: Arc<dyn ImageGenerator>,
    compositor: Compositor,
    layout: LayoutStrategy,
    brand_mark: String,
}

impl ArticleAssembler {
    pub fn new(
        content: Arc<dyn ContentGenerator>,
        images: Arc<dyn ImageGenerator>,
        compositor: Compositor,
        layout: LayoutStrategy,
        brand_mark: String,
    ) -> Self {
        Self {
            content,
            images,
            compositor,
            layout,
            brand_mark,
        }
    }

    /// Generates, illustrates and composes a new article.
    pub async fn assemble(&self, category: Category) -> Result<Article, GenerationError> {
        let generated = self.content.draft(category).await?;
        let draft = generated.draft;

        let image_prompt = build_image_prompt(category.profile(), &draft.image_prompt);
        let raw_image = match self.images.generate(&image_prompt, STORY_ASPECT_RATIO).await {
            Ok(image) => image,
            Err(e) => {
                warn!("Image generation failed for {category}, using placeholder: {e}");
                placeholder_background()
            }
        };

        let created_at = Utc::now();
        let date_label = if draft.news_date.is_empty() {
            created_at.format("%Y-%m-%d").to_string()
        } else {
            draft.news_date
        };

        let mut article = Article {
            id: Uuid::new_v4(),
            category,
            title: draft.title,
            description: draft.content,
            author: draft.author,
            date_label,
            sources: generated.sources,
            created_at,
            raw_image,
            composed_frames: Vec::new(),
        };

        article.composed_frames = self.compose(&article).await?;
        info!(
            "Assembled article {} ({category}, {} frame(s))",
            article.id,
            article.composed_frames.len()
        );
        Ok(article)
    }

    /// Applies an edit instruction and re-composes from the raw background.
    /// The id, sources and background are kept.
    pub async fn reassemble(
        &self,
        article: &Article,
        instruction: &str,
    ) -> Result<Article, GenerationError> {
        let edited = self
            .content
            .edit(EditRequest {
                category: article.category,
                title: &article.title,
                description: &article.description,
                author: article.author.as_deref(),
                instruction,
            })
            .await?;

        let mut updated = article.clone();
        updated.title = edited.title;
        updated.description = edited.content;
        updated.author = edited.author;
        updated.composed_frames = self.compose(&updated).await?;

        info!("Re-assembled article {}", updated.id);
        Ok(updated)
    }

    async fn compose(&self, article: &Article) -> Result<Vec<ImageData>, GenerationError> {
        let plans = self.layout.frames(&self.frame_content(article));
        let compositor = self.compositor.clone();
        let background = article.raw_image.clone();

        tokio::task::spawn_blocking(move || compositor.compose_frames(&background, &plans))
            .await
            .map_err(|e| GenerationError::Compositing(e.to_string()))
    }

    fn frame_content(&self, article: &Article) -> FrameContent {
        let date_label = match &article.author {
            Some(author) => format!("{author} · {}", article.date_label),
            None => article.date_label.clone(),
        };
        FrameContent {
            title: article.title.clone(),
            category_label: article.category.label().to_string(),
            description: article.description.clone(),
            date_label,
            brand_mark: self.brand_mark.clone(),
        }
    }
}
