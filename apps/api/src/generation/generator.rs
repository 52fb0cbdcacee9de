//! Content Generator — category → structured draft, and edit passes over an
//! existing draft.
//!
//! `ContentGenerator` is the seam the assembler depends on; the Gemini
//! implementation is the only one shipped. Drafts with a blank title or body
//! are rejected here so nothing downstream ever sees them.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::generation::prompts::{build_draft_prompt, build_edit_prompt, draft_schema, edit_schema};
use crate::llm_client::{LlmClient, LlmError, TextCall};
use crate::models::article::SourceLink;
use crate::models::category::{Category, ContentTone};

/// Draft attempts before a blank reply is treated as a failure.
const MAX_DRAFT_ATTEMPTS: u32 = 2;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("content generation failed: {0}")]
    Llm(#[from] LlmError),

    #[error("generated draft is unusable: {0}")]
    InvalidDraft(String),

    #[error("compositing task failed: {0}")]
    Compositing(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Draft fields as the model returns them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Draft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub news_date: String,
    #[serde(default)]
    pub image_prompt: String,
}

impl Draft {
    /// Trims every field and drops a blank author. Blank title or body is an error.
    pub fn validated(self) -> Result<Draft, GenerationError> {
        let title = self.title.trim().to_string();
        let content = self.content.trim().to_string();
        if title.is_empty() {
            return Err(GenerationError::InvalidDraft("title is blank".to_string()));
        }
        if content.is_empty() {
            return Err(GenerationError::InvalidDraft("content is blank".to_string()));
        }
        Ok(Draft {
            title,
            content,
            author: non_blank(self.author),
            news_date: self.news_date.trim().to_string(),
            image_prompt: self.image_prompt.trim().to_string(),
        })
    }
}

/// A validated draft plus search-grounding citations.
#[derive(Debug, Clone)]
pub struct GeneratedDraft {
    pub draft: Draft,
    pub sources: Vec<SourceLink>,
}

/// Current text of an article and the requested change.
#[derive(Debug, Clone, Copy)]
pub struct EditRequest<'a> {
    pub category: Category,
    pub title: &'a str,
    pub description: &'a str,
    pub author: Option<&'a str>,
    pub instruction: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditedDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
}

impl EditedDraft {
    pub fn validated(self) -> Result<EditedDraft, GenerationError> {
        let title = self.title.trim().to_string();
        let content = self.content.trim().to_string();
        if title.is_empty() || content.is_empty() {
            return Err(GenerationError::InvalidDraft(
                "edit returned a blank title or content".to_string(),
            ));
        }
        Ok(EditedDraft {
            title,
            content,
            author: non_blank(self.author),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Trait
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn draft(&self, category: Category) -> Result<GeneratedDraft, GenerationError>;

    async fn edit(&self, request: EditRequest<'_>) -> Result<EditedDraft, GenerationError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct GeminiContentGenerator {
    llm: LlmClient,
}

impl GeminiContentGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ContentGenerator for GeminiContentGenerator {
    async fn draft(&self, category: Category) -> Result<GeneratedDraft, GenerationError> {
        let profile = category.profile();
        let prompt = build_draft_prompt(profile);
        let schema = draft_schema();
        let options = TextCall {
            grounded: profile.grounded,
            response_schema: Some(&schema),
        };

        let mut last_error = None;
        for attempt in 1..=MAX_DRAFT_ATTEMPTS {
            let reply = self.llm.call_json::<Draft>(&prompt, options).await?;
            match reply.value.validated() {
                Ok(draft) => {
                    info!(
                        "Draft ready for {category}: {} source(s), attempt {attempt}",
                        reply.sources.len()
                    );
                    let sources = reply
                        .sources
                        .into_iter()
                        .map(|s| SourceLink {
                            uri: s.uri,
                            title: s.title,
                        })
                        .collect();
                    return Ok(GeneratedDraft { draft, sources });
                }
                Err(e) => {
                    warn!("Draft attempt {attempt}/{MAX_DRAFT_ATTEMPTS} for {category} rejected: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            GenerationError::InvalidDraft("no draft attempts were made".to_string())
        }))
    }

    async fn edit(&self, request: EditRequest<'_>) -> Result<EditedDraft, GenerationError> {
        let tone = request.category.tone();
        let prompt = build_edit_prompt(
            tone,
            request.title,
            request.description,
            request.author,
            request.instruction,
        );
        let schema = edit_schema();
        let reply = self
            .llm
            .call_json::<EditedDraft>(
                &prompt,
                TextCall {
                    grounded: false,
                    response_schema: Some(&schema),
                },
            )
            .await?;

        let mut edited = reply.value.validated()?;
        // Wisdom attribution survives edits that don't mention it.
        if edited.author.is_none() && tone == ContentTone::Wisdom {
            edited.author = request.author.map(str::to_string);
        }
        Ok(edited)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
