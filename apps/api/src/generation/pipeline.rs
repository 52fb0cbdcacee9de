//! Pipeline — one guarded generation run.
//!
//! Flow: gate → assemble → session insert → publish (settings snapshot) → Idle.
//! On generation failure the gate records the error and the session list is
//! left untouched. Publishing never fails a run.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::autopilot::gate::GenerationGate;
use crate::generation::assembler::ArticleAssembler;
use crate::models::article::{Article, ArticleSummary};
use crate::models::category::Category;
use crate::models::publish::{PublishConfig, PublishReport};
use crate::publish::Dispatcher;
use crate::session::ArticleStore;
use crate::settings::SettingsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Manual,
    Autopilot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed {
        article: ArticleSummary,
        report: PublishReport,
    },
    /// Another run held the gate; nothing happened.
    Skipped,
    Failed {
        error: String,
    },
}

#[derive(Debug)]
pub enum EditOutcome {
    Edited(Article),
    NotFound,
    Busy,
    Failed(String),
}

#[derive(Clone)]
pub struct Pipeline {
    gate: Arc<GenerationGate>,
    assembler: Arc<ArticleAssembler>,
    session: Arc<ArticleStore>,
    dispatcher: Dispatcher,
    settings: Arc<dyn SettingsStore>,
}

impl Pipeline {
    pub fn new(
        gate: Arc<GenerationGate>,
        assembler: Arc<ArticleAssembler>,
        session: Arc<ArticleStore>,
        dispatcher: Dispatcher,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            gate,
            assembler,
            session,
            dispatcher,
            settings,
        }
    }

    pub fn gate(&self) -> &Arc<GenerationGate> {
        &self.gate
    }

    /// Runs one generate-and-publish cycle for `category`.
    pub async fn run(&self, category: Category, trigger: Trigger) -> RunOutcome {
        let Some(ticket) = self
            .gate
            .try_begin(format!("جاري توليد محتوى {}", category.label()))
        else {
            info!("Generation already in progress, skipping {trigger:?} run for {category}");
            return RunOutcome::Skipped;
        };

        let article = match self.assembler.assemble(category).await {
            Ok(article) => article,
            Err(e) => {
                warn!("{trigger:?} run for {category} failed: {e}");
                let message = e.to_string();
                ticket.fail(message.clone());
                return RunOutcome::Failed { error: message };
            }
        };

        self.session.insert(article.clone()).await;

        ticket.set_status("جاري النشر");
        let config = self.publish_config().await;
        let report = self.dispatcher.publish(&article, &config).await;

        info!(
            "{trigger:?} run complete: article {} published to {} destination(s)",
            article.id,
            report.len()
        );
        ticket.finish("تم النشر");

        RunOutcome::Completed {
            article: article.summary(),
            report,
        }
    }

    /// Applies an edit under the same single-flight guard as generation.
    pub async fn edit(&self, id: Uuid, instruction: &str) -> EditOutcome {
        let Some(article) = self.session.get(id).await else {
            return EditOutcome::NotFound;
        };
        let Some(ticket) = self.gate.try_begin("جاري تعديل المحتوى") else {
            return EditOutcome::Busy;
        };

        match self.assembler.reassemble(&article, instruction).await {
            Ok(updated) => {
                if !self.session.replace(updated.clone()).await {
                    ticket.finish("");
                    return EditOutcome::NotFound;
                }
                ticket.finish("تم التعديل");
                EditOutcome::Edited(updated)
            }
            Err(e) => {
                warn!("Edit of article {id} failed: {e}");
                let message = e.to_string();
                ticket.fail(message.clone());
                EditOutcome::Failed(message)
            }
        }
    }

    /// Current publish settings; a store failure publishes nowhere.
    pub async fn publish_config(&self) -> PublishConfig {
        match self.settings.load().await {
            Ok(config) => config,
            Err(e) => {
                warn!("Publish settings unavailable, skipping all destinations: {e}");
                PublishConfig::default()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::generation::assembler::fakes::{assembler, FakeContent};
    use crate::generation::imagery::placeholder_background;
    use crate::settings::MemorySettings;

    pub fn pipeline(content: Arc<FakeContent>, config: PublishConfig) -> Pipeline {
        Pipeline::new(
            Arc::new(GenerationGate::new()),
            Arc::new(assembler(content, Some(placeholder_background()))),
            Arc::new(ArticleStore::new(10)),
            Dispatcher::new().unwrap(),
            Arc::new(MemorySettings::new(config)),
        )
    }

    pub fn session_of(pipeline: &Pipeline) -> Arc<ArticleStore> {
        Arc::clone(&pipeline.session)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::autopilot::gate::Phase;
    use crate::generation::assembler::fakes::FakeContent;
    use crate::models::publish::{DestinationKind, WebhookSettings};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_end_to_end_technology_webhook_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_partial_json(json!({ "title": "عنوان technology 1" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = PublishConfig {
            webhook: WebhookSettings {
                enabled: true,
                url: format!("{}/hook", server.uri()),
            },
            ..PublishConfig::default()
        };
        let p = pipeline(Arc::new(FakeContent::ok()), config);

        let outcome = p.run(Category::Technology, Trigger::Manual).await;
        let RunOutcome::Completed { article, report } = outcome else {
            panic!("expected completed run, got {outcome:?}");
        };
        assert!(!article.title.is_empty());
        assert!(!article.description.is_empty());
        assert_eq!(article.frame_count, 1);
        assert_eq!(report.len(), 1);
        assert_eq!(report.get(&DestinationKind::Webhook), Some(&true));

        let stored = session_of(&p).get(article.id).await.unwrap();
        let composed = image::load_from_memory(&stored.composed_image().unwrap().bytes).unwrap();
        assert_eq!((composed.width(), composed.height()), (1080, 1920));
        assert_eq!(p.gate().snapshot().phase, Phase::Idle);
    }

    #[tokio::test]
    async fn test_failure_sets_error_and_keeps_list_unchanged() {
        let p = pipeline(Arc::new(FakeContent::failing_on(&[1])), PublishConfig::default());
        let outcome = p.run(Category::Cars, Trigger::Manual).await;

        assert!(matches!(outcome, RunOutcome::Failed { .. }));
        let state = p.gate().snapshot();
        assert_eq!(state.phase, Phase::Error);
        assert!(state.error_message.is_some());
        assert_eq!(session_of(&p).len().await, 0);
    }

    #[tokio::test]
    async fn test_run_while_generating_is_skipped() {
        let content = Arc::new(FakeContent::ok());
        let p = pipeline(Arc::clone(&content), PublishConfig::default());
        let _held = p.gate().try_begin("held by test").unwrap();

        let outcome = p.run(Category::Ideas, Trigger::Manual).await;
        assert!(matches!(outcome, RunOutcome::Skipped));
        assert_eq!(content.call_count(), 0);
    }

    #[tokio::test]
    async fn test_edit_replaces_article_in_place() {
        let p = pipeline(Arc::new(FakeContent::ok()), PublishConfig::default());
        let RunOutcome::Completed { article, .. } = p.run(Category::Wisdom, Trigger::Manual).await
        else {
            panic!("run failed");
        };

        let EditOutcome::Edited(updated) = p.edit(article.id, "أضف لمسة فكاهية").await else {
            panic!("edit failed");
        };
        assert_eq!(updated.id, article.id);
        assert_eq!(session_of(&p).len().await, 1);
        assert!(session_of(&p).list().await[0].title.ends_with("(معدل)"));
    }

    #[tokio::test]
    async fn test_edit_unknown_article() {
        let p = pipeline(Arc::new(FakeContent::ok()), PublishConfig::default());
        assert!(matches!(p.edit(Uuid::new_v4(), "x").await, EditOutcome::NotFound));
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(RunOutcome::Skipped).unwrap();
        assert_eq!(json, json!({ "status": "skipped" }));
    }
}
