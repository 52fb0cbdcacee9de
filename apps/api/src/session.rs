//! Session article list — newest first, in memory for the life of the process.
//!
//! Bounded: inserting past capacity drops the oldest articles.

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::article::{Article, ArticleSummary};

pub struct ArticleStore {
    articles: RwLock<Vec<Article>>,
    capacity: usize,
}

impl ArticleStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            articles: RwLock::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    /// Prepends `article`, evicting the oldest beyond capacity.
    pub async fn insert(&self, article: Article) {
        let mut articles = self.articles.write().await;
        articles.insert(0, article);
        if articles.len() > self.capacity {
            let evicted = articles.len() - self.capacity;
            articles.truncate(self.capacity);
            debug!("Session full, evicted {evicted} oldest article(s)");
        }
    }

    pub async fn list(&self) -> Vec<ArticleSummary> {
        self.articles.read().await.iter().map(Article::summary).collect()
    }

    pub async fn get(&self, id: Uuid) -> Option<Article> {
        self.articles.read().await.iter().find(|a| a.id == id).cloned()
    }

    /// Replaces the article with the same id in place. Returns `false` if absent.
    pub async fn replace(&self, article: Article) -> bool {
        let mut articles = self.articles.write().await;
        match articles.iter_mut().find(|a| a.id == article.id) {
            Some(slot) => {
                *slot = article;
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::Category;
    use crate::models::image::ImageData;
    use chrono::Utc;

    fn article(title: &str) -> Article {
        Article {
            id: Uuid::new_v4(),
            category: Category::Gadgets,
            title: title.to_string(),
            description: "d".to_string(),
            author: None,
            date_label: "today".to_string(),
            sources: Vec::new(),
            created_at: Utc::now(),
            raw_image: ImageData::empty(),
            composed_frames: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_newest_first() {
        let store = ArticleStore::new(10);
        store.insert(article("first")).await;
        store.insert(article("second")).await;
        let titles: Vec<String> = store.list().await.into_iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_replace_keeps_position() {
        let store = ArticleStore::new(10);
        let a = article("a");
        let id = a.id;
        store.insert(a.clone()).await;
        store.insert(article("b")).await;

        let mut edited = a;
        edited.title = "a2".to_string();
        assert!(store.replace(edited).await);
        assert_eq!(store.list().await[1].title, "a2");
        assert_eq!(store.get(id).await.unwrap().title, "a2");
    }

    #[tokio::test]
    async fn test_replace_unknown_is_false() {
        let store = ArticleStore::new(10);
        assert!(!store.replace(article("x")).await);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_insert_past_capacity_evicts_oldest() {
        let store = ArticleStore::new(2);
        let oldest = article("one");
        let oldest_id = oldest.id;
        store.insert(oldest).await;
        store.insert(article("two")).await;
        store.insert(article("three")).await;

        assert_eq!(store.len().await, 2);
        let titles: Vec<String> = store.list().await.into_iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["three", "two"]);
        assert!(store.get(oldest_id).await.is_none());
    }

    #[tokio::test]
    async fn test_zero_capacity_still_keeps_latest() {
        let store = ArticleStore::new(0);
        store.insert(article("only")).await;
        assert_eq!(store.len().await, 1);
    }
}
