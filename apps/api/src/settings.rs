//! Credential Store — durable publish settings.
//!
//! `MemorySettings` keeps the config for the process lifetime;
//! `JsonFileSettings` persists it as pretty JSON and falls back to the
//! environment seed when the file does not exist yet.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::models::publish::PublishConfig;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<PublishConfig, SettingsError>;

    async fn save(&self, config: &PublishConfig) -> Result<(), SettingsError>;
}

pub struct MemorySettings {
    config: RwLock<PublishConfig>,
}

impl MemorySettings {
    pub fn new(seed: PublishConfig) -> Self {
        Self {
            config: RwLock::new(seed),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn load(&self) -> Result<PublishConfig, SettingsError> {
        Ok(self.config.read().await.clone())
    }

    async fn save(&self, config: &PublishConfig) -> Result<(), SettingsError> {
        *self.config.write().await = config.clone();
        Ok(())
    }
}

pub struct JsonFileSettings {
    path: PathBuf,
    seed: PublishConfig,
    write_lock: Mutex<()>,
}

impl JsonFileSettings {
    pub fn new(path: impl Into<PathBuf>, seed: PublishConfig) -> Self {
        Self {
            path: path.into(),
            seed,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettings {
    async fn load(&self) -> Result<PublishConfig, SettingsError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(self.seed.clone()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, config: &PublishConfig) -> Result<(), SettingsError> {
        let _guard = self.write_lock.lock().await;
        let json = serde_json::to_vec_pretty(config)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        // Readers never observe a partially written file.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        info!("Publish settings saved to {}", self.path.display());
        Ok(())
    }
}
