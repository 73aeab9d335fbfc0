use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::errors::CoreError;
use crate::models::settings::Settings;
use super::traits::SettingsStore;

/// Settings persisted as pretty-printed JSON on disk.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write never leaves a truncated document behind.
pub struct JsonFileSettingsStore {
    path: PathBuf,
    tx: watch::Sender<Settings>,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (tx, _rx) = watch::channel(Settings::default());
        Self {
            path: path.into(),
            tx,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "settings.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn load(&self) -> Result<Settings, CoreError> {
        let settings = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => {
                let settings: Settings = serde_json::from_str(&text).map_err(|e| {
                    CoreError::Storage(format!(
                        "Corrupted settings file {}: {e}",
                        self.path.display()
                    ))
                })?;
                settings.validate()?;
                settings
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no settings file yet, using defaults");
                Settings::default()
            }
            Err(e) => return Err(e.into()),
        };
        self.tx.send_replace(settings.clone());
        Ok(settings)
    }

    async fn save(&self, settings: &Settings) -> Result<(), CoreError> {
        settings.validate()?;
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))?;

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        self.tx.send_replace(settings.clone());
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }
}
