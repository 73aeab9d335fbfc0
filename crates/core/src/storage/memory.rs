use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::settings::Settings;
use super::traits::SettingsStore;

/// Settings kept in memory only. Useful for tests and previews.
pub struct InMemorySettingsStore {
    tx: watch::Sender<Settings>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let (tx, _rx) = watch::channel(settings);
        Self { tx }
    }
}

impl Default for InMemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> Result<Settings, CoreError> {
        Ok(self.tx.borrow().clone())
    }

    async fn save(&self, settings: &Settings) -> Result<(), CoreError> {
        settings.validate()?;
        self.tx.send_replace(settings.clone());
        debug!(store = self.name(), "settings saved");
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }
}
