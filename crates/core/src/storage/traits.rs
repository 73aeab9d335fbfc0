use async_trait::async_trait;
use tokio::sync::watch;

use crate::errors::CoreError;
use crate::models::settings::Settings;

/// Persistence for user settings, injected into the presentation layer.
///
/// The hosted document store of the web dashboard, a local file, or plain
/// memory all sit behind this one interface. The analysis core never sees it.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Human-readable name of this store (for logs/errors).
    fn name(&self) -> &str;

    /// Load the stored settings. A store with nothing saved yet returns defaults.
    async fn load(&self) -> Result<Settings, CoreError>;

    /// Validate and persist settings, then notify subscribers.
    async fn save(&self, settings: &Settings) -> Result<(), CoreError>;

    /// Receive every successfully saved (or loaded) settings value.
    fn subscribe(&self) -> watch::Receiver<Settings>;
}
