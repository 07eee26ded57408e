//! Application state shared across all request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::config::ChatConfig;
use crate::core::errors::ChatResult;
use crate::interaction::{InteractionLoop, Services};

/// Shared application state.
pub struct AppState {
    /// The single interaction loop; holding the lock serialises user actions.
    pub interaction: Mutex<InteractionLoop>,
    /// Directory holding the single page.
    pub static_dir: PathBuf,
}

impl AppState {
    /// Wrap already chosen services.
    #[must_use]
    pub fn new(services: Services, config: &ChatConfig) -> Arc<Self> {
        Arc::new(Self {
            interaction: Mutex::new(InteractionLoop::new(
                services,
                &config.session.default_conversation,
            )),
            static_dir: config.server.static_dir.clone(),
        })
    }

    /// Build services from configuration and wrap them.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or a client cannot be built.
    pub fn from_config(config: &ChatConfig) -> ChatResult<Arc<Self>> {
        let services = Services::from_config(config)?;
        Ok(Self::new(services, config))
    }
}
