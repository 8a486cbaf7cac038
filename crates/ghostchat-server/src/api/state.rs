use std::time::Duration;

use crate::config::ServerConfig;

/// Settings shared by the request handlers. Read-only after startup.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Pause after each text-delta frame.
    pub token_delay: Option<Duration>,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            token_delay: config.token_delay(),
        }
    }
}
