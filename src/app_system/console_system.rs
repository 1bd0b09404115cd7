use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::api::{HttpOrderApi, OrderApi};
use crate::clients::ConsoleClient;
use crate::config::ConsoleConfig;
use crate::console::ConsoleService;
use crate::error::ConsoleError;

/// Starts the console service and hands out its client.
pub struct ConsoleSystem {
    pub console_client: ConsoleClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl ConsoleSystem {
    /// Console talking HTTP to the service named in `config`.
    #[instrument(name = "console_system", skip(config), fields(api_url = %config.api_url))]
    pub fn new(config: &ConsoleConfig) -> Self {
        Self::with_api(config, Arc::new(HttpOrderApi::new(config)))
    }

    /// Console over any [`OrderApi`].
    pub fn with_api(config: &ConsoleConfig, api: Arc<dyn OrderApi>) -> Self {
        info!("Starting console system");

        let (console_service, console_client) = ConsoleService::new(config.buffer_size, api);
        let handles = vec![tokio::spawn(console_service.run())];

        info!("Console system started successfully");

        Self {
            console_client,
            handles,
        }
    }

    /// Stops the service loop and waits for it. Calls still in flight are
    /// abandoned, their replies dropped.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), ConsoleError> {
        info!("Shutting down console system");

        let _ = self.console_client.shutdown().await;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
                return Err(ConsoleError::ActorCommunicationError(format!(
                    "Service task failed: {e}"
                )));
            }
        }

        info!("Console system shutdown complete");
        Ok(())
    }
}
