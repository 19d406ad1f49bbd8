//! One card scan, start to finish

use sonos_api::{SonosClient, Speaker};
use tracing::Dispatch;

use crate::config::PlaybackConfig;
use crate::controller::PlaybackController;
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::error::{DispatchError, Step};
use crate::request;

/// Resolves raw URIs and dispatches them to the configured player
///
/// A fresh [`Speaker`] handle is built for every request.
#[derive(Debug)]
pub struct RequestProcessor {
    dispatcher: Dispatcher,
    client: SonosClient,
    logger: Dispatch,
}

impl RequestProcessor {
    pub fn new(config: PlaybackConfig) -> Self {
        let logger = tracing::dispatcher::get_default(Dispatch::clone);
        Self {
            dispatcher: Dispatcher::with_logger(config, logger.clone()),
            client: SonosClient::new(),
            logger,
        }
    }

    /// Use a custom client (port, timeouts) for the player
    pub fn with_client(mut self, client: SonosClient) -> Self {
        self.client = client;
        self
    }

    /// Send this processor's logs to `logger`
    pub fn with_logger(self, logger: Dispatch) -> Self {
        let config = self.dispatcher.config().clone();
        Self {
            dispatcher: Dispatcher::with_logger(config, logger.clone()),
            client: self.client,
            logger,
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        self.dispatcher.config()
    }

    /// Play `raw_uri` on the configured player
    pub fn process(&self, raw_uri: &str) -> Result<DispatchOutcome, DispatchError> {
        let speaker = Speaker::with_client(self.config().device_ip.clone(), self.client.clone());
        self.process_with(&speaker, raw_uri)
    }

    /// Play `raw_uri` through an arbitrary controller
    pub fn process_with<C>(&self, controller: &C, raw_uri: &str) -> Result<DispatchOutcome, DispatchError>
    where
        C: PlaybackController + ?Sized,
    {
        let action = tracing::dispatcher::with_default(&self.logger, || {
            request::resolve(raw_uri, || controller.favorites())
        });

        match action {
            Ok(action) => self.dispatcher.dispatch(&action, controller),
            Err(source) => {
                self.dispatcher.debounce_after_failure();
                Err(DispatchError {
                    step: Step::FetchFavorites,
                    source,
                })
            }
        }
    }
}

/// Play `raw_uri` on the player named by `config`
pub fn process_request(config: &PlaybackConfig, raw_uri: &str) -> Result<DispatchOutcome, DispatchError> {
    RequestProcessor::new(config.clone()).process(raw_uri)
}
