//! Driving the player through a resolved action
//!
//! Every play request runs the same sequence: leave any group, clear the
//! queue, enqueue, set the play mode, ramp the volume and start from the
//! first queue entry. The dispatcher then blocks for the debounce interval
//! so a card left on the reader does not restart playback over and over.

use std::thread;

use parking_lot::Mutex;
use tracing::Dispatch;

use crate::config::PlaybackConfig;
use crate::controller::{FavoriteRef, PlaybackController, RampType};
use crate::error::{ControllerError, DispatchError, Step};
use crate::request::ResolvedAction;

/// When to block after a request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DebouncePolicy {
    /// Only after playback started
    #[default]
    SuccessOnly,
    /// After every dispatched request, failed or not
    Always,
}

/// Result of a dispatched action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Played { volume: u8, shuffle: bool },
    FavoriteNotFound { title: String },
}

enum Enqueue<'a> {
    Uri(&'a str),
    Favorite(&'a FavoriteRef),
}

/// Runs resolved actions against a controller, one at a time
#[derive(Debug)]
pub struct Dispatcher {
    config: PlaybackConfig,
    logger: Dispatch,
    lock: Mutex<()>,
}

impl Dispatcher {
    /// Log to the subscriber current at construction time
    pub fn new(config: PlaybackConfig) -> Self {
        let logger = tracing::dispatcher::get_default(Dispatch::clone);
        Self::with_logger(config, logger)
    }

    pub fn with_logger(config: PlaybackConfig, logger: Dispatch) -> Self {
        Self {
            config,
            logger,
            lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Run `action` to completion, including the debounce
    ///
    /// Concurrent callers are serialized for the whole sequence.
    pub fn dispatch<C>(&self, action: &ResolvedAction, controller: &C) -> Result<DispatchOutcome, DispatchError>
    where
        C: PlaybackController + ?Sized,
    {
        let _guard = self.lock.lock();
        tracing::dispatcher::with_default(&self.logger, || self.run(action, controller))
    }

    fn run<C>(&self, action: &ResolvedAction, controller: &C) -> Result<DispatchOutcome, DispatchError>
    where
        C: PlaybackController + ?Sized,
    {
        let result = match action {
            ResolvedAction::NotFound { title } => {
                tracing::info!("No favorite to play found matching {}", title);
                return Ok(DispatchOutcome::FavoriteNotFound { title: title.clone() });
            }
            ResolvedAction::PlayDirectUri(uri) => {
                self.play(controller, Enqueue::Uri(uri), false, self.config.default_volume)
            }
            ResolvedAction::PlayFavorite {
                reference,
                shuffle,
                volume_override,
            } => self.play(
                controller,
                Enqueue::Favorite(reference),
                *shuffle,
                volume_override.unwrap_or(self.config.default_volume),
            ),
        };

        match &result {
            Ok(_) => self.debounce(),
            Err(e) => {
                tracing::debug!(step = %e.step, "playback sequence aborted");
                self.debounce_after_failure();
            }
        }
        result
    }

    fn play<C>(&self, controller: &C, item: Enqueue<'_>, shuffle: bool, volume: u8) -> Result<DispatchOutcome, DispatchError>
    where
        C: PlaybackController + ?Sized,
    {
        // Queue operations are rejected unless the player coordinates its own group
        controller.unjoin().map_err(at(Step::Unjoin))?;
        controller.clear_queue().map_err(at(Step::ClearQueue))?;
        match item {
            Enqueue::Uri(uri) => controller.add_uri_to_queue(uri),
            Enqueue::Favorite(reference) => controller.add_to_queue(reference),
        }
        .map_err(at(Step::AddToQueue))?;
        controller.set_shuffle(shuffle).map_err(at(Step::SetPlayMode))?;
        controller
            .ramp_to_volume(volume, RampType::Autoplay)
            .map_err(at(Step::RampVolume))?;
        controller.play_from_queue(0).map_err(at(Step::Play))?;

        tracing::debug!(volume, shuffle, "playback started");
        Ok(DispatchOutcome::Played { volume, shuffle })
    }

    fn debounce(&self) {
        if !self.config.debounce.is_zero() {
            tracing::debug!(seconds = self.config.debounce.as_secs_f64(), "debouncing");
            thread::sleep(self.config.debounce);
        }
    }

    /// Debounce after a failed request, if the policy asks for it
    pub(crate) fn debounce_after_failure(&self) {
        if self.config.debounce_policy == DebouncePolicy::Always {
            self.debounce();
        }
    }
}

fn at(step: Step) -> impl FnOnce(ControllerError) -> DispatchError {
    move |source| DispatchError { step, source }
}
