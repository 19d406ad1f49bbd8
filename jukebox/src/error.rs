//! Error types for the jukebox
//!
//! Each concern gets its own enum so the polling loop can tell a fatal
//! startup problem from a card that simply failed to play.

use std::fmt;
use std::path::PathBuf;

use sonos_api::ApiError;
use thiserror::Error;

use crate::logging::LoggingError;

/// Problems loading the INI configuration; always fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ini::ParseError,
    },

    #[error("Could not find section [{section}] in config file {path}")]
    MissingSection { section: String, path: PathBuf },

    #[error("Could not find required option '{key}' in config file {path}")]
    MissingKey { key: String, path: PathBuf },

    #[error("Invalid value '{value}' for option '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Problems loading the card table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Unable to load jukebox file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid row in jukebox file at line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: csv::Error,
    },
}

/// Card reader failures
#[derive(Debug, Error)]
pub enum ReaderError {
    /// A garbled exchange with the reader; the next poll usually succeeds
    #[error("Transient reader error: {0}")]
    Transient(String),

    #[error("Reader I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input source closed (keyboard readers at end of input)
    #[error("Card reader disconnected")]
    Disconnected,
}

impl ReaderError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ReaderError::Transient(_))
    }
}

/// Single-instance lock failures
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Another instance already holds the lock at {path}")]
    AlreadyRunning { path: PathBuf },

    #[error("Unable to lock {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of the playback controller
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The controller could not be used at all
    #[error("Playback controller unavailable: {0}")]
    Unavailable(String),
}

/// The step of a playback request that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    FetchFavorites,
    Unjoin,
    ClearQueue,
    AddToQueue,
    SetPlayMode,
    RampVolume,
    Play,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::FetchFavorites => "fetch favorites",
            Step::Unjoin => "unjoin",
            Step::ClearQueue => "clear queue",
            Step::AddToQueue => "add to queue",
            Step::SetPlayMode => "set play mode",
            Step::RampVolume => "ramp volume",
            Step::Play => "play from queue",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A playback request that failed partway; nothing is retried
#[derive(Debug, Error)]
#[error("Playback request failed at step '{step}': {source}")]
pub struct DispatchError {
    pub step: Step,
    #[source]
    pub source: ControllerError,
}

impl DispatchError {
    pub fn new(step: Step, source: impl Into<ControllerError>) -> Self {
        Self {
            step,
            source: source.into(),
        }
    }
}

/// Top-level error for the jukebox service
#[derive(Debug, Error)]
pub enum JukeboxError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Reader(#[from] ReaderError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("Unable to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

pub type Result<T> = std::result::Result<T, JukeboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_error_names_the_step() {
        let err = DispatchError::new(Step::ClearQueue, ApiError::SoapFault(800));
        assert_eq!(err.step, Step::ClearQueue);
        assert_eq!(
            err.to_string(),
            "Playback request failed at step 'clear queue': SOAP fault: error code 800"
        );
    }

    #[test]
    fn test_only_transient_reader_errors_are_skippable() {
        assert!(ReaderError::Transient("no ACK".into()).is_transient());
        assert!(!ReaderError::Disconnected.is_transient());
        assert!(!ReaderError::Io(std::io::Error::other("bus gone")).is_transient());
    }
}
