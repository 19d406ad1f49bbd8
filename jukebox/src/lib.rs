//! RFID/NFC jukebox for Sonos players
//!
//! A card reader is polled for card UIDs. Each UID is looked up in a CSV
//! table that maps it to a Sonos URI, and the URI is played on the
//! configured player:
//!
//! - a plain URI (`x-sonos-spotify:...`, `x-file-cifs://...`) is enqueued as is;
//! - `x-SONOSFAV:<options>:<title>` plays the favorite with that title,
//!   where the options `SHUF` and `VOL<n>` turn on shuffle and override the
//!   volume.
//!
//! ```rust,ignore
//! use rpi_jukebox::{JukeboxConfig, RequestProcessor};
//!
//! let config = JukeboxConfig::load("/etc/rpi_jukebox/rpi_jukebox.ini")?;
//! let processor = RequestProcessor::new(config.playback());
//! processor.process("x-SONOSFAV:SHUF,VOL40:Morning Jazz Mix")?;
//! ```

pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod jukebox;
pub mod lock;
pub mod logging;
pub mod processor;
pub mod reader;
pub mod request;
pub mod shutdown;
pub mod table;

pub use config::{JukeboxConfig, PlaybackConfig, PROG_NAME};
pub use controller::{FavoriteCatalog, FavoriteRef, PlaybackController};
pub use dispatcher::{DebouncePolicy, DispatchOutcome, Dispatcher};
pub use error::{
    ConfigError, ControllerError, DispatchError, JukeboxError, LockError, ReaderError, Result, Step, TableError,
};
pub use processor::{process_request, RequestProcessor};
pub use request::{resolve, PlaybackRequest, ResolvedAction, VolumeParseError};
pub use reader::{CardReader, CardUid};
pub use shutdown::ShutdownFlag;
pub use table::JukeboxTable;
