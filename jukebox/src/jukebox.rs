//! The polling loop tying reader, card table and playback together

use std::thread;
use std::time::Duration;

use crate::dispatcher::DispatchOutcome;
use crate::error::{DispatchError, ReaderError};
use crate::reader::CardReader;
use crate::shutdown::ShutdownFlag;
use crate::table::JukeboxTable;

/// Pauses used by the polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    /// How long a single reader poll may wait for a card
    pub read_timeout: Duration,
    /// Pause when no card is present
    pub idle_sleep: Duration,
    /// Pause after an unregistered card, so it is not reported on every poll
    pub unregistered_sleep: Duration,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_millis(500),
            idle_sleep: Duration::from_millis(100),
            unregistered_sleep: Duration::from_secs(1),
        }
    }
}

/// Poll `reader` until `shutdown` is raised
///
/// Each registered card is passed to `handle` with its Sonos URI. Playback
/// failures and transient reader errors are logged and polling continues;
/// any other reader error ends the loop.
pub fn run<R, F>(
    reader: &mut R,
    table: &JukeboxTable,
    shutdown: &ShutdownFlag,
    timing: LoopTiming,
    mut handle: F,
) -> Result<(), ReaderError>
where
    R: CardReader + ?Sized,
    F: FnMut(&str) -> Result<DispatchOutcome, DispatchError>,
{
    while !shutdown.is_raised() {
        let uid = match reader.read_card(timing.read_timeout) {
            Ok(Some(uid)) => uid,
            Ok(None) => {
                thread::sleep(timing.idle_sleep);
                continue;
            }
            Err(e) if e.is_transient() => {
                tracing::error!("Caught runtime error while waiting to read from card reader: {}", e);
                continue;
            }
            Err(e) => return Err(e),
        };

        match table.get(&uid) {
            Some(entry) => {
                tracing::info!("Received request for \"{}\" via card UID: {}", entry.media_desc, uid);
                if let Err(e) = handle(&entry.sonos_uri) {
                    tracing::error!("Caught exception: {}", e);
                }
            }
            None => {
                tracing::info!("Unregistered card UID: {}", uid);
                thread::sleep(timing.unregistered_sleep);
            }
        }
    }

    tracing::warn!("Caught signal to terminate...");
    Ok(())
}
