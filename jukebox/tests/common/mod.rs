//! Shared test doubles

#![allow(dead_code)]

use std::io::{self, Write};
use std::mem::{discriminant, Discriminant};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rpi_jukebox::controller::RampType;
use rpi_jukebox::{ControllerError, DebouncePolicy, FavoriteCatalog, FavoriteRef, PlaybackConfig, PlaybackController};
use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;

/// One call made against a [`RecordingController`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Unjoin,
    ClearQueue,
    AddUri(String),
    AddFavorite(String),
    Ramp(u8, RampType),
    PlayFromQueue(u32),
    SetShuffle(bool),
    Favorites,
}

/// Records every call and optionally fails one kind of call
#[derive(Debug, Default)]
pub struct RecordingController {
    calls: Mutex<Vec<Call>>,
    catalog: FavoriteCatalog,
    fail_on: Option<Discriminant<Call>>,
    call_delay: Duration,
}

impl RecordingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_favorites(titles: &[&str]) -> Self {
        Self {
            catalog: catalog(titles),
            ..Self::default()
        }
    }

    /// Fail every call of the same kind as `call`
    pub fn failing_on(mut self, call: Call) -> Self {
        self.fail_on = Some(discriminant(&call));
        self
    }

    /// Sleep inside every call
    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) -> Result<(), ControllerError> {
        let fails = self.fail_on == Some(discriminant(&call));
        self.calls.lock().push(call);
        if !self.call_delay.is_zero() {
            std::thread::sleep(self.call_delay);
        }
        if fails {
            Err(ControllerError::Unavailable("scripted failure".into()))
        } else {
            Ok(())
        }
    }
}

impl PlaybackController for RecordingController {
    fn unjoin(&self) -> Result<(), ControllerError> {
        self.record(Call::Unjoin)
    }

    fn clear_queue(&self) -> Result<(), ControllerError> {
        self.record(Call::ClearQueue)
    }

    fn add_uri_to_queue(&self, uri: &str) -> Result<(), ControllerError> {
        self.record(Call::AddUri(uri.to_string()))
    }

    fn add_to_queue(&self, reference: &FavoriteRef) -> Result<(), ControllerError> {
        self.record(Call::AddFavorite(reference.uri.clone()))
    }

    fn ramp_to_volume(&self, volume: u8, ramp_type: RampType) -> Result<(), ControllerError> {
        self.record(Call::Ramp(volume, ramp_type))
    }

    fn play_from_queue(&self, index: u32) -> Result<(), ControllerError> {
        self.record(Call::PlayFromQueue(index))
    }

    fn set_shuffle(&self, enabled: bool) -> Result<(), ControllerError> {
        self.record(Call::SetShuffle(enabled))
    }

    fn favorites(&self) -> Result<FavoriteCatalog, ControllerError> {
        self.record(Call::Favorites)?;
        Ok(self.catalog.clone())
    }
}

/// A favorite's URI derived from its title
pub fn favorite_uri(title: &str) -> String {
    format!("x-rincon-cpcontainer:{}", title.to_lowercase().replace(' ', "-"))
}

pub fn catalog(titles: &[&str]) -> FavoriteCatalog {
    titles
        .iter()
        .map(|title| {
            (
                title.to_string(),
                FavoriteRef {
                    title: title.to_string(),
                    uri: favorite_uri(title),
                    metadata: String::new(),
                },
            )
        })
        .collect()
}

pub fn playback_config(default_volume: u8, debounce: Duration, debounce_policy: DebouncePolicy) -> PlaybackConfig {
    PlaybackConfig {
        device_ip: "127.0.0.1".to_string(),
        default_volume,
        debounce,
        debounce_policy,
    }
}

/// Collects formatted log output for assertions
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn dispatch(&self) -> Dispatch {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        Dispatch::new(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
