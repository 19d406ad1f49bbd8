//! INI configuration
//!
//! ```ini
//! [rpi_jukebox]
//! jukebox_file = /etc/rpi_jukebox/jukebox.csv
//! debounce_time = 5
//! log_host = 192.168.1.10
//! log_port = 514
//! sonos_ip = 192.168.1.50
//! sonos_vol = 25
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::{Ini, Properties};

use crate::dispatcher::DebouncePolicy;
use crate::error::ConfigError;

/// Program name; also the INI section holding the settings
pub const PROG_NAME: &str = "rpi_jukebox";

/// Where the service looks for its configuration by default
pub const CONFIG_PATH: &str = "/etc/rpi_jukebox/rpi_jukebox.ini";

/// Default syslog port
pub const DEFAULT_LOG_PORT: u16 = 514;

/// Service settings read from the `[rpi_jukebox]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JukeboxConfig {
    /// CSV mapping card UIDs to Sonos URIs
    pub jukebox_file: PathBuf,
    /// Pause after each request
    pub debounce_time: Duration,
    /// Remote syslog host; logs only go to stderr when unset
    pub log_host: Option<String>,
    pub log_port: u16,
    pub sonos_ip: String,
    /// Volume used when a request does not override it
    pub sonos_vol: u8,
    /// Also pause after a request that failed
    pub debounce_on_error: bool,
}

/// Settings for one playback request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackConfig {
    pub device_ip: String,
    pub default_volume: u8,
    pub debounce: Duration,
    pub debounce_policy: DebouncePolicy,
}

impl JukeboxConfig {
    /// Load the `[rpi_jukebox]` section from an INI file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse INI text; `origin` only appears in error messages
    pub fn parse(text: &str, origin: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let origin = origin.as_ref();
        let ini = Ini::load_from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        let section = ini.section(Some(PROG_NAME)).ok_or_else(|| ConfigError::MissingSection {
            section: PROG_NAME.to_string(),
            path: origin.to_path_buf(),
        })?;
        let keys = Section { props: section, origin };

        let sonos_vol: u8 = keys.parse("sonos_vol")?;
        if sonos_vol > 100 {
            return Err(ConfigError::InvalidValue {
                key: "sonos_vol".to_string(),
                value: sonos_vol.to_string(),
                reason: "volume must be between 0 and 100".to_string(),
            });
        }

        Ok(Self {
            jukebox_file: PathBuf::from(keys.required("jukebox_file")?),
            debounce_time: Duration::from_secs(keys.parse("debounce_time")?),
            log_host: keys.optional("log_host").map(str::to_string),
            log_port: keys.parse_or("log_port", DEFAULT_LOG_PORT)?,
            sonos_ip: keys.required("sonos_ip")?.to_string(),
            sonos_vol,
            debounce_on_error: keys.parse_or("debounce_on_error", false)?,
        })
    }

    /// The settings a playback request needs
    pub fn playback(&self) -> PlaybackConfig {
        PlaybackConfig {
            device_ip: self.sonos_ip.clone(),
            default_volume: self.sonos_vol,
            debounce: self.debounce_time,
            debounce_policy: if self.debounce_on_error {
                DebouncePolicy::Always
            } else {
                DebouncePolicy::SuccessOnly
            },
        }
    }

    /// Remote syslog address, when configured
    pub fn syslog_target(&self) -> Option<(String, u16)> {
        self.log_host.clone().map(|host| (host, self.log_port))
    }
}

struct Section<'a> {
    props: &'a Properties,
    origin: &'a Path,
}

impl<'a> Section<'a> {
    /// Present and non-empty after trimming
    fn optional(&self, key: &str) -> Option<&'a str> {
        self.props.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<&'a str, ConfigError> {
        self.optional(key).ok_or_else(|| ConfigError::MissingKey {
            key: key.to_string(),
            path: self.origin.to_path_buf(),
        })
    }

    fn parse<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let value = self.required(key)?;
        value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(_) => self.parse(key),
            None => Ok(default),
        }
    }
}
