//! Sonos control API for the jukebox
//!
//! A small, type-safe layer over the private `soap-client` crate covering the
//! UPnP actions needed to turn a card scan into playback: leaving a group,
//! rebuilding the queue, ramping volume, starting playback and browsing the
//! player's favorites.
//!
//! ```rust,ignore
//! use sonos_api::{RampType, Speaker};
//!
//! let speaker = Speaker::new("192.168.1.50");
//! speaker.unjoin()?;
//! speaker.clear_queue()?;
//! speaker.add_uri_to_queue("x-sonos-spotify:spotify%3atrack%3a123")?;
//! speaker.ramp_to_volume(25, RampType::Autoplay)?;
//! speaker.play_from_queue(0)?;
//! ```

pub mod client;
pub mod device;
pub mod didl;
pub mod error;
pub mod operation;
pub mod service;
pub mod services;
pub mod speaker;

pub use client::SonosClient;
pub use device::DeviceDescription;
pub use didl::{Favorite, FavoriteReference, TrackMetadata};
pub use error::{ApiError, Result};
pub use operation::{SonosOperation, Validate, ValidationError};
pub use service::{Service, ServiceInfo};
pub use services::av_transport::PlayMode;
pub use services::rendering_control::RampType;
pub use speaker::{Speaker, TrackInfo};
