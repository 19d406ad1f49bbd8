//! The playback device as seen by the jukebox
//!
//! [`PlaybackController`] is the small imperative surface request handling
//! needs. Production uses [`sonos_api::Speaker`]; tests use recording doubles.

pub use sonos_api::RampType;
use sonos_api::{FavoriteReference, Speaker};

use crate::error::ControllerError;

/// A playable item referenced by a favorite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteRef {
    pub title: String,
    pub uri: String,
    /// DIDL-Lite metadata sent along with the URI
    pub metadata: String,
}

impl From<FavoriteReference> for FavoriteRef {
    fn from(reference: FavoriteReference) -> Self {
        Self {
            title: reference.title,
            uri: reference.uri,
            metadata: reference.metadata,
        }
    }
}

impl From<&FavoriteRef> for FavoriteReference {
    fn from(reference: &FavoriteRef) -> Self {
        Self {
            title: reference.title.clone(),
            uri: reference.uri.clone(),
            metadata: reference.metadata.clone(),
        }
    }
}

/// Titled favorites in the order the device lists them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteCatalog {
    entries: Vec<(String, FavoriteRef)>,
}

impl FavoriteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, title: impl Into<String>, reference: FavoriteRef) {
        self.entries.push((title.into(), reference));
    }

    /// First entry whose title matches exactly
    pub fn find(&self, title: &str) -> Option<&FavoriteRef> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == title)
            .map(|(_, reference)| reference)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FavoriteRef)> {
        self.entries.iter().map(|(title, reference)| (title.as_str(), reference))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, FavoriteRef)> for FavoriteCatalog {
    fn from_iter<I: IntoIterator<Item = (String, FavoriteRef)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Remote control surface of a playback device
pub trait PlaybackController {
    /// Leave any group so queue operations are allowed
    fn unjoin(&self) -> Result<(), ControllerError>;

    fn clear_queue(&self) -> Result<(), ControllerError>;

    fn add_uri_to_queue(&self, uri: &str) -> Result<(), ControllerError>;

    fn add_to_queue(&self, reference: &FavoriteRef) -> Result<(), ControllerError>;

    fn ramp_to_volume(&self, volume: u8, ramp_type: RampType) -> Result<(), ControllerError>;

    /// Start playback at a 0-based queue index
    fn play_from_queue(&self, index: u32) -> Result<(), ControllerError>;

    fn set_shuffle(&self, enabled: bool) -> Result<(), ControllerError>;

    /// Fetch the favorites list; never cached
    fn favorites(&self) -> Result<FavoriteCatalog, ControllerError>;
}

impl PlaybackController for Speaker {
    fn unjoin(&self) -> Result<(), ControllerError> {
        Ok(Speaker::unjoin(self)?)
    }

    fn clear_queue(&self) -> Result<(), ControllerError> {
        Ok(Speaker::clear_queue(self)?)
    }

    fn add_uri_to_queue(&self, uri: &str) -> Result<(), ControllerError> {
        Speaker::add_uri_to_queue(self, uri)?;
        Ok(())
    }

    fn add_to_queue(&self, reference: &FavoriteRef) -> Result<(), ControllerError> {
        Speaker::add_to_queue(self, &FavoriteReference::from(reference))?;
        Ok(())
    }

    fn ramp_to_volume(&self, volume: u8, ramp_type: RampType) -> Result<(), ControllerError> {
        Speaker::ramp_to_volume(self, volume, ramp_type)?;
        Ok(())
    }

    fn play_from_queue(&self, index: u32) -> Result<(), ControllerError> {
        Ok(Speaker::play_from_queue(self, index)?)
    }

    fn set_shuffle(&self, enabled: bool) -> Result<(), ControllerError> {
        Ok(Speaker::set_shuffle(self, enabled)?)
    }

    // Matching uses the title of the referenced item, not the favorite's label
    fn favorites(&self) -> Result<FavoriteCatalog, ControllerError> {
        Ok(Speaker::favorites(self)?
            .into_iter()
            .map(|favorite| (favorite.reference.title.clone(), FavoriteRef::from(favorite.reference)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(uri: &str) -> FavoriteRef {
        FavoriteRef {
            title: String::new(),
            uri: uri.to_string(),
            metadata: String::new(),
        }
    }

    #[test]
    fn test_find_is_exact_and_first_match_wins() {
        let catalog: FavoriteCatalog = vec![
            ("Jazz".to_string(), reference("first")),
            ("jazz".to_string(), reference("lowercase")),
            ("Jazz".to_string(), reference("second")),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.find("Jazz").map(|r| r.uri.as_str()), Some("first"));
        assert_eq!(catalog.find("jazz").map(|r| r.uri.as_str()), Some("lowercase"));
        assert!(catalog.find("JAZZ").is_none());
        assert!(catalog.find("").is_none());
        assert_eq!(catalog.len(), 3);
    }
}
