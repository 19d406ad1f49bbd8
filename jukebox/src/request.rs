//! Turning a raw card URI into a playback action
//!
//! A card carries either a URI the player can enqueue as is, or a favorite
//! reference of the form `x-SONOSFAV:<options>:<title>`. Options are comma
//! separated: `SHUF` turns shuffle on and `VOL<n>` overrides the volume. The
//! title is everything after the second colon, so it may contain colons.

use thiserror::Error;

use crate::controller::{FavoriteCatalog, FavoriteRef};

/// Prefix marking a favorite reference
pub const FAVORITE_PREFIX: &str = "x-SONOSFAV";

const SHUFFLE_OPTION: &str = "SHUF";
const VOLUME_OPTION: &str = "VOL";

/// A raw request, classified but not yet resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackRequest {
    /// Opaque URI handed to the player unchanged
    Direct(String),
    Favorite { options: Vec<String>, title: String },
}

impl PlaybackRequest {
    pub fn parse(raw: &str) -> Self {
        let mut segments = raw.split(':');
        if segments.next() != Some(FAVORITE_PREFIX) {
            return PlaybackRequest::Direct(raw.to_string());
        }

        let options = segments
            .next()
            .map(|list| list.split(',').map(str::to_string).collect())
            .unwrap_or_default();
        let title = segments.collect::<Vec<_>>().join(":");

        PlaybackRequest::Favorite { options, title }
    }
}

/// What the dispatcher should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAction {
    PlayDirectUri(String),
    PlayFavorite {
        reference: FavoriteRef,
        shuffle: bool,
        volume_override: Option<u8>,
    },
    NotFound {
        title: String,
    },
}

/// A `VOL<n>` option that is not a usable volume
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VolumeParseError {
    #[error("Failed to set volume by favorite option {token}: not a number")]
    NotANumber { token: String },

    #[error("Failed to set volume by favorite option {token}: {value} is outside 0..=100")]
    OutOfRange { token: String, value: i64 },
}

/// Modifiers parsed from a favorite's option list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FavoriteOptions {
    pub shuffle: bool,
    pub volume: Option<u8>,
}

impl FavoriteOptions {
    /// Only the first `VOL` option counts; a bad one is logged and ignored
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let tokens: Vec<&str> = tokens.iter().map(|token| token.as_ref()).collect();
        let shuffle = tokens.contains(&SHUFFLE_OPTION);
        let volume = tokens
            .iter()
            .find(|token| token.starts_with(VOLUME_OPTION))
            .and_then(|token| match parse_volume(token) {
                Ok(volume) => Some(volume),
                Err(e) => {
                    tracing::warn!("{}", e);
                    None
                }
            });

        Self { shuffle, volume }
    }
}

/// Parse a `VOL<n>` option
pub fn parse_volume(token: &str) -> Result<u8, VolumeParseError> {
    let digits = token.strip_prefix(VOLUME_OPTION).unwrap_or(token).trim();
    let value: i64 = digits.parse().map_err(|_| VolumeParseError::NotANumber {
        token: token.to_string(),
    })?;

    match u8::try_from(value) {
        Ok(volume) if volume <= 100 => Ok(volume),
        _ => Err(VolumeParseError::OutOfRange {
            token: token.to_string(),
            value,
        }),
    }
}

/// Resolve a raw URI into an action
///
/// `fetch_catalog` runs at most once, and only for favorite references. Its
/// error is returned unchanged.
pub fn resolve<E, F>(raw_uri: &str, fetch_catalog: F) -> Result<ResolvedAction, E>
where
    F: FnOnce() -> Result<FavoriteCatalog, E>,
{
    let (options, title) = match PlaybackRequest::parse(raw_uri) {
        PlaybackRequest::Direct(uri) => return Ok(ResolvedAction::PlayDirectUri(uri)),
        PlaybackRequest::Favorite { options, title } => (options, title),
    };

    let catalog = fetch_catalog()?;
    let Some(reference) = catalog.find(&title) else {
        return Ok(ResolvedAction::NotFound { title });
    };

    let options = FavoriteOptions::from_tokens(&options);
    Ok(ResolvedAction::PlayFavorite {
        reference: reference.clone(),
        shuffle: options.shuffle,
        volume_override: options.volume,
    })
}
