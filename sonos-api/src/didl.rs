//! DIDL-Lite handling for favorites and track metadata.
//!
//! Sonos favorites live in the `FV:2` container. Each entry carries the
//! playable URI in `<res>` and, in `<r:resMD>`, the escaped DIDL-Lite
//! metadata of the item it points at:
//!
//! ```xml
//! <DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" ...>
//!   <item id="FV:2/13" parentID="FV:2" restricted="false">
//!     <dc:title>Morning Jazz</dc:title>
//!     <upnp:class>object.itemobject.item.sonos-favorite</upnp:class>
//!     <res protocolInfo="x-rincon-cpcontainer:*:*:*">x-rincon-cpcontainer:1006206cplaylist</res>
//!     <r:resMD>&lt;DIDL-Lite ...&gt;...&lt;/DIDL-Lite&gt;</r:resMD>
//!   </item>
//! </DIDL-Lite>
//! ```

use xmltree::{Element, XMLNode};

use crate::error::{ApiError, Result};
use crate::operation::escape;

/// Object id of the Sonos favorites container
pub const FAVORITES_CONTAINER: &str = "FV:2";

const DIDL_NAMESPACES: &str = r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/" xmlns:r="urn:schemas-rinconnetworks-com:metadata-1-0/" xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/""#;

/// The playable item a favorite points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteReference {
    /// Title of the referenced item, taken from its own metadata
    pub title: String,
    /// URI to enqueue
    pub uri: String,
    /// DIDL-Lite metadata to enqueue alongside the URI
    pub metadata: String,
}

/// An entry of the player's favorites list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favorite {
    /// Title shown in the Sonos app
    pub title: String,
    pub reference: FavoriteReference,
}

/// Title and artist of a track, from `TrackMetaData`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub creator: String,
    pub album: String,
}

/// Parse one page of the favorites container
///
/// Entries without a `<res>` URI cannot be enqueued and are skipped.
pub fn parse_favorites(didl: &str) -> Result<Vec<Favorite>> {
    let root = parse_document(didl)?;
    let mut favorites = Vec::new();

    for entry in entries(&root) {
        let title = text_of(entry, "title").unwrap_or_default();
        let uri = match text_of(entry, "res") {
            Some(uri) if !uri.is_empty() => uri,
            _ => {
                tracing::debug!(title = %title, "skipping favorite without a playable resource");
                continue;
            }
        };
        let metadata = text_of(entry, "resMD").unwrap_or_default();
        let reference_title = metadata_title(&metadata).unwrap_or_else(|| title.clone());

        favorites.push(Favorite {
            title,
            reference: FavoriteReference {
                title: reference_title,
                uri,
                metadata,
            },
        });
    }

    Ok(favorites)
}

/// Minimal metadata for enqueueing a bare URI
pub fn uri_metadata(uri: &str) -> String {
    format!(
        r#"<DIDL-Lite {}><item id="" parentID="" restricted="true"><dc:title></dc:title><upnp:class>object</upnp:class><res protocolInfo="x-rincon-playlist:*:*:*">{}</res><desc id="cdudn" nameSpace="urn:schemas-rinconnetworks-com:metadata-1-0/">RINCON_AssociatedZPUDN</desc></item></DIDL-Lite>"#,
        DIDL_NAMESPACES,
        escape(uri)
    )
}

/// Parse `TrackMetaData`; players report `NOT_IMPLEMENTED` or nothing when idle
pub fn parse_track_metadata(didl: &str) -> Option<TrackMetadata> {
    let trimmed = didl.trim();
    if trimmed.is_empty() || trimmed == "NOT_IMPLEMENTED" {
        return None;
    }

    let root = parse_document(trimmed).ok()?;
    let item = entries(&root).next()?;
    Some(TrackMetadata {
        title: text_of(item, "title").unwrap_or_default(),
        creator: text_of(item, "creator").unwrap_or_default(),
        album: text_of(item, "album").unwrap_or_default(),
    })
}

fn parse_document(didl: &str) -> Result<Element> {
    Element::parse(didl.as_bytes()).map_err(|e| ApiError::ParseError(format!("Invalid DIDL-Lite: {}", e)))
}

fn entries(root: &Element) -> impl Iterator<Item = &Element> {
    root.children
        .iter()
        .filter_map(XMLNode::as_element)
        .filter(|e| e.name == "item" || e.name == "container")
}

fn text_of(element: &Element, name: &str) -> Option<String> {
    element
        .get_child(name)
        .map(|child| child.get_text().map(|t| t.into_owned()).unwrap_or_default())
}

fn metadata_title(metadata: &str) -> Option<String> {
    if metadata.trim().is_empty() {
        return None;
    }
    let root = parse_document(metadata).ok()?;
    let item = entries(&root).next()?;
    text_of(item, "title")
}
