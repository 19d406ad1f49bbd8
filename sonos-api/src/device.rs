//! Device description parsing.
//!
//! The player's UDN is needed to address its own queue
//! (`x-rincon-queue:<uid>#0`).

use serde::Deserialize;

use crate::error::{ApiError, Result};

/// Path of the UPnP device description on every player
pub const DEVICE_DESCRIPTION_PATH: &str = "xml/device_description.xml";

#[derive(Debug, Deserialize)]
struct Root {
    device: DeviceDescription,
}

/// The parts of the UPnP device description the jukebox uses
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescription {
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub friendly_name: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub model_name: String,
    #[serde(rename = "UDN")]
    pub udn: String,
    pub room_name: Option<String>,
}

impl DeviceDescription {
    /// Parse the description document served at [`DEVICE_DESCRIPTION_PATH`]
    pub fn from_xml(xml: &str) -> Result<Self> {
        let root: Root = quick_xml::de::from_str(xml)
            .map_err(|e| ApiError::ParseError(format!("Failed to parse device XML: {}", e)))?;
        Ok(root.device)
    }

    /// Player UID, e.g. `RINCON_000E58A0123401400`
    pub fn uid(&self) -> &str {
        self.udn.trim_start_matches("uuid:")
    }
}
