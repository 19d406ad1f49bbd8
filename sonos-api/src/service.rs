/// The UPnP services of a Sonos player the jukebox talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// AVTransport service - queue and transport control (play, seek, play mode)
    AVTransport,

    /// RenderingControl service - volume and other audio rendering settings
    RenderingControl,

    /// ContentDirectory service - browsing the player's music library and favorites
    ContentDirectory,
}

/// Contains the endpoint and service URI information for a UPnP service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    /// The HTTP control endpoint path (relative to the device base URL)
    pub endpoint: &'static str,

    /// The UPnP service URI used in SOAP requests
    pub service_uri: &'static str,
}

impl Service {
    /// Get the name of this service as a string
    pub fn name(&self) -> &'static str {
        match self {
            Service::AVTransport => "AVTransport",
            Service::RenderingControl => "RenderingControl",
            Service::ContentDirectory => "ContentDirectory",
        }
    }

    /// Get the control endpoint and service URI for this service
    pub fn info(&self) -> ServiceInfo {
        match self {
            Service::AVTransport => ServiceInfo {
                endpoint: "MediaRenderer/AVTransport/Control",
                service_uri: "urn:schemas-upnp-org:service:AVTransport:1",
            },
            Service::RenderingControl => ServiceInfo {
                endpoint: "MediaRenderer/RenderingControl/Control",
                service_uri: "urn:schemas-upnp-org:service:RenderingControl:1",
            },
            Service::ContentDirectory => ServiceInfo {
                endpoint: "MediaServer/ContentDirectory/Control",
                service_uri: "urn:schemas-upnp-org:service:ContentDirectory:1",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_endpoints_match_service_names() {
        for service in [Service::AVTransport, Service::RenderingControl, Service::ContentDirectory] {
            let info = service.info();
            assert!(info.endpoint.ends_with("/Control"));
            assert!(info.endpoint.contains(service.name()));
            assert!(info.service_uri.contains(service.name()));
        }
    }

    #[test]
    fn test_content_directory_lives_on_media_server() {
        assert_eq!(
            Service::ContentDirectory.info().endpoint,
            "MediaServer/ContentDirectory/Control"
        );
    }
}
