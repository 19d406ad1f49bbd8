use soap_client::SoapClient;

use crate::device::{DeviceDescription, DEVICE_DESCRIPTION_PATH};
use crate::operation::SonosOperation;
use crate::Result;

/// A client for executing Sonos operations against actual devices
///
/// Bridges the stateless operation definitions and the network: validates
/// the request, wraps it in SOAP via the `soap-client` crate and parses the
/// device's answer.
#[derive(Debug, Clone, Default)]
pub struct SonosClient {
    soap_client: SoapClient,
}

impl SonosClient {
    /// Create a client with the default SOAP transport (port 1400)
    pub fn new() -> Self {
        Self {
            soap_client: SoapClient::new(),
        }
    }

    /// Create a Sonos client with a custom SOAP client (timeouts, port)
    pub fn with_soap_client(soap_client: SoapClient) -> Self {
        Self { soap_client }
    }

    /// Execute a Sonos operation against a device
    ///
    /// # Example
    /// ```rust,ignore
    /// use sonos_api::services::av_transport::{PlayOperation, PlayOperationRequest};
    ///
    /// let client = SonosClient::new();
    /// let request = PlayOperationRequest { instance_id: 0, speed: "1".to_string() };
    /// client.execute::<PlayOperation>("192.168.1.50", &request)?;
    /// ```
    pub fn execute<Op: SonosOperation>(&self, ip: &str, request: &Op::Request) -> Result<Op::Response> {
        use crate::operation::Validate;

        request.validate()?;

        let service_info = Op::SERVICE.info();
        let payload = Op::build_payload(request);
        tracing::debug!(ip, service = Op::SERVICE.name(), action = Op::ACTION, "sending SOAP request");

        let xml = self.soap_client.call(
            ip,
            service_info.endpoint,
            service_info.service_uri,
            Op::ACTION,
            &payload,
        )?;

        Op::parse_response(&xml)
    }

    /// Fetch and parse the device's UPnP description
    pub fn device_description(&self, ip: &str) -> Result<DeviceDescription> {
        let xml = self.soap_client.fetch(ip, DEVICE_DESCRIPTION_PATH)?;
        DeviceDescription::from_xml(&xml)
    }
}
