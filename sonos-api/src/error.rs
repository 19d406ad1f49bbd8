use soap_client::SoapError;
use thiserror::Error;

use crate::operation::ValidationError;

/// High-level API errors for Sonos operations
///
/// Abstracts the SOAP transport details into the failure modes a caller can
/// act on when driving a player.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network communication error
    ///
    /// Connection timeouts, refused connections or the device being unreachable.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Response parsing error
    ///
    /// The device answered but the response (SOAP body, DIDL-Lite, device
    /// description) could not be parsed into the expected shape.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// SOAP fault returned by device
    ///
    /// The device rejected the action, e.g. queue manipulation on a speaker
    /// that is not the coordinator of its group.
    #[error("SOAP fault: error code {0}")]
    SoapFault(u16),

    /// Invalid parameter value, rejected before anything is sent
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Device operation error
    ///
    /// The device is reachable but in a state that cannot satisfy the request.
    #[error("Device error: {0}")]
    DeviceError(String),
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<SoapError> for ApiError {
    fn from(error: SoapError) -> Self {
        match error {
            SoapError::Network(msg) => ApiError::NetworkError(msg),
            SoapError::Parse(msg) => ApiError::ParseError(msg),
            SoapError::Fault(code) => ApiError::SoapFault(code),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(validation_error: ValidationError) -> Self {
        match validation_error {
            ValidationError::InvalidValue { parameter, value, reason } => ApiError::InvalidParameter(
                format!("Invalid value '{}' for parameter '{}': {}", value, parameter, reason),
            ),
            ValidationError::RangeError { parameter, value, min, max } => ApiError::InvalidParameter(format!(
                "Parameter '{}' value {} is out of range [{}, {}]",
                parameter, value, min, max
            )),
        }
    }
}
