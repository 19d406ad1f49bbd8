//! Operation framework for UPnP actions
//!
//! Every action the jukebox sends is a zero-sized type implementing
//! [`SonosOperation`]: it names its service and action, renders its request
//! into the SOAP payload and parses the matching `<ActionResponse>` element.
//! Requests are validated before anything goes on the wire.

pub mod macros;

use std::borrow::Cow;
use std::str::FromStr;

use serde::Serialize;
use xmltree::Element;

use crate::error::ApiError;
use crate::service::Service;

/// Base trait for all Sonos API operations
pub trait SonosOperation {
    /// The request type for this operation
    type Request: Serialize + Validate;

    /// The typed response of this operation
    type Response;

    /// The UPnP service this operation belongs to
    const SERVICE: Service;

    /// The SOAP action name for this operation
    const ACTION: &'static str;

    /// Build the XML payload that goes inside the action element
    ///
    /// Argument values are escaped here; the SOAP client inserts the payload verbatim.
    fn build_payload(request: &Self::Request) -> String;

    /// Parse the `<ActionResponse>` element into the typed response
    fn parse_response(xml: &Element) -> Result<Self::Response, ApiError>;
}

/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Parameter '{parameter}' value '{value}' is out of range ({min}..={max})")]
    RangeError {
        parameter: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("Parameter '{parameter}' value '{value}' is invalid: {reason}")]
    InvalidValue {
        parameter: String,
        value: String,
        reason: String,
    },
}

impl ValidationError {
    pub fn range_error(
        parameter: &str,
        min: impl std::fmt::Display,
        max: impl std::fmt::Display,
        value: impl std::fmt::Display,
    ) -> Self {
        Self::RangeError {
            parameter: parameter.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn invalid_value(parameter: &str, value: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Trait for request types that can be checked before sending
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Render `<name>value</name>` with the value XML-escaped
pub fn xml_element(name: &str, value: &str) -> String {
    format!("<{name}>{}</{name}>", escape(value), name = name)
}

/// XML-escape a text value
pub fn escape(value: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(value)
}

/// Text of a required child element; an empty element yields an empty string
pub fn child_text(xml: &Element, name: &str) -> Result<String, ApiError> {
    let child = xml
        .get_child(name)
        .ok_or_else(|| ApiError::ParseError(format!("Missing {} in {}", name, xml.name)))?;
    Ok(child.get_text().map(|t| t.into_owned()).unwrap_or_default())
}

/// Parse a required child element's text into `T`
pub fn child_value<T: FromStr>(xml: &Element, name: &str) -> Result<T, ApiError> {
    let text = child_text(xml, name)?;
    text.trim()
        .parse()
        .map_err(|_| ApiError::ParseError(format!("Invalid {} value '{}'", name, text)))
}
