//! ContentDirectory service: browsing the player's library and favorites

use serde::Serialize;
use xmltree::Element;

use crate::error::ApiError;
use crate::operation::{child_text, child_value, xml_element, SonosOperation, Validate, ValidationError};
use crate::service::Service;

/// Largest page the players reliably return in one `Browse`
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BrowseFlag {
    BrowseMetadata,
    BrowseDirectChildren,
}

impl BrowseFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowseFlag::BrowseMetadata => "BrowseMetadata",
            BrowseFlag::BrowseDirectChildren => "BrowseDirectChildren",
        }
    }
}

pub struct BrowseOperation;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct BrowseOperationRequest {
    pub object_id: String,
    pub browse_flag: BrowseFlag,
    pub filter: String,
    pub starting_index: u32,
    pub requested_count: u32,
    pub sort_criteria: String,
}

impl BrowseOperationRequest {
    /// One page of a container's children with every property included
    pub fn direct_children(object_id: &str, starting_index: u32, requested_count: u32) -> Self {
        Self {
            object_id: object_id.to_string(),
            browse_flag: BrowseFlag::BrowseDirectChildren,
            filter: "*".to_string(),
            starting_index,
            requested_count,
            sort_criteria: String::new(),
        }
    }
}

impl Validate for BrowseOperationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.object_id.is_empty() {
            return Err(ValidationError::invalid_value("ObjectID", "", "object id must not be empty"));
        }
        if self.requested_count > MAX_PAGE_SIZE {
            return Err(ValidationError::range_error("RequestedCount", 0, MAX_PAGE_SIZE, self.requested_count));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseResponse {
    /// DIDL-Lite document, already unescaped
    pub result: String,
    pub number_returned: u32,
    pub total_matches: u32,
    pub update_id: u32,
}

impl SonosOperation for BrowseOperation {
    type Request = BrowseOperationRequest;
    type Response = BrowseResponse;

    const SERVICE: Service = Service::ContentDirectory;
    const ACTION: &'static str = "Browse";

    fn build_payload(request: &Self::Request) -> String {
        format!(
            "{}<BrowseFlag>{}</BrowseFlag>{}<StartingIndex>{}</StartingIndex><RequestedCount>{}</RequestedCount>{}",
            xml_element("ObjectID", &request.object_id),
            request.browse_flag.as_str(),
            xml_element("Filter", &request.filter),
            request.starting_index,
            request.requested_count,
            xml_element("SortCriteria", &request.sort_criteria),
        )
    }

    fn parse_response(xml: &Element) -> Result<Self::Response, ApiError> {
        Ok(BrowseResponse {
            result: child_text(xml, "Result")?,
            number_returned: child_value(xml, "NumberReturned")?,
            total_matches: child_value(xml, "TotalMatches")?,
            update_id: child_value(xml, "UpdateID").unwrap_or_default(),
        })
    }
}
