//! AVTransport service: queue management and transport control

use serde::Serialize;
use xmltree::Element;

use crate::define_upnp_operation;
use crate::error::ApiError;
use crate::operation::{child_text, child_value, xml_element, SonosOperation, Validate, ValidationError};
use crate::service::Service;

/// Play modes understood by `SetPlayMode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayMode {
    Normal,
    RepeatAll,
    RepeatOne,
    ShuffleNoRepeat,
    Shuffle,
    ShuffleRepeatOne,
}

impl PlayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayMode::Normal => "NORMAL",
            PlayMode::RepeatAll => "REPEAT_ALL",
            PlayMode::RepeatOne => "REPEAT_ONE",
            PlayMode::ShuffleNoRepeat => "SHUFFLE_NOREPEAT",
            PlayMode::Shuffle => "SHUFFLE",
            PlayMode::ShuffleRepeatOne => "SHUFFLE_REPEAT_ONE",
        }
    }
}

const PLAY_MODES: [&str; 6] = [
    "NORMAL",
    "REPEAT_ALL",
    "REPEAT_ONE",
    "SHUFFLE_NOREPEAT",
    "SHUFFLE",
    "SHUFFLE_REPEAT_ONE",
];

// =============================================================================
// GROUP AND QUEUE
// =============================================================================

define_upnp_operation! {
    /// Leave the current group so this player coordinates its own queue
    operation: BecomeCoordinatorOfStandaloneGroupOperation,
    action: "BecomeCoordinatorOfStandaloneGroup",
    service: AVTransport,
    request: {},
}

impl Validate for BecomeCoordinatorOfStandaloneGroupOperationRequest {}

define_upnp_operation! {
    operation: RemoveAllTracksFromQueueOperation,
    action: "RemoveAllTracksFromQueue",
    service: AVTransport,
    request: {},
}

impl Validate for RemoveAllTracksFromQueueOperationRequest {}

/// Append (or insert) a URI with its DIDL-Lite metadata to the queue
pub struct AddURIToQueueOperation;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AddURIToQueueOperationRequest {
    pub instance_id: u32,
    pub enqueued_uri: String,
    pub enqueued_uri_meta_data: String,
    /// 0 appends to the end of the queue
    pub desired_first_track_number_enqueued: u32,
    pub enqueue_as_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddURIToQueueResponse {
    pub first_track_number_enqueued: u32,
    pub num_tracks_added: u32,
    pub new_queue_length: u32,
}

impl Validate for AddURIToQueueOperationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.enqueued_uri.is_empty() {
            return Err(ValidationError::invalid_value("EnqueuedURI", "", "URI must not be empty"));
        }
        Ok(())
    }
}

impl SonosOperation for AddURIToQueueOperation {
    type Request = AddURIToQueueOperationRequest;
    type Response = AddURIToQueueResponse;

    const SERVICE: Service = Service::AVTransport;
    const ACTION: &'static str = "AddURIToQueue";

    fn build_payload(request: &Self::Request) -> String {
        format!(
            "<InstanceID>{}</InstanceID>{}{}<DesiredFirstTrackNumberEnqueued>{}</DesiredFirstTrackNumberEnqueued><EnqueueAsNext>{}</EnqueueAsNext>",
            request.instance_id,
            xml_element("EnqueuedURI", &request.enqueued_uri),
            xml_element("EnqueuedURIMetaData", &request.enqueued_uri_meta_data),
            request.desired_first_track_number_enqueued,
            if request.enqueue_as_next { "1" } else { "0" },
        )
    }

    fn parse_response(xml: &Element) -> Result<Self::Response, ApiError> {
        Ok(AddURIToQueueResponse {
            first_track_number_enqueued: child_value(xml, "FirstTrackNumberEnqueued")?,
            num_tracks_added: child_value(xml, "NumTracksAdded")?,
            new_queue_length: child_value(xml, "NewQueueLength")?,
        })
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

define_upnp_operation! {
    operation: SetAVTransportURIOperation,
    action: "SetAVTransportURI",
    service: AVTransport,
    request: {
        current_uri: String => "CurrentURI",
        current_uri_meta_data: String => "CurrentURIMetaData",
    },
}

impl Validate for SetAVTransportURIOperationRequest {}

define_upnp_operation! {
    operation: SeekOperation,
    action: "Seek",
    service: AVTransport,
    request: {
        unit: String => "Unit",
        target: String => "Target",
    },
}

impl Validate for SeekOperationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.unit.as_str() {
            "TRACK_NR" | "REL_TIME" | "TIME_DELTA" => Ok(()),
            other => Err(ValidationError::invalid_value(
                "Unit",
                other,
                "must be TRACK_NR, REL_TIME or TIME_DELTA",
            )),
        }
    }
}

define_upnp_operation! {
    operation: PlayOperation,
    action: "Play",
    service: AVTransport,
    request: {
        speed: String => "Speed",
    },
}

impl Validate for PlayOperationRequest {}

define_upnp_operation! {
    operation: SetPlayModeOperation,
    action: "SetPlayMode",
    service: AVTransport,
    request: {
        new_play_mode: String => "NewPlayMode",
    },
}

impl Validate for SetPlayModeOperationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if PLAY_MODES.contains(&self.new_play_mode.as_str()) {
            Ok(())
        } else {
            Err(ValidationError::invalid_value(
                "NewPlayMode",
                &self.new_play_mode,
                format!("must be one of {}", PLAY_MODES.join(", ")),
            ))
        }
    }
}

/// Position of the transport within the current track
pub struct GetPositionInfoOperation;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GetPositionInfoOperationRequest {
    pub instance_id: u32,
}

impl Validate for GetPositionInfoOperationRequest {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPositionInfoResponse {
    pub track: u32,
    pub track_duration: String,
    pub track_meta_data: String,
    pub track_uri: String,
    pub rel_time: String,
}

impl SonosOperation for GetPositionInfoOperation {
    type Request = GetPositionInfoOperationRequest;
    type Response = GetPositionInfoResponse;

    const SERVICE: Service = Service::AVTransport;
    const ACTION: &'static str = "GetPositionInfo";

    fn build_payload(request: &Self::Request) -> String {
        format!("<InstanceID>{}</InstanceID>", request.instance_id)
    }

    fn parse_response(xml: &Element) -> Result<Self::Response, ApiError> {
        Ok(GetPositionInfoResponse {
            track: child_value(xml, "Track").unwrap_or_default(),
            track_duration: child_text(xml, "TrackDuration")?,
            track_meta_data: child_text(xml, "TrackMetaData")?,
            track_uri: child_text(xml, "TrackURI")?,
            rel_time: child_text(xml, "RelTime")?,
        })
    }
}
