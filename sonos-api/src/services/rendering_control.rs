//! RenderingControl service: volume

use serde::Serialize;
use xmltree::Element;

use crate::error::ApiError;
use crate::operation::{child_value, xml_element, SonosOperation, Validate, ValidationError};
use crate::service::Service;

/// How `RampToVolume` moves from the current to the desired volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RampType {
    /// Slow fade, about 17 seconds, as used by the sleep timer
    SleepTimer,
    /// Fade in from zero, as used by alarms
    Alarm,
    /// Short fade-in suited to starting playback
    Autoplay,
}

impl RampType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RampType::SleepTimer => "SLEEP_TIMER_RAMP_TYPE",
            RampType::Alarm => "ALARM_RAMP_TYPE",
            RampType::Autoplay => "AUTOPLAY_RAMP_TYPE",
        }
    }
}

/// Gradually move a channel's volume to a target level
pub struct RampToVolumeOperation;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RampToVolumeOperationRequest {
    pub instance_id: u32,
    pub channel: String,
    pub ramp_type: RampType,
    pub desired_volume: u8,
    pub reset_volume_after: bool,
    pub program_uri: String,
}

impl RampToVolumeOperationRequest {
    /// Ramp the master channel without restoring the old volume afterwards
    pub fn master(desired_volume: u8, ramp_type: RampType) -> Self {
        Self {
            instance_id: 0,
            channel: "Master".to_string(),
            ramp_type,
            desired_volume,
            reset_volume_after: false,
            program_uri: String::new(),
        }
    }
}

impl Validate for RampToVolumeOperationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.desired_volume > 100 {
            return Err(ValidationError::range_error("DesiredVolume", 0, 100, self.desired_volume));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RampToVolumeResponse {
    /// Seconds the ramp will take
    pub ramp_time: u32,
}

impl SonosOperation for RampToVolumeOperation {
    type Request = RampToVolumeOperationRequest;
    type Response = RampToVolumeResponse;

    const SERVICE: Service = Service::RenderingControl;
    const ACTION: &'static str = "RampToVolume";

    fn build_payload(request: &Self::Request) -> String {
        format!(
            "<InstanceID>{}</InstanceID>{}<RampType>{}</RampType><DesiredVolume>{}</DesiredVolume><ResetVolumeAfter>{}</ResetVolumeAfter>{}",
            request.instance_id,
            xml_element("Channel", &request.channel),
            request.ramp_type.as_str(),
            request.desired_volume,
            if request.reset_volume_after { "1" } else { "0" },
            xml_element("ProgramURI", &request.program_uri),
        )
    }

    fn parse_response(xml: &Element) -> Result<Self::Response, ApiError> {
        Ok(RampToVolumeResponse {
            ramp_time: child_value(xml, "RampTime")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_payload() {
        let request = RampToVolumeOperationRequest::master(35, RampType::Autoplay);
        assert_eq!(
            RampToVolumeOperation::build_payload(&request),
            "<InstanceID>0</InstanceID><Channel>Master</Channel><RampType>AUTOPLAY_RAMP_TYPE</RampType><DesiredVolume>35</DesiredVolume><ResetVolumeAfter>0</ResetVolumeAfter><ProgramURI></ProgramURI>"
        );
    }

    #[test]
    fn test_ramp_volume_range() {
        assert!(RampToVolumeOperationRequest::master(100, RampType::Autoplay).validate().is_ok());
        assert!(RampToVolumeOperationRequest::master(101, RampType::Autoplay).validate().is_err());
    }

    #[test]
    fn test_ramp_response() {
        let xml = Element::parse("<RampToVolumeResponse><RampTime>4</RampTime></RampToVolumeResponse>".as_bytes()).unwrap();
        assert_eq!(RampToVolumeOperation::parse_response(&xml).unwrap().ramp_time, 4);
    }
}
