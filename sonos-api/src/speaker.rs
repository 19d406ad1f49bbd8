//! High-level handle on a single player
//!
//! Each method is one or a few UPnP actions against the player at `ip`.
//! The handle keeps no state besides the address and the client, so it is
//! cheap to build per request.

use crate::client::SonosClient;
use crate::didl::{self, Favorite, FavoriteReference, TrackMetadata, FAVORITES_CONTAINER};
use crate::services::av_transport::{
    AddURIToQueueOperation, AddURIToQueueOperationRequest, BecomeCoordinatorOfStandaloneGroupOperation,
    BecomeCoordinatorOfStandaloneGroupOperationRequest, GetPositionInfoOperation,
    GetPositionInfoOperationRequest, PlayMode, PlayOperation, PlayOperationRequest,
    RemoveAllTracksFromQueueOperation, RemoveAllTracksFromQueueOperationRequest, SeekOperation,
    SeekOperationRequest, SetAVTransportURIOperation, SetAVTransportURIOperationRequest,
    SetPlayModeOperation, SetPlayModeOperationRequest,
};
use crate::services::content_directory::{BrowseOperation, BrowseOperationRequest, MAX_PAGE_SIZE};
use crate::services::rendering_control::{RampToVolumeOperation, RampToVolumeOperationRequest, RampType};
use crate::Result;

/// What is playing right now
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackInfo {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub uri: String,
    /// 1-based position in the queue
    pub position: u32,
}

/// A Sonos player addressed by IP
#[derive(Debug, Clone)]
pub struct Speaker {
    ip: String,
    client: SonosClient,
}

impl Speaker {
    pub fn new(ip: impl Into<String>) -> Self {
        Self::with_client(ip, SonosClient::new())
    }

    pub fn with_client(ip: impl Into<String>, client: SonosClient) -> Self {
        Self { ip: ip.into(), client }
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    /// Player UID from the device description (`RINCON_...`)
    pub fn uid(&self) -> Result<String> {
        Ok(self.client.device_description(&self.ip)?.uid().to_string())
    }

    /// Leave any group; a no-op for a player that already stands alone
    pub fn unjoin(&self) -> Result<()> {
        self.client.execute::<BecomeCoordinatorOfStandaloneGroupOperation>(
            &self.ip,
            &BecomeCoordinatorOfStandaloneGroupOperationRequest { instance_id: 0 },
        )
    }

    /// Empty the queue; only valid on a group coordinator
    pub fn clear_queue(&self) -> Result<()> {
        self.client.execute::<RemoveAllTracksFromQueueOperation>(
            &self.ip,
            &RemoveAllTracksFromQueueOperationRequest { instance_id: 0 },
        )
    }

    /// Append a bare URI to the queue, returning the number of its first track
    pub fn add_uri_to_queue(&self, uri: &str) -> Result<u32> {
        self.enqueue(uri, &didl::uri_metadata(uri))
    }

    /// Append a favorite's referenced item to the queue
    pub fn add_to_queue(&self, reference: &FavoriteReference) -> Result<u32> {
        self.enqueue(&reference.uri, &reference.metadata)
    }

    fn enqueue(&self, uri: &str, metadata: &str) -> Result<u32> {
        let response = self.client.execute::<AddURIToQueueOperation>(
            &self.ip,
            &AddURIToQueueOperationRequest {
                instance_id: 0,
                enqueued_uri: uri.to_string(),
                enqueued_uri_meta_data: metadata.to_string(),
                desired_first_track_number_enqueued: 0,
                enqueue_as_next: false,
            },
        )?;
        tracing::debug!(
            ip = %self.ip,
            tracks = response.num_tracks_added,
            queue_length = response.new_queue_length,
            "enqueued"
        );
        Ok(response.first_track_number_enqueued)
    }

    /// Ramp the master volume, returning the ramp duration in seconds
    pub fn ramp_to_volume(&self, volume: u8, ramp_type: RampType) -> Result<u32> {
        let response = self.client.execute::<RampToVolumeOperation>(
            &self.ip,
            &RampToVolumeOperationRequest::master(volume, ramp_type),
        )?;
        Ok(response.ramp_time)
    }

    /// Start playing the queue at a 0-based index
    pub fn play_from_queue(&self, index: u32) -> Result<()> {
        let uid = self.uid()?;

        self.client.execute::<SetAVTransportURIOperation>(
            &self.ip,
            &SetAVTransportURIOperationRequest {
                instance_id: 0,
                current_uri: format!("x-rincon-queue:{}#0", uid),
                current_uri_meta_data: String::new(),
            },
        )?;
        self.client.execute::<SeekOperation>(
            &self.ip,
            &SeekOperationRequest {
                instance_id: 0,
                unit: "TRACK_NR".to_string(),
                target: (index + 1).to_string(),
            },
        )?;
        self.play()
    }

    pub fn play(&self) -> Result<()> {
        self.client.execute::<PlayOperation>(
            &self.ip,
            &PlayOperationRequest {
                instance_id: 0,
                speed: "1".to_string(),
            },
        )
    }

    pub fn set_play_mode(&self, mode: PlayMode) -> Result<()> {
        self.client.execute::<SetPlayModeOperation>(
            &self.ip,
            &SetPlayModeOperationRequest {
                instance_id: 0,
                new_play_mode: mode.as_str().to_string(),
            },
        )
    }

    /// Shuffle without repeat, or back to normal order
    pub fn set_shuffle(&self, enabled: bool) -> Result<()> {
        self.set_play_mode(if enabled { PlayMode::ShuffleNoRepeat } else { PlayMode::Normal })
    }

    /// All favorites, in the order the player lists them
    pub fn favorites(&self) -> Result<Vec<Favorite>> {
        let mut favorites = Vec::new();
        let mut start = 0;

        loop {
            let page = self.client.execute::<BrowseOperation>(
                &self.ip,
                &BrowseOperationRequest::direct_children(FAVORITES_CONTAINER, start, MAX_PAGE_SIZE),
            )?;
            favorites.extend(didl::parse_favorites(&page.result)?);

            start += page.number_returned;
            if page.number_returned == 0 || start >= page.total_matches {
                break;
            }
        }

        Ok(favorites)
    }

    pub fn current_track(&self) -> Result<TrackInfo> {
        let position = self
            .client
            .execute::<GetPositionInfoOperation>(&self.ip, &GetPositionInfoOperationRequest { instance_id: 0 })?;
        let metadata = didl::parse_track_metadata(&position.track_meta_data).unwrap_or_else(TrackMetadata::default);

        Ok(TrackInfo {
            title: metadata.title,
            artist: metadata.creator,
            album: metadata.album,
            uri: position.track_uri,
            position: position.track,
        })
    }
}
