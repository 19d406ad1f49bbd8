//! Operations grouped by the UPnP service that serves them

pub mod av_transport;
pub mod content_directory;
pub mod rendering_control;
