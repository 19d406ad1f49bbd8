//! End-to-end request processing against a fake Sonos player

mod common;

use std::time::Duration;

use common::playback_config;
use mockito::{Matcher, Mock, Server, ServerGuard};
use rpi_jukebox::{ControllerError, DebouncePolicy, DispatchOutcome, RequestProcessor, Step};
use soap_client::SoapClient;
use sonos_api::{ApiError, SonosClient};

const AV_TRANSPORT: &str = "urn:schemas-upnp-org:service:AVTransport:1";
const RENDERING_CONTROL: &str = "urn:schemas-upnp-org:service:RenderingControl:1";
const CONTENT_DIRECTORY: &str = "urn:schemas-upnp-org:service:ContentDirectory:1";
const AV_TRANSPORT_PATH: &str = "/MediaRenderer/AVTransport/Control";

const FAVORITES: &str = r#"<DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/" xmlns:r="urn:schemas-rinconnetworks-com:metadata-1-0/" xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/"><item id="FV:2/13" parentID="FV:2" restricted="false"><dc:title>Jazz Favorite</dc:title><upnp:class>object.itemobject.item.sonos-favorite</upnp:class><res protocolInfo="x-rincon-cpcontainer:*:*:*">x-rincon-cpcontainer:1006206cplaylist</res><r:resMD>&lt;DIDL-Lite xmlns:dc=&quot;http://purl.org/dc/elements/1.1/&quot; xmlns=&quot;urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/&quot;&gt;&lt;item id=&quot;1006206cplaylist&quot; parentID=&quot;-1&quot; restricted=&quot;true&quot;&gt;&lt;dc:title&gt;Morning Jazz Mix&lt;/dc:title&gt;&lt;/item&gt;&lt;/DIDL-Lite&gt;</r:resMD></item></DIDL-Lite>"#;

fn processor_for(server: &ServerGuard) -> RequestProcessor {
    let port = server
        .host_with_port()
        .rsplit(':')
        .next()
        .and_then(|p| p.parse().ok())
        .expect("mock server port");
    RequestProcessor::new(playback_config(25, Duration::ZERO, DebouncePolicy::SuccessOnly))
        .with_client(SonosClient::with_soap_client(SoapClient::new().with_port(port)))
}

fn envelope(action: &str, service: &str, inner: &str) -> String {
    format!(
        r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><u:{action}Response xmlns:u="{service}">{inner}</u:{action}Response></s:Body></s:Envelope>"#
    )
}

fn escape(xml: &str) -> String {
    xml.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn mock_action(server: &mut ServerGuard, path: &str, service: &str, action: &str, body: Matcher, inner: &str) -> Mock {
    server
        .mock("POST", path)
        .match_header("soapaction", format!("\"{}#{}\"", service, action).as_str())
        .match_body(body)
        .with_status(200)
        .with_body(envelope(action, service, inner))
        .expect(1)
        .create()
}

fn mock_favorites(server: &mut ServerGuard) -> Mock {
    mock_action(
        server,
        "/MediaServer/ContentDirectory/Control",
        CONTENT_DIRECTORY,
        "Browse",
        Matcher::Regex("<ObjectID>FV:2</ObjectID>".to_string()),
        &format!(
            "<Result>{}</Result><NumberReturned>1</NumberReturned><TotalMatches>1</TotalMatches><UpdateID>7</UpdateID>",
            escape(FAVORITES)
        ),
    )
}

#[test]
fn test_favorite_request_end_to_end() {
    let mut server = Server::new();
    let favorites = mock_favorites(&mut server);
    let unjoin = mock_action(
        &mut server,
        AV_TRANSPORT_PATH,
        AV_TRANSPORT,
        "BecomeCoordinatorOfStandaloneGroup",
        Matcher::Any,
        "",
    );
    let clear = mock_action(&mut server, AV_TRANSPORT_PATH, AV_TRANSPORT, "RemoveAllTracksFromQueue", Matcher::Any, "");
    let add = mock_action(
        &mut server,
        AV_TRANSPORT_PATH,
        AV_TRANSPORT,
        "AddURIToQueue",
        Matcher::AllOf(vec![
            Matcher::Regex("<EnqueuedURI>x-rincon-cpcontainer:1006206cplaylist</EnqueuedURI>".to_string()),
            Matcher::Regex("Morning Jazz Mix".to_string()),
        ]),
        "<FirstTrackNumberEnqueued>1</FirstTrackNumberEnqueued><NumTracksAdded>12</NumTracksAdded><NewQueueLength>12</NewQueueLength>",
    );
    let shuffle = mock_action(
        &mut server,
        AV_TRANSPORT_PATH,
        AV_TRANSPORT,
        "SetPlayMode",
        Matcher::Regex("<NewPlayMode>SHUFFLE_NOREPEAT</NewPlayMode>".to_string()),
        "",
    );
    let ramp = mock_action(
        &mut server,
        "/MediaRenderer/RenderingControl/Control",
        RENDERING_CONTROL,
        "RampToVolume",
        Matcher::AllOf(vec![
            Matcher::Regex("<RampType>AUTOPLAY_RAMP_TYPE</RampType>".to_string()),
            Matcher::Regex("<DesiredVolume>40</DesiredVolume>".to_string()),
        ]),
        "<RampTime>3</RampTime>",
    );
    let description = server
        .mock("GET", "/xml/device_description.xml")
        .with_status(200)
        .with_body(
            r#"<root xmlns="urn:schemas-upnp-org:device-1-0"><device><roomName>Kitchen</roomName><UDN>uuid:RINCON_000E58A0123401400</UDN></device></root>"#,
        )
        .create();
    let set_uri = mock_action(
        &mut server,
        AV_TRANSPORT_PATH,
        AV_TRANSPORT,
        "SetAVTransportURI",
        Matcher::Regex("x-rincon-queue:RINCON_000E58A0123401400#0".to_string()),
        "",
    );
    let seek = mock_action(
        &mut server,
        AV_TRANSPORT_PATH,
        AV_TRANSPORT,
        "Seek",
        Matcher::Regex("<Target>1</Target>".to_string()),
        "",
    );
    let play = mock_action(&mut server, AV_TRANSPORT_PATH, AV_TRANSPORT, "Play", Matcher::Any, "");

    let outcome = processor_for(&server)
        .process("x-SONOSFAV:SHUF,VOL40:Morning Jazz Mix")
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Played { volume: 40, shuffle: true });

    for mock in [favorites, unjoin, clear, add, shuffle, ramp, description, set_uri, seek, play] {
        mock.assert();
    }
}

#[test]
fn test_unknown_favorite_stops_after_browse() {
    let mut server = Server::new();
    let favorites = mock_favorites(&mut server);
    let anything_else = server.mock("POST", AV_TRANSPORT_PATH).expect(0).create();

    // The favorite's own label does not match; only the referenced item's title does
    let outcome = processor_for(&server).process("x-SONOSFAV::Jazz Favorite").unwrap();

    assert_eq!(outcome, DispatchOutcome::FavoriteNotFound { title: "Jazz Favorite".into() });
    favorites.assert();
    anything_else.assert();
}

#[test]
fn test_coordinator_fault_is_reported_with_step() {
    let mut server = Server::new();
    let _unjoin = mock_action(
        &mut server,
        AV_TRANSPORT_PATH,
        AV_TRANSPORT,
        "BecomeCoordinatorOfStandaloneGroup",
        Matcher::Any,
        "",
    );
    let _clear = server
        .mock("POST", AV_TRANSPORT_PATH)
        .match_header("soapaction", format!("\"{}#RemoveAllTracksFromQueue\"", AV_TRANSPORT).as_str())
        .with_status(500)
        .with_body(
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><s:Fault><faultcode>s:Client</faultcode><faultstring>UPnPError</faultstring><detail><UPnPError xmlns="urn:schemas-upnp-org:control-1-0"><errorCode>800</errorCode></UPnPError></detail></s:Fault></s:Body></s:Envelope>"#,
        )
        .create();

    let err = processor_for(&server).process("x-file-cifs://nas/music/track.mp3").unwrap_err();
    assert_eq!(err.step, Step::ClearQueue);
    assert!(matches!(err.source, ControllerError::Api(ApiError::SoapFault(800))));
}

#[test]
fn test_unreachable_player() {
    let processor = RequestProcessor::new(playback_config(25, Duration::ZERO, DebouncePolicy::SuccessOnly))
        .with_client(SonosClient::with_soap_client(SoapClient::new().with_port(9)));

    let err = processor.process("x-SONOSFAV::Anything").unwrap_err();
    assert_eq!(err.step, Step::FetchFavorites);
    assert!(matches!(err.source, ControllerError::Api(ApiError::NetworkError(_))));
}
