//! Property-based tests for request resolution and dispatch

mod common;

use std::convert::Infallible;
use std::time::Duration;

use common::{catalog, playback_config, Call, RecordingController};
use proptest::prelude::*;
use rpi_jukebox::{resolve, DebouncePolicy, Dispatcher, ResolvedAction};

/// URIs that do not start with the favorite prefix
fn direct_uri_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}:[A-Za-z0-9%:/._ -]{0,40}".prop_filter("favorite prefix", |uri| !uri.starts_with("x-SONOSFAV"))
}

/// Titles may contain colons and spaces
fn title_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 :'&-]{1,30}"
}

fn options_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            Just("SHUF".to_string()),
            (0u8..=100).prop_map(|v| format!("VOL{}", v)),
            "[A-Z]{0,5}",
        ],
        0..4,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A direct URI is passed through untouched and never fetches favorites
    #[test]
    fn prop_direct_uri_is_unchanged(uri in direct_uri_strategy()) {
        let action = resolve::<Infallible, _>(&uri, || panic!("catalog fetched for {}", uri)).unwrap();
        prop_assert_eq!(action, ResolvedAction::PlayDirectUri(uri.clone()));
    }

    /// Resolution is a pure function of the URI and the catalog
    #[test]
    fn prop_resolution_is_deterministic(
        titles in prop::collection::vec(title_strategy(), 0..6),
        title in title_strategy(),
        options in options_strategy(),
    ) {
        let titles: Vec<&str> = titles.iter().map(String::as_str).collect();
        let raw = format!("x-SONOSFAV:{}:{}", options.join(","), title);

        let first = resolve::<Infallible, _>(&raw, || Ok(catalog(&titles))).unwrap();
        let second = resolve::<Infallible, _>(&raw, || Ok(catalog(&titles))).unwrap();
        prop_assert_eq!(&first, &second);

        match first {
            ResolvedAction::NotFound { title: missing } => {
                prop_assert_eq!(&missing, &title);
                prop_assert!(!titles.contains(&title.as_str()));
            }
            ResolvedAction::PlayFavorite { reference, shuffle, volume_override } => {
                prop_assert_eq!(&reference.title, &title);
                prop_assert_eq!(shuffle, options.iter().any(|o| o == "SHUF"));
                let expected_volume = options
                    .iter()
                    .find(|o| o.starts_with("VOL"))
                    .and_then(|o| o[3..].parse::<u8>().ok());
                prop_assert_eq!(volume_override, expected_volume);
            }
            ResolvedAction::PlayDirectUri(uri) => prop_assert!(false, "favorite resolved as direct URI {}", uri),
        }
    }

    /// Every played request leaves any group and clears the queue before adding
    #[test]
    fn prop_unjoin_and_clear_precede_add(uri in direct_uri_strategy(), volume in 0u8..=100) {
        let dispatcher = Dispatcher::new(playback_config(volume, Duration::ZERO, DebouncePolicy::SuccessOnly));
        let controller = RecordingController::new();

        dispatcher.dispatch(&ResolvedAction::PlayDirectUri(uri.clone()), &controller).unwrap();

        let calls = controller.calls();
        prop_assert_eq!(&calls[..3], &[Call::Unjoin, Call::ClearQueue, Call::AddUri(uri)][..]);
    }
}
