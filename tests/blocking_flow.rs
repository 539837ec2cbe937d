//! End-to-end tests of the blocking client; mirrors the async flow tests so
//! both surfaces are held to the same contract.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use uberduck::blocking::UberduckClient;
use uberduck::{SpeakOptions, SpeakOutput, UberduckError};

fn client_for(server: &ServerGuard) -> UberduckClient {
    UberduckClient::builder()
        .api_key("key")
        .api_secret("secret")
        .base_url(server.url())
        .build()
        .expect("client should build")
}

fn fast() -> SpeakOptions {
    SpeakOptions::new().check_every(Duration::from_millis(10))
}

#[test]
fn full_run_returns_bytes_with_single_fetch() {
    let mut server = Server::new();
    let audio_url = format!("{}/audio/abc.wav", server.url());

    let submit = server
        .mock("POST", "/speak")
        .match_header("authorization", "Basic a2V5OnNlY3JldA==")
        .match_body(Matcher::Json(json!({ "speech": "hello", "voice": "voice1" })))
        .with_status(200)
        .with_body(json!({ "uuid": "abc" }).to_string())
        .expect(1)
        .create();

    let polls = Arc::new(AtomicUsize::new(0));
    let polls_seen = polls.clone();
    let pending = json!({ "path": null }).to_string();
    let ready = json!({ "path": audio_url }).to_string();
    let status = server
        .mock("GET", "/speak-status")
        .match_query(Matcher::UrlEncoded("uuid".into(), "abc".into()))
        .with_status(200)
        .with_body_from_request(move |_| {
            if polls_seen.fetch_add(1, Ordering::SeqCst) == 0 {
                pending.clone().into_bytes()
            } else {
                ready.clone().into_bytes()
            }
        })
        .expect(2)
        .create();

    let audio = server
        .mock("GET", "/audio/abc.wav")
        .with_status(200)
        .with_body(b"RIFFfakewav")
        .expect(1)
        .create();

    let client = client_for(&server);
    let output = client
        .speak("hello", "Voice1", &fast())
        .expect("speak should succeed");

    match output {
        SpeakOutput::Bytes(bytes) => assert_eq!(&bytes[..], b"RIFFfakewav"),
        other => panic!("expected bytes, got {:?}", other),
    }
    assert_eq!(polls.load(Ordering::SeqCst), 2);
    submit.assert();
    status.assert();
    audio.assert();
}

#[test]
fn rate_limited_poll_aborts_immediately() {
    let mut server = Server::new();
    server
        .mock("POST", "/speak")
        .with_status(200)
        .with_body(json!({ "uuid": "abc" }).to_string())
        .create();
    let status = server
        .mock("GET", "/speak-status")
        .match_query(Matcher::UrlEncoded("uuid".into(), "abc".into()))
        .with_status(429)
        .with_body(json!({ "detail": "Too many requests" }).to_string())
        .expect(1)
        .create();

    let client = client_for(&server);
    let err = client.speak("hello", "duck", &fast()).unwrap_err();
    assert!(matches!(err, UberduckError::RateLimited));
    status.assert();
}

#[test]
fn save_to_file_shares_the_download() {
    let mut server = Server::new();
    let audio_url = format!("{}/audio/abc.wav", server.url());

    server
        .mock("POST", "/speak")
        .with_status(200)
        .with_body(json!({ "uuid": "abc" }).to_string())
        .create();
    server
        .mock("GET", "/speak-status")
        .match_query(Matcher::UrlEncoded("uuid".into(), "abc".into()))
        .with_status(200)
        .with_body(json!({ "path": audio_url }).to_string())
        .create();
    let audio = server
        .mock("GET", "/audio/abc.wav")
        .with_status(200)
        .with_body(b"RIFFfakewav")
        .expect(1)
        .create();

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("speech.wav");
    let client = client_for(&server);
    let output = client
        .speak("hello", "duck", &fast().save_to(&file_path))
        .expect("speak should succeed");

    assert_eq!(&output.into_bytes().expect("bytes")[..], b"RIFFfakewav");
    assert_eq!(std::fs::read(&file_path).expect("file written"), b"RIFFfakewav");
    audio.assert();
}

#[test]
fn path_output_skips_the_download() {
    let mut server = Server::new();
    let audio_url = format!("{}/audio/abc.wav", server.url());

    server
        .mock("POST", "/speak")
        .with_status(200)
        .with_body(json!({ "uuid": "abc" }).to_string())
        .create();
    server
        .mock("GET", "/speak-status")
        .match_query(Matcher::UrlEncoded("uuid".into(), "abc".into()))
        .with_status(200)
        .with_body(json!({ "path": audio_url }).to_string())
        .create();
    let audio = server.mock("GET", "/audio/abc.wav").expect(0).create();

    let client = client_for(&server);
    let output = client
        .speak("hello", "duck", &fast().return_path())
        .expect("speak should succeed");
    assert_eq!(output.into_path().as_deref(), Some(audio_url.as_str()));
    audio.assert();
}

#[test]
fn catalog_matches_async_contract() {
    let mut server = Server::new();
    let catalog = server
        .mock("GET", "/voices")
        .match_query(Matcher::UrlEncoded("mode".into(), "tts-basic".into()))
        .with_status(200)
        .with_body(
            json!([{
                "name": "big-bird",
                "display_name": "Big Bird",
                "category": "Sesame Street",
                "architecture": "tacotron2",
                "is_active": true,
                "is_private": false,
                "controls": false,
                "contributors": [],
                "memberships": [],
                "model_id": "model-1",
                "symbol_set": "arpabet",
                "voicemodel_uuid": "7f9a0000-0000-0000-0000-000000000000"
            }])
            .to_string(),
        )
        .expect(2)
        .create();

    let client = client_for(&server);
    let voices = client.voices().expect("voices");
    assert_eq!(voices.len(), 1);
    assert!(voices[0].memberships.is_empty());
    assert_eq!(client.voice_names().expect("names"), vec!["big-bird"]);
    catalog.assert();
}
