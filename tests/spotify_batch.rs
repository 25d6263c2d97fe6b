//! Batched track insertion against a mock Web API

mod common;

use common::{MockData, TestClients, TestUtils};
use playlist_bridge::{BatchPolicy, Error, SpotifyClient};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Records when each chunk arrives and acknowledges it with a snapshot
#[derive(Clone, Default)]
struct ArrivalRecorder {
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl ArrivalRecorder {
    fn gaps(&self) -> Vec<Duration> {
        let arrivals = self.arrivals.lock().unwrap();
        arrivals.windows(2).map(|pair| pair[1] - pair[0]).collect()
    }
}

impl Respond for ArrivalRecorder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        ResponseTemplate::new(201).set_body_json(json!({"snapshot_id": "snap"}))
    }
}

async fn uris_per_request(server: &MockServer) -> Vec<Vec<String>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            body["uris"]
                .as_array()
                .unwrap()
                .iter()
                .map(|uri| uri.as_str().unwrap().to_string())
                .collect()
        })
        .collect()
}

#[tokio::test]
async fn test_250_tracks_are_sent_as_three_spaced_chunks() {
    TestUtils::init_logger();
    let server = MockServer::start().await;
    let recorder = ArrivalRecorder::default();

    Mock::given(method("POST"))
        .and(path("/playlists/pl1/tracks"))
        .and(header("authorization", "Bearer test-access-token"))
        .and(header("content-type", "application/json"))
        .respond_with(recorder.clone())
        .expect(3)
        .mount(&server)
        .await;

    // Default policy: 100 per chunk, 500ms apart
    let spotify = SpotifyClient::new(reqwest::Client::new()).with_base_url(server.uri());
    let track_ids = MockData::track_ids(250);

    let report = spotify
        .add_tracks_in_batch("pl1", &track_ids, &TestClients::token())
        .await
        .unwrap();

    assert_eq!(report.chunks, 3);
    assert_eq!(report.tracks_added, 250);
    assert_eq!(report.snapshot_ids, ["snap", "snap", "snap"]);

    let gaps = recorder.gaps();
    assert_eq!(gaps.len(), 2);
    for gap in &gaps {
        assert!(
            *gap >= Duration::from_millis(500),
            "chunks sent too close together: {:?}",
            gaps
        );
    }

    let sent = uris_per_request(&server).await;
    let sizes: Vec<usize> = sent.iter().map(Vec::len).collect();
    assert_eq!(sizes, [100, 100, 50]);

    let expected: Vec<String> = track_ids
        .iter()
        .map(|id| format!("spotify:track:{}", id))
        .collect();
    assert_eq!(sent.concat(), expected);
}

#[tokio::test]
async fn test_exactly_one_full_chunk_does_not_wait() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/playlists/pl1/tracks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"snapshot_id": "only"})))
        .expect(1)
        .mount(&server)
        .await;

    let spotify = SpotifyClient::new(reqwest::Client::new())
        .with_base_url(server.uri())
        .with_batch_policy(BatchPolicy::new(100, Duration::from_secs(30)));

    let report = tokio::time::timeout(
        Duration::from_secs(10),
        spotify.add_tracks_in_batch("pl1", &MockData::track_ids(100), &TestClients::token()),
    )
    .await
    .expect("no pause after the last chunk")
    .unwrap();

    assert_eq!(report.chunks, 1);
    assert_eq!(report.tracks_added, 100);
}

#[tokio::test]
async fn test_failing_chunk_stops_the_batch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/playlists/pl1/tracks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"snapshot_id": "first"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/playlists/pl1/tracks"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"status": 500, "message": "Internal error"}
        })))
        .mount(&server)
        .await;

    let err = TestClients::spotify(&server)
        .add_tracks_in_batch("pl1", &MockData::track_ids(250), &TestClients::token())
        .await
        .unwrap_err();

    match &err {
        Error::BatchInterrupted {
            committed_chunks,
            failed_chunk,
            total_chunks,
            tracks_committed,
            source,
        } => {
            assert_eq!(*committed_chunks, 1);
            assert_eq!(*failed_chunk, 2);
            assert_eq!(*total_chunks, 3);
            assert_eq!(*tracks_committed, 100);
            assert_eq!(source.status(), Some(500));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.status(), Some(500));

    // The third chunk is never sent
    assert_eq!(uris_per_request(&server).await.len(), 2);
}

#[tokio::test]
async fn test_custom_chunk_size() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/playlists/pl1/tracks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"snapshot_id": "s"})))
        .expect(4)
        .mount(&server)
        .await;

    let spotify = TestClients::spotify(&server).with_batch_policy(BatchPolicy::new(3, Duration::ZERO));
    let report = spotify
        .add_tracks_in_batch("pl1", &MockData::track_ids(10), &TestClients::token())
        .await
        .unwrap();

    assert_eq!(report.chunks, 4);
    let sizes: Vec<usize> = uris_per_request(&server).await.iter().map(Vec::len).collect();
    assert_eq!(sizes, [3, 3, 3, 1]);
}
