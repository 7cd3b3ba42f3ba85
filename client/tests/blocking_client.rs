//! Blocking client against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port in a background thread with its
//! own runtime, then exercises `BlockingTerrAvion` from the test thread over
//! real HTTP.

#![cfg(feature = "blocking")]

use std::io::{BufRead, BufReader, Write};

use mock_server::{RequestLog, DEFAULT_TOKEN};
use serde_json::json;
use terravion::{ApiError, BlockFilter, BlockingTerrAvion, ClientOptions, UserBlocksForMapFilter};

fn start_server() -> (String, RequestLog) {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();
    let log = RequestLog::default();
    let router = mock_server::router(DEFAULT_TOKEN, log.clone());

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::serve(listener, router).await
        })
        .unwrap();
    });

    (format!("http://{addr}"), log)
}

#[test]
fn blocking_walkthrough() {
    let (host, log) = start_server();
    let client = BlockingTerrAvion::new(ClientOptions::new(DEFAULT_TOKEN).with_host(&host));

    // Step 1: resolve our own user id.
    let me = client.get_user_id().unwrap();
    assert_eq!(me, json!({"userId": "u1"}));

    // Step 2: list our blocks near a point.
    let filter = UserBlocksForMapFilter {
        lat: Some(1.0),
        lng: Some(2.0),
        ..Default::default()
    };
    let blocks = client.get_user_blocks_for_map("u1", &filter).unwrap();
    assert_eq!(blocks.as_array().unwrap().len(), 2);
    let seen = log.blocking_requests().pop().unwrap();
    assert_eq!(seen.param("lat"), Some("1"));
    assert_eq!(seen.param("lng"), Some("2"));
    assert_eq!(seen.param("userId"), Some("u1"));

    // Step 3: fetch one block and its geometry.
    let block = client
        .get_block("b1", &BlockFilter { filter: Some("x".to_string()) })
        .unwrap();
    assert_eq!(block["season"], "2024");
    let doc = client.get_geojson("b1").unwrap();
    assert_eq!(doc["features"][0]["geometry"]["type"], "Polygon");

    // Step 4: layers for the block, both ways.
    let layers = client.get_layers_from_block_id("u1", "b1").unwrap();
    assert_eq!(layers.as_array().unwrap().len(), 2);
    let user = client.get_user("u1").unwrap();
    assert_eq!(user["firstName"], "Dana");

    // Step 5: unknown block is an HTTP failure carrying the server body.
    let err = client.get_block("zzz", &BlockFilter::default()).unwrap_err();
    match err {
        ApiError::Http { status, message, meta } => {
            assert_eq!(status, 404);
            assert_eq!(message, format!("404 - {host}/blocks/zzz failed"));
            assert_eq!(meta["error"]["statusCode"], 404);
        }
        other => panic!("expected HTTP failure, got {other:?}"),
    }

    assert_eq!(log.blocking_requests().len(), 7);
}

#[test]
fn blocking_without_token_is_rejected_upstream() {
    let (host, log) = start_server();
    let client = BlockingTerrAvion::new(ClientOptions::default().with_host(&host));

    let err = client.get_user("u1").unwrap_err();
    assert_eq!(err.status(), Some(401));
    let seen = log.blocking_requests().pop().unwrap();
    assert!(seen.query.is_empty());
}

#[test]
fn blocking_refused_connection_is_transport_failure() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = BlockingTerrAvion::new(ClientOptions::new("abc").with_host(format!("http://{addr}")));

    let err = client.get_user_id().unwrap_err();
    assert!(err.is_transport(), "{err:?}");
    assert_eq!(err.status(), None);
}

/// Serve a single `200 OK` with `body`, then close.
fn serve_once(body: String) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(socket.try_clone().unwrap());
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
            line.clear();
        }
        write!(
            socket,
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
            body.len()
        )
        .unwrap();
        socket.write_all(body.as_bytes()).unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn blocking_reads_bodies_past_ureq_default_limit() {
    let payload = "x".repeat(11 * 1024 * 1024);
    let host = serve_once(format!("\"{payload}\""));
    let client = BlockingTerrAvion::new(ClientOptions::new("abc").with_host(host));

    let doc = client.get_geojson("b1").unwrap();
    assert_eq!(doc.as_str().map(str::len), Some(payload.len()));
}

#[test]
fn blocking_agent_with_status_errors_still_reports_http_failure() {
    let (host, _log) = start_server();
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(true)
        .build()
        .new_agent();
    let client = BlockingTerrAvion::with_agent(ClientOptions::new(DEFAULT_TOKEN).with_host(&host), agent);

    let err = client.get_block("zzz", &BlockFilter::default()).unwrap_err();
    assert!(!err.is_transport(), "{err:?}");
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.meta(), Some(&json!("")));
    assert_eq!(err.to_string(), format!("404 - {host}/blocks/zzz failed"));
}
