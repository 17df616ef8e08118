//! End-to-end tests for the memo client library.
//!
//! These drive the whole pipeline: a TOML config is resolved, a message is
//! encoded, assembled, signed and announced to an in-process mock node, and
//! the node's reply is rendered the way the shell shows it. The golden test
//! pins the exact bytes for a known key, recipient and clock.

use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::put, Json, Router};
use chrono::{TimeZone, Utc};
use url::Url;

use memo_protocol::client::{NodeClient, TransportError};
use memo_protocol::config::{ClientConfig, ResolvedConfig, TESTNET};
use memo_protocol::submission::{render_outcome, FixedClock, SubmitError, Submitter};
use memo_protocol::transaction::{
    decode_plain_message, verify_signed_transaction, SymbolFacade,
};

const ALICE_PRIVATE_KEY: &str = "33047CFD3ABA8E1B6FE047182F9B0118E2FA7E7D9E33865533AB582973F3B2A8";
const BOB_ADDRESS: &str = "TCSMJNJTRI76YPGQFDEZBFL3XTM4L3AWELOGBDY";

const GOLDEN_PAYLOAD: &str = concat!(
    "C1000000000000001C81C7979109C00650BCA34A3B4CCDEE4AFC59005F99E1D31222FFD8",
    "EA91C8B5AB3F814EFDEB8694A2463362F2577F081D9B3BB90D6A26A8C5F484A448CC4407",
    "ABC57E7B68FF6AA2E5F3D7E674D071697F00F1B377AE484C1EDBA3EEB29761B800000000",
    "01985441644B000000000000401F7D000000000098A4C4B5338A3FEC3CD028C990957BBC",
    "D9C5EC1622DC608F1100010000000000CE8BA0672E21C07240420F00000000000048656C",
    "6C6F2053796D626F6C21000000",
);
const GOLDEN_HASH: &str = "65A1FE58D38C9C4E6EA9C180191FA4B9297FF68B093D0D46FD739C4C39D1859F";

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

type Received = Arc<Mutex<Vec<serde_json::Value>>>;

/// Starts a mock node that records every announced body and accepts it.
async fn mock_node() -> (Url, Received) {
    let received: Received = Arc::default();
    let router = Router::new()
        .route(
            "/transactions",
            put(
                |State(received): State<Received>, Json(body): Json<serde_json::Value>| async move {
                    received.lock().unwrap().push(body);
                    (
                        StatusCode::ACCEPTED,
                        Json(serde_json::json!({
                            "message": "packet 9 was pushed to the network via /transactions"
                        })),
                    )
                },
            ),
        )
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (Url::parse(&format!("http://{addr}/")).unwrap(), received)
}

fn resolved_config(node_url: &Url) -> ResolvedConfig {
    let toml = format!(
        r#"
node_url = "{node_url}"
network = "testnet"
private_key = "{ALICE_PRIVATE_KEY}"
recipient = "{BOB_ADDRESS}"

[[mosaics]]
id = "0x72C0212E67A08BCE"
amount = 1000000
"#
    );
    ClientConfig::from_toml_str(&toml)
        .expect("config parses")
        .resolve()
        .expect("config resolves")
}

fn golden_clock() -> FixedClock {
    // One million milliseconds after the testnet epoch.
    FixedClock(Utc.timestamp_millis_opt(1_667_251_467_000).unwrap())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hello_symbol_reaches_node_with_golden_payload() {
    let (base, received) = mock_node().await;
    let config = resolved_config(&base);
    let submitter = Submitter::new(
        &config,
        SymbolFacade::new(config.network),
        NodeClient::new(&config.node_url).unwrap(),
        golden_clock(),
    );

    let submission = submitter.submit("Hello Symbol!").await.unwrap();
    assert_eq!(submission.hash, GOLDEN_HASH);

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0], serde_json::json!({ "payload": GOLDEN_PAYLOAD }));

    let rendered = render_outcome(&Ok(submission.response));
    assert!(rendered.contains("\n  \"message\": "));
}

#[tokio::test]
async fn dry_run_signs_without_announcing() {
    let (base, received) = mock_node().await;
    let config = resolved_config(&base);
    let submitter = Submitter::new(
        &config,
        SymbolFacade::new(config.network),
        NodeClient::new(&config.node_url).unwrap(),
        golden_clock(),
    );

    let prepared = submitter.prepare("Hello Symbol!").unwrap();
    assert_eq!(prepared.payload.payload, GOLDEN_PAYLOAD);
    assert_eq!(verify_signed_transaction(&TESTNET, &prepared.transaction), Ok(()));
    assert_eq!(
        decode_plain_message(prepared.transaction.message()).as_deref(),
        Some("Hello Symbol!")
    );
    assert_eq!(prepared.transaction.fee.0, prepared.transaction.size() as u64 * 100);
    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn every_message_gets_a_fresh_payload() {
    let (base, received) = mock_node().await;
    let config = resolved_config(&base);
    let submitter = Submitter::from_config(&config).unwrap();

    for text in ["", "AAAAAAAA", "こんにちは世界"] {
        submitter.submit(text).await.unwrap();
    }

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 3);
    let payloads: Vec<&str> = received
        .iter()
        .map(|b| b["payload"].as_str().unwrap())
        .collect();
    assert_ne!(payloads[0], payloads[1]);
    assert_ne!(payloads[1], payloads[2]);
}

#[tokio::test]
async fn unreachable_node_renders_error_line() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = Url::parse(&format!("http://{addr}/")).unwrap();
    let config = resolved_config(&base);
    let submitter = Submitter::from_config(&config).unwrap();

    let result = submitter.submit("Hello Symbol!").await;
    assert!(matches!(
        result,
        Err(SubmitError::Transport(TransportError::Network(_)))
    ));

    let rendered = render_outcome(&result.map(|s| s.response));
    assert!(rendered.starts_with("Error: "));
    assert!(!submitter.is_busy());
}
