//! End-to-end tests of `HttpRpcClient` against an in-process fake daemon.

use std::net::SocketAddr;
use std::sync::Once;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use bitcoin::hashes::Hash;
use bitcoin::{Amount, Txid};
use serde_json::{json, Value};

use coinrpc_core::prelude::*;
use coinrpc_core::rpc::TxOutput;
use coinrpc_core::RpcError;

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("coinrpc_core=debug")),
            )
            .with_target(true)
            .try_init();
    });
}

/// base64("alice:secret")
const EXPECTED_AUTH: &str = "Basic YWxpY2U6c2VjcmV0";

fn reply(id: &Value, result: Value) -> Response {
    Json(json!({"result": result, "error": null, "id": id})).into_response()
}

/// Behaves like bitcoind for a handful of methods, plus a few methods that
/// exercise protocol failures.
async fn fake_daemon(headers: HeaderMap, Json(req): Json<Value>) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(EXPECTED_AUTH);
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let id = req["id"].clone();
    match req["method"].as_str().unwrap_or_default() {
        "echo" => reply(&id, req.clone()),
        "getblockcount" => reply(&id, json!(812_345)),
        "stringid" => {
            let id = json!(id.as_u64().unwrap_or_default().to_string());
            reply(&id, json!(true))
        }
        "badid" => {
            let id = json!(id.as_u64().unwrap_or_default() + 1);
            reply(&id, json!(true))
        }
        "nullresult" => reply(&id, Value::Null),
        "arraybody" => Json(json!([id, 42, null])).into_response(),
        "garbage" => (StatusCode::OK, "not json").into_response(),
        "busy" => (StatusCode::SERVICE_UNAVAILABLE, "Work queue depth exceeded").into_response(),
        "getrawtransaction" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "result": null,
                "error": {"code": -5, "message": "No such mempool or blockchain transaction"},
                "id": id
            })),
        )
            .into_response(),
        "createrawtransaction" => reply(&id, json!(req["params"].to_string())),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "result": null,
                "error": {"code": -32601, "message": "Method not found"},
                "id": id
            })),
        )
            .into_response(),
    }
}

async fn spawn_daemon() -> SocketAddr {
    init_tracing();
    let app = Router::new().route("/", post(fake_daemon));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake daemon");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake daemon");
    });
    addr
}

async fn client() -> HttpRpcClient {
    let addr = spawn_daemon().await;
    let config = RpcConfig::new(format!("http://{addr}")).with_credentials("alice", "secret");
    HttpRpcClient::new(&config).expect("client must build")
}

#[tokio::test]
async fn request_envelope_shape() {
    let rpc = client().await;
    let echoed = rpc.query("echo", vec![json!("abc"), json!(1)]).await.unwrap();

    assert_eq!(echoed["jsonrpc"], json!("1.0"));
    assert_eq!(echoed["method"], json!("echo"));
    assert_eq!(echoed["params"], json!(["abc", 1]));
    assert!(echoed["id"].is_u64());
}

#[tokio::test]
async fn ids_increase_per_call() {
    let rpc = client().await;
    let first = rpc.query("echo", Vec::new()).await.unwrap()["id"]
        .as_u64()
        .unwrap();
    let second = rpc.query("echo", Vec::new()).await.unwrap()["id"]
        .as_u64()
        .unwrap();
    assert_eq!(second, first + 1);
}

#[tokio::test]
async fn typed_call_decodes_result() {
    let rpc = client().await;
    assert_eq!(rpc.get_block_count().await.unwrap(), 812_345);
}

#[tokio::test]
async fn numeric_string_id_is_accepted() {
    let rpc = client().await;
    assert_eq!(rpc.query("stringid", Vec::new()).await.unwrap(), json!(true));
}

#[tokio::test]
async fn mismatched_id_is_rejected() {
    let rpc = client().await;
    let err = rpc.query("badid", Vec::new()).await.unwrap_err();
    assert!(matches!(err, CoreError::Rpc(RpcError::IdMismatch { .. })));
}

#[tokio::test]
async fn null_result_is_null() {
    let rpc = client().await;
    assert_eq!(rpc.query("nullresult", Vec::new()).await.unwrap(), Value::Null);
}

#[tokio::test]
async fn non_json_body_is_invalid_response() {
    let rpc = client().await;
    let err = rpc.query("garbage", Vec::new()).await.unwrap_err();
    assert!(matches!(err, CoreError::Rpc(RpcError::InvalidResponse(_))));
}

#[tokio::test]
async fn array_body_is_invalid_response() {
    let rpc = client().await;
    let err = rpc.query("arraybody", Vec::new()).await.unwrap_err();
    assert!(matches!(err, CoreError::Rpc(RpcError::InvalidResponse(_))));
}

#[tokio::test]
async fn plain_http_error_keeps_status_and_body() {
    let rpc = client().await;
    let err = rpc.query("busy", Vec::new()).await.unwrap_err();
    match err {
        CoreError::Rpc(RpcError::HttpStatus { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "Work queue depth exceeded");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn error_envelope_on_http_error_is_server_error() {
    let rpc = client().await;
    let err = rpc.query("nosuchmethod", Vec::new()).await.unwrap_err();
    assert_eq!(err.rpc_code(), Some(-32601));
}

#[tokio::test]
async fn missing_transaction_is_typed() {
    let rpc = client().await;
    let txid = Txid::from_byte_array([7; 32]);
    let err = rpc.get_raw_transaction(&txid).await.unwrap_err();
    assert!(matches!(err, CoreError::TxNotFound(found) if found == txid));
}

#[tokio::test]
async fn merged_outputs_reach_the_daemon() {
    let rpc = client().await;
    let outputs = [
        TxOutput::new("addr-a", Amount::from_sat(1_000)),
        TxOutput::new("addr-a", Amount::from_sat(2_000)),
    ];
    let sent = rpc.create_raw_transaction(&[], &outputs).await.unwrap();
    let params: Value = serde_json::from_str(&sent).unwrap();
    assert_eq!(params, json!([[], {"addr-a": 0.00003}]));
}

#[tokio::test]
async fn wrong_credentials_are_http_401() {
    let addr = spawn_daemon().await;
    let config = RpcConfig::new(format!("http://{addr}")).with_credentials("alice", "wrong");
    let rpc = HttpRpcClient::new(&config).unwrap();

    let err = rpc.query("getblockcount", Vec::new()).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Rpc(RpcError::HttpStatus { status: 401, .. })
    ));
}

#[tokio::test]
async fn url_userinfo_is_used_as_credentials() {
    let addr = spawn_daemon().await;
    let rpc = HttpRpcClient::new(&RpcConfig::new(format!("http://alice:secret@{addr}"))).unwrap();
    assert_eq!(rpc.url(), format!("http://{addr}/"));
    assert_eq!(rpc.get_block_count().await.unwrap(), 812_345);
}

#[tokio::test]
async fn unreachable_daemon_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let rpc = HttpRpcClient::new(&RpcConfig::new(format!("http://{addr}"))).unwrap();
    let err = rpc.query("getblockcount", Vec::new()).await.unwrap_err();
    assert!(matches!(err, CoreError::Rpc(RpcError::Transport(_))));
}
