use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::{header, StatusCode, Url};
use tracing::{debug, trace};

use crate::config::RpcConfig;
use crate::error::{CoreError, RpcError};

use super::super::BitcoinRpc;
use super::connection::{parse_connection, resolve_auth};
use super::protocol::{
    check_response_id, decode_response, parse_jsonrpc_error, JsonRpcRequest, JsonRpcResponse,
};

/// Bitcoin Core JSON-RPC client over HTTP(S).
///
/// Every call is a single POST; the client keeps no state beyond the
/// request id counter and reqwest's connection pool.
pub struct HttpRpcClient {
    client: reqwest::Client,
    url: Url,
    auth: Option<(String, String)>,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    /// Create a client from `config`.
    ///
    /// Fails if the URL is not `http`/`https`, if only one of user and
    /// pass is set, or if the cookie file cannot be read.
    pub fn new(config: &RpcConfig) -> Result<Self, CoreError> {
        let endpoint = parse_connection(&config.url)?;
        let auth = resolve_auth(
            config.user.as_deref(),
            config.pass.as_deref(),
            endpoint.userinfo,
            config.cookie_file.as_deref(),
        )?;

        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .tcp_nodelay(true)
            .build()
            .map_err(RpcError::Transport)?;

        Ok(Self {
            client,
            url: endpoint.url,
            auth,
            next_id: AtomicU64::new(initial_request_id()),
        })
    }

    /// The endpoint being contacted, without credentials.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    fn reserve_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn rpc_call(
        &self,
        method: &str,
        params: &[serde_json::Value],
    ) -> Result<serde_json::Value, CoreError> {
        let id = self.reserve_request_id();
        debug!(
            rpc.id = id,
            rpc.method = method,
            rpc.params = params.len(),
            "rpc call"
        );
        let req = JsonRpcRequest {
            jsonrpc: "1.0",
            id,
            method,
            params,
        };

        let mut builder = self
            .client
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .json(&req);
        if let Some((ref user, ref pass)) = self.auth {
            builder = builder.basic_auth(user, Some(pass));
        }

        let response = builder.send().await.map_err(RpcError::Transport)?;
        let status = response.status();

        let body = response.text().await.map_err(RpcError::Transport)?;
        debug!(rpc.id = id, rpc.method = method, %status, body_len = body.len(), "rpc response");
        trace!(rpc.id = id, rpc.method = method, body = %body, "rpc response body");

        if status != StatusCode::OK {
            // Bitcoin Core reports most failures as HTTP 500/404 with a
            // regular error envelope in the body.
            if let Ok(JsonRpcResponse {
                error: Some(err), ..
            }) = decode_response(&body)
            {
                return Err(parse_jsonrpc_error(err));
            }
            return Err(RpcError::HttpStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let decoded = decode_response(&body)?;

        check_response_id(id, &decoded.id)?;

        if let Some(err) = decoded.error {
            return Err(parse_jsonrpc_error(err));
        }

        Ok(decoded.result.unwrap_or(serde_json::Value::Null))
    }
}

#[async_trait]
impl BitcoinRpc for HttpRpcClient {
    async fn query(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, CoreError> {
        self.rpc_call(method, &params).await
    }
}

fn initial_request_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
