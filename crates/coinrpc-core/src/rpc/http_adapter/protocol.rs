use crate::error::{CoreError, RpcError};

#[derive(serde::Serialize)]
pub(super) struct JsonRpcRequest<'a> {
    pub(super) jsonrpc: &'static str,
    pub(super) id: u64,
    pub(super) method: &'a str,
    pub(super) params: &'a [serde_json::Value],
}

#[derive(serde::Deserialize)]
pub(super) struct JsonRpcResponse {
    #[serde(default)]
    pub(super) id: serde_json::Value,
    pub(super) result: Option<serde_json::Value>,
    pub(super) error: Option<serde_json::Value>,
}

/// Decode a response body. Only a JSON object is a valid envelope; serde
/// would otherwise also accept a `[id, result, error]` array for the struct.
pub(super) fn decode_response(body: &str) -> Result<JsonRpcResponse, RpcError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        RpcError::InvalidResponse(format!("decode JSON-RPC response: {e}; body={body}"))
    })?;
    match value {
        map @ serde_json::Value::Object(_) => serde_json::from_value(map).map_err(|e| {
            RpcError::InvalidResponse(format!("decode JSON-RPC response: {e}; body={body}"))
        }),
        other => Err(RpcError::InvalidResponse(format!(
            "JSON-RPC response is not an object: {other}"
        ))),
    }
}

/// Parse a JSON-RPC error value into a structured `CoreError`.
///
/// The JSON-RPC spec defines errors as `{"code": <int>, "message": <string>}`.
/// If the error value matches that shape, we produce a `ServerError`;
/// otherwise we fall back to `InvalidResponse` with the raw JSON.
pub(super) fn parse_jsonrpc_error(err: serde_json::Value) -> CoreError {
    #[derive(serde::Deserialize)]
    struct JsonRpcError {
        code: i64,
        message: String,
    }

    if let Ok(parsed) = serde_json::from_value::<JsonRpcError>(err.clone()) {
        CoreError::Rpc(RpcError::ServerError {
            code: parsed.code,
            message: parsed.message,
        })
    } else {
        CoreError::Rpc(RpcError::InvalidResponse(format!(
            "non-standard JSON-RPC error: {err}"
        )))
    }
}

/// Check that a response carries the id of the request it answers. Ids
/// are accepted as numbers or numeric strings.
pub(super) fn check_response_id(expected: u64, id: &serde_json::Value) -> Result<(), CoreError> {
    let parsed = match id {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.parse::<u64>().ok(),
        _ => None,
    };

    if parsed == Some(expected) {
        Ok(())
    } else {
        Err(RpcError::IdMismatch {
            expected,
            actual: id.to_string(),
        }
        .into())
    }
}
