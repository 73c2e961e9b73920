use bitcoin::Txid;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("RPC communication failure: {0}")]
    Rpc(#[from] RpcError),

    #[error("invalid client configuration: {0}")]
    Config(String),

    #[error("invalid RPC parameters: {0}")]
    InvalidParams(String),

    #[error("missing field `{field}` in RPC result")]
    MissingField { field: String },

    #[error("field `{field}` is not a valid {expected}: {value}")]
    InvalidField {
        field: String,
        expected: &'static str,
        value: String,
    },

    #[error("unexpected result from `{method}`: expected {expected}, got {value}")]
    UnexpectedResult {
        method: String,
        expected: &'static str,
        value: String,
    },

    #[error("transaction not found: {0}")]
    TxNotFound(Txid),

    #[error("signrawtransaction returned an incomplete signature set")]
    IncompleteSignature,

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// The daemon-side error code, if this error came back in a JSON-RPC
    /// `error` member.
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            Self::Rpc(RpcError::ServerError { code, .. }) => Some(*code),
            _ => None,
        }
    }
}

/// Failures of a single JSON-RPC round trip.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("server error {code}: {message}")]
    ServerError { code: i64, message: String },

    #[error("invalid JSON-RPC response: {0}")]
    InvalidResponse(String),

    #[error("wrong response id (expected {expected}, response {actual})")]
    IdMismatch { expected: u64, actual: String },
}
