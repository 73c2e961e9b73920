use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CoreError, RpcError};

use super::BitcoinRpc;

/// JSON-RPC code Bitcoin Core returns for unknown methods.
const RPC_METHOD_NOT_FOUND: i64 = -32601;

enum Canned {
    Result(Value),
    Error { code: i64, message: String },
}

/// A mock Bitcoin RPC backend for testing. Returns canned results per
/// method name, populated via the builder pattern, and records every call
/// so tests can assert on the exact method and positional params.
pub struct MockRpc {
    responses: HashMap<String, Canned>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockRpc {
    pub fn builder() -> MockRpcBuilder {
        MockRpcBuilder {
            responses: HashMap::new(),
        }
    }

    /// Every `(method, params)` pair received so far, in call order.
    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// The params of the single call made so far.
    pub fn only_call(&self) -> (String, Vec<Value>) {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one call, got {calls:?}");
        calls.into_iter().next().expect("length checked above")
    }
}

pub struct MockRpcBuilder {
    responses: HashMap<String, Canned>,
}

impl MockRpcBuilder {
    pub fn with_response(mut self, method: &str, result: Value) -> Self {
        self.responses
            .insert(method.to_owned(), Canned::Result(result));
        self
    }

    pub fn with_error(mut self, method: &str, code: i64, message: &str) -> Self {
        self.responses.insert(
            method.to_owned(),
            Canned::Error {
                code,
                message: message.to_owned(),
            },
        );
        self
    }

    pub fn build(self) -> MockRpc {
        MockRpc {
            responses: self.responses,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BitcoinRpc for MockRpc {
    async fn query(&self, method: &str, params: Vec<Value>) -> Result<Value, CoreError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((method.to_owned(), params));
        }

        match self.responses.get(method) {
            Some(Canned::Result(result)) => Ok(result.clone()),
            Some(Canned::Error { code, message }) => Err(RpcError::ServerError {
                code: *code,
                message: message.clone(),
            }
            .into()),
            None => Err(RpcError::ServerError {
                code: RPC_METHOD_NOT_FOUND,
                message: "Method not found".to_owned(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_method_is_method_not_found() {
        let rpc = MockRpc::builder().build();
        let err = rpc.query("nosuchmethod", Vec::new()).await.unwrap_err();
        assert_eq!(err.rpc_code(), Some(RPC_METHOD_NOT_FOUND));
        assert_eq!(rpc.only_call().0, "nosuchmethod");
    }

    #[tokio::test]
    async fn records_calls_in_order() {
        let rpc = MockRpc::builder()
            .with_response("getblockcount", serde_json::json!(7))
            .with_error("stop", -1, "nope")
            .build();
        assert_eq!(
            rpc.query("getblockcount", Vec::new()).await.unwrap(),
            serde_json::json!(7)
        );
        assert!(rpc.query("stop", vec![serde_json::json!(1)]).await.is_err());

        let calls = rpc.calls();
        assert_eq!(calls[0].0, "getblockcount");
        assert_eq!(calls[1], ("stop".to_owned(), vec![serde_json::json!(1)]));
    }
}
