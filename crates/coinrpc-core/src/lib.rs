//! Typed client for the JSON-RPC interface of Bitcoin Core compatible
//! daemons.
//!
//! [`rpc::HttpRpcClient`] performs one HTTP round trip per call. The typed
//! method surface lives in the extension traits re-exported from [`rpc`];
//! bring them into scope with `use coinrpc_core::prelude::*`.

pub mod config;
pub mod error;
mod parsing;
pub mod rpc;
#[cfg(test)]
mod test_util;
pub mod view;

pub use config::RpcConfig;
pub use error::{CoreError, RpcError};

pub mod prelude {
    pub use crate::config::RpcConfig;
    pub use crate::error::CoreError;
    pub use crate::rpc::{
        BitcoinRpc, BlockchainRpc, HttpRpcClient, MiningRpc, NetworkRpc, RawTransactionRpc,
        WalletRpc,
    };
    pub use crate::view::JsonView;
}
