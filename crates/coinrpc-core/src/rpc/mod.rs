//! Bitcoin daemon RPC abstraction layer.
//!
//! Defines the [`BitcoinRpc`] trait (one untyped JSON-RPC round trip) and
//! provides an HTTP implementation ([`HttpRpcClient`]) plus a test mock
//! (`mock::MockRpc`). The typed method surface lives in extension traits
//! that are implemented for every `BitcoinRpc`:
//!
//! - [`BlockchainRpc`]: blocks, chain state, mempool, UTXO set
//! - [`NetworkRpc`]: peers and node control
//! - [`MiningRpc`]: legacy mining calls
//! - [`RawTransactionRpc`]: building, decoding, signing and relaying
//! - [`WalletRpc`]: balances, addresses, listings and sends

mod blockchain;
mod http_adapter;
mod mining;
#[cfg(test)]
pub mod mock;
mod network;
mod params;
mod rawtx;
pub mod types;
mod wallet;

pub use blockchain::BlockchainRpc;
pub use http_adapter::HttpRpcClient;
pub use mining::MiningRpc;
pub use network::NetworkRpc;
pub use rawtx::RawTransactionRpc;
pub use types::{AddNodeCommand, ChainInfo, TxOutput};
pub use wallet::WalletRpc;

use async_trait::async_trait;

use crate::error::CoreError;

/// A transport able to execute one JSON-RPC call against the daemon.
///
/// Implementations are expected to handle authentication, envelope
/// encoding and protocol-level error detection internally, returning the
/// `result` member (or `null` when the daemon omits it).
#[async_trait]
pub trait BitcoinRpc: Send + Sync {
    async fn query(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, CoreError>;
}

#[async_trait]
impl<T: BitcoinRpc + ?Sized> BitcoinRpc for std::sync::Arc<T> {
    async fn query(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, CoreError> {
        (**self).query(method, params).await
    }
}
