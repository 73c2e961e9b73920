use async_trait::async_trait;
use serde_json::json;

use crate::error::CoreError;
use crate::parsing::decode_result;
use crate::view::{views_from_value, PeerInfo};

use super::types::AddNodeCommand;
use super::BitcoinRpc;

/// Peer management and node control.
#[async_trait]
pub trait NetworkRpc: BitcoinRpc {
    async fn add_node(&self, node: &str, command: AddNodeCommand) -> Result<(), CoreError> {
        self.query("addnode", vec![json!(node), json!(command.as_str())])
            .await?;
        Ok(())
    }

    async fn get_connection_count(&self) -> Result<u64, CoreError> {
        let raw = self.query("getconnectioncount", Vec::new()).await?;
        decode_result("getconnectioncount", "connection count", raw)
    }

    async fn get_peer_info(&self) -> Result<Vec<PeerInfo>, CoreError> {
        let raw = self.query("getpeerinfo", Vec::new()).await?;
        views_from_value("getpeerinfo", raw)
    }

    /// Ask the daemon to shut down.
    async fn stop(&self) -> Result<(), CoreError> {
        self.query("stop", Vec::new()).await?;
        Ok(())
    }
}

impl<T: BitcoinRpc + ?Sized> NetworkRpc for T {}
