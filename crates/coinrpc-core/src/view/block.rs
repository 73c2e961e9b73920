use std::time::SystemTime;

use bitcoin::{BlockHash, TxMerkleNode, Txid};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::rpc::BlockchainRpc;
use crate::view::JsonView;

/// Verbose `getblock` result.
#[derive(Debug, Clone)]
pub struct Block {
    map: Map<String, Value>,
}

json_view!(Block, "getblock");

impl Block {
    pub fn hash(&self) -> Result<BlockHash, CoreError> {
        self.fields().required("hash")
    }

    /// `-1` when the block is not on the active chain.
    pub fn confirmations(&self) -> Result<i64, CoreError> {
        self.fields().required("confirmations")
    }

    pub fn size(&self) -> Result<u64, CoreError> {
        self.fields().required("size")
    }

    pub fn height(&self) -> Result<u64, CoreError> {
        self.fields().required("height")
    }

    pub fn version(&self) -> Result<i32, CoreError> {
        self.fields().required("version")
    }

    pub fn merkle_root(&self) -> Result<TxMerkleNode, CoreError> {
        self.fields().required("merkleroot")
    }

    pub fn tx(&self) -> Result<Vec<Txid>, CoreError> {
        self.fields().required("tx")
    }

    pub fn time(&self) -> Result<SystemTime, CoreError> {
        self.fields().required("time")
    }

    pub fn nonce(&self) -> Result<u32, CoreError> {
        self.fields().required("nonce")
    }

    pub fn bits(&self) -> Result<String, CoreError> {
        self.fields().required("bits")
    }

    pub fn difficulty(&self) -> Result<f64, CoreError> {
        self.fields().required("difficulty")
    }

    /// `None` for the genesis block.
    pub fn previous_hash(&self) -> Result<Option<BlockHash>, CoreError> {
        self.fields().optional("previousblockhash")
    }

    /// `None` for the current tip.
    pub fn next_hash(&self) -> Result<Option<BlockHash>, CoreError> {
        self.fields().optional("nextblockhash")
    }

    /// Fetch the parent block.
    pub async fn previous<R>(&self, rpc: &R) -> Result<Option<Block>, CoreError>
    where
        R: BlockchainRpc + ?Sized,
    {
        match self.previous_hash()? {
            Some(hash) => rpc.get_block(&hash).await.map(Some),
            None => Ok(None),
        }
    }

    /// Fetch the child block on the active chain.
    pub async fn next<R>(&self, rpc: &R) -> Result<Option<Block>, CoreError>
    where
        R: BlockchainRpc + ?Sized,
    {
        match self.next_hash()? {
            Some(hash) => rpc.get_block(&hash).await.map(Some),
            None => Ok(None),
        }
    }
}
