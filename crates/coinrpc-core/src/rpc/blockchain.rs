use async_trait::async_trait;
use bitcoin::{BlockHash, Txid};
use serde_json::json;

use crate::error::CoreError;
use crate::parsing::decode_result;
use crate::view::{Block, Info, JsonView, TxOutInfo, TxOutSetInfo};

use super::types::ChainInfo;
use super::BitcoinRpc;

/// Block and chain-state queries.
#[async_trait]
pub trait BlockchainRpc: BitcoinRpc {
    async fn get_block(&self, hash: &BlockHash) -> Result<Block, CoreError> {
        let raw = self.query("getblock", vec![json!(hash.to_string())]).await?;
        Block::from_value(raw)
    }

    async fn get_block_count(&self) -> Result<u64, CoreError> {
        let raw = self.query("getblockcount", Vec::new()).await?;
        decode_result("getblockcount", "block count", raw)
    }

    async fn get_block_hash(&self, height: u64) -> Result<BlockHash, CoreError> {
        let raw = self.query("getblockhash", vec![json!(height)]).await?;
        decode_result("getblockhash", "block hash", raw)
    }

    async fn get_best_block_hash(&self) -> Result<BlockHash, CoreError> {
        let raw = self.query("getbestblockhash", Vec::new()).await?;
        decode_result("getbestblockhash", "block hash", raw)
    }

    /// Fetch basic chain info (network, block count, pruning status).
    async fn get_blockchain_info(&self) -> Result<ChainInfo, CoreError> {
        let raw = self.query("getblockchaininfo", Vec::new()).await?;
        decode_result("getblockchaininfo", "chain info object", raw)
    }

    async fn get_difficulty(&self) -> Result<f64, CoreError> {
        let raw = self.query("getdifficulty", Vec::new()).await?;
        decode_result("getdifficulty", "number", raw)
    }

    /// Legacy node summary; removed from Bitcoin Core in 0.16.
    async fn get_info(&self) -> Result<Info, CoreError> {
        let raw = self.query("getinfo", Vec::new()).await?;
        Info::from_value(raw)
    }

    async fn get_raw_mempool(&self) -> Result<Vec<Txid>, CoreError> {
        let raw = self.query("getrawmempool", Vec::new()).await?;
        decode_result("getrawmempool", "array of txids", raw)
    }

    /// Fetch a specific unspent output, including mempool spends.
    /// Returns `None` if the output has been spent or does not exist.
    async fn get_tx_out(&self, txid: &Txid, vout: u32) -> Result<Option<TxOutInfo>, CoreError> {
        let raw = self
            .query(
                "gettxout",
                vec![json!(txid.to_string()), json!(vout), json!(true)],
            )
            .await?;
        if raw.is_null() {
            return Ok(None);
        }
        TxOutInfo::from_value(raw).map(Some)
    }

    async fn get_tx_out_set_info(&self) -> Result<TxOutSetInfo, CoreError> {
        let raw = self.query("gettxoutsetinfo", Vec::new()).await?;
        TxOutSetInfo::from_value(raw)
    }
}

impl<T: BitcoinRpc + ?Sized> BlockchainRpc for T {}

#[cfg(test)]
mod tests {
    use bitcoin::Amount;

    use super::*;
    use crate::rpc::mock::MockRpc;
    use crate::test_util::{block_json, hash_from_byte, txid_from_byte, P2WPKH_HEX};

    #[tokio::test]
    async fn get_block_sends_hash_and_wraps_result() {
        let rpc = MockRpc::builder()
            .with_response("getblock", block_json(5, Some(4), None))
            .build();
        let block = rpc.get_block(&hash_from_byte(5)).await.unwrap();
        assert_eq!(block.height().unwrap(), 5);

        let (method, params) = rpc.only_call();
        assert_eq!(method, "getblock");
        assert_eq!(params, vec![json!(hash_from_byte(5).to_string())]);
    }

    #[tokio::test]
    async fn scalar_results_are_decoded() {
        let rpc = MockRpc::builder()
            .with_response("getblockcount", json!(812_345))
            .with_response("getblockhash", json!(hash_from_byte(3).to_string()))
            .with_response("getdifficulty", json!(1.5))
            .build();

        assert_eq!(rpc.get_block_count().await.unwrap(), 812_345);
        assert_eq!(rpc.get_block_hash(3).await.unwrap(), hash_from_byte(3));
        assert_eq!(rpc.get_difficulty().await.unwrap(), 1.5);
        assert_eq!(rpc.calls()[1].1, vec![json!(3)]);
    }

    #[tokio::test]
    async fn wrong_result_type_is_unexpected_result() {
        let rpc = MockRpc::builder()
            .with_response("getblockcount", json!("many"))
            .build();
        let err = rpc.get_block_count().await.unwrap_err();
        assert!(matches!(err, CoreError::UnexpectedResult { method, .. } if method == "getblockcount"));
    }

    #[tokio::test]
    async fn get_raw_mempool_returns_txids() {
        let rpc = MockRpc::builder()
            .with_response(
                "getrawmempool",
                json!([txid_from_byte(1).to_string(), txid_from_byte(2).to_string()]),
            )
            .build();
        let mempool = rpc.get_raw_mempool().await.unwrap();
        assert_eq!(mempool, vec![txid_from_byte(1), txid_from_byte(2)]);
        assert!(rpc.only_call().1.is_empty());
    }

    #[tokio::test]
    async fn get_tx_out_null_means_spent() {
        let rpc = MockRpc::builder()
            .with_response("gettxout", serde_json::Value::Null)
            .build();
        assert!(rpc.get_tx_out(&txid_from_byte(1), 0).await.unwrap().is_none());
        assert_eq!(
            rpc.only_call().1,
            vec![json!(txid_from_byte(1).to_string()), json!(0), json!(true)]
        );
    }

    #[tokio::test]
    async fn get_tx_out_wraps_unspent_output() {
        let rpc = MockRpc::builder()
            .with_response(
                "gettxout",
                json!({
                    "bestblock": hash_from_byte(9).to_string(),
                    "confirmations": 2,
                    "value": 0.0005,
                    "scriptPubKey": {"asm": "", "hex": P2WPKH_HEX, "type": "witness_v0_keyhash"},
                    "coinbase": false
                }),
            )
            .build();
        let out = rpc
            .get_tx_out(&txid_from_byte(1), 1)
            .await
            .unwrap()
            .expect("output is unspent");
        assert_eq!(out.value().unwrap(), Amount::from_sat(50_000));
        assert_eq!(out.best_block().unwrap(), hash_from_byte(9));
    }

    #[tokio::test]
    async fn get_blockchain_info_deserializes() {
        let rpc = MockRpc::builder()
            .with_response(
                "getblockchaininfo",
                json!({
                    "chain": "main",
                    "blocks": 800_000,
                    "bestblockhash": hash_from_byte(1).to_string(),
                    "pruned": true
                }),
            )
            .build();
        let info = rpc.get_blockchain_info().await.unwrap();
        assert_eq!(info.chain, "main");
        assert_eq!(info.best_block_hash, hash_from_byte(1));
        assert!(info.pruned);
    }

    #[tokio::test]
    async fn works_through_trait_object() {
        let rpc: std::sync::Arc<dyn BitcoinRpc> = std::sync::Arc::new(
            MockRpc::builder()
                .with_response("getbestblockhash", json!(hash_from_byte(8).to_string()))
                .build(),
        );
        assert_eq!(rpc.get_best_block_hash().await.unwrap(), hash_from_byte(8));
    }
}
