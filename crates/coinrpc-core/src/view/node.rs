//! Views over node-level status calls: `getinfo`, `getmininginfo`,
//! `getpeerinfo`, `gettxoutsetinfo` and `getwork`.

use std::time::SystemTime;

use bitcoin::{Amount, BlockHash};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::view::JsonView;

// ==============================================================================
// getinfo
// ==============================================================================

#[derive(Debug, Clone)]
pub struct Info {
    map: Map<String, Value>,
}

json_view!(Info, "getinfo");

impl Info {
    pub fn version(&self) -> Result<i64, CoreError> {
        self.fields().required("version")
    }

    pub fn protocol_version(&self) -> Result<i64, CoreError> {
        self.fields().required("protocolversion")
    }

    /// Absent when the node runs without a wallet.
    pub fn wallet_version(&self) -> Result<Option<i64>, CoreError> {
        self.fields().optional("walletversion")
    }

    pub fn balance(&self) -> Result<Option<Amount>, CoreError> {
        self.fields().optional("balance")
    }

    pub fn blocks(&self) -> Result<u64, CoreError> {
        self.fields().required("blocks")
    }

    pub fn time_offset(&self) -> Result<i64, CoreError> {
        self.fields().required("timeoffset")
    }

    pub fn connections(&self) -> Result<u64, CoreError> {
        self.fields().required("connections")
    }

    pub fn proxy(&self) -> Result<String, CoreError> {
        self.fields().required("proxy")
    }

    pub fn difficulty(&self) -> Result<f64, CoreError> {
        self.fields().required("difficulty")
    }

    pub fn testnet(&self) -> Result<bool, CoreError> {
        self.fields().required("testnet")
    }

    pub fn keypool_oldest(&self) -> Result<Option<SystemTime>, CoreError> {
        self.fields().optional("keypoololdest")
    }

    pub fn keypool_size(&self) -> Result<Option<u64>, CoreError> {
        self.fields().optional("keypoolsize")
    }

    /// Only reported for encrypted wallets; `0` means locked.
    pub fn unlocked_until(&self) -> Result<Option<u64>, CoreError> {
        self.fields().optional("unlocked_until")
    }

    pub fn pay_tx_fee(&self) -> Result<Option<Amount>, CoreError> {
        self.fields().optional("paytxfee")
    }

    pub fn relay_fee(&self) -> Result<Amount, CoreError> {
        self.fields().required("relayfee")
    }

    pub fn errors(&self) -> Result<String, CoreError> {
        self.fields().required("errors")
    }
}

// ==============================================================================
// getmininginfo
// ==============================================================================

#[derive(Debug, Clone)]
pub struct MiningInfo {
    map: Map<String, Value>,
}

json_view!(MiningInfo, "getmininginfo");

impl MiningInfo {
    pub fn blocks(&self) -> Result<u64, CoreError> {
        self.fields().required("blocks")
    }

    pub fn current_block_size(&self) -> Result<Option<u64>, CoreError> {
        self.fields().optional("currentblocksize")
    }

    pub fn current_block_tx(&self) -> Result<Option<u64>, CoreError> {
        self.fields().optional("currentblocktx")
    }

    pub fn difficulty(&self) -> Result<f64, CoreError> {
        self.fields().required("difficulty")
    }

    /// Older nodes call this `errors`, newer ones `warnings`.
    pub fn errors(&self) -> Result<String, CoreError> {
        let fields = self.fields();
        match fields.optional("errors")? {
            Some(errors) => Ok(errors),
            None => fields.required("warnings"),
        }
    }

    pub fn gen_proc_limit(&self) -> Result<Option<i64>, CoreError> {
        self.fields().optional("genproclimit")
    }

    pub fn network_hash_ps(&self) -> Result<f64, CoreError> {
        self.fields().required("networkhashps")
    }

    pub fn pooled_tx(&self) -> Result<u64, CoreError> {
        self.fields().required("pooledtx")
    }

    pub fn testnet(&self) -> Result<Option<bool>, CoreError> {
        self.fields().optional("testnet")
    }

    pub fn chain(&self) -> Result<String, CoreError> {
        self.fields().required("chain")
    }

    pub fn generate(&self) -> Result<Option<bool>, CoreError> {
        self.fields().optional("generate")
    }
}

// ==============================================================================
// getpeerinfo
// ==============================================================================

/// One entry of `getpeerinfo`.
#[derive(Debug, Clone)]
pub struct PeerInfo {
    map: Map<String, Value>,
}

json_view!(PeerInfo, "getpeerinfo");

impl PeerInfo {
    pub fn addr(&self) -> Result<String, CoreError> {
        self.fields().required("addr")
    }

    pub fn services(&self) -> Result<String, CoreError> {
        self.fields().required("services")
    }

    pub fn last_send(&self) -> Result<SystemTime, CoreError> {
        self.fields().required("lastsend")
    }

    pub fn last_recv(&self) -> Result<SystemTime, CoreError> {
        self.fields().required("lastrecv")
    }

    pub fn bytes_sent(&self) -> Result<u64, CoreError> {
        self.fields().required("bytessent")
    }

    pub fn bytes_recv(&self) -> Result<u64, CoreError> {
        self.fields().required("bytesrecv")
    }

    pub fn blocks_requested(&self) -> Result<Option<u64>, CoreError> {
        self.fields().optional("blocksrequested")
    }

    pub fn conn_time(&self) -> Result<SystemTime, CoreError> {
        self.fields().required("conntime")
    }

    pub fn version(&self) -> Result<i64, CoreError> {
        self.fields().required("version")
    }

    pub fn subver(&self) -> Result<String, CoreError> {
        self.fields().required("subver")
    }

    pub fn inbound(&self) -> Result<bool, CoreError> {
        self.fields().required("inbound")
    }

    pub fn starting_height(&self) -> Result<i64, CoreError> {
        self.fields().required("startingheight")
    }

    pub fn ban_score(&self) -> Result<Option<i64>, CoreError> {
        self.fields().optional("banscore")
    }
}

// ==============================================================================
// gettxoutsetinfo
// ==============================================================================

#[derive(Debug, Clone)]
pub struct TxOutSetInfo {
    map: Map<String, Value>,
}

json_view!(TxOutSetInfo, "gettxoutsetinfo");

impl TxOutSetInfo {
    pub fn height(&self) -> Result<u64, CoreError> {
        self.fields().required("height")
    }

    pub fn best_block(&self) -> Result<BlockHash, CoreError> {
        self.fields().required("bestblock")
    }

    pub fn transactions(&self) -> Result<u64, CoreError> {
        self.fields().required("transactions")
    }

    pub fn tx_outs(&self) -> Result<u64, CoreError> {
        self.fields().required("txouts")
    }

    pub fn bytes_serialized(&self) -> Result<Option<u64>, CoreError> {
        self.fields().optional("bytes_serialized")
    }

    pub fn hash_serialized(&self) -> Result<Option<String>, CoreError> {
        self.fields().optional("hash_serialized")
    }

    pub fn total_amount(&self) -> Result<Amount, CoreError> {
        self.fields().required("total_amount")
    }
}

// ==============================================================================
// getwork
// ==============================================================================

#[derive(Debug, Clone)]
pub struct Work {
    map: Map<String, Value>,
}

json_view!(Work, "getwork");

impl Work {
    pub fn midstate(&self) -> Result<String, CoreError> {
        self.fields().required("midstate")
    }

    pub fn data(&self) -> Result<String, CoreError> {
        self.fields().required("data")
    }

    pub fn hash1(&self) -> Result<String, CoreError> {
        self.fields().required("hash1")
    }

    pub fn target(&self) -> Result<String, CoreError> {
        self.fields().required("target")
    }
}
