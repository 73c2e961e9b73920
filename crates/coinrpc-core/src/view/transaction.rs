//! Views over decoded transactions (`getrawtransaction` verbose,
//! `decoderawtransaction`) and single outputs (`gettxout`).

use std::time::SystemTime;

use bitcoin::{Amount, BlockHash, OutPoint, ScriptBuf, Txid};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::rpc::RawTransactionRpc;
use crate::view::{Fields, JsonView};

// ==============================================================================
// Raw Transaction
// ==============================================================================

/// A decoded transaction. `hex` and the block fields are only present for
/// `getrawtransaction`; `decoderawtransaction` omits them.
#[derive(Debug, Clone)]
pub struct RawTransaction {
    map: Map<String, Value>,
}

json_view!(RawTransaction, "getrawtransaction");

impl RawTransaction {
    pub fn hex(&self) -> Result<Option<String>, CoreError> {
        self.fields().optional("hex")
    }

    pub fn txid(&self) -> Result<Txid, CoreError> {
        self.fields().required("txid")
    }

    pub fn version(&self) -> Result<i32, CoreError> {
        self.fields().required("version")
    }

    pub fn lock_time(&self) -> Result<u32, CoreError> {
        self.fields().required("locktime")
    }

    pub fn vin(&self) -> Result<Vec<TxIn<'_>>, CoreError> {
        Ok(self
            .fields()
            .objects("vin")?
            .into_iter()
            .map(|fields| TxIn { fields })
            .collect())
    }

    pub fn vout(&self) -> Result<Vec<TxOut<'_>>, CoreError> {
        Ok(self
            .fields()
            .objects("vout")?
            .into_iter()
            .map(|fields| TxOut { tx: self, fields })
            .collect())
    }

    /// The output at position `vout`.
    pub fn output(&self, vout: u32) -> Result<TxOut<'_>, CoreError> {
        self.vout()?
            .into_iter()
            .nth(vout as usize)
            .ok_or_else(|| CoreError::MissingField {
                field: format!("vout[{vout}]"),
            })
    }

    pub fn block_hash(&self) -> Result<Option<BlockHash>, CoreError> {
        self.fields().optional("blockhash")
    }

    /// `None` for mempool transactions.
    pub fn confirmations(&self) -> Result<Option<u64>, CoreError> {
        self.fields().optional("confirmations")
    }

    pub fn time(&self) -> Result<Option<SystemTime>, CoreError> {
        self.fields().optional("time")
    }

    pub fn block_time(&self) -> Result<Option<SystemTime>, CoreError> {
        self.fields().optional("blocktime")
    }
}

// ==============================================================================
// Inputs
// ==============================================================================

#[derive(Debug, Clone, Copy)]
pub struct TxIn<'a> {
    fields: Fields<'a>,
}

impl<'a> TxIn<'a> {
    pub fn is_coinbase(&self) -> bool {
        self.fields.contains("coinbase")
    }

    /// Coinbase script hex; `None` for regular inputs.
    pub fn coinbase(&self) -> Result<Option<String>, CoreError> {
        self.fields.optional("coinbase")
    }

    pub fn txid(&self) -> Result<Txid, CoreError> {
        self.fields.required("txid")
    }

    pub fn vout(&self) -> Result<u32, CoreError> {
        self.fields.required("vout")
    }

    /// The outpoint being spent. `None` for coinbase inputs.
    pub fn prevout(&self) -> Result<Option<OutPoint>, CoreError> {
        if self.is_coinbase() {
            return Ok(None);
        }
        Ok(Some(OutPoint::new(self.txid()?, self.vout()?)))
    }

    /// The `{asm, hex}` script signature object.
    pub fn script_sig(&self) -> Result<Fields<'a>, CoreError> {
        self.fields.object("scriptSig")
    }

    pub fn sequence(&self) -> Result<u32, CoreError> {
        self.fields.required("sequence")
    }

    /// Fetch the transaction that funded this input. Resolve the spent
    /// output with [`RawTransaction::output`] and [`TxIn::vout`].
    pub async fn transaction<R>(&self, rpc: &R) -> Result<RawTransaction, CoreError>
    where
        R: RawTransactionRpc + ?Sized,
    {
        rpc.get_raw_transaction(&self.txid()?).await
    }
}

// ==============================================================================
// Outputs
// ==============================================================================

#[derive(Debug, Clone, Copy)]
pub struct TxOut<'a> {
    tx: &'a RawTransaction,
    fields: Fields<'a>,
}

impl<'a> TxOut<'a> {
    pub fn value(&self) -> Result<Amount, CoreError> {
        self.fields.required("value")
    }

    pub fn n(&self) -> Result<u32, CoreError> {
        self.fields.required("n")
    }

    pub fn script_pub_key(&self) -> Result<ScriptPubKey<'a>, CoreError> {
        self.fields.object("scriptPubKey").map(ScriptPubKey::new)
    }

    /// The outpoint that refers to this output, ready to be spent in
    /// `createrawtransaction`.
    pub fn outpoint(&self) -> Result<OutPoint, CoreError> {
        Ok(OutPoint::new(self.tx.txid()?, self.n()?))
    }

    pub fn transaction(&self) -> &'a RawTransaction {
        self.tx
    }
}

// ==============================================================================
// Script Pub Key
// ==============================================================================

#[derive(Debug, Clone, Copy)]
pub struct ScriptPubKey<'a> {
    fields: Fields<'a>,
}

impl<'a> ScriptPubKey<'a> {
    fn new(fields: Fields<'a>) -> Self {
        Self { fields }
    }

    pub fn asm(&self) -> Result<String, CoreError> {
        self.fields.required("asm")
    }

    pub fn hex(&self) -> Result<String, CoreError> {
        self.fields.required("hex")
    }

    pub fn script(&self) -> Result<ScriptBuf, CoreError> {
        let hex = self.hex()?;
        ScriptBuf::from_hex(&hex).map_err(|_| CoreError::InvalidField {
            field: "scriptPubKey.hex".into(),
            expected: "script hex",
            value: hex,
        })
    }

    /// Dropped by Bitcoin Core 22 and later.
    pub fn req_sigs(&self) -> Result<Option<u32>, CoreError> {
        self.fields.optional("reqSigs")
    }

    pub fn script_type(&self) -> Result<String, CoreError> {
        self.fields.required("type")
    }

    /// Destination addresses. Reads the legacy `addresses` array, or the
    /// single `address` newer nodes report. Empty for non-standard scripts.
    pub fn addresses(&self) -> Result<Vec<String>, CoreError> {
        if let Some(addresses) = self.fields.optional::<Vec<String>>("addresses")? {
            return Ok(addresses);
        }
        Ok(self
            .fields
            .optional::<String>("address")?
            .into_iter()
            .collect())
    }
}

// ==============================================================================
// gettxout
// ==============================================================================

/// An unspent output as reported by `gettxout`.
#[derive(Debug, Clone)]
pub struct TxOutInfo {
    map: Map<String, Value>,
}

json_view!(TxOutInfo, "gettxout");

impl TxOutInfo {
    pub fn best_block(&self) -> Result<BlockHash, CoreError> {
        self.fields().required("bestblock")
    }

    pub fn confirmations(&self) -> Result<u64, CoreError> {
        self.fields().required("confirmations")
    }

    pub fn value(&self) -> Result<Amount, CoreError> {
        self.fields().required("value")
    }

    pub fn script_pub_key(&self) -> Result<ScriptPubKey<'_>, CoreError> {
        self.fields().object("scriptPubKey").map(ScriptPubKey::new)
    }

    pub fn coinbase(&self) -> Result<bool, CoreError> {
        self.fields().required("coinbase")
    }
}
