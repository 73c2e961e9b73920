//! Views over wallet listings and address checks.
//!
//! The account fields belong to the pre-0.17 accounts API. Newer nodes
//! report a `label` instead, which the `account` accessors fall back to.

use std::time::SystemTime;

use bitcoin::{Amount, BlockHash, ScriptBuf, SignedAmount, Txid};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::rpc::RawTransactionRpc;
use crate::view::{Fields, JsonView};

fn account_or_label(fields: Fields<'_>) -> Result<Option<String>, CoreError> {
    match fields.optional("account")? {
        Some(account) => Ok(Some(account)),
        None => fields.optional("label"),
    }
}

// ==============================================================================
// listreceivedbyaddress / listreceivedbyaccount
// ==============================================================================

#[derive(Debug, Clone)]
pub struct ReceivedAddress {
    map: Map<String, Value>,
}

json_view!(ReceivedAddress, "listreceivedbyaddress");

impl ReceivedAddress {
    /// `None` for `listreceivedbyaccount` entries.
    pub fn address(&self) -> Result<Option<String>, CoreError> {
        self.fields().optional("address")
    }

    pub fn account(&self) -> Result<Option<String>, CoreError> {
        account_or_label(self.fields())
    }

    pub fn amount(&self) -> Result<Amount, CoreError> {
        self.fields().required("amount")
    }

    pub fn confirmations(&self) -> Result<u64, CoreError> {
        self.fields().required("confirmations")
    }
}

// ==============================================================================
// listtransactions / listsinceblock entries
// ==============================================================================

/// One wallet ledger entry. `amount` and `fee` are negative for the
/// `send` category.
#[derive(Debug, Clone)]
pub struct WalletTransaction {
    map: Map<String, Value>,
}

json_view!(WalletTransaction, "listtransactions");

impl WalletTransaction {
    pub fn account(&self) -> Result<Option<String>, CoreError> {
        account_or_label(self.fields())
    }

    pub fn address(&self) -> Result<Option<String>, CoreError> {
        self.fields().optional("address")
    }

    pub fn category(&self) -> Result<String, CoreError> {
        self.fields().required("category")
    }

    pub fn amount(&self) -> Result<SignedAmount, CoreError> {
        self.fields().required("amount")
    }

    pub fn fee(&self) -> Result<Option<SignedAmount>, CoreError> {
        self.fields().optional("fee")
    }

    /// Negative when the transaction conflicts with the active chain.
    pub fn confirmations(&self) -> Result<i64, CoreError> {
        self.fields().required("confirmations")
    }

    pub fn block_hash(&self) -> Result<Option<BlockHash>, CoreError> {
        self.fields().optional("blockhash")
    }

    pub fn block_index(&self) -> Result<Option<u64>, CoreError> {
        self.fields().optional("blockindex")
    }

    pub fn block_time(&self) -> Result<Option<SystemTime>, CoreError> {
        self.fields().optional("blocktime")
    }

    pub fn txid(&self) -> Result<Txid, CoreError> {
        self.fields().required("txid")
    }

    pub fn time(&self) -> Result<SystemTime, CoreError> {
        self.fields().required("time")
    }

    pub fn time_received(&self) -> Result<SystemTime, CoreError> {
        self.fields().required("timereceived")
    }

    pub fn comment(&self) -> Result<Option<String>, CoreError> {
        self.fields().optional("comment")
    }

    pub fn comment_to(&self) -> Result<Option<String>, CoreError> {
        self.fields().optional("to")
    }

    /// Fetch the full decoded transaction behind this entry.
    pub async fn raw<R>(&self, rpc: &R) -> Result<crate::view::RawTransaction, CoreError>
    where
        R: RawTransactionRpc + ?Sized,
    {
        rpc.get_raw_transaction(&self.txid()?).await
    }
}

// ==============================================================================
// listsinceblock
// ==============================================================================

#[derive(Debug, Clone)]
pub struct TransactionsSinceBlock {
    map: Map<String, Value>,
}

json_view!(TransactionsSinceBlock, "listsinceblock");

impl TransactionsSinceBlock {
    pub fn transactions(&self) -> Result<Vec<WalletTransaction>, CoreError> {
        self.fields()
            .objects("transactions")?
            .into_iter()
            .map(|entry| Ok(WalletTransaction::from_map(entry.as_map().clone())))
            .collect()
    }

    /// Hash of the tip at the time of the call; pass it to the next
    /// `listsinceblock` to continue from here.
    pub fn last_block(&self) -> Result<BlockHash, CoreError> {
        self.fields().required("lastblock")
    }

    pub fn into_transactions(mut self) -> Result<Vec<WalletTransaction>, CoreError> {
        crate::view::views_from_value(
            Self::NAME,
            self.map.remove("transactions").unwrap_or(Value::Null),
        )
    }
}

// ==============================================================================
// listunspent
// ==============================================================================

#[derive(Debug, Clone)]
pub struct Unspent {
    map: Map<String, Value>,
}

json_view!(Unspent, "listunspent");

impl Unspent {
    pub fn txid(&self) -> Result<Txid, CoreError> {
        self.fields().required("txid")
    }

    pub fn vout(&self) -> Result<u32, CoreError> {
        self.fields().required("vout")
    }

    pub fn outpoint(&self) -> Result<bitcoin::OutPoint, CoreError> {
        Ok(bitcoin::OutPoint::new(self.txid()?, self.vout()?))
    }

    pub fn address(&self) -> Result<Option<String>, CoreError> {
        self.fields().optional("address")
    }

    /// Script hex as returned by the daemon.
    pub fn script_pub_key(&self) -> Result<String, CoreError> {
        self.fields().required("scriptPubKey")
    }

    pub fn script(&self) -> Result<ScriptBuf, CoreError> {
        let hex = self.script_pub_key()?;
        ScriptBuf::from_hex(&hex).map_err(|_| CoreError::InvalidField {
            field: "scriptPubKey".into(),
            expected: "script hex",
            value: hex,
        })
    }

    pub fn account(&self) -> Result<Option<String>, CoreError> {
        account_or_label(self.fields())
    }

    pub fn amount(&self) -> Result<Amount, CoreError> {
        self.fields().required("amount")
    }

    pub fn confirmations(&self) -> Result<u64, CoreError> {
        self.fields().required("confirmations")
    }
}

// ==============================================================================
// validateaddress
// ==============================================================================

#[derive(Debug, Clone)]
pub struct AddressValidation {
    map: Map<String, Value>,
}

json_view!(AddressValidation, "validateaddress");

impl AddressValidation {
    pub fn is_valid(&self) -> Result<bool, CoreError> {
        self.fields().required("isvalid")
    }

    /// The remaining accessors are `None` for invalid addresses, and the
    /// wallet-related ones are `None` on nodes without a wallet.
    pub fn address(&self) -> Result<Option<String>, CoreError> {
        self.fields().optional("address")
    }

    pub fn is_mine(&self) -> Result<Option<bool>, CoreError> {
        self.fields().optional("ismine")
    }

    pub fn is_script(&self) -> Result<Option<bool>, CoreError> {
        self.fields().optional("isscript")
    }

    pub fn pub_key(&self) -> Result<Option<String>, CoreError> {
        self.fields().optional("pubkey")
    }

    pub fn is_compressed(&self) -> Result<Option<bool>, CoreError> {
        self.fields().optional("iscompressed")
    }

    pub fn account(&self) -> Result<Option<String>, CoreError> {
        account_or_label(self.fields())
    }
}
