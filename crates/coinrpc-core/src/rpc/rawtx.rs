use async_trait::async_trait;
use bitcoin::{Amount, OutPoint, Txid};
use serde_json::{json, Map, Value};

use crate::error::{CoreError, RpcError};
use crate::parsing::{amount_to_json, decode_result};
use crate::view::{Fields, JsonView, RawTransaction};

use super::types::TxOutput;
use super::BitcoinRpc;

/// Raw transaction construction, inspection and relay.
#[async_trait]
pub trait RawTransactionRpc: BitcoinRpc {
    /// Build an unsigned transaction spending `inputs`. Outputs that pay
    /// the same address are merged into one.
    async fn create_raw_transaction(
        &self,
        inputs: &[OutPoint],
        outputs: &[TxOutput],
    ) -> Result<String, CoreError> {
        let inputs: Vec<Value> = inputs
            .iter()
            .map(|outpoint| json!({"txid": outpoint.txid.to_string(), "vout": outpoint.vout}))
            .collect();
        let outputs = merge_outputs(outputs)?;
        let raw = self
            .query(
                "createrawtransaction",
                vec![Value::Array(inputs), Value::Object(outputs)],
            )
            .await?;
        decode_result("createrawtransaction", "transaction hex", raw)
    }

    async fn decode_raw_transaction(&self, hex: &str) -> Result<RawTransaction, CoreError> {
        let raw = self.query("decoderawtransaction", vec![json!(hex)]).await?;
        RawTransaction::from_value(raw)
    }

    async fn get_raw_transaction_hex(&self, txid: &Txid) -> Result<String, CoreError> {
        let raw = self
            .query("getrawtransaction", vec![json!(txid.to_string())])
            .await
            .map_err(|err| normalize_getrawtransaction_error(txid, err))?;
        decode_result("getrawtransaction", "transaction hex", raw)
    }

    /// Fetch a decoded transaction by txid. Without `-txindex` only
    /// mempool and wallet transactions can be found.
    async fn get_raw_transaction(&self, txid: &Txid) -> Result<RawTransaction, CoreError> {
        let raw = self
            .query("getrawtransaction", vec![json!(txid.to_string()), json!(1)])
            .await
            .map_err(|err| normalize_getrawtransaction_error(txid, err))?;
        RawTransaction::from_value(raw)
    }

    /// Same as [`RawTransactionRpc::get_raw_transaction`].
    async fn get_transaction(&self, txid: &Txid) -> Result<RawTransaction, CoreError> {
        self.get_raw_transaction(txid).await
    }

    async fn send_raw_transaction(&self, hex: &str) -> Result<Txid, CoreError> {
        let raw = self.query("sendrawtransaction", vec![json!(hex)]).await?;
        decode_result("sendrawtransaction", "txid", raw)
    }

    /// Sign with the wallet's keys and return the signed hex. Fails with
    /// [`CoreError::IncompleteSignature`] when some inputs stay unsigned.
    async fn sign_raw_transaction(&self, hex: &str) -> Result<String, CoreError> {
        let raw = self.query("signrawtransaction", vec![json!(hex)]).await?;
        let Value::Object(map) = &raw else {
            return Err(CoreError::UnexpectedResult {
                method: "signrawtransaction".into(),
                expected: "object",
                value: raw.to_string(),
            });
        };

        let fields = Fields::new(map);
        if !fields.required::<bool>("complete")? {
            return Err(CoreError::IncompleteSignature);
        }
        fields.required("hex")
    }
}

impl<T: BitcoinRpc + ?Sized> RawTransactionRpc for T {}

/// Collapse outputs into the `{address: amount}` object the daemon
/// expects, summing amounts for repeated addresses in first-seen order.
pub(crate) fn merge_outputs(outputs: &[TxOutput]) -> Result<Map<String, Value>, CoreError> {
    let mut merged: Vec<(&str, Amount)> = Vec::with_capacity(outputs.len());
    for output in outputs {
        match merged
            .iter_mut()
            .find(|(address, _)| *address == output.address)
        {
            Some((address, total)) => {
                *total = total.checked_add(output.amount).ok_or_else(|| {
                    CoreError::InvalidParams(format!("output total for {address} overflows"))
                })?;
            }
            None => merged.push((&output.address, output.amount)),
        }
    }

    Ok(merged
        .into_iter()
        .map(|(address, amount)| (address.to_owned(), amount_to_json(amount)))
        .collect())
}

// ==============================================================================
// RPC Error Normalization
// ==============================================================================

/// Convert Bitcoin Core "missing tx" JSON-RPC responses into `TxNotFound`.
///
/// This keeps not-found semantics strongly typed for callers, while
/// preserving other RPC/transport failures as-is.
fn normalize_getrawtransaction_error(txid: &Txid, err: CoreError) -> CoreError {
    match err {
        CoreError::Rpc(RpcError::ServerError { code, message })
            if is_tx_not_found_server_error(code, &message) =>
        {
            CoreError::TxNotFound(*txid)
        }
        other => other,
    }
}

fn is_tx_not_found_server_error(code: i64, message: &str) -> bool {
    if code != -5 {
        return false;
    }

    let msg = message.to_ascii_lowercase();
    msg.contains("not found") || msg.contains("no such mempool or blockchain transaction")
}
