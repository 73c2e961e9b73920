use std::collections::BTreeMap;

use async_trait::async_trait;
use bitcoin::{Amount, BlockHash, SignedAmount, Txid};
use serde_json::{json, Value};

use crate::error::CoreError;
use crate::parsing::{amount_to_json, decode_result, parse_btc_amount, parse_signed_btc_amount};
use crate::view::{
    views_from_value, AddressValidation, JsonView, ReceivedAddress, TransactionsSinceBlock,
    Unspent, WalletTransaction,
};

use super::params::Params;
use super::rawtx::merge_outputs;
use super::types::TxOutput;
use super::BitcoinRpc;

/// Wallet queries and sends.
///
/// Optional arguments left as `None` are omitted from the request when
/// nothing follows them, so the daemon applies its own defaults. The
/// account-based calls target the pre-0.17 accounts API.
#[async_trait]
pub trait WalletRpc: BitcoinRpc {
    async fn dump_priv_key(&self, address: &str) -> Result<String, CoreError> {
        let raw = self.query("dumpprivkey", vec![json!(address)]).await?;
        decode_result("dumpprivkey", "private key", raw)
    }

    async fn get_account(&self, address: &str) -> Result<String, CoreError> {
        let raw = self.query("getaccount", vec![json!(address)]).await?;
        decode_result("getaccount", "account name", raw)
    }

    async fn get_account_address(&self, account: &str) -> Result<String, CoreError> {
        let raw = self.query("getaccountaddress", vec![json!(account)]).await?;
        decode_result("getaccountaddress", "address", raw)
    }

    async fn get_addresses_by_account(&self, account: &str) -> Result<Vec<String>, CoreError> {
        let raw = self
            .query("getaddressesbyaccount", vec![json!(account)])
            .await?;
        decode_result("getaddressesbyaccount", "array of addresses", raw)
    }

    /// Wallet balance; an account balance can be negative.
    async fn get_balance(
        &self,
        account: Option<&str>,
        minconf: Option<u32>,
    ) -> Result<SignedAmount, CoreError> {
        let params = Params::new()
            .opt(account, json!("*"))?
            .opt(minconf, json!(1))?
            .into_vec();
        let raw = self.query("getbalance", params).await?;
        parse_signed_btc_amount(&raw)
    }

    async fn get_new_address(&self, account: Option<&str>) -> Result<String, CoreError> {
        let params = Params::new().opt(account, json!(""))?.into_vec();
        let raw = self.query("getnewaddress", params).await?;
        decode_result("getnewaddress", "address", raw)
    }

    async fn get_received_by_account(
        &self,
        account: &str,
        minconf: Option<u32>,
    ) -> Result<Amount, CoreError> {
        let params = Params::new()
            .arg(account)?
            .opt(minconf, json!(1))?
            .into_vec();
        let raw = self.query("getreceivedbyaccount", params).await?;
        parse_btc_amount(&raw)
    }

    async fn get_received_by_address(
        &self,
        address: &str,
        minconf: Option<u32>,
    ) -> Result<Amount, CoreError> {
        let params = Params::new()
            .arg(address)?
            .opt(minconf, json!(1))?
            .into_vec();
        let raw = self.query("getreceivedbyaddress", params).await?;
        parse_btc_amount(&raw)
    }

    /// Import a WIF key. With `rescan` the call blocks until the daemon
    /// has rescanned the chain, which can take minutes.
    async fn import_priv_key(
        &self,
        key: &str,
        label: Option<&str>,
        rescan: Option<bool>,
    ) -> Result<(), CoreError> {
        let params = Params::new()
            .arg(key)?
            .opt(label, json!(""))?
            .opt(rescan, json!(true))?
            .into_vec();
        self.query("importprivkey", params).await?;
        Ok(())
    }

    async fn list_accounts(
        &self,
        minconf: Option<u32>,
    ) -> Result<BTreeMap<String, SignedAmount>, CoreError> {
        let params = Params::new().opt(minconf, json!(1))?.into_vec();
        let raw = self.query("listaccounts", params).await?;
        let map = match raw {
            Value::Object(map) => map,
            other => {
                return Err(CoreError::UnexpectedResult {
                    method: "listaccounts".into(),
                    expected: "object",
                    value: other.to_string(),
                })
            }
        };

        map.into_iter()
            .map(|(account, amount)| Ok((account, parse_signed_btc_amount(&amount)?)))
            .collect()
    }

    async fn list_received_by_account(
        &self,
        minconf: Option<u32>,
        include_empty: Option<bool>,
    ) -> Result<Vec<ReceivedAddress>, CoreError> {
        let params = Params::new()
            .opt(minconf, json!(1))?
            .opt(include_empty, json!(false))?
            .into_vec();
        let raw = self.query("listreceivedbyaccount", params).await?;
        views_from_value("listreceivedbyaccount", raw)
    }

    async fn list_received_by_address(
        &self,
        minconf: Option<u32>,
        include_empty: Option<bool>,
    ) -> Result<Vec<ReceivedAddress>, CoreError> {
        let params = Params::new()
            .opt(minconf, json!(1))?
            .opt(include_empty, json!(false))?
            .into_vec();
        let raw = self.query("listreceivedbyaddress", params).await?;
        views_from_value("listreceivedbyaddress", raw)
    }

    /// Wallet transactions in blocks after `block_hash`, or all of them
    /// when `None`.
    async fn list_since_block(
        &self,
        block_hash: Option<&BlockHash>,
        target_confirmations: Option<u32>,
    ) -> Result<TransactionsSinceBlock, CoreError> {
        let params = Params::new()
            .opt(block_hash.map(ToString::to_string), json!(""))?
            .opt(target_confirmations, json!(1))?
            .into_vec();
        let raw = self.query("listsinceblock", params).await?;
        TransactionsSinceBlock::from_value(raw)
    }

    async fn list_transactions(
        &self,
        account: Option<&str>,
        count: Option<u32>,
        from: Option<u32>,
    ) -> Result<Vec<WalletTransaction>, CoreError> {
        let params = Params::new()
            .opt(account, json!("*"))?
            .opt(count, json!(10))?
            .opt(from, json!(0))?
            .into_vec();
        let raw = self.query("listtransactions", params).await?;
        views_from_value("listtransactions", raw)
    }

    /// Unspent wallet outputs, optionally restricted to `addresses`.
    async fn list_unspent(
        &self,
        minconf: Option<u32>,
        maxconf: Option<u32>,
        addresses: &[String],
    ) -> Result<Vec<Unspent>, CoreError> {
        let mut params = Params::new()
            .opt(minconf, json!(1))?
            .opt(maxconf, json!(9_999_999))?;
        if !addresses.is_empty() {
            params = params.arg(addresses)?;
        }
        let raw = self.query("listunspent", params.into_vec()).await?;
        views_from_value("listunspent", raw)
    }

    async fn send_from(
        &self,
        from_account: &str,
        to_address: &str,
        amount: Amount,
        minconf: Option<u32>,
        comment: Option<&str>,
        comment_to: Option<&str>,
    ) -> Result<Txid, CoreError> {
        let params = Params::new()
            .arg(from_account)?
            .arg(to_address)?
            .arg(amount_to_json(amount))?
            .opt(minconf, json!(1))?
            .opt(comment, json!(""))?
            .opt(comment_to, json!(""))?
            .into_vec();
        let raw = self.query("sendfrom", params).await?;
        decode_result("sendfrom", "txid", raw)
    }

    /// Pay several addresses in one transaction. Repeated addresses are
    /// merged into a single output.
    async fn send_many(
        &self,
        from_account: &str,
        outputs: &[TxOutput],
        minconf: Option<u32>,
        comment: Option<&str>,
    ) -> Result<Txid, CoreError> {
        let params = Params::new()
            .arg(from_account)?
            .arg(merge_outputs(outputs)?)?
            .opt(minconf, json!(1))?
            .opt(comment, json!(""))?
            .into_vec();
        let raw = self.query("sendmany", params).await?;
        decode_result("sendmany", "txid", raw)
    }

    async fn send_to_address(
        &self,
        to_address: &str,
        amount: Amount,
        comment: Option<&str>,
        comment_to: Option<&str>,
    ) -> Result<Txid, CoreError> {
        let params = Params::new()
            .arg(to_address)?
            .arg(amount_to_json(amount))?
            .opt(comment, json!(""))?
            .opt(comment_to, json!(""))?
            .into_vec();
        let raw = self.query("sendtoaddress", params).await?;
        decode_result("sendtoaddress", "txid", raw)
    }

    async fn sign_message(&self, address: &str, message: &str) -> Result<String, CoreError> {
        let raw = self
            .query("signmessage", vec![json!(address), json!(message)])
            .await?;
        decode_result("signmessage", "signature", raw)
    }

    async fn validate_address(&self, address: &str) -> Result<AddressValidation, CoreError> {
        let raw = self.query("validateaddress", vec![json!(address)]).await?;
        AddressValidation::from_value(raw)
    }

    async fn verify_message(
        &self,
        address: &str,
        signature: &str,
        message: &str,
    ) -> Result<bool, CoreError> {
        let raw = self
            .query(
                "verifymessage",
                vec![json!(address), json!(signature), json!(message)],
            )
            .await?;
        decode_result("verifymessage", "boolean", raw)
    }
}

impl<T: BitcoinRpc + ?Sized> WalletRpc for T {}
