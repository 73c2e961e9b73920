//! Plain data types for RPC parameters and fixed-shape results.
//!
//! Results that vary between daemon versions are exposed as views in
//! `crate::view`; this module only holds shapes that are stable enough to
//! deserialize directly, plus the inputs callers build themselves.

use std::fmt;

use bitcoin::{Amount, BlockHash};
use serde::Deserialize;

// ==============================================================================
// Chain Info
// ==============================================================================

/// Basic chain information from `getblockchaininfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainInfo {
    pub chain: String,
    pub blocks: u64,
    #[serde(rename = "bestblockhash")]
    pub best_block_hash: BlockHash,
    pub pruned: bool,
}

// ==============================================================================
// Parameters
// ==============================================================================

/// A payment to one address, used by `createrawtransaction` and
/// `sendmany`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutput {
    pub address: String,
    pub amount: Amount,
}

impl TxOutput {
    pub fn new(address: impl Into<String>, amount: Amount) -> Self {
        Self {
            address: address.into(),
            amount,
        }
    }
}

/// The `command` argument of `addnode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddNodeCommand {
    Add,
    Remove,
    OneTry,
}

impl AddNodeCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::OneTry => "onetry",
        }
    }
}

impl fmt::Display for AddNodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
