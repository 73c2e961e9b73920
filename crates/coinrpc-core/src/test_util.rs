//! Shared test helpers for `coinrpc-core` unit tests.
//!
//! Builders for deterministic hashes and for the JSON shapes the daemon
//! returns (`getblock`, verbose `getrawtransaction`, `listtransactions`
//! entries), so tests across modules share one source of dummy data.

use bitcoin::hashes::Hash;
use bitcoin::{BlockHash, TxMerkleNode, Txid};
use serde_json::{json, Value};

/// A P2WPKH output script (`OP_0 <20-byte key hash>`).
pub const P2WPKH_HEX: &str = "00140102030405060708090a0b0c0d0e0f1011121314";

// ==============================================================================
// Hash Helpers
// ==============================================================================

/// Create a deterministic `Txid` from a single distinguishing byte.
/// Useful for small fixtures where txids only need to be unique.
pub fn txid_from_byte(b: u8) -> Txid {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    Txid::from_byte_array(bytes)
}

pub fn hash_from_byte(b: u8) -> BlockHash {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    BlockHash::from_byte_array(bytes)
}

// ==============================================================================
// Result Builders
// ==============================================================================

/// A verbose `getblock` result for the block at `height`, whose hash is
/// `hash_from_byte(height)`. Neighbours are linked when given.
pub fn block_json(height: u8, prev: Option<u8>, next: Option<u8>) -> Value {
    let mut block = json!({
        "hash": hash_from_byte(height).to_string(),
        "confirmations": 5,
        "size": 285,
        "height": height,
        "version": 0x2000_0000,
        "merkleroot": TxMerkleNode::all_zeros().to_string(),
        "tx": [txid_from_byte(height).to_string()],
        "time": 1_700_000_000u64 + u64::from(height) * 600,
        "nonce": 2_083_236_893u32,
        "bits": "1d00ffff",
        "difficulty": 1.0
    });
    if let Some(prev) = prev {
        block["previousblockhash"] = json!(hash_from_byte(prev).to_string());
    }
    if let Some(next) = next {
        block["nextblockhash"] = json!(hash_from_byte(next).to_string());
    }
    block
}

/// A verbose `getrawtransaction` result with two outputs (50 000 and
/// 25 000 sat). `spend` is the `(txid byte, vout)` of the single input;
/// `None` builds a coinbase.
pub fn raw_tx_json(txid_byte: u8, spend: Option<(u8, u32)>) -> Value {
    let vin = match spend {
        Some((funding, vout)) => json!([{
            "txid": txid_from_byte(funding).to_string(),
            "vout": vout,
            "scriptSig": {"asm": "", "hex": ""},
            "sequence": 0xFFFF_FFFEu32
        }]),
        None => json!([{"coinbase": "51", "sequence": 0xFFFF_FFFFu32}]),
    };

    json!({
        "txid": txid_from_byte(txid_byte).to_string(),
        "version": 2,
        "locktime": 0,
        "confirmations": 3,
        "vin": vin,
        "vout": [
            {
                "value": 0.0005,
                "n": 0,
                "scriptPubKey": {
                    "asm": "0 0102030405060708090a0b0c0d0e0f1011121314",
                    "hex": P2WPKH_HEX,
                    "type": "witness_v0_keyhash",
                    "address": "bcrt1qexample"
                }
            },
            {
                "value": 0.00025,
                "n": 1,
                "scriptPubKey": {
                    "asm": "0 0102030405060708090a0b0c0d0e0f1011121314",
                    "hex": P2WPKH_HEX,
                    "type": "witness_v0_keyhash",
                    "address": "bcrt1qexample"
                }
            }
        ]
    })
}

/// One `listtransactions` entry for `txid_from_byte(txid_byte)`.
pub fn wallet_tx_json(txid_byte: u8, category: &str, amount: f64) -> Value {
    json!({
        "account": "",
        "address": "bcrt1qexample",
        "category": category,
        "amount": amount,
        "fee": -0.00001,
        "confirmations": 2,
        "blockhash": hash_from_byte(9).to_string(),
        "blockindex": 1,
        "blocktime": 1_700_000_600u64,
        "txid": txid_from_byte(txid_byte).to_string(),
        "time": 1_700_000_000u64,
        "timereceived": 1_700_000_000u64,
        "to": "bob"
    })
}
