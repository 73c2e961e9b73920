//! Read-only typed views over RPC results.
//!
//! The daemon answers most calls with a JSON object. Rather than forcing
//! every daemon version into a fixed struct, each view keeps the parsed
//! object and exposes one accessor per key. Accessors do a single lookup
//! and conversion; nested objects and arrays are wrapped on demand as
//! borrowed views.

/// Implements the owned-view boilerplate for a `struct Name { map }` type.
macro_rules! json_view {
    ($name:ident, $label:literal) => {
        impl $crate::view::JsonView for $name {
            const NAME: &'static str = $label;

            fn from_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
                Self { map }
            }

            fn as_map(&self) -> &serde_json::Map<String, serde_json::Value> {
                &self.map
            }

            fn into_map(self) -> serde_json::Map<String, serde_json::Value> {
                self.map
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match serde_json::to_string(&self.map) {
                    Ok(s) => f.write_str(&s),
                    Err(_) => Err(std::fmt::Error),
                }
            }
        }
    };
}

mod block;
mod node;
mod transaction;
mod wallet;

use std::time::SystemTime;

use bitcoin::{Amount, BlockHash, SignedAmount, TxMerkleNode, Txid};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::parsing::{parse_btc_amount, parse_signed_btc_amount, parse_unix_time};

pub use block::Block;
pub use node::{Info, MiningInfo, PeerInfo, TxOutSetInfo, Work};
pub use transaction::{RawTransaction, ScriptPubKey, TxIn, TxOut, TxOutInfo};
pub use wallet::{
    AddressValidation, ReceivedAddress, TransactionsSinceBlock, Unspent, WalletTransaction,
};

// ==============================================================================
// Field Conversion
// ==============================================================================

/// A type that can be read out of a single JSON field.
pub trait FromField: Sized {
    /// Human readable name used in `InvalidField` errors.
    const EXPECTED: &'static str;

    fn from_field(value: &Value) -> Option<Self>;
}

impl FromField for String {
    const EXPECTED: &'static str = "string";

    fn from_field(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromField for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_field(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromField for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_field(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromField for i32 {
    const EXPECTED: &'static str = "32-bit integer";

    fn from_field(value: &Value) -> Option<Self> {
        value.as_i64().and_then(|n| i32::try_from(n).ok())
    }
}

impl FromField for u64 {
    const EXPECTED: &'static str = "unsigned integer";

    fn from_field(value: &Value) -> Option<Self> {
        value.as_u64()
    }
}

impl FromField for u32 {
    const EXPECTED: &'static str = "32-bit unsigned integer";

    fn from_field(value: &Value) -> Option<Self> {
        value.as_u64().and_then(|n| u32::try_from(n).ok())
    }
}

impl FromField for f64 {
    const EXPECTED: &'static str = "number";

    fn from_field(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromField for Amount {
    const EXPECTED: &'static str = "BTC amount";

    fn from_field(value: &Value) -> Option<Self> {
        parse_btc_amount(value).ok()
    }
}

impl FromField for SignedAmount {
    const EXPECTED: &'static str = "signed BTC amount";

    fn from_field(value: &Value) -> Option<Self> {
        parse_signed_btc_amount(value).ok()
    }
}

impl FromField for Txid {
    const EXPECTED: &'static str = "txid";

    fn from_field(value: &Value) -> Option<Self> {
        value.as_str().and_then(|s| s.parse().ok())
    }
}

impl FromField for BlockHash {
    const EXPECTED: &'static str = "block hash";

    fn from_field(value: &Value) -> Option<Self> {
        value.as_str().and_then(|s| s.parse().ok())
    }
}

impl FromField for TxMerkleNode {
    const EXPECTED: &'static str = "merkle root";

    fn from_field(value: &Value) -> Option<Self> {
        value.as_str().and_then(|s| s.parse().ok())
    }
}

/// Unix timestamps in seconds.
impl FromField for SystemTime {
    const EXPECTED: &'static str = "unix timestamp";

    fn from_field(value: &Value) -> Option<Self> {
        parse_unix_time(value)
    }
}

impl<T: FromField> FromField for Vec<T> {
    const EXPECTED: &'static str = "array";

    fn from_field(value: &Value) -> Option<Self> {
        value.as_array()?.iter().map(T::from_field).collect()
    }
}

// ==============================================================================
// Borrowed Field Accessor
// ==============================================================================

/// Key lookups against one JSON object.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        matches!(self.map.get(key), Some(v) if !v.is_null())
    }

    /// Read a field that the daemon always returns.
    pub fn required<T: FromField>(&self, key: &str) -> Result<T, CoreError> {
        self.optional(key)?.ok_or_else(|| CoreError::MissingField {
            field: key.to_owned(),
        })
    }

    /// Read a field that may be absent; `null` counts as absent.
    pub fn optional<T: FromField>(&self, key: &str) -> Result<Option<T>, CoreError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::from_field(value)
                .map(Some)
                .ok_or_else(|| CoreError::InvalidField {
                    field: key.to_owned(),
                    expected: T::EXPECTED,
                    value: value.to_string(),
                }),
        }
    }

    /// Borrow a nested object.
    pub fn object(&self, key: &str) -> Result<Fields<'a>, CoreError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Err(CoreError::MissingField {
                field: key.to_owned(),
            }),
            Some(Value::Object(map)) => Ok(Fields::new(map)),
            Some(other) => Err(CoreError::InvalidField {
                field: key.to_owned(),
                expected: "object",
                value: other.to_string(),
            }),
        }
    }

    /// Borrow every element of a nested array of objects.
    pub fn objects(&self, key: &str) -> Result<Vec<Fields<'a>>, CoreError> {
        let items = match self.map.get(key) {
            None | Some(Value::Null) => {
                return Err(CoreError::MissingField {
                    field: key.to_owned(),
                })
            }
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(CoreError::InvalidField {
                    field: key.to_owned(),
                    expected: "array",
                    value: other.to_string(),
                })
            }
        };

        items
            .iter()
            .map(|item| match item {
                Value::Object(map) => Ok(Fields::new(map)),
                other => Err(CoreError::InvalidField {
                    field: key.to_owned(),
                    expected: "array of objects",
                    value: other.to_string(),
                }),
            })
            .collect()
    }

    pub fn as_map(&self) -> &'a Map<String, Value> {
        self.map
    }
}

// ==============================================================================
// Owned Views
// ==============================================================================

/// An owned wrapper around one JSON object returned by the daemon.
pub trait JsonView: Sized {
    /// Name used when the daemon returns something other than an object.
    const NAME: &'static str;

    fn from_map(map: Map<String, Value>) -> Self;

    fn as_map(&self) -> &Map<String, Value>;

    fn into_map(self) -> Map<String, Value>;

    fn fields(&self) -> Fields<'_> {
        Fields::new(self.as_map())
    }

    fn from_value(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(CoreError::UnexpectedResult {
                method: Self::NAME.to_owned(),
                expected: "object",
                value: other.to_string(),
            }),
        }
    }

    fn into_value(self) -> Value {
        Value::Object(self.into_map())
    }
}

/// Wrap every element of an array result.
pub(crate) fn views_from_value<V: JsonView>(method: &str, value: Value) -> Result<Vec<V>, CoreError> {
    match value {
        Value::Array(items) => items.into_iter().map(V::from_value).collect(),
        other => Err(CoreError::UnexpectedResult {
            method: method.to_owned(),
            expected: "array",
            value: other.to_string(),
        }),
    }
}
