//! Conversions from raw JSON values into typed fields.
//!
//! Shared by the typed views and the RPC method surface. Every helper is
//! tolerant of the daemon's numeric encodings: amounts may arrive as JSON
//! numbers (including scientific notation) or decimal strings, and ids or
//! integers may arrive as numeric strings.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bitcoin::{Amount, Denomination, SignedAmount};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CoreError;

/// Parse a BTC amount from a JSON value.
///
/// Number values are parsed via `Amount::from_float_in` to support scientific
/// notation, while string values are parsed via `Amount::from_str_in`.
pub(crate) fn parse_btc_amount(value: &Value) -> Result<Amount, CoreError> {
    match value {
        Value::Number(n) => {
            let parsed = n.as_f64().ok_or_else(|| invalid_amount(value))?;
            Amount::from_float_in(parsed, Denomination::Bitcoin).map_err(|_| invalid_amount(value))
        }
        Value::String(s) => {
            Amount::from_str_in(s, Denomination::Bitcoin).map_err(|_| invalid_amount(value))
        }
        _ => Err(invalid_amount(value)),
    }
}

/// Signed counterpart of [`parse_btc_amount`], for wallet entries such as
/// `send` amounts and fees that the daemon reports as negative numbers.
pub(crate) fn parse_signed_btc_amount(value: &Value) -> Result<SignedAmount, CoreError> {
    match value {
        Value::Number(n) => {
            let parsed = n.as_f64().ok_or_else(|| invalid_amount(value))?;
            SignedAmount::from_float_in(parsed, Denomination::Bitcoin)
                .map_err(|_| invalid_amount(value))
        }
        Value::String(s) => {
            SignedAmount::from_str_in(s, Denomination::Bitcoin).map_err(|_| invalid_amount(value))
        }
        _ => Err(invalid_amount(value)),
    }
}

fn invalid_amount(value: &Value) -> CoreError {
    CoreError::InvalidField {
        field: "amount".into(),
        expected: "BTC amount",
        value: value.to_string(),
    }
}

/// Encode an amount the way the daemon expects it in params: a BTC decimal
/// number with at most eight fractional digits.
pub(crate) fn amount_to_json(amount: Amount) -> Value {
    serde_json::json!(amount.to_btc())
}

pub(crate) fn parse_unix_time(value: &Value) -> Option<SystemTime> {
    value
        .as_u64()
        .map(|secs| UNIX_EPOCH + Duration::from_secs(secs))
}

/// Deserialize an RPC `result` into `T`, reporting the method on failure.
pub(crate) fn decode_result<T: DeserializeOwned>(
    method: &str,
    expected: &'static str,
    value: Value,
) -> Result<T, CoreError> {
    serde_json::from_value(value.clone()).map_err(|_| CoreError::UnexpectedResult {
        method: method.to_owned(),
        expected,
        value: value.to_string(),
    })
}
