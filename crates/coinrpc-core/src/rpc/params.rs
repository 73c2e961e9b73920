use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;

/// Positional parameter list with optional trailing arguments.
///
/// The daemon fills in defaults for omitted trailing arguments, so those
/// are dropped. An omitted optional that is followed by a supplied one
/// cannot be dropped; it is sent as its default instead.
#[derive(Debug, Default)]
pub(crate) struct Params {
    values: Vec<Value>,
    pending_defaults: Vec<Value>,
}

impl Params {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn arg(mut self, value: impl Serialize) -> Result<Self, CoreError> {
        let value = serde_json::to_value(value)?;
        self.push(value);
        Ok(self)
    }

    pub(crate) fn opt<T: Serialize>(
        mut self,
        value: Option<T>,
        default: Value,
    ) -> Result<Self, CoreError> {
        match value {
            Some(value) => {
                let value = serde_json::to_value(value)?;
                self.push(value);
            }
            None => self.pending_defaults.push(default),
        }
        Ok(self)
    }

    fn push(&mut self, value: Value) {
        self.values.append(&mut self.pending_defaults);
        self.values.push(value);
    }

    pub(crate) fn into_vec(self) -> Vec<Value> {
        self.values
    }
}
