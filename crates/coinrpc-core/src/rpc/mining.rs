use async_trait::async_trait;

use crate::error::CoreError;
use crate::parsing::decode_result;
use crate::view::{JsonView, MiningInfo, Work};

use super::BitcoinRpc;

/// Mining status calls. `getgenerate`, `gethashespersec` and `getwork`
/// only exist on old nodes; newer daemons answer them with
/// "Method not found".
#[async_trait]
pub trait MiningRpc: BitcoinRpc {
    async fn get_generate(&self) -> Result<bool, CoreError> {
        let raw = self.query("getgenerate", Vec::new()).await?;
        decode_result("getgenerate", "boolean", raw)
    }

    async fn get_hashes_per_sec(&self) -> Result<f64, CoreError> {
        let raw = self.query("gethashespersec", Vec::new()).await?;
        decode_result("gethashespersec", "number", raw)
    }

    async fn get_mining_info(&self) -> Result<MiningInfo, CoreError> {
        let raw = self.query("getmininginfo", Vec::new()).await?;
        MiningInfo::from_value(raw)
    }

    async fn get_work(&self) -> Result<Work, CoreError> {
        let raw = self.query("getwork", Vec::new()).await?;
        Work::from_value(raw)
    }
}

impl<T: BitcoinRpc + ?Sized> MiningRpc for T {}
