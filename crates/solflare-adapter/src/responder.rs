use std::sync::{Arc, RwLock};

use serde_json::json;

use solflare_adapter_core::{methods, AdapterError, ChainConfig, Dispatch, RpcRequest, RpcResponse};

/// Answers chain queries from the adapter's live chain config. Reads happen
/// at request time so a switched chain is visible immediately.
#[derive(Debug, Clone)]
pub struct ConfigResponder {
    chain: Arc<RwLock<ChainConfig>>,
}

impl ConfigResponder {
    pub fn new(chain: Arc<RwLock<ChainConfig>>) -> Self {
        Self { chain }
    }

    pub fn respond(
        &self,
        request: RpcRequest,
        response: &mut RpcResponse,
    ) -> Result<Dispatch, AdapterError> {
        let result = match request.method.as_str() {
            methods::CHAIN_ID => json!(self.snapshot()?.chain_id),
            methods::PROVIDER_CONFIG => serde_json::to_value(self.snapshot()?)
                .map_err(|e| AdapterError::Internal(format!("chain config encode failed: {e}")))?,
            _ => return Ok(Dispatch::FallThrough(request)),
        };
        response.result = Some(result);
        Ok(Dispatch::Handled)
    }

    pub fn snapshot(&self) -> Result<ChainConfig, AdapterError> {
        self.chain
            .read()
            .map(|g| g.clone())
            .map_err(|e| AdapterError::poisoned("chain config", e))
    }
}
