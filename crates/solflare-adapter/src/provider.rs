use std::fmt;
use std::sync::{Arc, RwLock};

use solflare_adapter_core::{
    AdapterError, ChainConfig, Dispatch, InjectedWallet, MethodRouter, RpcRequest, RpcResponse,
};

use crate::handlers::wallet_bindings;
use crate::responder::ConfigResponder;

/// Handle callers send requests through. Starts as an unbound shell and gets
/// its request chain once a wallet session exists.
#[derive(Clone)]
pub struct SolanaProvider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    responder: ConfigResponder,
    engine: RwLock<Option<Arc<ProviderEngine>>>,
}

/// The fixed chain: wallet-backed methods, then chain config queries, then
/// the wallet's own request handling when it offers one.
struct ProviderEngine {
    methods: MethodRouter,
    passthrough: Option<Arc<dyn InjectedWallet>>,
}

impl SolanaProvider {
    pub fn shell(chain: Arc<RwLock<ChainConfig>>) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                responder: ConfigResponder::new(chain),
                engine: RwLock::new(None),
            }),
        }
    }

    pub fn setup<W: InjectedWallet + 'static>(&self, wallet: &Arc<W>) -> Result<(), AdapterError> {
        let passthrough = wallet
            .supports_request()
            .then(|| Arc::clone(wallet) as Arc<dyn InjectedWallet>);
        let engine = ProviderEngine {
            methods: MethodRouter::new(wallet_bindings(wallet)),
            passthrough,
        };
        let methods = engine.methods.methods().collect::<Vec<_>>();
        let mut g = self
            .inner
            .engine
            .write()
            .map_err(|e| AdapterError::poisoned("provider engine", e))?;
        *g = Some(Arc::new(engine));
        tracing::debug!(?methods, "provider engine bound to wallet");
        Ok(())
    }

    pub fn unbind(&self) -> Result<(), AdapterError> {
        let mut g = self
            .inner
            .engine
            .write()
            .map_err(|e| AdapterError::poisoned("provider engine", e))?;
        *g = None;
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.inner
            .engine
            .read()
            .map(|g| g.is_some())
            .unwrap_or(false)
    }

    pub async fn request(&self, request: RpcRequest) -> Result<RpcResponse, AdapterError> {
        let engine = self
            .inner
            .engine
            .read()
            .map_err(|e| AdapterError::poisoned("provider engine", e))?
            .clone()
            .ok_or_else(|| {
                AdapterError::NotConnected(format!("{}: provider has no wallet", request.method))
            })?;

        let mut response = RpcResponse::for_request(&request);
        let request = match engine.methods.dispatch(request, &mut response).await? {
            Dispatch::Handled => return Ok(response),
            Dispatch::FallThrough(request) => request,
        };
        let request = match self.inner.responder.respond(request, &mut response)? {
            Dispatch::Handled => return Ok(response),
            Dispatch::FallThrough(request) => request,
        };
        if let Some(wallet) = &engine.passthrough {
            tracing::debug!(method = %request.method, "forwarding to injected wallet");
            response.result = Some(wallet.request(&request).await?);
            return Ok(response);
        }
        Err(AdapterError::MethodNotFound(request.method))
    }

    pub fn chain_config(&self) -> Result<ChainConfig, AdapterError> {
        self.inner.responder.snapshot()
    }

    pub fn chain_id(&self) -> Result<String, AdapterError> {
        self.chain_config().map(|c| c.chain_id)
    }
}

impl fmt::Debug for SolanaProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolanaProvider")
            .field("bound", &self.is_bound())
            .finish()
    }
}
