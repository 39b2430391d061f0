use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

use crate::domain::{RpcRequest, RpcResponse};
use crate::error::AdapterError;

pub type HandlerFuture = BoxFuture<'static, Result<Value, AdapterError>>;
pub type MethodHandler = Arc<dyn Fn(RpcRequest) -> HandlerFuture + Send + Sync>;

pub fn handler<F, Fut>(f: F) -> MethodHandler
where
    F: Fn(RpcRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, AdapterError>> + Send + 'static,
{
    Arc::new(move |request| f(request).boxed())
}

/// Outcome of one stage of the provider chain.
#[derive(Debug)]
pub enum Dispatch {
    Handled,
    /// Not claimed; the request is handed back untouched for the next stage.
    FallThrough(RpcRequest),
}

#[derive(Clone)]
pub struct Binding {
    method: &'static str,
    handler: Option<MethodHandler>,
}

impl Binding {
    pub fn new(method: &'static str, handler: Option<MethodHandler>) -> Self {
        Self { method, handler }
    }

    pub fn bound(method: &'static str, handler: MethodHandler) -> Self {
        Self::new(method, Some(handler))
    }

    /// A method the router claims but has no implementation for.
    pub fn unbound(method: &'static str) -> Self {
        Self::new(method, None)
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn is_bound(&self) -> bool {
        self.handler.is_some()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("method", &self.method)
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MethodRouter {
    bindings: Vec<Binding>,
}

impl MethodRouter {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    pub fn methods(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bindings.iter().map(Binding::method)
    }

    /// Runs the first binding whose method matches and stores its value in
    /// `response.result`. The first match is final: a failing handler is not
    /// followed by later bindings of the same name.
    pub async fn dispatch(
        &self,
        request: RpcRequest,
        response: &mut RpcResponse,
    ) -> Result<Dispatch, AdapterError> {
        let Some(binding) = self.bindings.iter().find(|b| b.method == request.method) else {
            return Ok(Dispatch::FallThrough(request));
        };
        let handler = binding
            .handler
            .as_ref()
            .ok_or_else(|| AdapterError::HandlerNotProvided(binding.method.to_owned()))?;
        tracing::debug!(method = binding.method, "dispatching bound method");
        let result = handler(request).await?;
        response.result = Some(result);
        Ok(Dispatch::Handled)
    }
}
