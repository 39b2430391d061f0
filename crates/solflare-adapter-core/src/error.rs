use thiserror::Error;

use crate::ports::WalletError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("precondition failed: {0}")]
    Precondition(String),
    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("not connected: {0}")]
    NotConnected(String),
    #[error("disconnection error: {0}")]
    Disconnection(String),
    #[error("handler not provided for method: {0}")]
    HandlerNotProvided(String),
    #[error("method not found: {0}")]
    MethodNotFound(String),
    #[error("invalid params for {method}: {reason}")]
    InvalidParams { method: String, reason: String },
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AdapterError {
    pub fn invalid_params(method: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            method: method.to_owned(),
            reason: reason.into(),
        }
    }

    pub fn poisoned(what: &str, err: impl std::fmt::Display) -> Self {
        Self::Internal(format!("{what} lock poisoned: {err}"))
    }
}
