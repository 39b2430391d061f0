use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{Network, RpcRequest};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("wallet rejected request: {0}")]
    Rejected(String),
    #[error("wallet transport error: {0}")]
    Transport(String),
    #[error("wallet operation not supported: {0}")]
    Unsupported(&'static str),
    #[error("wallet not connected")]
    NotConnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Callback fired by the wallet when its session ends outside the adapter's
/// control.
pub type DisconnectListener = Arc<dyn Fn() + Send + Sync>;

/// Capabilities of the injected wallet object.
///
/// Transactions and messages are opaque byte payloads; the wallet decides
/// their wire format.
#[async_trait]
pub trait InjectedWallet: Send + Sync {
    fn is_connected(&self) -> bool;
    /// Base58 public key, present once a session is established.
    fn public_key(&self) -> Option<String>;

    async fn connect(&self, network: Network) -> Result<(), WalletError>;
    async fn disconnect(&self) -> Result<(), WalletError>;

    async fn sign_message(&self, message: Vec<u8>) -> Result<Vec<u8>, WalletError>;
    async fn sign_transaction(&self, transaction: Vec<u8>) -> Result<Vec<u8>, WalletError>;
    async fn sign_all_transactions(
        &self,
        transactions: Vec<Vec<u8>>,
    ) -> Result<Vec<Vec<u8>>, WalletError>;
    /// Returns the base58 transaction signature.
    async fn sign_and_send_transaction(&self, transaction: Vec<u8>)
        -> Result<String, WalletError>;

    async fn switch_network(&self, _network: Network) -> Result<(), WalletError> {
        Err(WalletError::Unsupported("switch_network"))
    }

    /// Whether unclaimed requests may be forwarded to [`InjectedWallet::request`].
    fn supports_request(&self) -> bool {
        false
    }

    async fn request(&self, _request: &RpcRequest) -> Result<Value, WalletError> {
        Err(WalletError::Unsupported("request"))
    }

    fn on_disconnect(&self, listener: DisconnectListener) -> SubscriptionId;
    fn off_disconnect(&self, id: SubscriptionId);
}
