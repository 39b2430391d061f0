use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use solflare_adapter_core::{
    DisconnectListener, InjectedWallet, Network, RpcRequest, SubscriptionId, WalletError,
};

const DEFAULT_SEED: &str = "solflare-deterministic-account";

/// In-memory stand-in for the injected extension. Signatures are derived from
/// SHA-256 over the payload, so identical inputs always sign identically.
#[derive(Clone)]
pub struct DeterministicWallet {
    state: Arc<Mutex<WalletState>>,
}

struct WalletState {
    public_key: String,
    secret: [u8; 32],
    connected: bool,
    network: Option<Network>,
    next_subscription: u64,
    listeners: Vec<(SubscriptionId, DisconnectListener)>,
    fail_next_connect: Option<String>,
    fail_next_disconnect: Option<String>,
    omit_public_key: bool,
    passthrough: bool,
    sign_calls: u64,
}

impl Default for DeterministicWallet {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl DeterministicWallet {
    pub fn with_seed(seed: &str) -> Self {
        let secret: [u8; 32] = Sha256::digest(seed.as_bytes()).into();
        let public: [u8; 32] = Sha256::digest(secret).into();
        Self {
            state: Arc::new(Mutex::new(WalletState {
                public_key: bs58::encode(public).into_string(),
                secret,
                connected: false,
                network: None,
                next_subscription: 0,
                listeners: Vec::new(),
                fail_next_connect: None,
                fail_next_disconnect: None,
                omit_public_key: false,
                passthrough: false,
                sign_calls: 0,
            })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, WalletState>, WalletError> {
        self.state
            .lock()
            .map_err(|e| WalletError::Transport(format!("wallet lock poisoned: {e}")))
    }

    fn connected(&self) -> Result<MutexGuard<'_, WalletState>, WalletError> {
        let g = self.lock()?;
        if !g.connected {
            return Err(WalletError::NotConnected);
        }
        Ok(g)
    }

    /// Key the wallet reports once connected, regardless of knobs.
    pub fn account(&self) -> String {
        self.state
            .lock()
            .map(|g| g.public_key.clone())
            .unwrap_or_default()
    }

    pub fn network(&self) -> Option<Network> {
        self.state.lock().ok().and_then(|g| g.network)
    }

    pub fn sign_calls(&self) -> u64 {
        self.state.lock().map(|g| g.sign_calls).unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.state.lock().map(|g| g.listeners.len()).unwrap_or(0)
    }

    pub fn fail_next_connect(&self, reason: &str) -> Result<(), WalletError> {
        self.lock()?.fail_next_connect = Some(reason.to_owned());
        Ok(())
    }

    pub fn fail_next_disconnect(&self, reason: &str) -> Result<(), WalletError> {
        self.lock()?.fail_next_disconnect = Some(reason.to_owned());
        Ok(())
    }

    /// Simulates an extension that completes `connect` without exposing a key.
    pub fn omit_public_key(&self, omit: bool) -> Result<(), WalletError> {
        self.lock()?.omit_public_key = omit;
        Ok(())
    }

    pub fn enable_passthrough(&self) -> Result<(), WalletError> {
        self.lock()?.passthrough = true;
        Ok(())
    }

    pub fn signature_for(&self, tag: &str, payload: &[u8]) -> Result<Vec<u8>, WalletError> {
        let g = self.lock()?;
        Ok(deterministic_signature(&g.secret, tag, payload))
    }

    /// Ends the session from the wallet side, as the extension does when the
    /// user locks it.
    pub fn debug_emit_disconnect(&self) -> Result<(), WalletError> {
        let listeners = {
            let mut g = self.lock()?;
            g.connected = false;
            g.listeners.iter().map(|(_, l)| Arc::clone(l)).collect::<Vec<_>>()
        };
        for listener in listeners {
            listener();
        }
        Ok(())
    }

    /// Currently registered listeners, for invoking a stale callback directly.
    pub fn debug_listeners(&self) -> Result<Vec<DisconnectListener>, WalletError> {
        let g = self.lock()?;
        Ok(g.listeners.iter().map(|(_, l)| Arc::clone(l)).collect())
    }
}

fn deterministic_signature(secret: &[u8; 32], tag: &str, payload: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(secret);
    hasher.update(tag.as_bytes());
    hasher.update(payload);
    let hash = hasher.finalize();
    let mut sig = Vec::with_capacity(64);
    sig.extend_from_slice(&hash);
    sig.extend_from_slice(&hash);
    sig
}

#[async_trait]
impl InjectedWallet for DeterministicWallet {
    fn is_connected(&self) -> bool {
        self.state.lock().map(|g| g.connected).unwrap_or(false)
    }

    fn public_key(&self) -> Option<String> {
        let g = self.state.lock().ok()?;
        (g.connected && !g.omit_public_key).then(|| g.public_key.clone())
    }

    async fn connect(&self, network: Network) -> Result<(), WalletError> {
        let mut g = self.lock()?;
        if let Some(reason) = g.fail_next_connect.take() {
            return Err(WalletError::Rejected(reason));
        }
        g.connected = true;
        g.network = Some(network);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        let listeners = {
            let mut g = self.lock()?;
            if let Some(reason) = g.fail_next_disconnect.take() {
                return Err(WalletError::Transport(reason));
            }
            g.connected = false;
            g.listeners.iter().map(|(_, l)| Arc::clone(l)).collect::<Vec<_>>()
        };
        for listener in listeners {
            listener();
        }
        Ok(())
    }

    async fn sign_message(&self, message: Vec<u8>) -> Result<Vec<u8>, WalletError> {
        let mut g = self.connected()?;
        g.sign_calls += 1;
        Ok(deterministic_signature(&g.secret, "message", &message))
    }

    async fn sign_transaction(&self, transaction: Vec<u8>) -> Result<Vec<u8>, WalletError> {
        let mut g = self.connected()?;
        g.sign_calls += 1;
        let mut signed = deterministic_signature(&g.secret, "transaction", &transaction);
        signed.extend_from_slice(&transaction);
        Ok(signed)
    }

    async fn sign_all_transactions(
        &self,
        transactions: Vec<Vec<u8>>,
    ) -> Result<Vec<Vec<u8>>, WalletError> {
        let mut g = self.connected()?;
        g.sign_calls += 1;
        Ok(transactions
            .into_iter()
            .map(|tx| {
                let mut signed = deterministic_signature(&g.secret, "transaction", &tx);
                signed.extend_from_slice(&tx);
                signed
            })
            .collect())
    }

    async fn sign_and_send_transaction(
        &self,
        transaction: Vec<u8>,
    ) -> Result<String, WalletError> {
        let mut g = self.connected()?;
        g.sign_calls += 1;
        let sig = deterministic_signature(&g.secret, "transaction", &transaction);
        Ok(bs58::encode(sig).into_string())
    }

    async fn switch_network(&self, network: Network) -> Result<(), WalletError> {
        let mut g = self.connected()?;
        g.network = Some(network);
        Ok(())
    }

    fn supports_request(&self) -> bool {
        self.state.lock().map(|g| g.passthrough).unwrap_or(false)
    }

    async fn request(&self, request: &RpcRequest) -> Result<Value, WalletError> {
        let g = self.connected()?;
        if !g.passthrough {
            return Err(WalletError::Unsupported("request"));
        }
        Ok(json!({
            "method": request.method,
            "network": g.network.map(Network::as_str),
        }))
    }

    fn on_disconnect(&self, listener: DisconnectListener) -> SubscriptionId {
        let mut g = match self.state.lock() {
            Ok(g) => g,
            Err(e) => {
                tracing::warn!("disconnect listener not registered: {e}");
                return SubscriptionId(u64::MAX);
            }
        };
        g.next_subscription += 1;
        let id = SubscriptionId(g.next_subscription);
        g.listeners.push((id, listener));
        id
    }

    fn off_disconnect(&self, id: SubscriptionId) {
        if let Ok(mut g) = self.state.lock() {
            g.listeners.retain(|(existing, _)| *existing != id);
        }
    }
}

impl fmt::Debug for DeterministicWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeterministicWallet")
            .field("account", &self.account())
            .field("connected", &self.is_connected())
            .field("network", &self.network())
            .finish()
    }
}
