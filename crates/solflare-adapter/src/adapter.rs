use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, Weak};

use solflare_adapter_core::{
    connection_transition, AdapterError, AdapterEvent, AdapterEventKind, AdapterStatus,
    ChainConfig, ConnectionAction, DisconnectListener, InjectedWallet, Network, SubscriptionId,
    UserInfo,
};

use crate::config::AdapterConfig;
use crate::events::EventLog;
use crate::provider::SolanaProvider;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitOptions {
    pub auto_connect: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisconnectOptions {
    pub cleanup: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchChainParams {
    pub chain_id: String,
}

/// Wallet adapter over an injected Solflare extension.
///
/// All lifecycle state lives in one [`Connection`] behind a single mutex.
/// The lock is never held across an await, so the wallet's disconnect
/// callback can land between any two suspension points of `connect` or
/// `disconnect` and every transition still sees a consistent snapshot.
pub struct SolflareAdapter<W: InjectedWallet + 'static> {
    name: String,
    wallet: Arc<W>,
    chain: Arc<RwLock<ChainConfig>>,
    known_chains: Mutex<HashMap<String, ChainConfig>>,
    connection: Arc<Mutex<Connection<W>>>,
    events: EventLog,
}

struct Connection<W> {
    status: AdapterStatus,
    wallet: Option<Arc<W>>,
    provider: Option<SolanaProvider>,
    subscription: Option<SubscriptionId>,
    /// Bumped on each successful connect; a listener only acts on the
    /// session it was registered for.
    session: u64,
    rehydrated: bool,
}

impl<W> Connection<W> {
    fn apply(&mut self, action: ConnectionAction) -> Result<(), AdapterError> {
        let transition = connection_transition(self.status, action)?;
        tracing::debug!(
            from = ?transition.from,
            to = ?transition.to,
            reason = transition.reason,
            "connection transition"
        );
        self.status = transition.to;
        Ok(())
    }

    fn unbind_provider(&self) {
        if let Some(provider) = &self.provider {
            if let Err(e) = provider.unbind() {
                tracing::warn!("failed to unbind provider: {e}");
            }
        }
    }

    fn teardown(&mut self) {
        self.wallet = None;
        self.unbind_provider();
        self.provider = None;
        self.subscription = None;
        self.rehydrated = false;
        self.status = AdapterStatus::NotReady;
    }
}

impl<W: InjectedWallet + 'static> SolflareAdapter<W> {
    pub fn new(wallet: W, config: AdapterConfig) -> Self {
        Self::with_wallet(Arc::new(wallet), config)
    }

    pub fn with_wallet(wallet: Arc<W>, config: AdapterConfig) -> Self {
        let mut known_chains = HashMap::new();
        known_chains.insert(
            config.chain_config.chain_id.clone(),
            config.chain_config.clone(),
        );
        Self {
            name: config.adapter_name,
            wallet,
            chain: Arc::new(RwLock::new(config.chain_config)),
            known_chains: Mutex::new(known_chains),
            connection: Arc::new(Mutex::new(Connection {
                status: AdapterStatus::NotReady,
                wallet: None,
                provider: None,
                subscription: None,
                session: 0,
                rehydrated: false,
            })),
            events: EventLog::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection<W>>, AdapterError> {
        self.connection
            .lock()
            .map_err(|e| AdapterError::poisoned("connection", e))
    }

    /// Reports NOT_READY if the connection lock is poisoned.
    pub fn status(&self) -> AdapterStatus {
        match self.connection.lock() {
            Ok(c) => c.status,
            Err(e) => {
                tracing::warn!(adapter = %self.name, "connection lock poisoned: {e}");
                AdapterStatus::NotReady
            }
        }
    }

    /// Current provider handle; absent before `init` and after a cleanup.
    pub fn provider(&self) -> Option<SolanaProvider> {
        let c = self.connection.lock().ok()?;
        if c.status == AdapterStatus::NotReady {
            return None;
        }
        c.provider.clone()
    }

    pub fn chain_config(&self) -> Result<ChainConfig, AdapterError> {
        self.chain
            .read()
            .map(|g| g.clone())
            .map_err(|e| AdapterError::poisoned("chain config", e))
    }

    pub fn drain_events(&self) -> Result<Vec<AdapterEvent>, AdapterError> {
        self.events.drain()
    }

    pub async fn init(&self, options: InitOptions) -> Result<(), AdapterError> {
        {
            let mut c = self.lock()?;
            c.apply(ConnectionAction::Initialize)?;
            c.provider = Some(SolanaProvider::shell(Arc::clone(&self.chain)));
        }
        tracing::info!(adapter = %self.name, "adapter initialized");
        self.events.record(AdapterEventKind::Ready);

        if options.auto_connect {
            self.lock()?.rehydrated = true;
            // Failures after CONNECTING were already emitted by `connect`.
            if let Err(err) = self.begin_connect() {
                self.lock()?.rehydrated = false;
                self.events.errored(err);
            } else if let Err(err) = self.finish_connect().await {
                tracing::warn!(adapter = %self.name, "auto-connect failed: {err}");
            }
        }
        Ok(())
    }

    pub async fn connect(&self) -> Result<Option<SolanaProvider>, AdapterError> {
        self.begin_connect()?;
        self.finish_connect().await
    }

    fn begin_connect(&self) -> Result<(), AdapterError> {
        self.lock()?.apply(ConnectionAction::BeginConnect)?;
        self.events.record(AdapterEventKind::Connecting);
        Ok(())
    }

    async fn finish_connect(&self) -> Result<Option<SolanaProvider>, AdapterError> {
        match self.establish().await {
            Ok(provider) => Ok(provider),
            Err(err) => {
                self.rollback_connect();
                self.events.errored(err.clone());
                Err(err)
            }
        }
    }

    async fn establish(&self) -> Result<Option<SolanaProvider>, AdapterError> {
        let network = self.chain_config()?.network()?;
        self.wallet
            .connect(network)
            .await
            .map_err(|e| AdapterError::Connection(e.to_string()))?;
        if self.wallet.public_key().is_none() {
            self.close_orphaned_session().await;
            return Err(AdapterError::Connection(
                "wallet public key missing after connect".to_owned(),
            ));
        }

        let reconnected = {
            let mut c = self.lock()?;
            // An external disconnect or teardown may have landed while the
            // wallet was connecting.
            if c.status != AdapterStatus::Connecting || !self.wallet.is_connected() {
                None
            } else {
                let chain = Arc::clone(&self.chain);
                let provider = c
                    .provider
                    .get_or_insert_with(|| SolanaProvider::shell(chain))
                    .clone();
                provider.setup(&self.wallet)?;
                c.wallet = Some(Arc::clone(&self.wallet));
                c.apply(ConnectionAction::ConnectSucceeded)?;
                c.session += 1;
                let listener = self.disconnect_listener(c.session);
                c.subscription = Some(self.wallet.on_disconnect(listener));
                Some(c.rehydrated)
            }
        };
        let Some(reconnected) = reconnected else {
            self.close_orphaned_session().await;
            return Err(AdapterError::Connection(
                "wallet session ended before connect completed".to_owned(),
            ));
        };

        tracing::info!(adapter = %self.name, ?network, reconnected, "wallet connected");
        self.events
            .record(AdapterEventKind::Connected { reconnected });
        Ok(self.provider())
    }

    /// Closes a wallet session that `connect` opened but will not own.
    async fn close_orphaned_session(&self) {
        if !self.wallet.is_connected() {
            return;
        }
        if let Err(e) = self.wallet.disconnect().await {
            tracing::warn!(
                adapter = %self.name,
                "failed to close orphaned wallet session: {e}"
            );
        }
    }

    fn rollback_connect(&self) {
        let mut c = match self.connection.lock() {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(adapter = %self.name, "connect rollback skipped: {e}");
                return;
            }
        };
        c.rehydrated = false;
        if c.status == AdapterStatus::Connecting {
            c.wallet = None;
            c.unbind_provider();
            if let Err(e) = c.apply(ConnectionAction::ConnectFailed) {
                tracing::warn!(adapter = %self.name, "connect rollback: {e}");
            }
        }
    }

    /// Listener registered with the wallet for one session. Only the first
    /// invocation during that session does anything: it takes the
    /// subscription. Firings for an older session are ignored.
    fn disconnect_listener(&self, session: u64) -> DisconnectListener {
        let connection: Weak<Mutex<Connection<W>>> = Arc::downgrade(&self.connection);
        let wallet: Weak<W> = Arc::downgrade(&self.wallet);
        let events = self.events.clone();
        Arc::new(move || {
            let Some(connection) = connection.upgrade() else {
                return;
            };
            let mut c = match connection.lock() {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!("wallet disconnect ignored: {e}");
                    return;
                }
            };
            if c.session != session {
                tracing::debug!(session, current = c.session, "stale disconnect listener");
                return;
            }
            let Some(subscription) = c.subscription.take() else {
                return;
            };
            if let Some(wallet) = wallet.upgrade() {
                wallet.off_disconnect(subscription);
            }
            c.rehydrated = false;
            c.wallet = None;
            c.unbind_provider();
            match c.apply(ConnectionAction::WalletDisconnected) {
                Ok(()) if c.status == AdapterStatus::NotReady => c.provider = None,
                Ok(()) => {}
                Err(e) => tracing::warn!("wallet disconnect: {e}"),
            }
            drop(c);
            tracing::info!("wallet ended the session");
            events.record(AdapterEventKind::Disconnected);
        })
    }

    /// Detaches from the wallet. Failures are emitted as errors; a failed
    /// detach leaves the session connected.
    pub async fn disconnect(&self, options: DisconnectOptions) {
        if let Err(err) = self.try_disconnect(options).await {
            self.events.errored(err);
        }
    }

    async fn try_disconnect(&self, options: DisconnectOptions) -> Result<(), AdapterError> {
        let wallet = {
            let mut c = self.lock()?;
            match (c.status, c.wallet.clone()) {
                (AdapterStatus::Connected, Some(wallet)) => {
                    if let Some(subscription) = c.subscription.take() {
                        wallet.off_disconnect(subscription);
                    }
                    wallet
                }
                (status, _) => {
                    tracing::debug!(?status, "disconnect without an active session");
                    if options.cleanup {
                        c.teardown();
                    }
                    return Ok(());
                }
            }
        };

        if let Err(e) = wallet.disconnect().await {
            let mut c = self.lock()?;
            if c.status == AdapterStatus::Connected && c.subscription.is_none() {
                let listener = self.disconnect_listener(c.session);
                c.subscription = Some(wallet.on_disconnect(listener));
            }
            return Err(AdapterError::Disconnection(e.to_string()));
        }

        {
            let mut c = self.lock()?;
            c.wallet = None;
            if let Some(provider) = &c.provider {
                provider.unbind()?;
            }
            c.rehydrated = false;
            if options.cleanup {
                c.teardown();
            } else {
                c.apply(ConnectionAction::Disconnect)?;
            }
        }
        tracing::info!(adapter = %self.name, cleanup = options.cleanup, "wallet disconnected");
        self.events.record(AdapterEventKind::Disconnected);
        Ok(())
    }

    fn require_session(&self, is_init: bool, action: &str) -> Result<(), AdapterError> {
        if !is_init && self.status() != AdapterStatus::Connected {
            return Err(AdapterError::Precondition(format!(
                "connect the wallet before {action}"
            )));
        }
        Ok(())
    }

    pub fn add_chain(&self, chain: ChainConfig, is_init: bool) -> Result<(), AdapterError> {
        self.require_session(is_init, "adding a chain")?;
        Network::from_chain_id(&chain.chain_id)?;
        let mut known = self
            .known_chains
            .lock()
            .map_err(|e| AdapterError::poisoned("known chains", e))?;
        tracing::debug!(chain_id = %chain.chain_id, "chain added");
        known.insert(chain.chain_id.clone(), chain);
        Ok(())
    }

    /// Points the wallet at another added chain and makes it the active
    /// config.
    pub async fn switch_chain(
        &self,
        params: SwitchChainParams,
        is_init: bool,
    ) -> Result<(), AdapterError> {
        self.require_session(is_init, "switching chain")?;
        let target = self
            .known_chains
            .lock()
            .map_err(|e| AdapterError::poisoned("known chains", e))?
            .get(&params.chain_id)
            .cloned()
            .ok_or_else(|| {
                AdapterError::Precondition(format!("chain {} has not been added", params.chain_id))
            })?;
        let network = target.network()?;

        let wallet = self.lock()?.wallet.clone();
        if let Some(wallet) = wallet {
            wallet.switch_network(network).await?;
        }

        let mut chain = self
            .chain
            .write()
            .map_err(|e| AdapterError::poisoned("chain config", e))?;
        tracing::info!(from = %chain.chain_id, to = %target.chain_id, "chain switched");
        *chain = target;
        Ok(())
    }

    pub fn user_info(&self) -> Result<UserInfo, AdapterError> {
        if self.status() != AdapterStatus::Connected {
            return Err(AdapterError::NotConnected(
                "not connected with wallet".to_owned(),
            ));
        }
        Ok(UserInfo::default())
    }
}

impl<W: InjectedWallet + 'static> fmt::Debug for SolflareAdapter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolflareAdapter")
            .field("name", &self.name)
            .field("status", &self.status())
            .finish()
    }
}
