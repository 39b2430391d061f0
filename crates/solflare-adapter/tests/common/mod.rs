#![allow(dead_code)]

use std::sync::Arc;

use solflare_adapter::{AdapterConfig, DeterministicWallet, InitOptions, SolflareAdapter};
use solflare_adapter_core::{AdapterEvent, AdapterEventKind, ChainConfig};

pub type TestAdapter = SolflareAdapter<DeterministicWallet>;

pub fn new_adapter() -> (TestAdapter, DeterministicWallet) {
    new_adapter_on("0x1")
}

pub fn new_adapter_on(chain_id: &str) -> (TestAdapter, DeterministicWallet) {
    let wallet = DeterministicWallet::default();
    let config = AdapterConfig {
        chain_config: ChainConfig {
            chain_id: chain_id.to_owned(),
            ..AdapterConfig::default().chain_config
        },
        ..AdapterConfig::default()
    };
    let adapter = SolflareAdapter::with_wallet(Arc::new(wallet.clone()), config);
    (adapter, wallet)
}

pub async fn ready_adapter() -> (TestAdapter, DeterministicWallet) {
    let (adapter, wallet) = new_adapter();
    adapter
        .init(InitOptions::default())
        .await
        .expect("init adapter");
    (adapter, wallet)
}

pub async fn connected_adapter() -> (TestAdapter, DeterministicWallet) {
    let (adapter, wallet) = ready_adapter().await;
    adapter.connect().await.expect("connect adapter");
    adapter.drain_events().expect("drain setup events");
    (adapter, wallet)
}

pub fn kinds(events: Vec<AdapterEvent>) -> Vec<AdapterEventKind> {
    events.into_iter().map(|e| e.kind).collect()
}
