//! solflare-adapter: run one provider request through a full adapter session
//! backed by the deterministic wallet.
//!
//! Usage: `solflare-adapter <method> [params-json]`

use eyre::{eyre, WrapErr};
use serde_json::Value;

use solflare_adapter::{
    AdapterConfig, DeterministicWallet, DisconnectOptions, InitOptions, SolflareAdapter,
};
use solflare_adapter_core::{AdapterStatus, RpcRequest};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let method = args
        .next()
        .ok_or_else(|| eyre!("usage: solflare-adapter <method> [params-json]"))?;
    let params = match args.next() {
        Some(raw) => serde_json::from_str::<Value>(&raw).wrap_err("params must be valid JSON")?,
        None => Value::Null,
    };

    let config = AdapterConfig::from_env();
    tracing::info!(chain_id = %config.chain_config.chain_id, "starting solflare adapter");

    let auto_connect = config.auto_connect;
    let adapter = SolflareAdapter::new(DeterministicWallet::default(), config);
    adapter.init(InitOptions { auto_connect }).await?;
    tracing::info!(adapter = adapter.name(), status = ?adapter.status(), "adapter ready");

    let provider = if adapter.status() == AdapterStatus::Connected {
        adapter.provider()
    } else {
        adapter.connect().await?
    }
    .ok_or_else(|| eyre!("wallet session ended before the request could be sent"))?;

    let outcome = provider.request(RpcRequest::new(method, params)).await;
    adapter.disconnect(DisconnectOptions { cleanup: true }).await;

    for event in adapter.drain_events()? {
        tracing::debug!(sequence = event.sequence, kind = ?event.kind, "adapter event");
    }

    let response = outcome?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
