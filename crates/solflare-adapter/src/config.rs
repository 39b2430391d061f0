use solflare_adapter_core::{ChainConfig, Network};

#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub adapter_name: String,
    pub chain_config: ChainConfig,
    pub auto_connect: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            adapter_name: "solflare".to_owned(),
            chain_config: ChainConfig::for_network(Network::Mainnet),
            auto_connect: false,
        }
    }
}

impl AdapterConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `SOLFLARE_*` variables resolved by `lookup`.
    /// Missing or unusable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(chain_id) = lookup("SOLFLARE_CHAIN_ID") {
            match ChainConfig::solana(chain_id.trim()) {
                Ok(chain) => config.chain_config = chain,
                Err(e) => tracing::warn!(%chain_id, "ignoring SOLFLARE_CHAIN_ID: {e}"),
            }
        }
        if let Some(rpc_target) = lookup("SOLFLARE_RPC_TARGET").filter(|v| !v.trim().is_empty()) {
            config.chain_config.rpc_target = rpc_target.trim().to_owned();
        }
        if let Some(name) = lookup("SOLFLARE_DISPLAY_NAME").filter(|v| !v.trim().is_empty()) {
            config.chain_config.display_name = name.trim().to_owned();
        }
        if let Some(raw) = lookup("SOLFLARE_AUTO_CONNECT") {
            match parse_bool(&raw) {
                Some(flag) => config.auto_connect = flag,
                None => tracing::warn!(value = %raw, "ignoring SOLFLARE_AUTO_CONNECT"),
            }
        }
        config
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
