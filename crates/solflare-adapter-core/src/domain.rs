use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AdapterError;

/// Method names claimed by the provider engine.
pub mod methods {
    pub const CHAIN_ID: &str = "solana_chainId";
    pub const PROVIDER_CONFIG: &str = "solana_provider_config";
    pub const GET_ACCOUNTS: &str = "getAccounts";
    pub const REQUEST_ACCOUNTS: &str = "requestAccounts";
    pub const SIGN_TRANSACTION: &str = "signTransaction";
    pub const SIGN_AND_SEND_TRANSACTION: &str = "signAndSendTransaction";
    pub const SIGN_ALL_TRANSACTIONS: &str = "signAllTransactions";
    pub const SIGN_MESSAGE: &str = "signMessage";
    pub const SOLANA_PRIVATE_KEY: &str = "solanaPrivateKey";
    pub const PRIVATE_KEY: &str = "private_key";
    pub const SOLANA_SECRET_KEY: &str = "solanaSecretKey";
}

fn jsonrpc_version() -> String {
    "2.0".to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(default = "jsonrpc_version")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: jsonrpc_version(),
            id: Value::from(1),
            method: method.into(),
            params,
        }
    }

    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = id.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl RpcResponse {
    pub fn for_request(request: &RpcRequest) -> Self {
        Self {
            jsonrpc: request.jsonrpc.clone(),
            id: request.id.clone(),
            result: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdapterStatus {
    NotReady,
    Ready,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainNamespace {
    Solana,
}

/// Cluster the injected wallet is pointed at. The wallet only accepts these
/// three; custom RPC endpoints cannot be handed to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    #[serde(rename = "mainnet-beta")]
    Mainnet,
    #[serde(rename = "devnet")]
    Devnet,
    #[serde(rename = "testnet")]
    Testnet,
}

impl Network {
    pub fn from_chain_id(chain_id: &str) -> Result<Self, AdapterError> {
        match chain_id {
            "0x1" => Ok(Self::Mainnet),
            "0x2" => Ok(Self::Devnet),
            "0x3" => Ok(Self::Testnet),
            other => Err(AdapterError::UnsupportedChain(other.to_owned())),
        }
    }

    pub fn chain_id(self) -> &'static str {
        match self {
            Self::Mainnet => "0x1",
            Self::Devnet => "0x2",
            Self::Testnet => "0x3",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet-beta",
            Self::Devnet => "devnet",
            Self::Testnet => "testnet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub chain_namespace: ChainNamespace,
    pub chain_id: String,
    pub rpc_target: String,
    pub display_name: String,
    pub block_explorer_url: String,
    pub ticker: String,
    pub ticker_name: String,
    pub decimals: u8,
}

impl ChainConfig {
    /// Built-in config for one of the supported Solana clusters.
    pub fn solana(chain_id: &str) -> Result<Self, AdapterError> {
        Network::from_chain_id(chain_id).map(Self::for_network)
    }

    pub fn for_network(network: Network) -> Self {
        let (rpc_target, display_name, cluster) = match network {
            Network::Mainnet => (
                "https://api.mainnet-beta.solana.com",
                "Solana Mainnet",
                "",
            ),
            Network::Devnet => ("https://api.devnet.solana.com", "Solana Devnet", "?cluster=devnet"),
            Network::Testnet => (
                "https://api.testnet.solana.com",
                "Solana Testnet",
                "?cluster=testnet",
            ),
        };
        Self {
            chain_namespace: ChainNamespace::Solana,
            chain_id: network.chain_id().to_owned(),
            rpc_target: rpc_target.to_owned(),
            display_name: display_name.to_owned(),
            block_explorer_url: format!("https://explorer.solana.com{cluster}"),
            ticker: "SOL".to_owned(),
            ticker_name: "Solana Token".to_owned(),
            decimals: 9,
        }
    }

    pub fn network(&self) -> Result<Network, AdapterError> {
        Network::from_chain_id(&self.chain_id)
    }
}

/// Profile data exposed after login. Solflare exposes none, so every field
/// stays empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterEventKind {
    Ready,
    Connecting,
    Connected { reconnected: bool },
    Disconnected,
    Errored { error: AdapterError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterEvent {
    pub sequence: u64,
    pub kind: AdapterEventKind,
}
