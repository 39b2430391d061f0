pub mod adapter;
pub mod config;
pub mod deterministic;
pub mod events;
pub mod handlers;
pub mod provider;
pub mod responder;

pub use adapter::{DisconnectOptions, InitOptions, SolflareAdapter, SwitchChainParams};
pub use config::AdapterConfig;
pub use deterministic::DeterministicWallet;
pub use events::EventLog;
pub use provider::SolanaProvider;
pub use responder::ConfigResponder;
