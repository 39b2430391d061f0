pub mod domain;
pub mod error;
pub mod ports;
pub mod router;
pub mod state_machine;

pub use domain::{
    methods, AdapterEvent, AdapterEventKind, AdapterStatus, ChainConfig, ChainNamespace, Network,
    RpcRequest, RpcResponse, UserInfo,
};
pub use error::AdapterError;
pub use ports::{DisconnectListener, InjectedWallet, SubscriptionId, WalletError};
pub use router::{handler, Binding, Dispatch, HandlerFuture, MethodHandler, MethodRouter};
pub use state_machine::{connection_transition, ConnectionAction, StateTransition};
