use crate::domain::AdapterStatus;
use crate::error::AdapterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionAction {
    Initialize,
    BeginConnect,
    ConnectSucceeded,
    ConnectFailed,
    Disconnect,
    Teardown,
    WalletDisconnected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: AdapterStatus,
    pub to: AdapterStatus,
    pub reason: &'static str,
}

pub fn connection_transition(
    from: AdapterStatus,
    action: ConnectionAction,
) -> Result<StateTransition, AdapterError> {
    use AdapterStatus::*;
    use ConnectionAction::*;

    let (to, reason) = match (from, action) {
        (NotReady, Initialize) => (Ready, "initialized"),
        (_, Initialize) => return Err(precondition("adapter is already initialized")),

        (Ready, BeginConnect) => (Connecting, "connect_started"),
        (Connecting, BeginConnect) => return Err(precondition("already connecting")),
        (Connected, BeginConnect) => return Err(precondition("already connected")),
        (NotReady, BeginConnect) => return Err(precondition("wallet adapter is not ready")),

        (Connecting, ConnectSucceeded) => (Connected, "connect_succeeded"),
        (Connecting | Ready, ConnectFailed) => (Ready, "connect_failed"),

        (Connected | Ready, Disconnect) => (Ready, "disconnected"),
        (_, Teardown) => (NotReady, "torn_down"),

        (Connected, WalletDisconnected) => (Ready, "wallet_disconnected"),
        (_, WalletDisconnected) => (NotReady, "wallet_disconnected"),

        (from, action) => {
            return Err(AdapterError::Precondition(format!(
                "illegal connection transition: {from:?} -> {action:?}"
            )))
        }
    };
    Ok(StateTransition { from, to, reason })
}

fn precondition(reason: &str) -> AdapterError {
    AdapterError::Precondition(reason.to_owned())
}
