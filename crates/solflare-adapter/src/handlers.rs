//! Business-method bindings backed by the injected wallet.
//!
//! Transactions and messages travel as base64 strings inside
//! `params.message`; `signMessage` also accepts a raw byte array.

use std::future::Future;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};

use solflare_adapter_core::{
    handler, methods, AdapterError, Binding, InjectedWallet, MethodHandler, RpcRequest,
};

/// Bindings in dispatch order. Key export is never offered by an injected
/// wallet, so those methods are claimed but left unbound.
pub fn wallet_bindings<W: InjectedWallet + 'static>(wallet: &Arc<W>) -> Vec<Binding> {
    vec![
        Binding::bound(methods::GET_ACCOUNTS, wallet_handler(wallet, accounts::<W>)),
        Binding::bound(methods::REQUEST_ACCOUNTS, wallet_handler(wallet, accounts::<W>)),
        Binding::bound(
            methods::SIGN_TRANSACTION,
            wallet_handler(wallet, sign_transaction::<W>),
        ),
        Binding::bound(
            methods::SIGN_AND_SEND_TRANSACTION,
            wallet_handler(wallet, sign_and_send_transaction::<W>),
        ),
        Binding::bound(
            methods::SIGN_ALL_TRANSACTIONS,
            wallet_handler(wallet, sign_all_transactions::<W>),
        ),
        Binding::bound(methods::SIGN_MESSAGE, wallet_handler(wallet, sign_message::<W>)),
        Binding::unbound(methods::SOLANA_PRIVATE_KEY),
        Binding::unbound(methods::PRIVATE_KEY),
        Binding::unbound(methods::SOLANA_SECRET_KEY),
    ]
}

fn wallet_handler<W, F, Fut>(wallet: &Arc<W>, f: F) -> MethodHandler
where
    W: InjectedWallet + 'static,
    F: Fn(Arc<W>, RpcRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, AdapterError>> + Send + 'static,
{
    let wallet = Arc::clone(wallet);
    handler(move |request| f(Arc::clone(&wallet), request))
}

async fn accounts<W: InjectedWallet>(
    wallet: Arc<W>,
    request: RpcRequest,
) -> Result<Value, AdapterError> {
    let public_key = wallet.public_key().ok_or_else(|| {
        AdapterError::NotConnected(format!("{}: wallet has no public key", request.method))
    })?;
    Ok(json!([public_key]))
}

async fn sign_transaction<W: InjectedWallet>(
    wallet: Arc<W>,
    request: RpcRequest,
) -> Result<Value, AdapterError> {
    let transaction = decode_base64(&request.method, message_param(&request)?)?;
    let signed = wallet.sign_transaction(transaction).await?;
    Ok(json!(STANDARD.encode(signed)))
}

async fn sign_and_send_transaction<W: InjectedWallet>(
    wallet: Arc<W>,
    request: RpcRequest,
) -> Result<Value, AdapterError> {
    let transaction = decode_base64(&request.method, message_param(&request)?)?;
    let signature = wallet.sign_and_send_transaction(transaction).await?;
    Ok(json!({ "signature": signature }))
}

async fn sign_all_transactions<W: InjectedWallet>(
    wallet: Arc<W>,
    request: RpcRequest,
) -> Result<Value, AdapterError> {
    let items = message_param(&request)?.as_array().ok_or_else(|| {
        AdapterError::invalid_params(&request.method, "message must be an array of transactions")
    })?;
    let transactions = items
        .iter()
        .map(|item| decode_base64(&request.method, item))
        .collect::<Result<Vec<_>, _>>()?;
    let signed = wallet.sign_all_transactions(transactions).await?;
    Ok(Value::Array(
        signed.into_iter().map(|tx| json!(STANDARD.encode(tx))).collect(),
    ))
}

async fn sign_message<W: InjectedWallet>(
    wallet: Arc<W>,
    request: RpcRequest,
) -> Result<Value, AdapterError> {
    let message = message_param(&request)?;
    let bytes = match message {
        Value::Array(items) => items
            .iter()
            .map(|b| {
                b.as_u64()
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or_else(|| AdapterError::invalid_params(&request.method, "byte out of range"))
            })
            .collect::<Result<Vec<u8>, _>>()?,
        other => decode_base64(&request.method, other)?,
    };
    let signature = wallet.sign_message(bytes).await?;
    Ok(json!(STANDARD.encode(signature)))
}

fn message_param(request: &RpcRequest) -> Result<&Value, AdapterError> {
    request
        .params
        .get("message")
        .ok_or_else(|| AdapterError::invalid_params(&request.method, "missing params.message"))
}

fn decode_base64(method: &str, value: &Value) -> Result<Vec<u8>, AdapterError> {
    let raw = value
        .as_str()
        .ok_or_else(|| AdapterError::invalid_params(method, "expected base64 string"))?;
    STANDARD
        .decode(raw)
        .map_err(|e| AdapterError::invalid_params(method, format!("invalid base64: {e}")))
}
