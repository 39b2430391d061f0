mod common;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};

use solflare_adapter::SolanaProvider;
use solflare_adapter_core::{methods, AdapterError, ChainConfig, RpcRequest};

use common::{connected_adapter, ready_adapter};

async fn connected_provider() -> (SolanaProvider, solflare_adapter::DeterministicWallet) {
    let (adapter, wallet) = connected_adapter().await;
    (adapter.provider().expect("provider"), wallet)
}

#[tokio::test]
async fn chain_id_matches_adapter_config() {
    let (adapter, _wallet) = connected_adapter().await;
    let provider = adapter.provider().expect("provider");

    let response = provider
        .request(RpcRequest::new(methods::CHAIN_ID, Value::Null))
        .await
        .expect("chain id");
    let expected = adapter.chain_config().expect("config").chain_id;
    assert_eq!(response.result, Some(json!(expected)));
    assert_eq!(provider.chain_id().expect("chain id"), expected);
}

#[tokio::test]
async fn provider_config_returns_chain_config() {
    let (provider, _wallet) = connected_provider().await;
    let response = provider
        .request(RpcRequest::new(methods::PROVIDER_CONFIG, Value::Null))
        .await
        .expect("provider config");
    let config: ChainConfig =
        serde_json::from_value(response.result.expect("result")).expect("decode config");
    assert_eq!(config, ChainConfig::solana("0x1").expect("mainnet"));
}

#[tokio::test]
async fn accounts_methods_return_public_key() {
    let (provider, wallet) = connected_provider().await;
    for method in [methods::GET_ACCOUNTS, methods::REQUEST_ACCOUNTS] {
        let response = provider
            .request(RpcRequest::new(method, Value::Null).with_id("req-9"))
            .await
            .expect("accounts");
        assert_eq!(response.id, json!("req-9"));
        assert_eq!(response.result, Some(json!([wallet.account()])));
    }
}

#[tokio::test]
async fn sign_transaction_returns_signed_payload() {
    let (provider, wallet) = connected_provider().await;
    let tx = b"transfer 1 SOL".to_vec();

    let response = provider
        .request(RpcRequest::new(
            methods::SIGN_TRANSACTION,
            json!({ "message": STANDARD.encode(&tx) }),
        ))
        .await
        .expect("sign transaction");
    let signed = STANDARD
        .decode(response.result.expect("result").as_str().expect("string"))
        .expect("base64");
    let mut expected = wallet.signature_for("transaction", &tx).expect("signature");
    expected.extend_from_slice(&tx);
    assert_eq!(signed, expected);
    assert_eq!(wallet.sign_calls(), 1);
}

#[tokio::test]
async fn sign_and_send_returns_signature_object() {
    let (provider, wallet) = connected_provider().await;
    let tx = b"swap".to_vec();
    let response = provider
        .request(RpcRequest::new(
            methods::SIGN_AND_SEND_TRANSACTION,
            json!({ "message": STANDARD.encode(&tx) }),
        ))
        .await
        .expect("sign and send");
    let expected = bs58::encode(wallet.signature_for("transaction", &tx).expect("signature"))
        .into_string();
    assert_eq!(response.result, Some(json!({ "signature": expected })));
}

#[tokio::test]
async fn sign_all_transactions_keeps_order() {
    let (provider, _wallet) = connected_provider().await;
    let txs = [b"first".to_vec(), b"second".to_vec()];
    let response = provider
        .request(RpcRequest::new(
            methods::SIGN_ALL_TRANSACTIONS,
            json!({ "message": txs.iter().map(|t| STANDARD.encode(t)).collect::<Vec<_>>() }),
        ))
        .await
        .expect("sign all");
    let result = response.result.expect("result");
    let signed = result.as_array().expect("array");
    assert_eq!(signed.len(), 2);
    for (item, tx) in signed.iter().zip(&txs) {
        let bytes = STANDARD
            .decode(item.as_str().expect("string"))
            .expect("base64");
        assert!(bytes.ends_with(tx));
    }
}

#[tokio::test]
async fn sign_message_accepts_base64_or_bytes() {
    let (provider, wallet) = connected_provider().await;
    let message = b"hello solflare";

    let from_b64 = provider
        .request(RpcRequest::new(
            methods::SIGN_MESSAGE,
            json!({ "message": STANDARD.encode(message) }),
        ))
        .await
        .expect("sign base64");
    let from_bytes = provider
        .request(RpcRequest::new(
            methods::SIGN_MESSAGE,
            json!({ "message": message.to_vec() }),
        ))
        .await
        .expect("sign bytes");
    assert_eq!(from_b64.result, from_bytes.result);
    let expected = STANDARD.encode(wallet.signature_for("message", message).expect("signature"));
    assert_eq!(from_b64.result, Some(json!(expected)));
}

#[tokio::test]
async fn key_export_methods_have_no_handler() {
    let (provider, _wallet) = connected_provider().await;
    for method in [
        methods::SOLANA_PRIVATE_KEY,
        methods::PRIVATE_KEY,
        methods::SOLANA_SECRET_KEY,
    ] {
        let err = provider
            .request(RpcRequest::new(method, Value::Null))
            .await
            .expect_err("must fail");
        assert_eq!(err, AdapterError::HandlerNotProvided(method.to_owned()));
    }
}

#[tokio::test]
async fn unclaimed_method_is_not_found_without_passthrough() {
    let (provider, wallet) = connected_provider().await;
    let err = provider
        .request(RpcRequest::new("getBalance", json!([])))
        .await
        .expect_err("must fail");
    assert_eq!(err, AdapterError::MethodNotFound("getBalance".to_owned()));
    assert_eq!(wallet.sign_calls(), 0);
}

#[tokio::test]
async fn unclaimed_method_is_forwarded_when_wallet_handles_requests() {
    let (adapter, wallet) = ready_adapter().await;
    wallet.enable_passthrough().expect("enable passthrough");
    let provider = adapter
        .connect()
        .await
        .expect("connect")
        .expect("provider");

    let response = provider
        .request(RpcRequest::new("getBalance", json!([])))
        .await
        .expect("forwarded");
    assert_eq!(
        response.result,
        Some(json!({ "method": "getBalance", "network": "mainnet-beta" }))
    );

    let response = provider
        .request(RpcRequest::new(methods::CHAIN_ID, Value::Null))
        .await
        .expect("chain id still answered locally");
    assert_eq!(response.result, Some(json!("0x1")));
}

#[tokio::test]
async fn malformed_params_are_rejected() {
    let (provider, wallet) = connected_provider().await;
    for params in [
        Value::Null,
        json!({ "message": 42 }),
        json!({ "message": "not base64!!" }),
    ] {
        let err = provider
            .request(RpcRequest::new(methods::SIGN_TRANSACTION, params))
            .await
            .expect_err("must fail");
        assert!(matches!(err, AdapterError::InvalidParams { .. }), "{err}");
    }
    let err = provider
        .request(RpcRequest::new(
            methods::SIGN_ALL_TRANSACTIONS,
            json!({ "message": "single" }),
        ))
        .await
        .expect_err("must fail");
    assert!(err.to_string().contains("array"));
    assert_eq!(wallet.sign_calls(), 0);
}

#[tokio::test]
async fn unbound_shell_rejects_requests() {
    let (adapter, _wallet) = ready_adapter().await;
    let shell = adapter.provider().expect("shell");
    let err = shell
        .request(RpcRequest::new(methods::CHAIN_ID, Value::Null))
        .await
        .expect_err("must fail");
    assert!(matches!(err, AdapterError::NotConnected(_)));
}
