//! JSON-RPC client against real endpoints.
use l2ops_chain::{fetch_fee_parameters, ChainClient, RetryPolicy, RpcChainClient};
use primitives::L1_BLOCK_CONTRACT;
use std::time::Duration;

#[tokio::test]
async fn unreachable_node_fails() {
    let policy = RetryPolicy::no_retry(Duration::from_secs(5));
    let client = RpcChainClient::connect("http://127.0.0.1:1", policy)
        .await
        .unwrap();
    assert!(client.get_chain_id().await.is_err());
}

#[tokio::test]
#[ignore = "flaky RPC"]
async fn reads_op_mainnet_fee_parameters() {
    let client = RpcChainClient::connect("https://mainnet.optimism.io", RetryPolicy::default())
        .await
        .unwrap();
    assert_eq!(client.get_chain_id().await.unwrap(), 10);

    let params = fetch_fee_parameters(&client).await.unwrap();
    assert!(!params.base_fee_scalar.is_zero());
    assert!(client.get_nonce(L1_BLOCK_CONTRACT).await.is_ok());
}
