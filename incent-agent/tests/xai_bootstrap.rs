mod common;

use common::test_config;
use incent_agent::{
    initialize_agent, AgentChunk, AgentError, ChatMessage, ChatModel, WalletData, WalletOrigin,
    XaiChatModel, DEFAULT_MESSAGE_MODIFIER,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(message: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "grok-beta",
        "choices": [{ "index": 0, "message": message, "finish_reason": "stop" }]
    }))
}

#[tokio::test]
async fn test_bootstrap_creates_then_reuses_wallet() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, "http://127.0.0.1:9");
    assert!(!config.wallet_data_file.exists());

    let first = initialize_agent(&config, DEFAULT_MESSAGE_MODIFIER).unwrap();
    assert_eq!(first.wallet_origin, WalletOrigin::Created);
    assert!(config.wallet_data_file.exists());

    let second = initialize_agent(&config, DEFAULT_MESSAGE_MODIFIER).unwrap();
    assert_eq!(second.wallet_origin, WalletOrigin::Loaded);
    assert_eq!(second.wallet.default_address, first.wallet.default_address);

    let stored: WalletData =
        serde_json::from_str(&std::fs::read_to_string(&config.wallet_data_file).unwrap()).unwrap();
    assert_eq!(stored, second.wallet);
}

#[tokio::test]
async fn test_bootstrap_replaces_wallet_for_other_network() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, "http://127.0.0.1:9");
    let other = WalletData::generate("base-mainnet").unwrap();
    std::fs::write(&config.wallet_data_file, serde_json::to_string(&other).unwrap()).unwrap();

    let initialized = initialize_agent(&config, DEFAULT_MESSAGE_MODIFIER).unwrap();
    assert_eq!(initialized.wallet_origin, WalletOrigin::Created);
    assert_eq!(initialized.wallet.network_id, "base-sepolia");
}

#[tokio::test]
async fn test_xai_tool_call_then_answer() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, &server.uri());

    // Second request (carries a tool result) gets the final answer.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"messages": [{}, {}, {}, {"role": "tool"}]})))
        .respond_with(completion(json!({
            "role": "assistant",
            "content": "That review is worth 0.00005 ETH."
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer xai-test-key"))
        .and(body_partial_json(json!({"model": "grok-beta"})))
        .respond_with(completion(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": { "name": "calculate_incentive", "arguments": "{\"score\": 50}" }
            }]
        })))
        .with_priority(2)
        .mount(&server)
        .await;

    let initialized = initialize_agent(&config, DEFAULT_MESSAGE_MODIFIER).unwrap();
    let mut chunks: Vec<AgentChunk> = Vec::new();
    let summary = initialized
        .evaluate_review("Checkout was slow", &mut chunks)
        .await
        .unwrap();

    assert_eq!(summary.tool_calls, 1);
    assert_eq!(chunks.len(), 2);
    assert!(chunks[0].content().contains("50000000000000"));
    assert_eq!(chunks[1].content(), "That review is worth 0.00005 ETH.");
}

#[tokio::test]
async fn test_xai_error_status_surfaces() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream overloaded"))
        .mount(&server)
        .await;

    let model = XaiChatModel::new(&server.uri(), "key", "grok-beta").unwrap();
    let err = model
        .complete(&[ChatMessage::user("hi")], &[])
        .await
        .unwrap_err();

    match err {
        AgentError::Llm(msg) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("upstream overloaded"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
