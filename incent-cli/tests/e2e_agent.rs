mod common;

use common::TestEnv;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_agent_reports_missing_variables() {
    let env = TestEnv::new();
    env.incent()
        .env("CDP_API_KEY_NAME", "name")
        .env("CDP_API_KEY_PRIVATE_KEY", "key")
        .args(["agent", "--mode", "chat"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Required environment variables are not set"))
        .stderr(predicate::str::contains("XAI_API_KEY=your_xai_api_key_here"))
        .stderr(predicate::str::contains("CDP_API_KEY_NAME").not());

    assert!(!env.work_dir.path().join("wallet_data.txt").exists());
}

#[test]
fn test_agent_chat_exit_persists_wallet() {
    let env = TestEnv::new();
    env.incent_with_agent_env("http://127.0.0.1:9")
        .args(["agent", "--mode", "chat"])
        .write_stdin("exit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting chat mode... Type 'exit' to end."))
        .stderr(predicate::str::contains("NETWORK_ID not set"));

    let wallet = std::fs::read_to_string(env.work_dir.path().join("wallet_data.txt")).unwrap();
    let wallet: serde_json::Value = serde_json::from_str(&wallet).unwrap();
    assert_eq!(wallet["network_id"], "base-sepolia");
}

#[test]
fn test_agent_mode_menu_from_stdin() {
    let env = TestEnv::new();
    env.incent_with_agent_env("http://127.0.0.1:9")
        .env("NETWORK_ID", "base-sepolia")
        .arg("agent")
        .write_stdin("9\nchat\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid choice. Please try again."))
        .stdout(predicate::str::contains("Starting chat mode"));
}

#[test]
fn test_agent_rejects_unknown_mode() {
    let env = TestEnv::new();
    env.incent_with_agent_env("http://127.0.0.1:9")
        .args(["agent", "--mode", "turbo"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid mode"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_evaluate_streams_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "Helpfulness 35, incentive 0.000035 ETH." },
                "finish_reason": "stop"
            }]
        })))
        .mount(&server)
        .await;

    let env = TestEnv::new();
    env.incent_with_agent_env(&server.uri())
        .args(["evaluate", "The soup was cold and the waiter ignored us."])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Helpfulness 35, incentive 0.000035 ETH.\n-------------------",
        ));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body["messages"][1]["content"],
        "The review is: The soup was cold and the waiter ignored us."
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_evaluate_model_failure_exits_1() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let env = TestEnv::new();
    env.incent_with_agent_env(&server.uri())
        .args(["evaluate", "Great service"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("503"));
}
