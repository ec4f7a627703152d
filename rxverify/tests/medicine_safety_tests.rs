use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rxverify::config::LlmConfig;
use rxverify::error::RxError;
use rxverify::llm::LlmProvider;
use rxverify::safety::MedicineSafetyService;

fn safety_service(mock_server: &MockServer) -> MedicineSafetyService {
    let config = LlmConfig {
        model: "openai/gpt-test".to_string(),
        api_key: Some("test-key".to_string()),
        base_url: Some(mock_server.uri()),
        timeout_secs: 5,
        max_retries: 0,
        chat_temperature: 0.7,
    };
    MedicineSafetyService::new(LlmProvider::new(Some(&config)))
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1,
        "model": "gpt-test",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ],
        "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
    })
}

#[tokio::test]
async fn verdicts_are_parsed_from_the_array_reply() {
    let mock_server = MockServer::start().await;

    let reply = r#"[
        {"medicine_name": "Paracetamol", "flagged": false},
        {"medicine_name": "Alprazolam", "flagged": true},
        {"medicine_name": "Phenylpropanolamine", "flagged": true}
    ]"#;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Alprazolam"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(reply)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let medicines = vec![
        "Paracetamol".to_string(),
        "Alprazolam".to_string(),
        "Phenylpropanolamine".to_string(),
    ];

    let verdicts = safety_service(&mock_server)
        .check_medicines(&medicines)
        .await
        .expect("verdicts");

    assert_eq!(verdicts.len(), 3);
    assert!(!verdicts[0].flagged);
    assert!(verdicts[1].flagged);
    assert_eq!(verdicts[2].medicine_name, "Phenylpropanolamine");
}

#[tokio::test]
async fn empty_medicine_list_makes_no_collaborator_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("[]")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let verdicts = safety_service(&mock_server)
        .check_medicines(&[])
        .await
        .expect("verdicts");
    assert!(verdicts.is_empty());
}

#[tokio::test]
async fn object_shaped_reply_is_a_contract_violation_with_raw_text() {
    let mock_server = MockServer::start().await;

    let reply = r#"{"results": "I flagged nothing"}"#;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(reply)))
        .mount(&mock_server)
        .await;

    let result = safety_service(&mock_server)
        .check_medicines(&["Aspirin".to_string()])
        .await;

    match result {
        Err(RxError::LlmContract { raw_response, .. }) => {
            assert!(raw_response.contains("I flagged nothing"));
        }
        other => panic!("expected contract violation, got {other:?}"),
    }
}

#[tokio::test]
async fn prose_reply_is_a_contract_violation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("None of these are banned.")),
        )
        .mount(&mock_server)
        .await;

    let result = safety_service(&mock_server)
        .check_medicines(&["Aspirin".to_string()])
        .await;
    assert!(matches!(result, Err(RxError::LlmContract { .. })));
}
