use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rxverify::chat::{ChatRole, ChatTurn, MedicalChatService, MedicalIntakeState};
use rxverify::config::LlmConfig;
use rxverify::llm::LlmProvider;

fn chat_service(mock_server: &MockServer) -> MedicalChatService {
    let config = LlmConfig {
        model: "openai/gpt-test".to_string(),
        api_key: Some("test-key".to_string()),
        base_url: Some(mock_server.uri()),
        timeout_secs: 5,
        max_retries: 0,
        chat_temperature: 0.7,
    };
    MedicalChatService::new(LlmProvider::new(Some(&config)), config.chat_temperature)
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

fn turn(role: ChatRole, content: &str) -> ChatTurn {
    ChatTurn {
        role,
        content: content.to_string(),
    }
}

#[tokio::test]
async fn greeting_turn_leaves_intake_untouched() {
    let mock_server = MockServer::start().await;

    let greeting = "Hello, I'm here to help collect information about your medical prescription details. To begin, can you tell me what disease or illness you are currently suffering from and what are the symptoms?";
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(greeting)))
        .mount(&mock_server)
        .await;

    let outcome = chat_service(&mock_server)
        .chat("Hello", &[], MedicalIntakeState::default(), None)
        .await
        .expect("outcome");

    assert_eq!(outcome.reply, greeting);
    assert_eq!(outcome.intake, MedicalIntakeState::default());
    assert!(!outcome.conversation_complete);
}

#[tokio::test]
async fn disease_answer_is_extracted_and_stripped_from_the_reply() {
    let mock_server = MockServer::start().await;

    let reply = "Thank you for sharing that.\n{\"extracted_disease\": \"fever and headache\"}\nNow, please list all the medicines you have been prescribed.";
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(reply)))
        .mount(&mock_server)
        .await;

    let history = vec![
        turn(ChatRole::User, "Hello"),
        turn(ChatRole::Assistant, "Hello, I'm here to help..."),
    ];

    let outcome = chat_service(&mock_server)
        .chat(
            "I have a fever and headache for the past 3 days",
            &history,
            MedicalIntakeState::default(),
            None,
        )
        .await
        .expect("outcome");

    assert_eq!(
        outcome.intake.reported_disease.as_deref(),
        Some("fever and headache")
    );
    assert!(!outcome.reply.contains("extracted_disease"));
    assert!(outcome.reply.contains("Thank you for sharing that."));
    assert!(!outcome.conversation_complete);
}

#[tokio::test]
async fn confirmation_completes_the_conversation() {
    let mock_server = MockServer::start().await;

    let reply = "Thank you, your information has been recorded. {\"confirmation\": true}";
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        // the prior state must reach the model as a context block
        .and(body_string_contains("COLLECTED INFORMATION"))
        .and(body_string_contains("fever"))
        .and(body_string_contains("Paracetamol"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(reply)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let intake = MedicalIntakeState {
        reported_disease: Some("fever".to_string()),
        medications_provided_by_user: Some(vec![
            "Paracetamol".to_string(),
            "Ibuprofen".to_string(),
        ]),
        medication_confirmation: None,
    };

    let outcome = chat_service(&mock_server)
        .chat("Yes, that is correct", &[], intake, None)
        .await
        .expect("outcome");

    assert_eq!(outcome.intake.medication_confirmation, Some(true));
    assert!(outcome.conversation_complete);
    assert!(!outcome.reply.contains("confirmation"));
}

#[tokio::test]
async fn prescription_snapshot_reaches_the_model_context() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("PRESCRIPTION DATA AVAILABLE"))
        .and(body_string_contains("Cetirizine"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Noted.")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let prescription = rxverify::extraction::PrescriptionData {
        doctor_info: None,
        patient_info: None,
        medicines: vec![rxverify::extraction::Medicine {
            name: "Cetirizine".to_string(),
            ..Default::default()
        }],
    };

    chat_service(&mock_server)
        .chat(
            "Hello",
            &[],
            MedicalIntakeState::default(),
            Some(&prescription),
        )
        .await
        .expect("outcome");
}

#[tokio::test]
async fn llm_failure_surfaces_as_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "message": "model not found",
                "type": "invalid_request_error",
                "param": null,
                "code": "model_not_found"
            }
        })))
        .mount(&mock_server)
        .await;

    let result = chat_service(&mock_server)
        .chat("Hello", &[], MedicalIntakeState::default(), None)
        .await;

    assert!(result.is_err());
}
