pub mod dto;
pub mod handlers;
pub mod openapi;
pub mod response;
pub mod router;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::state::AppState;
    use crate::config::{
        Config, RegistryConfig, ServerConfig, UploadConfig, VerificationConfig, VisionConfig,
    };
    use crate::extraction::VisionProvider;
    use crate::llm::LlmProvider;
    use crate::speech::SpeechProvider;
    use crate::verification::{RegistryLookup, RegistryRecord};

    struct EmptyRegistry;

    #[async_trait::async_trait]
    impl RegistryLookup for EmptyRegistry {
        async fn fetch_by_registration(&self, _registration_no: &str) -> Vec<RegistryRecord> {
            Vec::new()
        }
    }

    fn test_state() -> AppState {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            registry: RegistryConfig {
                base_url: "http://127.0.0.1:1/registry".to_string(),
                referer: "http://127.0.0.1:1/".to_string(),
                timeout_secs: 15,
                page_length: 50,
                accept_invalid_certs: false,
            },
            verification: VerificationConfig {
                similarity_threshold: 0.2,
            },
            upload: UploadConfig {
                max_bytes: 10 * 1024 * 1024,
            },
            vision: VisionConfig {
                model: "openai/gpt-4o".to_string(),
                api_key: None,
                base_url: None,
                timeout_secs: 60,
                max_retries: 3,
            },
            llm: None,
            speech: None,
        };

        let vision = VisionProvider::new(&config.vision).unwrap();
        let llm = LlmProvider::new(config.llm.as_ref());
        let speech = SpeechProvider::unavailable("not configured");

        AppState::new(config, Arc::new(EmptyRegistry), vision, llm, speech)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_success_envelope() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json.get("data").is_some(), "success should have 'data' key");
        assert!(
            json.get("error").is_none(),
            "success should NOT have 'error' key"
        );
        assert_eq!(json["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn openapi_json_is_served() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let version = json["openapi"]
            .as_str()
            .expect("openapi field should be a string");
        assert!(version.starts_with('3'));
    }

    #[tokio::test]
    async fn verify_doctor_without_registration_number_is_a_clean_negative() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/verify-doctor")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"doctor_name": "Dr. Ramesh Kumar", "registration_number": ""}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["verified"], false);
        assert_eq!(json["data"]["total_matches"], 0);
    }

    #[tokio::test]
    async fn chat_without_llm_maps_to_not_implemented() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/medical-chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message": "Hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "not_implemented");
    }

    #[tokio::test]
    async fn chat_with_bad_history_shape_is_rejected() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/medical-chat")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"message": "Hi", "conversation_history": [{"speaker": "x", "line": "y"}]}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_rejects_wrong_mime_type() {
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"note.txt\"\r\nContent-Type: text/plain\r\n\r\nhello\r\n--{boundary}--\r\n"
        );

        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/upload-prescription")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "invalid_request");
    }
}
