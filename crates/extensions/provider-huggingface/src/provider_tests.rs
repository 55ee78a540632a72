    use super::*;
    use serde_json::json;

    #[test]
    fn test_backend_id_and_kind() {
        let backend = HuggingFaceBackend::new("hf_token".to_string());
        assert_eq!(backend.id(), "huggingface");
        assert_eq!(backend.kind(), ServiceKind::Secondary);
    }

    #[test]
    fn test_endpoint() {
        let backend = HuggingFaceBackend::new("t".to_string());
        assert_eq!(
            backend.endpoint(),
            "https://api-inference.huggingface.co/models/facebook/bart-large-cnn"
        );
        let backend = HuggingFaceBackend::with_url("t".to_string(), "http://local/".to_string())
            .with_model("org/model");
        assert_eq!(backend.endpoint(), "http://local/models/org/model");
    }

    #[test]
    fn test_extract_summary_text() {
        let value = json!([{"summary_text": "short"}]);
        assert_eq!(extract_generated_text(&value).as_deref(), Some("short"));
    }

    #[test]
    fn test_extract_generated_text_from_array() {
        let value = json!([{"generated_text": "gen"}]);
        assert_eq!(extract_generated_text(&value).as_deref(), Some("gen"));
    }

    #[test]
    fn test_summary_text_wins_over_generated_text() {
        let value = json!([{"generated_text": "gen", "summary_text": "sum"}]);
        assert_eq!(extract_generated_text(&value).as_deref(), Some("sum"));
    }

    #[test]
    fn test_extract_from_object() {
        let value = json!({"generated_text": "obj"});
        assert_eq!(extract_generated_text(&value).as_deref(), Some("obj"));
    }

    #[test]
    fn test_extract_unknown_shapes() {
        assert_eq!(extract_generated_text(&json!([])), None);
        assert_eq!(extract_generated_text(&json!({"summary_text": "x"})), None);
        assert_eq!(extract_generated_text(&json!("text")), None);
    }

    #[tokio::test]
    async fn test_empty_token_is_missing_credentials() {
        let backend = HuggingFaceBackend::with_url(" ".to_string(), "http://127.0.0.1:9".to_string());
        let err = backend
            .rewrite(TransformRequest::new("x", "ignored"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredentials(_)));
    }

    mod http_tests {
        use super::*;
        use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

        fn backend(server: &MockServer) -> HuggingFaceBackend {
            HuggingFaceBackend::with_url("hf_test".to_string(), server.uri())
        }

        #[tokio::test]
        async fn test_rewrite_success() {
            let mock_server = MockServer::start().await;

            Mock::given(matchers::method("POST"))
                .and(matchers::path("/models/facebook/bart-large-cnn"))
                .and(matchers::header("authorization", "Bearer hf_test"))
                .and(matchers::body_json(json!({
                    "inputs": "this is a terrible idea",
                    "parameters": {"max_length": 150, "min_length": 30, "do_sample": false}
                })))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!([{"summary_text": " A questionable idea. "}])),
                )
                .expect(1)
                .mount(&mock_server)
                .await;

            let output = backend(&mock_server)
                .rewrite(TransformRequest::new("this is a terrible idea", "ignored"))
                .await
                .unwrap();
            assert_eq!(output.text, "A questionable idea.");
            assert_eq!(output.model.as_deref(), Some(DEFAULT_MODEL));
        }

        #[tokio::test]
        async fn test_unrecognized_shape_keeps_original() {
            let mock_server = MockServer::start().await;

            Mock::given(matchers::method("POST"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
                .mount(&mock_server)
                .await;

            let output = backend(&mock_server)
                .rewrite(TransformRequest::new("keep me", "ignored"))
                .await
                .unwrap();
            assert_eq!(output.text, "keep me");
        }

        #[tokio::test]
        async fn test_api_error_message() {
            let mock_server = MockServer::start().await;

            Mock::given(matchers::method("POST"))
                .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials in Authorization header"})))
                .mount(&mock_server)
                .await;

            match backend(&mock_server)
                .rewrite(TransformRequest::new("x", ""))
                .await
                .unwrap_err()
            {
                ProviderError::ApiError { status, message } => {
                    assert_eq!(status, 401);
                    assert!(message.contains("Invalid credentials"));
                }
                other => panic!("Expected ApiError, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_malformed_body() {
            let mock_server = MockServer::start().await;

            Mock::given(matchers::method("POST"))
                .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
                .mount(&mock_server)
                .await;

            let err = backend(&mock_server)
                .rewrite(TransformRequest::new("x", ""))
                .await
                .unwrap_err();
            assert!(matches!(err, ProviderError::MalformedResponse(_)));
        }
    }
