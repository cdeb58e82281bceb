//! Unit tests for ChatClient using wiremock

#[cfg(test)]
mod tests {
    use crate::chat::{ChatClient, ChatModel};
    use crate::error::GeneratorError;
    use crate::generator::ArticleGenerator;
    use crate::prompt::SYSTEM_PROMPT;
    use kb_core::{ArticleWriter, Issue, KbError};
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn issue() -> Issue {
        serde_json::from_value(serde_json::json!({
            "number": 42,
            "title": "Crash on startup",
            "state": "closed"
        }))
        .unwrap()
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-abc",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 200, "completion_tokens": 50, "total_tokens": 250}
        })
    }

    #[tokio::test]
    async fn test_generates_article_over_http() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "temperature": 0.7
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion("## Summary\nFixed.\n")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ChatClient::new(
            &format!("{}/v1", mock_server.uri()),
            "gpt-4o-mini",
            Some("sk-test"),
            Duration::from_secs(5),
        );
        let article = ArticleGenerator::new(client)
            .generate_kb_article(&issue(), &[])
            .unwrap();

        assert_eq!(article, "## Summary\nFixed.");

        let requests = mock_server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
    }

    #[tokio::test]
    async fn test_partial_usage_still_yields_article() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "## Article"}}],
                "usage": {"prompt_tokens": 10, "total_tokens": 10}
            })))
            .mount(&mock_server)
            .await;

        let client = ChatClient::new(&mock_server.uri(), "local", None, Duration::from_secs(5));
        let article = ArticleGenerator::new(client)
            .write_article(&issue(), &[])
            .unwrap();

        assert_eq!(article, "## Article");
    }

    #[tokio::test]
    async fn test_keyless_client_sends_no_auth() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .mount(&mock_server)
            .await;

        let client = ChatClient::new(&mock_server.uri(), "llama3", None, Duration::from_secs(5));
        let request = client.create_input("system", "user");
        let response = client.invoke(&request).unwrap();

        assert_eq!(response.first_content(), Some("ok"));
        let requests = mock_server.received_requests().await.unwrap();
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_api_error_is_invocation_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"message": "Rate limit reached", "type": "requests"}
            })))
            .mount(&mock_server)
            .await;

        let client = ChatClient::new(&mock_server.uri(), "gpt-4o-mini", Some("k"), Duration::from_secs(5));
        let request = client.create_input("system", "user");

        match client.invoke(&request) {
            Err(GeneratorError::Api { status, body }) => {
                assert_eq!(status, 429);
                assert!(body.contains("Rate limit reached"));
            }
            other => panic!("expected Api error, got {:?}", other.map(|r| r.id)),
        }

        let err = ArticleGenerator::new(client)
            .write_article(&issue(), &[])
            .unwrap_err();
        assert!(matches!(err, KbError::ModelInvocation(msg) if msg.contains("429")));
    }

    #[tokio::test]
    async fn test_garbage_body_is_invocation_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = ChatClient::new(&mock_server.uri(), "gpt-4o-mini", None, Duration::from_secs(5));
        let err = ArticleGenerator::new(client)
            .write_article(&issue(), &[])
            .unwrap_err();

        assert!(matches!(err, KbError::ModelInvocation(_)));
    }
}
