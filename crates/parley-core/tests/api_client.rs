//! Integration tests for the chat endpoint client against a mock server.

use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parley_core::{ApiErrorKind, ChatApi, Config};

fn api_for(server: &MockServer) -> ChatApi {
    let config = Config {
        base_url: server.uri(),
        request_timeout_secs: 5,
    };
    ChatApi::new(&config, "session-1").expect("client")
}

#[tokio::test]
async fn test_send_message_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(serde_json::json!({
            "message": "hi",
            "session_id": "session-1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "response": "Sure!",
            "message_id": "m1",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = api_for(&server).send_message("hi").await.expect("reply");
    assert_eq!(reply.text, "Sure!");
    assert_eq!(reply.message_id.as_deref(), Some("m1"));
}

#[tokio::test]
async fn test_send_message_application_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "error": "model unavailable",
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).send_message("hi").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Api);
    assert_eq!(err.message, "model unavailable");
}

#[tokio::test]
async fn test_send_message_error_status_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "success": false,
            "error": "backend exploded",
        })))
        .mount(&server)
        .await;

    // The server error string wins over the bare status code.
    let err = api_for(&server).send_message("hi").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Api);
    assert_eq!(err.message, "backend exploded");
}

#[tokio::test]
async fn test_send_message_success_without_reply_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).send_message("hi").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Api);
}

#[tokio::test]
async fn test_send_message_transport_failure() {
    // A server that was never started: connection refused.
    let config = Config {
        base_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 2,
    };
    let api = ChatApi::new(&config, "session-1").expect("client");

    let err = api.send_message("hi").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Transport);
}

#[tokio::test]
async fn test_fetch_history_with_feedback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/history"))
        .and(query_param("session_id", "session-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "messages": [
                {"id": "u1", "role": "user", "content": "hello"},
                {
                    "id": "m1",
                    "role": "assistant",
                    "content": "hi there",
                    "feedback": {"rating": 4, "comment": "ok"}
                },
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let messages = api_for(&server).fetch_history().await.expect("history");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "user");
    assert!(messages[0].feedback.is_none());
    let feedback = messages[1].feedback.as_ref().expect("feedback");
    assert_eq!(feedback.rating, 4);
    assert_eq!(feedback.comment, "ok");
}

#[tokio::test]
async fn test_fetch_history_empty_messages_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/history"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
        )
        .mount(&server)
        .await;

    let messages = api_for(&server).fetch_history().await.expect("history");
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_reset_session_roundtrip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/reset"))
        .and(body_json(serde_json::json!({"session_id": "session-1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).reset_session().await.expect("reset");
}

#[tokio::test]
async fn test_reset_session_failure_surfaces_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/reset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "error": "db down",
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).reset_session().await.unwrap_err();
    assert_eq!(err.message, "db down");
}

#[tokio::test]
async fn test_submit_feedback_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/feedback"))
        .and(body_json(serde_json::json!({
            "message_id": "m1",
            "rating": 5,
            "comment": "great answer",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server)
        .submit_feedback("m1", 5, "great answer")
        .await
        .expect("feedback accepted");
}
