//! Integration tests for the chat endpoint and transcript handling.

use ragdesk_client::{ChatConfig, ChatRole, ChatTarget, ClientConfig, RagClient};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> RagClient {
    RagClient::new(ClientConfig::with_base_url(server.uri())).expect("client")
}

#[tokio::test]
async fn test_send_appends_user_and_assistant_turns() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let mut session = client
        .chat_session(ChatTarget::Agent("a1".to_string()))
        .with_config(ChatConfig {
            top_k: Some(3),
            temperature: None,
        });

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({
            "session_id": session.session_id(),
            "message": "What is in the report?",
            "agent_id": "a1",
            "config": {"top_k": 3}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": session.session_id(),
            "answer": "Quarterly numbers.",
            "sources": [{
                "document_id": "d1",
                "title": "Q3 report",
                "snippet": "Revenue grew",
                "score": 0.91
            }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let reply = session.send("  What is in the report? ").await.unwrap();
    assert_eq!(reply.role, ChatRole::Assistant);
    assert_eq!(reply.content, "Quarterly numbers.");
    assert_eq!(reply.sources.len(), 1);
    assert_eq!(reply.sources[0].title, "Q3 report");

    session.send("What is in the report?").await.unwrap();

    let messages = session.messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].role, ChatRole::User);
    assert_eq!(messages[0].content, "What is in the report?");
    assert!(messages.windows(2).all(|w| w[0].id < w[1].id));

    session.clear();
    assert!(session.messages().is_empty());
}

#[tokio::test]
async fn test_vault_target_sends_vault_id_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "s",
            "answer": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = client.chat_session(ChatTarget::Vault("v1".to_string()));
    let reply = session.send("hi").await.unwrap();
    assert!(reply.sources.is_empty());

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["vault_id"], "v1");
    assert!(body.get("agent_id").is_none());
    assert!(body.get("config").is_none());
}

#[tokio::test]
async fn test_failed_send_removes_user_turn() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = client.chat_session(ChatTarget::Vault("v1".to_string()));
    let err = session.send("hello").await.unwrap_err();

    assert_eq!(err.user_message(), ragdesk_client::error::SERVER_ERROR_MESSAGE);
    assert!(session.messages().is_empty());
}

#[tokio::test]
async fn test_request_naming_vault_and_agent_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut request = ragdesk_client::ChatRequest::new(
        ragdesk_client::new_session_id(),
        "hello",
        &ChatTarget::Vault("v1".to_string()),
    );
    request.agent_id = Some("a1".to_string());

    let err = client_for(&server).chat().send(&request).await.unwrap_err();
    assert!(matches!(err, ragdesk_client::Error::Validation(_)));
    assert_eq!(err.to_string(), "Chat with either a vault or an agent, not both.");
}

#[tokio::test]
async fn test_chat_is_never_cached() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "s",
            "answer": "same"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = ragdesk_client::ChatRequest::new(
        ragdesk_client::new_session_id(),
        "repeat",
        &ChatTarget::Vault("v1".to_string()),
    );
    client.chat().send(&request).await.unwrap();
    client.chat().send(&request).await.unwrap();
}
