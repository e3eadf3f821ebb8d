//! Copyable cURL commands for the backend endpoints.
//!
//! Every function takes the API base URL explicitly so snippets always match
//! the client the caller is actually configured with.

use serde::Serialize;

use crate::defaults::CURL_CHAT_MESSAGE;
use crate::models::{AgentCreateRequest, ChatRequest, ChatTarget, IngestRequest, VaultCreateRequest};
use crate::session::new_session_id;

const JSON_HEADER: &str = r#"-H "Content-Type: application/json""#;

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn post_command<T: Serialize>(base_url: &str, path: &str, payload: &T) -> String {
    // Serializing plain request structs cannot fail.
    let body = serde_json::to_string_pretty(payload).unwrap_or_default();
    format!(
        "curl -X POST \"{}\" \\\n  {} \\\n  -d '{}'",
        endpoint(base_url, path),
        JSON_HEADER,
        body.replace('\'', "'\\''")
    )
}

fn bare_command(method: &str, url: &str) -> String {
    format!("curl -X {} \"{}\" \\\n  {}", method, url, JSON_HEADER)
}

/// `POST /vaults`
pub fn create_vault(base_url: &str, request: &VaultCreateRequest) -> String {
    post_command(base_url, "/vaults", request)
}

/// `POST /ingest`
pub fn ingest(base_url: &str, request: &IngestRequest) -> String {
    post_command(base_url, "/ingest", request)
}

/// `POST /agents`
pub fn create_agent(base_url: &str, request: &AgentCreateRequest) -> String {
    post_command(base_url, "/agents", request)
}

/// `POST /chat` against an agent or a vault, with a fresh session id.
pub fn chat(base_url: &str, target: &ChatTarget, message: Option<&str>) -> String {
    let request = ChatRequest::new(
        new_session_id(),
        message.unwrap_or(CURL_CHAT_MESSAGE),
        target,
    );
    post_command(base_url, "/chat", &request)
}

/// `GET /agents`, optionally filtered by vault.
pub fn list_agents(base_url: &str, vault_id: Option<&str>) -> String {
    let url = match vault_id {
        Some(id) => format!("{}?vault_id={}", endpoint(base_url, "/agents"), id),
        None => endpoint(base_url, "/agents"),
    };
    bare_command("GET", &url)
}

/// `DELETE /agents/{agent_id}`
pub fn delete_agent(base_url: &str, agent_id: &str) -> String {
    bare_command("DELETE", &endpoint(base_url, &format!("/agents/{}", agent_id)))
}
