//! Wire models for the RAG backend API.
//!
//! All entities are transient projections of server state. Field names follow
//! the backend's JSON; where the backend is inconsistent (vaults arrive keyed
//! by either `id` or `vault_id`) the client form is normalized on decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// =============================================================================
// VAULTS
// =============================================================================

/// A named container for ingested documents, forming one retrieval scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vault {
    #[serde(alias = "vault_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /vaults`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultCreateRequest {
    pub name: String,
    pub description: String,
}

// =============================================================================
// AGENTS
// =============================================================================

/// A chat configuration binding a vault to a system prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(alias = "id")]
    pub agent_id: String,
    pub name: String,
    pub vault_id: String,
    pub system_prompt: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /agents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCreateRequest {
    pub name: String,
    pub vault_id: String,
    pub system_prompt: String,
}

// =============================================================================
// DOCUMENTS & INGESTION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(alias = "id")]
    pub document_id: String,
    pub title: String,
    #[serde(default)]
    pub source: String,
    pub vault_id: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Body of `POST /ingest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestRequest {
    pub text: String,
    pub title: String,
    pub source: String,
    pub vault_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub document_id: String,
    pub task_id: String,
}

/// Lifecycle of a server-side ingestion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestState {
    Queued,
    Processing,
    Done,
    Failed,
}

impl IngestState {
    /// `done` and `failed` admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for IngestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Processing => write!(f, "processing"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Response of `GET /ingest/status/{task_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestStatus {
    pub task_id: String,
    pub status: IngestState,
    /// Percent complete, clamped to `0..=100` on decode.
    #[serde(deserialize_with = "deserialize_progress", default)]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngestStatus {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

fn deserialize_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    if raw.is_nan() {
        return Ok(0);
    }
    Ok(raw.clamp(0.0, 100.0).round() as u8)
}

// =============================================================================
// CHAT
// =============================================================================

/// Retrieval knobs forwarded with a chat message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// What a chat message is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChatTarget {
    Vault(String),
    Agent(String),
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ChatConfig>,
}

impl ChatRequest {
    pub fn new(
        session_id: impl Into<String>,
        message: impl Into<String>,
        target: &ChatTarget,
    ) -> Self {
        let (vault_id, agent_id) = match target {
            ChatTarget::Vault(id) => (Some(id.clone()), None),
            ChatTarget::Agent(id) => (None, Some(id.clone())),
        };
        Self {
            session_id: session_id.into(),
            message: message.into(),
            vault_id,
            agent_id,
            config: None,
        }
    }

    pub fn with_config(mut self, config: ChatConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// A retrieved passage cited by an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSource {
    pub document_id: String,
    pub title: String,
    pub snippet: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<ChatSource>,
}

// =============================================================================
// COMMON
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Items that belong to exactly one vault.
pub trait VaultScoped {
    fn vault_id(&self) -> &str;
}

impl VaultScoped for Agent {
    fn vault_id(&self) -> &str {
        &self.vault_id
    }
}

impl VaultScoped for Document {
    fn vault_id(&self) -> &str {
        &self.vault_id
    }
}

/// Keep only the items belonging to `vault_id`; `None` keeps everything.
pub fn filter_by_vault<'a, T: VaultScoped>(items: &'a [T], vault_id: Option<&str>) -> Vec<&'a T> {
    match vault_id {
        Some(id) => items.iter().filter(|item| item.vault_id() == id).collect(),
        None => items.iter().collect(),
    }
}

/// Timestamps arrive as RFC 3339 or as naive ISO-8601 (assumed UTC).
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map(|naive| naive.and_utc())
            .map_err(|e| format!("invalid timestamp {:?}: {}", raw, e))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vault_accepts_vault_id_key() {
        let vault: Vault = serde_json::from_value(json!({
            "vault_id": "v1",
            "name": "Research",
            "description": "papers",
            "created_at": "2024-01-01T00:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(vault.id, "v1");

        let vault: Vault = serde_json::from_value(json!({
            "id": "v2",
            "name": "Notes",
            "description": "",
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(vault.id, "v2");
    }

    #[test]
    fn test_naive_timestamp_treated_as_utc() {
        let parsed = timestamp::parse("2024-03-05T10:20:30.123456").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-05T10:20:30.123456+00:00");
        assert!(timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn test_ingest_status_progress_clamped() {
        let status: IngestStatus = serde_json::from_value(json!({
            "task_id": "t1",
            "status": "processing",
            "progress": 142.7
        }))
        .unwrap();
        assert_eq!(status.progress, 100);

        let status: IngestStatus = serde_json::from_value(json!({
            "task_id": "t1",
            "status": "queued",
            "progress": -3
        }))
        .unwrap();
        assert_eq!(status.progress, 0);
        assert!(!status.is_terminal());
    }

    #[test]
    fn test_ingest_state_terminal() {
        assert!(IngestState::Done.is_terminal());
        assert!(IngestState::Failed.is_terminal());
        assert!(!IngestState::Queued.is_terminal());
        assert!(!IngestState::Processing.is_terminal());
        assert_eq!(IngestState::Processing.to_string(), "processing");
    }

    #[test]
    fn test_chat_request_omits_unset_fields() {
        let req = ChatRequest::new("s1", "hi", &ChatTarget::Agent("a1".to_string()));
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"session_id": "s1", "message": "hi", "agent_id": "a1"}));

        let req = ChatRequest::new("s1", "hi", &ChatTarget::Vault("v1".to_string())).with_config(
            ChatConfig {
                top_k: Some(5),
                temperature: None,
            },
        );
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["vault_id"], "v1");
        assert_eq!(value["config"], json!({"top_k": 5}));
    }

    #[test]
    fn test_filter_by_vault() {
        let created_at = timestamp::parse("2024-01-01T00:00:00Z").unwrap();
        let agent = |id: &str, vault: &str| Agent {
            agent_id: id.to_string(),
            name: id.to_string(),
            vault_id: vault.to_string(),
            system_prompt: "be helpful".to_string(),
            created_at,
        };
        let agents = vec![agent("a1", "v1"), agent("a2", "v2"), agent("a3", "v1")];

        let filtered = filter_by_vault(&agents, Some("v1"));
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|a| a.vault_id == "v1"));

        assert_eq!(filter_by_vault(&agents, None).len(), 3);
        assert!(filter_by_vault(&agents, Some("missing")).is_empty());
    }
}
