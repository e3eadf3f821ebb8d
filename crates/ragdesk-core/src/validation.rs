//! Local form validation.
//!
//! Everything here runs before a request is built; failures surface as
//! [`Error::Validation`] and never touch the network.

use serde_json::{Map, Value};
use std::path::Path;

use crate::defaults::{ACCEPTED_EXTENSIONS, ACCEPTED_MIME_TYPES};
use crate::error::{Error, Result};
use crate::models::{
    AgentCreateRequest, ChatRequest, ChatTarget, IngestRequest, VaultCreateRequest,
};

fn required(value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Validate and trim a vault creation form.
pub fn vault_request(name: &str, description: &str) -> Result<VaultCreateRequest> {
    Ok(VaultCreateRequest {
        name: required(name, "Vault name is required")?,
        description: required(description, "Vault description is required")?,
    })
}

/// Validate and trim an agent creation form.
pub fn agent_request(name: &str, vault_id: &str, system_prompt: &str) -> Result<AgentCreateRequest> {
    Ok(AgentCreateRequest {
        name: required(name, "Agent name is required")?,
        vault_id: required(vault_id, "Please select a vault")?,
        system_prompt: required(system_prompt, "System prompt is required")?,
    })
}

/// Validate a chat message and its target.
pub fn chat_message(message: &str, target: &ChatTarget) -> Result<String> {
    let id = match target {
        ChatTarget::Vault(id) | ChatTarget::Agent(id) => id,
    };
    required(id, "Please select a vault or agent to chat with.")?;
    required(message, "Message cannot be empty.")
}

/// Validate an outgoing chat request: non-blank message, exactly one target.
pub fn chat_request(request: &ChatRequest) -> Result<()> {
    let target = match (&request.vault_id, &request.agent_id) {
        (Some(_), Some(_)) => {
            return Err(Error::Validation(
                "Chat with either a vault or an agent, not both.".to_string(),
            ))
        }
        (Some(vault_id), None) => ChatTarget::Vault(vault_id.clone()),
        (None, Some(agent_id)) => ChatTarget::Agent(agent_id.clone()),
        (None, None) => ChatTarget::Vault(String::new()),
    };
    chat_message(&request.message, &target).map(|_| ())
}

fn invalid_file_type() -> Error {
    Error::Validation(format!(
        "Invalid file type. Please upload {} files only.",
        ACCEPTED_EXTENSIONS.join(",")
    ))
}

/// Check a file name (and MIME type, when known) against the accepted types.
pub fn check_file_type(file_name: &str, mime_type: Option<&str>) -> Result<()> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .ok_or_else(invalid_file_type)?;

    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(invalid_file_type());
    }

    match mime_type {
        Some(mime) if !mime.is_empty() && !ACCEPTED_MIME_TYPES.contains(&mime) => {
            Err(invalid_file_type())
        }
        _ => Ok(()),
    }
}

/// File name without its final extension, used as the default title.
pub fn default_title(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name[..idx].to_string(),
        _ => file_name.to_string(),
    }
}

/// Parse the free-form metadata textarea. Blank input means "no metadata".
pub fn parse_metadata(raw: &str) -> Result<Option<Map<String, Value>>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        _ => Err(Error::Validation("Invalid JSON in metadata field.".to_string())),
    }
}

/// User-editable fields of the upload form.
#[derive(Debug, Clone, Default)]
pub struct UploadDraft {
    pub vault_id: String,
    /// Defaults to the file name without extension.
    pub title: Option<String>,
    /// Defaults to the file name.
    pub source: Option<String>,
    /// Raw JSON object text.
    pub metadata: Option<String>,
}

impl UploadDraft {
    pub fn new(vault_id: impl Into<String>) -> Self {
        Self {
            vault_id: vault_id.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    /// Fields that can be checked before the file body is read.
    pub fn precheck(&self, file_name: &str) -> Result<()> {
        if file_name.trim().is_empty() {
            return Err(Error::Validation("Please select a file to upload.".to_string()));
        }
        check_file_type(file_name, None)?;
        required(&self.vault_id, "Please select a vault.")?;
        self.resolved_title(file_name)?;
        Ok(())
    }

    fn resolved_title(&self, file_name: &str) -> Result<String> {
        let title = match &self.title {
            Some(title) => title.clone(),
            None => default_title(file_name),
        };
        required(&title, "Please provide a title for the document.")
    }

    /// Build the ingest body from the file contents.
    pub fn into_request(self, file_name: &str, text: String) -> Result<IngestRequest> {
        self.precheck(file_name)?;
        let title = self.resolved_title(file_name)?;
        let source = self
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(file_name)
            .to_string();
        let metadata = parse_metadata(self.metadata.as_deref().unwrap_or(""))?;

        Ok(IngestRequest {
            text,
            title,
            source,
            vault_id: self.vault_id.trim().to_string(),
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_message(err: Error) -> String {
        match err {
            Error::Validation(msg) => msg,
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_vault_request_trims_and_requires() {
        let req = vault_request("  Research ", " papers ").unwrap();
        assert_eq!(req.name, "Research");
        assert_eq!(req.description, "papers");

        let err = vault_request("   ", "papers").unwrap_err();
        assert_eq!(validation_message(err), "Vault name is required");
        let err = vault_request("Research", "").unwrap_err();
        assert_eq!(validation_message(err), "Vault description is required");
    }

    #[test]
    fn test_agent_request_requires_all_fields() {
        assert!(agent_request("Helper", "v1", "Answer briefly").is_ok());
        let err = agent_request("Helper", "v1", "  ").unwrap_err();
        assert_eq!(validation_message(err), "System prompt is required");
        let err = agent_request("Helper", "", "prompt").unwrap_err();
        assert_eq!(validation_message(err), "Please select a vault");
    }

    #[test]
    fn test_chat_message_validation() {
        let target = ChatTarget::Vault("v1".to_string());
        assert_eq!(chat_message("  hello ", &target).unwrap(), "hello");
        assert!(chat_message("   ", &target).is_err());
        assert!(chat_message("hello", &ChatTarget::Agent(String::new())).is_err());
    }

    #[test]
    fn test_chat_request_needs_exactly_one_target() {
        let mut req = ChatRequest::new("session_x", "hi", &ChatTarget::Vault("v1".to_string()));
        assert!(chat_request(&req).is_ok());

        req.agent_id = Some("a1".to_string());
        assert_eq!(
            validation_message(chat_request(&req).unwrap_err()),
            "Chat with either a vault or an agent, not both."
        );

        req.vault_id = None;
        assert!(chat_request(&req).is_ok());

        req.agent_id = None;
        assert_eq!(
            validation_message(chat_request(&req).unwrap_err()),
            "Please select a vault or agent to chat with."
        );
    }

    #[test]
    fn test_check_file_type() {
        assert!(check_file_type("notes.md", None).is_ok());
        assert!(check_file_type("REPORT.PDF", Some("application/pdf")).is_ok());
        assert!(check_file_type("archive.zip", None).is_err());
        assert!(check_file_type("README", None).is_err());
        assert!(check_file_type("notes.txt", Some("image/png")).is_err());
        assert!(check_file_type("notes.txt", Some("")).is_ok());
    }

    #[test]
    fn test_default_title() {
        assert_eq!(default_title("quarterly.report.pdf"), "quarterly.report");
        assert_eq!(default_title("notes.md"), "notes");
        assert_eq!(default_title(".hidden"), ".hidden");
    }

    #[test]
    fn test_parse_metadata() {
        assert_eq!(parse_metadata("  ").unwrap(), None);
        let map = parse_metadata(r#"{"author": "kim"}"#).unwrap().unwrap();
        assert_eq!(map["author"], "kim");

        let err = parse_metadata("{not json").unwrap_err();
        assert_eq!(validation_message(err), "Invalid JSON in metadata field.");
        assert!(parse_metadata("[1, 2]").is_err());
    }

    #[test]
    fn test_upload_draft_defaults() {
        let req = UploadDraft::new("v1")
            .into_request("guide.md", "# Guide".to_string())
            .unwrap();
        assert_eq!(req.title, "guide");
        assert_eq!(req.source, "guide.md");
        assert_eq!(req.vault_id, "v1");
        assert!(req.metadata.is_none());
    }

    #[test]
    fn test_upload_draft_rejects_missing_pieces() {
        let err = UploadDraft::new("").precheck("guide.md").unwrap_err();
        assert_eq!(validation_message(err), "Please select a vault.");

        let err = UploadDraft::new("v1").with_title(" ").precheck("guide.md").unwrap_err();
        assert_eq!(
            validation_message(err),
            "Please provide a title for the document."
        );

        let err = UploadDraft::new("v1").precheck("").unwrap_err();
        assert_eq!(validation_message(err), "Please select a file to upload.");

        let err = UploadDraft::new("v1")
            .with_metadata("nope")
            .into_request("guide.md", String::new())
            .unwrap_err();
        assert_eq!(validation_message(err), "Invalid JSON in metadata field.");
    }
}
