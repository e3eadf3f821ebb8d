//! Ingestion submission and status.

use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

use ragdesk_core::validation::{check_file_type, UploadDraft};
use ragdesk_core::{Error, IngestRequest, IngestResponse, IngestState, IngestStatus, Result};

use crate::client::ClientContext;
use crate::documents::DOCUMENTS_PATTERN;
use crate::poller::IngestStatusSource;

/// `/ingest` endpoints. Nothing here is cached.
#[derive(Debug, Clone)]
pub struct IngestApi {
    ctx: ClientContext,
}

impl IngestApi {
    pub(crate) fn new(ctx: ClientContext) -> Self {
        Self { ctx }
    }

    /// `POST /ingest`. Returns the document and task ids of the queued job.
    pub async fn submit(&self, request: &IngestRequest) -> Result<IngestResponse> {
        if request.vault_id.trim().is_empty() {
            return Err(Error::Validation("Please select a vault.".to_string()));
        }
        if request.title.trim().is_empty() {
            return Err(Error::Validation(
                "Please provide a title for the document.".to_string(),
            ));
        }

        let response: IngestResponse = self.ctx.transport.post("/ingest", request).await?;
        self.ctx.invalidate(DOCUMENTS_PATTERN);
        info!(
            task_id = %response.task_id,
            document_id = %response.document_id,
            vault_id = %request.vault_id,
            "Ingestion submitted"
        );
        Ok(response)
    }

    /// Read a local file as text (lossy UTF-8) and submit it.
    ///
    /// The file name and type are checked before the file is read; `mime_type`
    /// is checked too when the caller knows it.
    pub async fn upload_file(
        &self,
        path: &Path,
        mime_type: Option<&str>,
        draft: UploadDraft,
    ) -> Result<IngestResponse> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();

        draft.precheck(&file_name)?;
        check_file_type(&file_name, mime_type)?;

        // Binary formats are sent as text; invalid UTF-8 becomes U+FFFD.
        let bytes = tokio::fs::read(path).await?;
        debug!(file_name = %file_name, bytes = bytes.len(), "Read upload file");
        let text = String::from_utf8_lossy(&bytes).into_owned();

        let request = draft.into_request(&file_name, text)?;
        self.submit(&request).await
    }

    /// `GET /ingest/status/{task_id}`.
    pub async fn status(&self, task_id: &str) -> Result<IngestStatus> {
        let path = format!("/ingest/status/{}", task_id);
        let status: IngestStatus = self.ctx.transport.get(&path, &[]).await?;
        if status.status == IngestState::Done {
            self.ctx.invalidate(DOCUMENTS_PATTERN);
        }
        Ok(status)
    }
}

#[async_trait]
impl IngestStatusSource for IngestApi {
    async fn ingest_status(&self, task_id: &str) -> Result<IngestStatus> {
        self.status(task_id).await
    }
}
