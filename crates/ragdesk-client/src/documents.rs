//! Document resource client.

use tracing::info;

use ragdesk_core::{DeleteResponse, Document, Result};

use crate::cache::scoped_key;
use crate::client::ClientContext;

/// Pattern invalidated whenever the set of documents may have changed.
pub(crate) const DOCUMENTS_PATTERN: &str = "documents";

/// `/documents` endpoints. Documents are created through ingestion.
#[derive(Debug, Clone)]
pub struct DocumentsApi {
    ctx: ClientContext,
}

impl DocumentsApi {
    pub(crate) fn new(ctx: ClientContext) -> Self {
        Self { ctx }
    }

    /// `GET /documents[?vault_id=]`, cached per scope.
    pub async fn list(&self, vault_id: Option<&str>) -> Result<Vec<Document>> {
        let key = scoped_key(DOCUMENTS_PATTERN, vault_id);
        self.ctx
            .cached_get(&key, "/documents", &[("vault_id", vault_id)])
            .await
    }

    /// `DELETE /documents/{id}`.
    pub async fn delete(&self, document_id: &str) -> Result<DeleteResponse> {
        let path = format!("/documents/{}", document_id);
        let response: DeleteResponse = self.ctx.transport.delete(&path).await?;
        self.ctx.invalidate(DOCUMENTS_PATTERN);
        info!(document_id, "Document deleted");
        Ok(response)
    }
}
