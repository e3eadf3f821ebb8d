//! Vault resource client.

use tracing::info;

use ragdesk_core::validation;
use ragdesk_core::{DeleteResponse, Result, Vault, VaultCreateRequest};

use crate::cache::item_key;
use crate::client::ClientContext;

/// Cache key of the vault list; also the pattern invalidated on create.
const LIST_KEY: &str = "vaults";
/// Matches the list and every `vault:<id>` entry (and vault-scoped lists).
const FAMILY_PATTERN: &str = "vault";

/// `/vaults` endpoints.
#[derive(Debug, Clone)]
pub struct VaultsApi {
    ctx: ClientContext,
}

impl VaultsApi {
    pub(crate) fn new(ctx: ClientContext) -> Self {
        Self { ctx }
    }

    /// `POST /vaults`. Fields are validated and trimmed first.
    pub async fn create(&self, request: &VaultCreateRequest) -> Result<Vault> {
        let body = validation::vault_request(&request.name, &request.description)?;
        let vault: Vault = self.ctx.transport.post("/vaults", &body).await?;
        self.ctx.invalidate(LIST_KEY);
        info!(vault_id = %vault.id, name = %vault.name, "Vault created");
        Ok(vault)
    }

    /// `GET /vaults`, cached.
    pub async fn list(&self) -> Result<Vec<Vault>> {
        self.ctx.cached_get(LIST_KEY, "/vaults", &[]).await
    }

    /// `GET /vaults/{id}`, cached per id.
    pub async fn get(&self, vault_id: &str) -> Result<Vault> {
        let key = item_key("vault", vault_id);
        let path = format!("/vaults/{}", vault_id);
        self.ctx.cached_get(&key, &path, &[]).await
    }

    /// `DELETE /vaults/{id}`.
    pub async fn delete(&self, vault_id: &str) -> Result<DeleteResponse> {
        let path = format!("/vaults/{}", vault_id);
        let response: DeleteResponse = self.ctx.transport.delete(&path).await?;
        self.ctx.invalidate(FAMILY_PATTERN);
        info!(vault_id, "Vault deleted");
        Ok(response)
    }
}
