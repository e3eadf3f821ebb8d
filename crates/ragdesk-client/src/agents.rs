//! Agent resource client.

use tracing::info;

use ragdesk_core::validation;
use ragdesk_core::{Agent, AgentCreateRequest, DeleteResponse, Result};

use crate::cache::{item_key, scoped_key};
use crate::client::ClientContext;

/// `/agents` endpoints.
#[derive(Debug, Clone)]
pub struct AgentsApi {
    ctx: ClientContext,
}

impl AgentsApi {
    pub(crate) fn new(ctx: ClientContext) -> Self {
        Self { ctx }
    }

    /// `POST /agents`. Fields are validated and trimmed first.
    pub async fn create(&self, request: &AgentCreateRequest) -> Result<Agent> {
        let body =
            validation::agent_request(&request.name, &request.vault_id, &request.system_prompt)?;
        let agent: Agent = self.ctx.transport.post("/agents", &body).await?;
        // Covers the unscoped list and every `agents:vault:<id>` list.
        self.ctx.invalidate("agents");
        info!(agent_id = %agent.agent_id, vault_id = %agent.vault_id, "Agent created");
        Ok(agent)
    }

    /// `GET /agents[?vault_id=]`, cached per scope.
    pub async fn list(&self, vault_id: Option<&str>) -> Result<Vec<Agent>> {
        let key = scoped_key("agents", vault_id);
        self.ctx
            .cached_get(&key, "/agents", &[("vault_id", vault_id)])
            .await
    }

    /// `GET /agents/{id}`, cached per id.
    pub async fn get(&self, agent_id: &str) -> Result<Agent> {
        let key = item_key("agent", agent_id);
        let path = format!("/agents/{}", agent_id);
        self.ctx.cached_get(&key, &path, &[]).await
    }

    /// `DELETE /agents/{id}`.
    pub async fn delete(&self, agent_id: &str) -> Result<DeleteResponse> {
        let path = format!("/agents/{}", agent_id);
        let response: DeleteResponse = self.ctx.transport.delete(&path).await?;
        self.ctx.invalidate("agent");
        info!(agent_id, "Agent deleted");
        Ok(response)
    }
}
