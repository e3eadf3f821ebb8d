//! Chat endpoint and an in-memory conversation transcript.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use ragdesk_core::validation;
use ragdesk_core::{
    new_session_id, ChatConfig, ChatRequest, ChatResponse, ChatSource, ChatTarget, Result,
};

use crate::client::ClientContext;

/// `POST /chat`. Never cached.
#[derive(Debug, Clone)]
pub struct ChatApi {
    ctx: ClientContext,
}

impl ChatApi {
    pub(crate) fn new(ctx: ClientContext) -> Self {
        Self { ctx }
    }

    /// Send one message. The message and target are checked before the request.
    pub async fn send(&self, request: &ChatRequest) -> Result<ChatResponse> {
        validation::chat_request(request)?;

        debug!(session_id = %request.session_id, "Sending chat message");
        self.ctx.transport.post("/chat", request).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of a transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Monotonic within a session.
    pub id: u64,
    pub role: ChatRole,
    pub content: String,
    pub sources: Vec<ChatSource>,
    pub timestamp: DateTime<Utc>,
}

/// A conversation with one vault or agent.
///
/// Every message sent through a session carries the same session id. The
/// transcript lives only in memory.
#[derive(Debug)]
pub struct ChatSession {
    api: ChatApi,
    session_id: String,
    target: ChatTarget,
    config: Option<ChatConfig>,
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatSession {
    pub fn new(api: ChatApi, target: ChatTarget) -> Self {
        Self {
            api,
            session_id: new_session_id(),
            target,
            config: None,
            messages: Vec::new(),
            next_id: 1,
        }
    }

    /// Attach retrieval settings to every subsequent message.
    pub fn with_config(mut self, config: ChatConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn target(&self) -> &ChatTarget {
        &self.target
    }

    /// Switch the vault or agent. The transcript and session id are kept.
    pub fn set_target(&mut self, target: ChatTarget) {
        self.target = target;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, role: ChatRole, content: String, sources: Vec<ChatSource>) {
        self.messages.push(ChatMessage {
            id: self.next_id,
            role,
            content,
            sources,
            timestamp: Utc::now(),
        });
        self.next_id += 1;
    }

    /// Send `message` and return the assistant's reply.
    ///
    /// The user turn is appended before the request; if the request fails it
    /// is removed again and the error returned.
    pub async fn send(&mut self, message: &str) -> Result<&ChatMessage> {
        let message = validation::chat_message(message, &self.target)?;

        let mut request = ChatRequest::new(&self.session_id, message.clone(), &self.target);
        if let Some(config) = &self.config {
            request = request.with_config(config.clone());
        }

        self.push(ChatRole::User, message, Vec::new());

        match self.api.send(&request).await {
            Ok(response) => {
                self.push(ChatRole::Assistant, response.answer, response.sources);
                let reply = self.messages.len() - 1;
                Ok(&self.messages[reply])
            }
            Err(err) => {
                warn!(session_id = %self.session_id, error = %err, "Chat message failed");
                self.messages.pop();
                Err(err)
            }
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
