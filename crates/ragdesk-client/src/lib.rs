//! # ragdesk-client
//!
//! Async HTTP client for the ragdesk RAG backend.
//!
//! This crate provides:
//! - A JSON transport with uniform error mapping
//! - Resource clients for vaults, agents, documents, ingestion, and chat
//! - A shared TTL cache for list/get reads with substring invalidation
//! - An ingestion status poller and an in-memory chat session
//!
//! Core types from `ragdesk-core` are re-exported at the crate root.

pub mod agents;
pub mod cache;
pub mod chat;
pub mod client;
pub mod config;
pub mod documents;
pub mod ingest;
pub mod poller;
pub mod transport;
pub mod vaults;

pub use ragdesk_core::*;

pub use agents::AgentsApi;
pub use cache::TtlCache;
pub use chat::{ChatApi, ChatMessage, ChatRole, ChatSession};
pub use client::RagClient;
pub use config::{ClientConfig, ConfigError};
pub use documents::DocumentsApi;
pub use ingest::IngestApi;
pub use poller::{IngestObserver, IngestPoller, IngestStatusSource, PollState};
pub use vaults::VaultsApi;
