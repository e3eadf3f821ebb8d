//! # ragdesk-core
//!
//! Core types and pure helpers for the ragdesk console client.
//!
//! This crate provides:
//! - Wire models for vaults, agents, documents, ingestion, and chat
//! - The error taxonomy shared by the transport and resource clients
//! - Local form validation (run before any request is built)
//! - Chat session ids and copyable cURL snippets
//!
//! It performs no I/O; see `ragdesk-client` for the HTTP side.

pub mod curl;
pub mod defaults;
pub mod error;
pub mod models;
pub mod session;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use session::new_session_id;
pub use validation::UploadDraft;
