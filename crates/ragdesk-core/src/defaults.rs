//! Centralized default constants for ragdesk.
//!
//! Both crates reference these instead of defining their own magic numbers.

// =============================================================================
// CONNECTION
// =============================================================================

/// API base URL used when nothing is configured.
pub const API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable selecting the API base URL.
pub const API_BASE_URL_ENV: &str = "RAGDESK_API_BASE_URL";

/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// CACHE
// =============================================================================

/// Maximum age of a cached read before it is refetched.
pub const CACHE_TTL_MS: u64 = 30_000;

// =============================================================================
// INGESTION
// =============================================================================

/// Interval between ingestion status checks.
pub const INGEST_POLL_INTERVAL_MS: u64 = 2_000;

/// Fallback message when a job reports `failed` without an error string.
pub const INGEST_FAILED_MESSAGE: &str = "Ingestion failed";

/// File extensions the upload flow accepts.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".pdf", ".docx", ".txt", ".md"];

/// MIME types the upload flow accepts when the caller knows one.
pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
    "text/markdown",
];

// =============================================================================
// CHAT
// =============================================================================

/// Message used by generated chat cURL snippets when none is given.
pub const CURL_CHAT_MESSAGE: &str = "Hello!";
