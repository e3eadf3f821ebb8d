//! Chat session identifiers.

use uuid::Uuid;

const SESSION_PREFIX: &str = "session_";

/// Generate a new chat session id (`session_` + UUIDv7, time-ordered).
pub fn new_session_id() -> String {
    format!("{}{}", SESSION_PREFIX, Uuid::now_v7().simple())
}

/// True if `id` looks like something [`new_session_id`] produced.
pub fn is_session_id(id: &str) -> bool {
    id.strip_prefix(SESSION_PREFIX)
        .and_then(|rest| Uuid::try_parse(rest).ok())
        .is_some()
}
