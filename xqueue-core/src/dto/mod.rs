//! Data Transfer Objects exchanged with the queue service
//!
//! All request bodies are form-encoded; queue items arrive as a JSON object
//! whose fields are themselves JSON-encoded strings.

use serde::{Deserialize, Serialize};

/// Outer shape of a queue item as returned by `get_submission`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItemWire {
    pub xqueue_header: String,
    pub xqueue_body: String,
    pub xqueue_files: String,
}

/// Form posted to `put_result`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultForm {
    pub xqueue_header: String,
    pub xqueue_body: String,
}

/// Form posted to `login`
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Query string for `get_queuelen` and `get_submission`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueQuery {
    pub queue_name: String,
}
