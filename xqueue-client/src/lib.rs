//! Xqueue HTTP Client
//!
//! A session-based client for an xqueue-style submission queue service.
//!
//! The client holds its transport configuration and the active login session
//! explicitly; there is no process-wide state. Each call returns a typed
//! [`ClientError`] that distinguishes transport failures, undecodable replies
//! and replies that report a logical failure.
//!
//! # Example
//!
//! ```no_run
//! use xqueue_client::{ClientConfig, QueueClient};
//!
//! #[tokio::main]
//! async fn main() -> xqueue_client::Result<()> {
//!     let config = ClientConfig::new("http://localhost:18040/xqueue", "grader", "secret");
//!     let mut client = QueueClient::new(config);
//!
//!     client.login().await?;
//!     let pending = client.queue_length("python").await?;
//!     println!("{} submission(s) waiting", pending);
//!     Ok(())
//! }
//! ```

pub mod error;
mod queue;
mod session;
mod transport;

#[cfg(test)]
mod test_support;

pub use error::{ClientError, ErrorKind, Result};
pub use session::Session;
pub use xqueue_core::{Envelope, Reply};

use std::fmt;
use std::time::Duration;

/// Endpoint paths, relative to the configured base URL.
///
/// The queue service routes every endpoint with a trailing slash.
pub mod endpoints {
    pub const LOGIN: &str = "login/";
    pub const GET_QUEUELEN: &str = "get_queuelen/";
    pub const GET_SUBMISSION: &str = "get_submission/";
    pub const PUT_RESULT: &str = "put_result/";
}

/// Default timeout applied to POST requests
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for the queue service
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the queue service (e.g., "http://localhost:18040/xqueue")
    base_url: String,
    pub username: String,
    pub password: String,
    /// Timeout for POST requests (GET requests have none)
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration with the default POST timeout
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the POST timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the base URL of the queue service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Client context for the queue service
///
/// Carries the configuration and at most one authenticated [`Session`].
/// Queue operations (see `queue.rs`) run on the held session and fail with
/// [`ClientError::NotAuthenticated`] when there is none.
#[derive(Debug)]
pub struct QueueClient {
    config: ClientConfig,
    session: Option<Session>,
}

impl QueueClient {
    /// Creates a client without a session
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Logs in with a fresh session, replacing any held one.
    ///
    /// On failure the client is left without a session.
    pub async fn login(&mut self) -> Result<&Session> {
        self.session = None;
        let session = Session::login(&self.config).await?;
        Ok(&*self.session.insert(session))
    }

    /// Logs in only when no session is held
    pub async fn ensure_authenticated(&mut self) -> Result<&Session> {
        if self.session.is_none() {
            self.login().await?;
        }
        self.session()
    }

    /// Drops the held session so the next `ensure_authenticated` logs in again
    pub fn invalidate_session(&mut self) {
        self.session = None;
    }

    /// Returns the active session
    pub fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(ClientError::NotAuthenticated)
    }
}
