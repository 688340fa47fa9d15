//! Submissions repository
//!
//! Handles communication with the queue service:
//! - Logging in (every cycle, or once and reused)
//! - Checking the queue length
//! - Popping a submission
//! - Posting a result

use anyhow::{Context, Result};
use async_trait::async_trait;
use xqueue_client::QueueClient;
use xqueue_core::Envelope;

/// Repository trait for queue operations
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Logs in with a fresh session
    async fn login(&mut self) -> Result<()>;

    /// Logs in only if no session is held
    async fn ensure_authenticated(&mut self) -> Result<()>;

    /// Forgets the held session
    fn invalidate_session(&mut self);

    /// Number of submissions waiting in `queue_name`
    async fn queue_length(&self, queue_name: &str) -> Result<u64>;

    /// Pops and decodes one submission
    async fn pop_submission(&self, queue_name: &str) -> Result<Envelope>;

    /// Posts a result envelope, returning the raw reply body
    async fn push_result(&self, envelope: &Envelope) -> Result<String>;
}

/// HTTP implementation of SubmissionRepository
pub struct HttpSubmissionRepository {
    client: QueueClient,
}

impl HttpSubmissionRepository {
    /// Creates a new HTTP submission repository
    ///
    /// # Arguments
    /// * `client` - Queue client holding the connection settings
    pub fn new(client: QueueClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubmissionRepository for HttpSubmissionRepository {
    async fn login(&mut self) -> Result<()> {
        self.client
            .login()
            .await
            .context("Failed to log in to queue service")?;
        Ok(())
    }

    async fn ensure_authenticated(&mut self) -> Result<()> {
        self.client
            .ensure_authenticated()
            .await
            .context("Failed to log in to queue service")?;
        Ok(())
    }

    fn invalidate_session(&mut self) {
        self.client.invalidate_session();
    }

    async fn queue_length(&self, queue_name: &str) -> Result<u64> {
        self.client
            .queue_length(queue_name)
            .await
            .context("Failed to get queue length")
    }

    async fn pop_submission(&self, queue_name: &str) -> Result<Envelope> {
        self.client
            .pop_submission(queue_name)
            .await
            .context("Failed to fetch submission")
    }

    async fn push_result(&self, envelope: &Envelope) -> Result<String> {
        self.client
            .push_result(envelope)
            .await
            .context("Failed to post result")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use xqueue_client::{ClientConfig, ClientError};

    async fn unreachable_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/xqueue", addr)
    }

    #[tokio::test]
    async fn test_login_connection_refused_keeps_client_error() {
        let config = ClientConfig::new(unreachable_url().await, "grader", "secret");
        let mut repository = HttpSubmissionRepository::new(QueueClient::new(config));

        let err = repository.login().await.unwrap_err();
        let client_err = err.downcast_ref::<ClientError>().unwrap();
        assert!(client_err.is_transport());
    }

    #[tokio::test]
    async fn test_queue_calls_without_login_fail() {
        let config = ClientConfig::new(unreachable_url().await, "grader", "secret");
        let repository = HttpSubmissionRepository::new(QueueClient::new(config));

        let err = repository.queue_length("python").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::NotAuthenticated)
        ));
    }
}
