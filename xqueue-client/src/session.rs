//! Login session
//!
//! A [`Session`] is an HTTP client with its own cookie jar. Logging in stores
//! the queue service's session cookie in that jar; every later GET/POST made
//! through the same `Session` carries it. There is no automatic
//! re-authentication: an expired session shows up as ordinary HTTP failures.

use reqwest::Client;
use tracing::{debug, info, warn};
use xqueue_core::decode_reply;
use xqueue_core::dto::LoginForm;

use crate::ClientConfig;
use crate::endpoints;
use crate::error::{ClientError, Result};
use crate::transport::send_with_slash_retry;

/// Authenticated session with the queue service
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
}

impl Session {
    /// Logs in with the configured credentials.
    ///
    /// The session is returned once the reply decodes; a reply that decodes
    /// but reports failure is only logged.
    pub async fn login(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        let session = Self { client };

        let url = config.endpoint(endpoints::LOGIN);
        let form = LoginForm {
            username: config.username.clone(),
            password: config.password.clone(),
        };

        debug!("Logging in to {} as {}", url, config.username);

        let (response, url) =
            send_with_slash_retry(&url, |target| session.client.post(target).form(&form)).await?;

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::from_transport(e, url))?;
        let reply = decode_reply(&body)?;

        if reply.success {
            info!("Logged in to {}", url);
        } else {
            warn!(
                "Login to {} was not acknowledged: {}",
                url,
                reply.content_text()
            );
        }

        Ok(session)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }
}
