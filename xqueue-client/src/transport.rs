//! Authenticated GET/POST against the queue service
//!
//! Every call goes through [`send_with_slash_retry`]: the queue service
//! sometimes answers 500 on a URL ending in `/`, and the same request against
//! the URL without the slash succeeds. That retry happens once, on the same
//! session; nothing else is retried here.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use xqueue_core::{Reply, decode_reply};

use crate::error::{ClientError, Result};
use crate::session::Session;

impl Session {
    /// Issues a GET and decodes the reply envelope.
    ///
    /// No timeout is applied.
    pub async fn get<Q>(&self, url: &str, params: &Q) -> Result<Reply>
    where
        Q: Serialize + ?Sized,
    {
        let (response, url) =
            send_with_slash_retry(url, |target| self.http().get(target).query(params)).await?;

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::from_transport(e, url))?;

        Ok(decode_reply(&body)?)
    }

    /// Issues a form POST and returns the raw response body.
    ///
    /// Unlike [`Session::get`], the body is not decoded as a reply envelope.
    pub async fn post<F>(&self, url: &str, fields: &F, timeout: Duration) -> Result<String>
    where
        F: Serialize + ?Sized,
    {
        let (response, url) = send_with_slash_retry(url, |target| {
            self.http().post(target).form(fields).timeout(timeout)
        })
        .await?;

        response
            .text()
            .await
            .map_err(|e| ClientError::from_transport(e, url))
    }
}

/// Sends the request built for `url`; on a 500 for a `/`-terminated URL,
/// sends it once more for the URL without the slash.
///
/// Returns the successful response together with the URL that produced it.
pub(crate) async fn send_with_slash_retry<'u, B>(
    url: &'u str,
    build: B,
) -> Result<(Response, &'u str)>
where
    B: Fn(&str) -> RequestBuilder,
{
    let response = send(build(url), url).await?;

    let (response, url) = match url.strip_suffix('/') {
        Some(stripped) if response.status() == StatusCode::INTERNAL_SERVER_ERROR => {
            debug!("{} answered 500, retrying as {}", url, stripped);
            (send(build(stripped), stripped).await?, stripped)
        }
        _ => (response, url),
    };

    let status = response.status();
    if !status.is_success() {
        warn!("{} returned status {}", url, status.as_u16());
        return Err(ClientError::unexpected_status(status.as_u16(), url));
    }

    Ok((response, url))
}

async fn send(request: RequestBuilder, url: &str) -> Result<Response> {
    request
        .send()
        .await
        .map_err(|e| ClientError::from_transport(e, url))
}
