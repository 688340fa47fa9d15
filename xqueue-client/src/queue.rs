//! Queue operations: length, pop, push

use serde_json::Value as JsonValue;
use tracing::debug;
use xqueue_core::dto::QueueQuery;
use xqueue_core::{DecodeError, Envelope, decode_queue_item};

use crate::QueueClient;
use crate::endpoints;
use crate::error::{ClientError, Result};

impl QueueClient {
    /// Returns the number of submissions waiting in `queue_name`
    ///
    /// A reply that reports failure is a [`ClientError::SoftFailure`].
    pub async fn queue_length(&self, queue_name: &str) -> Result<u64> {
        let url = self.config.endpoint(endpoints::GET_QUEUELEN);
        let reply = self.session()?.get(&url, &query(queue_name)).await?;

        if !reply.success {
            return Err(ClientError::SoftFailure("invalid return code".to_string()));
        }

        let length = parse_length(&reply.content)?;
        debug!("Queue {} has {} pending submission(s)", queue_name, length);
        Ok(length)
    }

    /// Pops one submission from `queue_name` and decodes it
    pub async fn pop_submission(&self, queue_name: &str) -> Result<Envelope> {
        let url = self.config.endpoint(endpoints::GET_SUBMISSION);
        let reply = self.session()?.get(&url, &query(queue_name)).await?;

        if !reply.success {
            return Err(ClientError::SoftFailure(reply.content_text()));
        }

        Ok(decode_queue_item(&reply.content_text(), queue_name)?)
    }

    /// Posts a result envelope's header and body.
    ///
    /// Returns the service's raw reply body.
    pub async fn push_result(&self, envelope: &Envelope) -> Result<String> {
        let url = self.config.endpoint(endpoints::PUT_RESULT);
        self.session()?
            .post(&url, &envelope.result_form(), self.config.timeout)
            .await
    }
}

fn query(queue_name: &str) -> QueueQuery {
    QueueQuery {
        queue_name: queue_name.to_string(),
    }
}

/// The queue service sends the length as a number or a numeric string
fn parse_length(content: &JsonValue) -> std::result::Result<u64, DecodeError> {
    let parsed = match content {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| DecodeError::InvalidContent(format!("queue length {}", content)))
}
