//! Submission envelope
//!
//! The queue service exchanges submissions and results as a triple of
//! JSON-encoded strings (header, body, files). An [`Envelope`] always holds
//! three valid JSON documents; the constructors below are the only way to
//! build one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as JsonValue};
use std::collections::BTreeMap;

use crate::dto::{QueueItemWire, ResultForm};
use crate::error::DecodeError;

/// Header, body and files of a submission, each stored as JSON text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    header: String,
    body: String,
    files: String,
}

/// Identity of a submission as carried in the envelope header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionHeader {
    /// Submission id; the queue service uses integers, but any JSON value is kept verbatim
    pub submission_id: JsonValue,
    pub submission_key: String,
    /// Set on items popped from a queue, absent on outgoing results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResultBody<'a> {
    msg: &'a str,
    correct: bool,
    score: &'a Number,
    grader_id: &'a str,
}

impl Envelope {
    /// Builds an envelope from already-parsed JSON values
    pub fn from_values(header: &JsonValue, body: &JsonValue, files: &JsonValue) -> Self {
        Self {
            header: header.to_string(),
            body: body.to_string(),
            files: files.to_string(),
        }
    }

    pub fn header_json(&self) -> &str {
        &self.header
    }

    pub fn body_json(&self) -> &str {
        &self.body
    }

    pub fn files_json(&self) -> &str {
        &self.files
    }

    /// Parses the header into the submission identity
    pub fn submission_header(&self) -> Result<SubmissionHeader, DecodeError> {
        serde_json::from_str(&self.header)
            .map_err(|e| DecodeError::MalformedItem(format!("xqueue_header: {}", e)))
    }

    /// Parses the files mapping (file name -> download URL)
    pub fn files(&self) -> Result<BTreeMap<String, String>, DecodeError> {
        serde_json::from_str(&self.files)
            .map_err(|e| DecodeError::MalformedItem(format!("xqueue_files: {}", e)))
    }

    /// Returns the outer object the queue service hands out for a submission
    pub fn to_wire(&self) -> QueueItemWire {
        QueueItemWire {
            xqueue_header: self.header.clone(),
            xqueue_body: self.body.clone(),
            xqueue_files: self.files.clone(),
        }
    }

    /// Returns the form fields posted to `put_result`
    pub fn result_form(&self) -> ResultForm {
        ResultForm {
            xqueue_header: self.header.clone(),
            xqueue_body: self.body.clone(),
        }
    }
}

/// Decodes a queue item popped from `queue_name`.
///
/// Each of the three inner fields must itself be JSON, and the header must be
/// an object; `queue_name` is injected into it. All fields are re-encoded so
/// the result is normalized regardless of the sender's formatting.
pub fn decode_queue_item(raw: &str, queue_name: &str) -> Result<Envelope, DecodeError> {
    let wire: QueueItemWire =
        serde_json::from_str(raw).map_err(|e| DecodeError::MalformedItem(e.to_string()))?;

    let mut header = match parse_field("xqueue_header", &wire.xqueue_header)? {
        JsonValue::Object(map) => map,
        _ => {
            return Err(DecodeError::MalformedItem(
                "xqueue_header is not an object".to_string(),
            ));
        }
    };
    header.insert(
        "queue_name".to_string(),
        JsonValue::String(queue_name.to_string()),
    );

    let body = parse_field("xqueue_body", &wire.xqueue_body)?;
    let files = parse_field("xqueue_files", &wire.xqueue_files)?;

    Ok(Envelope::from_values(
        &JsonValue::Object(header),
        &body,
        &files,
    ))
}

/// Builds the result envelope posted back for a graded submission
pub fn encode_result(
    submission_id: JsonValue,
    submission_key: &str,
    correct: bool,
    score: Number,
    feedback: &str,
    grader_id: &str,
) -> Envelope {
    let header = SubmissionHeader {
        submission_id,
        submission_key: submission_key.to_string(),
        queue_name: None,
    };
    let body = ResultBody {
        msg: feedback,
        correct,
        score: &score,
        grader_id,
    };

    // Both structs only hold JSON-native fields, so conversion cannot fail.
    let header = serde_json::to_value(&header).unwrap_or(JsonValue::Null);
    let body = serde_json::to_value(&body).unwrap_or(JsonValue::Null);

    Envelope::from_values(&header, &body, &JsonValue::Object(Map::new()))
}

fn parse_field(name: &str, text: &str) -> Result<JsonValue, DecodeError> {
    serde_json::from_str(text).map_err(|e| DecodeError::MalformedItem(format!("{}: {}", name, e)))
}
