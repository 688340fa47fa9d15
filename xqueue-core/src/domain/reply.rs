//! Reply wrapper returned by the queue service
//!
//! Every GET endpoint answers with one of two shapes:
//! - `{"return_code": 0 | 1, "content": ...}` (queue endpoints)
//! - `{"success": true | false, ...}` (internal success/failure messages)

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::DecodeError;

/// Decoded reply: a success flag plus the payload (or error message)
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub success: bool,
    pub content: JsonValue,
}

impl Reply {
    /// Returns the content as text.
    ///
    /// String content is returned as is, anything else is serialized back to JSON.
    pub fn content_text(&self) -> String {
        match &self.content {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReturnCodeShape {
    return_code: JsonValue,
    #[serde(default)]
    content: JsonValue,
}

#[derive(Debug, Deserialize)]
struct SuccessShape {
    success: JsonValue,
}

/// Decodes a raw reply body.
///
/// `ReturnCodeShape` is tried first, then `SuccessShape`. For the former the
/// payload is the `content` field; for the latter it is the whole object.
pub fn decode_reply(raw: &str) -> Result<Reply, DecodeError> {
    let value: JsonValue =
        serde_json::from_str(raw).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;

    if !value.is_object() {
        return Err(DecodeError::MissingStatus);
    }

    if let Ok(shape) = ReturnCodeShape::deserialize(&value) {
        let success = match flag_value(&shape.return_code) {
            Some(code) => code == 0,
            None => return Err(DecodeError::InvalidReturnCode),
        };
        return Ok(Reply {
            success,
            content: shape.content,
        });
    }

    if let Ok(shape) = SuccessShape::deserialize(&value) {
        let success = match flag_value(&shape.success) {
            Some(flag) => flag == 1,
            None => return Err(DecodeError::InvalidReturnCode),
        };
        return Ok(Reply {
            success,
            content: value,
        });
    }

    Err(DecodeError::MissingStatus)
}

/// Coerces a status field to 0 or 1. Booleans count as 0/1.
fn flag_value(value: &JsonValue) -> Option<u8> {
    match value {
        JsonValue::Bool(b) => Some(u8::from(*b)),
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) if f == 0.0 => Some(0),
            Some(f) if f == 1.0 => Some(1),
            _ => None,
        },
        _ => None,
    }
}
