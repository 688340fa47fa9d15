//! Grading verdict

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Outcome of grading one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub correct: bool,
    pub score: Number,
    /// Feedback shown to the learner (HTML fragment)
    pub msg: String,
}

impl Verdict {
    pub fn new(correct: bool, score: impl Into<Number>, msg: impl Into<String>) -> Self {
        Self {
            correct,
            score: score.into(),
            msg: msg.into(),
        }
    }
}
