//! Core domain types
//!
//! These types are shared between the queue client (which decodes and
//! encodes them) and the grader (which consumes submissions and produces
//! verdicts).

pub mod envelope;
pub mod reply;
pub mod verdict;
