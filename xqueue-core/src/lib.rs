//! Xqueue Core
//!
//! Core types and codecs for talking to an xqueue-style submission queue.
//!
//! This crate contains:
//! - Domain types: Envelope, Reply, Verdict
//! - DTOs: wire shapes for queue items, login and result forms
//! - The envelope codec (`decode_reply`, `decode_queue_item`, `encode_result`)

pub mod domain;
pub mod dto;
pub mod error;

pub use domain::envelope::{Envelope, SubmissionHeader, decode_queue_item, encode_result};
pub use domain::reply::{Reply, decode_reply};
pub use domain::verdict::Verdict;
pub use error::DecodeError;
