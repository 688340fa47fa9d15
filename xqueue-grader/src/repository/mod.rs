//! Repository layer
//!
//! Repositories abstract communication with the queue service. They provide
//! a narrow interface for the poller without any business logic.
//!
//! The repository is trait-based to enable testing and mocking.

mod submissions;

pub use submissions::HttpSubmissionRepository;
pub use submissions::SubmissionRepository;
