//! Service layer
//!
//! Services contain the grading logic invoked by the poller.
//!
//! Graders are trait-based to enable testing and dependency injection.

mod grading;

// Re-export traits
pub use grading::Grader;

// Re-export implementations
pub use grading::ReferenceGrader;
