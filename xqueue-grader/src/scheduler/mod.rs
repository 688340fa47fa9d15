//! Scheduler layer for the grader
//!
//! This layer drives the polling loop: one cycle at a time, a fixed sleep
//! between cycles, and a shutdown signal checked in between.

pub mod poller;

pub use poller::QueuePoller;
