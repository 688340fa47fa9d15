//! Queue poller
//!
//! Runs one cycle at a time: log in, check the queue length, pop a single
//! submission, grade it and post the result. Every cycle is followed by a
//! fixed sleep, whatever its outcome. A shutdown request abandons the cycle in
//! flight, dropping any pending request, and stops the loop.

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info, warn};
use xqueue_core::encode_result;

use crate::config::{Config, SessionPolicy};
use crate::repository::SubmissionRepository;
use crate::service::Grader;

/// What a completed cycle did
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Nothing was popped (empty queue, or the length query failed)
    Idle,
    /// A submission was graded; `pushed` tells whether posting the result succeeded
    Graded {
        submission_id: JsonValue,
        pushed: bool,
    },
}

/// Polls a single queue and grades its submissions one by one
pub struct QueuePoller {
    config: Config,
    repository: Box<dyn SubmissionRepository>,
    grader: Arc<dyn Grader>,
}

impl QueuePoller {
    /// Creates a new queue poller
    pub fn new(
        config: Config,
        repository: Box<dyn SubmissionRepository>,
        grader: Arc<dyn Grader>,
    ) -> Self {
        Self {
            config,
            repository,
            grader,
        }
    }

    /// Runs cycles until `shutdown` turns true or its sender is dropped.
    ///
    /// A dropped sender ends the loop after the current cycle; a shutdown
    /// request ends it at once.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            "Starting queue poller (queue: {}, interval: {:?}, session: {})",
            self.config.queue_name, self.config.poll_interval, self.config.session_policy
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let outcome = tokio::select! {
                outcome = self.run_cycle() => outcome,
                _ = shutdown_requested(&mut shutdown) => {
                    info!("Shutdown requested, abandoning current cycle");
                    break;
                }
            };

            match outcome {
                Ok(CycleOutcome::Idle) => debug!("Idle cycle"),
                Ok(CycleOutcome::Graded {
                    submission_id,
                    pushed,
                }) => {
                    info!(
                        "Finished submission {} (result posted: {})",
                        submission_id, pushed
                    );
                }
                Err(e) => {
                    error!("Error during poll cycle: {:#}", e);
                    self.repository.invalidate_session();
                }
            }

            tokio::select! {
                _ = time::sleep(self.config.poll_interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Queue poller stopped");
        Ok(())
    }

    /// Performs a single cycle
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        match self.config.session_policy {
            SessionPolicy::PerCycle => {
                debug!("Logging in to queue service");
                self.repository.login().await?;
            }
            SessionPolicy::Reuse => self.repository.ensure_authenticated().await?,
        }

        let queue_name = self.config.queue_name.as_str();

        let length = match self.repository.queue_length(queue_name).await {
            Ok(length) => length,
            Err(e) => {
                warn!("Unable to get queue length: {:#}", e);
                self.repository.invalidate_session();
                return Ok(CycleOutcome::Idle);
            }
        };

        if length == 0 {
            debug!("No submissions pending in {}", queue_name);
            return Ok(CycleOutcome::Idle);
        }

        info!("{} submission(s) pending in {}", length, queue_name);

        let envelope = self.repository.pop_submission(queue_name).await?;
        let header = envelope
            .submission_header()
            .context("Submission header is malformed")?;
        let files = envelope
            .files()
            .context("Submission files are malformed")?;

        info!(
            "Grading submission {} ({} file(s))",
            header.submission_id,
            files.len()
        );

        let verdict = self
            .grader
            .grade(&files)
            .await
            .with_context(|| format!("Failed to grade submission {}", header.submission_id))?;

        let result = encode_result(
            header.submission_id.clone(),
            &header.submission_key,
            verdict.correct,
            verdict.score,
            &verdict.msg,
            self.grader.grader_id(),
        );

        let pushed = match self.repository.push_result(&result).await {
            Ok(reply) => {
                info!("Posted result for submission {}", header.submission_id);
                debug!("put_result reply: {}", reply);
                true
            }
            Err(e) => {
                warn!(
                    "Failed to post result for submission {}: {:#}",
                    header.submission_id, e
                );
                self.repository.invalidate_session();
                false
            }
        };

        Ok(CycleOutcome::Graded {
            submission_id: header.submission_id,
            pushed,
        })
    }
}

/// Resolves once shutdown is requested. Never resolves if the sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let requested = shutdown.wait_for(|stop| *stop).await.is_ok();
    if !requested {
        std::future::pending::<()>().await;
    }
}
