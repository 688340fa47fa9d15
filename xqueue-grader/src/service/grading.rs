//! Grading service
//!
//! The reference grader downloads every submitted file into the workspace
//! directory and then reports a fixed positive verdict. It exists so the
//! queue round trip can be exercised end to end; real graders plug in
//! through the [`Grader`] trait.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use xqueue_core::Verdict;

/// Identifier reported with every verdict of the reference grader
pub const REFERENCE_GRADER_ID: &str = "reference_dummy_grader";

/// Feedback reported with every verdict of the reference grader
pub const REFERENCE_FEEDBACK: &str = "<p><emph>Good Job!</emph></p>";

/// Service trait for grading a submission
#[async_trait]
pub trait Grader: Send + Sync {
    /// Identifier sent back as `grader_id`
    fn grader_id(&self) -> &str;

    /// Grades a submission
    ///
    /// # Arguments
    /// * `files` - Submitted files, file name -> download URL
    async fn grade(&self, files: &BTreeMap<String, String>) -> Result<Verdict>;
}

/// Reference implementation of Grader
pub struct ReferenceGrader {
    http: Client,
    workspace: PathBuf,
}

impl ReferenceGrader {
    /// Creates a reference grader downloading into `workspace`
    pub fn new(workspace: PathBuf) -> Self {
        Self {
            http: Client::new(),
            workspace,
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Downloads one file into the workspace and returns its local path.
    ///
    /// Only the last component of `name` is used, so a submission cannot
    /// write outside the workspace.
    async fn download(&self, name: &str, url: &str) -> Result<PathBuf> {
        let file_name = Path::new(name)
            .file_name()
            .ok_or_else(|| anyhow!("Invalid file name '{}'", name))?;
        let target = self.workspace.join(file_name);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download {}", url))?
            .error_for_status()
            .with_context(|| format!("Failed to download {}", url))?;

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read {}", url))?;

        tokio::fs::write(&target, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;

        debug!("Downloaded {} ({} bytes) to {}", url, bytes.len(), target.display());
        Ok(target)
    }
}

#[async_trait]
impl Grader for ReferenceGrader {
    fn grader_id(&self) -> &str {
        REFERENCE_GRADER_ID
    }

    async fn grade(&self, files: &BTreeMap<String, String>) -> Result<Verdict> {
        tokio::fs::create_dir_all(&self.workspace)
            .await
            .with_context(|| format!("Failed to create workspace {}", self.workspace.display()))?;

        for (name, url) in files {
            self.download(name, url).await?;
        }

        info!("Graded submission with {} file(s)", files.len());
        Ok(Verdict::new(true, 1u32, REFERENCE_FEEDBACK))
    }
}
