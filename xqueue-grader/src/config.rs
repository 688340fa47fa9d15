//! Grader configuration
//!
//! Defines the queue connection settings, polling cadence and session
//! policy of the grader.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use xqueue_client::ClientConfig;

/// How the poller handles the login session between cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPolicy {
    /// Log in again at the start of every cycle
    #[default]
    PerCycle,
    /// Keep the session and log in again only after a failed call
    Reuse,
}

impl FromStr for SessionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-cycle" | "per_cycle" => Ok(Self::PerCycle),
            "reuse" => Ok(Self::Reuse),
            other => anyhow::bail!("unknown session policy '{}' (expected per-cycle or reuse)", other),
        }
    }
}

impl fmt::Display for SessionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerCycle => write!(f, "per-cycle"),
            Self::Reuse => write!(f, "reuse"),
        }
    }
}

/// Grader configuration
#[derive(Clone)]
pub struct Config {
    /// Queue service base URL (e.g., "http://localhost:18040/xqueue")
    pub xqueue_url: String,

    pub username: String,

    pub password: String,

    /// Queue to pull submissions from
    pub queue_name: String,

    /// Timeout for POST requests to the queue service
    pub timeout: Duration,

    /// Delay between two polling cycles
    pub poll_interval: Duration,

    /// Directory submission files are downloaded into
    pub workspace_dir: PathBuf,

    pub session_policy: SessionPolicy,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(
        xqueue_url: String,
        username: String,
        password: String,
        queue_name: String,
    ) -> Self {
        Self {
            xqueue_url,
            username,
            password,
            queue_name,
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_secs(2),
            workspace_dir: std::env::temp_dir().join("xqueue-grader"),
            session_policy: SessionPolicy::PerCycle,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - XQUEUE_URL (required)
    /// - XQUEUE_USERNAME (required)
    /// - XQUEUE_PASSWORD (required)
    /// - XQUEUE_QUEUE_NAME (required)
    /// - XQUEUE_TIMEOUT (optional, seconds, default: 5)
    /// - POLL_INTERVAL (optional, seconds, default: 2)
    /// - WORKSPACE_DIR (optional, default: <tmp>/xqueue-grader)
    /// - SESSION_POLICY (optional, per-cycle | reuse, default: per-cycle)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| anyhow::anyhow!("{} environment variable not set", key))
        };

        let mut config = Self::new(
            required("XQUEUE_URL")?,
            required("XQUEUE_USERNAME")?,
            required("XQUEUE_PASSWORD")?,
            required("XQUEUE_QUEUE_NAME")?,
        );

        if let Some(timeout) = lookup("XQUEUE_TIMEOUT") {
            config.timeout = parse_secs("XQUEUE_TIMEOUT", &timeout)?;
        }

        if let Some(interval) = lookup("POLL_INTERVAL") {
            config.poll_interval = parse_secs("POLL_INTERVAL", &interval)?;
        }

        if let Some(dir) = lookup("WORKSPACE_DIR") {
            config.workspace_dir = PathBuf::from(dir);
        }

        if let Some(policy) = lookup("SESSION_POLICY") {
            config.session_policy = policy.parse()?;
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.xqueue_url.is_empty() {
            anyhow::bail!("xqueue_url cannot be empty");
        }

        if !self.xqueue_url.starts_with("http://") && !self.xqueue_url.starts_with("https://") {
            anyhow::bail!("xqueue_url must start with http:// or https://");
        }

        if self.username.is_empty() {
            anyhow::bail!("username cannot be empty");
        }

        if self.queue_name.is_empty() {
            anyhow::bail!("queue_name cannot be empty");
        }

        if self.timeout.is_zero() {
            anyhow::bail!("timeout must be greater than 0");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        Ok(())
    }

    /// Connection settings for the queue client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.xqueue_url, &self.username, &self.password)
            .with_timeout(self.timeout)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("xqueue_url", &self.xqueue_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("queue_name", &self.queue_name)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .field("workspace_dir", &self.workspace_dir)
            .field("session_policy", &self.session_policy)
            .finish()
    }
}

fn parse_secs(key: &str, value: &str) -> anyhow::Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| anyhow::anyhow!("{} must be a whole number of seconds, got '{}'", key, value))
}
