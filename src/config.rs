use serde::{Deserialize, Serialize};

use crate::error::{MailwayError, Result};
use crate::utils::get_env_with_prefix;

/// Main configuration for a mailway engine
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub smtp: SmtpConfig,
    pub dispatch: DispatchConfig,
}

impl Config {
    /// Load the full configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            smtp: SmtpConfig::from_env()?,
            dispatch: DispatchConfig::from_env(),
        })
    }
}

/// SMTP configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    /// SMTP server hostname
    pub host: String,
    /// SMTP server port (default: 587 for STARTTLS)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Username for authentication
    #[serde(default)]
    pub username: Option<String>,
    /// Password for authentication
    #[serde(default)]
    pub password: Option<String>,
    /// Envelope sender ("from" address) stamped on every outbound message
    pub sender: String,
    /// Use STARTTLS (default: true)
    #[serde(default = "default_starttls")]
    pub starttls: bool,
    /// Dial/send timeout in seconds (default: 10)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl SmtpConfig {
    /// Create a new SMTP configuration with the server hostname and sender address
    pub fn new(host: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            username: None,
            password: None,
            sender: sender.into(),
            starttls: default_starttls(),
            timeout_seconds: default_timeout_seconds(),
        }
    }

    /// Set the port (default: 587)
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set authentication credentials
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Disable STARTTLS (use plain connection or implicit TLS)
    pub fn no_starttls(mut self) -> Self {
        self.starttls = false;
        self
    }

    /// Set the dial/send timeout in seconds
    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Create config from environment variables
    ///
    /// Reads from:
    /// - `SMTP_HOST` (required)
    /// - `SMTP_FROM` (required)
    /// - `SMTP_PORT` (optional, default: 587)
    /// - `SMTP_USERNAME` (optional)
    /// - `SMTP_PASSWORD` (optional)
    /// - `SMTP_STARTTLS` (optional, default: true)
    /// - `SMTP_TIMEOUT_SECONDS` (optional, default: 10)
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("SMTP_HOST")
            .map_err(|_| MailwayError::internal("SMTP_HOST environment variable not set"))?;

        let sender = std::env::var("SMTP_FROM")
            .map_err(|_| MailwayError::internal("SMTP_FROM environment variable not set"))?;

        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);

        let username = std::env::var("SMTP_USERNAME").ok();
        let password = std::env::var("SMTP_PASSWORD").ok();
        let starttls = std::env::var("SMTP_STARTTLS")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);
        let timeout_seconds = std::env::var("SMTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or_else(default_timeout_seconds);

        Ok(Self {
            host,
            port,
            username,
            password,
            sender,
            starttls,
            timeout_seconds,
        })
    }
}

/// Configuration for the dispatch engine: worker pool, queue and retry policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Number of concurrent workers draining the queue
    #[serde(default = "default_worker_count")]
    pub workers: usize,

    /// Maximum number of jobs the queue holds before submissions fail fast
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Maximum number of retries for a failed delivery
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base retry delay in seconds; the Nth retry waits N times this long
    #[serde(default = "default_retry_delay_seconds")]
    pub retry_delay_seconds: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: default_worker_count(),
            queue_capacity: default_queue_capacity(),
            max_retries: default_max_retries(),
            retry_delay_seconds: default_retry_delay_seconds(),
        }
    }
}

impl DispatchConfig {
    /// Set the worker count
    pub fn workers(mut self, count: usize) -> Self {
        self.workers = count;
        self
    }

    /// Set the queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the maximum retry count
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base retry delay in seconds
    pub fn retry_delay_seconds(mut self, seconds: u64) -> Self {
        self.retry_delay_seconds = seconds;
        self
    }

    /// Load dispatch configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(count) = get_env_with_prefix("WORKER_COUNT") {
            if let Ok(c) = count.parse() {
                config.workers = c;
            }
        }

        if let Some(capacity) = get_env_with_prefix("QUEUE_CAPACITY") {
            if let Ok(c) = capacity.parse() {
                config.queue_capacity = c;
            }
        }

        if let Some(retries) = get_env_with_prefix("MAX_RETRIES") {
            if let Ok(r) = retries.parse() {
                config.max_retries = r;
            }
        }

        if let Some(delay) = get_env_with_prefix("RETRY_DELAY_SECONDS") {
            if let Ok(d) = delay.parse() {
                config.retry_delay_seconds = d;
            }
        }

        config
    }
}

fn default_port() -> u16 {
    587
}

fn default_starttls() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_worker_count() -> usize {
    5
}

fn default_queue_capacity() -> usize {
    1000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_seconds() -> u64 {
    60
}
