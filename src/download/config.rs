//! Tunables for a single download run.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::constants::{
    CHUNK_SIZE, CONNECT_TIMEOUT_SECS, HTTP_PORT, MAX_HEADER_READS, MAX_REQUEST_BYTES,
    READ_TIMEOUT_SECS,
};
use crate::user_agent;

/// Where the status phrases are searched for in the response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusMatch {
    /// Substring match anywhere in the header block.
    #[default]
    Anywhere,
    /// Match only within the status line.
    StatusLine,
}

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric setting that must be positive was zero.
    #[error("`{field}` must be greater than zero")]
    Zero {
        /// Name of the offending setting.
        field: &'static str,
    },

    /// The User-Agent would break the request line framing.
    #[error("user agent must be non-empty and free of control characters")]
    InvalidUserAgent,
}

/// Settings for resolving, connecting, reading, and writing.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// TCP port to connect to.
    pub port: u16,
    /// Bytes requested per read call.
    pub chunk_size: usize,
    /// Number of reads allowed before the header terminator must have arrived.
    pub max_header_reads: usize,
    /// Maximum size of the formatted request.
    pub max_request_bytes: usize,
    /// Deadline for the TCP handshake.
    pub connect_timeout: Duration,
    /// Deadline for each individual read.
    pub read_timeout: Duration,
    /// Value sent in the User-Agent header.
    pub user_agent: String,
    /// Status phrase matching mode.
    pub status_match: StatusMatch,
    /// Directory the destination file is created in.
    pub output_dir: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            port: HTTP_PORT,
            chunk_size: CHUNK_SIZE,
            max_header_reads: MAX_HEADER_READS,
            max_request_bytes: MAX_REQUEST_BYTES,
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
            user_agent: user_agent::default_user_agent(),
            status_match: StatusMatch::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl DownloadConfig {
    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("port", usize::from(self.port)),
            ("chunk_size", self.chunk_size),
            ("max_header_reads", self.max_header_reads),
            ("max_request_bytes", self.max_request_bytes),
        ];
        if let Some((field, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Zero { field });
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::Zero {
                field: "connect_timeout",
            });
        }
        if self.read_timeout.is_zero() {
            return Err(ConfigError::Zero {
                field: "read_timeout",
            });
        }
        if self.user_agent.is_empty() || self.user_agent.chars().any(char::is_control) {
            return Err(ConfigError::InvalidUserAgent);
        }
        Ok(())
    }
}
