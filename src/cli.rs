//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use textget_core::download::{
    CONNECT_TIMEOUT_SECS, DownloadConfig, HTTP_PORT, READ_TIMEOUT_SECS, StatusMatch,
};

/// Fetch a single text file from a plain HTTP server.
///
/// Connects to SERVER on port 80, requests /PATH, and saves the body in the
/// output directory under the last component of PATH. Only `200 OK`
/// responses with a text Content-Type are saved; an existing local file is
/// never overwritten.
#[derive(Parser, Debug)]
#[command(name = "textget")]
#[command(author, version, about)]
pub struct Args {
    /// Server name or IPv4 address
    pub server: String,

    /// Path of the file on the server, without the leading slash
    pub path: String,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Server TCP port
    #[arg(short, long, default_value_t = HTTP_PORT, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Directory to save the file in
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Connect timeout in seconds (1-3600)
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: u64,

    /// Timeout for each read in seconds (1-3600)
    #[arg(long, default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: u64,

    /// Only look for the status in the status line, not the whole header
    #[arg(long)]
    pub strict_status: bool,

    /// Expect the whole response header in the first read
    #[arg(long)]
    pub single_read: bool,
}

impl Args {
    /// Builds the download configuration from the parsed flags.
    pub fn download_config(&self) -> DownloadConfig {
        let defaults = DownloadConfig::default();
        DownloadConfig {
            port: self.port,
            connect_timeout: Duration::from_secs(self.connect_timeout),
            read_timeout: Duration::from_secs(self.read_timeout),
            status_match: if self.strict_status {
                StatusMatch::StatusLine
            } else {
                StatusMatch::Anywhere
            },
            max_header_reads: if self.single_read {
                1
            } else {
                defaults.max_header_reads
            },
            output_dir: self.output_dir.clone(),
            ..defaults
        }
    }
}
