//! Single-shot HTTP/1.1 download of a text resource.
//!
//! This module implements the whole network/protocol pipeline: resolve the
//! server to an IPv4 address, connect over TCP, send one GET request, read
//! and validate the response header, and stream the body to a new local file.
//!
//! # Features
//!
//! - Plain HTTP only; the server closing the connection marks the end of the body
//! - Only `200 OK` responses with a `text` Content-Type are saved
//! - Header reads accumulate across chunks until `\r\n\r\n` arrives
//! - Connect and read timeouts (30s connect, 5min per read by default)
//! - Socket and file are each closed exactly once, on every exit path
//! - Every failure maps to a distinct [`FailureCode`]
//!
//! # Example
//!
//! ```no_run
//! use textget_core::download::{DownloadConfig, Downloader, Target};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = Downloader::new(DownloadConfig::default())?;
//! let report = downloader
//!     .fetch(&Target::new("www.example.com", "index.html"))
//!     .await?;
//! println!("Downloaded {} bytes to {}", report.body_bytes, report.path.display());
//! # Ok(())
//! # }
//! ```

pub mod body;
mod config;
pub mod connector;
mod constants;
pub mod destination;
mod engine;
mod error;
pub mod header;
pub mod request;
pub mod resolver;
pub mod response;
pub mod session;

pub use config::{ConfigError, DownloadConfig, StatusMatch};
pub use constants::{
    CHUNK_SIZE, CONNECT_TIMEOUT_SECS, HTTP_PORT, MAX_HEADER_READS, MAX_REQUEST_BYTES,
    READ_TIMEOUT_SECS,
};
pub use destination::{destination_file_name, destination_path, ensure_absent};
pub use engine::{
    Dialer, DownloadReport, Downloader, FileOpener, FsOpener, Stage, Target, TcpDialer,
};
pub use error::{DownloadError, FailureCode};
pub use header::{ParsedHeader, StatusOutcome};
pub use response::ResponseHead;
pub use session::ResourceGuard;

// Note: no module-local Result alias. Use `Result<T, DownloadError>` explicitly.
