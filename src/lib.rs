//! Textget Core Library
//!
//! This library provides the core of the `textget` tool, a minimal
//! single-request HTTP/1.1 client that saves one text resource from a plain
//! HTTP server to a local file.
//!
//! # Architecture
//!
//! - [`download`] - resolver, connector, request builder, response reader,
//!   header parser, body streamer, and the engine that sequences them

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use download::{
    ConfigError, DownloadConfig, DownloadError, DownloadReport, Downloader, FailureCode, Stage,
    StatusMatch, Target, destination_file_name, destination_path, ensure_absent,
};
