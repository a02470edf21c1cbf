//! Download pipeline orchestration.
//!
//! [`Downloader`] runs one request/response cycle through the stages
//! `Init → Resolved → Connected → RequestSent → HeaderParsed → Streaming →
//! Done`. Any stage may fail; the failure is returned unchanged and the
//! caller decides how to report it.
//!
//! The destination file is created only once the header has been accepted
//! as a `200 OK` text response, so earlier failures never leave a file
//! behind. A failure while streaming keeps the partial file.
//!
//! Both handles live in a [`ResourceGuard`] for the whole run and are closed
//! exactly once on every path.

use std::fmt;
use std::future::Future;
use std::net::SocketAddrV4;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncRead, AsyncWrite, BufWriter};
use tokio::net::TcpStream;
use tracing::{debug, info, instrument};

use super::body::stream_body;
use super::config::{ConfigError, DownloadConfig};
use super::connector;
use super::destination::destination_path;
use super::error::DownloadError;
use super::header::parse_header;
use super::request::{build_request, send_request};
use super::resolver;
use super::response::read_response_head;
use super::session::ResourceGuard;

/// What to fetch: a server name and a path on that server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Server name or IPv4 literal.
    pub host: String,
    /// Remote path, without the leading slash.
    pub path: String,
}

impl Target {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
        }
    }
}

/// Pipeline position, used for logging transitions and failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Resolved,
    Connected,
    RequestSent,
    HeaderParsed,
    Streaming,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Resolved => "resolved",
            Self::Connected => "connected",
            Self::RequestSent => "request-sent",
            Self::HeaderParsed => "header-parsed",
            Self::Streaming => "streaming",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// Where the body was written.
    pub path: PathBuf,
    /// Size of the response header, terminator included.
    pub header_bytes: usize,
    /// Number of body bytes written.
    pub body_bytes: u64,
}

/// Resolves server names and opens connections.
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Connection type produced by [`connect`](Self::connect).
    type Connection: AsyncRead + AsyncWrite + Unpin + Send;

    /// Resolves `host` to a single IPv4 address on `port`.
    async fn resolve(&self, host: &str, port: u16) -> Result<SocketAddrV4, DownloadError>;

    /// Opens a connection to `addr`.
    async fn connect(&self, addr: SocketAddrV4) -> Result<Self::Connection, DownloadError>;
}

/// Creates destination files.
#[async_trait]
pub trait FileOpener: Send + Sync {
    /// File type produced by [`create`](Self::create).
    type File: AsyncWrite + Unpin + Send;

    /// Creates a new file at `path`. Must never overwrite an existing file.
    async fn create(&self, path: &Path) -> Result<Self::File, DownloadError>;
}

/// [`Dialer`] backed by the system resolver and TCP sockets.
#[derive(Debug, Clone)]
pub struct TcpDialer {
    connect_timeout: Duration,
}

impl TcpDialer {
    #[must_use]
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait]
impl Dialer for TcpDialer {
    type Connection = TcpStream;

    async fn resolve(&self, host: &str, port: u16) -> Result<SocketAddrV4, DownloadError> {
        resolver::resolve_ipv4(host, port).await
    }

    async fn connect(&self, addr: SocketAddrV4) -> Result<TcpStream, DownloadError> {
        connector::connect(addr, self.connect_timeout).await
    }
}

/// [`FileOpener`] creating buffered files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOpener;

#[async_trait]
impl FileOpener for FsOpener {
    type File = BufWriter<File>;

    async fn create(&self, path: &Path) -> Result<BufWriter<File>, DownloadError> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    DownloadError::FileExists {
                        path: path.to_path_buf(),
                    }
                } else {
                    DownloadError::file_create(path, e)
                }
            })?;
        Ok(BufWriter::new(file))
    }
}

/// Runs the single-shot download pipeline.
#[derive(Debug, Clone)]
pub struct Downloader<D = TcpDialer, O = FsOpener> {
    config: DownloadConfig,
    dialer: D,
    opener: O,
}

impl Downloader {
    /// Creates a downloader using TCP sockets and the local filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn new(config: DownloadConfig) -> Result<Self, ConfigError> {
        let dialer = TcpDialer::new(config.connect_timeout);
        Self::with_parts(config, dialer, FsOpener)
    }
}

impl<D, O> Downloader<D, O>
where
    D: Dialer,
    O: FileOpener,
{
    /// Creates a downloader with custom dialer and file opener.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn with_parts(config: DownloadConfig, dialer: D, opener: O) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            dialer,
            opener,
        })
    }

    /// Downloads `target` into the configured output directory.
    ///
    /// # Errors
    ///
    /// Returns the [`DownloadError`] of the first stage that failed.
    pub async fn fetch(&self, target: &Target) -> Result<DownloadReport, DownloadError> {
        self.fetch_until(target, std::future::pending::<()>()).await
    }

    /// Like [`fetch`](Self::fetch), but abandons the download once
    /// `shutdown` resolves.
    ///
    /// The connection and file are still closed before returning, so body
    /// bytes received before the interruption are flushed to disk.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Interrupted`] if `shutdown` fired first,
    /// otherwise the [`DownloadError`] of the first stage that failed.
    #[instrument(skip(self, target, shutdown), fields(host = %target.host, path = %target.path))]
    pub async fn fetch_until<S>(
        &self,
        target: &Target,
        shutdown: S,
    ) -> Result<DownloadReport, DownloadError>
    where
        S: Future<Output = ()>,
    {
        let mut guard = ResourceGuard::new();
        let mut stage = Stage::Init;

        let finished = tokio::select! {
            result = self.run(target, &mut guard, &mut stage) => Some(result),
            () = shutdown => None,
        };
        let result = finished.unwrap_or_else(|| Err(DownloadError::Interrupted { stage }));
        guard.release().await;

        match &result {
            Ok(report) => info!(
                path = %report.path.display(),
                header_bytes = report.header_bytes,
                body_bytes = report.body_bytes,
                "download complete"
            ),
            Err(error) => info!(%stage, %error, "download failed"),
        }
        result
    }

    async fn run(
        &self,
        target: &Target,
        guard: &mut ResourceGuard<D::Connection, O::File>,
        stage: &mut Stage,
    ) -> Result<DownloadReport, DownloadError> {
        let config = &self.config;
        let dest = destination_path(&config.output_dir, &target.path)?;
        let request = build_request(
            &target.host,
            config.port,
            &target.path,
            &config.user_agent,
            config.max_request_bytes,
        )?;

        let addr = self.dialer.resolve(&target.host, config.port).await?;
        advance(stage, Stage::Resolved);

        let connection = self.dialer.connect(addr).await?;
        guard.attach_connection(connection)?;
        advance(stage, Stage::Connected);

        send_request(guard.connection_mut()?, &request).await?;
        advance(stage, Stage::RequestSent);

        let head = read_response_head(
            guard.connection_mut()?,
            config.chunk_size,
            config.max_header_reads,
            config.read_timeout,
        )
        .await?;
        debug!(
            reads = head.reads(),
            bytes = head.bytes().len(),
            "response head received"
        );
        let header = parse_header(head.bytes(), &target.path, config.status_match)?;
        if !header.is_text {
            return Err(DownloadError::UnsupportedType {
                content_type: header.content_type,
            });
        }
        advance(stage, Stage::HeaderParsed);

        let file = self.opener.create(&dest).await?;
        guard.attach_file(file)?;
        advance(stage, Stage::Streaming);

        let (connection, file) = guard.streams_mut()?;
        let body_bytes = stream_body(
            connection,
            head.remainder(header.header_len),
            file,
            &dest,
            config.chunk_size,
            config.read_timeout,
        )
        .await?;

        guard
            .close_file()
            .await
            .map_err(|e| DownloadError::write(&dest, e))?;
        advance(stage, Stage::Done);

        Ok(DownloadReport {
            path: dest,
            header_bytes: header.header_len,
            body_bytes,
        })
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!(from = %stage, to = %next, "stage transition");
    *stage = next;
}
