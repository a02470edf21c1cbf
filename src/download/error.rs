//! Error types for the download module.
//!
//! Every failure in the pipeline is terminal for the single request. Each
//! variant maps to one [`FailureCode`], the distinct process exit status the
//! binary reports for it.

use std::net::SocketAddrV4;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::engine::Stage;

/// Distinct process exit status for each failure kind.
///
/// Codes are negative; on Unix the shell observes them modulo 256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum FailureCode {
    /// Wrong number of command-line arguments, or an unusable path.
    InvalidArguments = -1,
    /// The formatted request would exceed the request size limit.
    RequestTooLarge = -2,
    /// The server name could not be resolved to an IPv4 address.
    Dns = -3,
    /// The server answered `404 Not Found`.
    NotFound = -4,
    /// The response header was malformed or carried an unsupported status.
    BadResponse = -5,
    /// Writing the body to the local file failed.
    Write = -6,
    /// A socket could not be allocated.
    Socket = -7,
    /// Connecting, sending, or receiving over the connection failed.
    Connect = -8,
    /// The local file could not be created.
    FileCreate = -9,
    /// The local file already exists.
    FileExists = -10,
    /// The server answered `400 Bad Request`.
    BadRequest = -11,
    /// The resource is not a text resource.
    Unsupported = -12,
    /// An internal invariant was violated or the run was interrupted.
    Internal = -13,
    /// The server closed the connection without sending anything.
    NoData = -14,
}

impl FailureCode {
    /// Returns the raw exit status value.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Errors that can occur while downloading a resource.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Name resolution failed or produced no IPv4 address.
    #[error("DNS resolution failed for {host}: {detail}")]
    Dns {
        /// The server name that failed to resolve.
        host: String,
        /// Resolver message, or a note that no IPv4 candidate was returned.
        detail: String,
    },

    /// A socket descriptor could not be allocated.
    #[error("unable to get a socket: {source}")]
    Socket {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The TCP handshake did not complete.
    #[error("unable to connect to {addr}: {source}")]
    Connect {
        /// The address that refused or failed the connection.
        addr: SocketAddrV4,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// An operation did not complete within its deadline.
    #[error("{operation} timed out after {}s", .after.as_secs())]
    Timeout {
        /// The operation that timed out (`connect` or `read`).
        operation: &'static str,
        /// The deadline that elapsed.
        after: Duration,
    },

    /// The formatted request is longer than the configured limit.
    #[error("request is {len} bytes, exceeding the {max} byte limit")]
    RequestTooLarge {
        /// Length of the request that would have been sent.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Writing the request to the connection failed.
    #[error("failed to send request: {source}")]
    Send {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The server closed the connection before sending any data.
    #[error("no data received from server")]
    NoData {
        /// The read error, when the first read failed rather than hitting EOF.
        #[source]
        source: Option<std::io::Error>,
    },

    /// Reading from the connection failed after the response had started.
    #[error("connection failed while receiving: {source}")]
    Receive {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The response header is malformed or has an unrecognized status.
    #[error("bad response from server: {reason}")]
    BadResponse {
        /// What was wrong with the response.
        reason: String,
    },

    /// The server reported `404 Not Found`.
    #[error("file not found on server: /{path}")]
    NotFound {
        /// The requested path.
        path: String,
    },

    /// The server reported `400 Bad Request`.
    #[error("server said 'bad request' for /{path}")]
    BadRequest {
        /// The requested path.
        path: String,
    },

    /// The response is not a text resource.
    #[error("the file type is not text (Content-Type: {})", .content_type.as_deref().unwrap_or("missing"))]
    UnsupportedType {
        /// The Content-Type value the server sent, if any.
        content_type: Option<String>,
    },

    /// The destination file already exists locally.
    #[error("a copy of the requested file exists locally: {path}")]
    FileExists {
        /// The destination path.
        path: PathBuf,
    },

    /// The destination file could not be created.
    #[error("error opening/creating destination file {path}: {source}")]
    FileCreate {
        /// The destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Writing to the destination file failed.
    #[error("error writing to {path}: {source}")]
    Write {
        /// The destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// An internal invariant was violated.
    #[error("unexpected internal problem: {reason}")]
    Internal {
        /// Description of the violated invariant.
        reason: String,
    },

    /// The download was abandoned on request, e.g. after Ctrl-C.
    #[error("download interrupted during {stage} stage")]
    Interrupted {
        /// Last stage reached before the interruption.
        stage: Stage,
    },
}

impl DownloadError {
    /// Creates a DNS error.
    pub fn dns(host: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Dns {
            host: host.into(),
            detail: detail.into(),
        }
    }

    /// Creates a connect error.
    #[must_use]
    pub fn connect(addr: SocketAddrV4, source: std::io::Error) -> Self {
        Self::Connect { addr, source }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(operation: &'static str, after: Duration) -> Self {
        Self::Timeout { operation, after }
    }

    /// Creates a bad response error.
    pub fn bad_response(reason: impl Into<String>) -> Self {
        Self::BadResponse {
            reason: reason.into(),
        }
    }

    /// Creates a file creation error.
    pub fn file_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a file write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Creates an internal error.
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Maps the error to the exit status reported for it.
    #[must_use]
    pub fn failure_code(&self) -> FailureCode {
        match self {
            Self::Dns { .. } => FailureCode::Dns,
            Self::Socket { .. } => FailureCode::Socket,
            Self::Connect { .. }
            | Self::Timeout { .. }
            | Self::Send { .. }
            | Self::Receive { .. } => FailureCode::Connect,
            Self::RequestTooLarge { .. } => FailureCode::RequestTooLarge,
            Self::NoData { .. } => FailureCode::NoData,
            Self::BadResponse { .. } => FailureCode::BadResponse,
            Self::NotFound { .. } => FailureCode::NotFound,
            Self::BadRequest { .. } => FailureCode::BadRequest,
            Self::UnsupportedType { .. } => FailureCode::Unsupported,
            Self::FileExists { .. } => FailureCode::FileExists,
            Self::FileCreate { .. } => FailureCode::FileCreate,
            Self::Write { .. } => FailureCode::Write,
            Self::Internal { .. } | Self::Interrupted { .. } => FailureCode::Internal,
        }
    }
}

// No From<std::io::Error> impl: every IO failure needs the stage it happened
// in (socket, connect, send, receive, create, write) to pick its variant.
