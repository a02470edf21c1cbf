//! Constants for the download module (port, buffer sizes, timeouts).

/// Plain HTTP port used when none is configured.
pub const HTTP_PORT: u16 = 80;

/// Bytes requested from the connection per read call.
pub const CHUNK_SIZE: usize = 1024;

/// Number of chunk reads allowed while looking for the end of the header.
pub const MAX_HEADER_READS: usize = 16;

/// Upper bound on the size of the formatted request.
pub const MAX_REQUEST_BYTES: usize = 8 * 1024;

/// Sequence separating the header block from the body.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Default connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default read timeout (5 minutes, applied to each read).
pub const READ_TIMEOUT_SECS: u64 = 300;
