//! Reading the start of the response until the header is complete.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace};

use super::error::DownloadError;
use super::header::find_header_end;

/// Bytes received before body streaming starts.
///
/// Holds the complete header when the terminator arrived within the read
/// budget, plus whatever body bytes came with the last read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    bytes: Vec<u8>,
    reads: usize,
}

impl ResponseHead {
    /// All bytes received so far.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of read calls that returned data.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Bytes following `header_len`, i.e. the body already in hand.
    #[must_use]
    pub fn remainder(&self, header_len: usize) -> &[u8] {
        self.bytes.get(header_len..).unwrap_or_default()
    }
}

/// Reads `chunk_size` bytes at a time until the header terminator shows up,
/// the server closes the connection, or `max_reads` reads have been made.
///
/// With `max_reads == 1` this is a single bounded read. The caller decides
/// whether the result actually contains a complete header.
///
/// # Errors
///
/// - [`DownloadError::NoData`] if the first read returns nothing or fails.
/// - [`DownloadError::Receive`] if a later read fails.
/// - [`DownloadError::Timeout`] if any read exceeds `read_timeout`.
pub async fn read_response_head<R>(
    conn: &mut R,
    chunk_size: usize,
    max_reads: usize,
    read_timeout: Duration,
) -> Result<ResponseHead, DownloadError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut chunk = vec![0u8; chunk_size];
    let mut head = ResponseHead {
        bytes: Vec::with_capacity(chunk_size),
        reads: 0,
    };

    while head.reads < max_reads {
        let read = tokio::time::timeout(read_timeout, conn.read(&mut chunk))
            .await
            .map_err(|_| DownloadError::timeout("read", read_timeout))?;

        let count = match read {
            Ok(count) => count,
            Err(source) if head.reads == 0 => {
                return Err(DownloadError::NoData {
                    source: Some(source),
                });
            }
            Err(source) => return Err(DownloadError::Receive { source }),
        };

        if count == 0 {
            if head.reads == 0 {
                return Err(DownloadError::NoData { source: None });
            }
            debug!(bytes = head.bytes.len(), "server closed before header completed");
            break;
        }

        head.reads += 1;
        head.bytes.extend_from_slice(&chunk[..count]);
        trace!(count, total = head.bytes.len(), "read response chunk");

        if find_header_end(&head.bytes).is_some() {
            break;
        }
    }

    Ok(head)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio_test::io::Builder;

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_single_chunk_with_complete_header() {
        let mut conn = Builder::new()
            .read(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nbody")
            .build();
        let head = read_response_head(&mut conn, 1024, 16, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(head.reads(), 1);
        assert!(head.bytes().ends_with(b"body"));
    }

    #[tokio::test]
    async fn test_accumulates_until_terminator_split_across_reads() {
        let mut conn = Builder::new()
            .read(b"HTTP/1.1 200 OK\r\nContent-Type: te")
            .read(b"xt/html\r\n\r")
            .read(b"\nhello")
            .read(b"never read")
            .build();
        let head = read_response_head(&mut conn, 1024, 16, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(head.reads(), 3);
        assert_eq!(
            head.bytes(),
            b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\nhello"
        );

        // The unread chunk must remain on the connection for the body stage.
        let mut rest = Vec::new();
        conn.read_to_end(&mut rest).await.unwrap();
        assert_eq!(rest, b"never read");
    }

    #[tokio::test]
    async fn test_single_read_budget_stops_after_one_read() {
        let mut conn = Builder::new()
            .read(b"HTTP/1.1 200 OK\r\n")
            .read(b"\r\n")
            .build();
        let head = read_response_head(&mut conn, 1024, 1, TIMEOUT).await.unwrap();
        assert_eq!(head.reads(), 1);
        assert_eq!(head.bytes(), b"HTTP/1.1 200 OK\r\n");

        let mut rest = Vec::new();
        conn.read_to_end(&mut rest).await.unwrap();
        assert_eq!(rest, b"\r\n");
    }

    #[tokio::test]
    async fn test_reads_are_bounded_by_chunk_size() {
        let mut conn = Builder::new().read(b"0123456789").build();
        let head = read_response_head(&mut conn, 4, 2, TIMEOUT).await.unwrap();
        assert_eq!(head.bytes(), b"01234567");
        assert_eq!(head.reads(), 2);

        let mut rest = Vec::new();
        conn.read_to_end(&mut rest).await.unwrap();
        assert_eq!(rest, b"89");
    }

    #[tokio::test]
    async fn test_immediate_close_is_no_data() {
        let mut conn = Builder::new().build();
        let err = read_response_head(&mut conn, 1024, 16, TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::NoData { source: None }));
    }

    #[tokio::test]
    async fn test_first_read_error_is_no_data() {
        let mut conn = Builder::new()
            .read_error(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "reset",
            ))
            .build();
        let err = read_response_head(&mut conn, 1024, 16, TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::NoData { source: Some(_) }));
    }

    #[tokio::test]
    async fn test_later_read_error_is_receive_error() {
        let mut conn = Builder::new()
            .read(b"HTTP/1.1 200 OK\r\n")
            .read_error(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "reset",
            ))
            .build();
        let err = read_response_head(&mut conn, 1024, 16, TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Receive { .. }));
    }

    #[tokio::test]
    async fn test_close_before_terminator_returns_partial_head() {
        let mut conn = Builder::new().read(b"HTTP/1.1 200 OK\r\n").build();
        let head = read_response_head(&mut conn, 1024, 16, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(head.bytes(), b"HTTP/1.1 200 OK\r\n");
        assert!(find_header_end(head.bytes()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_server_times_out() {
        let mut conn = Builder::new().wait(Duration::from_secs(60)).build();
        let err = read_response_head(&mut conn, 1024, 16, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Timeout { operation: "read", .. }));
    }

    #[test]
    fn test_remainder_past_header() {
        let head = ResponseHead {
            bytes: b"HDR\r\n\r\nbody".to_vec(),
            reads: 1,
        };
        assert_eq!(head.remainder(7), b"body");
        assert_eq!(head.remainder(11), b"");
        assert_eq!(head.remainder(50), b"");
    }
}
