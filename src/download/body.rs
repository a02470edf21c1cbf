//! Streaming the response body to the destination file.

use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use super::error::DownloadError;

/// Writes `initial` and then everything else the server sends to `dest`.
///
/// The server signals the end of the body by closing the connection; a read
/// returning zero bytes is the normal end of the transfer. Returns the number
/// of body bytes written. The destination is not flushed here.
///
/// # Errors
///
/// - [`DownloadError::Write`] if writing to `dest` fails.
/// - [`DownloadError::Receive`] if reading from the connection fails.
/// - [`DownloadError::Timeout`] if a read exceeds `read_timeout`.
pub async fn stream_body<R, W>(
    conn: &mut R,
    initial: &[u8],
    dest: &mut W,
    dest_path: &Path,
    chunk_size: usize,
    read_timeout: Duration,
) -> Result<u64, DownloadError>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    dest.write_all(initial)
        .await
        .map_err(|e| DownloadError::write(dest_path, e))?;
    let mut bytes_written = initial.len() as u64;

    let mut chunk = vec![0u8; chunk_size];
    loop {
        let count = tokio::time::timeout(read_timeout, conn.read(&mut chunk))
            .await
            .map_err(|_| DownloadError::timeout("read", read_timeout))?
            .map_err(|source| DownloadError::Receive { source })?;
        if count == 0 {
            break;
        }

        dest.write_all(&chunk[..count])
            .await
            .map_err(|e| DownloadError::write(dest_path, e))?;
        bytes_written += count as u64;
        trace!(count, bytes_written, "wrote body chunk");
    }

    Ok(bytes_written)
}
