//! GET request formatting and transmission.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

use super::constants::HTTP_PORT;
use super::error::DownloadError;

/// Formats the GET request for `path` on `host`.
///
/// The path is inserted verbatim after a single leading `/`. The Host header
/// carries the port only when it differs from the default HTTP port.
/// `Connection: Close` makes the server mark the end of the body by closing.
///
/// # Errors
///
/// Returns [`DownloadError::RequestTooLarge`] if the request would exceed
/// `max_bytes`.
pub fn build_request(
    host: &str,
    port: u16,
    path: &str,
    user_agent: &str,
    max_bytes: usize,
) -> Result<String, DownloadError> {
    let host_header = if port == HTTP_PORT {
        host.to_string()
    } else {
        format!("{host}:{port}")
    };

    let request = format!(
        "GET /{path} HTTP/1.1\r\n\
         User-Agent: {user_agent}\r\n\
         Accept: text/html\r\n\
         Host: {host_header}\r\n\
         Connection: Close\r\n\
         \r\n"
    );

    if request.len() > max_bytes {
        return Err(DownloadError::RequestTooLarge {
            len: request.len(),
            max: max_bytes,
        });
    }
    Ok(request)
}

/// Writes the whole request to the connection and flushes it.
///
/// # Errors
///
/// Returns [`DownloadError::Send`] if the write or flush fails.
pub async fn send_request<W>(conn: &mut W, request: &str) -> Result<(), DownloadError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    conn.write_all(request.as_bytes())
        .await
        .map_err(|source| DownloadError::Send { source })?;
    conn.flush()
        .await
        .map_err(|source| DownloadError::Send { source })?;
    trace!(bytes = request.len(), "request sent");
    Ok(())
}
