//! TCP connection establishment.

use std::net::{SocketAddr, SocketAddrV4};
use std::time::Duration;

use tokio::net::{TcpSocket, TcpStream};
use tracing::{debug, instrument};

use super::error::DownloadError;

/// Opens a TCP connection to `addr`, giving up after `timeout`.
///
/// A failed handshake is always an error; nothing is ever sent over a socket
/// whose connect attempt did not succeed.
///
/// # Errors
///
/// - [`DownloadError::Socket`] if the socket cannot be allocated.
/// - [`DownloadError::Connect`] if the handshake fails.
/// - [`DownloadError::Timeout`] if the handshake does not finish in time.
#[instrument(level = "debug", skip(timeout))]
pub async fn connect(addr: SocketAddrV4, timeout: Duration) -> Result<TcpStream, DownloadError> {
    let socket = TcpSocket::new_v4().map_err(|source| DownloadError::Socket { source })?;

    let stream = tokio::time::timeout(timeout, socket.connect(SocketAddr::V4(addr)))
        .await
        .map_err(|_| DownloadError::timeout("connect", timeout))?
        .map_err(|source| DownloadError::connect(addr, source))?;

    debug!(%addr, "connected");
    Ok(stream)
}
