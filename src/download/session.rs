//! Ownership of the connection and destination file for one run.
//!
//! [`ResourceGuard`] holds both handles. Each close takes the handle out of
//! its slot, so a handle is closed at most once and an empty slot means
//! "already closed or never opened". [`release`](ResourceGuard::release)
//! must run before the guard goes away: dropping a guard that still holds a
//! buffered file discards unflushed bytes, so `Drop` only closes the raw
//! handles as a last resort.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use super::error::DownloadError;

/// Owner of the open connection and destination file.
#[derive(Debug)]
pub struct ResourceGuard<C, F> {
    connection: Option<C>,
    file: Option<F>,
}

impl<C, F> Default for ResourceGuard<C, F> {
    fn default() -> Self {
        Self {
            connection: None,
            file: None,
        }
    }
}

impl<C, F> ResourceGuard<C, F>
where
    C: AsyncWrite + Unpin,
    F: AsyncWrite + Unpin,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of the connection.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Internal`] if a connection is already held.
    pub fn attach_connection(&mut self, connection: C) -> Result<(), DownloadError> {
        if self.connection.is_some() {
            return Err(DownloadError::internal("connection slot already occupied"));
        }
        self.connection = Some(connection);
        Ok(())
    }

    /// Takes ownership of the destination file.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Internal`] if a file is already held.
    pub fn attach_file(&mut self, file: F) -> Result<(), DownloadError> {
        if self.file.is_some() {
            return Err(DownloadError::internal("file slot already occupied"));
        }
        self.file = Some(file);
        Ok(())
    }

    #[must_use]
    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    /// The open connection.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Internal`] if no connection is held.
    pub fn connection_mut(&mut self) -> Result<&mut C, DownloadError> {
        self.connection
            .as_mut()
            .ok_or_else(|| DownloadError::internal("no open connection"))
    }

    /// The open connection and file together, for body streaming.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Internal`] if either handle is missing.
    pub fn streams_mut(&mut self) -> Result<(&mut C, &mut F), DownloadError> {
        match (self.connection.as_mut(), self.file.as_mut()) {
            (Some(connection), Some(file)) => Ok((connection, file)),
            _ => Err(DownloadError::internal(
                "connection and file must both be open to stream",
            )),
        }
    }

    /// Shuts the connection down and closes it. No-op when none is held.
    ///
    /// The handle is dropped even if the shutdown fails.
    ///
    /// # Errors
    ///
    /// Returns the shutdown error.
    pub async fn close_connection(&mut self) -> std::io::Result<()> {
        let Some(mut connection) = self.connection.take() else {
            return Ok(());
        };
        let result = connection.shutdown().await;
        drop(connection);
        debug!("connection closed");
        result
    }

    /// Flushes and closes the file. No-op when none is held.
    ///
    /// The handle is dropped even if flushing fails.
    ///
    /// # Errors
    ///
    /// Returns the flush or shutdown error.
    pub async fn close_file(&mut self) -> std::io::Result<()> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };
        let result = match file.flush().await {
            Ok(()) => file.shutdown().await,
            Err(e) => Err(e),
        };
        drop(file);
        debug!("destination file closed");
        result
    }

    /// Closes whatever is still open: connection first, then file.
    ///
    /// Failures are logged, not returned; this runs on paths that already
    /// carry a result.
    pub async fn release(&mut self) {
        if let Err(error) = self.close_connection().await {
            warn!(%error, "failed to shut down connection cleanly");
        }
        if let Err(error) = self.close_file().await {
            warn!(%error, "failed to flush destination file");
        }
    }
}

impl<C, F> Drop for ResourceGuard<C, F> {
    fn drop(&mut self) {
        if self.connection.is_some() || self.file.is_some() {
            debug!(
                connection = self.connection.is_some(),
                file = self.file.is_some(),
                "releasing handles on drop"
            );
        }
    }
}
