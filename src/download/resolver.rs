//! Server name resolution restricted to IPv4.

use std::net::{SocketAddr, SocketAddrV4};

use tracing::{debug, instrument};

use super::error::DownloadError;

/// Resolves `host` to the first IPv4 socket address on `port`.
///
/// Candidates are taken in the order the system resolver returns them; the
/// first IPv4 entry wins and everything else is ignored.
///
/// # Errors
///
/// Returns [`DownloadError::Dns`] when the lookup fails or yields no IPv4
/// candidate. Both cases are reported the same way.
#[instrument(level = "debug")]
pub async fn resolve_ipv4(host: &str, port: u16) -> Result<SocketAddrV4, DownloadError> {
    let candidates = tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| DownloadError::dns(host, e.to_string()))?;

    let addr = first_ipv4(candidates)
        .ok_or_else(|| DownloadError::dns(host, "could not find an IPv4 address"))?;

    debug!(%addr, "resolved server address");
    Ok(addr)
}

/// Picks the first IPv4 address in iteration order.
pub fn first_ipv4<I>(candidates: I) -> Option<SocketAddrV4>
where
    I: IntoIterator<Item = SocketAddr>,
{
    candidates.into_iter().find_map(|candidate| match candidate {
        SocketAddr::V4(v4) => Some(v4),
        SocketAddr::V6(_) => None,
    })
}
