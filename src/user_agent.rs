//! User-Agent string sent with every request.

/// Default User-Agent: tool name, crate version, and target operating system.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("textget/{version} ({})", std::env::consts::OS)
}
