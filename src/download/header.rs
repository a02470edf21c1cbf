//! Response header validation.
//!
//! Parsing is a pure function of the received bytes: it never touches the
//! connection and never ends the process. Every rejection comes back as a
//! [`DownloadError`] for the engine to act on.
//!
//! Status detection searches for the reference phrases `404 Not Found`,
//! `400 Bad Request` and `200 OK`, in that order. By default the search
//! covers the whole header block; [`StatusMatch::StatusLine`] restricts it
//! to the first line.

use std::borrow::Cow;

use super::config::StatusMatch;
use super::constants::HEADER_TERMINATOR;
use super::error::DownloadError;

const NOT_FOUND: &str = "404 Not Found";
const BAD_REQUEST: &str = "400 Bad Request";
const OK: &str = "200 OK";

/// Status classification of a response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    /// `200 OK`
    Ok,
    /// `404 Not Found`
    NotFound,
    /// `400 Bad Request`
    BadRequest,
    /// None of the recognized phrases.
    Unrecognized,
}

/// A validated `200 OK` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    /// Header length in bytes, terminator included. Body bytes start here.
    pub header_len: usize,
    /// Whether the Content-Type value begins with `text`.
    pub is_text: bool,
    /// The Content-Type value, if the header has one.
    pub content_type: Option<String>,
}

/// Returns the offset just past the first `\r\n\r\n`, if present.
#[must_use]
pub fn find_header_end(bytes: &[u8]) -> Option<usize> {
    bytes
        .windows(HEADER_TERMINATOR.len())
        .position(|window| window == HEADER_TERMINATOR)
        .map(|pos| pos + HEADER_TERMINATOR.len())
}

/// Classifies the status phrases found in `header`.
#[must_use]
pub fn classify_status(header: &str, mode: StatusMatch) -> StatusOutcome {
    let haystack = match mode {
        StatusMatch::Anywhere => header,
        StatusMatch::StatusLine => header.split("\r\n").next().unwrap_or_default(),
    };

    if haystack.contains(NOT_FOUND) {
        StatusOutcome::NotFound
    } else if haystack.contains(BAD_REQUEST) {
        StatusOutcome::BadRequest
    } else if haystack.contains(OK) {
        StatusOutcome::Ok
    } else {
        StatusOutcome::Unrecognized
    }
}

/// Finds the Content-Type field value. Field names compare case-insensitively.
#[must_use]
pub fn content_type(header: &str) -> Option<&str> {
    header.split("\r\n").skip(1).find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("content-type")
            .then(|| value.trim())
    })
}

fn is_text_type(value: &str) -> bool {
    value
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("text"))
}

/// Validates the header at the start of `bytes`.
///
/// `path` is only used to give not-found and bad-request errors context.
///
/// # Errors
///
/// - [`DownloadError::BadResponse`] for empty input, a missing terminator,
///   or an unrecognized status.
/// - [`DownloadError::NotFound`] for `404 Not Found`.
/// - [`DownloadError::BadRequest`] for `400 Bad Request`.
pub fn parse_header(
    bytes: &[u8],
    path: &str,
    mode: StatusMatch,
) -> Result<ParsedHeader, DownloadError> {
    if bytes.is_empty() {
        return Err(DownloadError::bad_response("empty response"));
    }
    let header_len = find_header_end(bytes)
        .ok_or_else(|| DownloadError::bad_response("invalid HTTP header: no end of header"))?;

    let header: Cow<'_, str> =
        String::from_utf8_lossy(&bytes[..header_len - HEADER_TERMINATOR.len()]);

    match classify_status(&header, mode) {
        StatusOutcome::Ok => {}
        StatusOutcome::NotFound => {
            return Err(DownloadError::NotFound {
                path: path.to_string(),
            });
        }
        StatusOutcome::BadRequest => {
            return Err(DownloadError::BadRequest {
                path: path.to_string(),
            });
        }
        StatusOutcome::Unrecognized => {
            let status_line = header.split("\r\n").next().unwrap_or_default();
            return Err(DownloadError::bad_response(format!(
                "unsupported header code: {status_line}"
            )));
        }
    }

    let content_type = content_type(&header).map(str::to_string);
    Ok(ParsedHeader {
        header_len,
        is_text: content_type.as_deref().is_some_and(is_text_type),
        content_type,
    })
}
