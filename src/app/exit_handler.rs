//! Exit code logic for the textget process.
//!
//! Single responsibility: map the download outcome to the process exit status.

use textget_core::{DownloadError, DownloadReport, FailureCode};

/// How the process ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    Success,
    Failed(FailureCode),
    Interrupted,
}

impl ProcessExit {
    pub(crate) fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failed(code) => code.code(),
            Self::Interrupted => FailureCode::Internal.code(),
        }
    }
}

/// Determines the process exit outcome from the download result.
pub(crate) fn determine_exit_outcome(
    result: &Result<DownloadReport, DownloadError>,
) -> ProcessExit {
    match result {
        Ok(_) => ProcessExit::Success,
        Err(DownloadError::Interrupted { .. }) => ProcessExit::Interrupted,
        Err(err) => ProcessExit::Failed(err.failure_code()),
    }
}
