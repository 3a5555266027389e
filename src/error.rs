// SPDX-License-Identifier: MIT

//! Common error type.

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report stream error: {0}")]
    Io(#[from] std::io::Error),

    #[error("judge session was not started")]
    NotStarted,

    #[error("judge session needs at least one step")]
    ZeroSteps,

    #[error("invalid submit id: {0:?}")]
    InvalidSubmitId(String),

    #[error("invalid message type: {0:?}")]
    InvalidTag(String),

    #[error("malformed status line: {0}")]
    Malformed(String),

    #[error("invalid reporter configuration: {0}")]
    Config(String),
}

impl From<ReportError> for std::io::Error {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::Io(e) => e,
            e @ ReportError::NotStarted => std::io::Error::other(e),
            e @ (ReportError::ZeroSteps
            | ReportError::InvalidSubmitId(_)
            | ReportError::InvalidTag(_)
            | ReportError::Config(_)) => {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
            }
            e @ ReportError::Malformed(_) => std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        }
    }
}
