use std::io;

use thiserror::Error;

/// Transport-level probe failures.
///
/// These are deliberately distinct from [`ProbeOutcome`](super::ProbeOutcome):
/// an error here means the conversation never reached a decisive reply, so
/// the caller may still try another exchanger.
#[derive(Debug, Error)]
pub enum SmtpError {
    #[error("connection failed: {source}")]
    ConnectFailed {
        #[source]
        source: io::Error,
    },
    #[error("connection lost: {source}")]
    Disconnected {
        #[source]
        source: io::Error,
    },
    #[error("protocol violation: {detail}")]
    ProtocolViolation { detail: String },
    #[error("operation timed out")]
    Timeout,
    /// The probe was abandoned because the run was cancelled.
    #[error("probe cancelled")]
    Cancelled,
}

impl SmtpError {
    pub(crate) fn connect(source: io::Error) -> Self {
        Self::ConnectFailed { source }
    }

    /// Buckets an in-session I/O error. Socket timeouts surface as
    /// `WouldBlock` on Unix and `TimedOut` on Windows; both mean the peer
    /// went quiet.
    pub(crate) fn from_io(source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::Timeout,
            io::ErrorKind::InvalidData => Self::ProtocolViolation {
                detail: source.to_string(),
            },
            _ => Self::Disconnected { source },
        }
    }
}
