use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PassChartError>;

#[derive(Debug, Error)]
pub enum PassChartError {
    /// Bad command line input, reported before any request is made.
    #[error("invalid argument: {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
    /// Connection failure or timeout.
    #[error("fetch failed (network): {0}")]
    Network(String),
    /// The service answered, but not with what we asked for.
    #[error("fetch failed (remote): {0}")]
    Remote(String),
    #[error("write failed: {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PassChartError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> PassChartError {
        PassChartError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Process exit code for this kind of failure.
    ///
    /// Invalid arguments share code 2 with clap's own usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            PassChartError::InvalidArgument { .. } => 2,
            PassChartError::Network(_) => 3,
            PassChartError::Remote(_) => 4,
            PassChartError::Io { .. } => 5,
        }
    }
}

impl From<reqwest::Error> for PassChartError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_status() {
            let status = error
                .status()
                .map(|status| status.to_string())
                .unwrap_or_else(|| "unknown status".to_owned());
            PassChartError::Remote(format!("service returned {status}"))
        } else if error.is_timeout() {
            PassChartError::Network(format!("request timed out: {error}"))
        } else {
            PassChartError::Network(error.to_string())
        }
    }
}
