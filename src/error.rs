// src/error.rs
use thiserror::Error;

/// Failure of a single (source, mode) listing fetch. Recovered by the collector.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("malformed listing body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure of the summarization call.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("missing API credential (set {var})")]
    Authentication { var: &'static str },

    #[error("summarization service error: {0}")]
    Service(#[source] anyhow::Error),
}

impl SummarizeError {
    pub fn service(e: impl Into<anyhow::Error>) -> Self {
        Self::Service(e.into())
    }
}

/// Terminal failures of a digest run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Missing {var} in environment or .env")]
    MissingCredential { var: &'static str },

    #[error(transparent)]
    Summarize(#[from] SummarizeError),

    #[error("writing roundup: {0}")]
    Output(#[source] anyhow::Error),
}

impl RunError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::MissingCredential { .. } => 2,
            RunError::Summarize(SummarizeError::Authentication { .. }) => 2,
            RunError::Summarize(_) | RunError::Output(_) => 1,
        }
    }
}
