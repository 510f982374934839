use thiserror::Error;

/// Why the job feed could not be loaded.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The service answered with a non-2xx status.
    #[error("HTTP error! Status: {status}")]
    Request { status: u16 },

    /// The request never completed or the body was not a job collection.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Request,
    Transport,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Request => "request",
            FailureKind::Transport => "transport",
        }
    }
}

impl FeedError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FeedError::Request { .. } => FailureKind::Request,
            FeedError::Transport(_) => FailureKind::Transport,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FeedError::Request { status } => Some(*status),
            FeedError::Transport(err) => err.status().map(|s| s.as_u16()),
        }
    }
}
