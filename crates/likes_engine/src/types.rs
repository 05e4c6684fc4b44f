use std::fmt;
use std::time::Duration;

/// Why a single fetch failed. Always per-item; never aborts a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The downloader ran and exited unsuccessfully (`None` when killed by a signal).
    ExitStatus(Option<i32>),
    /// The downloader could not be started.
    Spawn,
    Timeout(Duration),
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::ExitStatus(Some(code)) => write!(f, "exit status {code}"),
            FailureKind::ExitStatus(None) => write!(f, "terminated by signal"),
            FailureKind::Spawn => write!(f, "could not start downloader"),
            FailureKind::Timeout(limit) => write!(f, "timed out after {}s", limit.as_secs()),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
    /// Captured standard error of the downloader, when it produced any.
    pub stderr: Option<String>,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            stderr: None,
        }
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        let stderr = stderr.into();
        if !stderr.trim().is_empty() {
            self.stderr = Some(stderr);
        }
        self
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PageLoadError {
    #[error("invalid page url {url}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("page returned http status {status}")]
    HttpStatus { status: u16 },
    #[error("network error: {0}")]
    Network(String),
    #[error("page did not finish loading within {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("page driver error: {0}")]
    Driver(String),
}
