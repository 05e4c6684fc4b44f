/// Work the session controller asks the engine to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartRun { url: String },
    StartRetry,
    StartCount { url: String },
    /// Stop before the next job; the in-flight fetch is left to finish.
    CancelRun,
}
