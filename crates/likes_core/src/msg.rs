use crate::RunEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User asked for a full scrape, filter and download run.
    StartRequested { url: String },
    /// User asked to re-run the downloads that failed last time.
    RetryRequested,
    /// User asked to count liked items without downloading.
    CountRequested { url: String },
    /// User asked to stop the active run.
    StopRequested,
    /// Event reported by the engine for the active session.
    Engine(RunEvent),
    /// Render tick to coalesce rendering.
    Tick,
}
