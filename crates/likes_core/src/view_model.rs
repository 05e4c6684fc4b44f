use crate::{RunSummary, SessionState};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub total: usize,
    pub downloaded: usize,
    pub errors: usize,
    pub progress: Option<ProgressView>,
    pub chart: Vec<usize>,
    pub last_summary: Option<RunSummary>,
    pub last_count: Option<usize>,
    pub notices: Vec<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressView {
    pub current: usize,
    pub total: usize,
    pub rate_per_minute: f64,
}

impl ProgressView {
    /// Completed fraction in `0.0..=1.0`; zero for an empty run.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64).min(1.0)
        }
    }
}
