use crate::view_model::{AppViewModel, ProgressView};
use crate::RunSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    /// Scrape, filter or download work is in progress.
    Running,
    /// Stop requested; waiting for the in-flight job to settle.
    Stopping,
    Counting,
}

impl SessionState {
    pub fn is_busy(self) -> bool {
        self != SessionState::Idle
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    session: SessionState,
    total: usize,
    downloaded: usize,
    errors: usize,
    progress: Option<ProgressView>,
    chart: Vec<usize>,
    last_summary: Option<RunSummary>,
    last_count: Option<usize>,
    notices: Vec<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session,
            total: self.total,
            downloaded: self.downloaded,
            errors: self.errors,
            progress: self.progress,
            chart: self.chart.clone(),
            last_summary: self.last_summary.clone(),
            last_count: self.last_count,
            notices: self.notices.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn begin(&mut self, session: SessionState) {
        self.session = session;
        self.total = 0;
        self.downloaded = 0;
        self.errors = 0;
        self.progress = None;
        self.chart.clear();
        self.notices.clear();
        self.mark_dirty();
    }

    pub(crate) fn request_stop(&mut self) {
        self.session = SessionState::Stopping;
        self.mark_dirty();
    }

    pub(crate) fn push_notice(&mut self, notice: impl Into<String>) {
        self.notices.push(notice.into());
        self.mark_dirty();
    }

    pub(crate) fn apply_stats(&mut self, total: usize, downloaded: usize, errors: usize) {
        self.total = total;
        self.downloaded = downloaded;
        self.errors = errors;
        self.mark_dirty();
    }

    pub(crate) fn apply_progress(&mut self, progress: ProgressView) {
        self.progress = Some(progress);
        self.mark_dirty();
    }

    pub(crate) fn apply_chart(&mut self, series: Vec<usize>) {
        self.chart = series;
        self.mark_dirty();
    }

    pub(crate) fn finish_run(&mut self, summary: RunSummary) {
        self.last_summary = Some(summary);
        self.session = SessionState::Idle;
        self.mark_dirty();
    }

    pub(crate) fn finish_count(&mut self, count: usize) {
        self.last_count = Some(count);
        self.session = SessionState::Idle;
        self.mark_dirty();
    }

    pub(crate) fn abort(&mut self, reason: String) {
        self.notices.push(reason);
        self.session = SessionState::Idle;
        self.mark_dirty();
    }
}
