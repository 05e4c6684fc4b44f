use std::path::PathBuf;
use std::time::Duration;

use crate::ItemLink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Pending,
    Success,
    Failed,
    Skipped,
}

/// One attempt to fetch a single link of a filtered run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub index: usize,
    pub link: ItemLink,
    pub outcome: JobOutcome,
}

impl DownloadJob {
    pub fn new(index: usize, link: ItemLink) -> Self {
        Self {
            index,
            link,
            outcome: JobOutcome::Pending,
        }
    }
}

/// Snapshot handed to the progress reporter after a successful job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub rate_per_minute: f64,
}

/// End-of-run aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub total: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub cancelled: bool,
    /// Where the failed links were written, if any failed and the write succeeded.
    pub failed_links_file: Option<PathBuf>,
}

/// Bookkeeping for a single download run.
///
/// Owns one [`DownloadJob`] per link of the run; time is passed in so the state
/// stays pure. A job settles at most once, so
/// `downloaded + failed + skipped <= total` holds after every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    jobs: Vec<DownloadJob>,
    downloaded: usize,
    failed: usize,
    skipped: usize,
    series: Vec<usize>,
    cancelled: bool,
}

impl RunState {
    pub fn new(links: &[ItemLink]) -> Self {
        Self {
            jobs: links
                .iter()
                .enumerate()
                .map(|(index, link)| DownloadJob::new(index, link.clone()))
                .collect(),
            downloaded: 0,
            failed: 0,
            skipped: 0,
            series: Vec::new(),
            cancelled: false,
        }
    }

    pub fn total(&self) -> usize {
        self.jobs.len()
    }

    pub fn jobs(&self) -> &[DownloadJob] {
        &self.jobs
    }

    pub fn downloaded(&self) -> usize {
        self.downloaded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Failed links in attempt order.
    pub fn failed_links(&self) -> Vec<ItemLink> {
        self.links_with(JobOutcome::Failed)
    }

    /// Links the run never reached, in run order. Empty unless cancelled.
    pub fn pending_links(&self) -> Vec<ItemLink> {
        self.links_with(JobOutcome::Pending)
    }

    /// Cumulative downloaded count after each success, for charting.
    pub fn series(&self) -> &[usize] {
        &self.series
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Jobs that reached the downloader (skipped links never do).
    pub fn attempted(&self) -> usize {
        self.downloaded + self.failed
    }

    pub fn settled(&self) -> usize {
        self.attempted() + self.skipped
    }

    pub fn record_success(&mut self, index: usize, elapsed: Duration) -> ProgressUpdate {
        if self.settle(index, JobOutcome::Success) {
            self.downloaded += 1;
            self.series.push(self.downloaded);
        }
        ProgressUpdate {
            current: index + 1,
            total: self.total(),
            rate_per_minute: throughput_per_minute(self.downloaded, elapsed),
        }
    }

    /// Returns the updated failure count.
    pub fn record_failure(&mut self, index: usize) -> usize {
        if self.settle(index, JobOutcome::Failed) {
            self.failed += 1;
        }
        self.failed
    }

    pub fn record_skip(&mut self, index: usize) {
        if self.settle(index, JobOutcome::Skipped) {
            self.skipped += 1;
        }
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total: self.total(),
            attempted: self.attempted(),
            succeeded: self.downloaded,
            failed: self.failed,
            skipped: self.skipped,
            cancelled: self.cancelled,
            failed_links_file: None,
        }
    }

    /// Moves a pending job to `outcome`. Unknown or already settled jobs are
    /// left alone so counters never double count.
    fn settle(&mut self, index: usize, outcome: JobOutcome) -> bool {
        match self.jobs.get_mut(index) {
            Some(job) if job.outcome == JobOutcome::Pending => {
                job.outcome = outcome;
                true
            }
            _ => false,
        }
    }

    fn links_with(&self, outcome: JobOutcome) -> Vec<ItemLink> {
        self.jobs
            .iter()
            .filter(|job| job.outcome == outcome)
            .map(|job| job.link.clone())
            .collect()
    }
}

/// Items per minute; zero when no time has elapsed.
pub fn throughput_per_minute(downloaded: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    downloaded as f64 / secs * 60.0
}
