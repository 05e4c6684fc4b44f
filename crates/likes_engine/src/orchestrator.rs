use std::path::PathBuf;
use std::time::Instant;

use engine_logging::{engine_error, engine_info, engine_warn};
use likes_core::{ItemLink, RunEvent, RunState, RunSummary, SiteProfile};
use tokio_util::sync::CancellationToken;

use crate::{Fetcher, LinkStore, ProgressSink};

/// Downloads a filtered run one link at a time.
///
/// Cancellation is checked only between jobs; a fetch that already started is
/// allowed to finish. Per-item failures never stop the run.
pub struct DownloadOrchestrator<'a> {
    site: &'a SiteProfile,
    store: &'a LinkStore,
    keep_unreached: bool,
}

impl<'a> DownloadOrchestrator<'a> {
    pub fn new(site: &'a SiteProfile, store: &'a LinkStore) -> Self {
        Self {
            site,
            store,
            keep_unreached: false,
        }
    }

    /// On a stopped run, links never reached are kept in the failed list
    /// after the new failures. Used when the run itself replays that list.
    pub fn keep_unreached_on_stop(mut self) -> Self {
        self.keep_unreached = true;
        self
    }

    pub async fn run(
        &self,
        links: &[ItemLink],
        fetcher: &dyn Fetcher,
        cancel: &CancellationToken,
        sink: &dyn ProgressSink,
    ) -> RunSummary {
        let mut state = RunState::new(links);
        let started = Instant::now();
        sink.emit(RunEvent::info("Starting downloads..."));

        for (index, link) in links.iter().enumerate() {
            if cancel.is_cancelled() {
                state.mark_cancelled();
                engine_info!("Run cancelled before job {}", index);
                sink.emit(RunEvent::warn("Download manually stopped."));
                break;
            }

            if !self.site.is_dispatchable(link) {
                state.record_skip(index);
                engine_warn!("Skipping invalid URL: {}", link);
                sink.emit(RunEvent::warn(format!("Skipping invalid URL: {link}")));
                continue;
            }

            sink.emit(RunEvent::info(format!("Downloading: {link}")));
            match fetcher.fetch(link).await {
                Ok(()) => {
                    let progress = state.record_success(index, started.elapsed());
                    sink.emit(RunEvent::StatsChanged {
                        total: state.total(),
                        downloaded: state.downloaded(),
                        errors: state.failed(),
                    });
                    sink.emit(RunEvent::Progress {
                        current: progress.current,
                        total: progress.total,
                        rate_per_minute: progress.rate_per_minute,
                    });
                    sink.emit(RunEvent::ChartPoint(state.series().to_vec()));
                }
                Err(err) => {
                    let errors = state.record_failure(index);
                    sink.emit(RunEvent::StatsChanged {
                        total: state.total(),
                        downloaded: state.downloaded(),
                        errors,
                    });
                    if let Some(stderr) = &err.stderr {
                        sink.emit(RunEvent::error(stderr.clone()));
                    }
                    engine_warn!("Fetch failed for {}: {}", link, err);
                    sink.emit(RunEvent::error(format!("Failed: {link}: {err}")));
                }
            }
        }

        let mut summary = state.summary();
        summary.failed_links_file = self.record_failures(&state, sink);
        engine_info!(
            "Run finished: {} attempted, {} succeeded, {} failed, {} skipped{}",
            summary.attempted,
            summary.succeeded,
            summary.failed,
            summary.skipped,
            if summary.cancelled { " (cancelled)" } else { "" }
        );
        sink.emit(RunEvent::info(format!(
            "Done: {} attempted | {} downloaded | {} failed",
            summary.attempted, summary.succeeded, summary.failed
        )));
        sink.emit(RunEvent::Finished(summary.clone()));
        summary
    }

    /// Writes the failed list when non-empty; a clean, complete run clears any
    /// stale list from an earlier run.
    fn record_failures(&self, state: &RunState, sink: &dyn ProgressSink) -> Option<PathBuf> {
        let failed = state.failed_links();
        let mut kept = failed.clone();
        if self.keep_unreached && state.is_cancelled() {
            kept.extend(state.pending_links());
        }

        if kept.is_empty() {
            if !state.is_cancelled() {
                if let Err(err) = self.store.clear_failed() {
                    engine_error!("Could not remove stale failed list: {}", err);
                }
            }
            return None;
        }

        match self.store.write_failed(&kept) {
            Ok(path) => {
                if !failed.is_empty() {
                    sink.emit(RunEvent::warn(format!(
                        "{} downloads failed. See {}",
                        failed.len(),
                        path.display()
                    )));
                }
                if kept.len() > failed.len() {
                    sink.emit(RunEvent::info(format!(
                        "{} links not yet retried kept in {}",
                        kept.len() - failed.len(),
                        path.display()
                    )));
                }
                Some(path)
            }
            Err(err) => {
                engine_error!("Could not write failed list: {}", err);
                sink.emit(RunEvent::error(format!("Could not write failed list: {err}")));
                None
            }
        }
    }
}
