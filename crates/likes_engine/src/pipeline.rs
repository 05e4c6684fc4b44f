use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use engine_logging::{engine_debug, engine_error, engine_info};
use likes_core::{extract_links, filter_links, ItemLink, LinkSet, RunEvent, RunSummary};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::fetch::{locate_program, CommandFetcher};
use crate::page::{HttpScrollDriver, ScrollingPageLoader};
use crate::{
    DownloadOrchestrator, EngineConfig, Fetcher, LinkStore, PageLoadError, PageLoader,
    PersistError, ProgressSink,
};

/// Setup-phase faults. Any of these aborts the whole run before downloading.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{program} is not installed or not in PATH")]
    ToolMissing { program: String },
    #[error("cannot prepare download directory {path:?}: {message}")]
    DownloadDir { path: PathBuf, message: String },
    #[error("page load failed: {0}")]
    PageLoad(#[from] PageLoadError),
    #[error("persistence failed: {0}")]
    Persist(#[from] PersistError),
}

/// Scrape → filter → download, wired to concrete collaborators.
pub struct Pipeline {
    config: EngineConfig,
    loader: Arc<dyn PageLoader>,
    fetcher: Arc<dyn Fetcher>,
    store: LinkStore,
}

impl Pipeline {
    pub fn new(config: EngineConfig, loader: Arc<dyn PageLoader>, fetcher: Arc<dyn Fetcher>) -> Self {
        let store = LinkStore::new(config.output_dir.clone()).with_log_file(config.log_file.clone());
        Self {
            config,
            loader,
            fetcher,
            store,
        }
    }

    /// HTTP page driver plus the external downloader command.
    pub fn from_config(config: EngineConfig) -> Result<Self, PipelineError> {
        let client = HttpScrollDriver::build_client(&config.http_settings())?;
        let loader = ScrollingPageLoader::new(
            move || HttpScrollDriver::new(client.clone()),
            config.scroll_settings(),
        );
        let fetcher = CommandFetcher::new(config.fetch_command());
        Ok(Self::new(config, Arc::new(loader), Arc::new(fetcher)))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &LinkStore {
        &self.store
    }

    /// Full run. Setup faults are returned; per-item faults end up in the summary.
    pub async fn run(
        &self,
        url: &str,
        cancel: &CancellationToken,
        sink: &dyn ProgressSink,
    ) -> Result<RunSummary, PipelineError> {
        self.check_preconditions(sink)?;

        sink.emit(RunEvent::info("Opening likes page..."));
        let links = self.scrape(url).await?;
        self.filter_and_record(&links, sink)?;
        let replay = self.store.read_filtered()?;
        Ok(self.download(&replay, cancel, sink).await)
    }

    /// Re-run only the links recorded as failed by the previous run. The list
    /// is rewritten with what still fails; a stop keeps the unreached links.
    pub async fn retry(
        &self,
        cancel: &CancellationToken,
        sink: &dyn ProgressSink,
    ) -> Result<RunSummary, PipelineError> {
        self.check_preconditions(sink)?;

        let failed = self.store.read_failed()?;
        if failed.is_empty() {
            sink.emit(RunEvent::info("No failed links to retry."));
            let summary = RunSummary::default();
            sink.emit(RunEvent::Finished(summary.clone()));
            return Ok(summary);
        }
        sink.emit(RunEvent::info(format!("Retrying {} failed links", failed.len())));
        sink.emit(RunEvent::StatsChanged {
            total: failed.len(),
            downloaded: 0,
            errors: 0,
        });
        Ok(DownloadOrchestrator::new(&self.config.site, &self.store)
            .keep_unreached_on_stop()
            .run(&failed, self.fetcher.as_ref(), cancel, sink)
            .await)
    }

    /// Count candidate items without filtering or writing anything.
    pub async fn count(&self, url: &str, sink: &dyn ProgressSink) -> Result<usize, PipelineError> {
        sink.emit(RunEvent::info(format!("Counting liked tracks at: {url}")));
        let count = self.scrape(url).await?.len();
        sink.emit(RunEvent::info(format!("Found {count} liked tracks")));
        sink.emit(RunEvent::Counted(count));
        Ok(count)
    }

    pub async fn scrape(&self, url: &str) -> Result<LinkSet, PipelineError> {
        let hrefs = self.loader.load_fully_scrolled(url).await?;
        let links = extract_links(hrefs.iter().map(Option::as_deref), &self.config.site);
        engine_info!("Extracted {} item links from {} anchors", links.len(), hrefs.len());
        Ok(links)
    }

    /// Applies the exclusion rules and records both the unfiltered and the
    /// filtered lists before returning the sorted survivors.
    pub fn filter_and_record(
        &self,
        links: &LinkSet,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<ItemLink>, PipelineError> {
        let raw_path = self.store.write_raw(links)?;
        sink.emit(RunEvent::info(format!(
            "Found {} links. Saved to {}",
            links.len(),
            raw_path.display()
        )));

        let outcome = filter_links(links, &self.config.filter_rules());
        self.store.write_filtered(&outcome.kept)?;

        for exclusion in &outcome.excluded {
            engine_debug!("Excluded {} (keyword {:?})", exclusion.link, exclusion.keyword);
            sink.emit(RunEvent::info(format!(
                "Excluded ({}): {}",
                exclusion.keyword, exclusion.link
            )));
        }
        let total = outcome.kept.len();
        sink.emit(RunEvent::StatsChanged {
            total,
            downloaded: 0,
            errors: 0,
        });
        sink.emit(RunEvent::info(format!(
            "Total: {} | Filtered: {} ({:.1}%)",
            links.len(),
            total,
            outcome.kept_percent(links.len())
        )));
        Ok(outcome.kept)
    }

    async fn download(
        &self,
        links: &[ItemLink],
        cancel: &CancellationToken,
        sink: &dyn ProgressSink,
    ) -> RunSummary {
        DownloadOrchestrator::new(&self.config.site, &self.store)
            .run(links, self.fetcher.as_ref(), cancel, sink)
            .await
    }

    fn check_preconditions(&self, sink: &dyn ProgressSink) -> Result<(), PipelineError> {
        if let Some(program) = self.fetcher.required_program() {
            if locate_program(program).is_none() {
                engine_error!("Downloader {} not found on PATH", program);
                return Err(PipelineError::ToolMissing {
                    program: program.to_string(),
                });
            }
        }

        let dir = &self.config.download_dir;
        fs::create_dir_all(dir).map_err(|err| PipelineError::DownloadDir {
            path: dir.clone(),
            message: err.to_string(),
        })?;
        sink.emit(RunEvent::info(format!(
            "Using download directory: {}",
            dir.display()
        )));
        Ok(())
    }
}
