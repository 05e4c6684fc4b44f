//! Likes engine: page loading, external downloads, persistence and the
//! background worker that runs the pipeline.
mod config;
mod engine;
mod fetch;
mod orchestrator;
mod page;
mod persist;
mod pipeline;
mod sink;
mod types;

pub use config::EngineConfig;
pub use engine::EngineHandle;
pub use fetch::{
    locate_program, CommandFetcher, FetchCommand, Fetcher, DIR_PLACEHOLDER, LINK_PLACEHOLDER,
};
pub use orchestrator::DownloadOrchestrator;
pub use page::{
    HttpScrollDriver, HttpSettings, PageLoader, ScrollDriver, ScrollSettings, ScrollingPageLoader,
};
pub use persist::{
    ensure_output_dir, LinkStore, PersistError, FAILED_LINKS_FILE, FILTERED_LINKS_FILE, LOG_FILE,
    RAW_LINKS_FILE,
};
pub use pipeline::{Pipeline, PipelineError};
pub use sink::{ChannelProgressSink, ProgressSink, RecordingSink};
pub use types::{FailureKind, FetchError, PageLoadError};
