//! Likes core: link extraction, exclusion filtering, run bookkeeping and the
//! pure session state machine. No IO happens here.
mod effect;
mod event;
mod extract;
mod filter;
mod link;
mod msg;
mod run;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use event::{LogLevel, RunEvent};
pub use extract::extract_links;
pub use filter::{filter_links, Exclusion, FilterOutcome, FilterRules, DEFAULT_EXCLUDE_KEYWORDS};
pub use link::{ItemLink, LinkSet, SiteProfile};
pub use msg::Msg;
pub use run::{
    throughput_per_minute, DownloadJob, JobOutcome, ProgressUpdate, RunState, RunSummary,
};
pub use state::{AppState, SessionState};
pub use update::update;
pub use view_model::{AppViewModel, ProgressView};
