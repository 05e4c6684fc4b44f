#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Mutex, Once};

use likes_core::{ItemLink, RunEvent, RunSummary};
use likes_engine::{FailureKind, FetchError, Fetcher, PageLoadError, PageLoader};
use tokio_util::sync::CancellationToken;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

pub fn link(raw: &str) -> ItemLink {
    ItemLink::normalize(raw).expect("non-empty link")
}

/// Succeeds unless the link is listed in `failing`; records every call.
#[derive(Default)]
pub struct ScriptedFetcher {
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
    cancel_after_first: Option<CancellationToken>,
    program: Option<String>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, link: &str) -> Self {
        self.failing.insert(link.to_string());
        self
    }

    /// Simulates the user pressing stop while the first fetch is in flight.
    pub fn cancel_after_first(mut self, token: CancellationToken) -> Self {
        self.cancel_after_first = Some(token);
        self
    }

    pub fn requiring(mut self, program: &str) -> Self {
        self.program = Some(program.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, link: &ItemLink) -> Result<(), FetchError> {
        self.calls.lock().unwrap().push(link.to_string());
        if let Some(token) = &self.cancel_after_first {
            token.cancel();
        }
        if self.failing.contains(link.as_str()) {
            return Err(
                FetchError::new(FailureKind::ExitStatus(Some(1)), "download error")
                    .with_stderr("ERROR: track not available"),
            );
        }
        Ok(())
    }

    fn required_program(&self) -> Option<&str> {
        self.program.as_deref()
    }
}

pub struct StaticLoader {
    result: Result<Vec<Option<String>>, PageLoadError>,
}

impl StaticLoader {
    pub fn with_hrefs(hrefs: &[Option<&str>]) -> Self {
        Self {
            result: Ok(hrefs.iter().map(|h| h.map(str::to_string)).collect()),
        }
    }

    pub fn failing(err: PageLoadError) -> Self {
        Self { result: Err(err) }
    }
}

#[async_trait::async_trait]
impl PageLoader for StaticLoader {
    async fn load_fully_scrolled(&self, _url: &str) -> Result<Vec<Option<String>>, PageLoadError> {
        self.result.clone()
    }
}

pub fn finished_summary(events: &[RunEvent]) -> Option<RunSummary> {
    events.iter().find_map(|event| match event {
        RunEvent::Finished(summary) => Some(summary.clone()),
        _ => None,
    })
}

pub fn log_lines(events: &[RunEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            RunEvent::Log { line, .. } => Some(line.clone()),
            _ => None,
        })
        .collect()
}
