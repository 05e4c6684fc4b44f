use std::path::PathBuf;
use std::time::Duration;

use likes_core::{FilterRules, SiteProfile, DEFAULT_EXCLUDE_KEYWORDS};
use serde::{Deserialize, Serialize};

use crate::fetch::FetchCommand;
use crate::page::{HttpSettings, ScrollSettings};

/// Everything the pipeline needs; every field has a default so a config file
/// only names what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub site: SiteProfile,
    pub exclude_keywords: Vec<String>,
    /// Where link lists and the user log live.
    pub output_dir: PathBuf,
    /// Passed to the downloader as its target directory.
    pub download_dir: PathBuf,
    pub fetch_program: String,
    /// Downloader arguments; `{link}` and `{dir}` are substituted per item.
    pub fetch_args: Vec<String>,
    /// Timeouts in seconds; 0 disables the limit.
    pub fetch_timeout_secs: u64,
    pub page_load_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_scrolls: u32,
    pub scroll_delay_ms: u64,
    pub settle_delay_ms: u64,
    pub log_file: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let fetch = FetchCommand::default();
        let scroll = ScrollSettings::default();
        Self {
            site: SiteProfile::default(),
            exclude_keywords: DEFAULT_EXCLUDE_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            output_dir: PathBuf::from("."),
            download_dir: fetch.download_dir,
            fetch_program: fetch.program,
            fetch_args: fetch.args,
            fetch_timeout_secs: as_secs(fetch.timeout),
            page_load_timeout_secs: as_secs(scroll.page_load_timeout),
            request_timeout_secs: as_secs(HttpSettings::default().request_timeout),
            max_scrolls: scroll.max_scrolls,
            scroll_delay_ms: scroll.scroll_delay.as_millis() as u64,
            settle_delay_ms: scroll.settle_delay.as_millis() as u64,
            log_file: crate::persist::LOG_FILE.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn filter_rules(&self) -> FilterRules {
        FilterRules::new(&self.exclude_keywords)
    }

    pub fn fetch_command(&self) -> FetchCommand {
        FetchCommand {
            program: self.fetch_program.clone(),
            args: self.fetch_args.clone(),
            download_dir: self.download_dir.clone(),
            timeout: limit(self.fetch_timeout_secs),
        }
    }

    pub fn scroll_settings(&self) -> ScrollSettings {
        ScrollSettings {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            scroll_delay: Duration::from_millis(self.scroll_delay_ms),
            max_scrolls: self.max_scrolls,
            page_load_timeout: limit(self.page_load_timeout_secs),
        }
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            request_timeout: limit(self.request_timeout_secs),
            ..HttpSettings::default()
        }
    }
}

fn limit(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn as_secs(limit: Option<Duration>) -> u64 {
    limit.map_or(0, |d| d.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_finite_timeouts() {
        let config = EngineConfig::default();
        assert_eq!(config.fetch_timeout_secs, 15 * 60);
        assert_eq!(config.fetch_command().timeout, Some(Duration::from_secs(15 * 60)));
        assert_eq!(
            config.scroll_settings().page_load_timeout,
            Some(Duration::from_secs(5 * 60))
        );
        assert_eq!(config.http_settings().request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn zero_seconds_means_no_limit() {
        let config = EngineConfig {
            fetch_timeout_secs: 0,
            page_load_timeout_secs: 0,
            request_timeout_secs: 0,
            ..EngineConfig::default()
        };

        assert_eq!(config.fetch_command().timeout, None);
        assert_eq!(config.scroll_settings().page_load_timeout, None);
        assert_eq!(config.http_settings().request_timeout, None);
    }
}
