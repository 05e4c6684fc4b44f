use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use engine_logging::engine_debug;
use likes_core::ItemLink;
use tokio::process::Command;

use crate::{FailureKind, FetchError};

/// Placeholder replaced by the link in [`FetchCommand::args`].
pub const LINK_PLACEHOLDER: &str = "{link}";
/// Placeholder replaced by the download directory in [`FetchCommand::args`].
pub const DIR_PLACEHOLDER: &str = "{dir}";

/// How to invoke the external downloader for one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCommand {
    pub program: String,
    pub args: Vec<String>,
    pub download_dir: PathBuf,
    /// `None` lets a download run as long as it needs.
    pub timeout: Option<Duration>,
}

impl FetchCommand {
    /// `scdl -l <link> -c --onlymp3 --path <dir>`: single link, mp3 only,
    /// continue past already-downloaded files.
    pub fn default_args() -> Vec<String> {
        ["-l", LINK_PLACEHOLDER, "-c", "--onlymp3", "--path", DIR_PLACEHOLDER]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn expand_args(&self, link: &ItemLink) -> Vec<String> {
        let dir = self.download_dir.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(LINK_PLACEHOLDER, link.as_str())
                    .replace(DIR_PLACEHOLDER, &dir)
            })
            .collect()
    }
}

impl Default for FetchCommand {
    fn default() -> Self {
        Self {
            program: "scdl".to_string(),
            args: Self::default_args(),
            download_dir: PathBuf::from("downloads"),
            timeout: Some(Duration::from_secs(15 * 60)),
        }
    }
}

/// Fetches exactly one item. Calls are made one at a time.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, link: &ItemLink) -> Result<(), FetchError>;

    /// External program that must be on `PATH` before a run may start.
    fn required_program(&self) -> Option<&str> {
        None
    }
}

/// Runs the configured downloader as a child process per link.
#[derive(Debug, Clone)]
pub struct CommandFetcher {
    command: FetchCommand,
}

impl CommandFetcher {
    pub fn new(command: FetchCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &FetchCommand {
        &self.command
    }
}

#[async_trait::async_trait]
impl Fetcher for CommandFetcher {
    async fn fetch(&self, link: &ItemLink) -> Result<(), FetchError> {
        let args = self.command.expand_args(link);
        engine_debug!("Spawning {} {:?}", self.command.program, args);

        let mut command = Command::new(&self.command.program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            // Dropping the wait future on timeout must not leave the child behind.
            .kill_on_drop(true);
        // Own process group: a terminal Ctrl-C is a stop request for the run,
        // not a kill signal for the download in flight.
        #[cfg(unix)]
        command.process_group(0);

        let child = command
            .spawn()
            .map_err(|err| FetchError::new(FailureKind::Spawn, err.to_string()))?;

        let wait = child.wait_with_output();
        let waited = match self.command.timeout {
            Some(limit) => match tokio::time::timeout(limit, wait).await {
                Ok(waited) => waited,
                Err(_) => {
                    return Err(FetchError::new(
                        FailureKind::Timeout(limit),
                        "download did not finish in time",
                    ))
                }
            },
            None => wait.await,
        };
        let output = waited.map_err(|err| FetchError::new(FailureKind::Io, err.to_string()))?;

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(
            FetchError::new(FailureKind::ExitStatus(output.status.code()), "download error")
                .with_stderr(stderr),
        )
    }

    fn required_program(&self) -> Option<&str> {
        Some(&self.command.program)
    }
}

/// Resolves `program` on `PATH` (or as a direct path).
pub fn locate_program(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}
