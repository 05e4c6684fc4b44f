use crate::RunSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Everything a run reports to its observer, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// Human-readable line for the user-facing log.
    Log { level: LogLevel, line: String },
    StatsChanged {
        total: usize,
        downloaded: usize,
        errors: usize,
    },
    Progress {
        current: usize,
        total: usize,
        rate_per_minute: f64,
    },
    /// Cumulative downloaded count after each success so far.
    ChartPoint(Vec<usize>),
    Finished(RunSummary),
    /// Result of a count-only scrape.
    Counted(usize),
    /// Setup-phase fault; nothing was downloaded.
    Aborted(String),
}

impl RunEvent {
    pub fn info(line: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Info,
            line: line.into(),
        }
    }

    pub fn warn(line: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Warn,
            line: line.into(),
        }
    }

    pub fn error(line: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Error,
            line: line.into(),
        }
    }

    /// Terminal events end the current session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunEvent::Finished(_) | RunEvent::Counted(_) | RunEvent::Aborted(_)
        )
    }
}
