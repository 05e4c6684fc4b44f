use likes_core::{AppViewModel, RunSummary, SessionState};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const CHART_WIDTH: usize = 60;

pub fn stats_line(view: &AppViewModel) -> String {
    format!(
        "Filtered: {} | Downloaded: {} | Errors: {}",
        view.total, view.downloaded, view.errors
    )
}

pub fn progress_line(view: &AppViewModel) -> Option<String> {
    view.progress.map(|progress| {
        format!(
            "Progress: {}/{} ({:.0}%) | Speed: {:.2} tracks/min",
            progress.current,
            progress.total,
            progress.fraction() * 100.0,
            progress.rate_per_minute
        )
    })
}

/// Cumulative downloads as a one-line chart, sampled down to a fixed width.
pub fn sparkline(series: &[usize]) -> String {
    let Some(&max) = series.iter().max() else {
        return String::new();
    };
    let step = series.len().div_ceil(CHART_WIDTH).max(1);
    series
        .iter()
        .step_by(step)
        .map(|&value| {
            let level = if max == 0 {
                0
            } else {
                value * (SPARK_LEVELS.len() - 1) / max
            };
            SPARK_LEVELS[level]
        })
        .collect()
}

pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Summary: {} total | {} attempted | {} downloaded | {} failed | {} skipped{}",
        summary.total,
        summary.attempted,
        summary.succeeded,
        summary.failed,
        summary.skipped,
        if summary.cancelled { " | stopped early" } else { "" }
    )];
    if let Some(path) = &summary.failed_links_file {
        lines.push(format!("Failed links: {} (run `likes retry`)", path.display()));
    }
    lines
}

/// Remembers what was already printed so a dirty view only prints what changed.
#[derive(Debug, Default)]
pub struct Renderer {
    last_stats: Option<String>,
    last_progress: Option<String>,
    notices_seen: usize,
    last_summary: Option<RunSummary>,
    last_count: Option<usize>,
}

impl Renderer {
    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        if view.notices.len() < self.notices_seen {
            self.notices_seen = 0;
        }
        lines.extend(view.notices[self.notices_seen..].iter().cloned());
        self.notices_seen = view.notices.len();

        if view.session != SessionState::Counting && view.total > 0 {
            push_changed(&mut lines, &mut self.last_stats, Some(stats_line(view)));
        }
        push_changed(&mut lines, &mut self.last_progress, progress_line(view));

        if view.last_summary.is_some() && view.last_summary != self.last_summary {
            self.last_summary = view.last_summary.clone();
            if let Some(summary) = &self.last_summary {
                lines.extend(summary_lines(summary));
            }
            if !view.chart.is_empty() {
                lines.push(format!("Chart: {}", sparkline(&view.chart)));
            }
        }

        if view.last_count.is_some() && view.last_count != self.last_count {
            self.last_count = view.last_count;
            if let Some(count) = view.last_count {
                lines.push(format!("Liked items on page: {count}"));
            }
        }

        lines
    }
}

fn push_changed(lines: &mut Vec<String>, last: &mut Option<String>, current: Option<String>) {
    if current.is_some() && current != *last {
        lines.extend(current.clone());
        *last = current;
    }
}
