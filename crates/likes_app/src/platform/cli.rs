use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Scrape a liked-items page and download every item that passes the filters.
#[derive(Parser, Debug)]
#[command(name = "likes", author, version, about)]
pub struct Cli {
    /// RON settings file (defaults to ./likes.ron when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for link lists and log.txt
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Directory handed to the downloader
    #[arg(long, global = true)]
    pub download_dir: Option<PathBuf>,

    /// Extra exclusion keyword (can be repeated)
    #[arg(long = "exclude", global = true)]
    pub exclude: Vec<String>,

    /// Show debug diagnostics on the terminal
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Scrape, filter and download (the default)
    Run {
        /// Likes page to scrape
        #[arg(long)]
        url: Option<String>,
    },
    /// Count liked items without downloading anything
    Count {
        #[arg(long)]
        url: Option<String>,
    },
    /// Download again only the links listed in failed_links.txt
    Retry,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run { url: None })
    }

    pub fn url(&self) -> Option<&str> {
        match &self.command {
            Some(Command::Run { url }) | Some(Command::Count { url }) => url.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_runs_with_defaults() {
        let cli = Cli::try_parse_from(["likes"]).unwrap();
        assert_eq!(cli.command(), Command::Run { url: None });
        assert!(cli.exclude.is_empty());
        assert!(!cli.verbose);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "likes",
            "count",
            "--url",
            "https://soundcloud.com/someone/likes",
            "--exclude",
            "remix",
            "--exclude",
            "live",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.url(), Some("https://soundcloud.com/someone/likes"));
        assert_eq!(cli.exclude, vec!["remix".to_string(), "live".to_string()]);
        assert!(cli.verbose);
    }

    #[test]
    fn retry_takes_no_url() {
        let cli = Cli::try_parse_from(["likes", "retry", "--output-dir", "out"]).unwrap();
        assert_eq!(cli.command(), Command::Retry);
        assert_eq!(cli.url(), None);
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
    }
}
