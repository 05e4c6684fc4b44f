mod platform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    platform::run_app(platform::cli::Cli::parse())
}
