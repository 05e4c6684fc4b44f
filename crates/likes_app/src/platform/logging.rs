//! Diagnostic logging for the `likes` binary.
//!
//! Writes `engine.log` into the output directory at debug level; the terminal
//! only shows warnings unless `--verbose` is given. This is separate from the
//! user-facing `log.txt`.

use std::path::Path;

use engine_logging::LogDestination;
use likes_engine::ensure_output_dir;
use log::LevelFilter;

pub const DIAGNOSTIC_LOG_FILE: &str = "engine.log";

pub fn initialize(verbose: bool, output_dir: &Path) {
    let terminal_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let path = output_dir.join(DIAGNOSTIC_LOG_FILE);
    let destination = match ensure_output_dir(output_dir) {
        Ok(()) => LogDestination::TerminalAndFile {
            path: &path,
            level: LevelFilter::Debug,
        },
        Err(err) => {
            eprintln!("Warning: diagnostic log disabled: {err}");
            LogDestination::Terminal
        }
    };
    engine_logging::initialize(terminal_level, destination);
}
