use chrono::Local;
use engine_logging::engine_warn;
use likes_core::{LogLevel, RunEvent};
use likes_engine::LinkStore;

/// User-facing output: timestamped terminal lines plus the append-only log
/// file, which receives every engine log line verbatim.
pub struct Reporter {
    store: LinkStore,
    log_file_broken: bool,
    aborted: Option<String>,
}

impl Reporter {
    pub fn new(store: LinkStore) -> Self {
        Self {
            store,
            log_file_broken: false,
            aborted: None,
        }
    }

    pub fn record(&mut self, event: &RunEvent) {
        match event {
            RunEvent::Log { level, line } => {
                print_line(*level, line);
                self.append(line);
            }
            RunEvent::Aborted(reason) => self.aborted = Some(reason.clone()),
            _ => {}
        }
    }

    /// Status lines rendered from the view; terminal only.
    pub fn status(&self, line: &str) {
        print_line(LogLevel::Info, line);
    }

    pub fn aborted(&self) -> Option<&str> {
        self.aborted.as_deref()
    }

    fn append(&mut self, line: &str) {
        if let Err(err) = self.store.append_log_line(line) {
            // Warn once; the run itself is unaffected.
            if !self.log_file_broken {
                engine_warn!("Could not append to user log: {}", err);
                self.log_file_broken = true;
            }
        }
    }
}

fn print_line(level: LogLevel, line: &str) {
    let stamp = Local::now().format("%H:%M:%S");
    match level {
        LogLevel::Error => eprintln!("[{stamp}] {line}"),
        LogLevel::Info | LogLevel::Warn => println!("[{stamp}] {line}"),
    }
}
