use std::sync::mpsc;
use std::sync::Mutex;

use likes_core::RunEvent;

/// Observer for run events. Implementations must not block the run.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: RunEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<RunEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<RunEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: RunEvent) {
        // A dropped receiver means nobody is watching; the run carries on.
        let _ = self.tx.send(event);
    }
}

/// Keeps every event in memory; handy for tests and batch callers.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<RunEvent> {
        match self.events.lock() {
            Ok(mut events) => events.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: RunEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
