use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_error, engine_info};
use likes_core::RunEvent;
use tokio_util::sync::CancellationToken;

use crate::sink::ChannelProgressSink;
use crate::{Pipeline, PipelineError, ProgressSink};

enum EngineCommand {
    Run {
        url: String,
        cancel: CancellationToken,
    },
    Retry {
        cancel: CancellationToken,
    },
    Count {
        url: String,
    },
}

/// Background worker owning the pipeline. Commands run strictly one after
/// another; callers only enqueue, stop, and drain events.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<RunEvent>,
    active: Mutex<Option<CancellationToken>>,
}

impl EngineHandle {
    pub fn new(pipeline: Pipeline) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let active = Mutex::new(None);

        thread::spawn(move || {
            let sink = ChannelProgressSink::new(event_tx);
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Could not start engine runtime: {}", err);
                    sink.emit(RunEvent::Aborted(format!("engine runtime unavailable: {err}")));
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                runtime.block_on(handle_command(&pipeline, command, &sink));
            }
            engine_info!("Engine worker shutting down");
        });

        Self {
            cmd_tx,
            event_rx,
            active,
        }
    }

    pub fn start_run(&self, url: impl Into<String>) {
        let cancel = self.fresh_token();
        let _ = self.cmd_tx.send(EngineCommand::Run {
            url: url.into(),
            cancel,
        });
    }

    pub fn start_retry(&self) {
        let cancel = self.fresh_token();
        let _ = self.cmd_tx.send(EngineCommand::Retry { cancel });
    }

    pub fn start_count(&self, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Count { url: url.into() });
    }

    /// Cooperative stop of the most recently started run: the current job
    /// finishes, no further job starts.
    pub fn stop(&self) {
        let guard = match self.active.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(token) = guard.as_ref() {
            token.cancel();
        }
    }

    /// Each run gets its own token so a stop never leaks into the next run.
    fn fresh_token(&self) -> CancellationToken {
        let token = CancellationToken::new();
        match self.active.lock() {
            Ok(mut guard) => *guard = Some(token.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(token.clone()),
        }
        token
    }

    pub fn try_recv(&self) -> Option<RunEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<RunEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(pipeline: &Pipeline, command: EngineCommand, sink: &dyn ProgressSink) {
    let result = match command {
        EngineCommand::Run { url, cancel } => pipeline.run(&url, &cancel, sink).await.map(|_| ()),
        EngineCommand::Retry { cancel } => pipeline.retry(&cancel, sink).await.map(|_| ()),
        EngineCommand::Count { url } => pipeline.count(&url, sink).await.map(|_| ()),
    };
    if let Err(err) = result {
        report_abort(&err, sink);
    }
}

fn report_abort(err: &PipelineError, sink: &dyn ProgressSink) {
    engine_error!("Run aborted: {}", err);
    sink.emit(RunEvent::error(err.to_string()));
    sink.emit(RunEvent::Aborted(err.to_string()));
}
