use engine_logging::engine_warn;

use crate::view_model::ProgressView;
use crate::{AppState, Effect, Msg, RunEvent, SessionState};

const BUSY_NOTICE: &str = "A session is already active; request ignored.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartRequested { url } => {
            if start(&mut state, SessionState::Running) {
                vec![Effect::StartRun {
                    url: url.trim().to_string(),
                }]
            } else {
                Vec::new()
            }
        }
        Msg::RetryRequested => {
            if start(&mut state, SessionState::Running) {
                vec![Effect::StartRetry]
            } else {
                Vec::new()
            }
        }
        Msg::CountRequested { url } => {
            if start(&mut state, SessionState::Counting) {
                vec![Effect::StartCount {
                    url: url.trim().to_string(),
                }]
            } else {
                Vec::new()
            }
        }
        Msg::StopRequested => {
            if state.session() == SessionState::Running {
                state.request_stop();
                vec![Effect::CancelRun]
            } else {
                Vec::new()
            }
        }
        Msg::Engine(event) => {
            apply_event(&mut state, event);
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

/// Exactly one session at a time: a second start is rejected, not queued.
fn start(state: &mut AppState, session: SessionState) -> bool {
    if state.session().is_busy() {
        engine_warn!("Start of {:?} rejected while {:?}", session, state.session());
        state.push_notice(BUSY_NOTICE);
        return false;
    }
    state.begin(session);
    true
}

fn apply_event(state: &mut AppState, event: RunEvent) {
    // Late events from a session that already ended are dropped.
    if !state.session().is_busy() {
        return;
    }
    match event {
        RunEvent::Log { .. } => {}
        RunEvent::StatsChanged {
            total,
            downloaded,
            errors,
        } => state.apply_stats(total, downloaded, errors),
        RunEvent::Progress {
            current,
            total,
            rate_per_minute,
        } => state.apply_progress(ProgressView {
            current,
            total,
            rate_per_minute,
        }),
        RunEvent::ChartPoint(series) => state.apply_chart(series),
        RunEvent::Finished(summary) => state.finish_run(summary),
        RunEvent::Counted(count) => state.finish_count(count),
        RunEvent::Aborted(reason) => state.abort(reason),
    }
}
