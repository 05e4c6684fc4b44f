use std::sync::Once;

use likes_core::{update, AppState, Effect, Msg, RunEvent, RunSummary, SessionState};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn start(state: AppState, url: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::StartRequested {
            url: url.to_string(),
        },
    )
}

#[test]
fn start_from_idle_emits_run_effect() {
    init_logging();
    let (mut state, effects) = start(AppState::new(), "  https://soundcloud.com/me/likes \n");

    assert_eq!(state.view().session, SessionState::Running);
    assert_eq!(
        effects,
        vec![Effect::StartRun {
            url: "https://soundcloud.com/me/likes".to_string()
        }]
    );
    assert!(state.consume_dirty());
}

#[test]
fn second_start_while_running_is_rejected() {
    init_logging();
    let (state, _) = start(AppState::new(), "https://soundcloud.com/me/likes");
    let (state, effects) = start(state, "https://soundcloud.com/other/likes");

    assert!(effects.is_empty());
    assert_eq!(state.view().session, SessionState::Running);
    assert_eq!(state.view().notices.len(), 1);

    let (state, effects) = update(
        state,
        Msg::CountRequested {
            url: "https://soundcloud.com/me/likes".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().session, SessionState::Running);
}

#[test]
fn stop_moves_running_to_stopping_and_cancels() {
    init_logging();
    let (state, _) = start(AppState::new(), "https://soundcloud.com/me/likes");
    let (state, effects) = update(state, Msg::StopRequested);

    assert_eq!(state.view().session, SessionState::Stopping);
    assert_eq!(effects, vec![Effect::CancelRun]);

    // A second stop has nothing left to cancel.
    let (state, effects) = update(state, Msg::StopRequested);
    assert_eq!(state.view().session, SessionState::Stopping);
    assert!(effects.is_empty());
}

#[test]
fn stop_while_idle_is_ignored() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::StopRequested);

    assert!(effects.is_empty());
    assert_eq!(state.view().session, SessionState::Idle);
    assert!(!state.consume_dirty());
}

#[test]
fn engine_events_fold_into_view_and_finish_returns_to_idle() {
    init_logging();
    let (state, _) = start(AppState::new(), "https://soundcloud.com/me/likes");
    let (state, _) = update(
        state,
        Msg::Engine(RunEvent::StatsChanged {
            total: 2,
            downloaded: 1,
            errors: 0,
        }),
    );
    let (state, _) = update(
        state,
        Msg::Engine(RunEvent::Progress {
            current: 1,
            total: 2,
            rate_per_minute: 3.5,
        }),
    );
    let (state, _) = update(state, Msg::Engine(RunEvent::ChartPoint(vec![1])));

    let view = state.view();
    assert_eq!(view.total, 2);
    assert_eq!(view.downloaded, 1);
    assert_eq!(view.chart, vec![1]);
    let progress = view.progress.expect("progress");
    assert_eq!(progress.current, 1);
    assert!((progress.fraction() - 0.5).abs() < f64::EPSILON);

    let summary = RunSummary {
        total: 2,
        attempted: 2,
        succeeded: 1,
        failed: 1,
        ..RunSummary::default()
    };
    let (state, _) = update(state, Msg::Engine(RunEvent::Finished(summary.clone())));
    assert_eq!(state.view().session, SessionState::Idle);
    assert_eq!(state.view().last_summary, Some(summary));

    let (state, effects) = start(state, "https://soundcloud.com/me/likes");
    assert_eq!(effects.len(), 1);
    assert_eq!(state.view().total, 0);
    assert!(state.view().chart.is_empty());
}

#[test]
fn count_finishes_with_counted_event() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::CountRequested {
            url: "https://soundcloud.com/me/likes".to_string(),
        },
    );
    assert_eq!(state.view().session, SessionState::Counting);
    assert_eq!(
        effects,
        vec![Effect::StartCount {
            url: "https://soundcloud.com/me/likes".to_string()
        }]
    );

    let (state, effects) = update(state, Msg::StopRequested);
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::Engine(RunEvent::Counted(42)));
    assert_eq!(state.view().session, SessionState::Idle);
    assert_eq!(state.view().last_count, Some(42));
}

#[test]
fn abort_records_notice_and_returns_to_idle() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::RetryRequested);
    assert_eq!(effects, vec![Effect::StartRetry]);

    let (state, _) = update(
        state,
        Msg::Engine(RunEvent::Aborted("scdl is not installed".to_string())),
    );
    let view = state.view();
    assert_eq!(view.session, SessionState::Idle);
    assert_eq!(view.notices, vec!["scdl is not installed".to_string()]);
}

#[test]
fn events_after_session_end_are_dropped() {
    init_logging();
    let (mut state, _) = update(
        AppState::new(),
        Msg::Engine(RunEvent::StatsChanged {
            total: 9,
            downloaded: 9,
            errors: 0,
        }),
    );
    assert_eq!(state.view().total, 0);
    assert!(!state.consume_dirty());
}
