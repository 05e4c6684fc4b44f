use likes_core::{update, AppState, Msg};

#[test]
fn tick_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::Tick);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn stop_while_idle_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::StopRequested);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
