use std::iter;

use engine_logging::engine_info;
use likes_core::{Effect, RunEvent};
use likes_engine::EngineHandle;

/// Turns controller effects into engine commands and hands engine events back.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartRun { url } => {
                    engine_info!("StartRun url={}", url);
                    self.engine.start_run(url);
                }
                Effect::StartRetry => {
                    engine_info!("StartRetry");
                    self.engine.start_retry();
                }
                Effect::StartCount { url } => {
                    engine_info!("StartCount url={}", url);
                    self.engine.start_count(url);
                }
                Effect::CancelRun => {
                    engine_info!("CancelRun");
                    self.engine.stop();
                }
            }
        }
    }

    /// Everything the engine reported since the last call, in order.
    pub fn drain_events(&self) -> Vec<RunEvent> {
        iter::from_fn(|| self.engine.try_recv()).collect()
    }
}
