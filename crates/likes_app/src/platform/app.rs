use std::process;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use engine_logging::{engine_info, engine_warn};
use likes_core::{update, AppState, Msg};
use likes_engine::{EngineHandle, Pipeline};

use super::cli::{Cli, Command};
use super::effects::EffectRunner;
use super::logging;
use super::render::Renderer;
use super::report::Reporter;
use super::settings::{Overrides, Settings};

/// Coalesces engine events between renders.
const TICK: Duration = Duration::from_millis(75);

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref())?.apply(Overrides {
        likes_url: cli.url().map(str::to_string),
        output_dir: cli.output_dir.clone(),
        download_dir: cli.download_dir.clone(),
        exclude: cli.exclude.clone(),
    });
    logging::initialize(cli.verbose, &settings.engine.output_dir);
    engine_info!(
        "likes starting: output_dir={:?} download_dir={:?}",
        settings.engine.output_dir,
        settings.engine.download_dir
    );

    let pipeline =
        Pipeline::from_config(settings.engine.clone()).context("could not set up page loader")?;
    let mut reporter = Reporter::new(pipeline.store().clone());
    let runner = EffectRunner::new(EngineHandle::new(pipeline));

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    spawn_interrupt_listener(msg_tx.clone());

    let mut state = AppState::new();
    let mut renderer = Renderer::default();
    let mut inbox = vec![initial_msg(&cli.command(), &settings)];

    loop {
        for msg in inbox.drain(..) {
            if let Msg::Engine(event) = &msg {
                reporter.record(event);
            }
            let (next, effects) = update(state, msg);
            state = next;
            runner.enqueue(effects);
        }
        if state.consume_dirty() {
            for line in renderer.render(&state.view()) {
                reporter.status(&line);
            }
        }
        if !state.session().is_busy() {
            break;
        }

        inbox.push(msg_rx.recv_timeout(TICK).unwrap_or(Msg::Tick));
        inbox.extend(runner.drain_events().into_iter().map(Msg::Engine));
    }
    drop(msg_tx);

    match reporter.aborted() {
        Some(reason) => anyhow::bail!("run aborted: {reason}"),
        None => Ok(()),
    }
}

fn initial_msg(command: &Command, settings: &Settings) -> Msg {
    let url = settings.likes_url.clone();
    match command {
        Command::Run { .. } => Msg::StartRequested { url },
        Command::Count { .. } => Msg::CountRequested { url },
        Command::Retry => Msg::RetryRequested,
    }
}

/// First Ctrl-C asks for a cooperative stop; a second one exits at once.
fn spawn_interrupt_listener(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                engine_warn!("Ctrl-C handling unavailable: {}", err);
                return;
            }
        };
        runtime.block_on(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            eprintln!("Stopping after the current download; press Ctrl-C again to quit now.");
            let _ = msg_tx.send(Msg::StopRequested);
            if tokio::signal::ctrl_c().await.is_ok() {
                process::exit(130);
            }
        });
    });
}
