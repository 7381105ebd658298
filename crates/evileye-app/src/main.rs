use evileye_app::autopilot::Autopilot;
use evileye_app::config::RunOptions;
use evileye_app::control;
use evileye_app::game_loop::{self, TICK_DURATION};
use evileye_app::state::AppState;
use evileye_sim::{SimConfig, SimulationEngine};
use tracing::{error, info};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        error!(error = %e, "evileye exited with an error");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = RunOptions::parse(std::env::args().skip(1))?;
    let config = options.sim_config()?;
    info!(
        seed = config.seed,
        ticks = options.ticks,
        realtime = options.realtime,
        autopilot = options.autopilot,
        "starting evileye"
    );

    let autopilot = options.autopilot.then(Autopilot::default);
    if options.realtime {
        run_realtime(config, options.ticks, autopilot.as_ref())
    } else {
        run_headless(config, options.ticks, autopilot.as_ref());
        Ok(())
    }
}

fn run_headless(config: SimConfig, ticks: u64, autopilot: Option<&Autopilot>) {
    let mut engine = SimulationEngine::new(config);
    let summary = game_loop::run_headless(&mut engine, ticks, autopilot);
    let snap = &summary.final_snapshot;
    info!(
        ticks = summary.ticks,
        wave = snap.wave,
        health = snap.health,
        money = snap.money,
        kills = summary.kills,
        waves_completed = summary.waves_completed,
        game_overs = summary.game_overs,
        "headless run finished"
    );
}

/// Drive the threaded loop through the control surface, polling snapshots
/// once per tick for the autopilot.
fn run_realtime(config: SimConfig, ticks: u64, autopilot: Option<&Autopilot>) -> Result<(), String> {
    let state = AppState::new();
    control::start_simulation(&state, config)?;

    let mut last_tick = None;
    for _ in 0..ticks {
        std::thread::sleep(TICK_DURATION);
        let Some(snap) = control::get_snapshot(&state)? else {
            continue;
        };
        // The loop may not have advanced since the last poll.
        if last_tick == Some(snap.time.tick) {
            continue;
        }
        last_tick = Some(snap.time.tick);
        if let Some(pilot) = autopilot {
            for command in pilot.decide(&snap) {
                control::send_command(&state, command)?;
            }
        }
    }

    let final_snapshot = control::get_snapshot(&state)?;
    control::stop_simulation(&state)?;
    if let Some(snap) = final_snapshot {
        info!(
            tick = snap.time.tick,
            wave = snap.wave,
            health = snap.health,
            money = snap.money,
            "realtime run finished"
        );
    }
    Ok(())
}
