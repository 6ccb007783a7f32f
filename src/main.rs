//! Gridshot Headless Demo
//!
//! Runs a scripted match against the simulation core, logs notable
//! events, then replays the same inputs to verify determinism.

use std::env;
use std::fs;

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use gridshot::game::events::GameEventData;
use gridshot::game::state::ArenaState;
use gridshot::game::tick::{run_ticks, tick, ArenaConfig, InputFrame};
use gridshot::{Vec2, TICK_RATE, VERSION};

const DEMO_TICKS: u32 = 3600;

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("Gridshot Core v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => load_config(&path),
        None => ArenaConfig::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(12345u64);

    demo_match(&config, seed);
}

/// Load an [`ArenaConfig`] from a JSON file, falling back to defaults on
/// any error.
fn load_config(path: &str) -> ArenaConfig {
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => {
                info!("Loaded config from {}", path);
                config
            }
            Err(err) => {
                warn!("Invalid config {}: {}, using defaults", path, err);
                ArenaConfig::default()
            }
        },
        Err(err) => {
            warn!("Cannot read {}: {}, using defaults", path, err);
            ArenaConfig::default()
        }
    }
}

/// Scripted input: wander the maze in a slowly turning direction, firing
/// ahead in bursts.
fn scripted_input(t: u32) -> InputFrame {
    let angle = t as f32 * 0.01;
    let dir = Vec2::new(angle.cos(), angle.sin());
    InputFrame {
        move_dir: dir,
        fire: t % 4 == 0,
        fire_dir: dir,
        reload: false,
    }
}

fn demo_match(config: &ArenaConfig, seed: u64) {
    info!("=== Starting Demo Match ===");
    info!("RNG Seed: {}", seed);

    let mut state = match ArenaState::new(seed, config) {
        Ok(state) => state,
        Err(err) => {
            warn!("Invalid maze config: {}", err);
            return;
        }
    };
    info!(
        "Initial layout: {}",
        hex::encode(state.maze.layout_hash())
    );

    let mut total_events = 0;
    for t in 0..DEMO_TICKS {
        let input = scripted_input(t);
        let result = match tick(&mut state, &input, config) {
            Ok(result) => result,
            Err(err) => {
                warn!("Tick {} failed: {}", t, err);
                return;
            }
        };
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                GameEventData::EnemyDefeated { remaining, .. } => {
                    info!("Enemy down, {} remaining", remaining);
                }
                GameEventData::PlayerDamaged { health_left, .. } => {
                    info!("Player hit, {:.0} health left", health_left);
                }
                GameEventData::ArenaCleared { kind, arena_level } => {
                    info!("Arena {} cleared ({:?})", arena_level, kind);
                }
                GameEventData::ArenaEntered {
                    kind,
                    arena_level,
                    layout_hash,
                } => {
                    info!(
                        "Entered arena {} ({:?}), layout {}",
                        arena_level,
                        kind,
                        &layout_hash[..16]
                    );
                }
                GameEventData::PlayerDefeated { arena_level } => {
                    info!("Player defeated in arena {}", arena_level);
                }
                _ => {}
            }
        }

        if t % (10 * TICK_RATE) == 0 {
            info!(
                "Tick {}: arena {} ({:?}), {} enemies, {:.0} health",
                state.tick,
                state.arena_level,
                state.kind,
                state.alive_enemies(),
                state.player.health
            );
        }
    }

    info!("=== Match Results ===");
    info!("Arena level reached: {}", state.arena_level);
    info!("Final layout: {}", hex::encode(state.maze.layout_hash()));
    info!("Total events: {}", total_events);

    verify_determinism(config, seed, &state);
}

/// Re-run the same inputs from the same seed and compare outcomes.
fn verify_determinism(config: &ArenaConfig, seed: u64, reference: &ArenaState) {
    info!("=== Verifying Determinism ===");

    let mut replay = match ArenaState::new(seed, config) {
        Ok(state) => state,
        Err(err) => {
            warn!("Replay setup failed: {}", err);
            return;
        }
    };
    let inputs: Vec<InputFrame> = (0..DEMO_TICKS).map(scripted_input).collect();
    if let Err(err) = run_ticks(&mut replay, &inputs, config) {
        warn!("Replay failed: {}", err);
        return;
    }

    let matches = replay.maze.layout_hash() == reference.maze.layout_hash()
        && replay.player.position == reference.player.position
        && replay.arena_level == reference.arena_level;
    if matches {
        info!("DETERMINISM VERIFIED: replay matches");
    } else {
        warn!("DETERMINISM FAILURE: replay diverged");
    }
}
