//! # Gridshot Simulation Core
//!
//! Deterministic, headless simulation core for a first-person maze
//! shooter. Rendering, windowing, audio, and camera math live outside this
//! crate; it exposes the maze queries and tick loop those layers drive.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     GRIDSHOT CORE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                │
//! │  ├── vec2.rs      - 2D floor-plane vector                   │
//! │  └── rng.rs       - Deterministic Xoroshiro128+ PRNG        │
//! │                                                             │
//! │  game/            - Simulation (deterministic)              │
//! │  ├── maze.rs      - Grid model, wall queries, layout hash   │
//! │  ├── generator.rs - Randomized DFS backtracker              │
//! │  ├── collision.rs - Radius-aware swept wall resolution      │
//! │  ├── state.rs     - Arena, player, enemy, bullet state      │
//! │  ├── tick.rs      - Per-tick simulation driver              │
//! │  └── events.rs    - Events for UI/audio and replay tests    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Given the same seed, config, and input sequence the simulation
//! produces identical results: all randomness flows through a seeded
//! PRNG owned by the arena, actors update in fixed order, and maze
//! layouts can be compared by SHA-256 digest.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::rng::DeterministicRng;
pub use core::vec2::Vec2;
pub use game::maze::{Direction, Maze, MazeConfig, MazeError};
pub use game::state::{ArenaKind, ArenaState, PlayerState};
pub use game::tick::{tick, ArenaConfig, InputFrame, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
