//! Game Events
//!
//! Events generated during simulation for the UI/audio layers and for
//! replay verification.

use serde::{Deserialize, Serialize};

use crate::core::vec2::Vec2;
use crate::game::state::{ArenaKind, EnemyId};

/// Game event data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum GameEventData {
    /// Player fired a shot
    ShotFired {
        position: Vec2,
        direction: Vec2,
        rounds_left: u32,
    },

    /// Player started reloading
    ReloadStarted,

    /// An enemy died
    EnemyDefeated {
        enemy_id: EnemyId,
        position: Vec2,
        remaining: u32,
    },

    /// An enemy damaged the player
    PlayerDamaged {
        enemy_id: EnemyId,
        damage: f32,
        health_left: f32,
    },

    /// Player health reached zero; arena restarts
    PlayerDefeated {
        arena_level: u32,
    },

    /// Every enemy in the arena died
    ArenaCleared {
        kind: ArenaKind,
        arena_level: u32,
    },

    /// A fresh arena was generated
    ArenaEntered {
        kind: ArenaKind,
        arena_level: u32,
        layout_hash: String,
    },
}

/// A game event with the tick it occurred on.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when the event occurred
    pub tick: u32,
    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        Self { tick, data }
    }
}
