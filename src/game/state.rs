//! Arena State
//!
//! Actor records and the mutable per-arena state the tick drives. The
//! collision resolver holds none of this; actors are thin value records
//! that feed it position, velocity, and radius.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::maze::{Maze, MazeError};
use crate::game::tick::ArenaConfig;

/// Identifier for an enemy within one arena.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EnemyId(pub u32);

/// Which arena the player is fighting through. The two alternate: clearing
/// the standard maze opens the boss arena and clearing the boss arena
/// returns to a harder standard maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaKind {
    /// Regular wave maze.
    Standard,
    /// Smaller, wider arena with a boss and escorts.
    Boss,
}

/// The player.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerState {
    /// World position on the floor plane.
    pub position: Vec2,
    /// Current health.
    pub health: f32,
    /// Rounds left in the magazine.
    pub ammo: u32,
    /// Ticks until the next shot may fire.
    pub fire_cooldown: u32,
    /// Ticks left on an active reload; 0 when not reloading.
    pub reload_ticks: u32,
    /// Ticks since the player last took damage, for regeneration.
    pub ticks_since_damage: u32,
}

impl PlayerState {
    fn new(position: Vec2, config: &ArenaConfig) -> Self {
        Self {
            position,
            health: config.player_max_health,
            ammo: config.magazine_size,
            fire_cooldown: 0,
            reload_ticks: 0,
            ticks_since_damage: u32::MAX,
        }
    }

    pub fn alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn reloading(&self) -> bool {
        self.reload_ticks > 0
    }
}

/// One enemy. Bosses share the record; only their scalars differ.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnemyState {
    /// Stable identifier within the arena run.
    pub id: EnemyId,
    /// World position on the floor plane.
    pub position: Vec2,
    /// Current health.
    pub health: f32,
    /// Boss scalars apply instead of regular enemy scalars.
    pub is_boss: bool,
    /// Ticks until this enemy may damage the player again.
    pub hit_cooldown: u32,
}

impl EnemyState {
    pub fn alive(&self) -> bool {
        self.health > 0.0
    }
}

/// A live projectile. Direction is unit length; speed lives in the config.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bullet {
    /// World position on the floor plane.
    pub position: Vec2,
    /// Unit travel direction.
    pub direction: Vec2,
    /// Distance covered so far, for the range cap.
    pub traveled: f32,
}

/// Everything one arena owns: maze, actors, RNG, difficulty scalars, and
/// the pending event queue.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArenaState {
    /// Current maze layout.
    pub maze: Maze,
    /// Current arena kind.
    pub kind: ArenaKind,
    /// Count of arenas entered, starting at 1.
    pub arena_level: u32,
    /// Ticks elapsed since the run started.
    pub tick: u32,
    /// The player.
    pub player: PlayerState,
    /// Living and dying enemies; dead ones are swept each tick.
    pub enemies: Vec<EnemyState>,
    /// Live projectiles.
    pub bullets: Vec<Bullet>,
    /// Arena-owned RNG; all draws for this run flow through it.
    pub rng: DeterministicRng,
    next_enemy_id: u32,

    /// Standard wave size, grows as boss arenas are cleared.
    pub num_enemies: u32,
    /// Per-enemy health, grows as boss arenas are cleared.
    pub enemy_health: f32,
    /// Boss health pool, grows as standard arenas are cleared.
    pub boss_health: f32,

    events: Vec<GameEvent>,
}

impl ArenaState {
    /// Build the first arena from a seed.
    pub fn new(seed: u64, config: &ArenaConfig) -> Result<Self, MazeError> {
        let mut rng = DeterministicRng::new(seed);
        let maze = Maze::generate(config.standard_maze, &mut rng)?;
        let player = PlayerState::new(maze.cell_center(0, 0), config);

        let mut state = Self {
            maze,
            kind: ArenaKind::Standard,
            arena_level: 1,
            tick: 0,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            rng,
            next_enemy_id: 0,
            num_enemies: config.num_enemies,
            enemy_health: config.enemy_health,
            boss_health: config.boss_health,
            events: Vec::new(),
        };
        state.populate();
        state.push_entered_event();
        Ok(state)
    }

    /// Regenerate the maze and actors for the given arena kind. This is a
    /// stop-the-world swap between ticks; no collision query spans it.
    pub fn enter_arena(&mut self, kind: ArenaKind, config: &ArenaConfig) -> Result<(), MazeError> {
        let maze_config = match kind {
            ArenaKind::Standard => config.standard_maze,
            ArenaKind::Boss => config.boss_maze,
        };
        self.maze = Maze::generate(maze_config, &mut self.rng)?;
        self.kind = kind;
        self.arena_level += 1;
        self.bullets.clear();
        self.enemies.clear();

        self.player.position = self.maze.cell_center(0, 0);
        self.player.ammo = config.magazine_size;
        self.player.fire_cooldown = 0;
        self.player.reload_ticks = 0;

        self.populate();
        self.push_entered_event();
        info!(
            kind = ?self.kind,
            level = self.arena_level,
            enemies = self.enemies.len(),
            "arena entered"
        );
        Ok(())
    }

    /// Restart the current arena kind after the player dies. Health and
    /// ammo reset; difficulty scalars keep their current values.
    pub fn restart(&mut self, config: &ArenaConfig) -> Result<(), MazeError> {
        self.player.health = config.player_max_health;
        self.player.ticks_since_damage = u32::MAX;
        self.enter_arena(self.kind, config)
    }

    fn populate(&mut self) {
        match self.kind {
            ArenaKind::Standard => {
                let count = self.num_enemies;
                let health = self.enemy_health;
                self.spawn_enemies(count, health, false);
            }
            ArenaKind::Boss => {
                let n = self.maze.grid_size();
                let center = self.maze.cell_center(n / 2, n / 2);
                let boss_health = self.boss_health;
                self.spawn_enemy(center, boss_health, true);

                // Escorts: a third of the standard wave, rounded up.
                let escorts = self.num_enemies.div_ceil(3);
                let health = self.enemy_health;
                self.spawn_enemies(escorts, health, false);
            }
        }
    }

    /// Place enemies in distinct shuffled cells, skipping the 2x2 block
    /// around the player start so nothing spawns on top of the player.
    fn spawn_enemies(&mut self, count: u32, health: f32, is_boss: bool) {
        let n = self.maze.grid_size();
        let mut candidates: Vec<(usize, usize)> = (0..n * n)
            .map(|i| (i / n, i % n))
            .filter(|&(row, col)| row > 1 || col > 1)
            .collect();
        self.rng.shuffle(&mut candidates);

        for &(row, col) in candidates.iter().take(count as usize) {
            let center = self.maze.cell_center(row, col);
            self.spawn_enemy(center, health, is_boss);
        }
    }

    fn spawn_enemy(&mut self, position: Vec2, health: f32, is_boss: bool) {
        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;
        self.enemies.push(EnemyState {
            id,
            position,
            health,
            is_boss,
            hit_cooldown: 0,
        });
    }

    fn push_entered_event(&mut self) {
        let data = GameEventData::ArenaEntered {
            kind: self.kind,
            arena_level: self.arena_level,
            layout_hash: hex::encode(self.maze.layout_hash()),
        };
        self.push_event(GameEvent::new(self.tick, data));
    }

    /// Queue an event for this tick.
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain queued events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Living enemies.
    pub fn alive_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive()).count()
    }
}
