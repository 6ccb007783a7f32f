//! Arena Simulation Tick
//!
//! The per-tick driver: apply player input, advance bullets, steer
//! enemies, and handle arena transitions. Fully deterministic for a given
//! seed and input sequence; every random draw goes through the arena's
//! own RNG and actors update in fixed order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::vec2::Vec2;
use crate::game::collision;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::maze::{MazeConfig, MazeError};
use crate::game::state::{ArenaKind, ArenaState};

/// Player input for one tick.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct InputFrame {
    /// Desired movement direction; normalized before use.
    pub move_dir: Vec2,
    /// Fire request.
    pub fire: bool,
    /// Aim direction for a fired shot; normalized before use.
    pub fire_dir: Vec2,
    /// Manual reload request.
    pub reload: bool,
}

impl InputFrame {
    /// Frame with movement only.
    pub fn with_movement(move_dir: Vec2) -> Self {
        Self {
            move_dir,
            ..Default::default()
        }
    }

    /// Frame firing in a direction.
    pub fn firing(fire_dir: Vec2) -> Self {
        Self {
            fire: true,
            fire_dir,
            ..Default::default()
        }
    }
}

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Arena kind entered this tick, if a transition happened
    pub arena_transition: Option<ArenaKind>,
    /// Whether the player died this tick
    pub player_defeated: bool,
}

/// All simulation scalars. Defaults reproduce the reference balance.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Seconds per tick.
    pub tick_dt: f32,

    /// Player speed in world units per second.
    pub player_speed: f32,
    /// Player collision radius.
    pub player_radius: f32,
    /// Player health cap.
    pub player_max_health: f32,
    /// Ticks after the last hit before regeneration starts.
    pub regen_delay_ticks: u32,
    /// Ticks between regeneration pulses.
    pub regen_interval_ticks: u32,
    /// Health restored per pulse.
    pub regen_amount: f32,

    /// Base wave size in the standard arena.
    pub num_enemies: u32,
    /// Base enemy health.
    pub enemy_health: f32,
    /// Enemy speed in world units per second.
    pub enemy_speed: f32,
    /// Enemy collision radius.
    pub enemy_radius: f32,
    /// Pursuit radius as a multiple of the cell width.
    pub aggro_factor: f32,
    /// Ticks between contact hits from one enemy.
    pub enemy_hit_cooldown_ticks: u32,
    /// Damage per contact hit.
    pub enemy_damage: f32,

    /// Base boss health.
    pub boss_health: f32,
    /// Added to the boss pool each time the boss arena opens.
    pub boss_health_step: f32,
    /// Boss speed in world units per second.
    pub boss_speed: f32,
    /// Ticks between contact hits from the boss.
    pub boss_hit_cooldown_ticks: u32,
    /// Damage per boss contact hit.
    pub boss_damage: f32,
    /// Boss collision radius.
    pub boss_radius: f32,

    /// Damage per bullet hit.
    pub bullet_damage: f32,
    /// Bullet speed in world units per second.
    pub bullet_speed: f32,
    /// Bullet collision radius.
    pub bullet_radius: f32,
    /// Distance a bullet may travel before despawning.
    pub bullet_range: f32,
    /// Rounds per magazine.
    pub magazine_size: u32,
    /// Minimum ticks between shots.
    pub fire_interval_ticks: u32,
    /// Ticks a reload takes.
    pub reload_ticks: u32,
    /// Cap on simultaneously live bullets.
    pub max_live_bullets: u32,

    /// Maze geometry for the standard arena.
    pub standard_maze: MazeConfig,
    /// Maze geometry for the boss arena.
    pub boss_maze: MazeConfig,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            tick_dt: 1.0 / 60.0,

            player_speed: 12.0,
            player_radius: 1.55,
            player_max_health: 100.0,
            regen_delay_ticks: 180,
            regen_interval_ticks: 30,
            regen_amount: 3.0,

            num_enemies: 30,
            enemy_health: 100.0,
            enemy_speed: 8.0,
            enemy_radius: 2.0,
            aggro_factor: 1.5,
            enemy_hit_cooldown_ticks: 60,
            enemy_damage: 25.0,

            boss_health: 750.0,
            boss_health_step: 250.0,
            boss_speed: 6.0,
            boss_hit_cooldown_ticks: 120,
            boss_damage: 50.0,
            boss_radius: 2.0,

            bullet_damage: 25.0,
            bullet_speed: 50.0,
            bullet_radius: 0.03,
            bullet_range: 120.0,
            magazine_size: 30,
            fire_interval_ticks: 5,
            reload_ticks: 102,
            max_live_bullets: 30,

            standard_maze: MazeConfig {
                grid_size: 10,
                cell_width: 10.0,
                wall_thickness: 1.0,
            },
            boss_maze: MazeConfig {
                grid_size: 5,
                cell_width: 20.0,
                wall_thickness: 1.0,
            },
        }
    }
}

/// Run one simulation tick.
///
/// Deterministic order: player, bullets, enemies, removals, transitions.
/// Regeneration after an arena clear is the only fallible step, and only
/// for a degenerate maze config.
pub fn tick(
    state: &mut ArenaState,
    input: &InputFrame,
    config: &ArenaConfig,
) -> Result<TickResult, MazeError> {
    let mut result = TickResult::default();

    state.tick += 1;

    apply_player_input(state, input, config);
    advance_bullets(state, config);
    advance_enemies(state, config);

    state.enemies.retain(|e| e.alive());

    if state.enemies.is_empty() && state.player.alive() {
        let cleared = state.kind;
        state.push_event(GameEvent::new(
            state.tick,
            GameEventData::ArenaCleared {
                kind: cleared,
                arena_level: state.arena_level,
            },
        ));
        let next = match cleared {
            ArenaKind::Standard => {
                state.boss_health += config.boss_health_step;
                ArenaKind::Boss
            }
            ArenaKind::Boss => {
                state.num_enemies += 2;
                state.enemy_health += config.bullet_damage;
                ArenaKind::Standard
            }
        };
        state.enter_arena(next, config)?;
        result.arena_transition = Some(next);
    }

    if !state.player.alive() {
        state.push_event(GameEvent::new(
            state.tick,
            GameEventData::PlayerDefeated {
                arena_level: state.arena_level,
            },
        ));
        debug!(tick = state.tick, "player defeated, restarting arena");
        state.restart(config)?;
        result.player_defeated = true;
    }

    result.events = state.take_events();
    Ok(result)
}

/// Movement, regeneration, reload and fire handling.
fn apply_player_input(state: &mut ArenaState, input: &InputFrame, config: &ArenaConfig) {
    let dt = config.tick_dt;

    // Movement through the resolver; blocked components slide away.
    let wish = input.move_dir.normalize() * (config.player_speed * dt);
    if wish != Vec2::ZERO {
        let resolved = collision::resolve(
            &state.maze,
            state.player.position,
            wish,
            config.player_radius,
        );
        state.player.position += resolved;
    }

    // Regeneration: pulses once the post-hit delay has passed.
    state.player.ticks_since_damage = state.player.ticks_since_damage.saturating_add(1);
    if state.player.health < config.player_max_health
        && state.player.ticks_since_damage >= config.regen_delay_ticks
        && (state.player.ticks_since_damage - config.regen_delay_ticks)
            % config.regen_interval_ticks
            == 0
    {
        state.player.health =
            (state.player.health + config.regen_amount).min(config.player_max_health);
    }

    if state.player.fire_cooldown > 0 {
        state.player.fire_cooldown -= 1;
    }

    // Reload finishes before fire is considered this tick.
    if state.player.reload_ticks > 0 {
        state.player.reload_ticks -= 1;
        if state.player.reload_ticks == 0 {
            state.player.ammo = config.magazine_size;
        }
    }

    let wants_reload = input.reload && state.player.ammo < config.magazine_size;
    let dry_fire = input.fire && state.player.ammo == 0;
    if (wants_reload || dry_fire) && !state.player.reloading() {
        state.player.reload_ticks = config.reload_ticks;
        state.push_event(GameEvent::new(state.tick, GameEventData::ReloadStarted));
    }

    let direction = input.fire_dir.normalize();
    if input.fire
        && direction != Vec2::ZERO
        && !state.player.reloading()
        && state.player.fire_cooldown == 0
        && state.player.ammo > 0
        && (state.bullets.len() as u32) < config.max_live_bullets
    {
        state.player.ammo -= 1;
        state.player.fire_cooldown = config.fire_interval_ticks;
        let position = state.player.position;
        state.bullets.push(crate::game::state::Bullet {
            position,
            direction,
            traveled: 0.0,
        });
        let rounds_left = state.player.ammo;
        state.push_event(GameEvent::new(
            state.tick,
            GameEventData::ShotFired {
                position,
                direction,
                rounds_left,
            },
        ));
    }
}

/// Step every bullet: wall contact or range exhaustion despawns it, an
/// enemy overlap spends it on damage.
fn advance_bullets(state: &mut ArenaState, config: &ArenaConfig) {
    let step_len = config.bullet_speed * config.tick_dt;
    let mut defeated: Vec<(crate::game::state::EnemyId, Vec2)> = Vec::new();
    let mut surviving = Vec::with_capacity(state.bullets.len());

    for mut bullet in std::mem::take(&mut state.bullets) {
        let step = bullet.direction * step_len;
        if collision::probe(&state.maze, bullet.position, step, config.bullet_radius) {
            continue;
        }
        bullet.position += step;
        bullet.traveled += step_len;
        if bullet.traveled > config.bullet_range {
            continue;
        }

        let mut spent = false;
        for enemy in state.enemies.iter_mut().filter(|e| e.alive()) {
            let radius = if enemy.is_boss {
                config.boss_radius
            } else {
                config.enemy_radius
            };
            let reach = radius + config.bullet_radius;
            if bullet.position.distance_squared(enemy.position) < reach * reach {
                enemy.health -= config.bullet_damage;
                if !enemy.alive() {
                    defeated.push((enemy.id, enemy.position));
                }
                spent = true;
                break;
            }
        }
        if !spent {
            surviving.push(bullet);
        }
    }
    state.bullets = surviving;

    let remaining = state.alive_enemies() as u32;
    for (enemy_id, position) in defeated {
        state.push_event(GameEvent::new(
            state.tick,
            GameEventData::EnemyDefeated {
                enemy_id,
                position,
                remaining,
            },
        ));
    }
}

/// Direct pursuit steering plus contact damage. Enemies outside the aggro
/// radius hold position.
fn advance_enemies(state: &mut ArenaState, config: &ArenaConfig) {
    let dt = config.tick_dt;
    let aggro = config.aggro_factor * state.maze.cell_width();
    let player_pos = state.player.position;
    let maze = &state.maze;

    let mut hits: Vec<(crate::game::state::EnemyId, f32)> = Vec::new();

    for enemy in state.enemies.iter_mut().filter(|e| e.alive()) {
        if enemy.hit_cooldown > 0 {
            enemy.hit_cooldown -= 1;
        }

        let (speed, radius, damage, cooldown) = if enemy.is_boss {
            (
                config.boss_speed,
                config.boss_radius,
                config.boss_damage,
                config.boss_hit_cooldown_ticks,
            )
        } else {
            (
                config.enemy_speed,
                config.enemy_radius,
                config.enemy_damage,
                config.enemy_hit_cooldown_ticks,
            )
        };

        let to_player = player_pos - enemy.position;
        let distance = to_player.length();
        if distance < aggro && distance > f32::EPSILON {
            let wish = to_player.normalize() * (speed * dt);
            let resolved = collision::resolve(maze, enemy.position, wish, radius);
            enemy.position += resolved;
        }

        let contact = radius + config.player_radius;
        if enemy.hit_cooldown == 0
            && enemy.position.distance_squared(player_pos) < contact * contact
        {
            enemy.hit_cooldown = cooldown;
            hits.push((enemy.id, damage));
        }
    }

    for (enemy_id, damage) in hits {
        state.player.health -= damage;
        state.player.ticks_since_damage = 0;
        let health_left = state.player.health.max(0.0);
        state.push_event(GameEvent::new(
            state.tick,
            GameEventData::PlayerDamaged {
                enemy_id,
                damage,
                health_left,
            },
        ));
    }
}

/// Drive a state through a recorded input sequence, collecting all events.
pub fn run_ticks(
    state: &mut ArenaState,
    inputs: &[InputFrame],
    config: &ArenaConfig,
) -> Result<Vec<GameEvent>, MazeError> {
    let mut all_events = Vec::new();
    for input in inputs {
        let result = tick(state, input, config)?;
        all_events.extend(result.events);
    }
    Ok(all_events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{EnemyId, EnemyState};

    fn quiet_state(seed: u64, config: &ArenaConfig) -> ArenaState {
        // One distant enemy keeps the arena from clearing mid-test.
        let mut state = ArenaState::new(seed, config).unwrap();
        state.take_events();
        state.enemies.clear();
        state.enemies.push(EnemyState {
            id: EnemyId(1000),
            position: state.maze.cell_center(9, 9),
            health: config.enemy_health,
            is_boss: false,
            hit_cooldown: 0,
        });
        state
    }

    #[test]
    fn test_tick_determinism() {
        let config = ArenaConfig::default();
        let mut state1 = ArenaState::new(42, &config).unwrap();
        let mut state2 = ArenaState::new(42, &config).unwrap();

        let input = InputFrame {
            move_dir: Vec2::new(1.0, 0.3),
            fire: true,
            fire_dir: Vec2::new(0.0, 1.0),
            reload: false,
        };
        for _ in 0..200 {
            tick(&mut state1, &input, &config).unwrap();
            tick(&mut state2, &input, &config).unwrap();
        }

        assert_eq!(state1.tick, state2.tick);
        assert_eq!(state1.player.position, state2.player.position);
        assert_eq!(state1.player.health, state2.player.health);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.maze.layout_hash(), state2.maze.layout_hash());
    }

    #[test]
    fn test_player_movement() {
        let config = ArenaConfig::default();
        let mut state = quiet_state(1, &config);
        let start = state.player.position;

        let input = InputFrame::with_movement(Vec2::new(1.0, 0.0));
        tick(&mut state, &input, &config).unwrap();

        let expected = config.player_speed * config.tick_dt;
        assert!((state.player.position.x - start.x - expected).abs() < 1e-5);
        assert_eq!(state.player.position.z, start.z);
    }

    #[test]
    fn test_player_never_leaves_maze() {
        let config = ArenaConfig::default();
        let mut state = quiet_state(8, &config);
        let margin = config.player_radius + state.maze.wall_thickness();
        let size = state.maze.size();

        // Shove into the near corner for a while.
        let input = InputFrame::with_movement(Vec2::new(-1.0, -1.0));
        for _ in 0..300 {
            tick(&mut state, &input, &config).unwrap();
            assert!(state.player.position.x >= margin - 1e-3);
            assert!(state.player.position.z >= margin - 1e-3);
            assert!(state.player.position.x <= size - margin + 1e-3);
        }
    }

    #[test]
    fn test_fire_spawns_bullet() {
        let config = ArenaConfig::default();
        let mut state = quiet_state(2, &config);

        let input = InputFrame::firing(Vec2::new(1.0, 0.0));
        let result = tick(&mut state, &input, &config).unwrap();

        assert_eq!(state.player.ammo, config.magazine_size - 1);
        assert_eq!(state.bullets.len(), 1);
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::ShotFired { .. })));
    }

    #[test]
    fn test_fire_rate_limit() {
        let config = ArenaConfig::default();
        let mut state = quiet_state(2, &config);

        // Bullet flies east and dies on a wall long before the range cap,
        // so live-bullet count never throttles this.
        let input = InputFrame::firing(Vec2::new(1.0, 0.0));
        for _ in 0..10 {
            tick(&mut state, &input, &config).unwrap();
        }

        // Shots at ticks 1 and 6 only.
        assert_eq!(state.player.ammo, config.magazine_size - 2);
    }

    #[test]
    fn test_reload_cycle() {
        let config = ArenaConfig::default();
        let mut state = quiet_state(3, &config);
        state.player.ammo = 5;

        let reload = InputFrame {
            reload: true,
            ..Default::default()
        };
        let result = tick(&mut state, &reload, &config).unwrap();
        assert!(state.player.reloading());
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::ReloadStarted)));

        // Firing while reloading does nothing.
        let fire = InputFrame::firing(Vec2::new(1.0, 0.0));
        tick(&mut state, &fire, &config).unwrap();
        assert_eq!(state.player.ammo, 5);
        assert!(state.bullets.is_empty());

        let idle = InputFrame::default();
        for _ in 0..config.reload_ticks {
            tick(&mut state, &idle, &config).unwrap();
        }
        assert!(!state.player.reloading());
        assert_eq!(state.player.ammo, config.magazine_size);
    }

    #[test]
    fn test_empty_magazine_auto_reloads() {
        let config = ArenaConfig::default();
        let mut state = quiet_state(3, &config);
        state.player.ammo = 0;

        let fire = InputFrame::firing(Vec2::new(1.0, 0.0));
        tick(&mut state, &fire, &config).unwrap();
        assert!(state.player.reloading());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_bullet_damages_enemy() {
        let config = ArenaConfig::default();
        let mut state = quiet_state(4, &config);

        // Same cell as the player, no wall in between.
        let target = state.player.position + Vec2::new(3.0, 0.0);
        state.enemies.push(EnemyState {
            id: EnemyId(2000),
            position: target,
            health: config.enemy_health,
            is_boss: false,
            hit_cooldown: u32::MAX,
        });

        let fire = InputFrame::firing(Vec2::new(1.0, 0.0));
        tick(&mut state, &fire, &config).unwrap();
        let idle = InputFrame::default();
        for _ in 0..10 {
            tick(&mut state, &idle, &config).unwrap();
        }

        let enemy = state.enemies.iter().find(|e| e.id == EnemyId(2000)).unwrap();
        assert_eq!(enemy.health, config.enemy_health - config.bullet_damage);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_enemy_pursuit_and_contact_damage() {
        let config = ArenaConfig::default();
        let mut state = quiet_state(5, &config);

        let start = state.player.position + Vec2::new(4.0, 0.0);
        state.enemies.push(EnemyState {
            id: EnemyId(3000),
            position: start,
            health: config.enemy_health,
            is_boss: false,
            hit_cooldown: 0,
        });

        let idle = InputFrame::default();
        let mut damaged = false;
        for _ in 0..120 {
            let result = tick(&mut state, &idle, &config).unwrap();
            if result
                .events
                .iter()
                .any(|e| matches!(e.data, GameEventData::PlayerDamaged { .. }))
            {
                damaged = true;
                break;
            }
        }
        assert!(damaged, "pursuing enemy never reached the player");
        assert_eq!(
            state.player.health,
            config.player_max_health - config.enemy_damage
        );
        assert_eq!(state.player.ticks_since_damage, 0);
    }

    #[test]
    fn test_idle_enemy_outside_aggro() {
        let config = ArenaConfig::default();
        let mut state = quiet_state(6, &config);
        let far = state.enemies[0].position;
        assert!(far.distance(state.player.position) > config.aggro_factor * 10.0);

        let idle = InputFrame::default();
        for _ in 0..60 {
            tick(&mut state, &idle, &config).unwrap();
        }
        assert_eq!(state.enemies[0].position, far);
    }

    #[test]
    fn test_health_regeneration() {
        let config = ArenaConfig::default();
        let mut state = quiet_state(7, &config);
        state.player.health = 40.0;
        state.player.ticks_since_damage = 0;

        let idle = InputFrame::default();
        for _ in 0..config.regen_delay_ticks - 1 {
            tick(&mut state, &idle, &config).unwrap();
        }
        assert_eq!(state.player.health, 40.0, "regen before the delay");

        for _ in 0..10 * config.regen_interval_ticks {
            tick(&mut state, &idle, &config).unwrap();
        }
        assert!(state.player.health > 40.0);
        assert!(state.player.health <= config.player_max_health);
    }

    #[test]
    fn test_arena_alternation_and_scaling() {
        let config = ArenaConfig::default();
        let mut state = ArenaState::new(10, &config).unwrap();
        let idle = InputFrame::default();

        state.enemies.clear();
        let result = tick(&mut state, &idle, &config).unwrap();
        assert_eq!(result.arena_transition, Some(ArenaKind::Boss));
        assert_eq!(state.kind, ArenaKind::Boss);
        assert_eq!(state.arena_level, 2);
        assert_eq!(state.boss_health, config.boss_health + config.boss_health_step);
        assert!(state.enemies.iter().any(|e| e.is_boss));
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::ArenaCleared { .. })));

        state.enemies.clear();
        let result = tick(&mut state, &idle, &config).unwrap();
        assert_eq!(result.arena_transition, Some(ArenaKind::Standard));
        assert_eq!(state.num_enemies, config.num_enemies + 2);
        assert_eq!(
            state.enemy_health,
            config.enemy_health + config.bullet_damage
        );
        assert_eq!(state.enemies.len(), state.num_enemies as usize);
    }

    #[test]
    fn test_player_death_restarts_arena() {
        let config = ArenaConfig::default();
        let mut state = quiet_state(11, &config);
        state.player.health = 0.0;
        let level = state.arena_level;

        let result = tick(&mut state, &InputFrame::default(), &config).unwrap();
        assert!(result.player_defeated);
        assert_eq!(state.player.health, config.player_max_health);
        assert_eq!(state.kind, ArenaKind::Standard);
        assert_eq!(state.arena_level, level + 1);
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::PlayerDefeated { .. })));
    }

    #[test]
    fn test_replay_determinism() {
        let config = ArenaConfig::default();
        let inputs: Vec<InputFrame> = (0..300)
            .map(|i| InputFrame {
                move_dir: Vec2::new(((i % 7) as f32 - 3.0) / 3.0, ((i % 5) as f32 - 2.0) / 2.0),
                fire: i % 3 == 0,
                fire_dir: Vec2::new(1.0, 0.2),
                reload: i % 97 == 0,
            })
            .collect();

        let mut state1 = ArenaState::new(99999, &config).unwrap();
        let mut state2 = ArenaState::new(99999, &config).unwrap();
        let events1 = run_ticks(&mut state1, &inputs, &config).unwrap();
        let events2 = run_ticks(&mut state2, &inputs, &config).unwrap();

        assert_eq!(events1.len(), events2.len());
        assert_eq!(state1.player.position, state2.player.position);
        assert_eq!(state1.maze.layout_hash(), state2.maze.layout_hash());
    }
}
