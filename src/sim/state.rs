//! Game state and entity types
//!
//! Everything needed to replay a run deterministically lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::grid::Collidable;
use crate::consts::*;
use crate::settings::DifficultyPreset;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub bounds: Aabb,
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
    /// Post-hit grace ticks; the ship can't be hit while nonzero
    pub invuln_ticks: u32,
}

impl Player {
    /// Ship at the bottom-center starting position
    pub fn spawn() -> Self {
        Self {
            bounds: Aabb::new(
                AREA_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
                AREA_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
            fire_cooldown: 0,
            invuln_ticks: 0,
        }
    }

    /// Nose-up ship silhouette in arena coordinates
    pub fn ship_triangle(&self) -> [Vec2; 3] {
        let b = &self.bounds;
        [
            Vec2::new(b.x + b.width / 2.0, b.y),
            Vec2::new(b.x, b.y + b.height),
            Vec2::new(b.x + b.width, b.y + b.height),
        ]
    }

}

/// A missile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Missile {
    pub id: u32,
    pub bounds: Aabb,
}

impl Collidable for Missile {
    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// An enemy drifting across the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub bounds: Aabb,
    /// Signed horizontal speed (px/s); the sign is the travel direction
    pub vel_x: f32,
    /// Row the vertical sway oscillates around
    pub base_y: f32,
    /// Phase offset so enemies don't sway in lockstep
    pub sway_phase: f32,
}

impl Collidable for Enemy {
    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Difficulty the run was started with
    pub difficulty: DifficultyPreset,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub enemies_destroyed: u32,
    pub player: Player,
    /// Active missiles (sorted by id for determinism)
    pub missiles: Vec<Missile>,
    /// Active enemies (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    /// Ticks until the next enemy spawn
    pub spawn_timer: u32,
    /// Spawns so far; stream position for spawn randomness
    spawned: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64, difficulty: DifficultyPreset) -> Self {
        Self {
            seed,
            difficulty,
            time_ticks: 0,
            phase: GamePhase::Playing,
            score: 0,
            lives: difficulty.starting_lives(),
            enemies_destroyed: 0,
            player: Player::spawn(),
            missiles: Vec::new(),
            enemies: Vec::new(),
            spawn_timer: ENEMY_SPAWN_INTERVAL_TICKS,
            spawned: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fresh RNG for the next spawn, derived from the run seed and the spawn
    /// counter. Re-seeding per spawn keeps the state serializable and makes
    /// replays exact without carrying a live RNG across ticks.
    fn spawn_rng(&mut self) -> Pcg32 {
        let stream = self.spawned;
        self.spawned += 1;
        Pcg32::seed_from_u64(self.seed.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
    }

    /// Spawn one enemy at the left or right arena edge
    pub fn spawn_enemy(&mut self) {
        let mut rng = self.spawn_rng();

        let size = rng.random_range(ENEMY_MIN_SIZE..ENEMY_MAX_SIZE);
        let speed =
            rng.random_range(ENEMY_MIN_SPEED..ENEMY_MAX_SPEED) * self.difficulty.enemy_speed_scale();
        let from_left = rng.random_bool(0.5);
        // Keep the full sway band inside the arena
        let base_y =
            rng.random_range(ENEMY_SWAY_AMPLITUDE..(AREA_HEIGHT - size - ENEMY_SWAY_AMPLITUDE));
        let sway_phase = rng.random_range(0.0..std::f32::consts::TAU);

        let x = if from_left { -size } else { AREA_WIDTH };
        let vel_x = if from_left { speed } else { -speed };

        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            bounds: Aabb::new(x, base_y, size, size),
            vel_x,
            base_y,
            sway_phase,
        });
    }

    /// Ensure entity lists are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.missiles.sort_by_key(|m| m.id);
        self.enemies.sort_by_key(|e| e.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_spawn_position() {
        let player = Player::spawn();
        assert_eq!(player.bounds.x, AREA_WIDTH / 2.0 - PLAYER_WIDTH / 2.0);
        assert_eq!(
            player.bounds.y,
            AREA_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN
        );
    }

    #[test]
    fn test_ship_triangle_matches_bounds() {
        let player = Player::spawn();
        let tri = player.ship_triangle();
        // Nose at top-center, base along the bottom edge
        assert_eq!(tri[0].y, player.bounds.y);
        assert_eq!(tri[1], Vec2::new(player.bounds.x, player.bounds.y + PLAYER_HEIGHT));
        assert_eq!(tri[2].x, player.bounds.x + PLAYER_WIDTH);
    }

    #[test]
    fn test_spawn_enemy_starts_at_an_edge() {
        let mut state = GameState::new(7, DifficultyPreset::Normal);
        for _ in 0..16 {
            state.spawn_enemy();
        }
        assert_eq!(state.enemies.len(), 16);
        for enemy in &state.enemies {
            let b = &enemy.bounds;
            assert!(b.x == -b.width || b.x == AREA_WIDTH);
            // Moving into the arena, not away from it
            if b.x < 0.0 {
                assert!(enemy.vel_x > 0.0);
            } else {
                assert!(enemy.vel_x < 0.0);
            }
            assert!(b.width >= ENEMY_MIN_SIZE && b.width < ENEMY_MAX_SIZE);
            assert!(enemy.base_y >= ENEMY_SWAY_AMPLITUDE);
            assert!(enemy.base_y <= AREA_HEIGHT - b.height - ENEMY_SWAY_AMPLITUDE);
        }
    }

    #[test]
    fn test_spawns_deterministic_per_seed() {
        let mut a = GameState::new(99, DifficultyPreset::Normal);
        let mut b = GameState::new(99, DifficultyPreset::Normal);
        for _ in 0..8 {
            a.spawn_enemy();
            b.spawn_enemy();
        }
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.bounds, eb.bounds);
            assert_eq!(ea.vel_x, eb.vel_x);
            assert_eq!(ea.sway_phase, eb.sway_phase);
        }
    }
}
