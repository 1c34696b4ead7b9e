//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::collision::{self, Aabb};
use super::state::{GamePhase, GameState, Missile};
use crate::consts::*;

/// Input snapshot for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Held movement keys
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire key held (cooldown-gated)
    pub fire: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;
    let time_secs = state.time_ticks as f32 * SIM_DT;

    // Player movement: axes applied independently, clamped to the arena
    let mut dir = Vec2::ZERO;
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }
    if input.up {
        dir.y -= 1.0;
    }
    if input.down {
        dir.y += 1.0;
    }
    let bounds = &mut state.player.bounds;
    bounds.x = (bounds.x + dir.x * PLAYER_SPEED * dt).clamp(0.0, AREA_WIDTH - bounds.width);
    bounds.y = (bounds.y + dir.y * PLAYER_SPEED * dt).clamp(0.0, AREA_HEIGHT - bounds.height);

    // Firing, gated by the cooldown
    if state.player.fire_cooldown > 0 {
        state.player.fire_cooldown -= 1;
    }
    if input.fire && state.player.fire_cooldown == 0 {
        let nose = state.player.bounds;
        let id = state.next_entity_id();
        state.missiles.push(Missile {
            id,
            bounds: Aabb::new(
                nose.x + nose.width / 2.0 - MISSILE_WIDTH / 2.0,
                nose.y,
                MISSILE_WIDTH,
                MISSILE_HEIGHT,
            ),
        });
        state.player.fire_cooldown = MISSILE_COOLDOWN_TICKS;
    }

    // Missiles fly straight up; gone once fully above the arena
    for missile in &mut state.missiles {
        missile.bounds.y -= MISSILE_SPEED * dt;
    }
    state.missiles.retain(|m| m.bounds.y + m.bounds.height > 0.0);

    // Enemy spawn cadence
    if state.spawn_timer > 0 {
        state.spawn_timer -= 1;
    }
    if state.spawn_timer == 0 {
        state.spawn_enemy();
        state.spawn_timer = spawn_interval(state);
    }

    // Enemies drift horizontally and sway about their spawn row
    for enemy in &mut state.enemies {
        enemy.bounds.x += enemy.vel_x * dt;
        enemy.bounds.y = enemy.base_y
            + ENEMY_SWAY_AMPLITUDE * (ENEMY_SWAY_FREQ * time_secs + enemy.sway_phase).sin();
    }
    state.enemies.retain(|e| {
        if e.vel_x > 0.0 {
            e.bounds.x < AREA_WIDTH
        } else {
            e.bounds.x + e.bounds.width > 0.0
        }
    });

    // Enemy-missile hits over this tick's box snapshots. Pairs arrive in
    // nested order; the first pairing consumes both entities and later pairs
    // naming a consumed entity are skipped.
    let enemy_boxes: Vec<Aabb> = state.enemies.iter().map(|e| e.bounds).collect();
    let missile_boxes: Vec<Aabb> = state.missiles.iter().map(|m| m.bounds).collect();

    let mut dead_enemies: Vec<usize> = Vec::new();
    let mut dead_missiles: Vec<usize> = Vec::new();
    for (ei, mi) in collision::enemy_missile_collisions(&enemy_boxes, &missile_boxes) {
        if dead_enemies.contains(&ei) || dead_missiles.contains(&mi) {
            continue;
        }
        dead_enemies.push(ei);
        dead_missiles.push(mi);

        // Smaller enemies are worth more
        let size = enemy_boxes[ei].width;
        state.score += ENEMY_BASE_SCORE + (ENEMY_MAX_SIZE - size).round() as u64;
        state.enemies_destroyed += 1;
    }
    remove_indices(&mut state.enemies, &mut dead_enemies);
    remove_indices(&mut state.missiles, &mut dead_missiles);

    // Player-enemy hits: box overlap first, then the ship silhouette.
    // Probes run both ways since either shape can poke into the other.
    if state.player.invuln_ticks > 0 {
        state.player.invuln_ticks -= 1;
    } else {
        let player_box = state.player.bounds;
        let tri = state.player.ship_triangle();

        let hit = state.enemies.iter().position(|enemy| {
            if !collision::rect_rect_collision(&player_box, &enemy.bounds) {
                return false;
            }
            let mut probes = enemy.bounds.corners().to_vec();
            probes.push(enemy.bounds.center());
            probes
                .iter()
                .any(|&p| collision::point_in_triangle(&tri, p))
                || tri.iter().any(|&v| enemy.bounds.contains_point(v))
        });

        if let Some(index) = hit {
            state.enemies.remove(index);
            state.lives = state.lives.saturating_sub(1);
            state.player.invuln_ticks = PLAYER_INVULN_TICKS;
            if state.lives == 0 {
                state.phase = GamePhase::GameOver;
                log::info!(
                    "Game over: score {} after {} ticks",
                    state.score,
                    state.time_ticks
                );
            }
        }
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Current spawn cadence: difficulty-scaled base, tightening to 40% of base
/// over the first two minutes, floored
fn spawn_interval(state: &GameState) -> u32 {
    let base = ENEMY_SPAWN_INTERVAL_TICKS as f32 * state.difficulty.spawn_interval_scale();
    let elapsed = state.time_ticks as f32 * SIM_DT;
    let ramp = 1.0 - 0.6 * (elapsed / 120.0).min(1.0);
    ((base * ramp).round() as u32).max(ENEMY_SPAWN_INTERVAL_MIN_TICKS)
}

/// Remove the given indices, highest first so earlier ones stay valid
fn remove_indices<T>(items: &mut Vec<T>, indices: &mut Vec<usize>) {
    indices.sort_unstable_by(|a, b| b.cmp(a));
    for &index in indices.iter() {
        items.remove(index);
    }
}
