//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod grid;
pub mod state;
pub mod tick;

pub use collision::{
    Aabb, Circle, circle_circle_collision, enemy_missile_collisions, point_in_triangle,
    rect_circle_collision, rect_rect_collision,
};
pub use grid::{Collidable, CollisionPair, detect_collisions_grid};
pub use state::{Enemy, GamePhase, GameState, Missile, Player};
pub use tick::{TickInput, tick};
