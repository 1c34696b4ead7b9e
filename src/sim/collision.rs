//! Narrow-phase collision tests
//!
//! Pure predicate functions over current-frame geometry. The tick calls these
//! with fresh snapshots each step; nothing in here holds state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box: top-left corner plus extents.
///
/// Extents are non-negative; coordinates are arena pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corners clockwise from the top-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.x + self.width, self.y),
            Vec2::new(self.x + self.width, self.y + self.height),
            Vec2::new(self.x, self.y + self.height),
        ]
    }

    /// Whether a point falls within the box (boundary included)
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// A circle: center plus radius ≥ 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Overlap test for two boxes.
///
/// Strict inequalities: boxes that merely share an edge do not collide.
#[inline]
pub fn rect_rect_collision(a: &Aabb, b: &Aabb) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Overlap test for two circles. Exactly tangent circles do not collide.
#[inline]
pub fn circle_circle_collision(a: &Circle, b: &Circle) -> bool {
    a.center.distance(b.center) < a.radius + b.radius
}

/// Overlap test for a box and a circle.
///
/// Clamps the circle center to the box to find the closest point, then
/// compares squared distances (no square root). A center inside the box
/// clamps to itself, so containment is covered by the same path.
pub fn rect_circle_collision(rect: &Aabb, circle: &Circle) -> bool {
    let closest = Vec2::new(
        circle.center.x.clamp(rect.x, rect.x + rect.width),
        circle.center.y.clamp(rect.y, rect.y + rect.height),
    );
    closest.distance_squared(circle.center) < circle.radius * circle.radius
}

/// Absolute tolerance for the area-sum comparison; keeps points sitting on an
/// edge or vertex counted as inside despite rounding.
const TRIANGLE_AREA_EPSILON: f64 = 1e-5;

/// Shoelace area, absolute value (orientation-independent).
///
/// Summed in double precision: single-precision products at arena
/// coordinates round by more than the area tolerance.
#[inline]
fn triangle_area(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (cx, cy) = (c.x as f64, c.y as f64);
    ((ax * (by - cy) + bx * (cy - ay) + cx * (ay - by)) / 2.0).abs()
}

/// Point-in-triangle test via the area-sum method.
///
/// The three sub-triangles formed with the query point tile the triangle
/// exactly when the point is inside or on the boundary, so their areas sum to
/// the original area. No winding-order requirement.
pub fn point_in_triangle(tri: &[Vec2; 3], point: Vec2) -> bool {
    let [p1, p2, p3] = *tri;

    let area = triangle_area(p1, p2, p3);
    let a1 = triangle_area(point, p2, p3);
    let a2 = triangle_area(p1, point, p3);
    let a3 = triangle_area(p1, p2, point);

    (a1 + a2 + a3 - area).abs() < TRIANGLE_AREA_EPSILON
}

/// Every enemy/missile index pair whose boxes overlap.
///
/// Direct nested scan, enemies outer, missiles inner; pairs come back in that
/// order. Entity counts stay small enough that the broad-phase in
/// [`grid`](super::grid) buys nothing here, so the two are not composed.
pub fn enemy_missile_collisions(enemies: &[Aabb], missiles: &[Aabb]) -> Vec<(usize, usize)> {
    let mut hits = Vec::new();

    for (ei, enemy) in enemies.iter().enumerate() {
        for (mi, missile) in missiles.iter().enumerate() {
            if rect_rect_collision(enemy, missile) {
                hits.push((ei, mi));
            }
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_rect_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(5.0, 5.0, 10.0, 10.0);
        assert!(rect_rect_collision(&a, &b));
        assert!(rect_rect_collision(&b, &a));
    }

    #[test]
    fn test_rect_rect_edge_touch_is_not_collision() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(10.0, 0.0, 10.0, 10.0);
        assert!(!rect_rect_collision(&a, &b));

        let below = Aabb::new(0.0, 10.0, 10.0, 10.0);
        assert!(!rect_rect_collision(&a, &below));
    }

    #[test]
    fn test_rect_rect_disjoint() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(100.0, 100.0, 10.0, 10.0);
        assert!(!rect_rect_collision(&a, &b));
    }

    #[test]
    fn test_circle_circle_overlap_and_tangent() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 5.0);
        let b = Circle::new(Vec2::new(8.0, 0.0), 5.0);
        assert!(circle_circle_collision(&a, &b));

        // Tangent: distance == sum of radii
        let c = Circle::new(Vec2::new(10.0, 0.0), 5.0);
        assert!(!circle_circle_collision(&a, &c));
    }

    #[test]
    fn test_rect_circle_center_inside() {
        let rect = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let circle = Circle::new(Vec2::new(5.0, 5.0), 1.0);
        assert!(rect_circle_collision(&rect, &circle));
    }

    #[test]
    fn test_rect_circle_far_away() {
        let rect = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let circle = Circle::new(Vec2::new(20.0, 20.0), 1.0);
        assert!(!rect_circle_collision(&rect, &circle));
    }

    #[test]
    fn test_rect_circle_near_edge() {
        let rect = Aabb::new(0.0, 0.0, 10.0, 10.0);
        // Closest point is (10, 5); distance 3 < radius 4
        let near = Circle::new(Vec2::new(13.0, 5.0), 4.0);
        assert!(rect_circle_collision(&rect, &near));
        // Distance 3 > radius 2
        let far = Circle::new(Vec2::new(13.0, 5.0), 2.0);
        assert!(!rect_circle_collision(&rect, &far));
    }

    #[test]
    fn test_point_in_triangle() {
        let tri = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_triangle(&tri, Vec2::new(2.0, 2.0)));
        assert!(!point_in_triangle(&tri, Vec2::new(20.0, 20.0)));
    }

    #[test]
    fn test_point_on_triangle_vertex_and_edge() {
        let tri = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_triangle(&tri, Vec2::new(0.0, 0.0)));
        assert!(point_in_triangle(&tri, Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn test_point_in_triangle_reversed_winding() {
        let tri = [
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 0.0),
        ];
        assert!(point_in_triangle(&tri, Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn test_enemy_missile_empty_inputs() {
        let boxes = [Aabb::new(0.0, 0.0, 10.0, 10.0)];
        assert!(enemy_missile_collisions(&[], &boxes).is_empty());
        assert!(enemy_missile_collisions(&boxes, &[]).is_empty());
    }

    #[test]
    fn test_enemy_missile_single_hit() {
        let enemies = [Aabb::new(0.0, 0.0, 10.0, 10.0)];
        let missiles = [Aabb::new(5.0, 5.0, 2.0, 2.0)];
        let hits = enemy_missile_collisions(&enemies, &missiles);
        assert_eq!(hits, vec![(0, 0)]);
    }

    #[test]
    fn test_enemy_missile_nested_order() {
        let enemies = [
            Aabb::new(0.0, 0.0, 10.0, 10.0),
            Aabb::new(0.0, 0.0, 10.0, 10.0),
        ];
        let missiles = [
            Aabb::new(1.0, 1.0, 2.0, 2.0),
            Aabb::new(6.0, 6.0, 2.0, 2.0),
        ];
        let hits = enemy_missile_collisions(&enemies, &missiles);
        assert_eq!(hits, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    fn arb_aabb() -> impl Strategy<Value = Aabb> {
        (
            -100.0f32..100.0,
            -100.0f32..100.0,
            0.0f32..50.0,
            0.0f32..50.0,
        )
            .prop_map(|(x, y, w, h)| Aabb::new(x, y, w, h))
    }

    fn arb_circle() -> impl Strategy<Value = Circle> {
        (-100.0f32..100.0, -100.0f32..100.0, 0.0f32..50.0)
            .prop_map(|(x, y, r)| Circle::new(Vec2::new(x, y), r))
    }

    proptest! {
        #[test]
        fn prop_rect_rect_symmetric(a in arb_aabb(), b in arb_aabb()) {
            prop_assert_eq!(rect_rect_collision(&a, &b), rect_rect_collision(&b, &a));
        }

        #[test]
        fn prop_circle_circle_symmetric(a in arb_circle(), b in arb_circle()) {
            prop_assert_eq!(circle_circle_collision(&a, &b), circle_circle_collision(&b, &a));
        }

        #[test]
        fn prop_rect_never_collides_with_far_circle(rect in arb_aabb()) {
            // Anything beyond the box's diagonal reach plus the radius misses
            let circle = Circle::new(Vec2::new(1000.0, 1000.0), 10.0);
            prop_assert!(!rect_circle_collision(&rect, &circle));
        }
    }
}
