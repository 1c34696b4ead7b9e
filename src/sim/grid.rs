//! Uniform-grid broad-phase pair detection
//!
//! Buckets objects into fixed-size cells so only pairs sharing at least one
//! cell reach the caller's narrow-phase predicate. Average cost is bounded by
//! objects-per-cell; everything in one cell degrades to the plain O(n²) scan.

use std::collections::{BTreeMap, HashSet};

use super::collision::Aabb;

/// Anything with axis-aligned bounds can go through the broad-phase.
pub trait Collidable {
    fn bounds(&self) -> Aabb;
}

impl Collidable for Aabb {
    fn bounds(&self) -> Aabb {
        *self
    }
}

/// A distinct colliding pair found by the broad-phase.
///
/// `key` is the `(min, max)` pair of the objects' indices in the input slice;
/// it identifies the pair no matter which shared cell produced it.
#[derive(Debug)]
pub struct CollisionPair<'a, T> {
    pub key: (usize, usize),
    pub a: &'a T,
    pub b: &'a T,
}

/// Grid-bucketed pair detection.
///
/// Each object is registered in every cell its bounds reach: the inclusive
/// cell range from its top-left corner through its bottom-right one, so a
/// zero-extent object still lands in exactly one cell and a box straddling a
/// cell boundary is present on both sides of it. Every unordered pair sharing
/// a cell is tested once with `narrow_phase`; colliding pairs are reported
/// exactly once each, in deterministic (sorted-cell) order.
///
/// Callers supply a positive `cell_size` and non-negative extents; nothing is
/// validated here.
pub fn detect_collisions_grid<'a, T, F>(
    objects: &'a [T],
    cell_size: f32,
    mut narrow_phase: F,
) -> Vec<CollisionPair<'a, T>>
where
    T: Collidable,
    F: FnMut(&T, &T) -> bool,
{
    // Sorted map keeps cell traversal (and output) order stable run to run.
    let mut grid: BTreeMap<(i32, i32), Vec<usize>> = BTreeMap::new();

    for (index, obj) in objects.iter().enumerate() {
        let b = obj.bounds();
        let min_x = (b.x / cell_size).floor() as i32;
        let min_y = (b.y / cell_size).floor() as i32;
        let max_x = ((b.x + b.width) / cell_size).floor() as i32;
        let max_y = ((b.y + b.height) / cell_size).floor() as i32;

        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                grid.entry((cx, cy)).or_default().push(index);
            }
        }
    }

    // A pair spanning several shared cells is only tested the first time.
    let mut tested: HashSet<(usize, usize)> = HashSet::new();
    let mut pairs = Vec::new();

    for bucket in grid.values() {
        for i in 0..bucket.len() {
            for j in i + 1..bucket.len() {
                let key = (bucket[i].min(bucket[j]), bucket[i].max(bucket[j]));
                if !tested.insert(key) {
                    continue;
                }

                let (a, b) = (&objects[bucket[i]], &objects[bucket[j]]);
                if narrow_phase(a, b) {
                    pairs.push(CollisionPair { key, a, b });
                }
            }
        }
    }

    pairs
}
