//! Terrain collision and erosion
//!
//! A creature's head is tested against the cell under its projected next
//! position. On impact the creature bounces, picks a horizontal escape by
//! probing both sides, and wears the struck cell down.
//!
//! The left probe sits at `head.x - reach`. The right probe is taken at
//! `head.y + reach` on the same projected row, so above ground an impact
//! often finds both sides open and scrambles.

use glam::DVec2;
use rand::Rng;

use super::creature::Creature;
use super::terrain::Terrain;
use crate::consts::*;
use crate::world_to_cell;

/// Result of an impact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    /// Struck cell coordinates
    pub ex: i64,
    pub ey: i64,
    /// The impact wore the cell away entirely
    pub cleared: bool,
}

/// Whether solid matter occupies the cell under a world position.
///
/// Never writes to the terrain; unwritten underground cells count as solid.
pub fn is_solid(terrain: &Terrain, pos: DVec2) -> bool {
    terrain
        .sample(world_to_cell(pos.x), world_to_cell(pos.y))
        .is_some_and(|cell| cell.present)
}

/// Test the creature's next head position and respond to any impact.
///
/// Touching unwritten underground matter materializes it so it can erode.
pub fn resolve(
    creature: &mut Creature,
    terrain: &mut Terrain,
    time: f64,
    rng: &mut impl Rng,
) -> Option<Impact> {
    let head = creature.head_pos();
    let next = head + creature.mov * VELOCITY_SCALE;
    let (ex, ey) = (world_to_cell(next.x), world_to_cell(next.y));

    if !terrain.touch(ex, ey).is_some_and(|cell| cell.present) {
        return None;
    }

    if creature.mov.y < 0.0 {
        creature.mov.y = -creature.mov.y * BOUNCE_DAMPING;
    }

    let reach = creature.mov.x.abs() * VELOCITY_SCALE;
    let left_blocked = is_solid(terrain, DVec2::new(head.x - reach, next.y));
    let right_blocked = is_solid(terrain, DVec2::new(head.y + reach, next.y));
    escape(creature, left_blocked, right_blocked, rng);
    creature.last_bounce = time;

    let cell = terrain.get_mut(ex, ey)?;
    cell.erode(std::array::from_fn(|_| rng.random::<f64>() * EROSION_MAX));
    Some(Impact {
        ex,
        ey,
        cleared: !cell.present,
    })
}

/// Pick a new horizontal velocity after an impact.
///
/// One free side: crawl slowly toward it. Both blocked: reverse. Both free:
/// scramble randomly, biased by (and spending some of) the creature's
/// influence.
pub fn escape(
    creature: &mut Creature,
    left_blocked: bool,
    right_blocked: bool,
    rng: &mut impl Rng,
) {
    match (left_blocked, right_blocked) {
        (true, false) => creature.mov.x = creature.mov.x.abs() * ESCAPE_SCALE,
        (false, true) => creature.mov.x = -creature.mov.x.abs() * ESCAPE_SCALE,
        (true, true) => creature.mov.x = -creature.mov.x,
        (false, false) => {
            creature.mov.x =
                (rng.random::<f64>() - 0.5) + creature.influence * rng.random::<f64>();
            creature.mov.y = (rng.random::<f64>() - 0.5) * 2.0;
            creature.influence *= INFLUENCE_DECAY;
        }
    }
}
