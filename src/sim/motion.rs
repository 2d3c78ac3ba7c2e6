//! Movement phase: tail follow, head integration, and thrill tracking

use rand::Rng;

use super::collision;
use super::creature::{Creature, Symbol, SymbolKind};
use super::state::WorldStats;
use super::terrain::Terrain;
use crate::consts::*;

/// Head wobble: a slow sine of the creature's own clock
#[inline]
pub fn head_rotation(time_start: f64, time: f64) -> f64 {
    ((time_start + time) / 30.0).sin() / 4.0
}

/// Advance one creature by a tick.
///
/// Collision is resolved against the projected head position before the head
/// moves, so the head always integrates the post-bounce velocity. A new
/// vertical speed peak feeds the global thrill and may emit a thrill symbol.
pub fn advance(
    creature: &mut Creature,
    terrain: &mut Terrain,
    stats: &mut WorldStats,
    symbols: &mut Vec<Symbol>,
    time: f64,
    rng: &mut impl Rng,
) {
    creature.follow_head();
    let cleared = collision::resolve(creature, terrain, time, rng).filter(|i| i.cleared);
    if let Some(impact) = cleared {
        log::debug!("Creature {:?} wore away cell ({}, {})", creature.id, impact.ex, impact.ey);
    }

    let step = creature.mov * VELOCITY_SCALE;
    let time_start = creature.time_start;
    let head = &mut creature.members[0];
    head.pos += step;
    head.rotation = head_rotation(time_start, time);

    let speed = creature.mov.y.abs();
    if speed > creature.thrill_speed {
        stats.thrill += speed - creature.thrill_speed;
        creature.thrill_speed = speed;
        if creature.can_signal(time) {
            creature.last_symbol = time;
            let symbol = Symbol::emit(creature, SymbolKind::Thrill, time, rng);
            log::debug!("Creature {:?} thrilled at {:.1}", creature.id, time);
            symbols.push(symbol);
        }
    }
    creature.thrill_speed *= THRILL_SPEED_DECAY;
}
