//! Simulation tick
//!
//! Runs each phase across the whole population before starting the next:
//! gravity, movement, facing, behavior. Then the global counters are updated
//! and expired symbols dropped.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::behavior;
use super::creature::{CreatureId, Symbol};
use super::motion;
use super::state::World;
use crate::consts::*;

/// Notable events for an external scoreboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Milestone {
    /// The world's age crossed into a new year
    YearReached(u64),
    /// Largest population so far this session
    PopulationRecord(usize),
}

/// What a tick leaves behind for renderers and UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSummary {
    pub population: usize,
    pub thrill: f64,
    pub love: f64,
    pub score: u64,
    pub age: u64,
    pub year: u64,
    /// Mood bucket in `0..JOY_LEVELS`
    pub joy_level: u32,
    /// Love divided by population (a birth becomes possible above 1.0)
    pub love_fraction: f64,
    /// Creatures born this tick
    pub births: Vec<CreatureId>,
    pub milestones: Vec<Milestone>,
    /// Symbols still alive after this tick
    pub symbols: Vec<Symbol>,
}

/// Advance the world by one tick at external time `time`
pub fn tick(world: &mut World, time: f64) -> TickSummary {
    for creature in &mut world.creatures {
        creature.apply_gravity();
    }

    for creature in &mut world.creatures {
        motion::advance(
            creature,
            &mut world.terrain,
            &mut world.stats,
            &mut world.symbols,
            time,
            &mut world.rng,
        );
    }

    for creature in &mut world.creatures {
        creature.adjust_direction();
    }

    // Children join immediately but do not act on the tick they are born
    let acting = world.creatures.len();
    let mut births = Vec::new();
    for index in 0..acting {
        let birth = behavior::act(
            &mut world.creatures,
            index,
            &mut world.stats,
            &mut world.symbols,
            time,
            &mut world.rng,
        );
        if let Some(birth) = birth {
            let id = world.spawn(birth.spawn_params());
            log::info!(
                "Creature {:?} born to {:?} and {:?} (population {})",
                id,
                birth.parents.0,
                birth.parents.1,
                world.creatures.len()
            );
            births.push(id);
        }
    }

    let population = world.creatures.len();
    world.stats.decay_thrill(population);
    let jitter = world.rng.random::<f64>() * world.rng.random::<f64>();
    world.stats.score += (world.stats.thrill / 1000.0 + jitter).round().max(0.0) as u64;

    let mut milestones = Vec::new();
    let year_before = world.stats.year();
    world.stats.age += 1;
    if world.stats.year() > year_before {
        milestones.push(Milestone::YearReached(world.stats.year()));
    }
    if population > RECORD_MIN_POPULATION && population > world.best_population {
        world.best_population = population;
        milestones.push(Milestone::PopulationRecord(population));
    }

    world.symbols.retain(|symbol| !symbol.is_expired(time));

    TickSummary {
        population,
        thrill: world.stats.thrill,
        love: world.stats.love,
        score: world.stats.score,
        age: world.stats.age,
        year: world.stats.year(),
        joy_level: world.stats.joy_level(population),
        love_fraction: world.stats.love_fraction(population),
        births,
        milestones,
        symbols: world.symbols.clone(),
    }
}
