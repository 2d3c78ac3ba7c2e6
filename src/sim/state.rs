//! World state and aggregate counters
//!
//! Everything a tick mutates lives on [`World`]: the population, the terrain,
//! live symbols, the global aggregates, and the seeded RNG.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::creature::{Creature, CreatureId, SpawnParams, Symbol};
use super::terrain::{Rect, Terrain};
use crate::consts::*;
use crate::settings::{ArenaLayout, Settings};
use crate::world_to_cell;

/// Global counters shared by the whole population
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldStats {
    /// Accumulated excitement from new speed peaks
    pub thrill: f64,
    /// Accumulated bonding, reset on every birth
    pub love: f64,
    pub score: u64,
    /// Ticks elapsed
    pub age: u64,
}

impl WorldStats {
    /// Geometric thrill decay; larger populations forget faster
    pub fn decay_thrill(&mut self, population: usize) {
        self.thrill *= 1.0 - THRILL_DECAY_RATE * (population as f64 + THRILL_DECAY_OFFSET);
    }

    pub fn year(&self) -> u64 {
        self.age / TICKS_PER_YEAR
    }

    /// Mood bucket in `0..JOY_LEVELS`
    pub fn joy_level(&self, population: usize) -> u32 {
        if population == 0 {
            return 0;
        }
        let ratio = self.thrill / (population as f64 * 100.0);
        let level = (JOY_LEVELS as f64 * ratio).floor().max(0.0) as u32;
        level.min(JOY_LEVELS - 1)
    }

    /// Love relative to what the next birth needs
    pub fn love_fraction(&self, population: usize) -> f64 {
        if population == 0 {
            return 0.0;
        }
        self.love / population as f64
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Active population, in spawn order
    pub creatures: Vec<Creature>,
    /// Live symbols (not simulation-affecting)
    pub symbols: Vec<Symbol>,
    pub terrain: Terrain,
    pub stats: WorldStats,
    pub(crate) rng: Pcg32,
    /// Largest population seen this session
    pub(crate) best_population: usize,
    brush_radius: i64,
    next_id: u64,
}

impl World {
    /// Empty world with no terrain and no creatures
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            creatures: Vec::new(),
            symbols: Vec::new(),
            terrain: Terrain::new(),
            stats: WorldStats::default(),
            rng: Pcg32::seed_from_u64(seed),
            best_population: 0,
            brush_radius: Settings::default().brush_radius,
            next_id: 1,
        }
    }

    /// World laid out per `settings`: arena terrain and the starting population
    pub fn from_settings(settings: &Settings) -> Self {
        let mut world = Self::new(settings.seed);
        world.brush_radius = settings.brush_radius.max(0);
        if settings.build_arena {
            world.build_arena(&settings.arena);
        }
        for _ in 0..settings.initial_creatures {
            let id = world.spawn(SpawnParams::default());
            if let Some(creature) = world.creature_mut(id) {
                creature.last_symbol = INITIAL_SYMBOL_STAMP;
            }
        }
        log::info!(
            "World created: seed={}, creatures={}, chunks={}",
            world.seed,
            world.creatures.len(),
            world.terrain.chunk_count()
        );
        world
    }

    /// Allocate a new creature ID
    pub fn next_creature_id(&mut self) -> CreatureId {
        let id = CreatureId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a creature to the population
    pub fn spawn(&mut self, params: SpawnParams) -> CreatureId {
        let id = self.next_creature_id();
        let creature = Creature::spawn(id, params, &mut self.rng);
        self.creatures.push(creature);
        id
    }

    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    pub fn creature_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.creatures.iter_mut().find(|c| c.id == id)
    }

    pub fn population(&self) -> usize {
        self.creatures.len()
    }

    /// Fill (or clear) a rectangle of terrain cells
    pub fn paint(&mut self, present: bool, rect: Rect) {
        if rect.is_empty() {
            log::debug!("Ignoring empty paint rect {:?}", rect);
            return;
        }
        self.terrain.add_region(present, rect);
    }

    /// Paint the square brush centred on the cell under a world position
    pub fn paint_at(&mut self, present: bool, pos: DVec2) {
        let rect = Rect::around(world_to_cell(pos.x), world_to_cell(pos.y), self.brush_radius);
        self.paint(present, rect);
    }

    /// Two side walls and a floor slab
    pub fn build_arena(&mut self, layout: &ArenaLayout) {
        let ArenaLayout { reach, wall_size } = *layout;
        self.paint(true, Rect::new(-reach, -1, wall_size, reach));
        self.paint(true, Rect::new(reach, -1, wall_size, reach));
        self.paint(true, Rect::new(-reach, -1, reach * 2, wall_size));
    }

    /// Replace the population, terrain, and counters wholesale
    pub(crate) fn replace(
        &mut self,
        creatures: Vec<Creature>,
        terrain: Terrain,
        stats: WorldStats,
    ) {
        self.best_population = creatures.len();
        self.creatures = creatures;
        self.terrain = terrain;
        self.stats = stats;
        self.symbols.clear();
    }
}
