//! Tardigrades - segmented creatures in a destructible sandbox
//!
//! Core modules:
//! - `sim`: Simulation engine (terrain store, creature physics, behavior, tick)
//! - `persistence`: Snapshot export/import with validation
//! - `settings`: Runtime configuration

pub mod persistence;
pub mod settings;
pub mod sim;

pub use persistence::{Snapshot, SnapshotError};
pub use settings::Settings;

/// Simulation constants
pub mod consts {
    /// Vertical velocity lost to gravity every tick
    pub const GRAVITY: f64 = 0.05;
    /// Velocity to position scale applied when integrating the head
    pub const VELOCITY_SCALE: f64 = 0.01;
    /// Vertical bounce attenuation on downward impact
    pub const BOUNCE_DAMPING: f64 = 0.8;
    /// Horizontal velocity scale when escaping toward the single free side
    pub const ESCAPE_SCALE: f64 = 0.01;
    /// Influence retained after it nudges a random escape
    pub const INFLUENCE_DECAY: f64 = 0.9;
    /// Upper bound of the per-channel erosion on a single impact
    pub const EROSION_MAX: f64 = 0.1;

    /// Terrain cells per world unit (both axes)
    pub const CELLS_PER_UNIT: f64 = 100.0;
    /// Side length of a terrain chunk, in cells
    pub const CHUNK_SIZE: i64 = 100;

    /// Chance per tick that a creature acts
    pub const ACT_CHANCE: f64 = 0.1;
    /// A bounce younger than this (time units) makes the creature jittery
    pub const RECENT_BOUNCE: f64 = 200.0;
    /// Horizontal damping applied to the jitter after a recent bounce
    pub const JITTER_DAMPING: f64 = 0.9;
    /// Squared head distance under which two creatures bond
    pub const CLOSENESS: f64 = 0.0005;
    /// Chance per skin channel that a newborn mutates
    pub const MUTATION_CHANCE: f64 = 0.01;
    /// Size a creature must reach before it can reproduce
    pub const BREEDING_SIZE: f64 = 0.9;

    /// Minimum time between two symbols from the same creature
    pub const SYMBOL_COOLDOWN: f64 = 500.0;
    /// Symbol lifespan
    pub const SYMBOL_LIFETIME: f64 = 3000.0;

    /// Time taken to grow from half to full size
    pub const MATURATION_SPAN: f64 = 10_000.0;
    /// Per-tick retention of a creature's peak vertical speed
    pub const THRILL_SPEED_DECAY: f64 = 0.999_999;
    /// Per-creature decay rate of the global thrill
    pub const THRILL_DECAY_RATE: f64 = 0.000_005;
    /// Population offset in the thrill decay (an empty world still decays)
    pub const THRILL_DECAY_OFFSET: f64 = 5.0;

    /// Relative scale of each body segment, head first (0 = hidden)
    pub const MEMBER_SCALE: [f64; 7] = [1.0, 1.0, 0.0, 1.1, 0.0, 0.9, 0.8];
    /// Number of body segments
    pub const MEMBER_COUNT: usize = MEMBER_SCALE.len();

    /// Age ticks per simulated year
    pub const TICKS_PER_YEAR: u64 = 1000;
    /// Number of joy levels exposed to the UI
    pub const JOY_LEVELS: u32 = 10;
    /// Populations at or below this never set a record
    pub const RECORD_MIN_POPULATION: usize = 5;

    /// Birth time given to creatures that should start fully grown
    pub const ADULT_BIRTH: f64 = -MATURATION_SPAN;
    /// Last-symbol stamp for the initial population (suppresses start-up markers)
    pub const INITIAL_SYMBOL_STAMP: f64 = 5000.0;
}

/// Map a world coordinate to its terrain cell index
#[inline]
pub fn world_to_cell(v: f64) -> i64 {
    (v * consts::CELLS_PER_UNIT).floor() as i64
}

/// Growth curve: half size at birth, full size after [`consts::MATURATION_SPAN`]
#[inline]
pub fn size_at(time: f64, born: f64) -> f64 {
    let t = ((time - born) / consts::MATURATION_SPAN).clamp(0.0, 1.0);
    0.5 + t * 0.5
}
