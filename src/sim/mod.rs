//! Deterministic simulation module
//!
//! All world logic lives here. Given the same seed and the same sequence of
//! tick times it always produces the same world:
//! - Seeded RNG only, consumed in a fixed order per phase per creature
//! - Stable iteration order (spawn order)
//! - No rendering, storage, or platform dependencies

pub mod behavior;
pub mod collision;
pub mod creature;
pub mod motion;
pub mod state;
pub mod terrain;
pub mod tick;

#[cfg(test)]
pub(crate) mod testing;

pub use behavior::{Birth, act, blend_skin};
pub use collision::{Impact, is_solid, resolve};
pub use creature::{Creature, CreatureId, Facing, Member, SpawnParams, Symbol, SymbolKind};
pub use state::{World, WorldStats};
pub use terrain::{BEDROCK, Cell, Chunk, ChunkKey, Rect, Terrain};
pub use tick::{Milestone, TickSummary, tick};
