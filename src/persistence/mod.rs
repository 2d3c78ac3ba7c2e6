//! World snapshots
//!
//! Features:
//! - Versioned JSON format (creatures, terrain chunks, optional counters)
//! - Full validation before import touches the world
//!
//! Writing snapshots to disk or browser storage is left to the caller.

use std::collections::HashSet;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::CHUNK_SIZE;
use crate::sim::{Cell, Chunk, ChunkKey, Creature, Facing, Member, Terrain, World, WorldStats};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Reasons a snapshot is rejected
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
    #[error("creature {index} has no members")]
    NoMembers { index: usize },
    #[error("creature {index} has a non-finite {field}")]
    NonFiniteCreature { index: usize, field: &'static str },
    #[error("chunk ({grid_x}, {grid_y}) appears more than once")]
    DuplicateChunk { grid_x: i64, grid_y: i64 },
    #[error("chunk ({grid_x}, {grid_y}) is larger than 100x100")]
    OversizedChunk { grid_x: i64, grid_y: i64 },
    #[error("cell ({ex}, {ey}) has a non-finite color")]
    NonFiniteCell { ex: i64, ey: i64 },
    #[error("non-finite world counter {0}")]
    NonFiniteStats(&'static str),
}

/// One body segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

/// One creature; velocity and behavior state are not persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatureRecord {
    pub members: Vec<MemberRecord>,
    pub skin: [f64; 3],
    pub time_start: f64,
    pub born: f64,
}

/// One terrain cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    pub elem: bool,
    pub color: [f64; 3],
    pub ex: i64,
    pub ey: i64,
}

/// One chunk: rows of cells, both trimmed after their last written entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRecord {
    pub grid_x: i64,
    pub grid_y: i64,
    pub grid: Vec<Option<Vec<Option<CellRecord>>>>,
}

/// Full world snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub creatures: Vec<CreatureRecord>,
    pub map: Vec<ChunkRecord>,
    /// World counters (zeroed on import when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<WorldStats>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn trim_trailing_none<T>(mut items: Vec<Option<T>>) -> Vec<Option<T>> {
    while matches!(items.last(), Some(None)) {
        items.pop();
    }
    items
}

impl From<&Chunk> for ChunkRecord {
    fn from(chunk: &Chunk) -> Self {
        let rows = (0..CHUNK_SIZE as usize)
            .map(|row| {
                let cells: Vec<Option<CellRecord>> = chunk
                    .row(row)
                    .iter()
                    .map(|cell| {
                        cell.map(|c| CellRecord {
                            elem: c.present,
                            color: c.color,
                            ex: c.ex,
                            ey: c.ey,
                        })
                    })
                    .collect();
                let cells = trim_trailing_none(cells);
                (!cells.is_empty()).then_some(cells)
            })
            .collect();
        let key = chunk.key();
        Self {
            grid_x: key.x,
            grid_y: key.y,
            grid: trim_trailing_none(rows),
        }
    }
}

impl From<&Creature> for CreatureRecord {
    fn from(creature: &Creature) -> Self {
        Self {
            members: creature
                .members
                .iter()
                .map(|m| MemberRecord {
                    x: m.pos.x,
                    y: m.pos.y,
                    rotation: m.rotation,
                })
                .collect(),
            skin: creature.skin,
            time_start: creature.time_start,
            born: creature.born,
        }
    }
}

fn validate_creature(index: usize, record: &CreatureRecord) -> Result<(), SnapshotError> {
    if record.members.is_empty() {
        return Err(SnapshotError::NoMembers { index });
    }
    let non_finite = |field| SnapshotError::NonFiniteCreature { index, field };
    for member in &record.members {
        if !member.x.is_finite() || !member.y.is_finite() {
            return Err(non_finite("member position"));
        }
        if !member.rotation.is_finite() {
            return Err(non_finite("member rotation"));
        }
    }
    if !record.skin.iter().all(|c| c.is_finite()) {
        return Err(non_finite("skin"));
    }
    if !record.time_start.is_finite() {
        return Err(non_finite("timeStart"));
    }
    if !record.born.is_finite() {
        return Err(non_finite("born"));
    }
    Ok(())
}

fn build_chunk(record: &ChunkRecord) -> Result<Chunk, SnapshotError> {
    let (grid_x, grid_y) = (record.grid_x, record.grid_y);
    let limit = CHUNK_SIZE as usize;
    if record.grid.len() > limit {
        return Err(SnapshotError::OversizedChunk { grid_x, grid_y });
    }
    let mut chunk = Chunk::new(ChunkKey::new(grid_x, grid_y));
    for (row, cells) in record.grid.iter().enumerate() {
        let Some(cells) = cells else { continue };
        if cells.len() > limit {
            return Err(SnapshotError::OversizedChunk { grid_x, grid_y });
        }
        for (col, cell) in cells.iter().enumerate() {
            let Some(cell) = cell else { continue };
            if !cell.color.iter().all(|c| c.is_finite()) {
                return Err(SnapshotError::NonFiniteCell {
                    ex: cell.ex,
                    ey: cell.ey,
                });
            }
            chunk.set_local(
                col,
                row,
                Cell {
                    present: cell.elem,
                    color: cell.color,
                    ex: cell.ex,
                    ey: cell.ey,
                },
            );
        }
    }
    Ok(chunk)
}

fn validate_stats(stats: &WorldStats) -> Result<(), SnapshotError> {
    if !stats.thrill.is_finite() {
        return Err(SnapshotError::NonFiniteStats("thrill"));
    }
    if !stats.love.is_finite() {
        return Err(SnapshotError::NonFiniteStats("love"));
    }
    Ok(())
}

impl World {
    /// Capture creatures, terrain, and counters
    pub fn export_state(&self) -> Snapshot {
        let mut chunks: Vec<&Chunk> = self.terrain.chunks().collect();
        chunks.sort_by_key(|c| c.key());
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            creatures: self.creatures.iter().map(CreatureRecord::from).collect(),
            map: chunks.into_iter().map(ChunkRecord::from).collect(),
            stats: Some(self.stats),
        };
        log::info!(
            "Exported {} creatures and {} chunks",
            snapshot.creatures.len(),
            snapshot.map.len()
        );
        snapshot
    }

    /// Replace the world with a snapshot.
    ///
    /// The snapshot is validated in full first; on error the world is left
    /// exactly as it was. Imported creatures get fresh IDs and start at rest.
    pub fn import_state(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        if let Err(err) = self.try_import(snapshot) {
            log::warn!("Rejected snapshot: {}", err);
            return Err(err);
        }
        log::info!(
            "Imported {} creatures and {} chunks",
            self.creatures.len(),
            self.terrain.chunk_count()
        );
        Ok(())
    }

    fn try_import(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        for (index, record) in snapshot.creatures.iter().enumerate() {
            validate_creature(index, record)?;
        }
        let stats = snapshot.stats.unwrap_or_default();
        validate_stats(&stats)?;

        let mut terrain = Terrain::new();
        let mut seen = HashSet::new();
        for record in &snapshot.map {
            let key = ChunkKey::new(record.grid_x, record.grid_y);
            if !seen.insert(key) {
                return Err(SnapshotError::DuplicateChunk {
                    grid_x: key.x,
                    grid_y: key.y,
                });
            }
            terrain.insert_chunk(build_chunk(record)?);
        }

        let creatures = snapshot
            .creatures
            .iter()
            .map(|record| {
                let id = self.next_creature_id();
                let mut creature = Creature::new(id, DVec2::ZERO, record.members.len());
                creature.members = record
                    .members
                    .iter()
                    .map(|m| Member {
                        pos: DVec2::new(m.x, m.y),
                        rotation: m.rotation,
                        owner: id,
                    })
                    .collect();
                creature.skin = record.skin;
                creature.time_start = record.time_start;
                creature.born = record.born;
                creature.direction = Facing::Right;
                creature
            })
            .collect();

        self.replace(creatures, terrain, stats);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{Rect, SpawnParams, tick};

    fn busy_world() -> World {
        let settings = Settings {
            seed: 2024,
            initial_creatures: 5,
            ..Default::default()
        };
        let mut world = World::from_settings(&settings);
        world.paint(false, Rect::new(-10, 0, 20, 5));
        world.spawn(SpawnParams {
            position: Some(DVec2::new(-3.5, 7.25)),
            born: Some(400.0),
            skin: Some([0.5, -0.25, 0.125]),
        });
        for t in 0..300 {
            tick(&mut world, t as f64 * 16.0);
        }
        world
    }

    #[test]
    fn test_round_trip_preserves_world() {
        let world = busy_world();
        let snapshot = world.export_state();
        let json = snapshot.to_json().expect("serializable");

        let mut restored = World::new(1);
        restored
            .import_state(&Snapshot::from_json(&json).expect("parsable"))
            .expect("valid snapshot");

        assert_eq!(restored.population(), world.population());
        for (a, b) in restored.creatures.iter().zip(&world.creatures) {
            assert_eq!(a.skin, b.skin);
            assert_eq!(a.time_start, b.time_start);
            assert_eq!(a.born, b.born);
            assert_eq!(a.members.len(), b.members.len());
            for (ma, mb) in a.members.iter().zip(&b.members) {
                assert_eq!(ma.pos, mb.pos);
                assert_eq!(ma.rotation, mb.rotation);
                assert_eq!(ma.owner, a.id);
            }
        }

        assert_eq!(restored.terrain.chunk_count(), world.terrain.chunk_count());
        assert_eq!(restored.terrain.cell_count(), world.terrain.cell_count());
        for chunk in world.terrain.chunks() {
            let other = restored.terrain.chunk(chunk.key()).expect("chunk restored");
            assert_eq!(other, chunk);
        }
        assert_eq!(restored.stats, world.stats);
        assert_eq!(restored.export_state(), snapshot);
    }

    #[test]
    fn test_chunk_rows_are_trimmed() {
        let mut world = World::new(1);
        world.paint(true, Rect::new(2, 3, 1, 1));
        let snapshot = world.export_state();
        assert_eq!(snapshot.map.len(), 1);
        let grid = &snapshot.map[0].grid;
        assert_eq!(grid.len(), 4);
        assert!(grid[..3].iter().all(Option::is_none));
        let row = grid[3].as_ref().expect("row 3");
        assert_eq!(row.len(), 3);
        assert_eq!(
            row[2],
            Some(CellRecord {
                elem: true,
                color: [1.0; 3],
                ex: 2,
                ey: 3
            })
        );
    }

    #[test]
    fn test_import_camel_case_layout() {
        let json = r#"{
            "creatures": [
                {
                    "members": [
                        {"x": 0.1, "y": 1, "rotation": 0.2},
                        {"x": 0.1, "y": 1.01, "rotation": 0}
                    ],
                    "skin": [0.1, 0.2, 0.3], "timeStart": 512.5, "born": -10000
                }
            ],
            "map": [
                {"gridX": -1, "gridY": 0, "grid": [
                    null,
                    [null, {"elem": true, "color": [1, 0.5, 1], "ex": -99, "ey": 1}]
                ]}
            ]
        }"#;
        let mut world = World::new(1);
        world.stats.love = 3.0;
        world.import_state(&Snapshot::from_json(json).expect("parsable")).expect("valid");
        assert_eq!(world.population(), 1);
        assert_eq!(world.creatures[0].time_start, 512.5);
        assert_eq!(world.creatures[0].members.len(), 2);
        let cell = world.terrain.get(-99, 1).expect("cell");
        assert_eq!(cell.color, [1.0, 0.5, 1.0]);
        assert_eq!(world.stats, WorldStats::default());
    }

    #[test]
    fn test_missing_fields_rejected() {
        let json = r#"{ "creatures": [ { "members": [], "skin": [0, 0, 0] } ], "map": [] }"#;
        assert!(matches!(Snapshot::from_json(json), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn test_invalid_snapshot_leaves_world_untouched() {
        let mut world = busy_world();
        let before = world.export_state();

        let mut bad = before.clone();
        bad.creatures[1].members[0].x = f64::NAN;
        assert!(matches!(
            world.import_state(&bad),
            Err(SnapshotError::NonFiniteCreature { index: 1, .. })
        ));

        let mut bad = before.clone();
        bad.creatures[0].members.clear();
        assert!(matches!(world.import_state(&bad), Err(SnapshotError::NoMembers { index: 0 })));

        let mut bad = before.clone();
        let first = bad.map[0].clone();
        bad.map.push(first);
        assert!(matches!(world.import_state(&bad), Err(SnapshotError::DuplicateChunk { .. })));

        let mut bad = before.clone();
        bad.map[0].grid = vec![None; 101];
        assert!(matches!(world.import_state(&bad), Err(SnapshotError::OversizedChunk { .. })));

        let mut bad = before.clone();
        bad.version = 7;
        assert!(matches!(world.import_state(&bad), Err(SnapshotError::UnsupportedVersion(7))));

        assert_eq!(world.export_state(), before);
    }
}
