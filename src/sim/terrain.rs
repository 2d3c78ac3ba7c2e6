//! Sparse destructible terrain
//!
//! Matter cells are grouped into fixed 100x100 chunks keyed by chunk
//! coordinates. Chunks are allocated on first write, reads never allocate.
//! Anything below ground level (cell y < 0) that was never written reads as
//! [`BEDROCK`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::CHUNK_SIZE;

/// Colour of freshly placed matter
pub const FULL_INTEGRITY: [f64; 3] = [1.0, 1.0, 1.0];

/// Synthesized answer for unwritten underground cells.
///
/// Its channels are negative so it can never be confused with placed matter.
pub static BEDROCK: Cell = Cell {
    present: true,
    color: [-3.0, -3.0, -3.0],
    ex: 0,
    ey: 0,
};

const CHUNK_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// One unit of terrain matter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Whether the cell blocks movement
    pub present: bool,
    /// Colour, doubling as integrity (eroded toward zero)
    pub color: [f64; 3],
    /// Cell x coordinate
    pub ex: i64,
    /// Cell y coordinate
    pub ey: i64,
}

impl Cell {
    /// A full-integrity cell at the given coordinates
    pub fn new(present: bool, ex: i64, ey: i64) -> Self {
        Self {
            present,
            color: FULL_INTEGRITY,
            ex,
            ey,
        }
    }

    /// True for the synthesized underground default
    pub fn is_bedrock(&self) -> bool {
        self.color.iter().all(|c| *c < 0.0)
    }

    /// Subtract `amounts` from each channel, clamping at zero.
    ///
    /// Presence is cleared once every channel has reached zero.
    pub fn erode(&mut self, amounts: [f64; 3]) {
        for (channel, amount) in self.color.iter_mut().zip(amounts) {
            *channel = (*channel - amount).max(0.0);
        }
        if self.color.iter().all(|c| *c == 0.0) {
            self.present = false;
        }
    }
}

/// Axis-aligned rectangle in cell units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `2 * radius + 1` centred on a cell
    pub fn around(ex: i64, ey: i64, radius: i64) -> Self {
        Self::new(ex - radius, ey - radius, radius * 2 + 1, radius * 2 + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Chunk coordinates (`floor(cell / 100)` on both axes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    pub x: i64,
    pub y: i64,
}

impl ChunkKey {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Chunk owning the given cell
    pub fn containing(ex: i64, ey: i64) -> Self {
        Self::new(ex.div_euclid(CHUNK_SIZE), ey.div_euclid(CHUNK_SIZE))
    }
}

/// Dense 100x100 block of optional cells, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    key: ChunkKey,
    cells: Vec<Option<Cell>>,
}

impl Chunk {
    pub fn new(key: ChunkKey) -> Self {
        Self {
            key,
            cells: vec![None; CHUNK_AREA],
        }
    }

    pub fn key(&self) -> ChunkKey {
        self.key
    }

    #[inline]
    fn index(col: usize, row: usize) -> usize {
        row * CHUNK_SIZE as usize + col
    }

    /// Cell at local (column, row)
    pub fn local(&self, col: usize, row: usize) -> Option<&Cell> {
        self.cells.get(Self::index(col, row))?.as_ref()
    }

    /// Store a cell at local (column, row)
    pub fn set_local(&mut self, col: usize, row: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(Self::index(col, row)) {
            *slot = Some(cell);
        }
    }

    fn local_mut(&mut self, col: usize, row: usize) -> Option<&mut Cell> {
        self.cells.get_mut(Self::index(col, row))?.as_mut()
    }

    /// Row `row` as a slice of optional cells
    pub fn row(&self, row: usize) -> &[Option<Cell>] {
        let width = CHUNK_SIZE as usize;
        &self.cells[row * width..(row + 1) * width]
    }

    /// Number of written cells
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Written cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }
}

/// Local (column, row) of a cell inside its chunk
#[inline]
fn local_coords(ex: i64, ey: i64) -> (usize, usize) {
    (
        ex.rem_euclid(CHUNK_SIZE) as usize,
        ey.rem_euclid(CHUNK_SIZE) as usize,
    )
}

/// Sparse map of chunks
#[derive(Debug, Clone, Default)]
pub struct Terrain {
    chunks: HashMap<ChunkKey, Chunk>,
}

impl Terrain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell explicitly written at `(ex, ey)`, if any
    pub fn get(&self, ex: i64, ey: i64) -> Option<&Cell> {
        let chunk = self.chunks.get(&ChunkKey::containing(ex, ey))?;
        let (col, row) = local_coords(ex, ey);
        chunk.local(col, row)
    }

    pub fn get_mut(&mut self, ex: i64, ey: i64) -> Option<&mut Cell> {
        let chunk = self.chunks.get_mut(&ChunkKey::containing(ex, ey))?;
        let (col, row) = local_coords(ex, ey);
        chunk.local_mut(col, row)
    }

    /// Like [`Terrain::get`], but unwritten underground cells read as [`BEDROCK`]
    pub fn sample(&self, ex: i64, ey: i64) -> Option<&Cell> {
        match self.get(ex, ey) {
            Some(cell) => Some(cell),
            None if ey < 0 => Some(&BEDROCK),
            None => None,
        }
    }

    /// Write a cell, allocating its chunk if needed
    pub fn set(&mut self, ex: i64, ey: i64, cell: Cell) {
        let key = ChunkKey::containing(ex, ey);
        let (col, row) = local_coords(ex, ey);
        self.chunks
            .entry(key)
            .or_insert_with(|| Chunk::new(key))
            .set_local(col, row, cell);
    }

    /// Cell at `(ex, ey)` for an agent touching it.
    ///
    /// Unwritten underground cells are materialized as fresh solid matter so
    /// they can be eroded. Returns `None` above ground when nothing is there.
    pub fn touch(&mut self, ex: i64, ey: i64) -> Option<&mut Cell> {
        if self.get(ex, ey).is_none() {
            if ey >= 0 {
                return None;
            }
            self.set(ex, ey, Cell::new(true, ex, ey));
        }
        self.get_mut(ex, ey)
    }

    /// Overwrite every cell in `rect` with fresh matter of the given presence.
    ///
    /// Empty rectangles are ignored.
    pub fn add_region(&mut self, present: bool, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        for xi in 0..rect.width {
            for yi in 0..rect.height {
                let (ex, ey) = (rect.x + xi, rect.y + yi);
                self.set(ex, ey, Cell::new(present, ex, ey));
            }
        }
    }

    /// Install a whole chunk, replacing any chunk with the same key
    pub fn insert_chunk(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.key(), chunk);
    }

    pub fn chunk(&self, key: ChunkKey) -> Option<&Chunk> {
        self.chunks.get(&key)
    }

    /// Chunks in unspecified order
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of written cells across all chunks
    pub fn cell_count(&self) -> usize {
        self.chunks.values().map(Chunk::occupied).sum()
    }
}
