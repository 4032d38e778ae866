//! Rectangular 2D grid used for every per-cell layer (biomes, heights, masks, colors).

use serde::Serialize;

use crate::error::{Result, TerrainError};

/// Offsets of the 4-connected neighborhood (up, down, left, right).
pub const OFFSETS_4: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Offsets of the 8-connected neighborhood, row by row.
pub const OFFSETS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A row-major 2D grid. Coordinates never wrap: neighbors outside the grid
/// simply do not exist.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap an existing row-major buffer.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TerrainError::EmptyGrid);
        }
        if data.len() != width * height {
            return Err(TerrainError::SizeMismatch {
                expected: (width, height),
                found: (data.len(), 1),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Build a grid from rows (`rows[y][x]`), rejecting empty or ragged input.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if width == 0 {
            return Err(TerrainError::EmptyGrid);
        }
        let mut data = Vec::with_capacity(width * rows.len());
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(TerrainError::RaggedGrid {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            data.extend_from_slice(cells);
        }
        Ok(Self {
            width,
            height: rows.len(),
            data,
        })
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Resolve `(x + dx, y + dy)` if it lies inside the grid.
    pub fn offset(&self, x: usize, y: usize, dx: i32, dy: i32) -> Option<(usize, usize)> {
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        if nx < 0 || ny < 0 || nx >= self.width as i64 || ny >= self.height as i64 {
            None
        } else {
            Some((nx as usize, ny as usize))
        }
    }

    /// Like [`Tilemap::offset`] but clamps to the nearest in-bounds cell.
    pub fn offset_clamped(&self, x: usize, y: usize, dx: i32, dy: i32) -> (usize, usize) {
        let nx = (x as i64 + dx as i64).clamp(0, self.width as i64 - 1);
        let ny = (y as i64 + dy as i64).clamp(0, self.height as i64 - 1);
        (nx as usize, ny as usize)
    }

    /// In-bounds 4-connected neighbors.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        OFFSETS_4
            .iter()
            .filter_map(move |&(dx, dy)| self.offset(x, y, dx, dy))
    }

    /// In-bounds 8-connected neighbors (including diagonals).
    pub fn neighbors_8(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        OFFSETS_8
            .iter()
            .filter_map(move |&(dx, dy)| self.offset(x, y, dx, dy))
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Build a new grid of the same shape by mapping every cell.
    pub fn map<U, F: FnMut(usize, usize, &T) -> U>(&self, mut f: F) -> Tilemap<U> {
        Tilemap {
            width: self.width,
            height: self.height,
            data: self.iter().map(|(x, y, v)| f(x, y, v)).collect(),
        }
    }

    /// Copy the `width × height` window anchored at the top-left corner.
    pub fn crop(&self, width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TerrainError::EmptyGrid);
        }
        if width > self.width || height > self.height {
            return Err(TerrainError::SizeExceedsPipeline {
                requested: (width, height),
                available: self.dims(),
            });
        }
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let start = y * self.width;
            data.extend_from_slice(&self.data[start..start + width]);
        }
        Ok(Self { width, height, data })
    }

    /// Upscale by two: every cell becomes a 2×2 block of itself.
    pub fn doubled(&self) -> Self {
        let width = self.width * 2;
        let height = self.height * 2;
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(self.get(x / 2, y / 2).clone());
            }
        }
        Self { width, height, data }
    }
}

impl<T: Clone + PartialEq> Tilemap<T> {
    /// Number of cells holding `value`.
    pub fn count(&self, value: &T) -> usize {
        self.data.iter().filter(|v| *v == value).count()
    }
}
