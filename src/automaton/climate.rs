//! Temperature field passes and the final temperature → biome conversion.

use serde::{Deserialize, Serialize};

use crate::biomes::BiomeCell;
use crate::error::{Result, TerrainError};
use crate::random::RandomStream;
use crate::tilemap::Tilemap;

/// Tolerance on the sum of a biome table's weights.
const WEIGHT_SUM_TOLERANCE: f32 = 1e-4;

/// One entry of a temperature → biome table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeWeight {
    pub biome: BiomeCell,
    pub weight: f32,
}

impl BiomeWeight {
    pub const fn new(biome: BiomeCell, weight: f32) -> Self {
        Self { biome, weight }
    }
}

/// Weighted biome choices for each temperature band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeTables {
    pub warm: Vec<BiomeWeight>,
    pub temperate: Vec<BiomeWeight>,
    pub cold: Vec<BiomeWeight>,
    pub freezing: Vec<BiomeWeight>,
}

impl Default for BiomeTables {
    fn default() -> Self {
        use BiomeCell::*;
        Self {
            warm: vec![
                BiomeWeight::new(Desert, 0.2),
                BiomeWeight::new(Plains, 0.4),
                BiomeWeight::new(Rainforest, 0.18),
                BiomeWeight::new(Savannah, 0.2),
                BiomeWeight::new(Swamp, 0.02),
            ],
            temperate: vec![
                BiomeWeight::new(Woodland, 0.2),
                BiomeWeight::new(Forest, 0.55),
                BiomeWeight::new(Highland, 0.25),
            ],
            cold: vec![
                BiomeWeight::new(Taiga, 0.5),
                BiomeWeight::new(SnowyForest, 0.5),
            ],
            freezing: vec![
                BiomeWeight::new(Tundra, 0.7),
                BiomeWeight::new(IcePlains, 0.3),
            ],
        }
    }
}

impl BiomeTables {
    /// The table for a temperature band, `None` for any other cell.
    pub fn for_temperature(&self, cell: BiomeCell) -> Option<&[BiomeWeight]> {
        match cell {
            BiomeCell::Warm => Some(&self.warm),
            BiomeCell::Temperate => Some(&self.temperate),
            BiomeCell::Cold => Some(&self.cold),
            BiomeCell::Freezing => Some(&self.freezing),
            _ => None,
        }
    }

    /// Every table must be non-empty, list only terminal land biomes, and
    /// sum to 1.
    pub fn validate(&self) -> Result<()> {
        let tables = [
            ("warm", &self.warm),
            ("temperate", &self.temperate),
            ("cold", &self.cold),
            ("freezing", &self.freezing),
        ];
        for (name, table) in tables {
            if table.is_empty() {
                return Err(TerrainError::InvalidConfig(format!("{name} biome table is empty")));
            }
            if let Some(entry) = table.iter().find(|e| !e.biome.is_terminal() || e.weight < 0.0) {
                return Err(TerrainError::InvalidConfig(format!(
                    "{name} biome table has invalid entry {:?} ({})",
                    entry.biome, entry.weight
                )));
            }
            let sum: f32 = table.iter().map(|e| e.weight).sum();
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(TerrainError::InvalidConfig(format!(
                    "{name} biome weights sum to {sum}, expected 1"
                )));
            }
        }
        Ok(())
    }
}

/// Cumulative-probability roll over `options`: the first bucket whose
/// running total exceeds the roll wins, and the last entry absorbs any
/// rounding residue. `None` only for an empty table.
pub fn select_biome(options: &[BiomeWeight], rng: &mut RandomStream) -> Option<BiomeCell> {
    let last = options.last()?.biome;
    let roll = rng.next_float();
    let mut cumulative = 0.0f32;
    for option in options {
        cumulative += option.weight;
        if roll < cumulative {
            return Some(option.biome);
        }
    }
    Some(last)
}

/// Assign Warm/Cold/Freezing to every land cell with a `[warm, cold, freezing]` die.
pub fn add_temps(board: &Tilemap<BiomeCell>, weights: [u32; 3], rng: &mut RandomStream) -> Tilemap<BiomeCell> {
    super::require_non_empty(board);
    let [warm, cold, freezing] = weights.map(u64::from);
    let sides = (warm + cold + freezing).clamp(1, i32::MAX as u64) as i32;
    let mut next = board.clone();

    for (x, y, &cell) in board.iter() {
        if cell.is_ocean() {
            continue;
        }
        let roll = rng.next_int(1, sides) as u64;
        let band = if roll <= warm {
            BiomeCell::Warm
        } else if roll <= warm + cold {
            BiomeCell::Cold
        } else {
            BiomeCell::Freezing
        };
        next.set(x, y, band);
    }

    next
}

/// Warm cells bordering Cold or Freezing become Temperate.
pub fn warm_to_temperate(board: &Tilemap<BiomeCell>) -> Tilemap<BiomeCell> {
    buffer_band(board, BiomeCell::Warm, &[BiomeCell::Cold, BiomeCell::Freezing], BiomeCell::Temperate)
}

/// Freezing cells bordering Warm or Temperate become Cold.
pub fn freezing_to_cold(board: &Tilemap<BiomeCell>) -> Tilemap<BiomeCell> {
    buffer_band(board, BiomeCell::Freezing, &[BiomeCell::Warm, BiomeCell::Temperate], BiomeCell::Cold)
}

fn buffer_band(
    board: &Tilemap<BiomeCell>,
    from: BiomeCell,
    contrast: &[BiomeCell],
    to: BiomeCell,
) -> Tilemap<BiomeCell> {
    super::require_non_empty(board);
    board.map(|x, y, &cell| {
        let borders = cell == from
            && board
                .neighbors(x, y)
                .any(|(nx, ny)| contrast.contains(board.get(nx, ny)));
        if borders {
            to
        } else {
            cell
        }
    })
}

/// Replace every temperature band with a biome drawn from its table.
pub fn temperature_to_biome(
    board: &Tilemap<BiomeCell>,
    tables: &BiomeTables,
    rng: &mut RandomStream,
) -> Tilemap<BiomeCell> {
    super::require_non_empty(board);
    let mut next = board.clone();

    for (x, y, &cell) in board.iter() {
        if let Some(table) = tables.for_temperature(cell) {
            if let Some(biome) = select_biome(table, rng) {
                next.set(x, y, biome);
            }
        }
    }

    next
}
