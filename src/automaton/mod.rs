//! Cellular-automaton biome board generator.
//!
//! Starts from a tiny random island seed and runs an ordered list of grid
//! transforms (zooms, coastline passes, temperature bands, biome selection,
//! shorelines). Every transform reads the previous board and returns a new
//! one.

pub mod climate;
pub mod coast;
pub mod edges;
pub mod islands;
pub mod pipeline;
pub mod zoom;

use serde::{Deserialize, Serialize};

use crate::biomes::BiomeCell;
use crate::error::{Result, TerrainError};
use crate::random::RandomStream;
use crate::tilemap::Tilemap;

pub use climate::{select_biome, BiomeTables, BiomeWeight};
pub use edges::{edge_mask, is_edge_cell};
pub use pipeline::{Pipeline, Stage};

/// Tunable probabilities and tables for the automaton stages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomatonParams {
    /// Chance an edge cell becomes land in `AddIsland`.
    pub probability_of_land: f32,
    /// Whether `SurroundWithOcean` stages take effect.
    pub surround_with_ocean: bool,
    /// Chance each seed cell starts as land.
    pub seed_land_probability: f32,
    /// Chance an open-water cell flips to land in `RemoveTooMuchOcean`.
    pub remove_ocean_probability: f32,
    /// Chance an edge cell adopts its neighbors' majority in `AddIsland2`.
    /// Falls back to `probability_of_land`.
    pub merge_probability: Option<f32>,
    /// Die faces for Warm, Cold and Freezing in `AddTemps`.
    pub temperature_weights: [u32; 3],
    /// Biomes whose shoreline becomes a cold beach.
    pub cold_biomes: Vec<BiomeCell>,
    pub tables: BiomeTables,
}

impl Default for AutomatonParams {
    fn default() -> Self {
        Self {
            probability_of_land: 0.5,
            surround_with_ocean: false,
            seed_land_probability: 0.1,
            remove_ocean_probability: 0.35,
            merge_probability: None,
            temperature_weights: [4, 1, 1],
            cold_biomes: coast::default_cold_biomes(),
            tables: BiomeTables::default(),
        }
    }
}

impl AutomatonParams {
    pub fn merge_probability(&self) -> f32 {
        self.merge_probability.unwrap_or(self.probability_of_land)
    }

    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("probability_of_land", self.probability_of_land),
            ("seed_land_probability", self.seed_land_probability),
            ("remove_ocean_probability", self.remove_ocean_probability),
            ("merge_probability", self.merge_probability()),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(TerrainError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        let total = self
            .temperature_weights
            .iter()
            .try_fold(0u32, |acc, &w| acc.checked_add(w))
            .filter(|&t| t <= i32::MAX as u32);
        match total {
            None => {
                return Err(TerrainError::InvalidConfig(format!(
                    "temperature_weights {:?} sum past {}",
                    self.temperature_weights,
                    i32::MAX
                )));
            }
            Some(0) => {
                return Err(TerrainError::InvalidConfig(
                    "temperature_weights must not all be zero".into(),
                ));
            }
            Some(_) => {}
        }
        self.tables.validate()
    }
}

/// Stages are only defined on non-empty boards.
pub(crate) fn require_non_empty(board: &Tilemap<BiomeCell>) {
    assert!(
        board.width > 0 && board.height > 0,
        "automaton stage called on an empty {}x{} board",
        board.width,
        board.height
    );
}

/// Build a finished biome board with the standard pipeline.
pub fn generate_biome_grid(
    seed: u64,
    probability_of_land: f32,
    surround_with_ocean: bool,
) -> Result<Tilemap<BiomeCell>> {
    let params = AutomatonParams {
        probability_of_land,
        surround_with_ocean,
        ..AutomatonParams::default()
    };
    let mut rng = RandomStream::new(seed);
    Pipeline::standard().run(&params, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        AutomatonParams::default().validate().unwrap();
    }

    #[test]
    fn test_params_reject_out_of_range_probability() {
        let params = AutomatonParams {
            probability_of_land: 1.5,
            ..AutomatonParams::default()
        };
        assert!(matches!(params.validate(), Err(TerrainError::InvalidConfig(_))));

        let params = AutomatonParams {
            temperature_weights: [0, 0, 0],
            ..AutomatonParams::default()
        };
        assert!(params.validate().is_err());

        let params = AutomatonParams {
            temperature_weights: [u32::MAX, 1, 0],
            ..AutomatonParams::default()
        };
        assert!(matches!(params.validate(), Err(TerrainError::InvalidConfig(_))));

        let params = AutomatonParams {
            temperature_weights: [i32::MAX as u32, 1, 0],
            ..AutomatonParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_merge_probability_falls_back() {
        let mut params = AutomatonParams::default();
        params.probability_of_land = 0.3;
        assert_eq!(params.merge_probability(), 0.3);
        params.merge_probability = Some(0.9);
        assert_eq!(params.merge_probability(), 0.9);
    }

    #[test]
    #[should_panic(expected = "empty")]
    fn test_empty_board_is_a_precondition_violation() {
        let board: Tilemap<BiomeCell> = Tilemap::new(0, 0);
        let _ = coast::deep_ocean(&board);
    }
}
