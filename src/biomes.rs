//! Cell categories of the biome board.
//!
//! A single closed enum covers both phases of the automaton: the
//! climate-stage values that only exist while the board is being built, and
//! the terminal biomes (plus the two water categories) that remain once the
//! pipeline has finished.

use serde::{Deserialize, Serialize};

/// Category held by one cell of the biome board.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum BiomeCell {
    // Water (valid in both phases)
    #[default]
    Ocean,
    DeepOcean,

    // Climate stage
    Land,
    Warm,
    Temperate,
    Cold,
    Freezing,

    // Warm biomes
    Desert,
    Plains,
    Rainforest,
    Savannah,
    Swamp,

    // Temperate biomes
    Woodland,
    Forest,
    Highland,

    // Cold biomes
    Taiga,
    SnowyForest,

    // Freezing biomes
    Tundra,
    IcePlains,

    // Shorelines
    Beach,
    ColdBeach,
    SwampShore,

    // Not produced by the default tables, but part of the palette
    Mountain,
    River,
    Ice,
}

impl BiomeCell {
    pub const ALL: [BiomeCell; 25] = [
        BiomeCell::Ocean,
        BiomeCell::DeepOcean,
        BiomeCell::Land,
        BiomeCell::Warm,
        BiomeCell::Temperate,
        BiomeCell::Cold,
        BiomeCell::Freezing,
        BiomeCell::Desert,
        BiomeCell::Plains,
        BiomeCell::Rainforest,
        BiomeCell::Savannah,
        BiomeCell::Swamp,
        BiomeCell::Woodland,
        BiomeCell::Forest,
        BiomeCell::Highland,
        BiomeCell::Taiga,
        BiomeCell::SnowyForest,
        BiomeCell::Tundra,
        BiomeCell::IcePlains,
        BiomeCell::Beach,
        BiomeCell::ColdBeach,
        BiomeCell::SwampShore,
        BiomeCell::Mountain,
        BiomeCell::River,
        BiomeCell::Ice,
    ];

    /// Values that only exist while the automaton runs.
    pub fn is_climate_stage(self) -> bool {
        matches!(
            self,
            BiomeCell::Land
                | BiomeCell::Warm
                | BiomeCell::Temperate
                | BiomeCell::Cold
                | BiomeCell::Freezing
        )
    }

    pub fn is_ocean(self) -> bool {
        matches!(self, BiomeCell::Ocean | BiomeCell::DeepOcean)
    }

    pub fn is_water(self) -> bool {
        matches!(self, BiomeCell::Ocean | BiomeCell::DeepOcean | BiomeCell::River)
    }

    /// Valid once the pipeline has completed.
    pub fn is_terminal(self) -> bool {
        !self.is_climate_stage()
    }

    /// Only raw Ocean/Land cells may still be reshaped by the island passes.
    pub fn can_transform(self) -> bool {
        matches!(self, BiomeCell::Ocean | BiomeCell::Land)
    }

    pub fn name(self) -> &'static str {
        match self {
            BiomeCell::Ocean => "Ocean",
            BiomeCell::DeepOcean => "Deep Ocean",
            BiomeCell::Land => "Land",
            BiomeCell::Warm => "Warm",
            BiomeCell::Temperate => "Temperate",
            BiomeCell::Cold => "Cold",
            BiomeCell::Freezing => "Freezing",
            BiomeCell::Desert => "Desert",
            BiomeCell::Plains => "Plains",
            BiomeCell::Rainforest => "Rainforest",
            BiomeCell::Savannah => "Savannah",
            BiomeCell::Swamp => "Swamp",
            BiomeCell::Woodland => "Woodland",
            BiomeCell::Forest => "Forest",
            BiomeCell::Highland => "Highland",
            BiomeCell::Taiga => "Taiga",
            BiomeCell::SnowyForest => "Snowy Forest",
            BiomeCell::Tundra => "Tundra",
            BiomeCell::IcePlains => "Ice Plains",
            BiomeCell::Beach => "Beach",
            BiomeCell::ColdBeach => "Cold Beach",
            BiomeCell::SwampShore => "Swamp Shore",
            BiomeCell::Mountain => "Mountain",
            BiomeCell::River => "River",
            BiomeCell::Ice => "Ice",
        }
    }
}

impl std::fmt::Display for BiomeCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_partition_all_cells() {
        for cell in BiomeCell::ALL {
            assert_ne!(cell.is_climate_stage(), cell.is_terminal(), "{cell:?}");
        }
        assert!(BiomeCell::Ocean.is_terminal());
        assert!(BiomeCell::DeepOcean.is_terminal());
        assert!(BiomeCell::Land.is_climate_stage());
    }

    #[test]
    fn test_can_transform_only_raw_cells() {
        let transformable: Vec<_> = BiomeCell::ALL
            .into_iter()
            .filter(|c| c.can_transform())
            .collect();
        assert_eq!(transformable, vec![BiomeCell::Ocean, BiomeCell::Land]);
    }

    #[test]
    fn test_serde_uses_variant_names() {
        let json = serde_json::to_string(&BiomeCell::SnowyForest).unwrap();
        assert_eq!(json, "\"SnowyForest\"");
        let back: BiomeCell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BiomeCell::SnowyForest);
    }
}
