//! Open-ocean deepening and shoreline formation.

use crate::biomes::BiomeCell;
use crate::tilemap::{Tilemap, OFFSETS_8};

/// Promote Ocean cells whose whole 3×3 neighborhood exists and is Ocean.
/// Border cells never qualify, and DeepOcean is never demoted.
pub fn deep_ocean(board: &Tilemap<BiomeCell>) -> Tilemap<BiomeCell> {
    super::require_non_empty(board);
    board.map(|x, y, &cell| {
        if cell != BiomeCell::Ocean {
            return cell;
        }
        let surrounded = OFFSETS_8.iter().all(|&(dx, dy)| {
            board
                .offset(x, y, dx, dy)
                .map(|(nx, ny)| *board.get(nx, ny) == BiomeCell::Ocean)
                .unwrap_or(false)
        });
        if surrounded {
            BiomeCell::DeepOcean
        } else {
            cell
        }
    })
}

/// Non-Ocean cells touching plain Ocean (8-neighborhood) and not touching
/// DeepOcean become a shoreline: ColdBeach for `cold_biomes`, SwampShore for
/// Swamp, Beach otherwise. An isolated DeepOcean cell counts as cold.
pub fn shore(board: &Tilemap<BiomeCell>, cold_biomes: &[BiomeCell]) -> Tilemap<BiomeCell> {
    super::require_non_empty(board);
    board.map(|x, y, &cell| {
        if cell == BiomeCell::Ocean {
            return cell;
        }
        let mut touches_ocean = false;
        let mut touches_deep = false;
        for (nx, ny) in board.neighbors_8(x, y) {
            match *board.get(nx, ny) {
                BiomeCell::Ocean => touches_ocean = true,
                BiomeCell::DeepOcean => touches_deep = true,
                _ => {}
            }
        }
        if !touches_ocean || touches_deep {
            return cell;
        }
        if cold_biomes.contains(&cell) {
            BiomeCell::ColdBeach
        } else if cell == BiomeCell::Swamp {
            BiomeCell::SwampShore
        } else {
            BiomeCell::Beach
        }
    })
}

/// Default set of biomes whose shoreline is a cold beach.
pub fn default_cold_biomes() -> Vec<BiomeCell> {
    vec![
        BiomeCell::Tundra,
        BiomeCell::IcePlains,
        BiomeCell::Taiga,
        BiomeCell::SnowyForest,
        BiomeCell::DeepOcean,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{AutomatonParams, Pipeline};
    use crate::random::RandomStream;

    fn is_shoreline(cell: BiomeCell) -> bool {
        matches!(cell, BiomeCell::Beach | BiomeCell::ColdBeach | BiomeCell::SwampShore)
    }

    #[test]
    fn test_deep_ocean_needs_full_neighborhood() {
        let mut board = Tilemap::new_with(5, 5, BiomeCell::Ocean);
        board.set(4, 4, BiomeCell::Plains);
        let deep = deep_ocean(&board);

        // Border cells lack a full neighborhood.
        assert_eq!(*deep.get(0, 0), BiomeCell::Ocean);
        assert_eq!(*deep.get(2, 0), BiomeCell::Ocean);
        assert_eq!(*deep.get(1, 1), BiomeCell::DeepOcean);
        assert_eq!(*deep.get(2, 2), BiomeCell::DeepOcean);
        // Diagonal to the land cell.
        assert_eq!(*deep.get(3, 3), BiomeCell::Ocean);
        assert_eq!(deep.count(&BiomeCell::DeepOcean), 8);
    }

    #[test]
    fn test_deep_ocean_is_monotonic() {
        let mut board = Tilemap::new_with(8, 8, BiomeCell::Ocean);
        board.set(5, 2, BiomeCell::Forest);
        let once = deep_ocean(&board);
        let twice = deep_ocean(&once);
        for (x, y, &cell) in once.iter() {
            if cell == BiomeCell::DeepOcean {
                assert_eq!(*twice.get(x, y), BiomeCell::DeepOcean, "({x}, {y}) demoted");
            }
        }
    }

    #[test]
    fn test_shore_variants() {
        let board = Tilemap::from_rows(&[
            vec![BiomeCell::Ocean, BiomeCell::Ocean, BiomeCell::Ocean, BiomeCell::Ocean],
            vec![BiomeCell::Taiga, BiomeCell::Swamp, BiomeCell::Plains, BiomeCell::Desert],
            vec![BiomeCell::Forest, BiomeCell::Forest, BiomeCell::Forest, BiomeCell::Forest],
        ])
        .unwrap();
        let shored = shore(&board, &default_cold_biomes());
        assert_eq!(*shored.get(0, 1), BiomeCell::ColdBeach);
        assert_eq!(*shored.get(1, 1), BiomeCell::SwampShore);
        assert_eq!(*shored.get(2, 1), BiomeCell::Beach);
        assert_eq!(*shored.get(3, 1), BiomeCell::Beach);
        assert_eq!(*shored.get(0, 2), BiomeCell::Forest);
        assert_eq!(*shored.get(0, 0), BiomeCell::Ocean);
    }

    #[test]
    fn test_shore_never_forms_next_to_deep_ocean() {
        let board = Tilemap::from_rows(&[
            vec![BiomeCell::DeepOcean, BiomeCell::Ocean, BiomeCell::Ocean],
            vec![BiomeCell::Plains, BiomeCell::Plains, BiomeCell::Plains],
        ])
        .unwrap();
        let shored = shore(&board, &default_cold_biomes());
        assert_eq!(*shored.get(0, 1), BiomeCell::Plains);
        assert_eq!(*shored.get(1, 1), BiomeCell::Plains);
        assert_eq!(*shored.get(2, 1), BiomeCell::Beach);
    }

    #[test]
    fn test_isolated_deep_ocean_becomes_cold_beach() {
        let mut board = Tilemap::new_with(3, 3, BiomeCell::Ocean);
        board.set(1, 1, BiomeCell::DeepOcean);
        let shored = shore(&board, &default_cold_biomes());
        assert_eq!(*shored.get(1, 1), BiomeCell::ColdBeach);
        assert_eq!(shored.count(&BiomeCell::Ocean), 8);

        // Deep water next to more deep water stays put.
        board.set(2, 1, BiomeCell::DeepOcean);
        let shored = shore(&board, &default_cold_biomes());
        assert_eq!(*shored.get(1, 1), BiomeCell::DeepOcean);
        assert_eq!(*shored.get(2, 1), BiomeCell::DeepOcean);
    }

    #[test]
    fn test_shore_exclusivity_on_generated_board() {
        let params = AutomatonParams::default();
        let pipeline = Pipeline::island(5).unwrap();
        for seed in [1u64, 2, 3] {
            let board = pipeline.run(&params, &mut RandomStream::new(seed)).unwrap();
            let before = deep_ocean(&board);
            let after = shore(&before, &params.cold_biomes);
            for (x, y, &cell) in after.iter() {
                if is_shoreline(cell) && !is_shoreline(*before.get(x, y)) {
                    assert!(
                        before
                            .neighbors_8(x, y)
                            .all(|(nx, ny)| *before.get(nx, ny) != BiomeCell::DeepOcean),
                        "seed {seed}: shoreline at ({x}, {y}) touches deep ocean"
                    );
                }
            }
        }
    }
}
