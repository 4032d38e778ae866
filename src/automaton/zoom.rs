//! Resolution-doubling passes.
//!
//! Both zooms upscale every cell into a 2×2 block, then let each boundary
//! cell of the upscaled board copy a nearby cell. Reads always come from the
//! freshly upscaled board, writes go to a separate output.

use crate::automaton::edges::is_edge_cell;
use crate::biomes::BiomeCell;
use crate::random::RandomStream;
use crate::tilemap::Tilemap;

/// Offset table for [`zoom`], biased toward staying in place.
pub const ZOOM_OFFSETS: [i32; 12] = [-1, -1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1];

/// Double the board; edge cells copy a uniformly jittered neighbor.
pub fn fuzzy_zoom(board: &Tilemap<BiomeCell>, rng: &mut RandomStream) -> Tilemap<BiomeCell> {
    zoom_with(board, rng, |rng| (rng.next_int(-1, 1), rng.next_int(-1, 1)))
}

/// Double the board; edge cells copy a neighbor drawn from [`ZOOM_OFFSETS`].
pub fn zoom(board: &Tilemap<BiomeCell>, rng: &mut RandomStream) -> Tilemap<BiomeCell> {
    let last = ZOOM_OFFSETS.len() as i32 - 1;
    zoom_with(board, rng, |rng| {
        let dx = ZOOM_OFFSETS[rng.next_int(0, last) as usize];
        let dy = ZOOM_OFFSETS[rng.next_int(0, last) as usize];
        (dx, dy)
    })
}

fn zoom_with<F>(board: &Tilemap<BiomeCell>, rng: &mut RandomStream, mut offset: F) -> Tilemap<BiomeCell>
where
    F: FnMut(&mut RandomStream) -> (i32, i32),
{
    super::require_non_empty(board);
    let scaled = board.doubled();
    let mut out = scaled.clone();

    for y in 0..scaled.height {
        for x in 0..scaled.width {
            if is_edge_cell(&scaled, x, y) {
                let (dx, dy) = offset(rng);
                let (sx, sy) = scaled.offset_clamped(x, y, dx, dy);
                out.set(x, y, *scaled.get(sx, sy));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_board() -> Tilemap<BiomeCell> {
        let mut board = Tilemap::new_with(4, 4, BiomeCell::Ocean);
        for y in 0..4 {
            board.set(0, y, BiomeCell::Land);
            board.set(1, y, BiomeCell::Land);
        }
        board
    }

    #[test]
    fn test_zoom_doubles_dimensions() {
        let board = Tilemap::new_with(4, 3, BiomeCell::Ocean);
        let mut rng = RandomStream::new(1);
        assert_eq!(zoom(&board, &mut rng).dims(), (8, 6));
        assert_eq!(fuzzy_zoom(&board, &mut rng).dims(), (8, 6));
    }

    #[test]
    fn test_uniform_board_is_not_perturbed() {
        let board = Tilemap::new_with(4, 4, BiomeCell::Warm);
        let mut rng = RandomStream::new(9);
        let zoomed = fuzzy_zoom(&board, &mut rng);
        assert!(zoomed.iter().all(|(_, _, &c)| c == BiomeCell::Warm));
    }

    #[test]
    fn test_interior_cells_keep_upscaled_value() {
        let board = split_board();
        let mut rng = RandomStream::new(3);
        let zoomed = zoom(&board, &mut rng);
        let scaled = board.doubled();
        for y in 0..zoomed.height {
            for x in 0..zoomed.width {
                if !is_edge_cell(&scaled, x, y) {
                    assert_eq!(zoomed.get(x, y), scaled.get(x, y));
                }
            }
        }
    }

    #[test]
    fn test_edge_cells_only_take_existing_values() {
        let board = split_board();
        let mut rng = RandomStream::new(11);
        let zoomed = fuzzy_zoom(&board, &mut rng);
        assert!(zoomed
            .iter()
            .all(|(_, _, &c)| c == BiomeCell::Land || c == BiomeCell::Ocean));
    }

    #[test]
    fn test_zoom_is_deterministic() {
        let board = split_board();
        let a = zoom(&board, &mut RandomStream::new(21));
        let b = zoom(&board, &mut RandomStream::new(21));
        assert_eq!(a, b);
    }
}
