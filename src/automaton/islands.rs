//! Land/ocean shaping passes: the initial seed board, coastline growth and
//! erosion, open-water breakup and the optional ocean border.

use crate::automaton::edges::is_edge_cell;
use crate::biomes::BiomeCell;
use crate::random::RandomStream;
use crate::tilemap::Tilemap;

/// A `size × size` ocean board where each cell independently becomes land
/// with probability `land_probability`.
pub fn seed_board(size: usize, land_probability: f32, rng: &mut RandomStream) -> Tilemap<BiomeCell> {
    let mut board = Tilemap::new_with(size, size, BiomeCell::Ocean);
    for y in 0..size {
        for x in 0..size {
            if rng.next_float() <= land_probability {
                board.set(x, y, BiomeCell::Land);
            }
        }
    }
    board
}

/// Re-roll every transformable edge cell as land or ocean.
pub fn add_island(
    board: &Tilemap<BiomeCell>,
    land_probability: f32,
    rng: &mut RandomStream,
) -> Tilemap<BiomeCell> {
    super::require_non_empty(board);
    let mut next = board.clone();

    for (x, y, &cell) in board.iter() {
        if cell.can_transform() && is_edge_cell(board, x, y) {
            let flipped = if rng.next_float() < land_probability {
                BiomeCell::Land
            } else {
                BiomeCell::Ocean
            };
            next.set(x, y, flipped);
        }
    }

    next
}

/// Transformable edge cells adopt the most frequent non-ocean category among
/// their 4-neighbors, when that category is unique, with `merge_probability`.
pub fn add_island2(
    board: &Tilemap<BiomeCell>,
    merge_probability: f32,
    rng: &mut RandomStream,
) -> Tilemap<BiomeCell> {
    super::require_non_empty(board);
    let mut next = board.clone();

    for (x, y, &cell) in board.iter() {
        if !cell.can_transform() || !is_edge_cell(board, x, y) {
            continue;
        }

        if let Some(majority) = neighbor_majority(board, x, y) {
            if rng.next_float() <= merge_probability {
                next.set(x, y, majority);
            }
        }
    }

    next
}

/// Most frequent non-ocean 4-neighbor value, or `None` on a tie or when
/// every neighbor is ocean.
fn neighbor_majority(board: &Tilemap<BiomeCell>, x: usize, y: usize) -> Option<BiomeCell> {
    let mut counts: Vec<(BiomeCell, u32)> = Vec::with_capacity(4);
    for (nx, ny) in board.neighbors(x, y) {
        let neighbor = *board.get(nx, ny);
        if neighbor == BiomeCell::Ocean {
            continue;
        }
        match counts.iter_mut().find(|(c, _)| *c == neighbor) {
            Some((_, n)) => *n += 1,
            None => counts.push((neighbor, 1)),
        }
    }

    let best = counts.iter().map(|&(_, n)| n).max()?;
    let mut leaders = counts.iter().filter(|&&(_, n)| n == best);
    let leader = leaders.next()?.0;
    if leaders.next().is_some() {
        None
    } else {
        Some(leader)
    }
}

/// Ocean cells with only ocean 4-neighbors flip to land with `probability`.
pub fn remove_too_much_ocean(
    board: &Tilemap<BiomeCell>,
    probability: f32,
    rng: &mut RandomStream,
) -> Tilemap<BiomeCell> {
    super::require_non_empty(board);
    let mut next = board.clone();

    for (x, y, &cell) in board.iter() {
        if cell != BiomeCell::Ocean {
            continue;
        }
        let open_water = board
            .neighbors(x, y)
            .all(|(nx, ny)| *board.get(nx, ny) == BiomeCell::Ocean);
        if open_water && rng.next_float() < probability {
            next.set(x, y, BiomeCell::Land);
        }
    }

    next
}

/// Force the outermost ring of cells to ocean.
pub fn surround_with_ocean(board: &Tilemap<BiomeCell>) -> Tilemap<BiomeCell> {
    super::require_non_empty(board);
    let (width, height) = board.dims();
    board.map(|x, y, &cell| {
        if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
            BiomeCell::Ocean
        } else {
            cell
        }
    })
}
