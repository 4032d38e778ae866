//! Boundary detection shared by the zoom and island passes.

use crate::tilemap::Tilemap;

/// A cell is an edge cell when at least one in-bounds 4-neighbor holds a
/// different value. Cells outside the grid never count as different.
pub fn is_edge_cell<T: Clone + PartialEq>(grid: &Tilemap<T>, x: usize, y: usize) -> bool {
    let key = grid.get(x, y);
    grid.neighbors(x, y).any(|(nx, ny)| grid.get(nx, ny) != key)
}

/// Edge predicate evaluated for every cell.
pub fn edge_mask<T: Clone + PartialEq>(grid: &Tilemap<T>) -> Tilemap<bool> {
    grid.map(|x, y, _| is_edge_cell(grid, x, y))
}

/// Grow a mask by `radius` cells (Chebyshev distance).
pub fn dilate(mask: &Tilemap<bool>, radius: usize) -> Tilemap<bool> {
    if radius == 0 {
        return mask.clone();
    }
    let r = radius as i32;
    mask.map(|x, y, &set| {
        set || (-r..=r).any(|dy| {
            (-r..=r).any(|dx| {
                mask.offset(x, y, dx, dy)
                    .map(|(nx, ny)| *mask.get(nx, ny))
                    .unwrap_or(false)
            })
        })
    })
}
