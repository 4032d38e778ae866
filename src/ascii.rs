//! ASCII rendering of biome boards, for logs and debug dumps.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Write};

use crate::biomes::BiomeCell;
use crate::tilemap::Tilemap;

/// Get ASCII character for a biome
pub fn biome_char(biome: BiomeCell) -> char {
    match biome {
        BiomeCell::Ocean => '~',
        BiomeCell::DeepOcean => '≈',
        BiomeCell::Land => 'L',
        BiomeCell::Warm => 'W',
        BiomeCell::Temperate => 'T',
        BiomeCell::Cold => 'C',
        BiomeCell::Freezing => 'F',
        BiomeCell::Desert => 'D',
        BiomeCell::Plains => 'P',
        BiomeCell::Rainforest => 'R',
        BiomeCell::Savannah => 'S',
        BiomeCell::Swamp => 'M',
        BiomeCell::Woodland => 'w',
        BiomeCell::Forest => 'f',
        BiomeCell::Highland => 'h',
        BiomeCell::Taiga => 't',
        BiomeCell::SnowyForest => 's',
        BiomeCell::Tundra => 'u',
        BiomeCell::IcePlains => 'i',
        BiomeCell::Beach => '.',
        BiomeCell::ColdBeach => ':',
        BiomeCell::SwampShore => ',',
        BiomeCell::Mountain => '^',
        BiomeCell::River => '=',
        BiomeCell::Ice => '#',
    }
}

/// One line per row, one character per cell.
pub fn render_board(board: &Tilemap<BiomeCell>) -> String {
    let mut out = String::with_capacity((board.width + 1) * board.height);
    for y in 0..board.height {
        for x in 0..board.width {
            out.push(biome_char(*board.get(x, y)));
        }
        out.push('\n');
    }
    out
}

/// Cell counts per category, in enum order.
pub fn biome_histogram(board: &Tilemap<BiomeCell>) -> BTreeMap<BiomeCell, usize> {
    let mut counts = BTreeMap::new();
    for (_, _, &cell) in board.iter() {
        *counts.entry(cell).or_insert(0) += 1;
    }
    counts
}

/// Legend plus board, written to `path`.
pub fn export_board(board: &Tilemap<BiomeCell>, path: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "=== BIOME BOARD ({}x{}) ===", board.width, board.height)?;
    for (cell, count) in biome_histogram(board) {
        writeln!(file, "  {} = {:<14} {:>8}", biome_char(cell), cell.name(), count)?;
    }
    writeln!(file)?;
    file.write_all(render_board(board).as_bytes())?;
    Ok(())
}
