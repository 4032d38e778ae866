use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb as Pixel, RgbImage};
use tracing::info;

use crate::biomes::BiomeCell;
use crate::colorize::{Palette, Rgb};
use crate::error::Result;
use crate::tilemap::Tilemap;
use crate::world::TerrainData;

/// Export a heightmap using spectral colormap.
/// Values are expected to be normalized (0.0-1.0).
pub fn export_heightmap(heightmap: &Tilemap<f32>, path: impl AsRef<Path>) -> std::result::Result<(), image::ImageError> {
    render_heightmap(heightmap).save(path)
}

pub fn render_heightmap(heightmap: &Tilemap<f32>) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(heightmap.width as u32, heightmap.height as u32);

    for (x, y, &val) in heightmap.iter() {
        let color = spectral_colormap(val.clamp(0.0, 1.0));
        img.put_pixel(x as u32, y as u32, Pixel(color));
    }

    img
}

/// Spectral colormap (matplotlib style): dark blue -> cyan -> green -> yellow -> orange -> red
fn spectral_colormap(t: f32) -> [u8; 3] {
    let colors: [[f32; 3]; 11] = [
        [0.37, 0.31, 0.64],  // Dark blue/purple (low)
        [0.20, 0.53, 0.74],  // Blue
        [0.40, 0.76, 0.65],  // Teal
        [0.67, 0.87, 0.64],  // Light green
        [0.90, 0.96, 0.60],  // Yellow-green
        [1.00, 1.00, 0.75],  // Light yellow / white
        [1.00, 0.88, 0.55],  // Yellow
        [0.99, 0.68, 0.38],  // Light orange
        [0.96, 0.43, 0.26],  // Orange
        [0.84, 0.24, 0.31],  // Red
        [0.62, 0.00, 0.26],  // Dark red (high)
    ];

    let t_scaled = t * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f32;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}

/// Export the per-cell color grid as it would be applied to the mesh.
pub fn export_colors(colors: &Tilemap<Rgb>, path: impl AsRef<Path>) -> std::result::Result<(), image::ImageError> {
    render_colors(colors).save(path)
}

pub fn render_colors(colors: &Tilemap<Rgb>) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(colors.width as u32, colors.height as u32);
    for (x, y, color) in colors.iter() {
        img.put_pixel(x as u32, y as u32, Pixel(color.to_u8()));
    }
    img
}

/// Export a flat biome map: every category in its palette color, no jitter
/// and no height shading.
pub fn export_biome_map(
    biomes: &Tilemap<BiomeCell>,
    palette: &Palette,
    path: impl AsRef<Path>,
) -> std::result::Result<(), image::ImageError> {
    render_biome_map(biomes, palette).save(path)
}

pub fn render_biome_map(biomes: &Tilemap<BiomeCell>, palette: &Palette) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(biomes.width as u32, biomes.height as u32);
    for (x, y, &biome) in biomes.iter() {
        let color = palette.base_color(0.0, biome);
        img.put_pixel(x as u32, y as u32, Pixel(color.to_u8()));
    }
    img
}

/// Write the finished grids as JSON.
pub fn export_json(data: &TerrainData, path: impl AsRef<Path>) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, data)?;
    Ok(())
}

/// Write `colors.png`, `heightmap.png`, `biomes.png` and `terrain.json` into
/// `dir`, creating it if needed.
pub fn export_all(data: &TerrainData, palette: &Palette, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let colors = dir.join("colors.png");
    let heightmap = dir.join("heightmap.png");
    let biomes = dir.join("biomes.png");
    let json = dir.join("terrain.json");

    export_colors(&data.colors, &colors)?;
    export_heightmap(&data.heights, &heightmap)?;
    export_biome_map(&data.biomes, palette, &biomes)?;
    export_json(data, &json)?;

    info!(dir = %dir.display(), "exported terrain");
    Ok(vec![colors, heightmap, biomes, json])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectral_endpoints() {
        assert_eq!(spectral_colormap(0.0), [94, 79, 163]);
        let high = spectral_colormap(1.0);
        assert_eq!(high, [158, 0, 66]);
    }

    #[test]
    fn test_export_all_writes_every_file() {
        let data = TerrainData {
            seed: 1,
            width: 4,
            height: 3,
            biomes: Tilemap::new_with(4, 3, BiomeCell::Plains),
            heights: Tilemap::new_with(4, 3, 0.3f32),
            colors: Tilemap::new_with(4, 3, Rgb::new(0.24, 0.70, 0.44)),
        };
        let dir = std::env::temp_dir().join(format!("island_terrain_export_{}", std::process::id()));
        let written = export_all(&data, &Palette::default(), &dir).unwrap();
        assert_eq!(written.len(), 4);
        for path in &written {
            assert!(path.exists(), "{} missing", path.display());
        }
        let img = image::open(dir.join("biomes.png")).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (4, 3));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_render_sizes_match_grid() {
        let biomes = Tilemap::new_with(6, 4, BiomeCell::Forest);
        let img = render_biome_map(&biomes, &Palette::default());
        assert_eq!(img.dimensions(), (6, 4));
        assert_eq!(img.get_pixel(0, 0).0, Rgb::new(0.25, 0.40, 0.18).to_u8());

        let heights = Tilemap::new_with(6, 4, 0.5f32);
        assert_eq!(render_heightmap(&heights).dimensions(), (6, 4));

        let colors = Tilemap::new_with(3, 2, Rgb::WHITE);
        let img = render_colors(&colors);
        assert_eq!(img.get_pixel(2, 1).0, [255, 255, 255]);
    }
}
