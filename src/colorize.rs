//! Per-cell terrain colors for the mesh builder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::biomes::BiomeCell;
use crate::error::{Result, TerrainError};
use crate::random::RandomStream;
use crate::tilemap::Tilemap;

/// Default per-channel jitter amplitude.
pub const DEFAULT_JITTER: f32 = 0.05;

/// Linear RGB color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    /// Marks a biome without a palette entry.
    pub const MISSING: Rgb = Rgb::new(1.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: f32) -> Self {
        Self::new(v, v, v)
    }

    pub fn to_u8(self) -> [u8; 3] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }
}

/// Color rule for one biome.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BiomeColor {
    Solid(Rgb),
    /// `above` when the height is strictly greater than `threshold`.
    Banded { threshold: f32, above: Rgb, below: Rgb },
}

impl BiomeColor {
    pub fn resolve(&self, height: f32) -> Rgb {
        match *self {
            BiomeColor::Solid(c) => c,
            BiomeColor::Banded { threshold, above, below } => {
                if height > threshold {
                    above
                } else {
                    below
                }
            }
        }
    }
}

/// Biome → color table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    colors: BTreeMap<BiomeCell, BiomeColor>,
}

impl Palette {
    pub fn empty() -> Self {
        Self {
            colors: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, biome: BiomeCell, color: BiomeColor) {
        self.colors.insert(biome, color);
    }

    /// Base color before jitter; biomes without an entry are red.
    pub fn base_color(&self, height: f32, biome: BiomeCell) -> Rgb {
        self.colors
            .get(&biome)
            .map(|c| c.resolve(height))
            .unwrap_or(Rgb::MISSING)
    }
}

impl Default for Palette {
    fn default() -> Self {
        use BiomeCell::*;
        let solid = |r, g, b| BiomeColor::Solid(Rgb::new(r, g, b));
        let sand = solid(0.82, 0.66, 0.42);
        let colors = [
            (Ocean, solid(0.0, 0.2509, 0.501)),
            (DeepOcean, solid(0.05, 0.19, 0.57)),
            (Tundra, BiomeColor::Solid(Rgb::WHITE)),
            (SnowyForest, BiomeColor::Solid(Rgb::gray(0.85))),
            (
                Mountain,
                BiomeColor::Banded {
                    threshold: 0.8,
                    above: Rgb::WHITE,
                    below: Rgb::gray(0.5),
                },
            ),
            (Plains, solid(0.24, 0.70, 0.44)),
            (Beach, sand),
            (ColdBeach, solid(0.627, 0.706, 0.784)),
            (Desert, sand),
            (River, solid(0.50, 0.73, 0.93)),
            (
                Taiga,
                BiomeColor::Banded {
                    threshold: 0.5,
                    above: Rgb::new(0.52, 0.37, 0.26),
                    below: Rgb::new(0.20, 0.40, 0.20),
                },
            ),
            (Rainforest, solid(0.13, 0.55, 0.13)),
            (Savannah, solid(0.85, 0.75, 0.45)),
            (Swamp, solid(0.47, 0.60, 0.33)),
            (Woodland, solid(0.30, 0.50, 0.28)),
            (Forest, solid(0.25, 0.40, 0.18)),
            (
                Highland,
                BiomeColor::Banded {
                    threshold: 0.75,
                    above: Rgb::WHITE,
                    below: Rgb::gray(0.502),
                },
            ),
            (IcePlains, solid(0.90, 0.90, 0.98)),
            (SwampShore, solid(0.306, 0.369, 0.224)),
            (Land, BiomeColor::Solid(Rgb::BLACK)),
            (Ice, solid(191.0 / 255.0, 199.0 / 255.0, 214.0 / 255.0)),
        ];
        Self {
            colors: colors.into_iter().collect(),
        }
    }
}

/// Palette plus jitter amplitude.
#[derive(Clone, Debug, PartialEq)]
pub struct Colorizer {
    pub palette: Palette,
    pub jitter: f32,
}

impl Default for Colorizer {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            jitter: DEFAULT_JITTER,
        }
    }
}

impl Colorizer {
    pub fn new(palette: Palette, jitter: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&jitter) {
            return Err(TerrainError::InvalidConfig(format!(
                "color jitter must be within [0, 1], got {jitter}"
            )));
        }
        Ok(Self { palette, jitter })
    }

    /// Base color plus a uniform jitter per channel (drawn r, g, b), clamped.
    pub fn color_for(&self, height: f32, biome: BiomeCell, rng: &mut RandomStream) -> Rgb {
        let base = self.palette.base_color(height, biome);
        let j = self.jitter;
        let r = base.r + rng.next_float_range(-j, j);
        let g = base.g + rng.next_float_range(-j, j);
        let b = base.b + rng.next_float_range(-j, j);
        Rgb::new(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
    }

    /// Row-major pass over both grids; sequential so the draw order is fixed.
    pub fn colorize(
        &self,
        heights: &Tilemap<f32>,
        biomes: &Tilemap<BiomeCell>,
        rng: &mut RandomStream,
    ) -> Result<Tilemap<Rgb>> {
        if heights.dims() != biomes.dims() {
            return Err(TerrainError::SizeMismatch {
                expected: heights.dims(),
                found: biomes.dims(),
            });
        }
        let colors: Vec<Rgb> = heights
            .iter()
            .map(|(x, y, &h)| self.color_for(h, *biomes.get(x, y), rng))
            .collect();
        Tilemap::from_vec(heights.width, heights.height, colors)
    }
}

/// Color with the default palette and jitter.
pub fn color_for(height: f32, biome: BiomeCell, rng: &mut RandomStream) -> Rgb {
    Colorizer::default().color_for(height, biome, rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb, tol: f32) -> bool {
        (a.r - b.r).abs() <= tol && (a.g - b.g).abs() <= tol && (a.b - b.b).abs() <= tol
    }

    #[test]
    fn test_color_within_jitter_of_base() {
        let mut rng = RandomStream::new(9);
        for _ in 0..200 {
            let c = color_for(0.3, BiomeCell::Plains, &mut rng);
            assert!(close(c, Rgb::new(0.24, 0.70, 0.44), DEFAULT_JITTER + 1e-6));
        }
    }

    #[test]
    fn test_banded_thresholds() {
        let palette = Palette::default();
        assert_eq!(palette.base_color(0.81, BiomeCell::Mountain), Rgb::WHITE);
        assert_eq!(palette.base_color(0.8, BiomeCell::Mountain), Rgb::gray(0.5));
        assert_eq!(
            palette.base_color(0.6, BiomeCell::Taiga),
            Rgb::new(0.52, 0.37, 0.26)
        );
        assert_eq!(
            palette.base_color(0.4, BiomeCell::Taiga),
            Rgb::new(0.20, 0.40, 0.20)
        );
        assert_eq!(palette.base_color(0.9, BiomeCell::Highland), Rgb::WHITE);
        assert_eq!(palette.base_color(0.1, BiomeCell::Highland), Rgb::gray(0.502));
    }

    #[test]
    fn test_missing_entry_is_red() {
        let palette = Palette::default();
        assert_eq!(palette.base_color(0.5, BiomeCell::Warm), Rgb::MISSING);
        assert_eq!(Palette::empty().base_color(0.5, BiomeCell::Ocean), Rgb::MISSING);
    }

    #[test]
    fn test_channels_clamped() {
        let mut rng = RandomStream::new(4);
        for _ in 0..200 {
            let c = color_for(0.5, BiomeCell::Tundra, &mut rng);
            assert!(c.r <= 1.0 && c.g <= 1.0 && c.b <= 1.0);
            let c = color_for(0.5, BiomeCell::Land, &mut rng);
            assert!(c.r >= 0.0 && c.g >= 0.0 && c.b >= 0.0);
        }
    }

    #[test]
    fn test_zero_jitter_is_exact() {
        let colorizer = Colorizer::new(Palette::default(), 0.0).unwrap();
        let mut rng = RandomStream::new(1);
        let c = colorizer.color_for(0.2, BiomeCell::Forest, &mut rng);
        assert_eq!(c, Rgb::new(0.25, 0.40, 0.18));
        assert!(Colorizer::new(Palette::default(), -0.1).is_err());
    }

    #[test]
    fn test_colorize_deterministic_and_sized() {
        let biomes = Tilemap::new_with(5, 3, BiomeCell::Beach);
        let heights = Tilemap::new_with(5, 3, 0.2f32);
        let colorizer = Colorizer::default();
        let a = colorizer.colorize(&heights, &biomes, &mut RandomStream::new(2)).unwrap();
        let b = colorizer.colorize(&heights, &biomes, &mut RandomStream::new(2)).unwrap();
        assert_eq!(a.dims(), (5, 3));
        assert_eq!(a, b);

        let wrong = Tilemap::new_with(4, 3, BiomeCell::Beach);
        assert!(colorizer.colorize(&heights, &wrong, &mut RandomStream::new(2)).is_err());
    }

    #[test]
    fn test_to_u8() {
        assert_eq!(Rgb::WHITE.to_u8(), [255, 255, 255]);
        assert_eq!(Rgb::new(0.0, 0.5, 2.0).to_u8(), [0, 128, 255]);
    }
}
