//! Fractal-noise heightmap shaped by the biome board.
//!
//! Each cell sums several octaves of coherent noise, then the biome under it
//! remaps that raw value through its height curve and the result is clamped
//! to `[0, 1]`. Rows are independent, so they are computed in parallel.

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::biomes::BiomeCell;
use crate::error::{Result, TerrainError};
use crate::noise_source::NoiseSource;
use crate::tilemap::Tilemap;

// =============================================================================
// NOISE PARAMETERS
// =============================================================================

/// Parameters of the fractal (fBm) noise sum.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Cells per noise unit at the first octave (higher = larger features)
    pub scale: f64,
    /// Number of noise octaves
    pub octaves: u32,
    /// Amplitude decay per octave (0.0-1.0]
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            scale: 10.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl NoiseConfig {
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(TerrainError::InvalidConfig(msg));
        if !(self.scale > 0.0) {
            return fail(format!("noise scale must be positive, got {}", self.scale));
        }
        if self.octaves == 0 {
            return fail("noise octaves must be at least 1".into());
        }
        if !(self.persistence > 0.0 && self.persistence <= 1.0) {
            return fail(format!(
                "noise persistence must be within (0, 1], got {}",
                self.persistence
            ));
        }
        if !(self.lacunarity >= 1.0) {
            return fail(format!("noise lacunarity must be >= 1, got {}", self.lacunarity));
        }
        Ok(())
    }
}

// =============================================================================
// HEIGHT CURVES
// =============================================================================

/// Remaps a raw noise value for one biome.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum HeightCurve {
    /// `lo + (hi - lo) * h`, unclamped in `h`.
    Lerp { lo: f32, hi: f32 },
    Clamp { lo: f32, hi: f32 },
    Identity,
}

impl HeightCurve {
    pub fn apply(&self, h: f32) -> f32 {
        match *self {
            HeightCurve::Lerp { lo, hi } => lo + (hi - lo) * h,
            HeightCurve::Clamp { lo, hi } => h.clamp(lo, hi),
            HeightCurve::Identity => h,
        }
    }
}

/// Per-biome height curves. Biomes without an entry use [`HeightCurve::Identity`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeightCurves {
    curves: BTreeMap<BiomeCell, HeightCurve>,
}

impl HeightCurves {
    pub fn empty() -> Self {
        Self {
            curves: BTreeMap::new(),
        }
    }

    pub fn get(&self, biome: BiomeCell) -> HeightCurve {
        self.curves
            .get(&biome)
            .copied()
            .unwrap_or(HeightCurve::Identity)
    }

    pub fn set(&mut self, biome: BiomeCell, curve: HeightCurve) {
        self.curves.insert(biome, curve);
    }

    pub fn validate(&self) -> Result<()> {
        for (biome, curve) in &self.curves {
            match *curve {
                HeightCurve::Lerp { lo, hi } | HeightCurve::Clamp { lo, hi } if lo > hi => {
                    return Err(TerrainError::InvalidConfig(format!(
                        "height curve for {biome} has lo {lo} above hi {hi}"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl Default for HeightCurves {
    fn default() -> Self {
        use BiomeCell::*;
        let lerp = |lo, hi| HeightCurve::Lerp { lo, hi };
        let curves = [
            (Ocean, HeightCurve::Clamp { lo: 0.0, hi: 0.0 }),
            (DeepOcean, lerp(0.0, 0.0)),
            (SnowyForest, lerp(0.2, 0.7)),
            (Mountain, lerp(0.7, 1.0)),
            (Plains, lerp(0.2, 0.5)),
            (Beach, lerp(0.03, 0.3)),
            (ColdBeach, lerp(0.03, 0.3)),
            (Desert, lerp(0.2, 0.6)),
            (River, lerp(0.1, 0.4)),
            (Taiga, lerp(0.25, 0.65)),
            (Forest, lerp(0.2, 0.7)),
            (Swamp, lerp(0.05, 0.2)),
            (Tundra, lerp(0.25, 0.65)),
            (Rainforest, lerp(0.2, 0.55)),
            (Woodland, lerp(0.3, 0.5)),
            (Savannah, lerp(0.2, 0.5)),
            (Highland, lerp(0.3, 0.99)),
            (IcePlains, lerp(0.1, 0.5)),
            (Ice, lerp(0.2, 0.9)),
            (SwampShore, lerp(0.05, 0.25)),
        ];
        Self {
            curves: curves.into_iter().collect(),
        }
    }
}

// =============================================================================
// HEIGHTMAP GENERATION
// =============================================================================

/// Raw multi-octave noise at cell `(x, y)`.
pub fn fbm_height(noise: &impl NoiseSource, config: &NoiseConfig, x: usize, y: usize) -> f64 {
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut height = 0.0;
    for _ in 0..config.octaves {
        let sx = x as f64 / config.scale * frequency;
        let sy = y as f64 / config.scale * frequency;
        height += noise.sample_2d(sx, sy) * amplitude;
        amplitude *= config.persistence;
        frequency *= config.lacunarity;
    }
    height
}

/// Heightmap with the default height curves.
pub fn generate_height_grid(
    biomes: &Tilemap<BiomeCell>,
    config: &NoiseConfig,
    noise: &impl NoiseSource,
) -> Result<Tilemap<f32>> {
    generate_height_grid_with(biomes, config, &HeightCurves::default(), noise)
}

/// Heightmap of the same size as `biomes`, every value in `[0, 1]`.
pub fn generate_height_grid_with(
    biomes: &Tilemap<BiomeCell>,
    config: &NoiseConfig,
    curves: &HeightCurves,
    noise: &impl NoiseSource,
) -> Result<Tilemap<f32>> {
    if biomes.is_empty() {
        return Err(TerrainError::EmptyGrid);
    }
    config.validate()?;

    let start = Instant::now();
    let width = biomes.width;

    let rows: Vec<Vec<f32>> = (0..biomes.height)
        .into_par_iter()
        .map(|y| {
            (0..width)
                .map(|x| {
                    let raw = fbm_height(noise, config, x, y) as f32;
                    let curve = curves.get(*biomes.get(x, y));
                    curve.apply(raw).clamp(0.0, 1.0)
                })
                .collect()
        })
        .collect();

    let heights = Tilemap::from_vec(width, biomes.height, rows.concat())?;
    info!(
        width,
        height = biomes.height,
        octaves = config.octaves,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "heightmap generated"
    );
    Ok(heights)
}

/// Print a histogram of height values
pub fn print_height_histogram(heights: &Tilemap<f32>, num_bins: usize) {
    let num_bins = num_bins.max(1);
    let mut bins = vec![0usize; num_bins];
    for (_, _, &h) in heights.iter() {
        let idx = ((h.clamp(0.0, 1.0) * num_bins as f32) as usize).min(num_bins - 1);
        bins[idx] += 1;
    }
    let max_count = bins.iter().copied().max().unwrap_or(1).max(1);

    println!("Height histogram:");
    for (i, &count) in bins.iter().enumerate() {
        let lo = i as f32 / num_bins as f32;
        let bar = "#".repeat(count * 40 / max_count);
        println!("  {:>4.2} | {:<40} {}", lo, bar, count);
    }
}
