//! Edge-aware Gaussian smoothing of the heightmap.
//!
//! Cells close to a biome boundary get a wider kernel so the height curves of
//! neighboring biomes blend, while biome interiors keep their detail.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::automaton::edges::{dilate, edge_mask};
use crate::biomes::BiomeCell;
use crate::error::{Result, TerrainError};
use crate::tilemap::Tilemap;

/// Square, normalized convolution kernel.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

impl Kernel {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Weight at row `i`, column `j` (both in `0..size`).
    pub fn weight(&self, i: usize, j: usize) -> f32 {
        self.weights[i * self.size + j]
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

/// `size × size` Gaussian kernel, normalized to sum to one.
pub fn gaussian_kernel(size: usize, variance: f32) -> Result<Kernel> {
    if size == 0 || size % 2 == 0 {
        return Err(TerrainError::InvalidConfig(format!(
            "kernel size must be odd and positive, got {size}"
        )));
    }
    if !(variance > 0.0) {
        return Err(TerrainError::InvalidConfig(format!(
            "kernel variance must be positive, got {variance}"
        )));
    }

    let center = (size / 2) as f32;
    let mut weights = Vec::with_capacity(size * size);
    for i in 0..size {
        for j in 0..size {
            let di = i as f32 - center;
            let dj = j as f32 - center;
            weights.push((-(di * di + dj * dj) / (2.0 * variance)).exp());
        }
    }
    let total: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    Ok(Kernel { size, weights })
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    pub size: usize,
    pub variance: f32,
}

impl KernelConfig {
    pub fn build(&self) -> Result<Kernel> {
        gaussian_kernel(self.size, self.variance)
    }
}

/// Which kernel to use where.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    pub interior: KernelConfig,
    /// Used within `edge_radius` cells of a biome boundary.
    pub edge: KernelConfig,
    pub edge_radius: usize,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            interior: KernelConfig { size: 3, variance: 1.0 },
            edge: KernelConfig { size: 5, variance: 1.5 },
            edge_radius: 2,
        }
    }
}

impl BlurConfig {
    pub fn validate(&self) -> Result<()> {
        self.interior.build()?;
        self.edge.build()?;
        Ok(())
    }
}

/// Convolve `heights` with a single kernel, keeping cells whose window would
/// leave the grid.
pub fn convolve(heights: &Tilemap<f32>, kernel: &Kernel) -> Result<Tilemap<f32>> {
    let mask = Tilemap::new_with(heights.width, heights.height, false);
    convolve_masked(heights, &mask, kernel, kernel)
}

/// Blur the heightmap, using the wider kernel near biome boundaries.
pub fn blur_heights(
    heights: &Tilemap<f32>,
    biomes: &Tilemap<BiomeCell>,
    config: &BlurConfig,
) -> Result<Tilemap<f32>> {
    if heights.dims() != biomes.dims() {
        return Err(TerrainError::SizeMismatch {
            expected: heights.dims(),
            found: biomes.dims(),
        });
    }
    let start = Instant::now();
    let interior = config.interior.build()?;
    let edge = config.edge.build()?;
    let near_edge = dilate(&edge_mask(biomes), config.edge_radius);

    let blurred = convolve_masked(heights, &near_edge, &interior, &edge)?;
    info!(
        width = heights.width,
        height = heights.height,
        edge_cells = near_edge.count(&true),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "heightmap blurred"
    );
    Ok(blurred)
}

fn convolve_masked(
    heights: &Tilemap<f32>,
    mask: &Tilemap<bool>,
    interior: &Kernel,
    edge: &Kernel,
) -> Result<Tilemap<f32>> {
    if heights.dims() != mask.dims() {
        return Err(TerrainError::SizeMismatch {
            expected: heights.dims(),
            found: mask.dims(),
        });
    }
    let (width, height) = heights.dims();

    let rows: Vec<Vec<f32>> = (0..height)
        .into_par_iter()
        .map(|y| {
            (0..width)
                .map(|x| {
                    let kernel = if *mask.get(x, y) { edge } else { interior };
                    let r = kernel.radius();
                    if x < r || y < r || x + r >= width || y + r >= height {
                        return *heights.get(x, y);
                    }
                    let mut sum = 0.0;
                    for i in 0..kernel.size() {
                        for j in 0..kernel.size() {
                            sum += heights.get(x + j - r, y + i - r) * kernel.weight(i, j);
                        }
                    }
                    sum.clamp(0.0, 1.0)
                })
                .collect()
        })
        .collect();

    Tilemap::from_vec(width, height, rows.concat())
}
