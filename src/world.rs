//! Terrain data container and the end-to-end generator.
//!
//! Bundles the three finished grids into a single struct and runs every
//! phase against one random stream: biome automaton, noise seeding,
//! heightmap (plus optional blur), then colors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::biomes::BiomeCell;
use crate::blur;
use crate::colorize::{Colorizer, Rgb};
use crate::config::TerrainConfig;
use crate::error::{Result, TerrainError};
use crate::heightmap;
use crate::noise_source::PerlinSource;
use crate::random::RandomStream;
use crate::tilemap::Tilemap;

/// All generated terrain data bundled together
#[derive(Clone, Debug, Serialize)]
pub struct TerrainData {
    /// Seed the run was started with (allows recreation)
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    pub biomes: Tilemap<BiomeCell>,
    /// Normalized heights in `[0, 1]`
    pub heights: Tilemap<f32>,
    pub colors: Tilemap<Rgb>,
}

/// Information about a specific tile
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileInfo {
    pub x: usize,
    pub y: usize,
    pub biome: BiomeCell,
    pub height: f32,
    pub color: Rgb,
}

impl TerrainData {
    /// Get tile info at coordinates
    pub fn tile_info(&self, x: usize, y: usize) -> Option<TileInfo> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(TileInfo {
            x,
            y,
            biome: *self.biomes.get(x, y),
            height: *self.heights.get(x, y),
            color: *self.colors.get(x, y),
        })
    }

    /// Fraction of cells that are not water.
    pub fn land_fraction(&self) -> f32 {
        let land = self.biomes.iter().filter(|(_, _, c)| !c.is_water()).count();
        land as f32 / (self.width * self.height) as f32
    }

    pub fn height_range(&self) -> (f32, f32) {
        self.heights
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), (_, _, &h)| (lo.min(h), hi.max(h)))
    }
}

/// Runs a validated [`TerrainConfig`].
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    config: TerrainConfig,
}

impl TerrainGenerator {
    pub fn new(config: TerrainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn generate(&self) -> Result<TerrainData> {
        let never = AtomicBool::new(false);
        self.generate_cancellable(&never)
    }

    /// Full run. `cancel` is checked between automaton stages and between
    /// phases.
    pub fn generate_cancellable(&self, cancel: &AtomicBool) -> Result<TerrainData> {
        let config = &self.config;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = RandomStream::new(seed);
        let start = Instant::now();
        let check = |phase: &str| -> Result<()> {
            if cancel.load(Ordering::Relaxed) {
                Err(TerrainError::Cancelled(phase.to_string()))
            } else {
                Ok(())
            }
        };

        info!(seed, width = config.width, height = config.height, "generating terrain");

        let pipeline = config.pipeline()?;
        let board = pipeline.run_observed(&config.automaton, &mut rng, Some(cancel), |_, _, _| {})?;
        let biomes = board.crop(config.width, config.height)?;

        check("heightmap")?;
        let noise = PerlinSource::from_stream(&mut rng);
        let mut heights =
            heightmap::generate_height_grid_with(&biomes, &config.noise, &config.height_curves, &noise)?;

        if let Some(blur_config) = &config.blur {
            check("blur")?;
            heights = blur::blur_heights(&heights, &biomes, blur_config)?;
        }

        check("colorize")?;
        let phase_start = Instant::now();
        let colorizer = Colorizer::new(config.palette.clone(), config.color_jitter)?;
        let colors = colorizer.colorize(&heights, &biomes, &mut rng)?;
        info!(
            elapsed_ms = phase_start.elapsed().as_secs_f64() * 1000.0,
            "colors generated"
        );

        info!(
            seed,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "terrain generated"
        );
        Ok(TerrainData {
            seed,
            width: config.width,
            height: config.height,
            biomes,
            heights,
            colors,
        })
    }
}
