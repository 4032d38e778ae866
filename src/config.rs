//! Run configuration, loadable from and savable to JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::automaton::{AutomatonParams, Pipeline};
use crate::blur::BlurConfig;
use crate::colorize::{Palette, DEFAULT_JITTER};
use crate::error::{Result, TerrainError};
use crate::heightmap::{HeightCurves, NoiseConfig};

/// Everything a terrain run needs. Missing JSON fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Output width in cells
    pub width: usize,
    /// Output height in cells
    pub height: usize,
    /// Run seed (random if not set)
    pub seed: Option<u64>,
    #[serde(flatten)]
    pub automaton: AutomatonParams,
    /// Explicit stage list; picked from the output size when absent
    pub pipeline: Option<Pipeline>,
    pub noise: NoiseConfig,
    pub height_curves: HeightCurves,
    /// Edge-aware smoothing of the heightmap (off when absent)
    pub blur: Option<BlurConfig>,
    pub palette: Palette,
    pub color_jitter: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            seed: None,
            automaton: AutomatonParams::default(),
            pipeline: None,
            noise: NoiseConfig::default(),
            height_curves: HeightCurves::default(),
            blur: None,
            palette: Palette::default(),
            color_jitter: DEFAULT_JITTER,
        }
    }
}

impl TerrainConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: TerrainConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Stage list for this run: the explicit one, or the smallest island
    /// pipeline covering `width × height`.
    pub fn pipeline(&self) -> Result<Pipeline> {
        match &self.pipeline {
            Some(pipeline) => Ok(pipeline.clone()),
            None => Pipeline::for_size(self.width, self.height),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TerrainError::EmptyGrid);
        }
        self.automaton.validate()?;
        let pipeline = self.pipeline()?;
        pipeline.validate()?;
        let available = pipeline.output_size();
        if self.width > available || self.height > available {
            return Err(TerrainError::SizeExceedsPipeline {
                requested: (self.width, self.height),
                available: (available, available),
            });
        }
        self.noise.validate()?;
        self.height_curves.validate()?;
        if let Some(blur) = &self.blur {
            blur.validate()?;
        }
        if !(0.0..=1.0).contains(&self.color_jitter) {
            return Err(TerrainError::InvalidConfig(format!(
                "color_jitter must be within [0, 1], got {}",
                self.color_jitter
            )));
        }
        Ok(())
    }
}
