//! Error type shared by every generation phase.

use thiserror::Error;

use crate::biomes::BiomeCell;

/// Errors produced while configuring or running terrain generation.
#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("grid is empty")]
    EmptyGrid,
    #[error("ragged grid: row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("grid size mismatch: expected {expected:?}, got {found:?}")]
    SizeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid pipeline: {0}")]
    InvalidPipeline(String),
    #[error("requested {requested:?} exceeds pipeline output {available:?}")]
    SizeExceedsPipeline {
        requested: (usize, usize),
        available: (usize, usize),
    },
    #[error("cell ({x}, {y}) still holds climate-stage value {cell:?} after the last stage")]
    UnfinishedCell { x: usize, y: usize, cell: BiomeCell },
    #[error("generation cancelled before '{0}'")]
    Cancelled(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, TerrainError>;
