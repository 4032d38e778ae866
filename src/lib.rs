//! Island terrain generation library
//!
//! Biome automaton, noise heightmap and colorizer, re-exported for the
//! binaries and for hosts that build meshes from the finished grids.

pub mod ascii;
pub mod automaton;
pub mod biomes;
pub mod blur;
pub mod colorize;
pub mod config;
pub mod error;
pub mod export;
pub mod heightmap;
pub mod noise_source;
pub mod random;
pub mod tilemap;
pub mod world;

pub use automaton::generate_biome_grid;
pub use biomes::BiomeCell;
pub use colorize::{color_for, Rgb};
pub use config::TerrainConfig;
pub use error::{Result, TerrainError};
pub use heightmap::generate_height_grid;
pub use tilemap::Tilemap;
pub use world::{TerrainData, TerrainGenerator};
