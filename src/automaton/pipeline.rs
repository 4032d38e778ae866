//! Declarative stage list for the biome automaton.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::ascii::render_board;
use crate::automaton::{climate, coast, islands, zoom, AutomatonParams};
use crate::biomes::BiomeCell;
use crate::error::{Result, TerrainError};
use crate::random::RandomStream;
use crate::tilemap::Tilemap;

/// Default edge length of the seed board.
pub const DEFAULT_SEED_SIZE: usize = 4;

/// Fewest doublings [`Pipeline::island`] accepts (three before the climate
/// passes, one before biome selection).
pub const MIN_ISLAND_DOUBLINGS: u32 = 4;

/// Most doublings [`Pipeline::for_size`] will consider.
pub const MAX_ISLAND_DOUBLINGS: u32 = 12;

/// One transform of the automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Fresh `size × size` ocean board with scattered land.
    Seed { size: usize },
    FuzzyZoom,
    Zoom,
    AddIsland,
    RemoveTooMuchOcean,
    AddTemps,
    AddIsland2,
    WarmToTemperate,
    FreezingToCold,
    /// Only applied when the run asks for an ocean border.
    SurroundWithOcean,
    TemperatureToBiome,
    DeepOcean,
    Shore,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Seed { .. } => "seed",
            Stage::FuzzyZoom => "fuzzy_zoom",
            Stage::Zoom => "zoom",
            Stage::AddIsland => "add_island",
            Stage::RemoveTooMuchOcean => "remove_too_much_ocean",
            Stage::AddTemps => "add_temps",
            Stage::AddIsland2 => "add_island2",
            Stage::WarmToTemperate => "warm_to_temperate",
            Stage::FreezingToCold => "freezing_to_cold",
            Stage::SurroundWithOcean => "surround_with_ocean",
            Stage::TemperatureToBiome => "temperature_to_biome",
            Stage::DeepOcean => "deep_ocean",
            Stage::Shore => "shore",
        }
    }

    pub fn doubles(&self) -> bool {
        matches!(self, Stage::FuzzyZoom | Stage::Zoom)
    }

    /// Stages that can write `Land`.
    fn creates_land(&self) -> bool {
        matches!(self, Stage::Seed { .. } | Stage::AddIsland | Stage::RemoveTooMuchOcean)
    }

    /// Run this stage against the previous board. `Seed` ignores its input.
    pub fn apply(
        &self,
        board: &Tilemap<BiomeCell>,
        params: &AutomatonParams,
        rng: &mut RandomStream,
    ) -> Tilemap<BiomeCell> {
        match *self {
            Stage::Seed { size } => islands::seed_board(size, params.seed_land_probability, rng),
            Stage::FuzzyZoom => zoom::fuzzy_zoom(board, rng),
            Stage::Zoom => zoom::zoom(board, rng),
            Stage::AddIsland => islands::add_island(board, params.probability_of_land, rng),
            Stage::RemoveTooMuchOcean => {
                islands::remove_too_much_ocean(board, params.remove_ocean_probability, rng)
            }
            Stage::AddTemps => climate::add_temps(board, params.temperature_weights, rng),
            Stage::AddIsland2 => islands::add_island2(board, params.merge_probability(), rng),
            Stage::WarmToTemperate => climate::warm_to_temperate(board),
            Stage::FreezingToCold => climate::freezing_to_cold(board),
            Stage::SurroundWithOcean => {
                if params.surround_with_ocean {
                    islands::surround_with_ocean(board)
                } else {
                    board.clone()
                }
            }
            Stage::TemperatureToBiome => climate::temperature_to_biome(board, &params.tables, rng),
            Stage::DeepOcean => coast::deep_ocean(board),
            Stage::Shore => coast::shore(board, &params.cold_biomes),
        }
    }
}

/// Ordered list of stages; the first one must be [`Stage::Seed`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Result<Self> {
        let pipeline = Self { stages };
        pipeline.validate()?;
        Ok(pipeline)
    }

    /// The island-and-climate shape with `doublings` resolution doublings
    /// in total. Extra doublings are appended after biome selection, with the
    /// shoreline pass placed before the last one.
    pub fn island(doublings: u32) -> Result<Self> {
        if doublings < MIN_ISLAND_DOUBLINGS {
            return Err(TerrainError::InvalidPipeline(format!(
                "island pipeline needs at least {MIN_ISLAND_DOUBLINGS} doublings, got {doublings}"
            )));
        }
        Self::new(island_stages(doublings))
    }

    /// Nine doublings of a 4×4 seed: 2048×2048.
    pub fn standard() -> Self {
        Self {
            stages: island_stages(9),
        }
    }

    /// Smallest island pipeline whose output covers `width × height`.
    pub fn for_size(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TerrainError::EmptyGrid);
        }
        let target = width.max(height);
        let doublings = (MIN_ISLAND_DOUBLINGS..=MAX_ISLAND_DOUBLINGS)
            .find(|&n| DEFAULT_SEED_SIZE << n >= target)
            .ok_or(TerrainError::SizeExceedsPipeline {
                requested: (width, height),
                available: (
                    DEFAULT_SEED_SIZE << MAX_ISLAND_DOUBLINGS,
                    DEFAULT_SEED_SIZE << MAX_ISLAND_DOUBLINGS,
                ),
            })?;
        Self::island(doublings)
    }

    pub fn seed_size(&self) -> usize {
        match self.stages.first() {
            Some(Stage::Seed { size }) => *size,
            _ => 0,
        }
    }

    pub fn doublings(&self) -> u32 {
        self.stages.iter().filter(|s| s.doubles()).count() as u32
    }

    /// Edge length of the board this pipeline produces.
    pub fn output_size(&self) -> usize {
        self.seed_size() << self.doublings()
    }

    /// Check that the stage order can produce a finished board.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(TerrainError::InvalidPipeline(msg));

        match self.stages.first() {
            Some(Stage::Seed { size }) if *size > 0 => {}
            Some(Stage::Seed { .. }) => return invalid("seed board size must be positive".into()),
            _ => return invalid("first stage must be Seed".into()),
        }
        if self.stages.iter().skip(1).any(|s| matches!(s, Stage::Seed { .. })) {
            return invalid("Seed may only appear as the first stage".into());
        }
        if self.doublings() > 20 {
            return invalid(format!("{} doublings is too many", self.doublings()));
        }

        let position = |target: Stage| -> Vec<usize> {
            self.stages
                .iter()
                .enumerate()
                .filter(|(_, s)| **s == target)
                .map(|(i, _)| i)
                .collect()
        };
        let temps = position(Stage::AddTemps);
        let biomes = position(Stage::TemperatureToBiome);
        if temps.len() != 1 {
            return invalid(format!("expected exactly one AddTemps, found {}", temps.len()));
        }
        if biomes.len() != 1 {
            return invalid(format!(
                "expected exactly one TemperatureToBiome, found {}",
                biomes.len()
            ));
        }
        let (temps, biomes) = (temps[0], biomes[0]);
        if biomes < temps {
            return invalid("TemperatureToBiome must come after AddTemps".into());
        }
        if let Some(stage) = self.stages[temps + 1..].iter().find(|s| s.creates_land()) {
            return invalid(format!("{} after add_temps would leave raw land", stage.name()));
        }
        Ok(())
    }

    pub fn run(&self, params: &AutomatonParams, rng: &mut RandomStream) -> Result<Tilemap<BiomeCell>> {
        self.run_observed(params, rng, None, |_, _, _| {})
    }

    /// Run every stage, calling `observer` with each intermediate board and
    /// checking `cancel` before each stage.
    pub fn run_observed<F>(
        &self,
        params: &AutomatonParams,
        rng: &mut RandomStream,
        cancel: Option<&AtomicBool>,
        mut observer: F,
    ) -> Result<Tilemap<BiomeCell>>
    where
        F: FnMut(usize, &Stage, &Tilemap<BiomeCell>),
    {
        self.validate()?;
        params.validate()?;

        let start = Instant::now();
        let mut board = Tilemap::new_with(1, 1, BiomeCell::Ocean);

        for (index, stage) in self.stages.iter().enumerate() {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                return Err(TerrainError::Cancelled(stage.name().to_string()));
            }
            let stage_start = Instant::now();
            board = stage.apply(&board, params, rng);
            debug!(
                stage = stage.name(),
                index,
                width = board.width,
                height = board.height,
                elapsed_ms = stage_start.elapsed().as_secs_f64() * 1000.0,
                "automaton stage complete"
            );
            trace!("board after {}:\n{}", stage.name(), render_board(&board));
            observer(index, stage, &board);
        }

        ensure_finished(&board)?;
        info!(
            width = board.width,
            height = board.height,
            stages = self.stages.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "biome board generated"
        );
        Ok(board)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

/// Stage list of [`Pipeline::island`]; `doublings` must be at least
/// [`MIN_ISLAND_DOUBLINGS`].
fn island_stages(doublings: u32) -> Vec<Stage> {
    let mut stages = vec![
        Stage::Seed { size: DEFAULT_SEED_SIZE },
        Stage::FuzzyZoom,
        Stage::AddIsland,
        Stage::Zoom,
        Stage::AddIsland,
        Stage::AddIsland,
        Stage::AddIsland,
        Stage::RemoveTooMuchOcean,
        Stage::AddTemps,
        Stage::AddIsland2,
        Stage::WarmToTemperate,
        Stage::FreezingToCold,
        Stage::Zoom,
        Stage::AddIsland2,
        Stage::SurroundWithOcean,
        Stage::Zoom,
        Stage::TemperatureToBiome,
        Stage::DeepOcean,
    ];

    let trailing = doublings.saturating_sub(MIN_ISLAND_DOUBLINGS) as usize;
    if trailing == 0 {
        stages.push(Stage::Shore);
    } else {
        stages.extend(std::iter::repeat(Stage::Zoom).take(trailing - 1));
        stages.push(Stage::Shore);
        stages.push(Stage::Zoom);
    }
    stages
}

/// No climate-stage value may survive the last stage.
pub fn ensure_finished(board: &Tilemap<BiomeCell>) -> Result<()> {
    match board.iter().find(|(_, _, c)| c.is_climate_stage()) {
        Some((x, y, &cell)) => Err(TerrainError::UnfinishedCell { x, y, cell }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_pipeline_shape() {
        let pipeline = Pipeline::standard();
        assert_eq!(pipeline.doublings(), 9);
        assert_eq!(pipeline.output_size(), 2048);
        let tail: Vec<_> = pipeline.stages.iter().rev().take(2).copied().collect();
        assert_eq!(tail, vec![Stage::Zoom, Stage::Shore]);
        pipeline.validate().unwrap();
        assert_eq!(pipeline, Pipeline::island(9).unwrap());
    }

    #[test]
    fn test_output_size_tracks_doublings() {
        for n in MIN_ISLAND_DOUBLINGS..=7 {
            let pipeline = Pipeline::island(n).unwrap();
            assert_eq!(pipeline.output_size(), 4 << n);
        }
        assert!(Pipeline::island(3).is_err());
    }

    #[test]
    fn test_for_size_picks_smallest_cover() {
        assert_eq!(Pipeline::for_size(200, 200).unwrap().output_size(), 256);
        assert_eq!(Pipeline::for_size(64, 10).unwrap().output_size(), 64);
        assert_eq!(Pipeline::for_size(1, 1).unwrap().output_size(), 64);
        assert_eq!(Pipeline::for_size(65, 64).unwrap().output_size(), 128);
        assert!(Pipeline::for_size(0, 4).is_err());
        assert!(Pipeline::for_size(1 << 20, 4).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_orders() {
        let no_seed = Pipeline {
            stages: vec![Stage::AddTemps, Stage::TemperatureToBiome],
        };
        assert!(no_seed.validate().is_err());

        let land_after_temps = Pipeline {
            stages: vec![
                Stage::Seed { size: 4 },
                Stage::AddTemps,
                Stage::AddIsland,
                Stage::TemperatureToBiome,
            ],
        };
        assert!(matches!(land_after_temps.validate(), Err(TerrainError::InvalidPipeline(_))));

        let reversed = Pipeline {
            stages: vec![Stage::Seed { size: 4 }, Stage::TemperatureToBiome, Stage::AddTemps],
        };
        assert!(reversed.validate().is_err());

        let minimal = Pipeline::new(vec![
            Stage::Seed { size: 2 },
            Stage::AddTemps,
            Stage::TemperatureToBiome,
        ]);
        assert!(minimal.is_ok());
    }

    #[test]
    fn test_end_to_end_seed_42() {
        let params = AutomatonParams {
            probability_of_land: 0.5,
            surround_with_ocean: false,
            ..AutomatonParams::default()
        };
        let pipeline = Pipeline::island(4).unwrap();

        let board = pipeline.run(&params, &mut RandomStream::new(42)).unwrap();
        assert_eq!(board.dims(), (64, 64));
        assert!(board.iter().all(|(_, _, c)| c.is_terminal()));
        assert!(board.count(&BiomeCell::Ocean) > 0);
        assert!(board.count(&BiomeCell::DeepOcean) > 0);
        assert!(board.iter().any(|(_, _, c)| !c.is_water()));

        let again = pipeline.run(&params, &mut RandomStream::new(42)).unwrap();
        assert_eq!(board, again);

        let other = pipeline.run(&params, &mut RandomStream::new(43)).unwrap();
        assert_ne!(board, other);
    }

    #[test]
    fn test_surround_flag_rings_the_board() {
        let params = AutomatonParams {
            surround_with_ocean: true,
            ..AutomatonParams::default()
        };
        // Without trailing zooms the ring survives untouched until Shore,
        // which never rewrites plain Ocean.
        let mut pipeline = Pipeline::island(4).unwrap();
        let surround = pipeline
            .stages
            .iter()
            .position(|s| *s == Stage::SurroundWithOcean)
            .unwrap();
        pipeline.stages.remove(surround);
        let zoom_after = pipeline.stages.iter().rposition(|s| *s == Stage::Zoom).unwrap();
        pipeline.stages.insert(zoom_after + 1, Stage::SurroundWithOcean);

        let board = pipeline.run(&params, &mut RandomStream::new(8)).unwrap();
        let (w, h) = board.dims();
        for x in 0..w {
            assert!(board.get(x, 0).is_ocean());
            assert!(board.get(x, h - 1).is_ocean());
        }
        for y in 0..h {
            assert!(board.get(0, y).is_ocean());
            assert!(board.get(w - 1, y).is_ocean());
        }
    }

    #[test]
    fn test_observer_sees_every_stage_and_cancel_stops() {
        let params = AutomatonParams::default();
        let pipeline = Pipeline::island(4).unwrap();
        let mut sizes = Vec::new();
        pipeline
            .run_observed(&params, &mut RandomStream::new(5), None, |_, _, board| {
                sizes.push(board.width)
            })
            .unwrap();
        assert_eq!(sizes.len(), pipeline.stages.len());
        assert_eq!(sizes.first(), Some(&4));
        assert_eq!(sizes.last(), Some(&64));

        let cancel = AtomicBool::new(true);
        let result = pipeline.run_observed(&params, &mut RandomStream::new(5), Some(&cancel), |_, _, _| {});
        assert!(matches!(result, Err(TerrainError::Cancelled(_))));
    }

    #[test]
    fn test_ensure_finished_reports_leftovers() {
        let mut board = Tilemap::new_with(2, 2, BiomeCell::Plains);
        assert!(ensure_finished(&board).is_ok());
        board.set(1, 0, BiomeCell::Land);
        match ensure_finished(&board) {
            Err(TerrainError::UnfinishedCell { x, y, cell }) => {
                assert_eq!((x, y, cell), (1, 0, BiomeCell::Land));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_pipeline_serde_round_trip() {
        let pipeline = Pipeline::island(5).unwrap();
        let json = serde_json::to_string(&pipeline).unwrap();
        let back: Pipeline = serde_json::from_str(&json).unwrap();
        assert_eq!(pipeline, back);
    }
}
