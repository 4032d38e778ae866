use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use island_terrain::ascii;
use island_terrain::blur::BlurConfig;
use island_terrain::export;
use island_terrain::heightmap::print_height_histogram;
use island_terrain::{TerrainConfig, TerrainGenerator};

#[derive(Parser, Debug)]
#[command(name = "island_terrain")]
#[command(about = "Generate island terrain: biome board, heightmap and colors")]
struct Args {
    /// JSON config to start from (flags below override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Width of the terrain in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the terrain in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Chance an island edge cell becomes land
    #[arg(short = 'p', long)]
    land_probability: Option<f32>,

    /// Force an ocean ring around the board
    #[arg(long)]
    surround_ocean: bool,

    /// Number of noise octaves
    #[arg(long)]
    octaves: Option<u32>,

    /// Noise scale (higher = larger features)
    #[arg(long)]
    scale: Option<f64>,

    /// Amplitude decay per octave
    #[arg(long)]
    persistence: Option<f64>,

    /// Frequency multiplier per octave
    #[arg(long)]
    lacunarity: Option<f64>,

    /// Smooth the heightmap with the default edge-aware blur
    #[arg(long)]
    blur: bool,

    /// Per-channel color jitter
    #[arg(long)]
    jitter: Option<f32>,

    /// Output directory for PNGs and terrain.json
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Also write the biome board as text (biomes.txt)
    #[arg(long)]
    ascii: bool,

    /// Write the effective config to this path
    #[arg(long)]
    save_config: Option<PathBuf>,
}

impl Args {
    fn to_config(&self) -> island_terrain::Result<TerrainConfig> {
        let mut config = match &self.config {
            Some(path) => TerrainConfig::load(path)?,
            None => TerrainConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(p) = self.land_probability {
            config.automaton.probability_of_land = p;
        }
        if self.surround_ocean {
            config.automaton.surround_with_ocean = true;
        }
        if let Some(octaves) = self.octaves {
            config.noise.octaves = octaves;
        }
        if let Some(scale) = self.scale {
            config.noise.scale = scale;
        }
        if let Some(persistence) = self.persistence {
            config.noise.persistence = persistence;
        }
        if let Some(lacunarity) = self.lacunarity {
            config.noise.lacunarity = lacunarity;
        }
        if self.blur && config.blur.is_none() {
            config.blur = Some(BlurConfig::default());
        }
        if let Some(jitter) = self.jitter {
            config.color_jitter = jitter;
        }
        Ok(config)
    }
}

fn run(args: Args) -> island_terrain::Result<()> {
    let mut config = args.to_config()?;
    // Pin the seed so the saved config reproduces this run.
    let seed = config.seed.unwrap_or_else(rand::random);
    config.seed = Some(seed);

    if let Some(path) = &args.save_config {
        config.save(path)?;
        println!("Saved config to {}", path.display());
    }

    println!("Generating terrain with seed: {}", seed);
    println!("Map size: {}x{}", config.width, config.height);

    let generator = TerrainGenerator::new(config)?;
    let pipeline = generator.config().pipeline()?;
    println!(
        "Pipeline: {} stages, {} doublings, {}x{} board",
        pipeline.stages.len(),
        pipeline.doublings(),
        pipeline.output_size(),
        pipeline.output_size()
    );

    let data = generator.generate()?;
    let (min_h, max_h) = data.height_range();
    println!(
        "Land: {:.1}%  height range {:.3} to {:.3}",
        data.land_fraction() * 100.0,
        min_h,
        max_h
    );
    print_height_histogram(&data.heights, 10);

    let written = export::export_all(&data, &generator.config().palette, &args.output)?;
    for path in &written {
        println!("Wrote {}", path.display());
    }

    if args.ascii {
        let path = args.output.join("biomes.txt");
        ascii::export_board(&data.biomes, &path.to_string_lossy())?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
