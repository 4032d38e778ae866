//! Debug script to output the biome board as ASCII after every automaton stage

use std::fs::File;
use std::io::{self, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use island_terrain::ascii::{biome_char, biome_histogram, render_board};
use island_terrain::automaton::{AutomatonParams, Pipeline};
use island_terrain::random::RandomStream;
use island_terrain::BiomeCell;

#[derive(Parser, Debug)]
#[command(name = "debug_biomes")]
#[command(about = "Dump the biome board after each automaton stage")]
struct Args {
    #[arg(short, long, default_value = "12345")]
    seed: u64,

    /// Total resolution doublings of the island pipeline
    #[arg(short, long, default_value = "5")]
    doublings: u32,

    #[arg(short = 'p', long, default_value = "0.5")]
    land_probability: f32,

    #[arg(long)]
    surround_ocean: bool,

    #[arg(short, long, default_value = "biome_debug.txt")]
    output: String,
}

fn write_legend(file: &mut File) -> io::Result<()> {
    writeln!(file, "LEGEND:")?;
    for chunk in BiomeCell::ALL.chunks(5) {
        let line: Vec<String> = chunk
            .iter()
            .map(|&cell| format!("{} = {:<13}", biome_char(cell), cell.name()))
            .collect();
        writeln!(file, "  {}", line.join(" "))?;
    }
    writeln!(file)
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let pipeline = match Pipeline::island(args.doublings) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let params = AutomatonParams {
        probability_of_land: args.land_probability,
        surround_with_ocean: args.surround_ocean,
        ..AutomatonParams::default()
    };

    let mut file = File::create(&args.output)?;
    writeln!(
        file,
        "=== BIOME AUTOMATON DEBUG ({} stages, {}x{}) seed={} ===",
        pipeline.stages.len(),
        pipeline.output_size(),
        pipeline.output_size(),
        args.seed
    )?;
    write_legend(&mut file)?;

    let mut rng = RandomStream::new(args.seed);
    let mut write_error = None;
    let result = pipeline.run_observed(&params, &mut rng, None, |index, stage, board| {
        if write_error.is_some() {
            return;
        }
        let mut dump = || -> io::Result<()> {
            writeln!(file, "--- [{}] {} ({}x{}) ---", index, stage.name(), board.width, board.height)?;
            let counts: Vec<String> = biome_histogram(board)
                .into_iter()
                .map(|(cell, n)| format!("{}:{}", biome_char(cell), n))
                .collect();
            writeln!(file, "{}", counts.join(" "))?;
            file.write_all(render_board(board).as_bytes())?;
            writeln!(file)
        };
        if let Err(e) = dump() {
            write_error = Some(e);
        }
    });

    if let Some(e) = write_error {
        return Err(e);
    }
    match result {
        Ok(board) => {
            println!("Final board: {}x{}", board.width, board.height);
            println!("Wrote {}", args.output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
