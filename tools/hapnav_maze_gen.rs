// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Maze Generation Tool

Generates a maze from the hapnav configuration and prints it as the JSON
interchange document or as CSV.

Usage:
  cargo run --bin hapnav-maze-gen -- --set map_width=21 --set seed=7
  cargo run --bin hapnav-maze-gen -- --format csv --output maze.csv
*/

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use hapnav::config::load_config_or_default;
use hapnav::maze::{to_csv, MapDefinition, MazeGenerator};
use hapnav::observability::{init_console_logging, CrateDebugFlags, DEBUG_ENV};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Csv,
}

#[derive(Parser, Debug)]
#[command(
    name = "hapnav-maze-gen",
    version,
    about = "Generate a maze and print it as JSON or CSV"
)]
struct Args {
    /// Configuration file (searched for when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override a configuration key, e.g. `--set map_width=21`
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    overrides: Vec<(String, String)>,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Indent the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Write to a file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Crates to debug-log, comma separated, or `all`
    #[arg(long, value_delimiter = ',')]
    debug: Vec<String>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let overrides: HashMap<String, String> = args.overrides.into_iter().collect();
    let config = load_config_or_default(args.config.as_deref(), Some(&overrides))?;

    let mut flags = CrateDebugFlags::default();
    if let Ok(value) = std::env::var(DEBUG_ENV) {
        flags.merge_env_value(&value);
    }
    flags.merge_env_value(&args.debug.join(","));
    init_console_logging(&flags, &config.logging.log_level)?;

    let map = &config.map;
    let mut generator = match map.seed {
        Some(seed) => MazeGenerator::with_seed(seed),
        None => MazeGenerator::new(),
    }
    .with_max_attempts(map.max_generation_attempts);
    let outcome = generator.generate(
        map.map_width,
        map.map_height,
        map.single_path,
        map.min_path_area_ratio,
    )?;

    eprintln!("🧩 hapnav maze generator");
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("   Size:       {} x {}", map.map_width, map.map_height);
    eprintln!("   Single path: {}", map.single_path);
    eprintln!("   Attempts:   {}", outcome.attempts);
    eprintln!("   Path ratio: {:.3}", outcome.path_area_ratio);
    if !outcome.satisfied {
        eprintln!(
            "   ⚠️  Required ratio {:.3} not reached",
            map.min_path_area_ratio
        );
    }

    let text = match args.format {
        Format::Json => {
            let definition = MapDefinition::from_grid(&outcome.grid, map.cell_size);
            if args.pretty {
                definition.to_json_pretty()?
            } else {
                definition.to_json()?
            }
        }
        Format::Csv => to_csv(&outcome.grid),
    };

    match args.output {
        Some(path) => {
            fs::write(&path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✅ Written to {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}
