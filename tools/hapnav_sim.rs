// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Headless Navigation Simulator

Runs the whole pipeline without a renderer: generates a maze, flies the drone
with a scripted stick pattern, streams haptic packets to a device (or just
logs them) and records the session.

Usage:
  cargo run --bin hapnav-sim -- --ticks 600 --script zigzag --record
  cargo run --bin hapnav-sim -- --device /dev/ttyUSB0 --set seed=3
*/

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use hapnav::config::{load_config_or_default, HapnavConfig};
use hapnav::observability::{CrateDebugFlags, DEBUG_ENV};
use hapnav::prelude::*;
use hapnav::session::now_ms;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Script {
    /// Full forward stick
    Forward,
    /// Forward while alternating left and right turns
    Zigzag,
    /// Turn on the spot
    Spin,
}

impl Script {
    fn input(self, tick: u64) -> StickInput {
        match self {
            Script::Forward => StickInput {
                x: 0.0,
                y: -1.0,
                yaw: 0.0,
            },
            Script::Zigzag => StickInput {
                x: 0.0,
                y: -0.6,
                yaw: if (tick / 60) % 2 == 0 { 0.5 } else { -0.5 },
            },
            Script::Spin => StickInput {
                x: 0.0,
                y: 0.0,
                yaw: 1.0,
            },
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "hapnav-sim",
    version,
    about = "Headless scripted run of the hapnav navigation pipeline"
)]
struct Args {
    /// Configuration file (searched for when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override a configuration key, e.g. `--set num_probes=16`
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    overrides: Vec<(String, String)>,

    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    #[arg(long, value_enum, default_value_t = Script::Forward)]
    script: Script,

    /// Device or file receiving the haptic byte stream
    #[arg(long)]
    device: Option<PathBuf>,

    /// Record the run and save it under the session directory
    #[arg(long, default_value_t = false)]
    record: bool,

    /// Crates to debug-log, comma separated, or `all`
    #[arg(long, value_delimiter = ',')]
    debug: Vec<String>,

    /// Also write JSON log files under this directory
    #[cfg(feature = "file-logging")]
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

fn run<T: HapticTransport>(config: HapnavConfig, transport: T, args: &Args) -> Result<NavigationLoop<T>> {
    let mut nav = NavigationLoop::new(config, transport)?;
    let generation = *nav.last_generation();
    println!(
        "🧩 Maze {} x {} after {} attempt(s), path ratio {:.3}",
        generation.width, generation.height, generation.attempts, generation.path_area_ratio
    );

    let start_ms = now_ms();
    if args.record {
        nav.start_logging(start_ms);
    }

    let dt = args.tick_ms as f64 / 1000.0;
    let mut collisions = 0u64;
    let mut was_colliding = false;
    for tick in 0..args.ticks {
        let now = start_ms + (tick * args.tick_ms) as i64;
        let report = nav.tick(now, &args.script.input(tick), dt)?;

        if report.flags.cell_collide && !was_colliding {
            collisions += 1;
        }
        was_colliding = report.flags.cell_collide;

        if report.flags.target_collide {
            info!(tick, "target reached");
            println!("🎯 Target reached at tick {}", tick);
            break;
        }
        if !report.flags.in_map {
            warn!(tick, "drone left the map");
            println!("🚪 Left the map at tick {}", tick);
            break;
        }
    }

    let stats = nav.stats();
    println!("📡 Readings encoded: {}", stats.readings_encoded);
    println!("📤 Packets sent:     {}", nav.dispatcher().packets_sent());
    if stats.packets_dropped > 0 {
        println!("⚠️  Packets dropped:  {}", stats.packets_dropped);
    }
    println!("💥 Collisions:       {}", collisions);

    if let Some(path) = nav.save_session()? {
        println!("💾 Session saved to {}", path.display());
    }
    Ok(nav)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let overrides: HashMap<String, String> = args.overrides.iter().cloned().collect();
    let config = load_config_or_default(args.config.as_deref(), Some(&overrides))?;

    let mut flags = CrateDebugFlags::default();
    if let Ok(value) = std::env::var(DEBUG_ENV) {
        flags.merge_env_value(&value);
    }
    flags.merge_env_value(&args.debug.join(","));

    #[cfg(feature = "file-logging")]
    let _guard = match &args.log_dir {
        Some(dir) => Some(hapnav::observability::init_logging(
            &flags,
            &config.logging.log_level,
            Some(dir.clone()),
            None,
            None,
        )?),
        None => {
            hapnav::observability::init_console_logging(&flags, &config.logging.log_level)?;
            None
        }
    };
    #[cfg(not(feature = "file-logging"))]
    hapnav::observability::init_console_logging(&flags, &config.logging.log_level)?;

    println!("🚁 hapnav headless simulator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match (&args.device, config.serial.debug) {
        (Some(device), false) => {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(false)
                .open(device)
                .with_context(|| format!("Failed to open {}", device.display()))?;
            println!("🔌 Haptic device: {}", device.display());
            let baud_rate = config.serial.baud_rate;
            run(config, WriterTransport::new(file, baud_rate), &args)?;
        }
        _ => {
            println!("🔇 Haptic output logged only");
            let nav = run(config, LoggingTransport::new(), &args)?;
            println!("   Packets logged: {}", nav.dispatcher().transport().packets_logged());
        }
    }
    Ok(())
}
