// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Session Analysis Tool
//!
//! Summarises recorded NDJSON navigation sessions: collisions, time spent in
//! contact, completion time, distance travelled, velocity statistics and how
//! well the drone's heading followed its direction of travel.
//!
//! Usage:
//!   cargo run --bin hapnav-analyze -- sessions/session_1735689600000.ndjson
//!   cargo run --bin hapnav-analyze -- --json sessions/*.ndjson

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use hapnav::observability::{init_console_logging, CrateDebugFlags};
use hapnav::session::{read_session_file, SessionSummary};

#[derive(Parser, Debug)]
#[command(
    name = "hapnav-analyze",
    version,
    about = "Summarise recorded hapnav navigation sessions"
)]
struct Args {
    /// Session files (one JSON object per line)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print one JSON summary per line instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log level: trace, debug, info, warn, error.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn print_summary(path: &Path, summary: &SessionSummary) {
    println!("📂 {}", path.display());
    println!("   Entries:              {}", summary.entries);
    println!("   Collisions:           {}", summary.num_collisions);
    println!(
        "   Collision time:       {:.2} s",
        summary.collision_duration_ms as f64 / 1000.0
    );
    println!(
        "   Completion time:      {:.2} s",
        summary.completion_time_ms as f64 / 1000.0
    );
    println!("   Distance travelled:   {:.3}", summary.move_distance);
    println!(
        "   Speed (mean ± std):   {:.3} ± {:.3}",
        summary.velocity.mean_speed, summary.velocity.std_speed
    );
    println!(
        "   Heading/velocity:     {:.1}° ± {:.1}° over {} moving samples",
        summary.heading_velocity_angle.mean.to_degrees(),
        summary.heading_velocity_angle.std.to_degrees(),
        summary.heading_velocity_angle.samples
    );
    let outcome = if summary.reached_target {
        "✅ target reached"
    } else {
        "❌ target not reached"
    };
    println!("   {}", outcome);
    println!();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_console_logging(&CrateDebugFlags::default(), &args.log_level)?;

    if !args.json {
        println!("📊 hapnav session analysis");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    for path in &args.files {
        let entries = read_session_file(path)
            .with_context(|| format!("Failed to read session {}", path.display()))?;
        let summary = SessionSummary::from_entries(&entries);
        if args.json {
            let line = serde_json::json!({
                "file": path.display().to_string(),
                "summary": summary,
            });
            println!("{}", line);
        } else {
            print_summary(path, &summary);
        }
    }
    Ok(())
}
