// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # hapnav-observability
//!
//! Logging setup shared by the hapnav binaries, with per-crate debug flags.
//!
//! ## Features
//! - `file-logging`: JSON log files with daily rotation in a per-run folder

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known hapnav crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "hapnav",
    "hapnav-structures",
    "hapnav-maze",
    "hapnav-sensorimotor",
    "hapnav-session",
    "hapnav-config",
];

/// Tracing target of a crate name (`hapnav-maze` logs as `hapnav_maze`)
pub fn crate_target(crate_name: &str) -> String {
    crate_name.replace('-', "_")
}
