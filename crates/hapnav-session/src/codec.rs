// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Newline-delimited JSON session files.

use std::fs;
use std::path::Path;

use crate::entry::LogEntry;
use crate::error::{SessionError, SessionResult};

/// One JSON object per line, newline terminated.
pub fn to_ndjson(entries: &[LogEntry]) -> SessionResult<String> {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&entry.to_json_line()?);
        out.push('\n');
    }
    Ok(out)
}

/// Parses a session, skipping blank lines. Errors carry the 1-based line.
pub fn parse_session(text: &str) -> SessionResult<Vec<LogEntry>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| SessionError::Parse {
                line: index + 1,
                source,
            })
        })
        .collect()
}

pub fn read_session_file<P: AsRef<Path>>(path: P) -> SessionResult<Vec<LogEntry>> {
    let text = fs::read_to_string(path)?;
    parse_session(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hapnav_structures::Vec3;

    fn entry(t: i64) -> LogEntry {
        LogEntry {
            position: Vec3::new(t as f64 * 0.1, 0.0, 0.0),
            orientation: Vec3::zeros(),
            velocity: Vec3::new(0.1, 0.0, 0.0),
            angular_velocity_yaw: 0.0,
            cell_collide: t % 2 == 0,
            target_collide: false,
            in_map: true,
            timestamp_ms: t,
        }
    }

    #[test]
    fn test_round_trip() {
        let entries = vec![entry(0), entry(1), entry(2)];
        let text = to_ndjson(&entries).unwrap();
        assert_eq!(text.lines().count(), 3);
        let parsed = parse_session(&text).unwrap();
        assert_eq!(parsed.len(), 3);
        for (a, b) in entries.iter().zip(&parsed) {
            assert!((a.position - b.position).norm() < 1e-12);
            assert_eq!(a.cell_collide, b.cell_collide);
            assert_eq!(a.timestamp_ms, b.timestamp_ms);
        }
    }

    #[test]
    fn test_blank_lines_and_line_numbers() {
        let good = entry(1).to_json_line().unwrap();
        let text = format!("\n{}\n\n{{broken\n", good);
        match parse_session(&text) {
            Err(SessionError::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(parse_session(&format!("\n{}\n\n", good)).unwrap().len(), 1);
        assert!(parse_session("").unwrap().is_empty());
    }
}
