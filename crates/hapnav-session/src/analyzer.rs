// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Batch statistics over a recorded session.
//!
//! Every function accepts an empty slice and then returns zeros. Durations
//! run from the entry where a state starts to the entry where it stops; a
//! state still active at the last entry ends at that entry.

use hapnav_structures::Vec3;
use serde::Serialize;

use crate::entry::LogEntry;

/// Sums (or, with `last_only`, returns the last) durations of the intervals
/// where `active` holds.
fn interval_durations<F>(entries: &[LogEntry], active: F, last_only: bool) -> i64
where
    F: Fn(&LogEntry) -> bool,
{
    let mut total = 0i64;
    let mut last = 0i64;
    let mut started: Option<i64> = None;
    for entry in entries {
        match (active(entry), started) {
            (true, None) => started = Some(entry.timestamp_ms),
            (false, Some(start)) => {
                last = entry.timestamp_ms.saturating_sub(start);
                total = total.saturating_add(last);
                started = None;
            }
            _ => {}
        }
    }
    if let (Some(start), Some(end)) = (started, entries.last()) {
        last = end.timestamp_ms.saturating_sub(start);
        total = total.saturating_add(last);
    }
    if last_only {
        last
    } else {
        total
    }
}

/// Number of false to true transitions of `cell_collide`.
pub fn num_collisions(entries: &[LogEntry]) -> usize {
    let mut colliding = false;
    let mut count = 0;
    for entry in entries {
        if entry.cell_collide && !colliding {
            count += 1;
        }
        colliding = entry.cell_collide;
    }
    count
}

/// Milliseconds spent colliding while inside the map.
pub fn collision_duration(entries: &[LogEntry]) -> i64 {
    interval_durations(entries, |e| e.cell_collide && e.in_map, false)
}

/// Milliseconds of the last contiguous stretch inside the map.
pub fn completion_time(entries: &[LogEntry]) -> i64 {
    interval_durations(entries, |e| e.in_map, true)
}

/// Path length travelled.
pub fn move_distance(entries: &[LogEntry]) -> f64 {
    entries
        .windows(2)
        .map(|pair| (pair[1].position - pair[0].position).norm())
        .sum()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VelocityStats {
    pub mean: [f64; 3],
    pub std: [f64; 3],
    pub mean_speed: f64,
    pub std_speed: f64,
}

/// Population mean and standard deviation.
fn mean_std<I>(values: I) -> (f64, f64)
where
    I: Iterator<Item = f64> + Clone,
{
    let n = values.clone().count();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = values.clone().sum::<f64>() / n as f64;
    let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    (mean, variance.sqrt())
}

/// Per-axis and magnitude statistics of the recorded velocity.
pub fn velocity_stats(entries: &[LogEntry]) -> VelocityStats {
    if entries.is_empty() {
        return VelocityStats::default();
    }
    let mut stats = VelocityStats::default();
    for axis in 0..3 {
        let (mean, std) = mean_std(entries.iter().map(|e| e.velocity[axis]));
        stats.mean[axis] = mean;
        stats.std[axis] = std;
    }
    let (mean_speed, std_speed) = mean_std(entries.iter().map(|e| e.velocity.norm()));
    stats.mean_speed = mean_speed;
    stats.std_speed = std_speed;
    stats
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AngleStats {
    /// Radians
    pub mean: f64,
    pub std: f64,
    /// Entries with a non-zero velocity
    pub samples: usize,
}

/// Angle between heading and velocity, over entries that are moving.
pub fn heading_velocity_angle(entries: &[LogEntry]) -> AngleStats {
    let angles: Vec<f64> = entries
        .iter()
        .filter(|e| e.velocity.norm() > f64::EPSILON)
        .map(heading_velocity_angle_of)
        .collect();
    let (mean, std) = mean_std(angles.iter().copied());
    AngleStats {
        mean,
        std,
        samples: angles.len(),
    }
}

/// Angle for a single entry; zero velocity gives 0.
pub fn heading_velocity_angle_of(entry: &LogEntry) -> f64 {
    let velocity: &Vec3 = &entry.velocity;
    if velocity.norm() <= f64::EPSILON {
        return 0.0;
    }
    entry.heading().angle(velocity)
}

/// Everything the analyzer computes for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub entries: usize,
    pub num_collisions: usize,
    pub collision_duration_ms: i64,
    pub completion_time_ms: i64,
    pub move_distance: f64,
    pub velocity: VelocityStats,
    pub heading_velocity_angle: AngleStats,
    pub reached_target: bool,
}

impl SessionSummary {
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        Self {
            entries: entries.len(),
            num_collisions: num_collisions(entries),
            collision_duration_ms: collision_duration(entries),
            completion_time_ms: completion_time(entries),
            move_distance: move_distance(entries),
            velocity: velocity_stats(entries),
            heading_velocity_angle: heading_velocity_angle(entries),
            reached_target: entries.iter().any(|e| e.target_collide),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(t: i64, collide: bool, in_map: bool) -> LogEntry {
        LogEntry {
            position: Vec3::zeros(),
            orientation: Vec3::zeros(),
            velocity: Vec3::zeros(),
            angular_velocity_yaw: 0.0,
            cell_collide: collide,
            target_collide: false,
            in_map,
            timestamp_ms: t,
        }
    }

    #[test]
    fn test_num_collisions_counts_rising_edges() {
        let flags = [false, true, true, false, true, false];
        let entries: Vec<_> = flags.iter().enumerate().map(|(i, &c)| entry(i as i64, c, true)).collect();
        assert_eq!(num_collisions(&entries), 2);
    }

    #[test]
    fn test_collision_duration_is_in_map_only() {
        let entries = vec![
            entry(0, false, true),
            entry(10, true, true),
            entry(30, false, true),
            entry(40, true, false),
            entry(50, true, true),
            entry(55, true, true),
        ];
        // 10..30, then 50..55 closed at the last entry; 40 is outside the map
        assert_eq!(collision_duration(&entries), 25);
    }

    #[test]
    fn test_completion_time_takes_last_stretch() {
        let entries = vec![
            entry(0, false, true),
            entry(50, false, false),
            entry(200, false, true),
            entry(260, false, true),
            entry(300, false, false),
            entry(400, false, false),
        ];
        assert_eq!(completion_time(&entries), 100);
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(num_collisions(&[]), 0);
        assert_eq!(collision_duration(&[]), 0);
        assert_eq!(completion_time(&[]), 0);
        assert_eq!(move_distance(&[]), 0.0);
        assert_eq!(velocity_stats(&[]), VelocityStats::default());
        assert_eq!(heading_velocity_angle(&[]), AngleStats::default());
        assert_eq!(SessionSummary::from_entries(&[]), SessionSummary::default());
    }
}
