// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end runs of the navigation loop: maze, sensors, haptic wire output
//! and session logs.

use hapnav::config::HapnavConfig;
use hapnav::maze::{parse_csv, CellValue};
use hapnav::prelude::*;
use hapnav::sensorimotor::{decode_packets, HapticResult, TransportStatus};
use hapnav::session::read_session_file;
use proptest::prelude::*;

// Open corridor along row 1 with the target at column 3
const CORRIDOR: &str = "1,1,1,1,1\n0,0,0,2,1\n1,1,1,1,1\n";

fn seeded_config(seed: u64) -> HapnavConfig {
    let mut config = HapnavConfig::default();
    config.map.seed = Some(seed);
    config.map.min_path_area_ratio = 0.0;
    config
}

fn corridor_loop() -> NavigationLoop<Vec<u8>> {
    let mut config = seeded_config(1);
    config.map.cell_size = 1.0;
    config.drone.size = 0.25;
    config.haptic.max_sensor_distance = 1.5;
    let mut nav = NavigationLoop::new(config, Vec::new()).unwrap();
    nav.load_grid(parse_csv(CORRIDOR).unwrap());
    nav
}

fn intensity_for(packets: &[HapticPacket], actuator_id: u8) -> u8 {
    packets
        .iter()
        .find(|p| p.actuator_id == actuator_id)
        .map(|p| p.intensity)
        .unwrap()
}

/// Never ready; packets pile up in the queue.
struct Unplugged;

impl HapticTransport for Unplugged {
    fn status(&self) -> TransportStatus {
        TransportStatus::Disconnected
    }

    fn write(&mut self, _data: &[u8]) -> HapticResult<usize> {
        unreachable!("dispatcher must not write to a transport that is not ready")
    }
}

mod test_haptic_output {
    use super::*;

    #[test]
    fn test_corridor_walls_drive_side_actuators() {
        let mut nav = corridor_loop();
        let report = nav.tick(0, &StickInput::default(), 0.0).unwrap();
        assert_eq!(report.packets_sent, 8);

        let packets = decode_packets(nav.dispatcher().transport()).unwrap();
        assert_eq!(packets.len(), 8);

        // Facing +x: sensor 2 looks south, 6 north, 4 east, 0 west.
        // Actuators are ((8 - id) + 1) % 8.
        let south = intensity_for(&packets, 7);
        let north = intensity_for(&packets, 3);
        let east = intensity_for(&packets, 5);
        let west = intensity_for(&packets, 1);

        // Side walls are 0.5 away: round(50 * 1.0 / 1.5)
        assert_eq!(south, 33);
        assert_eq!(north, 33);
        assert!(east > 0 && east < south);
        assert_eq!(west, 0);
    }

    #[test]
    fn test_packets_follow_sensor_cadence() {
        let mut nav = corridor_loop();
        let idle = StickInput::default();

        assert!(nav.tick(0, &idle, 0.0).unwrap().polled);
        // Inside the 100 ms sensor interval nothing new is produced
        let report = nav.tick(50, &idle, 0.05).unwrap();
        assert!(!report.polled);
        assert_eq!(report.packets_sent, 0);

        let report = nav.tick(100, &idle, 0.05).unwrap();
        assert!(report.polled);
        assert_eq!(report.packets_sent, 8);
        assert_eq!(nav.dispatcher().packets_sent(), 16);
        assert_eq!(nav.stats().readings_encoded, 16);
    }

    #[test]
    fn test_unready_transport_holds_then_drops() {
        let mut config = seeded_config(9);
        config.haptic.queue_capacity = 16;
        let mut nav = NavigationLoop::new(config, Unplugged).unwrap();
        let idle = StickInput::default();

        for now in [0, 100, 200] {
            let report = nav.tick(now, &idle, 0.1).unwrap();
            assert_eq!(report.packets_sent, 0);
        }

        assert_eq!(nav.dispatcher().pending(), 16);
        let stats = nav.stats();
        assert_eq!(stats.readings_encoded, 24);
        assert_eq!(stats.packets_dropped, 8);
    }

    #[test]
    fn test_front_only_ring_sends_single_packet() {
        let mut nav = corridor_loop();
        let front = nav.ring().front_sensor();
        nav.ring_mut().set_active(Some(front)).unwrap();

        let report = nav.tick(0, &StickInput::default(), 0.0).unwrap();
        assert_eq!(report.packets_sent, 1);
        let packets = decode_packets(nav.dispatcher().transport()).unwrap();
        assert_eq!(packets[0].actuator_id, 5);
    }
}

mod test_motion_and_contacts {
    use super::*;

    #[test]
    fn test_flying_down_the_corridor_reaches_target() {
        let mut nav = corridor_loop();
        let forward = StickInput {
            x: 0.0,
            y: -1.0,
            yaw: 0.0,
        };

        let mut reports = Vec::new();
        for tick in 1..=10 {
            reports.push(nav.tick(tick * 1000, &forward, 1.0).unwrap());
        }

        let last = reports.last().unwrap();
        assert!((last.pose.position.x - 3.0).abs() < 1e-9);
        assert!((last.pose.position.y - 1.0).abs() < 1e-9);
        assert!(last.flags.target_collide);
        assert!(last.flags.in_map);
        assert!(reports.iter().all(|r| !r.flags.cell_collide));
        // Disc of radius 0.25 first touches the target cell past x = 2.25
        assert!(!reports[6].flags.target_collide);
        assert!(reports[7].flags.target_collide);
    }

    #[test]
    fn test_leaving_through_entrance_exits_map() {
        let mut nav = corridor_loop();
        let backward = StickInput {
            x: 0.0,
            y: 1.0,
            yaw: 0.0,
        };
        let report = nav.tick(1000, &backward, 3.0).unwrap();
        assert!((report.pose.position.x + 0.9).abs() < 1e-9);
        assert!(!report.flags.in_map);
    }

    #[test]
    fn test_yaw_input_turns_heading() {
        let mut nav = corridor_loop();
        let turn = StickInput {
            x: 0.0,
            y: 0.0,
            yaw: 1.0,
        };
        let report = nav.tick(1000, &turn, 1.0).unwrap();
        assert!((report.command.yaw_rate + 0.5).abs() < 1e-12);
        assert_eq!(report.pose.position, nav.world().entrance_position());
        let before = -std::f64::consts::FRAC_PI_2;
        let after = report.pose.euler_angles().z;
        assert!((after - (before - 0.5)).abs() < 1e-9);
    }
}

mod test_sessions {
    use super::*;

    #[test]
    fn test_logged_session_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = seeded_config(21);
        config.logging.session_dir = dir.path().join("sessions");
        let mut nav = NavigationLoop::new(config, Vec::new()).unwrap();
        let forward = StickInput {
            x: 0.0,
            y: -1.0,
            yaw: 0.0,
        };

        // Not recorded: logging is off
        assert!(!nav.tick(900, &forward, 0.1).unwrap().logged);

        nav.start_logging(1000);
        for step in 1..=5 {
            assert!(nav.tick(1000 + step * 100, &forward, 0.1).unwrap().logged);
        }
        let path = nav.save_session().unwrap().unwrap();
        assert!(path.ends_with("session_1000.ndjson"));
        assert!(nav.recorder().is_empty());

        let entries = read_session_file(&path).unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].timestamp_ms, 1100);
        assert_eq!(entries[4].timestamp_ms, 1500);
        assert!(entries.iter().all(|e| e.in_map));

        let summary = SessionSummary::from_entries(&entries);
        assert_eq!(summary.entries, 5);
        assert!((summary.move_distance - 0.12).abs() < 1e-9);
        assert!((summary.velocity.mean_speed - 0.3).abs() < 1e-9);
        assert!(summary.heading_velocity_angle.mean.abs() < 1e-6);
        assert_eq!(summary.completion_time_ms, 400);

        // Saving again without a running session writes nothing
        assert!(nav.save_session().unwrap().is_none());
    }

    #[test]
    fn test_regenerate_mid_session_keeps_logging() {
        let mut nav = NavigationLoop::new(seeded_config(4), Vec::new()).unwrap();
        nav.start_logging(0);
        nav.tick(10, &StickInput::default(), 0.01).unwrap();
        nav.regenerate().unwrap();
        nav.tick(20, &StickInput::default(), 0.01).unwrap();

        let session = nav.stop_logging().unwrap().unwrap();
        let entries = parse_session(&session.ndjson).unwrap();
        assert_eq!(entries.len(), 2);
    }
}

mod test_generation {
    use super::*;

    #[test]
    fn test_same_seed_same_first_maze() {
        let a = NavigationLoop::new(seeded_config(77), Vec::new()).unwrap();
        let b = NavigationLoop::new(seeded_config(77), Vec::new()).unwrap();
        assert_eq!(*a.shared_grid().snapshot(), *b.shared_grid().snapshot());
    }

    #[test]
    fn test_unreachable_density_is_reported() {
        let mut config = seeded_config(5);
        config.map.min_path_area_ratio = 0.9;
        config.map.max_generation_attempts = 3;
        let nav = NavigationLoop::new(config, Vec::new()).unwrap();
        let report = nav.last_generation();
        assert!(!report.satisfied);
        assert_eq!(report.attempts, 3);
        assert!(report.path_area_ratio < 0.9);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn start_pose_is_inside_an_open_cell(seed in any::<u64>()) {
            let nav = NavigationLoop::new(seeded_config(seed), Vec::new()).unwrap();
            let position = nav.pose().position;
            let flags = nav.contact_flags(&position);
            prop_assert!(flags.in_map);
            prop_assert!(!flags.target_collide);
            let cell = nav.world().cell_at(&position);
            prop_assert_eq!(cell, Some((1, 0)));
            prop_assert_eq!(nav.world().grid().get(1, 0), Some(CellValue::Path));
        }
    }
}
