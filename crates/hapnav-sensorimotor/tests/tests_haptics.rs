// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use hapnav_sensorimotor::{
    create_haptic_queue, distance_to_intensity, sensor_id_to_actuator_id, ActuatorCount,
    HapticDispatcher, HapticEncoder, HapticError, SensorId, SensorReading,
};
use hapnav_structures::Vec3;
use proptest::prelude::*;
use std::collections::HashSet;

mod test_intensity {
    use super::*;

    proptest! {
        #[test]
        fn non_increasing_in_distance(
            a in -1.0f64..2.0,
            b in -1.0f64..2.0,
            max_distance in 0.01f64..5.0,
            max_intensity in any::<u8>(),
        ) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                distance_to_intensity(near, max_distance, max_intensity)
                    >= distance_to_intensity(far, max_distance, max_intensity)
            );
        }

        #[test]
        fn anchors_hold(max_distance in 0.01f64..5.0, max_intensity in any::<u8>(), extra in 0.0f64..10.0) {
            prop_assert_eq!(distance_to_intensity(0.0, max_distance, max_intensity), max_intensity);
            prop_assert_eq!(distance_to_intensity(max_distance, max_distance, max_intensity), 0);
            prop_assert_eq!(distance_to_intensity(max_distance + extra, max_distance, max_intensity), 0);
        }
    }
}

mod test_actuator_mapping {
    use super::*;

    proptest! {
        #[test]
        fn bijection_for_any_ring(n in 1u16..=256) {
            let count = ActuatorCount::new(n).unwrap();
            let mapped: HashSet<u32> = (0..u32::from(n))
                .map(|i| sensor_id_to_actuator_id(SensorId::from(i), count))
                .collect();
            prop_assert_eq!(mapped.len(), n as usize);
            prop_assert!(mapped.iter().all(|&id| id < u32::from(n)));
        }
    }
}

mod test_pipeline {
    use super::*;

    fn reading(id: u32, distance: f64) -> SensorReading {
        SensorReading {
            sensor_id: SensorId::from(id),
            hit_distance: distance,
            hit_direction: Vec3::new(1.0, 0.0, 0.0),
        }
    }

    #[test]
    fn test_readings_reach_the_wire() {
        let encoder = HapticEncoder::new(0.5, 50, ActuatorCount::new(8).unwrap()).unwrap();
        let (producer, consumer) = create_haptic_queue(16);
        let mut dispatcher = HapticDispatcher::new(consumer, Vec::new(), 10);

        for (id, distance) in [(0, 0.0), (2, 0.25), (4, f64::INFINITY)] {
            producer.try_push(encoder.encode(&reading(id, distance))).unwrap();
        }
        assert_eq!(dispatcher.poll(0).unwrap(), Some(3));
        assert_eq!(dispatcher.transport(), &vec![1, 50, 7, 25, 5, 0]);
    }

    #[test]
    fn test_backpressure_is_visible_to_the_producer() {
        let encoder = HapticEncoder::new(0.5, 50, ActuatorCount::new(8).unwrap()).unwrap();
        let (producer, _consumer) = create_haptic_queue(3);
        let results: Vec<_> = (0..5).map(|i| producer.try_push(encoder.encode(&reading(i, 0.1)))).collect();
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 3);
        assert!(matches!(results[4], Err(HapticError::QueueFull(_))));
    }
}
