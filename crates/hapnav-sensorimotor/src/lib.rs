// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Sensing and haptic output for hapnav.
//!
//! [`SensorRing`] samples the world each tick, [`HapticEncoder`] turns
//! readings into [`HapticPacket`]s, and a bounded queue carries them to a
//! [`HapticTransport`] drained by [`HapticDispatcher`].

mod error;
pub mod haptics;
pub mod motion;
pub mod packet;
pub mod queue;
pub mod ring;
pub mod sensor;
pub mod transport;

pub use error::{HapticError, HapticResult};
pub use haptics::{distance_to_intensity, sensor_id_to_actuator_id, ActuatorCount, HapticEncoder};
pub use motion::{integrate, MotionCommand, MotionModel, StickInput};
pub use packet::{decode_packets, encode_packets, HapticPacket};
pub use queue::{create_haptic_queue, ChannelStats, HapticConsumer, HapticProducer};
pub use ring::SensorRing;
pub use sensor::{DistanceSensor, SensorId, SensorReading, SensorSpec, SubRayCount};
pub use transport::{
    HapticDispatcher, HapticTransport, LoggingTransport, TransportStatus, WriterTransport,
};
