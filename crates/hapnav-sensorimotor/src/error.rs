// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::packet::HapticPacket;
use crate::transport::TransportStatus;

pub type HapticResult<T> = Result<T, HapticError>;

#[derive(Debug, thiserror::Error)]
pub enum HapticError {
    /// The queue is at capacity; the rejected packet is handed back.
    #[error("Haptic queue full, dropped packet for actuator {}", .0.actuator_id)]
    QueueFull(HapticPacket),

    #[error("Haptic queue consumer disconnected")]
    Disconnected,

    #[error("Haptic transport not ready: {0}")]
    TransportNotReady(TransportStatus),

    #[error("Haptic transport error: {0}")]
    Transport(String),
}
