// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Bounded haptic packet queue between the sensing tick and the transport.
//!
//! One producer, one consumer. A full queue rejects new packets instead of
//! growing, and the consumer always drains everything queued at once.

use crossbeam::channel::{bounded, Receiver, Sender, TrySendError};
use tracing::warn;

use crate::error::{HapticError, HapticResult};
use crate::packet::HapticPacket;

/// Create the two ends of a haptic queue holding at most `capacity` packets.
pub fn create_haptic_queue(capacity: usize) -> (HapticProducer, HapticConsumer) {
    let (sender, receiver) = bounded(capacity);
    (HapticProducer { sender }, HapticConsumer { receiver })
}

/// Statistics for monitoring queue health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStats {
    pub capacity: usize,
    pub len: usize,
    pub is_full: bool,
    pub is_empty: bool,
}

impl ChannelStats {
    pub fn from_sender<T>(sender: &Sender<T>) -> Self {
        Self {
            capacity: sender.capacity().unwrap_or(0),
            len: sender.len(),
            is_full: sender.is_full(),
            is_empty: sender.is_empty(),
        }
    }

    /// Utilization from 0.0 to 1.0
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.len as f64 / self.capacity as f64
        }
    }
}

#[derive(Debug)]
pub struct HapticProducer {
    sender: Sender<HapticPacket>,
}

impl HapticProducer {
    /// Queues a packet without blocking.
    ///
    /// # Errors
    /// `QueueFull` carrying the packet when at capacity, `Disconnected` when
    /// the consumer is gone.
    pub fn try_push(&self, packet: HapticPacket) -> HapticResult<()> {
        self.sender.try_send(packet).map_err(|e| match e {
            TrySendError::Full(packet) => {
                warn!(
                    actuator_id = packet.actuator_id,
                    capacity = self.sender.capacity().unwrap_or(0),
                    "haptic queue full, dropping packet"
                );
                HapticError::QueueFull(packet)
            }
            TrySendError::Disconnected(_) => HapticError::Disconnected,
        })
    }

    pub fn stats(&self) -> ChannelStats {
        ChannelStats::from_sender(&self.sender)
    }
}

#[derive(Debug)]
pub struct HapticConsumer {
    receiver: Receiver<HapticPacket>,
}

impl HapticConsumer {
    /// Takes every queued packet, oldest first.
    pub fn drain(&self) -> Vec<HapticPacket> {
        self.receiver.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
