// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Outbound side of the haptic queue.

use std::fmt::{Display, Formatter};
use std::io::Write;

use tracing::{debug, info, warn};

use crate::error::{HapticError, HapticResult};
use crate::packet::{encode_packets, HapticPacket};
use crate::queue::HapticConsumer;

/// Default serial baud rate of the wearable
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportStatus {
    Disconnected,
    Ready,
    /// Open but currently unable to accept writes
    Busy,
}

impl Display for TransportStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransportStatus::Disconnected => "disconnected",
            TransportStatus::Ready => "ready",
            TransportStatus::Busy => "busy",
        };
        f.write_str(name)
    }
}

/// Byte sink for haptic packets, typically a serial link.
pub trait HapticTransport {
    fn status(&self) -> TransportStatus;

    /// Write bytes, returning how many were accepted
    fn write(&mut self, data: &[u8]) -> HapticResult<usize>;

    fn flush(&mut self) -> HapticResult<()> {
        Ok(())
    }
}

/// In-memory capture, always ready.
impl HapticTransport for Vec<u8> {
    fn status(&self) -> TransportStatus {
        TransportStatus::Ready
    }

    fn write(&mut self, data: &[u8]) -> HapticResult<usize> {
        self.extend_from_slice(data);
        Ok(data.len())
    }
}

/// Logs every packet instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct LoggingTransport {
    packets_logged: u64,
}

impl LoggingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn packets_logged(&self) -> u64 {
        self.packets_logged
    }
}

impl HapticTransport for LoggingTransport {
    fn status(&self) -> TransportStatus {
        TransportStatus::Ready
    }

    fn write(&mut self, data: &[u8]) -> HapticResult<usize> {
        for chunk in data.chunks_exact(HapticPacket::WIRE_SIZE) {
            debug!(actuator_id = chunk[0], intensity = chunk[1], "sent");
            self.packets_logged += 1;
        }
        Ok(data.len())
    }
}

/// Transport over any [`Write`] (an opened serial device, a file, a socket).
///
/// A failed write or flush marks the transport disconnected until
/// [`WriterTransport::reconnect`] is called.
#[derive(Debug)]
pub struct WriterTransport<W: Write> {
    writer: W,
    baud_rate: u32,
    status: TransportStatus,
}

impl<W: Write> WriterTransport<W> {
    pub fn new(writer: W, baud_rate: u32) -> Self {
        info!(baud_rate, "haptic transport opened");
        Self {
            writer,
            baud_rate,
            status: TransportStatus::Ready,
        }
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Manual retry after a fault
    pub fn reconnect(&mut self) {
        self.status = TransportStatus::Ready;
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn fail(&mut self, e: std::io::Error) -> HapticError {
        self.status = TransportStatus::Disconnected;
        warn!(error = %e, "haptic transport fault");
        HapticError::Transport(e.to_string())
    }
}

impl<W: Write> HapticTransport for WriterTransport<W> {
    fn status(&self) -> TransportStatus {
        self.status
    }

    fn write(&mut self, data: &[u8]) -> HapticResult<usize> {
        match self.writer.write_all(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn flush(&mut self) -> HapticResult<()> {
        self.writer.flush().map_err(|e| self.fail(e))
    }
}

/// Moves queued packets to a transport at a fixed interval.
#[derive(Debug)]
pub struct HapticDispatcher<T: HapticTransport> {
    consumer: HapticConsumer,
    transport: T,
    poll_interval_ms: i64,
    last_dispatch_ms: Option<i64>,
    packets_sent: u64,
}

impl<T: HapticTransport> HapticDispatcher<T> {
    pub fn new(consumer: HapticConsumer, transport: T, poll_interval_ms: u64) -> Self {
        Self {
            consumer,
            transport,
            poll_interval_ms: i64::try_from(poll_interval_ms).unwrap_or(i64::MAX),
            last_dispatch_ms: None,
            packets_sent: 0,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn packets_sent(&self) -> u64 {
        self.packets_sent
    }

    pub fn pending(&self) -> usize {
        self.consumer.len()
    }

    /// Drains the whole queue into the transport.
    ///
    /// When the transport is not ready nothing is drained and the packets
    /// stay queued; the producer sees `QueueFull` once they pile up. Packets
    /// drained into a failing write are lost.
    pub fn dispatch(&mut self) -> HapticResult<usize> {
        let status = self.transport.status();
        if status != TransportStatus::Ready {
            debug!(%status, pending = self.consumer.len(), "haptic transport not ready");
            return Err(HapticError::TransportNotReady(status));
        }
        let packets = self.consumer.drain();
        if packets.is_empty() {
            return Ok(0);
        }
        let bytes = encode_packets(&packets);
        self.transport.write(&bytes)?;
        self.transport.flush()?;
        self.packets_sent += packets.len() as u64;
        Ok(packets.len())
    }

    /// Dispatches if the poll interval has elapsed; `Ok(None)` otherwise.
    pub fn poll(&mut self, now_ms: i64) -> HapticResult<Option<usize>> {
        let due = self
            .last_dispatch_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= self.poll_interval_ms);
        if !due {
            return Ok(None);
        }
        self.last_dispatch_ms = Some(now_ms);
        self.dispatch().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::create_haptic_queue;

    struct Offline;

    impl HapticTransport for Offline {
        fn status(&self) -> TransportStatus {
            TransportStatus::Busy
        }

        fn write(&mut self, _data: &[u8]) -> HapticResult<usize> {
            Err(HapticError::Transport("offline".into()))
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "unplugged"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_dispatch_drains_everything() {
        let (producer, consumer) = create_haptic_queue(8);
        producer.try_push(HapticPacket::new(1, 10)).unwrap();
        producer.try_push(HapticPacket::new(2, 20)).unwrap();
        let mut dispatcher = HapticDispatcher::new(consumer, Vec::new(), 10);

        assert_eq!(dispatcher.dispatch().unwrap(), 2);
        assert_eq!(dispatcher.transport(), &vec![1, 10, 2, 20]);
        assert_eq!(dispatcher.pending(), 0);
        assert_eq!(dispatcher.dispatch().unwrap(), 0);
    }

    #[test]
    fn test_not_ready_keeps_packets_queued() {
        let (producer, consumer) = create_haptic_queue(8);
        producer.try_push(HapticPacket::new(1, 10)).unwrap();
        let mut dispatcher = HapticDispatcher::new(consumer, Offline, 10);

        assert!(matches!(
            dispatcher.dispatch(),
            Err(HapticError::TransportNotReady(TransportStatus::Busy))
        ));
        assert_eq!(dispatcher.pending(), 1);
    }

    #[test]
    fn test_poll_interval() {
        let (producer, consumer) = create_haptic_queue(8);
        let mut dispatcher = HapticDispatcher::new(consumer, LoggingTransport::new(), 10);
        producer.try_push(HapticPacket::new(0, 1)).unwrap();
        assert_eq!(dispatcher.poll(0).unwrap(), Some(1));
        producer.try_push(HapticPacket::new(0, 2)).unwrap();
        assert_eq!(dispatcher.poll(5).unwrap(), None);
        assert_eq!(dispatcher.poll(10).unwrap(), Some(1));
        assert_eq!(dispatcher.transport().packets_logged(), 2);
        assert_eq!(dispatcher.packets_sent(), 2);
    }

    #[test]
    fn test_writer_fault_requires_reconnect() {
        let mut transport = WriterTransport::new(BrokenPipe, DEFAULT_BAUD_RATE);
        assert!(transport.write(&[0, 1]).is_err());
        assert_eq!(transport.status(), TransportStatus::Disconnected);
        transport.reconnect();
        assert_eq!(transport.status(), TransportStatus::Ready);
    }
}
