// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Haptic packets and their 2-byte wire form `[actuator_id, intensity]`.
//! There is no framing or checksum; a stream is a plain concatenation.

use hapnav_structures::NavDataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HapticPacket {
    pub actuator_id: u8,
    pub intensity: u8,
}

impl HapticPacket {
    pub const WIRE_SIZE: usize = 2;

    pub const fn new(actuator_id: u8, intensity: u8) -> Self {
        Self {
            actuator_id,
            intensity,
        }
    }

    pub const fn to_bytes(self) -> [u8; Self::WIRE_SIZE] {
        [self.actuator_id, self.intensity]
    }

    pub const fn from_bytes(bytes: [u8; Self::WIRE_SIZE]) -> Self {
        Self::new(bytes[0], bytes[1])
    }
}

/// Serializes packets back to back.
pub fn encode_packets(packets: &[HapticPacket]) -> Vec<u8> {
    packets.iter().flat_map(|p| p.to_bytes()).collect()
}

/// Splits a byte stream into packets.
///
/// # Errors
/// `DeserializationError` when the stream ends in the middle of a packet.
pub fn decode_packets(bytes: &[u8]) -> Result<Vec<HapticPacket>, NavDataError> {
    if bytes.len() % HapticPacket::WIRE_SIZE != 0 {
        return Err(NavDataError::DeserializationError(format!(
            "Haptic stream of {} bytes is not a multiple of {}",
            bytes.len(),
            HapticPacket::WIRE_SIZE
        )));
    }
    Ok(bytes
        .chunks_exact(HapticPacket::WIRE_SIZE)
        .map(|chunk| HapticPacket::new(chunk[0], chunk[1]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_layout() {
        let packet = HapticPacket::new(3, 42);
        assert_eq!(packet.to_bytes(), [3, 42]);
        assert_eq!(HapticPacket::from_bytes([3, 42]), packet);
    }

    #[test]
    fn test_stream_codec() {
        let packets = [HapticPacket::new(0, 50), HapticPacket::new(7, 0)];
        let bytes = encode_packets(&packets);
        assert_eq!(bytes, vec![0, 50, 7, 0]);
        assert_eq!(decode_packets(&bytes).unwrap(), packets.to_vec());
        assert!(decode_packets(&[1, 2, 3]).is_err());
        assert!(decode_packets(&[]).unwrap().is_empty());
    }
}
