//! Wire framing for API frames.
//!
//! Each frame on the serial link is wrapped as:
//!
//! ```text
//! +------+--------+--------+-------------------+----------+
//! | 0x7E | len_hi | len_lo | payload[0..len]   | checksum |
//! +------+--------+--------+-------------------+----------+
//! ```
//!
//! The length is big-endian and covers the payload only; the checksum is
//! `0xFF` minus the low byte of the payload sum. In the escaped operating
//! mode, every byte after the start delimiter that collides with a control
//! byte (`0x7E`, `0x7D`, `0x11`, `0x13`) is written as `0x7D` followed by
//! the byte XOR `0x20`.
//!
//! The decoder accumulates received bytes, discards garbage between frames,
//! and drops frames with a bad checksum, resynchronizing on the next start
//! delimiter. A dropped frame is logged and counted, never surfaced as an
//! error: corrupt serial input is routine, not exceptional.

use bytes::{Buf, BytesMut};
use log::warn;

/// Marks the start of every frame on the wire.
pub const START_DELIMITER: u8 = 0x7E;
/// Escape prefix in the escaped operating mode.
pub const ESCAPE: u8 = 0x7D;
/// XON flow control byte, escaped on the wire.
pub const XON: u8 = 0x11;
/// XOFF flow control byte, escaped on the wire.
pub const XOFF: u8 = 0x13;

const ESCAPE_XOR: u8 = 0x20;

/// Largest payload the decoder will wait for. A claimed length beyond this
/// is treated as line noise.
pub const MAX_PAYLOAD_SIZE: usize = 1024;

enum Scan {
    Incomplete,
    Frame { payload: Vec<u8>, consumed: usize },
    Corrupt { consumed: usize, reason: &'static str },
}

/// A codec for reading and writing wire-framed payloads.
#[derive(Debug, Default)]
pub struct WireFraming {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
    /// Whether the link runs in the escaped operating mode.
    escaped: bool,
    /// Frames dropped for bad checksums or framing since the last clear.
    dropped: u64,
}

impl WireFraming {
    /// Create a codec for the transparent (unescaped) operating mode.
    pub fn new() -> Self {
        WireFraming {
            buffer: BytesMut::with_capacity(MAX_PAYLOAD_SIZE),
            escaped: false,
            dropped: 0,
        }
    }

    /// Create a codec for the escaped operating mode.
    pub fn escaped() -> Self {
        WireFraming {
            escaped: true,
            ..WireFraming::new()
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to extract the next complete payload from the buffer.
    ///
    /// Returns `Some(payload)` when a frame with a valid checksum is
    /// available, `None` when more data is needed. Corrupt frames are
    /// skipped internally.
    pub fn decode(&mut self) -> Option<Vec<u8>> {
        loop {
            // Discard garbage ahead of the next start delimiter.
            while !self.buffer.is_empty() && self.buffer[0] != START_DELIMITER {
                self.buffer.advance(1);
            }
            if self.buffer.is_empty() {
                return None;
            }

            match self.scan_frame() {
                Scan::Incomplete => return None,
                Scan::Frame { payload, consumed } => {
                    self.buffer.advance(consumed);
                    return Some(payload);
                }
                Scan::Corrupt { consumed, reason } => {
                    self.dropped += 1;
                    warn!(
                        "dropping corrupt frame ({reason}): {}",
                        hex::encode(&self.buffer[..consumed])
                    );
                    self.buffer.advance(consumed);
                }
            }
        }
    }

    /// Scan one frame starting at the delimiter in `buffer[0]`, without
    /// consuming anything. `consumed` counts raw buffered bytes.
    fn scan_frame(&self) -> Scan {
        // body holds the unescaped length, payload, and checksum bytes.
        let mut body: Vec<u8> = Vec::new();
        let mut idx = 1;

        while idx < self.buffer.len() {
            let byte = self.buffer[idx];
            if self.escaped {
                if byte == START_DELIMITER {
                    // A raw delimiter cannot occur inside an escaped frame;
                    // resynchronize on it.
                    return Scan::Corrupt {
                        consumed: idx,
                        reason: "start delimiter inside frame",
                    };
                }
                if byte == ESCAPE {
                    if idx + 1 >= self.buffer.len() {
                        return Scan::Incomplete;
                    }
                    body.push(self.buffer[idx + 1] ^ ESCAPE_XOR);
                    idx += 2;
                } else {
                    body.push(byte);
                    idx += 1;
                }
            } else {
                body.push(byte);
                idx += 1;
            }

            if body.len() < 2 {
                continue;
            }
            let len = u16::from_be_bytes([body[0], body[1]]) as usize;
            if len > MAX_PAYLOAD_SIZE {
                return Scan::Corrupt {
                    consumed: idx,
                    reason: "oversized length",
                };
            }
            if body.len() == 2 + len + 1 {
                let payload = &body[2..2 + len];
                let checksum = body[2 + len];
                if checksum != wire_checksum(payload) {
                    return Scan::Corrupt {
                        consumed: idx,
                        reason: "checksum mismatch",
                    };
                }
                return Scan::Frame {
                    payload: payload.to_vec(),
                    consumed: idx,
                };
            }
        }

        Scan::Incomplete
    }

    /// Encode a payload for transmission, with delimiter, length, checksum,
    /// and escaping per the configured operating mode.
    pub fn encode(&self, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(payload.len() + 4);
        out.push(START_DELIMITER);
        self.write_escaped(&mut out, &(payload.len() as u16).to_be_bytes());
        self.write_escaped(&mut out, payload);
        self.write_escaped(&mut out, &[wire_checksum(payload)]);
        out
    }

    fn write_escaped(&self, out: &mut Vec<u8>, bytes: &[u8]) {
        for &byte in bytes {
            if self.escaped && matches!(byte, START_DELIMITER | ESCAPE | XON | XOFF) {
                out.push(ESCAPE);
                out.push(byte ^ ESCAPE_XOR);
            } else {
                out.push(byte);
            }
        }
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Frames dropped for corruption since the last clear.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped
    }

    /// Clear the buffer and the dropped-frame counter.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.dropped = 0;
    }
}

/// Checksum over a payload: `0xFF` minus the low byte of the byte sum.
pub fn wire_checksum(payload: &[u8]) -> u8 {
    let sum = payload.iter().fold(0u8, |acc, byte| acc.wrapping_add(*byte));
    0xFF - sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_frames_payload() {
        let framing = WireFraming::new();
        let encoded = framing.encode(b"\x08\x00NI");

        assert_eq!(encoded[0], START_DELIMITER);
        assert_eq!(&encoded[1..3], &[0x00, 0x04]); // big-endian length
        assert_eq!(&encoded[3..7], b"\x08\x00NI");
        assert_eq!(encoded[7], wire_checksum(b"\x08\x00NI"));
    }

    #[test]
    fn decode_roundtrip() {
        let mut framing = WireFraming::new();
        let payload = b"\x8A\x00";

        framing.push(&framing.encode(payload));
        assert_eq!(framing.decode(), Some(payload.to_vec()));
        assert_eq!(framing.decode(), None);
    }

    #[test]
    fn decode_partial_then_complete() {
        let mut framing = WireFraming::new();
        let encoded = framing.encode(b"\x88\x01NI\x00OK");

        framing.push(&encoded[..4]);
        assert_eq!(framing.decode(), None);

        framing.push(&encoded[4..]);
        assert_eq!(framing.decode(), Some(b"\x88\x01NI\x00OK".to_vec()));
    }

    #[test]
    fn decode_skips_garbage_between_frames() {
        let mut framing = WireFraming::new();

        framing.push(b"\x00\xFF\x42");
        framing.push(&framing.encode(b"\x8A\x00"));
        assert_eq!(framing.decode(), Some(b"\x8A\x00".to_vec()));
    }

    #[test]
    fn decode_drops_bad_checksum_and_resynchronizes() {
        let mut framing = WireFraming::new();

        let mut corrupt = framing.encode(b"\x8A\x00");
        let last = corrupt.len() - 1;
        corrupt[last] ^= 0xFF;
        framing.push(&corrupt);
        framing.push(&framing.encode(b"\x8A\x06"));

        assert_eq!(framing.decode(), Some(b"\x8A\x06".to_vec()));
        assert_eq!(framing.dropped_frames(), 1);
    }

    #[test]
    fn escaped_roundtrip_escapes_control_bytes() {
        let mut framing = WireFraming::escaped();
        // Payload containing every byte the escaped mode must not emit raw.
        let payload = &[0x7E, 0x7D, 0x11, 0x13, 0x42][..];

        let encoded = framing.encode(payload);
        // Only the leading delimiter may appear unescaped.
        assert_eq!(
            encoded[1..].iter().filter(|&&b| b == START_DELIMITER).count(),
            0
        );

        framing.push(&encoded);
        assert_eq!(framing.decode(), Some(payload.to_vec()));
    }

    #[test]
    fn escaped_length_bytes_are_escaped() {
        let framing = WireFraming::escaped();
        // A 0x11-byte payload forces an escape in the length field itself.
        let payload = vec![0u8; XON as usize];

        let encoded = framing.encode(&payload);
        assert_eq!(&encoded[..4], &[START_DELIMITER, 0x00, ESCAPE, XON ^ 0x20]);
    }

    #[test]
    fn escaped_decoder_resynchronizes_on_raw_delimiter() {
        let mut framing = WireFraming::escaped();

        // A truncated frame interrupted by a fresh, valid frame.
        framing.push(&[START_DELIMITER, 0x00, 0x05, 0x01]);
        framing.push(&framing.encode(b"\x8A\x00"));

        assert_eq!(framing.decode(), Some(b"\x8A\x00".to_vec()));
        assert_eq!(framing.dropped_frames(), 1);
    }

    #[test]
    fn oversized_length_is_dropped_as_noise() {
        let mut framing = WireFraming::new();

        framing.push(&[START_DELIMITER, 0xFF, 0xFF]);
        framing.push(&framing.encode(b"\x8A\x00"));

        assert_eq!(framing.decode(), Some(b"\x8A\x00".to_vec()));
        assert_eq!(framing.dropped_frames(), 1);
    }
}
