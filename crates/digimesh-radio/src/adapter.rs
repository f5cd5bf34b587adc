//! Radio adapter: schema codec behind wire framing.
//!
//! The adapter is the piece a serial transport talks to. Outgoing commands
//! are schema-encoded and wrapped for the wire; received bytes are fed in
//! as they arrive and come back out as named-field records, one complete
//! frame at a time.

use std::collections::HashMap;

use digimesh_protocol::{FrameCodec, FrameRecord, ProtocolError, SchemaRegistry, TrailingPolicy};

use crate::framing::WireFraming;

/// A stateful adapter pairing a [`WireFraming`] buffer with a schema codec.
///
/// Holds a shared reference to the registry; many adapters may serve the
/// same registry concurrently.
pub struct RadioAdapter<'r> {
    codec: FrameCodec<'r>,
    framing: WireFraming,
}

impl<'r> RadioAdapter<'r> {
    /// Create an adapter for the transparent (unescaped) operating mode.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        RadioAdapter {
            codec: FrameCodec::new(registry),
            framing: WireFraming::new(),
        }
    }

    /// Create an adapter for the escaped operating mode.
    pub fn escaped(registry: &'r SchemaRegistry) -> Self {
        RadioAdapter {
            codec: FrameCodec::new(registry),
            framing: WireFraming::escaped(),
        }
    }

    /// Create an adapter with an explicit trailing byte policy for decoded
    /// frames.
    pub fn with_trailing_policy(registry: &'r SchemaRegistry, policy: TrailingPolicy) -> Self {
        RadioAdapter {
            codec: FrameCodec::with_trailing_policy(registry, policy),
            framing: WireFraming::new(),
        }
    }

    /// Encode a command and wrap it for the wire, ready for a serial
    /// writer.
    pub fn encode_command(
        &self,
        command: &str,
        fields: &HashMap<&str, Vec<u8>>,
    ) -> Result<Vec<u8>, ProtocolError> {
        let payload = self.codec.encode(command, fields)?;
        Ok(self.framing.encode(&payload))
    }

    /// Feed received bytes into the decoder.
    pub fn feed(&mut self, data: &[u8]) {
        self.framing.push(data);
    }

    /// Try to decode the next complete frame.
    ///
    /// Returns `Ok(Some(record))` when a frame was decoded, `Ok(None)` when
    /// more data is needed, or `Err` when a complete frame failed schema
    /// decoding (unknown type, truncation). An error consumes the offending
    /// frame; later frames remain decodable.
    pub fn try_next(&mut self) -> Result<Option<FrameRecord>, ProtocolError> {
        match self.framing.decode() {
            Some(payload) => Ok(Some(self.codec.decode(&payload)?)),
            None => Ok(None),
        }
    }

    /// Frames dropped by the wire layer for corruption.
    pub fn dropped_frames(&self) -> u64 {
        self.framing.dropped_frames()
    }

    /// Reset the receive state.
    pub fn reset(&mut self) {
        self.framing.clear();
    }
}
