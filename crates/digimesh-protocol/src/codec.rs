//! Schema-driven frame encoding and decoding.
//!
//! One generic walk over a schema replaces a hand-written pack/unpack
//! function per frame type. Encoding serializes a map of named field values
//! against a command schema; decoding dispatches on the leading identifier
//! byte, then slices the rest of the payload into named fields.
//!
//! The codec performs no I/O and holds no mutable state: every call is a
//! pure function of its inputs and the registry it borrows, so calls may
//! run concurrently across frames with no ordering between them.

use std::collections::HashMap;

use log::warn;

use crate::error::ProtocolError;
use crate::registry::SchemaRegistry;
use crate::schema::FieldLen;

/// What to do with bytes left over after the last fixed field of a schema
/// that has no remainder field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingPolicy {
    /// Fail the decode with [`ProtocolError::TrailingBytes`].
    #[default]
    Reject,
    /// Drop the extra bytes with a logged warning.
    Allow,
}

/// A decoded frame: the response's symbolic name and the exact byte slice
/// consumed for each field.
///
/// Values are uninterpreted bytes; numeric decoding is a higher layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRecord {
    name: &'static str,
    fields: HashMap<&'static str, Vec<u8>>,
}

impl FrameRecord {
    /// Symbolic name of the response schema that matched.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Bytes consumed for one field, if the schema declares it.
    pub fn field(&self, name: &str) -> Option<&[u8]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// All decoded fields, in no particular order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &[u8])> {
        self.fields.iter().map(|(name, value)| (*name, value.as_slice()))
    }
}

/// The generic codec. Borrows the registry; owns nothing mutable.
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec<'r> {
    registry: &'r SchemaRegistry,
    trailing: TrailingPolicy,
}

impl<'r> FrameCodec<'r> {
    /// Create a codec over a registry with the default (strict) trailing
    /// byte policy.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        FrameCodec {
            registry,
            trailing: TrailingPolicy::Reject,
        }
    }

    /// Create a codec with an explicit trailing byte policy.
    pub fn with_trailing_policy(registry: &'r SchemaRegistry, trailing: TrailingPolicy) -> Self {
        FrameCodec { registry, trailing }
    }

    /// Serialize a command into payload bytes.
    ///
    /// Fields are emitted in schema order. A supplied fixed-length value
    /// must match its declared length exactly; an omitted field takes its
    /// default, an omitted remainder field contributes nothing, and an
    /// omitted fixed field with no default fails. All-or-nothing: a failed
    /// encode returns no partial output.
    pub fn encode(
        &self,
        command: &str,
        fields: &HashMap<&str, Vec<u8>>,
    ) -> Result<Vec<u8>, ProtocolError> {
        let schema = self.registry.lookup_command(command)?;

        let mut buf = Vec::new();
        for spec in schema.fields() {
            match fields.get(spec.name()) {
                Some(value) => {
                    if let FieldLen::Fixed(len) = spec.len() {
                        if value.len() != len {
                            return Err(ProtocolError::FieldLengthMismatch {
                                field: spec.name().to_string(),
                                expected: len,
                                actual: value.len(),
                            });
                        }
                    }
                    buf.extend_from_slice(value);
                }
                None => match (spec.default(), spec.len()) {
                    (Some(default), _) => buf.extend_from_slice(default),
                    (None, FieldLen::Remainder) => {}
                    (None, FieldLen::Fixed(_)) => {
                        return Err(ProtocolError::MissingRequiredField {
                            command: command.to_string(),
                            field: spec.name().to_string(),
                        });
                    }
                },
            }
        }

        Ok(buf)
    }

    /// Parse payload bytes into a named-field record.
    ///
    /// The first byte selects the response schema. Fixed-length fields are
    /// consumed left-to-right; a trailing remainder field receives whatever
    /// is left (possibly nothing).
    pub fn decode(&self, raw: &[u8]) -> Result<FrameRecord, ProtocolError> {
        if raw.is_empty() {
            return Err(ProtocolError::EmptyFrame);
        }

        let schema = self.registry.lookup_response(raw[0])?;

        let mut fields = HashMap::with_capacity(schema.fields().len());
        let mut rest = &raw[1..];
        for spec in schema.fields() {
            match spec.len() {
                FieldLen::Fixed(len) => {
                    if rest.len() < len {
                        return Err(ProtocolError::TruncatedFrame {
                            field: spec.name().to_string(),
                            needed: len,
                            remaining: rest.len(),
                        });
                    }
                    let (value, tail) = rest.split_at(len);
                    fields.insert(spec.name(), value.to_vec());
                    rest = tail;
                }
                FieldLen::Remainder => {
                    fields.insert(spec.name(), rest.to_vec());
                    rest = &[];
                }
            }
        }

        if !rest.is_empty() {
            match self.trailing {
                TrailingPolicy::Reject => {
                    return Err(ProtocolError::TrailingBytes {
                        response: schema.name().to_string(),
                        extra: rest.len(),
                    });
                }
                TrailingPolicy::Allow => {
                    warn!(
                        "dropping {} trailing bytes after \"{}\" frame: {}",
                        rest.len(),
                        schema.name(),
                        hex::encode(rest)
                    );
                }
            }
        }

        Ok(FrameRecord {
            name: schema.name(),
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::digimesh_registry;

    fn fields(entries: &[(&'static str, &[u8])]) -> HashMap<&'static str, Vec<u8>> {
        entries.iter().map(|(name, value)| (*name, value.to_vec())).collect()
    }

    #[test]
    fn encode_at_command() {
        let registry = digimesh_registry().unwrap();
        let codec = FrameCodec::new(&registry);

        let payload = codec
            .encode("at", &fields(&[("command", b"NI")]))
            .unwrap();
        assert_eq!(payload, b"\x08\x00NI");
    }

    #[test]
    fn encode_at_with_parameter_and_frame_id() {
        let registry = digimesh_registry().unwrap();
        let codec = FrameCodec::new(&registry);

        let payload = codec
            .encode(
                "at",
                &fields(&[("frame_id", b"\x01"), ("command", b"DL"), ("parameter", b"\x00\x00\xFF\xFF")]),
            )
            .unwrap();
        assert_eq!(payload, b"\x08\x01DL\x00\x00\xFF\xFF");
    }

    #[test]
    fn encode_tx_uses_defaults() {
        let registry = digimesh_registry().unwrap();
        let codec = FrameCodec::new(&registry);

        let payload = codec
            .encode(
                "tx",
                &fields(&[("dest_addr", b"\x00\x13\xA2\x00\x40\x0A\x01\x27"), ("data", b"hello")]),
            )
            .unwrap();
        assert_eq!(
            payload,
            b"\x10\x00\x00\x13\xA2\x00\x40\x0A\x01\x27\xFF\xFE\x00\x00hello"
        );
    }

    #[test]
    fn encode_missing_required_field_names_first() {
        let registry = digimesh_registry().unwrap();
        let codec = FrameCodec::new(&registry);

        assert_eq!(
            codec.encode("at", &HashMap::new()),
            Err(ProtocolError::MissingRequiredField {
                command: "at".to_string(),
                field: "command".to_string(),
            })
        );
        // remote_at is missing both dest_addr_long and command; the first
        // in schema order is reported.
        assert_eq!(
            codec.encode("remote_at", &HashMap::new()),
            Err(ProtocolError::MissingRequiredField {
                command: "remote_at".to_string(),
                field: "dest_addr_long".to_string(),
            })
        );
    }

    #[test]
    fn encode_rejects_wrong_length_value() {
        let registry = digimesh_registry().unwrap();
        let codec = FrameCodec::new(&registry);

        assert_eq!(
            codec.encode("at", &fields(&[("command", b"NID")])),
            Err(ProtocolError::FieldLengthMismatch {
                field: "command".to_string(),
                expected: 2,
                actual: 3,
            })
        );
    }

    #[test]
    fn encode_unknown_command() {
        let registry = digimesh_registry().unwrap();
        let codec = FrameCodec::new(&registry);

        assert_eq!(
            codec.encode("bogus", &HashMap::new()),
            Err(ProtocolError::UnknownCommand("bogus".to_string()))
        );
    }

    #[test]
    fn decode_status() {
        let registry = digimesh_registry().unwrap();
        let codec = FrameCodec::new(&registry);

        let record = codec.decode(&[0x8A, 0x00]).unwrap();
        assert_eq!(record.name(), "status");
        assert_eq!(record.field("status"), Some(&b"\x00"[..]));
    }

    #[test]
    fn decode_at_response_with_empty_parameter() {
        let registry = digimesh_registry().unwrap();
        let codec = FrameCodec::new(&registry);

        let record = codec.decode(b"\x88\x01NI\x00").unwrap();
        assert_eq!(record.name(), "at_response");
        assert_eq!(record.field("frame_id"), Some(&b"\x01"[..]));
        assert_eq!(record.field("command"), Some(&b"NI"[..]));
        assert_eq!(record.field("status"), Some(&b"\x00"[..]));
        assert_eq!(record.field("parameter"), Some(&b""[..]));
    }

    #[test]
    fn decode_empty_frame() {
        let registry = digimesh_registry().unwrap();
        let codec = FrameCodec::new(&registry);

        assert_eq!(codec.decode(b""), Err(ProtocolError::EmptyFrame));
    }

    #[test]
    fn decode_unknown_identifier() {
        let registry = digimesh_registry().unwrap();
        let codec = FrameCodec::new(&registry);

        assert_eq!(
            codec.decode(&[0xFF, 0x00]),
            Err(ProtocolError::UnknownResponseType(0xFF))
        );
    }

    #[test]
    fn decode_truncated_frame() {
        let registry = digimesh_registry().unwrap();
        let codec = FrameCodec::new(&registry);

        // at_response needs frame_id(1) + command(2); only one byte follows
        // the identifier, so `command` cannot be filled.
        assert_eq!(
            codec.decode(&[0x88, 0x01]),
            Err(ProtocolError::TruncatedFrame {
                field: "command".to_string(),
                needed: 2,
                remaining: 0,
            })
        );
    }

    #[test]
    fn decode_trailing_bytes_rejected_by_default() {
        let registry = digimesh_registry().unwrap();
        let codec = FrameCodec::new(&registry);

        // status is one fixed byte; two extra bytes follow.
        assert_eq!(
            codec.decode(&[0x8A, 0x00, 0xDE, 0xAD]),
            Err(ProtocolError::TrailingBytes {
                response: "status".to_string(),
                extra: 2,
            })
        );
    }

    #[test]
    fn decode_trailing_bytes_dropped_when_allowed() {
        let registry = digimesh_registry().unwrap();
        let codec = FrameCodec::with_trailing_policy(&registry, TrailingPolicy::Allow);

        let record = codec.decode(&[0x8A, 0x00, 0xDE, 0xAD]).unwrap();
        assert_eq!(record.name(), "status");
        assert_eq!(record.field("status"), Some(&b"\x00"[..]));
    }

    #[test]
    fn decode_transmit_status() {
        let registry = digimesh_registry().unwrap();
        let codec = FrameCodec::new(&registry);

        let record = codec
            .decode(&[0x8B, 0x47, 0xFF, 0xFE, 0x00, 0x00, 0x02])
            .unwrap();
        assert_eq!(record.name(), "transmit_status");
        assert_eq!(record.field("frame_id"), Some(&[0x47][..]));
        assert_eq!(record.field("reserved"), Some(&[0xFF, 0xFE][..]));
        assert_eq!(record.field("transmit_retry"), Some(&[0x00][..]));
        assert_eq!(record.field("delivery_status"), Some(&[0x00][..]));
        assert_eq!(record.field("discovery_status"), Some(&[0x02][..]));
    }
}
