//! Schema data model.
//!
//! A schema is an ordered list of named fields. Each field either has a
//! fixed byte length or consumes the remainder of the frame, and may carry
//! a default value substituted when the caller omits it. Schemas are pure
//! data: the codec walks them to serialize and parse frames, so every frame
//! layout in the protocol is one table entry rather than one hand-written
//! pack/unpack function.

use crate::error::SchemaConflict;

/// Byte length of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLen {
    /// Exactly this many bytes.
    Fixed(usize),
    /// All bytes left in the frame after the preceding fixed fields.
    /// At most one per schema, and always the last field.
    Remainder,
}

impl FieldLen {
    /// The fixed byte count, if this is a fixed-length field.
    pub fn fixed(self) -> Option<usize> {
        match self {
            FieldLen::Fixed(n) => Some(n),
            FieldLen::Remainder => None,
        }
    }
}

/// One field within a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: &'static str,
    len: FieldLen,
    default: Option<Vec<u8>>,
}

impl FieldSpec {
    /// A fixed-length field with no default. Mandatory at encode time.
    pub fn fixed(name: &'static str, len: usize) -> Self {
        FieldSpec {
            name,
            len: FieldLen::Fixed(len),
            default: None,
        }
    }

    /// A fixed-length field with a default substituted when omitted.
    ///
    /// The default's length is checked against `len` when the schema is
    /// registered, not here.
    pub fn with_default(name: &'static str, len: usize, default: &[u8]) -> Self {
        FieldSpec {
            name,
            len: FieldLen::Fixed(len),
            default: Some(default.to_vec()),
        }
    }

    /// A field that consumes the remainder of the frame. Optional at encode
    /// time; contributes zero bytes when omitted.
    pub fn remainder(name: &'static str) -> Self {
        FieldSpec {
            name,
            len: FieldLen::Remainder,
            default: None,
        }
    }

    /// Field name, unique within its schema.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared length.
    pub fn len(&self) -> FieldLen {
        self.len
    }

    /// Default bytes, if any.
    pub fn default(&self) -> Option<&[u8]> {
        self.default.as_deref()
    }
}

/// Schema for an outgoing command frame, keyed by a symbolic name.
///
/// By convention the first field is `id`, a 1-byte field whose default is
/// the frame type identifier for the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSchema {
    name: &'static str,
    fields: Vec<FieldSpec>,
}

impl CommandSchema {
    /// Create a command schema. Invariants are checked at registration.
    pub fn new(name: &'static str, fields: Vec<FieldSpec>) -> Self {
        CommandSchema { name, fields }
    }

    /// Symbolic command name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fields in wire order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Check the per-schema invariants. Called by the registry; exposed for
    /// callers that build schemas outside a registry.
    pub fn validate(&self) -> Result<(), SchemaConflict> {
        validate_fields(self.name, &self.fields)
    }
}

/// Schema for an incoming response frame, keyed by its one-byte frame type
/// identifier. The identifier byte itself is consumed by dispatch and is
/// not listed as a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSchema {
    id: u8,
    name: &'static str,
    fields: Vec<FieldSpec>,
}

impl ResponseSchema {
    /// Create a response schema. Invariants are checked at registration.
    pub fn new(id: u8, name: &'static str, fields: Vec<FieldSpec>) -> Self {
        ResponseSchema { id, name, fields }
    }

    /// Frame type identifier byte.
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Symbolic response name, used by callers to discriminate decoded
    /// frames without hardcoding the identifier byte.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fields in wire order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Check the per-schema invariants.
    pub fn validate(&self) -> Result<(), SchemaConflict> {
        validate_fields(self.name, &self.fields)
    }
}

fn validate_fields(schema: &str, fields: &[FieldSpec]) -> Result<(), SchemaConflict> {
    for (i, field) in fields.iter().enumerate() {
        if fields[..i].iter().any(|f| f.name == field.name) {
            return Err(SchemaConflict::DuplicateFieldName {
                schema: schema.to_string(),
                field: field.name.to_string(),
            });
        }

        match field.len {
            FieldLen::Remainder => {
                // Anything after a remainder field would never be reached
                // by the parser.
                if i != fields.len() - 1 {
                    return Err(SchemaConflict::MisplacedRemainder {
                        schema: schema.to_string(),
                        field: field.name.to_string(),
                    });
                }
            }
            FieldLen::Fixed(len) => {
                if let Some(default) = &field.default {
                    if default.len() != len {
                        return Err(SchemaConflict::DefaultLengthMismatch {
                            schema: schema.to_string(),
                            field: field.name.to_string(),
                            expected: len,
                            actual: default.len(),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_schema_passes() {
        let schema = CommandSchema::new(
            "tx",
            vec![
                FieldSpec::with_default("id", 1, &[0x10]),
                FieldSpec::fixed("dest_addr", 8),
                FieldSpec::remainder("data"),
            ],
        );
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn duplicate_field_name_rejected() {
        let schema = CommandSchema::new(
            "bad",
            vec![FieldSpec::fixed("status", 1), FieldSpec::fixed("status", 1)],
        );
        assert_eq!(
            schema.validate(),
            Err(SchemaConflict::DuplicateFieldName {
                schema: "bad".to_string(),
                field: "status".to_string(),
            })
        );
    }

    #[test]
    fn remainder_must_be_last() {
        let schema = ResponseSchema::new(
            0x20,
            "bad",
            vec![FieldSpec::remainder("data"), FieldSpec::fixed("status", 1)],
        );
        assert_eq!(
            schema.validate(),
            Err(SchemaConflict::MisplacedRemainder {
                schema: "bad".to_string(),
                field: "data".to_string(),
            })
        );
    }

    #[test]
    fn second_remainder_rejected() {
        let schema = ResponseSchema::new(
            0x20,
            "bad",
            vec![FieldSpec::remainder("head"), FieldSpec::remainder("tail")],
        );
        // The first remainder is no longer last, so it is the one reported.
        assert_eq!(
            schema.validate(),
            Err(SchemaConflict::MisplacedRemainder {
                schema: "bad".to_string(),
                field: "head".to_string(),
            })
        );
    }

    #[test]
    fn default_length_checked() {
        let schema = CommandSchema::new(
            "bad",
            vec![FieldSpec::with_default("reserved", 2, &[0xFF])],
        );
        assert_eq!(
            schema.validate(),
            Err(SchemaConflict::DefaultLengthMismatch {
                schema: "bad".to_string(),
                field: "reserved".to_string(),
                expected: 2,
                actual: 1,
            })
        );
    }
}
