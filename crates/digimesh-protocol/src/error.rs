//! Protocol error types.

use thiserror::Error;

/// Errors raised while building a schema registry.
///
/// These are construction-time failures: a registry that reports a conflict
/// must not be published to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaConflict {
    /// A command schema was registered under an already-taken name.
    #[error("command \"{0}\" is already registered")]
    DuplicateCommand(String),

    /// A response schema was registered under an already-taken identifier.
    #[error("response identifier 0x{0:02X} is already registered")]
    DuplicateResponseId(u8),

    /// A schema declares the same field name twice.
    #[error("schema \"{schema}\" declares field \"{field}\" more than once")]
    DuplicateFieldName {
        /// Schema being registered.
        schema: String,
        /// Offending field name.
        field: String,
    },

    /// A remainder field is not the last field, or a schema declares more
    /// than one remainder field.
    #[error("schema \"{schema}\": remainder field \"{field}\" must be the single last field")]
    MisplacedRemainder {
        /// Schema being registered.
        schema: String,
        /// Offending field name.
        field: String,
    },

    /// A default value does not match its field's declared length.
    #[error(
        "schema \"{schema}\": default for \"{field}\" is {actual} bytes, declared length is {expected}"
    )]
    DefaultLengthMismatch {
        /// Schema being registered.
        schema: String,
        /// Offending field name.
        field: String,
        /// Declared field length.
        expected: usize,
        /// Length of the supplied default.
        actual: usize,
    },
}

/// Errors raised by encode/decode calls.
///
/// All variants are per-call and recoverable: a failed call leaves the
/// registry and any concurrent calls untouched, and never produces partial
/// output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The command name is not in the registry.
    #[error("unknown command \"{0}\"")]
    UnknownCommand(String),

    /// The leading identifier byte matches no registered response schema.
    #[error("unknown response type: 0x{0:02X}")]
    UnknownResponseType(u8),

    /// A mandatory field (fixed length, no default) was not supplied.
    #[error("command \"{command}\": required field \"{field}\" was not provided")]
    MissingRequiredField {
        /// Command being encoded.
        command: String,
        /// First missing mandatory field, in schema order.
        field: String,
    },

    /// A supplied value does not match the field's declared length.
    #[error("field \"{field}\" expects {expected} bytes, got {actual}")]
    FieldLengthMismatch {
        /// Offending field name.
        field: String,
        /// Declared field length.
        expected: usize,
        /// Length of the supplied value.
        actual: usize,
    },

    /// Zero-length frame.
    #[error("empty frame")]
    EmptyFrame,

    /// The frame ended before a fixed-length field was satisfied.
    #[error("truncated frame: field \"{field}\" needs {needed} bytes, {remaining} remain")]
    TruncatedFrame {
        /// Field that could not be filled.
        field: String,
        /// Bytes the field requires.
        needed: usize,
        /// Bytes left in the frame.
        remaining: usize,
    },

    /// Bytes remained after all fields of a schema with no remainder field.
    #[error("{extra} trailing bytes after the last field of \"{response}\"")]
    TrailingBytes {
        /// Response schema that was decoded.
        response: String,
        /// Number of unconsumed bytes.
        extra: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = ProtocolError::TruncatedFrame {
            field: "command".to_string(),
            needed: 2,
            remaining: 1,
        };
        assert_eq!(
            err.to_string(),
            "truncated frame: field \"command\" needs 2 bytes, 1 remain"
        );

        let err = SchemaConflict::DuplicateResponseId(0x8B);
        assert_eq!(err.to_string(), "response identifier 0x8B is already registered");
    }
}
