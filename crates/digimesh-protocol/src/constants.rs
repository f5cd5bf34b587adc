//! Protocol constants
//!
//! Identifier bytes and field sizes for the DigiMesh API frame set. The
//! identifier space is a single byte: outgoing command frames carry their
//! identifier as the defaulted `id` field, incoming frames are dispatched
//! by their leading byte.

// ============================================================================
// Command identifiers (outgoing, defaulted into the `id` field)
// ============================================================================

/// AT command, applied immediately.
pub const API_ID_AT: u8 = 0x08;
/// AT command, queued until an apply-changes command.
pub const API_ID_QUEUED_AT: u8 = 0x09;
/// Transmit request.
pub const API_ID_TX: u8 = 0x10;
/// AT command addressed to a remote node.
pub const API_ID_REMOTE_AT: u8 = 0x17;

// ============================================================================
// Frame type identifiers (incoming, first byte of the payload)
// ============================================================================

/// Response to a local AT command.
pub const FRAME_TYPE_AT_RESPONSE: u8 = 0x88;
/// Modem status.
pub const FRAME_TYPE_STATUS: u8 = 0x8A;
/// Delivery report for a transmit request.
pub const FRAME_TYPE_TRANSMIT_STATUS: u8 = 0x8B;
/// Received data frame with 64-bit source address.
pub const FRAME_TYPE_RX_LONG_ADDR: u8 = 0x90;
/// Node identification indicator.
pub const FRAME_TYPE_NODE_ID: u8 = 0x95;
/// Response to a remote AT command.
pub const FRAME_TYPE_REMOTE_AT_RESPONSE: u8 = 0x97;

// ============================================================================
// Field sizes and shared defaults
// ============================================================================

/// Size of a 64-bit module address in bytes.
pub const ADDR_LONG_SIZE: usize = 8;
/// Size of a 16-bit network address in bytes.
pub const ADDR_NET_SIZE: usize = 2;
/// Size of a two-letter AT command name.
pub const AT_COMMAND_SIZE: usize = 2;
/// Reserved address field value carried by several frame layouts.
pub const RESERVED_ADDR: [u8; 2] = [0xFF, 0xFE];
