//! The DigiMesh schema tables.
//!
//! This module is the single source of truth for every frame layout the
//! codec honors: field order, field lengths, and default bytes. Adding a
//! frame type to the protocol means adding one entry here, not new
//! control-flow code.
//!
//! Command layout summary:
//!
//! | Command     | Fields                                                              |
//! |-------------|---------------------------------------------------------------------|
//! | `at`        | id(1)=08, frame_id(1)=00, command(2), parameter(rest)               |
//! | `queued_at` | id(1)=09, frame_id(1)=00, command(2), parameter(rest)               |
//! | `remote_at` | id(1)=17, frame_id(1)=00, dest_addr_long(8), reserved(2)=FFFE,      |
//! |             | options(1)=02, command(2), parameter(rest)                          |
//! | `tx`        | id(1)=10, frame_id(1)=00, dest_addr(8), reserved(2)=FFFE,           |
//! |             | broadcast_radius(1)=00, options(1)=00, data(rest)                   |

use crate::constants::*;
use crate::error::SchemaConflict;
use crate::registry::SchemaRegistry;
use crate::schema::{CommandSchema, FieldSpec, ResponseSchema};

/// Build the stock DigiMesh registry.
///
/// The tables are rebuilt from these literals on every call; there is no
/// process-global instance. Construct once at startup, then share by
/// reference.
pub fn digimesh_registry() -> Result<SchemaRegistry, SchemaConflict> {
    let mut registry = SchemaRegistry::new();
    register_commands(&mut registry)?;
    register_responses(&mut registry)?;
    Ok(registry)
}

fn register_commands(registry: &mut SchemaRegistry) -> Result<(), SchemaConflict> {
    registry.register_command(CommandSchema::new(
        "at",
        vec![
            FieldSpec::with_default("id", 1, &[API_ID_AT]),
            FieldSpec::with_default("frame_id", 1, &[0x00]),
            FieldSpec::fixed("command", AT_COMMAND_SIZE),
            FieldSpec::remainder("parameter"),
        ],
    ))?;

    registry.register_command(CommandSchema::new(
        "queued_at",
        vec![
            FieldSpec::with_default("id", 1, &[API_ID_QUEUED_AT]),
            FieldSpec::with_default("frame_id", 1, &[0x00]),
            FieldSpec::fixed("command", AT_COMMAND_SIZE),
            FieldSpec::remainder("parameter"),
        ],
    ))?;

    registry.register_command(CommandSchema::new(
        "remote_at",
        vec![
            FieldSpec::with_default("id", 1, &[API_ID_REMOTE_AT]),
            FieldSpec::with_default("frame_id", 1, &[0x00]),
            FieldSpec::fixed("dest_addr_long", ADDR_LONG_SIZE),
            FieldSpec::with_default("reserved", ADDR_NET_SIZE, &RESERVED_ADDR),
            // 0x02: apply changes on the remote node immediately.
            FieldSpec::with_default("options", 1, &[0x02]),
            FieldSpec::fixed("command", AT_COMMAND_SIZE),
            FieldSpec::remainder("parameter"),
        ],
    ))?;

    registry.register_command(CommandSchema::new(
        "tx",
        vec![
            FieldSpec::with_default("id", 1, &[API_ID_TX]),
            FieldSpec::with_default("frame_id", 1, &[0x00]),
            FieldSpec::fixed("dest_addr", ADDR_LONG_SIZE),
            FieldSpec::with_default("reserved", ADDR_NET_SIZE, &RESERVED_ADDR),
            FieldSpec::with_default("broadcast_radius", 1, &[0x00]),
            FieldSpec::with_default("options", 1, &[0x00]),
            FieldSpec::remainder("data"),
        ],
    ))?;

    Ok(())
}

fn register_responses(registry: &mut SchemaRegistry) -> Result<(), SchemaConflict> {
    registry.register_response(ResponseSchema::new(
        FRAME_TYPE_AT_RESPONSE,
        "at_response",
        vec![
            FieldSpec::fixed("frame_id", 1),
            FieldSpec::fixed("command", AT_COMMAND_SIZE),
            FieldSpec::fixed("status", 1),
            FieldSpec::remainder("parameter"),
        ],
    ))?;

    registry.register_response(ResponseSchema::new(
        FRAME_TYPE_STATUS,
        "status",
        vec![FieldSpec::fixed("status", 1)],
    ))?;

    registry.register_response(ResponseSchema::new(
        FRAME_TYPE_TRANSMIT_STATUS,
        "transmit_status",
        vec![
            FieldSpec::fixed("frame_id", 1),
            FieldSpec::fixed("reserved", ADDR_NET_SIZE),
            FieldSpec::fixed("transmit_retry", 1),
            FieldSpec::fixed("delivery_status", 1),
            FieldSpec::fixed("discovery_status", 1),
        ],
    ))?;

    registry.register_response(ResponseSchema::new(
        FRAME_TYPE_RX_LONG_ADDR,
        "rx_long_addr",
        vec![
            FieldSpec::fixed("frame_id", 1),
            FieldSpec::fixed("source_addr", ADDR_LONG_SIZE),
            FieldSpec::fixed("reserved", ADDR_NET_SIZE),
            FieldSpec::fixed("options", 1),
            FieldSpec::remainder("data"),
        ],
    ))?;

    registry.register_response(ResponseSchema::new(
        FRAME_TYPE_NODE_ID,
        "node_id",
        vec![
            FieldSpec::fixed("frame_id", 1),
            FieldSpec::fixed("source_addr_long", ADDR_LONG_SIZE),
            FieldSpec::fixed("network_addr", ADDR_NET_SIZE),
            FieldSpec::fixed("options", 1),
            FieldSpec::fixed("source_addr", ADDR_NET_SIZE),
            FieldSpec::fixed("network_addr_long", ADDR_LONG_SIZE),
            FieldSpec::fixed("node_identifier", 2),
            FieldSpec::fixed("parent", 1),
        ],
    ))?;

    registry.register_response(ResponseSchema::new(
        FRAME_TYPE_REMOTE_AT_RESPONSE,
        "remote_at_response",
        vec![
            FieldSpec::fixed("frame_id", 1),
            FieldSpec::fixed("source_addr", ADDR_LONG_SIZE),
            FieldSpec::fixed("reserved", ADDR_NET_SIZE),
            FieldSpec::fixed("command", AT_COMMAND_SIZE),
            FieldSpec::fixed("status", 1),
            FieldSpec::remainder("parameter"),
        ],
    ))?;

    Ok(())
}
