//! DigiMesh schema-driven frame protocol
//!
//! This crate describes every frame of a DigiMesh-style command/response
//! protocol as data, and provides the generic codec that walks those
//! descriptions. A frame layout is an ordered list of named fields, each
//! with a fixed byte length or a "remainder of the frame" marker and an
//! optional default; the [`SchemaRegistry`] maps command names and frame
//! type identifier bytes to their layouts.
//!
//! # Protocol Overview
//!
//! - **Commands** (host → radio): selected by symbolic name (`"at"`,
//!   `"queued_at"`, `"remote_at"`, `"tx"`); the 1-byte identifier travels
//!   as the schema's defaulted `id` field.
//! - **Responses** (radio → host): dispatched by the first payload byte
//!   (`0x88` at_response, `0x8A` status, `0x8B` transmit_status, `0x90`
//!   rx_long_addr, `0x95` node_id, `0x97` remote_at_response).
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use digimesh_protocol::{digimesh_registry, FrameCodec};
//!
//! let registry = digimesh_registry().expect("stock tables are consistent");
//! let codec = FrameCodec::new(&registry);
//!
//! // Ask the module for its node identifier.
//! let mut fields = HashMap::new();
//! fields.insert("command", b"NI".to_vec());
//! let payload = codec.encode("at", &fields).unwrap();
//! assert_eq!(payload, b"\x08\x00NI");
//!
//! // Parse a modem status frame.
//! let record = codec.decode(&[0x8A, 0x00]).unwrap();
//! assert_eq!(record.name(), "status");
//! ```
//!
//! The registry is constructed once at startup and shared by reference;
//! lookups and codec calls are lock-free and thread-safe. Wire framing
//! (start delimiter, length, checksum, escaping) lives in the companion
//! `digimesh-radio` crate.

mod codec;
mod constants;
mod error;
mod registry;
mod schema;
mod tables;

pub use codec::*;
pub use constants::*;
pub use error::*;
pub use registry::*;
pub use schema::*;
pub use tables::*;
