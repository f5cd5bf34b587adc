//! DigiMesh wire framing and radio adapter
//!
//! This crate carries the transport-facing half of the protocol: the wire
//! framing that wraps every schema-encoded payload (start delimiter,
//! big-endian length, checksum, optional escaped operating mode) and a
//! [`RadioAdapter`] that composes the framing with the schema codec from
//! `digimesh-protocol`.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use digimesh_protocol::digimesh_registry;
//! use digimesh_radio::RadioAdapter;
//!
//! let registry = digimesh_registry().expect("stock tables are consistent");
//! let mut adapter = RadioAdapter::new(&registry);
//!
//! // Bytes for the serial port.
//! let mut fields = HashMap::new();
//! fields.insert("command", b"NI".to_vec());
//! let wire = adapter.encode_command("at", &fields).unwrap();
//! assert_eq!(wire[0], 0x7E);
//!
//! // Bytes from the serial port, in whatever chunks they arrive.
//! adapter.feed(&[0x7E, 0x00, 0x02]);
//! adapter.feed(&[0x8A, 0x00, 0x75]);
//! let record = adapter.try_next().unwrap().expect("one complete frame");
//! assert_eq!(record.name(), "status");
//! ```
//!
//! Serial port I/O itself is out of scope: the adapter transforms bytes,
//! the caller moves them.

mod adapter;
mod framing;

pub use adapter::*;
pub use framing::*;
