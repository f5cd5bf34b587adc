//! Schema registry.
//!
//! The registry maps symbolic command names to outgoing-frame schemas and
//! one-byte frame type identifiers to incoming-frame schemas. It is built
//! once at startup and read-only afterwards: registration is the only
//! mutating operation, and a registry that reported a [`SchemaConflict`]
//! must be discarded rather than published. Lookups take `&self` and are
//! safe to call from any number of threads.

use std::collections::HashMap;

use crate::error::{ProtocolError, SchemaConflict};
use crate::schema::{CommandSchema, ResponseSchema};

/// Registry of command and response schemas.
///
/// Adding a message type to the protocol means registering one more table
/// entry here; the codec treats every type uniformly through the schema it
/// looks up.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    commands: HashMap<&'static str, CommandSchema>,
    responses: HashMap<u8, ResponseSchema>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        SchemaRegistry::default()
    }

    /// Register an outgoing command schema. Construction time only.
    pub fn register_command(&mut self, schema: CommandSchema) -> Result<(), SchemaConflict> {
        schema.validate()?;
        if self.commands.contains_key(schema.name()) {
            return Err(SchemaConflict::DuplicateCommand(schema.name().to_string()));
        }
        self.commands.insert(schema.name(), schema);
        Ok(())
    }

    /// Register an incoming response schema. Construction time only.
    ///
    /// Dispatch is by the identifier byte alone, so two schemas may never
    /// claim the same identifier.
    pub fn register_response(&mut self, schema: ResponseSchema) -> Result<(), SchemaConflict> {
        schema.validate()?;
        if self.responses.contains_key(&schema.id()) {
            return Err(SchemaConflict::DuplicateResponseId(schema.id()));
        }
        self.responses.insert(schema.id(), schema);
        Ok(())
    }

    /// Look up the schema for an outgoing command by name.
    pub fn lookup_command(&self, name: &str) -> Result<&CommandSchema, ProtocolError> {
        self.commands
            .get(name)
            .ok_or_else(|| ProtocolError::UnknownCommand(name.to_string()))
    }

    /// Look up the schema for an incoming frame by its identifier byte.
    pub fn lookup_response(&self, id: u8) -> Result<&ResponseSchema, ProtocolError> {
        self.responses
            .get(&id)
            .ok_or(ProtocolError::UnknownResponseType(id))
    }

    /// All registered command schemas, in no particular order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandSchema> {
        self.commands.values()
    }

    /// All registered response schemas, in no particular order.
    pub fn responses(&self) -> impl Iterator<Item = &ResponseSchema> {
        self.responses.values()
    }
}
