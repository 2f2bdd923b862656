//! Schema registry - read-only lookup of entity and relationship declarations.
//!
//! The registry is built once from static declarations (builder API or a TOML
//! schema document), validated, and then only read. Nothing downstream clones
//! and patches it; the planner computes the effective relationship kind from
//! the descriptor fields on every request.

mod loader;
mod registry;
mod validation;

use std::path::PathBuf;

use thiserror::Error;

pub use loader::{AttributeDeclaration, EdgeDeclaration, EntityDeclaration, SchemaDocument};
pub use registry::SchemaRegistry;

/// Errors raised while building or loading a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Duplicate entity: '{0}'")]
    DuplicateEntity(String),

    #[error("Duplicate attribute '{attribute}' on entity '{entity}'")]
    DuplicateAttribute { entity: String, attribute: String },

    #[error("Attribute '{entity}.{attribute}' references unknown entity '{target}'")]
    UnknownTarget {
        entity: String,
        attribute: String,
        target: String,
    },

    #[error("Invalid junction '{junction}' for '{entity}.{attribute}': {reason}")]
    InvalidJunction {
        entity: String,
        attribute: String,
        junction: String,
        reason: String,
    },

    #[error("Invalid relationship '{entity}.{attribute}': {reason}")]
    InvalidRelationship {
        entity: String,
        attribute: String,
        reason: String,
    },

    #[error("Invalid edge entity '{entity}': {reason}")]
    InvalidEdge { entity: String, reason: String },

    #[error("Invalid declaration for '{entity}.{attribute}': {reason}")]
    InvalidDeclaration {
        entity: String,
        attribute: String,
        reason: String,
    },

    #[error("Schema file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read schema file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse schema declarations: {0}")]
    ParseError(#[from] toml::de::Error),
}

pub type SchemaResult<T> = Result<T, SchemaError>;
