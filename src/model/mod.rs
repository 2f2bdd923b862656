//! Schema model types: entities, attributes, relationships and record ids.

pub mod entity;
pub mod record_id;

pub use entity::{
    AttributeDescriptor, AttributeKind, Cardinality, Direction, EntityDescriptor, EntityKind,
    RelationshipDescriptor, RelationshipKind, ScalarType,
};
pub use record_id::{RecordId, RecordIdError};
