//! TOML schema declarations.
//!
//! Entities and attributes are declared as arrays of tables so declaration
//! order survives deserialization:
//!
//! ```toml
//! [[entity]]
//! identity = "comment"
//!
//! [[entity.attribute]]
//! name = "body"
//! type = "string"
//!
//! [[entity.attribute]]
//! name = "author"
//! collection = "profile"
//! through = "authored_comment"
//! via = "commentRef"
//!
//! [[entity]]
//! identity = "authored_comment"
//! edge = { out = "profileRef", in = "commentRef" }
//!
//! [[entity.attribute]]
//! name = "commentRef"
//! model = "comment"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::model::{AttributeDescriptor, EntityDescriptor, RelationshipDescriptor, ScalarType};

use super::{SchemaError, SchemaRegistry, SchemaResult};

/// Root of a schema document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SchemaDocument {
    #[serde(default, rename = "entity")]
    pub entities: Vec<EntityDeclaration>,
}

/// One `[[entity]]` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntityDeclaration {
    pub identity: String,

    /// Storage table; defaults to the identity
    #[serde(default)]
    pub table: Option<String>,

    #[serde(default)]
    pub primary_key: Option<String>,

    /// Present for edge entities
    #[serde(default)]
    pub edge: Option<EdgeDeclaration>,

    #[serde(default, rename = "attribute")]
    pub attributes: Vec<AttributeDeclaration>,
}

/// Endpoint attributes of an edge entity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EdgeDeclaration {
    pub out: String,
    #[serde(rename = "in")]
    pub in_: String,
}

/// One `[[entity.attribute]]` table.
///
/// Exactly one of `type`, `model` or `collection` must be set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AttributeDeclaration {
    pub name: String,

    #[serde(default)]
    pub column: Option<String>,

    #[serde(default, rename = "type")]
    pub scalar: Option<ScalarType>,

    /// Singular relationship target
    #[serde(default)]
    pub model: Option<String>,

    /// Plural relationship target
    #[serde(default)]
    pub collection: Option<String>,

    #[serde(default)]
    pub through: Option<String>,

    #[serde(default)]
    pub via: Option<String>,

    #[serde(default)]
    pub foreign_key: Option<String>,

    #[serde(default)]
    pub local_key: Option<String>,
}

impl SchemaDocument {
    /// Parse a TOML schema document.
    pub fn from_toml_str(content: &str) -> SchemaResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Convert declarations into descriptors, preserving order.
    pub fn into_entities(self) -> SchemaResult<Vec<EntityDescriptor>> {
        self.entities
            .into_iter()
            .map(EntityDeclaration::into_descriptor)
            .collect()
    }
}

impl EntityDeclaration {
    fn into_descriptor(self) -> SchemaResult<EntityDescriptor> {
        let mut entity = match self.edge {
            Some(edge) => EntityDescriptor::edge(&self.identity, edge.out, edge.in_),
            None => EntityDescriptor::vertex(&self.identity),
        };
        if let Some(table) = self.table {
            entity = entity.with_table(table);
        }
        if let Some(key) = self.primary_key {
            entity = entity.with_primary_key(key);
        }

        for decl in self.attributes {
            let attribute = decl.into_descriptor(&self.identity)?;
            entity = entity.with_attribute(attribute);
        }
        Ok(entity)
    }
}

impl AttributeDeclaration {
    fn into_descriptor(self, entity: &str) -> SchemaResult<AttributeDescriptor> {
        let invalid = |reason: &str| SchemaError::InvalidDeclaration {
            entity: entity.to_string(),
            attribute: self.name.clone(),
            reason: reason.to_string(),
        };

        let attribute = match (self.scalar, &self.model, &self.collection) {
            (Some(scalar), None, None) => {
                if self.through.is_some() || self.via.is_some() {
                    return Err(invalid("scalar attributes cannot declare 'through' or 'via'"));
                }
                AttributeDescriptor::scalar(&self.name, scalar)
            }
            (None, Some(target), None) => {
                if self.through.is_some() {
                    return Err(invalid("'through' requires a collection"));
                }
                AttributeDescriptor::relationship(
                    &self.name,
                    self.relationship(RelationshipDescriptor::one(target)),
                )
            }
            (None, None, Some(target)) => AttributeDescriptor::relationship(
                &self.name,
                self.relationship(RelationshipDescriptor::many(target)),
            ),
            _ => return Err(invalid("declare exactly one of 'type', 'model' or 'collection'")),
        };

        Ok(match &self.column {
            Some(column) => attribute.with_column(column),
            None => attribute,
        })
    }

    fn relationship(&self, mut rel: RelationshipDescriptor) -> RelationshipDescriptor {
        rel.through = self.through.clone();
        rel.via = self.via.clone();
        rel.foreign_key = self.foreign_key.clone();
        rel.local_key = self.local_key.clone();
        rel
    }
}

impl SchemaRegistry {
    /// Build a registry from a TOML schema document.
    pub fn from_toml_str(content: &str) -> SchemaResult<Self> {
        Self::new(SchemaDocument::from_toml_str(content)?.into_entities()?)
    }

    /// Build a registry from a TOML schema file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SchemaResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SchemaError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
