use std::collections::HashMap;

use crate::model::{AttributeDescriptor, EntityDescriptor};

use super::{validation, SchemaError, SchemaResult};

/// Immutable collection of entity descriptors, indexed by identity.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entities: Vec<EntityDescriptor>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Register the given entities and validate every relationship between them.
    pub fn new(entities: Vec<EntityDescriptor>) -> SchemaResult<Self> {
        let mut index = HashMap::with_capacity(entities.len());
        for (position, entity) in entities.iter().enumerate() {
            if index.insert(entity.identity.clone(), position).is_some() {
                return Err(SchemaError::DuplicateEntity(entity.identity.clone()));
            }
        }

        let registry = Self { entities, index };
        validation::validate(&registry)?;

        tracing::debug!(
            entities = registry.entities.len(),
            "schema registry initialized"
        );
        Ok(registry)
    }

    /// Look up an entity by identity.
    pub fn entity(&self, identity: &str) -> Option<&EntityDescriptor> {
        self.index.get(identity).map(|&i| &self.entities[i])
    }

    /// Look up an attribute on an entity.
    pub fn attribute(&self, entity: &str, attribute: &str) -> Option<&AttributeDescriptor> {
        self.entity(entity)?.attribute(attribute)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.index.contains_key(identity)
    }

    /// Entities in registration order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
