//! Consistency checks run once when a registry is built.

use std::collections::HashSet;

use crate::model::{Cardinality, EntityDescriptor, EntityKind, RelationshipDescriptor};

use super::{SchemaError, SchemaRegistry, SchemaResult};

/// Validate every entity in the registry, stopping at the first problem.
pub(super) fn validate(registry: &SchemaRegistry) -> SchemaResult<()> {
    for entity in registry.entities() {
        validate_attributes_unique(entity)?;

        if let EntityKind::Edge { out_key, in_key } = &entity.kind {
            validate_edge(entity, out_key, in_key)?;
        }

        for (attr, rel) in entity.relationships() {
            let Some(target) = registry.entity(&rel.target) else {
                return Err(SchemaError::UnknownTarget {
                    entity: entity.identity.clone(),
                    attribute: attr.name.clone(),
                    target: rel.target.clone(),
                });
            };

            match &rel.through {
                Some(junction) => validate_through(registry, entity, &attr.name, rel, junction)?,
                None if rel.cardinality == Cardinality::Many => {
                    let Some(via) = &rel.via else {
                        return Err(invalid_relationship(
                            entity,
                            &attr.name,
                            "collection requires 'via'",
                        ));
                    };
                    if target.attribute(via).is_none() {
                        return Err(invalid_relationship(
                            entity,
                            &attr.name,
                            &format!("'{}' has no attribute '{}'", target.identity, via),
                        ));
                    }
                }
                None => {}
            }
        }
    }
    Ok(())
}

fn validate_attributes_unique(entity: &EntityDescriptor) -> SchemaResult<()> {
    let mut seen = HashSet::new();
    for attr in &entity.attributes {
        if !seen.insert(attr.name.as_str()) {
            return Err(SchemaError::DuplicateAttribute {
                entity: entity.identity.clone(),
                attribute: attr.name.clone(),
            });
        }
    }
    Ok(())
}

fn validate_edge(entity: &EntityDescriptor, out_key: &str, in_key: &str) -> SchemaResult<()> {
    let invalid = |reason: String| SchemaError::InvalidEdge {
        entity: entity.identity.clone(),
        reason,
    };

    if out_key == in_key {
        return Err(invalid(format!("'{}' used for both endpoints", out_key)));
    }

    for key in [out_key, in_key] {
        let rel = entity
            .attribute(key)
            .and_then(|attr| attr.as_relationship())
            .ok_or_else(|| invalid(format!("endpoint '{}' is not a relationship", key)))?;
        if rel.cardinality != Cardinality::One || rel.is_through() {
            return Err(invalid(format!(
                "endpoint '{}' must be a singular direct reference",
                key
            )));
        }
    }
    Ok(())
}

fn validate_through(
    registry: &SchemaRegistry,
    entity: &EntityDescriptor,
    attribute: &str,
    rel: &RelationshipDescriptor,
    junction: &str,
) -> SchemaResult<()> {
    let invalid = |reason: String| SchemaError::InvalidJunction {
        entity: entity.identity.clone(),
        attribute: attribute.to_string(),
        junction: junction.to_string(),
        reason,
    };

    let junction_entity = registry
        .entity(junction)
        .ok_or_else(|| invalid("junction is not registered".into()))?;
    if !junction_entity.is_edge() {
        return Err(invalid("junction is not an edge entity".into()));
    }

    let via = rel
        .via
        .as_deref()
        .ok_or_else(|| invalid("through association requires 'via'".into()))?;
    let side = junction_entity
        .kind
        .side_of(via)
        .ok_or_else(|| invalid(format!("'{}' is not an endpoint of the junction", via)))?;

    let back_reference = junction_entity
        .attribute(via)
        .and_then(|attr| attr.as_relationship());
    if back_reference.map(|r| r.target.as_str()) != Some(entity.identity.as_str()) {
        return Err(invalid(format!(
            "'{}' does not reference '{}'",
            via, entity.identity
        )));
    }

    let far_reference = junction_entity
        .kind
        .endpoint(side.opposite())
        .and_then(|key| junction_entity.attribute(key))
        .and_then(|attr| attr.as_relationship());
    if far_reference.map(|r| r.target.as_str()) != Some(rel.target.as_str()) {
        return Err(invalid(format!(
            "far endpoint does not reference '{}'",
            rel.target
        )));
    }
    Ok(())
}

fn invalid_relationship(entity: &EntityDescriptor, attribute: &str, reason: &str) -> SchemaError {
    SchemaError::InvalidRelationship {
        entity: entity.identity.clone(),
        attribute: attribute.to_string(),
        reason: reason.to_string(),
    }
}
