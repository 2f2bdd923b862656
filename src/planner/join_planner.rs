//! Join planning: resolves populate aliases against the schema registry.

use std::collections::HashSet;

use crate::model::{
    AttributeDescriptor, Cardinality, Direction, EntityDescriptor, RelationshipDescriptor,
    RelationshipKind,
};
use crate::planner::{JoinStep, PlanError, PlanResult, PopulateRequest, Traversal};
use crate::schema::SchemaRegistry;

pub struct JoinPlanner<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> JoinPlanner<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Build the ordered join steps for populating `requests` on `root`.
    ///
    /// Direct relationships produce one step; through associations produce
    /// two (root → junction, junction → target). A repeated alias keeps its
    /// first occurrence. Any unresolvable alias fails the whole plan.
    pub fn plan(&self, root: &str, requests: &[PopulateRequest]) -> PlanResult<Vec<JoinStep>> {
        let root_entity = self
            .registry
            .entity(root)
            .ok_or_else(|| PlanError::UnknownEntity(root.to_string()))?;

        let mut steps = Vec::with_capacity(requests.len() * 2);
        let mut seen = HashSet::new();

        for request in requests {
            if !seen.insert(request.alias.as_str()) {
                tracing::debug!(alias = %request.alias, "ignoring duplicate populate alias");
                continue;
            }

            let attr = root_entity.attribute(&request.alias).ok_or_else(|| {
                PlanError::UnknownAttribute {
                    entity: root.to_string(),
                    attribute: request.alias.clone(),
                }
            })?;
            let rel = attr
                .as_relationship()
                .ok_or_else(|| PlanError::NotARelationship {
                    entity: root.to_string(),
                    attribute: request.alias.clone(),
                })?;

            match rel.kind() {
                RelationshipKind::Direct(Cardinality::One) => {
                    steps.push(self.model_step(root_entity, attr, rel, request)?);
                }
                RelationshipKind::Direct(Cardinality::Many) => {
                    steps.push(self.collection_step(root_entity, attr, rel, request)?);
                }
                RelationshipKind::ThroughJoin { junction } => {
                    steps.extend(self.through_steps(root_entity, attr, rel, junction, request)?);
                }
            }
        }

        for step in &steps {
            tracing::debug!(
                parent = %step.parent,
                child = %step.child,
                alias = %step.alias,
                junction_table = step.junction_table,
                "planned join step"
            );
        }
        Ok(steps)
    }

    /// Singular link held on the parent, traversed outward along its column.
    fn model_step(
        &self,
        root: &EntityDescriptor,
        attr: &AttributeDescriptor,
        rel: &RelationshipDescriptor,
        request: &PopulateRequest,
    ) -> PlanResult<JoinStep> {
        let target = self.target(root, attr, rel)?;
        let link_column = attr.foreign_key_column();

        Ok(JoinStep {
            parent: root.identity.clone(),
            parent_key: link_column.to_string(),
            child: target.identity.clone(),
            child_key: target.primary_key_column().to_string(),
            alias: request.alias.clone(),
            collection: false,
            model: true,
            junction_table: false,
            remove_parent_key: true,
            criteria: request.criteria.clone(),
            traversal: Traversal::new(Direction::Out, link_column),
        })
    }

    /// Back-reference: the children point at the parent through `via`, so the
    /// hop runs inward along the children's link column.
    fn collection_step(
        &self,
        root: &EntityDescriptor,
        attr: &AttributeDescriptor,
        rel: &RelationshipDescriptor,
        request: &PopulateRequest,
    ) -> PlanResult<JoinStep> {
        let target = self.target(root, attr, rel)?;
        let via = rel
            .via
            .as_deref()
            .ok_or_else(|| invalid(root, attr, "collection requires 'via'".into()))?;
        let via_attr = target.attribute(via).ok_or_else(|| {
            invalid(
                root,
                attr,
                format!("'{}' has no attribute '{}'", target.identity, via),
            )
        })?;

        let link_column = via_attr.foreign_key_column();

        Ok(JoinStep {
            parent: root.identity.clone(),
            parent_key: local_key(root, rel),
            child: target.identity.clone(),
            child_key: link_column.to_string(),
            alias: request.alias.clone(),
            collection: true,
            model: false,
            junction_table: false,
            remove_parent_key: false,
            criteria: request.criteria.clone(),
            traversal: Traversal::new(Direction::In, link_column),
        })
    }

    /// Many-to-many through a junction edge: root → junction → target.
    fn through_steps(
        &self,
        root: &EntityDescriptor,
        attr: &AttributeDescriptor,
        rel: &RelationshipDescriptor,
        junction: &str,
        request: &PopulateRequest,
    ) -> PlanResult<[JoinStep; 2]> {
        let target = self.target(root, attr, rel)?;
        let junction_entity = self
            .registry
            .entity(junction)
            .ok_or_else(|| invalid(root, attr, format!("junction '{}' is not registered", junction)))?;

        let via = rel
            .via
            .as_deref()
            .ok_or_else(|| invalid(root, attr, "through association requires 'via'".into()))?;
        let side = junction_entity.kind.side_of(via).ok_or_else(|| {
            invalid(
                root,
                attr,
                format!("'{}' is not an endpoint of '{}'", via, junction),
            )
        })?;
        let via_attr = junction_entity
            .attribute(via)
            .ok_or_else(|| invalid(root, attr, format!("'{}' has no attribute '{}'", junction, via)))?;
        let far_attr = junction_entity
            .kind
            .endpoint(side.opposite())
            .and_then(|key| junction_entity.attribute(key))
            .ok_or_else(|| invalid(root, attr, format!("'{}' has no far endpoint", junction)))?;

        let to_junction = JoinStep {
            parent: root.identity.clone(),
            parent_key: local_key(root, rel),
            child: junction_entity.identity.clone(),
            child_key: via_attr.foreign_key_column().to_string(),
            alias: request.alias.clone(),
            collection: true,
            model: false,
            junction_table: false,
            remove_parent_key: false,
            criteria: None,
            traversal: Traversal::new(side, &junction_entity.table_name),
        };

        let to_target = JoinStep {
            parent: junction_entity.identity.clone(),
            parent_key: far_attr.foreign_key_column().to_string(),
            child: target.identity.clone(),
            child_key: target.primary_key_column().to_string(),
            alias: request.alias.clone(),
            collection: true,
            model: false,
            junction_table: true,
            remove_parent_key: false,
            criteria: Some(request.criteria.clone().unwrap_or_default()),
            traversal: Traversal::new(side.opposite(), &junction_entity.table_name),
        };

        Ok([to_junction, to_target])
    }

    fn target(
        &self,
        root: &EntityDescriptor,
        attr: &AttributeDescriptor,
        rel: &RelationshipDescriptor,
    ) -> PlanResult<&'a EntityDescriptor> {
        self.registry.entity(&rel.target).ok_or_else(|| {
            invalid(
                root,
                attr,
                format!("target '{}' is not registered", rel.target),
            )
        })
    }
}

fn local_key(root: &EntityDescriptor, rel: &RelationshipDescriptor) -> String {
    rel.local_key
        .clone()
        .unwrap_or_else(|| root.primary_key_column().to_string())
}

fn invalid(root: &EntityDescriptor, attr: &AttributeDescriptor, reason: String) -> PlanError {
    PlanError::InvalidRelationship {
        entity: root.identity.clone(),
        attribute: attr.name.clone(),
        reason,
    }
}
