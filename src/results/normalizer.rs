//! Record normalization: hide graph-storage artifacts from the model layer.
//!
//! After normalization a record has:
//! - one array per through association (populated vertices, or empty)
//! - populated direct links taken from the field their join step traverses
//! - unpopulated singular links collapsed to their identifier
//! - no edge adjacency fields (`in_*` / `out_*`) and no metadata fields
//! - `id` taken from the graph marker when the record had none

use serde_json::Value;

use crate::model::{Cardinality, Direction, EntityDescriptor, RelationshipKind};
use crate::planner::JoinStep;
use crate::schema::SchemaRegistry;

use super::{Record, ReferenceExtractor, ReferenceOptions, ID_FIELD};

const ADJACENCY_PREFIXES: [&str; 2] = ["in_", "out_"];

pub struct RecordNormalizer<'a> {
    registry: &'a SchemaRegistry,
    options: &'a ReferenceOptions,
    strip_fields: &'a [String],
}

impl<'a> RecordNormalizer<'a> {
    pub fn new(
        registry: &'a SchemaRegistry,
        options: &'a ReferenceOptions,
        strip_fields: &'a [String],
    ) -> Self {
        Self {
            registry,
            options,
            strip_fields,
        }
    }

    /// Normalize one (already expanded) record of `root`.
    ///
    /// Populated relationships are read from the adjacency field their first
    /// join step traverses, the same field the fetch plan asked the store for.
    pub fn normalize(&self, root: &EntityDescriptor, joins: &[JoinStep], record: Value) -> Value {
        let Value::Object(mut fields) = record else {
            return record;
        };

        for (attr, rel) in root.relationships() {
            let step = joins
                .iter()
                .find(|step| step.alias == attr.name && !step.junction_table);
            match (rel.kind(), step) {
                (RelationshipKind::ThroughJoin { .. }, Some(step)) => {
                    let vertices = self.edge_vertices(&fields, step);
                    fields.insert(attr.name.clone(), Value::Array(vertices));
                }
                (RelationshipKind::ThroughJoin { .. }, None) => {
                    fields.insert(attr.name.clone(), Value::Array(vec![]));
                }
                (RelationshipKind::Direct(Cardinality::One), Some(step)) => {
                    if let Some(linked) = self.linked_records(&fields, step).into_iter().next() {
                        fields.insert(attr.name.clone(), linked);
                    }
                }
                (RelationshipKind::Direct(Cardinality::Many), Some(step)) => {
                    let linked = self.linked_records(&fields, step);
                    if !linked.is_empty() {
                        fields.insert(attr.name.clone(), Value::Array(linked));
                    }
                }
                (RelationshipKind::Direct(Cardinality::One), None) => {
                    if let Some(value) = fields.get_mut(&attr.name) {
                        let id = value
                            .as_object()
                            .and_then(|obj| self.options.identifier_of(obj))
                            .map(str::to_string);
                        if let Some(id) = id {
                            *value = Value::String(id);
                        }
                    }
                }
                (RelationshipKind::Direct(Cardinality::Many), None) => {}
            }
        }

        self.strip(&mut fields, Some(root));
        Value::Object(fields)
    }

    /// Vertices at the far end of the edges in a step's adjacency field.
    fn edge_vertices(&self, fields: &Record, step: &JoinStep) -> Vec<Value> {
        ReferenceExtractor::new(self.options)
            .extract_from(
                fields,
                &step.traversal.adjacency_field(),
                step.traversal.direction.opposite(),
            )
            .into_iter()
            .map(|vertex| vertex.raw)
            .collect()
    }

    /// Records reached by a direct link: the far endpoints of its edges, or
    /// records the store inlined under the adjacency field.
    fn linked_records(&self, fields: &Record, step: &JoinStep) -> Vec<Value> {
        let vertices = self.edge_vertices(fields, step);
        if !vertices.is_empty() {
            return vertices;
        }

        let is_record = |value: &Value| {
            value.as_object().is_some_and(|obj| {
                self.options.identifier_of(obj).is_some()
                    && !Direction::ALL.iter().any(|d| obj.contains_key(d.as_str()))
            })
        };
        match fields.get(&step.traversal.adjacency_field()) {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|item| is_record(*item))
                .cloned()
                .collect(),
            Some(value) if is_record(value) => vec![value.clone()],
            _ => vec![],
        }
    }

    /// Remove artifacts from a record, then from the related records it holds.
    fn strip(&self, fields: &mut Record, entity: Option<&EntityDescriptor>) {
        if self.options.id_marker != ID_FIELD {
            if let Some(marker) = fields.remove(&self.options.id_marker) {
                if marker.is_string() && !fields.contains_key(ID_FIELD) {
                    fields.insert(ID_FIELD.to_string(), marker);
                }
            }
        }

        let before = fields.len();
        fields.retain(|key, _| !self.strip_fields.contains(key) && !is_adjacency(key, entity));
        if fields.len() != before {
            tracing::trace!(dropped = before - fields.len(), "stripped record artifacts");
        }

        for (key, value) in fields.iter_mut() {
            match entity.and_then(|e| e.attribute(key)) {
                Some(attr) => {
                    if let Some(rel) = attr.as_relationship() {
                        self.strip_records(value, self.registry.entity(&rel.target));
                    }
                }
                None => self.strip_records(value, None),
            }
        }
    }

    /// Recurse into values that are records (objects with an identifier).
    fn strip_records(&self, value: &mut Value, entity: Option<&EntityDescriptor>) {
        match value {
            Value::Object(obj) if self.options.identifier_of(obj).is_some() => {
                self.strip(obj, entity);
            }
            Value::Array(items) => {
                for item in items {
                    self.strip_records(item, entity);
                }
            }
            _ => {}
        }
    }
}

/// `in_*` / `out_*` keys the entity does not declare itself.
fn is_adjacency(key: &str, entity: Option<&EntityDescriptor>) -> bool {
    ADJACENCY_PREFIXES.iter().any(|prefix| key.starts_with(prefix))
        && entity.map_or(true, |e| e.attribute(key).is_none())
}
