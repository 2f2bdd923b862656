//! Result expansion: resolve edge endpoints against the same result batch.

use std::collections::HashMap;

use serde_json::Value;

use crate::model::Direction;

use super::{Record, ReferenceOptions};

pub struct ResultExpander<'a> {
    options: &'a ReferenceOptions,
}

impl<'a> ResultExpander<'a> {
    pub fn new(options: &'a ReferenceOptions) -> Self {
        Self { options }
    }

    /// Replace unresolved edge endpoints with clones of batch records.
    ///
    /// Only edge wrappers (objects with an `out`/`in` reference) and arrays
    /// of them are touched; each endpoint is judged on its own, so a null or
    /// numeric endpoint is left as it is. Endpoints are looked up in the input
    /// batch as it was before expansion; misses stay as they are. Endpoints
    /// that are already materialized are left alone, so expanding twice
    /// changes nothing.
    pub fn expand(&self, records: Vec<Value>) -> Vec<Value> {
        let index = self.index(&records);

        records
            .into_iter()
            .map(|mut record| {
                if let Value::Object(fields) = &mut record {
                    for value in fields.values_mut() {
                        self.expand_value(value, &index);
                    }
                }
                record
            })
            .collect()
    }

    /// Input records keyed by identifier; the first record wins on duplicates.
    fn index(&self, records: &[Value]) -> HashMap<String, Value> {
        let mut index = HashMap::with_capacity(records.len());
        for record in records {
            if let Some(id) = record.as_object().and_then(|r| self.options.identifier_of(r)) {
                index
                    .entry(id.to_string())
                    .or_insert_with(|| record.clone());
            }
        }
        index
    }

    fn expand_value(&self, value: &mut Value, index: &HashMap<String, Value>) {
        match value {
            Value::Object(obj) if self.is_edge_wrapper(obj) => self.expand_edge(obj, index),
            Value::Array(items) => {
                for item in items {
                    if let Value::Object(obj) = item {
                        if self.is_edge_wrapper(obj) {
                            self.expand_edge(obj, index);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    /// An object with an `out` and/or `in` endpoint that is a reference.
    fn is_edge_wrapper(&self, obj: &Record) -> bool {
        Direction::ALL.iter().any(|direction| {
            obj.get(direction.as_str())
                .is_some_and(|endpoint| self.options.is_reference(endpoint))
        })
    }

    fn expand_edge(&self, edge: &mut Record, index: &HashMap<String, Value>) {
        for direction in Direction::ALL {
            let Some(endpoint) = edge.get_mut(direction.as_str()) else {
                continue;
            };
            let Some(id) = self.unresolved_id(endpoint) else {
                continue;
            };
            match index.get(&id) {
                Some(record) => *endpoint = record.clone(),
                None => tracing::trace!(%id, %direction, "edge endpoint not in batch"),
            }
        }
    }

    /// Identifier of an endpoint that still needs resolving.
    fn unresolved_id(&self, endpoint: &Value) -> Option<String> {
        match endpoint {
            Value::String(id) if self.options.is_reference_str(id) => Some(id.clone()),
            Value::Object(obj) if self.options.is_marker_only(obj) => {
                self.options.identifier_of(obj).map(str::to_string)
            }
            _ => None,
        }
    }
}
