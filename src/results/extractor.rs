//! Reference extraction from edge fields.

use serde_json::{json, Value};

use crate::model::Direction;

use super::{EdgeField, Endpoint, Record, ReferenceOptions};

/// A vertex reached through an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedVertex {
    /// Vertex identifier
    pub id: String,
    /// `{"id": <id>}` for bare endpoints, the endpoint object otherwise
    pub raw: Value,
}

pub struct ReferenceExtractor<'a> {
    options: &'a ReferenceOptions,
}

impl<'a> ReferenceExtractor<'a> {
    pub fn new(options: &'a ReferenceOptions) -> Self {
        Self { options }
    }

    /// Vertices at the `direction` end of every edge in `value`.
    ///
    /// Only objects with an explicit `out`/`in` key are edges: bare
    /// identifiers, edges lacking the requested side and malformed entries
    /// are dropped without error.
    pub fn extract(&self, value: &Value, direction: Direction) -> Vec<ExtractedVertex> {
        self.extract_field(EdgeField::parse(Some(value), self.options), direction)
    }

    /// Same as [`extract`](Self::extract) for a named field of a record.
    pub fn extract_from(
        &self,
        record: &Record,
        field: &str,
        direction: Direction,
    ) -> Vec<ExtractedVertex> {
        self.extract_field(EdgeField::parse(record.get(field), self.options), direction)
    }

    pub fn extract_field(&self, field: EdgeField, direction: Direction) -> Vec<ExtractedVertex> {
        field
            .into_endpoints(direction)
            .into_iter()
            .filter_map(|endpoint| self.to_vertex(endpoint))
            .collect()
    }

    fn to_vertex(&self, endpoint: Endpoint) -> Option<ExtractedVertex> {
        match endpoint {
            Endpoint::Id(id) => Some(ExtractedVertex {
                raw: json!({ "id": id }),
                id,
            }),
            Endpoint::Vertex(obj) => {
                let id = self.options.identifier_of(&obj)?.to_string();
                Some(ExtractedVertex {
                    id,
                    raw: Value::Object(obj),
                })
            }
        }
    }
}
