//! Post-query result processing.
//!
//! Raw records come back from the graph store with relationship fields
//! encoded as bare identifiers, reference-bearing objects or edge wrappers.
//! This module turns them into consumer-facing records:
//!
//! - `extractor`: normalize an edge field into the vertices it points at
//! - `expander`: replace edge endpoints with clones of records from the batch
//! - `normalizer`: strip storage artifacts and collapse edge fields

pub mod edge_field;
pub mod expander;
pub mod extractor;
pub mod normalizer;

pub use edge_field::{EdgeEntry, EdgeField, EdgeObject, Endpoint};
pub use expander::ResultExpander;
pub use extractor::{ExtractedVertex, ReferenceExtractor};
pub use normalizer::RecordNormalizer;

use serde_json::{Map, Value};

use crate::model::RecordId;

/// A record as returned by the graph store.
pub type Record = Map<String, Value>;

/// Field name that carries a plain model identifier.
pub const ID_FIELD: &str = "id";

/// Store metadata carried on every record.
pub const METADATA_FIELDS: [&str; 4] = ["@type", "@class", "@version", "@fieldTypes"];

/// How graph references are recognized inside records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceOptions {
    /// Field carrying the graph record id (e.g., `@rid`)
    pub id_marker: String,

    /// Only accept strings shaped like `#<cluster>:<position>` as references
    pub strict_record_ids: bool,

    /// Keys that do not count as content when deciding if an object is a
    /// bare reference
    pub metadata_fields: Vec<String>,
}

impl Default for ReferenceOptions {
    fn default() -> Self {
        Self {
            id_marker: "@rid".to_string(),
            strict_record_ids: true,
            metadata_fields: METADATA_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl ReferenceOptions {
    /// The identifier of a record: the graph marker when it is a string,
    /// otherwise a string `id`. Non-string ids never identify a record.
    pub fn identifier_of<'r>(&self, record: &'r Record) -> Option<&'r str> {
        record
            .get(&self.id_marker)
            .and_then(Value::as_str)
            .or_else(|| record.get(ID_FIELD).and_then(Value::as_str))
    }

    /// Does this string count as a graph reference?
    pub fn is_reference_str(&self, s: &str) -> bool {
        !self.strict_record_ids || RecordId::is_record_id(s)
    }

    /// Is the value a reference: a reference string or an identified object?
    pub fn is_reference(&self, value: &Value) -> bool {
        match value {
            Value::String(s) => self.is_reference_str(s),
            Value::Object(obj) => self
                .identifier_of(obj)
                .is_some_and(|id| self.is_reference_str(id)),
            _ => false,
        }
    }

    /// An object holding nothing but its identifier and metadata fields.
    pub fn is_marker_only(&self, record: &Record) -> bool {
        self.identifier_of(record).is_some()
            && record.keys().all(|key| {
                key == &self.id_marker || key == ID_FIELD || self.metadata_fields.contains(key)
            })
    }
}
