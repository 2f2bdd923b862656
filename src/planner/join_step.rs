//! Join steps and populate requests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::Direction;

/// Criteria attached to a populated association.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    #[serde(rename = "where", default)]
    pub where_clause: Map<String, Value>,
}

impl Criteria {
    pub fn new(where_clause: Map<String, Value>) -> Self {
        Self { where_clause }
    }
}

/// A caller request to eagerly resolve one relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulateRequest {
    pub alias: String,
    pub criteria: Option<Criteria>,
}

impl PopulateRequest {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            criteria: None,
        }
    }

    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = Some(criteria);
        self
    }
}

impl From<&str> for PopulateRequest {
    fn from(alias: &str) -> Self {
        Self::new(alias)
    }
}

/// The graph hop a join step takes, resolved at plan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traversal {
    /// For a link hop, the side of the parent; for a junction hop, the side
    /// of the record being reached.
    pub direction: Direction,

    /// Edge class of a through hop, or the link column of a direct hop
    pub field: String,
}

impl Traversal {
    pub fn new(direction: Direction, field: impl Into<String>) -> Self {
        Self {
            direction,
            field: field.into(),
        }
    }

    /// Adjacency field name on the parent record (e.g., `in_authored_comment`).
    pub fn adjacency_field(&self) -> String {
        format!("{}_{}", self.direction, self.field)
    }
}

/// One step of a population plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinStep {
    pub parent: String,
    pub parent_key: String,
    pub child: String,
    pub child_key: String,

    /// Populate alias this step serves
    pub alias: String,

    pub collection: bool,
    pub model: bool,
    pub junction_table: bool,
    pub remove_parent_key: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Criteria>,

    pub traversal: Traversal,
}
