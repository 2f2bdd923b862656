//! Tagged representation of the shapes an edge field can arrive in.

use serde_json::Value;

use crate::model::Direction;

use super::{Record, ReferenceOptions};

/// One endpoint of an edge.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    /// Bare record identifier
    Id(String),
    /// Object carrying an identifier (possibly a full vertex)
    Vertex(Record),
}

/// An edge object with optional `out` / `in` endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeObject {
    pub out: Option<Endpoint>,
    pub in_: Option<Endpoint>,
}

impl EdgeObject {
    pub fn endpoint(&self, direction: Direction) -> Option<&Endpoint> {
        match direction {
            Direction::Out => self.out.as_ref(),
            Direction::In => self.in_.as_ref(),
        }
    }

    fn into_endpoint(self, direction: Direction) -> Option<Endpoint> {
        match direction {
            Direction::Out => self.out,
            Direction::In => self.in_,
        }
    }
}

/// An element of a mixed array.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeEntry {
    Edge(EdgeObject),
    BareId(String),
    Malformed,
}

/// Every shape an edge-collection field is known to take.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeField {
    Absent,
    BareId(String),
    BareIdList(Vec<String>),
    EdgeObject(EdgeObject),
    EdgeObjectList(Vec<EdgeEntry>),
}

impl EdgeField {
    /// Classify a raw field value.
    pub fn parse(value: Option<&Value>, options: &ReferenceOptions) -> Self {
        match value {
            None | Some(Value::Null) => EdgeField::Absent,
            Some(Value::String(id)) => EdgeField::BareId(id.clone()),
            Some(Value::Array(items)) => {
                let bare: Option<Vec<String>> = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect();
                match bare {
                    Some(ids) => EdgeField::BareIdList(ids),
                    None => EdgeField::EdgeObjectList(
                        items.iter().map(|item| parse_entry(item, options)).collect(),
                    ),
                }
            }
            Some(Value::Object(obj)) => EdgeField::EdgeObject(parse_edge(obj, options)),
            // Scalars carry no edge.
            Some(Value::Bool(_)) | Some(Value::Number(_)) => EdgeField::Absent,
        }
    }

    /// Endpoints in the given direction, in field order.
    ///
    /// Bare identifiers carry no direction and are never endpoints.
    pub fn into_endpoints(self, direction: Direction) -> Vec<Endpoint> {
        match self {
            EdgeField::Absent | EdgeField::BareId(_) | EdgeField::BareIdList(_) => vec![],
            EdgeField::EdgeObject(edge) => edge.into_endpoint(direction).into_iter().collect(),
            EdgeField::EdgeObjectList(entries) => entries
                .into_iter()
                .filter_map(|entry| match entry {
                    EdgeEntry::Edge(edge) => edge.into_endpoint(direction),
                    EdgeEntry::BareId(_) | EdgeEntry::Malformed => None,
                })
                .collect(),
        }
    }
}

fn parse_entry(value: &Value, options: &ReferenceOptions) -> EdgeEntry {
    match value {
        Value::String(id) => EdgeEntry::BareId(id.clone()),
        Value::Object(obj) => EdgeEntry::Edge(parse_edge(obj, options)),
        _ => EdgeEntry::Malformed,
    }
}

fn parse_edge(obj: &Record, options: &ReferenceOptions) -> EdgeObject {
    EdgeObject {
        out: obj
            .get(Direction::Out.as_str())
            .and_then(|v| parse_endpoint(v, options)),
        in_: obj
            .get(Direction::In.as_str())
            .and_then(|v| parse_endpoint(v, options)),
    }
}

fn parse_endpoint(value: &Value, options: &ReferenceOptions) -> Option<Endpoint> {
    match value {
        Value::String(id) if options.is_reference_str(id) => Some(Endpoint::Id(id.clone())),
        Value::Object(obj) if options.identifier_of(obj).is_some() => {
            Some(Endpoint::Vertex(obj.clone()))
        }
        _ => None,
    }
}
