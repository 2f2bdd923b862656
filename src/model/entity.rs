//! Entity and attribute descriptors - the static schema declarations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar type of a plain attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    String,
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    Datetime,
    Json,
}

/// How many records sit on the far side of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    One,
    Many,
}

/// Edge traversal direction.
///
/// An edge runs from its `out` endpoint to its `in` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Out,
    In,
}

impl Direction {
    /// Both directions, `out` first.
    pub const ALL: [Direction; 2] = [Direction::Out, Direction::In];

    /// The key used for this endpoint on an edge record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Out => "out",
            Direction::In => "in",
        }
    }

    /// The other endpoint.
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Out => Direction::In,
            Direction::In => Direction::Out,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Relationship metadata attached to an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDescriptor {
    /// Identity of the related entity
    pub target: String,

    /// `one` (model) or `many` (collection)
    pub cardinality: Cardinality,

    /// Junction entity for many-to-many associations
    #[serde(default)]
    pub through: Option<String>,

    /// Reciprocal attribute name.
    ///
    /// For a plain collection this names the target's attribute pointing back
    /// at us; for a through association it names the junction's attribute
    /// pointing back at us.
    #[serde(default)]
    pub via: Option<String>,

    /// Column holding the foreign key, when it differs from the attribute column
    #[serde(default)]
    pub foreign_key: Option<String>,

    /// Local key matched against the foreign key (defaults to the primary key)
    #[serde(default)]
    pub local_key: Option<String>,
}

/// The effective shape of a relationship, computed from descriptor fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind<'a> {
    /// Direct link or back-reference
    Direct(Cardinality),
    /// Many-to-many through a junction edge
    ThroughJoin { junction: &'a str },
}

impl RelationshipDescriptor {
    /// A singular relationship (`model`).
    pub fn one(target: impl Into<String>) -> Self {
        Self::new(target, Cardinality::One)
    }

    /// A plural relationship (`collection`).
    pub fn many(target: impl Into<String>) -> Self {
        Self::new(target, Cardinality::Many)
    }

    fn new(target: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            target: target.into(),
            cardinality,
            through: None,
            via: None,
            foreign_key: None,
            local_key: None,
        }
    }

    /// Route this relationship through a junction entity.
    pub fn through(mut self, junction: impl Into<String>) -> Self {
        self.through = Some(junction.into());
        self
    }

    /// Set the reciprocal attribute.
    pub fn via(mut self, via: impl Into<String>) -> Self {
        self.via = Some(via.into());
        self
    }

    /// Set an explicit foreign key column.
    pub fn with_foreign_key(mut self, column: impl Into<String>) -> Self {
        self.foreign_key = Some(column.into());
        self
    }

    /// Set an explicit local key.
    pub fn with_local_key(mut self, column: impl Into<String>) -> Self {
        self.local_key = Some(column.into());
        self
    }

    pub fn kind(&self) -> RelationshipKind<'_> {
        match &self.through {
            Some(junction) => RelationshipKind::ThroughJoin { junction },
            None => RelationshipKind::Direct(self.cardinality),
        }
    }

    pub fn is_through(&self) -> bool {
        self.through.is_some()
    }
}

/// What an attribute holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeKind {
    Scalar(ScalarType),
    Relationship(RelationshipDescriptor),
}

/// A declared attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Attribute name as seen by the model layer
    pub name: String,

    /// Storage column name
    pub column_name: String,

    pub kind: AttributeKind,
}

impl AttributeDescriptor {
    /// Create a scalar attribute stored under its own name.
    pub fn scalar(name: impl Into<String>, scalar: ScalarType) -> Self {
        let name = name.into();
        Self {
            column_name: name.clone(),
            name,
            kind: AttributeKind::Scalar(scalar),
        }
    }

    /// Create a relationship attribute stored under its own name.
    pub fn relationship(name: impl Into<String>, relationship: RelationshipDescriptor) -> Self {
        let name = name.into();
        Self {
            column_name: name.clone(),
            name,
            kind: AttributeKind::Relationship(relationship),
        }
    }

    /// Override the storage column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column_name = column.into();
        self
    }

    pub fn as_relationship(&self) -> Option<&RelationshipDescriptor> {
        match &self.kind {
            AttributeKind::Relationship(rel) => Some(rel),
            AttributeKind::Scalar(_) => None,
        }
    }

    pub fn is_relationship(&self) -> bool {
        matches!(self.kind, AttributeKind::Relationship(_))
    }

    /// Column carrying the foreign key for this attribute.
    pub fn foreign_key_column(&self) -> &str {
        self.as_relationship()
            .and_then(|rel| rel.foreign_key.as_deref())
            .unwrap_or(&self.column_name)
    }
}

/// Whether an entity is stored as a vertex or as an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntityKind {
    Vertex,
    /// An edge entity; `out_key` and `in_key` name its two endpoint attributes.
    Edge { out_key: String, in_key: String },
}

impl EntityKind {
    /// Which endpoint of the edge the given attribute occupies.
    pub fn side_of(&self, attribute: &str) -> Option<Direction> {
        match self {
            EntityKind::Edge { out_key, .. } if out_key == attribute => Some(Direction::Out),
            EntityKind::Edge { in_key, .. } if in_key == attribute => Some(Direction::In),
            _ => None,
        }
    }

    /// The attribute occupying the given endpoint.
    pub fn endpoint(&self, direction: Direction) -> Option<&str> {
        match (self, direction) {
            (EntityKind::Edge { out_key, .. }, Direction::Out) => Some(out_key),
            (EntityKind::Edge { in_key, .. }, Direction::In) => Some(in_key),
            (EntityKind::Vertex, _) => None,
        }
    }
}

/// A registered entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Logical identity (e.g., "comment")
    pub identity: String,

    /// Storage class / table name
    pub table_name: String,

    /// Primary key attribute
    pub primary_key: String,

    pub kind: EntityKind,

    /// Attributes in declaration order
    pub attributes: Vec<AttributeDescriptor>,
}

impl EntityDescriptor {
    /// Create a vertex entity whose table shares its identity.
    pub fn vertex(identity: impl Into<String>) -> Self {
        let identity = identity.into();
        Self {
            table_name: identity.clone(),
            identity,
            primary_key: "id".to_string(),
            kind: EntityKind::Vertex,
            attributes: vec![],
        }
    }

    /// Create an edge entity joining the `out_key` and `in_key` attributes.
    pub fn edge(
        identity: impl Into<String>,
        out_key: impl Into<String>,
        in_key: impl Into<String>,
    ) -> Self {
        Self {
            kind: EntityKind::Edge {
                out_key: out_key.into(),
                in_key: in_key.into(),
            },
            ..Self::vertex(identity)
        }
    }

    /// Set the table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table_name = table.into();
        self
    }

    /// Set the primary key attribute.
    pub fn with_primary_key(mut self, key: impl Into<String>) -> Self {
        self.primary_key = key.into();
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, attribute: AttributeDescriptor) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add a scalar attribute.
    pub fn with_scalar(self, name: impl Into<String>, scalar: ScalarType) -> Self {
        self.with_attribute(AttributeDescriptor::scalar(name, scalar))
    }

    /// Add a relationship attribute.
    pub fn with_relationship(
        self,
        name: impl Into<String>,
        relationship: RelationshipDescriptor,
    ) -> Self {
        self.with_attribute(AttributeDescriptor::relationship(name, relationship))
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Relationship attributes in declaration order.
    pub fn relationships(&self) -> impl Iterator<Item = (&AttributeDescriptor, &RelationshipDescriptor)> {
        self.attributes
            .iter()
            .filter_map(|attr| attr.as_relationship().map(|rel| (attr, rel)))
    }

    pub fn is_edge(&self) -> bool {
        matches!(self.kind, EntityKind::Edge { .. })
    }

    /// Storage column of the primary key.
    pub fn primary_key_column(&self) -> &str {
        self.attribute(&self.primary_key)
            .map(|attr| attr.column_name.as_str())
            .unwrap_or(&self.primary_key)
    }
}
