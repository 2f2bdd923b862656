use linkage::model::{
    Cardinality, Direction, EntityDescriptor, EntityKind, RelationshipDescriptor, ScalarType,
};
use linkage::schema::{SchemaError, SchemaRegistry};

/// Helper: a library with books written by authors through the `wrote` edge.
fn library_entities() -> Vec<EntityDescriptor> {
    vec![
        EntityDescriptor::vertex("author")
            .with_scalar("name", ScalarType::String)
            .with_relationship(
                "books",
                RelationshipDescriptor::many("book")
                    .through("wrote")
                    .via("authorRef"),
            ),
        EntityDescriptor::vertex("book")
            .with_scalar("title", ScalarType::String)
            .with_relationship("publisher", RelationshipDescriptor::one("publisher")),
        EntityDescriptor::vertex("publisher")
            .with_scalar("name", ScalarType::String)
            .with_relationship(
                "catalogue",
                RelationshipDescriptor::many("book").via("publisher"),
            ),
        EntityDescriptor::edge("wrote", "authorRef", "bookRef")
            .with_relationship("authorRef", RelationshipDescriptor::one("author"))
            .with_relationship("bookRef", RelationshipDescriptor::one("book")),
    ]
}

#[test]
fn test_registry_lookup() {
    let registry = SchemaRegistry::new(library_entities()).unwrap();

    assert_eq!(registry.len(), 4);
    assert!(registry.contains("wrote"));
    assert!(!registry.contains("magazine"));

    let author = registry.entity("author").unwrap();
    assert_eq!(author.table_name, "author");
    assert_eq!(author.kind, EntityKind::Vertex);

    let books = registry.attribute("author", "books").unwrap();
    let rel = books.as_relationship().unwrap();
    assert_eq!(rel.cardinality, Cardinality::Many);
    assert_eq!(rel.through.as_deref(), Some("wrote"));
}

#[test]
fn test_registration_order_is_kept() {
    let registry = SchemaRegistry::new(library_entities()).unwrap();

    let names: Vec<&str> = registry.entities().map(|e| e.identity.as_str()).collect();
    assert_eq!(names, vec!["author", "book", "publisher", "wrote"]);
}

#[test]
fn test_edge_endpoints() {
    let registry = SchemaRegistry::new(library_entities()).unwrap();

    let wrote = registry.entity("wrote").unwrap();
    assert!(wrote.is_edge());
    assert_eq!(wrote.kind.side_of("authorRef"), Some(Direction::Out));
    assert_eq!(wrote.kind.endpoint(Direction::In), Some("bookRef"));
}

#[test]
fn test_duplicate_entity() {
    let mut entities = library_entities();
    entities.push(EntityDescriptor::vertex("book"));

    let result = SchemaRegistry::new(entities);
    assert!(matches!(result, Err(SchemaError::DuplicateEntity(name)) if name == "book"));
}

#[test]
fn test_duplicate_attribute() {
    let result = SchemaRegistry::new(vec![EntityDescriptor::vertex("book")
        .with_scalar("title", ScalarType::String)
        .with_scalar("title", ScalarType::Text)]);

    assert!(matches!(
        result,
        Err(SchemaError::DuplicateAttribute { attribute, .. }) if attribute == "title"
    ));
}

#[test]
fn test_unknown_target() {
    let result = SchemaRegistry::new(vec![EntityDescriptor::vertex("book")
        .with_relationship("publisher", RelationshipDescriptor::one("publisher"))]);

    assert!(matches!(
        result,
        Err(SchemaError::UnknownTarget { target, .. }) if target == "publisher"
    ));
}

#[test]
fn test_collection_requires_via() {
    let mut entities = library_entities();
    entities[2] = EntityDescriptor::vertex("publisher")
        .with_relationship("catalogue", RelationshipDescriptor::many("book"));

    let result = SchemaRegistry::new(entities);
    assert!(matches!(result, Err(SchemaError::InvalidRelationship { .. })));
}

#[test]
fn test_junction_must_be_edge() {
    let result = SchemaRegistry::new(vec![
        EntityDescriptor::vertex("author").with_relationship(
            "books",
            RelationshipDescriptor::many("book")
                .through("shelf")
                .via("authorRef"),
        ),
        EntityDescriptor::vertex("book"),
        EntityDescriptor::vertex("shelf")
            .with_relationship("authorRef", RelationshipDescriptor::one("author")),
    ]);

    assert!(matches!(
        result,
        Err(SchemaError::InvalidJunction { junction, .. }) if junction == "shelf"
    ));
}

#[test]
fn test_junction_via_must_reference_owner() {
    let mut entities = library_entities();
    entities[0] = EntityDescriptor::vertex("author").with_relationship(
        "books",
        RelationshipDescriptor::many("book")
            .through("wrote")
            .via("bookRef"),
    );

    let result = SchemaRegistry::new(entities);
    assert!(matches!(result, Err(SchemaError::InvalidJunction { .. })));
}

#[test]
fn test_edge_endpoints_must_be_singular() {
    let result = SchemaRegistry::new(vec![
        EntityDescriptor::vertex("author"),
        EntityDescriptor::edge("wrote", "authorRef", "bookRef")
            .with_relationship("authorRef", RelationshipDescriptor::one("author")),
    ]);

    assert!(matches!(result, Err(SchemaError::InvalidEdge { entity, .. }) if entity == "wrote"));
}
