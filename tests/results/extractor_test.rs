use serde_json::json;

use linkage::model::Direction;
use linkage::results::{EdgeField, ReferenceExtractor, ReferenceOptions};

fn ids(value: serde_json::Value, direction: Direction) -> Vec<String> {
    let options = ReferenceOptions::default();
    ReferenceExtractor::new(&options)
        .extract(&value, direction)
        .into_iter()
        .map(|v| v.id)
        .collect()
}

#[test]
fn test_bare_id_has_no_vertices() {
    assert!(ids(json!("#14:0"), Direction::Out).is_empty());
}

#[test]
fn test_bare_id_list_has_no_vertices() {
    assert!(ids(json!(["14:0", "#14:1"]), Direction::Out).is_empty());
}

#[test]
fn test_edge_with_bare_endpoint() {
    let options = ReferenceOptions::default();
    let vertices = ReferenceExtractor::new(&options).extract(&json!({"out": "#13:2"}), Direction::Out);

    assert_eq!(vertices.len(), 1);
    assert_eq!(vertices[0].id, "#13:2");
    assert_eq!(vertices[0].raw, json!({"id": "#13:2"}));
}

#[test]
fn test_edge_with_vertex_endpoint() {
    let options = ReferenceOptions::default();
    let vertices =
        ReferenceExtractor::new(&options).extract(&json!({"out": {"@rid": "#13:2"}}), Direction::Out);

    assert_eq!(vertices.len(), 1);
    assert_eq!(vertices[0].id, "#13:2");
    assert_eq!(vertices[0].raw["@rid"], "#13:2");
}

#[test]
fn test_array_forms() {
    assert_eq!(ids(json!([{"out": "#13:2"}]), Direction::Out), vec!["#13:2"]);
    assert_eq!(
        ids(json!([{"out": {"@rid": "#13:2"}}]), Direction::Out),
        vec!["#13:2"]
    );
}

#[test]
fn test_mixed_array_keeps_edges_in_order() {
    let value = json!([{"out": {"@rid": "#13:2"}}, {"out": "#13:1"}, "14:0", "#14:1"]);

    assert_eq!(ids(value, Direction::Out), vec!["#13:2", "#13:1"]);
}

#[test]
fn test_direction_is_respected() {
    let value = json!([{"out": "#1:1", "in": "#2:1"}, {"in": "#2:2"}]);

    assert_eq!(ids(value.clone(), Direction::Out), vec!["#1:1"]);
    assert_eq!(ids(value, Direction::In), vec!["#2:1", "#2:2"]);
}

#[test]
fn test_malformed_entries_are_dropped() {
    let value = json!([42, null, {"out": 7}, {"out": {"name": "no id"}}, {"out": "#3:3"}]);

    assert_eq!(ids(value, Direction::Out), vec!["#3:3"]);
}

#[test]
fn test_absent_and_scalar_fields() {
    assert!(ids(json!(null), Direction::In).is_empty());
    assert!(ids(json!(12), Direction::In).is_empty());
    assert!(ids(json!(true), Direction::In).is_empty());
}

#[test]
fn test_strict_mode_ignores_plain_strings() {
    let options = ReferenceOptions {
        strict_record_ids: true,
        ..Default::default()
    };
    let vertices = ReferenceExtractor::new(&options)
        .extract(&json!([{"out": "alice"}, {"out": "#9:0"}]), Direction::Out);

    let ids: Vec<&str> = vertices.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["#9:0"]);
}

#[test]
fn test_extract_from_record_field() {
    let options = ReferenceOptions::default();
    let record = json!({
        "id": "#5:0",
        "in_authored_comment": [{"out": {"@rid": "#7:1", "alias": "sam"}, "in": "#5:0"}]
    });
    let record = record.as_object().unwrap();

    let extractor = ReferenceExtractor::new(&options);
    let authors = extractor.extract_from(record, "in_authored_comment", Direction::Out);
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].raw["alias"], "sam");

    assert!(extractor
        .extract_from(record, "out_comment_parent", Direction::In)
        .is_empty());
}

#[test]
fn test_field_classification() {
    let options = ReferenceOptions::default();

    assert_eq!(
        EdgeField::parse(Some(&json!(["#1:1", "#1:2"])), &options),
        EdgeField::BareIdList(vec!["#1:1".to_string(), "#1:2".to_string()])
    );
    assert_eq!(EdgeField::parse(None, &options), EdgeField::Absent);
}
