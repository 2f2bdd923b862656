use serde_json::{json, Value};

use linkage::results::{ReferenceOptions, ResultExpander};

fn expand(records: Vec<Value>) -> Vec<Value> {
    let options = ReferenceOptions::default();
    ResultExpander::new(&options).expand(records)
}

#[test]
fn test_expands_edge_endpoint_from_batch() {
    let original = json!({"id": "#5:0", "name": "Maria", "out_edge": {"out": "#5:0", "in": "#4:0"}});

    let expanded = expand(vec![original.clone()]);

    assert_eq!(expanded.len(), 1);
    let record = &expanded[0];
    assert_eq!(record["name"], "Maria");
    assert_eq!(record["out_edge"]["out"], original);
    assert_eq!(record["out_edge"]["in"], "#4:0");
}

#[test]
fn test_expanded_endpoint_is_a_snapshot() {
    let expanded = expand(vec![
        json!({"id": "#5:0", "name": "Maria", "out_edge": {"out": "#5:0", "in": "#4:0"}}),
    ]);

    // The clone still carries the unexpanded edge.
    assert_eq!(expanded[0]["out_edge"]["out"]["out_edge"]["out"], "#5:0");
}

#[test]
fn test_records_without_edges_are_unchanged() {
    let records = vec![json!({"id": "#5:0", "name": "Maria", "picture": {"id": 1}, "likes": 1})];

    assert_eq!(expand(records.clone()), records);
}

#[test]
fn test_resolves_across_records() {
    let records = vec![
        json!({"@rid": "#5:0", "name": "Maria", "out_follows": [{"out": "#5:0", "in": "#5:1"}]}),
        json!({"@rid": "#5:1", "name": "Joao"}),
    ];

    let expanded = expand(records);

    assert_eq!(expanded[0]["out_follows"][0]["in"]["name"], "Joao");
    assert_eq!(expanded[0]["out_follows"][0]["out"]["name"], "Maria");
    assert_eq!(expanded[1], json!({"@rid": "#5:1", "name": "Joao"}));
}

#[test]
fn test_unknown_endpoints_stay() {
    let records = vec![json!({"id": "#5:0", "out_edge": {"out": "#9:9"}})];

    assert_eq!(expand(records.clone()), records);
}

#[test]
fn test_first_duplicate_wins() {
    let records = vec![
        json!({"id": "#1:0", "name": "first"}),
        json!({"id": "#1:0", "name": "second"}),
        json!({"id": "#2:0", "link": {"in": "#1:0"}}),
    ];

    let expanded = expand(records);

    assert_eq!(expanded[2]["link"]["in"]["name"], "first");
}

#[test]
fn test_expanding_twice_changes_nothing() {
    let records = vec![
        json!({"id": "#5:0", "name": "Maria", "out_edge": {"out": "#5:0", "in": "#5:1"}}),
        json!({"id": "#5:1", "name": "Joao"}),
    ];

    let once = expand(records);
    let twice = expand(once.clone());

    assert_eq!(once, twice);
}

#[test]
fn test_numeric_ids_are_not_references() {
    let records = vec![
        json!({"id": 1, "name": "plain"}),
        json!({"id": "#3:0", "pair": {"out": 1, "in": "#3:0"}}),
    ];

    let expanded = expand(records.clone());

    assert_eq!(expanded[0], records[0]);
    assert_eq!(expanded[1]["pair"]["out"], 1);
    assert_eq!(expanded[1]["pair"]["in"], records[1]);
}

#[test]
fn test_null_endpoint_does_not_block_expansion() {
    let original = json!({"id": "#5:0", "name": "Maria", "out_edge": {"out": "#5:0", "in": null}});

    let expanded = expand(vec![original.clone()]);

    assert_eq!(expanded[0]["out_edge"]["out"], original);
    assert_eq!(expanded[0]["out_edge"]["in"], Value::Null);
}

#[test]
fn test_endpoint_with_metadata_is_resolved() {
    let records = vec![
        json!({"@rid": "#7:0", "@class": "profile", "alias": "sam"}),
        json!({"@rid": "#8:0", "in_wrote": [{"out": {"@rid": "#7:0", "@class": "profile"}, "in": "#8:0"}]}),
    ];

    let expanded = expand(records);

    assert_eq!(expanded[1]["in_wrote"][0]["out"]["alias"], "sam");
}

#[test]
fn test_loose_mode_accepts_any_string_id() {
    let options = ReferenceOptions {
        strict_record_ids: false,
        ..Default::default()
    };
    let records = vec![json!({"id": "alice", "friend": {"out": "alice"}})];

    let expanded = ResultExpander::new(&options).expand(records.clone());

    assert_eq!(expanded[0]["friend"]["out"], records[0]);
}

#[test]
fn test_strict_mode() {
    let options = ReferenceOptions::default();
    let records = vec![
        json!({"id": "alice", "friend": {"out": "alice"}}),
        json!({"id": "#6:0", "owner": {"in": "#6:0"}}),
    ];

    let expanded = ResultExpander::new(&options).expand(records.clone());

    assert_eq!(expanded[0], records[0]);
    assert_eq!(expanded[1]["owner"]["in"]["id"], "#6:0");
}
