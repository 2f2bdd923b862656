use insta::assert_snapshot;

use linkage::planner::{FetchPlanCompiler, JoinPlanner, PlanError, PopulateRequest};
use linkage::schema::SchemaRegistry;

fn comments() -> SchemaRegistry {
    SchemaRegistry::from_toml_str(include_str!("../fixtures/comments.toml")).unwrap()
}

fn stadium() -> SchemaRegistry {
    SchemaRegistry::from_toml_str(include_str!("../fixtures/stadium.toml")).unwrap()
}

/// Helper: plan and compile in one go.
fn compile(registry: &SchemaRegistry, root: &str, aliases: &[&str], depth: u32) -> String {
    let requests: Vec<PopulateRequest> = aliases.iter().map(|&a| a.into()).collect();
    let joins = JoinPlanner::new(registry).plan(root, &requests).unwrap();
    FetchPlanCompiler::new(registry)
        .compile(root, &joins, depth)
        .unwrap()
        .to_string()
}

#[test]
fn test_comment_author_and_parent() {
    let registry = comments();
    let plan = compile(&registry, "comment", &["author", "parent"], 1);

    assert_snapshot!(plan, @"in_authored_comment:1 in_authored_comment.out:1 out_comment_parent:1 out_comment_parent.in:1 out_comment_recipe:1");
}

#[test]
fn test_depth_applies_to_far_hops_only() {
    let registry = comments();
    let plan = compile(&registry, "comment", &["author", "parent"], 2);

    assert_snapshot!(plan, @"in_authored_comment:1 in_authored_comment.out:2 out_comment_parent:1 out_comment_parent.in:2 out_comment_recipe:1");
}

#[test]
fn test_unpopulated_through_associations() {
    let registry = comments();
    let plan = compile(&registry, "comment", &[], 1);

    assert_snapshot!(plan, @"in_authored_comment:1 out_comment_parent:1 out_comment_recipe:1");
}

#[test]
fn test_all_associations_populated() {
    let registry = comments();
    let plan = compile(&registry, "comment", &["recipe", "author", "parent"], 1);

    assert_snapshot!(plan, @"out_comment_recipe:1 out_comment_recipe.in:1 in_authored_comment:1 in_authored_comment.out:1 out_comment_parent:1 out_comment_parent.in:1");
}

#[test]
fn test_direct_relationships() {
    let registry = stadium();

    assert_eq!(
        compile(&registry, "stadium", &["owner", "teams"], 1),
        "out_owner:1 in_venueTable:1 in_venueTable.out:1"
    );
    assert_eq!(
        compile(&registry, "team", &["sponsors"], 3),
        "in_team_id:1 out_venueTable:1"
    );
}

#[test]
fn test_vertex_without_edges_has_empty_plan() {
    let registry = stadium();
    let joins = JoinPlanner::new(&registry).plan("friend", &[]).unwrap();
    let plan = FetchPlanCompiler::new(&registry)
        .compile("friend", &joins, 1)
        .unwrap();

    assert!(plan.is_empty());
    assert_eq!(plan.to_string(), "");
}

#[test]
fn test_depth_lookup() {
    let registry = comments();
    let joins = JoinPlanner::new(&registry)
        .plan("comment", &["author".into()])
        .unwrap();
    let plan = FetchPlanCompiler::new(&registry)
        .compile("comment", &joins, 4)
        .unwrap();

    assert_eq!(plan.depth_of("in_authored_comment"), Some(1));
    assert_eq!(plan.depth_of("in_authored_comment.out"), Some(4));
    assert_eq!(plan.depth_of("in_authored_comment.in"), None);
    assert_eq!(plan.tokens().len(), 4);
}

#[test]
fn test_serializes_as_string() {
    let registry = stadium();
    let joins = JoinPlanner::new(&registry)
        .plan("stadium", &["teams".into()])
        .unwrap();
    let plan = FetchPlanCompiler::new(&registry)
        .compile("stadium", &joins, 1)
        .unwrap();

    assert_eq!(
        serde_json::to_value(&plan).unwrap(),
        serde_json::json!("in_venueTable:1 in_venueTable.out:1")
    );
}

#[test]
fn test_zero_depth() {
    let registry = comments();
    let result = FetchPlanCompiler::new(&registry).compile("comment", &[], 0);

    assert_eq!(result, Err(PlanError::InvalidDepth(0)));
}

#[test]
fn test_unknown_root() {
    let registry = comments();
    let result = FetchPlanCompiler::new(&registry).compile("post", &[], 1);

    assert_eq!(result, Err(PlanError::UnknownEntity("post".to_string())));
}
