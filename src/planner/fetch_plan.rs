//! Fetch-plan compilation.
//!
//! A fetch plan tells the graph store how deep to eagerly resolve each
//! traversal path, e.g.:
//!
//! ```text
//! in_authored_comment:1 in_authored_comment.out:2 out_comment_recipe:1
//! ```
//!
//! Link hops are always fetched one level deep; the far hop of a through
//! association carries the requested depth.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::model::RelationshipKind;
use crate::planner::{JoinStep, PlanError, PlanResult, Traversal};
use crate::schema::SchemaRegistry;

/// Depth used when the caller does not ask for one.
pub const DEFAULT_DEPTH: u32 = 1;

/// A single `<path>:<depth>` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchToken {
    pub path: String,
    pub depth: u32,
}

impl fmt::Display for FetchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.depth)
    }
}

/// A compiled fetch-plan expression. Each path appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPlan {
    tokens: Vec<FetchToken>,
}

impl FetchPlan {
    pub fn tokens(&self) -> &[FetchToken] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Depth recorded for a path, if present.
    pub fn depth_of(&self, path: &str) -> Option<u32> {
        self.tokens
            .iter()
            .find(|token| token.path == path)
            .map(|token| token.depth)
    }

    fn push(&mut self, seen: &mut HashSet<String>, path: String, depth: u32) {
        if seen.insert(path.clone()) {
            self.tokens.push(FetchToken { path, depth });
        }
    }
}

impl fmt::Display for FetchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl Serialize for FetchPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub struct FetchPlanCompiler<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> FetchPlanCompiler<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Compile join steps for `root` into a fetch plan at the given depth.
    ///
    /// Tokens follow join-step order. Through associations declared on the
    /// root but not populated still fetch their edge hop at depth 1, after
    /// the planned tokens and in declaration order.
    pub fn compile(&self, root: &str, joins: &[JoinStep], depth: u32) -> PlanResult<FetchPlan> {
        if depth == 0 {
            return Err(PlanError::InvalidDepth(depth));
        }
        let root_entity = self
            .registry
            .entity(root)
            .ok_or_else(|| PlanError::UnknownEntity(root.to_string()))?;

        let mut plan = FetchPlan::default();
        let mut seen = HashSet::new();
        let mut previous: Option<(&JoinStep, String)> = None;

        for step in joins {
            if step.junction_table {
                let base = match &previous {
                    Some((prev, path)) if prev.child == step.parent => path.clone(),
                    _ => Traversal::new(step.traversal.direction.opposite(), &step.traversal.field)
                        .adjacency_field(),
                };
                let path = format!("{}.{}", base, step.traversal.direction);
                plan.push(&mut seen, path, depth);
            } else {
                let path = step.traversal.adjacency_field();
                plan.push(&mut seen, path.clone(), 1);
                previous = Some((step, path));
            }
        }

        let populated: HashSet<&str> = joins.iter().map(|step| step.alias.as_str()).collect();
        for (attr, rel) in root_entity.relationships() {
            let RelationshipKind::ThroughJoin { junction } = rel.kind() else {
                continue;
            };
            if populated.contains(attr.name.as_str()) {
                continue;
            }
            let Some(junction_entity) = self.registry.entity(junction) else {
                continue;
            };
            let Some(side) = rel
                .via
                .as_deref()
                .and_then(|via| junction_entity.kind.side_of(via))
            else {
                continue;
            };
            let path = Traversal::new(side, &junction_entity.table_name).adjacency_field();
            plan.push(&mut seen, path, 1);
        }

        tracing::debug!(root, depth, plan = %plan, "compiled fetch plan");
        Ok(plan)
    }
}
