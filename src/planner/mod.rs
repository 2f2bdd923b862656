//! Association planner - converts populate requests into graph fetch plans.
//!
//! Two-phase architecture:
//! 1. Join Planning: populate aliases → Vec<JoinStep> (relationship kinds resolved once)
//! 2. Fetch-Plan Compilation: Vec<JoinStep> + depth → traversal-depth expression

pub mod fetch_plan;
pub mod join_planner;
pub mod join_step;

pub use fetch_plan::{FetchPlan, FetchPlanCompiler, FetchToken};
pub use join_planner::JoinPlanner;
pub use join_step::{Criteria, JoinStep, PopulateRequest, Traversal};

use thiserror::Error;

/// Errors that can occur during planning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("Unknown entity: '{0}'")]
    UnknownEntity(String),

    #[error("Unknown attribute '{attribute}' on entity '{entity}'")]
    UnknownAttribute { entity: String, attribute: String },

    #[error("Attribute '{attribute}' on entity '{entity}' is not a relationship")]
    NotARelationship { entity: String, attribute: String },

    #[error("Invalid relationship '{entity}.{attribute}': {reason}")]
    InvalidRelationship {
        entity: String,
        attribute: String,
        reason: String,
    },

    #[error("Invalid fetch plan depth: {0} (must be at least 1)")]
    InvalidDepth(u32),
}

pub type PlanResult<T> = Result<T, PlanError>;
