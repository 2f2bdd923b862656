//! # Linkage
//!
//! Association resolution between an object-model layer and a graph store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Schema (builder or TOML)                 │
//! │       (vertices, edges, relationship descriptors)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [schema registry]
//! ┌─────────────────────────────────────────────────────────┐
//! │            SchemaRegistry (validated, read-only)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [join planner]
//! ┌─────────────────────────────────────────────────────────┐
//! │                     Vec<JoinStep>                        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [fetch-plan compiler]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Fetch plan  (in_edge:1 in_edge.out:2 out_other:1)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [graph store, external]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Raw records → expander → normalizer → consumer       │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod engine;
pub mod model;
pub mod planner;
pub mod results;
pub mod schema;

pub use config::EngineSettings;
pub use engine::{AssociationEngine, ReadPlan};
pub use schema::SchemaRegistry;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{EngineSettings, SettingsError};
    pub use crate::engine::{AssociationEngine, ReadPlan};
    pub use crate::model::{
        AttributeDescriptor, Cardinality, Direction, EntityDescriptor, EntityKind, RecordId,
        RelationshipDescriptor, ScalarType,
    };
    pub use crate::planner::{
        Criteria, FetchPlan, FetchPlanCompiler, JoinPlanner, JoinStep, PlanError,
        PopulateRequest,
    };
    pub use crate::results::{
        RecordNormalizer, ReferenceExtractor, ReferenceOptions, ResultExpander,
    };
    pub use crate::schema::{SchemaError, SchemaRegistry};
}
