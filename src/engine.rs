//! End-to-end association resolution.
//!
//! Ties the planner and the result processors together for one read:
//!
//! ```text
//! populate aliases → JoinPlanner → Vec<JoinStep> → FetchPlanCompiler → fetch plan
//!                                                                       │
//!                                                              (graph store query)
//!                                                                       ▼
//!              consumer records ← RecordNormalizer ← ResultExpander ← raw records
//! ```
//!
//! # Example
//!
//! ```ignore
//! use linkage::config::EngineSettings;
//! use linkage::engine::AssociationEngine;
//! use linkage::schema::SchemaRegistry;
//!
//! let registry = SchemaRegistry::from_file("schema.toml")?;
//! let settings = EngineSettings::load()?;
//! let engine = AssociationEngine::new(&registry, &settings);
//!
//! let plan = engine.plan_read("comment", &["author".into()], None)?;
//! println!("{}", plan.fetch_plan);
//!
//! let records = engine.process_results(&plan, raw_records)?;
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::config::EngineSettings;
use crate::planner::{
    FetchPlan, FetchPlanCompiler, JoinPlanner, JoinStep, PlanError, PlanResult, PopulateRequest,
};
use crate::results::{RecordNormalizer, ReferenceOptions, ResultExpander};
use crate::schema::SchemaRegistry;

/// Everything needed to run one populated read and post-process its results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadPlan {
    /// Entity the query starts from.
    pub root: String,

    /// Join steps, in request order.
    pub joins: Vec<JoinStep>,

    /// Fetch plan handed to the graph store.
    pub fetch_plan: FetchPlan,

    /// Depth the fetch plan was compiled with.
    pub depth: u32,
}

pub struct AssociationEngine<'a> {
    registry: &'a SchemaRegistry,
    settings: &'a EngineSettings,
    options: ReferenceOptions,
}

impl<'a> AssociationEngine<'a> {
    pub fn new(registry: &'a SchemaRegistry, settings: &'a EngineSettings) -> Self {
        Self {
            registry,
            settings,
            options: settings.records.reference_options(),
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        self.registry
    }

    pub fn reference_options(&self) -> &ReferenceOptions {
        &self.options
    }

    /// Plan joins and compile the fetch plan for a read of `root`.
    ///
    /// A missing depth falls back to `fetch_plan.default_depth`.
    pub fn plan_read(
        &self,
        root: &str,
        requests: &[PopulateRequest],
        depth: Option<u32>,
    ) -> PlanResult<ReadPlan> {
        let depth = depth.unwrap_or(self.settings.fetch_plan.default_depth);
        let joins = JoinPlanner::new(self.registry).plan(root, requests)?;
        let fetch_plan = FetchPlanCompiler::new(self.registry).compile(root, &joins, depth)?;

        Ok(ReadPlan {
            root: root.to_string(),
            joins,
            fetch_plan,
            depth,
        })
    }

    /// Expand a result batch, then normalize every record against the plan's root.
    pub fn process_results(&self, plan: &ReadPlan, records: Vec<Value>) -> PlanResult<Vec<Value>> {
        let root = self
            .registry
            .entity(&plan.root)
            .ok_or_else(|| PlanError::UnknownEntity(plan.root.clone()))?;

        let count = records.len();
        let expanded = ResultExpander::new(&self.options).expand(records);
        let normalizer =
            RecordNormalizer::new(self.registry, &self.options, &self.settings.records.strip_fields);
        let processed = expanded
            .into_iter()
            .map(|record| normalizer.normalize(root, &plan.joins, record))
            .collect();

        tracing::debug!(root = %plan.root, records = count, "processed result batch");
        Ok(processed)
    }
}
