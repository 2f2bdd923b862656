//! Configuration module.
//!
//! Handles the engine settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, EngineSettings, FetchPlanSettings, RecordSettings, SchemaSettings,
    SettingsError,
};
