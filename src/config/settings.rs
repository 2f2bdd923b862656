//! TOML-based configuration for the association engine.
//!
//! Supports a config file (linkage.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [schema]
//! path = "${APP_HOME}/schema.toml"
//!
//! [fetch_plan]
//! default_depth = 1
//!
//! [records]
//! id_marker = "@rid"
//! strict_record_ids = true
//! strip_fields = ["@type", "@class", "@version", "@fieldTypes"]
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::planner::fetch_plan::DEFAULT_DEPTH;
use crate::results::{ReferenceOptions, METADATA_FIELDS};
use crate::schema::{SchemaError, SchemaRegistry};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load schema: {0}")]
    Schema(#[from] SchemaError),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Schema declarations.
    pub schema: SchemaSettings,

    /// Fetch-plan compilation.
    pub fetch_plan: FetchPlanSettings,

    /// Record recognition and cleanup.
    pub records: RecordSettings,
}

/// Where to find the schema document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SchemaSettings {
    /// Path to a TOML schema document (supports ${ENV_VAR} expansion).
    pub path: Option<String>,
}

/// Fetch-plan settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchPlanSettings {
    /// Depth used when a query does not specify one.
    pub default_depth: u32,
}

impl Default for FetchPlanSettings {
    fn default() -> Self {
        Self {
            default_depth: DEFAULT_DEPTH,
        }
    }
}

/// Record settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecordSettings {
    /// Field carrying the graph record id.
    pub id_marker: String,

    /// Only treat `#<cluster>:<position>` strings as references. Turn off for
    /// stores whose ids have another shape.
    pub strict_record_ids: bool,

    /// Metadata fields removed from normalized records.
    pub strip_fields: Vec<String>,
}

impl Default for RecordSettings {
    fn default() -> Self {
        Self {
            id_marker: "@rid".to_string(),
            strict_record_ids: true,
            strip_fields: METADATA_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl RecordSettings {
    /// Reference recognition options derived from these settings.
    pub fn reference_options(&self) -> ReferenceOptions {
        ReferenceOptions {
            id_marker: self.id_marker.clone(),
            strict_record_ids: self.strict_record_ids,
            metadata_fields: self.strip_fields.clone(),
        }
    }
}

impl EngineSettings {
    /// Parse settings from TOML text and validate them.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: EngineSettings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `LINKAGE_CONFIG`
    /// 2. `./linkage.toml`
    /// 3. `~/.config/linkage/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("LINKAGE_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("linkage.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("linkage").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(EngineSettings::default())
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.fetch_plan.default_depth == 0 {
            return Err(SettingsError::InvalidConfig(
                "fetch_plan.default_depth must be at least 1".to_string(),
            ));
        }
        if self.records.id_marker.is_empty() {
            return Err(SettingsError::InvalidConfig(
                "records.id_marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured schema path with environment variables expanded.
    pub fn schema_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.schema
            .path
            .as_deref()
            .map(|path| expand_env_vars(path).map(PathBuf::from))
            .transpose()
    }

    /// Load the registry named by `schema.path`.
    pub fn load_registry(&self) -> Result<SchemaRegistry, SettingsError> {
        let path = self.schema_path()?.ok_or_else(|| {
            SettingsError::InvalidConfig("schema.path is not configured".to_string())
        })?;
        Ok(SchemaRegistry::from_file(path)?)
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            // $VAR ends at the first non-alphanumeric/underscore
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                var_name.push(ch);
                chars.next();
            }
            if var_name.is_empty() {
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
