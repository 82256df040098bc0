//! Build plan model
//!
//! A build plan maps a requirement name (e.g. `openjdk-jre`) to the
//! version and metadata that satisfies it. Buildpacks read the plan they
//! were given and hand the plan they produced back through
//! [`Build::success`](crate::build::Build::success).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Requirement name to satisfying dependency
pub type BuildPlan = BTreeMap<String, BuildPlanDependency>;

/// One entry of a build plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildPlanDependency {
    /// Version constraint or resolved version; empty when unconstrained
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    /// Free-form metadata shared between buildpacks
    #[serde(default, skip_serializing_if = "toml::Table::is_empty")]
    pub metadata: toml::Table,
}

impl BuildPlanDependency {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            metadata: toml::Table::new(),
        }
    }

    /// Add one metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
