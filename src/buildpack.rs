//! Buildpack descriptor and metadata
//!
//! `buildpack.toml` carries a free-form `[metadata]` table. The one key
//! this crate interprets is `dependencies`, an ordered array of
//! [`Dependency`] records; everything else is kept as-is for the
//! buildpack to read.

use crate::dependency::Dependency;
use crate::error::{KitError, KitResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metadata key holding the dependency array
pub const DEPENDENCIES_KEY: &str = "dependencies";

/// Buildpack metadata: dependency records plus arbitrary keyed values
///
/// The `dependencies` array exists from construction on and only grows.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    table: toml::Table,
}

impl Metadata {
    pub fn new() -> Self {
        Self::from_table(toml::Table::new())
    }

    /// Wrap an existing table, adding an empty `dependencies` array if missing
    pub fn from_table(mut table: toml::Table) -> Self {
        table
            .entry(DEPENDENCIES_KEY)
            .or_insert_with(|| toml::Value::Array(Vec::new()));
        Self { table }
    }

    /// Append a dependency record
    pub fn add_dependency(&mut self, dependency: &Dependency) -> KitResult<()> {
        let record = toml::Value::try_from(dependency)?;
        match self.table.get_mut(DEPENDENCIES_KEY) {
            Some(toml::Value::Array(dependencies)) => {
                dependencies.push(record);
                Ok(())
            }
            _ => Err(KitError::User(format!(
                "buildpack metadata '{}' is not an array",
                DEPENDENCIES_KEY
            ))),
        }
    }

    /// Decode the dependency records in insertion order
    pub fn dependencies(&self) -> KitResult<Vec<Dependency>> {
        match self.table.get(DEPENDENCIES_KEY) {
            Some(toml::Value::Array(dependencies)) => dependencies
                .iter()
                .map(|record| record.clone().try_into::<Dependency>().map_err(KitError::from))
                .collect(),
            _ => Ok(Vec::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.table.get(key)
    }

    /// Set a buildpack-specific value; the dependency array cannot be replaced
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<toml::Value>,
    ) -> KitResult<()> {
        let key = key.into();
        if key == DEPENDENCIES_KEY {
            return Err(KitError::User(format!(
                "'{}' is managed through add_dependency",
                DEPENDENCIES_KEY
            )));
        }
        self.table.insert(key, value.into());
        Ok(())
    }

    pub fn as_table(&self) -> &toml::Table {
        &self.table
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

/// `[buildpack]` section of `buildpack.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildpackInfo {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Deserialize)]
struct BuildpackToml {
    #[serde(default)]
    buildpack: BuildpackInfo,

    #[serde(default)]
    metadata: toml::Table,
}

/// The buildpack being run
#[derive(Debug, Clone)]
pub struct Buildpack {
    pub root: PathBuf,
    pub info: BuildpackInfo,
    pub metadata: Metadata,
}

impl Buildpack {
    /// A buildpack rooted at `root` with empty metadata
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            info: BuildpackInfo::default(),
            metadata: Metadata::new(),
        }
    }

    /// Read `buildpack.toml` under `root`; a missing file yields empty metadata
    pub fn load(root: impl Into<PathBuf>) -> KitResult<Self> {
        let root = root.into();
        let path = root.join("buildpack.toml");

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No buildpack.toml at {}", path.display());
                return Ok(Self::new(root));
            }
            Err(e) => return Err(KitError::io(format!("reading {}", path.display()), e)),
        };

        let parsed: BuildpackToml =
            toml::from_str(&content).map_err(|e| KitError::DescriptorInvalid {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            root,
            info: parsed.buildpack,
            metadata: Metadata::from_table(parsed.metadata),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
