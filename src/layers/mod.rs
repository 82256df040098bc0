//! Layer registry
//!
//! `Layers` hands out layer directories under a layers root, remembers
//! which ones were touched during the run and, through
//! [`TouchedLayers::cleanup`], drops the descriptors of the rest.
//!
//! # Layout
//!
//! ```text
//! <layers>/
//!   <name>/        layer content
//!   <name>.toml    descriptor: build/cache/launch flags + [metadata]
//! ```
//!
//! Dependency artifacts live in content-addressed layers named after
//! their `sha256`, either in the layers root or in the buildpack cache.

pub mod launch;
pub mod layer;
pub mod touched;

pub use launch::{LaunchMetadata, Process};
pub use layer::{Layer, LayerDescriptor, LayerFlags};
pub use touched::TouchedLayers;

use crate::dependency::Dependency;
use crate::error::{KitError, KitResult};
use crate::logger::Logger;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Names whose descriptor would clash with lifecycle files
const RESERVED_LAYER_NAMES: &[&str] = &["launch", "store"];

/// Layers of the current build
#[derive(Debug, Clone)]
pub struct Layers {
    root: PathBuf,
    buildpack_cache: PathBuf,
    touched: TouchedLayers,
    logger: Logger,
}

impl Layers {
    pub fn new(
        root: impl Into<PathBuf>,
        buildpack_cache: impl Into<PathBuf>,
        logger: Logger,
    ) -> Self {
        let root = root.into();
        Self {
            touched: TouchedLayers::new(root.clone()),
            root,
            buildpack_cache: buildpack_cache.into(),
            logger,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn buildpack_cache_root(&self) -> &Path {
        &self.buildpack_cache
    }

    pub fn touched_layers(&self) -> &TouchedLayers {
        &self.touched
    }

    /// The named layer, creating its directory if needed and marking it touched
    pub fn layer(&mut self, name: &str) -> KitResult<Layer> {
        validate_layer_name(name)?;

        let layer = Layer::new(&self.root, name, self.logger.clone());
        fs::create_dir_all(layer.root())
            .map_err(|e| KitError::io(format!("creating layer {}", layer.root().display()), e))?;

        if self.touched.add(name) {
            debug!("Touched layer {}", name);
        }
        Ok(layer)
    }

    /// Handles for every layer with a descriptor on disk, without touching them
    pub fn existing(&self) -> KitResult<Vec<Layer>> {
        Ok(touched::descriptors(&self.root)?
            .into_iter()
            .map(|(name, _)| Layer::new(&self.root, &name, self.logger.clone()))
            .collect())
    }

    /// Locate a cached artifact for `dependency`
    ///
    /// Looks in the `<sha256>` layer of the layers root, then of the
    /// buildpack cache. A hit requires the descriptor metadata to equal the
    /// dependency and `<layer>/<name>` to exist. A hit in the layers root
    /// touches that layer.
    pub fn cached_artifact(&mut self, dependency: &Dependency) -> KitResult<Option<PathBuf>> {
        let name = dependency.cache_layer_name();
        validate_layer_name(name)?;

        let local = Layer::new(&self.root, name, self.logger.clone());
        if let Some(artifact) = artifact_in(&local, dependency)? {
            self.touched.add(name);
            debug!("Found {} in layer {}", dependency.id, name);
            return Ok(Some(artifact));
        }

        let cached = Layer::new(&self.buildpack_cache, name, self.logger.clone());
        let artifact = artifact_in(&cached, dependency)?;
        if artifact.is_some() {
            debug!("Found {} in buildpack cache", dependency.id);
        }
        Ok(artifact)
    }

    /// Log the declared process types
    ///
    /// The metadata is serialized to the debug stream; the info stream gets a
    /// `Process types:` headline followed by one aligned line per process.
    pub fn write_metadata(&self, metadata: &LaunchMetadata) -> KitResult<()> {
        let serialized = toml::to_string(metadata)?;
        debug!("Launch metadata: {}", serialized.trim_end());
        if self.logger.is_debug_enabled() {
            self.logger.debug(format_args!("Writing launch metadata:\n{}", serialized));
        }

        if metadata.processes.is_empty() {
            return Ok(());
        }

        self.logger.first_line("Process types:");
        for line in metadata.process_lines(&self.logger) {
            self.logger.subsequent_line(line);
        }

        Ok(())
    }
}

fn artifact_in(layer: &Layer, dependency: &Dependency) -> KitResult<Option<PathBuf>> {
    if !layer.metadata_matches(dependency)? {
        return Ok(None);
    }

    let artifact = layer.root().join(&dependency.name);
    Ok(artifact.is_file().then_some(artifact))
}

/// Reject names that would escape the layers root or collide with lifecycle files
pub fn validate_layer_name(name: &str) -> KitResult<()> {
    if name.is_empty() {
        return Err(KitError::layer_name(name, "must not be empty"));
    }
    if name.contains('/') || name.contains('\\') || name.contains('\0') {
        return Err(KitError::layer_name(name, "must not contain path separators"));
    }
    if name == "." || name == ".." {
        return Err(KitError::layer_name(name, "must not be '.' or '..'"));
    }
    if RESERVED_LAYER_NAMES.contains(&name) {
        return Err(KitError::layer_name(name, "is reserved"));
    }
    Ok(())
}
