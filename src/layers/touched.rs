//! Touched-layer tracking and stale descriptor cleanup
//!
//! Every layer handed out during a run is recorded here. At the end of
//! the run, descriptors of layers nobody asked for are removed so the
//! lifecycle does not restore or export them.

use crate::error::{KitError, KitResult};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Descriptor files in a layers root that do not belong to a layer
const RESERVED_DESCRIPTORS: &[&str] = &["launch.toml", "store.toml"];

/// Layers referenced during the current run
#[derive(Debug, Clone)]
pub struct TouchedLayers {
    root: PathBuf,
    touched: BTreeSet<String>,
}

impl TouchedLayers {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            touched: BTreeSet::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Mark a layer as touched; returns false if it already was
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        self.touched.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.touched.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.touched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    /// Remove descriptors of untouched layers, returning the removed paths
    ///
    /// A missing layers root or a descriptor that disappears mid-scan is
    /// not an error. Running it again removes nothing further.
    pub fn cleanup(&self) -> KitResult<Vec<PathBuf>> {
        let mut removed = Vec::new();

        for path in self.stale()? {
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!("Removed stale descriptor {}", path.display());
                    removed.push(path);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(KitError::io(
                        format!("removing layer descriptor {}", path.display()),
                        e,
                    ))
                }
            }
        }

        Ok(removed)
    }

    /// Descriptors that cleanup would remove, sorted by layer name
    pub fn stale(&self) -> KitResult<Vec<PathBuf>> {
        Ok(descriptors(&self.root)?
            .into_iter()
            .filter(|(name, _)| !self.touched.contains(name))
            .map(|(_, path)| path)
            .collect())
    }
}

/// Layer descriptors directly under `root` as `(layer name, path)`, sorted by name
pub(crate) fn descriptors(root: &Path) -> KitResult<Vec<(String, PathBuf)>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(KitError::io(
                format!("reading layers root {}", root.display()),
                e,
            ))
        }
    };

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| KitError::io(format!("scanning {}", root.display()), e))?;
        let path = entry.path();

        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if RESERVED_DESCRIPTORS.contains(&file_name) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        found.push((name.to_string(), path.clone()));
    }

    found.sort();
    Ok(found)
}
