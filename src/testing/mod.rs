//! Test scaffolding for buildpack authors
//!
//! [`BuildFactory`] assembles a complete [`Build`](crate::build::Build)
//! in a scratch directory, seeds dependencies from fixture files and
//! captures log output and the produced build plan. The free functions
//! cover the small file-system chores tests keep repeating.
//!
//! Helpers return [`KitResult`]; the calling test decides to abort,
//! usually with `unwrap()`.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut factory = BuildFactory::new()?;
//! let jdk = factory.add_dependency("openjdk-jdk", "fixtures/stub-jdk.tar.gz")?;
//!
//! my_buildpack::build(factory.build_mut())?;
//!
//! let layer = factory.build_mut().layers.layer("openjdk-jdk")?;
//! assert_layer_flags(&layer, LayerFlags::new(true, true, false));
//! assert!(factory.info_log().contains("Contributing to layer"));
//! ```

mod factory;
mod hash;

pub use factory::BuildFactory;
pub use hash::{FixtureHasher, SyntheticHash};

use crate::error::{KitError, KitResult};
use crate::layers::{Layer, LayerFlags};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tempfile::TempDir;

/// In-memory sink for captured log output
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn clear(&self) {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A fresh scratch directory, removed when the returned handle drops
pub fn scratch_dir(prefix: &str) -> KitResult<TempDir> {
    tempfile::Builder::new()
        .prefix(&format!("{}-", prefix))
        .tempdir()
        .map_err(|e| KitError::io(format!("creating scratch directory {}", prefix), e))
}

/// Create an empty file `dir/name`, creating parent directories
pub fn touch_file(dir: impl AsRef<Path>, name: &str) -> KitResult<PathBuf> {
    let path = dir.as_ref().join(name);
    write_file(&path, "")?;
    Ok(path)
}

/// Write `contents` to `path`, creating parent directories
pub fn write_file(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> KitResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| KitError::io(format!("creating directory {}", parent.display()), e))?;
    }
    fs::write(path, contents).map_err(|e| KitError::io(format!("writing {}", path.display()), e))
}

/// Copy `source` to `destination`, creating parent directories
pub fn copy_file(source: &Path, destination: &Path) -> KitResult<()> {
    if !source.is_file() {
        return Err(KitError::FixtureNotFound(source.to_path_buf()));
    }
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| KitError::io(format!("creating directory {}", parent.display()), e))?;
    }
    fs::copy(source, destination).map_err(|e| {
        KitError::io(
            format!("copying {} to {}", source.display(), destination.display()),
            e,
        )
    })?;
    Ok(())
}

/// Assert that a layer's descriptor holds `expected` as its metadata
#[track_caller]
pub fn assert_layer_metadata<M: Serialize + fmt::Debug>(layer: &Layer, expected: &M) {
    match layer.metadata_matches(expected) {
        Ok(true) => {}
        Ok(false) => {
            let actual = layer.read_descriptor().ok().flatten().map(|d| d.metadata);
            panic!(
                "layer {} metadata mismatch\n  expected: {:?}\n    actual: {:?}",
                layer.name(),
                expected,
                actual
            );
        }
        Err(e) => panic!("layer {}: {}", layer.name(), e),
    }
}

/// Assert that a layer's descriptor carries exactly `expected` flags
#[track_caller]
pub fn assert_layer_flags(layer: &Layer, expected: LayerFlags) {
    match layer.flags() {
        Ok(actual) => assert_eq!(
            actual,
            expected,
            "layer {} flags mismatch",
            layer.name()
        ),
        Err(e) => panic!("layer {}: {}", layer.name(), e),
    }
}
