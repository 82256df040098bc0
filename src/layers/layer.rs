//! A single layer and its descriptor
//!
//! Each layer is a directory `<layers>/<name>/` with a sibling descriptor
//! `<layers>/<name>.toml` holding its flags and a `[metadata]` table.

use crate::error::{KitError, KitResult};
use crate::logger::Logger;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// When a layer is available
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerFlags {
    /// Available to subsequent buildpacks during the build
    #[serde(default, skip_serializing_if = "is_false")]
    pub build: bool,

    /// Restored from cache on the next build
    #[serde(default, skip_serializing_if = "is_false")]
    pub cache: bool,

    /// Part of the launch image
    #[serde(default, skip_serializing_if = "is_false")]
    pub launch: bool,
}

impl LayerFlags {
    pub const fn new(build: bool, cache: bool, launch: bool) -> Self {
        Self {
            build,
            cache,
            launch,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Parsed contents of a layer descriptor file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    #[serde(flatten)]
    pub flags: LayerFlags,

    #[serde(default)]
    pub metadata: toml::Table,
}

/// Handle to one layer under a layers root
#[derive(Debug, Clone)]
pub struct Layer {
    name: String,
    root: PathBuf,
    descriptor: PathBuf,
    logger: Logger,
}

impl Layer {
    pub(crate) fn new(layers_root: &Path, name: &str, logger: Logger) -> Self {
        Self {
            name: name.to_string(),
            root: layers_root.join(name),
            descriptor: layers_root.join(format!("{}.toml", name)),
            logger,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The layer directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The sibling `<name>.toml` descriptor path
    pub fn descriptor_path(&self) -> &Path {
        &self.descriptor
    }

    pub fn descriptor_exists(&self) -> bool {
        self.descriptor.is_file()
    }

    /// Read the descriptor; `None` when it does not exist
    pub fn read_descriptor(&self) -> KitResult<Option<LayerDescriptor>> {
        let content = match fs::read_to_string(&self.descriptor) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(KitError::io(
                    format!("reading layer descriptor {}", self.descriptor.display()),
                    e,
                ))
            }
        };

        toml::from_str(&content)
            .map(Some)
            .map_err(|e| KitError::DescriptorInvalid {
                path: self.descriptor.clone(),
                reason: e.to_string(),
            })
    }

    /// Decode the descriptor's `[metadata]` table
    pub fn read_metadata<M: DeserializeOwned>(&self) -> KitResult<Option<M>> {
        let Some(descriptor) = self.read_descriptor()? else {
            return Ok(None);
        };

        toml::Value::Table(descriptor.metadata)
            .try_into()
            .map(Some)
            .map_err(|e| KitError::DescriptorInvalid {
                path: self.descriptor.clone(),
                reason: e.to_string(),
            })
    }

    /// Flags recorded in the descriptor; all false when there is none
    pub fn flags(&self) -> KitResult<LayerFlags> {
        Ok(self
            .read_descriptor()?
            .map(|descriptor| descriptor.flags)
            .unwrap_or_default())
    }

    /// Whether the descriptor's metadata equals `expected`
    pub fn metadata_matches<M: Serialize>(&self, expected: &M) -> KitResult<bool> {
        let expected = metadata_table(expected)?;
        Ok(self
            .read_descriptor()?
            .is_some_and(|descriptor| descriptor.metadata == expected))
    }

    /// Write the descriptor with `metadata` under `[metadata]`
    pub fn write_metadata<M: Serialize>(&self, metadata: &M, flags: LayerFlags) -> KitResult<()> {
        self.write_descriptor(&LayerDescriptor {
            flags,
            metadata: metadata_table(metadata)?,
        })
    }

    fn write_descriptor(&self, descriptor: &LayerDescriptor) -> KitResult<()> {
        let content = toml::to_string(descriptor)?;
        fs::write(&self.descriptor, content).map_err(|e| {
            KitError::io(
                format!("writing layer descriptor {}", self.descriptor.display()),
                e,
            )
        })?;
        debug!("Wrote descriptor for layer {}", self.name);
        Ok(())
    }

    /// Contribute content to the layer unless it is already up to date
    ///
    /// With `expected` metadata equal to what the descriptor holds, the
    /// layer is reused as-is and `contributor` is not called. Otherwise the
    /// directory is emptied, `contributor` fills it and the descriptor is
    /// rewritten with `flags` and `expected`.
    pub fn contribute<M, F>(
        &self,
        expected: Option<&M>,
        contributor: F,
        flags: LayerFlags,
    ) -> KitResult<()>
    where
        M: Serialize,
        F: FnOnce(&Layer) -> KitResult<()>,
    {
        let metadata = expected.map(metadata_table).transpose()?;

        if let Some(ref metadata) = metadata {
            let current = self.read_descriptor()?;
            if current.is_some_and(|descriptor| &descriptor.metadata == metadata) {
                self.logger.first_line(format_args!(
                    "{}: Reusing cached layer",
                    self.logger.highlight(&self.name)
                ));
                return Ok(());
            }
        }

        self.logger.first_line(format_args!(
            "{}: Contributing to layer",
            self.logger.highlight(&self.name)
        ));

        match fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(KitError::io(
                    format!("clearing layer {}", self.root.display()),
                    e,
                ))
            }
        }
        fs::create_dir_all(&self.root)
            .map_err(|e| KitError::io(format!("creating layer {}", self.root.display()), e))?;

        contributor(self)?;

        self.write_descriptor(&LayerDescriptor {
            flags,
            metadata: metadata.unwrap_or_default(),
        })
    }
}

fn metadata_table<M: Serialize>(metadata: &M) -> KitResult<toml::Table> {
    match toml::Value::try_from(metadata)? {
        toml::Value::Table(table) => Ok(table),
        other => Err(KitError::User(format!(
            "layer metadata must be a table, got {}",
            other.type_str()
        ))),
    }
}
