//! Launch metadata: the process types a buildpack declares

use crate::error::{KitError, KitResult};
use crate::logger::Logger;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A process type and the command that starts it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    #[serde(rename = "type")]
    pub kind: String,

    pub command: String,
}

impl Process {
    pub fn new(kind: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            command: command.into(),
        }
    }
}

/// Contents of `launch.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchMetadata {
    #[serde(default)]
    pub processes: Vec<Process>,
}

impl LaunchMetadata {
    pub fn new(processes: Vec<Process>) -> Self {
        Self { processes }
    }

    pub fn parse(content: &str) -> KitResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> KitResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| KitError::io(format!("reading launch metadata {}", path.display()), e))?;
        toml::from_str(&content).map_err(|e| KitError::DescriptorInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Lines listing each process, type names right-aligned to the longest
    ///
    /// Padding is computed on the plain type name so colored output lines
    /// up the same way as plain output.
    pub fn process_lines(&self, logger: &Logger) -> Vec<String> {
        let width = self
            .processes
            .iter()
            .map(|process| process.kind.chars().count())
            .max()
            .unwrap_or(0);

        self.processes
            .iter()
            .map(|process| {
                let padding = " ".repeat(width - process.kind.chars().count());
                format!(
                    "{}{}: {}",
                    padding,
                    logger.highlight(&process.kind),
                    process.command
                )
            })
            .collect()
    }
}
