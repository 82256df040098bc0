//! Stack identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// The stack a build runs on, e.g. `io.buildpacks.stacks.jammy`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stack(String);

impl Stack {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Stack {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Stack {
    fn from(id: String) -> Self {
        Self(id)
    }
}
