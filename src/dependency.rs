//! Buildpack dependency records
//!
//! A dependency is an artifact a buildpack downloads and installs into a
//! layer. Its `sha256` doubles as the name of the content-addressed layer
//! the artifact is cached in.

use crate::error::{KitError, KitResult};
use crate::stack::Stack;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// A dependency version
///
/// Keeps the text it was written as (`"1.0"`) for display and
/// serialization, and a semantic version for comparison. Missing minor or
/// patch components are treated as zero.
#[derive(Debug, Clone)]
pub struct Version {
    original: String,
    semver: semver::Version,
}

impl Version {
    pub fn parse(text: &str) -> KitResult<Self> {
        let invalid = |reason: &str| KitError::VersionInvalid {
            version: text.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = text.trim();
        let unprefixed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        if unprefixed.is_empty() {
            return Err(invalid("version is empty"));
        }

        // Split off "-pre" / "+build" so only the numeric core is padded
        let core_end = unprefixed
            .find(|c: char| c == '-' || c == '+')
            .unwrap_or(unprefixed.len());
        let (core, suffix) = unprefixed.split_at(core_end);

        let mut components: Vec<&str> = core.split('.').map(strip_leading_zeros).collect();
        if components.len() > 3 {
            return Err(invalid("more than three numeric components"));
        }
        while components.len() < 3 {
            components.push("0");
        }

        let normalized = format!("{}{}", components.join("."), suffix);
        let semver = semver::Version::parse(&normalized).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            original: text.to_string(),
            semver,
        })
    }

    /// The version as originally written
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn semver(&self) -> &semver::Version {
        &self.semver
    }
}

/// "01" -> "1", "00" -> "0"; non-numeric components are left for semver to reject
fn strip_leading_zeros(component: &str) -> &str {
    if component.len() > 1 && component.bytes().all(|b| b.is_ascii_digit()) {
        let stripped = component.trim_start_matches('0');
        if stripped.is_empty() {
            "0"
        } else {
            stripped
        }
    } else {
        component
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.semver == other.semver
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.semver.cmp(&other.semver)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Version::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// A license a dependency is distributed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// SPDX identifier, e.g. `Apache-2.0`
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
}

/// A dependency declared in buildpack metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: String,

    /// Human readable name; also the artifact's file name inside its cache layer
    pub name: String,

    pub version: Version,

    pub uri: String,

    /// Hex-encoded digest naming the cache layer
    pub sha256: String,

    #[serde(default)]
    pub stacks: BTreeSet<Stack>,

    #[serde(default)]
    pub licenses: Vec<License>,
}

impl Dependency {
    /// Name of the content-addressed layer this dependency is cached in
    pub fn cache_layer_name(&self) -> &str {
        &self.sha256
    }

    pub fn supports(&self, stack: &Stack) -> bool {
        self.stacks.contains(stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_keeps_original_text() {
        let version = Version::parse("1.0").unwrap();
        assert_eq!(version.original(), "1.0");
        assert_eq!(version.to_string(), "1.0");
        assert_eq!(version.semver(), &semver::Version::new(1, 0, 0));
    }

    #[test]
    fn version_pads_prerelease() {
        let version = Version::parse("v2.1-beta.1").unwrap();
        assert_eq!(version.semver().to_string(), "2.1.0-beta.1");
    }

    #[test]
    fn version_accepts_leading_zeros() {
        let version = Version::parse("01.0").unwrap();
        assert_eq!(version.original(), "01.0");
        assert_eq!(version.semver(), &semver::Version::new(1, 0, 0));
        assert_eq!(
            Version::parse("2.010.00").unwrap().semver(),
            &semver::Version::new(2, 10, 0)
        );
    }

    #[test]
    fn version_orders_semantically() {
        let older = Version::parse("1.9").unwrap();
        let newer = Version::parse("1.10.0").unwrap();
        assert!(older < newer);
        assert_eq!(Version::parse("1").unwrap(), Version::parse("1.0.0").unwrap());
    }

    #[test]
    fn version_rejects_garbage() {
        assert!(Version::parse("").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
        assert!(Version::parse("latest").is_err());
    }

    #[test]
    fn dependency_toml_shape() {
        let dependency = Dependency {
            id: "test-id".to_string(),
            name: "test-name".to_string(),
            version: Version::parse("1.0").unwrap(),
            uri: "http://localhost/test-name".to_string(),
            sha256: "abc123".to_string(),
            stacks: [Stack::new("test-stack")].into(),
            licenses: vec![License {
                kind: "Apache-2.0".to_string(),
                uri: String::new(),
            }],
        };

        let value = toml::Value::try_from(&dependency).unwrap();
        let table = value.as_table().unwrap();
        assert_eq!(table["version"].as_str(), Some("1.0"));
        assert_eq!(table["stacks"].as_array().unwrap().len(), 1);
        assert_eq!(
            table["licenses"].as_array().unwrap()[0]["type"].as_str(),
            Some("Apache-2.0")
        );

        let parsed: Dependency = value.try_into().unwrap();
        assert_eq!(parsed, dependency);
        assert!(parsed.supports(&Stack::new("test-stack")));
        assert!(!parsed.supports(&Stack::new("other-stack")));
    }
}
