//! Configuration schema for cnbkit
//!
//! Configuration is stored at `~/.config/cnbkit/config.toml`

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build context settings
    pub build: BuildConfig,

    /// Synthesized dependency settings
    pub dependency: DependencyConfig,

    /// Log output settings
    pub output: OutputConfig,
}

/// Build context settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Stack the scratch build targets
    pub stack: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            stack: "test-stack".to_string(),
        }
    }
}

/// Settings for dependencies synthesized from fixtures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    /// Version used when none is given
    pub default_version: String,

    /// Base of the URI recorded for each dependency; the fixture name is appended
    pub uri_base: String,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            default_version: "1.0".to_string(),
            uri_base: "http://localhost".to_string(),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Force colored output on or off; unset follows terminal detection
    pub colors: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.build.stack, "test-stack");
        assert_eq!(config.dependency.default_version, "1.0");
        assert_eq!(config.dependency.uri_base, "http://localhost");
        assert_eq!(config.output.colors, None);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[build]
stack = "io.buildpacks.stacks.jammy"
"#,
        )
        .unwrap();

        assert_eq!(config.build.stack, "io.buildpacks.stacks.jammy");
        assert_eq!(config.dependency, DependencyConfig::default());
    }

    #[test]
    fn serialize_roundtrip() {
        let mut config = Config::default();
        config.output.colors = Some(false);
        config.dependency.uri_base = "https://example.com/deps".to_string();

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
