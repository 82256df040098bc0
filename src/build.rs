//! Build context
//!
//! Everything a buildpack's build phase is handed: the application,
//! the buildpack itself, the platform, the layers to contribute to, the
//! incoming build plan and a way to report the outgoing one.

use crate::buildpack::Buildpack;
use crate::buildplan::BuildPlan;
use crate::error::KitResult;
use crate::layers::Layers;
use crate::logger::Logger;
use crate::stack::Stack;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Callback receiving the build plan a successful build produced
pub type BuildPlanWriter = Box<dyn FnMut(&BuildPlan) -> KitResult<()>>;

/// The application being built
#[derive(Debug, Clone)]
pub struct Application {
    pub root: PathBuf,
}

impl Application {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Platform-provided inputs
#[derive(Debug, Clone)]
pub struct Platform {
    pub root: PathBuf,
}

impl Platform {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of platform environment variable files
    pub fn env_dir(&self) -> PathBuf {
        self.root.join("env")
    }
}

/// Build phase context
pub struct Build {
    pub application: Application,
    pub buildpack: Buildpack,
    /// Build plan entries this buildpack was asked to provide
    pub build_plan: BuildPlan,
    pub build_plan_writer: BuildPlanWriter,
    pub layers: Layers,
    pub logger: Logger,
    pub platform: Platform,
    pub stack: Stack,
}

impl Build {
    /// Finish the build: drop stale layer descriptors and report `build_plan`
    ///
    /// Returns the process exit code for a successful build.
    pub fn success(&mut self, build_plan: BuildPlan) -> KitResult<i32> {
        let removed = self.layers.touched_layers().cleanup()?;
        debug!("Removed {} stale layer descriptor(s)", removed.len());

        (self.build_plan_writer)(&build_plan)?;
        Ok(0)
    }
}

impl fmt::Debug for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Build")
            .field("application", &self.application)
            .field("buildpack", &self.buildpack)
            .field("build_plan", &self.build_plan)
            .field("layers", &self.layers)
            .field("platform", &self.platform)
            .field("stack", &self.stack)
            .finish_non_exhaustive()
    }
}
