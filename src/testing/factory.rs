//! Scratch build factory

use super::hash::{FixtureHasher, SyntheticHash};
use super::{copy_file, scratch_dir, Buffer};
use crate::build::{Application, Build, Platform};
use crate::buildpack::Buildpack;
use crate::buildplan::{BuildPlan, BuildPlanDependency};
use crate::config::{Config, DependencyConfig};
use crate::dependency::{Dependency, Version};
use crate::error::{KitError, KitResult};
use crate::layers::{LayerFlags, Layers};
use crate::logger::Logger;
use crate::stack::Stack;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;
use tracing::debug;

const APPLICATION_DIR: &str = "application";
const BUILDPACK_DIR: &str = "buildpack";
const PLATFORM_DIR: &str = "platform";
const LAYERS_DIR: &str = "layers";
const BUILDPACK_CACHE_DIR: &str = "buildpack-cache";
const HOME_DIR: &str = "home";

/// Builds an isolated [`Build`] for a single test
///
/// Everything lives under a private scratch directory that is removed when
/// the factory drops:
///
/// ```text
/// <scratch>/application
/// <scratch>/buildpack
/// <scratch>/platform
/// <scratch>/layers
/// <scratch>/buildpack-cache
/// <scratch>/home
/// ```
pub struct BuildFactory {
    build: Build,
    home: PathBuf,
    output: Rc<RefCell<Option<BuildPlan>>>,
    info: Buffer,
    debug: Buffer,
    hasher: Box<dyn FixtureHasher>,
    dependency: DependencyConfig,
    scratch: TempDir,
}

impl BuildFactory {
    /// A factory with default settings
    pub fn new() -> KitResult<Self> {
        Self::with_config(&Config::default())
    }

    /// A factory using the stack, dependency and color settings of `config`
    ///
    /// Output is uncolored unless `config.output.colors` asks for color.
    pub fn with_config(config: &Config) -> KitResult<Self> {
        let scratch = scratch_dir("build")?;
        let root = scratch.path();

        for dir in [
            APPLICATION_DIR,
            BUILDPACK_DIR,
            PLATFORM_DIR,
            LAYERS_DIR,
            BUILDPACK_CACHE_DIR,
            HOME_DIR,
        ] {
            let path = root.join(dir);
            fs::create_dir_all(&path)
                .map_err(|e| KitError::io(format!("creating {}", path.display()), e))?;
        }

        let info = Buffer::new();
        let debug = Buffer::new();
        let logger = Logger::default()
            .with_info(info.clone())
            .with_debug(debug.clone())
            .with_colors(config.output.colors.unwrap_or(false));

        let output = Rc::new(RefCell::new(None));
        let captured = Rc::clone(&output);

        let build = Build {
            application: Application::new(root.join(APPLICATION_DIR)),
            buildpack: Buildpack::new(root.join(BUILDPACK_DIR)),
            build_plan: BuildPlan::new(),
            build_plan_writer: Box::new(move |plan: &BuildPlan| {
                *captured.borrow_mut() = Some(plan.clone());
                Ok(())
            }),
            layers: Layers::new(
                root.join(LAYERS_DIR),
                root.join(BUILDPACK_CACHE_DIR),
                logger.clone(),
            ),
            logger,
            platform: Platform::new(root.join(PLATFORM_DIR)),
            stack: Stack::new(config.build.stack.as_str()),
        };

        let home = root.join(HOME_DIR);
        debug!("Created scratch build at {}", root.display());

        Ok(Self {
            build,
            home,
            output,
            info,
            debug,
            hasher: Box::new(SyntheticHash),
            dependency: config.dependency.clone(),
            scratch,
        })
    }

    /// Replace the strategy deriving cache layer names from dependency ids
    pub fn with_hasher(mut self, hasher: impl FixtureHasher + 'static) -> Self {
        self.hasher = Box::new(hasher);
        self
    }

    /// Insert or overwrite one entry of the incoming build plan
    pub fn add_build_plan(&mut self, name: impl Into<String>, dependency: BuildPlanDependency) {
        self.build.build_plan.insert(name.into(), dependency);
    }

    /// Add a dependency at the default version, cached from `fixture`
    pub fn add_dependency(&mut self, id: &str, fixture: impl AsRef<Path>) -> KitResult<Dependency> {
        let version = self.dependency.default_version.clone();
        self.add_dependency_with_version(id, &version, fixture)
    }

    /// Add a dependency to the buildpack metadata and copy `fixture` into its cache layer
    ///
    /// The cache layer is named after the synthetic hash of `id`, so adding
    /// the same id twice reuses the layer: the later fixture and descriptor
    /// replace the earlier ones while both records stay in the metadata.
    pub fn add_dependency_with_version(
        &mut self,
        id: &str,
        version: &str,
        fixture: impl AsRef<Path>,
    ) -> KitResult<Dependency> {
        let fixture = fixture.as_ref();

        let dependency = self.new_dependency(id, version, fixture)?;
        self.cache_fixture(&dependency, fixture)?;
        self.build.buildpack.metadata.add_dependency(&dependency)?;

        debug!(
            "Added dependency {} {} in layer {}",
            dependency.id, dependency.version, dependency.sha256
        );
        Ok(dependency)
    }

    fn new_dependency(&self, id: &str, version: &str, fixture: &Path) -> KitResult<Dependency> {
        let name = fixture
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| KitError::FixtureNotFound(fixture.to_path_buf()))?;

        Ok(Dependency {
            id: id.to_string(),
            name: name.to_string(),
            version: Version::parse(version)?,
            uri: format!("{}/{}", self.dependency.uri_base.trim_end_matches('/'), name),
            sha256: self.hasher.digest(id),
            stacks: [self.build.stack.clone()].into(),
            licenses: Vec::new(),
        })
    }

    fn cache_fixture(&mut self, dependency: &Dependency, fixture: &Path) -> KitResult<()> {
        let layer = self.build.layers.layer(dependency.cache_layer_name())?;
        copy_file(fixture, &layer.root().join(&dependency.name))?;
        layer.write_metadata(dependency, LayerFlags::default())
    }

    pub fn build(&self) -> &Build {
        &self.build
    }

    pub fn build_mut(&mut self) -> &mut Build {
        &mut self.build
    }

    /// Root of the scratch tree
    pub fn root(&self) -> &Path {
        self.scratch.path()
    }

    /// Scratch home directory, for code that reads `$HOME`
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Build plan passed to the writer by [`Build::success`], if any
    pub fn output(&self) -> Option<BuildPlan> {
        self.output.borrow().clone()
    }

    /// Captured info log
    pub fn info_log(&self) -> String {
        self.info.contents()
    }

    /// Captured debug log
    pub fn debug_log(&self) -> String {
        self.debug.contents()
    }
}
