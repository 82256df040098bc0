//! cnbkit - Cloud Native Buildpack layer bookkeeping
//!
//! Layer registry with touched-layer cleanup, a minimal buildpack data
//! model, and test scaffolding that builds isolated scratch builds for
//! buildpack unit tests.

pub mod build;
pub mod buildpack;
pub mod buildplan;
pub mod cli;
pub mod config;
pub mod dependency;
pub mod error;
pub mod layers;
pub mod logger;
pub mod stack;
pub mod testing;

pub use error::{KitError, KitResult};
