//! CLI command implementations

pub mod cleanup;
pub mod config;
pub mod hash;
pub mod layers;
pub mod processes;

pub use cleanup::execute as cleanup;
pub use config::execute as config;
pub use hash::execute as hash;
pub use layers::execute as layers;
pub use processes::execute as processes;
