//! Hash command - print synthetic cache-layer hashes

use crate::cli::args::HashArgs;
use crate::config::Config;
use crate::error::KitResult;
use crate::testing::{FixtureHasher, SyntheticHash};

/// Execute the hash command
pub fn execute(args: HashArgs, _config: &Config) -> KitResult<()> {
    for id in &args.ids {
        println!("{}  {}", SyntheticHash.digest(id), id);
    }
    Ok(())
}
