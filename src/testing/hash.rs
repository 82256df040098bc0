//! Synthetic content hashes for fixtures
//!
//! Fixtures are placed in cache layers named after a digest. Hashing the
//! fixture bytes would make tests depend on fixture content, so the digest
//! is derived from the dependency id instead. It only has to be
//! deterministic; tests must not rely on it being collision resistant.

use sha2::{Digest, Sha256};

/// Strategy turning a dependency id into the hex digest naming its cache layer
pub trait FixtureHasher {
    fn digest(&self, id: &str) -> String;
}

/// SHA-256 of the id, hex encoded
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticHash;

impl FixtureHasher for SyntheticHash {
    fn digest(&self, id: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(id.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl<F> FixtureHasher for F
where
    F: Fn(&str) -> String,
{
    fn digest(&self, id: &str) -> String {
        self(id)
    }
}
