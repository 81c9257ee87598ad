//! Per-format chunk cache.
//!
//! Maps a promoted module to its chunk output path. A claim registers the
//! path before the chunk is compiled, so a module rediscovered while its own
//! build is still running resolves to the pending name instead of starting a
//! second compile. Check and insert happen under one lock.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serpack_graph::FxIndexMap;

use crate::{Error, Result};

/// Result of [`ChunkCache::claim`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// First claim: the caller must compile the chunk.
    New(String),
    /// Already claimed, possibly still being compiled.
    Existing(String),
}

impl Claim {
    pub fn output(&self) -> &str {
        match self {
            Claim::New(output) | Claim::Existing(output) => output,
        }
    }
}

#[derive(Debug, Default)]
struct CacheSlots {
    by_module: FxIndexMap<PathBuf, String>,
    by_output: FxHashMap<String, PathBuf>,
}

/// Module → chunk output mapping for one format of one build.
#[derive(Debug, Default)]
pub struct ChunkCache {
    slots: Mutex<CacheSlots>,
}

impl ChunkCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim an output path for `module`.
    ///
    /// `allocate` receives the slot index (the number of chunks claimed so
    /// far) and returns the output path; it only runs for new claims.
    pub fn claim(&self, module: &Path, allocate: impl FnOnce(usize) -> String) -> Result<Claim> {
        let mut slots = self.slots.lock();
        if let Some(output) = slots.by_module.get(module) {
            return Ok(Claim::Existing(output.clone()));
        }

        let output = allocate(slots.by_module.len());
        if let Some(existing) = slots.by_output.get(&output) {
            return Err(Error::ChunkNameCollision {
                output,
                module: module.to_path_buf(),
                existing: existing.clone(),
            });
        }

        slots.by_output.insert(output.clone(), module.to_path_buf());
        slots.by_module.insert(module.to_path_buf(), output.clone());
        Ok(Claim::New(output))
    }

    pub fn get(&self, module: &Path) -> Option<String> {
        self.slots.lock().by_module.get(module).cloned()
    }

    pub fn len(&self) -> usize {
        self.slots.lock().by_module.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Claimed chunks in claim order.
    pub fn snapshot(&self) -> Vec<(PathBuf, String)> {
        self.slots
            .lock()
            .by_module
            .iter()
            .map(|(module, output)| (module.clone(), output.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_returns_existing_without_allocating() {
        let cache = ChunkCache::new();
        let first = cache
            .claim(Path::new("/u.js"), |i| format!("chunks/u.{i}.js"))
            .unwrap();
        assert_eq!(first, Claim::New("chunks/u.0.js".into()));

        let second = cache
            .claim(Path::new("/u.js"), |_| panic!("must not allocate twice"))
            .unwrap();
        assert_eq!(second, Claim::Existing("chunks/u.0.js".into()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn index_counts_claims() {
        let cache = ChunkCache::new();
        for (n, module) in ["/a.js", "/b.js", "/c.js"].into_iter().enumerate() {
            let claim = cache.claim(Path::new(module), |i| format!("{i}.js")).unwrap();
            assert_eq!(claim.output(), format!("{n}.js"));
        }
    }

    #[test]
    fn colliding_output_is_rejected() {
        let cache = ChunkCache::new();
        cache
            .claim(Path::new("/a.js"), |_| "chunks/same.js".into())
            .unwrap();
        let err = cache
            .claim(Path::new("/b.js"), |_| "chunks/same.js".into())
            .unwrap_err();
        assert!(matches!(err, Error::ChunkNameCollision { .. }));
        assert!(cache.get(Path::new("/b.js")).is_none());
    }

    #[test]
    fn concurrent_claims_allocate_once() {
        let cache = std::sync::Arc::new(ChunkCache::new());
        let allocations = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let allocations = allocations.clone();
                std::thread::spawn(move || {
                    cache
                        .claim(Path::new("/shared.js"), |i| {
                            allocations.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                            format!("chunks/shared.{i}.js")
                        })
                        .unwrap()
                        .output()
                        .to_string()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "chunks/shared.0.js");
        }
        assert_eq!(allocations.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
