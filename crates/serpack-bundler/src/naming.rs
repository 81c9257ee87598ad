//! Chunk naming.
//!
//! The `[id]` placeholder is filled by a [`ChunkIdSource`]. Both built-in
//! sources are deterministic, so repeated builds of the same sources produce
//! the same chunk names.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serpack_config::{ChunkNameParts, ChunkNameTemplate};

/// Produces the `[id]` token for a promoted module.
pub trait ChunkIdSource: Send + Sync + fmt::Debug {
    fn id(&self, module: &Path, source: &str) -> String;
}

/// Truncated blake3 hash of the module source.
#[derive(Debug, Clone, Copy)]
pub struct ContentHashIds {
    len: usize,
}

impl ContentHashIds {
    /// `len` hex characters, clamped to 4..=64.
    pub fn new(len: usize) -> Self {
        Self {
            len: len.clamp(4, 64),
        }
    }
}

impl Default for ContentHashIds {
    fn default() -> Self {
        Self::new(8)
    }
}

impl ChunkIdSource for ContentHashIds {
    fn id(&self, _module: &Path, source: &str) -> String {
        let hash = blake3::hash(source.as_bytes());
        hash.to_hex().as_str()[..self.len].to_string()
    }
}

/// Monotonic counter, starting at zero.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicUsize,
}

impl ChunkIdSource for SequentialIds {
    fn id(&self, _module: &Path, _source: &str) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}

/// Renders chunk output paths (relative to the output directory).
#[derive(Debug, Clone)]
pub(crate) struct ChunkNamer {
    template: ChunkNameTemplate,
    dir: String,
    ids: Arc<dyn ChunkIdSource>,
}

impl ChunkNamer {
    pub(crate) fn new(template: ChunkNameTemplate, dir: String, ids: Arc<dyn ChunkIdSource>) -> Self {
        Self { template, dir, ids }
    }

    pub(crate) fn output_path(
        &self,
        module: &Path,
        source: &str,
        index: usize,
        extension: &str,
    ) -> String {
        let id = self.ids.id(module, source);
        let name = module
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_default();
        let file = self.template.render(&ChunkNameParts {
            id: &id,
            index,
            name: &name,
        });

        if self.dir.is_empty() {
            format!("{file}{extension}")
        } else {
            format!("{}/{file}{extension}", self.dir)
        }
    }
}
