//! Platform runtime abstraction
//!
//! The analyzer reads sources and the bundler writes artifacts through the
//! `Runtime` trait, so hosts can supply their own filesystem (virtual, remote
//! or instrumented) without touching graph or orchestration code.

#[cfg(not(target_family = "wasm"))]
pub mod native;

#[cfg(not(target_family = "wasm"))]
pub use native::NativeRuntime;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Other runtime error
    #[error("Runtime error: {0}")]
    Other(String),
}

/// Platform runtime trait
///
/// # Example
///
/// ```rust,ignore
/// use serpack_graph::runtime::{Runtime, RuntimeResult};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct MyRuntime;
///
/// #[async_trait]
/// impl Runtime for MyRuntime {
///     async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
///         // Platform-specific implementation
///     }
///
///     // ... implement other methods
/// }
/// ```
#[async_trait]
pub trait Runtime: Send + Sync + std::fmt::Debug {
    /// Read a file from the filesystem
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>>;

    /// Write a file, creating missing parent directories
    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()>;

    /// Create a directory and all of its parents
    async fn create_dir_all(&self, path: &Path) -> RuntimeResult<()>;

    /// Remove a directory tree. Missing directories are not an error.
    async fn remove_dir_all(&self, path: &Path) -> RuntimeResult<()>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Get the current working directory
    fn get_cwd(&self) -> RuntimeResult<PathBuf>;
}
