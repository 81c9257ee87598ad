//! Native `Runtime` backed by `tokio::fs`.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Runtime, RuntimeError, RuntimeResult};

/// Native filesystem runtime.
///
/// # Example
///
/// ```no_run
/// use serpack_graph::runtime::{Runtime, native::NativeRuntime};
/// use std::path::Path;
///
/// # async fn demo() -> serpack_graph::runtime::RuntimeResult<()> {
/// let runtime = NativeRuntime::new();
/// let content = runtime.read_file(Path::new("src/index.ts")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

impl NativeRuntime {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> RuntimeError {
    if err.kind() == ErrorKind::NotFound {
        RuntimeError::FileNotFound(path.to_path_buf())
    } else {
        RuntimeError::Io(format!("Failed to {action} {}: {err}", path.display()))
    }
}

#[async_trait]
impl Runtime for NativeRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| io_error("read", path, e))
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent).await?;
        }
        tokio::fs::write(path, content)
            .await
            .map_err(|e| io_error("write", path, e))
    }

    async fn create_dir_all(&self, path: &Path) -> RuntimeResult<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| io_error("create directory", path, e))
    }

    async fn remove_dir_all(&self, path: &Path) -> RuntimeResult<()> {
        match tokio::fs::remove_dir_all(path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(io_error("remove", path, e)),
            _ => Ok(()),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        std::env::current_dir()
            .map_err(|e| RuntimeError::Io(format!("Failed to get current directory: {e}")))
    }
}
