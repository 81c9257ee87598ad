//! File-based config discovery
//!
//! Finds a serpack config next to a project and layers it with defaults and
//! `SERPACK_` environment variables through figment. Nested keys use a double
//! underscore: `SERPACK_CHUNKS__NAME="[name].[index]"`.

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml};
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::options::BuildOptions;

const TOML_CONFIG: &str = "serpack.toml";
const JSON_CONFIG: &str = "serpack.json";
const PACKAGE_JSON: &str = "package.json";
const PACKAGE_FIELD: &str = "serpack";
const ENV_PREFIX: &str = "SERPACK_";

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use serpack_config::ConfigDiscovery;
///
/// let options = ConfigDiscovery::new(".").load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
    env: bool,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            env: true,
        }
    }

    /// Skip the `SERPACK_` environment layer.
    pub fn without_env(mut self) -> Self {
        self.env = false;
        self
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. serpack.toml
    /// 2. serpack.json
    /// 3. package.json (serpack field)
    pub fn find(&self) -> Option<PathBuf> {
        for name in [TOML_CONFIG, JSON_CONFIG] {
            let path = self.root.join(name);
            if path.is_file() {
                return Some(path);
            }
        }

        let pkg_path = self.root.join(PACKAGE_JSON);
        let content = fs::read_to_string(&pkg_path).ok()?;
        let parsed: Value = serde_json::from_str(&content).ok()?;
        match parsed.get(PACKAGE_FIELD) {
            Some(field) if !field.is_null() => Some(pkg_path),
            _ => None,
        }
    }

    /// Load options from the discovered file.
    ///
    /// Relative `cwd` defaults to the discovery root, so entry paths in the
    /// file are read relative to the file's directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<BuildOptions> {
        let path = self.find().ok_or_else(|| ConfigError::NotFound {
            root: self.root.clone(),
        })?;
        self.load_from(&path)
    }

    /// Load options from a specific file path.
    pub fn load_from(&self, path: &Path) -> Result<BuildOptions> {
        let figment = Figment::from(Serialized::defaults(BuildOptions::default()));

        let figment = match path.file_name().and_then(|n| n.to_str()) {
            Some(PACKAGE_JSON) => figment.merge(Serialized::defaults(package_field(path)?)),
            _ => match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => {
                    return Err(ConfigError::UnsupportedFormat {
                        path: path.to_path_buf(),
                    });
                }
            },
        };

        let figment = if self.env {
            figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
        } else {
            figment
        };

        let mut options: BuildOptions =
            figment.extract().map_err(|e| ConfigError::InvalidValue {
                field: e.path.join("."),
                hint: Some(e.to_string()),
            })?;

        let base = path.parent().unwrap_or(&self.root);
        options.cwd = Some(match options.cwd.take() {
            Some(cwd) if cwd.is_absolute() => cwd,
            Some(cwd) => base.join(cwd),
            None => base.to_path_buf(),
        });

        tracing::debug!(config = %path.display(), entries = options.entries.len(), "loaded build options");
        Ok(options)
    }
}

fn package_field(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let mut parsed: Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
            field: PACKAGE_JSON.to_string(),
            hint: Some(format!("Invalid JSON: {e}")),
        })?;

    match parsed.get_mut(PACKAGE_FIELD).map(Value::take) {
        Some(Value::Null) | None => Err(ConfigError::InvalidValue {
            field: PACKAGE_FIELD.to_string(),
            hint: Some("Add a 'serpack' object to your package.json".to_string()),
        }),
        Some(value) => Ok(value),
    }
}

/// Discover and load config from the current directory.
pub fn discover() -> Result<BuildOptions> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}
