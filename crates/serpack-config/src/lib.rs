//! Configuration for serpack builds.
//!
//! [`BuildOptions`] is the single options type consumed by the graph and
//! bundler crates. It can be assembled in code with the builder methods,
//! parsed from TOML/JSON, or discovered on disk with [`ConfigDiscovery`],
//! which layers defaults, a config file and `SERPACK_` environment variables.

pub mod discovery;
pub mod error;
pub mod options;
pub mod template;
pub mod validation;

pub use discovery::{ConfigDiscovery, discover};
pub use error::{ConfigError, Result};
pub use options::{
    BuildOptions, ChunkOptions, EntryPoint, Extensions, OutputFormat, ResolverOptions,
};
pub use template::{ChunkNameParts, ChunkNameTemplate};
pub use validation::{ConfigValidator, SchemaValidator, validate_schema};
