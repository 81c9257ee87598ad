//! Output path helpers.
//!
//! Artifact locations are kept as `/`-separated paths relative to the output
//! directory, so references between artifacts are platform independent.

use std::path::{Component, Path};

/// Render a relative path with `/` separators.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Specifier that imports `to` from a module emitted at `from`.
///
/// Both arguments are output-relative, `/`-separated file paths. The result
/// always starts with `./` or `../`.
///
/// ```
/// use serpack_bundler::paths::relative_specifier;
///
/// assert_eq!(relative_specifier("a.js", "chunks/u.0.js"), "./chunks/u.0.js");
/// assert_eq!(relative_specifier("chunks/x.1.js", "chunks/u.0.js"), "./u.0.js");
/// assert_eq!(relative_specifier("chunks/x.1.js", "a.js"), "../a.js");
/// ```
pub fn relative_specifier(from: &str, to: &str) -> String {
    let from_dir: Vec<&str> = {
        let mut parts: Vec<&str> = from.split('/').filter(|p| !p.is_empty()).collect();
        parts.pop();
        parts
    };
    let to_parts: Vec<&str> = to.split('/').filter(|p| !p.is_empty()).collect();

    let common = from_dir
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();
    // the file name itself is never part of the shared prefix
    let common = common.min(to_parts.len().saturating_sub(1));

    let ups = from_dir.len() - common;
    let rest = to_parts[common..].join("/");
    if ups == 0 {
        format!("./{rest}")
    } else {
        format!("{}{rest}", "../".repeat(ups))
    }
}
