//! Node.js builtin module detection.

use phf::phf_set;

/// Builtin module names as listed by `require('module').builtinModules`.
static NODE_BUILTINS: phf::Set<&'static str> = phf_set! {
    "assert", "assert/strict", "async_hooks", "buffer", "child_process", "cluster",
    "console", "constants", "crypto", "dgram", "diagnostics_channel", "dns",
    "dns/promises", "domain", "events", "fs", "fs/promises", "http", "http2",
    "https", "inspector", "inspector/promises", "module", "net", "os", "path",
    "path/posix", "path/win32", "perf_hooks", "process", "punycode", "querystring",
    "readline", "readline/promises", "repl", "stream", "stream/consumers",
    "stream/promises", "stream/web", "string_decoder", "sys", "timers",
    "timers/promises", "tls", "trace_events", "tty", "url", "util", "util/types",
    "v8", "vm", "wasi", "worker_threads", "zlib",
};

/// Whether `specifier` names a runtime builtin.
///
/// Any `node:` specifier counts, including scheme-only modules such as
/// `node:test` that have no bare form.
pub fn is_builtin(specifier: &str) -> bool {
    specifier.starts_with("node:") || NODE_BUILTINS.contains(specifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_bare_and_prefixed_builtins() {
        assert!(is_builtin("fs"));
        assert!(is_builtin("fs/promises"));
        assert!(is_builtin("node:path"));
        assert!(is_builtin("node:test"));
    }

    #[test]
    fn packages_and_paths_are_not_builtins() {
        assert!(!is_builtin("lodash"));
        assert!(!is_builtin("./fs"));
        assert!(!is_builtin("fs-extra"));
        assert!(!is_builtin("path/to/thing"));
    }
}
