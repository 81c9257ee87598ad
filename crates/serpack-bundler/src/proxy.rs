//! Re-export proxies for entries that alias an already emitted module.

use serpack_config::OutputFormat;

/// Source of a proxy artifact that re-exports everything from `specifier`.
///
/// CommonJS proxies replace their exports object wholesale. ESM proxies
/// re-export named bindings with `export *`, which skips `default`, so the
/// default binding is forwarded separately when the module has one.
pub fn render_proxy(format: OutputFormat, specifier: &str, has_default: bool) -> String {
    let specifier = serde_json::to_string(specifier).unwrap_or_else(|_| format!("\"{specifier}\""));
    match format {
        OutputFormat::Cjs => format!("/* proxy */\nmodule.exports = require({specifier});\n"),
        OutputFormat::Esm => {
            let mut out = format!("/* proxy */\nexport * from {specifier};\n");
            if has_default {
                out.push_str(&format!("export {{ default }} from {specifier};\n"));
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cjs_proxy_requires_target() {
        assert_eq!(
            render_proxy(OutputFormat::Cjs, "./a.js", true),
            "/* proxy */\nmodule.exports = require(\"./a.js\");\n"
        );
    }

    #[test]
    fn esm_proxy_forwards_default_only_when_present() {
        let with_default = render_proxy(OutputFormat::Esm, "./a.mjs", true);
        assert!(with_default.contains("export * from \"./a.mjs\";"));
        assert!(with_default.contains("export { default } from \"./a.mjs\";"));

        let without = render_proxy(OutputFormat::Esm, "./a.mjs", false);
        assert!(!without.contains("default"));
    }
}
