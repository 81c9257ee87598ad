use std::path::PathBuf;

// Helper defaults
pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

pub(crate) fn default_formats() -> Vec<super::OutputFormat> {
    vec![super::OutputFormat::Cjs]
}

pub(crate) fn default_cjs_extension() -> String {
    ".js".to_string()
}

pub(crate) fn default_esm_extension() -> String {
    ".mjs".to_string()
}

pub(crate) fn default_chunk_dir() -> PathBuf {
    PathBuf::from("chunks")
}

pub(crate) fn default_chunk_name() -> String {
    "[id].[index]".to_string()
}

pub(crate) fn default_resolve_extensions() -> Vec<String> {
    [".js", ".jsx", ".ts", ".tsx", ".json"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub(crate) fn default_condition_names() -> Vec<String> {
    vec!["node".to_string(), "import".to_string()]
}

pub(crate) fn default_main_fields() -> Vec<String> {
    vec!["module".to_string(), "main".to_string()]
}
