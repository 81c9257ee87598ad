//! Import and export extraction.
//!
//! Parses a module with oxc and collects, in source order, every runtime
//! import: static `import`, side-effect imports, `export ... from`,
//! `export * from` and dynamic `import()` expressions at any depth.
//! Type-only imports and re-exports are erased by compilers and skipped.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Declaration, ExportAllDeclaration, ExportDefaultDeclaration, ExportNamedDeclaration,
    Expression, ImportDeclaration, ImportExpression,
};
use oxc_ast_visit::{Visit, walk};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};

use crate::record::ImportKind;

/// Parse failure for one module.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Failed to parse {}: {message}", path.display())]
pub struct ParseError {
    pub path: std::path::PathBuf,
    pub message: String,
}

/// An import before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImport {
    /// Specifier as written, quotes included
    pub raw: String,
    /// Literal value; for non-literal dynamic imports, the expression text
    pub specifier: String,
    pub kind: ImportKind,
}

/// Imports and exports of one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedModule {
    pub imports: Vec<RawImport>,
    pub exports: Vec<String>,
}

/// Parse `source` and collect its imports and exports.
///
/// The source type comes from the file extension; unknown extensions are
/// parsed as ES modules.
pub fn parse_module(path: &Path, source: &str) -> Result<ParsedModule, ParseError> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::mjs());
    let ret = Parser::new(&allocator, source, source_type).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ParseError {
            path: path.to_path_buf(),
            message: if message.is_empty() {
                "parser aborted".to_string()
            } else {
                message
            },
        });
    }

    let mut collector = ModuleCollector {
        source,
        module: ParsedModule::default(),
    };
    collector.visit_program(&ret.program);
    Ok(collector.module)
}

struct ModuleCollector<'s> {
    source: &'s str,
    module: ParsedModule,
}

impl ModuleCollector<'_> {
    fn push_static(&mut self, raw: oxc_span::Span, value: &str) {
        self.module.imports.push(RawImport {
            raw: raw.source_text(self.source).to_string(),
            specifier: value.to_string(),
            kind: ImportKind::Static,
        });
    }

    fn push_export(&mut self, name: &str) {
        self.module.exports.push(name.to_string());
    }
}

impl<'a> Visit<'a> for ModuleCollector<'_> {
    fn visit_import_declaration(&mut self, it: &ImportDeclaration<'a>) {
        if it.import_kind.is_type() {
            return;
        }
        self.push_static(it.source.span, &it.source.value);
    }

    fn visit_export_named_declaration(&mut self, it: &ExportNamedDeclaration<'a>) {
        if it.export_kind.is_type() {
            return;
        }

        if let Some(source) = &it.source {
            let has_value_specifier = it.specifiers.is_empty()
                || it.specifiers.iter().any(|s| !s.export_kind.is_type());
            if has_value_specifier {
                self.push_static(source.span, &source.value);
            }
        }

        for specifier in &it.specifiers {
            if !specifier.export_kind.is_type() {
                self.push_export(&specifier.exported.name());
            }
        }

        if let Some(declaration) = &it.declaration {
            match declaration {
                Declaration::VariableDeclaration(var) => {
                    for declarator in &var.declarations {
                        for id in declarator.id.get_binding_identifiers() {
                            self.push_export(&id.name);
                        }
                    }
                }
                Declaration::FunctionDeclaration(func) => {
                    if let Some(id) = &func.id {
                        self.push_export(&id.name);
                    }
                }
                Declaration::ClassDeclaration(class) => {
                    if let Some(id) = &class.id {
                        self.push_export(&id.name);
                    }
                }
                Declaration::TSEnumDeclaration(decl) => self.push_export(&decl.id.name),
                _ => {}
            }
        }

        walk::walk_export_named_declaration(self, it);
    }

    fn visit_export_default_declaration(&mut self, it: &ExportDefaultDeclaration<'a>) {
        self.push_export("default");
        walk::walk_export_default_declaration(self, it);
    }

    fn visit_export_all_declaration(&mut self, it: &ExportAllDeclaration<'a>) {
        if it.export_kind.is_type() {
            return;
        }
        self.push_static(it.source.span, &it.source.value);
        if let Some(exported) = &it.exported {
            self.push_export(&exported.name());
        }
    }

    fn visit_import_expression(&mut self, it: &ImportExpression<'a>) {
        let span = it.source.span();
        let raw = span.source_text(self.source).to_string();
        let specifier = match &it.source {
            Expression::StringLiteral(lit) => lit.value.to_string(),
            _ => raw.clone(),
        };
        self.module.imports.push(RawImport {
            raw,
            specifier,
            kind: ImportKind::Dynamic,
        });
        walk::walk_import_expression(self, it);
    }
}
