//! Chunk file name templates.
//!
//! A template is literal text with bracketed placeholders:
//!
//! - `[id]` - token from the configured id source (content hash by default)
//! - `[index]` - position of the chunk in the run's chunk cache
//! - `[name]` - file stem of the promoted module
//!
//! ```
//! use serpack_config::{ChunkNameTemplate, ChunkNameParts};
//!
//! let template = ChunkNameTemplate::parse("[name]-[id].[index]").unwrap();
//! let name = template.render(&ChunkNameParts { id: "3f9a", index: 2, name: "util" });
//! assert_eq!(name, "util-3f9a.2");
//! ```

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Id,
    Index,
    Name,
}

/// Values substituted into a template.
#[derive(Debug, Clone, Copy)]
pub struct ChunkNameParts<'a> {
    pub id: &'a str,
    pub index: usize,
    pub name: &'a str,
}

/// A validated chunk name template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkNameTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl ChunkNameTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(open) = rest.find('[') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after
                .find(']')
                .ok_or_else(|| ConfigError::UnterminatedPlaceholder {
                    template: template.to_string(),
                })?;
            let segment = match &after[..close] {
                "id" => Segment::Id,
                "index" => Segment::Index,
                "name" => Segment::Name,
                other => {
                    return Err(ConfigError::UnknownPlaceholder {
                        template: template.to_string(),
                        placeholder: other.to_string(),
                    });
                }
            };
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(segment);
            rest = &after[close + 1..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if segments.is_empty() {
            return Err(ConfigError::schema(
                "chunk name template is empty",
                "Use a template such as \"[id].[index]\"",
            ));
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether rendered names are unique per cache slot.
    pub fn has_index(&self) -> bool {
        self.segments.contains(&Segment::Index)
    }

    pub fn render(&self, parts: &ChunkNameParts<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Id => out.push_str(parts.id),
                Segment::Index => out.push_str(&parts.index.to_string()),
                Segment::Name => out.push_str(parts.name),
            }
        }
        out
    }
}
