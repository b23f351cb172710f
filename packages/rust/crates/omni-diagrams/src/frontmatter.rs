//! Diagram Frontmatter Parsing
//!
//! Diagram sources carry their metadata in one of two styles:
//!
//! ```text
//! /*                                ---
//!  * id: auth-flow                  id: auth-flow
//!  * title: Authentication Flow     title: Authentication Flow
//!  */                               ---
//! ```
//!
//! Older diagrams use the block comment, newer ones the YAML fence. Both are
//! supported, tried in the order of [`FRONTMATTER_STYLES`].

use crate::error::SkipReason;
use crate::types::DiagramMetadata;

/// A way of embedding frontmatter in a diagram source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterStyle {
    /// `/* ... */`, with an optional leading `*` on each line.
    BlockComment,
    /// `--- ... ---`.
    YamlFence,
}

/// Styles in priority order. The first one that matches wins.
pub const FRONTMATTER_STYLES: [FrontmatterStyle; 2] =
    [FrontmatterStyle::BlockComment, FrontmatterStyle::YamlFence];

impl FrontmatterStyle {
    /// Extract the raw frontmatter text in this style, trimmed.
    ///
    /// Returns `None` if the content has no block in this style.
    #[must_use]
    pub fn extract(self, content: &str) -> Option<String> {
        match self {
            Self::BlockComment => {
                let inner = delimited(content, "/*", "*/")?;
                let stripped = inner
                    .lines()
                    .map(strip_comment_decoration)
                    .collect::<Vec<_>>()
                    .join("\n");
                Some(stripped.trim().to_string())
            }
            Self::YamlFence => delimited(content, "---", "---").map(str::to_string),
        }
    }
}

/// Text between the first `open` and the next `close`, trimmed.
fn delimited<'a>(content: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = content.find(open)? + open.len();
    let rest = &content[start..];
    let end = rest.find(close)?;
    Some(rest[..end].trim())
}

/// Drop leading whitespace, a `*`, and one whitespace character after it.
fn strip_comment_decoration(line: &str) -> &str {
    let Some(rest) = line.trim_start().strip_prefix('*') else {
        return line;
    };
    rest.strip_prefix(char::is_whitespace).unwrap_or(rest)
}

/// Extract frontmatter from diagram source content.
///
/// Tries each of [`FRONTMATTER_STYLES`] in order and returns the first match.
/// An empty block counts as no frontmatter.
///
/// # Examples
///
/// ```
/// use omni_diagrams::extract_frontmatter;
///
/// let content = "---\nid: auth-flow\n---\nsequenceDiagram\n";
/// assert_eq!(extract_frontmatter(content).as_deref(), Some("id: auth-flow"));
/// ```
#[must_use]
pub fn extract_frontmatter(content: &str) -> Option<String> {
    FRONTMATTER_STYLES
        .iter()
        .find_map(|style| style.extract(content))
        .filter(|text| !text.is_empty())
}

/// Parse raw frontmatter text into [`DiagramMetadata`].
///
/// A document that is empty or only comments yields default metadata.
///
/// # Errors
///
/// Returns [`SkipReason::MalformedFrontmatter`] for invalid YAML and
/// [`SkipReason::NotMapping`] when the document is a scalar or a sequence.
/// Field values are never rejected, whatever their shape.
pub fn parse_metadata(raw: &str) -> Result<DiagramMetadata, SkipReason> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(raw).map_err(SkipReason::MalformedFrontmatter)?;

    match value {
        serde_yaml::Value::Null => Ok(DiagramMetadata::default()),
        serde_yaml::Value::Mapping(mapping) => Ok(DiagramMetadata::from_mapping(&mapping)),
        other => Err(SkipReason::NotMapping(yaml_kind(&other))),
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}
