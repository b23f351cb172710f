//! Diagram Index Types
//!
//! `DiagramMetadata` is what a diagram's frontmatter may carry. `IndexEntry`
//! and `DiagramIndex` are what ends up in `index.yml`.

use schemars::JsonSchema as SchemarsJsonSchema;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Metadata extracted from a diagram's frontmatter.
///
/// Values are kept exactly as loaded, whatever their YAML type, so they are
/// written back unchanged. `None` means the key is absent; an explicit
/// `null` is `Some(Value::Null)`. Unknown keys are ignored.
///
/// ```yaml
/// id: auth-flow
/// title: Authentication Flow
/// kind: sequence
/// version: 1.2
/// tags: [auth, login]
/// related_code:
///   - src/auth/login.rs
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagramMetadata {
    /// Stable identifier; also the index sort key.
    pub id: Option<Value>,
    /// Human-readable title.
    pub title: Option<Value>,
    /// Diagram kind (e.g. "sequence", "flowchart").
    pub kind: Option<Value>,
    /// Functional area the diagram belongs to.
    pub area: Option<Value>,
    /// Diagram version.
    pub version: Option<Value>,
    /// Tags for discovery.
    pub tags: Option<Value>,
    /// Owning team or person.
    pub owner: Option<Value>,
    /// Tool or model that generated the diagram.
    pub ai_generator: Option<Value>,
    /// Prompt the diagram was generated from.
    pub prompt_file: Option<Value>,
    /// Hash of that prompt.
    pub prompt_hash: Option<Value>,
    /// Generation date (ISO 8601).
    pub last_generated: Option<Value>,
    /// Source files the diagram describes.
    pub related_code: Option<Value>,
}

impl DiagramMetadata {
    /// Pick the known fields out of a frontmatter mapping.
    #[must_use]
    pub fn from_mapping(mapping: &Mapping) -> Self {
        let field = |key: &str| mapping.get(key).cloned();
        Self {
            id: field("id"),
            title: field("title"),
            kind: field("kind"),
            area: field("area"),
            version: field("version"),
            tags: field("tags"),
            owner: field("owner"),
            ai_generator: field("ai_generator"),
            prompt_file: field("prompt_file"),
            prompt_hash: field("prompt_hash"),
            last_generated: field("last_generated"),
            related_code: field("related_code"),
        }
    }
}

/// One diagram in `index.yml`.
///
/// Field order is the on-disk order; absent values are written as `null`.
/// Frontmatter fields hold whatever YAML value the source declared.
#[derive(Debug, Clone, Default, Serialize, Deserialize, SchemarsJsonSchema, PartialEq)]
pub struct IndexEntry {
    /// Identifier from frontmatter.
    #[schemars(with = "serde_json::Value")]
    pub id: Value,
    /// Title from frontmatter.
    #[schemars(with = "serde_json::Value")]
    pub title: Value,
    /// Kind from frontmatter.
    #[schemars(with = "serde_json::Value")]
    pub kind: Value,
    /// Area from frontmatter.
    #[schemars(with = "serde_json::Value")]
    pub area: Value,
    /// Version from frontmatter.
    #[schemars(with = "serde_json::Value")]
    pub version: Value,
    /// Tags from frontmatter.
    #[schemars(with = "serde_json::Value")]
    pub tags: Value,
    /// Owner from frontmatter.
    #[schemars(with = "serde_json::Value")]
    pub owner: Value,
    /// Generator from frontmatter.
    #[schemars(with = "serde_json::Value")]
    pub ai_generator: Value,
    /// Prompt file from frontmatter.
    #[schemars(with = "serde_json::Value")]
    pub prompt_file: Value,
    /// Prompt hash from frontmatter.
    #[schemars(with = "serde_json::Value")]
    pub prompt_hash: Value,
    /// Generation date; today's date when the frontmatter has none.
    #[schemars(with = "serde_json::Value")]
    pub last_generated: Value,
    /// Related code paths; an empty list when the key is absent.
    #[schemars(with = "serde_json::Value")]
    pub related_code: Value,
    /// Source path relative to the project root.
    pub mmd: String,
    /// Rendered SVG, if present on disk.
    pub svg: Option<String>,
    /// Rendered PNG, if present on disk.
    pub png: Option<String>,
    /// Rendered inverted SVG, if present on disk.
    pub svg_inverted: Option<String>,
    /// Rendered inverted PNG, if present on disk.
    pub png_inverted: Option<String>,
    /// Preferred rendering: `svg`, else `png`.
    pub image: Option<String>,
    /// Preferred inverted rendering: `svg_inverted`, else `png_inverted`.
    pub image_inverted: Option<String>,
    /// Raster scale factor the PNGs were rendered with.
    pub png_scale: u32,
    /// Size of `svg` in bytes.
    pub svg_size_bytes: Option<u64>,
    /// Size of `png` in bytes.
    pub png_size_bytes: Option<u64>,
    /// Size of `svg_inverted` in bytes.
    pub svg_inverted_size_bytes: Option<u64>,
    /// Size of `png_inverted` in bytes.
    pub png_inverted_size_bytes: Option<u64>,
}

impl IndexEntry {
    /// Case-insensitive sort key.
    ///
    /// Scalar ids sort by their text; a missing, null or nested id sorts
    /// first.
    #[must_use]
    pub fn sort_key(&self) -> String {
        scalar_text(&self.id).unwrap_or_default().to_lowercase()
    }
}

/// The `index.yml` document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, SchemarsJsonSchema, PartialEq)]
pub struct DiagramIndex {
    /// Entries sorted by `id`, case-insensitively.
    pub diagrams: Vec<IndexEntry>,
}

impl DiagramIndex {
    /// Sort entries by id. Stable, so equal ids keep their scan order.
    pub fn sort(&mut self) {
        self.diagrams.sort_by_cached_key(IndexEntry::sort_key);
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagrams.len()
    }

    /// Returns `true` if the index has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

/// YAML truthiness: null, `false`, zero and empty strings or collections are
/// unset.
pub(crate) fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(items) => !items.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        Value::Tagged(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(yaml: &str) -> DiagramMetadata {
        let mapping: Mapping = serde_yaml::from_str(yaml).unwrap();
        DiagramMetadata::from_mapping(&mapping)
    }

    #[test]
    fn test_metadata_keeps_yaml_types() {
        let metadata = metadata("id: 42\nversion: 1.5\ntags: [draft, 3, ~]");

        assert_eq!(metadata.id, Some(Value::from(42)));
        assert_eq!(metadata.version, Some(Value::from(1.5)));
        assert_eq!(
            metadata.tags,
            Some(serde_yaml::from_str::<Value>("[draft, 3, ~]").unwrap())
        );
    }

    #[test]
    fn test_metadata_keeps_nested_values() {
        let metadata = metadata("owner:\n  team: core\ntitle: [a, b]");

        let owner = metadata.owner.unwrap();
        assert_eq!(owner["team"].as_str(), Some("core"));
        assert!(metadata.title.unwrap().is_sequence());
    }

    #[test]
    fn test_metadata_distinguishes_null_from_absent() {
        let metadata = metadata("related_code: null");

        assert_eq!(metadata.related_code, Some(Value::Null));
        assert_eq!(metadata.tags, None);
    }

    #[test]
    fn test_metadata_ignores_unknown_keys() {
        let metadata = metadata("id: flow\nreviewers: [ana]");
        assert_eq!(metadata.id.as_ref().and_then(Value::as_str), Some("flow"));
    }

    #[test]
    fn test_is_set() {
        assert!(!is_set(&Value::Null));
        assert!(!is_set(&Value::from("")));
        assert!(!is_set(&Value::from(0)));
        assert!(!is_set(&Value::from(false)));
        assert!(is_set(&Value::from("2024-01-01")));
        assert!(is_set(&Value::from(20_240_101)));
    }

    #[test]
    fn test_sort_is_case_insensitive_and_stable() {
        let entry = |id: Value, mmd: &str| IndexEntry {
            id,
            mmd: mmd.to_string(),
            ..IndexEntry::default()
        };
        let mut index = DiagramIndex {
            diagrams: vec![
                entry(Value::from("zeta"), "a.mmd"),
                entry(Value::from("Alpha"), "b.mmd"),
                entry(Value::from("alpha"), "c.mmd"),
                entry(Value::Null, "d.mmd"),
                entry(Value::from(7), "e.mmd"),
            ],
        };

        index.sort();

        let order: Vec<&str> = index.diagrams.iter().map(|e| e.mmd.as_str()).collect();
        assert_eq!(order, vec!["d.mmd", "e.mmd", "b.mmd", "c.mmd", "a.mmd"]);
    }
}
