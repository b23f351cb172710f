//! Index Builder - Scans diagram sources and assembles `index.yml`.
//!
//! One pass, one file at a time:
//!
//! ```text
//! diagrams/*.mmd ─> read ─> extract_frontmatter ─> parse_metadata
//!                                                        │
//!                 index.yml <─ sort by id <─ build_entry <┴─ ArtifactSet::resolve
//! ```
//!
//! A source that cannot be read or has no usable frontmatter is skipped and
//! reported; it never stops the run.
//!
//! # Example
//!
//! ```ignore
//! use omni_diagrams::{IndexBuilder, IndexConfig};
//!
//! let builder = IndexBuilder::new(IndexConfig::from_env()?);
//! let report = builder.build_index()?;
//! IndexBuilder::write_index(&report.index, &builder.config().output_path())?;
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use walkdir::WalkDir;

use crate::artifacts::{ArtifactKind, ArtifactSet};
use crate::clock::{Clock, SystemClock};
use crate::config::IndexConfig;
use crate::error::{IndexError, SkipReason};
use crate::frontmatter::{extract_frontmatter, parse_metadata};
use crate::types::{DiagramIndex, DiagramMetadata, IndexEntry, is_set};

/// A source left out of the index, and why.
#[derive(Debug)]
pub struct SkippedSource {
    /// Path of the source file.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Outcome of [`IndexBuilder::build_index`].
#[derive(Debug, Default)]
pub struct IndexReport {
    /// Sorted index of every usable source.
    pub index: DiagramIndex,
    /// Sources that produced no entry, in scan order.
    pub skipped: Vec<SkippedSource>,
}

/// Builds the diagram index for one project root.
pub struct IndexBuilder {
    config: IndexConfig,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for IndexBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl IndexBuilder {
    /// Create a builder that dates entries with the system clock.
    #[must_use]
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock used for the `last_generated` default.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// The configuration this builder runs with.
    #[must_use]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// List diagram sources, sorted by file name.
    ///
    /// Only regular files directly inside the diagrams directory with the
    /// configured extension are returned; dot-files are ignored. A missing
    /// directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Enumerate`] if the directory exists but cannot
    /// be read.
    pub fn enumerate_sources(&self) -> Result<Vec<PathBuf>, IndexError> {
        let dir = self.config.diagrams_path();
        if !dir.exists() {
            log::warn!("Diagrams directory not found: {}", dir.display());
            return Ok(Vec::new());
        }

        let mut sources = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(IndexError::Enumerate { path: dir, source: e });
                }
                Err(e) => {
                    // Keep unreadable sources (e.g. broken symlinks) so the
                    // read step reports them.
                    match e.path() {
                        Some(path) if self.is_source_name(path) => {
                            sources.push(path.to_path_buf());
                        }
                        _ => log::warn!("Skipping unreadable directory entry: {e}"),
                    }
                    continue;
                }
            };

            if entry.file_type().is_file() && self.is_source_name(entry.path()) {
                sources.push(entry.into_path());
            }
        }

        log::debug!("Found {} diagram sources in {}", sources.len(), dir.display());
        Ok(sources)
    }

    /// Visible file with the configured extension.
    fn is_source_name(&self, path: &Path) -> bool {
        let is_hidden = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'));
        let has_extension = path
            .extension()
            .is_some_and(|ext| ext == self.config.extension.as_str());
        has_extension && !is_hidden
    }

    /// Path of `path` relative to the project root, with `/` separators.
    fn relative_source(&self, path: &Path) -> String {
        path.strip_prefix(&self.config.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Merge metadata and artifacts into an index entry.
    ///
    /// Frontmatter values are copied unchanged. `last_generated` defaults to
    /// today when absent, null or empty, and `related_code` defaults to an
    /// empty list when the key is absent.
    #[must_use]
    pub fn build_entry(
        &self,
        source: &str,
        metadata: DiagramMetadata,
        artifacts: &ArtifactSet,
    ) -> IndexEntry {
        let path = |kind: ArtifactKind| artifacts.get(kind).map(|a| a.path.clone());
        let size = |kind: ArtifactKind| artifacts.get(kind).and_then(|a| a.size_bytes);

        let last_generated = metadata
            .last_generated
            .filter(is_set)
            .unwrap_or_else(|| Value::from(self.clock.today().format("%Y-%m-%d").to_string()));

        IndexEntry {
            id: metadata.id.unwrap_or_default(),
            title: metadata.title.unwrap_or_default(),
            kind: metadata.kind.unwrap_or_default(),
            area: metadata.area.unwrap_or_default(),
            version: metadata.version.unwrap_or_default(),
            tags: metadata.tags.unwrap_or_default(),
            owner: metadata.owner.unwrap_or_default(),
            ai_generator: metadata.ai_generator.unwrap_or_default(),
            prompt_file: metadata.prompt_file.unwrap_or_default(),
            prompt_hash: metadata.prompt_hash.unwrap_or_default(),
            last_generated,
            related_code: metadata
                .related_code
                .unwrap_or_else(|| Value::Sequence(Vec::new())),
            mmd: source.to_string(),
            svg: path(ArtifactKind::Svg),
            png: path(ArtifactKind::Png),
            svg_inverted: path(ArtifactKind::SvgInverted),
            png_inverted: path(ArtifactKind::PngInverted),
            image: artifacts.image().map(|a| a.path.clone()),
            image_inverted: artifacts.image_inverted().map(|a| a.path.clone()),
            png_scale: self.config.png_scale,
            svg_size_bytes: size(ArtifactKind::Svg),
            png_size_bytes: size(ArtifactKind::Png),
            svg_inverted_size_bytes: size(ArtifactKind::SvgInverted),
            png_inverted_size_bytes: size(ArtifactKind::PngInverted),
        }
    }

    /// Turn one source file into an index entry.
    ///
    /// # Errors
    ///
    /// Returns the [`SkipReason`] when the file cannot contribute an entry.
    pub fn scan_source(&self, path: &Path) -> Result<IndexEntry, SkipReason> {
        let content = fs::read_to_string(path)?;
        let raw = extract_frontmatter(&content).ok_or(SkipReason::MissingFrontmatter)?;
        let metadata = parse_metadata(&raw)?;

        let source = self.relative_source(path);
        let artifacts = ArtifactSet::resolve(&self.config.root, &source);
        Ok(self.build_entry(&source, metadata, &artifacts))
    }

    /// Scan every source and return the sorted index plus skipped sources.
    ///
    /// # Errors
    ///
    /// Only fails if the diagrams directory cannot be enumerated. Per-file
    /// problems are logged and collected in [`IndexReport::skipped`].
    pub fn build_index(&self) -> Result<IndexReport, IndexError> {
        let mut report = IndexReport::default();

        for path in self.enumerate_sources()? {
            match self.scan_source(&path) {
                Ok(entry) => report.index.diagrams.push(entry),
                Err(reason) => {
                    match &reason {
                        SkipReason::Unreadable(e) => {
                            log::error!("Cannot read {}: {}", path.display(), e);
                        }
                        SkipReason::MissingFrontmatter => {
                            log::warn!("No frontmatter found in {}; skipping", path.display());
                        }
                        SkipReason::MalformedFrontmatter(e) => {
                            log::warn!("YAML parse error in {}: {}; skipping", path.display(), e);
                        }
                        SkipReason::NotMapping(kind) => {
                            log::warn!(
                                "Frontmatter in {} parsed to {}, not a mapping; skipping",
                                path.display(),
                                kind
                            );
                        }
                    }
                    report.skipped.push(SkippedSource { path, reason });
                }
            }
        }

        report.index.sort();
        Ok(report)
    }

    /// Serialize an index to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Serialize`] if serialization fails.
    pub fn render_index(index: &DiagramIndex) -> Result<String, IndexError> {
        Ok(serde_yaml::to_string(index)?)
    }

    /// Write an index to `output`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Serialize`] or [`IndexError::Write`].
    pub fn write_index(index: &DiagramIndex, output: &Path) -> Result<(), IndexError> {
        let yaml = Self::render_index(index)?;
        fs::write(output, yaml).map_err(|source| IndexError::Write {
            path: output.to_path_buf(),
            source,
        })?;
        log::info!(
            "Wrote index to {} ({} entries)",
            output.display(),
            index.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::Artifact;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn builder() -> IndexBuilder {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        IndexBuilder::new(IndexConfig::new("/project")).with_clock(FixedClock(date))
    }

    #[test]
    fn test_build_entry_applies_defaults() {
        let entry = builder().build_entry(
            "diagrams/a.mmd",
            DiagramMetadata {
                id: Some(Value::from("a")),
                ..DiagramMetadata::default()
            },
            &ArtifactSet::default(),
        );

        assert_eq!(entry.last_generated.as_str(), Some("2024-03-09"));
        assert_eq!(entry.related_code, Value::Sequence(Vec::new()));
        assert_eq!(entry.title, Value::Null);
        assert_eq!(entry.mmd, "diagrams/a.mmd");
        assert_eq!(entry.png_scale, 3);
        assert_eq!(entry.image, None);
        assert_eq!(entry.image_inverted, None);
    }

    #[test]
    fn test_build_entry_keeps_explicit_date() {
        let entry = builder().build_entry(
            "diagrams/a.mmd",
            DiagramMetadata {
                last_generated: Some(Value::from("2023-12-01")),
                related_code: Some(Value::from(vec!["src/a.rs"])),
                ..DiagramMetadata::default()
            },
            &ArtifactSet::default(),
        );

        assert_eq!(entry.last_generated.as_str(), Some("2023-12-01"));
        assert_eq!(entry.related_code, Value::from(vec!["src/a.rs"]));
    }

    #[test]
    fn test_build_entry_passes_values_through() {
        let entry = builder().build_entry(
            "diagrams/a.mmd",
            DiagramMetadata {
                version: Some(Value::from(1.5)),
                owner: Some(serde_yaml::from_str("team: core").unwrap()),
                related_code: Some(Value::Null),
                ..DiagramMetadata::default()
            },
            &ArtifactSet::default(),
        );

        assert_eq!(entry.version, Value::from(1.5));
        assert_eq!(entry.owner["team"].as_str(), Some("core"));
        assert_eq!(entry.related_code, Value::Null);
    }

    #[test]
    fn test_build_entry_empty_date_uses_today() {
        let entry = builder().build_entry(
            "diagrams/a.mmd",
            DiagramMetadata {
                last_generated: Some(Value::from("")),
                ..DiagramMetadata::default()
            },
            &ArtifactSet::default(),
        );
        assert_eq!(entry.last_generated.as_str(), Some("2024-03-09"));
    }

    #[test]
    fn test_build_entry_artifact_fields() {
        let artifacts = ArtifactSet {
            png: Some(Artifact {
                path: "diagrams/a.png".to_string(),
                size_bytes: Some(2048),
            }),
            svg_inverted: Some(Artifact {
                path: "diagrams/a-inverted.svg".to_string(),
                size_bytes: None,
            }),
            ..ArtifactSet::default()
        };

        let entry = builder().build_entry("diagrams/a.mmd", DiagramMetadata::default(), &artifacts);

        assert_eq!(entry.svg, None);
        assert_eq!(entry.png.as_deref(), Some("diagrams/a.png"));
        assert_eq!(entry.image.as_deref(), Some("diagrams/a.png"));
        assert_eq!(entry.png_size_bytes, Some(2048));
        assert_eq!(entry.svg_size_bytes, None);
        assert_eq!(entry.image_inverted.as_deref(), Some("diagrams/a-inverted.svg"));
        assert_eq!(entry.svg_inverted_size_bytes, None);
    }

    #[test]
    fn test_relative_source_uses_forward_slashes() {
        let source = builder().relative_source(Path::new("/project/diagrams/a.mmd"));
        assert_eq!(source, "diagrams/a.mmd");
    }
}
