//! Index run configuration.
//!
//! Resolved once at startup from the environment (`PRJ_ROOT`, `PNG_SCALE`)
//! and CLI flags, then handed to the builder.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Directory under the project root holding diagram sources.
pub const DEFAULT_DIAGRAMS_DIR: &str = "diagrams";
/// Diagram source extension, without the dot.
pub const DEFAULT_EXTENSION: &str = "mmd";
/// Index file name under the project root.
pub const DEFAULT_OUTPUT: &str = "index.yml";
/// Raster scale recorded when `PNG_SCALE` is unset.
pub const DEFAULT_PNG_SCALE: u32 = 3;

/// Environment variable naming the project root.
pub const ENV_PRJ_ROOT: &str = "PRJ_ROOT";
/// Environment variable holding the raster scale.
pub const ENV_PNG_SCALE: &str = "PNG_SCALE";

/// Everything an index run depends on besides the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Project root; all entry paths are relative to it.
    pub root: PathBuf,
    /// Source directory, relative to `root`.
    pub diagrams_dir: PathBuf,
    /// Source file extension.
    pub extension: String,
    /// Output path, relative to `root` unless absolute.
    pub output: PathBuf,
    /// Recorded as `png_scale` on every entry.
    pub png_scale: u32,
}

impl IndexConfig {
    /// Default configuration rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            diagrams_dir: PathBuf::from(DEFAULT_DIAGRAMS_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            png_scale: DEFAULT_PNG_SCALE,
        }
    }

    /// Resolve from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPngScale`] if `PNG_SCALE` is set but not
    /// an unsigned integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary variable lookup.
    ///
    /// The root is `PRJ_ROOT` when set and non-empty, otherwise the current
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPngScale`] if `PNG_SCALE` is set but not
    /// an unsigned integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let root = lookup(ENV_PRJ_ROOT)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        let mut config = Self::new(root);
        if let Some(raw) = lookup(ENV_PNG_SCALE) {
            config.png_scale = parse_png_scale(&raw)?;
        }
        Ok(config)
    }

    /// Absolute-or-root-relative source directory.
    #[must_use]
    pub fn diagrams_path(&self) -> PathBuf {
        self.root.join(&self.diagrams_dir)
    }

    /// Absolute-or-root-relative output path.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        absolutize(&self.root, &self.output)
    }
}

/// Parse a raster scale value.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPngScale`] unless `raw` (trimmed) is an
/// unsigned integer.
pub fn parse_png_scale(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPngScale(raw.to_string()))
}

fn absolutize(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lookup_defaults() {
        let config = IndexConfig::from_lookup(|key| {
            (key == ENV_PRJ_ROOT).then(|| "/srv/project".to_string())
        })
        .unwrap();

        assert_eq!(config.root, PathBuf::from("/srv/project"));
        assert_eq!(config.png_scale, 3);
        assert_eq!(config.diagrams_path(), PathBuf::from("/srv/project/diagrams"));
        assert_eq!(config.output_path(), PathBuf::from("/srv/project/index.yml"));
    }

    #[test]
    fn test_from_lookup_png_scale() {
        let config = IndexConfig::from_lookup(|key| match key {
            ENV_PRJ_ROOT => Some("/srv/project".to_string()),
            ENV_PNG_SCALE => Some(" 2 ".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.png_scale, 2);
    }

    #[test]
    fn test_from_lookup_invalid_png_scale() {
        let result = IndexConfig::from_lookup(|key| {
            (key == ENV_PNG_SCALE).then(|| "huge".to_string())
        });

        assert_eq!(
            result,
            Err(ConfigError::InvalidPngScale("huge".to_string()))
        );
    }

    #[test]
    fn test_blank_prj_root_uses_current_dir() {
        let config =
            IndexConfig::from_lookup(|key| (key == ENV_PRJ_ROOT).then(|| "  ".to_string()))
                .unwrap();
        assert_eq!(config.root, std::env::current_dir().unwrap());
    }

    #[test]
    fn test_absolute_output_is_kept() {
        let mut config = IndexConfig::new("/srv/project");
        config.output = PathBuf::from("/tmp/out.yml");
        assert_eq!(config.output_path(), PathBuf::from("/tmp/out.yml"));
    }
}
