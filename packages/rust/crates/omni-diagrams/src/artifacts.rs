//! Rendered artifacts next to a diagram source.
//!
//! `diagrams/auth.mmd` may have `auth.svg`, `auth.png`, `auth-inverted.svg`
//! and `auth-inverted.png` beside it. Paths are derived from the source path
//! only; frontmatter never influences them.

use std::fs;
use std::path::Path;

/// The four rendered variants of a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Vector rendering.
    Svg,
    /// Raster rendering.
    Png,
    /// Vector rendering for the inverted theme.
    SvgInverted,
    /// Raster rendering for the inverted theme.
    PngInverted,
}

impl ArtifactKind {
    /// All kinds, in index field order.
    pub const ALL: [Self; 4] = [Self::Svg, Self::Png, Self::SvgInverted, Self::PngInverted];

    /// Suffix that replaces the source extension.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Svg => ".svg",
            Self::Png => ".png",
            Self::SvgInverted => "-inverted.svg",
            Self::PngInverted => "-inverted.png",
        }
    }

    /// Artifact path for a source path (`diagrams/a.mmd` -> `diagrams/a.svg`).
    #[must_use]
    pub fn path_for(self, source: &str) -> String {
        format!("{}{}", strip_extension(source), self.suffix())
    }
}

fn strip_extension(path: &str) -> &str {
    match path.rfind('.') {
        Some(dot) if !path[dot..].contains('/') => &path[..dot],
        _ => path,
    }
}

/// A rendered file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the project root.
    pub path: String,
    /// Size in bytes; `None` if the size could not be read.
    pub size_bytes: Option<u64>,
}

/// Which variants of one diagram exist on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    /// `<stem>.svg`
    pub svg: Option<Artifact>,
    /// `<stem>.png`
    pub png: Option<Artifact>,
    /// `<stem>-inverted.svg`
    pub svg_inverted: Option<Artifact>,
    /// `<stem>-inverted.png`
    pub png_inverted: Option<Artifact>,
}

impl ArtifactSet {
    /// Look up every variant of `source` (relative to `root`) on disk.
    #[must_use]
    pub fn resolve(root: &Path, source: &str) -> Self {
        let mut set = Self::default();
        for kind in ArtifactKind::ALL {
            *set.slot_mut(kind) = probe(root, kind.path_for(source));
        }
        set
    }

    /// The artifact of the given kind, if present.
    #[must_use]
    pub fn get(&self, kind: ArtifactKind) -> Option<&Artifact> {
        match kind {
            ArtifactKind::Svg => self.svg.as_ref(),
            ArtifactKind::Png => self.png.as_ref(),
            ArtifactKind::SvgInverted => self.svg_inverted.as_ref(),
            ArtifactKind::PngInverted => self.png_inverted.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: ArtifactKind) -> &mut Option<Artifact> {
        match kind {
            ArtifactKind::Svg => &mut self.svg,
            ArtifactKind::Png => &mut self.png,
            ArtifactKind::SvgInverted => &mut self.svg_inverted,
            ArtifactKind::PngInverted => &mut self.png_inverted,
        }
    }

    /// Preferred rendering: SVG, then PNG.
    #[must_use]
    pub fn image(&self) -> Option<&Artifact> {
        self.svg.as_ref().or(self.png.as_ref())
    }

    /// Preferred inverted rendering: SVG, then PNG.
    #[must_use]
    pub fn image_inverted(&self) -> Option<&Artifact> {
        self.svg_inverted.as_ref().or(self.png_inverted.as_ref())
    }
}

fn probe(root: &Path, relative: String) -> Option<Artifact> {
    let full = root.join(&relative);
    if !full.exists() {
        return None;
    }
    let size_bytes = match fs::metadata(&full) {
        Ok(meta) => Some(meta.len()),
        Err(e) => {
            log::debug!("Cannot read size of {}: {}", full.display(), e);
            None
        }
    };
    Some(Artifact {
        path: relative,
        size_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_for() {
        assert_eq!(ArtifactKind::Svg.path_for("diagrams/a.mmd"), "diagrams/a.svg");
        assert_eq!(
            ArtifactKind::PngInverted.path_for("diagrams/a.b.mmd"),
            "diagrams/a.b-inverted.png"
        );
        assert_eq!(ArtifactKind::Png.path_for("dia.grams/a"), "dia.grams/a.png");
    }

    #[test]
    fn test_resolve_reports_sizes() {
        let temp_dir = TempDir::new().unwrap();
        let diagrams = temp_dir.path().join("diagrams");
        std::fs::create_dir_all(&diagrams).unwrap();
        std::fs::write(diagrams.join("flow.svg"), "<svg/>").unwrap();
        std::fs::write(diagrams.join("flow-inverted.png"), [0u8; 12]).unwrap();

        let set = ArtifactSet::resolve(temp_dir.path(), "diagrams/flow.mmd");

        assert_eq!(
            set.svg,
            Some(Artifact {
                path: "diagrams/flow.svg".to_string(),
                size_bytes: Some(6),
            })
        );
        assert_eq!(set.png, None);
        assert_eq!(set.svg_inverted, None);
        assert_eq!(
            set.get(ArtifactKind::PngInverted).and_then(|a| a.size_bytes),
            Some(12)
        );
    }

    #[test]
    fn test_image_preference() {
        let artifact = |path: &str| {
            Some(Artifact {
                path: path.to_string(),
                size_bytes: Some(1),
            })
        };

        let both = ArtifactSet {
            svg: artifact("a.svg"),
            png: artifact("a.png"),
            ..ArtifactSet::default()
        };
        assert_eq!(both.image().map(|a| a.path.as_str()), Some("a.svg"));
        assert_eq!(both.image_inverted(), None);

        let png_only = ArtifactSet {
            png: artifact("a.png"),
            png_inverted: artifact("a-inverted.png"),
            ..ArtifactSet::default()
        };
        assert_eq!(png_only.image().map(|a| a.path.as_str()), Some("a.png"));
        assert_eq!(
            png_only.image_inverted().map(|a| a.path.as_str()),
            Some("a-inverted.png")
        );

        assert_eq!(ArtifactSet::default().image(), None);
    }
}
