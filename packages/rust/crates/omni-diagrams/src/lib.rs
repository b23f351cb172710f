//! Omni-Diagrams - Builds `index.yml` from diagram source frontmatter.
//!
//! Scans `diagrams/*.mmd`, reads each file's frontmatter, finds the rendered
//! SVG/PNG files next to it, and writes one sorted index document.
//!
//! # Architecture
//!
//! ```text
//! omni-diagrams/src/
//! ├── lib.rs          # Module declarations and exports
//! ├── main.rs         # `diagram-index` binary
//! ├── cli.rs          # Command-line arguments
//! ├── error.rs        # IndexError, SkipReason, ConfigError
//! ├── config.rs       # IndexConfig (PRJ_ROOT, PNG_SCALE)
//! ├── clock.rs        # Clock, SystemClock, FixedClock
//! ├── frontmatter.rs  # Block-comment and YAML-fence frontmatter
//! ├── artifacts.rs    # Rendered SVG/PNG lookup
//! ├── types.rs        # DiagramMetadata, IndexEntry, DiagramIndex
//! └── builder.rs      # IndexBuilder
//! ```
//!
//! # Frontmatter
//!
//! ```text
//! /*
//!  * id: auth-flow
//!  * title: Authentication Flow
//!  * tags: [auth, login]
//!  */
//! sequenceDiagram
//!     Alice->>Bob: Hello
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod artifacts;
pub mod builder;
pub mod clock;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use artifacts::{Artifact, ArtifactKind, ArtifactSet};
pub use builder::{IndexBuilder, IndexReport, SkippedSource};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::IndexConfig;
pub use error::{ConfigError, IndexError, SkipReason};
pub use frontmatter::{FRONTMATTER_STYLES, FrontmatterStyle, extract_frontmatter, parse_metadata};
pub use types::{DiagramIndex, DiagramMetadata, IndexEntry};

// ============================================================================
// JSON Schema Generation
// ============================================================================

/// Generate JSON Schema for the `index.yml` document.
#[must_use]
pub fn diagram_index_schema() -> String {
    let schema = schemars::schema_for!(DiagramIndex);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

// ============================================================================
// Version
// ============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
