use std::path::PathBuf;

use clap::Parser;

/// Build index.yml from diagrams/*.mmd frontmatter.
#[derive(Parser, Debug)]
#[command(name = "diagram-index")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Project root (default: $PRJ_ROOT, else the current directory)
    #[arg(long)]
    pub(crate) root: Option<PathBuf>,

    /// Diagram source directory, relative to the root
    #[arg(long, default_value = omni_diagrams::config::DEFAULT_DIAGRAMS_DIR)]
    pub(crate) diagrams_dir: PathBuf,

    /// Index file, relative to the root unless absolute
    #[arg(short, long, default_value = omni_diagrams::config::DEFAULT_OUTPUT)]
    pub(crate) output: PathBuf,

    /// Raster scale recorded in each entry (default: $PNG_SCALE, else 3)
    #[arg(long)]
    pub(crate) png_scale: Option<u32>,

    /// Print the index to stdout instead of writing the file
    #[arg(long, default_value = "false")]
    pub(crate) stdout: bool,

    /// Print the JSON Schema of the index document and exit
    #[arg(long, default_value = "false")]
    pub(crate) schema: bool,
}
