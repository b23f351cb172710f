//! diagram-index: scan `diagrams/*.mmd` frontmatter and write `index.yml`.
//!
//! Usage:
//!   diagram-index                      # index $PRJ_ROOT (or cwd)
//!   diagram-index --root docs --stdout # print instead of writing
//!   PNG_SCALE=2 diagram-index          # record a different raster scale
//!
//! Logging: set `RUST_LOG=debug` for per-file detail on stderr.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use omni_diagrams::config::ENV_PNG_SCALE;
use omni_diagrams::{IndexBuilder, IndexConfig};

use crate::cli::Cli;

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<IndexConfig> {
    // An explicit --png-scale wins over a malformed PNG_SCALE.
    let mut config = IndexConfig::from_lookup(|key| {
        if key == ENV_PNG_SCALE && cli.png_scale.is_some() {
            return None;
        }
        std::env::var(key).ok()
    })
    .context("invalid environment configuration")?;

    if let Some(root) = &cli.root {
        config.root.clone_from(root);
    }
    if let Some(scale) = cli.png_scale {
        config.png_scale = scale;
    }
    config.diagrams_dir.clone_from(&cli.diagrams_dir);
    config.output.clone_from(&cli.output);
    Ok(config)
}

fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();

    if cli.schema {
        println!("{}", omni_diagrams::diagram_index_schema());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    log::debug!("Indexing diagrams under {}", config.root.display());

    let builder = IndexBuilder::new(config);
    let report = builder.build_index().context("failed to scan diagrams")?;

    log::info!(
        "Indexed {} diagram(s), skipped {}",
        report.index.len(),
        report.skipped.len()
    );

    if cli.stdout {
        print!("{}", IndexBuilder::render_index(&report.index)?);
        return Ok(());
    }

    let output = builder.config().output_path();
    if let Err(e) = IndexBuilder::write_index(&report.index, &output) {
        log::error!("{e}");
    }
    Ok(())
}
