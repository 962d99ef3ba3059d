pub mod package;
pub mod writer;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lift_tables::{ConvertConfig, LiftDocument, LoadMode, Tables};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub use package::write_dictionary_dataset;
pub use writer::{write_table, write_tables};

/// One conversion run as requested on the command line.
#[derive(Debug, Clone)]
pub struct Options {
    pub lift_file: PathBuf,
    pub output_dir: PathBuf,
    pub config_file: Option<PathBuf>,
    pub cldf: bool,
    pub load_mode: LoadMode,
}

/// Log filter for a run: `RUST_LOG` directives win, otherwise the converter
/// crates log at info, or at warn when `quiet` is set.
pub fn log_filter(directives: Option<&str>, quiet: bool) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| {
            let level = if quiet { "warn" } else { "info" };
            EnvFilter::new(format!("lift_tables={level},lift2csv={level}"))
        })
}

pub fn load_config(path: Option<&Path>) -> Result<ConvertConfig> {
    match path {
        Some(path) => ConvertConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => {
            warn!("no configuration file provided, using defaults");
            Ok(ConvertConfig::default())
        }
    }
}

/// Convert the lexicon, write the CSV tables and, if requested, the CLDF
/// dataset.
pub fn run(options: &Options) -> Result<Tables> {
    let config = load_config(options.config_file.as_deref())?;

    info!(
        "parsing {} (mode: {:?})",
        options.lift_file.display(),
        options.load_mode
    );
    let lift = LiftDocument::load_with_mode(&options.lift_file, options.load_mode)
        .with_context(|| format!("loading {}", options.lift_file.display()))?;
    let tables = lift
        .convert(&config)
        .with_context(|| format!("converting {}", options.lift_file.display()))?;

    write_tables(&options.output_dir, &tables)?;
    info!("wrote CSV files to {}", options.output_dir.display());

    if options.cldf {
        write_dictionary_dataset(&tables, &options.output_dir, config.separator())?;
    }
    Ok(tables)
}
