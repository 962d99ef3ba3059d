use std::env;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::info;

use lift_tables::LoadMode;
use lift2csv::{Options, log_filter, run};

#[derive(Parser)]
#[command(name = "lift2csv")]
#[command(about = "Convert a LIFT lexicon into morpheme, morph, sense and example tables")]
struct Cli {
    /// LIFT file to convert.
    lift_file: PathBuf,
    /// Directory the CSV files are written to.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
    /// YAML configuration file.
    #[arg(short, long)]
    conf: Option<PathBuf>,
    /// Also package the tables as a CLDF dictionary in `<output>/cldf`.
    #[arg(long, default_value_t = false)]
    cldf: bool,
    /// `mmap` or `owned`; falls back to LIFT_LOAD_MODE, then mmap.
    #[arg(long, value_parser = parse_load_mode)]
    load_mode: Option<LoadMode>,
    /// Only report warnings and errors unless RUST_LOG says otherwise.
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let load_mode = cli
        .load_mode
        .or_else(|| {
            env::var("LIFT_LOAD_MODE")
                .ok()
                .as_deref()
                .and_then(LoadMode::parse)
        })
        .unwrap_or_default();
    let options = Options {
        lift_file: cli.lift_file,
        output_dir: cli.output,
        config_file: cli.conf,
        cldf: cli.cldf,
        load_mode,
    };

    let start = Instant::now();
    let tables = run(&options)?;
    info!(
        "converted {} morphemes, {} morphs, {} senses in {} ms",
        tables.morphemes.len(),
        tables.morphs.len(),
        tables.senses.len(),
        start.elapsed().as_millis()
    );
    Ok(())
}

fn parse_load_mode(raw: &str) -> Result<LoadMode, String> {
    LoadMode::parse(raw).ok_or_else(|| format!("unknown load mode '{raw}' (expected mmap or owned)"))
}

fn init_tracing(quiet: bool) {
    let directives = env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref(), quiet))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
