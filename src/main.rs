//! bibtags - tag and period reports for a bibliographic library
//!
//! ## Usage
//!
//! ```bash
//! bibtags --config bibtags.toml all
//! bibtags --input library.json --out-dir docs reports
//! bibtags snapshot --dir dumps
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use bibtags::output::{ArtifactWriter, RunSummary};
use bibtags::pipeline;
use bibtags::{source, Bibliography, Config, Overrides};

const DEFAULT_CONFIG: &str = "bibtags.toml";

// ============================================================================
// CLI Definition
// ============================================================================

/// Tag tables, reports and period timelines from a reference library
#[derive(Parser)]
#[command(name = "bibtags")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: ./bibtags.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read this library dump instead of the configured source
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, global = true)]
    out_dir: Option<PathBuf>,

    /// Overwrite existing outputs
    #[arg(short, long, global = true)]
    force: bool,

    /// Leave the generation time off every page
    #[arg(long, global = true)]
    no_timestamp: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-group item reports
    Reports,
    /// Category/subcategory tag tables, plain and by scenario
    Tags,
    /// Period survey and timeline
    Periods,
    /// Index page linking every group
    Index,
    /// Every step above
    All,
    /// Save the library as `{name}_{YYYYmmdd_HHMM}.json`
    Snapshot {
        /// Target directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    fmt().with_env_filter(filter).with_target(false).init();

    let config = load_config(&cli)?;
    let bib = Bibliography::with_source(
        source::open(&config.source).context("opening library source")?,
    );

    if let Commands::Snapshot { dir } = &cli.command {
        let library = bib.fetch().context("loading library")?;
        let name = library.name().unwrap_or("library");
        let path = dir.join(pipeline::snapshot_file_name(name, Local::now().naive_local()));
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        library.save(&path).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), items = library.items.len(), "snapshot written");
        return Ok(());
    }

    let writer = ArtifactWriter::new(&config.output_dir).force(cli.force);
    let ctx = bib
        .context(config)
        .context("loading library")?
        .with_generated_at(Local::now().naive_local());

    let summary = match cli.command {
        Commands::Reports => pipeline::run_reports(&ctx, &writer),
        Commands::Tags => pipeline::run_tag_tables(&ctx, &writer),
        Commands::Periods => pipeline::run_periods(&ctx, &writer),
        Commands::Index => pipeline::run_index(&ctx, &writer),
        Commands::All => pipeline::run_all(&ctx, &writer),
        Commands::Snapshot { .. } => Ok(RunSummary::default()),
    }
    .context("rendering")?;

    info!(
        written = summary.written.len(),
        skipped = summary.skipped.len(),
        out_dir = %writer.out_dir().display(),
        "done"
    );
    Ok(())
}

/// Config file (explicit, or `./bibtags.toml`, or defaults) with CLI overrides applied.
fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::discover(cli.config.as_deref(), Path::new(DEFAULT_CONFIG))
        .context("reading config")?;
    let overrides = Overrides {
        input: cli.input.clone(),
        output_dir: cli.out_dir.clone(),
        no_timestamp: cli.no_timestamp,
    };
    Ok(config.with_overrides(&overrides))
}
