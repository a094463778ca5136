mod analysis;
mod cleaner;
mod corpus;
mod error;
mod fetcher;
mod settings;
mod store;
mod toc;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use analysis::observer::TracingObserver;
use analysis::{Analyses, Category};
use corpus::Corpus;
use error::ConfigError;

/// Process status reported for any failed run (`-1` as a status byte).
const FAILURE: u8 = 255;

#[derive(Parser)]
#[command(name = "wi_analysis", about = "Download, clean, and analyze The Wandering Inn chapters")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the table of contents and chapter pages
    Fetch {
        /// JSON config file with a `table_of_contents` URL
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory chapter pages are written to
        #[arg(short, long)]
        database: Option<PathBuf>,
        /// Seconds to wait between chapter downloads
        #[arg(short = 't', long = "timedelay", default_value_t = settings::DEFAULT_TIME_DELAY_SECS)]
        time_delay: f64,
        /// Download the table of contents even if a cached copy exists
        #[arg(short, long)]
        refetch: bool,
        /// First chapter index to download (inclusive)
        #[arg(short, long)]
        start: Option<usize>,
        /// Last chapter index to download (exclusive)
        #[arg(short, long)]
        end: Option<usize>,
    },
    /// Strip raw chapter pages down to their main-content text
    Clean {
        /// Directory of raw pages
        source: PathBuf,
        /// Directory to write cleaned text to
        target: PathBuf,
        /// Allow writing into a non-empty target directory
        #[arg(short, long)]
        overwrite: bool,
    },
    /// Count colors, levels, classes, and skills across a directory of chapters
    Analyze {
        /// Directory of chapters (raw or cleaned)
        source: PathBuf,
        /// JSON file to write statistics to
        target: PathBuf,
        /// Merge into the existing target file instead of replacing it
        #[arg(long)]
        append: bool,
        /// Count inline span colors (needs raw pages)
        #[arg(long)]
        color: bool,
        /// Count levels, classes, and skills
        #[arg(long)]
        levels: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fetch {
            config,
            database,
            time_delay,
            refetch,
            start,
            end,
        } => {
            run_fetch(
                config.as_deref(),
                database.as_deref(),
                time_delay,
                refetch,
                start,
                end,
            )
            .await
        }
        Commands::Clean {
            source,
            target,
            overwrite,
        } => run_clean(&source, &target, overwrite),
        Commands::Analyze {
            source,
            target,
            append,
            color,
            levels,
        } => run_analyze(&source, &target, append, Analyses { color, levels }),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(FAILURE)
        }
    }
}

async fn run_fetch(
    config_path: Option<&Path>,
    database: Option<&Path>,
    time_delay: f64,
    refetch: bool,
    start: Option<usize>,
    end: Option<usize>,
) -> Result<()> {
    let delay = Duration::try_from_secs_f64(time_delay)
        .map_err(|_| ConfigError::TimeDelay(time_delay))?;
    let config_path =
        settings::resolve_config_path(config_path, Path::new(settings::DEFAULT_CONFIG_PATH))?;
    let fetch_config = settings::FetchConfig::load(&config_path)?;
    let database =
        settings::resolve_database_dir(database, Path::new(settings::DEFAULT_DATABASE_PATH))?;

    let plan = fetcher::FetchPlan {
        table_of_contents_url: fetch_config.table_of_contents,
        table_of_contents_path: PathBuf::from(settings::TABLE_OF_CONTENTS_FILE_NAME),
        database,
        refetch,
        delay,
        start,
        end,
    };

    let fetcher = fetcher::Fetcher::new()?;
    let stats = fetcher::fetch_chapters(&fetcher, &plan).await?;
    println!(
        "Downloaded {} of {} chapters into {}",
        stats.downloaded,
        stats.available,
        plan.database.display()
    );
    Ok(())
}

fn run_clean(source: &Path, target: &Path, overwrite: bool) -> Result<()> {
    cleaner::check_dirs(source, target, overwrite)?;
    let corpus = Corpus::open(source)?;
    println!("Cleaning {} pages...", corpus.len());

    let pb = progress_bar(corpus.len());
    let stats = cleaner::clean_files(&corpus, target, &pb)?;
    pb.finish_and_clear();

    println!("Wrote {} files ({} skipped).", stats.written, stats.skipped);
    Ok(())
}

fn run_analyze(source: &Path, target: &Path, append: bool, analyses: Analyses) -> Result<()> {
    if !source.is_dir() {
        return Err(ConfigError::NotADirectory {
            role: "Source",
            path: source.to_path_buf(),
        }
        .into());
    }
    if !analyses.color && !analyses.levels {
        warn!("Neither --color nor --levels given; only rewriting {}", target.display());
    }

    let mut stats = store::load(target, append)?;
    let corpus = Corpus::open(source)?;
    if corpus.is_empty() {
        warn!("No documents in {}", source.display());
    }
    println!("Analyzing {} documents...", corpus.len());

    let pb = progress_bar(corpus.len());
    let report = analysis::analyze(&corpus, analyses, &mut TracingObserver, &pb)?;
    pb.finish_and_clear();

    if let Some(colors) = &report.colors {
        println!("Colors:    {}", colors.len());
    }
    if let Some(levelling) = &report.levelling {
        for category in Category::ALL {
            println!("{:<10} {}", format!("{}:", category), levelling.tally(category).len());
        }
    }

    store::merge(&mut stats, &report)?;
    store::save(target, &stats)?;
    Ok(())
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
