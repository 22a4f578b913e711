use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use hexscout::{
    config::{default_worker_count, CliOverrides},
    pattern::check_all, pattern_file::load_patterns, search, ResultReport,
    SearchConfig,
};
use std::{fs, num::NonZeroUsize, path::PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
struct CliSearchConfig {
    /// Path of the binary file to search in
    #[arg(short = 'b', long = "bin")]
    bin: Option<PathBuf>,

    /// Path of a JSON file containing a list of patterns
    #[arg(short = 'p', long = "pattern")]
    pattern: Option<PathBuf>,

    /// Number of worker threads (default or 0: CPU cores)
    #[arg(short = 'j', long = "threads", visible_alias = "processes")]
    threads: Option<usize>,

    /// Output progress steps
    #[arg(short, long)]
    verbose: bool,

    /// Show only statistics, not the JSON report
    #[arg(short, long)]
    stats: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Write the JSON report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a binary file for hex/regex patterns
    Search(Box<CliSearchConfig>),

    /// Check a pattern file without searching
    Validate {
        /// Path of a JSON file containing a list of patterns
        #[arg(short = 'p', long = "pattern")]
        pattern: PathBuf,

        /// Output progress steps
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => run_search(*args),
        Commands::Validate { pattern, verbose } => run_validate(pattern, verbose),
    }
}

fn run_search(args: CliSearchConfig) -> Result<()> {
    let file_config = SearchConfig::load_from(args.config.as_deref())
        .context("failed to load configuration")?;

    let config = file_config.merge_with_cli(CliOverrides {
        binary_path: args.bin,
        patterns_path: args.pattern,
        worker_count: args
            .threads
            .map(|n| NonZeroUsize::new(n).unwrap_or_else(default_worker_count)),
        log_level: args.verbose.then(|| "info".to_string()),
        stats_only: args.stats,
        pretty: args.pretty,
    });

    init_logging(&config.log_level);
    debug!("Effective configuration: {:?}", config);

    let report = search(&config)?;

    if config.stats_only {
        print_stats(&report);
        return Ok(());
    }

    let json = if config.pretty {
        report.to_json_pretty()?
    } else {
        report.to_json()?
    };

    match args.output {
        Some(path) => fs::write(&path, json + "\n")
            .with_context(|| format!("failed to write report to {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}

fn run_validate(pattern: PathBuf, verbose: bool) -> Result<()> {
    init_logging(if verbose { "info" } else { "warn" });

    let patterns = load_patterns(&pattern)?;
    let errors = check_all(&patterns);

    for error in &errors {
        eprintln!("{} {}", "[-]".red(), error);
    }

    if !errors.is_empty() {
        bail!(
            "{} of {} patterns in {} are invalid",
            errors.len(),
            patterns.len(),
            pattern.display()
        );
    }

    println!(
        "{} {} patterns valid",
        "[+]".green(),
        patterns.len()
    );
    Ok(())
}

/// Logs go to stderr so stdout carries only the report
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_stats(report: &ResultReport) {
    for result in &report.pattern_results {
        println!(
            "{}: {} matches",
            result.pattern.blue(),
            result.spans.len().to_string().green()
        );
    }

    println!(
        "\nFound {} matches for {} of {} patterns in {} bytes",
        report.total_matches,
        report.patterns_with_matches,
        report.patterns_searched,
        report.bytes_scanned
    );
}
