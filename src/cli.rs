//! Command-line interface module for folderlib.
//!
//! This module handles all CLI-related functionality including:
//! - Command parsing and validation
//! - Category resolution through the cache store
//! - Populator and cleaner orchestration
//! - Summary output

use clap::{ArgAction, Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::categories::CategoryKind;
use crate::cleaner::{CleanReport, Cleaner, DEFAULT_SAVE_DIR, parse_truthy};
use crate::error::FolderResult;
use crate::filter::{self, FilterArg};
use crate::output::OutputFormatter;
use crate::populator::{PopulateReport, Populator};
use crate::store::{CacheDir, CategoryStore, PoolSource};

/// Populate folders with placeholder files, or sort files into category folders.
#[derive(Debug, Parser)]
#[command(name = "folderlib", version, about, arg_required_else_help = true)]
pub struct Cli {
    /// Directory holding the category cache files
    #[arg(long, global = true, env = "FOLDERLIB_CACHE_DIR", value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Populate a folder with random files of different types
    #[command(arg_required_else_help = true)]
    Populator(PopulatorArgs),
    /// Sort the files of a folder into category subfolders
    #[command(arg_required_else_help = true)]
    Cleaner(CleanerArgs),
}

impl Command {
    pub fn verbose(&self) -> bool {
        match self {
            Command::Populator(args) => args.verbose,
            Command::Cleaner(args) => args.verbose,
        }
    }
}

#[derive(Debug, Args)]
pub struct PopulatorArgs {
    /// Number of files to generate per category
    #[arg(short, long, default_value_t = 10, value_name = "INTEGER")]
    pub amount: usize,

    /// Folder where the files will be generated
    #[arg(short, long, value_name = "PATH")]
    pub folder: PathBuf,

    /// Enables verbose logging messages
    #[arg(long)]
    pub verbose: bool,

    /// JSON file with supported file categories to produce
    #[arg(short, long, value_name = "PATH")]
    pub supported: Option<PathBuf>,

    /// Categories to produce, e.g. [audio, video], or all / random
    #[arg(long, value_name = "LIST", value_parser = FilterArg::from_cli)]
    pub filters: Option<FilterArg>,
}

#[derive(Debug, Args)]
pub struct CleanerArgs {
    /// Folder whose files will be sorted
    #[arg(short, long, value_name = "PATH")]
    pub folder: PathBuf,

    /// Folder where the sorted files are stored, relative to --folder unless absolute
    #[arg(short, long, default_value = DEFAULT_SAVE_DIR, value_name = "PATH")]
    pub save: PathBuf,

    /// Enables verbose logging messages
    #[arg(long)]
    pub verbose: bool,

    /// JSON file with supported file categories
    #[arg(short, long, value_name = "PATH")]
    pub pool: Option<PathBuf>,

    /// JSON file with file categories to leave untouched
    #[arg(short, long, value_name = "PATH")]
    pub excluded: Option<PathBuf>,

    /// Move unrecognized files into an "unknowns" folder (yes/no, true/false, on/off, 1/0)
    #[arg(
        long,
        value_name = "BOOL",
        default_value = "false",
        action = ArgAction::Set,
        value_parser = parse_truthy
    )]
    pub group_unknowns: bool,
}

/// Runs the parsed command line.
///
/// # Errors
///
/// Propagates any error from category resolution or the selected worker.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use folderlib::cli::{Cli, run};
///
/// let cli = Cli::parse_from(["folderlib", "populator", "--folder", "/tmp/demo"]);
/// if let Err(e) = run(cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run(cli: Cli) -> FolderResult<()> {
    let cache = match cli.cache_dir {
        Some(dir) => CacheDir::new(dir),
        None => CacheDir::for_worker(None)?,
    };
    let store = CategoryStore::open(cache)?;

    match cli.command {
        Command::Populator(args) => run_populator(&store, &args).map(|_| ()),
        Command::Cleaner(args) => run_cleaner(&store, &args).map(|_| ()),
    }
}

/// Resolves the category pool and filter, then populates the folder.
pub fn run_populator(store: &CategoryStore, args: &PopulatorArgs) -> FolderResult<PopulateReport> {
    let supported_override = args.supported.clone().map(PoolSource::File);
    let supported = store.resolve(CategoryKind::Supported, supported_override.as_ref())?;
    let filter = filter::validate(args.filters.clone())?;

    let populator = Populator::new(&args.folder, args.amount, &supported, &filter)?;
    if populator.pool().is_empty() {
        OutputFormatter::warning("No categories matched the filters; nothing to generate.");
    }

    let progress = progress_bar(args.verbose);
    let report = populator.run_with(&mut rand::thread_rng(), &progress)?;
    progress.finish_and_clear();

    let counts: BTreeMap<String, usize> = report
        .categories
        .iter()
        .map(|category| (category.clone(), populator.amount()))
        .collect();
    OutputFormatter::summary_table("GENERATED", "Category", &counts);
    OutputFormatter::success(&format!(
        "{} files created in {}",
        report.created.len(),
        populator.path().display()
    ));

    Ok(report)
}

/// Resolves the supported and excluded categories, then cleans the folder.
pub fn run_cleaner(store: &CategoryStore, args: &CleanerArgs) -> FolderResult<CleanReport> {
    let supported_override = args.pool.clone().map(PoolSource::File);
    let excluded_override = args.excluded.clone().map(PoolSource::File);
    let supported = store.resolve(CategoryKind::Supported, supported_override.as_ref())?;
    let excluded = store.resolve(CategoryKind::Excluded, excluded_override.as_ref())?;

    let mut cleaner = Cleaner::new(&args.folder, &args.save, supported, excluded)?
        .group_unknowns(args.group_unknowns);

    let progress = progress_bar(args.verbose);
    let report = cleaner.run_with(&progress)?;
    progress.finish_and_clear();

    OutputFormatter::summary_table("SCANNED", "Extension", &report.extensions);
    OutputFormatter::summary_table("MOVED", "Category", &report.moved_by_category());
    if report.excluded > 0 {
        OutputFormatter::info(&format!("{} excluded files left in place", report.excluded));
    }
    if report.left_in_place > 0 {
        OutputFormatter::info(&format!(
            "{} unrecognized files left in place",
            report.left_in_place
        ));
    }
    for path in &report.skipped {
        OutputFormatter::warning(&format!(
            "Skipped {}: destination already exists",
            path.display()
        ));
    }
    OutputFormatter::success(&format!(
        "Cleanup complete. Sorted files are in {}",
        cleaner.save_to().display()
    ));

    Ok(report)
}

// Hidden in verbose mode, where every file is logged instead.
fn progress_bar(verbose: bool) -> indicatif::ProgressBar {
    if verbose {
        indicatif::ProgressBar::hidden()
    } else {
        OutputFormatter::create_progress_bar()
    }
}
