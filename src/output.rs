//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: the log format,
//! colored status lines, progress bars and summary tables.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter};
use std::collections::BTreeMap;
use std::io::Write;

/// Installs the console logger.
///
/// Records are written as `[timestamp][target] LEVEL message`. The default
/// level is `info`, or `debug` when `verbose` is set; `RUST_LOG` overrides both.
pub fn init_logger(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => "ERROR".red().bold(),
                Level::Warn => "WARNING".white(),
                Level::Info => "INFO".cyan(),
                Level::Debug => "DEBUG".cyan(),
                Level::Trace => "TRACE".dimmed(),
            };
            writeln!(
                buf,
                "[{}][{}] {} {}",
                chrono::Local::now()
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
                    .bright_blue(),
                record.target(),
                level,
                record.args()
            )
        })
        .init();
}

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use folderlib::output::OutputFormatter;
    /// OutputFormatter::success("Folder cleaned!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for file operations.
    ///
    /// The length is set by the operation once it knows how many files it handles.
    ///
    /// ```no_run
    /// use folderlib::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar();
    /// pb.set_length(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar() -> ProgressBar {
        let pb = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    /// Prints a two-column table of counts with a total row.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use folderlib::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("audio".to_string(), 15);
    /// counts.insert("image".to_string(), 8);
    /// OutputFormatter::summary_table("SUMMARY", "Category", &counts);
    /// ```
    pub fn summary_table(title: &str, label: &str, counts: &BTreeMap<String, usize>) {
        Self::header(title);

        let total: usize = counts.values().sum();
        let width = counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(label.len())
            .max("Total".len());

        println!("{:<width$} | {}", label.bold(), "Files".bold(), width = width);
        println!("{}", "-".repeat(width + 10));

        for (name, count) in counts {
            let name = if name.is_empty() { "(none)" } else { name.as_str() };
            println!(
                "{:<width$} | {} {}",
                name,
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            plural(total),
            width = width
        );
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
