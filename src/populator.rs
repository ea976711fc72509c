//! Placeholder file generation.
//!
//! The populator fills a folder with empty files, `amount` per category, named
//! `{category}_{random 64-bit hex}_{index}.{extension}` where the extension is
//! drawn at random from the category's extensions.

use indicatif::ProgressBar;
use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::categories::CategoryMap;
use crate::error::{FolderError, FolderResult};
use crate::filter::ResolvedFilter;
use crate::store::expand_user;

/// Outcome of a populate run.
#[derive(Debug, Clone, Default)]
pub struct PopulateReport {
    /// Every file created (or touched) during the run.
    pub created: Vec<PathBuf>,
    /// Categories files were generated for.
    pub categories: Vec<String>,
}

/// Generates placeholder files for a pool of categories.
#[derive(Debug, Clone)]
pub struct Populator {
    path: PathBuf,
    amount: usize,
    pool: CategoryMap,
}

impl Populator {
    /// Creates a populator for `path` over the categories selected by `filter`.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::EmptyPath` if `path` is empty, or
    /// `FolderError::AmountTooLarge` if `amount` times the number of selected
    /// categories overflows.
    pub fn new(
        path: impl AsRef<Path>,
        amount: usize,
        supported: &CategoryMap,
        filter: &ResolvedFilter,
    ) -> FolderResult<Self> {
        Self::with_rng(path, amount, supported, filter, &mut rand::thread_rng())
    }

    /// Like [`Populator::new`], drawing the `random` filter choice from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        path: impl AsRef<Path>,
        amount: usize,
        supported: &CategoryMap,
        filter: &ResolvedFilter,
        rng: &mut R,
    ) -> FolderResult<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(FolderError::EmptyPath);
        }

        let pool = filter.select(supported, rng);
        if amount.checked_mul(pool.len()).is_none() {
            return Err(FolderError::AmountTooLarge {
                amount,
                categories: pool.len(),
            });
        }

        Ok(Self {
            path: expand_user(path),
            amount,
            pool,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn amount(&self) -> usize {
        self.amount
    }

    /// The categories this populator generates files for.
    pub fn pool(&self) -> &CategoryMap {
        &self.pool
    }

    /// Number of files a run will create.
    pub fn total_to_produce(&self) -> usize {
        self.amount.saturating_mul(self.pool.len())
    }

    /// Runs with the thread-local RNG and no progress display.
    pub fn run(&self) -> FolderResult<PopulateReport> {
        self.run_with(&mut rand::thread_rng(), &ProgressBar::hidden())
    }

    /// Creates the target folder if needed, then the placeholder files.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::EmptyCategory` if a category in the pool has no
    /// extensions, or `FolderError::Io` if a directory or file cannot be created.
    pub fn run_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        progress: &ProgressBar,
    ) -> FolderResult<PopulateReport> {
        if let Some((category, _)) = self.pool.iter().find(|(_, exts)| exts.is_empty()) {
            return Err(FolderError::EmptyCategory {
                category: category.to_string(),
            });
        }

        info!("Population directory: {}", self.path.display());
        info!("Population amount:    {}", self.amount);
        info!(
            "Population types:     {}",
            self.pool.names().collect::<Vec<_>>().join(",")
        );
        info!("Population total to produce: {}", self.total_to_produce());

        if !self.path.exists() {
            debug!("Directory {} does not exist. Creating now...", self.path.display());
        }
        fs::create_dir_all(&self.path)
            .map_err(|e| FolderError::io("create directory", &self.path, e))?;

        progress.set_length(self.total_to_produce() as u64);
        let mut report = PopulateReport {
            created: Vec::new(),
            categories: self.pool.names().map(str::to_string).collect(),
        };

        for (category, extensions) in self.pool.iter() {
            for index in 0..self.amount {
                let hash = rng.next_u64();
                // Non-empty, checked above.
                let Some(extension) = extensions.choose(rng) else {
                    continue;
                };
                let file = self
                    .path
                    .join(generated_file_name(category, hash, index, extension));
                touch(&file)?;
                debug!("Created file: {}", file.display());
                report.created.push(file);
                progress.inc(1);
            }
        }

        info!("Populate operation finished.");
        info!(
            "{} files created from {} different categories",
            report.created.len(),
            report.categories.len()
        );
        Ok(report)
    }
}

/// Builds the name of a generated file.
///
/// # Examples
///
/// ```
/// use folderlib::populator::generated_file_name;
///
/// assert_eq!(
///     generated_file_name("audio", 0xbeef, 3, "mp3"),
///     "audio_000000000000beef_3.mp3"
/// );
/// ```
pub fn generated_file_name(category: &str, hash: u64, index: usize, extension: &str) -> String {
    format!("{category}_{hash:016x}_{index}.{extension}")
}

fn touch(path: &Path) -> FolderResult<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|e| FolderError::io("create file", path, e))
}
