/// Folder cleanup: sorting files into category subfolders.
///
/// A cleanup run scans the direct entries of a folder, then sorts each regular
/// file by its extension:
///
/// 1. excluded extensions stay where they are
/// 2. supported extensions move to `save_to/<category>/`
/// 3. anything else moves to `save_to/unknowns/` when grouping unknowns,
///    otherwise it stays where it is
///
/// A file whose destination already exists is skipped, never overwritten.
use indicatif::ProgressBar;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::categories::CategoryMap;
use crate::error::{FolderError, FolderResult};
use crate::store::expand_user;

/// Default destination folder name, relative to the cleaned folder.
pub const DEFAULT_SAVE_DIR: &str = "clean-folder";
/// Subfolder for files matching no category.
pub const UNKNOWNS_DIR: &str = "unknowns";

/// A regular file found while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    /// Extension without the leading dot; empty when the file has none.
    pub extension: String,
}

impl FileEntry {
    pub fn new(path: PathBuf) -> Self {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, extension }
    }
}

/// Where a file belongs according to the category maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Listed under an excluded category; never moved.
    Excluded,
    /// Listed under a supported category.
    Category(String),
    /// Not listed anywhere; moved only when grouping unknowns.
    Unknown,
}

/// Records a single file move.
#[derive(Debug, Clone)]
pub struct Operation {
    pub original_path: PathBuf,
    pub new_path: PathBuf,
    /// The subfolder the file was moved into.
    pub category: String,
}

/// Outcome of a cleanup run.
#[derive(Debug, Clone, Default)]
pub struct CleanReport {
    /// Extension histogram of the scanned files.
    pub extensions: BTreeMap<String, usize>,
    pub moves: Vec<Operation>,
    /// Files left in place because their extension is excluded.
    pub excluded: usize,
    /// Unknown files left in place because unknowns are not grouped.
    pub left_in_place: usize,
    /// Files whose destination already existed.
    pub skipped: Vec<PathBuf>,
}

impl CleanReport {
    /// Number of files moved into each subfolder.
    pub fn moved_by_category(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for op in &self.moves {
            *counts.entry(op.category.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Sorts the files of a folder into category subfolders.
#[derive(Debug, Clone)]
pub struct Cleaner {
    path: PathBuf,
    save_to: PathBuf,
    supported: CategoryMap,
    excluded: CategoryMap,
    group_unknowns: bool,
    files: Vec<FileEntry>,
}

impl Cleaner {
    /// Creates a cleaner for `path`.
    ///
    /// A relative `save_to` is resolved against `path`.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::EmptyPath` if `path` is empty.
    pub fn new(
        path: impl AsRef<Path>,
        save_to: impl AsRef<Path>,
        supported: CategoryMap,
        excluded: CategoryMap,
    ) -> FolderResult<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(FolderError::EmptyPath);
        }
        let path = expand_user(path);
        let save_to = path.join(expand_user(save_to.as_ref()));

        Ok(Self {
            path,
            save_to,
            supported,
            excluded,
            group_unknowns: false,
            files: Vec::new(),
        })
    }

    /// Moves unrecognized files into an `unknowns` subfolder instead of leaving them.
    pub fn group_unknowns(mut self, enabled: bool) -> Self {
        self.group_unknowns = enabled;
        self
    }

    /// True when unknowns are grouped and a supported category is also named
    /// `unknowns`, so both land in the same folder.
    pub fn unknowns_collide(&self) -> bool {
        self.group_unknowns && self.supported.get(UNKNOWNS_DIR).is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save_to(&self) -> &Path {
        &self.save_to
    }

    /// Files found by the last [`Cleaner::analyze`].
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Decides where a file with `extension` belongs.
    pub fn classify(&self, extension: &str) -> Placement {
        if self.excluded.contains_extension(extension) {
            return Placement::Excluded;
        }
        match self.supported.category_for(extension) {
            Some(category) => Placement::Category(category.to_string()),
            None => Placement::Unknown,
        }
    }

    /// Scans the folder for regular files and returns a histogram of their extensions.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::EmptyDirectory` if the folder holds no regular files.
    pub fn analyze(&mut self) -> FolderResult<BTreeMap<String, usize>> {
        let entries = fs::read_dir(&self.path)
            .map_err(|e| FolderError::io("read directory", &self.path, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FolderError::io("read directory", &self.path, e))?;
            // Follows symlinks, so a link to a regular file is sorted like one.
            let path = entry.path();
            if path.is_file() {
                files.push(FileEntry::new(path));
            }
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));

        if files.is_empty() {
            return Err(FolderError::EmptyDirectory {
                dir: self.path.clone(),
            });
        }

        let mut histogram = BTreeMap::new();
        for file in &files {
            *histogram.entry(file.extension.clone()).or_insert(0) += 1;
        }
        info!("Found {} unique extensions", histogram.len());
        for (extension, count) in &histogram {
            info!("{}: {}", extension, count);
        }

        self.files = files;
        Ok(histogram)
    }

    /// Moves the analyzed files into their category subfolders.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::EmptyFilesList` if [`Cleaner::analyze`] has not
    /// found any files yet. A failed move aborts the run with
    /// `FolderError::MoveFailed`.
    pub fn cleanup(&self, progress: &ProgressBar) -> FolderResult<CleanReport> {
        if self.files.is_empty() {
            return Err(FolderError::EmptyFilesList {
                dir: self.path.clone(),
            });
        }

        progress.set_length(self.files.len() as u64);
        let mut report = CleanReport::default();

        for file in &self.files {
            progress.inc(1);
            let folder = match self.classify(&file.extension) {
                Placement::Excluded => {
                    debug!("'.{}' recognized as excluded type. Skipping file..", file.extension);
                    report.excluded += 1;
                    continue;
                }
                Placement::Category(category) => {
                    debug!("'.{}' recognized as supported type. Moving now...", file.extension);
                    category
                }
                Placement::Unknown if self.group_unknowns => {
                    debug!("'.{}' is not recognized. Moving to unknowns now...", file.extension);
                    UNKNOWNS_DIR.to_string()
                }
                Placement::Unknown => {
                    report.left_in_place += 1;
                    continue;
                }
            };

            match move_into(&self.save_to, &file.path, &folder)? {
                Some(op) => report.moves.push(op),
                None => report.skipped.push(file.path.clone()),
            }
        }

        Ok(report)
    }

    /// Runs a complete cleanup: creates the destination, scans, then sorts.
    pub fn run(&mut self) -> FolderResult<CleanReport> {
        self.run_with(&ProgressBar::hidden())
    }

    pub fn run_with(&mut self, progress: &ProgressBar) -> FolderResult<CleanReport> {
        info!("Cleanup operation started");
        info!("Cleanup directory: {}", self.path.display());
        info!("Creating {} directory", self.save_to.display());
        if self.unknowns_collide() {
            warn!(
                "Supported category '{}' shares its folder with unrecognized files",
                UNKNOWNS_DIR
            );
        }

        match fs::create_dir(&self.save_to) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("Folder {} already exists.", self.save_to.display());
            }
            Err(e) => return Err(FolderError::io("create directory", &self.save_to, e)),
        }

        let extensions = self.analyze()?;
        let mut report = self.cleanup(progress)?;
        report.extensions = extensions;

        info!(
            "Cleanup finished: {} moved, {} excluded, {} left in place, {} skipped",
            report.moves.len(),
            report.excluded,
            report.left_in_place,
            report.skipped.len()
        );
        Ok(report)
    }
}

/// Parses a truth value the way command-line boolean options accept it.
///
/// True values are `y`, `yes`, `t`, `true`, `on` and `1`; false values are
/// `n`, `no`, `f`, `false`, `off` and `0`, in any letter case.
///
/// # Errors
///
/// Returns `FolderError::InvalidBoolValue` for anything else.
pub fn parse_truthy(value: &str) -> FolderResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Ok(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Ok(false),
        _ => Err(FolderError::InvalidBoolValue {
            value: value.to_string(),
        }),
    }
}

/// Moves a file into `save_to/<folder>/`, creating the subfolder if needed.
///
/// Returns `Ok(None)` without touching the file if the destination already exists.
fn move_into(save_to: &Path, file_path: &Path, folder: &str) -> FolderResult<Option<Operation>> {
    let category_path = save_to.join(folder);
    fs::create_dir_all(&category_path)
        .map_err(|e| FolderError::io("create directory", &category_path, e))?;

    let Some(file_name) = file_path.file_name() else {
        return Err(FolderError::MoveFailed {
            from: file_path.to_path_buf(),
            to: category_path,
            source: std::io::Error::new(ErrorKind::InvalidInput, "file has no name component"),
        });
    };
    let destination_path = category_path.join(file_name);

    if destination_path.exists() {
        warn!(
            "{} already exists, leaving {} in place",
            destination_path.display(),
            file_path.display()
        );
        return Ok(None);
    }

    fs::rename(file_path, &destination_path).map_err(|e| FolderError::MoveFailed {
        from: file_path.to_path_buf(),
        to: destination_path.clone(),
        source: e,
    })?;

    Ok(Some(Operation {
        original_path: file_path.to_path_buf(),
        new_path: destination_path,
        category: folder.to_string(),
    }))
}
