//! Error types shared by the category store and both workers.

use std::path::PathBuf;
use thiserror::Error;

use crate::filter::SPECIAL_KEYWORDS;

/// Errors that can occur while resolving categories, populating or cleaning a folder.
#[derive(Debug, Error)]
pub enum FolderError {
    /// A required directory argument was empty.
    #[error("Required path is empty")]
    EmptyPath,

    /// Cleanup was invoked before any files were scanned.
    #[error("No scanned files available for cleanup in {}", .dir.display())]
    EmptyFilesList { dir: PathBuf },

    /// The folder to clean contains no regular files.
    #[error("Directory {} contains no files", .dir.display())]
    EmptyDirectory { dir: PathBuf },

    /// A referenced JSON file does not exist.
    #[error("File {} does not exist", .path.display())]
    MissingJsonFile { path: PathBuf },

    /// A referenced JSON file exists but is not valid JSON.
    #[error("File {} is not a valid JSON file: {source}", .path.display())]
    InvalidJsonFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// An update was requested against a cache file that was never created.
    #[error("Cache file {} does not exist", .path.display())]
    MissingCacheFile { path: PathBuf },

    /// The category pool was not a mapping of category names to extension lists.
    #[error("Invalid category pool: expected a mapping of category names to extension lists, found {found}")]
    InvalidPoolType { found: String },

    /// The filter keyword is not one of the special keywords.
    #[error("Filters special keyword cannot be '{value}'. Possible values are [{}]", SPECIAL_KEYWORDS.join(","))]
    InvalidFilterKeyword { value: String },

    /// The filter was neither a keyword nor a list of category names.
    #[error("Invalid type for filters: expected a keyword or a list of category names, found {found}")]
    InvalidFilterType { found: String },

    /// A bracketed filter list could not be parsed.
    #[error("Invalid filter list '{value}': expected e.g. [audio, video]")]
    InvalidFilterList { value: String },

    /// A boolean option received an unrecognized value.
    #[error("Invalid truth value '{value}'")]
    InvalidBoolValue { value: String },

    /// A category has no extensions to generate files from.
    #[error("Category '{category}' has no extensions")]
    EmptyCategory { category: String },

    /// The requested number of files does not fit in memory.
    #[error("Cannot generate {amount} files for each of {categories} categories")]
    AmountTooLarge { amount: usize, categories: usize },

    /// The platform cache directory could not be determined.
    #[error("Could not determine a cache directory for this platform")]
    CacheDirUnavailable,

    /// A file system operation failed.
    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    /// Moving a file into its category folder failed.
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

impl FolderError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Result type for folderlib operations.
pub type FolderResult<T> = Result<T, FolderError>;
