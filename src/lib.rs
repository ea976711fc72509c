//! folderlib - folder population and cleanup utilities
//!
//! This library provides a populator that fills a folder with placeholder
//! files of categorized extensions, and a cleaner that sorts the files of a
//! folder into category subfolders. Both share a category store that merges
//! user-supplied category definitions into a persistent on-disk cache.

pub mod categories;
pub mod cleaner;
pub mod cli;
pub mod error;
pub mod filter;
pub mod output;
pub mod populator;
pub mod store;

pub use categories::{CategoryKind, CategoryMap};
pub use cleaner::{CleanReport, Cleaner, FileEntry, Placement};
pub use error::{FolderError, FolderResult};
pub use filter::{FilterArg, ResolvedFilter};
pub use populator::{PopulateReport, Populator};
pub use store::{CacheDir, CategoryStore, PoolSource};

pub use cli::{Cli, run};
