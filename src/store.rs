//! Persistent category store.
//!
//! Resolves the supported and excluded [`CategoryMap`]s for a worker from
//! three sources:
//! - the built-in defaults
//! - a cache file per map kind inside a [`CacheDir`]
//! - an optional one-time override (a JSON file or an in-memory map)
//!
//! # Cache File Format
//!
//! Each cache file is a JSON object with sorted keys and 4-space indentation:
//!
//! ```json
//! {
//!     "audio": [
//!         "mp3",
//!         "wav"
//!     ]
//! }
//! ```
//!
//! Overrides are merged into an existing cache file, never replacing it.
//! There is no locking: two processes merging into the same cache file at the
//! same time race and the last writer wins.

use log::debug;
use serde_json::Value;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::categories::{CategoryKind, CategoryMap, json_type_name};
use crate::error::{FolderError, FolderResult};

/// Author component of the default cache location.
pub const APP_AUTHOR: &str = "FolderWonder";
/// Worker name used when none is given.
pub const DEFAULT_WORKER_NAME: &str = "worker";

/// Handle to the directory holding the category cache files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDir {
    root: PathBuf,
}

impl CacheDir {
    /// Uses `root` as the cache directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: expand_user(&root.into()),
        }
    }

    /// Returns the platform cache directory for the named worker.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::CacheDirUnavailable` if the platform has no cache directory.
    pub fn for_worker(name: Option<&str>) -> FolderResult<Self> {
        let base = dirs::cache_dir().ok_or(FolderError::CacheDirUnavailable)?;
        Ok(Self {
            root: base
                .join(APP_AUTHOR)
                .join(name.unwrap_or(DEFAULT_WORKER_NAME)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the cache file for `kind`.
    pub fn file_for(&self, kind: CategoryKind) -> PathBuf {
        self.root.join(kind.cache_file_name())
    }
}

/// A one-time override for a category map.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolSource {
    /// Path to a JSON document shaped like a cache file.
    File(PathBuf),
    /// Categories supplied directly.
    Map(CategoryMap),
}

impl PoolSource {
    /// Builds an override from a JSON value.
    ///
    /// A string is taken as a path to a JSON file, an object as a category
    /// mapping and `null` as no override.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::InvalidPoolType` for any other JSON type.
    pub fn from_value(value: &Value) -> FolderResult<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::String(path) => Ok(Some(PoolSource::File(PathBuf::from(path)))),
            Value::Object(_) => Ok(Some(PoolSource::Map(CategoryMap::from_value(value)?))),
            other => Err(FolderError::InvalidPoolType {
                found: json_type_name(other).to_string(),
            }),
        }
    }

    /// Returns true if the override carries nothing to apply.
    pub fn is_empty(&self) -> bool {
        match self {
            PoolSource::File(path) => path.as_os_str().is_empty(),
            PoolSource::Map(map) => map.is_empty(),
        }
    }

    fn load(&self) -> FolderResult<CategoryMap> {
        match self {
            PoolSource::File(path) => read_category_file(path),
            PoolSource::Map(map) => Ok(map.clone()),
        }
    }
}

impl From<CategoryMap> for PoolSource {
    fn from(map: CategoryMap) -> Self {
        PoolSource::Map(map)
    }
}

impl From<PathBuf> for PoolSource {
    fn from(path: PathBuf) -> Self {
        PoolSource::File(path)
    }
}

/// Resolves and persists category maps inside a cache directory.
#[derive(Debug, Clone)]
pub struct CategoryStore {
    cache: CacheDir,
}

impl CategoryStore {
    /// Opens the store, creating the cache directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::Io` if the directory cannot be created.
    pub fn open(cache: CacheDir) -> FolderResult<Self> {
        fs::create_dir_all(cache.path())
            .map_err(|e| FolderError::io("create cache directory", cache.path(), e))?;
        debug!("Using category cache at {}", cache.path().display());
        Ok(Self { cache })
    }

    pub fn cache_dir(&self) -> &CacheDir {
        &self.cache
    }

    /// Resolves the category map for `kind`.
    ///
    /// | cache file | override | result                                   |
    /// |------------|----------|------------------------------------------|
    /// | absent     | none     | built-in defaults, nothing written       |
    /// | absent     | given    | override written as the new cache file   |
    /// | present    | none     | cache file contents                      |
    /// | present    | given    | override merged into the cache file      |
    ///
    /// # Errors
    ///
    /// Returns `MissingJsonFile` or `InvalidJsonFile` when a JSON source is
    /// missing or malformed, and `InvalidPoolType` when it has the wrong shape.
    pub fn resolve(
        &self,
        kind: CategoryKind,
        override_pool: Option<&PoolSource>,
    ) -> FolderResult<CategoryMap> {
        let cache_file = self.cache.file_for(kind);
        let override_pool = override_pool.filter(|pool| !pool.is_empty());

        match (cache_file.exists(), override_pool) {
            (false, None) => {
                debug!("No {} cache file, using built-in categories", kind);
                Ok(kind.defaults())
            }
            (false, Some(pool)) => {
                let items = pool.load()?;
                self.create_cache_file(kind, &items)?;
                read_category_file(&cache_file)
            }
            (true, None) => read_category_file(&cache_file),
            (true, Some(pool)) => {
                let items = pool.load()?;
                self.update_cache_file(kind, &items)
            }
        }
    }

    /// Writes `items` as the cache file for `kind`, replacing any existing one.
    pub fn create_cache_file(&self, kind: CategoryKind, items: &CategoryMap) -> FolderResult<()> {
        fs::create_dir_all(self.cache.path())
            .map_err(|e| FolderError::io("create cache directory", self.cache.path(), e))?;
        let path = self.cache.file_for(kind);
        write_category_file(&path, items)?;
        debug!("Created {} cache file {}", kind, path.display());
        Ok(())
    }

    /// Merges `items` into the existing cache file for `kind` and returns the result.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::MissingCacheFile` if there is no cache file yet.
    pub fn update_cache_file(
        &self,
        kind: CategoryKind,
        items: &CategoryMap,
    ) -> FolderResult<CategoryMap> {
        let path = self.cache.file_for(kind);
        if !path.exists() {
            return Err(FolderError::MissingCacheFile { path });
        }

        let mut cached = read_category_file(&path)?;
        cached.merge(items);
        write_category_file(&path, &cached)?;
        debug!("Merged {} categories into {}", items.len(), path.display());

        read_category_file(&path)
    }
}

/// Reads and parses a JSON file.
///
/// # Errors
///
/// Returns `FolderError::MissingJsonFile` if the file does not exist and
/// `FolderError::InvalidJsonFile` if it is not well-formed JSON.
pub fn read_json_file(path: &Path) -> FolderResult<Value> {
    let path = expand_user(path);
    if !path.exists() {
        return Err(FolderError::MissingJsonFile { path });
    }

    let content =
        fs::read_to_string(&path).map_err(|e| FolderError::io("read", path.clone(), e))?;
    serde_json::from_str(&content).map_err(|source| FolderError::InvalidJsonFile { path, source })
}

/// Reads a JSON file holding a category mapping.
pub fn read_category_file(path: &Path) -> FolderResult<CategoryMap> {
    CategoryMap::from_value(&read_json_file(path)?)
}

fn write_category_file(path: &Path, items: &CategoryMap) -> FolderResult<()> {
    let file = fs::File::create(path).map_err(|e| FolderError::io("create", path, e))?;
    let mut writer = BufWriter::new(file);
    items
        .write_pretty(&mut writer)
        .map_err(|e| FolderError::io("write", path, e.into()))?;
    writer.flush().map_err(|e| FolderError::io("write", path, e))
}

/// Expands a leading `~` to the current user's home directory.
pub fn expand_user(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
