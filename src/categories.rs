//! Category maps: named buckets of file extensions.
//!
//! A [`CategoryMap`] maps a category name (e.g. "audio") to the list of file
//! extensions that belong to it. Two maps drive every run: the *supported*
//! categories (files are generated from or sorted into them) and the
//! *excluded* categories (files that are never touched).
//!
//! Categories are kept in name order, so when an extension appears under more
//! than one category the alphabetically first category wins. This is the same
//! order in which the cache files are written to disk.
//!
//! # Examples
//!
//! ```
//! use folderlib::categories::{CategoryKind, CategoryMap};
//!
//! let supported = CategoryKind::Supported.defaults();
//! assert_eq!(supported.category_for("mp3"), Some("audio"));
//! assert_eq!(supported.category_for("png"), Some("image"));
//! assert_eq!(supported.category_for("nope"), None);
//! ```

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::io;

use crate::error::{FolderError, FolderResult};

const AUDIO: &[&str] = &[
    "aac", "aiff", "flac", "m4a", "mid", "midi", "mp3", "ogg", "wav", "wma",
];
const COMPRESSED: &[&str] = &["7z", "bz2", "gz", "rar", "tar", "tgz", "xz", "zip"];
const IMAGE: &[&str] = &[
    "bmp", "gif", "ico", "jpeg", "jpg", "png", "svg", "tiff", "webp",
];
const SPREADSHEET: &[&str] = &["csv", "ods", "tsv", "xls", "xlsm", "xlsx"];
const TEXT: &[&str] = &["doc", "docx", "md", "odt", "pdf", "rtf", "tex", "txt"];
const VIDEO: &[&str] = &[
    "avi", "flv", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "webm", "wmv",
];

const BINARIES: &[&str] = &["bin", "dll", "dmg", "exe", "msi", "so"];
const SYMLINKS: &[&str] = &["alias", "lnk", "symlink", "webloc"];

/// Which of the two category maps an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    /// Categories files are generated from or sorted into.
    Supported,
    /// Categories whose files are always left in place.
    Excluded,
}

impl CategoryKind {
    /// Returns the file name of the cache file for this kind.
    pub fn cache_file_name(&self) -> &'static str {
        match self {
            CategoryKind::Supported => ".fw_supported",
            CategoryKind::Excluded => ".fw_excluded",
        }
    }

    /// Returns the built-in categories for this kind.
    pub fn defaults(&self) -> CategoryMap {
        let table: &[(&str, &[&str])] = match self {
            CategoryKind::Supported => &[
                ("audio", AUDIO),
                ("compressed", COMPRESSED),
                ("image", IMAGE),
                ("spreadsheet", SPREADSHEET),
                ("text", TEXT),
                ("video", VIDEO),
            ],
            CategoryKind::Excluded => &[("binaries", BINARIES), ("symlinks", SYMLINKS)],
        };

        table
            .iter()
            .map(|(name, extensions)| (*name, extensions.iter().copied()))
            .collect()
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKind::Supported => write!(f, "supported"),
            CategoryKind::Excluded => write!(f, "excluded"),
        }
    }
}

/// Mapping of category name to its de-duplicated extension list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryMap {
    categories: BTreeMap<String, Vec<String>>,
}

impl CategoryMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from a parsed JSON document.
    ///
    /// The document must be an object whose values are arrays of strings.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::InvalidPoolType` for any other shape.
    pub fn from_value(value: &Value) -> FolderResult<Self> {
        let object = value.as_object().ok_or_else(|| FolderError::InvalidPoolType {
            found: json_type_name(value).to_string(),
        })?;

        let mut map = Self::new();
        for (category, extensions) in object {
            let list = extensions
                .as_array()
                .ok_or_else(|| FolderError::InvalidPoolType {
                    found: format!("{} for category '{}'", json_type_name(extensions), category),
                })?;
            let names = list
                .iter()
                .map(|ext| {
                    ext.as_str().ok_or_else(|| FolderError::InvalidPoolType {
                        found: format!("{} in category '{}'", json_type_name(ext), category),
                    })
                })
                .collect::<FolderResult<Vec<_>>>()?;
            map.extend_category(category, names);
        }
        Ok(map)
    }

    /// Adds extensions to a category, creating it when absent.
    ///
    /// Extensions already listed are skipped and a leading dot is stripped.
    pub fn extend_category<I, S>(&mut self, category: &str, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.categories.entry(category.to_string()).or_default();
        for ext in extensions {
            let ext = normalize_extension(ext.as_ref());
            if !entry.iter().any(|existing| existing == ext) {
                entry.push(ext.to_string());
            }
        }
    }

    /// Merges another map into this one.
    ///
    /// New categories are added wholesale; existing categories gain only the
    /// extensions they did not already list.
    pub fn merge(&mut self, other: &CategoryMap) {
        for (category, extensions) in &other.categories {
            self.extend_category(category, extensions);
        }
    }

    /// Returns the first category (in name order) listing `extension`.
    pub fn category_for(&self, extension: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|(_, extensions)| extensions.iter().any(|ext| ext == extension))
            .map(|(category, _)| category.as_str())
    }

    /// Returns true if any category lists `extension`.
    pub fn contains_extension(&self, extension: &str) -> bool {
        self.category_for(extension).is_some()
    }

    /// Returns a map holding only the named categories that exist here.
    pub fn subset<S: AsRef<str>>(&self, names: &[S]) -> CategoryMap {
        let categories = self
            .categories
            .iter()
            .filter(|(category, _)| names.iter().any(|name| name.as_ref() == category.as_str()))
            .map(|(category, extensions)| (category.clone(), extensions.clone()))
            .collect();
        Self { categories }
    }

    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(category, extensions)| (category.as_str(), extensions.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Writes the map the way cache files are stored: sorted keys, 4-space indent.
    pub fn write_pretty<W: io::Write>(&self, writer: W) -> serde_json::Result<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        self.write_pretty(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl<K, I, S> FromIterator<(K, I)> for CategoryMap
where
    K: AsRef<str>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (category, extensions) in iter {
            map.extend_category(category.as_ref(), extensions);
        }
        map
    }
}

fn normalize_extension(ext: &str) -> &str {
    ext.trim_start_matches('.')
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
