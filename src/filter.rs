//! Category filter resolution for the populator.
//!
//! A filter is either a special keyword or a list of category names:
//!
//! - `all` keeps every supported category (also the default)
//! - `random` keeps a single category picked at random
//! - `[audio, video]` keeps the named categories; unknown names are ignored

use rand::Rng;
use rand::seq::IteratorRandom;
use serde_json::Value;

use crate::categories::{CategoryMap, json_type_name};
use crate::error::{FolderError, FolderResult};

/// Keywords accepted in place of a category list.
pub const SPECIAL_KEYWORDS: [&str; 2] = ["all", "random"];

/// A filter as supplied by the user, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterArg {
    Keyword(String),
    Categories(Vec<String>),
}

impl FilterArg {
    /// Parses a command-line filter value.
    ///
    /// Bracketed values such as `[audio, 'video']` become a category list;
    /// anything else is taken as a keyword.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::InvalidFilterList` if the brackets are unbalanced.
    pub fn from_cli(value: &str) -> FolderResult<Self> {
        let trimmed = value.trim();
        let opens = trimmed.matches('[').count();
        let closes = trimmed.matches(']').count();

        if opens == 0 && closes == 0 {
            return Ok(FilterArg::Keyword(trimmed.to_string()));
        }

        let invalid = || FolderError::InvalidFilterList {
            value: value.to_string(),
        };
        if opens != 1 || closes != 1 {
            return Err(invalid());
        }

        let inner = trimmed
            .split_once('[')
            .and_then(|(_, rest)| rest.split_once(']'))
            .map(|(inner, _)| inner)
            .ok_or_else(invalid)?;

        let names = inner
            .split(',')
            .map(|item| item.trim().trim_matches(|c| c == '\'' || c == '"'))
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        Ok(FilterArg::Categories(names))
    }

    /// Builds a filter from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `FolderError::InvalidFilterType` for anything other than a
    /// string, an array of strings or `null`.
    pub fn from_value(value: &Value) -> FolderResult<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::String(keyword) => Ok(Some(FilterArg::Keyword(keyword.clone()))),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| FolderError::InvalidFilterType {
                            found: format!("array containing {}", json_type_name(item)),
                        })
                })
                .collect::<FolderResult<Vec<_>>>()
                .map(|names| Some(FilterArg::Categories(names))),
            other => Err(FolderError::InvalidFilterType {
                found: json_type_name(other).to_string(),
            }),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            FilterArg::Keyword(keyword) => keyword.is_empty(),
            FilterArg::Categories(names) => names.is_empty(),
        }
    }
}

/// A validated filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedFilter {
    All,
    Random,
    Categories(Vec<String>),
}

impl ResolvedFilter {
    /// Applies the filter to `pool`, returning the categories to work with.
    pub fn select<R: Rng + ?Sized>(&self, pool: &CategoryMap, rng: &mut R) -> CategoryMap {
        match self {
            ResolvedFilter::All => pool.clone(),
            ResolvedFilter::Random => match pool.names().choose(rng) {
                Some(name) => pool.subset(&[name]),
                None => CategoryMap::new(),
            },
            ResolvedFilter::Categories(names) => pool.subset(names),
        }
    }
}

/// Validates a user filter.
///
/// An absent or empty filter resolves to [`ResolvedFilter::All`]. Category
/// lists are passed through unchanged, even if they name no known category.
///
/// # Errors
///
/// Returns `FolderError::InvalidFilterKeyword` for keywords other than `all`
/// and `random`.
pub fn validate(filters: Option<FilterArg>) -> FolderResult<ResolvedFilter> {
    let Some(filters) = filters.filter(|f| !f.is_empty()) else {
        return Ok(ResolvedFilter::All);
    };

    match filters {
        FilterArg::Keyword(keyword) => match keyword.as_str() {
            "all" => Ok(ResolvedFilter::All),
            "random" => Ok(ResolvedFilter::Random),
            _ => Err(FolderError::InvalidFilterKeyword { value: keyword }),
        },
        FilterArg::Categories(names) => Ok(ResolvedFilter::Categories(names)),
    }
}
