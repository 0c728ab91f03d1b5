// src/catalog/error.rs
// =============================================================================
// Errors that can happen while loading locale files.
//
// Unlike a broken link (which is just a result we report), these stop the
// run: if we can't read the translations we have nothing to check.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The configured locales directory is missing
    #[error("locales directory not found: {0}")]
    MissingDirectory(PathBuf),

    /// A locale file could not be read from disk
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A .yml/.yaml file is not valid YAML
    #[error("failed to parse YAML file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A .json file is not valid JSON
    #[error("failed to parse JSON file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Walking the directory failed part way through
    #[error("failed to scan locales directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// The caller asked for a locale that has no files
    #[error("unknown locale '{0}'")]
    UnknownLocale(String),
}
