// src/catalog/mod.rs
// =============================================================================
// This module loads the translations we scan for links.
//
// Submodules:
// - node: the TranslationNode tree and the paths into it
// - loader: the LocaleCatalog trait plus the filesystem and in-memory catalogs
// - error: what can go wrong while loading
// =============================================================================

mod error;
mod loader;
mod node;

pub use error::CatalogError;
pub use loader::{FsCatalog, LocaleCatalog, MemoryCatalog};
pub use node::{NodePath, PathSegment, TranslationNode};
