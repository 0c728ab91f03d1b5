// src/catalog/loader.rs
// =============================================================================
// Where translation trees come from.
//
// `LocaleCatalog` is the seam between the link checker and the storage of the
// translations. The checker only asks two questions: which locales exist, and
// what is the full tree for one of them.
//
// `FsCatalog` answers them from a directory of locale files, laid out the way
// Rails and most i18n libraries do it:
//
//   config/locales/en.yml          -> locale "en"
//   config/locales/devise.en.yml   -> locale "en" (merged with the above)
//   config/locales/pt-BR.json      -> locale "pt-BR"
//   config/locales/admin/fr.yaml   -> locale "fr" (subdirectories are scanned)
// =============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::error::CatalogError;
use super::node::TranslationNode;

/// A source of per-locale translation trees.
pub trait LocaleCatalog {
    /// All locale identifiers this catalog knows, sorted
    fn locales(&self) -> Result<Vec<String>, CatalogError>;

    /// The complete translation tree of one locale
    fn load(&self, locale: &str) -> Result<TranslationNode, CatalogError>;
}

/// Locale files on disk, grouped by locale when the catalog is opened.
#[derive(Debug)]
pub struct FsCatalog {
    root: PathBuf,
    files: BTreeMap<String, Vec<PathBuf>>,
}

impl FsCatalog {
    /// Scans `root` recursively for .yml, .yaml and .json files.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CatalogError::MissingDirectory(root));
        }

        let mut files: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        // sort_by_file_name keeps the merge order stable between runs
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(locale) = locale_of(path) {
                debug!(file = %path.display(), %locale, "found locale file");
                files.entry(locale).or_default().push(path.to_path_buf());
            }
        }

        Ok(Self { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The files that make up one locale, in merge order
    pub fn files_for(&self, locale: &str) -> &[PathBuf] {
        self.files.get(locale).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl LocaleCatalog for FsCatalog {
    fn locales(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.files.keys().cloned().collect())
    }

    fn load(&self, locale: &str) -> Result<TranslationNode, CatalogError> {
        let paths = self
            .files
            .get(locale)
            .ok_or_else(|| CatalogError::UnknownLocale(locale.to_string()))?;

        let mut tree = TranslationNode::empty_mapping();
        for path in paths {
            let node = parse_file(path)?.unwrap_locale_root(locale);
            // An empty file parses to null; it must not wipe earlier files
            if node != TranslationNode::Empty {
                tree.merge(node);
            }
        }
        Ok(tree)
    }
}

/// Translation trees held in memory, keyed by locale.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    trees: BTreeMap<String, TranslationNode>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locale: impl Into<String>, tree: TranslationNode) {
        self.trees.insert(locale.into(), tree);
    }
}

impl LocaleCatalog for MemoryCatalog {
    fn locales(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.trees.keys().cloned().collect())
    }

    fn load(&self, locale: &str) -> Result<TranslationNode, CatalogError> {
        self.trees
            .get(locale)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownLocale(locale.to_string()))
    }
}

// The locale is the last dot-separated part of the file stem:
// "en.yml" -> "en", "devise.en.yml" -> "en". Anything that isn't a
// YAML or JSON file is ignored.
//
// The file name is all we look at: a stray `package.json` in the locales
// directory shows up as locale "package". Use --locale to pick locales
// explicitly when the directory holds other files.
fn locale_of(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?;
    if !matches!(extension, "yml" | "yaml" | "json") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let locale = stem.rsplit('.').next()?;
    if locale.is_empty() {
        None
    } else {
        Some(locale.to_string())
    }
}

fn parse_file(path: &Path) -> Result<TranslationNode, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    if is_json {
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|source| CatalogError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(value.into())
    } else {
        let value: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|source| CatalogError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn leaf(s: &str) -> TranslationNode {
        TranslationNode::Leaf(s.to_string())
    }

    #[test]
    fn test_locale_of() {
        assert_eq!(locale_of(Path::new("en.yml")), Some("en".to_string()));
        assert_eq!(locale_of(Path::new("devise.fr.yaml")), Some("fr".to_string()));
        assert_eq!(locale_of(Path::new("a/b/pt-BR.json")), Some("pt-BR".to_string()));
        assert_eq!(locale_of(Path::new("README.md")), None);
        assert_eq!(locale_of(Path::new("Makefile")), None);
    }

    #[test]
    fn test_any_yaml_or_json_file_is_a_locale() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("en.yml"), "en:\n  a: b\n").unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name": "app"}"#).unwrap();

        let catalog = FsCatalog::open(dir.path()).unwrap();

        assert_eq!(catalog.locales().unwrap(), vec!["en", "package"]);
        assert_eq!(
            catalog.load("package").unwrap().get("name"),
            Some(&leaf("app"))
        );
    }

    #[test]
    fn test_open_missing_directory() {
        let dir = tempdir().unwrap();
        let result = FsCatalog::open(dir.path().join("nope"));
        assert!(matches!(result, Err(CatalogError::MissingDirectory(_))));
    }

    #[test]
    fn test_load_merges_files_of_one_locale() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("en.yml"), "en:\n  home:\n    title: Home\n").unwrap();
        fs::create_dir(dir.path().join("devise")).unwrap();
        fs::write(
            dir.path().join("devise").join("devise.en.yml"),
            "en:\n  home:\n    login: Log in\n",
        )
        .unwrap();
        fs::write(dir.path().join("fr.json"), r#"{"home": {"title": "Accueil"}}"#).unwrap();
        fs::write(dir.path().join("empty.en.yml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = FsCatalog::open(dir.path()).unwrap();
        assert_eq!(catalog.locales().unwrap(), vec!["en", "fr"]);
        assert_eq!(catalog.files_for("en").len(), 3);

        let en = catalog.load("en").unwrap();
        let home = en.get("home").unwrap();
        assert_eq!(home.get("title"), Some(&leaf("Home")));
        assert_eq!(home.get("login"), Some(&leaf("Log in")));

        let fr = catalog.load("fr").unwrap();
        assert_eq!(fr.get("home").and_then(|h| h.get("title")), Some(&leaf("Accueil")));
    }

    #[test]
    fn test_load_unknown_locale() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("en.yml"), "en:\n  a: b\n").unwrap();
        let catalog = FsCatalog::open(dir.path()).unwrap();
        assert!(matches!(
            catalog.load("de"),
            Err(CatalogError::UnknownLocale(locale)) if locale == "de"
        ));
    }

    #[test]
    fn test_load_reports_bad_yaml() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("en.yml"), "en:\n  a: [unclosed\n").unwrap();
        let catalog = FsCatalog::open(dir.path()).unwrap();
        assert!(matches!(catalog.load("en"), Err(CatalogError::Yaml { .. })));
    }

    #[test]
    fn test_memory_catalog() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert("en", leaf("x"));
        assert_eq!(catalog.locales().unwrap(), vec!["en"]);
        assert_eq!(catalog.load("en").unwrap(), leaf("x"));
        assert!(catalog.load("fr").is_err());
    }
}
