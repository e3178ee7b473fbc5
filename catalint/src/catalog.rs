//! Catalog documents and the on-disk store that holds them.
//!
//! Catalogs live at `<root>/<language>/<namespace>.<ext>`, one JSON document
//! per (language, namespace) pair. Documents are written with two-space
//! indentation and a trailing newline, in the key order they were read, so
//! that re-saving an unchanged catalog reproduces the same bytes.

use std::{
    fs::{self, File},
    io::{BufRead, Cursor, Read, Write},
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::{
    error::Error,
    keypath::{self, Tree},
};

/// The tree of translated strings for one (language, namespace) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub language: String,
    pub namespace: String,
    pub tree: Tree,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new(language: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::with_tree(language, namespace, Tree::new())
    }

    /// Creates a catalog from an existing tree.
    pub fn with_tree(language: impl Into<String>, namespace: impl Into<String>, tree: Tree) -> Self {
        Catalog {
            language: language.into(),
            namespace: namespace.into(),
            tree,
        }
    }

    /// Parses a catalog document. The top level must be an object.
    pub fn from_reader<R: BufRead>(
        language: impl Into<String>,
        namespace: impl Into<String>,
        reader: R,
    ) -> Result<Self, Error> {
        let value: Value = serde_json::from_reader(reader)?;
        match value {
            Value::Object(tree) => {
                check_keys(&tree, "")?;
                Ok(Catalog::with_tree(language, namespace, tree))
            }
            other => Err(Error::InvalidCatalog(format!(
                "top-level value must be an object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parses a catalog document from a string.
    pub fn parse(
        language: impl Into<String>,
        namespace: impl Into<String>,
        s: &str,
    ) -> Result<Self, Error> {
        Self::from_reader(language, namespace, Cursor::new(s))
    }

    /// Serializes the catalog to any writer using the canonical layout.
    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(render(&self.tree)?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Looks up a value by dotted path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        keypath::get(&self.tree, path)
    }
}

/// Renders a tree exactly as [`CatalogStore::save`] writes it.
pub fn render(tree: &Tree) -> Result<String, Error> {
    let mut out = serde_json::to_string_pretty(tree)?;
    out.push('\n');
    Ok(out)
}

/// Every key must be addressable by a dotted path.
fn check_keys(tree: &Tree, prefix: &str) -> Result<(), Error> {
    for (key, value) in tree {
        let path = keypath::join(prefix, key);
        if key.is_empty() || key.contains('.') {
            return Err(Error::InvalidCatalog(format!(
                "key `{}` cannot be addressed by a dotted path",
                path
            )));
        }
        if let Value::Object(child) = value {
            check_keys(child, &path)?;
        }
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads a file to a string, decoding a leading BOM if present.
pub(crate) fn read_text(path: &Path) -> Result<String, Error> {
    let file = File::open(path)?;
    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .bom_override(true)
        .strip_bom(true)
        .build(file);
    let mut decoded = String::new();
    decoder.read_to_string(&mut decoded)?;
    Ok(decoded)
}

/// Filesystem layout of catalog documents.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    root: PathBuf,
    extension: String,
}

impl CatalogStore {
    /// Creates a store rooted at `root` for documents with the given extension.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        CatalogStore {
            root: root.into(),
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document for a (language, namespace) pair.
    pub fn path_for(&self, language: &str, namespace: &str) -> PathBuf {
        self.root
            .join(language)
            .join(format!("{}.{}", namespace, self.extension))
    }

    /// Document path relative to the store root, for display.
    pub fn display_path(&self, language: &str, namespace: &str) -> String {
        format!("{}/{}.{}", language, namespace, self.extension)
    }

    /// Loads one catalog.
    pub fn load(&self, language: &str, namespace: &str) -> Result<Catalog, Error> {
        let path = self.path_for(language, namespace);
        tracing::debug!(path = %path.display(), "loading catalog");
        let text = read_text(&path)?;
        Catalog::parse(language, namespace, &text)
    }

    /// Loads one catalog, treating a missing document as an empty catalog.
    pub fn load_or_empty(&self, language: &str, namespace: &str) -> Result<Catalog, Error> {
        match self.load(language, namespace) {
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Catalog::new(language, namespace))
            }
            other => other,
        }
    }

    /// Writes a catalog to its document, creating the language directory if needed.
    pub fn save(&self, catalog: &Catalog) -> Result<(), Error> {
        let path = self.path_for(&catalog.language, &catalog.namespace);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        tracing::debug!(path = %path.display(), "saving catalog");
        catalog.to_writer(File::create(&path)?)
    }

    /// Namespaces present for `language`, sorted by name.
    pub fn list_namespaces(&self, language: &str) -> Result<Vec<String>, Error> {
        let dir = self.root.join(language);
        let mut namespaces = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let matches_ext = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == self.extension);
            if !matches_ext {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                namespaces.push(stem.to_string());
            }
        }
        namespaces.sort();
        Ok(namespaces)
    }

    /// Language directories under the store root, sorted by name.
    pub fn list_languages(&self) -> Result<Vec<String>, Error> {
        let mut languages = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                if !name.starts_with('.') {
                    languages.push(name.to_string());
                }
            }
        }
        languages.sort();
        Ok(languages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_layout() {
        let catalog = Catalog::parse("en", "common", r#"{"b":"B","a":{"c":"C"}}"#).unwrap();
        assert_eq!(
            render(&catalog.tree).unwrap(),
            "{\n  \"b\": \"B\",\n  \"a\": {\n    \"c\": \"C\"\n  }\n}\n"
        );
    }

    #[test]
    fn test_render_keeps_non_ascii() {
        let catalog = Catalog::parse("uk", "common", r#"{"hi":"Привіт"}"#).unwrap();
        assert_eq!(render(&catalog.tree).unwrap(), "{\n  \"hi\": \"Привіт\"\n}\n");
    }

    #[test]
    fn test_rejects_non_object_top_level() {
        let err = Catalog::parse("en", "common", "[1, 2]").unwrap_err();
        assert!(matches!(err, Error::InvalidCatalog(_)));
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_rejects_dotted_and_empty_keys() {
        let err = Catalog::parse("en", "common", r#"{"errors.notFound": "Not found"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidCatalog(_)));
        assert!(err.to_string().contains("errors.notFound"));

        let err = Catalog::parse("en", "common", r#"{"nav": {"": "Home"}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidCatalog(_)));
    }

    #[test]
    fn test_load_reports_dotted_key_as_error() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path(), "json");
        fs::create_dir_all(dir.path().join("en")).unwrap();
        fs::write(store.path_for("en", "common"), r#"{"a": {"b.c": "x"}}"#).unwrap();

        let err = store.load("en", "common").unwrap_err();
        assert!(err.to_string().contains("a.b.c"));
    }

    #[test]
    fn test_save_then_load_is_byte_stable() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path(), "json");
        let original = "{\n  \"greeting\": \"Hello {{name}}\",\n  \"nav\": {\n    \"home\": \"Home\"\n  }\n}\n";
        fs::create_dir_all(dir.path().join("en")).unwrap();
        fs::write(store.path_for("en", "common"), original).unwrap();

        let catalog = store.load("en", "common").unwrap();
        store.save(&catalog).unwrap();
        let after = fs::read_to_string(store.path_for("en", "common")).unwrap();
        assert_eq!(after, original);
    }

    #[test]
    fn test_load_strips_bom() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path(), "json");
        fs::create_dir_all(dir.path().join("en")).unwrap();
        fs::write(store.path_for("en", "common"), "\u{feff}{\"a\": \"A\"}").unwrap();
        let catalog = store.load("en", "common").unwrap();
        assert_eq!(catalog.get("a"), Some(&Value::String("A".into())));
    }

    #[test]
    fn test_load_or_empty() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path(), "json");
        assert!(matches!(store.load("fr", "common"), Err(Error::Io(_))));
        let catalog = store.load_or_empty("fr", "common").unwrap();
        assert!(catalog.tree.is_empty());
        assert_eq!(catalog.language, "fr");
    }

    #[test]
    fn test_list_namespaces_and_languages() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path(), ".json");
        for lang in ["uk", "en"] {
            fs::create_dir_all(dir.path().join(lang)).unwrap();
        }
        fs::write(dir.path().join("en/pages.json"), "{}").unwrap();
        fs::write(dir.path().join("en/common.json"), "{}").unwrap();
        fs::write(dir.path().join("en/notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("README.md"), "ignored").unwrap();

        assert_eq!(store.list_namespaces("en").unwrap(), vec!["common", "pages"]);
        assert_eq!(store.list_languages().unwrap(), vec!["en", "uk"]);
        assert_eq!(store.display_path("en", "pages"), "en/pages.json");
    }
}
