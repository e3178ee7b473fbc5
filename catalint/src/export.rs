//! Tabular export of flattened catalogs for translators.
//!
//! One row per (namespace, path) with one column per language. Paths follow
//! the default language's traversal order, followed by paths that exist only
//! in other languages.

use std::io::Write;

use serde_json::Value;

use crate::{catalog::Catalog, error::Error, keypath};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub namespace: String,
    pub path: String,
    /// One cell per language, in the table's language order. Absent values are empty.
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTable {
    pub languages: Vec<String>,
    pub rows: Vec<ExportRow>,
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl ExportTable {
    pub fn new(languages: Vec<String>) -> Self {
        ExportTable {
            languages,
            rows: Vec::new(),
        }
    }

    /// Adds the rows for one namespace.
    ///
    /// `catalogs` holds the namespace's catalogs in any order; each is matched
    /// to its column by language. The first language is the default.
    pub fn add_namespace(&mut self, namespace: &str, catalogs: &[&Catalog]) {
        let by_language: Vec<Option<&Catalog>> = self
            .languages
            .iter()
            .map(|lang| catalogs.iter().copied().find(|c| &c.language == lang))
            .collect();

        let mut paths: Vec<String> = Vec::new();
        for catalog in by_language.iter().flatten() {
            for (path, _) in keypath::leaves(&catalog.tree) {
                if !paths.contains(&path) {
                    paths.push(path);
                }
            }
        }

        for path in paths {
            let values = by_language
                .iter()
                .map(|catalog| cell(catalog.and_then(|c| c.get(&path))))
                .collect();
            self.rows.push(ExportRow {
                namespace: namespace.to_string(),
                path,
                values,
            });
        }
    }

    /// Writes the table with a `namespace,path,<languages...>` header.
    pub fn to_writer<W: Write>(&self, writer: W, delimiter: u8) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        let mut header = vec!["namespace".to_string(), "path".to_string()];
        header.extend(self.languages.iter().cloned());
        wtr.write_record(&header)?;
        for row in &self.rows {
            let mut record = vec![row.namespace.clone(), row.path.clone()];
            record.extend(row.values.iter().cloned());
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_follow_default_order_then_extras() {
        let en = Catalog::parse("en", "common", r#"{"b": "B", "a": {"x": "X"}}"#).unwrap();
        let uk = Catalog::parse("uk", "common", r#"{"a": {"x": "Ікс"}, "only_uk": "Лише"}"#).unwrap();
        let mut table = ExportTable::new(vec!["en".to_string(), "uk".to_string()]);
        table.add_namespace("common", &[&uk, &en]);

        let paths: Vec<_> = table.rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["b", "a.x", "only_uk"]);
        assert_eq!(table.rows[0].values, vec!["B", ""]);
        assert_eq!(table.rows[2].values, vec!["", "Лише"]);
    }

    #[test]
    fn test_csv_and_tsv_output() {
        let en = Catalog::parse("en", "common", r#"{"greeting": "Hello, {{name}}"}"#).unwrap();
        let mut table = ExportTable::new(vec!["en".to_string(), "fr".to_string()]);
        table.add_namespace("common", &[&en]);

        let mut csv_out = Vec::new();
        table.to_writer(&mut csv_out, b',').unwrap();
        assert_eq!(
            String::from_utf8(csv_out).unwrap(),
            "namespace,path,en,fr\ncommon,greeting,\"Hello, {{name}}\",\n"
        );

        let mut tsv_out = Vec::new();
        table.to_writer(&mut tsv_out, b'\t').unwrap();
        assert_eq!(
            String::from_utf8(tsv_out).unwrap(),
            "namespace\tpath\ten\tfr\ncommon\tgreeting\tHello, {{name}}\t\n"
        );
    }
}
