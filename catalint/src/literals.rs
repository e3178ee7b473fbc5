//! Hard-coded string detection.
//!
//! A low-confidence heuristic that points at quoted literals containing
//! non-ASCII letters, to help move hard-coded text into catalogs. Its output
//! is advisory and never affects the check result.

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::{catalog::read_text, extract::Extractor};

lazy_static! {
    static ref LITERAL_REGEX: Regex =
        Regex::new(r#"'([^'\n]*)'|"([^"\n]*)"|`([^`\n]*)`"#).expect("valid literal regex");
    static ref TRANSLATED_LINE_REGEX: Regex =
        Regex::new(r"(?:^|[^\w$])\$?t\(|\bi18nKey\s*=").expect("valid translated line regex");
    static ref CLASS_LINE_REGEX: Regex =
        Regex::new(r"\b(?:className|class)\s*=").expect("valid class line regex");
}

const MIN_LITERAL_CHARS: usize = 3;

/// One suspicious literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiteralHit {
    pub file: PathBuf,
    /// 1-based line number.
    pub line: usize,
    pub text: String,
}

/// True for test sources, which are never scanned.
pub fn is_test_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    name.contains(".test.")
        || name.contains(".spec.")
        || path
            .components()
            .any(|c| c.as_os_str() == "__tests__" || c.as_os_str() == "__mocks__")
}

fn is_candidate(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_LITERAL_CHARS {
        return false;
    }
    if trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '.' | ',' | '-' | '+'))
    {
        return false;
    }
    trimmed.chars().any(|c| c.is_alphabetic() && !c.is_ascii())
}

fn is_ignored_line(line: &str) -> bool {
    let code = line.trim_start();
    code.starts_with("//")
        || code.starts_with('*')
        || code.starts_with("/*")
        || TRANSLATED_LINE_REGEX.is_match(line)
        || CLASS_LINE_REGEX.is_match(line)
}

/// Scans one file's text for literals that look like untranslated UI text.
pub fn find_literals(file: &Path, text: &str) -> Vec<LiteralHit> {
    let mut hits = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if is_ignored_line(line) {
            continue;
        }
        for captures in LITERAL_REGEX.captures_iter(line) {
            let Some(m) = captures.iter().skip(1).flatten().next() else {
                continue;
            };
            if is_candidate(m.as_str()) {
                hits.push(LiteralHit {
                    file: file.to_path_buf(),
                    line: index + 1,
                    text: m.as_str().trim().to_string(),
                });
            }
        }
    }
    hits
}

/// Scans `files`, skipping test files and files that are already fully instrumented.
pub fn scan_literals(extractor: &Extractor, files: &[PathBuf]) -> Vec<LiteralHit> {
    let mut hits = Vec::new();
    for file in files {
        if is_test_file(file) {
            continue;
        }
        let text = match read_text(file) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "skipping source file");
                continue;
            }
        };
        if extractor.is_fully_instrumented(&text) {
            tracing::debug!(file = %file.display(), "fully instrumented, skipping literal scan");
            continue;
        }
        hits.extend(find_literals(file, &text));
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_finds_non_ascii_literals() {
        let text = indoc! {r#"
            const title = "Головна сторінка";
            const label = t('nav.home', "Головна");
            <div className="кнопка">x</div>
            // const old = "Стара назва";
            const id = "ok";
            const n = '12,5';
            const short = "Це";
            const ascii = "Hello world";
            const mixed = `Ціна: ${price}`;
        "#};
        let hits = find_literals(Path::new("src/App.tsx"), text);
        let texts: Vec<_> = hits.iter().map(|h| (h.line, h.text.as_str())).collect();
        assert_eq!(texts, vec![(1, "Головна сторінка"), (9, "Ціна: ${price}")]);
    }

    #[test]
    fn test_is_test_file() {
        assert!(is_test_file(Path::new("src/App.test.tsx")));
        assert!(is_test_file(Path::new("src/nav.spec.js")));
        assert!(is_test_file(Path::new("src/__tests__/nav.js")));
        assert!(!is_test_file(Path::new("src/Nav.tsx")));
    }

    #[test]
    fn test_scan_skips_instrumented_and_test_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let plain = dir.path().join("Plain.jsx");
        let dense = dir.path().join("Dense.jsx");
        let test_file = dir.path().join("Plain.test.jsx");
        std::fs::write(&plain, "const a = 'Привіт світ';\n").unwrap();
        std::fs::write(&dense, "t('a')\nconst a = 'Привіт світ';\n").unwrap();
        std::fs::write(&test_file, "const a = 'Привіт світ';\n").unwrap();

        let hits = scan_literals(&Extractor::default(), &[plain.clone(), dense, test_file]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file, plain);
    }
}
