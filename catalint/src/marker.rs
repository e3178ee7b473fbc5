//! The "needs translation" marker prefixed to synthesized placeholder values.
//!
//! A marker template may reference `{source}` (the default language) and
//! `{target}` (the language being filled); both are upper-cased when rendered.
//! The reconciler writes the rendered marker and the differ looks for the same
//! rendering, so both sides always agree on the format.

use crate::error::Error;

pub const DEFAULT_MARKER: &str = "[{source}] ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    template: String,
}

impl Default for Marker {
    fn default() -> Self {
        Marker {
            template: DEFAULT_MARKER.to_string(),
        }
    }
}

impl Marker {
    /// Creates a marker from a template, checking that it renders to a bracketed tag.
    pub fn new(template: impl Into<String>) -> Result<Self, Error> {
        let marker = Marker {
            template: template.into(),
        };
        let sample = marker.render("en", "fr");
        let bracketed = sample.starts_with('[') && sample.find(']').is_some_and(|i| i > 1);
        if !bracketed {
            return Err(Error::validation_error(format!(
                "marker `{}` must render to a bracketed tag such as `[EN] `",
                marker.template
            )));
        }
        Ok(marker)
    }

    /// Renders the marker for a (default language, target language) pair.
    pub fn render(&self, source: &str, target: &str) -> String {
        self.template
            .replace("{source}", &source.to_uppercase())
            .replace("{target}", &target.to_uppercase())
    }

    /// Prefixes `value` with the rendered marker.
    pub fn apply(&self, value: &str, source: &str, target: &str) -> String {
        format!("{}{}", self.render(source, target), value)
    }

    /// True if `value` still carries the marker for this language pair.
    pub fn is_marked(&self, value: &str, source: &str, target: &str) -> bool {
        value.starts_with(&self.render(source, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_marker() {
        let marker = Marker::default();
        assert_eq!(marker.render("en", "uk"), "[EN] ");
        assert_eq!(marker.apply("Hello", "en", "uk"), "[EN] Hello");
        assert!(marker.is_marked("[EN] Hello", "en", "uk"));
        assert!(!marker.is_marked("Привіт", "en", "uk"));
        assert!(!marker.is_marked("[UK] Hello", "en", "uk"));
    }

    #[test]
    fn test_target_marker() {
        let marker = Marker::new("[{target}] ").unwrap();
        assert_eq!(marker.apply("Hello", "en", "uk"), "[UK] Hello");
        assert!(marker.is_marked("[UK] Hello", "en", "uk"));
    }

    #[test]
    fn test_rejects_unbracketed_marker() {
        assert!(Marker::new("TODO: ").is_err());
        assert!(Marker::new("[] ").is_err());
        assert!(matches!(Marker::new(""), Err(Error::Validation(_))));
    }
}
