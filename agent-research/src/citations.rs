//! Citation tags to Markdown links.
//!
//! The report composer cites sources with `<cite source="src-N"/>` tags. Once
//! the report is final, each tag is replaced with a link to the collected
//! source and stray whitespace before punctuation is removed.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Sources collected during research, keyed by short id (`src-1`, `src-2`, ...).
pub type Sources = HashMap<String, Source>;

/// A source collected during research.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
}

impl Source {
    /// Link text: the title, else the domain, else the short id.
    pub fn display_text<'a>(&'a self, short_id: &'a str) -> &'a str {
        self.title
            .as_deref()
            .or(self.domain.as_deref())
            .unwrap_or(short_id)
    }
}

fn cite_tag() -> &'static Regex {
    static CITE_TAG: OnceLock<Regex> = OnceLock::new();
    CITE_TAG.get_or_init(|| {
        Regex::new(r#"<cite\s+source\s*=\s*["']?\s*(src-\d+)\s*["']?\s*/>"#)
            .expect("citation tag pattern is valid")
    })
}

fn space_before_punctuation() -> &'static Regex {
    static SPACE: OnceLock<Regex> = OnceLock::new();
    SPACE.get_or_init(|| Regex::new(r"\s+([.,;:])").expect("punctuation pattern is valid"))
}

/// Replace citation tags in `report` with Markdown links to `sources`.
///
/// Tags naming an unknown source are dropped with a warning.
pub fn replace_citations(report: &str, sources: &Sources) -> String {
    let linked = cite_tag().replace_all(report, |caps: &Captures| {
        let short_id = &caps[1];
        match sources.get(short_id) {
            Some(source) => format!(" [{}]({})", source.display_text(short_id), source.url),
            None => {
                warn!(tag = &caps[0], "Invalid citation tag found and removed");
                String::new()
            }
        }
    });

    space_before_punctuation()
        .replace_all(&linked, "$1")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> Sources {
        serde_json::from_str(
            r#"{
                "src-1": {"url": "https://www.rust-lang.org", "title": "Rust", "domain": "rust-lang.org"},
                "src-2": {"url": "https://docs.rs", "domain": "docs.rs"},
                "src-3": {"url": "https://crates.io"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_tag_becomes_link() {
        let report = "Rust is fast <cite source=\"src-1\"/>.";
        assert_eq!(
            replace_citations(report, &sources()),
            "Rust is fast  [Rust](https://www.rust-lang.org)."
        );
    }

    #[test]
    fn test_display_text_fallbacks() {
        let report = "Docs<cite source='src-2'/> and crates<cite source=src-3 />";
        assert_eq!(
            replace_citations(report, &sources()),
            "Docs [docs.rs](https://docs.rs) and crates [src-3](https://crates.io)"
        );
    }

    #[test]
    fn test_unknown_tag_removed() {
        let report = "An unsupported claim <cite source=\"src-9\"/>.";
        assert_eq!(
            replace_citations(report, &sources()),
            "An unsupported claim."
        );
    }

    #[test]
    fn test_spacing_before_punctuation() {
        let report = "First , second ; third :\tfourth .";
        assert_eq!(
            replace_citations(report, &Sources::new()),
            "First, second; third:\tfourth."
        );
    }

    #[test]
    fn test_loose_tag_spacing() {
        let report = "Claim<cite  source = \" src-1 \" />";
        assert_eq!(
            replace_citations(report, &sources()),
            "Claim [Rust](https://www.rust-lang.org)"
        );
    }

    #[test]
    fn test_non_matching_tags_left_alone() {
        let report = "Keep <cite source=\"ref-1\"/> as is";
        assert_eq!(replace_citations(report, &sources()), report);
    }
}
