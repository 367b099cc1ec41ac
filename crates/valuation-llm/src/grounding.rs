//! Grounding sources (citations) attached to a web-grounded answer

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// A citation record indicating which web result informed the answer
///
/// Providers may omit either field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    /// Page title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Page address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl GroundingSource {
    /// Create a source with both title and URI
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            uri: Some(uri.into()),
        }
    }

    /// Build a source from optional parts, dropping blank values
    pub fn from_parts(title: Option<String>, uri: Option<String>) -> Self {
        let clean = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Self {
            title: clean(title),
            uri: clean(uri),
        }
    }

    /// Whether the source carries nothing to show
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.uri.is_none()
    }

    /// Host part of the URI, if it parses
    pub fn host(&self) -> Option<String> {
        let uri = self.uri.as_deref()?;
        Url::parse(uri).ok()?.host_str().map(str::to_string)
    }

    /// Text to show for the citation: the title, else the URI host, else the raw URI
    pub fn label(&self) -> Option<String> {
        self.title
            .clone()
            .or_else(|| self.host())
            .or_else(|| self.uri.clone())
    }
}

/// Drop empty sources and repeated URIs, keeping first-seen order
pub fn dedup_sources(sources: impl IntoIterator<Item = GroundingSource>) -> Vec<GroundingSource> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|s| !s.is_empty())
        .filter(|s| match &s.uri {
            Some(uri) => seen.insert(uri.clone()),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_prefers_title() {
        let source = GroundingSource::new("Investor Relations", "https://ri.example.com/x");
        assert_eq!(source.label().as_deref(), Some("Investor Relations"));
    }

    #[test]
    fn test_label_falls_back_to_host() {
        let source = GroundingSource::from_parts(None, Some("https://www.b3.com.br/pt_br/".to_string()));
        assert_eq!(source.label().as_deref(), Some("www.b3.com.br"));
    }

    #[test]
    fn test_label_with_unparseable_uri() {
        let source = GroundingSource::from_parts(Some("  ".to_string()), Some("not a url".to_string()));
        assert!(source.title.is_none());
        assert_eq!(source.label().as_deref(), Some("not a url"));
    }

    #[test]
    fn test_dedup_sources() {
        let sources = vec![
            GroundingSource::new("A", "https://a.example/1"),
            GroundingSource::default(),
            GroundingSource::new("A again", "https://a.example/1"),
            GroundingSource::from_parts(Some("Title only".to_string()), None),
            GroundingSource::new("B", "https://b.example/"),
        ];

        let deduped = dedup_sources(sources);
        let labels: Vec<_> = deduped.iter().filter_map(GroundingSource::label).collect();
        assert_eq!(labels, vec!["A", "Title only", "B"]);
    }

    #[test]
    fn test_serialization_skips_missing_fields() {
        let source = GroundingSource::from_parts(None, Some("https://x.example".to_string()));
        let json = serde_json::to_string(&source).unwrap();
        assert_eq!(json, r#"{"uri":"https://x.example"}"#);
    }
}
