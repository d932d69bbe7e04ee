// Bibliographic source layer
//
// Each external API gets its own module that knows the wire format and
// pagination rules, and emits the common RawRecord vocabulary consumed
// by the normalizer:
// - Google: Google Books volumes API
// - OpenLibrary: Open Library search API

pub mod google;
pub mod openlib;

use async_trait::async_trait;

use crate::config::SourcesConfig;
use crate::error::{BookmeshError, Result};
use crate::model::RawRecord;

/// One search request against a bibliographic source.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SearchQuery {
    pub author: Option<String>,
    pub title: Option<String>,
    pub max_results: usize,
}

impl SearchQuery {
    /// A query with neither author nor title matches nothing useful.
    pub fn is_empty(&self) -> bool {
        self.author.as_deref().map_or(true, |a| a.trim().is_empty())
            && self.title.as_deref().map_or(true, |t| t.trim().is_empty())
    }
}

/// Main trait for bibliographic sources
#[async_trait]
pub trait BookSource: Send + Sync {
    /// Human-readable source name used in report metadata
    fn name(&self) -> &'static str;

    /// Fetch up to `query.max_results` raw records, paginating as needed.
    /// Items the source cannot parse are dropped, not errors.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawRecord>>;
}

/// Source selector parsed from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Google,
    OpenLibrary,
}

impl SourceKind {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "openlib" | "openlibrary" => Ok(Self::OpenLibrary),
            _ => Err(BookmeshError::Config(format!(
                "Invalid source '{}'. Valid sources: google, openlib",
                s
            ))),
        }
    }
}

/// Factory for creating source instances
pub struct SourceFactory;

impl SourceFactory {
    pub fn create_source(
        kind: SourceKind,
        config: &SourcesConfig,
        target_language: &str,
    ) -> Box<dyn BookSource> {
        match kind {
            SourceKind::Google => Box::new(google::GoogleBooksSource::new(&config.google)),
            SourceKind::OpenLibrary => Box::new(openlib::OpenLibrarySource::new(
                &config.openlib,
                target_language,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_parse() {
        assert_eq!(SourceKind::parse("google").unwrap(), SourceKind::Google);
        assert_eq!(SourceKind::parse("OpenLib").unwrap(), SourceKind::OpenLibrary);
        assert_eq!(SourceKind::parse("openlibrary").unwrap(), SourceKind::OpenLibrary);
        assert!(SourceKind::parse("worldcat").is_err());
    }

    #[test]
    fn test_query_is_empty() {
        assert!(SearchQuery::default().is_empty());
        assert!(SearchQuery {
            author: Some("  ".to_string()),
            ..Default::default()
        }
        .is_empty());
        assert!(!SearchQuery {
            title: Some("Dune".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
