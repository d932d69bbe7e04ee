//! Response envelope assembled around one search: query echo, result
//! statistics and the normalized entity/relationship graph. This is the
//! structure handed to the tree translator when the caller asks for a
//! target language other than the source data's.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Author, Book, BookAuthor, BookGenre, Genre};
use crate::normalize::ResultSet;
use crate::sources::SearchQuery;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub metadata: ReportMetadata,
    pub data: ReportData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub source: String,
    pub query: SearchQuery,
    pub result_stats: ResultStats,
    pub execution_time: String,
    pub timestamp: DateTime<Utc>,
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultStats {
    pub books: usize,
    pub authors: usize,
    pub genres: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub entities: Entities,
    pub relationships: Relationships,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entities {
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationships {
    pub book_authors: Vec<BookAuthor>,
    pub book_genres: Vec<BookGenre>,
}

impl SearchReport {
    pub fn new(
        source: &str,
        query: SearchQuery,
        results: ResultSet,
        execution_time: std::time::Duration,
        language: &str,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                source: source.to_string(),
                query,
                result_stats: ResultStats {
                    books: results.books.len(),
                    authors: results.authors.len(),
                    genres: results.genres.len(),
                },
                execution_time: format!("{:.3}s", execution_time.as_secs_f64()),
                timestamp: Utc::now(),
                language: language.to_string(),
            },
            data: ReportData {
                entities: Entities {
                    authors: results.authors,
                    genres: results.genres,
                    books: results.books,
                },
                relationships: Relationships {
                    book_authors: results.book_authors,
                    book_genres: results.book_genres,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawRecord;
    use crate::normalize::{normalize, NormalizeOptions};

    #[test]
    fn test_report_serialization_roundtrip() {
        let mut record = RawRecord {
            title: Some("Dune".to_string()),
            ..Default::default()
        };
        record.author_names = vec!["Frank Herbert".to_string()];
        record.subjects = vec!["Science Fiction".to_string()];

        let results = normalize(&[record], &NormalizeOptions::default());
        let report = SearchReport::new(
            "Open Library",
            SearchQuery {
                title: Some("Dune".to_string()),
                ..Default::default()
            },
            results,
            std::time::Duration::from_millis(1234),
            "en",
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["metadata"]["source"], "Open Library");
        assert_eq!(json["metadata"]["result_stats"]["books"], 1);
        assert_eq!(json["metadata"]["execution_time"], "1.234s");
        assert_eq!(json["data"]["entities"]["books"][0]["title"], "Dune");

        let back: SearchReport = serde_json::from_value(json).unwrap();
        assert_eq!(back.data.entities.authors.len(), 1);
        assert_eq!(back.data.relationships.book_authors.len(), 1);
    }
}
