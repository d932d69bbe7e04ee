use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{BookSource, SearchQuery};
use crate::config::OpenLibraryConfig;
use crate::error::Result;
use crate::model::RawRecord;

const SEARCH_FIELDS: &str = "title,author_name,first_publish_year,description,language,\
number_of_pages,number_of_pages_median,isbn,subject,ratings_average,ratings_count,\
want_to_read,cover_i,key,publisher,publish_date,author_key,first_sentence,\
subject_people,subject_places";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

/// Open Library is loose about field shapes: strings arrive bare, wrapped
/// in {"type", "value"} objects, or as arrays, depending on the document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TextField {
    Plain(String),
    Wrapped { value: String },
    Many(Vec<String>),
}

impl TextField {
    fn first(&self) -> Option<&str> {
        match self {
            TextField::Plain(s) => Some(s),
            TextField::Wrapped { value } => Some(value),
            TextField::Many(items) => items.first().map(String::as_str),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchDoc {
    title: Option<String>,
    #[serde(default)]
    author_name: Vec<String>,
    #[serde(default)]
    author_key: Vec<String>,
    first_publish_year: Option<i32>,
    description: Option<TextField>,
    first_sentence: Option<TextField>,
    #[serde(default)]
    language: Vec<String>,
    number_of_pages: Option<u32>,
    number_of_pages_median: Option<u32>,
    #[serde(default)]
    isbn: Vec<String>,
    #[serde(default)]
    subject: Vec<String>,
    #[serde(default)]
    subject_people: Vec<String>,
    #[serde(default)]
    subject_places: Vec<String>,
    ratings_average: Option<f64>,
    ratings_count: Option<u64>,
    want_to_read: Option<u64>,
    cover_i: Option<i64>,
    key: Option<String>,
    publisher: Option<TextField>,
}

/// Open Library search with pagination.
pub struct OpenLibrarySource {
    client: Client,
    config: OpenLibraryConfig,
    target_language: String,
}

impl OpenLibrarySource {
    pub fn new(config: &OpenLibraryConfig, target_language: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("HTTP client creation should not fail");

        Self {
            client,
            config: config.clone(),
            target_language: target_language.to_lowercase(),
        }
    }

    async fn search_batch(&self, query: &str, page: usize, limit: usize) -> Vec<RawRecord> {
        let params: Vec<(&str, String)> = vec![
            ("q", query.to_string()),
            ("page", page.to_string()),
            ("limit", limit.to_string()),
            ("mode", "everything".to_string()),
            ("fields", SEARCH_FIELDS.to_string()),
        ];

        let url = format!("{}/search.json", self.config.base_url);
        debug!("Open Library request: page={}, limit={}", page, limit);

        let response = match self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Open Library request failed: {}", e);
                return Vec::new();
            }
        };

        let parsed: SearchResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to parse Open Library response: {}", e);
                return Vec::new();
            }
        };

        parsed
            .docs
            .into_iter()
            .map(|doc| self.parse_doc(doc))
            .collect()
    }

    fn build_query(&self, query: &SearchQuery) -> String {
        let mut parts = Vec::new();
        if let Some(author) = query.author.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
            parts.push(format!("author:\"{}\"", author));
        }
        if let Some(title) = query.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            parts.push(format!("title:\"{}\"", title));
        }
        if parts.is_empty() {
            "*:*".to_string()
        } else {
            parts.join(" AND ")
        }
    }

    fn parse_doc(&self, doc: SearchDoc) -> RawRecord {
        // A document is considered already-in-target when any of its
        // language codes starts with the target code ("ru" matches the
        // "rus" code Open Library sometimes uses)
        let in_target_language = doc
            .language
            .iter()
            .any(|lang| lang.to_lowercase().starts_with(&self.target_language));

        let description = doc.description.as_ref().and_then(TextField::first).map(str::to_string);
        let first_sentence = doc
            .first_sentence
            .as_ref()
            .and_then(TextField::first)
            .map(str::to_string);

        let mut subjects = doc.subject.clone();
        subjects.extend(doc.subject_people.iter().cloned());
        subjects.extend(doc.subject_places.iter().cloned());

        let rating_details = doc.ratings_average.map(|rating| {
            json!({
                "open_library": {
                    "rating": rating,
                    "votes": doc.ratings_count.unwrap_or(0),
                    "want_to_read": doc.want_to_read.unwrap_or(0),
                }
            })
        });

        let author_keys: Vec<Option<String>> = doc
            .author_name
            .iter()
            .enumerate()
            .map(|(i, _)| doc.author_key.get(i).cloned())
            .collect();
        let author_urls: Vec<Option<String>> = author_keys
            .iter()
            .map(|key| {
                key.as_ref()
                    .map(|k| format!("{}/authors/{}", self.config.base_url, k))
            })
            .collect();

        RawRecord {
            title: doc.title.clone(),
            description,
            first_sentence,
            publication_year: doc.first_publish_year,
            language: doc
                .language
                .first()
                .cloned()
                .or_else(|| Some(self.config.default_language.clone())),
            in_target_language,
            page_count: doc.number_of_pages_median.or(doc.number_of_pages),
            isbn_10: isbn_of_length(&doc.isbn, 10),
            isbn_13: isbn_of_length(&doc.isbn, 13),
            author_names: doc.author_name.clone(),
            author_keys,
            author_urls,
            subjects,
            average_rating: doc.ratings_average,
            rating_details,
            source_url: doc
                .key
                .as_ref()
                .map(|k| format!("{}{}", self.config.base_url, k)),
            cover_url: doc
                .cover_i
                .map(|id| format!("https://covers.openlibrary.org/b/id/{}-L.jpg", id)),
            publisher: doc.publisher.as_ref().and_then(TextField::first).map(str::to_string),
        }
    }
}

#[async_trait]
impl BookSource for OpenLibrarySource {
    fn name(&self) -> &'static str {
        "Open Library"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawRecord>> {
        let q = self.build_query(query);
        let mut records = Vec::new();
        let mut page = 1;

        while records.len() < query.max_results {
            let limit = self
                .config
                .batch_size
                .min(query.max_results - records.len())
                .max(1);
            let batch = self.search_batch(&q, page, limit).await;
            if batch.is_empty() {
                break;
            }

            records.extend(batch);
            page += 1;

            tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
        }

        records.truncate(query.max_results);
        Ok(records)
    }
}

fn isbn_of_length(isbns: &[String], length: usize) -> Option<String> {
    isbns.iter().find(|isbn| isbn.len() == length).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> OpenLibrarySource {
        OpenLibrarySource::new(&crate::config::Config::default().sources.openlib, "ru")
    }

    #[test]
    fn test_parse_doc_full() {
        let doc: SearchDoc = serde_json::from_value(json!({
            "title": "Dune",
            "author_name": ["Frank Herbert"],
            "author_key": ["OL79034A"],
            "first_publish_year": 1965,
            "description": {"value": "A desert planet saga"},
            "language": ["eng"],
            "number_of_pages_median": 412,
            "isbn": ["0441013597", "9780441013593"],
            "subject": ["Science Fiction"],
            "subject_places": ["Arrakis"],
            "ratings_average": 4.2,
            "ratings_count": 900,
            "cover_i": 12345,
            "key": "/works/OL893415W",
            "publisher": ["Chilton Books"]
        }))
        .unwrap();

        let record = source().parse_doc(doc);
        assert_eq!(record.title.as_deref(), Some("Dune"));
        assert_eq!(record.description.as_deref(), Some("A desert planet saga"));
        assert_eq!(record.page_count, Some(412));
        assert_eq!(record.isbn_10.as_deref(), Some("0441013597"));
        assert_eq!(record.isbn_13.as_deref(), Some("9780441013593"));
        assert_eq!(
            record.subjects,
            vec!["Science Fiction".to_string(), "Arrakis".to_string()]
        );
        assert!(!record.in_target_language);
        assert_eq!(
            record.source_url.as_deref(),
            Some("https://openlibrary.org/works/OL893415W")
        );
        assert_eq!(
            record.cover_url.as_deref(),
            Some("https://covers.openlibrary.org/b/id/12345-L.jpg")
        );
        assert_eq!(
            record.author_urls,
            vec![Some("https://openlibrary.org/authors/OL79034A".to_string())]
        );
        assert_eq!(record.publisher.as_deref(), Some("Chilton Books"));
        assert_eq!(
            record.rating_details.as_ref().unwrap()["open_library"]["votes"],
            900
        );
    }

    #[test]
    fn test_parse_doc_target_language_detection() {
        let doc: SearchDoc = serde_json::from_value(json!({
            "title": "Мастер и Маргарита",
            "language": ["rus"],
        }))
        .unwrap();

        let record = source().parse_doc(doc);
        assert!(record.in_target_language);
        assert_eq!(record.language.as_deref(), Some("rus"));
    }

    #[test]
    fn test_parse_doc_sparse_defaults() {
        let doc: SearchDoc = serde_json::from_value(json!({"title": "Untitled"})).unwrap();
        let record = source().parse_doc(doc);

        assert_eq!(record.language.as_deref(), Some("en"));
        assert!(record.description.is_none());
        assert!(record.isbn_10.is_none());
        assert!(record.subjects.is_empty());
    }

    #[test]
    fn test_build_query_forms() {
        let s = source();
        assert_eq!(s.build_query(&SearchQuery::default()), "*:*");
        assert_eq!(
            s.build_query(&SearchQuery {
                author: Some("Herbert".to_string()),
                title: Some("Dune".to_string()),
                max_results: 10,
            }),
            "author:\"Herbert\" AND title:\"Dune\""
        );
    }
}
