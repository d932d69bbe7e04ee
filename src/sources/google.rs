use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{BookSource, SearchQuery};
use crate::config::GoogleBooksConfig;
use crate::error::Result;
use crate::model::RawRecord;
use crate::normalize::fields;

// API caps page size at 40 regardless of what is requested
const MAX_BATCH_SIZE: usize = 40;

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<VolumeItem>,
}

#[derive(Debug, Deserialize)]
struct VolumeItem {
    #[serde(rename = "volumeInfo")]
    volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    categories: Vec<String>,
    published_date: Option<String>,
    description: Option<String>,
    language: Option<String>,
    page_count: Option<u32>,
    average_rating: Option<f64>,
    ratings_count: Option<u64>,
    #[serde(default)]
    industry_identifiers: Vec<IndustryIdentifier>,
    info_link: Option<String>,
    publisher: Option<String>,
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    id_type: Option<String>,
    identifier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

/// Google Books volumes search with pagination.
pub struct GoogleBooksSource {
    client: Client,
    config: GoogleBooksConfig,
}

impl GoogleBooksSource {
    pub fn new(config: &GoogleBooksConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("HTTP client creation should not fail");

        Self {
            client,
            config: config.clone(),
        }
    }

    async fn search_batch(&self, query: &str, start_index: usize, limit: usize) -> Vec<RawRecord> {
        let mut params: Vec<(&str, String)> = vec![
            ("q", query.to_string()),
            ("startIndex", start_index.to_string()),
            ("maxResults", limit.min(MAX_BATCH_SIZE).to_string()),
            ("printType", "books".to_string()),
        ];
        if let Some(key) = &self.config.api_key {
            params.push(("key", key.clone()));
        }

        debug!("Google Books request: startIndex={}, maxResults={}", start_index, limit);

        let response = match self
            .client
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Google Books request failed: {}", e);
                return Vec::new();
            }
        };

        let parsed: VolumesResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to parse Google Books response: {}", e);
                return Vec::new();
            }
        };

        parsed
            .items
            .into_iter()
            .filter_map(|item| item.volume_info.map(parse_volume))
            .collect()
    }

    fn build_query(&self, query: &SearchQuery) -> String {
        let mut parts = Vec::new();
        if let Some(author) = query.author.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
            parts.push(format!("inauthor:{}", author));
        }
        if let Some(title) = query.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            parts.push(format!("intitle:{}", title));
        }
        parts.join("+")
    }
}

#[async_trait]
impl BookSource for GoogleBooksSource {
    fn name(&self) -> &'static str {
        "Google Books"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawRecord>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let q = self.build_query(query);
        let batch_size = self.config.batch_size.clamp(1, MAX_BATCH_SIZE);
        let mut records = Vec::new();
        let mut start_index = 0;

        while records.len() < query.max_results {
            let batch = self.search_batch(&q, start_index, batch_size).await;
            if batch.is_empty() {
                break;
            }

            start_index += batch.len();
            let short_batch = batch.len() < batch_size;
            records.extend(batch);

            if short_batch {
                break;
            }

            tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
        }

        records.truncate(query.max_results);
        Ok(records)
    }
}

fn parse_volume(info: VolumeInfo) -> RawRecord {
    let mut isbn_10 = None;
    let mut isbn_13 = None;
    for id in &info.industry_identifiers {
        match (id.id_type.as_deref(), &id.identifier) {
            (Some("ISBN_10"), Some(value)) => isbn_10 = Some(value.clone()),
            (Some("ISBN_13"), Some(value)) => isbn_13 = Some(value.clone()),
            _ => {}
        }
    }

    let rating_details = info.average_rating.map(|rating| {
        json!({
            "google_books": {
                "rating": rating,
                "votes": info.ratings_count.unwrap_or(0),
            }
        })
    });

    RawRecord {
        title: info.title.clone(),
        description: info.description.clone(),
        first_sentence: None,
        publication_year: info
            .published_date
            .as_deref()
            .and_then(fields::extract_year),
        language: info.language.clone(),
        in_target_language: false,
        page_count: info.page_count,
        isbn_10,
        isbn_13,
        author_names: info.authors.clone(),
        author_keys: Vec::new(),
        author_urls: Vec::new(),
        subjects: info.categories.clone(),
        average_rating: info.average_rating,
        rating_details,
        source_url: info.info_link.clone(),
        cover_url: info.image_links.and_then(|l| l.thumbnail),
        publisher: info.publisher,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_volume_maps_identifiers_and_year() {
        let info: VolumeInfo = serde_json::from_value(json!({
            "title": "Dune",
            "authors": ["Frank Herbert"],
            "categories": ["Fiction / Science Fiction"],
            "publishedDate": "1965-08",
            "language": "en",
            "pageCount": 412,
            "averageRating": 4.5,
            "ratingsCount": 1234,
            "industryIdentifiers": [
                {"type": "ISBN_10", "identifier": "0441013597"},
                {"type": "ISBN_13", "identifier": "9780441013593"}
            ],
            "infoLink": "https://books.google.com/books?id=x",
            "imageLinks": {"thumbnail": "https://books.google.com/thumb"}
        }))
        .unwrap();

        let record = parse_volume(info);
        assert_eq!(record.title.as_deref(), Some("Dune"));
        assert_eq!(record.publication_year, Some(1965));
        assert_eq!(record.isbn_10.as_deref(), Some("0441013597"));
        assert_eq!(record.isbn_13.as_deref(), Some("9780441013593"));
        assert_eq!(record.rating_details.as_ref().unwrap()["google_books"]["votes"], 1234);
        assert_eq!(record.cover_url.as_deref(), Some("https://books.google.com/thumb"));
    }

    #[test]
    fn test_parse_volume_tolerates_sparse_items() {
        let info: VolumeInfo = serde_json::from_value(json!({})).unwrap();
        let record = parse_volume(info);
        assert!(record.title.is_none());
        assert!(record.rating_details.is_none());
        assert!(record.author_names.is_empty());
    }

    #[test]
    fn test_build_query() {
        let source = GoogleBooksSource::new(&crate::config::Config::default().sources.google);
        let q = source.build_query(&SearchQuery {
            author: Some("Herbert".to_string()),
            title: Some("Dune".to_string()),
            max_results: 10,
        });
        assert_eq!(q, "inauthor:Herbert+intitle:Dune");
    }
}
