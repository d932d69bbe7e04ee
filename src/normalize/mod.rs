//! Record normalization: raw search hits in, a deduplicated
//! entity/relationship graph out.
//!
//! Deduplication is scoped to one `normalize` call. Separate calls mint
//! disjoint ID spaces even for identical names; callers that want
//! cross-batch identity own that merge.

pub mod fields;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::model::{Author, Book, BookAuthor, BookGenre, Genre, RawRecord};

/// Per-run defaults applied when a record lacks the field.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub default_language: String,
    pub default_summary: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            default_summary: "No description available".to_string(),
        }
    }
}

/// The five collections produced by one normalization run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
    pub books: Vec<Book>,
    pub book_authors: Vec<BookAuthor>,
    pub book_genres: Vec<BookGenre>,
}

/// Normalize a batch of raw records.
///
/// Records are processed in source order. A record without a title is
/// skipped entirely; a missing description is replaced by a synthetic
/// summary built from the record's other metadata.
pub fn normalize(records: &[RawRecord], opts: &NormalizeOptions) -> ResultSet {
    let mut out = ResultSet::default();

    let mut seen_authors: HashMap<String, Uuid> = HashMap::new();
    let mut seen_genres: HashMap<String, Uuid> = HashMap::new();

    for record in records {
        let title = match record.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => {
                debug!("Skipping record without a title");
                continue;
            }
        };

        let book_id = Uuid::new_v4();

        // Link rows are deduplicated per book: the same author listed
        // twice on one record still yields a single row.
        let mut book_author_ids: HashSet<Uuid> = HashSet::new();
        let mut book_genre_ids: HashSet<Uuid> = HashSet::new();

        for (i, name) in record.author_names.iter().enumerate() {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }

            let author_id = match seen_authors.get(name) {
                Some(id) => *id,
                None => {
                    let id = Uuid::new_v4();
                    out.authors.push(Author {
                        id,
                        name: name.to_string(),
                        source_key: record.author_keys.get(i).cloned().flatten(),
                        source_url: record.author_urls.get(i).cloned().flatten(),
                    });
                    seen_authors.insert(name.to_string(), id);
                    id
                }
            };

            if book_author_ids.insert(author_id) {
                out.book_authors.push(BookAuthor { book_id, author_id });
            }
        }

        for subject in &record.subjects {
            let Some(genre_name) = fields::normalize_genre(subject) else {
                continue;
            };

            let genre_id = match seen_genres.get(&genre_name) {
                Some(id) => *id,
                None => {
                    let id = Uuid::new_v4();
                    out.genres.push(Genre {
                        id,
                        name: genre_name.clone(),
                        original_name: Some(subject.clone()),
                    });
                    seen_genres.insert(genre_name, id);
                    id
                }
            };

            if book_genre_ids.insert(genre_id) {
                out.book_genres.push(BookGenre { book_id, genre_id });
            }
        }

        let summary = match record.description.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => match record.first_sentence.as_deref().map(str::trim) {
                Some(s) if !s.is_empty() => format!("{}...", s),
                _ => fields::synthetic_summary(record, &opts.default_summary),
            },
        };

        out.books.push(Book {
            id: book_id,
            title,
            year_published: record.publication_year,
            summary,
            language: record
                .language
                .clone()
                .unwrap_or_else(|| opts.default_language.clone()),
            in_target_language: record.in_target_language,
            page_count: record.page_count,
            size_description: fields::size_description(record.page_count),
            isbn_10: record.isbn_10.clone(),
            isbn_13: record.isbn_13.clone(),
            average_rating: record.average_rating,
            rating_details: record.rating_details.clone(),
            source_url: record.source_url.clone(),
            age_rating: fields::age_rating(&record.subjects),
            cover_url: record.cover_url.clone(),
            publisher: record.publisher.clone(),
        });
    }

    out
}
