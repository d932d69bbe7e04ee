use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Page-count bucket. Thresholds: <50, <150, <300, <500, >=500.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeBucket {
    #[serde(rename = "Very Short")]
    VeryShort,
    Short,
    Medium,
    Long,
    #[serde(rename = "Very Long")]
    VeryLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeRating {
    Children,
    Teen,
    Adult,
}

/// One normalized book. Identifiers are minted at normalization time and
/// never derived from source data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub year_published: Option<i32>,
    pub summary: String,
    pub language: String,
    /// Marks a book whose text already is in the translation target
    /// language; the tree translator leaves such maps untouched
    pub in_target_language: bool,
    pub page_count: Option<u32>,
    pub size_description: Option<SizeBucket>,
    pub isbn_10: Option<String>,
    pub isbn_13: Option<String>,
    pub average_rating: Option<f64>,
    /// Source-tagged rating blob, e.g. {"open_library": {"rating": …}}
    pub rating_details: Option<Value>,
    pub source_url: Option<String>,
    pub age_rating: Option<AgeRating>,
    pub cover_url: Option<String>,
    pub publisher: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub source_key: Option<String>,
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: Uuid,
    /// Normalized name, the dedup key within one normalization run
    pub name: String,
    /// Raw subject string the normalized name was derived from
    pub original_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAuthor {
    pub book_id: Uuid,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookGenre {
    pub book_id: Uuid,
    pub genre_id: Uuid,
}

/// One search hit pre-mapped into the common field vocabulary shared by
/// both bibliographic sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub first_sentence: Option<String>,
    pub publication_year: Option<i32>,
    pub language: Option<String>,
    /// Content already in the translation target language; books carrying
    /// this flag are exempt from tree translation
    pub in_target_language: bool,
    pub page_count: Option<u32>,
    pub isbn_10: Option<String>,
    pub isbn_13: Option<String>,
    pub author_names: Vec<String>,
    pub author_keys: Vec<Option<String>>,
    /// Source page per author, parallel to `author_names`
    pub author_urls: Vec<Option<String>>,
    pub subjects: Vec<String>,
    pub average_rating: Option<f64>,
    pub rating_details: Option<Value>,
    pub source_url: Option<String>,
    pub cover_url: Option<String>,
    pub publisher: Option<String>,
}
