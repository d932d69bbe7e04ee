//! Pure field-level heuristics shared by both bibliographic sources.
//!
//! Every function here is total: malformed input degrades to `None` or a
//! documented default, never an error, so one bad field cannot abort an
//! otherwise valid record.

use chrono::{Datelike, NaiveDate};

use crate::model::{AgeRating, RawRecord, SizeBucket};

/// Noise substrings removed from genre names, matched case-insensitively
/// against the title-cased value.
const GENRE_NOISE: &[&str] = &["fiction", "literature", "books", "stories", "printed"];

/// Synonym table applied to title-cased genre names before noise removal.
const GENRE_SYNONYMS: &[(&str, &str)] = &[
    ("Sci-Fi", "Science Fiction"),
    ("Sci Fi", "Science Fiction"),
    ("Sf", "Science Fiction"),
    ("Fantasy Fiction", "Fantasy"),
    ("Mystery And Suspense Fiction", "Mystery"),
];

/// Keyword → rating pairs, scanned in order; "young adult" must precede
/// "adult" so teen material is not classified as adult.
const AGE_KEYWORDS: &[(&str, AgeRating)] = &[
    ("juvenile", AgeRating::Children),
    ("young adult", AgeRating::Teen),
    ("children", AgeRating::Children),
    ("teen", AgeRating::Teen),
    ("adult", AgeRating::Adult),
];

/// Bucket a page count. Unknown or zero page counts have no bucket.
pub fn size_description(pages: Option<u32>) -> Option<SizeBucket> {
    match pages {
        None | Some(0) => None,
        Some(p) if p < 50 => Some(SizeBucket::VeryShort),
        Some(p) if p < 150 => Some(SizeBucket::Short),
        Some(p) if p < 300 => Some(SizeBucket::Medium),
        Some(p) if p < 500 => Some(SizeBucket::Long),
        Some(_) => Some(SizeBucket::VeryLong),
    }
}

/// Normalize a raw subject/category string into a genre name.
///
/// Trims, title-cases, collapses known synonyms, then strips noise terms.
/// Returns `None` when nothing usable remains.
pub fn normalize_genre(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let titled = title_case(trimmed);

    // Synonyms are keyed on the full title-cased form and checked before
    // noise removal, otherwise "Mystery And Suspense Fiction" would lose
    // its "Fiction" and miss the table.
    for (from, to) in GENRE_SYNONYMS {
        if titled == *from {
            return Some((*to).to_string());
        }
    }

    let stripped = strip_noise(&titled);
    let cleaned = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Extract a publication year from a date string in year, year-month, or
/// full ISO date form, tried in that order.
pub fn extract_year(date_str: &str) -> Option<i32> {
    let s = date_str.trim();
    if s.is_empty() {
        return None;
    }

    if s.len() <= 4 && s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok();
    }

    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
        return Some(date.year());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| date.year())
}

/// Infer an age rating from subject keywords. Subjects are scanned in
/// list order and the first keyword hit wins.
pub fn age_rating(subjects: &[String]) -> Option<AgeRating> {
    for subject in subjects {
        let lower = subject.to_lowercase();
        for (keyword, rating) in AGE_KEYWORDS {
            if lower.contains(keyword) {
                return Some(*rating);
            }
        }
    }
    None
}

/// Build a summary for a record without a description, from whatever
/// metadata is available, falling back to a fixed placeholder.
pub fn synthetic_summary(record: &RawRecord, placeholder: &str) -> String {
    let mut parts = Vec::new();

    if let Some(year) = record.publication_year {
        parts.push(format!("First published in {}.", year));
    }
    if let Some(publisher) = &record.publisher {
        parts.push(format!("Published by {}.", publisher));
    }
    if !record.subjects.is_empty() {
        let topics: Vec<&str> = record.subjects.iter().take(3).map(String::as_str).collect();
        parts.push(format!("Topics include: {}.", topics.join(", ")));
    }

    if parts.is_empty() {
        placeholder.to_string()
    } else {
        parts.join(" ")
    }
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_boundary = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_boundary = false;
        } else {
            out.push(ch);
            at_boundary = true;
        }
    }
    out
}

/// Remove every occurrence of the genre noise terms, case-insensitively.
/// Noise terms are ASCII, so byte offsets into the ASCII-lowercased copy
/// are valid in the original.
fn strip_noise(s: &str) -> String {
    let mut result = s.to_string();
    for noise in GENRE_NOISE {
        loop {
            let lower = result.to_ascii_lowercase();
            match lower.find(noise) {
                Some(idx) => result.replace_range(idx..idx + noise.len(), ""),
                None => break,
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_description_thresholds() {
        assert_eq!(size_description(Some(49)), Some(SizeBucket::VeryShort));
        assert_eq!(size_description(Some(149)), Some(SizeBucket::Short));
        assert_eq!(size_description(Some(299)), Some(SizeBucket::Medium));
        assert_eq!(size_description(Some(499)), Some(SizeBucket::Long));
        assert_eq!(size_description(Some(500)), Some(SizeBucket::VeryLong));
        assert_eq!(size_description(Some(0)), None);
        assert_eq!(size_description(None), None);
    }

    #[test]
    fn test_normalize_genre_synonyms() {
        assert_eq!(normalize_genre("Sci-Fi").as_deref(), Some("Science Fiction"));
        assert_eq!(normalize_genre("sci fi").as_deref(), Some("Science Fiction"));
        assert_eq!(normalize_genre("SF").as_deref(), Some("Science Fiction"));
        assert_eq!(normalize_genre("Fantasy fiction").as_deref(), Some("Fantasy"));
        assert_eq!(
            normalize_genre("Mystery and Suspense Fiction").as_deref(),
            Some("Mystery")
        );
    }

    #[test]
    fn test_normalize_genre_noise_and_casing() {
        assert_eq!(normalize_genre("horror stories").as_deref(), Some("Horror"));
        assert_eq!(normalize_genre("  romance  ").as_deref(), Some("Romance"));
        assert_eq!(normalize_genre(""), None);
        assert_eq!(normalize_genre("  "), None);
        assert_eq!(normalize_genre("stories"), None);
    }

    #[test]
    fn test_extract_year_formats() {
        assert_eq!(extract_year("2020"), Some(2020));
        assert_eq!(extract_year("2020-05"), Some(2020));
        assert_eq!(extract_year("2020-05-17"), Some(2020));
        assert_eq!(extract_year("850"), Some(850));
        assert_eq!(extract_year("not-a-date"), None);
        assert_eq!(extract_year(""), None);
    }

    #[test]
    fn test_age_rating_keyword_order() {
        let teen = vec!["Young adult fiction".to_string()];
        assert_eq!(age_rating(&teen), Some(AgeRating::Teen));

        let children = vec!["Juvenile literature".to_string()];
        assert_eq!(age_rating(&children), Some(AgeRating::Children));

        // First subject with a hit wins
        let mixed = vec!["History".to_string(), "Adult".to_string()];
        assert_eq!(age_rating(&mixed), Some(AgeRating::Adult));

        assert_eq!(age_rating(&[]), None);
        assert_eq!(age_rating(&["History".to_string()]), None);
    }

    #[test]
    fn test_synthetic_summary() {
        let record = RawRecord {
            publication_year: Some(1965),
            publisher: Some("Chilton Books".to_string()),
            subjects: vec![
                "Science Fiction".to_string(),
                "Deserts".to_string(),
                "Politics".to_string(),
                "Ecology".to_string(),
            ],
            ..Default::default()
        };
        assert_eq!(
            synthetic_summary(&record, "No description available"),
            "First published in 1965. Published by Chilton Books. \
             Topics include: Science Fiction, Deserts, Politics."
        );

        let empty = RawRecord::default();
        assert_eq!(
            synthetic_summary(&empty, "No description available"),
            "No description available"
        );
    }
}
