//! Bookmesh - Book Metadata Aggregation and Translation
//!
//! A Rust implementation of a book-metadata pipeline that searches Google
//! Books and Open Library, normalizes the heterogeneous responses into a
//! deduplicated entity/relationship graph, and optionally translates the
//! textual fields into a target language.

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod report;
pub mod sources;
pub mod translate;
