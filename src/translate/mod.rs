// Modular translation architecture
//
// This module provides translation backends behind one trait:
// - Local: MT server running on this machine
// - Remote: hosted translation API
// - Null: identity passthrough, used when no translation is requested
//
// The tree translator walks arbitrary JSON values and feeds string
// leaves through whichever backend was selected.

pub mod local;
pub mod null;
pub mod remote;
pub mod tree;

use async_trait::async_trait;

pub use tree::TreeTranslator;

use crate::config::{TranslateConfig, TranslatorBackend};
use crate::error::Result;

/// Main trait for translation backends.
///
/// The target language is fixed at construction time; implementations
/// must truncate over-long input themselves rather than fail on it.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a single text
    async fn translate_text(&self, text: &str) -> Result<String>;

    /// Translate several texts, returning them in input order
    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.translate_text(text).await?);
        }
        Ok(out)
    }
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create a translator for an explicitly chosen backend.
    /// `Auto` resolves through [`TranslatorFactory::select`].
    pub fn create_translator(config: &TranslateConfig) -> Box<dyn Translator> {
        match config.backend {
            TranslatorBackend::Local | TranslatorBackend::Auto => {
                Box::new(local::LocalTranslator::new(config))
            }
            TranslatorBackend::Remote => Box::new(remote::RemoteTranslator::new(config)),
            TranslatorBackend::Null => Box::new(null::NullTranslator),
        }
    }

    /// Resolve the configured backend, probing availability for `Auto`:
    /// prefer the local MT server, fall back to the remote API.
    pub async fn select(config: &TranslateConfig) -> Box<dyn Translator> {
        match config.backend {
            TranslatorBackend::Auto => {
                match local::check_local_availability(&config.local_endpoint).await {
                    Ok(()) => Box::new(local::LocalTranslator::new(config)),
                    Err(e) => {
                        tracing::warn!(
                            "Local MT server unavailable ({}), using remote API",
                            e
                        );
                        Box::new(remote::RemoteTranslator::new(config))
                    }
                }
            }
            _ => Self::create_translator(config),
        }
    }
}

/// Cut a text down to `max_len` characters. Backends apply this before
/// sending anything over the wire.
pub(crate) fn truncate_text(text: &str, max_len: usize) -> &str {
    match text.char_indices().nth(max_len) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ReverseTranslator;

    #[async_trait]
    impl Translator for ReverseTranslator {
        async fn translate_text(&self, text: &str) -> Result<String> {
            Ok(text.chars().rev().collect())
        }
    }

    #[test]
    fn test_default_batch_preserves_order_and_length() {
        let texts = vec!["abc".to_string(), "de".to_string(), "f".to_string()];
        let out = tokio_test::block_on(ReverseTranslator.translate_batch(&texts)).unwrap();
        assert_eq!(out, vec!["cba", "ed", "f"]);
    }

    #[test]
    fn test_truncate_text_char_boundaries() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello", 3), "hel");
        // Multi-byte characters are counted, not sliced through
        assert_eq!(truncate_text("привет", 4), "прив");
    }
}
