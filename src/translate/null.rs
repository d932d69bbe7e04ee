use async_trait::async_trait;

use super::Translator;
use crate::error::Result;

/// Identity translator: every text comes back unchanged. Used when the
/// caller asks for untranslated output, and as a test double.
pub struct NullTranslator;

#[async_trait]
impl Translator for NullTranslator {
    async fn translate_text(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }

    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>> {
        Ok(texts.to_vec())
    }
}
