use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::{truncate_text, Translator};
use crate::config::TranslateConfig;
use crate::error::{BookmeshError, Result};

#[derive(Debug, Clone, Deserialize)]
struct RemoteTranslateResponse {
    translations: Vec<RemoteTranslation>,
}

#[derive(Debug, Clone, Deserialize)]
struct RemoteTranslation {
    text: String,
}

/// Translator backed by a DeepL-compatible hosted translation API.
/// Fallback for machines without a local MT server.
pub struct RemoteTranslator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    target_language: String,
    max_text_length: usize,
}

impl RemoteTranslator {
    pub fn new(config: &TranslateConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("HTTP client creation should not fail");

        Self {
            client,
            endpoint: config.remote_endpoint.clone(),
            api_key: config.remote_api_key.clone(),
            target_language: config.target_language.clone(),
            max_text_length: config.max_text_length,
        }
    }

    async fn request(&self, texts: Vec<&str>) -> Result<Vec<String>> {
        let expected = texts.len();
        let body = json!({
            "text": texts,
            "target_lang": self.target_language,
        });

        let url = format!("{}/v2/translate", self.endpoint);
        debug!("Sending translation request to: {}", url);

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", auth_header_value(key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| BookmeshError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(BookmeshError::Translation(format!(
                "Translation API error {}: {}",
                status, error_text
            )));
        }

        let parsed: RemoteTranslateResponse = response
            .json()
            .await
            .map_err(|e| BookmeshError::Translation(format!("Failed to parse response: {}", e)))?;

        if parsed.translations.len() != expected {
            return Err(BookmeshError::Translation(format!(
                "Batch length mismatch: sent {}, received {}",
                expected,
                parsed.translations.len()
            )));
        }

        Ok(parsed.translations.into_iter().map(|t| t.text).collect())
    }
}

#[async_trait]
impl Translator for RemoteTranslator {
    async fn translate_text(&self, text: &str) -> Result<String> {
        let mut translated = self
            .request(vec![truncate_text(text, self.max_text_length)])
            .await?;
        translated
            .pop()
            .ok_or_else(|| BookmeshError::Translation("Empty translation received".to_string()))
    }

    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(
            texts
                .iter()
                .map(|t| truncate_text(t, self.max_text_length))
                .collect(),
        )
        .await
    }
}

/// Check that the remote API accepts the configured key, using the cheap
/// usage endpoint rather than a translation call.
pub async fn check_remote_availability(endpoint: &str, api_key: Option<&str>) -> Result<()> {
    let client = Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("HTTP client creation should not fail");

    let url = format!("{}/v2/usage", endpoint);

    let mut request = client.get(&url);
    if let Some(key) = api_key {
        request = request.header("Authorization", auth_header_value(key));
    }

    let response = request.send().await.map_err(|e| {
        BookmeshError::Translation(format!("Failed to connect to translation API: {}", e))
    })?;

    if response.status().is_success() {
        info!("Translation API at '{}' is available", endpoint);
        Ok(())
    } else {
        Err(BookmeshError::Translation(format!(
            "Translation API at '{}' answered with {}",
            endpoint,
            response.status()
        )))
    }
}

fn auth_header_value(key: &str) -> String {
    format!("DeepL-Auth-Key {}", key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_threads_endpoint_and_key_from_config() {
        let mut config = crate::config::Config::default().translate;
        config.remote_api_key = Some("abc123:fx".to_string());
        config.target_language = "ru".to_string();

        let translator = RemoteTranslator::new(&config);
        assert_eq!(translator.endpoint, "https://api-free.deepl.com");
        assert_eq!(translator.api_key.as_deref(), Some("abc123:fx"));
        assert_eq!(translator.target_language, "ru");
    }

    #[test]
    fn test_auth_header_value() {
        assert_eq!(auth_header_value("abc123:fx"), "DeepL-Auth-Key abc123:fx");
    }
}
