use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use super::{truncate_text, Translator};
use crate::config::TranslateConfig;
use crate::error::{BookmeshError, Result};

#[derive(Debug, Clone, Serialize)]
struct LocalTranslateRequest {
    q: String,
    source: String,
    target: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LocalTranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Translator backed by a LibreTranslate-compatible MT server running on
/// this machine.
pub struct LocalTranslator {
    client: Client,
    endpoint: String,
    target_language: String,
    max_text_length: usize,
}

impl LocalTranslator {
    pub fn new(config: &TranslateConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("HTTP client creation should not fail");

        Self {
            client,
            endpoint: config.local_endpoint.clone(),
            target_language: config.target_language.clone(),
            max_text_length: config.max_text_length,
        }
    }
}

#[async_trait]
impl Translator for LocalTranslator {
    async fn translate_text(&self, text: &str) -> Result<String> {
        let request = LocalTranslateRequest {
            q: truncate_text(text, self.max_text_length).to_string(),
            source: "auto".to_string(),
            target: self.target_language.clone(),
        };

        let url = format!("{}/translate", self.endpoint);
        debug!("Sending translation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BookmeshError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(BookmeshError::Translation(format!(
                "Local MT server error {}: {}",
                status, error_text
            )));
        }

        let translated: LocalTranslateResponse = response
            .json()
            .await
            .map_err(|e| BookmeshError::Translation(format!("Failed to parse response: {}", e)))?;

        Ok(translated.translated_text)
    }

    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let body = json!({
            "q": texts
                .iter()
                .map(|t| truncate_text(t, self.max_text_length))
                .collect::<Vec<_>>(),
            "source": "auto",
            "target": self.target_language,
        });

        let url = format!("{}/translate", self.endpoint);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BookmeshError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(BookmeshError::Translation(format!(
                "Local MT server error {}",
                response.status()
            )));
        }

        let translated: Vec<LocalTranslateResponse> = response
            .json()
            .await
            .map_err(|e| BookmeshError::Translation(format!("Failed to parse response: {}", e)))?;

        if translated.len() != texts.len() {
            return Err(BookmeshError::Translation(format!(
                "Batch length mismatch: sent {}, received {}",
                texts.len(),
                translated.len()
            )));
        }

        Ok(translated.into_iter().map(|t| t.translated_text).collect())
    }
}

/// Check that the local MT server answers on its languages endpoint.
pub async fn check_local_availability(endpoint: &str) -> Result<()> {
    let client = Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("HTTP client creation should not fail");

    let url = format!("{}/languages", endpoint);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| BookmeshError::Translation(format!("Failed to connect to MT server: {}", e)))?;

    if response.status().is_success() {
        info!("Local MT server at '{}' is available", endpoint);
        Ok(())
    } else {
        Err(BookmeshError::Translation(format!(
            "Local MT server at '{}' answered with {}",
            endpoint,
            response.status()
        )))
    }
}
