use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, BookmeshError};

// Default values for translation configuration
fn default_chunk_size() -> usize {
    500
}

fn default_max_text_length() -> usize {
    5000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub sources: SourcesConfig,
    pub translate: TranslateConfig,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub google: GoogleBooksConfig,
    pub openlib: OpenLibraryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleBooksConfig {
    /// Volumes endpoint base URL
    pub base_url: String,
    /// Optional API key appended to every request
    pub api_key: Option<String>,
    /// Page size per request, capped at 40 by the API
    pub batch_size: usize,
    /// Delay between paginated requests (milliseconds)
    pub request_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenLibraryConfig {
    /// Site base URL, also used to build source/author URLs
    pub base_url: String,
    /// Page size per request
    pub batch_size: usize,
    /// Delay between paginated requests (milliseconds)
    pub request_delay_ms: u64,
    /// Language code used when a document carries none
    pub default_language: String,
    /// Summary used when a document has no description at all
    pub default_summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Which backend to use
    pub backend: TranslatorBackend,
    /// Local MT server endpoint
    pub local_endpoint: String,
    /// Remote translation API endpoint
    pub remote_endpoint: String,
    /// Auth key for the remote translation API
    pub remote_api_key: Option<String>,
    /// Target language code translations are produced in
    pub target_language: String,
    /// Sequence length above which tree translation switches to chunked
    /// processing, and the size of each chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Longest text passed to a backend; longer input is truncated
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TranslatorBackend {
    /// Auto: probe the local MT server, fall back to the remote API
    Auto,
    /// Local: MT server running on this machine
    Local,
    /// Remote: hosted translation API
    Remote,
    /// Null: identity translator, returns input unchanged
    Null,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: SourcesConfig {
                google: GoogleBooksConfig {
                    base_url: "https://www.googleapis.com/books/v1/volumes".to_string(),
                    api_key: None,
                    batch_size: 40,
                    request_delay_ms: 100,
                },
                openlib: OpenLibraryConfig {
                    base_url: "https://openlibrary.org".to_string(),
                    batch_size: 100,
                    request_delay_ms: 500,
                    default_language: "en".to_string(),
                    default_summary: "No description available".to_string(),
                },
            },
            translate: TranslateConfig {
                backend: TranslatorBackend::Auto,
                local_endpoint: "http://localhost:5050".to_string(),
                remote_endpoint: "https://api-free.deepl.com".to_string(),
                remote_api_key: None,
                target_language: "ru".to_string(),
                chunk_size: 500,
                max_text_length: 5000,
            },
            request_timeout_secs: 200,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BookmeshError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| BookmeshError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| BookmeshError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| BookmeshError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_remote_backend_is_self_consistent() {
        let config = Config::default();
        // The remote backend speaks the DeepL v2 wire format, so the
        // default endpoint must be a DeepL host and the key field must
        // exist for the auth header
        assert_eq!(config.translate.remote_endpoint, "https://api-free.deepl.com");
        assert!(config.translate.remote_api_key.is_none());
    }

    #[test]
    fn test_missing_config_file_is_a_config_error() {
        let result = Config::from_file("/nonexistent/bookmesh-config.toml");
        assert!(matches!(result, Err(BookmeshError::Config(_))));
    }
}
