//! Recursive translation of arbitrary JSON values.
//!
//! Walks maps, arrays and string leaves, feeding every non-exempt string
//! through the injected [`Translator`]. Sibling values are translated
//! concurrently; results are joined back by key/position, so output
//! structure and order always match the input regardless of which call
//! finishes first. A single failed leaf fails the whole call; a
//! half-translated tree is never returned as success.

use futures::future::{ready, try_join_all, BoxFuture, FutureExt};
use serde_json::{Map, Value};
use tracing::debug;

use super::Translator;
use crate::error::Result;

/// Map key whose `true` value marks the whole map as already being in
/// the target language.
const EXEMPT_FLAG: &str = "in_target_language";

/// Keys whose values are never translated: codes and derived labels that
/// must survive verbatim.
const SKIP_KEYS: &[&str] = &[
    "id",
    "key",
    "language",
    "age_rating",
    "size_description",
    "timestamp",
    "execution_time",
];

/// Key substrings marking identifier, URL and ISBN fields.
const SKIP_KEY_MARKERS: &[&str] = &["_id", "_url", "_key", "isbn"];

/// Sequence length above which arrays are processed in bounded chunks
/// rather than one unbounded fan-out.
const DEFAULT_CHUNK_SIZE: usize = 500;

/// Tree translator over `serde_json::Value`, generic in the backend.
pub struct TreeTranslator<'a> {
    translator: &'a dyn Translator,
    chunk_size: usize,
}

impl<'a> TreeTranslator<'a> {
    pub fn new(translator: &'a dyn Translator) -> Self {
        Self {
            translator,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(translator: &'a dyn Translator, chunk_size: usize) -> Self {
        Self {
            translator,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Translate every non-exempt string leaf of `value`, preserving the
    /// structure, key order and element order of the input.
    pub async fn translate(&self, value: &Value) -> Result<Value> {
        self.translate_value(value).await
    }

    fn translate_value<'b>(&'b self, value: &'b Value) -> BoxFuture<'b, Result<Value>> {
        async move {
            match value {
                Value::String(text) => {
                    Ok(Value::String(self.translator.translate_text(text).await?))
                }
                Value::Object(map) => self.translate_map(map).await,
                Value::Array(items) => self.translate_seq(items).await,
                other => Ok(other.clone()),
            }
        }
        .boxed()
    }

    async fn translate_map(&self, map: &Map<String, Value>) -> Result<Value> {
        // Whole-map short-circuit: content already in the target language
        if matches!(map.get(EXEMPT_FLAG), Some(Value::Bool(true))) {
            debug!("Skipping map flagged as already in target language");
            return Ok(Value::Object(map.clone()));
        }

        let futures: Vec<BoxFuture<'_, Result<Value>>> = map
            .iter()
            .map(|(key, value)| {
                if is_skip_key(key) {
                    ready(Ok(value.clone())).boxed()
                } else {
                    self.translate_value(value)
                }
            })
            .collect();

        let values = try_join_all(futures).await?;

        let out: Map<String, Value> = map.keys().cloned().zip(values).collect();
        Ok(Value::Object(out))
    }

    async fn translate_seq(&self, items: &[Value]) -> Result<Value> {
        if items.len() <= self.chunk_size {
            let values = try_join_all(items.iter().map(|v| self.translate_value(v))).await?;
            return Ok(Value::Array(values));
        }

        // Chunking bounds the number of in-flight translation calls and
        // yields between chunks so other tasks get scheduled.
        let mut out = Vec::with_capacity(items.len());
        for chunk in items.chunks(self.chunk_size) {
            let values = try_join_all(chunk.iter().map(|v| self.translate_value(v))).await?;
            out.extend(values);
            tokio::task::yield_now().await;
        }
        Ok(Value::Array(out))
    }
}

fn is_skip_key(key: &str) -> bool {
    SKIP_KEYS.contains(&key) || SKIP_KEY_MARKERS.iter().any(|m| key.contains(m))
}
