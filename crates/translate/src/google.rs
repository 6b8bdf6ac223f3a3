//! Google Translate client for the keyless `translate_a/single` endpoint.
//!
//! Request: `GET {base_url}?client=gtx&sl=auto&tl=<lang>&dt=t&q=<text>`.
//! Response: a nested JSON array whose first element is the list of
//! translated segments, each segment being `[translated, source, ...]`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::{TranslateError, Translator};

/// Default public endpoint.
pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct GoogleTranslatorConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GoogleTranslatorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TRANSLATE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(config: GoogleTranslatorConfig) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {e}>"));
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Decode(e.to_string()))?;

        let translated = extract_translation(&payload)?;
        tracing::debug!(
            target_lang = %target_lang,
            chars = text.len(),
            "Translated text"
        );
        Ok(translated)
    }
}

/// Concatenate the translated segments of a `translate_a/single` payload.
fn extract_translation(payload: &Value) -> Result<String, TranslateError> {
    let segments = payload
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Decode("missing segment list".into()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(TranslateError::Decode("no translated segments".into()));
    }
    Ok(text)
}
