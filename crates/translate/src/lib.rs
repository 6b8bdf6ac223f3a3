//! Machine translation adapter.
//!
//! The FAQ service only depends on the [`Translator`] trait. Every call is
//! independently failable: the caller decides what a failure means for the
//! surrounding work.

use async_trait::async_trait;

pub mod google;

pub use google::{GoogleTranslator, GoogleTranslatorConfig};

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// Network failure or timeout talking to the provider.
    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status (quota, unsupported
    /// language, ...).
    #[error("translation provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered 2xx but the payload had no usable text.
    #[error("unexpected translation response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_lang` (an ISO 639-1 style code).
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError>;
}
