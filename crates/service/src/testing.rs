//! Test doubles for the translation provider.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use polyfaq_translate::{TranslateError, Translator};

/// Deterministic translator that prefixes text with `[lang] `.
///
/// Counts every call, can be slowed down to widen race windows, and fails
/// any text listed via [`fail_on`](Self::fail_on).
#[derive(Debug, Default)]
pub struct ScriptedTranslator {
    calls: AtomicUsize,
    delay: Option<Duration>,
    failing: Mutex<HashSet<String>>,
}

impl ScriptedTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Make every call whose input equals `text` fail.
    pub fn fail_on(&self, text: &str) {
        self.failing
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(text.to_string());
    }

    /// Stop failing on `text`.
    pub fn recover(&self, text: &str) {
        self.failing
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(text);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn translated(text: &str, lang: &str) -> String {
        format!("[{lang}] {text}")
    }
}

#[async_trait]
impl Translator for ScriptedTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let should_fail = self
            .failing
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(text);
        if should_fail {
            return Err(TranslateError::Status {
                status: 503,
                body: "scripted failure".to_string(),
            });
        }
        Ok(Self::translated(text, target_lang))
    }
}
