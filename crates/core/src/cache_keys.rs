//! Cache key layout for FAQ listings.
//!
//! One entry per language: `faqs:<lang>`. Every FAQ mutation wipes the whole
//! namespace via [`FAQ_KEY_PATTERN`], because a canonical change alters the
//! gap set of every language.

/// Prefix shared by all FAQ listing keys.
pub const FAQ_KEY_PREFIX: &str = "faqs:";

/// Glob pattern matching every FAQ listing key.
pub const FAQ_KEY_PATTERN: &str = "faqs:*";

/// Counter bumped on every FAQ mutation. Outside [`FAQ_KEY_PATTERN`] so
/// invalidation never resets it.
pub const FAQ_GENERATION_KEY: &str = "faqs-generation";

/// Lifetime of a cached listing, in seconds.
pub const FAQ_CACHE_TTL_SECS: u64 = 3600;

/// Cache key for the FAQ listing in `lang`.
pub fn faq_list_key(lang: &str) -> String {
    format!("{FAQ_KEY_PREFIX}{lang}")
}
