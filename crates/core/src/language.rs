//! Language codes.
//!
//! FAQs are authored in exactly one canonical language; every other language
//! is derived from it by machine translation.

use crate::error::CoreError;

/// The language administrators author FAQs in.
pub const CANONICAL_LANGUAGE: &str = "en";

const MIN_CODE_LEN: usize = 2;
const MAX_CODE_LEN: usize = 8;

/// Whether `code` is the canonical language.
pub fn is_canonical(code: &str) -> bool {
    code == CANONICAL_LANGUAGE
}

/// Normalize a requested language code.
///
/// `None` and blank input resolve to [`CANONICAL_LANGUAGE`]. Codes are
/// trimmed and lowercased and must be 2-8 characters of `[a-z-]`
/// (e.g. `hi`, `pt-br`, `zh-cn`).
pub fn normalize_language(raw: Option<&str>) -> Result<String, CoreError> {
    let code = match raw.map(str::trim) {
        None | Some("") => return Ok(CANONICAL_LANGUAGE.to_string()),
        Some(code) => code.to_ascii_lowercase(),
    };

    let well_formed = (MIN_CODE_LEN..=MAX_CODE_LEN).contains(&code.len())
        && code.chars().all(|c| c.is_ascii_lowercase() || c == '-')
        && !code.starts_with('-')
        && !code.ends_with('-');

    if !well_formed {
        return Err(CoreError::Validation(format!(
            "Invalid language code '{code}'"
        )));
    }
    Ok(code)
}
