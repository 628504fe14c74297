//! Claim text normalization and the natural key derived from it
//!
//! Two claims that differ only in case, whitespace, punctuation at the
//! edges or embedded links share a key. The store carries a UNIQUE
//! constraint on this key so concurrent writers can never append the same
//! claim twice.

/// Normalize claim text for keying
///
/// Strips `http(s)://` links, lower-cases, collapses runs of whitespace and
/// trims trailing punctuation.
pub fn normalize_claim_text(text: &str) -> String {
    let without_links = text
        .split_whitespace()
        .filter(|word| !word.starts_with("http://") && !word.starts_with("https://"))
        .collect::<Vec<_>>()
        .join(" ");

    without_links
        .to_lowercase()
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '.' | '!' | '?' | ',' | ';' | ':'))
        .to_string()
}

/// Natural key for a claim: BLAKE3 hex digest of its normalized text
pub fn claim_key(text: &str) -> String {
    blake3::hash(normalize_claim_text(text).as_bytes())
        .to_hex()
        .to_string()
}
