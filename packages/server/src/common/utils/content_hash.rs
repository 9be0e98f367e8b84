use sha2::{Digest, Sha256};

/// Fingerprint fetched video text.
///
/// SHA-256 (hex) of the text after normalization: lowercase, keep only
/// alphanumerics and whitespace, collapse whitespace runs, trim. Two fetches
/// of the same captions with different punctuation or spacing hash alike.
pub fn generate_content_hash(text: &str) -> String {
    let normalized = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    hex::encode(Sha256::digest(normalized.as_bytes()))
}
