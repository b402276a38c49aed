//! Deterministic key derivation

use sha2::{Digest, Sha256};
use url::Url;

/// Longest extension kept from a URL
const MAX_EXTENSION_LEN: usize = 4;

/// Hex-encoded SHA-256 of the full URL string
///
/// Distinct URLs are assumed never to collide under SHA-256.
pub fn url_hash(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Extension guessed from the trailing path segment of `url`
///
/// Query string and fragment are ignored. The result is lowercased, limited
/// to ASCII alphanumerics and truncated to four characters; `default` is
/// returned when the segment has no dot or nothing usable follows it.
pub fn url_extension(url: &str, default: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let segment = path.rsplit('/').next().unwrap_or_default();
    let Some((_, ext)) = segment.rsplit_once('.') else {
        return default.to_string();
    };

    let ext: String = ext
        .chars()
        .take(MAX_EXTENSION_LEN)
        .take_while(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if ext.is_empty() {
        default.to_string()
    } else {
        ext
    }
}

/// File name under which the blob for `url` is stored
pub fn blob_file_name(url: &str, default_extension: &str) -> String {
    format!(
        "{}.{}",
        url_hash(url),
        url_extension(url, default_extension)
    )
}

/// Fingerprint of the inputs a summary was generated from
pub fn content_fingerprint(title: &str, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    // separator keeps ("ab", "c") and ("a", "bc") apart
    hasher.update([0u8]);
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
