//! Response header normalization.

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;

use crate::config::HEADER_VALUE_SEPARATOR;

/// Flattens a response header map into lower-case name -> value.
///
/// Repeated headers are joined with `", "` in the order they were received.
/// Values that are not valid UTF-8 are decoded lossily rather than dropped,
/// so a present-but-odd header still counts as present.
pub fn normalize_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut normalized: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let key = name.as_str().to_ascii_lowercase();
        let value = String::from_utf8_lossy(value.as_bytes());
        normalized
            .entry(key)
            .and_modify(|existing| {
                existing.push_str(HEADER_VALUE_SEPARATOR);
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    normalized
}
