#![warn(clippy::unwrap_in_result)]
#![warn(clippy::unwrap_used)]

use serde::{Deserialize, Serialize};

/// Maximum label length on a rendered card before middle truncation kicks in.
pub const CARD_LABEL_LIMIT: usize = 26;

/// A search result in canonical form.
///
/// Backends answer in several shapes; the client normalizes all of them
/// into this one. The `url` is always fetchable, either supplied by the
/// backend or synthesized from bucket, region and object key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Object key of the stored image
    #[serde(rename = "objectKey")]
    pub object_key: String,
    /// Bucket the image lives in
    pub bucket: String,
    /// Publicly fetchable image URL
    pub url: String,
}

/// Display-ready descriptor for one search result.
///
/// Pure projection of a [`SearchHit`]: no I/O, deterministic label
/// truncation, URL carried through twice (once for the image itself,
/// once for the copy action).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// URL the image is fetched from
    pub image_url: String,
    /// Object key, truncated-middle to [`CARD_LABEL_LIMIT`]
    pub primary_label: String,
    /// Bucket name, truncated-middle to [`CARD_LABEL_LIMIT`]
    pub secondary_label: String,
    /// Full URL offered for copy/open actions
    pub copyable_url: String,
}

impl From<&SearchHit> for Card {
    fn from(hit: &SearchHit) -> Self {
        Self {
            image_url: hit.url.clone(),
            primary_label: truncate_middle(&hit.object_key, CARD_LABEL_LIMIT),
            secondary_label: truncate_middle(&hit.bucket, CARD_LABEL_LIMIT),
            copyable_url: hit.url.clone(),
        }
    }
}

/// Shortens a long string by eliding its middle.
///
/// Strings at or under `limit` characters pass through unchanged. Longer
/// strings keep the first `limit - 10` characters, a single `…`, and the
/// last 9 characters.
#[must_use]
pub fn truncate_middle(s: &str, limit: usize) -> String {
    let len = s.chars().count();
    if len <= limit {
        return s.to_string();
    }
    let lead = limit.saturating_sub(10);
    let head: String = s.chars().take(lead).collect();
    let tail: String = s.chars().skip(len - 9).collect();
    format!("{head}…{tail}")
}
