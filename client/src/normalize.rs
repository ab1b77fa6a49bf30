use kernel::SearchHit;
use serde_json::Value;

use crate::config::Config;

/// Converts a raw search response body into canonical hits.
///
/// Accepted shapes: a bare list, or an envelope `{"results": [...]}`.
/// Elements may name their key `objectKey` or `key`, may omit the bucket
/// (the configured bucket fills in) and may omit the URL (derived from
/// bucket, region and key). Anything else fails closed: unrecognized
/// bodies and elements with neither key nor URL produce zero hits, never
/// an error.
#[must_use]
pub fn normalize(body: &Value, cfg: &Config) -> Vec<SearchHit> {
    let items = match body {
        Value::Array(list) => list.as_slice(),
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(list)) => list.as_slice(),
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    items
        .iter()
        .filter_map(|item| normalize_one(item, cfg))
        .collect()
}

fn normalize_one(item: &Value, cfg: &Config) -> Option<SearchHit> {
    let obj = item.as_object()?;
    let key = obj
        .get("objectKey")
        .and_then(Value::as_str)
        .or_else(|| obj.get("key").and_then(Value::as_str))
        .unwrap_or_default();
    let url = obj.get("url").and_then(Value::as_str);
    if key.is_empty() && url.is_none() {
        return None;
    }
    let bucket = obj
        .get("bucket")
        .and_then(Value::as_str)
        .unwrap_or_else(|| cfg.bucket_or_unknown());
    let url = match url {
        Some(u) => u.to_string(),
        None => derived_url(bucket, cfg.region_or_unknown(), key),
    };
    Some(SearchHit {
        object_key: key.to_string(),
        bucket: bucket.to_string(),
        url,
    })
}

/// Public S3 object URL synthesized from its coordinates.
#[must_use]
pub fn derived_url(bucket: &str, region: &str, key: &str) -> String {
    format!(
        "https://{bucket}.s3.{region}.amazonaws.com/{}",
        url_escape::encode_component(key)
    )
}
