//! Video search response normalization.
//!
//! The search endpoint has answered with several payload shapes over time.
//! Each extractor below recognises one shape and either yields the list of
//! raw items or declines; the first extractor that recognises the payload
//! wins.

use captionbridge_core::VideoCandidate;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

/// Characters left unescaped in a query component (RFC 3986 unreserved plus
/// `!*'()`); everything else is sent as UTF-8 octet escapes.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

type Extractor = fn(&Value) -> Option<&Vec<Value>>;

const EXTRACTORS: &[(&str, Extractor)] = &[
    ("videoList", video_list),
    ("list", list),
    ("data.videoList", data_video_list),
    ("data.list", data_list),
    ("data", data),
    ("result.videoList", result_video_list),
    ("root", root),
];

fn video_list(v: &Value) -> Option<&Vec<Value>> {
    v.get("videoList")?.as_array()
}

fn list(v: &Value) -> Option<&Vec<Value>> {
    v.get("list")?.as_array()
}

fn data_video_list(v: &Value) -> Option<&Vec<Value>> {
    v.get("data")?.get("videoList")?.as_array()
}

fn data_list(v: &Value) -> Option<&Vec<Value>> {
    v.get("data")?.get("list")?.as_array()
}

fn data(v: &Value) -> Option<&Vec<Value>> {
    v.get("data")?.as_array()
}

fn result_video_list(v: &Value) -> Option<&Vec<Value>> {
    v.get("result")?.get("videoList")?.as_array()
}

fn root(v: &Value) -> Option<&Vec<Value>> {
    v.as_array()
}

const TITLE_FIELDS: &[&str] = &["title", "name"];
const KEY_FIELDS: &[&str] = &["accessKey", "access_key", "id"];

/// Reduce any known search payload to `{title, asset_key}` candidates.
///
/// Items missing a title or key are skipped. An unrecognised payload yields
/// an empty list.
pub fn normalize_search_response(body: &Value) -> Vec<VideoCandidate> {
    let Some((shape, items)) = EXTRACTORS
        .iter()
        .find_map(|(shape, extract)| extract(body).map(|items| (*shape, items)))
    else {
        tracing::debug!("Search response matched no known shape");
        return Vec::new();
    };

    tracing::debug!(shape = shape, items = items.len(), "Normalizing search response");
    items.iter().filter_map(to_candidate).collect()
}

fn to_candidate(item: &Value) -> Option<VideoCandidate> {
    let title = TITLE_FIELDS
        .iter()
        .find_map(|field| item.get(*field)?.as_str())?;
    let asset_key = KEY_FIELDS.iter().find_map(|field| match item.get(*field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })?;
    Some(VideoCandidate::new(title, asset_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_component_escapes_utf8_octets() {
        assert_eq!(encode_component("영화"), "%EC%98%81%ED%99%94");
        assert_eq!(encode_component("Movie Title"), "Movie%20Title");
        assert_eq!(encode_component("a-b_c.d~(1)"), "a-b_c.d~(1)");
        assert_eq!(encode_component("a&b=c"), "a%26b%3Dc");
    }

    #[test]
    fn test_top_level_video_list() {
        let body = json!({"videoList": [{"title": "Movie", "accessKey": "k1"}]});
        assert_eq!(
            normalize_search_response(&body),
            vec![VideoCandidate::new("Movie", "k1")]
        );
    }

    #[test]
    fn test_nested_shapes_and_field_aliases() {
        let body = json!({"data": {"list": [
            {"name": "Alpha", "access_key": "a"},
            {"title": "Beta", "id": 42}
        ]}});
        assert_eq!(
            normalize_search_response(&body),
            vec![
                VideoCandidate::new("Alpha", "a"),
                VideoCandidate::new("Beta", "42")
            ]
        );

        let body = json!({"result": {"videoList": [{"title": "Gamma", "accessKey": "g"}]}});
        assert_eq!(normalize_search_response(&body).len(), 1);

        let body = json!([{"title": "Root", "accessKey": "r"}]);
        assert_eq!(normalize_search_response(&body)[0].asset_key, "r");
    }

    #[test]
    fn test_access_key_preferred_over_id() {
        let body = json!({"list": [{"title": "T", "id": 1, "accessKey": "ak"}]});
        assert_eq!(normalize_search_response(&body)[0].asset_key, "ak");
    }

    #[test]
    fn test_incomplete_items_skipped() {
        let body = json!({"videoList": [
            {"title": "No key"},
            {"accessKey": "no-title"},
            {"title": "Ok", "accessKey": "ok"}
        ]});
        assert_eq!(
            normalize_search_response(&body),
            vec![VideoCandidate::new("Ok", "ok")]
        );
    }

    #[test]
    fn test_unknown_shape_is_empty() {
        assert!(normalize_search_response(&json!({"total": 0})).is_empty());
        assert!(normalize_search_response(&json!({"videoList": []})).is_empty());
    }
}
