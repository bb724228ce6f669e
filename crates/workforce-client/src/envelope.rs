//! # Response Envelopes
//!
//! The backend is inconsistent about how it wraps results. Everything is
//! normalized here, at the data-source boundary, so the list engine only sees
//! one [`PageResponse`] shape.
//!
//! ## Accepted List Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Nested     { "success": true,                                       │
//! │                  "data": { "data": [..], "total": 12, "hasNext": true } }│
//! │                                                                         │
//! │  2. Flat       { "data": [..], "totalCount": 12 }                       │
//! │                                                                         │
//! │  3. Raw array  [ .. ]                                                   │
//! │                                                                         │
//! │  Any level carrying "success": false is a rejection; its "message"     │
//! │  becomes ClientError::Rejected.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## has_next Resolution
//! 1. `hasNext` / `has_next` when present
//! 2. else `offset + rows < total` when a total is present
//! 3. else a full chunk (`rows == page_size`) is taken to mean "maybe more"

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use workforce_core::{ListQuery, PageResponse};

use crate::error::{ClientError, ClientResult};
use crate::source::DeleteAck;

const TOTAL_KEYS: [&str; 2] = ["total", "totalCount"];
const HAS_NEXT_KEYS: [&str; 2] = ["hasNext", "has_next"];
const AFFECTED_KEYS: [&str; 3] = ["affected", "count", "deletedCount"];

/// Normalizes a list response body.
pub fn decode_page<T: DeserializeOwned>(body: Value, query: &ListQuery) -> ClientResult<PageResponse<T>> {
    let (rows, meta) = split_list(body)?;
    let len = rows.len() as u64;
    let data: Vec<T> = serde_json::from_value(Value::Array(rows))?;

    let meta: Vec<&Map<String, Value>> = meta.iter().collect();
    let total = lookup(&meta, &TOTAL_KEYS).and_then(Value::as_u64);
    let has_next = match lookup(&meta, &HAS_NEXT_KEYS).and_then(Value::as_bool) {
        Some(flag) => flag,
        None => match total {
            Some(total) => query.offset() + len < total,
            None => len >= query.page_size as u64,
        },
    };

    Ok(PageResponse::new(data, total, has_next))
}

/// Normalizes a single-entity response (`{data: {data: e}}`, `{data: e}` or `e`).
pub fn decode_entity<T: DeserializeOwned>(body: Value) -> ClientResult<T> {
    let mut value = body;
    for _ in 0..2 {
        check_success(&value)?;
        match value {
            Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
                value = map.remove("data").unwrap_or(Value::Null);
            }
            other => {
                value = other;
                break;
            }
        }
    }
    check_success(&value)?;
    Ok(serde_json::from_value(value)?)
}

/// Normalizes a delete acknowledgement. An empty body acknowledges without
/// a count.
pub fn decode_ack(body: Value) -> ClientResult<DeleteAck> {
    if body.is_null() {
        return Ok(DeleteAck::default());
    }
    check_success(&body)?;

    let mut metas = Vec::new();
    if let Value::Object(map) = &body {
        metas.push(map);
        if let Some(Value::Object(inner)) = map.get("data") {
            check_map(inner)?;
            metas.push(inner);
        }
    }

    Ok(DeleteAck {
        affected: lookup(&metas, &AFFECTED_KEYS).and_then(Value::as_u64),
    })
}

/// Fails with the server's message on a `success: false` envelope.
fn check_success(value: &Value) -> ClientResult<()> {
    match value {
        Value::Object(map) => check_map(map),
        _ => Ok(()),
    }
}

fn check_map(map: &Map<String, Value>) -> ClientResult<()> {
    if map.get("success").and_then(Value::as_bool) == Some(false) {
        let message = map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("Request failed")
            .to_string();
        return Err(ClientError::Rejected { message });
    }
    Ok(())
}

/// Splits a list body into its rows and the metadata objects to read
/// totals from, innermost first.
fn split_list(body: Value) -> ClientResult<(Vec<Value>, Vec<Map<String, Value>>)> {
    check_success(&body)?;

    match body {
        Value::Array(rows) => Ok((rows, Vec::new())),
        Value::Object(mut outer) => match outer.remove("data") {
            Some(Value::Array(rows)) => Ok((rows, vec![outer])),
            Some(Value::Object(mut inner)) => {
                check_map(&inner)?;
                match inner.remove("data") {
                    Some(Value::Array(rows)) => Ok((rows, vec![inner, outer])),
                    _ => Err(ClientError::Decode(
                        "list envelope has no data array".to_string(),
                    )),
                }
            }
            Some(Value::Null) | None => Err(ClientError::Decode(
                "list envelope has no data field".to_string(),
            )),
            Some(_) => Err(ClientError::Decode(
                "list envelope data is neither an array nor an object".to_string(),
            )),
        },
        _ => Err(ClientError::Decode(
            "list response is neither an array nor an object".to_string(),
        )),
    }
}

/// First non-null value under any of `keys`, searching `metas` in order.
fn lookup<'a>(metas: &[&'a Map<String, Value>], keys: &[&str]) -> Option<&'a Value> {
    metas
        .iter()
        .flat_map(|m| keys.iter().filter_map(move |k| m.get(*k)))
        .find(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use workforce_core::types::Region;

    fn region(i: i64) -> Value {
        json!({ "id": i, "code": format!("R{}", i), "nameEn": format!("Region {}", i), "nameAr": "" })
    }

    fn rows(ids: std::ops::RangeInclusive<i64>) -> Vec<Value> {
        ids.map(region).collect()
    }

    #[test]
    fn test_nested_envelope() {
        let body = json!({
            "success": true,
            "data": { "data": rows(1..=5), "total": 12, "hasNext": true }
        });

        let page: PageResponse<Region> = decode_page(body, &ListQuery::new(1, 5)).unwrap();
        assert_eq!(page.data.len(), 5);
        assert_eq!(page.total, Some(12));
        assert!(page.has_next);
    }

    #[test]
    fn test_flat_envelope_derives_has_next_from_total() {
        let body = json!({ "data": rows(11..=12), "totalCount": 12 });

        let page: PageResponse<Region> = decode_page(body, &ListQuery::new(3, 5)).unwrap();
        assert_eq!(page.total, Some(12));
        assert!(!page.has_next);

        let body = json!({ "data": rows(6..=10), "total": 12 });
        let page: PageResponse<Region> = decode_page(body, &ListQuery::new(2, 5)).unwrap();
        assert!(page.has_next);
    }

    #[test]
    fn test_raw_array_uses_full_chunk_heuristic() {
        let full: PageResponse<Region> =
            decode_page(Value::Array(rows(1..=5)), &ListQuery::new(1, 5)).unwrap();
        assert_eq!(full.total, None);
        assert!(full.has_next);

        let partial: PageResponse<Region> =
            decode_page(Value::Array(rows(1..=3)), &ListQuery::new(1, 5)).unwrap();
        assert!(!partial.has_next);
    }

    #[test]
    fn test_snake_case_has_next() {
        let body = json!({ "data": rows(1..=2), "has_next": true });
        let page: PageResponse<Region> = decode_page(body, &ListQuery::new(1, 5)).unwrap();
        assert!(page.has_next);
    }

    #[test]
    fn test_success_false_is_rejection() {
        let body = json!({ "success": false, "message": "Not allowed" });
        let err = decode_page::<Region>(body, &ListQuery::new(1, 5)).unwrap_err();
        assert!(matches!(err, ClientError::Rejected { ref message } if message == "Not allowed"));

        let nested = json!({ "data": { "success": false, "message": "Inner" } });
        let err = decode_page::<Region>(nested, &ListQuery::new(1, 5)).unwrap_err();
        assert_eq!(err.user_message(), "Inner");
    }

    #[test]
    fn test_unrecognized_shape() {
        let err = decode_page::<Region>(json!({ "items": [] }), &ListQuery::new(1, 5)).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_entity_unwrapping() {
        for body in [
            region(7),
            json!({ "data": region(7) }),
            json!({ "success": true, "data": { "data": region(7) } }),
        ] {
            let entity: Region = decode_entity(body).unwrap();
            assert_eq!(entity.id, Some(7));
        }
    }

    #[test]
    fn test_ack_counts() {
        assert_eq!(decode_ack(Value::Null).unwrap(), DeleteAck::default());
        assert_eq!(decode_ack(json!({ "affected": 3 })).unwrap(), DeleteAck::affected(3));
        assert_eq!(
            decode_ack(json!({ "success": true, "data": { "deletedCount": 2 } })).unwrap(),
            DeleteAck::affected(2)
        );
        assert!(decode_ack(json!({ "success": false, "message": "in use" })).is_err());
    }
}
