// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Decoding engine replies back into entities.
//!
//! A search reply is a flat array: the total count, then repeating groups
//! of `{document-id, [score], [payload], field-value-array}`. The group
//! stride and within-group offsets are derived purely from the
//! with-scores / with-payloads flags and must exactly invert what the
//! query requested; `SearchCommand` threads the recorded flags through so
//! the two cannot drift apart.
//!
//! A multi-get reply is a flat array of nullable field-value arrays with
//! no count prefix and no score/payload slots; null entries (documents
//! that no longer exist) are skipped, never surfaced as empty results.

use std::collections::HashMap;

use redis::Value;

use crate::entity::SearchEntity;
use crate::error::DecodeError;

/// One decoded search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<E> {
    pub entity: E,
    /// Present only when the query asked for scores.
    pub score: Option<f64>,
    /// Present only when the query asked for payloads and the document
    /// carries one.
    pub payload: Option<Vec<u8>>,
}

/// The decoded result set of one search or multi-get.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults<E> {
    /// Total number of matches reported by the engine (for multi-get,
    /// the number of documents that still exist).
    pub total: u64,
    pub hits: Vec<SearchHit<E>>,
}

impl<E: SearchEntity> SearchResults<E> {
    /// Decodes an FT.SEARCH reply.
    ///
    /// `with_scores` / `with_payloads` must be the values recorded on the
    /// executed query; a mismatch silently misaligns the stride and is a
    /// programming error, not a checked condition.
    pub fn from_search_reply(
        reply: &Value,
        with_scores: bool,
        with_payloads: bool,
    ) -> Result<Self, DecodeError> {
        let items = as_items(reply)?;
        let total = match items.first() {
            Some(count) => as_u64(count)?,
            None => {
                return Err(DecodeError::UnexpectedShape(
                    "search reply is missing the result count".to_string(),
                ))
            }
        };

        let mut step = 2;
        let mut score_offset = 0;
        let mut content_offset = 1;
        let mut payload_offset = 0;
        if with_scores {
            step += 1;
            score_offset = 1;
            content_offset += 1;
        }
        if with_payloads {
            payload_offset = score_offset + 1;
            step += 1;
            content_offset += 1;
        }

        let mut hits = Vec::new();
        let mut i = 1;
        while i < items.len() {
            if i + content_offset >= items.len() {
                return Err(DecodeError::UnexpectedShape(format!(
                    "truncated result group at offset {i}"
                )));
            }

            let score = if with_scores {
                Some(as_f64(&items[i + score_offset])?)
            } else {
                None
            };
            let payload = if with_payloads {
                as_payload(&items[i + payload_offset])
            } else {
                None
            };

            let fields = field_map(&items[i + content_offset])?;
            hits.push(SearchHit {
                entity: E::from_search_fields(&fields)?,
                score,
                payload,
            });

            i += step;
        }

        Ok(Self { total, hits })
    }

    /// Decodes an FT.MGET reply.
    pub fn from_mget_reply(reply: &Value) -> Result<Self, DecodeError> {
        let items = as_items(reply)?;

        let mut hits = Vec::new();
        for item in items {
            if matches!(item, Value::Nil) {
                continue;
            }
            let fields = field_map(item)?;
            hits.push(SearchHit {
                entity: E::from_search_fields(&fields)?,
                score: None,
                payload: None,
            });
        }

        Ok(Self {
            total: hits.len() as u64,
            hits,
        })
    }

    /// Consumes the results, yielding the entities in response order.
    pub fn into_entities(self) -> impl Iterator<Item = E> {
        self.hits.into_iter().map(|hit| hit.entity)
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }
}

impl<E> IntoIterator for SearchResults<E> {
    type Item = SearchHit<E>;
    type IntoIter = std::vec::IntoIter<SearchHit<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter()
    }
}

fn field_map(value: &Value) -> Result<HashMap<String, String>, DecodeError> {
    let pairs = as_items(value)?;
    let mut fields = HashMap::with_capacity(pairs.len() / 2);
    for chunk in pairs.chunks(2) {
        if let [name, field_value] = chunk {
            fields.insert(as_string(name)?, as_string(field_value)?);
        }
    }
    Ok(fields)
}

fn as_items(value: &Value) -> Result<&[Value], DecodeError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(DecodeError::UnexpectedShape(format!(
            "expected an array reply, got {other:?}"
        ))),
    }
}

fn as_string(value: &Value) -> Result<String, DecodeError> {
    match value {
        Value::BulkString(bytes) => String::from_utf8(bytes.clone()).map_err(|e| {
            DecodeError::UnexpectedShape(format!("non-utf8 bulk string: {e}"))
        }),
        Value::SimpleString(s) => Ok(s.clone()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Double(d) => Ok(d.to_string()),
        Value::Nil => Ok(String::new()),
        other => Err(DecodeError::UnexpectedShape(format!(
            "expected a string reply, got {other:?}"
        ))),
    }
}

fn as_f64(value: &Value) -> Result<f64, DecodeError> {
    match value {
        Value::Double(d) => Ok(*d),
        Value::Int(i) => Ok(*i as f64),
        Value::BulkString(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                DecodeError::UnexpectedShape("score is not a valid number".to_string())
            }),
        other => Err(DecodeError::UnexpectedShape(format!(
            "expected a numeric reply, got {other:?}"
        ))),
    }
}

fn as_u64(value: &Value) -> Result<u64, DecodeError> {
    match value {
        Value::Int(i) if *i >= 0 => Ok(*i as u64),
        other => Err(DecodeError::UnexpectedShape(format!(
            "expected a non-negative count, got {other:?}"
        ))),
    }
}

fn as_payload(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::BulkString(bytes) if !bytes.is_empty() => Some(bytes.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{parse_field, PropertyDescriptor, ValueKind};

    #[derive(Debug, PartialEq)]
    struct Person {
        id: i32,
        name: String,
    }

    impl SearchEntity for Person {
        fn entity_name() -> &'static str {
            "Person"
        }

        fn properties() -> &'static [PropertyDescriptor] {
            &[
                PropertyDescriptor::new("Id", ValueKind::Integer),
                PropertyDescriptor::new("Name", ValueKind::Text),
            ]
        }

        fn to_search_fields(&self) -> Vec<(&'static str, String)> {
            vec![("Id", self.id.to_string()), ("Name", self.name.clone())]
        }

        fn from_search_fields(fields: &HashMap<String, String>) -> Result<Self, DecodeError> {
            Ok(Person {
                id: parse_field(fields, "Id")?,
                name: parse_field(fields, "Name")?,
            })
        }
    }

    fn bulk(s: &str) -> Value {
        Value::BulkString(s.as_bytes().to_vec())
    }

    fn person_fields(id: i32, name: &str) -> Value {
        Value::Array(vec![
            bulk("Id"),
            bulk(&id.to_string()),
            bulk("Name"),
            bulk(name),
        ])
    }

    #[test]
    fn test_decode_without_flags() {
        let reply = Value::Array(vec![
            Value::Int(2),
            bulk("people:1"),
            person_fields(1, "Ann"),
            bulk("people:2"),
            person_fields(2, "Ben"),
        ]);

        let results = SearchResults::<Person>::from_search_reply(&reply, false, false).unwrap();
        assert_eq!(results.total, 2);
        assert_eq!(results.hits.len(), 2);
        assert_eq!(results.hits[0].entity.name, "Ann");
        assert_eq!(results.hits[1].entity.name, "Ben");
        assert_eq!(results.hits[0].score, None);
        assert_eq!(results.hits[0].payload, None);
    }

    #[test]
    fn test_decode_with_scores() {
        let reply = Value::Array(vec![
            Value::Int(2),
            bulk("people:1"),
            bulk("0.75"),
            person_fields(1, "Ann"),
            bulk("people:2"),
            bulk("0.25"),
            person_fields(2, "Ben"),
        ]);

        let results = SearchResults::<Person>::from_search_reply(&reply, true, false).unwrap();
        assert_eq!(results.hits[0].score, Some(0.75));
        assert_eq!(results.hits[1].score, Some(0.25));
        assert_eq!(results.hits[0].payload, None);
        assert_eq!(results.hits[0].entity.name, "Ann");
        assert_eq!(results.hits[1].entity.name, "Ben");
    }

    #[test]
    fn test_decode_with_scores_and_payloads() {
        let reply = Value::Array(vec![
            Value::Int(1),
            bulk("people:1"),
            bulk("0.5"),
            bulk("meta"),
            person_fields(1, "Ann"),
        ]);

        let results = SearchResults::<Person>::from_search_reply(&reply, true, true).unwrap();
        assert_eq!(results.hits[0].score, Some(0.5));
        assert_eq!(results.hits[0].payload, Some(b"meta".to_vec()));
    }

    #[test]
    fn test_decode_with_payloads_only() {
        let reply = Value::Array(vec![
            Value::Int(1),
            bulk("people:1"),
            Value::Nil,
            person_fields(1, "Ann"),
        ]);

        let results = SearchResults::<Person>::from_search_reply(&reply, false, true).unwrap();
        assert_eq!(results.hits[0].score, None);
        assert_eq!(results.hits[0].payload, None);
        assert_eq!(results.hits[0].entity.id, 1);
    }

    #[test]
    fn test_decode_rejects_truncated_group() {
        let reply = Value::Array(vec![Value::Int(1), bulk("people:1")]);
        let err = SearchResults::<Person>::from_search_reply(&reply, false, false).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedShape(_)));
    }

    #[test]
    fn test_decode_rejects_non_array() {
        let err =
            SearchResults::<Person>::from_search_reply(&Value::Int(1), false, false).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedShape(_)));
    }

    #[test]
    fn test_mget_skips_missing_documents() {
        let reply = Value::Array(vec![
            person_fields(1, "Ann"),
            Value::Nil,
            person_fields(3, "Cid"),
        ]);

        let results = SearchResults::<Person>::from_mget_reply(&reply).unwrap();
        assert_eq!(results.total, 2);
        assert_eq!(results.hits.len(), 2);
        assert_eq!(results.hits[0].entity.id, 1);
        assert_eq!(results.hits[1].entity.id, 3);
        assert!(results.hits.iter().all(|h| h.score.is_none()));
    }

    #[test]
    fn test_mget_all_missing_yields_empty() {
        let reply = Value::Array(vec![Value::Nil, Value::Nil]);
        let results = SearchResults::<Person>::from_mget_reply(&reply).unwrap();
        assert!(results.is_empty());
        assert_eq!(results.total, 0);
    }

    #[test]
    fn test_into_entities_preserves_order() {
        let reply = Value::Array(vec![
            Value::Int(2),
            bulk("people:2"),
            person_fields(2, "Ben"),
            bulk("people:1"),
            person_fields(1, "Ann"),
        ]);

        let results = SearchResults::<Person>::from_search_reply(&reply, false, false).unwrap();
        let names: Vec<String> = results.into_entities().map(|p| p.name).collect();
        assert_eq!(names, vec!["Ben", "Ann"]);
    }

    #[test]
    fn test_missing_entity_field_surfaces_decode_error() {
        let reply = Value::Array(vec![
            Value::Int(1),
            bulk("people:1"),
            Value::Array(vec![bulk("Id"), bulk("1")]),
        ]);

        let err = SearchResults::<Person>::from_search_reply(&reply, false, false).unwrap_err();
        assert_eq!(err, DecodeError::MissingField("Name".to_string()));
    }
}
