// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! FT.SEARCH / FT.MGET routing and reply decoding.
//!
//! A query restricted solely by document ids executes as FT.MGET, which
//! skips ranking entirely; anything with a field filter executes as
//! FT.SEARCH. The command records the with-scores / with-payloads flags
//! at construction and owns the decode, so the reply layout always
//! matches what was requested.

use std::marker::PhantomData;

use redis::Value;
use tracing::debug;

use crate::entity::SearchEntity;
use crate::error::{DecodeError, QueryError};
use crate::query::{SearchQuery, SearchResults};

/// A routed, ready-to-execute retrieval command.
pub struct SearchCommand<E> {
    command: &'static str,
    args: Vec<String>,
    with_scores: bool,
    with_payloads: bool,
    is_mget: bool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: SearchEntity> SearchCommand<E> {
    /// Routes the query to its wire command. Fails on an empty query.
    pub fn from_query(query: &SearchQuery<E>) -> Result<Self, QueryError> {
        if query.is_mget_query()? {
            let args = query.mget_args()?;
            debug!(index = %args[0], keys = args.len() - 1, "FT.MGET");
            Ok(Self {
                command: "FT.MGET",
                args,
                with_scores: false,
                with_payloads: false,
                is_mget: true,
                _entity: PhantomData,
            })
        } else {
            let args = query.search_args()?;
            debug!(index = %args[0], query = %args[1], "FT.SEARCH");
            Ok(Self {
                command: "FT.SEARCH",
                args,
                with_scores: query.options().with_scores,
                with_payloads: query.options().with_payloads,
                is_mget: false,
                _entity: PhantomData,
            })
        }
    }

    pub fn command(&self) -> &'static str {
        self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn is_mget(&self) -> bool {
        self.is_mget
    }

    /// Decodes the reply of executing this command, using the flags
    /// recorded at construction.
    pub fn decode(&self, reply: &Value) -> Result<SearchResults<E>, DecodeError> {
        if self.is_mget {
            SearchResults::from_mget_reply(reply)
        } else {
            SearchResults::from_search_reply(reply, self.with_scores, self.with_payloads)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{parse_field, PropertyDescriptor, ValueKind};
    use crate::query::QueryBuilder;
    use std::collections::HashMap;

    struct City {
        id: i32,
        name: String,
    }

    impl SearchEntity for City {
        fn entity_name() -> &'static str {
            "City"
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
            Ok(City {
                id: parse_field(fields, "Id")?,
                name: parse_field(fields, "Name")?,
            })
        }
    }

    fn bulk(s: &str) -> Value {
        Value::BulkString(s.as_bytes().to_vec())
    }

    #[test]
    fn test_id_only_query_routes_to_mget() {
        let query = QueryBuilder::<City>::new()
            .with_ids([1, 2])
            .unwrap()
            .build();
        let command = SearchCommand::from_query(&query).unwrap();
        assert_eq!(command.command(), "FT.MGET");
        assert!(command.is_mget());
        assert_eq!(command.args(), &["citys-index", "citys:1", "citys:2"]);
    }

    #[test]
    fn test_filtered_query_routes_to_search() {
        let query = QueryBuilder::<City>::new()
            .where_field("Name")
            .unwrap()
            .must_match("szeged")
            .unwrap()
            .build();
        let command = SearchCommand::from_query(&query).unwrap();
        assert_eq!(command.command(), "FT.SEARCH");
        assert!(!command.is_mget());
    }

    #[test]
    fn test_decode_uses_recorded_flags() {
        let query = QueryBuilder::<City>::new()
            .where_field("Name")
            .unwrap()
            .must_match("szeged")
            .unwrap()
            .with_scores()
            .build();
        let command = SearchCommand::from_query(&query).unwrap();
        assert!(command.args().contains(&"WITHSCORES".to_string()));

        let reply = Value::Array(vec![
            Value::Int(1),
            bulk("citys:1"),
            bulk("0.9"),
            Value::Array(vec![bulk("Id"), bulk("1"), bulk("Name"), bulk("Szeged")]),
        ]);
        let results = command.decode(&reply).unwrap();
        assert_eq!(results.hits[0].score, Some(0.9));
        assert_eq!(results.hits[0].entity.name, "Szeged");
    }

    #[test]
    fn test_mget_decode_skips_nil() {
        let query = QueryBuilder::<City>::new()
            .with_ids([1, 2])
            .unwrap()
            .build();
        let command = SearchCommand::from_query(&query).unwrap();

        let reply = Value::Array(vec![
            Value::Nil,
            Value::Array(vec![bulk("Id"), bulk("2"), bulk("Name"), bulk("Makó")]),
        ]);
        let results = command.decode(&reply).unwrap();
        assert_eq!(results.hits.len(), 1);
        assert_eq!(results.hits[0].entity.id, 2);
    }
}
