// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! The async client: executes the constructed commands against Redis.
//!
//! Execution goes through the [`CommandExecutor`] seam so the command /
//! decode pipeline can be driven against any transport (or a test
//! double). The production executor is `redis::aio::ConnectionManager`.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Value;
use tracing::{debug, info};

use crate::commands::{AddCommand, CreateIndexCommand, DeleteCommand, SearchCommand};
use crate::entity::SearchEntity;
use crate::error::SearchError;
use crate::query::{SearchQuery, SearchResults};

/// Executes one engine command and returns the raw reply.
#[async_trait]
pub trait CommandExecutor: Send {
    async fn execute(&mut self, command: &str, args: &[String]) -> Result<Value, SearchError>;
}

#[async_trait]
impl CommandExecutor for ConnectionManager {
    async fn execute(&mut self, command: &str, args: &[String]) -> Result<Value, SearchError> {
        let mut cmd = redis::cmd(command);
        for arg in args {
            cmd.arg(arg);
        }
        let reply: Value = cmd.query_async(self).await.map_err(|e| {
            if e.kind() == redis::ErrorKind::ResponseError {
                SearchError::Server(e.to_string())
            } else {
                SearchError::Backend(e.to_string())
            }
        })?;
        Ok(reply)
    }
}

/// A RediSearch client over any [`CommandExecutor`].
///
/// Commands that the engine answers with a status reply come back as
/// booleans: an error reply (index already exists, unknown index, ...)
/// yields `Ok(false)` rather than an `Err`, matching the fire-and-check
/// usage these commands get in practice. Transport failures are still
/// errors.
pub struct SearchClient<C = ConnectionManager> {
    executor: C,
}

impl SearchClient<ConnectionManager> {
    /// Connects to Redis and wraps the connection in an auto-reconnecting
    /// manager.
    pub async fn connect(url: &str) -> Result<Self, SearchError> {
        let client = redis::Client::open(url).map_err(|e| SearchError::Backend(e.to_string()))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| SearchError::Backend(e.to_string()))?;
        info!("RediSearch client connected");
        Ok(Self { executor: manager })
    }
}

impl<C: CommandExecutor> SearchClient<C> {
    /// Wraps an existing executor.
    pub fn with_executor(executor: C) -> Self {
        Self { executor }
    }

    /// Creates the index for `E` from its schema metadata.
    ///
    /// Returns `Ok(false)` when the engine rejects the command, e.g.
    /// because the index already exists.
    pub async fn create_index<E: SearchEntity>(&mut self) -> Result<bool, SearchError> {
        let command = CreateIndexCommand::for_entity::<E>()?;
        match self
            .executor
            .execute(command.command(), command.args())
            .await
        {
            Ok(reply) => Ok(is_ok(&reply)),
            Err(SearchError::Server(message)) => {
                debug!(%message, "FT.CREATE rejected");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Adds (or replaces) one document.
    ///
    /// Returns `Ok(false)` when the engine rejects the command, e.g. on a
    /// duplicate id without replace semantics.
    pub async fn add_document<E: SearchEntity>(
        &mut self,
        entity: &E,
        score: f64,
        language: Option<&str>,
    ) -> Result<bool, SearchError> {
        let command = AddCommand::for_entity(entity, score, language)?;
        match self
            .executor
            .execute(command.command(), command.args())
            .await
        {
            Ok(reply) => Ok(is_ok(&reply)),
            Err(SearchError::Server(message)) => {
                debug!(%message, "FT.ADD rejected");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Removes one document from the index. True when a document was
    /// actually deleted.
    pub async fn delete_document<E: SearchEntity>(&mut self, entity: &E) -> Result<bool, SearchError> {
        let command = DeleteCommand::for_entity(entity)?;
        let reply = self
            .executor
            .execute(command.command(), command.args())
            .await?;
        Ok(matches!(reply, Value::Int(1)))
    }

    /// Executes a built query, routing to FT.SEARCH or FT.MGET, and
    /// decodes the reply with the flags recorded on the query.
    pub async fn search<E: SearchEntity>(
        &mut self,
        query: &SearchQuery<E>,
    ) -> Result<SearchResults<E>, SearchError> {
        let command = SearchCommand::from_query(query)?;
        let reply = self
            .executor
            .execute(command.command(), command.args())
            .await?;
        Ok(command.decode(&reply)?)
    }
}

fn is_ok(reply: &Value) -> bool {
    match reply {
        Value::Okay => true,
        Value::SimpleString(s) => s == "OK",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{parse_field, PropertyDescriptor, ValueKind};
    use crate::error::DecodeError;
    use crate::query::QueryBuilder;
    use std::collections::HashMap;

    struct Album {
        id: i32,
        title: String,
    }

    impl SearchEntity for Album {
        fn entity_name() -> &'static str {
            "Album"
        }

        fn properties() -> &'static [PropertyDescriptor] {
            &[
                PropertyDescriptor::new("Id", ValueKind::Integer),
                PropertyDescriptor::new("Title", ValueKind::Text),
            ]
        }

        fn to_search_fields(&self) -> Vec<(&'static str, String)> {
            vec![("Id", self.id.to_string()), ("Title", self.title.clone())]
        }

        fn from_search_fields(fields: &HashMap<String, String>) -> Result<Self, DecodeError> {
            Ok(Album {
                id: parse_field(fields, "Id")?,
                title: parse_field(fields, "Title")?,
            })
        }
    }

    /// Records executed commands and plays back canned replies.
    struct MockExecutor {
        executed: Vec<(String, Vec<String>)>,
        replies: Vec<Result<Value, SearchError>>,
    }

    impl MockExecutor {
        fn replying(replies: Vec<Result<Value, SearchError>>) -> Self {
            Self {
                executed: Vec::new(),
                replies,
            }
        }
    }

    #[async_trait]
    impl CommandExecutor for MockExecutor {
        async fn execute(&mut self, command: &str, args: &[String]) -> Result<Value, SearchError> {
            self.executed.push((command.to_string(), args.to_vec()));
            self.replies.remove(0)
        }
    }

    fn bulk(s: &str) -> Value {
        Value::BulkString(s.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn test_create_index_ok() {
        let executor = MockExecutor::replying(vec![Ok(Value::Okay)]);
        let mut client = SearchClient::with_executor(executor);
        assert!(client.create_index::<Album>().await.unwrap());
        assert_eq!(client.executor.executed[0].0, "FT.CREATE");
        assert_eq!(client.executor.executed[0].1[0], "albums-index");
    }

    #[tokio::test]
    async fn test_create_index_server_error_is_false() {
        let executor = MockExecutor::replying(vec![Err(SearchError::Server(
            "Index already exists".to_string(),
        ))]);
        let mut client = SearchClient::with_executor(executor);
        assert!(!client.create_index::<Album>().await.unwrap());
    }

    #[tokio::test]
    async fn test_create_index_backend_error_propagates() {
        let executor =
            MockExecutor::replying(vec![Err(SearchError::Backend("connection reset".into()))]);
        let mut client = SearchClient::with_executor(executor);
        assert!(matches!(
            client.create_index::<Album>().await,
            Err(SearchError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn test_add_document_round_trip() {
        let executor = MockExecutor::replying(vec![Ok(Value::Okay)]);
        let mut client = SearchClient::with_executor(executor);
        let album = Album {
            id: 5,
            title: "Blue".to_string(),
        };
        assert!(client.add_document(&album, 1.0, None).await.unwrap());

        let (command, args) = &client.executor.executed[0];
        assert_eq!(command, "FT.ADD");
        assert_eq!(args[0], "albums-index");
        assert_eq!(args[1], "albums:5");
    }

    #[tokio::test]
    async fn test_delete_document_true_on_one() {
        let executor = MockExecutor::replying(vec![Ok(Value::Int(1))]);
        let mut client = SearchClient::with_executor(executor);
        let album = Album {
            id: 5,
            title: "Blue".to_string(),
        };
        assert!(client.delete_document(&album).await.unwrap());

        let executor = MockExecutor::replying(vec![Ok(Value::Int(0))]);
        let mut client = SearchClient::with_executor(executor);
        assert!(!client.delete_document(&album).await.unwrap());
    }

    #[tokio::test]
    async fn test_search_decodes_with_recorded_flags() {
        let reply = Value::Array(vec![
            Value::Int(1),
            bulk("albums:5"),
            bulk("0.8"),
            Value::Array(vec![bulk("Id"), bulk("5"), bulk("Title"), bulk("Blue")]),
        ]);
        let executor = MockExecutor::replying(vec![Ok(reply)]);
        let mut client = SearchClient::with_executor(executor);

        let query = QueryBuilder::<Album>::new()
            .where_field("Title")
            .unwrap()
            .must_match("blue")
            .unwrap()
            .with_scores()
            .build();
        let results = client.search(&query).await.unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.hits[0].score, Some(0.8));
        assert_eq!(results.hits[0].entity.title, "Blue");

        let (command, _) = &client.executor.executed[0];
        assert_eq!(command, "FT.SEARCH");
    }

    #[tokio::test]
    async fn test_search_routes_id_only_to_mget() {
        let reply = Value::Array(vec![Value::Array(vec![
            bulk("Id"),
            bulk("5"),
            bulk("Title"),
            bulk("Blue"),
        ])]);
        let executor = MockExecutor::replying(vec![Ok(reply)]);
        let mut client = SearchClient::with_executor(executor);

        let query = QueryBuilder::<Album>::new().with_id(5).unwrap().build();
        let results = client.search(&query).await.unwrap();
        assert_eq!(results.hits.len(), 1);

        let (command, args) = &client.executor.executed[0];
        assert_eq!(command, "FT.MGET");
        assert_eq!(args, &vec!["albums-index".to_string(), "albums:5".to_string()]);
    }
}
