//! # redisearch-om
//!
//! An object mapper for RediSearch: declare plain Rust structs, derive a
//! search schema from their properties by convention, and build search
//! queries with a fluent, typestate builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Entity Declaration                      │
//! │  • SearchEntity trait: property table + field marshalling   │
//! │  • configure_schema() hook for per-type overrides           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                    (first access per type)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Schema Metadata                        │
//! │  • Conventions: index name, id prefix, language, key        │
//! │  • Per-property field types + validation                    │
//! │  • Cached per TypeId, built exactly once                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Query / Command Building                   │
//! │  • Typestate builder: where → match → options → build       │
//! │  • Filters serialized to the engine query grammar           │
//! │  • FT.CREATE / FT.ADD / FT.DEL / FT.SEARCH / FT.MGET args   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Execution + Decoding                     │
//! │  • SearchClient over redis ConnectionManager                │
//! │  • Reply decoded with the flags recorded at build time      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use redisearch_om::{
//!     DecodeError, NumericTerm, PropertyDescriptor, QueryBuilder, SchemaBuilder,
//!     SchemaError, SearchClient, SearchEntity, SortingOrder, ValueKind,
//! };
//!
//! struct Car {
//!     id: i32,
//!     make: String,
//!     price: f64,
//! }
//!
//! impl SearchEntity for Car {
//!     fn entity_name() -> &'static str {
//!         "Car"
//!     }
//!
//!     fn properties() -> &'static [PropertyDescriptor] {
//!         &[
//!             PropertyDescriptor::new("Id", ValueKind::Integer),
//!             PropertyDescriptor::new("Make", ValueKind::Text),
//!             PropertyDescriptor::new("Price", ValueKind::Float),
//!         ]
//!     }
//!
//!     fn configure_schema(builder: &mut SchemaBuilder) -> Result<(), SchemaError> {
//!         builder.property("Price")?.sortable();
//!         Ok(())
//!     }
//!
//!     fn to_search_fields(&self) -> Vec<(&'static str, String)> {
//!         vec![
//!             ("Id", self.id.to_string()),
//!             ("Make", self.make.clone()),
//!             ("Price", self.price.to_string()),
//!         ]
//!     }
//!
//!     fn from_search_fields(fields: &HashMap<String, String>) -> Result<Self, DecodeError> {
//!         Ok(Car {
//!             id: redisearch_om::parse_field(fields, "Id")?,
//!             make: redisearch_om::parse_field(fields, "Make")?,
//!             price: redisearch_om::parse_field(fields, "Price")?,
//!         })
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = SearchClient::connect("redis://127.0.0.1:6379").await?;
//!
//!     client.create_index::<Car>().await?;
//!     client
//!         .add_document(
//!             &Car { id: 1, make: "kia".into(), price: 14000.0 },
//!             1.0,
//!             None,
//!         )
//!         .await?;
//!
//!     // (@Make:"kia") (@Price:[10000 20000])
//!     let query = QueryBuilder::<Car>::new()
//!         .where_field("Make")?
//!         .must_match("kia")?
//!         .and_field("Price")?
//!         .must_match(NumericTerm::between(10_000.0, 20_000.0))?
//!         .sort_by("Price", SortingOrder::Ascending)?
//!         .build();
//!
//!     for hit in client.search(&query).await? {
//!         println!("{} - {}", hit.entity.make, hit.entity.price);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Retrieval by id
//!
//! A query restricted solely by document ids bypasses ranked search and
//! executes as a cheaper multi-get:
//!
//! ```rust,ignore
//! let query = QueryBuilder::<Car>::new().with_ids([1, 2, 3])?.build();
//! let cars = client.search(&query).await?; // FT.MGET under the hood
//! ```

pub mod client;
pub mod commands;
pub mod entity;
pub mod error;
pub mod languages;
pub mod query;
pub mod schema;

pub use client::{CommandExecutor, SearchClient};
pub use commands::{AddCommand, CreateIndexCommand, DeleteCommand, SearchCommand};
pub use entity::{parse_field, GeoPosition, KeyValue, PropertyDescriptor, SearchEntity, ValueKind};
pub use error::{DecodeError, QueryError, SchemaError, SearchError};
pub use query::{
    Filter, FilterRole, FilterTerms, GeoTerm, GeoUnit, IdRestrictedQuery, IntoFilterTerms,
    MatchedQuery, NumericTerm, Paging, QueryBuilder, QueryOptions, QueryOptionsBuilder,
    SearchHit, SearchQuery, SearchResults, SortingOrder, Term, TermMatcher,
    TermResolvingStrategy,
};
pub use schema::{
    Conventions, DefaultConventions, PrimaryKey, PropertyBuilder, PropertyMetadata, SchemaBuilder,
    SchemaMetadata, SearchFieldType,
};
