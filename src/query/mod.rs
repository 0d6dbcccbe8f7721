// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query Building
//!
//! A fluent, typestate builder that accumulates role-qualified filters
//! grouped by field, serializes them into the engine's query-string
//! grammar, and emits the full FT.SEARCH / FT.MGET argument list.
//!
//! # Query grammar produced
//!
//! ```text
//! (@Make:"kia")                  - must match, exact text
//! (-@Price:[10000 20000])        - must-not match, numeric range
//! (~@Location:[19.03 47.49 5 km]) - should match, geo radius
//! (@Price:[(10000 inf])          - exclusive bound / open range
//! (@Make:kia|opel)               - term alternation within one filter
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let query = QueryBuilder::<Car>::new()
//!     .where_field("Make")?
//!     .must_match("kia")?
//!     .and_field("Price")?
//!     .must_match(NumericTerm::between(1_000_000.0, 4_000_000.0))?
//!     .sort_by("Price", SortingOrder::Ascending)?
//!     .limit(0, 20)
//!     .build();
//! ```

mod builder;
mod filter;
mod results;
mod term;

pub use builder::{
    IdRestrictedQuery, MatchedQuery, Paging, QueryBuilder, QueryOptions, QueryOptionsBuilder,
    SearchQuery, SortingOrder, TermMatcher,
};
pub use filter::{Filter, FilterRole, FilterTerms, IntoFilterTerms};
pub use results::{SearchHit, SearchResults};
pub use term::{GeoTerm, GeoUnit, NumericTerm, Term, TermResolvingStrategy};
