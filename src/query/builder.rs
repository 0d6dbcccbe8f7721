// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! The fluent query builder.
//!
//! The builder moves through conceptual states, each represented by its
//! own type so that only the valid transitions exist at compile time:
//!
//! ```text
//! QueryBuilder          - fresh; restrict by id or select a field group
//!     │ with_id / with_ids
//!     ▼
//! IdRestrictedQuery     - select a field group, set options, or build
//!     │ where_*                                 (id-only ⇒ FT.MGET)
//!     ▼
//! TermMatcher           - must/must-not/should match against the group
//!     │ must_match / must_not_match / should_match
//!     ▼
//! MatchedQuery          - chain another group, set options, or build
//!     │ options
//!     ▼
//! QueryOptionsBuilder   - more options, then build
//! ```
//!
//! Filters accumulate grouped by field key: re-selecting a group appends
//! to it, and serialization walks groups in first-selection order, not in
//! chronological match order.

use std::marker::PhantomData;

use crate::entity::{KeyValue, SearchEntity};
use crate::error::QueryError;
use crate::query::filter::{Filter, FilterRole, IntoFilterTerms};
use crate::query::term::TermResolvingStrategy;
use crate::schema::SchemaMetadata;

/// Sort direction for `sort_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortingOrder {
    Ascending,
    Descending,
}

/// Result paging. The `(0, 10)` default is never serialized: an explicit
/// `limit(0, 10)` is indistinguishable from not paging at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub offset: u64,
    pub count: u64,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            offset: 0,
            count: 10,
        }
    }
}

/// The option bag accumulated independently of filters.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub verbatim: bool,
    pub disable_stopword_filtering: bool,
    pub with_scores: bool,
    pub with_payloads: bool,
    pub with_score_keys: bool,
    pub term_resolving_strategy: TermResolvingStrategy,
    pub in_order: bool,
    pub language: Option<String>,
    pub slop: Option<i64>,
}

/// Shared state behind every builder stage. Single-writer, single-use;
/// not safe for concurrent mutation.
#[derive(Debug)]
struct QueryState<E> {
    /// Field-group key -> filters, ordered by first selection.
    filters: Vec<(String, Vec<Filter>)>,
    current_key: String,
    /// Fully prefixed document keys when an id restriction is present.
    ids: Option<Vec<String>>,
    sorting: Option<(String, SortingOrder)>,
    paging: Paging,
    options: QueryOptions,
    _entity: PhantomData<fn() -> E>,
}

impl<E: SearchEntity> QueryState<E> {
    fn new() -> Self {
        Self {
            filters: Vec::new(),
            current_key: String::new(),
            ids: None,
            sorting: None,
            paging: Paging::default(),
            options: QueryOptions::default(),
            _entity: PhantomData,
        }
    }

    fn validate_property(name: &str) -> Result<(), QueryError> {
        if E::properties().iter().any(|p| p.name == name) {
            Ok(())
        } else {
            Err(QueryError::UnknownProperty(name.to_string()))
        }
    }

    /// Selecting the same set of properties in a different order produces
    /// a different group key; this order sensitivity is part of the
    /// observable contract.
    fn field_key(names: &[&str]) -> Result<String, QueryError> {
        for name in names {
            Self::validate_property(name)?;
        }
        Ok(names.join("|"))
    }

    fn select_key(&mut self, key: String) {
        if !self.filters.iter().any(|(k, _)| *k == key) {
            self.filters.push((key.clone(), Vec::new()));
        }
        self.current_key = key;
    }

    fn push_filter(&mut self, role: FilterRole, terms: impl IntoFilterTerms) -> Result<(), QueryError> {
        let filter = Filter::new(self.current_key.clone(), role, terms.into_filter_terms())?;
        match self.filters.iter_mut().find(|(k, _)| *k == self.current_key) {
            Some(group) => group.1.push(filter),
            None => self.filters.push((self.current_key.clone(), vec![filter])),
        }
        Ok(())
    }

    fn set_ids(&mut self, values: Vec<KeyValue>) -> Result<(), QueryError> {
        if values.is_empty() {
            return Err(QueryError::EmptyIdSet);
        }
        let schema = SchemaMetadata::of::<E>()?;
        let mut keys = Vec::with_capacity(values.len());
        for value in &values {
            let rendered = schema.primary_key.key_from_value(value)?;
            if rendered.is_empty() {
                return Err(QueryError::EmptyId);
            }
            keys.push(format!("{}{}", schema.document_id_prefix, rendered));
        }
        self.ids = Some(keys);
        Ok(())
    }

    fn set_sorting(&mut self, property: &str, order: SortingOrder) -> Result<(), QueryError> {
        Self::validate_property(property)?;
        self.sorting = Some((property.to_string(), order));
        Ok(())
    }

    fn set_slop(&mut self, slop: i64) -> Result<(), QueryError> {
        if slop < 0 {
            return Err(QueryError::NegativeSlop(slop));
        }
        self.options.slop = Some(slop);
        Ok(())
    }
}

/// Entry point: a fresh query for one search against `E`'s index.
#[derive(Debug)]
pub struct QueryBuilder<E> {
    state: QueryState<E>,
}

impl<E: SearchEntity> Default for QueryBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: SearchEntity> QueryBuilder<E> {
    pub fn new() -> Self {
        Self {
            state: QueryState::new(),
        }
    }

    /// Restricts the query to a single document id.
    ///
    /// When no field filters are added afterwards, the query becomes a
    /// pure retrieve-by-id operation (FT.MGET) instead of a ranked
    /// search.
    pub fn with_id(self, id: impl Into<KeyValue>) -> Result<IdRestrictedQuery<E>, QueryError> {
        let mut state = self.state;
        state.set_ids(vec![id.into()])?;
        Ok(IdRestrictedQuery { state })
    }

    /// Restricts the query to a set of document ids.
    pub fn with_ids<I: Into<KeyValue>>(
        self,
        ids: impl IntoIterator<Item = I>,
    ) -> Result<IdRestrictedQuery<E>, QueryError> {
        let mut state = self.state;
        state.set_ids(ids.into_iter().map(Into::into).collect())?;
        Ok(IdRestrictedQuery { state })
    }

    /// Starts a filter with no field restriction (whole document).
    pub fn where_document(mut self) -> TermMatcher<E> {
        self.state.select_key(String::new());
        TermMatcher { state: self.state }
    }

    /// Starts a filter against one declared property.
    pub fn where_field(self, property: &str) -> Result<TermMatcher<E>, QueryError> {
        self.where_fields(&[property])
    }

    /// Starts a filter against a group of declared properties.
    pub fn where_fields(mut self, properties: &[&str]) -> Result<TermMatcher<E>, QueryError> {
        let key = QueryState::<E>::field_key(properties)?;
        self.state.select_key(key);
        Ok(TermMatcher { state: self.state })
    }
}

/// A query carrying an id restriction and no filters yet.
#[derive(Debug)]
pub struct IdRestrictedQuery<E> {
    state: QueryState<E>,
}

impl<E: SearchEntity> IdRestrictedQuery<E> {
    /// Adds a field filter; the id restriction turns into an INKEYS
    /// clause and the query executes as a ranked search.
    pub fn where_document(mut self) -> TermMatcher<E> {
        self.state.select_key(String::new());
        TermMatcher { state: self.state }
    }

    pub fn where_field(self, property: &str) -> Result<TermMatcher<E>, QueryError> {
        self.where_fields(&[property])
    }

    pub fn where_fields(mut self, properties: &[&str]) -> Result<TermMatcher<E>, QueryError> {
        let key = QueryState::<E>::field_key(properties)?;
        self.state.select_key(key);
        Ok(TermMatcher { state: self.state })
    }

    pub fn use_verbatim(self) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.use_verbatim()
    }

    pub fn without_stopword_filtering(self) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.without_stopword_filtering()
    }

    pub fn with_scores(self) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.with_scores()
    }

    pub fn with_score_keys(self) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.with_score_keys()
    }

    pub fn with_payloads(self) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.with_payloads()
    }

    pub fn in_order(self) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.in_order()
    }

    pub fn use_language(self, language: &str) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.use_language(language)
    }

    pub fn with_term_resolving_strategy(
        self,
        strategy: TermResolvingStrategy,
    ) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.with_term_resolving_strategy(strategy)
    }

    pub fn with_slop(self, slop: i64) -> Result<QueryOptionsBuilder<E>, QueryError> {
        QueryOptionsBuilder { state: self.state }.with_slop(slop)
    }

    pub fn sort_by(
        self,
        property: &str,
        order: SortingOrder,
    ) -> Result<QueryOptionsBuilder<E>, QueryError> {
        QueryOptionsBuilder { state: self.state }.sort_by(property, order)
    }

    pub fn limit(self, offset: u64, count: u64) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.limit(offset, count)
    }

    pub fn build(self) -> SearchQuery<E> {
        SearchQuery { state: self.state }
    }
}

/// A field group has been selected; at least one match must follow.
#[derive(Debug)]
pub struct TermMatcher<E> {
    state: QueryState<E>,
}

impl<E: SearchEntity> TermMatcher<E> {
    /// The filter must match. Accepts a string (default term), explicit
    /// [`Term`](crate::Term)s, numeric ranges or geo radii.
    pub fn must_match(mut self, terms: impl IntoFilterTerms) -> Result<MatchedQuery<E>, QueryError> {
        self.state.push_filter(FilterRole::Must, terms)?;
        Ok(MatchedQuery { state: self.state })
    }

    /// The filter must not match.
    pub fn must_not_match(
        mut self,
        terms: impl IntoFilterTerms,
    ) -> Result<MatchedQuery<E>, QueryError> {
        self.state.push_filter(FilterRole::MustNot, terms)?;
        Ok(MatchedQuery { state: self.state })
    }

    /// The filter should match (optional, boosts score).
    pub fn should_match(
        mut self,
        terms: impl IntoFilterTerms,
    ) -> Result<MatchedQuery<E>, QueryError> {
        self.state.push_filter(FilterRole::Should, terms)?;
        Ok(MatchedQuery { state: self.state })
    }
}

/// At least one filter exists; chain another group, set options or build.
#[derive(Debug)]
pub struct MatchedQuery<E> {
    state: QueryState<E>,
}

impl<E: SearchEntity> MatchedQuery<E> {
    /// Continues matching with no field restriction.
    pub fn and_document(mut self) -> TermMatcher<E> {
        self.state.select_key(String::new());
        TermMatcher { state: self.state }
    }

    /// Continues matching against one declared property.
    pub fn and_field(self, property: &str) -> Result<TermMatcher<E>, QueryError> {
        self.and_fields(&[property])
    }

    /// Continues matching against a group of declared properties.
    pub fn and_fields(mut self, properties: &[&str]) -> Result<TermMatcher<E>, QueryError> {
        let key = QueryState::<E>::field_key(properties)?;
        self.state.select_key(key);
        Ok(TermMatcher { state: self.state })
    }

    pub fn use_verbatim(self) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.use_verbatim()
    }

    pub fn without_stopword_filtering(self) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.without_stopword_filtering()
    }

    pub fn with_scores(self) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.with_scores()
    }

    pub fn with_score_keys(self) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.with_score_keys()
    }

    pub fn with_payloads(self) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.with_payloads()
    }

    pub fn in_order(self) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.in_order()
    }

    pub fn use_language(self, language: &str) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.use_language(language)
    }

    pub fn with_term_resolving_strategy(
        self,
        strategy: TermResolvingStrategy,
    ) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.with_term_resolving_strategy(strategy)
    }

    pub fn with_slop(self, slop: i64) -> Result<QueryOptionsBuilder<E>, QueryError> {
        QueryOptionsBuilder { state: self.state }.with_slop(slop)
    }

    pub fn sort_by(
        self,
        property: &str,
        order: SortingOrder,
    ) -> Result<QueryOptionsBuilder<E>, QueryError> {
        QueryOptionsBuilder { state: self.state }.sort_by(property, order)
    }

    pub fn limit(self, offset: u64, count: u64) -> QueryOptionsBuilder<E> {
        QueryOptionsBuilder { state: self.state }.limit(offset, count)
    }

    pub fn build(self) -> SearchQuery<E> {
        SearchQuery { state: self.state }
    }
}

/// Options-only stage; no further field groups can be added.
#[derive(Debug)]
pub struct QueryOptionsBuilder<E> {
    state: QueryState<E>,
}

impl<E: SearchEntity> QueryOptionsBuilder<E> {
    /// Disables query expansion; terms match as given.
    pub fn use_verbatim(mut self) -> Self {
        self.state.options.verbatim = true;
        self
    }

    pub fn without_stopword_filtering(mut self) -> Self {
        self.state.options.disable_stopword_filtering = true;
        self
    }

    /// Asks the engine to return document scores. The decoder picks the
    /// matching reply layout automatically.
    pub fn with_scores(mut self) -> Self {
        self.state.options.with_scores = true;
        self
    }

    pub fn with_score_keys(mut self) -> Self {
        self.state.options.with_score_keys = true;
        self
    }

    /// Asks the engine to return document payloads.
    pub fn with_payloads(mut self) -> Self {
        self.state.options.with_payloads = true;
        self
    }

    /// Requires query terms to appear in the document in their query
    /// order.
    pub fn in_order(mut self) -> Self {
        self.state.options.in_order = true;
        self
    }

    /// Overrides the schema's default stemmer language for this query.
    pub fn use_language(mut self, language: &str) -> Self {
        self.state.options.language = Some(language.to_string());
        self
    }

    /// Sets how terms without explicit exactness are rendered.
    pub fn with_term_resolving_strategy(mut self, strategy: TermResolvingStrategy) -> Self {
        self.state.options.term_resolving_strategy = strategy;
        self
    }

    /// Allowed intervening terms between matched phrase terms.
    pub fn with_slop(mut self, slop: i64) -> Result<Self, QueryError> {
        self.state.set_slop(slop)?;
        Ok(self)
    }

    /// Sorts results by a sortable declared property.
    pub fn sort_by(mut self, property: &str, order: SortingOrder) -> Result<Self, QueryError> {
        self.state.set_sorting(property, order)?;
        Ok(self)
    }

    /// Pages the result set. `(0, 10)` is the engine default and emits no
    /// LIMIT clause.
    pub fn limit(mut self, offset: u64, count: u64) -> Self {
        self.state.paging = Paging { offset, count };
        self
    }

    pub fn build(self) -> SearchQuery<E> {
        SearchQuery { state: self.state }
    }
}

/// A completed query, consumed once by command construction.
pub struct SearchQuery<E> {
    state: QueryState<E>,
}

impl<E: SearchEntity> SearchQuery<E> {
    /// Whether this query is a pure retrieve-by-id operation.
    ///
    /// True when an id restriction exists and no field group was ever
    /// selected; the command layer then uses the cheaper multi-get form.
    /// Fails on an empty query (neither ids nor filters).
    pub fn is_mget_query(&self) -> Result<bool, QueryError> {
        match (&self.state.ids, self.state.filters.is_empty()) {
            (None, true) => Err(QueryError::EmptyQuery),
            (Some(_), true) => Ok(true),
            _ => Ok(false),
        }
    }

    pub fn options(&self) -> &QueryOptions {
        &self.state.options
    }

    /// FT.MGET argument list: index name followed by the prefixed ids.
    ///
    /// Exposed for callers executing commands themselves; most code goes
    /// through [`SearchCommand`](crate::SearchCommand) instead.
    pub fn mget_args(&self) -> Result<Vec<String>, QueryError> {
        let schema = SchemaMetadata::of::<E>()?;
        let mut args = vec![schema.index_name.clone()];
        if let Some(ids) = &self.state.ids {
            args.extend(ids.iter().cloned());
        }
        Ok(args)
    }

    /// FT.SEARCH argument list, in the order the engine expects.
    ///
    /// Exposed for callers executing commands themselves; most code goes
    /// through [`SearchCommand`](crate::SearchCommand) instead.
    pub fn search_args(&self) -> Result<Vec<String>, QueryError> {
        let schema = SchemaMetadata::of::<E>()?;
        let options = &self.state.options;

        let mut args = vec![schema.index_name.clone(), self.query_string()];

        if options.verbatim {
            args.push("VERBATIM".to_string());
        }
        if options.disable_stopword_filtering {
            args.push("NOSTOPWORDS".to_string());
        }
        if options.with_scores {
            args.push("WITHSCORES".to_string());
        }
        if options.with_payloads {
            args.push("WITHPAYLOADS".to_string());
        }
        if options.with_score_keys {
            args.push("WITHSCOREKEYS".to_string());
        }

        if let Some(ids) = &self.state.ids {
            args.push("INKEYS".to_string());
            args.push(ids.len().to_string());
            args.extend(ids.iter().cloned());
        }

        if let Some(slop) = options.slop {
            args.push("SLOP".to_string());
            args.push(slop.to_string());
        }

        if options.in_order {
            args.push("INORDER".to_string());
        }

        args.push("LANGUAGE".to_string());
        args.push(
            options
                .language
                .clone()
                .unwrap_or_else(|| schema.language.clone()),
        );

        if let Some((property, order)) = &self.state.sorting {
            args.push("SORTBY".to_string());
            args.push(property.clone());
            args.push(
                match order {
                    SortingOrder::Ascending => "ASC",
                    SortingOrder::Descending => "DESC",
                }
                .to_string(),
            );
        }

        if self.state.paging != Paging::default() {
            args.push("LIMIT".to_string());
            args.push(self.state.paging.offset.to_string());
            args.push(self.state.paging.count.to_string());
        }

        Ok(args)
    }

    fn query_string(&self) -> String {
        let mut out = String::new();
        for (_, group) in &self.state.filters {
            for filter in group {
                filter.serialize_into(&mut out, self.state.options.term_resolving_strategy);
            }
        }
        out
    }
}
