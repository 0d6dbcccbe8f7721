// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Role-qualified filters and their query-string serialization.
//!
//! A filter binds one field-group key, a boolean role and one or more
//! terms of a single kind. Serialized forms are always wrapped in
//! parentheses and followed by a space:
//!
//! ```text
//! (@Make:"kia")                    - Must, text
//! (-@Price:[10000 20000])         - MustNot, numeric
//! (~@Location:[19.03 47.49 5 km]) - Should, geo
//! ```

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::query::term::{GeoTerm, NumericTerm, Term, TermResolvingStrategy};

/// The boolean role of a filter within the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterRole {
    Must,
    MustNot,
    Should,
}

impl FilterRole {
    fn prefix(self) -> &'static str {
        match self {
            FilterRole::Must => "",
            FilterRole::MustNot => "-",
            FilterRole::Should => "~",
        }
    }
}

/// One or more terms of a single kind, ready to form a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterTerms {
    Text(Vec<Term>),
    Numeric(Vec<NumericTerm>),
    Geo(Vec<GeoTerm>),
}

/// Conversion into [`FilterTerms`], accepted by the match methods.
///
/// Plain strings become default-resolved text terms (exactness follows
/// the query's strategy); explicitly constructed terms keep their own.
pub trait IntoFilterTerms {
    fn into_filter_terms(self) -> FilterTerms;
}

impl IntoFilterTerms for &str {
    fn into_filter_terms(self) -> FilterTerms {
        FilterTerms::Text(vec![Term::from(self)])
    }
}

impl IntoFilterTerms for String {
    fn into_filter_terms(self) -> FilterTerms {
        FilterTerms::Text(vec![Term::from(self)])
    }
}

impl IntoFilterTerms for &[&str] {
    fn into_filter_terms(self) -> FilterTerms {
        FilterTerms::Text(self.iter().map(|s| Term::from(*s)).collect())
    }
}

impl<const N: usize> IntoFilterTerms for [&str; N] {
    fn into_filter_terms(self) -> FilterTerms {
        FilterTerms::Text(self.iter().map(|s| Term::from(*s)).collect())
    }
}

impl IntoFilterTerms for Term {
    fn into_filter_terms(self) -> FilterTerms {
        FilterTerms::Text(vec![self])
    }
}

impl IntoFilterTerms for Vec<Term> {
    fn into_filter_terms(self) -> FilterTerms {
        FilterTerms::Text(self)
    }
}

impl IntoFilterTerms for NumericTerm {
    fn into_filter_terms(self) -> FilterTerms {
        FilterTerms::Numeric(vec![self])
    }
}

impl IntoFilterTerms for Vec<NumericTerm> {
    fn into_filter_terms(self) -> FilterTerms {
        FilterTerms::Numeric(self)
    }
}

impl IntoFilterTerms for GeoTerm {
    fn into_filter_terms(self) -> FilterTerms {
        FilterTerms::Geo(vec![self])
    }
}

impl IntoFilterTerms for Vec<GeoTerm> {
    fn into_filter_terms(self) -> FilterTerms {
        FilterTerms::Geo(self)
    }
}

/// A role-qualified group of same-kind terms applied to one field group.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    field_key: String,
    role: FilterRole,
    terms: FilterTerms,
}

impl Filter {
    /// Numeric and geo filters always require an explicit field; text
    /// filters with an empty key apply to the whole document.
    pub(crate) fn new(
        field_key: impl Into<String>,
        role: FilterRole,
        terms: FilterTerms,
    ) -> Result<Self, QueryError> {
        let field_key = field_key.into();
        if field_key.is_empty() {
            match &terms {
                FilterTerms::Numeric(_) => return Err(QueryError::FieldRequired("numeric")),
                FilterTerms::Geo(_) => return Err(QueryError::FieldRequired("geo")),
                FilterTerms::Text(_) => {}
            }
        }
        Ok(Self {
            field_key,
            role,
            terms,
        })
    }

    /// Appends this filter's query-string fragment to `out`.
    pub(crate) fn serialize_into(&self, out: &mut String, strategy: TermResolvingStrategy) {
        out.push('(');
        out.push_str(self.role.prefix());

        match &self.terms {
            FilterTerms::Text(terms) => {
                if !self.field_key.is_empty() {
                    out.push('@');
                    out.push_str(&self.field_key);
                    out.push(':');
                }
                let rendered: Vec<String> = terms.iter().map(|t| t.resolve(strategy)).collect();
                out.push_str(&rendered.join("|"));
            }
            FilterTerms::Numeric(terms) => {
                let rendered: Vec<String> = terms
                    .iter()
                    .map(|t| format!("@{}:{}", self.field_key, t.render()))
                    .collect();
                out.push_str(&rendered.join(" | "));
            }
            FilterTerms::Geo(terms) => {
                let rendered: Vec<String> = terms
                    .iter()
                    .map(|t| format!("@{}:{}", self.field_key, t.render()))
                    .collect();
                out.push_str(&rendered.join(" | "));
            }
        }

        out.push_str(") ");
    }
}
