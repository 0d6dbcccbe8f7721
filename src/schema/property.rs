// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Per-property index configuration.
//!
//! Each declared property seeds one [`PropertyBuilder`] with a
//! convention-assigned field type; the entity's schema hook may then
//! override it. Validation happens entirely at `build()` - no partial
//! application.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{PropertyDescriptor, ValueKind};
use crate::error::SchemaError;

/// Field types supported by the index engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchFieldType {
    /// Full-text searchable field.
    Text,
    /// Numeric field (supports range queries).
    Numeric,
    /// Geographic field (longitude, latitude).
    Geo,
}

impl fmt::Display for SearchFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchFieldType::Text => write!(f, "TEXT"),
            SearchFieldType::Numeric => write!(f, "NUMERIC"),
            SearchFieldType::Geo => write!(f, "GEO"),
        }
    }
}

/// Immutable description of how one entity property maps to an index
/// field. Built once during schema construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMetadata {
    pub name: &'static str,
    pub kind: ValueKind,
    pub is_ignored: bool,
    pub field_type: SearchFieldType,
    pub not_indexed: bool,
    pub sortable: bool,
    pub no_stem: bool,
    pub weight: f64,
}

/// Configures how the engine should handle one entity property.
///
/// Obtained through `SchemaBuilder::property` inside an entity's schema
/// hook.
#[derive(Debug)]
pub struct PropertyBuilder {
    name: &'static str,
    kind: ValueKind,
    ignored: bool,
    field_type: SearchFieldType,
    not_indexed: bool,
    sortable: bool,
    no_stem: bool,
    weight: Option<f64>,
}

impl PropertyBuilder {
    pub(crate) fn new(descriptor: PropertyDescriptor) -> Self {
        Self {
            name: descriptor.name,
            kind: descriptor.kind,
            ignored: false,
            field_type: default_field_type(descriptor.kind),
            not_indexed: false,
            sortable: false,
            no_stem: false,
            weight: None,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    /// Excludes the property from serialization entirely. Useful for
    /// calculated values.
    pub fn ignore(&mut self) -> &mut Self {
        self.ignored = true;
        self
    }

    /// Overrides the field type assigned by convention.
    pub fn as_field_type(&mut self, field_type: SearchFieldType) -> &mut Self {
        self.field_type = field_type;
        self
    }

    /// Keeps the property in the serialization process but excludes it
    /// from indexing.
    pub fn not_indexed(&mut self) -> &mut Self {
        self.not_indexed = true;
        self
    }

    /// Makes the field sortable.
    pub fn sortable(&mut self) -> &mut Self {
        self.sortable = true;
        self
    }

    /// Disables stemming on a text field.
    pub fn not_stemmed(&mut self) -> &mut Self {
        self.no_stem = true;
        self
    }

    /// Sets the scoring weight of a text field.
    pub fn with_weight(&mut self, weight: f64) -> Result<&mut Self, SchemaError> {
        if weight <= 0.0 {
            return Err(SchemaError::InvalidWeight(weight));
        }
        self.weight = Some(weight);
        Ok(self)
    }

    pub(crate) fn build(&self) -> Result<PropertyMetadata, SchemaError> {
        if self.field_type == SearchFieldType::Geo && self.sortable {
            return Err(SchemaError::SortableGeo(self.name.to_string()));
        }
        if self.field_type != SearchFieldType::Text && self.no_stem {
            return Err(SchemaError::NoStemOnNonText(self.name.to_string()));
        }
        if self.field_type != SearchFieldType::Text && self.weight.is_some() {
            return Err(SchemaError::WeightOnNonText(self.name.to_string()));
        }

        Ok(PropertyMetadata {
            name: self.name,
            kind: self.kind,
            is_ignored: self.ignored,
            field_type: self.field_type,
            not_indexed: self.not_indexed,
            sortable: self.sortable,
            no_stem: self.no_stem,
            weight: self.weight.unwrap_or(1.0),
        })
    }
}

fn default_field_type(kind: ValueKind) -> SearchFieldType {
    match kind {
        ValueKind::Integer | ValueKind::Float => SearchFieldType::Numeric,
        ValueKind::Geo => SearchFieldType::Geo,
        ValueKind::Text | ValueKind::Other => SearchFieldType::Text,
    }
}
