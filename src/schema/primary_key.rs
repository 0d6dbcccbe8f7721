//! Primary key resolution and rendering.
//!
//! A [`PrimaryKey`] records which declared property carries an entity's
//! identity and renders its value as a key-safe string. Rendering goes
//! through `Display`-style formatting, which in Rust is always locale
//! independent.

use std::any::TypeId;

use crate::entity::{KeyValue, SearchEntity, ValueKind};
use crate::error::QueryError;

/// The identity property of an entity type.
#[derive(Debug, Clone)]
pub struct PrimaryKey {
    entity: TypeId,
    entity_name: &'static str,
    property_name: &'static str,
    property_kind: ValueKind,
}

impl PrimaryKey {
    pub(crate) fn new<E: SearchEntity>(property_name: &'static str, kind: ValueKind) -> Self {
        Self {
            entity: TypeId::of::<E>(),
            entity_name: E::entity_name(),
            property_name,
            property_kind: kind,
        }
    }

    pub fn property_name(&self) -> &'static str {
        self.property_name
    }

    pub fn property_kind(&self) -> ValueKind {
        self.property_kind
    }

    /// Renders the key value of `entity`.
    ///
    /// Fails when this primary key was built for a different entity type.
    pub fn key_from_entity<E: SearchEntity>(&self, entity: &E) -> Result<String, QueryError> {
        if TypeId::of::<E>() != self.entity {
            return Err(QueryError::EntityTypeMismatch {
                expected: self.entity_name,
            });
        }

        entity
            .to_search_fields()
            .into_iter()
            .find(|(name, _)| *name == self.property_name)
            .map(|(_, value)| value)
            .ok_or_else(|| QueryError::MissingKeyField(self.property_name.to_string()))
    }

    /// Renders a caller-supplied key value.
    ///
    /// Fails when the value's kind is incompatible with the resolved
    /// property's kind.
    pub fn key_from_value(&self, value: &KeyValue) -> Result<String, QueryError> {
        if !kind_compatible(self.property_kind, value.kind()) {
            return Err(QueryError::KeyTypeMismatch {
                property: self.property_name.to_string(),
                actual: value.kind(),
            });
        }
        Ok(value.render())
    }
}

/// `Other`-kind properties (dates, UUIDs, ...) accept textual key values;
/// geo pairs never function as keys.
fn kind_compatible(property: ValueKind, value: ValueKind) -> bool {
    match property {
        ValueKind::Integer => value == ValueKind::Integer,
        ValueKind::Float => value == ValueKind::Float,
        ValueKind::Text | ValueKind::Other => value == ValueKind::Text,
        ValueKind::Geo => false,
    }
}
