//! Naming conventions used when an entity does not configure a value
//! explicitly. Pluggable per schema build via `SchemaBuilder::set_conventions`.

use crate::entity::PropertyDescriptor;
use crate::error::SchemaError;

/// Default-naming strategy consulted by the schema builder.
pub trait Conventions: Send + Sync {
    /// Index name for an entity type (e.g. `Car` -> `cars-index`).
    fn index_name(&self, entity_name: &str) -> String;

    /// Document id prefix for an entity type (e.g. `Car` -> `cars:`).
    fn document_id_prefix(&self, entity_name: &str) -> String;

    /// Language the indexer uses when none is configured.
    fn default_language(&self) -> String;

    /// Discovers the primary key property when none is configured.
    fn primary_key(
        &self,
        entity_name: &str,
        properties: &[PropertyDescriptor],
    ) -> Result<PropertyDescriptor, SchemaError>;
}

/// The built-in conventions: naive pluralization ("s" appended unless the
/// lowercased name already ends in one), `-index` / `:` suffixes and an
/// `Id` / `{EntityName}Id` primary key scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConventions;

impl DefaultConventions {
    fn pluralize(entity_name: &str) -> String {
        let lowered = entity_name.to_lowercase();
        if lowered.ends_with('s') {
            lowered
        } else {
            format!("{lowered}s")
        }
    }
}

impl Conventions for DefaultConventions {
    fn index_name(&self, entity_name: &str) -> String {
        format!("{}-index", Self::pluralize(entity_name))
    }

    fn document_id_prefix(&self, entity_name: &str) -> String {
        format!("{}:", Self::pluralize(entity_name))
    }

    fn default_language(&self) -> String {
        "english".to_string()
    }

    fn primary_key(
        &self,
        entity_name: &str,
        properties: &[PropertyDescriptor],
    ) -> Result<PropertyDescriptor, SchemaError> {
        let type_scoped = format!("{entity_name}Id");
        properties
            .iter()
            .find(|p| p.name == "Id" || p.name == type_scoped)
            .copied()
            .ok_or_else(|| SchemaError::MissingPrimaryKey(entity_name.to_string()))
    }
}
