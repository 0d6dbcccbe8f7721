// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Schema metadata construction and the per-type process-wide cache.

use std::any::TypeId;
use std::sync::{Arc, OnceLock};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::entity::{PropertyDescriptor, SearchEntity};
use crate::error::SchemaError;
use crate::schema::conventions::{Conventions, DefaultConventions};
use crate::schema::primary_key::PrimaryKey;
use crate::schema::property::{PropertyBuilder, PropertyMetadata};

/// Configures how the engine should handle an entity type when creating
/// indexes, adding documents or searching.
///
/// Passed to [`SearchEntity::configure_schema`]; every value left
/// unconfigured falls back to the active [`Conventions`].
pub struct SchemaBuilder {
    entity_name: &'static str,
    descriptors: &'static [PropertyDescriptor],
    conventions: Box<dyn Conventions>,
    index_name: Option<String>,
    document_id_prefix: Option<String>,
    language: Option<String>,
    primary_key: Option<PropertyDescriptor>,
    properties: Vec<PropertyBuilder>,
}

impl SchemaBuilder {
    fn for_entity<E: SearchEntity>() -> Self {
        Self {
            entity_name: E::entity_name(),
            descriptors: E::properties(),
            conventions: Box::new(DefaultConventions),
            index_name: None,
            document_id_prefix: None,
            language: None,
            primary_key: None,
            properties: E::properties()
                .iter()
                .map(|d| PropertyBuilder::new(*d))
                .collect(),
        }
    }

    /// Substitutes the conventions used for every unconfigured value.
    pub fn set_conventions(&mut self, conventions: impl Conventions + 'static) {
        self.conventions = Box::new(conventions);
    }

    /// Sets the index name for the entity type.
    pub fn index_name(&mut self, index_name: &str) -> Result<(), SchemaError> {
        if index_name.trim().is_empty() {
            return Err(SchemaError::EmptyIndexName);
        }
        self.index_name = Some(index_name.to_string());
        Ok(())
    }

    /// Sets the document id prefix. Saved documents get keys in the form
    /// `{prefix}{id}`.
    pub fn document_id_prefix(&mut self, prefix: &str) -> Result<(), SchemaError> {
        if prefix.trim().is_empty() {
            return Err(SchemaError::EmptyDocumentIdPrefix);
        }
        self.document_id_prefix = Some(prefix.to_string());
        Ok(())
    }

    /// Sets the default indexing language for the entity type. See
    /// [`crate::languages`] for the values the engine supports.
    pub fn language(&mut self, language: &str) -> Result<(), SchemaError> {
        if language.trim().is_empty() {
            return Err(SchemaError::EmptyLanguage);
        }
        self.language = Some(language.to_string());
        Ok(())
    }

    /// Selects the primary key property by declared name.
    pub fn primary_key(&mut self, property_name: &str) -> Result<(), SchemaError> {
        let descriptor = self
            .descriptors
            .iter()
            .find(|d| d.name == property_name)
            .copied()
            .ok_or_else(|| SchemaError::UnknownProperty(property_name.to_string()))?;
        self.primary_key = Some(descriptor);
        Ok(())
    }

    /// Returns the configuration builder for a declared property.
    pub fn property(&mut self, property_name: &str) -> Result<&mut PropertyBuilder, SchemaError> {
        self.properties
            .iter_mut()
            .find(|p| p.name() == property_name)
            .ok_or_else(|| SchemaError::UnknownProperty(property_name.to_string()))
    }

    fn build<E: SearchEntity>(self) -> Result<SchemaMetadata, SchemaError> {
        let index_name = self
            .index_name
            .unwrap_or_else(|| self.conventions.index_name(self.entity_name));
        let document_id_prefix = self
            .document_id_prefix
            .unwrap_or_else(|| self.conventions.document_id_prefix(self.entity_name));
        let language = self
            .language
            .unwrap_or_else(|| self.conventions.default_language());

        let properties = self
            .properties
            .iter()
            .map(PropertyBuilder::build)
            .collect::<Result<Vec<_>, _>>()?;

        let pk_descriptor = match self.primary_key {
            Some(descriptor) => descriptor,
            None => self
                .conventions
                .primary_key(self.entity_name, self.descriptors)?,
        };

        Ok(SchemaMetadata {
            entity_name: self.entity_name,
            index_name,
            document_id_prefix,
            language,
            properties,
            primary_key: PrimaryKey::new::<E>(pk_descriptor.name, pk_descriptor.kind),
        })
    }
}

/// The immutable per-entity-type schema descriptor.
///
/// Ignored properties are retained in `properties` with
/// `is_ignored = true` so callers can inspect full property coverage;
/// command construction skips them.
#[derive(Debug, Clone)]
pub struct SchemaMetadata {
    pub entity_name: &'static str,
    pub index_name: String,
    pub document_id_prefix: String,
    pub language: String,
    pub properties: Vec<PropertyMetadata>,
    pub primary_key: PrimaryKey,
}

static SCHEMA_CACHE: OnceLock<DashMap<TypeId, Arc<SchemaMetadata>>> = OnceLock::new();

impl SchemaMetadata {
    /// Returns the schema metadata for `E`, building it on first access.
    ///
    /// Exactly one build runs per type for the process lifetime: the
    /// customization hook observably runs once, and concurrent first-access
    /// callers all receive the single completed result. A failed build is
    /// not cached; the error is returned to the caller and the next access
    /// retries.
    pub fn of<E: SearchEntity>() -> Result<Arc<SchemaMetadata>, SchemaError> {
        let cache = SCHEMA_CACHE.get_or_init(DashMap::new);

        if let Some(existing) = cache.get(&TypeId::of::<E>()) {
            return Ok(Arc::clone(&existing));
        }

        // The vacant entry holds its shard lock for the duration of the
        // build, so concurrent first-access callers cannot race a second
        // build into existence.
        match cache.entry(TypeId::of::<E>()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let mut builder = SchemaBuilder::for_entity::<E>();
                E::configure_schema(&mut builder)?;
                let schema = Arc::new(builder.build::<E>()?);
                debug!(
                    entity = %schema.entity_name,
                    index = %schema.index_name,
                    prefix = %schema.document_id_prefix,
                    "Schema metadata built"
                );
                entry.insert(Arc::clone(&schema));
                Ok(schema)
            }
        }
    }
}
