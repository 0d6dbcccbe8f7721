// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! FT.ADD argument construction.

use std::collections::HashSet;

use tracing::debug;

use crate::entity::SearchEntity;
use crate::error::SearchError;
use crate::schema::SchemaMetadata;

/// Builds the add-document command for one entity instance.
pub struct AddCommand {
    args: Vec<String>,
}

impl AddCommand {
    /// `score` is the document's ranking weight (the engine expects 0..1);
    /// `language` overrides the schema's default for this one document.
    pub fn for_entity<E: SearchEntity>(
        entity: &E,
        score: f64,
        language: Option<&str>,
    ) -> Result<Self, SearchError> {
        let schema = SchemaMetadata::of::<E>()?;

        let key = schema.primary_key.key_from_entity(entity)?;
        let document_id = format!("{}{}", schema.document_id_prefix, key);
        let language = language.unwrap_or(&schema.language);

        let mut args = vec![
            schema.index_name.clone(),
            document_id.clone(),
            score.to_string(),
            "LANGUAGE".to_string(),
            language.to_string(),
            "FIELDS".to_string(),
        ];

        let ignored: HashSet<&'static str> = schema
            .properties
            .iter()
            .filter(|p| p.is_ignored)
            .map(|p| p.name)
            .collect();

        for (name, value) in entity.to_search_fields() {
            if ignored.contains(name) {
                continue;
            }
            args.push(name.to_string());
            args.push(value);
        }

        debug!(index = %schema.index_name, id = %document_id, "FT.ADD");
        Ok(Self { args })
    }

    pub fn command(&self) -> &'static str {
        "FT.ADD"
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}
