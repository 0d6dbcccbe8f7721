// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! FT.DEL argument construction.

use tracing::debug;

use crate::entity::SearchEntity;
use crate::error::SearchError;
use crate::schema::SchemaMetadata;

/// Builds the delete-from-index command for one entity instance.
///
/// Only removes the document from the index; the backing key, if any, is
/// the caller's concern.
pub struct DeleteCommand {
    args: Vec<String>,
}

impl DeleteCommand {
    pub fn for_entity<E: SearchEntity>(entity: &E) -> Result<Self, SearchError> {
        let schema = SchemaMetadata::of::<E>()?;
        let key = schema.primary_key.key_from_entity(entity)?;
        let document_id = format!("{}{}", schema.document_id_prefix, key);

        debug!(index = %schema.index_name, id = %document_id, "FT.DEL");
        Ok(Self {
            args: vec![schema.index_name.clone(), document_id],
        })
    }

    pub fn command(&self) -> &'static str {
        "FT.DEL"
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{PropertyDescriptor, ValueKind};
    use crate::error::DecodeError;
    use std::collections::HashMap;

    struct Note {
        id: String,
    }

    impl SearchEntity for Note {
        fn entity_name() -> &'static str {
            "Note"
        }

        fn properties() -> &'static [PropertyDescriptor] {
            &[PropertyDescriptor::new("Id", ValueKind::Text)]
        }

        fn to_search_fields(&self) -> Vec<(&'static str, String)> {
            vec![("Id", self.id.clone())]
        }

        fn from_search_fields(fields: &HashMap<String, String>) -> Result<Self, DecodeError> {
            Ok(Note {
                id: crate::entity::parse_field(fields, "Id")?,
            })
        }
    }

    #[test]
    fn test_delete_args() {
        let note = Note {
            id: "abc".to_string(),
        };
        let command = DeleteCommand::for_entity(&note).unwrap();
        assert_eq!(command.command(), "FT.DEL");
        assert_eq!(command.args(), &["notes-index", "notes:abc"]);
    }
}
