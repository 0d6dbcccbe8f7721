// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! FT.CREATE argument construction from schema metadata.

use tracing::debug;

use crate::entity::SearchEntity;
use crate::error::SchemaError;
use crate::schema::{PropertyMetadata, SchemaMetadata, SearchFieldType};

/// Builds the index-creation command for an entity type.
///
/// Ignored properties produce no field clause; everything else maps to
/// `{name} {TEXT|NUMERIC|GEO}` with the applicable modifiers.
pub struct CreateIndexCommand {
    args: Vec<String>,
}

impl CreateIndexCommand {
    pub fn for_entity<E: SearchEntity>() -> Result<Self, SchemaError> {
        let schema = SchemaMetadata::of::<E>()?;

        let mut args = vec![schema.index_name.clone(), "SCHEMA".to_string()];
        for property in schema.properties.iter().filter(|p| !p.is_ignored) {
            push_property_args(&mut args, property);
        }

        debug!(index = %schema.index_name, fields = args.len() - 2, "FT.CREATE");
        Ok(Self { args })
    }

    pub fn command(&self) -> &'static str {
        "FT.CREATE"
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

fn push_property_args(args: &mut Vec<String>, property: &PropertyMetadata) {
    args.push(property.name.to_string());
    match property.field_type {
        SearchFieldType::Text => {
            args.push("TEXT".to_string());
            if property.no_stem {
                args.push("NOSTEM".to_string());
            }
            args.push("WEIGHT".to_string());
            args.push(property.weight.to_string());
            if property.sortable {
                args.push("SORTABLE".to_string());
            }
        }
        SearchFieldType::Numeric => {
            args.push("NUMERIC".to_string());
            if property.sortable {
                args.push("SORTABLE".to_string());
            }
        }
        SearchFieldType::Geo => {
            args.push("GEO".to_string());
        }
    }

    if property.not_indexed {
        args.push("NOINDEX".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{PropertyDescriptor, ValueKind};
    use crate::error::DecodeError;
    use crate::schema::SchemaBuilder;
    use std::collections::HashMap;

    struct Vehicle;

    impl SearchEntity for Vehicle {
        fn entity_name() -> &'static str {
            "Vehicle"
        }

        fn properties() -> &'static [PropertyDescriptor] {
            &[
                PropertyDescriptor::new("Id", ValueKind::Integer),
                PropertyDescriptor::new("Make", ValueKind::Text),
                PropertyDescriptor::new("Price", ValueKind::Float),
                PropertyDescriptor::new("Location", ValueKind::Geo),
                PropertyDescriptor::new("InternalNote", ValueKind::Text),
            ]
        }

        fn configure_schema(builder: &mut SchemaBuilder) -> Result<(), SchemaError> {
            builder.property("Make")?.not_stemmed().with_weight(2.5)?;
            builder.property("Price")?.sortable();
            builder.property("InternalNote")?.ignore();
            Ok(())
        }

        fn to_search_fields(&self) -> Vec<(&'static str, String)> {
            vec![]
        }

        fn from_search_fields(_fields: &HashMap<String, String>) -> Result<Self, DecodeError> {
            Ok(Vehicle)
        }
    }

    #[test]
    fn test_create_index_args() {
        let command = CreateIndexCommand::for_entity::<Vehicle>().unwrap();
        assert_eq!(command.command(), "FT.CREATE");
        assert_eq!(
            command.args(),
            &[
                "vehicles-index",
                "SCHEMA",
                "Id",
                "NUMERIC",
                "Make",
                "TEXT",
                "NOSTEM",
                "WEIGHT",
                "2.5",
                "Price",
                "NUMERIC",
                "SORTABLE",
                "Location",
                "GEO",
            ]
        );
    }

    #[test]
    fn test_ignored_property_emits_no_field_clause() {
        let command = CreateIndexCommand::for_entity::<Vehicle>().unwrap();
        assert!(!command.args().contains(&"InternalNote".to_string()));
    }

    struct NotIndexed;

    impl SearchEntity for NotIndexed {
        fn entity_name() -> &'static str {
            "NotIndexed"
        }

        fn properties() -> &'static [PropertyDescriptor] {
            &[
                PropertyDescriptor::new("Id", ValueKind::Integer),
                PropertyDescriptor::new("Blob", ValueKind::Text),
            ]
        }

        fn configure_schema(builder: &mut SchemaBuilder) -> Result<(), SchemaError> {
            builder.property("Blob")?.not_indexed();
            Ok(())
        }

        fn to_search_fields(&self) -> Vec<(&'static str, String)> {
            vec![]
        }

        fn from_search_fields(_fields: &HashMap<String, String>) -> Result<Self, DecodeError> {
            Ok(NotIndexed)
        }
    }

    #[test]
    fn test_not_indexed_modifier_placement() {
        let command = CreateIndexCommand::for_entity::<NotIndexed>().unwrap();
        assert_eq!(
            command.args(),
            &[
                "notindexeds-index",
                "SCHEMA",
                "Id",
                "NUMERIC",
                "Blob",
                "TEXT",
                "WEIGHT",
                "1",
                "NOINDEX",
            ]
        );
    }
}
