// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Schema Metadata
//!
//! Derives a declarative search schema from an entity's property table by
//! convention, applies per-entity overrides, and caches the result per
//! type for the process lifetime.
//!
//! ```text
//! SearchEntity::properties()
//!     ↓ seed one PropertyBuilder per property
//! SearchEntity::configure_schema(&mut SchemaBuilder)
//!     ↓ overrides: index name, prefix, language, primary key, per-property
//! SchemaBuilder::build()
//!     ↓ explicit-or-convention resolution + validation
//! SchemaMetadata (immutable, cached per TypeId)
//! ```

mod conventions;
mod metadata;
mod primary_key;
mod property;

pub use conventions::{Conventions, DefaultConventions};
pub use metadata::{SchemaBuilder, SchemaMetadata};
pub use primary_key::PrimaryKey;
pub use property::{PropertyBuilder, PropertyMetadata, SearchFieldType};
