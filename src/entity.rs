// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Entity surface - the contract an application type implements to be
//! mapped onto a search index.
//!
//! Instead of runtime reflection, an entity declares a static property
//! table and (optionally) customizes its schema in `configure_schema`:
//!
//! ```rust
//! use redisearch_om::{DecodeError, PropertyDescriptor, SearchEntity, ValueKind};
//! use std::collections::HashMap;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Car {
//!     id: i32,
//!     make: String,
//!     price: f64,
//! }
//!
//! impl SearchEntity for Car {
//!     fn entity_name() -> &'static str {
//!         "Car"
//!     }
//!
//!     fn properties() -> &'static [PropertyDescriptor] {
//!         &[
//!             PropertyDescriptor::new("Id", ValueKind::Integer),
//!             PropertyDescriptor::new("Make", ValueKind::Text),
//!             PropertyDescriptor::new("Price", ValueKind::Float),
//!         ]
//!     }
//!
//!     fn to_search_fields(&self) -> Vec<(&'static str, String)> {
//!         vec![
//!             ("Id", self.id.to_string()),
//!             ("Make", self.make.clone()),
//!             ("Price", self.price.to_string()),
//!         ]
//!     }
//!
//!     fn from_search_fields(
//!         fields: &HashMap<String, String>,
//!     ) -> Result<Self, DecodeError> {
//!         Ok(Car {
//!             id: redisearch_om::parse_field(fields, "Id")?,
//!             make: redisearch_om::parse_field(fields, "Make")?,
//!             price: redisearch_om::parse_field(fields, "Price")?,
//!         })
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, SchemaError};
use crate::schema::SchemaBuilder;

/// Semantic kind of a declared property value.
///
/// Drives the default search field type: integer and float kinds index as
/// NUMERIC, geo pairs as GEO, everything else as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// Any integer width, signed or unsigned.
    Integer,
    /// f32/f64 and fixed-point decimals.
    Float,
    /// Strings and characters.
    Text,
    /// A longitude/latitude pair.
    Geo,
    /// Dates, UUIDs and other scalar kinds without a dedicated mapping.
    Other,
}

/// One entry of an entity's declared property table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub kind: ValueKind,
}

impl PropertyDescriptor {
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self { name, kind }
    }
}

/// A longitude/latitude pair stored in a GEO field.
///
/// Valid longitudes are from -180 to 180 degrees and valid latitudes from
/// -85.05112878 to 85.05112878 degrees; the range is a contract of the
/// engine and is not enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPosition {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPosition {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// Wire format: `{lon},{lat}`.
impl fmt::Display for GeoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.longitude, self.latitude)
    }
}

impl FromStr for GeoPosition {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lon, lat) = s.split_once(',').ok_or_else(|| DecodeError::InvalidValue {
            field: String::new(),
            message: format!("expected 'lon,lat', got '{s}'"),
        })?;
        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| DecodeError::InvalidValue {
                    field: String::new(),
                    message: e.to_string(),
                })
        };
        Ok(Self {
            longitude: parse(lon)?,
            latitude: parse(lat)?,
        })
    }
}

/// A primary-key value supplied by the caller, e.g. to `with_id`.
///
/// A closed set of key-capable kinds; rendering is always locale
/// independent (shortest round-trip formatting for floats).
#[derive(Debug, Clone, PartialEq)]
pub enum KeyValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl KeyValue {
    /// The semantic kind this value can satisfy.
    pub fn kind(&self) -> ValueKind {
        match self {
            KeyValue::Int(_) | KeyValue::UInt(_) => ValueKind::Integer,
            KeyValue::Float(_) => ValueKind::Float,
            KeyValue::Text(_) => ValueKind::Text,
        }
    }

    /// Renders the value as a key-safe string.
    pub fn render(&self) -> String {
        match self {
            KeyValue::Int(v) => v.to_string(),
            KeyValue::UInt(v) => v.to_string(),
            KeyValue::Float(v) => v.to_string(),
            KeyValue::Text(v) => v.clone(),
        }
    }
}

impl From<i8> for KeyValue {
    fn from(v: i8) -> Self {
        KeyValue::Int(v.into())
    }
}

impl From<i16> for KeyValue {
    fn from(v: i16) -> Self {
        KeyValue::Int(v.into())
    }
}

impl From<i32> for KeyValue {
    fn from(v: i32) -> Self {
        KeyValue::Int(v.into())
    }
}

impl From<i64> for KeyValue {
    fn from(v: i64) -> Self {
        KeyValue::Int(v)
    }
}

impl From<u8> for KeyValue {
    fn from(v: u8) -> Self {
        KeyValue::UInt(v.into())
    }
}

impl From<u16> for KeyValue {
    fn from(v: u16) -> Self {
        KeyValue::UInt(v.into())
    }
}

impl From<u32> for KeyValue {
    fn from(v: u32) -> Self {
        KeyValue::UInt(v.into())
    }
}

impl From<u64> for KeyValue {
    fn from(v: u64) -> Self {
        KeyValue::UInt(v)
    }
}

impl From<f32> for KeyValue {
    fn from(v: f32) -> Self {
        KeyValue::Float(v.into())
    }
}

impl From<f64> for KeyValue {
    fn from(v: f64) -> Self {
        KeyValue::Float(v)
    }
}

impl From<&str> for KeyValue {
    fn from(v: &str) -> Self {
        KeyValue::Text(v.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(v: String) -> Self {
        KeyValue::Text(v)
    }
}

/// The contract an application record type implements to be indexed and
/// searched.
///
/// `properties()` is the declared property table: every serializable
/// property of the type, in declaration order, with its semantic kind.
/// The schema builder seeds one property configuration per entry and the
/// query builder validates field references against it.
pub trait SearchEntity: Sized + Send + Sync + 'static {
    /// The entity type name used by the naming conventions (e.g. `"Car"`).
    fn entity_name() -> &'static str;

    /// The declared property table.
    fn properties() -> &'static [PropertyDescriptor];

    /// Customization hook, invoked exactly once at first schema build.
    ///
    /// Must be pure with respect to global state; any side effect runs
    /// once per process.
    fn configure_schema(_builder: &mut SchemaBuilder) -> Result<(), SchemaError> {
        Ok(())
    }

    /// Serializes the non-ignored properties to wire field/value pairs.
    fn to_search_fields(&self) -> Vec<(&'static str, String)>;

    /// Rebuilds the entity from the wire field/value pairs of a document.
    fn from_search_fields(fields: &HashMap<String, String>) -> Result<Self, DecodeError>;
}

/// Parses one named field out of a decoded document, with the usual
/// missing/invalid error mapping. Convenience for `from_search_fields`
/// implementations.
pub fn parse_field<T>(fields: &HashMap<String, String>, name: &str) -> Result<T, DecodeError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = fields
        .get(name)
        .ok_or_else(|| DecodeError::MissingField(name.to_string()))?;
    raw.parse().map_err(|e: T::Err| DecodeError::InvalidValue {
        field: name.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_position_round_trip() {
        let pos = GeoPosition::new(19.03991, 47.49801);
        let rendered = pos.to_string();
        assert_eq!(rendered, "19.03991,47.49801");
        assert_eq!(rendered.parse::<GeoPosition>().unwrap(), pos);
    }

    #[test]
    fn test_geo_position_rejects_garbage() {
        assert!("not-a-geo".parse::<GeoPosition>().is_err());
        assert!("1.0;2.0".parse::<GeoPosition>().is_err());
    }

    #[test]
    fn test_key_value_kinds() {
        assert_eq!(KeyValue::from(42i32).kind(), ValueKind::Integer);
        assert_eq!(KeyValue::from(42u64).kind(), ValueKind::Integer);
        assert_eq!(KeyValue::from(1.5f64).kind(), ValueKind::Float);
        assert_eq!(KeyValue::from("abc").kind(), ValueKind::Text);
    }

    #[test]
    fn test_key_value_rendering_is_invariant() {
        assert_eq!(KeyValue::from(42i32).render(), "42");
        assert_eq!(KeyValue::from(1.5f64).render(), "1.5");
        assert_eq!(KeyValue::from(10000.0f64).render(), "10000");
        assert_eq!(KeyValue::from("abc-123").render(), "abc-123");
    }

    #[test]
    fn test_parse_field_errors() {
        let mut fields = HashMap::new();
        fields.insert("Age".to_string(), "nope".to_string());

        let missing = parse_field::<i32>(&fields, "Id").unwrap_err();
        assert_eq!(missing, DecodeError::MissingField("Id".to_string()));

        let invalid = parse_field::<i32>(&fields, "Age").unwrap_err();
        assert!(matches!(invalid, DecodeError::InvalidValue { .. }));
    }
}
