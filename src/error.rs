//! Error taxonomy.
//!
//! Configuration errors (schema and query builder misuse) are reported
//! synchronously at the point of misuse, never deferred to execution time.
//! An invalid schema or query never reaches wire serialization.

use thiserror::Error;

/// Errors raised while building schema metadata for an entity type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("The index name must not be empty.")]
    EmptyIndexName,
    #[error("The document id prefix must not be empty.")]
    EmptyDocumentIdPrefix,
    #[error("The language must not be empty.")]
    EmptyLanguage,
    #[error("Property with name {0} is not a valid property.")]
    UnknownProperty(String),
    #[error("Could not find a default id property for '{0}', please specify one.")]
    MissingPrimaryKey(String),
    #[error("You cannot set sortable on a geo property ({0}).")]
    SortableGeo(String),
    #[error("You can disable stemming only on a text property ({0}).")]
    NoStemOnNonText(String),
    #[error("You can set a weight only on a text property ({0}).")]
    WeightOnNonText(String),
    #[error("The weight must be greater than zero, got {0}.")]
    InvalidWeight(f64),
}

/// Errors raised while building a search query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("This is an empty query.")]
    EmptyQuery,
    #[error("The id must not be empty.")]
    EmptyId,
    #[error("The id array must not be null or empty.")]
    EmptyIdSet,
    #[error("Property with name {0} is not a valid property.")]
    UnknownProperty(String),
    #[error("Slop value must be at least 0, got {0}.")]
    NegativeSlop(i64),
    #[error("The field name cannot be empty in {0} queries.")]
    FieldRequired(&'static str),
    #[error("Primary key of '{expected}' cannot be read from an entity of a different type.")]
    EntityTypeMismatch { expected: &'static str },
    #[error("Primary key value kind {actual:?} does not match the '{property}' property.")]
    KeyTypeMismatch {
        property: String,
        actual: crate::entity::ValueKind,
    },
    #[error("Primary key property '{0}' is missing from the serialized fields.")]
    MissingKeyField(String),
}

/// Errors raised while decoding an engine reply into entities.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Unexpected reply shape: {0}")]
    UnexpectedShape(String),
    #[error("Field '{0}' is missing from the document.")]
    MissingField(String),
    #[error("Field '{field}' has an invalid value: {message}")]
    InvalidValue { field: String, message: String },
}

/// Umbrella error for client-level operations.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// An error reply from the engine (index missing, duplicate id, ...).
    #[error("Engine error: {0}")]
    Server(String),
    /// Transport-level failure from the underlying connection.
    #[error("Backend error: {0}")]
    Backend(String),
}
