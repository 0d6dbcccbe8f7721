//! Wire command construction.
//!
//! Each command owns its ordered argument list, built from schema
//! metadata and/or a completed query. Execution happens elsewhere (see
//! [`crate::client`]); a command only knows its name and arguments.
//!
//! ```text
//! FT.CREATE {index} SCHEMA {field [options]}...
//! FT.ADD    {index} {key} {score} LANGUAGE {lang} FIELDS {k v}...
//! FT.DEL    {index} {key}
//! FT.SEARCH {index} {query} [option args]...
//! FT.MGET   {index} {key}...
//! ```

mod add;
mod create_index;
mod delete;
mod search;

pub use add::AddCommand;
pub use create_index::CreateIndexCommand;
pub use delete::DeleteCommand;
pub use search::SearchCommand;
