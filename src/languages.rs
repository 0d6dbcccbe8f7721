//! Language names the engine's stemmer supports, for use with
//! `SchemaBuilder::language` and `use_language`.

pub const ARABIC: &str = "arabic";
pub const DANISH: &str = "danish";
pub const DUTCH: &str = "dutch";
pub const ENGLISH: &str = "english";
pub const FINNISH: &str = "finnish";
pub const FRENCH: &str = "french";
pub const GERMAN: &str = "german";
pub const HUNGARIAN: &str = "hungarian";
pub const ITALIAN: &str = "italian";
pub const NORWEGIAN: &str = "norwegian";
pub const PORTUGUESE: &str = "portuguese";
pub const ROMANIAN: &str = "romanian";
pub const RUSSIAN: &str = "russian";
pub const SPANISH: &str = "spanish";
pub const SWEDISH: &str = "swedish";
pub const TAMIL: &str = "tamil";
pub const TURKISH: &str = "turkish";
