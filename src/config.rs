use serde::Deserialize;

/// The relational engine backing the note store.
///
/// Selected exactly once when a store is initialized; every statement after
/// that goes through the same adapter surface regardless of the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    /// Embedded single-file engine (SQLite).
    Sqlite,
    /// Client-server engine (PostgreSQL).
    Postgres,
}

/// Database settings consumed, not owned, by this crate.
///
/// The `connection_string` is opaque to the store: a `sqlite:` URL or plain
/// path for [`DatabaseKind::Sqlite`], a `postgres://` URL for
/// [`DatabaseKind::Postgres`].
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(rename = "type")]
    pub kind: DatabaseKind,
    pub connection_string: String,
}
