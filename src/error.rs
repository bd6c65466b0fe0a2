use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotesError {
    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("migration to schema version {version} failed: {cause}")]
    Migration { version: i64, cause: String },

    #[error("note '{text}' already exists in room {room_id}")]
    DuplicateNote { room_id: String, text: String },

    #[error("no note '{text}' exists in room {room_id}")]
    NoteNotFound { room_id: String, text: String },

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Other error: {0}")]
    Other(String),
}

pub type NotesResult<T> = Result<T, NotesError>;
