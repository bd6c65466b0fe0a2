use crate::config::DatabaseConfig;
use crate::domain::Note;
use crate::error::{NotesError, NotesResult};
use crate::store::adapter::{Database, SqlValue};
use crate::store::migrations;
use tracing::{debug, info};

/// The durable CRUD layer for notes.
///
/// Owns the durable representation exclusively; the in-memory index is
/// derived from it. All statements are parametrized and none assume a fixed
/// backend.
pub struct NoteStore {
    db: Database,
}

impl NoteStore {
    /// Opens a connection for the configured backend and brings the schema up
    /// to the current version.
    ///
    /// # Errors
    /// - [`NotesError::Connection`] if the database cannot be reached
    /// - [`NotesError::Migration`] if a migration step fails; the store must
    ///   not be used against a partially migrated schema
    pub async fn initialize(config: &DatabaseConfig) -> NotesResult<Self> {
        let db = Database::connect(config).await?;
        let version = migrations::ensure_current(&db).await?;

        info!(
            "database initialization of type '{}' complete at schema v{version}",
            db.kind()
        );

        Ok(NoteStore { db })
    }

    /// Loads every note row, in the order the engine returns them.
    ///
    /// Used once at startup to seed the index, and again for re-sync or
    /// recovery. Maps strictly the four declared columns; a NULL category
    /// loads as `"general"`.
    pub async fn load_all(&self) -> NotesResult<Vec<Note>> {
        let rows = self
            .db
            .fetch_all(
                "SELECT
                    text,
                    category,
                    room_id,
                    target_user
                FROM note",
                &[],
            )
            .await?;

        let mut notes = Vec::with_capacity(rows.len());
        for row in &rows {
            notes.push(Note {
                text: row.text(0)?.to_owned(),
                category: row.opt_text(1)?.unwrap_or("general").to_owned(),
                room_id: row.text(2)?.to_owned(),
                target_user: row.opt_text(3)?.map(str::to_owned),
            });
        }

        debug!("loaded {} note rows", notes.len());
        Ok(notes)
    }

    /// Inserts a new note row.
    ///
    /// The unique index on `(room_id, text)` is the authority on uniqueness:
    /// a constraint violation is reported as [`NotesError::DuplicateNote`],
    /// never as a raw database error.
    pub async fn create_note(&self, note: &Note) -> NotesResult<()> {
        let params = [
            SqlValue::Text(note.text.clone()),
            SqlValue::Text(note.category.clone()),
            SqlValue::Text(note.room_id.clone()),
            note.target_user
                .clone()
                .map_or(SqlValue::Null, SqlValue::Text),
        ];

        let result = self
            .db
            .execute(
                "INSERT INTO note (
                    text,
                    category,
                    room_id,
                    target_user
                ) VALUES (
                    ?, ?, ?, ?
                )",
                &params,
            )
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(NotesError::Db(sqlx::Error::Database(e))) if e.is_unique_violation() => {
                Err(NotesError::DuplicateNote {
                    room_id: note.room_id.clone(),
                    text: note.text.clone(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Deletes the row matching the exact stored text for a room.
    ///
    /// Zero affected rows is the detection signal for a missing note and is
    /// reported as [`NotesError::NoteNotFound`].
    pub async fn delete_note(&self, room_id: &str, text: &str) -> NotesResult<()> {
        let affected = self
            .db
            .execute(
                "DELETE FROM note WHERE room_id = ? AND text = ?",
                &[
                    SqlValue::Text(room_id.to_owned()),
                    SqlValue::Text(text.to_owned()),
                ],
            )
            .await?;

        if affected == 0 {
            return Err(NotesError::NoteNotFound {
                room_id: room_id.to_owned(),
                text: text.to_owned(),
            });
        }

        Ok(())
    }
}
