use notes_core::config::{DatabaseConfig, DatabaseKind};
use notes_core::domain::Note;
use notes_core::error::NotesError;
use notes_core::store::NoteStore;
use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;

/// Helper: a sqlite config pointing at a fresh database file in `dir`.
fn sqlite_config(dir: &TempDir) -> DatabaseConfig {
    DatabaseConfig {
        kind: DatabaseKind::Sqlite,
        connection_string: format!("sqlite:{}/notes.db", dir.path().display()),
    }
}

#[tokio::test]
async fn initialize_creates_schema_and_survives_reopen() -> Result<(), NotesError> {
    let tmpdir = TempDir::new().unwrap();
    let config = sqlite_config(&tmpdir);

    let store = NoteStore::initialize(&config).await?;
    store
        .create_note(&Note::new("!r1", "Buy milk", Some("shopping"), Some("@u1")))
        .await?;
    drop(store);

    // Reopening the same file must find the schema current and the row intact
    let store = NoteStore::initialize(&config).await?;
    let notes = store.load_all().await?;

    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].text, "Buy milk");
    assert_eq!(notes[0].category, "shopping");
    assert_eq!(notes[0].room_id, "!r1");
    assert_eq!(notes[0].target_user.as_deref(), Some("@u1"));

    Ok(())
}

#[tokio::test]
async fn exact_duplicate_is_rejected_by_the_constraint() -> Result<(), NotesError> {
    let tmpdir = TempDir::new().unwrap();
    let store = NoteStore::initialize(&sqlite_config(&tmpdir)).await?;

    let note = Note::new("!r1", "Buy milk", None, None);
    store.create_note(&note).await?;

    let result = store.create_note(&note).await;
    assert!(matches!(result, Err(NotesError::DuplicateNote { .. })));

    Ok(())
}

#[tokio::test]
async fn constraint_is_exact_text_not_case_insensitive() -> Result<(), NotesError> {
    // The durable unique index compares exact text; case-insensitive
    // deduplication is enforced one layer up through the note index.
    let tmpdir = TempDir::new().unwrap();
    let store = NoteStore::initialize(&sqlite_config(&tmpdir)).await?;

    store
        .create_note(&Note::new("!r1", "Buy milk", None, None))
        .await?;
    store
        .create_note(&Note::new("!r1", "BUY MILK", None, None))
        .await?;

    assert_eq!(store.load_all().await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn delete_missing_note_reports_not_found() -> Result<(), NotesError> {
    let tmpdir = TempDir::new().unwrap();
    let store = NoteStore::initialize(&sqlite_config(&tmpdir)).await?;

    let result = store.delete_note("!r1", "unknown").await;
    assert!(matches!(result, Err(NotesError::NoteNotFound { .. })));

    Ok(())
}

#[tokio::test]
async fn delete_removes_the_row() -> Result<(), NotesError> {
    let tmpdir = TempDir::new().unwrap();
    let store = NoteStore::initialize(&sqlite_config(&tmpdir)).await?;

    store
        .create_note(&Note::new("!r1", "Buy milk", None, None))
        .await?;
    store.delete_note("!r1", "Buy milk").await?;

    assert!(store.load_all().await?.is_empty());

    // Deleting again must fail, the row is gone
    let result = store.delete_note("!r1", "Buy milk").await;
    assert!(matches!(result, Err(NotesError::NoteNotFound { .. })));

    Ok(())
}

/// Builds a version-0 database by hand, the shape `initialize` would have
/// created before any migrations existed.
async fn seed_version_zero_db(config: &DatabaseConfig) -> Result<(), NotesError> {
    let pool = SqlitePool::connect(&format!("{}?mode=rwc", config.connection_string)).await?;

    sqlx::query("CREATE TABLE migration_version (version INTEGER PRIMARY KEY)")
        .execute(&pool)
        .await?;
    sqlx::query("INSERT INTO migration_version (version) VALUES (0)")
        .execute(&pool)
        .await?;
    sqlx::query(
        "CREATE TABLE note (
            text TEXT NOT NULL,
            category TEXT,
            room_id TEXT NOT NULL,
            target_user TEXT
        )",
    )
    .execute(&pool)
    .await?;
    sqlx::query("CREATE UNIQUE INDEX note_room_id_text ON note(room_id, text)")
        .execute(&pool)
        .await?;

    for (text, category, room_id, target_user) in [
        ("Buy milk", Some("shopping"), "!r1", Some("@u1")),
        ("Call dentist", Some("errands"), "!r1", None),
        ("Water plants", None, "!r2", Some("@u2")),
    ] {
        sqlx::query("INSERT INTO note (text, category, room_id, target_user) VALUES (?, ?, ?, ?)")
            .bind(text)
            .bind(category)
            .bind(room_id)
            .bind(target_user)
            .execute(&pool)
            .await?;
    }

    pool.close().await;
    Ok(())
}

#[tokio::test]
async fn migrations_preserve_existing_rows() -> Result<(), NotesError> {
    let tmpdir = TempDir::new().unwrap();
    let config = sqlite_config(&tmpdir);

    seed_version_zero_db(&config).await?;

    let store = NoteStore::initialize(&config).await?;
    let notes = store.load_all().await?;

    assert_eq!(notes.len(), 3);

    let milk = notes.iter().find(|n| n.text == "Buy milk").unwrap();
    assert_eq!(milk.category, "shopping");
    assert_eq!(milk.room_id, "!r1");
    assert_eq!(milk.target_user.as_deref(), Some("@u1"));

    let dentist = notes.iter().find(|n| n.text == "Call dentist").unwrap();
    assert_eq!(dentist.category, "errands");
    assert_eq!(dentist.target_user, None);

    // A NULL category from an old row loads with the default
    let plants = notes.iter().find(|n| n.text == "Water plants").unwrap();
    assert_eq!(plants.category, "general");
    assert_eq!(plants.room_id, "!r2");

    // The version record must have advanced past 0
    let pool = SqlitePool::connect(&config.connection_string).await?;
    let version: i64 = sqlx::query_scalar("SELECT version FROM migration_version")
        .fetch_one(&pool)
        .await?;
    pool.close().await;
    assert!(version >= 1);

    Ok(())
}

#[tokio::test]
async fn migrated_schema_keeps_the_unique_constraint() -> Result<(), NotesError> {
    let tmpdir = TempDir::new().unwrap();
    let config = sqlite_config(&tmpdir);

    seed_version_zero_db(&config).await?;

    let store = NoteStore::initialize(&config).await?;
    let result = store
        .create_note(&Note::new("!r1", "Buy milk", None, None))
        .await;

    assert!(matches!(result, Err(NotesError::DuplicateNote { .. })));

    Ok(())
}

#[tokio::test]
async fn connecting_to_an_unreachable_database_fails() {
    let config = DatabaseConfig {
        kind: DatabaseKind::Sqlite,
        connection_string: "sqlite:/nonexistent-dir/definitely/missing/notes.db".to_string(),
    };

    let result = NoteStore::initialize(&config).await;
    assert!(matches!(result, Err(NotesError::Connection(_))));
}
