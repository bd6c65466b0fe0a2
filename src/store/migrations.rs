//! Forward-only schema migrations.
//!
//! The schema version is a single row in `migration_version`. A fresh
//! database gets first-time setup at version 0, then every pending migration
//! is applied strictly in ascending order, persisting the new version after
//! each step. Migrations are structural only and never delete user data;
//! there is no rollback.

use crate::error::{NotesError, NotesResult};
use crate::store::adapter::{Database, SqlValue};
use tracing::{debug, info};

/// The schema version a fully migrated database sits at.
pub const LATEST_MIGRATION_VERSION: i64 = 1;

/// A single named, numbered schema transformation.
struct Migration {
    version: i64,
    description: &'static str,
    statements: &'static [&'static str],
}

const MIGRATIONS: &[Migration] = &[
    // SQLite cannot relax a NOT NULL column in place, so the table is
    // rebuilt: rename, recreate, copy rows, recreate the unique index.
    Migration {
        version: 1,
        description: "allow note text to be optional",
        statements: &[
            "ALTER TABLE note RENAME TO note_temp",
            "CREATE TABLE note (
                text TEXT,
                category TEXT,
                room_id TEXT NOT NULL,
                target_user TEXT
            )",
            "INSERT INTO note (
                text,
                category,
                room_id,
                target_user
            )
            SELECT
                text,
                category,
                room_id,
                target_user
            FROM note_temp",
            "DROP INDEX note_room_id_text",
            "CREATE UNIQUE INDEX note_room_id_text ON note(room_id, text)",
            "DROP TABLE note_temp",
        ],
    },
];

/// Brings the database up to [`LATEST_MIGRATION_VERSION`].
///
/// Performs first-time setup when no version table exists, then applies every
/// pending migration in order. Any failure aborts the remaining migrations
/// and is fatal to startup; the store must not run against a partial schema.
pub async fn ensure_current(db: &Database) -> NotesResult<i64> {
    if !db.table_exists("migration_version").await? {
        initial_setup(db).await?;
    }

    let mut version = current_version(db).await?;

    debug!("checking for necessary database migrations");
    if version < LATEST_MIGRATION_VERSION {
        version = run_pending(db, version).await?;
    }

    Ok(version)
}

/// Reads the stored schema version.
pub async fn current_version(db: &Database) -> NotesResult<i64> {
    let rows = db
        .fetch_all("SELECT version FROM migration_version", &[])
        .await?;

    match rows.first() {
        Some(row) => row.integer(0),
        None => Err(NotesError::Migration {
            version: 0,
            cause: "migration_version table has no version row".to_owned(),
        }),
    }
}

/// First-time schema creation: version table at 0, the note table in its
/// version-0 shape, and the uniqueness constraint on `(room_id, text)`.
async fn initial_setup(db: &Database) -> NotesResult<()> {
    info!("performing initial database setup");

    let statements = [
        "CREATE TABLE migration_version (
            version INTEGER PRIMARY KEY
        )",
        "CREATE TABLE note (
            text TEXT NOT NULL,
            category TEXT,
            room_id TEXT NOT NULL,
            target_user TEXT
        )",
        // No two notes in the same room may share the same text
        "CREATE UNIQUE INDEX note_room_id_text ON note(room_id, text)",
    ];

    for sql in statements {
        db.execute(sql, &[]).await.map_err(|e| NotesError::Migration {
            version: 0,
            cause: e.to_string(),
        })?;
    }

    db.execute(
        "INSERT INTO migration_version (version) VALUES (?)",
        &[SqlValue::Integer(0)],
    )
    .await
    .map_err(|e| NotesError::Migration {
        version: 0,
        cause: e.to_string(),
    })?;

    Ok(())
}

async fn run_pending(db: &Database, from_version: i64) -> NotesResult<i64> {
    let mut version = from_version;

    for migration in MIGRATIONS {
        if migration.version <= version {
            continue;
        }

        info!(
            "migrating the database from v{} to v{}: {}",
            version, migration.version, migration.description
        );

        for sql in migration.statements {
            db.execute(sql, &[])
                .await
                .map_err(|e| NotesError::Migration {
                    version: migration.version,
                    cause: e.to_string(),
                })?;
        }

        db.execute(
            "UPDATE migration_version SET version = ?",
            &[SqlValue::Integer(migration.version)],
        )
        .await
        .map_err(|e| NotesError::Migration {
            version: migration.version,
            cause: e.to_string(),
        })?;

        version = migration.version;
        info!("database migrated to v{version}");
    }

    Ok(version)
}
