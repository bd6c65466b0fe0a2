use crate::config::{DatabaseConfig, DatabaseKind};
use crate::error::{NotesError, NotesResult};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, TypeInfo};
use std::str::FromStr;

/// A parameter or decoded column value, neutral across both engines.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Text(String),
    Null,
}

/// One decoded result row.
#[derive(Debug, Clone)]
pub struct SqlRow {
    values: Vec<SqlValue>,
}

impl SqlRow {
    /// Returns the text value at `index`, failing on NULL or a non-text column.
    pub fn text(&self, index: usize) -> NotesResult<&str> {
        match self.values.get(index) {
            Some(SqlValue::Text(value)) => Ok(value),
            other => Err(NotesError::Other(format!(
                "expected text at column {index}, got {other:?}"
            ))),
        }
    }

    /// Returns the text value at `index`, mapping NULL to `None`.
    pub fn opt_text(&self, index: usize) -> NotesResult<Option<&str>> {
        match self.values.get(index) {
            Some(SqlValue::Text(value)) => Ok(Some(value)),
            Some(SqlValue::Null) => Ok(None),
            other => Err(NotesError::Other(format!(
                "expected text or NULL at column {index}, got {other:?}"
            ))),
        }
    }

    /// Returns the integer value at `index`, failing on NULL or a non-integer column.
    pub fn integer(&self, index: usize) -> NotesResult<i64> {
        match self.values.get(index) {
            Some(SqlValue::Integer(value)) => Ok(*value),
            other => Err(NotesError::Other(format!(
                "expected integer at column {index}, got {other:?}"
            ))),
        }
    }
}

/// Connection to one of the two supported relational engines.
///
/// Statement templates use `?` positional placeholders throughout the crate;
/// for PostgreSQL they are rewritten to `$1..$n` before execution. Parameters
/// are always bound through the driver, never interpolated into the template.
///
/// Each call acquires its own pooled connection, so concurrent callers never
/// share an in-flight statement.
pub enum Database {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

impl Database {
    /// Opens a connection pool for the configured engine.
    ///
    /// For SQLite the database file is created if missing. Returns
    /// [`NotesError::Connection`] if the locator is invalid or the engine is
    /// unreachable.
    pub async fn connect(config: &DatabaseConfig) -> NotesResult<Self> {
        match config.kind {
            DatabaseKind::Sqlite => {
                let options = SqliteConnectOptions::from_str(&config.connection_string)
                    .map_err(|e| NotesError::Connection(e.to_string()))?
                    .create_if_missing(true);

                // A single connection keeps every statement on one schema
                // view; SQLite serializes writes regardless, and no caller
                // holds a connection while acquiring another.
                let pool = SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect_with(options)
                    .await
                    .map_err(|e| NotesError::Connection(e.to_string()))?;

                Ok(Database::Sqlite(pool))
            }
            DatabaseKind::Postgres => {
                let pool = PgPoolOptions::new()
                    .connect(&config.connection_string)
                    .await
                    .map_err(|e| NotesError::Connection(e.to_string()))?;

                Ok(Database::Postgres(pool))
            }
        }
    }

    /// Returns the engine name, for log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Database::Sqlite(_) => "sqlite",
            Database::Postgres(_) => "postgres",
        }
    }

    /// Executes a non-query statement and returns the number of affected rows.
    pub async fn execute(&self, sql: &str, params: &[SqlValue]) -> NotesResult<u64> {
        match self {
            Database::Sqlite(pool) => {
                let mut query = sqlx::query(sql);
                for value in params {
                    query = match value {
                        SqlValue::Integer(v) => query.bind(*v),
                        SqlValue::Text(v) => query.bind(v.clone()),
                        SqlValue::Null => query.bind(None::<String>),
                    };
                }
                Ok(query.execute(pool).await?.rows_affected())
            }
            Database::Postgres(pool) => {
                let sql = rewrite_placeholders(sql);
                let mut query = sqlx::query(&sql);
                for value in params {
                    query = match value {
                        SqlValue::Integer(v) => query.bind(*v),
                        SqlValue::Text(v) => query.bind(v.clone()),
                        SqlValue::Null => query.bind(None::<String>),
                    };
                }
                Ok(query.execute(pool).await?.rows_affected())
            }
        }
    }

    /// Executes a query and returns every result row, decoded into
    /// engine-neutral [`SqlRow`]s.
    pub async fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> NotesResult<Vec<SqlRow>> {
        match self {
            Database::Sqlite(pool) => {
                let mut query = sqlx::query(sql);
                for value in params {
                    query = match value {
                        SqlValue::Integer(v) => query.bind(*v),
                        SqlValue::Text(v) => query.bind(v.clone()),
                        SqlValue::Null => query.bind(None::<String>),
                    };
                }
                let rows = query.fetch_all(pool).await?;
                rows.iter().map(decode_sqlite_row).collect()
            }
            Database::Postgres(pool) => {
                let sql = rewrite_placeholders(sql);
                let mut query = sqlx::query(&sql);
                for value in params {
                    query = match value {
                        SqlValue::Integer(v) => query.bind(*v),
                        SqlValue::Text(v) => query.bind(v.clone()),
                        SqlValue::Null => query.bind(None::<String>),
                    };
                }
                let rows = query.fetch_all(pool).await?;
                rows.iter().map(decode_postgres_row).collect()
            }
        }
    }

    /// Checks whether a table exists, using the engine's own catalog.
    pub async fn table_exists(&self, table: &str) -> NotesResult<bool> {
        let sql = match self {
            Database::Sqlite(_) => "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
            Database::Postgres(_) => {
                "SELECT table_name::text FROM information_schema.tables WHERE table_name = ?"
            }
        };

        let rows = self
            .fetch_all(sql, &[SqlValue::Text(table.to_owned())])
            .await?;
        Ok(!rows.is_empty())
    }
}

fn decode_sqlite_row(row: &SqliteRow) -> NotesResult<SqlRow> {
    let mut values = Vec::with_capacity(row.columns().len());

    for (i, column) in row.columns().iter().enumerate() {
        let value = match column.type_info().name() {
            "INTEGER" => row
                .try_get::<Option<i64>, _>(i)?
                .map_or(SqlValue::Null, SqlValue::Integer),
            "NULL" => SqlValue::Null,
            _ => row
                .try_get::<Option<String>, _>(i)?
                .map_or(SqlValue::Null, SqlValue::Text),
        };
        values.push(value);
    }

    Ok(SqlRow { values })
}

fn decode_postgres_row(row: &PgRow) -> NotesResult<SqlRow> {
    let mut values = Vec::with_capacity(row.columns().len());

    for (i, column) in row.columns().iter().enumerate() {
        let value = match column.type_info().name() {
            "INT2" | "INT4" => row
                .try_get::<Option<i32>, _>(i)?
                .map_or(SqlValue::Null, |v| SqlValue::Integer(i64::from(v))),
            "INT8" => row
                .try_get::<Option<i64>, _>(i)?
                .map_or(SqlValue::Null, SqlValue::Integer),
            _ => row
                .try_get::<Option<String>, _>(i)?
                .map_or(SqlValue::Null, SqlValue::Text),
        };
        values.push(value);
    }

    Ok(SqlRow { values })
}

/// Rewrites `?` placeholders to PostgreSQL's `$1..$n` convention.
///
/// Question marks inside single-quoted literals are left untouched.
pub(crate) fn rewrite_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut next = 1;
    let mut in_string = false;

    for ch in sql.chars() {
        match ch {
            '\'' => {
                in_string = !in_string;
                out.push(ch);
            }
            '?' if !in_string => {
                out.push('$');
                out.push_str(&next.to_string());
                next += 1;
            }
            _ => out.push(ch),
        }
    }

    out
}
