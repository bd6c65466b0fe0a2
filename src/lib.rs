//! # notes_core
//!
//! A Rust library for persisting short, user-authored text notes scoped to a
//! conversation room, with case-insensitive deduplication, category listing,
//! and dual relational backends (SQLite and PostgreSQL).
//!
//! ## Features
//!
//! - **Note Management**: Create, list, and delete notes keyed by room and
//!   case-normalized text
//! - **Dual Backends**: One parametrized statement surface over an embedded
//!   SQLite file or a PostgreSQL server, selected once at startup
//! - **Forward-only Migrations**: Versioned schema migrations with first-time
//!   setup and strict ascending application
//! - **In-memory Index**: A read-optimized, case-insensitive cache rebuilt
//!   from durable state at startup and kept in lockstep with every mutation
//! - **Robust Error Handling**: Typed errors for duplicates, missing notes,
//!   connection failures, and migration failures
//! - **Thread-safe Operations**: Safe concurrent use from many command handlers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notes_core::config::{DatabaseConfig, DatabaseKind};
//! use notes_core::manager::NoteManager;
//!
//! # async fn run() -> Result<(), notes_core::NotesError> {
//! let config = DatabaseConfig {
//!     kind: DatabaseKind::Sqlite,
//!     connection_string: "sqlite:notes.db".to_string(),
//! };
//!
//! // Runs migrations and seeds the in-memory index from the database
//! let manager = NoteManager::initialize(&config).await?;
//!
//! manager
//!     .create_note("!room:example.org", "Buy milk", Some("shopping"), None)
//!     .await?;
//!
//! for group in manager.list_notes("!room:example.org", None) {
//!     println!("{}: {} note(s)", group.category, group.notes.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **[`domain`]**: The note entity and its composite lookup key
//! - **[`store`]**: Backend adapter, migrations, and durable CRUD
//! - **[`index`]**: The in-memory note index with category grouping
//! - **[`manager`]**: Orchestration of store and index with per-key locking
//! - **[`config`]**: Backend selection consumed at initialization
//! - **[`error`]**: Unified error handling throughout the library
//!
//! ## Error Handling
//!
//! All operations return [`NotesResult<T>`] wrapping the unified
//! [`NotesError`] type. Startup-class failures (connection, migration) halt
//! initialization; runtime-class failures (duplicate, not found) are typed
//! results the caller can render as specific user-facing messages.

pub mod config;
pub mod domain;
pub mod error;
pub mod index;
pub mod manager;
pub mod store;

/// Re-exports the most commonly used types for convenience.
pub use domain::Note;
pub use error::{NotesError, NotesResult};
