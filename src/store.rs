//! Durable persistence for notes.
//!
//! Layered bottom-up: the [`adapter`] normalizes statement execution across
//! the two supported engines, [`migrations`] brings the schema up to the
//! current version at startup, and [`storage`] exposes the note CRUD surface
//! built on both.

pub mod adapter;
pub mod migrations;
pub mod storage;

pub use adapter::Database;
pub use storage::NoteStore;
