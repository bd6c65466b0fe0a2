//! Orchestration of the durable store and the in-memory index.
//!
//! Every mutation runs a check-then-act sequence: consult the index, write
//! through the store, then update the index. A per-key async lock spans the
//! whole sequence so two concurrent creates for the same normalized key
//! cannot both pass the index check. The store's unique constraint remains
//! the final arbiter of uniqueness; the index check is only a fast path.

use crate::config::DatabaseConfig;
use crate::domain::{Note, NoteKey, note_key};
use crate::error::{NotesError, NotesResult};
use crate::index::{CategoryGroup, NoteIndex};
use crate::store::NoteStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// One async mutex per composite key, handed out on demand.
///
/// Serializes create/delete for a single `(room_id, uppercase(text))` key
/// while leaving unrelated keys free to proceed concurrently. The registry
/// itself is only locked long enough to clone the key's mutex handle.
#[derive(Default)]
struct KeyLocks {
    inner: Mutex<HashMap<NoteKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyLocks {
    fn for_key(&self, key: &NoteKey) -> Arc<tokio::sync::Mutex<()>> {
        self.inner
            .lock()
            .unwrap()
            .entry(key.clone())
            .or_default()
            .clone()
    }
}

/// The collaborator-facing note API, safe to share behind an [`Arc`] across
/// concurrent command handlers.
///
/// Owns the [`NoteIndex`] outright; all access to the cache goes through this
/// component. Index operations are in-memory and non-blocking, and the index
/// mutex is never held across a store call.
pub struct NoteManager {
    store: NoteStore,
    index: Mutex<NoteIndex>,
    locks: KeyLocks,
}

impl NoteManager {
    /// Initializes the store (running migrations) and seeds the index from
    /// the full durable state.
    ///
    /// # Errors
    /// - [`NotesError::Connection`] if the database cannot be reached
    /// - [`NotesError::Migration`] if a schema migration fails
    pub async fn initialize(config: &DatabaseConfig) -> NotesResult<Self> {
        let store = NoteStore::initialize(config).await?;
        let index = NoteIndex::from_notes(store.load_all().await?);

        Ok(NoteManager {
            store,
            index: Mutex::new(index),
            locks: KeyLocks::default(),
        })
    }

    /// Creates a note in a room.
    ///
    /// A missing or empty `category` defaults to `"general"`. Duplicate
    /// detection is case-insensitive on the note text: the index answers the
    /// fast path, and a unique-constraint violation from the store covers the
    /// race where another writer inserted first. In either case the index is
    /// left untouched and [`NotesError::DuplicateNote`] is returned.
    pub async fn create_note(
        &self,
        room_id: &str,
        text: &str,
        category: Option<&str>,
        target_user: Option<&str>,
    ) -> NotesResult<Note> {
        let note = Note::new(room_id, text, category, target_user);
        let key = note.key();

        let lock = self.locks.for_key(&key);
        let _guard = lock.lock().await;

        debug!("creating note in room {room_id}: {text}");

        if self.index.lock().unwrap().get(room_id, text).is_some() {
            return Err(NotesError::DuplicateNote {
                room_id: room_id.to_owned(),
                text: text.to_owned(),
            });
        }

        self.store.create_note(&note).await?;
        self.index.lock().unwrap().put(note.clone());

        Ok(note)
    }

    /// Deletes a note by room and text, case-insensitively.
    ///
    /// The index resolves the stored casing when it differs from the text as
    /// typed; the durable delete always targets the exact stored text. On
    /// [`NotesError::NoteNotFound`] the index is left unchanged.
    pub async fn delete_note(&self, room_id: &str, text: &str) -> NotesResult<()> {
        let key = note_key(room_id, text);

        let lock = self.locks.for_key(&key);
        let _guard = lock.lock().await;

        debug!("deleting note in room {room_id}: {text}");

        let stored_text = self
            .index
            .lock()
            .unwrap()
            .get(room_id, text)
            .map(|note| note.text.clone())
            .unwrap_or_else(|| text.to_owned());

        self.store.delete_note(room_id, &stored_text).await?;
        self.index.lock().unwrap().remove(room_id, &stored_text);

        Ok(())
    }

    /// Looks up a note by room and text, case-insensitively, from the index.
    pub fn get_note(&self, room_id: &str, text: &str) -> Option<Note> {
        self.index.lock().unwrap().get(room_id, text).cloned()
    }

    /// Lists a room's notes grouped by category, optionally filtered to one
    /// category (case-sensitive exact match).
    pub fn list_notes(&self, room_id: &str, category: Option<&str>) -> Vec<CategoryGroup> {
        self.index.lock().unwrap().list_by_room(room_id, category)
    }

    /// Rebuilds the index wholesale from durable state.
    ///
    /// The index is derived, never a second source of truth, so a crash
    /// between a store write and the matching index update is recovered here.
    pub async fn resync(&self) -> NotesResult<()> {
        let rebuilt = NoteIndex::from_notes(self.store.load_all().await?);
        *self.index.lock().unwrap() = rebuilt;
        Ok(())
    }
}
