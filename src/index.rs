//! The in-memory note index.
//!
//! A read-optimized, case-insensitive cache of every active note, keyed by
//! `(room_id, uppercase(text))`. It never performs durable writes: it is
//! rebuilt wholesale from [`NoteStore::load_all`](crate::store::NoteStore::load_all)
//! at startup and updated after each confirmed store mutation, so it can
//! always be derived again from durable state.

use crate::domain::{Note, NoteKey, note_key};
use std::collections::HashMap;

/// Notes of one category, in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub category: String,
    pub notes: Vec<Note>,
}

struct IndexEntry {
    /// Insertion order across the whole index; listing sorts by this.
    seq: u64,
    note: Note,
}

/// In-memory mapping from composite key to note.
#[derive(Default)]
pub struct NoteIndex {
    entries: HashMap<NoteKey, IndexEntry>,
    next_seq: u64,
}

impl NoteIndex {
    pub fn new() -> Self {
        NoteIndex::default()
    }

    /// Builds an index from an ordered sequence of notes, preserving their
    /// order as the first-seen order.
    pub fn from_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        let mut index = NoteIndex::new();
        for note in notes {
            index.put(note);
        }
        index
    }

    /// Looks up a note by room and text, case-insensitively.
    ///
    /// The returned note keeps its original display casing.
    pub fn get(&self, room_id: &str, text: &str) -> Option<&Note> {
        self.entries
            .get(&note_key(room_id, text))
            .map(|entry| &entry.note)
    }

    /// Inserts or overwrites the entry under the note's normalized key.
    ///
    /// An overwrite keeps the entry's original first-seen position.
    pub fn put(&mut self, note: Note) {
        let key = note.key();
        match self.entries.get_mut(&key) {
            Some(entry) => entry.note = note,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.entries.insert(key, IndexEntry { seq, note });
            }
        }
    }

    /// Removes the entry under the normalized key, returning the note if it
    /// was present. Absence is not an error.
    pub fn remove(&mut self, room_id: &str, text: &str) -> Option<Note> {
        self.entries
            .remove(&note_key(room_id, text))
            .map(|entry| entry.note)
    }

    /// Lists a room's notes grouped by category.
    ///
    /// An optional category filter is a case-sensitive exact match against
    /// the stored category field. Notes keep first-seen order within each
    /// group, and groups appear in first-seen order of their category.
    pub fn list_by_room(&self, room_id: &str, category: Option<&str>) -> Vec<CategoryGroup> {
        let mut matches: Vec<&IndexEntry> = self
            .entries
            .values()
            .filter(|entry| entry.note.room_id == room_id)
            .filter(|entry| category.is_none_or(|c| entry.note.category == c))
            .collect();
        matches.sort_by_key(|entry| entry.seq);

        let mut groups: Vec<CategoryGroup> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for entry in matches {
            match positions.get(entry.note.category.as_str()) {
                Some(&i) => groups[i].notes.push(entry.note.clone()),
                None => {
                    positions.insert(entry.note.category.as_str(), groups.len());
                    groups.push(CategoryGroup {
                        category: entry.note.category.clone(),
                        notes: vec![entry.note.clone()],
                    });
                }
            }
        }

        groups
    }

    /// Returns every indexed note, in first-seen order.
    pub fn all_notes(&self) -> Vec<Note> {
        let mut entries: Vec<&IndexEntry> = self.entries.values().collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.note.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
