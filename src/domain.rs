/// The key a note is unique under: `(room_id, uppercase(text))`.
///
/// The text half is stored uppercased so that lookups and duplicate checks
/// are case-insensitive while the note itself keeps its display casing.
pub type NoteKey = (String, String);

/// Builds the composite lookup key for a note in a room.
pub fn note_key(room_id: &str, text: &str) -> NoteKey {
    (room_id.to_owned(), text.to_uppercase())
}

/// A persisted text note scoped to a conversation room.
///
/// Notes are immutable once created; there is no update operation. Identity
/// is the composite key `(room_id, uppercase(text))`, so no two active notes
/// in the same room may normalize to the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// The ID of the room the note belongs to.
    pub room_id: String,
    /// The note text exactly as typed by the author.
    pub text: String,
    /// Free-text grouping label; defaults to `"general"`.
    pub category: String,
    /// Optional user ID to mention when the note is shown.
    pub target_user: Option<String>,
}

impl Note {
    /// Creates a new note, defaulting an empty or missing category to
    /// `"general"`.
    pub fn new(
        room_id: impl Into<String>,
        text: impl Into<String>,
        category: Option<&str>,
        target_user: Option<&str>,
    ) -> Self {
        let category = match category {
            Some(c) if !c.trim().is_empty() => c.trim().to_owned(),
            _ => "general".to_owned(),
        };

        Note {
            room_id: room_id.into(),
            text: text.into(),
            category,
            target_user: target_user.map(str::to_owned),
        }
    }

    /// Returns the composite key this note is stored and deduplicated under.
    pub fn key(&self) -> NoteKey {
        note_key(&self.room_id, &self.text)
    }
}
