use notes_core::domain::Note;
use notes_core::index::NoteIndex;

fn note(room_id: &str, text: &str, category: &str) -> Note {
    Note::new(room_id, text, Some(category), None)
}

#[test]
fn lookup_is_case_insensitive_but_keeps_display_casing() {
    let mut index = NoteIndex::new();
    index.put(note("!r1", "Buy milk", "shopping"));

    let found = index.get("!r1", "bUy MiLk").unwrap();
    assert_eq!(found.text, "Buy milk");

    assert!(index.get("!r2", "Buy milk").is_none());
}

#[test]
fn removing_an_absent_key_is_a_noop() {
    let mut index = NoteIndex::new();
    index.put(note("!r1", "Buy milk", "shopping"));

    assert!(index.remove("!r1", "unknown").is_none());
    assert_eq!(index.len(), 1);

    let removed = index.remove("!r1", "BUY MILK").unwrap();
    assert_eq!(removed.text, "Buy milk");
    assert!(index.is_empty());
}

#[test]
fn overwrite_keeps_the_first_seen_position() {
    let mut index = NoteIndex::new();
    index.put(note("!r1", "Buy milk", "shopping"));
    index.put(note("!r1", "Call dentist", "errands"));

    // Same normalized key, different casing and category
    index.put(note("!r1", "BUY MILK", "groceries"));

    let all = index.all_notes();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].text, "BUY MILK");
    assert_eq!(all[0].category, "groceries");
    assert_eq!(all[1].text, "Call dentist");
}

#[test]
fn listing_groups_by_category_in_first_seen_order() {
    let mut index = NoteIndex::new();
    index.put(note("!r1", "One", "general"));
    index.put(note("!r1", "Two", "shopping"));
    index.put(note("!r1", "Three", "general"));
    index.put(note("!r2", "Other room", "general"));

    let groups = index.list_by_room("!r1", None);
    assert_eq!(groups.len(), 2);

    assert_eq!(groups[0].category, "general");
    let texts: Vec<&str> = groups[0].notes.iter().map(|n| n.text.as_str()).collect();
    assert_eq!(texts, vec!["One", "Three"]);

    assert_eq!(groups[1].category, "shopping");
    assert_eq!(groups[1].notes[0].text, "Two");
}

#[test]
fn category_filter_is_exact_and_case_sensitive() {
    let mut index = NoteIndex::new();
    index.put(note("!r1", "One", "shopping"));
    index.put(note("!r1", "Two", "Shopping"));

    let groups = index.list_by_room("!r1", Some("shopping"));
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].notes.len(), 1);
    assert_eq!(groups[0].notes[0].text, "One");
}

#[test]
fn from_notes_preserves_the_given_order() {
    let index = NoteIndex::from_notes([
        note("!r1", "One", "general"),
        note("!r1", "Two", "general"),
        note("!r1", "Three", "general"),
    ]);

    let texts: Vec<String> = index.all_notes().into_iter().map(|n| n.text).collect();
    assert_eq!(texts, vec!["One", "Two", "Three"]);
}
