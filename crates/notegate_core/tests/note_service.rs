use notegate_core::db::open_db_in_memory;
use notegate_core::{
    BodyRejection, DraftError, Note, NoteDraft, NoteService, NoteServiceError,
    SqliteNoteRepository, TitleRejection,
};
use std::sync::{Arc, Mutex};

#[test]
fn create_note_persists_trimmed_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let note = service
        .create_note("  Test Note ", "\n Some <b>body</b> \n", 123_456_789)
        .unwrap();
    assert_eq!(note.title, "Test Note");
    assert_eq!(note.body, "Some <b>body</b>");
    assert_eq!(note.created_at, 123_456_789);
    assert_eq!(service.list_notes().unwrap(), vec![note]);
}

#[test]
fn invalid_body_is_rejected_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let err = service.create_note("Title", "<foo>bar</foo>", 1).unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::InvalidBody(BodyRejection::DisallowedTag(ref name)) if name == "foo"
    ));
    assert_eq!(err.to_string(), "Disallowed tag: <foo>");

    let err = service.create_note("Title", "<a>x</a>", 1).unwrap_err();
    assert_eq!(err.to_string(), "Anchor tags must include href");
    assert!(service.list_notes().unwrap().is_empty());
}

#[test]
fn title_is_checked_before_body() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let err = service.create_note("   ", "", 1).unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::InvalidTitle(TitleRejection::Required)
    ));
}

#[test]
fn delete_unknown_note_maps_to_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let err = service.delete_note(42).unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(42)));
}

#[test]
fn observers_see_service_mutations_until_unobserved() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::default();

    let sink = Arc::clone(&seen);
    let observer = service
        .observe_notes(move |notes: &[Note]| {
            let titles = notes.iter().map(|note| note.title.clone()).collect();
            sink.lock().unwrap().push(titles);
        })
        .unwrap();

    let first = service.create_note("First", "<p>1</p>", 1_111).unwrap();
    service.create_note("Second", "<i>2</i>", 2_222).unwrap();
    service.delete_note(first.id).unwrap();
    assert!(service.unobserve(observer));
    service.create_note("Third", "3", 3_333).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            Vec::<String>::new(),
            vec!["First".to_string()],
            vec!["Second".to_string(), "First".to_string()],
            vec!["Second".to_string()],
        ]
    );
}

#[test]
fn draft_save_goes_through_service() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let mut draft = NoteDraft::new(0);
    draft.set_title("Title");
    draft.set_body("Body");
    draft.set_created_at(123);
    let saved = draft.save(&service).unwrap();

    assert_eq!(
        (saved.title.as_str(), saved.body.as_str(), saved.created_at),
        ("Title", "Body", 123)
    );
    assert_eq!(service.list_notes().unwrap().len(), 1);
    assert!(draft.save_success);
    assert!(!draft.is_saving);
}

#[test]
fn draft_save_is_blocked_when_invalid() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let mut draft = NoteDraft::new(0);
    draft.set_title("");
    draft.set_body("Body");
    assert!(matches!(draft.save(&service), Err(DraftError::NotReady)));
    assert!(service.list_notes().unwrap().is_empty());
    assert!(!draft.save_success);
}

#[test]
fn draft_with_separator_only_body_cannot_save() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let mut draft = NoteDraft::new(0);
    draft.set_title("Title");
    draft.set_body("\u{1F}");
    assert_eq!(draft.body_error.as_deref(), Some("Body is required"));
    assert!(!draft.can_save());
    assert!(matches!(draft.save(&service), Err(DraftError::NotReady)));
    assert!(!draft.save_success);
}

#[test]
fn note_serializes_with_camel_case_fields() {
    let note = Note {
        id: 7,
        title: "t".to_string(),
        body: "<p>b</p>".to_string(),
        created_at: 99,
    };
    let value = serde_json::to_value(&note).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "id": 7, "title": "t", "body": "<p>b</p>", "createdAt": 99 })
    );
}
