use notegate_core::db::open_db_in_memory;
use notegate_core::{NewNote, Note, NoteRepository, RepoError, SqliteNoteRepository};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

type Snapshots = Arc<Mutex<Vec<Vec<i64>>>>;

fn recording_listener(snapshots: &Snapshots) -> notegate_core::NotesListener {
    let snapshots = Arc::clone(snapshots);
    Arc::new(move |notes: &[Note]| {
        let ids = notes.iter().map(|note| note.id).collect();
        snapshots.lock().unwrap().push(ids);
    })
}

#[test]
fn create_and_get_round_trips_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let id = repo
        .create_note(&NewNote::new("Title", "<p>body</p>", 1_234))
        .unwrap();
    let note = repo.get_note(id).unwrap().expect("note should exist");
    assert_eq!(
        note,
        Note {
            id,
            title: "Title".to_string(),
            body: "<p>body</p>".to_string(),
            created_at: 1_234,
        }
    );
    assert!(repo.get_note(id + 100).unwrap().is_none());
}

#[test]
fn list_is_ordered_newest_first_with_id_tiebreak() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let old = repo.create_note(&NewNote::new("old", "b", 1_000)).unwrap();
    let new = repo.create_note(&NewNote::new("new", "b", 3_000)).unwrap();
    let tie_first = repo.create_note(&NewNote::new("t1", "b", 2_000)).unwrap();
    let tie_second = repo.create_note(&NewNote::new("t2", "b", 2_000)).unwrap();

    let ids = repo
        .list_notes()
        .unwrap()
        .into_iter()
        .map(|note| note.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![new, tie_second, tie_first, old]);
}

#[test]
fn delete_removes_note_and_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let id = repo.create_note(&NewNote::new("t", "b", 1)).unwrap();

    repo.delete_note(id).unwrap();
    assert!(repo.list_notes().unwrap().is_empty());

    let err = repo.delete_note(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id));
}

#[test]
fn observer_receives_initial_and_post_mutation_snapshots() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let first = repo.create_note(&NewNote::new("first", "b", 10)).unwrap();

    let snapshots: Snapshots = Arc::default();
    let observer = repo.observe_notes(recording_listener(&snapshots)).unwrap();
    assert_eq!(repo.observer_count(), 1);

    let second = repo.create_note(&NewNote::new("second", "b", 20)).unwrap();
    repo.delete_note(first).unwrap();

    assert_eq!(
        *snapshots.lock().unwrap(),
        vec![vec![first], vec![second, first], vec![second]]
    );

    assert!(repo.unobserve(observer));
    assert!(!repo.unobserve(observer));
    repo.create_note(&NewNote::new("third", "b", 30)).unwrap();
    assert_eq!(snapshots.lock().unwrap().len(), 3);
}

#[test]
fn failed_delete_publishes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let snapshots: Snapshots = Arc::default();
    repo.observe_notes(recording_listener(&snapshots)).unwrap();
    assert!(repo.delete_note(42).is_err());

    assert_eq!(*snapshots.lock().unwrap(), vec![Vec::<i64>::new()]);
}

#[test]
fn multiple_observers_are_notified_independently() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let left: Snapshots = Arc::default();
    let right: Snapshots = Arc::default();
    let left_id = repo.observe_notes(recording_listener(&left)).unwrap();
    repo.observe_notes(recording_listener(&right)).unwrap();

    repo.create_note(&NewNote::new("a", "b", 1)).unwrap();
    repo.unobserve(left_id);
    repo.create_note(&NewNote::new("c", "d", 2)).unwrap();

    assert_eq!(left.lock().unwrap().len(), 2);
    assert_eq!(right.lock().unwrap().len(), 3);
}

#[test]
fn unmigrated_connection_is_rejected() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteNoteRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("notes")));

    conn.execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, title TEXT);")
        .unwrap();
    let err = SqliteNoteRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::MissingRequiredColumn {
            table: "notes",
            column: "body"
        }
    ));
}
