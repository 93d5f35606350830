use rusqlite::Connection;
use sharenote_core::db::open_db_in_memory;
use sharenote_core::{
    AuthService, NoteDraft, NoteService, RegisterOutcome, SqliteNoteRepository,
    SqliteUserDirectory, User,
};
use uuid::Uuid;

fn register_user(conn: &Connection, email: &str) -> User {
    let mut service = AuthService::new(SqliteUserDirectory::new(conn));
    match service.register(email, "pw").unwrap() {
        RegisterOutcome::Registered(user) => user,
        other => panic!("expected registration to succeed, got {other:?}"),
    }
}

fn note_service(conn: &Connection) -> NoteService<SqliteNoteRepository<'_>, SqliteUserDirectory<'_>> {
    NoteService::new(
        SqliteNoteRepository::new(conn),
        SqliteUserDirectory::new(conn),
    )
}

#[test]
fn save_without_id_inserts_with_generated_id_and_created_at() {
    let conn = open_db_in_memory().unwrap();
    let owner = register_user(&conn, "a@x.com");
    let mut service = note_service(&conn);

    let draft = NoteDraft::new("groceries", "milk, eggs", "2026-08-06", "#aabbcc", vec![owner.id]);
    let saved = service.save_note(&draft).unwrap();

    assert_eq!(saved.title, "groceries");
    assert_eq!(saved.owners, vec![owner.id]);
    assert!(saved.created_at > 0);
    assert_eq!(saved.updated_at, 0);
}

#[test]
fn save_with_known_id_replaces_fields_and_keeps_owners() {
    let conn = open_db_in_memory().unwrap();
    let owner = register_user(&conn, "a@x.com");
    let other = register_user(&conn, "b@x.com");
    let mut service = note_service(&conn);

    let saved = service
        .save_note(&NoteDraft::new("draft", "body", "2026-08-06", "#aabbcc", vec![owner.id]))
        .unwrap();

    // A malicious save payload tries to swap ownership to someone else.
    let mut update = NoteDraft::new("final", "new body", "2026-08-07", "#ddeeff", vec![other.id]);
    update.id = Some(saved.id);
    let updated = service.save_note(&update).unwrap();

    assert_eq!(updated.id, saved.id);
    assert_eq!(updated.title, "final");
    assert_eq!(updated.content, "new body");
    assert_eq!(updated.owners, vec![owner.id]);
    assert_eq!(updated.created_at, saved.created_at);
    assert!(updated.updated_at > 0);
}

#[test]
fn save_update_ignores_empty_owner_payload() {
    let conn = open_db_in_memory().unwrap();
    let owner = register_user(&conn, "a@x.com");
    let mut service = note_service(&conn);

    let saved = service
        .save_note(&NoteDraft::new("note", "body", "2026-08-06", "#aabbcc", vec![owner.id]))
        .unwrap();

    let mut update = NoteDraft::new("note", "body", "2026-08-06", "#aabbcc", Vec::new());
    update.id = Some(saved.id);
    let updated = service.save_note(&update).unwrap();

    assert_eq!(updated.owners, vec![owner.id]);
}

#[test]
fn save_with_unknown_id_inserts_using_that_id() {
    let conn = open_db_in_memory().unwrap();
    let owner = register_user(&conn, "a@x.com");
    let mut service = note_service(&conn);

    let supplied = Uuid::new_v4();
    let mut draft = NoteDraft::new("imported", "body", "2026-08-06", "#aabbcc", vec![owner.id]);
    draft.id = Some(supplied);
    let saved = service.save_note(&draft).unwrap();

    assert_eq!(saved.id, supplied);
    assert!(saved.created_at > 0);
    assert_eq!(saved.updated_at, 0);
    assert_eq!(service.get_note(supplied).unwrap().unwrap().title, "imported");
}

#[test]
fn insert_without_owners_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let mut service = note_service(&conn);

    let draft = NoteDraft::new("orphan", "body", "2026-08-06", "#aabbcc", Vec::new());
    assert!(service.save_note(&draft).is_err());
}

#[test]
fn insert_with_duplicate_owner_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let owner = register_user(&conn, "a@x.com");
    let mut service = note_service(&conn);

    let draft = NoteDraft::new("dup", "body", "2026-08-06", "#aabbcc", vec![owner.id, owner.id]);
    assert!(service.save_note(&draft).is_err());
}
