use rusqlite::Connection;
use sharenote_core::db::open_db_in_memory;
use sharenote_core::{
    AuthOutcome, AuthService, RegisterOutcome, SqliteUserDirectory, User,
};
use uuid::Uuid;

fn register_user(service: &mut AuthService<SqliteUserDirectory<'_>>, email: &str, pw: &str) -> User {
    match service.register(email, pw).unwrap() {
        RegisterOutcome::Registered(user) => user,
        other => panic!("expected registration to succeed, got {other:?}"),
    }
}

fn seed_legacy_user(conn: &Connection, email: &str, plaintext_pw: &str) -> Uuid {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO users (id, email, credential) VALUES (?1, ?2, ?3);",
        rusqlite::params![id.to_string(), email, plaintext_pw],
    )
    .unwrap();
    id
}

#[test]
fn register_then_authenticate_scenarios() {
    let conn = open_db_in_memory().unwrap();
    let mut service = AuthService::new(SqliteUserDirectory::new(&conn));

    let user = register_user(&mut service, "a@x.com", "pw1");

    assert_eq!(
        service.authenticate("a@x.com", "pw1").unwrap(),
        AuthOutcome::Authorized(user.id)
    );
    assert_eq!(
        service.authenticate("a@x.com", "wrong").unwrap(),
        AuthOutcome::InvalidCredentials
    );
    assert_eq!(
        service.authenticate("ghost@x.com", "pw1").unwrap(),
        AuthOutcome::UnknownUser
    );
}

#[test]
fn registration_stores_salted_credential_not_plaintext() {
    let conn = open_db_in_memory().unwrap();
    let mut service = AuthService::new(SqliteUserDirectory::new(&conn));

    let user = register_user(&mut service, "a@x.com", "pw1");
    assert!(!user.credential.is_legacy());

    let stored: String = conn
        .query_row(
            "SELECT credential FROM users WHERE id = ?1;",
            [user.id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert!(stored.contains(':'));
    assert_ne!(stored, "pw1");
}

#[test]
fn duplicate_registration_reports_email_taken() {
    let conn = open_db_in_memory().unwrap();
    let mut service = AuthService::new(SqliteUserDirectory::new(&conn));

    register_user(&mut service, "a@x.com", "pw1");
    assert_eq!(
        service.register("a@x.com", "pw2").unwrap(),
        RegisterOutcome::EmailTaken
    );
}

#[test]
fn blank_email_registration_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let mut service = AuthService::new(SqliteUserDirectory::new(&conn));

    assert_eq!(
        service.register("   ", "pw1").unwrap(),
        RegisterOutcome::InvalidEmail
    );
}

#[test]
fn email_is_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let mut service = AuthService::new(SqliteUserDirectory::new(&conn));

    register_user(&mut service, "a@x.com", "pw1");
    assert_eq!(
        service.authenticate("A@X.COM", "pw1").unwrap(),
        AuthOutcome::UnknownUser
    );
}

#[test]
fn legacy_plaintext_account_can_still_log_in() {
    let conn = open_db_in_memory().unwrap();
    let legacy_id = seed_legacy_user(&conn, "old@x.com", "old-password");
    let service = AuthService::new(SqliteUserDirectory::new(&conn));

    assert_eq!(
        service.authenticate("old@x.com", "old-password").unwrap(),
        AuthOutcome::Authorized(legacy_id)
    );
    assert_eq!(
        service.authenticate("old@x.com", "guess").unwrap(),
        AuthOutcome::InvalidCredentials
    );

    // The bridge is verification-only: the stored record stays untouched.
    let stored: String = conn
        .query_row(
            "SELECT credential FROM users WHERE id = ?1;",
            [legacy_id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, "old-password");
}

#[test]
fn only_authorized_outcome_collapses_to_authorized() {
    let conn = open_db_in_memory().unwrap();
    let mut service = AuthService::new(SqliteUserDirectory::new(&conn));
    let user = register_user(&mut service, "a@x.com", "pw1");

    assert!(AuthOutcome::Authorized(user.id).is_authorized());
    assert!(!AuthOutcome::InvalidCredentials.is_authorized());
    assert!(!AuthOutcome::UnknownUser.is_authorized());
}

#[test]
fn id_and_email_lookups_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let mut service = AuthService::new(SqliteUserDirectory::new(&conn));
    let user = register_user(&mut service, "a@x.com", "pw1");

    assert_eq!(service.user_id_for_email("a@x.com").unwrap(), Some(user.id));
    assert_eq!(
        service.email_for_user_id(user.id).unwrap(),
        Some("a@x.com".to_string())
    );
    assert_eq!(service.user_id_for_email("ghost@x.com").unwrap(), None);
    assert_eq!(service.email_for_user_id(Uuid::new_v4()).unwrap(), None);
}
