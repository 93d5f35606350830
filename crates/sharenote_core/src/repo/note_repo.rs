//! Note store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the note persistence operations the ownership controller
//!   composes: insert, unconditional replace-by-id, lookups, delete.
//! - Own the `note_owners` link table and keep it in lockstep with note rows.
//!
//! # Invariants
//! - Write paths validate the owner set before SQL mutations.
//! - Read paths reject persisted notes with an empty or duplicated owner set
//!   instead of masking them.
//! - Owner links are replaced inside one immediate transaction with the note
//!   row update, so a committed note never has a partially-written owner set.

use crate::model::note::{Note, NoteDraft, NoteId};
use crate::model::user::UserId;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    date,
    color,
    created_at,
    updated_at
FROM notes";

/// Note store interface consumed by the ownership controller.
pub trait NoteRepository {
    /// Inserts a new note, generating an ID when the draft has none.
    ///
    /// The store stamps `created_at`; `updated_at` keeps its default.
    fn insert_note(&mut self, draft: &NoteDraft) -> RepoResult<NoteId>;
    /// Unconditionally replaces the note row and its owner set by ID,
    /// bumping `updated_at`. Last writer wins.
    fn replace_note(&mut self, note: &Note) -> RepoResult<()>;
    /// Gets one note by ID.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Gets one note by ID only if `owner_id` is in its owner set.
    ///
    /// The authorization fetch: callers cannot tell a missing note from a
    /// note they do not own.
    fn get_note_for_owner(&self, id: NoteId, owner_id: UserId) -> RepoResult<Option<Note>>;
    /// Lists all notes owned by `owner_id`, most recently updated first.
    fn list_notes_for_owner(&self, owner_id: UserId) -> RepoResult<Vec<Note>>;
    /// Deletes a note and its owner links.
    fn delete_note(&mut self, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note store.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a note store from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&mut self, draft: &NoteDraft) -> RepoResult<NoteId> {
        draft.validate()?;

        let id = draft.id.unwrap_or_else(Uuid::new_v4);
        let id_text = id.to_string();

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO notes (id, title, content, date, color)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id_text.as_str(),
                draft.title.as_str(),
                draft.content.as_str(),
                draft.date.as_str(),
                draft.color.as_str(),
            ],
        )?;
        insert_owner_links(&tx, id_text.as_str(), &draft.owners)?;
        tx.commit()?;

        Ok(id)
    }

    fn replace_note(&mut self, note: &Note) -> RepoResult<()> {
        note.validate()?;

        let id_text = note.id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                date = ?4,
                color = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                id_text.as_str(),
                note.title.as_str(),
                note.content.as_str(),
                note.date.as_str(),
                note.color.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }

        tx.execute(
            "DELETE FROM note_owners WHERE note_id = ?1;",
            [id_text.as_str()],
        )?;
        insert_owner_links(&tx, id_text.as_str(), &note.owners)?;
        tx.commit()?;

        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(self.conn, row)?));
        }
        Ok(None)
    }

    fn get_note_for_owner(&self, id: NoteId, owner_id: UserId) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE id = ?1
               AND EXISTS (
                   SELECT 1
                   FROM note_owners
                   WHERE note_id = notes.id
                     AND user_id = ?2
               );"
        ))?;
        let mut rows = stmt.query(params![id.to_string(), owner_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(self.conn, row)?));
        }
        Ok(None)
    }

    fn list_notes_for_owner(&self, owner_id: UserId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE EXISTS (
                 SELECT 1
                 FROM note_owners
                 WHERE note_id = notes.id
                   AND user_id = ?1
             )
             ORDER BY updated_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([owner_id.to_string()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(self.conn, row)?);
        }
        Ok(notes)
    }

    fn delete_note(&mut self, id: NoteId) -> RepoResult<()> {
        // note_owners rows go with the note via ON DELETE CASCADE.
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn insert_owner_links(tx: &Transaction<'_>, note_id: &str, owners: &[UserId]) -> RepoResult<()> {
    for (ord, owner) in owners.iter().enumerate() {
        tx.execute(
            "INSERT INTO note_owners (note_id, user_id, ord) VALUES (?1, ?2, ?3);",
            params![note_id, owner.to_string(), ord as i64],
        )?;
    }
    Ok(())
}

fn parse_note_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "notes.id")?;
    let owners = load_owners_for_note(conn, &id_text)?;

    let note = Note {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        date: row.get("date")?,
        color: row.get("color")?,
        owners,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    note.validate()?;
    Ok(note)
}

fn load_owners_for_note(conn: &Connection, note_id: &str) -> RepoResult<Vec<UserId>> {
    let mut stmt = conn.prepare(
        "SELECT user_id
         FROM note_owners
         WHERE note_id = ?1
         ORDER BY ord ASC;",
    )?;
    let mut rows = stmt.query([note_id])?;
    let mut owners = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        owners.push(parse_uuid(&value, "note_owners.user_id")?);
    }
    Ok(owners)
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
