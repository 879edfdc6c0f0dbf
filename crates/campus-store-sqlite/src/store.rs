//! [`SqliteStore`], the SQLite implementation of [`ContactStore`].

use std::path::Path;

use campus_core::{
  contact::{ContactStatus, ContactSubmission, NewContact},
  filter::LeadFilter,
  store::{ContactStore, Page},
};
use chrono::{SubsecRound as _, Utc};
use rusqlite::{OptionalExtension as _, functions::FunctionFlags, types::Value};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    CONTACT_COLUMNS, RawContact, UNICODE_LOWER, encode_dt, encode_filter, encode_status,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Current time truncated to the precision stored on disk, so values handed
/// back to callers compare equal to what a later read returns.
fn now() -> chrono::DateTime<Utc> { Utc::now().trunc_subsecs(6) }

/// SQLite's own `lower()` only folds ASCII; subject matching needs the same
/// Unicode folding as [`LeadFilter::matches`].
fn register_functions(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    UNICODE_LOWER,
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      let text: Option<String> = ctx.get(0)?;
      Ok(text.map(|t| t.to_lowercase()))
    },
  )
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        register_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-row `UPDATE`/`DELETE` and report whether a row matched.
  async fn execute_one(&self, sql: &'static str, params: Vec<Value>) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(sql, rusqlite::params_from_iter(params.iter()))?)
      })
      .await?;
    Ok(changed > 0)
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = Error;

  async fn create_contact(&self, input: NewContact) -> Result<ContactSubmission> {
    let contact = ContactSubmission {
      id:           Uuid::new_v4(),
      name:         input.name,
      email:        input.email,
      phone:        input.phone,
      subject:      input.subject,
      message:      input.message,
      status:       ContactStatus::New,
      submitted_at: now(),
      replied_at:   None,
      admin_notes:  None,
    };

    let id_str     = encode_uuid(contact.id);
    let name       = contact.name.clone();
    let email      = contact.email.clone();
    let phone      = contact.phone.clone();
    let subject    = contact.subject.clone();
    let message    = contact.message.clone();
    let status_str = encode_status(contact.status);
    let at_str     = encode_dt(contact.submitted_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contacts (
             contact_id, name, email, phone, subject, message, status, submitted_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![id_str, name, email, phone, subject, message, status_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(contact)
  }

  async fn get_contact(&self, id: Uuid) -> Result<Option<ContactSubmission>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE contact_id = ?1"),
            rusqlite::params![id_str],
            RawContact::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn list_contacts(
    &self,
    filter: &LeadFilter,
    page:   Option<Page>,
  ) -> Result<Vec<ContactSubmission>> {
    let mut clause = encode_filter(filter);
    let limit_sql = match page {
      Some(p) => {
        clause.params.push(Value::Integer(i64::try_from(p.limit).unwrap_or(i64::MAX)));
        clause.params.push(Value::Integer(i64::try_from(p.offset()).unwrap_or(i64::MAX)));
        "LIMIT ? OFFSET ?"
      }
      None => "",
    };
    let sql = format!(
      "SELECT {CONTACT_COLUMNS} FROM contacts {} \
       ORDER BY submitted_at DESC, contact_id {limit_sql}",
      clause.sql
    );

    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(clause.params.iter()),
            RawContact::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn count_contacts(&self, filter: &LeadFilter) -> Result<usize> {
    let clause = encode_filter(filter);
    let sql = format!("SELECT COUNT(*) FROM contacts {}", clause.sql);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &sql,
          rusqlite::params_from_iter(clause.params.iter()),
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count.max(0) as usize)
  }

  async fn set_status(
    &self,
    id:     Uuid,
    status: ContactStatus,
  ) -> Result<Option<ContactSubmission>> {
    let Some(mut contact) = self.get_contact(id).await? else {
      return Ok(None);
    };
    contact.apply_status(status, now());

    let params = vec![
      Value::Text(encode_status(contact.status).to_owned()),
      contact
        .replied_at
        .map(|at| Value::Text(encode_dt(at)))
        .unwrap_or(Value::Null),
      Value::Text(encode_uuid(id)),
    ];
    let found = self
      .execute_one(
        "UPDATE contacts SET status = ?1, replied_at = ?2 WHERE contact_id = ?3",
        params,
      )
      .await?;

    Ok(found.then_some(contact))
  }

  async fn set_admin_notes(
    &self,
    id:    Uuid,
    notes: Option<String>,
  ) -> Result<Option<ContactSubmission>> {
    let params = vec![
      notes.map(Value::Text).unwrap_or(Value::Null),
      Value::Text(encode_uuid(id)),
    ];
    let found = self
      .execute_one("UPDATE contacts SET admin_notes = ?1 WHERE contact_id = ?2", params)
      .await?;
    if !found {
      return Ok(None);
    }
    self.get_contact(id).await
  }

  async fn delete_contact(&self, id: Uuid) -> Result<bool> {
    self
      .execute_one(
        "DELETE FROM contacts WHERE contact_id = ?1",
        vec![Value::Text(encode_uuid(id))],
      )
      .await
  }
}
