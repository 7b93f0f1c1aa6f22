//! SQLite-backed ledger of senders, messages, recipients and credit activities.
//!
//! Tables:
//! - `mimo_senders`: sender id, reason, verification status, default flag
//! - `mimo_message`: sent text, provider message id, owning sender (nullable)
//! - `mimo_recipients`: one row per phone of a message, delivery status
//! - `mimo_activitys`: voucher redemption attempts

use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params, params_from_iter};

use crate::domain::{
    Activity, ActivityType, DeliveryStatus, Message, NewActivity, NewMessage, NewRecipient,
    Recipient, Sender, SenderName, SenderStatus, ValidationError,
};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS mimo_senders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sender TEXT NOT NULL,
        reason TEXT NOT NULL DEFAULT '',
        status TEXT,
        is_default INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_mimo_senders_sender ON mimo_senders(sender);

    CREATE TABLE IF NOT EXISTS mimo_message (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sender_id INTEGER REFERENCES mimo_senders(id) ON DELETE SET NULL,
        message_id INTEGER,
        text TEXT NOT NULL,
        unicode INTEGER NOT NULL DEFAULT 0,
        size INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_mimo_message_sender ON mimo_message(sender_id);

    CREATE TABLE IF NOT EXISTS mimo_recipients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        message_id INTEGER NOT NULL REFERENCES mimo_message(id) ON DELETE CASCADE,
        phone TEXT NOT NULL,
        provider_message_id TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT 'P',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_mimo_recipients_message ON mimo_recipients(message_id);
    CREATE INDEX IF NOT EXISTS idx_mimo_recipients_phone ON mimo_recipients(phone);

    CREATE TABLE IF NOT EXISTS mimo_activitys (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user TEXT NOT NULL DEFAULT '',
        serial_number TEXT NOT NULL DEFAULT '',
        voucher TEXT NOT NULL,
        credits INTEGER NOT NULL DEFAULT 0,
        type TEXT NOT NULL DEFAULT '1',
        price TEXT NOT NULL DEFAULT '0.00',
        current_credits INTEGER NOT NULL DEFAULT 0,
        status TEXT,
        expiration_time TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_mimo_activitys_voucher ON mimo_activitys(voucher);
";

const SENDER_COLUMNS: &str = "id, sender, reason, status, is_default, created_at, updated_at";
const MESSAGE_COLUMNS: &str =
    "id, sender_id, message_id, text, unicode, size, created_at, updated_at";
const RECIPIENT_COLUMNS: &str =
    "id, message_id, phone, provider_message_id, status, created_at, updated_at";
const ACTIVITY_COLUMNS: &str = "id, user, serial_number, voucher, credits, type, price, \
     current_credits, status, expiration_time, created_at, updated_at";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[source] rusqlite::Error),

    /// A stored code column holds a value no record type knows about.
    #[error("corrupt row: {0}")]
    Decode(#[source] ValidationError),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::FromSqlConversionFailure(idx, ty, source) => {
                match source.downcast::<ValidationError>() {
                    Ok(decode) => Self::Decode(*decode),
                    Err(source) => {
                        Self::Sqlite(rusqlite::Error::FromSqlConversionFailure(idx, ty, source))
                    }
                }
            }
            other => Self::Sqlite(other),
        }
    }
}

/// Filters for [`Store::list_senders`].
#[derive(Debug, Clone, Default)]
pub struct SenderFilter {
    /// Substring match on the sender id.
    pub search: Option<String>,
    pub status: Option<SenderStatus>,
}

/// SQLite-backed ledger.
pub struct Store {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Open (or create) the ledger database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // ── Senders ─────────────────────────────────────────────────────

    /// Store a newly requested sender. Status stays empty until verification.
    pub fn insert_sender(&self, sender: &SenderName, reason: &str) -> Result<Sender, StoreError> {
        let now = Utc::now();
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO mimo_senders (sender, reason, status, is_default, created_at, updated_at)
             VALUES (?1, ?2, NULL, 0, ?3, ?3)",
            params![sender.as_str(), reason, now],
        )?;
        Ok(Sender {
            id: conn.last_insert_rowid(),
            sender: sender.as_str().to_owned(),
            reason: reason.to_owned(),
            status: None,
            is_default: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get_sender(&self, id: i64) -> Result<Option<Sender>, StoreError> {
        let conn = self.conn.lock();
        let sender = conn
            .query_row(
                &format!("SELECT {SENDER_COLUMNS} FROM mimo_senders WHERE id = ?1"),
                params![id],
                sender_from_row,
            )
            .optional()?;
        Ok(sender)
    }

    /// First sender stored under `name`, if any.
    pub fn sender_by_name(&self, name: &str) -> Result<Option<Sender>, StoreError> {
        let conn = self.conn.lock();
        let sender = conn
            .query_row(
                &format!(
                    "SELECT {SENDER_COLUMNS} FROM mimo_senders WHERE sender = ?1 ORDER BY id LIMIT 1"
                ),
                params![name],
                sender_from_row,
            )
            .optional()?;
        Ok(sender)
    }

    pub fn list_senders(&self, filter: &SenderFilter) -> Result<Vec<Sender>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SENDER_COLUMNS} FROM mimo_senders
             WHERE (?1 IS NULL OR sender LIKE '%' || ?1 || '%')
               AND (?2 IS NULL OR status = ?2)
             ORDER BY id"
        ))?;
        let rows = stmt.query_map(
            params![filter.search.as_deref(), filter.status],
            sender_from_row,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn senders_by_ids(&self, ids: &[i64]) -> Result<Vec<Sender>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SENDER_COLUMNS} FROM mimo_senders WHERE id IN ({}) ORDER BY id",
            placeholders(ids.len())
        ))?;
        let rows = stmt.query_map(params_from_iter(ids), sender_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Mark the given senders as enabled in one transaction. Returns the number of rows updated.
    pub fn enable_senders(&self, ids: &[i64]) -> Result<usize, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let now = Utc::now();
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let mut updated = 0;
        {
            let mut stmt = tx.prepare(
                "UPDATE mimo_senders SET status = ?1, updated_at = ?2 WHERE id = ?3",
            )?;
            for id in ids {
                updated += stmt.execute(params![SenderStatus::Enable, now, id])?;
            }
        }
        tx.commit()?;
        Ok(updated)
    }

    /// Delete a sender. Messages it sent keep existing with no sender.
    pub fn delete_sender(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let deleted = conn.execute("DELETE FROM mimo_senders WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // ── Messages & recipients ───────────────────────────────────────

    pub fn insert_message(&self, message: &NewMessage) -> Result<Message, StoreError> {
        let conn = self.conn.lock();
        Ok(insert_message_row(&conn, message, Utc::now())?)
    }

    /// Store a message and its recipients atomically.
    pub fn insert_message_with_recipients(
        &self,
        message: &NewMessage,
        recipients: &[NewRecipient],
    ) -> Result<Message, StoreError> {
        let now = Utc::now();
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let stored = insert_message_row(&tx, message, now)?;
        insert_recipient_rows(&tx, stored.id, recipients, now)?;
        tx.commit()?;
        Ok(stored)
    }

    /// Insert every recipient for `message_id` in one transaction.
    pub fn bulk_insert_recipients(
        &self,
        message_id: i64,
        recipients: &[NewRecipient],
    ) -> Result<usize, StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let inserted = insert_recipient_rows(&tx, message_id, recipients, Utc::now())?;
        tx.commit()?;
        Ok(inserted)
    }

    pub fn get_message(&self, id: i64) -> Result<Option<Message>, StoreError> {
        let conn = self.conn.lock();
        let message = conn
            .query_row(
                &format!("SELECT {MESSAGE_COLUMNS} FROM mimo_message WHERE id = ?1"),
                params![id],
                message_from_row,
            )
            .optional()?;
        Ok(message)
    }

    /// Messages newest first.
    pub fn list_messages(&self, limit: usize, offset: usize) -> Result<Vec<Message>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM mimo_message
             ORDER BY created_at DESC, id DESC
             LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt.query_map(params![limit as i64, offset as i64], message_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn count_messages(&self) -> Result<i64, StoreError> {
        let conn = self.conn.lock();
        let count = conn.query_row("SELECT COUNT(*) FROM mimo_message", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a message together with its recipients.
    pub fn delete_message(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let deleted = conn.execute("DELETE FROM mimo_message WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    pub fn recipients_for_message(&self, message_id: i64) -> Result<Vec<Recipient>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECIPIENT_COLUMNS} FROM mimo_recipients WHERE message_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![message_id], recipient_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn count_recipients(&self, message_id: i64) -> Result<i64, StoreError> {
        let conn = self.conn.lock();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM mimo_recipients WHERE message_id = ?1",
            params![message_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ── Activities ──────────────────────────────────────────────────

    pub fn insert_activity(&self, activity: &NewActivity) -> Result<Activity, StoreError> {
        let now = Utc::now();
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO mimo_activitys (user, serial_number, voucher, credits, type, price,
                current_credits, status, expiration_time, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            params![
                activity.user,
                activity.serial_number,
                activity.voucher,
                activity.credits,
                activity.kind,
                activity.price,
                activity.current_credits,
                activity.status,
                activity.expiration_time,
                now,
            ],
        )?;
        Ok(Activity {
            id: conn.last_insert_rowid(),
            user: activity.user.clone(),
            serial_number: activity.serial_number.clone(),
            voucher: activity.voucher.clone(),
            credits: activity.credits,
            kind: activity.kind,
            price: activity.price.clone(),
            current_credits: activity.current_credits,
            status: activity.status.clone(),
            expiration_time: activity.expiration_time,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether any activity (accepted or not) was recorded for `voucher`.
    pub fn voucher_exists(&self, voucher: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM mimo_activitys WHERE voucher = ?1)",
            params![voucher],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Activities newest first.
    pub fn list_activities(&self) -> Result<Vec<Activity>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM mimo_activitys ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map([], activity_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn insert_message_row(
    conn: &Connection,
    message: &NewMessage,
    now: DateTime<Utc>,
) -> rusqlite::Result<Message> {
    conn.execute(
        "INSERT INTO mimo_message (sender_id, message_id, text, unicode, size, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            message.sender_id,
            message.message_id,
            message.text,
            message.unicode,
            message.size,
            now,
        ],
    )?;
    Ok(Message {
        id: conn.last_insert_rowid(),
        sender_id: message.sender_id,
        message_id: message.message_id,
        text: message.text.clone(),
        unicode: message.unicode,
        size: message.size,
        created_at: now,
        updated_at: now,
    })
}

fn insert_recipient_rows(
    conn: &Connection,
    message_id: i64,
    recipients: &[NewRecipient],
    now: DateTime<Utc>,
) -> rusqlite::Result<usize> {
    let mut stmt = conn.prepare(
        "INSERT INTO mimo_recipients (message_id, phone, provider_message_id, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )?;
    let mut inserted = 0;
    for recipient in recipients {
        inserted += stmt.execute(params![
            message_id,
            recipient.phone,
            recipient.provider_message_id,
            recipient.status,
            now,
        ])?;
    }
    Ok(inserted)
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn sender_from_row(row: &Row<'_>) -> rusqlite::Result<Sender> {
    Ok(Sender {
        id: row.get(0)?,
        sender: row.get(1)?,
        reason: row.get(2)?,
        status: row.get(3)?,
        is_default: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        message_id: row.get(2)?,
        text: row.get(3)?,
        unicode: row.get(4)?,
        size: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn recipient_from_row(row: &Row<'_>) -> rusqlite::Result<Recipient> {
    Ok(Recipient {
        id: row.get(0)?,
        message_id: row.get(1)?,
        phone: row.get(2)?,
        provider_message_id: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get(0)?,
        user: row.get(1)?,
        serial_number: row.get(2)?,
        voucher: row.get(3)?,
        credits: row.get(4)?,
        kind: row.get(5)?,
        price: row.get(6)?,
        current_credits: row.get(7)?,
        status: row.get(8)?,
        expiration_time: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

// Stored codes: '1'/'2' for sender status, 'S'/'P'/'D' for delivery, '1'..'4' for activity type.

fn unknown_code(field: &'static str, value: &str) -> FromSqlError {
    FromSqlError::Other(Box::new(ValidationError::UnknownCode {
        field,
        value: value.to_owned(),
    }))
}

impl ToSql for SenderStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for SenderStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_str()?;
        Self::from_code(code).ok_or_else(|| unknown_code("status", code))
    }
}

impl ToSql for DeliveryStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for DeliveryStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_str()?;
        Self::from_code(code).ok_or_else(|| unknown_code("status", code))
    }
}

impl ToSql for ActivityType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for ActivityType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_str()?;
        Self::from_code(code).ok_or_else(|| unknown_code("type", code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> SenderName {
        SenderName::new(raw).unwrap()
    }

    fn recipient(phone: &str, status: DeliveryStatus) -> NewRecipient {
        NewRecipient {
            phone: phone.to_owned(),
            provider_message_id: format!("prov-{phone}"),
            status,
        }
    }

    #[test]
    fn new_sender_has_no_status_and_is_not_default() {
        let store = Store::open_in_memory().unwrap();
        let sender = store.insert_sender(&name("LIVING"), "").unwrap();

        assert_eq!(sender.status, None);
        assert!(!sender.is_default);
        assert_eq!(sender.hours_to_check(), "48h");
        assert_eq!(store.get_sender(sender.id).unwrap(), Some(sender));
    }

    #[test]
    fn enable_senders_updates_only_selected_rows() {
        let store = Store::open_in_memory().unwrap();
        let a = store.insert_sender(&name("LIVING"), "").unwrap();
        let b = store.insert_sender(&name("PROMO"), "").unwrap();

        assert_eq!(store.enable_senders(&[a.id]).unwrap(), 1);

        let a = store.get_sender(a.id).unwrap().unwrap();
        let b = store.get_sender(b.id).unwrap().unwrap();
        assert_eq!(a.status, Some(SenderStatus::Enable));
        assert_eq!(a.hours_to_check(), "-");
        assert_eq!(b.status, None);
        assert_eq!(store.enable_senders(&[]).unwrap(), 0);
    }

    #[test]
    fn list_senders_filters_by_search_and_status() {
        let store = Store::open_in_memory().unwrap();
        let living = store.insert_sender(&name("LIVING"), "").unwrap();
        store.insert_sender(&name("PROMO"), "").unwrap();
        store.insert_sender(&name("LIVEBET"), "").unwrap();
        store.enable_senders(&[living.id]).unwrap();

        let all = store.list_senders(&SenderFilter::default()).unwrap();
        assert_eq!(all.len(), 3);

        let live = store
            .list_senders(&SenderFilter {
                search: Some("LIV".to_owned()),
                status: None,
            })
            .unwrap();
        assert_eq!(live.len(), 2);

        let enabled = store
            .list_senders(&SenderFilter {
                search: None,
                status: Some(SenderStatus::Enable),
            })
            .unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].sender, "LIVING");
    }

    #[test]
    fn senders_by_ids_ignores_unknown_ids() {
        let store = Store::open_in_memory().unwrap();
        let a = store.insert_sender(&name("LIVING"), "").unwrap();
        let found = store.senders_by_ids(&[a.id, 999]).unwrap();
        assert_eq!(found.len(), 1);
        assert!(store.senders_by_ids(&[]).unwrap().is_empty());
    }

    #[test]
    fn new_message_defaults_are_persisted() {
        let store = Store::open_in_memory().unwrap();
        let message = store.insert_message(&NewMessage::new("hello")).unwrap();

        let stored = store.get_message(message.id).unwrap().unwrap();
        assert!(!stored.unicode);
        assert_eq!(stored.size, 0);
        assert_eq!(stored.sender_id, None);
        assert_eq!(stored, message);
    }

    #[test]
    fn bulk_insert_creates_one_row_per_recipient() {
        let store = Store::open_in_memory().unwrap();
        let message = store.insert_message(&NewMessage::new("hello")).unwrap();
        let recipients = vec![
            recipient("923000001", DeliveryStatus::Sent),
            recipient("923000002", DeliveryStatus::Pending),
            recipient("923000003", DeliveryStatus::Delivered),
        ];

        assert_eq!(store.bulk_insert_recipients(message.id, &recipients).unwrap(), 3);

        let stored = store.recipients_for_message(message.id).unwrap();
        assert_eq!(stored.len(), 3);
        assert!(stored.iter().all(|r| r.message_id == message.id));
        assert_eq!(stored[2].status, DeliveryStatus::Delivered);
        assert_eq!(store.count_recipients(message.id).unwrap(), 3);
    }

    #[test]
    fn recipients_require_an_existing_message() {
        let store = Store::open_in_memory().unwrap();
        let err = store
            .bulk_insert_recipients(42, &[recipient("923000001", DeliveryStatus::Sent)])
            .unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }

    #[test]
    fn deleting_message_cascades_to_recipients() {
        let store = Store::open_in_memory().unwrap();
        let message = store
            .insert_message_with_recipients(
                &NewMessage::new("hello"),
                &[
                    recipient("923000001", DeliveryStatus::Sent),
                    recipient("923000002", DeliveryStatus::Sent),
                ],
            )
            .unwrap();
        assert_eq!(store.count_recipients(message.id).unwrap(), 2);

        assert!(store.delete_message(message.id).unwrap());
        assert_eq!(store.count_recipients(message.id).unwrap(), 0);
        assert!(!store.delete_message(message.id).unwrap());
    }

    #[test]
    fn deleting_sender_nulls_message_sender() {
        let store = Store::open_in_memory().unwrap();
        let sender = store.insert_sender(&name("LIVING"), "").unwrap();
        let message = store
            .insert_message(&NewMessage::new("hello").sender_id(sender.id))
            .unwrap();
        assert_eq!(message.sender_id, Some(sender.id));

        assert!(store.delete_sender(sender.id).unwrap());

        let message = store.get_message(message.id).unwrap().unwrap();
        assert_eq!(message.sender_id, None);
    }

    #[test]
    fn messages_are_listed_newest_first() {
        let store = Store::open_in_memory().unwrap();
        for text in ["first", "second", "third"] {
            store.insert_message(&NewMessage::new(text)).unwrap();
        }

        let page = store.list_messages(2, 0).unwrap();
        let texts: Vec<&str> = page.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["third", "second"]);

        let rest = store.list_messages(2, 2).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].text, "first");
        assert_eq!(store.count_messages().unwrap(), 3);
    }

    #[test]
    fn activities_track_vouchers() {
        let store = Store::open_in_memory().unwrap();
        assert!(!store.voucher_exists("91919191019191").unwrap());

        let activity = store
            .insert_activity(&NewActivity::invalid("91919191019191"))
            .unwrap();
        assert_eq!(activity.kind, ActivityType::Invalid);
        assert!(store.voucher_exists("91919191019191").unwrap());

        let listed = store.list_activities().unwrap();
        assert_eq!(listed, vec![activity]);
    }

    #[test]
    fn unknown_stored_code_is_a_decode_error() {
        let store = Store::open_in_memory().unwrap();
        let sender = store.insert_sender(&name("LIVING"), "").unwrap();
        store
            .conn
            .lock()
            .execute(
                "UPDATE mimo_senders SET status = 'X' WHERE id = ?1",
                params![sender.id],
            )
            .unwrap();

        let err = store.get_sender(sender.id).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Decode(ValidationError::UnknownCode { field: "status", .. })
        ));
    }

    #[test]
    fn database_file_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mimo.db");

        {
            let store = Store::open(&path).unwrap();
            store.insert_sender(&name("LIVING"), "launch").unwrap();
        }

        let store = Store::open(&path).unwrap();
        let sender = store.sender_by_name("LIVING").unwrap().unwrap();
        assert_eq!(sender.reason, "launch");
    }
}
