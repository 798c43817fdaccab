//! Named key-value slots backed by SQLite.
//!
//! # Responsibility
//! - Provide get/put/remove over opaque UTF-8 payloads.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - `put` overwrites the full payload of one slot atomically.
//! - `remove` on a missing slot is not an error.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Slot storage failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Backend refused the operation (quota, read-only media, and so on).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "slot storage unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Client-local key-value storage contract.
pub trait SlotStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn put(&self, key: &str, payload: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// SQLite-backed slot store over the `kv_slots` table.
pub struct SqliteSlotStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotStore for SqliteSlotStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM kv_slots WHERE slot_key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn put(&self, key: &str, payload: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (slot_key, payload)
             VALUES (?1, ?2)
             ON CONFLICT(slot_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, payload],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv_slots WHERE slot_key = ?1;", [key])?;
        Ok(())
    }
}

impl<T: SlotStore + ?Sized> SlotStore for &T {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, payload: &str) -> StoreResult<()> {
        (**self).put(key, payload)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}
