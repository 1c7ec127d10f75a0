//! Server-side session mirror for Shopfront.
//!
//! One row per live session in the SQLite `sessions` table, upserted on
//! session start, touched by periodic validation, and deleted on logout.

use std::sync::Arc;

use rusqlite::params;

use crate::database::connection::Database;
use crate::types::errors::SessionError;
use crate::types::session::SessionRecord;

/// Trait defining session mirror operations.
pub trait SessionStoreTrait {
    fn upsert(&self, record: &SessionRecord) -> Result<(), SessionError>;
    fn get(&self, id: &str) -> Result<Option<SessionRecord>, SessionError>;
    /// Refreshes `last_seen_at` and pushes `expires_at` forward.
    fn touch(&self, id: &str, now: i64, expires_at: i64) -> Result<(), SessionError>;
    fn delete(&self, id: &str) -> Result<(), SessionError>;
    /// Removes every row past its expiry. Returns the number removed.
    fn prune_expired(&self, now: i64) -> Result<usize, SessionError>;
}

/// Session mirror backed by SQLite.
pub struct SessionStore {
    db: Arc<Database>,
}

impl SessionStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<SessionRecord> {
        Ok(SessionRecord {
            id: row.get(0)?,
            user_id: row.get(1)?,
            created_at: row.get(2)?,
            expires_at: row.get(3)?,
            last_seen_at: row.get(4)?,
        })
    }
}

impl SessionStoreTrait for SessionStore {
    fn upsert(&self, record: &SessionRecord) -> Result<(), SessionError> {
        self.db
            .connection()
            .execute(
                "INSERT INTO sessions (id, user_id, created_at, expires_at, last_seen_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5) \
                 ON CONFLICT(id) DO UPDATE SET \
                     user_id = excluded.user_id, \
                     expires_at = excluded.expires_at, \
                     last_seen_at = excluded.last_seen_at",
                params![
                    record.id,
                    record.user_id,
                    record.created_at,
                    record.expires_at,
                    record.last_seen_at
                ],
            )
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<SessionRecord>, SessionError> {
        let conn = self.db.connection();
        let result = conn.query_row(
            "SELECT id, user_id, created_at, expires_at, last_seen_at \
             FROM sessions WHERE id = ?1",
            params![id],
            Self::row_to_record,
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(SessionError::DatabaseError(e.to_string())),
        }
    }

    fn touch(&self, id: &str, now: i64, expires_at: i64) -> Result<(), SessionError> {
        let affected = self
            .db
            .connection()
            .execute(
                "UPDATE sessions SET last_seen_at = ?1, expires_at = ?2 WHERE id = ?3",
                params![now, expires_at, id],
            )
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(SessionError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), SessionError> {
        self.db
            .connection()
            .execute("DELETE FROM sessions WHERE id = ?1", params![id])
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn prune_expired(&self, now: i64) -> Result<usize, SessionError> {
        let affected = self
            .db
            .connection()
            .execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;
        Ok(affected)
    }
}
