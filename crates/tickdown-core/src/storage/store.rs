//! SQLite-backed key/value storage for the timer record.
//!
//! Each [`TimerRecord`] field lives under its own key; a `set` writes all
//! fields inside one transaction so no entry point ever observes a
//! partially-updated record. There is exactly one record; it is never
//! deleted, only overwritten in place.

use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::StoreError;
use crate::timer::{RunState, TimerRecord};

const KEY_STATE: &str = "state";
const KEY_CONFIGURED: &str = "configured_length_secs";
const KEY_PREVIOUS: &str = "previous_length_secs";
const KEY_REMAINING: &str = "remaining_secs";
const KEY_ALARM_SET_AT: &str = "alarm_set_at_epoch_secs";

/// Durable store for the single timer record.
pub struct StateStore {
    conn: Connection,
}

impl StateStore {
    /// Open the store at `<data_dir>/tickdown.db`, creating the schema if
    /// it does not exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()
            .map_err(|e| StoreError::DataDir(e.to_string()))?
            .join("tickdown.db");
        let conn =
            Connection::open(&path).map_err(|source| StoreError::OpenFailed { path, source })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn kv_get_u64(&self, key: &str) -> Result<u64, StoreError> {
        match self.kv_get(key)? {
            None => Ok(0),
            Some(raw) => raw.parse::<u64>().map_err(|_| StoreError::CorruptField {
                key: key.into(),
                value: raw,
            }),
        }
    }

    /// Read the record, or `None` on first run.
    pub fn get(&self) -> Result<Option<TimerRecord>, StoreError> {
        let Some(state_raw) = self.kv_get(KEY_STATE)? else {
            return Ok(None);
        };
        let state = RunState::parse(&state_raw).ok_or_else(|| StoreError::CorruptField {
            key: KEY_STATE.into(),
            value: state_raw,
        })?;
        Ok(Some(TimerRecord {
            state,
            configured_length_secs: self.kv_get_u64(KEY_CONFIGURED)?,
            previous_length_secs: self.kv_get_u64(KEY_PREVIOUS)?,
            remaining_secs: self.kv_get_u64(KEY_REMAINING)?,
            alarm_set_at_epoch_secs: self.kv_get_u64(KEY_ALARM_SET_AT)?,
        }))
    }

    /// Write the record. All fields land in one transaction, so the write is
    /// durable and atomic by the time this returns.
    pub fn set(&mut self, record: &TimerRecord) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let fields: [(&str, String); 5] = [
            (KEY_STATE, record.state.as_str().to_string()),
            (KEY_CONFIGURED, record.configured_length_secs.to_string()),
            (KEY_PREVIOUS, record.previous_length_secs.to_string()),
            (KEY_REMAINING, record.remaining_secs.to_string()),
            (KEY_ALARM_SET_AT, record.alarm_set_at_epoch_secs.to_string()),
        ];
        for (key, value) in fields {
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_has_no_record() {
        let store = StateStore::open_memory().unwrap();
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn record_roundtrip() {
        let mut store = StateStore::open_memory().unwrap();
        let record = TimerRecord {
            state: RunState::Running,
            configured_length_secs: 600,
            previous_length_secs: 600,
            remaining_secs: 123,
            alarm_set_at_epoch_secs: 1_700_000_000,
        };
        store.set(&record).unwrap();
        assert_eq!(store.get().unwrap().unwrap(), record);
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut store = StateStore::open_memory().unwrap();
        let mut record = TimerRecord::with_defaults(600);
        store.set(&record).unwrap();

        record.state = RunState::Running;
        record.remaining_secs = 599;
        store.set(&record).unwrap();

        let loaded = store.get().unwrap().unwrap();
        assert_eq!(loaded.state, RunState::Running);
        assert_eq!(loaded.remaining_secs, 599);
    }

    #[test]
    fn corrupt_state_value_is_an_error() {
        let mut store = StateStore::open_memory().unwrap();
        store.set(&TimerRecord::with_defaults(600)).unwrap();
        store
            .conn
            .execute(
                "UPDATE kv SET value = 'sideways' WHERE key = 'state'",
                [],
            )
            .unwrap();
        assert!(matches!(
            store.get(),
            Err(StoreError::CorruptField { .. })
        ));
    }

    #[test]
    fn corrupt_number_is_an_error() {
        let mut store = StateStore::open_memory().unwrap();
        store.set(&TimerRecord::with_defaults(600)).unwrap();
        store
            .conn
            .execute(
                "UPDATE kv SET value = '-5' WHERE key = 'remaining_secs'",
                [],
            )
            .unwrap();
        assert!(matches!(
            store.get(),
            Err(StoreError::CorruptField { .. })
        ));
    }
}
