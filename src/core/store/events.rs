use rusqlite::params;
use uuid::Uuid;

use super::types::Event;
use super::{SqliteStore, StoreResult};

impl SqliteStore {
    pub(super) async fn list_event_rows(&self, request_id: &str) -> StoreResult<Vec<Event>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare(
            "SELECT id, request_id, type, message, created_at FROM events \
             WHERE request_id = ?1 ORDER BY created_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map(params![request_id], |row| {
            Ok(Event {
                id: row.get(0)?,
                request_id: row.get(1)?,
                event_type: row.get(2)?,
                message: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    pub(super) async fn insert_event(
        &self,
        request_id: &str,
        event_type: &str,
        message: &str,
    ) -> StoreResult<Event> {
        let id = Uuid::new_v4().to_string();
        let db = self.db.lock().await;
        db.execute(
            "INSERT INTO events (id, request_id, type, message) VALUES (?1, ?2, ?3, ?4)",
            params![id, request_id, event_type, message],
        )?;

        let event = db.query_row(
            "SELECT id, request_id, type, message, created_at FROM events WHERE id = ?1",
            params![id],
            |row| {
                Ok(Event {
                    id: row.get(0)?,
                    request_id: row.get(1)?,
                    event_type: row.get(2)?,
                    message: row.get(3)?,
                    created_at: row.get(4)?,
                })
            },
        )?;
        Ok(event)
    }
}
